use clap::Parser;
use gembot::{cli::Args, config::LOG_VAR, session::run_chat};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let _args = Args::parse();
    // before logging, so GEMBOT_LOG may come from .env too
    let dotenv = dotenvy::dotenv();

    // Diagnostics go to stderr so they never interleave with the chat on stdout.
    let filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => debug!(error = %e, "ignoring unreadable .env file"),
    }

    run_chat().unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });
}
