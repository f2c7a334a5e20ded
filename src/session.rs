//! The interactive chat session: read a line, ask the model, print the reply.

use std::io::{self, BufRead, ErrorKind, Write};

use libc::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use tracing::{debug, info, warn};

use crate::cli::{banner, separator, BOT_PREFIX, EXIT_COMMANDS, FAREWELL, USER_PROMPT};
use crate::config::Config;
use crate::errors::ChatError;
use crate::gemini::GeminiClient;
use crate::transcript::Transcript;
use crate::ModelService;

/// Where the session is in its read/ask/print cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the next line of input.
    Idle,
    /// A model request is in flight.
    Pending,
    /// Finished. No further input is accepted.
    Terminated,
}

/// Why a session ended normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Command,
    EndOfInput,
}

/// True when the input is an exit command: `exit` or `quit`, ignoring
/// surrounding whitespace and case.
pub fn should_exit(input: &str) -> bool {
    let input = input.trim();
    EXIT_COMMANDS
        .iter()
        .any(|cmd| input.eq_ignore_ascii_case(cmd))
}

/// One chat session. Owns the transcript; it is dropped with the session.
pub struct Session<'a, S: ModelService> {
    config: &'a Config,
    service: S,
    transcript: Transcript,
    state: SessionState,
}

impl<'a, S: ModelService> Session<'a, S> {
    pub fn new(config: &'a Config, service: S) -> Self {
        Self {
            config,
            service,
            transcript: Transcript::new(),
            state: SessionState::Idle,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    #[cfg(test)]
    fn service(&self) -> &S {
        &self.service
    }

    /// Print the banner, then chat until an exit command or end of input.
    ///
    /// The session is `Terminated` once this returns, whether it ended
    /// normally or on an I/O error.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        out: &mut W,
    ) -> Result<ExitReason, ChatError> {
        let result = self.chat_loop(input, out);
        self.state = SessionState::Terminated;
        result
    }

    fn chat_loop<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        out: &mut W,
    ) -> Result<ExitReason, ChatError> {
        writeln!(out, "{}", banner(&self.config.model))?;
        self.state = SessionState::Idle;
        info!(model = %self.config.model, "session started");

        let reason = loop {
            write!(out, "\n{USER_PROMPT}")?;
            out.flush()?;

            let mut line = String::new();
            match input.read_line(&mut line) {
                Ok(0) => {
                    // keep the farewell off the prompt line
                    writeln!(out)?;
                    break ExitReason::EndOfInput;
                }
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    warn!(error = %e, "discarding unreadable input line");
                    writeln!(out, "Could not read that line (is it valid UTF-8?).")?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            if should_exit(&line) {
                break ExitReason::Command;
            }
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            self.submit(text, out)?;
        };

        info!(?reason, turns = self.transcript.len(), "session ended");
        writeln!(out, "{FAREWELL}")?;
        out.flush()?;
        Ok(reason)
    }

    /// Send one user turn, with the conversation so far, to the model and
    /// print the reply.
    ///
    /// A failed model call is reported on `out` and leaves the user turn in
    /// the transcript without an answer; it never ends the session. Only a
    /// failure to write to `out` is returned.
    pub fn submit<W: Write>(&mut self, text: &str, out: &mut W) -> Result<(), ChatError> {
        if self.state == SessionState::Terminated {
            debug!("ignoring submit on a terminated session");
            return Ok(());
        }

        self.transcript.push_user(text);
        let context = self.transcript.context(self.config.max_turns);
        debug!(
            context_turns = context.len(),
            transcript_turns = self.transcript.len(),
            "sending turn"
        );

        self.state = SessionState::Pending;
        let result = self.service.generate(context);
        self.state = SessionState::Idle;

        match result {
            Ok(reply) => {
                writeln!(out, "{BOT_PREFIX}{reply}")?;
                writeln!(out, "{}", separator())?;
                self.transcript.push_assistant(reply);
            }
            Err(e) => {
                warn!(error = %e, "model call failed");
                writeln!(out, "An error occurred during chat: {e}")?;
                writeln!(
                    out,
                    "Please try your question again or check your API key/network connection."
                )?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

/// Listen for `SIGINT`/`SIGTERM` and end the process cleanly, whether the
/// session is waiting for input or for the model. Nothing is saved.
pub fn listen_interrupt() -> Result<(), ChatError> {
    let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(ChatError::SignalHandler)?;
    std::thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            info!(signal, "interrupted, shutting down");
            let mut stdout = io::stdout();
            let _ = writeln!(stdout, "\n{FAREWELL}");
            let _ = stdout.flush();
            std::process::exit(0);
        }
    });
    Ok(())
}

/// Start a chat session on the terminal
pub fn run_chat() -> Result<(), ChatError> {
    let config = Config::from_env()?;
    debug!(?config, "configuration loaded");
    let client = GeminiClient::new(&config)?;
    listen_interrupt()?;

    // `Stdout` locks per write; holding a `StdoutLock` here would block the
    // interrupt listener's farewell forever.
    let stdin = io::stdin();
    Session::new(&config, client).run(stdin.lock(), &mut io::stdout())?;
    Ok(())
}
