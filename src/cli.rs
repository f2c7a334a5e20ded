use clap::{command, Parser};

/// Prompt shown before each line of user input.
pub const USER_PROMPT: &str = "You: ";
/// Prefix of every printed model reply.
pub const BOT_PREFIX: &str = "Bot: ";
/// Printed once when the session ends normally or is interrupted.
pub const FAREWELL: &str = "Exiting...";
/// Inputs that end the session. Matched trimmed and case-insensitively.
pub const EXIT_COMMANDS: [&str; 2] = ["exit", "quit"];
/// Width of the `=`/`-` rules around the banner and after each reply.
pub const RULE_WIDTH: usize = 60;

/// CLI for `gembot`. Takes no options: running it starts a chat session.
/// All tunables come from the environment (see the crate docs).
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {}

/// The banner printed when a session starts.
pub fn banner(model: &str) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    format!(
        "{heavy}\n\
         --- Gemini Chatbot ---\n\
         Chatting with {model}. Ask anything; earlier turns stay in context.\n\
         {heavy}\n \
         - Type `{}` or `{}` to end the session.\n\
         {light}",
        EXIT_COMMANDS[1], EXIT_COMMANDS[0]
    )
}

/// The rule printed after each reply.
pub fn separator() -> String {
    "-".repeat(RULE_WIDTH)
}
