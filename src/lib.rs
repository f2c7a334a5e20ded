//! # gembot
//! Chat with Gemini from your terminal!
//!
//! A small read-eval-print chatbot: each line you type is sent to the Gemini API together with
//! everything said so far in the session, and the reply is printed back. Nothing is saved; the
//! conversation lives only as long as the process.
//!
//! ## Usage
//! ```shell
//! $ GOOGLE_API_KEY=... gembot
//! ```
//! Type `quit` or `exit` (or press Ctrl-D / Ctrl-C) to leave.
//!
//! ## Environment Variables:
//! A `.env` file in the working directory is loaded first; variables already set take precedence.
//! - `GOOGLE_API_KEY`: Required. The Gemini API key.
//! - `GEMBOT_MODEL`: Optional. Model id (default: gemini-2.5-flash).
//! - `GEMBOT_TEMPERATURE`: Optional. Sampling temperature between 0.0 and 2.0 (default: 0.3).
//! - `GEMBOT_SYSTEM_PROMPT`: Optional. System instruction sent with every request.
//! - `GEMBOT_MAX_TURNS`: Optional. Send only the most recent N turns as context. Unset sends the
//!   whole conversation, and a conversation too long for the model is reported as an error.
//! - `GEMBOT_TIMEOUT_SECS`: Optional. Per-request timeout (default: 120).
//! - `GEMBOT_API_BASE`: Optional. API root URL, e.g. a proxy (default: the public Gemini API).
//! - `GEMBOT_LOG`: Optional. `tracing` filter for diagnostics on stderr (default: warn).
//!
pub mod cli;
pub mod config;
pub mod errors;
pub mod gemini;
pub mod session;
pub mod transcript;

use errors::ServiceError;
use transcript::Turn;

/// A hosted model that answers a conversation.
///
/// `turns` is the conversation to answer, oldest first, ending with the user turn awaiting a
/// reply. Implementations block until a reply or a failure is available.
pub trait ModelService {
    fn generate(&self, turns: &[Turn]) -> Result<String, ServiceError>;
}

impl<S: ModelService + ?Sized> ModelService for &S {
    fn generate(&self, turns: &[Turn]) -> Result<String, ServiceError> {
        (**self).generate(turns)
    }
}
