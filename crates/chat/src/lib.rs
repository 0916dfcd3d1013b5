//! Dispatch loop and conversation state
//!
//! One user utterance in, one answer out: the session asks the model for a
//! decision, runs the requested operation locally, and asks the model again
//! to phrase the result. The conversation log is the only session memory.

use thiserror::Error;

pub mod conversation;
pub mod session;

pub use conversation::Conversation;
pub use session::ChatSession;

/// Dispatch errors. Everything here aborts the current turn only; the
/// session stays usable.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("provider error: {0}")]
    Provider(#[from] pamm_provider::ProviderError),
}

pub type Result<T> = std::result::Result<T, ChatError>;
