//! Operation executor
//!
//! Translates model-issued tool calls into pip subprocess invocations and
//! normalized results. No failure here is fatal: everything becomes an
//! `OperationResult` that flows back into the conversation for the model
//! to narrate.

use thiserror::Error;

pub mod exec;
pub mod op;
pub mod pip;
pub mod registry;
pub mod result;

pub use exec::Executor;
pub use op::Operation;
pub use pip::{CommandOutput, Pip};
pub use result::{OperationResult, UpdateFailure, UpdateReport};

/// Executor errors. All of them are converted into failed
/// `OperationResult`s at the `Executor` boundary.
#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("invalid arguments for {name}: {source}")]
    InvalidArguments {
        name: String,
        source: serde_json::Error,
    },

    #[error("failed to run {binary}: {source}")]
    Environment {
        binary: String,
        source: std::io::Error,
    },

    #[error("{0}")]
    Failed(String),

    #[error("package {0} not found")]
    NotFound(String),

    #[error("command timed out after {0} seconds")]
    Timeout(u64),

    #[error("unexpected pip output: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, ExecutorError>;
