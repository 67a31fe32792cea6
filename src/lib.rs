//! alloc-book - Split a textbook's pages across a fixed number of lectures.
//!
//! This library provides the core functionality for the `alloc-book` CLI tool,
//! including the page allocation engine, the `:`-command interpreter and
//! persistence of the allocation file.

pub mod allocation;
pub mod cli;
pub mod commands;
pub mod logging;
pub mod models;
pub mod repl;
pub mod storage;

/// Library-level error type for alloc-book operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("file:{0} is not found.")]
    NotFound(String),

    #[error("file:{0} is already exist.")]
    AlreadyExists(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Missing argument: file:configfile is not found.")]
    MissingConfigfile,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("page count out of range")]
    PageOverflow,

    #[error("Input closed before setup was confirmed")]
    InputClosed,
}

impl Error {
    /// Errors the REPL reports and recovers from instead of terminating.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::PageOverflow | Self::Io(_) | Self::Json(_))
    }
}

/// Result type alias for alloc-book operations.
pub type Result<T> = std::result::Result<T, Error>;
