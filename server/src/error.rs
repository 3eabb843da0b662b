use std::io;

use thiserror::Error;

/// The server's result type.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Server startup and connection failures.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Unparseable or out-of-range configuration, caught before binding.
    #[error("invalid config: {0}")]
    Config(String),
    /// The client sent something that is not a request we can read.
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("model error: {0}")]
    Model(#[from] salreg::Error),
}
