use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while loading, fitting or querying a model.
#[derive(Error, Debug)]
pub enum Error {
    /// Not enough samples (or not enough distinct x-values) to fit or score.
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    /// A query reached a model that has not been fitted yet.
    #[error("the model has not been fitted")]
    ModelNotFitted,
    /// Non-finite, mismatched or out-of-domain input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Unreadable CSV, or a value that does not parse as a number.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
