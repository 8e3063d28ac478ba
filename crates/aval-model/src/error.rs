use thiserror::Error;

#[derive(Debug, Error)]
pub enum AvalError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("input contains no usable records")]
    EmptyInput,
    #[error("measure column not found: {0}")]
    MeasureNotFound(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, AvalError>;
