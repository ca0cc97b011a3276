use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("No player registered with email: {0}")]
    LookupFailure(String),

    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("Invalid source location: {0}")]
    InvalidLocation(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
