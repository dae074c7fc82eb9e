use thiserror::Error;

/// Everything that can stop a simulation.
#[derive(Debug, Error)]
pub enum BingoError {
    #[error("invalid configuration: {reason}")]
    Configuration { reason: String },
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
    #[error("cell ({row}, {col}) is outside a {size}x{size} card")]
    Index { row: usize, col: usize, size: usize },
    #[error("draw sequence exhausted after {balls_drawn} balls without a bingo")]
    InvariantViolation { balls_drawn: u32 },
    #[error("simulation cancelled after {completed} of {requested} games")]
    Cancelled { completed: u64, requested: u64 },
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
}

impl BingoError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        BingoError::Configuration { reason: reason.into() }
    }

    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        BingoError::InvalidArgument { reason: reason.into() }
    }
}
