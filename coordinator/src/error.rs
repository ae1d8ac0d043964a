use std::fmt;

use compute::EngineError;
use train_core::TrainError;

/// The coordinator's result type.
pub type Result<T> = std::result::Result<T, TrainingError>;

/// All errors that can surface from a training run.
#[derive(Debug)]
pub enum TrainingError {
    /// Invalid configuration — caught before any round starts.
    InvalidConfig(String),

    /// A round was scheduled over zero partitions.
    EmptyPartitionSet,

    /// One partition's local training failed, aborting the whole round.
    Partition { partition: usize, source: TrainError },

    /// A training failure outside any specific partition (e.g. a reduction
    /// shape mismatch).
    Train(TrainError),
}

impl fmt::Display for TrainingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::EmptyPartitionSet => write!(f, "no partitions scheduled for round"),
            Self::Partition { partition, source } => {
                write!(f, "partition {partition} failed: {source}")
            }
            Self::Train(e) => write!(f, "training error: {e}"),
        }
    }
}

impl std::error::Error for TrainingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Partition { source, .. } => Some(source),
            Self::Train(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TrainError> for TrainingError {
    fn from(e: TrainError) -> Self {
        Self::Train(e)
    }
}

impl From<EngineError<TrainError>> for TrainingError {
    fn from(e: EngineError<TrainError>) -> Self {
        match e {
            EngineError::EmptyPartitionSet => Self::EmptyPartitionSet,
            EngineError::Task { partition, source } => Self::Partition { partition, source },
        }
    }
}
