use std::fmt;

/// Failures while running partitioned work.
#[derive(Debug)]
pub enum EngineError<E> {
    /// Zero partitions were scheduled; a round over nothing is a programming
    /// error, not a recoverable runtime condition.
    EmptyPartitionSet,

    /// One partition's task failed; the whole run is aborted.
    Task {
        /// Index of the failing partition.
        partition: usize,
        /// The task's own error.
        source: E,
    },
}

impl<E: fmt::Display> fmt::Display for EngineError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::EmptyPartitionSet => write!(f, "no partitions to run"),
            EngineError::Task { partition, source } => {
                write!(f, "partition {partition} failed: {source}")
            }
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for EngineError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Task { source, .. } => Some(source),
            EngineError::EmptyPartitionSet => None,
        }
    }
}
