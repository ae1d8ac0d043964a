use std::fmt;

/// Errors produced by local training computations when inputs are invalid.
#[derive(Debug)]
pub enum TrainError {
    /// An input is invalid for semantic or domain reasons.
    InvalidInput(&'static str),

    /// A length invariant was violated (e.g. mismatched parameter vectors).
    ShapeMismatch {
        /// Human-readable context for the mismatch (e.g. "params", "gradient").
        what: &'static str,
        /// Observed value.
        got: usize,
        /// Expected value.
        expected: usize,
    },
}

impl fmt::Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            TrainError::ShapeMismatch {
                what,
                got,
                expected,
            } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
        }
    }
}

impl std::error::Error for TrainError {}
