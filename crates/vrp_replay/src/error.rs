use thiserror::Error;

use crate::replay::controller::ReplayState;

/// Failures of the replay engine and its controller. A failed tick leaves the
/// session exactly as it was before the tick started.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReplayError {
    #[error("malformed solution: {0}")]
    MalformedSolution(String),

    #[error("clock increment must be a finite non-negative number, got {0}")]
    InvalidIncrement(f64),

    #[error("scaling factor must be a finite positive number, got {0}")]
    InvalidScalingFactor(f64),

    #[error("cannot {action} while {from}")]
    InvalidTransition {
        from: ReplayState,
        action: &'static str,
    },

    #[error("no solution has been loaded")]
    NoSolution,
}
