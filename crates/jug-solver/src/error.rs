//! Error type shared by the solver, the classifier and the path replayer.
//!
//! An unreachable goal is not an error: it is reported through
//! [`SearchOutcome::Unreachable`](crate::solver::SearchOutcome). The variants
//! here cover bad input and malformed paths only.

use crate::puzzle::{JugState, Vessel};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolverError {
    /// A vessel capacity was zero or negative.
    #[error("capacity of vessel {vessel} must be a positive integer, got {value}")]
    InvalidCapacity { vessel: Vessel, value: i64 },

    /// The goal volume was negative.
    #[error("goal must be zero or a positive integer, got {value}")]
    InvalidGoal { value: i64 },

    /// A value does not fit the solver's integer range.
    #[error("{name} is too large: {value}")]
    OutOfRange { name: &'static str, value: i64 },

    /// A replayed path cannot belong to the given problem.
    #[error("invalid path: {reason}")]
    InvalidPath { reason: String },

    /// Two consecutive states are not connected by any single operation.
    #[error("malformed path at step {step}: no operation turns {prev} into {next}")]
    MalformedPath {
        step: usize,
        prev: JugState,
        next: JugState,
    },
}

impl SolverError {
    /// Short stable code for this variant, printed by the CLI.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::InvalidCapacity { .. } => "J001",
            SolverError::InvalidGoal { .. } => "J002",
            SolverError::OutOfRange { .. } => "J003",
            SolverError::InvalidPath { .. } => "J004",
            SolverError::MalformedPath { .. } => "J005",
        }
    }

    /// Whether the error was caused by the caller's input rather than an
    /// internal inconsistency.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        !matches!(self, SolverError::MalformedPath { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SolverError::InvalidCapacity {
            vessel: Vessel::B,
            value: 0,
        };
        assert_eq!(
            err.to_string(),
            "capacity of vessel B must be a positive integer, got 0"
        );
        assert_eq!(err.code(), "J001");
        assert!(err.is_input_error());

        let err = SolverError::MalformedPath {
            step: 2,
            prev: JugState::new(1, 1),
            next: JugState::new(3, 3),
        };
        assert_eq!(
            err.to_string(),
            "malformed path at step 2: no operation turns [1, 1] into [3, 3]"
        );
        assert!(!err.is_input_error());
    }
}
