//! Labels transitions between consecutive states.
//!
//! Classification only drives step labels and display choices; it never
//! influences the search.

use std::fmt;

use serde::Serialize;

use crate::error::SolverError;
use crate::puzzle::{Capacities, JugState, Operation, Path};

/// Identify the operation that turned `prev` into `next`.
///
/// Rules are checked in a fixed priority order: pours first, then fills,
/// then empties. Returns `None` when no rule matches, which means the pair
/// did not come from a valid path.
pub fn classify(capacities: Capacities, prev: JugState, next: JugState) -> Option<Operation> {
    let d_a = i64::from(next.a) - i64::from(prev.a);
    let d_b = i64::from(next.b) - i64::from(prev.b);

    if d_a < 0 && d_b > 0 && d_a == -d_b {
        Some(Operation::PourAToB)
    } else if d_b < 0 && d_a > 0 && d_b == -d_a {
        Some(Operation::PourBToA)
    } else if next.a == capacities.a && d_a > 0 && d_b == 0 {
        Some(Operation::FillA)
    } else if next.b == capacities.b && d_b > 0 && d_a == 0 {
        Some(Operation::FillB)
    } else if next.a == 0 && d_a < 0 && d_b == 0 {
        Some(Operation::EmptyA)
    } else if next.b == 0 && d_b < 0 && d_a == 0 {
        Some(Operation::EmptyB)
    } else {
        None
    }
}

/// One labelled step of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Step {
    /// 1-based position in the path
    pub number: usize,
    pub operation: Operation,
    /// State after the operation
    pub state: JugState,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} → {}", self.number, self.operation, self.state)
    }
}

/// Classify every transition of a path.
///
/// Fails on the first pair that no operation explains.
pub fn classify_path(capacities: Capacities, path: &Path) -> Result<Vec<Step>, SolverError> {
    path.transitions()
        .enumerate()
        .map(|(i, (prev, next))| {
            classify(capacities, prev, next)
                .map(|operation| Step {
                    number: i + 1,
                    operation,
                    state: next,
                })
                .ok_or(SolverError::MalformedPath {
                    step: i + 1,
                    prev,
                    next,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(a: u32, b: u32) -> JugState {
        JugState::new(a, b)
    }

    #[test]
    fn test_classify_each_operation() {
        let caps = Capacities::new(4, 3);

        assert_eq!(classify(caps, s(0, 1), s(4, 1)), Some(Operation::FillA));
        assert_eq!(classify(caps, s(2, 0), s(2, 3)), Some(Operation::FillB));
        assert_eq!(classify(caps, s(3, 2), s(0, 2)), Some(Operation::EmptyA));
        assert_eq!(classify(caps, s(3, 2), s(3, 0)), Some(Operation::EmptyB));
        assert_eq!(classify(caps, s(4, 0), s(1, 3)), Some(Operation::PourAToB));
        assert_eq!(classify(caps, s(0, 3), s(3, 0)), Some(Operation::PourBToA));
    }

    #[test]
    fn test_pour_takes_priority() {
        // Pouring everything from B into an empty A of equal size also lands
        // A on its capacity; the pour rule wins.
        let caps = Capacities::new(3, 3);
        assert_eq!(classify(caps, s(0, 3), s(3, 0)), Some(Operation::PourBToA));
    }

    #[test]
    fn test_classify_unknown() {
        let caps = Capacities::new(4, 3);

        // No change
        assert_eq!(classify(caps, s(1, 1), s(1, 1)), None);
        // Partial fill
        assert_eq!(classify(caps, s(0, 0), s(2, 0)), None);
        // Both vessels change without conserving volume
        assert_eq!(classify(caps, s(4, 3), s(0, 0)), None);
        // Partial empty
        assert_eq!(classify(caps, s(3, 0), s(1, 0)), None);
    }

    #[test]
    fn test_classify_path_steps() {
        let caps = Capacities::new(4, 3);
        let path = Path::from_states(vec![s(0, 0), s(4, 0), s(1, 3), s(1, 0)]);

        let steps = classify_path(caps, &path).unwrap();
        let ops: Vec<Operation> = steps.iter().map(|step| step.operation).collect();
        assert_eq!(
            ops,
            vec![Operation::FillA, Operation::PourAToB, Operation::EmptyB]
        );
        assert_eq!(steps[1].to_string(), "2. Pour A → B → [1, 3]");
    }

    #[test]
    fn test_classify_path_malformed() {
        let caps = Capacities::new(4, 3);
        let path = Path::from_states(vec![s(0, 0), s(4, 0), s(2, 2)]);

        assert_eq!(
            classify_path(caps, &path),
            Err(SolverError::MalformedPath {
                step: 2,
                prev: s(4, 0),
                next: s(2, 2),
            })
        );
    }
}
