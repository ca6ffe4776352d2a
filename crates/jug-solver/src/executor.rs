//! Operation execution and path replay.
//!
//! `apply` holds the six transition rules; the solver, the terminal game and
//! the path checker all go through it so the rules live in one place.

use smallvec::SmallVec;

use crate::classifier::classify;
use crate::error::SolverError;
use crate::puzzle::{Capacities, JugState, Operation, Path, SearchProblem};

/// Successor list of a single state: one entry per operation
pub type Successors = SmallVec<[(Operation, JugState); 6]>;

/// Apply one operation to a state.
///
/// Operations that cannot change anything (filling a full vessel, pouring
/// from an empty one) return the state unchanged.
pub fn apply(capacities: Capacities, state: JugState, op: Operation) -> JugState {
    let JugState { a, b } = state;
    match op {
        Operation::FillA => JugState::new(capacities.a, b),
        Operation::FillB => JugState::new(a, capacities.b),
        Operation::EmptyA => JugState::new(0, b),
        Operation::EmptyB => JugState::new(a, 0),
        Operation::PourAToB => {
            let transfer = a.min(capacities.b.saturating_sub(b));
            JugState::new(a - transfer, b + transfer)
        }
        Operation::PourBToA => {
            let transfer = b.min(capacities.a.saturating_sub(a));
            JugState::new(a + transfer, b - transfer)
        }
    }
}

/// All six candidate successors, no-ops included, in expansion order.
pub fn successors(capacities: Capacities, state: JugState) -> Successors {
    Operation::ALL
        .into_iter()
        .map(|op| (op, apply(capacities, state, op)))
        .collect()
}

/// Validate an externally supplied sequence of states against a problem.
///
/// The sequence must start empty, stay inside both vessels and every step
/// must be exactly one operation.
pub fn replay(problem: &SearchProblem, states: &[JugState]) -> Result<Path, SolverError> {
    let capacities = problem.capacities();

    let Some(&start) = states.first() else {
        return Err(SolverError::InvalidPath {
            reason: "path is empty".to_string(),
        });
    };
    if start != JugState::EMPTY {
        return Err(SolverError::InvalidPath {
            reason: format!("path starts at {} instead of [0, 0]", start),
        });
    }
    if let Some((index, state)) = states
        .iter()
        .enumerate()
        .find(|(_, s)| !capacities.contains(**s))
    {
        return Err(SolverError::InvalidPath {
            reason: format!(
                "state {} at position {} exceeds capacities [{}, {}]",
                state, index, capacities.a, capacities.b
            ),
        });
    }

    for (i, pair) in states.windows(2).enumerate() {
        let (prev, next) = (pair[0], pair[1]);
        let reproduced = classify(capacities, prev, next)
            .map(|op| apply(capacities, prev, op) == next)
            .unwrap_or(false);
        if !reproduced {
            return Err(SolverError::MalformedPath {
                step: i + 1,
                prev,
                next,
            });
        }
    }

    Ok(Path::from_states(states.to_vec()))
}

/// Simple verification: is this a valid path that ends on the goal?
pub fn verify_path(problem: &SearchProblem, states: &[JugState]) -> bool {
    replay(problem, states)
        .map(|path| problem.is_goal(path.last()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(a: u32, b: u32) -> JugState {
        JugState::new(a, b)
    }

    #[test]
    fn test_apply_rules() {
        let caps = Capacities::new(4, 3);

        assert_eq!(apply(caps, s(1, 2), Operation::FillA), s(4, 2));
        assert_eq!(apply(caps, s(1, 2), Operation::FillB), s(1, 3));
        assert_eq!(apply(caps, s(1, 2), Operation::EmptyA), s(0, 2));
        assert_eq!(apply(caps, s(1, 2), Operation::EmptyB), s(1, 0));

        // Pour stops when the destination is full
        assert_eq!(apply(caps, s(4, 1), Operation::PourAToB), s(2, 3));
        // ... or when the source is empty
        assert_eq!(apply(caps, s(1, 0), Operation::PourAToB), s(0, 1));
        assert_eq!(apply(caps, s(3, 3), Operation::PourBToA), s(4, 2));
        assert_eq!(apply(caps, s(0, 2), Operation::PourBToA), s(2, 0));
    }

    #[test]
    fn test_apply_noops() {
        let caps = Capacities::new(4, 3);
        assert_eq!(apply(caps, s(4, 0), Operation::FillA), s(4, 0));
        assert_eq!(apply(caps, s(0, 0), Operation::EmptyB), s(0, 0));
        assert_eq!(apply(caps, s(0, 3), Operation::PourAToB), s(0, 3));
        assert_eq!(apply(caps, s(4, 3), Operation::PourBToA), s(4, 3));
    }

    #[test]
    fn test_successor_order() {
        let caps = Capacities::new(4, 3);
        let next = successors(caps, s(1, 1));
        let ops: Vec<Operation> = next.iter().map(|(op, _)| *op).collect();
        assert_eq!(ops, Operation::ALL.to_vec());
        assert_eq!(next[4].1, s(0, 2));
        assert_eq!(next[5].1, s(2, 0));
    }

    #[test]
    fn test_replay_valid_path() {
        let problem = SearchProblem::new(4, 3, 2).unwrap();
        let states = [s(0, 0), s(0, 3), s(3, 0), s(3, 3), s(4, 2)];

        let path = replay(&problem, &states).unwrap();
        assert_eq!(path.len(), 4);
        assert!(verify_path(&problem, &states));
    }

    #[test]
    fn test_replay_rejects_bad_paths() {
        let problem = SearchProblem::new(4, 3, 2).unwrap();

        assert!(matches!(
            replay(&problem, &[]),
            Err(SolverError::InvalidPath { .. })
        ));
        assert!(matches!(
            replay(&problem, &[s(4, 0)]),
            Err(SolverError::InvalidPath { .. })
        ));
        assert!(matches!(
            replay(&problem, &[s(0, 0), s(5, 0)]),
            Err(SolverError::InvalidPath { .. })
        ));
        // Jumping straight to a mixed state is not a single operation
        assert_eq!(
            replay(&problem, &[s(0, 0), s(4, 0), s(2, 2)]),
            Err(SolverError::MalformedPath {
                step: 2,
                prev: s(4, 0),
                next: s(2, 2),
            })
        );
        // Partial fill
        assert!(matches!(
            replay(&problem, &[s(0, 0), s(0, 2)]),
            Err(SolverError::MalformedPath { step: 1, .. })
        ));
        // Classified as a pour, but a real pour would move 3 units, not 1
        assert!(matches!(
            replay(&problem, &[s(0, 0), s(4, 0), s(3, 1)]),
            Err(SolverError::MalformedPath { step: 2, .. })
        ));
    }

    #[test]
    fn test_verify_path_requires_goal() {
        let problem = SearchProblem::new(4, 3, 2).unwrap();
        assert!(!verify_path(&problem, &[s(0, 0), s(4, 0)]));
    }
}
