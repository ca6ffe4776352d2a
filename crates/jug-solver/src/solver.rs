//! Breadth-first shortest-path solver.
//!
//! Every operation costs one move, so the first goal state taken off the
//! FIFO queue is reached by a minimum-length path. States are deduplicated
//! when they are first discovered; each one keeps a link to the state it was
//! discovered from, and the path is rebuilt from those links.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};

use log::debug;

use crate::error::SolverError;
use crate::executor::successors;
use crate::puzzle::{JugState, Path, SearchProblem};

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum number of distinct states the search may discover before
    /// giving up
    pub max_states: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_states: 4_000_000,
        }
    }
}

/// How a search ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Shortest path to a goal state
    Found(Path),
    /// No sequence of operations reaches the goal
    Unreachable,
    /// The state limit was hit before the search finished
    Aborted,
}

impl SearchOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    /// Machine-readable reason for a failed search
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            SearchOutcome::Found(_) => None,
            SearchOutcome::Unreachable => Some("unreachable"),
            SearchOutcome::Aborted => Some("search_aborted"),
        }
    }
}

/// Result of the solver search
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub outcome: SearchOutcome,
    /// Whether the goal was rejected up front because it exceeds both vessels
    pub fast_path: bool,
    /// Number of states taken off the queue and expanded
    pub states_explored: usize,
    /// Number of distinct states discovered
    pub states_discovered: usize,
}

/// Solve the puzzle from raw integers.
///
/// Invalid capacities or a negative goal are rejected before any search
/// starts. An unreachable goal is a normal outcome, not an error.
pub fn solve(capacity_a: i64, capacity_b: i64, goal: i64) -> Result<SearchOutcome, SolverError> {
    let problem = SearchProblem::new(capacity_a, capacity_b, goal)?;
    Ok(solve_problem(&problem, &SolverConfig::default()).outcome)
}

/// Find a shortest path from two empty vessels to a goal state.
pub fn solve_problem(problem: &SearchProblem, config: &SolverConfig) -> SolverResult {
    solve_from(problem, JugState::EMPTY, config)
}

/// Find a shortest path from an arbitrary start state to a goal state.
///
/// The returned path begins at `start`. A start state outside the vessels is
/// reported as unreachable.
pub fn solve_from(problem: &SearchProblem, start: JugState, config: &SolverConfig) -> SolverResult {
    let capacities = problem.capacities();

    if !capacities.contains(start) {
        debug!(
            "start {} lies outside vessels [{}, {}]",
            start, capacities.a, capacities.b
        );
        return SolverResult {
            outcome: SearchOutcome::Unreachable,
            fast_path: false,
            states_explored: 0,
            states_discovered: 0,
        };
    }

    if problem.goal_exceeds_capacities() {
        debug!(
            "goal {} cannot fit in vessels [{}, {}], skipping search",
            problem.goal(),
            capacities.a,
            capacities.b
        );
        return SolverResult {
            outcome: SearchOutcome::Unreachable,
            fast_path: true,
            states_explored: 0,
            states_discovered: 0,
        };
    }

    debug!(
        "searching up to {} states for goal {}",
        capacities.state_space_size(),
        problem.goal()
    );

    // Discovered states mapped to the state they were reached from
    let mut parents: HashMap<JugState, Option<JugState>> = HashMap::new();
    let mut queue: VecDeque<JugState> = VecDeque::new();
    parents.insert(start, None);
    queue.push_back(start);

    let mut states_explored: usize = 0;

    while let Some(state) = queue.pop_front() {
        states_explored += 1;

        if problem.is_goal(state) {
            let path = rebuild_path(&parents, state);
            debug!(
                "found {}-step path after exploring {} states",
                path.len(),
                states_explored
            );
            return SolverResult {
                outcome: SearchOutcome::Found(path),
                fast_path: false,
                states_explored,
                states_discovered: parents.len(),
            };
        }

        for (_, next) in successors(capacities, state) {
            if let Entry::Vacant(entry) = parents.entry(next) {
                entry.insert(Some(state));
                queue.push_back(next);
            }
        }

        if parents.len() > config.max_states {
            debug!(
                "state limit {} exceeded after exploring {} states",
                config.max_states, states_explored
            );
            return SolverResult {
                outcome: SearchOutcome::Aborted,
                fast_path: false,
                states_explored,
                states_discovered: parents.len(),
            };
        }
    }

    // Search exhausted without reaching the goal
    debug!("search exhausted after {} states", states_explored);
    SolverResult {
        outcome: SearchOutcome::Unreachable,
        fast_path: false,
        states_explored,
        states_discovered: parents.len(),
    }
}

/// Walk parent links back from `end` to the start state.
fn rebuild_path(parents: &HashMap<JugState, Option<JugState>>, end: JugState) -> Path {
    let mut states = vec![end];
    let mut current = end;
    while let Some(&Some(parent)) = parents.get(&current) {
        states.push(parent);
        current = parent;
    }
    states.reverse();
    Path::from_states(states)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify_path;
    use crate::puzzle::Operation;

    fn s(a: u32, b: u32) -> JugState {
        JugState::new(a, b)
    }

    fn solve_path(a: i64, b: i64, goal: i64) -> Path {
        solve(a, b, goal)
            .unwrap()
            .into_path()
            .expect("expected a solution")
    }

    #[test]
    fn test_classic_instance() {
        let path = solve_path(4, 3, 2);
        assert_eq!(path.len(), 4);
        assert_eq!(
            path.states(),
            &[s(0, 0), s(0, 3), s(3, 0), s(3, 3), s(4, 2)]
        );

        let problem = SearchProblem::new(4, 3, 2).unwrap();
        let ops: Vec<Operation> = classify_path(problem.capacities(), &path)
            .unwrap()
            .into_iter()
            .map(|step| step.operation)
            .collect();
        assert_eq!(
            ops,
            vec![
                Operation::FillB,
                Operation::PourBToA,
                Operation::FillB,
                Operation::PourBToA
            ]
        );
    }

    #[test]
    fn test_die_hard_instance() {
        let path = solve_path(3, 5, 4);
        assert_eq!(path.len(), 6);
        assert_eq!(path.last(), s(3, 4));
    }

    #[test]
    fn test_goal_zero_is_trivial() {
        let path = solve_path(5, 5, 0);
        assert!(path.is_empty());
        assert_eq!(path.states(), &[s(0, 0)]);
    }

    #[test]
    fn test_immediate_fill() {
        let path = solve_path(3, 5, 3);
        assert_eq!(path.states(), &[s(0, 0), s(3, 0)]);
    }

    #[test]
    fn test_unreachable_by_search() {
        let problem = SearchProblem::new(6, 4, 5).unwrap();
        let result = solve_problem(&problem, &SolverConfig::default());

        assert_eq!(result.outcome, SearchOutcome::Unreachable);
        assert!(!result.fast_path);
        // Only multiples of gcd(6, 4) are reachable
        assert!(result.states_explored > 1);
    }

    #[test]
    fn test_unreachable_fast_path() {
        let problem = SearchProblem::new(2, 3, 10).unwrap();
        let result = solve_problem(&problem, &SolverConfig::default());

        assert_eq!(result.outcome, SearchOutcome::Unreachable);
        assert!(result.fast_path);
        assert_eq!(result.states_explored, 0);
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(
            solve(0, 3, 1),
            Err(SolverError::InvalidCapacity { .. })
        ));
        assert!(matches!(
            solve(3, 3, -1),
            Err(SolverError::InvalidGoal { .. })
        ));
    }

    #[test]
    fn test_state_limit_aborts() {
        let problem = SearchProblem::new(7, 5, 6).unwrap();
        let config = SolverConfig { max_states: 5 };
        let result = solve_problem(&problem, &config);

        assert_eq!(result.outcome, SearchOutcome::Aborted);
        assert_eq!(result.outcome.reason(), Some("search_aborted"));
    }

    #[test]
    fn test_solve_from_midgame() {
        let problem = SearchProblem::new(4, 3, 2).unwrap();
        let result = solve_from(&problem, s(3, 3), &SolverConfig::default());
        let path = result.outcome.into_path().unwrap();

        assert_eq!(path.states(), &[s(3, 3), s(4, 2)]);
    }

    #[test]
    fn test_solve_from_out_of_bounds() {
        let problem = SearchProblem::new(4, 3, 2).unwrap();
        let result = solve_from(&problem, s(9, 0), &SolverConfig::default());
        assert_eq!(result.outcome, SearchOutcome::Unreachable);
        assert!(!result.fast_path);
        assert_eq!(result.states_explored, 0);
    }

    #[test]
    fn test_huge_capacities_with_debug_logging() {
        crate::log::init_logger(true);
        let max = i64::from(u32::MAX);
        let problem = SearchProblem::new(max, max, 1).unwrap();
        let result = solve_problem(&problem, &SolverConfig { max_states: 10 });

        // Equal vessels only ever hold 0 or the full capacity
        assert_eq!(result.outcome, SearchOutcome::Unreachable);
        assert!(!result.fast_path);
        assert_eq!(result.states_discovered, 4);
    }
}
