//! Solver library for the two water jug puzzle.
//!
//! Given two vessels of integer capacity and a target volume, the solver
//! finds a shortest sequence of fill, empty and pour operations that leaves
//! the target volume in either vessel, or reports that no such sequence
//! exists. The classifier turns consecutive states of a path back into
//! labelled operations for display.

pub mod classifier;
pub mod error;
pub mod executor;
pub mod game;
pub mod log;
pub mod puzzle;
pub mod solver;

// Re-export main types
pub use classifier::{classify, classify_path, Step};
pub use error::SolverError;
pub use executor::{apply, replay, verify_path};
pub use game::{GameState, MoveOutcome};
pub use puzzle::{Capacities, JugState, Operation, Path, SearchProblem, Vessel};
pub use solver::{solve, solve_from, solve_problem, SearchOutcome, SolverConfig, SolverResult};
