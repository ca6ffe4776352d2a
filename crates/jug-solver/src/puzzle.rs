//! Puzzle representation types: vessel states, problems, operations and paths.
//!
//! Problems deserialize from the same camelCase JSON the CLI accepts:
//! `{ "capacityA": 4, "capacityB": 3, "goal": 2 }`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SolverError;

/// One of the two vessels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vessel {
    A,
    B,
}

impl fmt::Display for Vessel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vessel::A => f.write_str("A"),
            Vessel::B => f.write_str("B"),
        }
    }
}

/// Current fill levels of both vessels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JugState {
    pub a: u32,
    pub b: u32,
}

impl JugState {
    /// Both vessels empty
    pub const EMPTY: JugState = JugState { a: 0, b: 0 };

    pub fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }

    /// Check if either vessel holds exactly `goal`
    pub fn holds(&self, goal: u32) -> bool {
        self.a == goal || self.b == goal
    }
}

impl fmt::Display for JugState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.a, self.b)
    }
}

/// Capacities of vessel A and vessel B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capacities {
    pub a: u32,
    pub b: u32,
}

impl Capacities {
    pub fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }

    /// Check that a state fits inside both vessels
    pub fn contains(&self, state: JugState) -> bool {
        state.a <= self.a && state.b <= self.b
    }

    /// Upper bound on the number of distinct states
    pub fn state_space_size(&self) -> u128 {
        (u128::from(self.a) + 1) * (u128::from(self.b) + 1)
    }
}

/// Raw, unvalidated problem as it appears on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProblem {
    capacity_a: i64,
    capacity_b: i64,
    goal: i64,
}

/// A validated search problem: two positive capacities and a goal volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawProblem", into = "RawProblem")]
pub struct SearchProblem {
    capacities: Capacities,
    goal: u32,
}

impl SearchProblem {
    /// Validate and build a problem.
    ///
    /// Capacities must be positive and the goal non-negative; anything else
    /// fails before a search is ever started.
    pub fn new(capacity_a: i64, capacity_b: i64, goal: i64) -> Result<Self, SolverError> {
        let a = checked_capacity(Vessel::A, capacity_a)?;
        let b = checked_capacity(Vessel::B, capacity_b)?;
        if goal < 0 {
            return Err(SolverError::InvalidGoal { value: goal });
        }
        let goal = u32::try_from(goal).map_err(|_| SolverError::OutOfRange {
            name: "goal",
            value: goal,
        })?;

        Ok(Self {
            capacities: Capacities::new(a, b),
            goal,
        })
    }

    pub fn capacities(&self) -> Capacities {
        self.capacities
    }

    pub fn goal(&self) -> u32 {
        self.goal
    }

    /// Check if the goal is larger than both vessels (trivially unreachable)
    pub fn goal_exceeds_capacities(&self) -> bool {
        self.goal > self.capacities.a && self.goal > self.capacities.b
    }

    pub fn is_goal(&self, state: JugState) -> bool {
        state.holds(self.goal)
    }
}

fn checked_capacity(vessel: Vessel, value: i64) -> Result<u32, SolverError> {
    if value <= 0 {
        return Err(SolverError::InvalidCapacity { vessel, value });
    }
    u32::try_from(value).map_err(|_| SolverError::OutOfRange {
        name: match vessel {
            Vessel::A => "capacityA",
            Vessel::B => "capacityB",
        },
        value,
    })
}

impl TryFrom<RawProblem> for SearchProblem {
    type Error = SolverError;

    fn try_from(raw: RawProblem) -> Result<Self, Self::Error> {
        SearchProblem::new(raw.capacity_a, raw.capacity_b, raw.goal)
    }
}

impl From<SearchProblem> for RawProblem {
    fn from(problem: SearchProblem) -> Self {
        Self {
            capacity_a: i64::from(problem.capacities.a),
            capacity_b: i64::from(problem.capacities.b),
            goal: i64::from(problem.goal),
        }
    }
}

/// The six operations a player can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    FillA,
    FillB,
    EmptyA,
    EmptyB,
    PourAToB,
    PourBToA,
}

impl Operation {
    /// All operations, in the order the solver expands them
    pub const ALL: [Operation; 6] = [
        Operation::FillA,
        Operation::FillB,
        Operation::EmptyA,
        Operation::EmptyB,
        Operation::PourAToB,
        Operation::PourBToA,
    ];

    /// Human-readable label used in step logs
    pub fn label(self) -> &'static str {
        match self {
            Operation::FillA => "Fill A",
            Operation::FillB => "Fill B",
            Operation::EmptyA => "Empty A",
            Operation::EmptyB => "Empty B",
            Operation::PourAToB => "Pour A → B",
            Operation::PourBToA => "Pour B → A",
        }
    }

    /// Two-letter command accepted by the terminal game
    pub fn command(self) -> &'static str {
        match self {
            Operation::FillA => "fa",
            Operation::FillB => "fb",
            Operation::EmptyA => "ea",
            Operation::EmptyB => "eb",
            Operation::PourAToB => "ab",
            Operation::PourBToA => "ba",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.command().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown operation '{}'", s.trim()))
    }
}

/// A sequence of states, each reachable from the previous one by a single
/// operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Path {
    states: Vec<JugState>,
}

impl Path {
    /// Build a path from states already known to be connected.
    pub(crate) fn from_states(states: Vec<JugState>) -> Self {
        debug_assert!(!states.is_empty());
        Self { states }
    }

    /// Number of operations (edges) in the path
    pub fn len(&self) -> usize {
        self.states.len().saturating_sub(1)
    }

    /// True when the start state already satisfies the goal
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn states(&self) -> &[JugState] {
        &self.states
    }

    pub fn first(&self) -> JugState {
        self.states[0]
    }

    pub fn last(&self) -> JugState {
        self.states[self.states.len() - 1]
    }

    /// Consecutive (prev, next) pairs
    pub fn transitions(&self) -> impl Iterator<Item = (JugState, JugState)> + '_ {
        self.states.windows(2).map(|w| (w[0], w[1]))
    }
}
