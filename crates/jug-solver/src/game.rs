//! Manual play state for the terminal game.
//!
//! All game data lives in one [`GameState`] value owned by the caller; there
//! is no process-wide state.

use std::time::{Duration, Instant};

use crate::executor::apply;
use crate::puzzle::{Capacities, JugState, Operation, SearchProblem};
use crate::solver::{solve_from, SolverConfig, SolverResult};

/// What happened when the player tried an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The volumes changed
    Applied { state: JugState },
    /// The volumes changed and one vessel now holds the goal; the game is over
    GoalReached { state: JugState, moves: u32 },
    /// Nothing would change (e.g. filling a full vessel); no move counted
    NoEffect,
    /// The game already ended
    Inactive,
}

#[derive(Debug, Clone)]
pub struct GameState {
    capacities: Capacities,
    goal: u32,
    volumes: JugState,
    moves: u32,
    active: bool,
    started_at: Option<Instant>,
    elapsed_before: Duration,
}

impl GameState {
    /// Start a game with both vessels empty. A goal of zero is already
    /// satisfied, so such a game is over before the first move.
    pub fn new(problem: &SearchProblem) -> Self {
        Self {
            capacities: problem.capacities(),
            goal: problem.goal(),
            volumes: JugState::EMPTY,
            moves: 0,
            active: !JugState::EMPTY.holds(problem.goal()),
            started_at: None,
            elapsed_before: Duration::ZERO,
        }
    }

    pub fn capacities(&self) -> Capacities {
        self.capacities
    }

    pub fn goal(&self) -> u32 {
        self.goal
    }

    pub fn volumes(&self) -> JugState {
        self.volumes
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Perform one operation.
    ///
    /// The timer starts with the first move that changes anything. Reaching
    /// the goal stops the timer and ends the game.
    pub fn perform(&mut self, op: Operation) -> MoveOutcome {
        if !self.active {
            return MoveOutcome::Inactive;
        }

        let next = apply(self.capacities, self.volumes, op);
        if next == self.volumes {
            return MoveOutcome::NoEffect;
        }

        self.start_timer();
        self.volumes = next;
        self.moves += 1;

        if next.holds(self.goal) {
            self.active = false;
            self.stop_timer();
            MoveOutcome::GoalReached {
                state: next,
                moves: self.moves,
            }
        } else {
            MoveOutcome::Applied { state: next }
        }
    }

    /// Change capacities and goal mid-game.
    ///
    /// Every value is clamped to at least 1 and the current volumes are
    /// clamped to the new capacities. If the clamped volumes already hold
    /// the goal, the game ends.
    pub fn apply_settings(&mut self, capacity_a: i64, capacity_b: i64, goal: i64) {
        self.capacities = Capacities::new(clamp_setting(capacity_a), clamp_setting(capacity_b));
        self.goal = clamp_setting(goal);
        self.volumes = JugState::new(
            self.volumes.a.min(self.capacities.a),
            self.volumes.b.min(self.capacities.b),
        );
        if self.active && self.volumes.holds(self.goal) {
            self.active = false;
            self.stop_timer();
        }
    }

    /// Empty both vessels, reset the move counter and timer, and reopen the
    /// game unless empty vessels already hold the goal.
    pub fn clear(&mut self) {
        self.volumes = JugState::EMPTY;
        self.moves = 0;
        self.active = !JugState::EMPTY.holds(self.goal);
        self.started_at = None;
        self.elapsed_before = Duration::ZERO;
    }

    /// Time spent playing, excluding time before the first move
    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(start) => self.elapsed_before + start.elapsed(),
            None => self.elapsed_before,
        }
    }

    /// Elapsed time as `mm:ss`
    pub fn format_elapsed(&self) -> String {
        format_duration(self.elapsed())
    }

    /// Shortest way to finish from the current volumes.
    pub fn hint(&self, config: &SolverConfig) -> Option<SolverResult> {
        let problem = SearchProblem::new(
            i64::from(self.capacities.a),
            i64::from(self.capacities.b),
            i64::from(self.goal),
        )
        .ok()?;
        Some(solve_from(&problem, self.volumes, config))
    }

    fn start_timer(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn stop_timer(&mut self) {
        if let Some(start) = self.started_at.take() {
            self.elapsed_before += start.elapsed();
        }
    }
}

fn clamp_setting(value: i64) -> u32 {
    u32::try_from(value.max(1)).unwrap_or(u32::MAX)
}

/// Format a duration as zero-padded `mm:ss`
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
