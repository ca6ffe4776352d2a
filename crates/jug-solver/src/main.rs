//! CLI entry point for the jug solver.
//!
//! Usage:
//!   jug-solver solve --capacity-a 4 --capacity-b 3 --goal 2 [--json]
//!   jug-solver solve <problem.json> | --stdin [--json]
//!   jug-solver check <submission.json> | --stdin
//!   jug-solver play --capacity-a 4 --capacity-b 3 --goal 2
//!
//! Options:
//!   --max-states <n>  Maximum distinct states to discover (default: 4000000)
//!   -v, --verbose     Log search statistics to stderr

use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use jug_solver::classifier::{classify_path, Step};
use jug_solver::executor::replay;
use jug_solver::game::{GameState, MoveOutcome};
use jug_solver::puzzle::{JugState, Operation, Path, SearchProblem};
use jug_solver::solver::{solve_problem, SearchOutcome, SolverConfig, SolverResult};
use jug_solver::SolverError;

#[derive(Parser)]
#[command(name = "jug-solver")]
#[command(about = "Shortest-path solver for the two water jug puzzle")]
#[command(version)]
struct Cli {
    /// Log search details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a shortest sequence of operations that reaches the goal
    Solve {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Path to problem JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE", conflicts_with_all = ["capacity_a", "capacity_b", "goal"])]
        file: Option<PathBuf>,

        /// Read problem from stdin instead of file
        #[arg(long, conflicts_with_all = ["file", "capacity_a", "capacity_b", "goal"])]
        stdin: bool,

        /// Print a JSON report instead of a step list
        #[arg(long)]
        json: bool,

        /// Maximum distinct states the search may discover
        #[arg(long, default_value = "4000000")]
        max_states: usize,
    },

    /// Check a submitted path: validity, goal and optimality
    Check {
        /// Path to submission JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read submission from stdin instead of file
        #[arg(long, conflicts_with = "file")]
        stdin: bool,

        /// Maximum distinct states the search may discover
        #[arg(long, default_value = "4000000")]
        max_states: usize,
    },

    /// Play the puzzle interactively
    Play {
        #[command(flatten)]
        problem: ProblemArgs,
    },
}

#[derive(Args, Debug)]
struct ProblemArgs {
    /// Capacity of vessel A
    #[arg(short = 'a', long, allow_negative_numbers = true)]
    capacity_a: Option<i64>,

    /// Capacity of vessel B
    #[arg(short = 'b', long, allow_negative_numbers = true)]
    capacity_b: Option<i64>,

    /// Target volume in either vessel
    #[arg(short, long, allow_negative_numbers = true)]
    goal: Option<i64>,
}

impl ProblemArgs {
    fn is_empty(&self) -> bool {
        self.capacity_a.is_none() && self.capacity_b.is_none() && self.goal.is_none()
    }

    fn to_problem(&self) -> Result<SearchProblem, CliError> {
        match (self.capacity_a, self.capacity_b, self.goal) {
            (Some(a), Some(b), Some(goal)) => Ok(SearchProblem::new(a, b, goal)?),
            _ => Err(CliError::Usage(
                "--capacity-a, --capacity-b and --goal must be given together".to_string(),
            )),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("{context}: {source}")]
    Io { context: String, source: io::Error },

    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Solver(#[from] SolverError),
}

/// Output format for a solve request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    problem: SearchProblem,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    operations: Option<Vec<Step>>,
    fast_path: bool,
    states_explored: usize,
    states_discovered: usize,
    time_elapsed_ms: u64,
}

/// Input format for a check request
#[derive(Debug, Deserialize)]
struct Submission {
    problem: SearchProblem,
    path: Vec<JugState>,
}

/// Output format for a check request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckOutput {
    valid: bool,
    reaches_goal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    optimal_steps: Option<usize>,
    optimal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    operations: Option<Vec<Step>>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    jug_solver::log::init_logger(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            match &e {
                CliError::Solver(inner) => eprintln!("Error [{}]: {}", inner.code(), inner),
                other => eprintln!("Error: {}", other),
            }
            ExitCode::from(2)
        }
    }
}

fn run(command: Commands) -> Result<ExitCode, CliError> {
    match command {
        Commands::Solve {
            problem,
            file,
            stdin,
            json,
            max_states,
        } => {
            let problem = if problem.is_empty() {
                let content = read_input(file, stdin)?;
                serde_json::from_str(&content)?
            } else {
                problem.to_problem()?
            };
            run_solve(&problem, &SolverConfig { max_states }, json)
        }
        Commands::Check {
            file,
            stdin,
            max_states,
        } => {
            let content = read_input(file, stdin)?;
            let submission: Submission = serde_json::from_str(&content)?;
            run_check(&submission, &SolverConfig { max_states })
        }
        Commands::Play { problem } => {
            let problem = problem.to_problem()?;
            run_play(&problem, &SolverConfig::default())
        }
    }
}

fn read_input(file: Option<PathBuf>, stdin: bool) -> Result<String, CliError> {
    if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|source| CliError::Io {
                context: "failed to read stdin".to_string(),
                source,
            })?;
        Ok(buffer)
    } else if let Some(path) = file {
        fs::read_to_string(&path).map_err(|source| CliError::Io {
            context: format!("failed to read {}", path.display()),
            source,
        })
    } else {
        Err(CliError::Usage(
            "must provide a problem (flags, a file path or --stdin)".to_string(),
        ))
    }
}

fn run_solve(
    problem: &SearchProblem,
    config: &SolverConfig,
    json: bool,
) -> Result<ExitCode, CliError> {
    let started = Instant::now();
    let result = solve_problem(problem, config);
    let time_elapsed_ms = started.elapsed().as_millis() as u64;

    info!(
        "solved [{}, {}] -> {} in {} ms ({} states explored)",
        problem.capacities().a,
        problem.capacities().b,
        problem.goal(),
        time_elapsed_ms,
        result.states_explored
    );

    let steps = match &result.outcome {
        SearchOutcome::Found(path) => Some(classify_path(problem.capacities(), path)?),
        _ => None,
    };

    if json {
        let output = format_result(problem, &result, steps, time_elapsed_ms);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_solution(&result, steps.as_deref());
    }

    Ok(exit_code(result.outcome.is_found()))
}

fn format_result(
    problem: &SearchProblem,
    result: &SolverResult,
    steps: Option<Vec<Step>>,
    time_elapsed_ms: u64,
) -> SolveOutput {
    let path = result.outcome.path();
    SolveOutput {
        solved: result.outcome.is_found(),
        reason: result.outcome.reason().map(str::to_string),
        problem: *problem,
        steps: path.map(Path::len),
        path: path.cloned(),
        operations: steps,
        fast_path: result.fast_path,
        states_explored: result.states_explored,
        states_discovered: result.states_discovered,
        time_elapsed_ms,
    }
}

fn print_solution(result: &SolverResult, steps: Option<&[Step]>) {
    match (&result.outcome, steps) {
        (SearchOutcome::Found(path), Some(steps)) => {
            println!("Steps: {}", path.len());
            for step in steps {
                println!("{}", step);
            }
        }
        (SearchOutcome::Aborted, _) => {
            warn!("state limit reached");
            println!("Search aborted: capacities too large");
            println!("Explored {} states.", result.states_explored);
        }
        _ => {
            println!("No solution");
            println!("Impossible configuration.");
        }
    }
}

fn run_check(submission: &Submission, config: &SolverConfig) -> Result<ExitCode, CliError> {
    let problem = &submission.problem;
    let optimal_steps = solve_problem(problem, config)
        .outcome
        .path()
        .map(Path::len);

    let output = match replay(problem, &submission.path) {
        Ok(path) => {
            let reaches_goal = problem.is_goal(path.last());
            let steps = path.len();
            CheckOutput {
                valid: true,
                reaches_goal,
                steps: Some(steps),
                optimal_steps,
                optimal: reaches_goal && optimal_steps == Some(steps),
                error: None,
                operations: Some(classify_path(problem.capacities(), &path)?),
            }
        }
        Err(e) => CheckOutput {
            valid: false,
            reaches_goal: false,
            steps: None,
            optimal_steps,
            optimal: false,
            error: Some(e.to_string()),
            operations: None,
        },
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(exit_code(output.valid && output.reaches_goal))
}

fn run_play(problem: &SearchProblem, config: &SolverConfig) -> Result<ExitCode, CliError> {
    let mut game = GameState::new(problem);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Reach {} in either vessel.", game.goal());
    if !game.is_active() {
        println!("Goal already reached: the vessels start empty.");
    }
    print_help();

    loop {
        print_status(&game);
        print!("> ");
        io::stdout().flush().map_err(|source| CliError::Io {
            context: "failed to write stdout".to_string(),
            source,
        })?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|source| CliError::Io {
            context: "failed to read stdin".to_string(),
            source,
        })?;
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            [] => continue,
            ["q"] | ["quit"] => break,
            ["help"] | ["?"] => print_help(),
            ["clear"] => {
                game.clear();
                println!("Vessels emptied.");
            }
            ["hint"] => print_hint(&game, config),
            ["set", a, b, goal] => match (a.parse(), b.parse(), goal.parse()) {
                (Ok(a), Ok(b), Ok(goal)) => {
                    game.apply_settings(a, b, goal);
                    println!("Settings applied.");
                }
                _ => println!("Usage: set <capacity A> <capacity B> <goal>"),
            },
            [command] => match command.parse::<Operation>() {
                Ok(op) => match game.perform(op) {
                    MoveOutcome::Applied { state } => println!("{} → {}", op, state),
                    MoveOutcome::GoalReached { state, moves } => {
                        println!("{} → {}", op, state);
                        println!("Goal reached!");
                        println!("Moves: {}  ·  Time: {}", moves, game.format_elapsed());
                        println!("Type 'clear' to play again or 'q' to quit.");
                    }
                    MoveOutcome::NoEffect => println!("{} has no effect.", op),
                    MoveOutcome::Inactive => {
                        println!("The game is over. Type 'clear' to play again.")
                    }
                },
                Err(e) => println!("{}. Type 'help' for commands.", e),
            },
            _ => println!("Invalid input. Type 'help' for commands."),
        }
    }

    println!("Thanks for playing!");
    Ok(ExitCode::SUCCESS)
}

fn print_help() {
    let ops: Vec<String> = Operation::ALL
        .iter()
        .map(|op| format!("{} ({})", op.command(), op.label()))
        .collect();
    println!("Operations: {}", ops.join(", "));
    println!("Other commands: hint, set <A> <B> <goal>, clear, help, q");
}

fn print_status(game: &GameState) {
    let caps = game.capacities();
    let volumes = game.volumes();
    println!(
        "A: {} / {}   B: {} / {}   Goal: {}   Moves: {}",
        volumes.a,
        caps.a,
        volumes.b,
        caps.b,
        game.goal(),
        game.moves()
    );
}

fn print_hint(game: &GameState, config: &SolverConfig) {
    let Some(result) = game.hint(config) else {
        println!("No hint available.");
        return;
    };
    match result.outcome {
        SearchOutcome::Found(path) if path.is_empty() => println!("Goal already reached."),
        SearchOutcome::Found(path) => match classify_path(game.capacities(), &path) {
            Ok(steps) => {
                println!("{} more step(s):", path.len());
                for step in steps {
                    println!("  {}", step);
                }
            }
            Err(e) => warn!("hint path could not be classified: {}", e),
        },
        SearchOutcome::Unreachable => println!("The goal cannot be reached from here."),
        SearchOutcome::Aborted => println!("Search aborted: capacities too large."),
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
