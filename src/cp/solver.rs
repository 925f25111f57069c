//! CP solver interface and backtracking implementation.

use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use super::model::CpModel;
use super::search::SearchState;
use super::variables::BoolVar;

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverStatus {
    /// At least one solution was found and the search was stopped before
    /// the space was exhausted.
    Feasible,
    /// The whole search space was explored and held at least one solution.
    Complete,
    /// The whole search space was explored and held no solution.
    Infeasible,
}

impl SolverStatus {
    /// Whether at least one solution was found.
    pub fn is_solution_found(self) -> bool {
        matches!(self, SolverStatus::Feasible | SolverStatus::Complete)
    }

    /// Human-readable name.
    pub fn as_str(self) -> &'static str {
        match self {
            SolverStatus::Feasible => "feasible",
            SolverStatus::Complete => "complete",
            SolverStatus::Infeasible => "infeasible",
        }
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine-level failure, unrelated to whether the model has solutions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SolverError {
    /// The model references unknown variables or is otherwise malformed.
    #[error("model invalid: {0}")]
    ModelInvalid(String),

    /// Internal solver error.
    #[error("solver internal error: {0}")]
    Internal(String),
}

/// Summary of one [`CpSolver::solve`] call.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Final status.
    pub status: SolverStatus,
    /// Number of solutions reported to the callback.
    pub solutions: usize,
    /// Branching decisions taken.
    pub decisions: u64,
    /// Dead ends hit by propagation, over all runs.
    pub conflicts: u64,
    /// Runs abandoned before their first solution.
    pub restarts: u64,
    /// Solve time in milliseconds.
    pub solve_time_ms: i64,
}

/// Solver configuration.
///
/// # Examples
///
/// ```
/// use u_roster::cp::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_linearization_level(0)
///     .with_enumerate_all_solutions(true)
///     .with_seed(7)
///     .with_restart_base(128);
/// assert!(config.enumerate_all_solutions);
/// assert_eq!(config.seed, Some(7));
/// assert_eq!(config.restart_base, 128);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Linearization effort of engines that relax constraints into an LP.
    ///
    /// Tuning only; the backtracking solver records it and moves on.
    pub linearization_level: u8,
    /// Keep searching after the first solution.
    pub enumerate_all_solutions: bool,
    /// Seed for randomized tie-breaking between branch candidates.
    ///
    /// `None` keeps the deterministic variable order on the first run.
    pub seed: Option<u64>,
    /// Conflict budget unit for runs that have not found a solution yet.
    ///
    /// Run `i` may hit `restart_base * luby(i)` conflicts before the search
    /// starts over with randomized tie-breaking. `0` never restarts.
    pub restart_base: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            linearization_level: 0,
            enumerate_all_solutions: true,
            seed: None,
            restart_base: DEFAULT_RESTART_BASE,
        }
    }
}

/// Default [`SolverConfig::restart_base`].
pub const DEFAULT_RESTART_BASE: u64 = 64;

impl SolverConfig {
    /// Sets the linearization level.
    pub fn with_linearization_level(mut self, level: u8) -> Self {
        self.linearization_level = level;
        self
    }

    /// Enables or disables enumeration of all solutions.
    pub fn with_enumerate_all_solutions(mut self, enabled: bool) -> Self {
        self.enumerate_all_solutions = enabled;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the restart conflict budget unit. `0` disables restarts.
    pub fn with_restart_base(mut self, base: u64) -> Self {
        self.restart_base = base;
        self
    }
}

/// Read-only view of the current solution handed to a [`SolutionCallback`].
pub struct SolutionContext<'a> {
    values: &'a [Option<bool>],
    index: usize,
    stop: bool,
}

impl<'a> SolutionContext<'a> {
    pub(crate) fn new(values: &'a [Option<bool>], index: usize) -> Self {
        Self {
            values,
            index,
            stop: false,
        }
    }

    /// Value of `var` in the current solution.
    ///
    /// Variables from another model read as `false`.
    pub fn value(&self, var: BoolVar) -> bool {
        matches!(self.values.get(var.index()), Some(Some(true)))
    }

    /// 1-based ordinal of this solution within the current solve.
    pub fn solution_index(&self) -> usize {
        self.index
    }

    /// Asks the solver to stop once the callback returns.
    pub fn stop_search(&mut self) {
        self.stop = true;
    }

    /// Whether [`stop_search`](Self::stop_search) was called.
    pub fn is_stop_requested(&self) -> bool {
        self.stop
    }
}

/// Receives every solution found during a solve.
///
/// Called synchronously, once per solution, before the solver resumes.
pub trait SolutionCallback {
    /// Handles one solution.
    fn on_solution(&mut self, ctx: &mut SolutionContext<'_>);
}

impl<F> SolutionCallback for F
where
    F: FnMut(&mut SolutionContext<'_>),
{
    fn on_solution(&mut self, ctx: &mut SolutionContext<'_>) {
        self(ctx)
    }
}

/// Trait for CP solver implementations.
///
/// Implementors provide the actual constraint solving logic. This can
/// wrap an external engine or use the built-in [`BacktrackingSolver`].
pub trait CpSolver {
    /// Searches `model`, reporting each solution to `callback`.
    fn solve(
        &self,
        model: &CpModel,
        config: &SolverConfig,
        callback: &mut dyn SolutionCallback,
    ) -> Result<SolveOutcome, SolverError>;
}

/// Depth-first search with cardinality propagation.
///
/// Each decision fixes one variable and is later retried with the opposite
/// value, so every satisfying assignment is visited exactly once.
///
/// Until the first solution turns up, a run that exceeds its conflict
/// budget (see [`SolverConfig::restart_base`]) is abandoned and the search
/// starts over from the root with randomized tie-breaking. The run that
/// finds a solution is never cut short, so enumeration and infeasibility
/// proofs stay complete.
///
/// # Limitations
///
/// - Unit-weight linear constraints only
/// - No learning: hard infeasible instances are exponential
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktrackingSolver;

impl BacktrackingSolver {
    pub fn new() -> Self {
        Self
    }
}

struct Frame {
    trail_len: usize,
    var: usize,
    value: bool,
    flipped: bool,
}

impl CpSolver for BacktrackingSolver {
    fn solve(
        &self,
        model: &CpModel,
        config: &SolverConfig,
        callback: &mut dyn SolutionCallback,
    ) -> Result<SolveOutcome, SolverError> {
        model.validate().map_err(SolverError::ModelInvalid)?;

        let start_time = std::time::Instant::now();
        debug!(
            event = "search_start",
            model = %model.name,
            variables = model.var_count(),
            constraints = model.constraint_count(),
            hints = model.hints().len(),
            linearization_level = config.linearization_level,
            enumerate_all = config.enumerate_all_solutions,
            restart_base = config.restart_base,
        );

        let mut first_rng = config.seed.map(StdRng::seed_from_u64);
        let mut restart_rng = StdRng::seed_from_u64(config.seed.unwrap_or(0));
        let mut counters = Counters::default();
        let mut run = 1u64;
        let stopped = loop {
            let limit = (config.restart_base > 0)
                .then(|| config.restart_base.saturating_mul(luby(run)));
            let rng = if run == 1 {
                first_rng.as_mut()
            } else {
                Some(&mut restart_rng)
            };
            match search_run(model, config, callback, rng, limit, &mut counters) {
                RunEnd::Stopped => break true,
                RunEnd::Exhausted => break false,
                RunEnd::Restart => {
                    debug!(
                        event = "restart",
                        run,
                        limit = ?limit,
                        decisions = counters.decisions,
                        conflicts = counters.conflicts,
                    );
                    counters.restarts += 1;
                    run += 1;
                }
            }
        };

        let Counters {
            solutions,
            decisions,
            conflicts,
            restarts,
        } = counters;
        let status = match (stopped, solutions) {
            (true, _) => SolverStatus::Feasible,
            (false, 0) => SolverStatus::Infeasible,
            (false, _) => SolverStatus::Complete,
        };
        let outcome = SolveOutcome {
            status,
            solutions,
            decisions,
            conflicts,
            restarts,
            solve_time_ms: start_time.elapsed().as_millis() as i64,
        };
        debug!(
            event = "search_end",
            status = %outcome.status,
            solutions,
            decisions,
            conflicts,
            restarts,
            solve_time_ms = outcome.solve_time_ms,
        );
        Ok(outcome)
    }
}

#[derive(Debug, Default)]
struct Counters {
    solutions: usize,
    decisions: u64,
    conflicts: u64,
    restarts: u64,
}

enum RunEnd {
    /// The callback asked to stop, or only the first solution was wanted.
    Stopped,
    /// The search space below the root is fully explored.
    Exhausted,
    /// The conflict budget ran out before any solution.
    Restart,
}

/// One depth-first search from the root. `limit` caps the conflicts of this
/// run while no solution has been found.
fn search_run(
    model: &CpModel,
    config: &SolverConfig,
    callback: &mut dyn SolutionCallback,
    mut rng: Option<&mut StdRng>,
    limit: Option<u64>,
    counters: &mut Counters,
) -> RunEnd {
    let mut state = SearchState::new(model);
    let mut stack: Vec<Frame> = Vec::new();
    let mut conflicts = 0u64;

    let mut exhausted = !state.propagate();
    if exhausted {
        conflicts += 1;
    }

    let mut end = RunEnd::Exhausted;
    while !exhausted {
        if counters.solutions == 0 && limit.is_some_and(|l| conflicts > l) {
            end = RunEnd::Restart;
            break;
        }
        match state.select_branch(rng.as_deref_mut()) {
            None => {
                counters.solutions += 1;
                let index = counters.solutions;
                let mut ctx = SolutionContext::new(state.values(), index);
                callback.on_solution(&mut ctx);
                trace!(
                    event = "solution",
                    index,
                    decisions = counters.decisions,
                    conflicts = counters.conflicts + conflicts,
                );
                if ctx.is_stop_requested() || !config.enumerate_all_solutions {
                    end = RunEnd::Stopped;
                    break;
                }
                exhausted = !backtrack(&mut stack, &mut state, &mut conflicts);
            }
            Some((var, value)) => {
                counters.decisions += 1;
                stack.push(Frame {
                    trail_len: state.trail_len(),
                    var,
                    value,
                    flipped: false,
                });
                state.assign(var, value);
                if !state.propagate() {
                    conflicts += 1;
                    exhausted = !backtrack(&mut stack, &mut state, &mut conflicts);
                }
            }
        }
    }
    counters.conflicts += conflicts;
    end
}

/// Unwinds to the deepest decision not yet tried both ways and flips it.
/// Returns `false` when none is left.
fn backtrack(stack: &mut Vec<Frame>, state: &mut SearchState<'_>, conflicts: &mut u64) -> bool {
    while let Some(frame) = stack.pop() {
        state.undo_to(frame.trail_len);
        if frame.flipped {
            continue;
        }
        let value = !frame.value;
        stack.push(Frame {
            value,
            flipped: true,
            ..frame
        });
        state.assign(frame.var, value);
        if state.propagate() {
            return true;
        }
        *conflicts += 1;
    }
    false
}

/// The Luby sequence `1, 1, 2, 1, 1, 2, 4, 1, ...`, 1-based. `0` reads as `1`.
pub(crate) fn luby(i: u64) -> u64 {
    let mut i = i.max(1);
    loop {
        let mut k = 1u32;
        while (1u64 << k) - 1 < i {
            k += 1;
        }
        if i == (1u64 << k) - 1 {
            return 1u64 << (k - 1);
        }
        i -= (1u64 << (k - 1)) - 1;
    }
}
