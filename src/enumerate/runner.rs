//! Bounded solution enumeration.
//!
//! # Protocol
//!
//! 1. Run the solver once, in all-solutions mode
//! 2. On every solution callback:
//!    a. Increment the counter (fresh for each call)
//!    b. Snapshot and hand the schedule to the consumer (render, collect)
//!    c. Stop the search once the counter reaches the cap
//! 3. Classify the end of the search: cap reached, space exhausted,
//!    or no solution at all

use std::fmt;
use std::io::{self, Write};

use tracing::{debug, info, warn};

use super::config::EnumeratorConfig;
use super::render::{render_cap_reached, render_exhausted, render_infeasible, render_schedule};
use crate::cp::{CpSolver, SolutionContext, SolveOutcome, SolverStatus};
use crate::error::Result;
use crate::roster::{RosterModel, Schedule};

/// How an enumeration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumerationStatus {
    /// The cap was reached and the search stopped.
    CapReached,
    /// Every solution was produced; there were fewer than the cap.
    Exhausted,
    /// The solver stopped on its own before the cap, e.g. single-solution
    /// mode.
    Stopped,
    /// The model has no solution.
    Infeasible,
}

impl EnumerationStatus {
    /// Human-readable name.
    pub fn as_str(self) -> &'static str {
        match self {
            EnumerationStatus::CapReached => "cap_reached",
            EnumerationStatus::Exhausted => "exhausted",
            EnumerationStatus::Stopped => "stopped",
            EnumerationStatus::Infeasible => "infeasible",
        }
    }
}

impl fmt::Display for EnumerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one enumeration.
#[derive(Debug, Clone)]
pub struct EnumerationOutcome {
    /// Solutions produced. Never above the cap.
    pub solutions: usize,
    /// How the enumeration ended.
    pub status: EnumerationStatus,
    /// Solutions that failed verification (0 unless verification is on).
    pub invalid_solutions: usize,
    /// Raw solver summary.
    pub solver: SolveOutcome,
}

/// Drives a [`CpSolver`] over a [`RosterModel`] and bounds its output.
///
/// # Examples
///
/// ```
/// use u_roster::cp::BacktrackingSolver;
/// use u_roster::enumerate::{EnumerationStatus, EnumeratorConfig, SolutionEnumerator};
/// use u_roster::roster::build;
///
/// let roster = build(3, 2, 3).unwrap();
/// let enumerator = SolutionEnumerator::new(EnumeratorConfig::default().with_solution_cap(2)).unwrap();
///
/// let mut report = Vec::new();
/// let outcome = enumerator.enumerate(&roster, &BacktrackingSolver::new(), &mut report).unwrap();
///
/// assert_eq!(outcome.solutions, 2);
/// assert_eq!(outcome.status, EnumerationStatus::CapReached);
/// ```
#[derive(Debug, Clone)]
pub struct SolutionEnumerator {
    config: EnumeratorConfig,
}

impl SolutionEnumerator {
    /// Creates an enumerator, rejecting a zero cap.
    pub fn new(config: EnumeratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &EnumeratorConfig {
        &self.config
    }

    /// Renders up to `solution_cap` solutions to `out`, followed by a
    /// notice saying why the enumeration ended.
    pub fn enumerate<S, W>(
        &self,
        roster: &RosterModel,
        solver: &S,
        out: &mut W,
    ) -> Result<EnumerationOutcome>
    where
        S: CpSolver + ?Sized,
        W: Write + ?Sized,
    {
        let cap = self.config.solution_cap;
        let outcome = self.enumerate_with(roster, solver, |ordinal, schedule| {
            render_schedule(out, ordinal, schedule)?;
            if ordinal >= cap {
                render_cap_reached(out)?;
            }
            Ok(())
        })?;

        match outcome.status {
            EnumerationStatus::Infeasible => render_infeasible(out)?,
            EnumerationStatus::Exhausted => render_exhausted(out, outcome.solutions)?,
            EnumerationStatus::CapReached | EnumerationStatus::Stopped => {}
        }
        out.flush()?;
        Ok(outcome)
    }

    /// Collects up to `solution_cap` schedules instead of rendering them.
    pub fn enumerate_schedules<S>(
        &self,
        roster: &RosterModel,
        solver: &S,
    ) -> Result<(Vec<Schedule>, EnumerationOutcome)>
    where
        S: CpSolver + ?Sized,
    {
        let mut schedules = Vec::new();
        let outcome = self.enumerate_with(roster, solver, |_, schedule| {
            schedules.push(schedule.clone());
            Ok(())
        })?;
        Ok((schedules, outcome))
    }

    /// Runs the solver once, handing each schedule to `on_schedule` with
    /// its 1-based ordinal.
    ///
    /// A consumer error stops the search and is returned once the solver
    /// has unwound. Solver errors pass through unchanged.
    pub fn enumerate_with<S, F>(
        &self,
        roster: &RosterModel,
        solver: &S,
        mut on_schedule: F,
    ) -> Result<EnumerationOutcome>
    where
        S: CpSolver + ?Sized,
        F: FnMut(usize, &Schedule) -> io::Result<()>,
    {
        let cap = self.config.solution_cap;
        let verify = self.config.verify;
        let variables = &roster.variables;

        info!(
            event = "enumerate_start",
            model = %roster.model.name,
            solution_cap = cap,
            verify,
        );

        let mut count = 0usize;
        let mut invalid = 0usize;
        let mut failure: Option<io::Error> = None;

        let mut callback = |ctx: &mut SolutionContext<'_>| {
            count += 1;
            let schedule = Schedule::capture(variables, ctx);
            debug!(event = "solution", index = count);

            if verify {
                let violations = schedule.violations();
                let unsatisfied = roster.unsatisfied(|v| ctx.value(v));
                if !violations.is_empty() || !unsatisfied.is_empty() {
                    invalid += 1;
                }
                for v in &violations {
                    warn!(event = "invalid_solution", index = count, violation = %v);
                }
                for (constraint, family) in &unsatisfied {
                    warn!(
                        event = "unsatisfied_constraint",
                        index = count,
                        constraint,
                        family = %family,
                    );
                }
            }

            if let Err(e) = on_schedule(count, &schedule) {
                failure = Some(e);
                ctx.stop_search();
                return;
            }
            if count >= cap {
                ctx.stop_search();
            }
        };

        let solver_outcome = solver.solve(&roster.model, &self.config.solver, &mut callback)?;
        if let Some(e) = failure {
            return Err(e.into());
        }

        let status = if count == 0 {
            EnumerationStatus::Infeasible
        } else if count >= cap {
            EnumerationStatus::CapReached
        } else if solver_outcome.status == SolverStatus::Complete {
            EnumerationStatus::Exhausted
        } else {
            EnumerationStatus::Stopped
        };

        info!(
            event = "enumerate_end",
            status = %status,
            solutions = count,
            invalid_solutions = invalid,
            decisions = solver_outcome.decisions,
            conflicts = solver_outcome.conflicts,
            restarts = solver_outcome.restarts,
            solve_time_ms = solver_outcome.solve_time_ms,
        );

        Ok(EnumerationOutcome {
            solutions: count,
            status,
            invalid_solutions: invalid,
            solver: solver_outcome,
        })
    }
}
