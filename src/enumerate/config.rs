//! Enumerator configuration.

use crate::cp::SolverConfig;
use crate::error::{Result, RosterError};

/// Configuration for [`SolutionEnumerator`](super::SolutionEnumerator).
///
/// # Examples
///
/// ```
/// use u_roster::enumerate::EnumeratorConfig;
///
/// let config = EnumeratorConfig::default().with_solution_cap(3);
/// assert_eq!(config.solution_cap, 3);
/// assert!(config.solver.enumerate_all_solutions);
/// assert_eq!(config.solver.linearization_level, 0);
/// ```
#[derive(Debug, Clone)]
pub struct EnumeratorConfig {
    /// Maximum number of solutions to produce before stopping the search.
    pub solution_cap: usize,
    /// Check every solution against the constraint families and log
    /// breaches.
    pub verify: bool,
    /// Tuning passed to the solver as is.
    pub solver: SolverConfig,
}

impl Default for EnumeratorConfig {
    fn default() -> Self {
        Self {
            solution_cap: 5,
            verify: false,
            solver: SolverConfig::default()
                .with_linearization_level(0)
                .with_enumerate_all_solutions(true),
        }
    }
}

impl EnumeratorConfig {
    /// Sets the solution cap.
    pub fn with_solution_cap(mut self, cap: usize) -> Self {
        self.solution_cap = cap;
        self
    }

    /// Enables or disables per-solution verification.
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Replaces the solver configuration.
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.solution_cap == 0 {
            return Err(RosterError::Config("solution_cap must be at least 1".into()));
        }
        Ok(())
    }
}
