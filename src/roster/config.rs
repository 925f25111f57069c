//! Run configuration, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::builder::RosterModelBuilder;
use super::types::Horizon;
use crate::cp::SolverConfig;
use crate::enumerate::EnumeratorConfig;
use crate::error::Result;

/// Configuration file error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Parameters of one build-and-enumerate run.
///
/// # Examples
///
/// ```
/// use u_roster::roster::RosterConfig;
///
/// let config = RosterConfig::from_toml_str(r#"
///     n_staff = 6
///     n_slots = 3
///     solution_cap = 2
///
///     [solver]
///     seed = 11
/// "#).unwrap();
///
/// assert_eq!(config.n_staff, 6);
/// assert_eq!(config.n_days, 21); // default kept
/// assert_eq!(config.solver.seed, Some(11));
/// assert!(config.solver.enumerate_all_solutions);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Staff roster size.
    pub n_staff: usize,
    /// Slot types per day.
    pub n_slots: usize,
    /// Horizon length in days.
    pub n_days: usize,
    /// Maximum number of solutions to enumerate before stopping.
    pub solution_cap: usize,
    /// Seed the search with the cyclic rotation.
    pub round_robin_hint: bool,
    /// Check every enumerated solution against the constraint families.
    pub verify: bool,
    /// Solver tuning.
    pub solver: SolverConfig,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            n_staff: 15,
            n_slots: 10,
            n_days: 21,
            solution_cap: 5,
            round_robin_hint: true,
            verify: false,
            solver: SolverConfig::default(),
        }
    }
}

impl RosterConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string. Missing keys keep defaults.
    pub fn from_toml_str(s: &str) -> std::result::Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Sets the horizon parameters.
    pub fn with_horizon(mut self, n_staff: usize, n_slots: usize, n_days: usize) -> Self {
        self.n_staff = n_staff;
        self.n_slots = n_slots;
        self.n_days = n_days;
        self
    }

    /// Sets the solution cap.
    pub fn with_solution_cap(mut self, cap: usize) -> Self {
        self.solution_cap = cap;
        self
    }

    /// Validated horizon.
    pub fn horizon(&self) -> Result<Horizon> {
        Horizon::new(self.n_staff, self.n_slots, self.n_days)
    }

    /// Model builder for the configured horizon.
    pub fn builder(&self) -> Result<RosterModelBuilder> {
        Ok(RosterModelBuilder::new(self.horizon()?).with_round_robin_hint(self.round_robin_hint))
    }

    /// Enumerator settings.
    pub fn enumerator(&self) -> EnumeratorConfig {
        EnumeratorConfig::default()
            .with_solution_cap(self.solution_cap)
            .with_verify(self.verify)
            .with_solver(self.solver.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RosterError;

    #[test]
    fn test_defaults_match_reference_run() {
        let config = RosterConfig::default();
        assert_eq!(
            (config.n_staff, config.n_slots, config.n_days, config.solution_cap),
            (15, 10, 21, 5)
        );
        assert_eq!(config.solver.linearization_level, 0);
        assert!(config.solver.enumerate_all_solutions);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(RosterConfig::from_toml_str("").unwrap(), RosterConfig::default());
    }

    #[test]
    fn test_restart_base_from_toml() {
        let config = RosterConfig::from_toml_str("[solver]\nrestart_base = 0").unwrap();
        assert_eq!(config.solver.restart_base, 0);
        assert!(config.solver.seed.is_none());
    }

    #[test]
    fn test_bad_toml_rejected() {
        let err = RosterConfig::from_toml_str("n_staff = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = RosterConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_zero_days_rejected_on_horizon() {
        let config = RosterConfig::default().with_horizon(3, 2, 0);
        assert!(matches!(config.horizon(), Err(RosterError::Config(_))));
        assert!(config.builder().is_err());
    }

    #[test]
    fn test_enumerator_settings_carried() {
        let mut config = RosterConfig::default().with_solution_cap(9);
        config.verify = true;
        config.solver.seed = Some(3);

        let enumerator = config.enumerator();
        assert_eq!(enumerator.solution_cap, 9);
        assert!(enumerator.verify);
        assert_eq!(enumerator.solver.seed, Some(3));
    }
}
