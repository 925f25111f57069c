//! Error types for roster building and enumeration.

use thiserror::Error;

use crate::cp::SolverError;
use crate::roster::ConfigError;

/// Main error type.
///
/// An infeasible model is not an error: it is reported through
/// [`EnumerationStatus::Infeasible`](crate::enumerate::EnumerationStatus).
#[derive(Debug, Error)]
pub enum RosterError {
    /// Rejected input, raised before any variable is created.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read or parsed.
    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    /// Failure inside the constraint solver, passed through unchanged.
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// The report writer failed.
    #[error("report output failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for roster operations.
pub type Result<T> = std::result::Result<T, RosterError>;
