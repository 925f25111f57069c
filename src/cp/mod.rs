//! Constraint Programming (CP) layer.
//!
//! Provides a model over boolean decision variables with linear
//! (in)equality constraints, and a solver interface that reports every
//! solution through a callback.
//!
//! # Key Components
//!
//! - **Variables**: [`BoolVar`] handles and unit-weight [`LinearExpr`] sums
//! - **Constraints**: [`LinearConstraint`] with a [`Comparator`] and bound
//! - **Model**: [`CpModel`]: container for variables, constraints, hints
//! - **Solver**: [`CpSolver`] trait and the built-in [`BacktrackingSolver`]
//!
//! # Design
//!
//! The model carries no objective: solving is a feasibility search. The
//! solver calls a [`SolutionCallback`] once per solution; the callback can
//! raise a stop flag through [`SolutionContext::stop_search`], which the
//! solver reads after the callback returns.
//!
//! # References
//!
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

mod model;
mod search;
mod solver;
mod variables;

pub use model::{Comparator, CpModel, LinearConstraint};
pub use solver::{
    BacktrackingSolver, CpSolver, SolutionCallback, SolutionContext, SolveOutcome, SolverConfig,
    SolverError, SolverStatus, DEFAULT_RESTART_BASE,
};
pub use variables::{BoolVar, BoolVarDef, LinearExpr};
