//! Staff-to-slot roster feasibility modeling.
//!
//! Builds a constraint model assigning a fixed roster of staff members to
//! daily duty slots over a planning horizon, then enumerates a bounded
//! number of valid schedules:
//!
//! - **CP (Constraint Programming)**: boolean variables, linear
//!   (in)equality constraints, solution hints and a callback-driven solver
//!   interface with a built-in backtracking solver.
//! - **Roster**: the horizon, the `(staff, day, slot)` variable space and
//!   the uniqueness, coverage and fairness constraint families.
//! - **Enumerate**: drives the solver in all-solutions mode, renders each
//!   schedule and stops at a solution cap.
//!
//! # Example
//!
//! ```
//! use u_roster::cp::BacktrackingSolver;
//! use u_roster::enumerate::{EnumeratorConfig, SolutionEnumerator};
//! use u_roster::roster::build;
//!
//! let roster = build(4, 3, 7).unwrap();
//! let enumerator = SolutionEnumerator::new(EnumeratorConfig::default()).unwrap();
//! let (schedules, outcome) = enumerator
//!     .enumerate_schedules(&roster, &BacktrackingSolver::new())
//!     .unwrap();
//!
//! assert_eq!(outcome.solutions, 5);
//! assert!(schedules.iter().all(|s| s.is_valid()));
//! ```

pub mod cp;
pub mod enumerate;
pub mod error;
pub mod roster;

pub use error::{Result, RosterError};
