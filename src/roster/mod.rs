//! Roster feasibility model.
//!
//! Assigns a fixed roster of staff members to daily duty slots. One boolean
//! variable per `(staff, day, slot)` triple, constrained by four families:
//!
//! 1. **Daily uniqueness**: a staff member holds at most one slot per day.
//! 2. **Slot coverage**: every slot, every day, is held by exactly one
//!    staff member.
//! 3. **Fairness lower bound**: each staff member holds each slot type at
//!    least `n_days / n_staff` times.
//! 4. **Fairness upper bound**: and at most one more than that when the
//!    division leaves a remainder.
//!
//! A fifth family bounds each staff member's total duty count by the
//! fairness bounds summed over slot types. It follows from the two fairness
//! families and only guides the search toward balanced partial rosters.
//!
//! Building never fails on a valid [`Horizon`]; whether the model has
//! solutions is for the solver to find out.

mod builder;
mod config;
mod schedule;
mod types;

pub use builder::{build, ConstraintFamily, RosterModel, RosterModelBuilder};
pub use config::{ConfigError, RosterConfig};
pub use schedule::{Schedule, Violation};
pub use types::{FairnessBounds, Horizon, VariableSpace, MAX_VARIABLES};
