//! Bounded solution enumeration.
//!
//! Runs a [`CpSolver`](crate::cp::CpSolver) in all-solutions mode over a
//! [`RosterModel`](crate::roster::RosterModel), renders or collects every
//! solution it reports, and stops the search once a configured number of
//! solutions has been produced.

mod config;
mod render;
mod runner;

pub use config::EnumeratorConfig;
pub use render::{
    render_cap_reached, render_exhausted, render_infeasible, render_schedule, UNASSIGNED,
};
pub use runner::{EnumerationOutcome, EnumerationStatus, SolutionEnumerator};
