//! Roster feasibility model construction.

use std::fmt;
use std::ops::Range;

use tracing::info;

use super::types::{Horizon, VariableSpace};
use crate::cp::{BoolVar, CpModel, LinearExpr};
use crate::error::Result;

/// The constraint families, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintFamily {
    /// At most one slot per staff member per day.
    DailyUniqueness,
    /// Exactly one staff member per slot per day.
    SlotCoverage,
    /// Lower fairness bound per staff member and slot type.
    FairnessMin,
    /// Upper fairness bound per staff member and slot type.
    FairnessMax,
    /// Total duty count per staff member over all slot types, bounded by
    /// the fairness bounds summed over slots. Implied by the fairness
    /// families, so it never removes a solution.
    Workload,
}

impl fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConstraintFamily::DailyUniqueness => "daily uniqueness",
            ConstraintFamily::SlotCoverage => "slot coverage",
            ConstraintFamily::FairnessMin => "fairness lower bound",
            ConstraintFamily::FairnessMax => "fairness upper bound",
            ConstraintFamily::Workload => "workload",
        })
    }
}

/// A fully constrained roster model, ready for solving.
#[derive(Debug, Clone)]
pub struct RosterModel {
    /// Horizon the model was built for.
    pub horizon: Horizon,
    /// The underlying CP model.
    pub model: CpModel,
    /// Variable of every `(staff, day, slot)` triple.
    pub variables: VariableSpace,
    families: Vec<(ConstraintFamily, Range<usize>)>,
}

impl RosterModel {
    /// Family a constraint index belongs to.
    pub fn family_of(&self, constraint: usize) -> Option<ConstraintFamily> {
        self.families
            .iter()
            .find(|(_, range)| range.contains(&constraint))
            .map(|(family, _)| *family)
    }

    /// Constraint index range of a family.
    pub fn family_range(&self, family: ConstraintFamily) -> Range<usize> {
        self.families
            .iter()
            .find(|(f, _)| *f == family)
            .map(|(_, range)| range.clone())
            .unwrap_or(0..0)
    }

    /// Constraints broken by the assignment `value`, with their family, in
    /// registration order.
    pub fn unsatisfied(&self, value: impl Fn(BoolVar) -> bool) -> Vec<(usize, ConstraintFamily)> {
        self.model
            .constraints()
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_satisfied_by(&value))
            .filter_map(|(ci, _)| self.family_of(ci).map(|family| (ci, family)))
            .collect()
    }
}

/// Builds the roster feasibility model.
///
/// # Examples
///
/// ```
/// use u_roster::roster::{Horizon, RosterModelBuilder};
///
/// let horizon = Horizon::new(4, 2, 6).unwrap();
/// let roster = RosterModelBuilder::new(horizon).build();
///
/// assert_eq!(roster.variables.len(), 4 * 6 * 2);
/// // 4*6 uniqueness + 6*2 coverage + 2 * 4*2 fairness + 2*4 workload
/// assert_eq!(roster.model.constraint_count(), 24 + 12 + 16 + 8);
/// ```
#[derive(Debug, Clone)]
pub struct RosterModelBuilder {
    horizon: Horizon,
    round_robin_hint: bool,
}

impl RosterModelBuilder {
    /// Creates a builder for `horizon`, with the round-robin hint enabled.
    pub fn new(horizon: Horizon) -> Self {
        Self {
            horizon,
            round_robin_hint: true,
        }
    }

    /// Enables or disables the cyclic rotation as a solution hint.
    pub fn with_round_robin_hint(mut self, enabled: bool) -> Self {
        self.round_robin_hint = enabled;
        self
    }

    /// Creates the variable space and registers every constraint.
    pub fn build(&self) -> RosterModel {
        let h = self.horizon;
        let (n_staff, n_slots, n_days) = (h.n_staff(), h.n_slots(), h.n_days());
        let fairness = h.fairness();

        let mut model = CpModel::new(format!("roster_{n_staff}x{n_slots}x{n_days}"));
        let variables = VariableSpace::create(h, &mut model);
        let mut families = Vec::with_capacity(5);

        let start = model.constraint_count();
        for day in 0..n_days {
            for staff in 0..n_staff {
                let expr: LinearExpr = (0..n_slots)
                    .map(|slot| variables.var(staff, day, slot))
                    .collect();
                model.add_le(expr, 1);
            }
        }
        families.push((
            ConstraintFamily::DailyUniqueness,
            start..model.constraint_count(),
        ));

        let start = model.constraint_count();
        for day in 0..n_days {
            for slot in 0..n_slots {
                let expr: LinearExpr = (0..n_staff)
                    .map(|staff| variables.var(staff, day, slot))
                    .collect();
                model.add_eq(expr, 1);
            }
        }
        families.push((ConstraintFamily::SlotCoverage, start..model.constraint_count()));

        let start = model.constraint_count();
        for staff in 0..n_staff {
            for slot in 0..n_slots {
                model.add_ge(staff_slot_expr(&variables, staff, slot), fairness.min as i64);
            }
        }
        families.push((ConstraintFamily::FairnessMin, start..model.constraint_count()));

        let start = model.constraint_count();
        for staff in 0..n_staff {
            for slot in 0..n_slots {
                model.add_le(staff_slot_expr(&variables, staff, slot), fairness.max as i64);
            }
        }
        families.push((ConstraintFamily::FairnessMax, start..model.constraint_count()));

        let (min_total, max_total) = (
            (fairness.min * n_slots) as i64,
            (fairness.max * n_slots) as i64,
        );
        let start = model.constraint_count();
        for staff in 0..n_staff {
            let expr: LinearExpr = (0..n_days)
                .flat_map(|day| (0..n_slots).map(move |slot| (day, slot)))
                .map(|(day, slot)| variables.var(staff, day, slot))
                .collect();
            model.add_ge(expr.clone(), min_total);
            model.add_le(expr, max_total);
        }
        families.push((ConstraintFamily::Workload, start..model.constraint_count()));

        let hinted = self.round_robin_hint && n_staff >= n_slots;
        if hinted {
            for staff in 0..n_staff {
                for day in 0..n_days {
                    let assigned = h.round_robin_slot(staff, day);
                    for slot in 0..n_slots {
                        model.add_hint(variables.var(staff, day, slot), assigned == Some(slot));
                    }
                }
            }
        }

        info!(
            event = "build_done",
            n_staff,
            n_slots,
            n_days,
            variables = model.var_count(),
            constraints = model.constraint_count(),
            fairness_min = fairness.min,
            fairness_max = fairness.max,
            hinted,
        );

        RosterModel {
            horizon: h,
            model,
            variables,
            families,
        }
    }
}

fn staff_slot_expr(variables: &VariableSpace, staff: usize, slot: usize) -> LinearExpr {
    (0..variables.horizon().n_days())
        .map(|day| variables.var(staff, day, slot))
        .collect()
}

/// Validates the parameters and builds the model with default options.
pub fn build(n_staff: usize, n_slots: usize, n_days: usize) -> Result<RosterModel> {
    let horizon = Horizon::new(n_staff, n_slots, n_days)?;
    Ok(RosterModelBuilder::new(horizon).build())
}
