//! Horizon parameters and the decision-variable space.

use crate::cp::{BoolVar, CpModel};
use crate::error::{Result, RosterError};

/// Largest number of `(staff, day, slot)` variables a horizon may hold.
pub const MAX_VARIABLES: usize = 1 << 24;

/// Size of one planning problem: staff roster, slot types per day, days.
///
/// All three are at least 1; [`Horizon::new`] is the only constructor.
///
/// # Examples
///
/// ```
/// use u_roster::roster::Horizon;
///
/// let horizon = Horizon::new(15, 10, 21).unwrap();
/// let fairness = horizon.fairness();
/// assert_eq!((fairness.min, fairness.max), (1, 2));
///
/// assert!(Horizon::new(0, 10, 21).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Horizon {
    n_staff: usize,
    n_slots: usize,
    n_days: usize,
}

impl Horizon {
    /// Creates a horizon, rejecting any zero parameter and any horizon
    /// with more than [`MAX_VARIABLES`] variables.
    pub fn new(n_staff: usize, n_slots: usize, n_days: usize) -> Result<Self> {
        for (name, value) in [("n_staff", n_staff), ("n_slots", n_slots), ("n_days", n_days)] {
            if value == 0 {
                return Err(RosterError::Config(format!("{name} must be at least 1")));
            }
        }
        let total = n_staff
            .checked_mul(n_days)
            .and_then(|n| n.checked_mul(n_slots))
            .filter(|&n| n <= MAX_VARIABLES);
        if total.is_none() {
            return Err(RosterError::Config(format!(
                "horizon {n_staff}x{n_slots}x{n_days} exceeds {MAX_VARIABLES} variables"
            )));
        }
        Ok(Self {
            n_staff,
            n_slots,
            n_days,
        })
    }

    /// Number of staff members.
    pub fn n_staff(&self) -> usize {
        self.n_staff
    }

    /// Number of slot types to cover each day.
    pub fn n_slots(&self) -> usize {
        self.n_slots
    }

    /// Number of days in the horizon.
    pub fn n_days(&self) -> usize {
        self.n_days
    }

    /// Number of `(staff, day, slot)` triples. Never above [`MAX_VARIABLES`].
    pub fn variable_count(&self) -> usize {
        self.n_staff * self.n_days * self.n_slots
    }

    /// Per-`(staff, slot type)` assignment range over the horizon.
    ///
    /// Each slot type occurs `n_days` times and is split as evenly as
    /// possible: everyone gets `n_days / n_staff`, and one more is allowed
    /// when the division leaves a remainder.
    pub fn fairness(&self) -> FairnessBounds {
        let min = self.n_days / self.n_staff;
        let max = min + usize::from(self.n_days % self.n_staff != 0);
        FairnessBounds { min, max }
    }

    /// Slot of `staff` on `day` in the cyclic rotation, if any.
    ///
    /// On day `d` staff `s` takes slot `(s - d) mod n_staff`, when that is a
    /// real slot. With `n_staff >= n_slots` the rotation covers every slot
    /// each day and meets the fairness bounds.
    pub fn round_robin_slot(&self, staff: usize, day: usize) -> Option<usize> {
        let slot = (staff + self.n_staff - day % self.n_staff) % self.n_staff;
        (slot < self.n_slots).then_some(slot)
    }
}

/// Inclusive range of assignments of one slot type to one staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FairnessBounds {
    /// Lower bound.
    pub min: usize,
    /// Upper bound.
    pub max: usize,
}

impl FairnessBounds {
    /// Whether `count` lies within the bounds.
    pub fn contains(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

/// Dense arena of one boolean variable per `(staff, day, slot)` triple.
///
/// The triple is flattened as `(staff * n_days + day) * n_slots + slot`.
/// The arena is filled once at construction, so it is total over the
/// cartesian product by construction, and is read-only afterwards.
#[derive(Debug, Clone)]
pub struct VariableSpace {
    horizon: Horizon,
    vars: Vec<BoolVar>,
}

impl VariableSpace {
    /// Creates every variable of the space in `model`.
    pub(crate) fn create(horizon: Horizon, model: &mut CpModel) -> Self {
        let mut vars = Vec::with_capacity(horizon.variable_count());
        for staff in 0..horizon.n_staff {
            for day in 0..horizon.n_days {
                for slot in 0..horizon.n_slots {
                    vars.push(model.new_bool_var(format!("x_s{staff}_d{day}_k{slot}")));
                }
            }
        }
        Self { horizon, vars }
    }

    /// Horizon the space was built for.
    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    /// Flattened position of a triple.
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is out of range.
    pub fn index(&self, staff: usize, day: usize, slot: usize) -> usize {
        let h = &self.horizon;
        assert!(
            staff < h.n_staff && day < h.n_days && slot < h.n_slots,
            "({staff}, {day}, {slot}) outside {}x{}x{}",
            h.n_staff,
            h.n_days,
            h.n_slots
        );
        (staff * h.n_days + day) * h.n_slots + slot
    }

    /// Variable of a triple.
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is out of range.
    pub fn var(&self, staff: usize, day: usize, slot: usize) -> BoolVar {
        self.vars[self.index(staff, day, slot)]
    }

    /// Variable of a triple, or `None` when out of range.
    pub fn get(&self, staff: usize, day: usize, slot: usize) -> Option<BoolVar> {
        let h = &self.horizon;
        if staff < h.n_staff && day < h.n_days && slot < h.n_slots {
            Some(self.var(staff, day, slot))
        } else {
            None
        }
    }

    /// All variables, in flattened order.
    pub fn vars(&self) -> &[BoolVar] {
        &self.vars
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the space is empty. Never true for a valid horizon.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizon_rejects_zero() {
        for (s, k, d) in [(0, 1, 1), (1, 0, 1), (1, 1, 0)] {
            let err = Horizon::new(s, k, d).unwrap_err();
            assert!(matches!(err, RosterError::Config(_)));
        }
    }

    #[test]
    fn test_horizon_rejects_oversized() {
        let err = Horizon::new(100_000, 100_000, 100_000).unwrap_err();
        assert!(matches!(err, RosterError::Config(_)));
        assert!(Horizon::new(usize::MAX, 2, 2).is_err());

        let edge = Horizon::new(1 << 12, 1 << 4, 1 << 8).unwrap();
        assert_eq!(edge.variable_count(), MAX_VARIABLES);
        assert!(Horizon::new(1 << 12, 1 << 4, (1 << 8) + 1).is_err());
    }

    #[test]
    fn test_fairness_bounds() {
        let exact = Horizon::new(7, 3, 14).unwrap().fairness();
        assert_eq!((exact.min, exact.max), (2, 2));

        let remainder = Horizon::new(15, 10, 21).unwrap().fairness();
        assert_eq!((remainder.min, remainder.max), (1, 2));

        let short = Horizon::new(5, 2, 3).unwrap().fairness();
        assert_eq!((short.min, short.max), (0, 1));
        assert!(short.contains(0));
        assert!(!short.contains(2));
    }

    #[test]
    fn test_round_robin_covers_each_day() {
        let h = Horizon::new(5, 3, 7).unwrap();
        for day in 0..h.n_days() {
            let mut slots: Vec<usize> = (0..h.n_staff())
                .filter_map(|s| h.round_robin_slot(s, day))
                .collect();
            slots.sort();
            assert_eq!(slots, vec![0, 1, 2]);
        }
    }

    #[test]
    fn test_variable_space_is_total() {
        let h = Horizon::new(3, 2, 4).unwrap();
        let mut model = CpModel::new("space");
        let space = VariableSpace::create(h, &mut model);

        assert_eq!(space.len(), 24);
        assert_eq!(model.var_count(), 24);
        for staff in 0..3 {
            for day in 0..4 {
                for slot in 0..2 {
                    let i = space.index(staff, day, slot);
                    assert_eq!(space.vars()[i], space.var(staff, day, slot));
                }
            }
        }
        assert_eq!(model.var_name(space.var(2, 3, 1)), Some("x_s2_d3_k1"));
        assert!(space.get(3, 0, 0).is_none());
        assert!(space.get(0, 4, 0).is_none());
        assert!(space.get(0, 0, 2).is_none());
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range_panics() {
        let h = Horizon::new(1, 1, 1).unwrap();
        let mut model = CpModel::new("space");
        let space = VariableSpace::create(h, &mut model);
        space.index(0, 1, 0);
    }
}
