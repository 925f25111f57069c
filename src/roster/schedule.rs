//! Owned snapshot of one roster solution.

use std::fmt;

use super::types::{Horizon, VariableSpace};
use crate::cp::SolutionContext;

/// A breach of one of the roster constraint families.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A staff member holds more than one slot on a day.
    MultipleSlots {
        staff: usize,
        day: usize,
        slots: Vec<usize>,
    },
    /// A slot on a day is not held by exactly one staff member.
    Coverage {
        day: usize,
        slot: usize,
        staff: Vec<usize>,
    },
    /// A staff member holds a slot type outside the fairness bounds.
    Fairness {
        staff: usize,
        slot: usize,
        count: usize,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MultipleSlots { staff, day, slots } => {
                write!(f, "staff {staff} holds slots {slots:?} on day {day}")
            }
            Violation::Coverage { day, slot, staff } => {
                write!(f, "slot {slot} on day {day} held by staff {staff:?}")
            }
            Violation::Fairness { staff, slot, count } => {
                write!(f, "staff {staff} holds slot {slot} {count} times")
            }
        }
    }
}

/// Values of every `(staff, day, slot)` variable in one solution.
///
/// # Examples
///
/// ```
/// use u_roster::roster::{Horizon, Schedule};
///
/// let horizon = Horizon::new(2, 1, 2).unwrap();
/// // staff 0 on day 0, staff 1 on day 1
/// let schedule = Schedule::from_cells(horizon, |staff, day, _| staff == day);
///
/// assert_eq!(schedule.slots_at(0, 0), vec![0]);
/// assert!(schedule.slots_at(0, 1).is_empty());
/// assert!(schedule.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    horizon: Horizon,
    /// Flattened like [`VariableSpace`].
    cells: Vec<bool>,
}

impl Schedule {
    /// Reads the current solution of every variable in `space`.
    pub fn capture(space: &VariableSpace, ctx: &SolutionContext<'_>) -> Self {
        Self {
            horizon: space.horizon(),
            cells: space.vars().iter().map(|&v| ctx.value(v)).collect(),
        }
    }

    /// Builds a schedule from a cell predicate.
    pub fn from_cells(horizon: Horizon, cell: impl Fn(usize, usize, usize) -> bool) -> Self {
        let mut cells = Vec::with_capacity(horizon.variable_count());
        for staff in 0..horizon.n_staff() {
            for day in 0..horizon.n_days() {
                for slot in 0..horizon.n_slots() {
                    cells.push(cell(staff, day, slot));
                }
            }
        }
        Self { horizon, cells }
    }

    /// Horizon of the schedule.
    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    fn offset(&self, staff: usize, day: usize) -> usize {
        (staff * self.horizon.n_days() + day) * self.horizon.n_slots()
    }

    /// Whether `staff` holds `slot` on `day`. Out-of-range reads are `false`.
    pub fn is_assigned(&self, staff: usize, day: usize, slot: usize) -> bool {
        let h = &self.horizon;
        staff < h.n_staff()
            && day < h.n_days()
            && slot < h.n_slots()
            && self.cells[self.offset(staff, day) + slot]
    }

    /// Every slot `staff` holds on `day`, ascending.
    ///
    /// A valid schedule yields at most one; more than one is reported as is.
    pub fn slots_at(&self, staff: usize, day: usize) -> Vec<usize> {
        (0..self.horizon.n_slots())
            .filter(|&slot| self.is_assigned(staff, day, slot))
            .collect()
    }

    /// Every staff member holding `slot` on `day`, ascending.
    pub fn staff_on(&self, day: usize, slot: usize) -> Vec<usize> {
        (0..self.horizon.n_staff())
            .filter(|&staff| self.is_assigned(staff, day, slot))
            .collect()
    }

    /// How many days `staff` holds `slot`.
    pub fn count(&self, staff: usize, slot: usize) -> usize {
        (0..self.horizon.n_days())
            .filter(|&day| self.is_assigned(staff, day, slot))
            .count()
    }

    /// Number of days `staff` holds no slot.
    pub fn idle_days(&self, staff: usize) -> usize {
        (0..self.horizon.n_days())
            .filter(|&day| self.slots_at(staff, day).is_empty())
            .count()
    }

    /// Checks the schedule against all four constraint families.
    pub fn violations(&self) -> Vec<Violation> {
        let h = self.horizon;
        let fairness = h.fairness();
        let mut found = Vec::new();

        for staff in 0..h.n_staff() {
            for day in 0..h.n_days() {
                let slots = self.slots_at(staff, day);
                if slots.len() > 1 {
                    found.push(Violation::MultipleSlots { staff, day, slots });
                }
            }
        }
        for day in 0..h.n_days() {
            for slot in 0..h.n_slots() {
                let staff = self.staff_on(day, slot);
                if staff.len() != 1 {
                    found.push(Violation::Coverage { day, slot, staff });
                }
            }
        }
        for staff in 0..h.n_staff() {
            for slot in 0..h.n_slots() {
                let count = self.count(staff, slot);
                if !fairness.contains(count) {
                    found.push(Violation::Fairness { staff, slot, count });
                }
            }
        }
        found
    }

    /// Whether [`violations`](Self::violations) is empty.
    pub fn is_valid(&self) -> bool {
        self.violations().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rotation(horizon: Horizon) -> Schedule {
        Schedule::from_cells(horizon, |staff, day, slot| {
            horizon.round_robin_slot(staff, day) == Some(slot)
        })
    }

    #[test]
    fn test_rotation_is_valid() {
        for (s, k, d) in [(15, 10, 21), (3, 3, 3), (4, 2, 9), (1, 1, 5)] {
            let schedule = rotation(Horizon::new(s, k, d).unwrap());
            assert_eq!(schedule.violations(), vec![], "rotation {s}x{k}x{d}");
        }
    }

    #[test]
    fn test_double_booking_reported() {
        let h = Horizon::new(2, 2, 1).unwrap();
        let schedule = Schedule::from_cells(h, |staff, _, _| staff == 0);

        let violations = schedule.violations();
        assert!(violations.contains(&Violation::MultipleSlots {
            staff: 0,
            day: 0,
            slots: vec![0, 1],
        }));
        assert_eq!(schedule.slots_at(0, 0), vec![0, 1]);
    }

    #[test]
    fn test_uncovered_slot_reported() {
        let h = Horizon::new(2, 1, 1).unwrap();
        let schedule = Schedule::from_cells(h, |_, _, _| false);

        assert!(schedule.violations().contains(&Violation::Coverage {
            day: 0,
            slot: 0,
            staff: vec![],
        }));
        assert_eq!(schedule.idle_days(0), 1);
    }

    #[test]
    fn test_unfair_split_reported() {
        // staff 0 covers the single slot every day, staff 1 never does
        let h = Horizon::new(2, 1, 4).unwrap();
        let schedule = Schedule::from_cells(h, |staff, _, _| staff == 0);

        let violations = schedule.violations();
        assert!(violations.contains(&Violation::Fairness {
            staff: 0,
            slot: 0,
            count: 4
        }));
        assert!(violations.contains(&Violation::Fairness {
            staff: 1,
            slot: 0,
            count: 0
        }));
    }

    #[test]
    fn test_out_of_range_reads_false() {
        let schedule = rotation(Horizon::new(2, 1, 2).unwrap());
        assert!(!schedule.is_assigned(2, 0, 0));
        assert!(!schedule.is_assigned(0, 2, 0));
        assert!(!schedule.is_assigned(0, 0, 1));
    }

    #[test]
    fn test_violation_display() {
        let v = Violation::Fairness {
            staff: 3,
            slot: 1,
            count: 5,
        };
        assert_eq!(v.to_string(), "staff 3 holds slot 1 5 times");
    }
}
