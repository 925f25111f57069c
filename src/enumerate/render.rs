//! Textual report of enumerated schedules.

use std::io::{self, Write};

use crate::roster::Schedule;

/// Cell text for a staff member with no slot on a day.
pub const UNASSIGNED: &str = "     X";

/// Writes one solution as a staff-by-day grid.
///
/// Every slot held in a cell is printed, so a double booking shows up as
/// an over-wide row instead of being hidden.
pub fn render_schedule<W: Write + ?Sized>(
    out: &mut W,
    ordinal: usize,
    schedule: &Schedule,
) -> io::Result<()> {
    let h = schedule.horizon();

    writeln!(out, "Solution {ordinal}")?;
    write!(out, "DAY:  ")?;
    for day in 0..h.n_days() {
        write!(out, "{day:>6}")?;
    }
    writeln!(out)?;
    writeln!(out)?;

    for staff in 0..h.n_staff() {
        write!(out, "ST{staff:>2}: ")?;
        for day in 0..h.n_days() {
            let slots = schedule.slots_at(staff, day);
            if slots.is_empty() {
                out.write_all(UNASSIGNED.as_bytes())?;
            }
            for slot in slots {
                write!(out, "{slot:>6}")?;
            }
        }
        writeln!(out)?;
    }
    writeln!(out)
}

/// Notice written once the solution cap stops the search.
pub fn render_cap_reached<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Maximum number of solutions reached")
}

/// Notice written when the search ends without any solution.
pub fn render_infeasible<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    writeln!(out, "No solution found: model is infeasible")
}

/// Notice written when every solution was produced below the cap.
pub fn render_exhausted<W: Write + ?Sized>(out: &mut W, solutions: usize) -> io::Result<()> {
    writeln!(out, "Search space exhausted after {solutions} solution(s)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Horizon;

    fn render(schedule: &Schedule) -> String {
        let mut buf = Vec::new();
        render_schedule(&mut buf, 1, schedule).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_grid_layout() {
        let h = Horizon::new(2, 1, 3).unwrap();
        let schedule = Schedule::from_cells(h, |staff, day, _| staff == day % 2);

        let text = render(&schedule);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Solution 1");
        assert_eq!(lines[1], "DAY:       0     1     2");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "ST 0:      0     X     0");
        assert_eq!(lines[4], "ST 1:      X     0     X");
    }

    #[test]
    fn test_double_booking_shows_every_slot() {
        let h = Horizon::new(1, 2, 1).unwrap();
        let schedule = Schedule::from_cells(h, |_, _, _| true);

        let text = render(&schedule);
        assert!(text.contains("ST 0:      0     1"), "got:\n{text}");
    }

    #[test]
    fn test_notices() {
        let mut buf = Vec::new();
        render_cap_reached(&mut buf).unwrap();
        render_infeasible(&mut buf).unwrap();
        render_exhausted(&mut buf, 1).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Maximum number of solutions reached"));
        assert!(text.contains("infeasible"));
        assert!(text.contains("exhausted after 1 solution"));
    }
}
