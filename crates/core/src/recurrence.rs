//! Recurring availability windows and the rules deciding whether a window
//! covers a requested visit.
//!
//! A window is stored as an anchor timestamp, a duration and a recurrence
//! kind. The anchor's time-of-day is the daily start of the slot; the other
//! parts of the anchor only matter for the recurrence kinds that look at them
//! (weekday for `WEEKLY`, day-of-month for `MONTHLY`, year for `YEARLY`).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const SECONDS_PER_MINUTE: i64 = 60;

/// How an availability window repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// All recurrence labels accepted by the API and the `availabilities` table.
pub const VALID_RECURRENCES: &[&str] = &["DAILY", "WEEKLY", "MONTHLY", "YEARLY"];

impl Recurrence {
    pub fn as_str(self) -> &'static str {
        match self {
            Recurrence::Daily => "DAILY",
            Recurrence::Weekly => "WEEKLY",
            Recurrence::Monthly => "MONTHLY",
            Recurrence::Yearly => "YEARLY",
        }
    }

    /// Calendar part of the match: does `target` fall on a day this
    /// recurrence repeats on, given the window's `anchor`?
    fn same_period(self, anchor: NaiveDateTime, target: NaiveDateTime) -> bool {
        match self {
            Recurrence::Daily => true,
            Recurrence::Weekly => anchor.weekday() == target.weekday(),
            Recurrence::Monthly => anchor.day() == target.day(),
            Recurrence::Yearly => anchor.year() <= target.year(),
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Ok(Recurrence::Daily),
            "WEEKLY" => Ok(Recurrence::Weekly),
            "MONTHLY" => Ok(Recurrence::Monthly),
            "YEARLY" => Ok(Recurrence::Yearly),
            other => Err(CoreError::Validation(format!(
                "Invalid recurrence '{other}'. Must be one of: {}",
                VALID_RECURRENCES.join(", ")
            ))),
        }
    }
}

/// A provider's recurring availability slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityWindow {
    pub anchor: NaiveDateTime,
    pub duration_minutes: i64,
    pub recurrence: Recurrence,
}

impl AvailabilityWindow {
    pub fn new(anchor: NaiveDateTime, duration_minutes: i64, recurrence: Recurrence) -> Self {
        Self {
            anchor,
            duration_minutes,
            recurrence,
        }
    }

    /// Whether a visit starting at `start` and lasting `required_minutes`
    /// fits entirely inside one occurrence of this window.
    ///
    /// Times are compared in seconds since midnight without wrapping, so a
    /// slot running past midnight simply ends "late" on its start day.
    pub fn covers(&self, start: NaiveDateTime, required_minutes: i64) -> bool {
        if self.duration_minutes <= 0 || required_minutes < 0 {
            return false;
        }
        // The slot has to be in effect already.
        if self.anchor.date() > start.date() {
            return false;
        }
        if !self.recurrence.same_period(self.anchor, start) {
            return false;
        }

        let slot_start = i64::from(self.anchor.time().num_seconds_from_midnight());
        let slot_end = slot_start + self.duration_minutes * SECONDS_PER_MINUTE;
        let visit_start = i64::from(start.time().num_seconds_from_midnight());
        let visit_end = visit_start + required_minutes * SECONDS_PER_MINUTE;

        slot_start <= visit_start && slot_end >= visit_end
    }
}

/// Validate the raw fields of an availability window before it is stored.
pub fn validate_window(duration_minutes: i32, recurrence: &str) -> Result<Recurrence, CoreError> {
    if duration_minutes <= 0 {
        return Err(CoreError::Validation(
            "Availability duration must be greater than zero".into(),
        ));
    }
    recurrence.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    // -----------------------------------------------------------------------
    // DAILY
    // -----------------------------------------------------------------------

    #[test]
    fn daily_visit_inside_slot_matches() {
        // 09:00 for two hours, visit 10:00 lasting one hour.
        let window = AvailabilityWindow::new(at(2024, 12, 1, 9, 0), 120, Recurrence::Daily);
        assert!(window.covers(at(2025, 1, 1, 10, 0), 60));
    }

    #[test]
    fn daily_visit_overrunning_slot_does_not_match() {
        // Visit 10:30 + 1h ends at 11:30, after the 11:00 slot end.
        let window = AvailabilityWindow::new(at(2024, 12, 1, 9, 0), 120, Recurrence::Daily);
        assert!(!window.covers(at(2025, 1, 1, 10, 30), 60));
    }

    #[test]
    fn daily_visit_ending_exactly_at_slot_end_matches() {
        let window = AvailabilityWindow::new(at(2024, 12, 1, 9, 0), 120, Recurrence::Daily);
        assert!(window.covers(at(2025, 1, 1, 10, 0), 60));
        assert!(window.covers(at(2025, 1, 1, 9, 0), 120));
    }

    #[test]
    fn daily_visit_before_slot_start_does_not_match() {
        let window = AvailabilityWindow::new(at(2024, 12, 1, 9, 0), 120, Recurrence::Daily);
        assert!(!window.covers(at(2025, 1, 1, 8, 59), 30));
    }

    #[test]
    fn minutes_are_compared_as_part_of_the_time() {
        // 09:45 start, 10:30 visit: the hour is later even though the minute
        // is earlier.
        let window = AvailabilityWindow::new(at(2024, 12, 1, 9, 45), 120, Recurrence::Daily);
        assert!(window.covers(at(2025, 1, 1, 10, 30), 30));
    }

    #[test]
    fn window_not_yet_in_effect_does_not_match() {
        let window = AvailabilityWindow::new(at(2025, 2, 1, 9, 0), 120, Recurrence::Daily);
        assert!(!window.covers(at(2025, 1, 1, 10, 0), 60));
    }

    #[test]
    fn window_in_effect_from_its_own_day() {
        let window = AvailabilityWindow::new(at(2025, 1, 1, 9, 0), 120, Recurrence::Daily);
        assert!(window.covers(at(2025, 1, 1, 10, 0), 60));
    }

    #[test]
    fn slot_running_past_midnight_covers_late_visit() {
        let window = AvailabilityWindow::new(at(2024, 12, 1, 22, 0), 180, Recurrence::Daily);
        assert!(window.covers(at(2025, 1, 1, 23, 0), 90));
    }

    #[test]
    fn zero_duration_window_never_matches() {
        let window = AvailabilityWindow::new(at(2024, 12, 1, 9, 0), 0, Recurrence::Daily);
        assert!(!window.covers(at(2025, 1, 1, 9, 0), 0));
    }

    // -----------------------------------------------------------------------
    // WEEKLY / MONTHLY / YEARLY
    // -----------------------------------------------------------------------

    #[test]
    fn weekly_matches_same_weekday() {
        // 2025-01-01 is a Wednesday, so is 2025-01-08.
        let window = AvailabilityWindow::new(at(2025, 1, 1, 9, 0), 120, Recurrence::Weekly);
        assert!(window.covers(at(2025, 1, 8, 10, 0), 60));
    }

    #[test]
    fn weekly_wednesday_does_not_match_thursday() {
        let window = AvailabilityWindow::new(at(2025, 1, 1, 9, 0), 120, Recurrence::Weekly);
        assert!(!window.covers(at(2025, 1, 9, 10, 0), 60));
    }

    #[test]
    fn monthly_matches_same_day_of_month() {
        let window = AvailabilityWindow::new(at(2025, 1, 15, 14, 0), 60, Recurrence::Monthly);
        assert!(window.covers(at(2025, 3, 15, 14, 0), 60));
        assert!(!window.covers(at(2025, 3, 16, 14, 0), 60));
    }

    #[test]
    fn yearly_matches_any_later_year() {
        let window = AvailabilityWindow::new(at(2023, 6, 1, 9, 0), 240, Recurrence::Yearly);
        assert!(window.covers(at(2025, 1, 1, 10, 0), 60));
        assert!(!window.covers(at(2025, 1, 1, 12, 30), 60));
    }

    // -----------------------------------------------------------------------
    // Parsing and validation
    // -----------------------------------------------------------------------

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("weekly".parse::<Recurrence>().unwrap(), Recurrence::Weekly);
        assert_eq!(" DAILY ".parse::<Recurrence>().unwrap(), Recurrence::Daily);
    }

    #[test]
    fn parse_rejects_unknown_label() {
        assert_matches!("HOURLY".parse::<Recurrence>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn as_str_round_trips_every_label() {
        for label in VALID_RECURRENCES {
            let parsed: Recurrence = label.parse().unwrap();
            assert_eq!(parsed.as_str(), *label);
        }
    }

    #[test]
    fn validate_window_rejects_non_positive_duration() {
        assert_matches!(validate_window(0, "DAILY"), Err(CoreError::Validation(_)));
        assert_matches!(validate_window(-30, "DAILY"), Err(CoreError::Validation(_)));
        assert_eq!(validate_window(30, "monthly").unwrap(), Recurrence::Monthly);
    }
}
