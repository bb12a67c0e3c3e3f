//! Working-day calendar domain.
//!
//! Derives the scheduling domain from an inclusive date range: the ordered
//! working dates (Monday through Friday), a weekday tag per date, and the
//! ISO-week and calendar-month groupings the constraint model sums over.
//!
//! # Determinism
//! Building the domain is pure: the same range always yields the same
//! ordered dates and the same group contents. A range without working days
//! yields empty groups, never an error.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// The working-day domain for one scheduling run.
///
/// Weeks are keyed by ISO week number and months by calendar month number,
/// so a range spanning a year boundary groups the trailing December days
/// into the same ISO week as the January days they share it with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarDomain {
    /// Working dates in chronological order.
    pub dates: Vec<NaiveDate>,
    /// ISO week number → working dates in that week.
    pub weeks: BTreeMap<u32, Vec<NaiveDate>>,
    /// Calendar month number (1-12) → working dates in that month.
    pub months: BTreeMap<u32, Vec<NaiveDate>>,
}

impl CalendarDomain {
    /// Builds the domain for an inclusive date range.
    ///
    /// Saturdays and Sundays are excluded. An inverted range (end before
    /// start) produces an empty domain.
    pub fn build(start: NaiveDate, end: NaiveDate) -> Self {
        let mut domain = Self::default();

        let mut current = start;
        while current <= end {
            if is_working_day(current) {
                domain.dates.push(current);
                domain
                    .weeks
                    .entry(current.iso_week().week())
                    .or_default()
                    .push(current);
                domain.months.entry(current.month()).or_default().push(current);
            }
            match current.succ_opt() {
                Some(next) => current = next,
                None => break, // end of the calendar
            }
        }

        domain
    }

    /// Whether the range contained no working day.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of working dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Chronologically adjacent working-date pairs.
    ///
    /// A Friday and the following Monday are adjacent here: adjacency is
    /// positional in the working-date list, not a one-calendar-day gap.
    pub fn adjacent_pairs(&self) -> impl Iterator<Item = (NaiveDate, NaiveDate)> + '_ {
        self.dates.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Whether a date falls on Monday through Friday.
pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// English month name for report rows (empty for out-of-range input).
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "",
    }
}
