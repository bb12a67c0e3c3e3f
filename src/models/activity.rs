//! Assessment roles and their time slots.
//!
//! A role is the smallest schedulable unit of assessment work: one assessor
//! filling one seat on one date. Each role carries a capacity cost (the load
//! it places on an assessor's monthly budget) and a time slot that is either
//! fixed or depends on the weekday (curious-case slots only).

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An assessor capability, matched against role requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Roleplay,
    Case,
    Papi,
    Curious,
}

/// A schedulable assessment role.
///
/// The two curious slots are a paired exception throughout the model: they
/// run concurrently on the same date, are exempt from session bundling, and
/// follow their own weekday policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Roleplay,
    BusinessCase,
    DataCase,
    Papi,
    CuriousSlot1,
    CuriousSlot2,
}

impl Role {
    /// Load this role places on the assessor's monthly capacity.
    pub fn capacity_cost(self) -> i64 {
        match self {
            Role::CuriousSlot1 | Role::CuriousSlot2 => 3,
            Role::Roleplay | Role::BusinessCase | Role::DataCase => 5,
            Role::Papi => 9,
        }
    }

    /// Whether this role is one of the paired curious-case slots.
    pub fn is_curious(self) -> bool {
        matches!(self, Role::CuriousSlot1 | Role::CuriousSlot2)
    }

    /// Capability an assessor needs for this role.
    ///
    /// `DataCase` additionally requires the data qualification flag; that
    /// check lives on [`crate::models::Assessor::can_fill`].
    pub fn required_capability(self) -> Capability {
        match self {
            Role::Roleplay => Capability::Roleplay,
            Role::BusinessCase | Role::DataCase => Capability::Case,
            Role::Papi => Capability::Papi,
            Role::CuriousSlot1 | Role::CuriousSlot2 => Capability::Curious,
        }
    }

    /// Category label used by the capacity-usage breakdown.
    pub fn category(self) -> &'static str {
        match self {
            Role::Roleplay => "Roleplay",
            Role::BusinessCase => "Business Case",
            Role::DataCase => "Datacase",
            Role::Papi => "PAPI",
            Role::CuriousSlot1 | Role::CuriousSlot2 => "Curious Case",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Roleplay => "Roleplay",
            Role::BusinessCase => "Business Case",
            Role::DataCase => "Datacase",
            Role::Papi => "PAPI",
            Role::CuriousSlot1 => "Curious 1",
            Role::CuriousSlot2 => "Curious 2",
        };
        f.write_str(label)
    }
}

/// A start/end time pair within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    /// Creates a slot from hour/minute pairs.
    ///
    /// Returns `None` for out-of-range clock values.
    pub fn from_hm(start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> Option<Self> {
        Some(Self {
            start: NaiveTime::from_hms_opt(start_h, start_m, 0)?,
            end: NaiveTime::from_hms_opt(end_h, end_m, 0)?,
        })
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Maps each role to its time slot, fixed or weekday-indexed.
///
/// Session roles share one fixed afternoon slot. Curious slots move with
/// the weekday and have no slot at all on Wednesday, matching the weekday
/// policy enforced by the constraint model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotTable {
    session: TimeSlot,
    curious_monday: TimeSlot,
    curious_tuesday: TimeSlot,
    curious_thursday: TimeSlot,
    curious_friday: TimeSlot,
}

impl TimeSlotTable {
    /// Looks up the slot for a role on a weekday.
    ///
    /// Returns `None` for curious slots on days the policy excludes
    /// (Wednesday and weekends).
    pub fn slot_for(&self, role: Role, weekday: Weekday) -> Option<TimeSlot> {
        if !role.is_curious() {
            return Some(self.session);
        }
        match weekday {
            Weekday::Mon => Some(self.curious_monday),
            Weekday::Tue => Some(self.curious_tuesday),
            Weekday::Thu => Some(self.curious_thursday),
            Weekday::Fri => Some(self.curious_friday),
            _ => None,
        }
    }
}

impl Default for TimeSlotTable {
    fn default() -> Self {
        // from_hm only fails on out-of-range clock values; these are literals.
        Self {
            session: TimeSlot::from_hm(12, 0, 16, 0).unwrap_or(TimeSlot {
                start: NaiveTime::MIN,
                end: NaiveTime::MIN,
            }),
            curious_monday: TimeSlot::from_hm(12, 0, 13, 30).unwrap_or(TimeSlot {
                start: NaiveTime::MIN,
                end: NaiveTime::MIN,
            }),
            curious_tuesday: TimeSlot::from_hm(17, 30, 19, 0).unwrap_or(TimeSlot {
                start: NaiveTime::MIN,
                end: NaiveTime::MIN,
            }),
            curious_thursday: TimeSlot::from_hm(17, 30, 19, 0).unwrap_or(TimeSlot {
                start: NaiveTime::MIN,
                end: NaiveTime::MIN,
            }),
            curious_friday: TimeSlot::from_hm(9, 0, 10, 30).unwrap_or(TimeSlot {
                start: NaiveTime::MIN,
                end: NaiveTime::MIN,
            }),
        }
    }
}
