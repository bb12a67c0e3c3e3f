//! Assessor model.
//!
//! An assessor is a person who can fill assessment roles, subject to
//! capability matching, program eligibility, blackout rules, and a monthly
//! capacity budget. One reserved identity, [`EXTERNAL_ASSESSOR`], stands for
//! outsourced capacity: it is exempt from the per-day, consecutive-day, and
//! weekly-load exclusivity rules and is penalized directly in the objective.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::activity::{Capability, Role};

/// Reserved identity of the external pseudo-assessor.
pub const EXTERNAL_ASSESSOR: &str = "External";

/// A person (or the external pool) who can fill assessment roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessor {
    /// Unique assessor identity.
    pub id: String,
    /// Activity capabilities.
    pub capabilities: Vec<Capability>,
    /// Names of programs this assessor may work on.
    pub programs: Vec<String>,
    /// Qualified to run data cases.
    pub data_qualified: bool,
    /// Member of the HR team.
    pub hr: bool,
    /// Recurring weekday blackouts (e.g. a fixed parental-leave day).
    pub weekly_blackout: Vec<Weekday>,
    /// Ad hoc blackout dates (trainings, leave).
    pub blackout_dates: Vec<NaiveDate>,
    /// Month number → capacity units available that month.
    pub monthly_capacity: BTreeMap<u32, i64>,
    /// Dates free for assessment sessions; `None` when no window data exists.
    pub assessment_availability: Option<BTreeSet<NaiveDate>>,
    /// Dates free for curious cases; `None` when no window data exists.
    pub case_availability: Option<BTreeSet<NaiveDate>>,
}

impl Assessor {
    /// Creates an assessor with no capabilities and empty blackouts.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            capabilities: Vec::new(),
            programs: Vec::new(),
            data_qualified: false,
            hr: false,
            weekly_blackout: Vec::new(),
            blackout_dates: Vec::new(),
            monthly_capacity: BTreeMap::new(),
            assessment_availability: None,
            case_availability: None,
        }
    }

    /// Adds a capability.
    pub fn with_capability(mut self, capability: Capability) -> Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }

    /// Adds an eligible program.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.programs.push(program.into());
        self
    }

    /// Sets the data qualification flag.
    pub fn with_data_qualified(mut self, qualified: bool) -> Self {
        self.data_qualified = qualified;
        self
    }

    /// Sets the HR flag.
    pub fn with_hr(mut self, hr: bool) -> Self {
        self.hr = hr;
        self
    }

    /// Adds a recurring weekday blackout.
    pub fn with_weekly_blackout(mut self, weekday: Weekday) -> Self {
        self.weekly_blackout.push(weekday);
        self
    }

    /// Adds an ad hoc blackout date.
    pub fn with_blackout_date(mut self, date: NaiveDate) -> Self {
        self.blackout_dates.push(date);
        self
    }

    /// Sets the capacity for one month.
    pub fn with_capacity(mut self, month: u32, units: i64) -> Self {
        self.monthly_capacity.insert(month, units);
        self
    }

    /// Sets the same capacity for all twelve months.
    pub fn with_uniform_capacity(mut self, units: i64) -> Self {
        for month in 1..=12 {
            self.monthly_capacity.insert(month, units);
        }
        self
    }

    /// Sets the assessment-availability window.
    pub fn with_assessment_availability(
        mut self,
        dates: impl IntoIterator<Item = NaiveDate>,
    ) -> Self {
        self.assessment_availability = Some(dates.into_iter().collect());
        self
    }

    /// Sets the case-availability window.
    pub fn with_case_availability(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.case_availability = Some(dates.into_iter().collect());
        self
    }

    /// Whether this is the external pseudo-assessor.
    pub fn is_external(&self) -> bool {
        self.id == EXTERNAL_ASSESSOR
    }

    /// Whether this assessor has a capability.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Whether this assessor can fill a role.
    ///
    /// Capability match, plus the data qualification for data cases.
    pub fn can_fill(&self, role: Role) -> bool {
        if !self.has_capability(role.required_capability()) {
            return false;
        }
        match role {
            Role::DataCase => self.data_qualified,
            _ => true,
        }
    }

    /// Capacity units available in a month (0 when undeclared).
    pub fn capacity_for(&self, month: u32) -> i64 {
        self.monthly_capacity.get(&month).copied().unwrap_or(0)
    }
}
