//! Assessment programs and monthly goals.
//!
//! A program is an ordered list of roles making up one full assessment
//! session, plus a multiplier converting session counts to candidate
//! counts. The curious program is the single-slot-pair exception: its
//! "session" is one case, its multiplier is 1, and bundling does not apply.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::activity::Role;

/// An assessment program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// Program name (as referenced by assessor eligibility lists).
    pub name: String,
    /// Roles required for one full session, in order. The first role is the
    /// anchor used for session counting.
    pub roles: Vec<Role>,
    /// Candidates served by one session.
    pub candidates_per_session: i64,
}

impl Program {
    /// Creates a program with an explicit role list.
    pub fn new(
        name: impl Into<String>,
        roles: Vec<Role>,
        candidates_per_session: i64,
    ) -> Self {
        Self {
            name: name.into(),
            roles,
            candidates_per_session,
        }
    }

    /// Standard session: roleplay, business case, PAPI; 3 candidates.
    pub fn standard(name: impl Into<String>) -> Self {
        Self::new(name, vec![Role::Roleplay, Role::BusinessCase, Role::Papi], 3)
    }

    /// Data variant: the business case is replaced by a data case.
    pub fn data(name: impl Into<String>) -> Self {
        Self::new(name, vec![Role::Roleplay, Role::DataCase, Role::Papi], 3)
    }

    /// The curious program: two concurrent slots, counted per case.
    pub fn curious(name: impl Into<String>) -> Self {
        Self::new(name, vec![Role::CuriousSlot1, Role::CuriousSlot2], 1)
    }

    /// Whether every role in this program is a curious slot.
    pub fn is_curious(&self) -> bool {
        !self.roles.is_empty() && self.roles.iter().all(|r| r.is_curious())
    }

    /// The anchor role used to count sessions (first in the list).
    pub fn anchor_role(&self) -> Option<Role> {
        self.roles.first().copied()
    }
}

/// Monthly candidate goals per program.
///
/// Goals are candidates for session programs and cases for the curious
/// program. An absent entry reads as 0, which the model treats as "do not
/// schedule this program that month".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramGoals {
    goals: BTreeMap<u32, BTreeMap<String, i64>>,
}

impl ProgramGoals {
    /// Creates an empty goal table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the goal for one (month, program) cell.
    pub fn set(&mut self, month: u32, program: impl Into<String>, goal: i64) {
        self.goals.entry(month).or_default().insert(program.into(), goal);
    }

    /// Builder: sets a goal and returns self.
    pub fn with_goal(mut self, month: u32, program: impl Into<String>, goal: i64) -> Self {
        self.set(month, program, goal);
        self
    }

    /// Goal for a (month, program) cell; 0 when unset.
    pub fn goal_for(&self, month: u32, program: &str) -> i64 {
        self.goals
            .get(&month)
            .and_then(|m| m.get(program))
            .copied()
            .unwrap_or(0)
    }
}
