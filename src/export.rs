//! Calendar-invite export boundary.
//!
//! The crate does not write invite files itself; [`InviteExporter`] is the
//! seam a delivery backend plugs into. Exports are gated on schedule
//! quality: a run that attained less than [`DEFAULT_EXPORT_THRESHOLD`]
//! percent of its credit-weighted goals is not worth inviting people to.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::projector::{GoalSummary, ScheduleOutcome, ScheduleRecord};

/// Minimum overall goal attainment (percent) before invites go out.
pub const DEFAULT_EXPORT_THRESHOLD: f64 = 90.0;

/// Errors from a delivery backend.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no contact information for assessor `{0}`")]
    MissingContact(String),
    #[error("export backend failed: {0}")]
    Backend(String),
}

/// A calendar-invite delivery backend.
pub trait InviteExporter {
    /// Delivers invites for the given records, one per assignment.
    ///
    /// `contacts` maps assessor ids to delivery addresses.
    fn export(
        &mut self,
        records: &[ScheduleRecord],
        contacts: &BTreeMap<String, String>,
    ) -> Result<(), ExportError>;
}

/// Whether a run's attainment clears the export threshold.
pub fn should_export(summary: &GoalSummary, threshold: f64) -> bool {
    summary.overall_pct >= threshold
}

/// Exports an outcome when it clears the threshold and has records.
///
/// Returns whether the exporter was invoked.
pub fn export_if_attained(
    exporter: &mut dyn InviteExporter,
    outcome: &ScheduleOutcome,
    contacts: &BTreeMap<String, String>,
    threshold: f64,
) -> Result<bool, ExportError> {
    if outcome.records.is_empty() || !should_export(&outcome.goal_report.summary, threshold) {
        return Ok(false);
    }
    exporter.export(&outcome.records, contacts)?;
    Ok(true)
}
