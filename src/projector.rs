//! Solution projection into schedule and report views.
//!
//! Reads a solved assignment back through the model's key index and turns
//! it into the three consumer-facing views: the chronological schedule, the
//! per-month capacity usage breakdown, and the goal-attainment report with
//! its credit-weighted summary. Also renders the human-readable narrative.
//!
//! Infeasible or empty outcomes project to empty collections and a sentinel
//! narrative; projection itself never fails.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::builder::ScheduleModel;
use crate::models::{Assessor, CalendarDomain, Program, ProgramGoals, Role, TimeSlot, TimeSlotTable};
use crate::solver::{CpSolution, SolveStatus};

/// Narrative used when the engine produced no assignment.
pub const NO_SOLUTION_NARRATIVE: &str = "No solution found.\n";

/// Credit weight of one curious case in the attainment summary.
const CURIOUS_CREDITS: f64 = 6.0;
/// Credit weight of one full assessment session (5 + 5 + 9).
const SESSION_CREDITS: f64 = 19.0;

/// One scheduled assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub program: String,
    pub role: Role,
    pub capacity_cost: i64,
    pub assessor: String,
}

/// Capacity usage of one assessor in one month.
///
/// Assessors without any assignment that month still get a row, with all
/// costs at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityUsageRow {
    pub month: u32,
    pub assessor: String,
    pub curious_case: i64,
    pub papi: i64,
    pub roleplay: i64,
    pub business_case: i64,
    pub data_case: i64,
    pub total_cost: i64,
    pub total_capacity: i64,
    pub remaining: i64,
}

/// Goal attainment of one program in one month, in session units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalComparisonRow {
    pub month: u32,
    pub program: String,
    pub initial_goal: f64,
    pub final_scheduled: f64,
    pub difference: f64,
}

/// Credit-weighted attainment percentages across the whole run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalSummary {
    pub overall_pct: f64,
    pub curious_pct: f64,
    pub non_curious_pct: f64,
}

/// Goal report: per-(month, program) rows plus the summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalReport {
    pub rows: Vec<GoalComparisonRow>,
    pub summary: GoalSummary,
}

/// Everything one scheduling run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    pub status: SolveStatus,
    pub records: Vec<ScheduleRecord>,
    pub capacity_usage: Vec<CapacityUsageRow>,
    pub goal_report: GoalReport,
    pub narrative: String,
}

/// Projects a solve result into the consumer-facing views.
#[allow(clippy::too_many_arguments)]
pub fn project(
    solution: &CpSolution,
    model: &ScheduleModel,
    calendar: &CalendarDomain,
    assessors: &[Assessor],
    programs: &[Program],
    goals: &ProgramGoals,
    slots: &TimeSlotTable,
) -> ScheduleOutcome {
    if !solution.is_solution_found() {
        return ScheduleOutcome {
            status: solution.status,
            records: Vec::new(),
            capacity_usage: Vec::new(),
            goal_report: GoalReport::default(),
            narrative: NO_SOLUTION_NARRATIVE.to_string(),
        };
    }

    let records = collect_records(solution, model, slots);
    let narrative = render_narrative(&records, calendar, programs);
    let capacity_usage = capacity_usage(&records, assessors);
    let goal_report = goal_report(&records, calendar, programs, goals);

    ScheduleOutcome {
        status: solution.status,
        records,
        capacity_usage,
        goal_report,
        narrative,
    }
}

fn collect_records(
    solution: &CpSolution,
    model: &ScheduleModel,
    slots: &TimeSlotTable,
) -> Vec<ScheduleRecord> {
    // The key index is date-first, so iteration order is chronological.
    model
        .variables
        .iter()
        .filter(|&(_, &var)| solution.value(var))
        .filter_map(|(key, _)| {
            let time_slot = slots.slot_for(key.role, key.date.weekday())?;
            Some(ScheduleRecord {
                date: key.date,
                time_slot,
                program: key.program.clone(),
                role: key.role,
                capacity_cost: key.role.capacity_cost(),
                assessor: key.assessor.clone(),
            })
        })
        .collect()
}

fn render_narrative(
    records: &[ScheduleRecord],
    calendar: &CalendarDomain,
    programs: &[Program],
) -> String {
    let candidates: BTreeMap<&str, i64> = programs
        .iter()
        .map(|p| (p.name.as_str(), p.candidates_per_session))
        .collect();

    let mut text = String::new();
    for &date in &calendar.dates {
        let _ = writeln!(text, "Date: {date}");
        for record in records.iter().filter(|r| r.date == date) {
            if record.role.is_curious() {
                let _ = writeln!(
                    text,
                    "Curious case scheduled with {} at {}",
                    record.assessor, record.time_slot
                );
            } else {
                let count = candidates.get(record.program.as_str()).copied().unwrap_or(1);
                let _ = writeln!(
                    text,
                    "Assessment afternoon scheduled for {} candidates with {} assigned to {} at {}",
                    count, record.assessor, record.role, record.time_slot
                );
            }
        }
    }
    text
}

fn capacity_usage(records: &[ScheduleRecord], assessors: &[Assessor]) -> Vec<CapacityUsageRow> {
    let by_id: BTreeMap<&str, &Assessor> =
        assessors.iter().map(|a| (a.id.as_str(), a)).collect();

    let mut rows: BTreeMap<(u32, &str), CapacityUsageRow> = BTreeMap::new();
    for record in records {
        let month = record.date.month();
        let row = rows
            .entry((month, record.assessor.as_str()))
            .or_insert_with(|| zero_row(month, &record.assessor, by_id.get(record.assessor.as_str())));
        match record.role {
            Role::CuriousSlot1 | Role::CuriousSlot2 => row.curious_case += record.capacity_cost,
            Role::Papi => row.papi += record.capacity_cost,
            Role::Roleplay => row.roleplay += record.capacity_cost,
            Role::BusinessCase => row.business_case += record.capacity_cost,
            Role::DataCase => row.data_case += record.capacity_cost,
        }
        row.total_cost += record.capacity_cost;
        row.remaining = row.total_capacity - row.total_cost;
    }

    // Idle assessors still show up, with zero usage, in every month that
    // saw any scheduling at all.
    let active_months: BTreeSet<u32> = records.iter().map(|r| r.date.month()).collect();
    for month in active_months {
        for assessor in assessors {
            rows.entry((month, assessor.id.as_str()))
                .or_insert_with(|| zero_row(month, &assessor.id, Some(&assessor)));
        }
    }

    let mut rows: Vec<CapacityUsageRow> = rows.into_values().collect();
    rows.sort_by(|a, b| {
        a.month
            .cmp(&b.month)
            .then(b.total_cost.cmp(&a.total_cost))
            .then(a.assessor.cmp(&b.assessor))
    });
    rows
}

fn zero_row(month: u32, assessor: &str, info: Option<&&Assessor>) -> CapacityUsageRow {
    let total_capacity = info.map(|a| a.capacity_for(month)).unwrap_or(0);
    CapacityUsageRow {
        month,
        assessor: assessor.to_string(),
        curious_case: 0,
        papi: 0,
        roleplay: 0,
        business_case: 0,
        data_case: 0,
        total_cost: 0,
        total_capacity,
        remaining: total_capacity,
    }
}

fn goal_report(
    records: &[ScheduleRecord],
    calendar: &CalendarDomain,
    programs: &[Program],
    goals: &ProgramGoals,
) -> GoalReport {
    let mut rows = Vec::new();
    let mut initial_curious = 0.0;
    let mut final_curious = 0.0;
    let mut initial_sessions = 0.0;
    let mut final_sessions = 0.0;

    for (&month, month_dates) in &calendar.months {
        for program in programs {
            let goal = goals.goal_for(month, &program.name).max(0);
            let scheduled = scheduled_candidates(records, program, month_dates);

            let per_session = program.candidates_per_session.max(1) as f64;
            let initial_goal = goal as f64 / per_session;
            let final_scheduled = scheduled as f64 / per_session;

            let credits = if program.is_curious() {
                CURIOUS_CREDITS
            } else {
                SESSION_CREDITS
            };
            if program.is_curious() {
                initial_curious += initial_goal * credits;
                final_curious += final_scheduled * credits;
            } else {
                initial_sessions += initial_goal * credits;
                final_sessions += final_scheduled * credits;
            }

            // Months without a goal for this program carry no row.
            if goal > 0 {
                rows.push(GoalComparisonRow {
                    month,
                    program: program.name.clone(),
                    initial_goal,
                    final_scheduled,
                    difference: final_scheduled - initial_goal,
                });
            }
        }
    }

    let pct = |done: f64, wanted: f64| if wanted > 0.0 { done / wanted * 100.0 } else { 0.0 };
    let summary = GoalSummary {
        overall_pct: pct(
            final_curious + final_sessions,
            initial_curious + initial_sessions,
        ),
        curious_pct: pct(final_curious, initial_curious),
        non_curious_pct: pct(final_sessions, initial_sessions),
    };

    GoalReport { rows, summary }
}

/// Scheduled candidates for one program over a month's dates.
///
/// Sessions count through the anchor role times the per-session multiplier;
/// a curious day counts once no matter how many of its slots ran.
fn scheduled_candidates(
    records: &[ScheduleRecord],
    program: &Program,
    month_dates: &[NaiveDate],
) -> i64 {
    if program.is_curious() {
        month_dates
            .iter()
            .filter(|&&date| {
                records
                    .iter()
                    .any(|r| r.date == date && r.program == program.name && r.role.is_curious())
            })
            .count() as i64
    } else {
        let Some(anchor) = program.anchor_role() else {
            return 0;
        };
        records
            .iter()
            .filter(|r| {
                r.program == program.name
                    && r.role == anchor
                    && month_dates.contains(&r.date)
            })
            .count() as i64
            * program.candidates_per_session
    }
}
