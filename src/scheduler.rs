//! Run orchestration.
//!
//! [`Scheduler::run`] wires one request through the pipeline: sanitize and
//! validate the input, derive the calendar domain, build the constraint
//! model, solve under a range-proportional time budget, and project the
//! result. Infeasibility comes back as a status inside the outcome; only
//! malformed input is an error.

use std::time::Duration;

use chrono::NaiveDate;

use crate::builder::ModelBuilder;
use crate::models::{Assessor, CalendarDomain, Program, ProgramGoals, TimeSlotTable};
use crate::projector::{project, ScheduleOutcome};
use crate::solver::{CpSolver, SolverConfig};
use crate::validation::{sanitize_assessors, validate_input, ValidationError};

/// Everything one scheduling run needs.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub assessors: Vec<Assessor>,
    pub programs: Vec<Program>,
    pub goals: ProgramGoals,
    pub office_closures: Vec<NaiveDate>,
    pub enforce_availability: bool,
    pub goal_weight: f64,
    pub slots: TimeSlotTable,
}

impl ScheduleRequest {
    /// Creates a request for a date range, with no participants yet,
    /// availability filtering off, and a neutral goal weight.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            assessors: Vec::new(),
            programs: Vec::new(),
            goals: ProgramGoals::new(),
            office_closures: Vec::new(),
            enforce_availability: false,
            goal_weight: 1.0,
            slots: TimeSlotTable::default(),
        }
    }

    /// Sets the assessors.
    pub fn with_assessors(mut self, assessors: Vec<Assessor>) -> Self {
        self.assessors = assessors;
        self
    }

    /// Sets the programs.
    pub fn with_programs(mut self, programs: Vec<Program>) -> Self {
        self.programs = programs;
        self
    }

    /// Sets the monthly goals.
    pub fn with_goals(mut self, goals: ProgramGoals) -> Self {
        self.goals = goals;
        self
    }

    /// Sets the office closure dates.
    pub fn with_office_closures(mut self, closures: Vec<NaiveDate>) -> Self {
        self.office_closures = closures;
        self
    }

    /// Turns per-date availability filtering on or off.
    pub fn with_enforce_availability(mut self, enforce: bool) -> Self {
        self.enforce_availability = enforce;
        self
    }

    /// Sets the goal-deviation weight (sensible range 0 to 3).
    pub fn with_goal_weight(mut self, weight: f64) -> Self {
        self.goal_weight = weight;
        self
    }
}

/// Wall-clock solve budget for a date range: a two-minute floor plus two
/// seconds per calendar day.
pub fn time_budget(start: NaiveDate, end: NaiveDate) -> Duration {
    let days = (end - start).num_days().max(0) as u64;
    Duration::from_secs(120 + 2 * days)
}

/// Runs scheduling requests against a pluggable solving engine.
pub struct Scheduler;

impl Scheduler {
    /// Executes one request end to end.
    pub fn run(
        request: &ScheduleRequest,
        engine: &dyn CpSolver,
    ) -> Result<ScheduleOutcome, ValidationError> {
        let calendar = CalendarDomain::build(request.start, request.end);
        let assessors =
            sanitize_assessors(request.assessors.clone(), &request.programs, &calendar);
        validate_input(&assessors, &request.programs)?;

        let model = ModelBuilder::new(&calendar, &assessors, &request.programs, &request.goals)
            .with_office_closures(&request.office_closures)
            .with_enforce_availability(request.enforce_availability)
            .with_goal_weight(request.goal_weight)
            .build();
        log::info!(
            "built model: {} working days, {} decisions, {} constraints",
            calendar.len(),
            model.cp.bool_count(),
            model.cp.constraint_count()
        );

        let config = SolverConfig::with_budget(time_budget(request.start, request.end));
        let solution = engine.solve(&model.cp, &config);
        log::info!(
            "solve finished: {:?}, objective {}",
            solution.status,
            solution.objective
        );

        Ok(project(
            &solution,
            &model,
            &calendar,
            &assessors,
            &request.programs,
            &request.goals,
            &request.slots,
        ))
    }
}
