//! Assessor-to-activity scheduling over a working-day calendar.
//!
//! Given a date range, a pool of assessors, the assessment programs they
//! may staff, and monthly candidate goals, this crate formulates the
//! scheduling problem as a constraint model, solves it through a pluggable
//! engine under a wall-clock budget, and projects the solution into a
//! schedule plus capacity and goal-attainment reports.
//!
//! # Pipeline
//!
//! 1. [`models::CalendarDomain`] derives working dates and their ISO-week
//!    and month groupings from the range.
//! 2. [`builder::ModelBuilder`] emits one binary decision per eligible
//!    (date, program, role, assessor) tuple and the business rules as
//!    constraints: day/consecutive-day/weekly exclusivity, session
//!    bundling, monthly capacity, blackouts, closures, availability
//!    windows, the curious weekday policy, and goal ceilings.
//! 3. A [`solver::CpSolver`] engine minimizes external-assessor usage plus
//!    weighted goal shortfall; [`solver::BranchBoundSolver`] is the
//!    built-in engine.
//! 4. [`projector::project`] turns the solution into records, reports, and
//!    a narrative. Infeasibility is an outcome, not an error.
//!
//! # Example
//!
//! ```
//! use assessment_scheduler::models::{Assessor, Capability, Program, ProgramGoals};
//! use assessment_scheduler::scheduler::{ScheduleRequest, Scheduler};
//! use assessment_scheduler::solver::BranchBoundSolver;
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
//! let end = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
//!
//! let request = ScheduleRequest::new(start, end)
//!     .with_assessors(vec![Assessor::new("Ines")
//!         .with_capability(Capability::Curious)
//!         .with_program("Curious")
//!         .with_uniform_capacity(10)])
//!     .with_programs(vec![Program::curious("Curious")])
//!     .with_goals(ProgramGoals::new().with_goal(1, "Curious", 1))
//!     .with_goal_weight(2.0);
//!
//! let outcome = Scheduler::run(&request, &BranchBoundSolver::new()).unwrap();
//! assert!(outcome.records.len() <= 1);
//! ```

pub mod builder;
pub mod export;
pub mod models;
pub mod projector;
pub mod scheduler;
pub mod solver;
pub mod validation;

pub use builder::{AssignmentKey, ModelBuilder, ScheduleModel};
pub use export::{should_export, InviteExporter, DEFAULT_EXPORT_THRESHOLD};
pub use models::{Assessor, CalendarDomain, Program, ProgramGoals, Role, TimeSlotTable};
pub use projector::{project, ScheduleOutcome};
pub use scheduler::{ScheduleRequest, Scheduler};
pub use solver::{BranchBoundSolver, CpSolver, SolveStatus, SolverConfig};
pub use validation::ValidationError;
