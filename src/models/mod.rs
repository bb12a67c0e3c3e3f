//! Scheduling domain models.
//!
//! Core data types for one scheduling run: who can assess
//! ([`Assessor`]), what gets assessed ([`Program`], [`Role`]), when work
//! can happen ([`CalendarDomain`], [`TimeSlotTable`]), and how much of it
//! is wanted ([`ProgramGoals`]).

mod activity;
mod assessor;
mod calendar;
mod program;

pub use activity::{Capability, Role, TimeSlot, TimeSlotTable};
pub use assessor::{Assessor, EXTERNAL_ASSESSOR};
pub use calendar::{is_working_day, month_name, CalendarDomain};
pub use program::{Program, ProgramGoals};
