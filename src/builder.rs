//! Constraint model builder.
//!
//! Translates one scheduling run (calendar domain, assessors, programs,
//! goals, closures) into a [`CpModel`]: one binary decision per valid
//! (date, program, role, assessor) tuple, the business rules as linear and
//! reified constraints, and the weighted minimization objective.
//!
//! A variable exists only when the role belongs to the program, the
//! assessor is capability-eligible for the role, and the assessor's program
//! list contains the program. Every constraint sums over existing variables
//! only, so tuples without an eligible assessor simply have no decision.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::{
    Assessor, CalendarDomain, Program, ProgramGoals, Role, EXTERNAL_ASSESSOR,
};
use crate::solver::{BoolVar, CpModel, IntVar, VarRef};

/// The one person whose recurring Friday blackout spares curious slots.
///
/// Policy quirk, deliberately kept as an isolated constant rather than a
/// generalized per-assessor override table.
pub const FRIDAY_CURIOUS_OVERRIDE: &str = "Laetitia";

/// Compound key identifying one assignment decision.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssignmentKey {
    pub date: NaiveDate,
    pub program: String,
    pub role: Role,
    pub assessor: String,
}

impl AssignmentKey {
    /// Creates a key.
    pub fn new(
        date: NaiveDate,
        program: impl Into<String>,
        role: Role,
        assessor: impl Into<String>,
    ) -> Self {
        Self {
            date,
            program: program.into(),
            role,
            assessor: assessor.into(),
        }
    }
}

impl fmt::Display for AssignmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.date, self.program, self.role, self.assessor
        )
    }
}

/// A built model: the CP formulation plus the key→variable index the
/// projector reads the solution back through.
#[derive(Debug)]
pub struct ScheduleModel {
    pub cp: CpModel,
    /// Assignment decisions, deterministically ordered.
    pub variables: BTreeMap<AssignmentKey, BoolVar>,
    /// (month, program) → under-goal deviation auxiliary.
    pub deviations: BTreeMap<(u32, String), IntVar>,
}

/// Builds the constraint model for one scheduling run.
pub struct ModelBuilder<'a> {
    calendar: &'a CalendarDomain,
    assessors: &'a [Assessor],
    programs: &'a [Program],
    goals: &'a ProgramGoals,
    office_closures: &'a [NaiveDate],
    enforce_availability: bool,
    goal_weight: f64,
}

impl<'a> ModelBuilder<'a> {
    /// Creates a builder with no closures, availability filtering off, and
    /// a neutral goal weight of 1.0.
    pub fn new(
        calendar: &'a CalendarDomain,
        assessors: &'a [Assessor],
        programs: &'a [Program],
        goals: &'a ProgramGoals,
    ) -> Self {
        Self {
            calendar,
            assessors,
            programs,
            goals,
            office_closures: &[],
            enforce_availability: false,
            goal_weight: 1.0,
        }
    }

    /// Sets the office closure dates.
    pub fn with_office_closures(mut self, closures: &'a [NaiveDate]) -> Self {
        self.office_closures = closures;
        self
    }

    /// Turns per-date availability filtering on or off.
    pub fn with_enforce_availability(mut self, enforce: bool) -> Self {
        self.enforce_availability = enforce;
        self
    }

    /// Sets the goal-deviation weight in the objective.
    pub fn with_goal_weight(mut self, weight: f64) -> Self {
        self.goal_weight = weight;
        self
    }

    /// Emits the full variable and constraint set.
    pub fn build(self) -> ScheduleModel {
        let mut cp = CpModel::new();
        let mut variables: BTreeMap<AssignmentKey, BoolVar> = BTreeMap::new();

        for &date in &self.calendar.dates {
            for program in self.programs {
                for &role in &program.roles {
                    for assessor in self.assessors {
                        let eligible = assessor.programs.iter().any(|p| p == &program.name)
                            && assessor.can_fill(role);
                        if eligible {
                            let key =
                                AssignmentKey::new(date, &program.name, role, &assessor.id);
                            let var = cp.new_bool(key.to_string());
                            variables.insert(key, var);
                        }
                    }
                }
            }
        }

        // Lookup indexes over the created variables.
        let mut by_assessor_day: BTreeMap<(&str, NaiveDate), Vec<(Role, BoolVar)>> =
            BTreeMap::new();
        let mut by_date_program_role: BTreeMap<(NaiveDate, &str, Role), Vec<BoolVar>> =
            BTreeMap::new();
        for (key, &var) in &variables {
            by_assessor_day
                .entry((key.assessor.as_str(), key.date))
                .or_default()
                .push((key.role, var));
            by_date_program_role
                .entry((key.date, key.program.as_str(), key.role))
                .or_default()
                .push(var);
        }
        // No activity on two chronologically adjacent working days (a
        // Friday and the following Monday count as adjacent).
        for assessor in self.assessors {
            if assessor.is_external() {
                continue;
            }
            for (today, tomorrow) in self.calendar.adjacent_pairs() {
                let terms: Vec<(VarRef, i64)> = day_vars(&by_assessor_day, &assessor.id, today)
                    .iter()
                    .chain(day_vars(&by_assessor_day, &assessor.id, tomorrow))
                    .map(|&(_, var)| (VarRef::Bool(var), 1))
                    .collect();
                if terms.len() > 1 {
                    cp.add_linear_le(terms, 1);
                }
            }
        }

        // Each non-paired role is filled at most once per (date, program).
        // The two curious slots run concurrently and are handled by the
        // curious weekday policy below.
        for ((_, _, role), vars) in &by_date_program_role {
            if role.is_curious() || vars.len() < 2 {
                continue;
            }
            let terms = vars.iter().map(|&v| (VarRef::Bool(v), 1)).collect();
            cp.add_linear_le(terms, 1);
        }

        // One activity per assessor per day.
        for assessor in self.assessors {
            if assessor.is_external() {
                continue;
            }
            for &date in &self.calendar.dates {
                let vars = day_vars(&by_assessor_day, &assessor.id, date);
                if vars.len() > 1 {
                    let terms = vars.iter().map(|&(_, v)| (VarRef::Bool(v), 1)).collect();
                    cp.add_linear_le(terms, 1);
                }
            }
        }

        // Session bundling: a multi-role program runs all its roles on a
        // date or none of them.
        for program in self.programs {
            if program.is_curious() || program.roles.len() < 2 {
                continue;
            }
            for &date in &self.calendar.dates {
                let vars: Vec<BoolVar> = program
                    .roles
                    .iter()
                    .filter_map(|&role| {
                        by_date_program_role.get(&(date, program.name.as_str(), role))
                    })
                    .flatten()
                    .copied()
                    .collect();
                if vars.is_empty() {
                    continue;
                }
                let indicator = cp.new_bool(format!("session|{}|{}", date, program.name));
                cp.add_sum_switch(vars, indicator, program.roles.len() as i64, 0);
            }
        }

        // Monthly capacity budget, external included.
        for assessor in self.assessors {
            for (&month, month_dates) in &self.calendar.months {
                let terms: Vec<(VarRef, i64)> = month_dates
                    .iter()
                    .flat_map(|&date| day_vars(&by_assessor_day, &assessor.id, date))
                    .map(|&(role, var)| (VarRef::Bool(var), role.capacity_cost()))
                    .collect();
                if !terms.is_empty() {
                    cp.add_linear_le(terms, assessor.capacity_for(month));
                }
            }
        }

        // Recurring weekday blackouts, with the one named Friday exception.
        for assessor in self.assessors {
            for &weekday in &assessor.weekly_blackout {
                for &date in &self.calendar.dates {
                    if date.weekday() != weekday {
                        continue;
                    }
                    for &(role, var) in day_vars(&by_assessor_day, &assessor.id, date) {
                        let spared = assessor.id == FRIDAY_CURIOUS_OVERRIDE
                            && weekday == Weekday::Fri
                            && role.is_curious();
                        if !spared {
                            cp.fix_zero(var);
                        }
                    }
                }
            }
        }

        // Ad hoc blackout dates, zeroed per tuple for this assessor only.
        for assessor in self.assessors {
            for &date in &assessor.blackout_dates {
                for &(_, var) in day_vars(&by_assessor_day, &assessor.id, date) {
                    cp.fix_zero(var);
                }
            }
        }

        // Office closures zero the whole day for everyone.
        for &closure in self.office_closures {
            for (key, &var) in &variables {
                if key.date == closure {
                    cp.fix_zero(var);
                }
            }
        }

        // Availability filtering: a declared window restricts its activity
        // kind to the listed dates, and an assessor without window data has
        // no available dates at all. External is always available.
        if self.enforce_availability {
            for assessor in self.assessors {
                if assessor.is_external() {
                    continue;
                }
                for &date in &self.calendar.dates {
                    for &(role, var) in day_vars(&by_assessor_day, &assessor.id, date) {
                        let window = if role.is_curious() {
                            assessor.case_availability.as_ref()
                        } else {
                            assessor.assessment_availability.as_ref()
                        };
                        let available = window.is_some_and(|dates| dates.contains(&date));
                        if !available {
                            cp.fix_zero(var);
                        }
                    }
                }
            }
        }

        self.add_curious_weekday_policy(&mut cp, &by_date_program_role);

        // Weekly load: at most two activities, of which at most one may be
        // a full assessment day.
        for (_, week_dates) in &self.calendar.weeks {
            for assessor in self.assessors {
                if assessor.is_external() {
                    continue;
                }
                let mut total = Vec::new();
                let mut non_curious = Vec::new();
                for &date in week_dates {
                    for &(role, var) in day_vars(&by_assessor_day, &assessor.id, date) {
                        total.push((VarRef::Bool(var), 1));
                        if !role.is_curious() {
                            non_curious.push((VarRef::Bool(var), 1));
                        }
                    }
                }
                if total.len() > 2 {
                    cp.add_linear_le(total, 2);
                }
                if non_curious.len() > 1 {
                    cp.add_linear_le(non_curious, 1);
                }
            }
        }

        // Goals: scheduled candidates per (month, program) may not exceed
        // the goal; the shortfall is a bounded auxiliary the objective
        // minimizes. Sessions are counted through the program's anchor role.
        let mut deviations = BTreeMap::new();
        for (&month, month_dates) in &self.calendar.months {
            for program in self.programs {
                let Some(anchor) = program.anchor_role() else {
                    continue;
                };
                let goal = self.goals.goal_for(month, &program.name).max(0);
                let scheduled: Vec<(VarRef, i64)> = month_dates
                    .iter()
                    .filter_map(|&date| {
                        by_date_program_role.get(&(date, program.name.as_str(), anchor))
                    })
                    .flatten()
                    .map(|&v| (VarRef::Bool(v), program.candidates_per_session))
                    .collect();

                cp.add_linear_le(scheduled.clone(), goal);
                let under =
                    cp.new_int(format!("under_goal|{}|{}", month, program.name), 0, goal);
                let mut cover = scheduled;
                cover.push((VarRef::Int(under), 1));
                cp.add_linear_ge(cover, goal);
                cp.minimize_term(VarRef::Int(under), self.goal_weight);
                deviations.insert((month, program.name.clone()), under);
            }
        }

        // Every external assignment costs one unit.
        for (key, &var) in &variables {
            if key.assessor == EXTERNAL_ASSESSOR {
                cp.minimize_term(VarRef::Bool(var), 1.0);
            }
        }

        ScheduleModel {
            cp,
            variables,
            deviations,
        }
    }

    /// Curious weekday policy: none on Wednesday, at most one assignment
    /// per slot per other weekday, and a Tuesday excludes the Thursday two
    /// days later (and vice versa) as a case.
    fn add_curious_weekday_policy(
        &self,
        cp: &mut CpModel,
        by_date_program_role: &BTreeMap<(NaiveDate, &str, Role), Vec<BoolVar>>,
    ) {
        for program in self.programs {
            if !program.is_curious() {
                continue;
            }
            let case_vars = |date: NaiveDate| -> Vec<BoolVar> {
                program
                    .roles
                    .iter()
                    .filter_map(|&role| {
                        by_date_program_role.get(&(date, program.name.as_str(), role))
                    })
                    .flatten()
                    .copied()
                    .collect()
            };

            for &date in &self.calendar.dates {
                match date.weekday() {
                    Weekday::Wed => {
                        for var in case_vars(date) {
                            cp.fix_zero(var);
                        }
                    }
                    _ => {
                        for &role in &program.roles {
                            if let Some(vars) =
                                by_date_program_role.get(&(date, program.name.as_str(), role))
                            {
                                if vars.len() > 1 {
                                    let terms =
                                        vars.iter().map(|&v| (VarRef::Bool(v), 1)).collect();
                                    cp.add_linear_le(terms, 1);
                                }
                            }
                        }
                    }
                }
            }

            // Tuesday/Thursday mutual exclusion per calendar week, via
            // per-day case indicators.
            for &tuesday in &self.calendar.dates {
                if tuesday.weekday() != Weekday::Tue {
                    continue;
                }
                let thursday = tuesday + Duration::days(2);
                if !self.calendar.dates.contains(&thursday) {
                    continue;
                }
                let tue_vars = case_vars(tuesday);
                let thu_vars = case_vars(thursday);
                if tue_vars.is_empty() || thu_vars.is_empty() {
                    continue;
                }

                let mut indicators = Vec::new();
                for (date, vars) in [(tuesday, tue_vars), (thursday, thu_vars)] {
                    let indicator =
                        cp.new_bool(format!("case_day|{}|{}", date, program.name));
                    // Any slot assignment on the day switches the indicator on.
                    let mut terms: Vec<(VarRef, i64)> =
                        vars.into_iter().map(|v| (VarRef::Bool(v), 1)).collect();
                    terms.push((VarRef::Bool(indicator), -2));
                    cp.add_linear_le(terms, 0);
                    indicators.push(indicator);
                }
                let terms = indicators.into_iter().map(|v| (VarRef::Bool(v), 1)).collect();
                cp.add_linear_le(terms, 1);
            }
        }
    }
}

/// Decisions of one assessor on one day, empty when none exist.
fn day_vars<'m, 'k>(
    map: &'m BTreeMap<(&'k str, NaiveDate), Vec<(Role, BoolVar)>>,
    assessor: &'k str,
    date: NaiveDate,
) -> &'m [(Role, BoolVar)] {
    map.get(&(assessor, date)).map(Vec::as_slice).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Capability;
    use crate::solver::{BranchBoundSolver, CpSolution, CpSolver, SolveStatus, SolverConfig};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn full_assessor(id: &str, program: &str) -> Assessor {
        Assessor::new(id)
            .with_capability(Capability::Roleplay)
            .with_capability(Capability::Case)
            .with_capability(Capability::Papi)
            .with_capability(Capability::Curious)
            .with_data_qualified(true)
            .with_program(program)
            .with_uniform_capacity(100)
    }

    fn curious_assessor(id: &str) -> Assessor {
        Assessor::new(id)
            .with_capability(Capability::Curious)
            .with_program("Curious")
            .with_uniform_capacity(100)
    }

    fn solve(model: &ScheduleModel) -> CpSolution {
        BranchBoundSolver::new().solve(&model.cp, &SolverConfig::default())
    }

    fn assigned_keys<'m>(
        model: &'m ScheduleModel,
        solution: &CpSolution,
    ) -> Vec<&'m AssignmentKey> {
        model
            .variables
            .iter()
            .filter(|&(_, &var)| solution.value(var))
            .map(|(key, _)| key)
            .collect()
    }

    #[test]
    fn test_variables_respect_capability_eligibility() {
        // 2025-01-06 is a Monday
        let calendar = CalendarDomain::build(date(2025, 1, 6), date(2025, 1, 6));
        let assessors = vec![Assessor::new("Rp")
            .with_capability(Capability::Roleplay)
            .with_program("Apex")];
        let programs = vec![Program::standard("Apex")];
        let goals = ProgramGoals::new();

        let model = ModelBuilder::new(&calendar, &assessors, &programs, &goals).build();
        // Only the roleplay seat gets a variable
        assert_eq!(model.variables.len(), 1);
        let key = model.variables.keys().next().unwrap();
        assert_eq!(key.role, Role::Roleplay);
    }

    #[test]
    fn test_no_variables_for_unlisted_program() {
        let calendar = CalendarDomain::build(date(2025, 1, 6), date(2025, 1, 6));
        let assessors = vec![full_assessor("Ines", "Other")];
        let programs = vec![Program::standard("Apex")];
        let goals = ProgramGoals::new();

        let model = ModelBuilder::new(&calendar, &assessors, &programs, &goals).build();
        assert!(model.variables.is_empty());
    }

    #[test]
    fn test_data_case_needs_qualification() {
        let calendar = CalendarDomain::build(date(2025, 1, 6), date(2025, 1, 6));
        let assessors = vec![Assessor::new("A")
            .with_capability(Capability::Case)
            .with_data_qualified(false)
            .with_program("Quant")];
        let programs = vec![Program::data("Quant")];
        let goals = ProgramGoals::new();

        let model = ModelBuilder::new(&calendar, &assessors, &programs, &goals).build();
        // Business-case capability alone does not open the data-case seat
        assert!(model.variables.is_empty());
    }

    #[test]
    fn test_bundled_session_is_all_or_nothing() {
        let calendar = CalendarDomain::build(date(2025, 1, 6), date(2025, 1, 10));
        let assessors = vec![
            full_assessor("Ines", "Apex"),
            full_assessor("Bram", "Apex"),
            full_assessor("Carla", "Apex"),
        ];
        let programs = vec![Program::standard("Apex")];
        let goals = ProgramGoals::new().with_goal(1, "Apex", 3);

        let model = ModelBuilder::new(&calendar, &assessors, &programs, &goals)
            .with_goal_weight(2.0)
            .build();
        let solution = solve(&model);

        assert_eq!(solution.status, SolveStatus::Optimal);
        let assigned = assigned_keys(&model, &solution);
        // One full session: every role staffed, on a single date
        assert_eq!(assigned.len(), 3);
        let first_date = assigned[0].date;
        assert!(assigned.iter().all(|k| k.date == first_date));
        let mut roles: Vec<Role> = assigned.iter().map(|k| k.role).collect();
        roles.sort();
        assert_eq!(roles, vec![Role::Roleplay, Role::BusinessCase, Role::Papi]);
        // Goal met, nothing to pay
        assert_eq!(solution.objective, 0.0);
    }

    #[test]
    fn test_zero_goal_blocks_scheduling() {
        let calendar = CalendarDomain::build(date(2025, 1, 6), date(2025, 1, 10));
        let assessors = vec![
            full_assessor("Ines", "Apex"),
            full_assessor("Bram", "Apex"),
            full_assessor("Carla", "Apex"),
        ];
        let programs = vec![Program::standard("Apex")];
        let goals = ProgramGoals::new(); // nothing wanted

        let model = ModelBuilder::new(&calendar, &assessors, &programs, &goals).build();
        let solution = solve(&model);

        assert_eq!(solution.status, SolveStatus::Optimal);
        assert!(assigned_keys(&model, &solution).is_empty());
    }

    #[test]
    fn test_consecutive_day_exclusivity() {
        // Monday and Tuesday only
        let calendar = CalendarDomain::build(date(2025, 1, 6), date(2025, 1, 7));
        let assessors = vec![curious_assessor("Ines")];
        let programs = vec![Program::curious("Curious")];
        let goals = ProgramGoals::new().with_goal(1, "Curious", 2);

        let model = ModelBuilder::new(&calendar, &assessors, &programs, &goals)
            .with_goal_weight(5.0)
            .build();
        let solution = solve(&model);

        assert_eq!(solution.status, SolveStatus::Optimal);
        // She can work one of the two adjacent days, not both
        assert_eq!(assigned_keys(&model, &solution).len(), 1);
        let under = model.deviations[&(1, "Curious".to_string())];
        assert_eq!(solution.int_values[under], 1);
    }

    #[test]
    fn test_external_exempt_from_consecutive_days() {
        let calendar = CalendarDomain::build(date(2025, 1, 6), date(2025, 1, 7));
        let assessors = vec![curious_assessor(EXTERNAL_ASSESSOR)];
        let programs = vec![Program::curious("Curious")];
        let goals = ProgramGoals::new().with_goal(1, "Curious", 4);

        let model = ModelBuilder::new(&calendar, &assessors, &programs, &goals)
            .with_goal_weight(2.0)
            .build();
        let solution = solve(&model);

        assert_eq!(solution.status, SolveStatus::Optimal);
        let assigned = assigned_keys(&model, &solution);
        // Goal counting is per case day (anchor slot): the optimum staffs
        // slot 1 on both days and leaves slot 2 alone.
        assert_eq!(assigned.len(), 2);
        assert!(assigned.iter().all(|k| k.role == Role::CuriousSlot1));
        let under = model.deviations[&(1, "Curious".to_string())];
        assert_eq!(solution.int_values[under], 2);
        // Two external units plus two weighted deviation units
        assert!((solution.objective - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_curious_on_wednesday() {
        // 2025-01-08 is a Wednesday
        let calendar = CalendarDomain::build(date(2025, 1, 8), date(2025, 1, 8));
        let assessors = vec![curious_assessor("Ines")];
        let programs = vec![Program::curious("Curious")];
        let goals = ProgramGoals::new().with_goal(1, "Curious", 1);

        let model = ModelBuilder::new(&calendar, &assessors, &programs, &goals).build();
        let solution = solve(&model);

        assert_eq!(solution.status, SolveStatus::Optimal);
        assert!(assigned_keys(&model, &solution).is_empty());
        let under = model.deviations[&(1, "Curious".to_string())];
        assert_eq!(solution.int_values[under], 1);
    }

    #[test]
    fn test_tuesday_thursday_mutual_exclusion() {
        // Full week Mon 2025-01-06 .. Fri 2025-01-10
        let calendar = CalendarDomain::build(date(2025, 1, 6), date(2025, 1, 10));
        let assessors = vec![curious_assessor(EXTERNAL_ASSESSOR)];
        let programs = vec![Program::curious("Curious")];
        let goals = ProgramGoals::new().with_goal(1, "Curious", 10);

        let model = ModelBuilder::new(&calendar, &assessors, &programs, &goals)
            .with_goal_weight(3.0)
            .build();
        let solution = solve(&model);

        assert_eq!(solution.status, SolveStatus::Optimal);
        let assigned = assigned_keys(&model, &solution);
        let tuesday_used = assigned.iter().any(|k| k.date == date(2025, 1, 7));
        let thursday_used = assigned.iter().any(|k| k.date == date(2025, 1, 9));
        assert!(!(tuesday_used && thursday_used));
        // Monday and Friday case days are still available
        assert!(assigned.iter().any(|k| k.date == date(2025, 1, 6)));
        assert!(assigned.iter().any(|k| k.date == date(2025, 1, 10)));
    }

    #[test]
    fn test_monthly_capacity_ceiling() {
        // Monday and Thursday, same week (not adjacent working days)
        let calendar = CalendarDomain::build(date(2025, 1, 6), date(2025, 1, 9));
        // Capacity 3 pays for exactly one curious case
        let mut assessor = curious_assessor("Ines");
        assessor.monthly_capacity.insert(1, 3);
        let assessors = vec![assessor];
        let programs = vec![Program::curious("Curious")];
        let goals = ProgramGoals::new().with_goal(1, "Curious", 2);

        let model = ModelBuilder::new(&calendar, &assessors, &programs, &goals)
            .with_goal_weight(5.0)
            .build();
        let solution = solve(&model);

        assert_eq!(solution.status, SolveStatus::Optimal);
        assert_eq!(assigned_keys(&model, &solution).len(), 1);
    }

    #[test]
    fn test_weekly_blackout_blocks_everything() {
        // 2025-01-10 is a Friday
        let calendar = CalendarDomain::build(date(2025, 1, 10), date(2025, 1, 10));
        let assessors = vec![curious_assessor("Bram").with_weekly_blackout(Weekday::Fri)];
        let programs = vec![Program::curious("Curious")];
        let goals = ProgramGoals::new().with_goal(1, "Curious", 1);

        let model = ModelBuilder::new(&calendar, &assessors, &programs, &goals).build();
        let solution = solve(&model);

        assert_eq!(solution.status, SolveStatus::Optimal);
        assert!(assigned_keys(&model, &solution).is_empty());
    }

    #[test]
    fn test_friday_override_spares_curious_slots() {
        let calendar = CalendarDomain::build(date(2025, 1, 10), date(2025, 1, 10));
        let assessors = vec![full_assessor(FRIDAY_CURIOUS_OVERRIDE, "Curious")
            .with_program("Apex")
            .with_weekly_blackout(Weekday::Fri)];
        let programs = vec![Program::curious("Curious"), Program::standard("Apex")];
        let goals = ProgramGoals::new()
            .with_goal(1, "Curious", 1)
            .with_goal(1, "Apex", 3);

        let model = ModelBuilder::new(&calendar, &assessors, &programs, &goals)
            .with_goal_weight(1.0)
            .build();
        let solution = solve(&model);

        assert_eq!(solution.status, SolveStatus::Optimal);
        let assigned = assigned_keys(&model, &solution);
        // The Friday blackout still allows a curious slot, nothing else
        assert_eq!(assigned.len(), 1);
        assert!(assigned[0].role.is_curious());
    }

    #[test]
    fn test_office_closure_blocks_the_day() {
        let calendar = CalendarDomain::build(date(2025, 1, 6), date(2025, 1, 7));
        let assessors = vec![curious_assessor("Ines")];
        let programs = vec![Program::curious("Curious")];
        let goals = ProgramGoals::new().with_goal(1, "Curious", 1);
        let closures = vec![date(2025, 1, 6)];

        let model = ModelBuilder::new(&calendar, &assessors, &programs, &goals)
            .with_office_closures(&closures)
            .build();
        let solution = solve(&model);

        assert_eq!(solution.status, SolveStatus::Optimal);
        let assigned = assigned_keys(&model, &solution);
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].date, date(2025, 1, 7)); // pushed off the closed Monday
    }

    #[test]
    fn test_availability_filtering_when_enforced() {
        let calendar = CalendarDomain::build(date(2025, 1, 6), date(2025, 1, 7));
        let assessors = vec![curious_assessor("Ines")
            .with_case_availability([date(2025, 1, 7)])];
        let programs = vec![Program::curious("Curious")];
        let goals = ProgramGoals::new().with_goal(1, "Curious", 1);

        let model = ModelBuilder::new(&calendar, &assessors, &programs, &goals)
            .with_enforce_availability(true)
            .build();
        let solution = solve(&model);

        assert_eq!(solution.status, SolveStatus::Optimal);
        let assigned = assigned_keys(&model, &solution);
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].date, date(2025, 1, 7));
    }

    #[test]
    fn test_availability_ignored_when_not_enforced() {
        let calendar = CalendarDomain::build(date(2025, 1, 6), date(2025, 1, 6));
        let assessors = vec![curious_assessor("Ines")
            .with_case_availability([date(2025, 1, 7)])]; // not the modeled date
        let programs = vec![Program::curious("Curious")];
        let goals = ProgramGoals::new().with_goal(1, "Curious", 1);

        let model = ModelBuilder::new(&calendar, &assessors, &programs, &goals).build();
        let solution = solve(&model);

        assert_eq!(assigned_keys(&model, &solution).len(), 1);
    }

    #[test]
    fn test_absent_availability_blocks_when_enforced() {
        let calendar = CalendarDomain::build(date(2025, 1, 6), date(2025, 1, 6));
        // No availability windows declared at all
        let assessors = vec![curious_assessor("Ines")];
        let programs = vec![Program::curious("Curious")];
        let goals = ProgramGoals::new().with_goal(1, "Curious", 1);

        let model = ModelBuilder::new(&calendar, &assessors, &programs, &goals)
            .with_enforce_availability(true)
            .build();
        let solution = solve(&model);

        assert_eq!(solution.status, SolveStatus::Optimal);
        assert!(assigned_keys(&model, &solution).is_empty());
        let under = model.deviations[&(1, "Curious".to_string())];
        assert_eq!(solution.int_values[under], 1);
    }

    #[test]
    fn test_external_exempt_from_availability() {
        let calendar = CalendarDomain::build(date(2025, 1, 6), date(2025, 1, 6));
        let assessors = vec![curious_assessor(EXTERNAL_ASSESSOR)];
        let programs = vec![Program::curious("Curious")];
        let goals = ProgramGoals::new().with_goal(1, "Curious", 1);

        let model = ModelBuilder::new(&calendar, &assessors, &programs, &goals)
            .with_enforce_availability(true)
            .with_goal_weight(2.0)
            .build();
        let solution = solve(&model);

        // One external unit beats one weighted deviation unit
        assert_eq!(assigned_keys(&model, &solution).len(), 1);
        assert!((solution.objective - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unreachable_goal_becomes_full_deviation() {
        let calendar = CalendarDomain::build(date(2025, 1, 6), date(2025, 1, 10));
        let assessors: Vec<Assessor> = Vec::new();
        let programs = vec![Program::standard("Apex")];
        let goals = ProgramGoals::new().with_goal(1, "Apex", 9);

        let model = ModelBuilder::new(&calendar, &assessors, &programs, &goals)
            .with_goal_weight(2.0)
            .build();
        let solution = solve(&model);

        assert_eq!(solution.status, SolveStatus::Optimal);
        assert!(model.variables.is_empty());
        let under = model.deviations[&(1, "Apex".to_string())];
        assert_eq!(solution.int_values[under], 9);
        assert!((solution.objective - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_load_limits() {
        // Two full weeks
        let calendar = CalendarDomain::build(date(2025, 1, 6), date(2025, 1, 17));
        let assessors = vec![curious_assessor("Ines")];
        let programs = vec![Program::curious("Curious")];
        let goals = ProgramGoals::new().with_goal(1, "Curious", 8);

        let model = ModelBuilder::new(&calendar, &assessors, &programs, &goals)
            .with_goal_weight(5.0)
            .build();
        let solution = solve(&model);

        assert_eq!(solution.status, SolveStatus::Optimal);
        let assigned = assigned_keys(&model, &solution);
        for week in [2u32, 3] {
            let in_week = assigned
                .iter()
                .filter(|k| k.date.iso_week().week() == week)
                .count();
            assert!(in_week <= 2);
        }
    }

    #[test]
    fn test_assignment_key_ordering_is_date_first() {
        let a = AssignmentKey::new(date(2025, 1, 6), "B", Role::Papi, "Z");
        let b = AssignmentKey::new(date(2025, 1, 7), "A", Role::Roleplay, "A");
        assert!(a < b);
    }

    #[test]
    fn test_assignment_key_serde_round_trip() {
        let key = AssignmentKey::new(date(2025, 1, 6), "Apex", Role::Papi, "Ines");
        let json = serde_json::to_string(&key).unwrap();
        let back: AssignmentKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);
    }
}
