//! CP model and solving-engine boundary.
//!
//! Defines the contract between the constraint model builder and any
//! solving engine: a [`CpModel`] of binary decisions, bounded integer
//! auxiliaries, linear constraints, and a weighted minimization objective;
//! a [`CpSolver`] trait; and the [`CpSolution`] an engine returns. Engines
//! must respect the wall-clock budget in [`SolverConfig`] and hand back the
//! best incumbent found rather than raising.
//!
//! Integer auxiliaries are slack-like by contract: they appear with
//! positive coefficient in lower-bound (`>=`) constraints and in the
//! objective, nowhere else. The bundled [`BranchBoundSolver`] relies on
//! this to finalize them analytically once all binaries are fixed.

mod branch_bound;

pub use branch_bound::BranchBoundSolver;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Index of a binary decision variable.
pub type BoolVar = usize;

/// Index of a bounded integer auxiliary variable.
pub type IntVar = usize;

/// Reference to either kind of variable in a linear term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarRef {
    Bool(BoolVar),
    Int(IntVar),
}

/// Bounded integer auxiliary definition.
#[derive(Debug, Clone)]
pub struct IntVarDef {
    /// Diagnostic name.
    pub name: String,
    /// Inclusive lower bound.
    pub lb: i64,
    /// Inclusive upper bound.
    pub ub: i64,
}

/// A constraint over linear sums of variables.
#[derive(Debug, Clone)]
pub enum CpConstraint {
    /// Σ coeff·var ≤ bound.
    LinearLe { terms: Vec<(VarRef, i64)>, bound: i64 },
    /// Σ coeff·var ≥ bound.
    LinearGe { terms: Vec<(VarRef, i64)>, bound: i64 },
    /// Σ coeff·var = bound.
    LinearEq { terms: Vec<(VarRef, i64)>, bound: i64 },
    /// Reified all-or-nothing: Σ vars = `count_if_on` when the indicator is
    /// set, Σ vars = `count_if_off` when it is not.
    SumSwitch {
        vars: Vec<BoolVar>,
        indicator: BoolVar,
        count_if_on: i64,
        count_if_off: i64,
    },
}

/// A constraint model over binary decisions and integer auxiliaries.
#[derive(Debug, Clone, Default)]
pub struct CpModel {
    bool_names: Vec<String>,
    int_vars: Vec<IntVarDef>,
    constraints: Vec<CpConstraint>,
    objective: Vec<(VarRef, f64)>,
}

impl CpModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binary decision variable.
    pub fn new_bool(&mut self, name: impl Into<String>) -> BoolVar {
        self.bool_names.push(name.into());
        self.bool_names.len() - 1
    }

    /// Adds a bounded integer auxiliary.
    pub fn new_int(&mut self, name: impl Into<String>, lb: i64, ub: i64) -> IntVar {
        self.int_vars.push(IntVarDef {
            name: name.into(),
            lb,
            ub,
        });
        self.int_vars.len() - 1
    }

    /// Adds Σ coeff·var ≤ bound.
    pub fn add_linear_le(&mut self, terms: Vec<(VarRef, i64)>, bound: i64) {
        self.constraints.push(CpConstraint::LinearLe { terms, bound });
    }

    /// Adds Σ coeff·var ≥ bound.
    pub fn add_linear_ge(&mut self, terms: Vec<(VarRef, i64)>, bound: i64) {
        self.constraints.push(CpConstraint::LinearGe { terms, bound });
    }

    /// Adds Σ coeff·var = bound.
    pub fn add_linear_eq(&mut self, terms: Vec<(VarRef, i64)>, bound: i64) {
        self.constraints.push(CpConstraint::LinearEq { terms, bound });
    }

    /// Forces a binary variable to 0.
    pub fn fix_zero(&mut self, var: BoolVar) {
        self.add_linear_eq(vec![(VarRef::Bool(var), 1)], 0);
    }

    /// Adds a reified all-or-nothing constraint.
    pub fn add_sum_switch(
        &mut self,
        vars: Vec<BoolVar>,
        indicator: BoolVar,
        count_if_on: i64,
        count_if_off: i64,
    ) {
        self.constraints.push(CpConstraint::SumSwitch {
            vars,
            indicator,
            count_if_on,
            count_if_off,
        });
    }

    /// Adds a weighted term to the minimization objective.
    pub fn minimize_term(&mut self, var: VarRef, weight: f64) {
        self.objective.push((var, weight));
    }

    /// Number of binary variables.
    pub fn bool_count(&self) -> usize {
        self.bool_names.len()
    }

    /// Number of integer auxiliaries.
    pub fn int_count(&self) -> usize {
        self.int_vars.len()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// All constraints.
    pub fn constraints(&self) -> &[CpConstraint] {
        &self.constraints
    }

    /// All objective terms.
    pub fn objective_terms(&self) -> &[(VarRef, f64)] {
        &self.objective
    }

    /// Integer auxiliary definitions.
    pub fn int_defs(&self) -> &[IntVarDef] {
        &self.int_vars
    }

    /// Diagnostic name of a binary variable.
    pub fn bool_name(&self, var: BoolVar) -> &str {
        &self.bool_names[var]
    }
}

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Wall-clock budget for one solve call.
    pub time_budget: Duration,
}

impl SolverConfig {
    /// Creates a config with the given budget.
    pub fn with_budget(time_budget: Duration) -> Self {
        Self { time_budget }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs(120),
        }
    }
}

/// Outcome classification of a solve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Search completed; the returned solution is proven optimal.
    Optimal,
    /// Budget expired with at least one incumbent; best one returned.
    Feasible,
    /// Search completed; no assignment satisfies the hard constraints.
    Infeasible,
    /// Budget expired before any incumbent was found.
    NoSolution,
}

/// A solve result: status plus concrete values when a solution exists.
#[derive(Debug, Clone)]
pub struct CpSolution {
    pub status: SolveStatus,
    /// One value per binary variable (empty unless a solution was found).
    pub bool_values: Vec<bool>,
    /// One value per integer auxiliary (empty unless a solution was found).
    pub int_values: Vec<i64>,
    /// Objective value of the returned solution.
    pub objective: f64,
}

impl CpSolution {
    /// A solution-less result with the given status.
    pub fn empty(status: SolveStatus) -> Self {
        Self {
            status,
            bool_values: Vec::new(),
            int_values: Vec::new(),
            objective: 0.0,
        }
    }

    /// Whether a concrete assignment is available.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolveStatus::Optimal | SolveStatus::Feasible)
    }

    /// Value of a binary variable (false when no solution is present).
    pub fn value(&self, var: BoolVar) -> bool {
        self.bool_values.get(var).copied().unwrap_or(false)
    }
}

/// A pluggable solving engine.
///
/// Implementations must honor `config.time_budget` and return the best
/// incumbent found when interrupted, never panic on infeasibility.
pub trait CpSolver {
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_building() {
        let mut model = CpModel::new();
        let a = model.new_bool("a");
        let b = model.new_bool("b");
        let slack = model.new_int("slack", 0, 5);

        model.add_linear_le(vec![(VarRef::Bool(a), 1), (VarRef::Bool(b), 1)], 1);
        model.add_linear_ge(
            vec![(VarRef::Bool(a), 1), (VarRef::Int(slack), 1)],
            1,
        );
        model.minimize_term(VarRef::Int(slack), 2.0);

        assert_eq!(model.bool_count(), 2);
        assert_eq!(model.int_count(), 1);
        assert_eq!(model.constraint_count(), 2);
        assert_eq!(model.objective_terms().len(), 1);
        assert_eq!(model.bool_name(a), "a");
        assert_eq!(model.int_defs()[slack].ub, 5);
    }

    #[test]
    fn test_fix_zero_is_an_equality() {
        let mut model = CpModel::new();
        let a = model.new_bool("a");
        model.fix_zero(a);
        match &model.constraints()[0] {
            CpConstraint::LinearEq { terms, bound } => {
                assert_eq!(terms.len(), 1);
                assert_eq!(*bound, 0);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_empty_solution() {
        let s = CpSolution::empty(SolveStatus::Infeasible);
        assert!(!s.is_solution_found());
        assert!(!s.value(0)); // out of range reads as false
    }

    #[test]
    fn test_default_budget() {
        let config = SolverConfig::default();
        assert_eq!(config.time_budget, Duration::from_secs(120));
    }
}
