//! Built-in depth-first branch-and-bound engine.
//!
//! A deterministic baseline engine for the [`CpSolver`](super::CpSolver)
//! boundary. Not competitive with a dedicated CP/ILP backend, but complete
//! on small models (proves optimality) and anytime on large ones: when the
//! wall-clock budget expires it returns the best incumbent found so far.
//!
//! # Search
//!
//! 1. Preprocess: single-variable equalities fix their variable up front.
//! 2. Branch over the remaining binaries in index order, value 1 first.
//! 3. After each assignment, check only the constraints touching the
//!    assigned variable, using min/max attainable sums over the partial
//!    assignment.
//! 4. Prune nodes whose objective lower bound cannot beat the incumbent.
//! 5. At a leaf, finalize the slack-like integer auxiliaries at their
//!    minimal feasible values and verify every constraint exactly.

use std::time::Instant;

use super::{
    BoolVar, CpConstraint, CpModel, CpSolution, CpSolver, SolveStatus, SolverConfig, VarRef,
};

const EPS: f64 = 1e-9;

/// Deterministic DFS branch-and-bound solver.
#[derive(Debug, Clone, Default)]
pub struct BranchBoundSolver;

impl BranchBoundSolver {
    /// Creates a new solver.
    pub fn new() -> Self {
        Self
    }
}

impl CpSolver for BranchBoundSolver {
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution {
        let mut search = match Search::new(model, config) {
            Ok(search) => search,
            // Preprocessing found a contradiction.
            Err(()) => return CpSolution::empty(SolveStatus::Infeasible),
        };
        search.run()
    }
}

struct Search<'a> {
    model: &'a CpModel,
    /// Partial assignment of the binaries.
    values: Vec<Option<bool>>,
    /// Free variables in branch order.
    order: Vec<BoolVar>,
    /// Binary variable → indices of constraints mentioning it.
    touching: Vec<Vec<usize>>,
    /// Indices of `LinearGe` constraints that mention an integer auxiliary.
    ge_with_ints: Vec<usize>,
    deadline: Instant,
    timed_out: bool,
    best_objective: f64,
    best: Option<(Vec<bool>, Vec<i64>)>,
}

impl<'a> Search<'a> {
    fn new(model: &'a CpModel, config: &SolverConfig) -> Result<Self, ()> {
        let mut values: Vec<Option<bool>> = vec![None; model.bool_count()];

        // Forced literals: single-binary equalities decide their variable.
        for constraint in model.constraints() {
            if let CpConstraint::LinearEq { terms, bound } = constraint {
                if let [(VarRef::Bool(var), coeff)] = terms[..] {
                    if coeff == 0 {
                        if *bound != 0 {
                            return Err(());
                        }
                        continue;
                    }
                    if bound % coeff != 0 {
                        return Err(());
                    }
                    let forced = match bound / coeff {
                        0 => false,
                        1 => true,
                        _ => return Err(()),
                    };
                    match values[var] {
                        None => values[var] = Some(forced),
                        Some(existing) if existing == forced => {}
                        Some(_) => return Err(()),
                    }
                }
            }
        }

        let order: Vec<BoolVar> = (0..model.bool_count())
            .filter(|&v| values[v].is_none())
            .collect();

        let mut touching: Vec<Vec<usize>> = vec![Vec::new(); model.bool_count()];
        let mut ge_with_ints = Vec::new();
        for (ci, constraint) in model.constraints().iter().enumerate() {
            match constraint {
                CpConstraint::LinearLe { terms, .. }
                | CpConstraint::LinearGe { terms, .. }
                | CpConstraint::LinearEq { terms, .. } => {
                    let mut has_int = false;
                    for &(var, _) in terms {
                        match var {
                            VarRef::Bool(v) => touching[v].push(ci),
                            VarRef::Int(_) => has_int = true,
                        }
                    }
                    if has_int && matches!(constraint, CpConstraint::LinearGe { .. }) {
                        ge_with_ints.push(ci);
                    }
                }
                CpConstraint::SumSwitch { vars, indicator, .. } => {
                    for &v in vars {
                        touching[v].push(ci);
                    }
                    touching[*indicator].push(ci);
                }
            }
        }

        Ok(Self {
            model,
            values,
            order,
            touching,
            ge_with_ints,
            deadline: Instant::now() + config.time_budget,
            timed_out: false,
            best_objective: f64::INFINITY,
            best: None,
        })
    }

    fn run(&mut self) -> CpSolution {
        // A forced assignment can already violate a constraint.
        let all: Vec<usize> = (0..self.model.constraint_count()).collect();
        if !self.consistent(&all) {
            return CpSolution::empty(SolveStatus::Infeasible);
        }

        self.dfs(0);

        match (self.best.take(), self.timed_out) {
            (Some((bools, ints)), false) => CpSolution {
                status: SolveStatus::Optimal,
                bool_values: bools,
                int_values: ints,
                objective: self.best_objective,
            },
            (Some((bools, ints)), true) => CpSolution {
                status: SolveStatus::Feasible,
                bool_values: bools,
                int_values: ints,
                objective: self.best_objective,
            },
            (None, false) => CpSolution::empty(SolveStatus::Infeasible),
            (None, true) => CpSolution::empty(SolveStatus::NoSolution),
        }
    }

    fn dfs(&mut self, depth: usize) {
        if self.timed_out {
            return;
        }
        if Instant::now() >= self.deadline {
            self.timed_out = true;
            return;
        }
        if self.lower_bound() >= self.best_objective - EPS {
            return;
        }

        if depth == self.order.len() {
            self.record_leaf();
            return;
        }

        let var = self.order[depth];
        for value in [true, false] {
            self.values[var] = Some(value);
            if self.consistent(&self.touching[var]) {
                self.dfs(depth + 1);
            }
            if self.timed_out {
                // Keep the partial assignment consistent for the caller to unwind.
                self.values[var] = None;
                return;
            }
        }
        self.values[var] = None;
    }

    /// Whether every listed constraint is still satisfiable.
    fn consistent(&self, constraint_indices: &[usize]) -> bool {
        constraint_indices
            .iter()
            .all(|&ci| self.satisfiable(&self.model.constraints()[ci]))
    }

    fn satisfiable(&self, constraint: &CpConstraint) -> bool {
        match constraint {
            CpConstraint::LinearLe { terms, bound } => self.term_range(terms).0 <= *bound,
            CpConstraint::LinearGe { terms, bound } => self.term_range(terms).1 >= *bound,
            CpConstraint::LinearEq { terms, bound } => {
                let (lo, hi) = self.term_range(terms);
                lo <= *bound && *bound <= hi
            }
            CpConstraint::SumSwitch {
                vars,
                indicator,
                count_if_on,
                count_if_off,
            } => {
                let mut fixed = 0i64;
                let mut free = 0i64;
                for &v in vars {
                    match self.values[v] {
                        Some(true) => fixed += 1,
                        Some(false) => {}
                        None => free += 1,
                    }
                }
                let on_ok = fixed <= *count_if_on && *count_if_on <= fixed + free;
                let off_ok = fixed <= *count_if_off && *count_if_off <= fixed + free;
                match self.values[*indicator] {
                    Some(true) => on_ok,
                    Some(false) => off_ok,
                    None => on_ok || off_ok,
                }
            }
        }
    }

    /// Min/max attainable value of a linear expression under the partial
    /// assignment, with integer auxiliaries at their domain bounds.
    fn term_range(&self, terms: &[(VarRef, i64)]) -> (i64, i64) {
        let mut lo = 0i64;
        let mut hi = 0i64;
        for &(var, coeff) in terms {
            match var {
                VarRef::Bool(v) => match self.values[v] {
                    Some(true) => {
                        lo += coeff;
                        hi += coeff;
                    }
                    Some(false) => {}
                    None => {
                        lo += coeff.min(0);
                        hi += coeff.max(0);
                    }
                },
                VarRef::Int(i) => {
                    let def = &self.model.int_defs()[i];
                    if coeff >= 0 {
                        lo += coeff * def.lb;
                        hi += coeff * def.ub;
                    } else {
                        lo += coeff * def.ub;
                        hi += coeff * def.lb;
                    }
                }
            }
        }
        (lo, hi)
    }

    /// Minimal feasible values of the integer auxiliaries under the current
    /// (possibly partial) binary assignment.
    ///
    /// Valid as a lower bound mid-search and exact at a leaf, given the
    /// slack-variable contract. `None` means some auxiliary is pushed past
    /// its upper bound.
    fn int_lower_bounds(&self) -> Option<Vec<i64>> {
        let mut lbs: Vec<i64> = self.model.int_defs().iter().map(|d| d.lb).collect();

        for &ci in &self.ge_with_ints {
            if let CpConstraint::LinearGe { terms, bound } = &self.model.constraints()[ci] {
                let mut int_term: Option<(usize, i64)> = None;
                let mut several_ints = false;
                let mut bool_max = 0i64;
                for &(var, coeff) in terms {
                    match var {
                        VarRef::Int(i) => {
                            if int_term.is_some() {
                                several_ints = true;
                            }
                            int_term = Some((i, coeff));
                        }
                        VarRef::Bool(v) => match self.values[v] {
                            Some(true) => bool_max += coeff,
                            Some(false) => {}
                            None => bool_max += coeff.max(0),
                        },
                    }
                }
                // Only single-slack constraints tighten; others are verified
                // exactly at the leaf.
                if several_ints {
                    continue;
                }
                let Some((i, coeff)) = int_term else { continue };
                if coeff <= 0 {
                    continue;
                }
                let needed = bound - bool_max;
                if needed > 0 {
                    let required = (needed + coeff - 1) / coeff;
                    if required > lbs[i] {
                        lbs[i] = required;
                    }
                }
            }
        }

        for (i, def) in self.model.int_defs().iter().enumerate() {
            if lbs[i] > def.ub {
                return None;
            }
        }
        Some(lbs)
    }

    /// Objective lower bound for the current partial assignment.
    fn lower_bound(&self) -> f64 {
        let Some(int_lbs) = self.int_lower_bounds() else {
            return f64::INFINITY;
        };
        let mut bound = 0.0;
        for &(var, weight) in self.model.objective_terms() {
            match var {
                VarRef::Bool(v) => match self.values[v] {
                    Some(true) => bound += weight,
                    Some(false) => {}
                    None => {
                        if weight < 0.0 {
                            bound += weight;
                        }
                    }
                },
                VarRef::Int(i) => {
                    if weight >= 0.0 {
                        bound += weight * int_lbs[i] as f64;
                    } else {
                        bound += weight * self.model.int_defs()[i].ub as f64;
                    }
                }
            }
        }
        bound
    }

    /// Evaluates a complete binary assignment, finalizing the auxiliaries.
    fn record_leaf(&mut self) {
        let Some(ints) = self.int_lower_bounds() else {
            return;
        };
        for constraint in self.model.constraints() {
            if !self.holds_exactly(constraint, &ints) {
                return;
            }
        }

        let mut objective = 0.0;
        for &(var, weight) in self.model.objective_terms() {
            match var {
                VarRef::Bool(v) => {
                    if self.values[v] == Some(true) {
                        objective += weight;
                    }
                }
                VarRef::Int(i) => objective += weight * ints[i] as f64,
            }
        }

        if objective < self.best_objective - EPS {
            self.best_objective = objective;
            let bools = self
                .values
                .iter()
                .map(|v| v.unwrap_or(false))
                .collect();
            self.best = Some((bools, ints));
        }
    }

    fn holds_exactly(&self, constraint: &CpConstraint, ints: &[i64]) -> bool {
        let eval = |terms: &[(VarRef, i64)]| -> i64 {
            terms
                .iter()
                .map(|&(var, coeff)| match var {
                    VarRef::Bool(v) => {
                        if self.values[v] == Some(true) {
                            coeff
                        } else {
                            0
                        }
                    }
                    VarRef::Int(i) => coeff * ints[i],
                })
                .sum()
        };
        match constraint {
            CpConstraint::LinearLe { terms, bound } => eval(terms) <= *bound,
            CpConstraint::LinearGe { terms, bound } => eval(terms) >= *bound,
            CpConstraint::LinearEq { terms, bound } => eval(terms) == *bound,
            CpConstraint::SumSwitch {
                vars,
                indicator,
                count_if_on,
                count_if_off,
            } => {
                let sum: i64 = vars
                    .iter()
                    .filter(|&&v| self.values[v] == Some(true))
                    .count() as i64;
                let expected = if self.values[*indicator] == Some(true) {
                    *count_if_on
                } else {
                    *count_if_off
                };
                sum == expected
            }
        }
    }
}
