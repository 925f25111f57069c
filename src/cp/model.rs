//! CP model definition.

use std::collections::HashSet;
use std::fmt;

use super::variables::{BoolVar, BoolVarDef, LinearExpr};

/// Relation between a linear expression and its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// `expr <= bound`
    Le,
    /// `expr == bound`
    Eq,
    /// `expr >= bound`
    Ge,
}

impl Comparator {
    /// Whether `lhs <comparator> bound` holds.
    pub fn holds(self, lhs: i64, bound: i64) -> bool {
        match self {
            Comparator::Le => lhs <= bound,
            Comparator::Eq => lhs == bound,
            Comparator::Ge => lhs >= bound,
        }
    }

    /// Mathematical symbol, for diagnostics.
    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Le => "<=",
            Comparator::Eq => "==",
            Comparator::Ge => ">=",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A linear constraint `sum(expr) <comparator> bound` over boolean variables.
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    /// Unit-weight sum on the left-hand side.
    pub expr: LinearExpr,
    /// Relation to the bound.
    pub comparator: Comparator,
    /// Right-hand side.
    pub bound: i64,
}

impl LinearConstraint {
    /// Whether the constraint holds under `value`.
    pub fn is_satisfied_by(&self, value: impl Fn(BoolVar) -> bool) -> bool {
        let lhs = self.expr.vars().iter().filter(|&&v| value(v)).count() as i64;
        self.comparator.holds(lhs, self.bound)
    }
}

/// A constraint programming model over boolean variables.
///
/// Contains variables, linear constraints and optional solution hints.
/// There is no objective: solving means finding satisfying assignments.
///
/// # Examples
///
/// ```
/// use u_roster::cp::{CpModel, LinearExpr};
///
/// let mut model = CpModel::new("example");
/// let a = model.new_bool_var("a");
/// let b = model.new_bool_var("b");
/// model.add_eq([a, b].into_iter().collect(), 1);
/// model.add_hint(a, true);
/// assert!(model.validate().is_ok());
/// assert_eq!(model.constraint_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct CpModel {
    /// Model name.
    pub name: String,
    vars: Vec<BoolVarDef>,
    constraints: Vec<LinearConstraint>,
    hints: Vec<(BoolVar, bool)>,
}

impl CpModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vars: Vec::new(),
            constraints: Vec::new(),
            hints: Vec::new(),
        }
    }

    /// Creates a boolean variable.
    pub fn new_bool_var(&mut self, name: impl Into<String>) -> BoolVar {
        let var = BoolVar(self.vars.len());
        self.vars.push(BoolVarDef::new(name));
        var
    }

    /// Registers `sum(expr) <comparator> bound` and returns its index.
    pub fn add_linear_constraint(
        &mut self,
        expr: LinearExpr,
        comparator: Comparator,
        bound: i64,
    ) -> usize {
        self.constraints.push(LinearConstraint {
            expr,
            comparator,
            bound,
        });
        self.constraints.len() - 1
    }

    /// Convenience: add `sum(expr) <= bound`.
    pub fn add_le(&mut self, expr: LinearExpr, bound: i64) -> usize {
        self.add_linear_constraint(expr, Comparator::Le, bound)
    }

    /// Convenience: add `sum(expr) == bound`.
    pub fn add_eq(&mut self, expr: LinearExpr, bound: i64) -> usize {
        self.add_linear_constraint(expr, Comparator::Eq, bound)
    }

    /// Convenience: add `sum(expr) >= bound`.
    pub fn add_ge(&mut self, expr: LinearExpr, bound: i64) -> usize {
        self.add_linear_constraint(expr, Comparator::Ge, bound)
    }

    /// Suggests `value` as the preferred value of `var`.
    ///
    /// Hints guide branching only; they never change which assignments
    /// are feasible. A later hint for the same variable replaces the
    /// earlier one.
    pub fn add_hint(&mut self, var: BoolVar, value: bool) {
        self.hints.push((var, value));
    }

    /// Drops all hints.
    pub fn clear_hints(&mut self) {
        self.hints.clear();
    }

    /// Registered hints, in insertion order.
    pub fn hints(&self) -> &[(BoolVar, bool)] {
        &self.hints
    }

    /// Variable definitions, indexed by [`BoolVar::index`].
    pub fn vars(&self) -> &[BoolVarDef] {
        &self.vars
    }

    /// Name of `var`, if it belongs to this model.
    pub fn var_name(&self, var: BoolVar) -> Option<&str> {
        self.vars.get(var.0).map(|d| d.name.as_str())
    }

    /// Registered constraints, in registration order.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Validates the model for consistency.
    ///
    /// Checks that every referenced variable exists and that no expression
    /// repeats a variable (terms are unit-weight).
    pub fn validate(&self) -> Result<(), String> {
        let n = self.vars.len();
        let mut seen = HashSet::new();
        for (i, constraint) in self.constraints.iter().enumerate() {
            seen.clear();
            for var in constraint.expr.vars() {
                if var.0 >= n {
                    return Err(format!("constraint {i}: undefined variable #{}", var.0));
                }
                if !seen.insert(var.0) {
                    let name = &self.vars[var.0].name;
                    return Err(format!("constraint {i}: variable {name} repeated"));
                }
            }
        }
        for (var, _) in &self.hints {
            if var.0 >= n {
                return Err(format!("hint: undefined variable #{}", var.0));
            }
        }
        Ok(())
    }

    /// Returns the number of variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_creation() {
        let mut model = CpModel::new("test");
        let a = model.new_bool_var("a");
        let b = model.new_bool_var("b");
        let c = model.new_bool_var("c");
        model.add_le([a, b, c].into_iter().collect(), 1);
        model.add_ge([a, b].into_iter().collect(), 1);

        assert_eq!(model.var_count(), 3);
        assert_eq!(model.constraint_count(), 2);
        assert_eq!(model.var_name(b), Some("b"));
        assert_eq!(model.vars()[c.index()].name, "c");
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_constraint_indices_follow_registration() {
        let mut model = CpModel::new("test");
        let a = model.new_bool_var("a");
        assert_eq!(model.add_eq(LinearExpr::new().with(a), 1), 0);
        assert_eq!(model.add_le(LinearExpr::new().with(a), 1), 1);
        assert_eq!(model.constraints()[0].comparator, Comparator::Eq);
    }

    #[test]
    fn test_undefined_variable() {
        let mut model = CpModel::new("test");
        model.add_eq(LinearExpr::new().with(BoolVar(4)), 1);

        assert!(model.validate().is_err());
    }

    #[test]
    fn test_repeated_variable() {
        let mut model = CpModel::new("test");
        let a = model.new_bool_var("a");
        model.add_le(LinearExpr::new().with(a).with(a), 1);

        let err = model.validate().unwrap_err();
        assert!(err.contains("repeated"), "unexpected message: {err}");
    }

    #[test]
    fn test_undefined_hint() {
        let mut model = CpModel::new("test");
        model.add_hint(BoolVar(0), true);
        assert!(model.validate().is_err());

        model.clear_hints();
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_comparator_holds() {
        assert!(Comparator::Le.holds(1, 1));
        assert!(!Comparator::Le.holds(2, 1));
        assert!(Comparator::Eq.holds(1, 1));
        assert!(!Comparator::Eq.holds(0, 1));
        assert!(Comparator::Ge.holds(3, 1));
        assert!(!Comparator::Ge.holds(0, 1));
        assert_eq!(format!("{}", Comparator::Ge), ">=");
    }

    #[test]
    fn test_constraint_satisfaction_check() {
        let mut model = CpModel::new("test");
        let a = model.new_bool_var("a");
        let b = model.new_bool_var("b");
        model.add_eq([a, b].into_iter().collect(), 1);

        let c = &model.constraints()[0];
        assert!(c.is_satisfied_by(|v| v == a));
        assert!(!c.is_satisfied_by(|_| true));
        assert!(!c.is_satisfied_by(|_| false));
    }
}
