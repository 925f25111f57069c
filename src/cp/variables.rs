//! CP variable types.

/// Handle to a boolean decision variable owned by a [`CpModel`](super::CpModel).
///
/// Handles are dense indices assigned in creation order, so a model with
/// `n` variables hands out exactly `0..n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoolVar(pub(crate) usize);

impl BoolVar {
    /// Position of this variable in its model.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Definition of a boolean variable as stored in the model.
#[derive(Debug, Clone)]
pub struct BoolVarDef {
    /// Variable name.
    pub name: String,
}

impl BoolVarDef {
    /// Creates a boolean variable definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A unit-weight sum of boolean variables.
///
/// # Examples
///
/// ```
/// use u_roster::cp::{CpModel, LinearExpr};
///
/// let mut model = CpModel::new("example");
/// let a = model.new_bool_var("a");
/// let b = model.new_bool_var("b");
///
/// let expr: LinearExpr = [a, b].into_iter().collect();
/// assert_eq!(expr.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinearExpr {
    vars: Vec<BoolVar>,
}

impl LinearExpr {
    /// Creates an empty sum.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a term.
    pub fn push(&mut self, var: BoolVar) {
        self.vars.push(var);
    }

    /// Appends a term, builder style.
    pub fn with(mut self, var: BoolVar) -> Self {
        self.vars.push(var);
        self
    }

    /// Terms of the sum, in insertion order.
    pub fn vars(&self) -> &[BoolVar] {
        &self.vars
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the sum has no terms.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl FromIterator<BoolVar> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = BoolVar>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

impl Extend<BoolVar> for LinearExpr {
    fn extend<I: IntoIterator<Item = BoolVar>>(&mut self, iter: I) {
        self.vars.extend(iter);
    }
}
