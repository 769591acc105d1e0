//! Linear expressions over engine variables.

use std::ops::{AddAssign, Mul};

use num_traits::{Num, Zero};

/// Handle of a variable declared on a [`ConstraintEngine`](super::ConstraintEngine).
///
/// Handles are dense indices in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A weighted sum of variables plus a constant.
///
/// Generic over the coefficient so constraints can use exact integer
/// arithmetic while the objective carries real-valued costs.
///
/// # Examples
///
/// ```
/// use flexroute_core::{LinearExpr, VarId};
///
/// let mut expr = LinearExpr::new();
/// expr.add_term(VarId(0), 3i64);
/// expr.add_term(VarId(2), -1);
/// expr.add_constant(4);
///
/// let values = [2, 9, 5];
/// assert_eq!(expr.evaluate(|v| values[v.index()]), 3 * 2 - 5 + 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearExpr<T> {
    terms: Vec<(VarId, T)>,
    constant: T,
}

impl<T: Num + Copy> LinearExpr<T> {
    pub fn new() -> Self {
        Self {
            terms: Vec::new(),
            constant: T::zero(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            terms: Vec::with_capacity(capacity),
            constant: T::zero(),
        }
    }

    /// Sum of `vars`, each with coefficient one.
    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        vars.into_iter().map(|v| (v, T::one())).collect()
    }

    /// Appends `coefficient * var`. Zero coefficients are dropped.
    pub fn add_term(&mut self, var: VarId, coefficient: T) {
        if !coefficient.is_zero() {
            self.terms.push((var, coefficient));
        }
    }

    /// Builder form of [`add_term`](Self::add_term).
    pub fn term(mut self, var: VarId, coefficient: T) -> Self {
        self.add_term(var, coefficient);
        self
    }

    pub fn add_constant(&mut self, constant: T) {
        self.constant = self.constant + constant;
    }

    pub fn terms(&self) -> &[(VarId, T)] {
        &self.terms
    }

    pub fn constant(&self) -> T {
        self.constant
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Evaluates the expression under a variable assignment.
    pub fn evaluate(&self, mut value_of: impl FnMut(VarId) -> T) -> T {
        self.terms
            .iter()
            .fold(self.constant, |acc, &(var, coefficient)| {
                acc + coefficient * value_of(var)
            })
    }

    /// Multiplies every coefficient and the constant by `factor`.
    pub fn scaled(mut self, factor: T) -> Self {
        for (_, coefficient) in &mut self.terms {
            *coefficient = *coefficient * factor;
        }
        self.constant = self.constant * factor;
        self
    }
}

impl<T: Num + Copy> Default for LinearExpr<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Num + Copy> FromIterator<(VarId, T)> for LinearExpr<T> {
    fn from_iter<I: IntoIterator<Item = (VarId, T)>>(iter: I) -> Self {
        let mut expr = Self::new();
        expr.extend(iter);
        expr
    }
}

impl<T: Num + Copy> Extend<(VarId, T)> for LinearExpr<T> {
    fn extend<I: IntoIterator<Item = (VarId, T)>>(&mut self, iter: I) {
        for (var, coefficient) in iter {
            self.add_term(var, coefficient);
        }
    }
}

impl<T: Num + Copy> AddAssign for LinearExpr<T> {
    fn add_assign(&mut self, rhs: Self) {
        self.extend(rhs.terms);
        self.add_constant(rhs.constant);
    }
}

impl<T: Num + Copy> Mul<T> for LinearExpr<T> {
    type Output = Self;

    fn mul(self, factor: T) -> Self {
        self.scaled(factor)
    }
}
