//! Core expression type: linear terms plus a constant, and the constraint
//! rows produced by comparing it.
//!
//! Duplicate variables are allowed while building; the model merges them
//! when an expression is lowered into a row or the objective.

use crate::expr::error::ExprError;
use crate::ids::VariableId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expr {
    constant: f64,
    linear: Vec<(VariableId, f64)>,
}

impl Expr {
    // ── Constructors ────────────────────────────────────────

    /// Empty expression (all zeros).
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Expression from linear terms and constant.
    pub fn new(linear: Vec<(VariableId, f64)>, constant: f64) -> Self {
        Self { constant, linear }
    }

    /// Just a constant, no variable terms.
    pub fn from_constant(constant: f64) -> Self {
        Self {
            constant,
            linear: Vec::new(),
        }
    }

    /// Single linear term: coeff * var.
    pub fn term(var_id: VariableId, coeff: f64) -> Self {
        if coeff == 0.0 {
            return Self::default();
        }
        Self {
            constant: 0.0,
            linear: vec![(var_id, coeff)],
        }
    }

    /// Single variable with coefficient 1.0.
    pub fn var(var_id: VariableId) -> Self {
        Self::term(var_id, 1.0)
    }

    /// From raw linear terms, no constant.
    pub fn from_linear(linear: Vec<(VariableId, f64)>) -> Self {
        Self {
            constant: 0.0,
            linear,
        }
    }

    /// Unit-coefficient sum of variables.
    pub fn sum_of<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = VariableId>,
    {
        Self::from_linear(vars.into_iter().map(|var| (var, 1.0)).collect())
    }

    /// Zip variables with coefficients, dropping zero coefficients.
    pub fn weighted(variables: &[VariableId], coefficients: &[f64]) -> Result<Self, ExprError> {
        if variables.len() != coefficients.len() {
            return Err(ExprError::MismatchedLengths {
                variables: variables.len(),
                coefficients: coefficients.len(),
            });
        }
        let linear = variables
            .iter()
            .copied()
            .zip(coefficients.iter().copied())
            .filter(|(_, coeff)| *coeff != 0.0)
            .collect();
        Ok(Self::from_linear(linear))
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn linear_terms(&self) -> &[(VariableId, f64)] {
        &self.linear
    }

    pub fn is_constant(&self) -> bool {
        self.linear.is_empty()
    }

    /// Consume and return (linear_terms, constant).
    pub fn into_parts(self) -> (Vec<(VariableId, f64)>, f64) {
        (self.linear, self.constant)
    }

    /// Reject NaN or infinite coefficients and constants.
    pub fn ensure_finite(&self) -> Result<(), ExprError> {
        if !self.constant.is_finite() {
            return Err(ExprError::NonFiniteCoefficient {
                variable: None,
                value: self.constant,
            });
        }
        match self.linear.iter().find(|(_, coeff)| !coeff.is_finite()) {
            Some((var, coeff)) => Err(ExprError::NonFiniteCoefficient {
                variable: Some(*var),
                value: *coeff,
            }),
            None => Ok(()),
        }
    }

    /// Evaluate the expression, resolving variables through `value_of`.
    ///
    /// Returns `None` if any variable has no value.
    pub fn evaluate<F>(&self, mut value_of: F) -> Option<f64>
    where
        F: FnMut(VariableId) -> Option<f64>,
    {
        self.linear
            .iter()
            .try_fold(self.constant, |acc, (var, coeff)| {
                value_of(*var).map(|value| acc + coeff * value)
            })
    }

    // ── Operations ──────────────────────────────────────────

    /// Scale all terms and constant by a factor.
    pub fn scale(&self, by: f64) -> Self {
        Self {
            constant: self.constant * by,
            linear: self
                .linear
                .iter()
                .map(|(v, c)| (*v, *c * by))
                .filter(|(_, c)| *c != 0.0)
                .collect(),
        }
    }

    /// Add another expression (terms concatenated, constants summed).
    pub fn add(&self, other: &Expr) -> Self {
        let mut linear = Vec::with_capacity(self.linear.len() + other.linear.len());
        linear.extend_from_slice(&self.linear);
        linear.extend_from_slice(&other.linear);
        Self {
            constant: self.constant + other.constant,
            linear,
        }
    }

    /// Append a single term in place.
    pub fn push_term(&mut self, var_id: VariableId, coeff: f64) {
        if coeff != 0.0 {
            self.linear.push((var_id, coeff));
        }
    }

    /// Add a constant offset.
    pub fn add_constant(&self, value: f64) -> Self {
        Self {
            constant: self.constant + value,
            linear: self.linear.clone(),
        }
    }

    /// Copy with constant set to zero.
    pub fn without_constant(&self) -> Self {
        Self {
            constant: 0.0,
            linear: self.linear.clone(),
        }
    }

    /// Merged linear terms with duplicates combined and zeros dropped.
    pub fn normalized_terms(&self) -> Vec<(VariableId, f64)> {
        let mut merged: BTreeMap<VariableId, f64> = BTreeMap::new();
        for (var_id, coeff) in &self.linear {
            *merged.entry(*var_id).or_insert(0.0) += *coeff;
        }
        merged.into_iter().filter(|(_, c)| *c != 0.0).collect()
    }

    // ── Comparison methods (produce ConstraintExpr) ─────────

    pub fn compare_scalar(&self, rhs: f64, sense: ComparisonSense) -> ConstraintExpr {
        ConstraintExpr::new(self.without_constant(), sense, rhs - self.constant)
    }

    pub fn compare_expr(&self, other: &Expr, sense: ComparisonSense) -> ConstraintExpr {
        let combined = self.add(&other.scale(-1.0));
        ConstraintExpr::new(combined.without_constant(), sense, -combined.constant)
    }

    pub fn le_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::LessEqual)
    }

    pub fn ge_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::GreaterEqual)
    }

    pub fn eq_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::Equal)
    }

    pub fn le_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::LessEqual)
    }

    pub fn ge_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::GreaterEqual)
    }

    pub fn eq_expr(&self, rhs: &Expr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::Equal)
    }
}

// ── Comparison results ──────────────────────────────────

/// Direction of a row comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonSense {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl ComparisonSense {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LessEqual => "le",
            Self::GreaterEqual => "ge",
            Self::Equal => "eq",
        }
    }

    /// Row bounds `(lower, upper)` for `rhs`.
    pub fn bounds_for(self, rhs: f64) -> (f64, f64) {
        match self {
            Self::LessEqual => (f64::NEG_INFINITY, rhs),
            Self::GreaterEqual => (rhs, f64::INFINITY),
            Self::Equal => (rhs, rhs),
        }
    }
}

/// Constant-free expression, sense and right-hand side of one row.
#[derive(Debug, Clone)]
pub struct ConstraintExpr {
    expr: Expr,
    sense: ComparisonSense,
    rhs: f64,
}

impl ConstraintExpr {
    fn new(expr: Expr, sense: ComparisonSense, rhs: f64) -> Self {
        Self { expr, sense, rhs }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn sense(&self) -> ComparisonSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn into_parts(self) -> (Expr, ComparisonSense, f64) {
        (self.expr, self.sense, self.rhs)
    }
}

// ── Operator overloads ──────────────────────────────────────

impl std::ops::Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Self::Output {
        Expr::add(&self, &rhs)
    }
}

impl std::ops::Add<f64> for Expr {
    type Output = Expr;

    fn add(self, rhs: f64) -> Self::Output {
        self.add_constant(rhs)
    }
}

impl std::ops::Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Self::Output {
        Expr::add(&self, &rhs.scale(-1.0))
    }
}

impl std::ops::Sub<f64> for Expr {
    type Output = Expr;

    fn sub(self, rhs: f64) -> Self::Output {
        self.add_constant(-rhs)
    }
}

impl std::ops::Mul<f64> for Expr {
    type Output = Expr;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl std::ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Self::Output {
        self.scale(-1.0)
    }
}

impl std::ops::AddAssign for Expr {
    fn add_assign(&mut self, rhs: Expr) {
        self.constant += rhs.constant;
        self.linear.extend(rhs.linear);
    }
}

impl std::iter::Sum for Expr {
    fn sum<I: Iterator<Item = Expr>>(iter: I) -> Self {
        iter.fold(Expr::new_empty(), |mut acc, expr| {
            acc += expr;
            acc
        })
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crate::VariableId;
    use crate::expr::{ComparisonSense, Expr, ExprError};

    fn x() -> VariableId {
        VariableId::new(1)
    }

    fn y() -> VariableId {
        VariableId::new(2)
    }

    #[test]
    fn from_constant_has_no_terms() {
        let e = Expr::from_constant(5.0);
        assert_eq!(e.constant(), 5.0);
        assert!(e.is_constant());
    }

    #[test]
    fn le_scalar_folds_constant_into_rhs() {
        let e = Expr::new(vec![(x(), 1.0)], 3.0);
        let c = e.le_scalar(10.0);
        assert_eq!(c.sense(), ComparisonSense::LessEqual);
        assert_eq!(c.rhs(), 7.0);
        assert_eq!(c.expr().constant(), 0.0);
    }

    #[test]
    fn ge_expr_moves_everything_left() {
        let lhs = Expr::new(vec![(x(), 1.0)], 3.0);
        let rhs = Expr::new(vec![(y(), 1.0)], 7.0);
        let c = lhs.ge_expr(&rhs);
        assert_eq!(c.rhs(), 4.0);
        assert_eq!(c.expr().linear_terms(), &[(x(), 1.0), (y(), -1.0)]);
    }

    #[test]
    fn weighted_rejects_mismatched_lengths() {
        let result = Expr::weighted(&[x(), y()], &[1.0]);
        assert_eq!(
            result.unwrap_err(),
            ExprError::MismatchedLengths {
                variables: 2,
                coefficients: 1
            }
        );
    }

    #[test]
    fn weighted_drops_zero_coefficients() {
        let e = Expr::weighted(&[x(), y()], &[0.0, 3.5]).unwrap();
        assert_eq!(e.linear_terms(), &[(y(), 3.5)]);
    }

    #[test]
    fn normalized_terms_merges_duplicates() {
        let expr = Expr::term(x(), 2.0) + Expr::term(x(), -2.0) + Expr::term(y(), 4.0);
        assert_eq!(expr.normalized_terms(), vec![(y(), 4.0)]);
    }

    #[test]
    fn sum_collects_terms_and_constants() {
        let total: Expr = vec![Expr::var(x()) + 1.0, Expr::var(y()) + 2.0]
            .into_iter()
            .sum();
        assert_eq!(total.constant(), 3.0);
        assert_eq!(total.linear_terms().len(), 2);
    }

    #[test]
    fn evaluate_resolves_values() {
        let e = Expr::new(vec![(x(), 2.0), (y(), -1.0)], 0.5);
        let value = e.evaluate(|var| Some(if var == x() { 3.0 } else { 1.0 }));
        assert_eq!(value, Some(5.5));
        assert_eq!(e.evaluate(|_| None), None);
    }

    #[test]
    fn ensure_finite_reports_offending_variable() {
        let e = Expr::new(vec![(x(), 1.0), (y(), f64::INFINITY)], 0.0);
        assert!(matches!(
            e.ensure_finite(),
            Err(ExprError::NonFiniteCoefficient {
                variable: Some(v),
                ..
            }) if v == y()
        ));
    }

    #[test]
    fn bounds_for_sense() {
        assert_eq!(ComparisonSense::Equal.bounds_for(2.0), (2.0, 2.0));
        assert_eq!(
            ComparisonSense::GreaterEqual.bounds_for(1.0),
            (1.0, f64::INFINITY)
        );
    }
}
