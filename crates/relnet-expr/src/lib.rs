//! Linear expressions and typed ids shared by relnet models and backends.

pub mod expr;
pub mod ids;

pub use expr::{ComparisonSense, ConstraintExpr, Expr, ExprError};
pub use ids::{ConstraintId, GeneralConstraintId, VariableId};
