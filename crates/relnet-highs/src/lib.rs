//! HiGHS backend for relnet models.
//!
//! Generalized log/exp constraints are lowered to piecewise-linear MILP rows
//! (see [`lower`]) before the model is handed to HiGHS through the safe
//! wrapper in [`ffi`].

pub mod ffi;
pub mod lower;
pub mod solver;
mod status;

pub use ffi::{HighsModel, HighsModelError, HighsOption, HighsStatus, ObjectiveSense};
pub use lower::lower_general_constraints;
pub use solver::HighsSolver;
