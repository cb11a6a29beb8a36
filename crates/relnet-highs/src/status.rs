//! Status conversions between HiGHS and relnet.

use crate::ffi::HighsStatus;
use relnet_core::SolverStatus;

/// Map a HiGHS status onto the solver-agnostic one.
///
/// `UnboundedOrInfeasible` is only decidable when every column is bounded:
/// such a model cannot be unbounded, so the status means infeasible.
pub(crate) fn highs_to_core_status(status: HighsStatus, fully_bounded: bool) -> SolverStatus {
    match status {
        HighsStatus::Optimal => SolverStatus::Optimal,
        HighsStatus::Infeasible => SolverStatus::Infeasible,
        HighsStatus::Unbounded => SolverStatus::Unbounded,
        HighsStatus::UnboundedOrInfeasible if fully_bounded => SolverStatus::Infeasible,
        HighsStatus::UnboundedOrInfeasible => SolverStatus::Unknown,
        HighsStatus::ReachedTimeLimit => SolverStatus::TimeLimit,
        HighsStatus::ReachedIterationLimit => SolverStatus::IterationLimit,
        HighsStatus::Unknown => SolverStatus::Unknown,
    }
}

pub(crate) fn highs_status_string(status: HighsStatus) -> &'static str {
    match status {
        HighsStatus::Optimal => "optimal",
        HighsStatus::Infeasible => "infeasible",
        HighsStatus::Unbounded => "unbounded",
        HighsStatus::UnboundedOrInfeasible => "unbounded_or_infeasible",
        HighsStatus::ReachedTimeLimit => "time_limit",
        HighsStatus::ReachedIterationLimit => "iteration_limit",
        HighsStatus::Unknown => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highs_to_core_mapping() {
        assert_eq!(
            highs_to_core_status(HighsStatus::Optimal, false),
            SolverStatus::Optimal
        );
        assert_eq!(
            highs_to_core_status(HighsStatus::ReachedTimeLimit, true),
            SolverStatus::TimeLimit
        );
        assert_eq!(
            highs_to_core_status(HighsStatus::ReachedIterationLimit, true),
            SolverStatus::IterationLimit
        );
    }

    #[test]
    fn test_unbounded_or_infeasible_depends_on_bounds() {
        assert_eq!(
            highs_to_core_status(HighsStatus::UnboundedOrInfeasible, true),
            SolverStatus::Infeasible
        );
        assert_eq!(
            highs_to_core_status(HighsStatus::UnboundedOrInfeasible, false),
            SolverStatus::Unknown
        );
        assert_eq!(
            highs_status_string(HighsStatus::UnboundedOrInfeasible),
            "unbounded_or_infeasible"
        );
    }
}
