/// Terminal state of a solve.
///
/// Design code distinguishes three groups: a proven optimum, a proof of
/// infeasibility, and a limit that may or may not leave a point behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverStatus {
    Optimal,
    /// No point satisfies the constraints.
    Infeasible,
    Unbounded,
    /// Stopped on the wall-clock limit.
    TimeLimit,
    /// Stopped on an iteration, node or solution limit.
    IterationLimit,
    /// Anything the backend could not classify.
    Unknown,
}

impl SolverStatus {
    pub fn is_optimal(self) -> bool {
        self == SolverStatus::Optimal
    }

    /// Whether a solution with this status may carry a point.
    pub fn is_feasible(self) -> bool {
        self.is_optimal() || self.is_limit()
    }

    pub fn is_infeasible(self) -> bool {
        self == SolverStatus::Infeasible
    }

    /// Whether the solve stopped on a limit rather than a proof.
    pub fn is_limit(self) -> bool {
        matches!(self, SolverStatus::TimeLimit | SolverStatus::IterationLimit)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SolverStatus::Optimal => "optimal",
            SolverStatus::Infeasible => "infeasible",
            SolverStatus::Unbounded => "unbounded",
            SolverStatus::TimeLimit => "time_limit",
            SolverStatus::IterationLimit => "iteration_limit",
            SolverStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_may_carry_points() {
        for status in [SolverStatus::TimeLimit, SolverStatus::IterationLimit] {
            assert!(status.is_limit());
            assert!(status.is_feasible());
            assert!(!status.is_optimal());
        }
        assert!(SolverStatus::Optimal.is_feasible());
        assert!(!SolverStatus::Optimal.is_limit());
    }

    #[test]
    fn proofs_and_unknowns_carry_none() {
        for status in [
            SolverStatus::Infeasible,
            SolverStatus::Unbounded,
            SolverStatus::Unknown,
        ] {
            assert!(!status.is_feasible());
            assert!(!status.is_limit());
        }
        assert!(SolverStatus::Infeasible.is_infeasible());
        assert!(!SolverStatus::Unknown.is_infeasible());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(SolverStatus::TimeLimit.to_string(), "time_limit");
        assert_eq!(SolverStatus::IterationLimit.to_string(), "iteration_limit");
    }
}
