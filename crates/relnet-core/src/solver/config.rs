//! Limits and tolerances handed to a solver backend.

use super::SolverError;

/// Per-solve settings. Unset fields keep the backend's own default.
///
/// Network sweeps solve hundreds of small models, so the limits here apply
/// to each solve rather than to a whole run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverConfig {
    /// Wall-clock limit in seconds; a solve cut short reports `TimeLimit`.
    pub time_limit: Option<f64>,
    /// Relative gap at which a MIP solve may stop as optimal.
    pub mip_gap: Option<f64>,
    pub presolve: Option<bool>,
    pub threads: Option<u32>,
    /// Primal and MIP feasibility tolerance.
    pub tolerance: Option<f64>,
    /// Forward backend output to stdout.
    pub log_to_console: Option<bool>,
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = Some(gap);
        self
    }

    pub fn with_presolve(mut self, enabled: bool) -> Self {
        self.presolve = Some(enabled);
        self
    }

    pub fn with_threads(mut self, count: u32) -> Self {
        self.threads = Some(count);
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = Some(tol);
        self
    }

    pub fn with_log_to_console(mut self, enabled: bool) -> Self {
        self.log_to_console = Some(enabled);
        self
    }

    /// True when nothing overrides the backend defaults.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Reject settings no backend could honor.
    pub fn validate(&self) -> Result<(), SolverError> {
        let invalid = |reason: String| Err(SolverError::InvalidConfig { reason });
        if let Some(limit) = self.time_limit.filter(|l| !(l.is_finite() && *l > 0.0)) {
            return invalid(format!("time limit must be positive (got {limit})"));
        }
        if let Some(gap) = self.mip_gap.filter(|g| !(0.0..=1.0).contains(g)) {
            return invalid(format!("MIP gap must lie in [0, 1] (got {gap})"));
        }
        if self.threads == Some(0) {
            return invalid("thread count must be at least 1".to_string());
        }
        if let Some(tol) = self.tolerance.filter(|t| !(t.is_finite() && *t > 0.0)) {
            return invalid(format!("tolerance must be positive (got {tol})"));
        }
        Ok(())
    }
}
