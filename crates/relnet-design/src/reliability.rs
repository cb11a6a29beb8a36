//! Exact reliability of decoded layouts.

/// All nodes must work: `∏ r`.
pub fn series_reliability(reliabilities: &[f64]) -> f64 {
    reliabilities.iter().product()
}

/// At least one node must work: `1 − ∏ (1 − r)`.
pub fn parallel_reliability(reliabilities: &[f64]) -> f64 {
    1.0 - reliabilities.iter().map(|r| 1.0 - r).product::<f64>()
}

/// Series backbone followed by parallel groups, all in series.
///
/// An empty backbone contributes a factor of one.
pub fn hybrid_reliability(series: &[f64], parallel_groups: &[Vec<f64>]) -> f64 {
    series_reliability(series)
        * parallel_groups
            .iter()
            .map(|group| parallel_reliability(group))
            .product::<f64>()
}
