//! Secant envelope of `g(s) = ln(1 − e^s)` for `s < 0`.
//!
//! `g` is concave and decreasing. On each segment between breakpoints the
//! chord lies below the curve and, extended past its segment, above it, so
//! `min_k line_k(s) ≤ g(s)` everywhere and equality holds at every
//! breakpoint. Bounding a variable by every line therefore never admits a
//! point above the true curve.
//!
//! A parallel subnet's log unreliability `s` is a sum of member node values,
//! so it only takes finitely many values. Placing the breakpoints on exactly
//! those sums makes the envelope exact wherever `s` can land.

/// Sums closer than this are treated as one breakpoint.
const MERGE_TOLERANCE: f64 = 1e-9;

/// Largest number of member multisets enumerated before falling back to an
/// even grid.
const ENUMERATION_LIMIT: f64 = 1_000_000.0;

/// `ln(1 − e^s)`, accurate for very negative `s`.
pub(crate) fn complement_log(s: f64) -> f64 {
    (-s.exp()).ln_1p()
}

/// Line `t = slope·s + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Secant {
    pub slope: f64,
    pub intercept: f64,
}

impl Secant {
    #[cfg(test)]
    pub fn at(&self, s: f64) -> f64 {
        self.slope * s + self.intercept
    }
}

/// Sorted breakpoints for a subnet envelope.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Breakpoints {
    pub points: Vec<f64>,
    /// Whether every reachable subnet value is a breakpoint.
    pub exact: bool,
}

/// Breakpoints at every sum of `min_members..=max_members` values drawn with
/// repetition from `node_logs`, capped at `max_segments + 1` points.
pub(crate) fn subnet_breakpoints(
    node_logs: &[f64],
    min_members: usize,
    max_members: usize,
    max_segments: usize,
) -> Breakpoints {
    breakpoints_with_limit(
        node_logs,
        min_members,
        max_members,
        max_segments,
        ENUMERATION_LIMIT,
    )
}

fn breakpoints_with_limit(
    node_logs: &[f64],
    min_members: usize,
    max_members: usize,
    max_segments: usize,
    enumeration_limit: f64,
) -> Breakpoints {
    let combinations: f64 = (min_members..=max_members)
        .map(|k| multiset_count(node_logs.len(), k))
        .sum();

    if combinations <= enumeration_limit {
        let sums = reachable_sums(node_logs, min_members, max_members);
        let exact = sums.len() <= max_segments + 1;
        return Breakpoints {
            points: thin(sums, max_segments),
            exact,
        };
    }

    let (lo, hi) = node_logs
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let (lower, upper) = (max_members as f64 * lo, min_members as f64 * hi);
    let segments = max_segments.max(1);
    let points = (0..=segments)
        .map(|k| {
            if k == segments {
                upper
            } else {
                lower + (upper - lower) * k as f64 / segments as f64
            }
        })
        .collect();
    Breakpoints {
        points,
        exact: false,
    }
}

/// Number of size-`k` multisets over `m` items, `C(k + m − 1, k)`.
fn multiset_count(m: usize, k: usize) -> f64 {
    (1..=k).fold(1.0, |acc, i| acc * (m + i - 1) as f64 / i as f64)
}

/// Distinct sums of `min_count..=max_count` values taken with repetition.
fn reachable_sums(values: &[f64], min_count: usize, max_count: usize) -> Vec<f64> {
    let mut sums = Vec::new();
    // (first usable value, members so far, running sum)
    let mut stack = vec![(0usize, 0usize, 0.0f64)];
    while let Some((start, count, sum)) = stack.pop() {
        if count >= min_count {
            sums.push(sum);
        }
        if count == max_count {
            continue;
        }
        for (i, &value) in values.iter().enumerate().skip(start) {
            stack.push((i, count + 1, sum + value));
        }
    }
    sums.sort_by(f64::total_cmp);
    sums.dedup_by(|later, kept| (*later - *kept).abs() <= MERGE_TOLERANCE);
    sums
}

/// Keep at most `max_segments + 1` points, always including both ends.
fn thin(points: Vec<f64>, max_segments: usize) -> Vec<f64> {
    let keep = max_segments.max(1) + 1;
    if points.len() <= keep {
        return points;
    }
    let last = points.len() - 1;
    let mut picked: Vec<f64> = (0..keep)
        .map(|k| points[k * last / (keep - 1)])
        .collect();
    picked.dedup();
    picked
}

#[derive(Debug, Clone)]
pub(crate) struct SecantEnvelope {
    lines: Vec<Secant>,
}

impl SecantEnvelope {
    /// Chords of `complement_log` between consecutive `breakpoints`
    /// (ascending, all negative).
    ///
    /// A single breakpoint yields a horizontal line through it.
    pub fn complement_log(breakpoints: &[f64]) -> Self {
        if let [only] = breakpoints {
            return Self {
                lines: vec![Secant {
                    slope: 0.0,
                    intercept: complement_log(*only),
                }],
            };
        }

        let lines = breakpoints
            .windows(2)
            .map(|pair| {
                let (s0, s1) = (pair[0], pair[1]);
                let (g0, g1) = (complement_log(s0), complement_log(s1));
                let slope = (g1 - g0) / (s1 - s0);
                Secant {
                    slope,
                    intercept: g0 - slope * s0,
                }
            })
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[Secant] {
        &self.lines
    }

    /// Lower envelope value at `s`.
    #[cfg(test)]
    pub fn value(&self, s: f64) -> f64 {
        self.lines
            .iter()
            .map(|line| line.at(s))
            .fold(f64::INFINITY, f64::min)
    }
}
