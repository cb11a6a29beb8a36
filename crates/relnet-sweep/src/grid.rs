//! Equidistant reliability targets.

/// Smallest default target.
pub const DEFAULT_START: f64 = 0.5;
/// Largest `f64` below one; the default grid stays strictly inside it.
pub const DEFAULT_END: f64 = 0.999_999_999_999_999_9;
pub const DEFAULT_COUNT: usize = 200;

const DECIMALS: f64 = 1e12;

#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Zero points requested
    EmptyGrid,
    /// `end` does not lie above `start`
    InvalidRange { start: f64, end: f64 },
}

impl GridError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            GridError::EmptyGrid => "GRID_EMPTY",
            GridError::InvalidRange { .. } => "GRID_RANGE",
        }
    }
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::EmptyGrid => write!(f, "[{}] Grid needs at least one point", self.code()),
            GridError::InvalidRange { start, end } => write!(
                f,
                "[{}] Grid end must exceed its start (start={}, end={})",
                self.code(),
                start,
                end
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// `count` points strictly between `start` and `end`, spaced
/// `(end − start)/(count + 1)` apart and rounded to 12 decimals.
pub fn equidistant(start: f64, end: f64, count: usize) -> Result<Vec<f64>, GridError> {
    if count == 0 {
        return Err(GridError::EmptyGrid);
    }
    if start.is_nan() || end.is_nan() || end <= start {
        return Err(GridError::InvalidRange { start, end });
    }

    let step = (end - start) / (count + 1) as f64;
    Ok((1..=count)
        .map(|k| ((start + step * k as f64) * DECIMALS).round() / DECIMALS)
        .collect())
}
