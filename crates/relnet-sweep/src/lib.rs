//! Command-line driver for reliability cost sweeps.
//!
//! Loads a [`config::NetworkConfig`], builds the equidistant target grid,
//! solves every topology for every point and renders the results.

pub mod config;
pub mod grid;
pub mod logging;
pub mod report;
pub mod sweep;

pub use config::{ConfigError, NetworkConfig};
pub use grid::{GridError, equidistant};
pub use sweep::{SweepPlan, SweepPoint, SweepSeries, run_sweep};
