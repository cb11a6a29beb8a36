//! Immutable catalog of node types.

use crate::error::DesignError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One purchasable node type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeType {
    pub cost: f64,
    pub reliability: f64,
}

/// Node types indexed `0..len()`.
///
/// A catalog is validated once on construction and never changes, so every
/// formulation can rely on positive costs and reliabilities in `(0, 1)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    types: Vec<NodeType>,
}

impl Catalog {
    pub fn new(types: Vec<NodeType>) -> Result<Self, DesignError> {
        if types.is_empty() {
            return Err(invalid("catalog has no node types"));
        }
        for (index, node_type) in types.iter().enumerate() {
            if !node_type.cost.is_finite() || node_type.cost <= 0.0 {
                return Err(invalid(format!(
                    "type {index} has non-positive or non-finite cost {}",
                    node_type.cost
                )));
            }
            if !(node_type.reliability > 0.0 && node_type.reliability < 1.0) {
                return Err(invalid(format!(
                    "type {index} has reliability {} outside (0, 1)",
                    node_type.reliability
                )));
            }
        }
        Ok(Self { types })
    }

    /// Build from parallel cost and reliability slices.
    pub fn from_slices(costs: &[f64], reliabilities: &[f64]) -> Result<Self, DesignError> {
        if costs.len() != reliabilities.len() {
            return Err(invalid(format!(
                "{} costs but {} reliabilities",
                costs.len(),
                reliabilities.len()
            )));
        }
        Self::new(
            costs
                .iter()
                .zip(reliabilities)
                .map(|(&cost, &reliability)| NodeType { cost, reliability })
                .collect(),
        )
    }

    /// Build from index-keyed tables; indices must be exactly `0..n`.
    pub fn from_tables(
        costs: &BTreeMap<usize, f64>,
        reliabilities: &BTreeMap<usize, f64>,
    ) -> Result<Self, DesignError> {
        if !costs.keys().eq(reliabilities.keys()) {
            return Err(invalid("cost and reliability tables index different types"));
        }
        if !costs.keys().copied().eq(0..costs.len()) {
            return Err(invalid("type indices must be contiguous from 0"));
        }
        let costs: Vec<f64> = costs.values().copied().collect();
        let reliabilities: Vec<f64> = reliabilities.values().copied().collect();
        Self::from_slices(&costs, &reliabilities)
    }

    pub fn get(&self, index: usize) -> Option<NodeType> {
        self.types.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the catalog has no node types. Constructors reject empty input.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeType> {
        self.types.iter()
    }

    pub fn costs(&self) -> Vec<f64> {
        self.types.iter().map(|t| t.cost).collect()
    }

    pub fn reliabilities(&self) -> Vec<f64> {
        self.types.iter().map(|t| t.reliability).collect()
    }

    pub fn min_cost(&self) -> f64 {
        self.types.iter().map(|t| t.cost).fold(f64::INFINITY, f64::min)
    }

    pub fn max_cost(&self) -> f64 {
        self.types.iter().map(|t| t.cost).fold(0.0, f64::max)
    }

    pub fn min_reliability(&self) -> f64 {
        self.types
            .iter()
            .map(|t| t.reliability)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn max_reliability(&self) -> f64 {
        self.types.iter().map(|t| t.reliability).fold(0.0, f64::max)
    }

    /// Distinct reliabilities in increasing order.
    pub fn reliability_breakpoints(&self) -> Vec<f64> {
        sorted_distinct(self.types.iter().map(|t| t.reliability))
    }

    /// Distinct unreliabilities `1 - r` in increasing order.
    pub fn unreliability_breakpoints(&self) -> Vec<f64> {
        sorted_distinct(self.types.iter().map(|t| 1.0 - t.reliability))
    }
}

fn sorted_distinct(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}

fn invalid(reason: impl Into<String>) -> DesignError {
    DesignError::InvalidCatalog {
        reason: reason.into(),
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::from_slices(&[5.0, 12.0, 30.0], &[0.6, 0.7, 0.8]).unwrap()
    }

    #[test]
    fn test_accessors() {
        let catalog = sample();
        assert_eq!(catalog.len(), 3);
        assert!(!catalog.is_empty());
        assert_eq!(
            catalog.get(1),
            Some(NodeType {
                cost: 12.0,
                reliability: 0.7
            })
        );
        assert_eq!(catalog.get(3), None);
        assert_eq!(catalog.min_cost(), 5.0);
        assert_eq!(catalog.max_cost(), 30.0);
        assert_eq!(catalog.min_reliability(), 0.6);
        assert_eq!(catalog.max_reliability(), 0.8);
    }

    #[test]
    fn test_breakpoints_are_sorted_and_distinct() {
        let catalog = Catalog::from_slices(&[3.0, 1.0, 2.0], &[0.9, 0.5, 0.9]).unwrap();
        assert_eq!(catalog.reliability_breakpoints(), vec![0.5, 0.9]);
        let unreliability = catalog.unreliability_breakpoints();
        assert_eq!(unreliability.len(), 2);
        assert!(unreliability[0] < unreliability[1]);
    }

    #[test]
    fn test_rejects_malformed_tables() {
        assert!(Catalog::new(Vec::new()).is_err());
        assert!(Catalog::from_slices(&[1.0, 2.0], &[0.5]).is_err());
        assert!(Catalog::from_slices(&[0.0], &[0.5]).is_err());
        assert!(Catalog::from_slices(&[f64::INFINITY], &[0.5]).is_err());
        assert!(Catalog::from_slices(&[1.0], &[1.0]).is_err());
        assert!(Catalog::from_slices(&[1.0], &[0.0]).is_err());
        let err = Catalog::from_slices(&[1.0], &[f64::NAN]).unwrap_err();
        assert_eq!(err.code(), "INPUT_CATALOG");
    }

    #[test]
    fn test_tables_must_be_contiguous() {
        let costs = BTreeMap::from([(0, 24.2), (2, 91.82)]);
        let reliabilities = BTreeMap::from([(0, 0.9), (2, 0.95)]);
        assert!(Catalog::from_tables(&costs, &reliabilities).is_err());

        let costs = BTreeMap::from([(0, 24.2), (1, 91.82)]);
        let reliabilities = BTreeMap::from([(0, 0.9), (2, 0.95)]);
        assert!(Catalog::from_tables(&costs, &reliabilities).is_err());

        let reliabilities = BTreeMap::from([(1, 0.95), (0, 0.9)]);
        let catalog = Catalog::from_tables(&costs, &reliabilities).unwrap();
        assert_eq!(catalog.reliabilities(), vec![0.9, 0.95]);
    }
}
