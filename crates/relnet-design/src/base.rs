//! Topology-independent part of every design model.

use crate::catalog::Catalog;
use crate::error::{DesignError, check_node_count};
use relnet_core::{Bounds, ConstraintId, Expr, Model, Variable, VariableId};
use tracing::debug;

/// Name of the removable row pinning the link cost of the base model to zero.
pub const LINKS_COST_DEFINITION: &str = "LinksCost_General";

/// Typed handles into a base model.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseHandles {
    /// `assignment[u][i]` is the binary `x[u,i]`.
    pub assignment: Vec<Vec<VariableId>>,
    pub nodes_cost: VariableId,
    pub links_cost: VariableId,
    /// Row `linksCost = 0`, replaced by each topology.
    pub links_cost_definition: ConstraintId,
}

impl BaseHandles {
    pub fn total_nodes(&self) -> usize {
        self.assignment.len()
    }
}

/// Base model plus its handles. Topologies clone `model`, never mutate it.
#[derive(Debug, Clone)]
pub struct BaseFormulation {
    pub model: Model,
    pub handles: BaseHandles,
}

impl BaseFormulation {
    pub fn total_nodes(&self) -> usize {
        self.handles.total_nodes()
    }

    /// Check that every handle still resolves in `model` and matches `catalog`.
    pub fn verify(&self, catalog: &Catalog) -> Result<(), DesignError> {
        let missing = |artifact: String| DesignError::MissingModelArtifact { artifact };

        for (u, row) in self.handles.assignment.iter().enumerate() {
            if row.len() != catalog.len() {
                return Err(DesignError::InvalidCatalog {
                    reason: format!(
                        "base has {} types for node {u} but catalog has {}",
                        row.len(),
                        catalog.len()
                    ),
                });
            }
            if let Some(i) = row.iter().position(|&x| !self.model.has_variable(x)) {
                return Err(missing(format!("assignment variable x[{u},{i}]")));
            }
        }
        if !self.model.has_variable(self.handles.nodes_cost) {
            return Err(missing("nodes-cost variable".to_string()));
        }
        if !self.model.has_variable(self.handles.links_cost) {
            return Err(missing("links-cost variable".to_string()));
        }
        if !self.model.has_constraint(self.handles.links_cost_definition) {
            return Err(missing(format!(
                "links-cost definition ({LINKS_COST_DEFINITION})"
            )));
        }
        Ok(())
    }
}

/// Build the assignment grid, node cost and link cost placeholder.
///
/// Nothing is optimized here. The link cost is pinned to zero by a named row
/// that each topology removes and replaces.
pub fn build_base(total_nodes: usize, catalog: &Catalog) -> Result<BaseFormulation, DesignError> {
    check_node_count(total_nodes)?;

    let mut model = Model::named(format!("base_{total_nodes}"));
    let costs = catalog.costs();

    let mut assignment = Vec::with_capacity(total_nodes);
    for u in 0..total_nodes {
        let row = (0..catalog.len())
            .map(|i| model.add_named_variable(format!("x[{u},{i}]"), Variable::binary()))
            .collect::<Result<Vec<_>, _>>()?;
        model.add_named_constraint(
            format!("OneType[{u}]"),
            Expr::sum_of(row.iter().copied()).eq_scalar(1.0),
        )?;
        assignment.push(row);
    }

    let nodes_cost = model.add_named_variable(
        "nodesCost",
        Variable::continuous(Bounds::new(0.0, total_nodes as f64 * catalog.max_cost())),
    )?;
    let mut cost_terms = Expr::new_empty();
    for row in &assignment {
        cost_terms = cost_terms + Expr::weighted(row, &costs)?;
    }
    model.add_named_constraint(
        "NodesCost",
        Expr::var(nodes_cost).eq_expr(&cost_terms),
    )?;

    // Widened by each topology to its own link-cost range.
    let links_cost =
        model.add_named_variable("linksCost", Variable::continuous(Bounds::fixed(0.0)))?;
    let links_cost_definition = model.add_named_constraint(
        LINKS_COST_DEFINITION,
        Expr::var(links_cost).eq_scalar(0.0),
    )?;

    model.minimize(Expr::var(nodes_cost) + Expr::var(links_cost))?;

    debug!(
        component = "design",
        operation = "build_base",
        status = "success",
        total_nodes,
        node_types = catalog.len(),
        variables = model.num_variables(),
        constraints = model.num_constraints(),
        "Built base formulation"
    );

    Ok(BaseFormulation {
        model,
        handles: BaseHandles {
            assignment,
            nodes_cost,
            links_cost,
            links_cost_definition,
        },
    })
}

/// Clone the base model without its zero link-cost row.
///
/// The link-cost variable is widened to `[0, max_links_cost]`; the caller
/// adds the topology's own defining row.
pub(crate) fn clone_without_link_cost(
    base: &BaseFormulation,
    catalog: &Catalog,
    max_links_cost: f64,
) -> Result<Model, DesignError> {
    base.verify(catalog)?;

    let mut model = base.model.clone();
    model.remove_constraint(base.handles.links_cost_definition)?;
    model.set_variable_bounds(base.handles.links_cost, Bounds::new(0.0, max_links_cost))?;
    Ok(model)
}
