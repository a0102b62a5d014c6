//! Basic graph statistics for the city graph.
//!
//! # Statistics Provided
//!
//! - **node_count**: Number of cities.
//! - **edge_count**: Number of same-country edges.
//! - **density**: Ratio of actual edges to maximum possible edges for an
//!   undirected graph: `density = 2 * edge_count / (node_count * (node_count - 1))`.
//!   Zero for empty or single-node graphs.
//! - **country_count**: Number of distinct countries.
//! - **component_count**: Number of connected components. Since edges only
//!   join cities of the same country, this equals `country_count`.
//! - **isolated_node_count**: Cities that are the only one in their country.
//! - **max_degree**: Highest number of same-country neighbors.
//! - **largest_country**: Country with the most cities (first seen wins ties).

use petgraph::algo::connected_components;
use serde::Serialize;

use crate::graph::build::CityGraph;

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// The country with the most cities, with its city count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LargestCountry {
    pub country: String,
    pub city_count: usize,
}

/// Summary statistics for a [`CityGraph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    /// Number of cities (nodes) in the graph.
    pub node_count: usize,
    /// Number of same-country edges.
    pub edge_count: usize,
    /// Graph density, 0.0 (no edges) to 1.0 (every pair connected).
    pub density: f64,
    /// Number of distinct countries.
    pub country_count: usize,
    /// Number of connected components.
    pub component_count: usize,
    /// Number of nodes with no incident edges.
    pub isolated_node_count: usize,
    /// Maximum node degree.
    pub max_degree: usize,
    /// Country with the most cities, `None` for an empty graph.
    pub largest_country: Option<LargestCountry>,
}

impl GraphStats {
    /// Compute statistics from a [`CityGraph`].
    #[must_use]
    pub fn from_graph(graph: &CityGraph) -> Self {
        let g = graph.inner();
        let node_count = g.node_count();
        let edge_count = g.edge_count();

        let groups = graph.country_groups();

        let isolated_node_count = g
            .node_indices()
            .filter(|&idx| g.neighbors(idx).next().is_none())
            .count();

        let max_degree = g
            .node_indices()
            .map(|idx| g.neighbors(idx).count())
            .max()
            .unwrap_or(0);

        // Strict `>` keeps the first country on ties.
        let mut largest_country: Option<LargestCountry> = None;
        for (country, members) in &groups {
            if largest_country
                .as_ref()
                .is_none_or(|best| members.len() > best.city_count)
            {
                largest_country = Some(LargestCountry {
                    country: (*country).to_string(),
                    city_count: members.len(),
                });
            }
        }

        Self {
            node_count,
            edge_count,
            density: compute_density(node_count, edge_count),
            country_count: groups.len(),
            component_count: connected_components(g),
            isolated_node_count,
            max_degree,
            largest_country,
        }
    }

    /// Returns `true` if no two cities share a country.
    #[must_use]
    pub const fn is_edgeless(&self) -> bool {
        self.edge_count == 0
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0;
    }
    let max_edges = (node_count * (node_count - 1)) as f64 / 2.0;
    edge_count as f64 / max_edges
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
