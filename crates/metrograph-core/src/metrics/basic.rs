//! Static node metrics: degree centrality and ridership passthrough.
//!
//! # Overview
//!
//! Both metrics are O(V + E) and need no iteration. Degree centrality is
//! the normalized neighbor count; ridership "centrality" reads the node
//! attribute directly and does not depend on the edge set at all.

use tracing::instrument;

use crate::graph::CityGraph;
use crate::metrics::Scores;

// ---------------------------------------------------------------------------
// Degree Centrality
// ---------------------------------------------------------------------------

/// Compute degree centrality: `deg(v) / (N - 1)`.
///
/// Every score lies in `[0, 1]` and is zero exactly for isolated cities.
/// Graphs with one node or none yield all-zero scores.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn degree_centrality(graph: &CityGraph) -> Scores {
    let g = graph.inner();
    let n = g.node_count();

    let values: Vec<f64> = if n <= 1 {
        vec![0.0; n]
    } else {
        let denom = (n - 1) as f64;
        g.node_indices()
            .map(|idx| g.neighbors(idx).count() as f64 / denom)
            .collect()
    };

    Scores::from_node_values(graph, &values)
}

// ---------------------------------------------------------------------------
// Weighted (ridership) Centrality
// ---------------------------------------------------------------------------

/// Ridership per city, copied verbatim from the node attribute.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn weighted_centrality(graph: &CityGraph) -> Scores {
    let values: Vec<f64> = graph.cities().map(|city| city.ridership).collect();
    Scores::from_node_values(graph, &values)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
