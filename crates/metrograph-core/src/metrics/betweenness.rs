//! Betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness centrality measures how often a node lies on shortest paths
//! between other pairs of nodes. In a co-location graph every country is a
//! clique, so no city sits between two others and all scores are zero; the
//! implementation is nevertheless general and is exercised on arbitrary
//! undirected graphs through [`brandes`].
//!
//! # Algorithm
//!
//! Brandes' algorithm (2001) for unweighted graphs:
//!
//! 1. For each source node `s`, run BFS to compute shortest-path counts
//!    and distances.
//! 2. Accumulate dependency scores in reverse BFS order (farthest nodes first).
//! 3. Sum the dependency scores across all source nodes.
//!
//! When several shortest paths join a pair, each intermediate node is
//! credited with its share `σ_st(v) / σ_st`.
//!
//! Complexity: O(V * E).
//!
//! # Normalization
//!
//! Every unordered pair is visited from both endpoints, so raw sums are
//! halved and then scaled by `2 / ((n-1)(n-2))`. Scores lie in `[0, 1]`.
//! Graphs with two nodes or fewer score zero everywhere.

use std::collections::VecDeque;

use petgraph::graph::{NodeIndex, UnGraph};
use tracing::instrument;

use crate::graph::CityGraph;
use crate::metrics::Scores;

/// Compute normalized betweenness centrality for every city.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn betweenness_centrality(graph: &CityGraph) -> Scores {
    Scores::from_node_values(graph, &brandes(graph.inner()))
}

/// Normalized betweenness for any simple undirected graph, indexed by node
/// index.
///
/// Parallel edges would be counted as distinct shortest paths, so callers
/// must pass a simple graph.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn brandes<N, E>(g: &UnGraph<N, E>) -> Vec<f64> {
    let n = g.node_count();

    // Node-indexed betweenness accumulator.
    let mut cb: Vec<f64> = vec![0.0; n];

    if n <= 2 {
        return cb;
    }

    for s in g.node_indices() {
        let si = s.index();

        // Stack: nodes in order of discovery (farthest popped first).
        let mut stack: Vec<NodeIndex> = Vec::with_capacity(n);

        // Predecessor lists: predecessors[w] = nodes immediately preceding w
        // on shortest paths from s.
        let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];

        // sigma[t]: number of shortest paths from s to t.
        let mut sigma: Vec<f64> = vec![0.0; n];
        sigma[si] = 1.0;

        // dist[t]: distance from s to t (-1 = unvisited).
        let mut dist: Vec<i64> = vec![-1; n];
        dist[si] = 0;

        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            let vi = v.index();
            stack.push(v);

            for w in g.neighbors(v) {
                let wi = w.index();

                // First visit to w?
                if dist[wi] < 0 {
                    dist[wi] = dist[vi] + 1;
                    queue.push_back(w);
                }

                // Shortest path to w via v?
                if dist[wi] == dist[vi] + 1 {
                    sigma[wi] += sigma[vi];
                    predecessors[wi].push(v);
                }
            }
        }

        // Accumulate dependencies in reverse BFS order.
        let mut delta: Vec<f64> = vec![0.0; n];

        while let Some(w) = stack.pop() {
            let wi = w.index();

            for &v in &predecessors[wi] {
                let vi = v.index();
                if sigma[wi] > 0.0 {
                    delta[vi] += (sigma[vi] / sigma[wi]) * (1.0 + delta[wi]);
                }
            }

            if wi != si {
                cb[wi] += delta[wi];
            }
        }
    }

    // Halve for undirected double counting, then apply 2 / ((n-1)(n-2)).
    let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
    for score in &mut cb {
        *score *= scale;
    }

    cb
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
