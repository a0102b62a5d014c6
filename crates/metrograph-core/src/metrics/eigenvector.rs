//! Eigenvector centrality via power iteration.
//!
//! # Overview
//!
//! Eigenvector centrality scores nodes based on the idea that connections to
//! high-scoring nodes contribute more to a node's score. It's the dominant
//! eigenvector of the adjacency matrix.
//!
//! # Algorithm
//!
//! The principal eigenvector is only well defined per connected component,
//! and the co-location graph is one component per country. Each component
//! with at least two nodes is solved on its own:
//!
//! 1. Initialize scores uniformly.
//! 2. Apply `(A + I)`: `score(v) = score(v) + sum of score(u) over neighbors u`.
//!    The identity shift leaves the eigenvectors unchanged and keeps the
//!    iteration from oscillating on bipartite components (paths, stars).
//! 3. Normalize the score vector to unit L2 norm.
//! 4. Stop once the L1 change drops below `component_size * tolerance`;
//!    fail with [`GraphError::Convergence`] if `max_iter` runs out first.
//!
//! Isolated nodes score 0. Each converged component vector is scaled by its
//! dominant eigenvalue (Rayleigh quotient), so denser components outrank
//! sparser ones, and the combined vector is normalized to unit L2 norm.
//!
//! # Output
//!
//! [`EigenvectorResult`] with [`Scores`] in node order and the largest
//! iteration count any component needed.

use petgraph::algo::kosaraju_scc;
use petgraph::graph::UnGraph;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::CityGraph;
use crate::metrics::Scores;

/// Power-iteration limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EigenvectorConfig {
    /// Maximum iterations per component.
    pub max_iter: usize,
    /// Per-node convergence tolerance.
    pub tolerance: f64,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-6,
        }
    }
}

/// Result of eigenvector centrality computation.
#[derive(Debug, Clone)]
pub struct EigenvectorResult {
    /// Eigenvector centrality scores: city → score.
    pub scores: Scores,
    /// Largest number of iterations any component needed.
    pub iterations: usize,
    /// Number of components with two or more nodes that were solved.
    pub components: usize,
}

/// Raw power-iteration output for a petgraph graph.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerIteration {
    /// Scores indexed by node index.
    pub values: Vec<f64>,
    pub iterations: usize,
    pub components: usize,
}

/// Compute eigenvector centrality for every city.
///
/// # Errors
///
/// Returns [`GraphError::Convergence`] if any country's component fails to
/// converge within `config.max_iter` iterations.
#[instrument(skip(graph), fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn eigenvector_centrality(
    graph: &CityGraph,
    config: &EigenvectorConfig,
) -> Result<EigenvectorResult, GraphError> {
    let PowerIteration {
        values,
        iterations,
        components,
    } = power_iteration(graph.inner(), config)?;

    debug!(iterations, components, "eigenvector centrality converged");

    Ok(EigenvectorResult {
        scores: Scores::from_node_values(graph, &values),
        iterations,
        components,
    })
}

/// Per-component eigenvector centrality for any simple undirected graph.
///
/// # Errors
///
/// Returns [`GraphError::Convergence`] when a component exhausts
/// `config.max_iter` without meeting the tolerance. No partial scores are
/// returned.
#[allow(clippy::cast_precision_loss)]
pub fn power_iteration<N, E>(
    g: &UnGraph<N, E>,
    config: &EigenvectorConfig,
) -> Result<PowerIteration, GraphError> {
    let n = g.node_count();
    let mut values = vec![0.0; n];
    let mut iterations = 0;
    let mut solved = 0;

    // Position of each node inside its component's local vector.
    let mut local = vec![0usize; n];

    // On an undirected graph each strongly connected component is a
    // connected component.
    for mut members in kosaraju_scc(g) {
        members.sort_unstable();
        let k = members.len();
        if k < 2 {
            continue;
        }

        for (i, idx) in members.iter().enumerate() {
            local[idx.index()] = i;
        }

        let neighbors: Vec<Vec<usize>> = members
            .iter()
            .map(|&v| g.neighbors(v).map(|u| local[u.index()]).collect())
            .collect();

        let (scores, used) = solve_component(&neighbors, config)?;
        iterations = iterations.max(used);
        solved += 1;

        let lambda = rayleigh_quotient(&neighbors, &scores);
        for (idx, score) in members.iter().zip(scores) {
            values[idx.index()] = lambda * score;
        }
    }

    let norm: f64 = values.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in &mut values {
            *x /= norm;
        }
    }

    Ok(PowerIteration {
        values,
        iterations,
        components: solved,
    })
}

/// Shifted power iteration on one connected component given as local
/// adjacency lists. Returns the unit eigenvector and the iterations used.
#[allow(clippy::cast_precision_loss)]
fn solve_component(
    neighbors: &[Vec<usize>],
    config: &EigenvectorConfig,
) -> Result<(Vec<f64>, usize), GraphError> {
    let k = neighbors.len();
    let mut scores = vec![1.0 / (k as f64).sqrt(); k];
    let threshold = k as f64 * config.tolerance;

    for iter in 0..config.max_iter {
        let mut next: Vec<f64> = scores.clone();
        for (v, nbrs) in neighbors.iter().enumerate() {
            for &u in nbrs {
                next[v] += scores[u];
            }
        }

        // Normalize to unit L2 norm.
        let norm: f64 = next.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for x in &mut next {
                *x /= norm;
            }
        }

        // Check convergence.
        let diff: f64 = scores
            .iter()
            .zip(next.iter())
            .map(|(a, b)| (a - b).abs())
            .sum();

        scores = next;

        if diff <= threshold {
            return Ok((scores, iter + 1));
        }
    }

    Err(GraphError::Convergence {
        iterations: config.max_iter,
        tolerance: config.tolerance,
    })
}

/// `xᵀAx` for a unit vector `x`: the dominant eigenvalue once converged.
fn rayleigh_quotient(neighbors: &[Vec<usize>], x: &[f64]) -> f64 {
    neighbors
        .iter()
        .enumerate()
        .map(|(v, nbrs)| x[v] * nbrs.iter().map(|&u| x[u]).sum::<f64>())
        .sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
