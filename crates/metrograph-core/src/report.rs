//! Combined per-city centrality report.
//!
//! Computes all four metrics once and joins them into one row per city, in
//! node order. Ranking a row set by any metric uses the same stable ordering
//! as [`crate::rank::top_n`].

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::GraphError;
use crate::graph::CityGraph;
use crate::metrics::{
    EigenvectorConfig, Metric, Scores, betweenness_centrality, degree_centrality,
    eigenvector_centrality, weighted_centrality,
};
use crate::rank::{Order, RankEntry};

/// All four scores for one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityMetrics {
    pub city: String,
    pub country: String,
    pub degree: f64,
    pub betweenness: f64,
    pub eigenvector: f64,
    /// Annual ridership in millions.
    pub ridership: f64,
}

impl CityMetrics {
    /// The value of one metric for this city.
    #[must_use]
    pub const fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Degree => self.degree,
            Metric::Betweenness => self.betweenness,
            Metric::Eigenvector => self.eigenvector,
            Metric::Ridership => self.ridership,
        }
    }
}

/// Scores for every metric plus the joined rows.
#[derive(Debug, Clone, Serialize)]
pub struct CentralityReport {
    pub degree: Scores,
    pub betweenness: Scores,
    pub eigenvector: Scores,
    pub ridership: Scores,
    /// Iterations the slowest eigenvector component needed.
    pub eigenvector_iterations: usize,
    #[serde(skip)]
    rows: Vec<CityMetrics>,
}

impl CentralityReport {
    /// Compute every metric over `graph`.
    ///
    /// # Errors
    ///
    /// Propagates [`GraphError::Convergence`] from eigenvector centrality.
    #[instrument(skip(graph, config), fields(nodes = graph.node_count()))]
    pub fn compute(graph: &CityGraph, config: &EigenvectorConfig) -> Result<Self, GraphError> {
        let degree = degree_centrality(graph);
        let betweenness = betweenness_centrality(graph);
        let ev = eigenvector_centrality(graph, config)?;
        let ridership = weighted_centrality(graph);

        let rows = graph
            .cities()
            .map(|city| {
                let name = city.name.as_str();
                CityMetrics {
                    city: city.name.clone(),
                    country: city.country.clone(),
                    degree: degree.get(name).unwrap_or(0.0),
                    betweenness: betweenness.get(name).unwrap_or(0.0),
                    eigenvector: ev.scores.get(name).unwrap_or(0.0),
                    ridership: city.ridership,
                }
            })
            .collect::<Vec<_>>();

        debug!(rows = rows.len(), "centrality report computed");

        Ok(Self {
            degree,
            betweenness,
            eigenvector: ev.scores,
            ridership,
            eigenvector_iterations: ev.iterations,
            rows,
        })
    }

    /// Scores for one metric.
    #[must_use]
    pub const fn scores(&self, metric: Metric) -> &Scores {
        match metric {
            Metric::Degree => &self.degree,
            Metric::Betweenness => &self.betweenness,
            Metric::Eigenvector => &self.eigenvector,
            Metric::Ridership => &self.ridership,
        }
    }

    /// Joined rows in node order.
    #[must_use]
    pub fn rows(&self) -> &[CityMetrics] {
        &self.rows
    }

    /// Top (or bottom) `n` cities for one metric.
    #[must_use]
    pub fn top(&self, metric: Metric, n: usize, order: Order) -> Vec<RankEntry> {
        self.scores(metric).top_n(n, order)
    }

    /// Full rows sorted by one metric, first `n` kept. Ties keep node order.
    #[must_use]
    pub fn ranked(&self, metric: Metric, n: usize, order: Order) -> Vec<&CityMetrics> {
        let mut rows: Vec<&CityMetrics> = self.rows.iter().collect();
        rows.sort_by(|a, b| order.compare(a.value(metric), b.value(metric)));
        rows.truncate(n);
        rows
    }
}
