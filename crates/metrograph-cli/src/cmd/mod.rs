pub mod completions;
pub mod export;
pub mod rank;
pub mod stats;
pub mod table;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use metrograph_core::{CentralityReport, CityGraph, Metric};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::Config;
use crate::loader;
use crate::timing::timed;

/// Positional CSV argument shared by the analysis commands.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Metro systems CSV with City, Country, Name and ridership columns.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,
}

impl InputArgs {
    /// Load, clean and build the co-location graph.
    pub fn load_graph(&self, config: &Config) -> Result<CityGraph> {
        let loaded = timed("load", || loader::load_records(&self.input, &config.input))?;
        if loaded.rows_dropped > 0 {
            info!(
                read = loaded.rows_read,
                dropped = loaded.rows_dropped,
                "skipped rows with a blank city or country"
            );
        }

        let graph = timed("build", || CityGraph::build(&loaded.records))
            .context("Failed to build city graph")?;
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "co-location graph ready"
        );
        Ok(graph)
    }
}

/// Compute every metric with the configured eigenvector limits.
pub fn compute_report(graph: &CityGraph, config: &Config) -> Result<CentralityReport> {
    timed("metrics", || {
        CentralityReport::compute(graph, &config.analysis.eigenvector())
    })
    .context("Failed to compute centrality")
}

/// CLI spelling of [`Metric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    Degree,
    Betweenness,
    Eigenvector,
    #[value(alias = "weighted")]
    Ridership,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Degree => Self::Degree,
            MetricArg::Betweenness => Self::Betweenness,
            MetricArg::Eigenvector => Self::Eigenvector,
            MetricArg::Ridership => Self::Ridership,
        }
    }
}

/// Display precision: ridership in millions to 2 places, scores to 4.
#[must_use]
pub const fn decimals(metric: Metric) -> usize {
    match metric {
        Metric::Ridership => 2,
        _ => 4,
    }
}

/// Round `value` to the display precision of `metric`.
#[must_use]
pub fn round_for(metric: Metric, value: f64) -> f64 {
    let scale = if decimals(metric) == 2 { 1e2 } else { 1e4 };
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_arg_maps_to_core_metric() {
        assert_eq!(Metric::from(MetricArg::Degree), Metric::Degree);
        assert_eq!(Metric::from(MetricArg::Ridership), Metric::Ridership);
    }

    #[test]
    fn weighted_alias_parses() {
        let arg = MetricArg::from_str("weighted", true).expect("alias");
        assert_eq!(arg, MetricArg::Ridership);
    }

    #[test]
    fn rounding_matches_display_precision() {
        assert!((round_for(Metric::Degree, 0.123_456) - 0.1235).abs() < 1e-12);
        assert!((round_for(Metric::Ridership, 12.345_6) - 12.35).abs() < 1e-12);
        assert_eq!(decimals(Metric::Eigenvector), 4);
    }
}
