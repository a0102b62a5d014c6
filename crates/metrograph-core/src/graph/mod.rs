//! City co-location graph.
//!
//! # Overview
//!
//! This module turns cleaned metro [`Record`](crate::record::Record)s into an
//! undirected petgraph graph: one node per city, and an edge between every
//! pair of cities that share a country. The resulting [`CityGraph`] feeds all
//! centrality metrics in [`crate::metrics`].
//!
//! ## Pipeline
//!
//! ```text
//! &[Record]
//!        ↓  build::CityGraph::build()
//! CityGraph (UnGraph, union of per-country cliques)
//!        ↓  stats::GraphStats::from_graph()
//! GraphStats (density, country count, component count, …)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use metrograph_core::graph::{CityGraph, GraphStats};
//!
//! let graph = CityGraph::build(&records)?;
//! let stats = GraphStats::from_graph(&graph);
//!
//! println!("cities={} edges={} countries={}",
//!     stats.node_count, stats.edge_count, stats.country_count);
//! ```

pub mod build;
pub mod stats;

// Re-export primary types at module level for convenience.
pub use build::{City, CityGraph};
pub use stats::GraphStats;
