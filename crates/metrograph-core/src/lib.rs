#![forbid(unsafe_code)]
//! metrograph-core library.
//!
//! Builds the same-country co-location graph of metro systems and ranks
//! cities by degree, betweenness, eigenvector and ridership centrality.
//!
//! # Conventions
//!
//! - **Errors**: Use [`error::GraphError`] for fallible operations.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//!
//! # Pipeline
//!
//! ```text
//! &[Record]
//!     ↓  graph::CityGraph::build()
//! CityGraph (UnGraph<City, ()>, one clique per country)
//!     ↓  metrics::{degree, betweenness, eigenvector, weighted}
//! Scores (city → f64, node order)
//!     ↓  rank::top_n()
//! Vec<RankEntry>
//! ```

pub mod error;
pub mod graph;
pub mod metrics;
pub mod rank;
pub mod record;
pub mod report;

pub use error::GraphError;
pub use graph::{City, CityGraph, GraphStats};
pub use metrics::{EigenvectorConfig, EigenvectorResult, Metric, Scores};
pub use rank::{Order, RankEntry, top_n};
pub use record::Record;
pub use report::{CentralityReport, CityMetrics};
