//! Centrality metrics for the city graph.
//!
//! # Overview
//!
//! Each metric answers a different question about a city's place in the
//! co-location graph:
//!
//! - **Degree centrality** (`basic`): What fraction of all other cities
//!   share this city's country?
//! - **Betweenness centrality** (`betweenness`): How often does this city
//!   lie on shortest paths between other cities?
//! - **Eigenvector centrality** (`eigenvector`): Is this city connected to
//!   other well-connected cities?
//! - **Ridership** (`basic`): The city's annual ridership. This is a node
//!   attribute, not a graph-derived measure; it is ranked alongside the
//!   others so all four metrics share one interface.
//!
//! # Usage
//!
//! All metrics take a [`CityGraph`] reference and return [`Scores`] in node
//! enumeration order.
//!
//! ```rust,ignore
//! use metrograph_core::metrics::basic::{degree_centrality, weighted_centrality};
//! use metrograph_core::metrics::betweenness::betweenness_centrality;
//! use metrograph_core::metrics::eigenvector::{EigenvectorConfig, eigenvector_centrality};
//!
//! let dc = degree_centrality(&graph);
//! let bc = betweenness_centrality(&graph);
//! let ev = eigenvector_centrality(&graph, &EigenvectorConfig::default())?;
//! let wc = weighted_centrality(&graph);
//! ```

pub mod basic;
pub mod betweenness;
pub mod eigenvector;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::graph::CityGraph;
use crate::rank::{self, Order, RankEntry};

pub use basic::{degree_centrality, weighted_centrality};
pub use betweenness::betweenness_centrality;
pub use eigenvector::{EigenvectorConfig, EigenvectorResult, eigenvector_centrality};

// ---------------------------------------------------------------------------
// Metric
// ---------------------------------------------------------------------------

/// The four ranked centrality measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Degree,
    Betweenness,
    Eigenvector,
    Ridership,
}

impl Metric {
    /// All metrics in report column order.
    pub const ALL: [Self; 4] = [
        Self::Degree,
        Self::Betweenness,
        Self::Eigenvector,
        Self::Ridership,
    ];

    /// Stable lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::Betweenness => "betweenness",
            Self::Eigenvector => "eigenvector",
            Self::Ridership => "ridership",
        }
    }

    /// Human heading, e.g. "Degree Centrality".
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Degree => "Degree Centrality",
            Self::Betweenness => "Betweenness Centrality",
            Self::Eigenvector => "Eigenvector Centrality",
            Self::Ridership => "Weighted Centrality (Ridership)",
        }
    }

    /// Returns `true` for metrics derived from graph structure.
    #[must_use]
    pub const fn is_structural(self) -> bool {
        !matches!(self, Self::Ridership)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degree" => Ok(Self::Degree),
            "betweenness" => Ok(Self::Betweenness),
            "eigenvector" => Ok(Self::Eigenvector),
            "ridership" | "weighted" => Ok(Self::Ridership),
            other => Err(format!("unknown metric '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// Per-city scores for one metric.
///
/// Entries are held in graph node enumeration order, which is also the
/// tie-break order used by [`Scores::top_n`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scores {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl Scores {
    /// Pair `values` (indexed by node index) with the graph's city names.
    pub(crate) fn from_node_values(graph: &CityGraph, values: &[f64]) -> Self {
        let entries: Vec<(String, f64)> = graph
            .cities()
            .zip(values.iter().copied())
            .map(|(city, score)| (city.name.clone(), score))
            .collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), i))
            .collect();
        Self { entries, index }
    }

    /// Score for `city`, or `None` if the city is not in the graph.
    #[must_use]
    pub fn get(&self, city: &str) -> Option<f64> {
        self.index.get(city).map(|&i| self.entries[i].1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(city, score)` pairs in node order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(name, score)| (name.as_str(), *score))
    }

    /// The `n` best (or worst) cities by score. See [`rank::top_n`].
    #[must_use]
    pub fn top_n(&self, n: usize, order: Order) -> Vec<RankEntry> {
        rank::top_n(self, n, order)
    }

    /// Copy scores into an unordered map.
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, f64> {
        self.entries.iter().cloned().collect()
    }
}

impl Serialize for Scores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, score) in &self.entries {
            map.serialize_entry(name, score)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn graph() -> CityGraph {
        CityGraph::build(&[
            Record::new("A", "X", "", 1.0),
            Record::new("B", "X", "", 2.0),
            Record::new("C", "Y", "", 3.0),
        ])
        .expect("build graph")
    }

    #[test]
    fn scores_follow_node_order() {
        let scores = Scores::from_node_values(&graph(), &[0.1, 0.2, 0.3]);
        let names: Vec<&str> = scores.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert_eq!(scores.get("B"), Some(0.2));
        assert_eq!(scores.get("missing"), None);
        assert_eq!(scores.len(), 3);
    }

    #[test]
    fn scores_serialize_as_ordered_map() {
        let scores = Scores::from_node_values(&graph(), &[0.5, 0.25, 0.0]);
        let json = serde_json::to_string(&scores).expect("serialize");
        assert_eq!(json, r#"{"A":0.5,"B":0.25,"C":0.0}"#);
    }

    #[test]
    fn metric_parses_aliases() {
        assert_eq!("Degree".parse::<Metric>(), Ok(Metric::Degree));
        assert_eq!("weighted".parse::<Metric>(), Ok(Metric::Ridership));
        assert!("closeness".parse::<Metric>().is_err());
    }

    #[test]
    fn only_ridership_is_not_structural() {
        let structural: Vec<Metric> = Metric::ALL
            .into_iter()
            .filter(|m| m.is_structural())
            .collect();
        assert_eq!(
            structural,
            [Metric::Degree, Metric::Betweenness, Metric::Eigenvector]
        );
    }
}
