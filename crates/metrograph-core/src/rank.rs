//! Top-N / bottom-N rankings over metric scores.
//!
//! Sorting is stable: cities with exactly equal scores keep the graph's node
//! enumeration order, so rankings are reproducible across runs. Scores are
//! compared with [`f64::total_cmp`].

use std::cmp::Ordering;

use serde::Serialize;

use crate::metrics::Scores;

/// Sort direction for a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    /// Highest score first ("top N").
    #[default]
    Descending,
    /// Lowest score first ("bottom N").
    Ascending,
}

impl Order {
    pub(crate) fn compare(self, a: f64, b: f64) -> Ordering {
        match self {
            Self::Descending => b.total_cmp(&a),
            Self::Ascending => a.total_cmp(&b),
        }
    }
}

/// One ranked city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankEntry {
    pub city: String,
    pub score: f64,
}

impl RankEntry {
    #[must_use]
    pub fn new(city: impl Into<String>, score: f64) -> Self {
        Self {
            city: city.into(),
            score,
        }
    }
}

/// Return the first `n` cities of `scores` sorted in `order`.
///
/// `n` larger than the number of cities returns the full ranking.
#[must_use]
pub fn top_n(scores: &Scores, n: usize, order: Order) -> Vec<RankEntry> {
    let mut ranked: Vec<(&str, f64)> = scores.iter().collect();
    ranked.sort_by(|a, b| order.compare(a.1, b.1));
    ranked
        .into_iter()
        .take(n)
        .map(|(city, score)| RankEntry::new(city, score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CityGraph;
    use crate::metrics::basic::{degree_centrality, weighted_centrality};
    use crate::record::Record;

    fn graph() -> CityGraph {
        CityGraph::build(&[
            Record::new("A", "X", "", 5.0),
            Record::new("B", "X", "", 2.0),
            Record::new("C", "Y", "", 0.0),
        ])
        .expect("build graph")
    }

    #[test]
    fn top_two_by_ridership() {
        let ranked = top_n(&weighted_centrality(&graph()), 2, Order::Descending);
        assert_eq!(ranked, vec![RankEntry::new("A", 5.0), RankEntry::new("B", 2.0)]);
    }

    #[test]
    fn ascending_lists_lowest_first() {
        let ranked = top_n(&weighted_centrality(&graph()), 3, Order::Ascending);
        let cities: Vec<&str> = ranked.iter().map(|e| e.city.as_str()).collect();
        assert_eq!(cities, ["C", "B", "A"]);
    }

    #[test]
    fn n_larger_than_graph_returns_all() {
        let ranked = top_n(&weighted_centrality(&graph()), 100, Order::Descending);
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn zero_n_returns_nothing() {
        assert!(top_n(&weighted_centrality(&graph()), 0, Order::Descending).is_empty());
    }

    #[test]
    fn ties_keep_node_order_both_directions() {
        // A and B tie on degree (0.5); C is 0.0.
        let dc = degree_centrality(&graph());

        let desc = top_n(&dc, 3, Order::Descending);
        let names: Vec<&str> = desc.iter().map(|e| e.city.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);

        let asc = top_n(&dc, 3, Order::Ascending);
        let names: Vec<&str> = asc.iter().map(|e| e.city.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[test]
    fn method_form_matches_free_function() {
        let wc = weighted_centrality(&graph());
        assert_eq!(wc.top_n(2, Order::Descending), top_n(&wc, 2, Order::Descending));
    }
}
