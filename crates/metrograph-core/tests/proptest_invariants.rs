use std::collections::HashMap;

use metrograph_core::graph::CityGraph;
use metrograph_core::metrics::basic::{degree_centrality, weighted_centrality};
use metrograph_core::metrics::betweenness::betweenness_centrality;
use metrograph_core::metrics::eigenvector::{EigenvectorConfig, eigenvector_centrality};
use metrograph_core::rank::{Order, top_n};
use metrograph_core::Record;
use proptest::prelude::*;

/// Records drawn from small city/country pools so duplicates and shared
/// countries are common.
fn arb_records() -> impl Strategy<Value = Vec<Record>> {
    let record = (0u8..24, 0u8..6, 0u32..50).prop_map(|(city, country, riders)| {
        Record::new(
            format!("city-{city}"),
            format!("country-{country}"),
            format!("system-{city}"),
            f64::from(riders),
        )
    });
    prop::collection::vec(record, 0..40)
}

/// Final (last-write-wins) country per city.
fn final_countries(records: &[Record]) -> HashMap<&str, &str> {
    records
        .iter()
        .map(|r| (r.city.as_str(), r.country.as_str()))
        .collect()
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn edges_are_exactly_same_country_pairs(records in arb_records()) {
        let graph = CityGraph::build(&records).expect("build graph");
        let countries = final_countries(&records);

        let names: Vec<&str> = graph.cities().map(|c| c.name.as_str()).collect();
        prop_assert_eq!(names.len(), countries.len());

        let mut expected_edges = 0usize;
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                let same = countries[a] == countries[b];
                prop_assert_eq!(graph.contains_edge(a, b), same, "{} / {}", a, b);
                if same {
                    expected_edges += 1;
                }
            }
        }
        prop_assert_eq!(graph.edge_count(), expected_edges);
    }

    #[test]
    fn degree_in_unit_range_and_zero_iff_isolated(records in arb_records()) {
        let graph = CityGraph::build(&records).expect("build graph");
        let dc = degree_centrality(&graph);

        for (city, score) in dc.iter() {
            prop_assert!((0.0..=1.0).contains(&score), "{} = {}", city, score);
            let isolated = graph.degree(city) == Some(0);
            prop_assert_eq!(score == 0.0, isolated, "{}", city);
        }
    }

    #[test]
    fn betweenness_in_unit_range_and_zero_for_low_degree(records in arb_records()) {
        let graph = CityGraph::build(&records).expect("build graph");
        let bc = betweenness_centrality(&graph);

        for (city, score) in bc.iter() {
            prop_assert!((0.0..=1.0 + 1e-12).contains(&score), "{} = {}", city, score);
            if graph.degree(city).is_some_and(|d| d <= 1) {
                prop_assert_eq!(score, 0.0, "{}", city);
            }
        }
    }

    #[test]
    fn weighted_is_passthrough(records in arb_records()) {
        let graph = CityGraph::build(&records).expect("build graph");
        let wc = weighted_centrality(&graph);

        for city in graph.cities() {
            prop_assert_eq!(wc.get(&city.name), Some(city.ridership));
        }
    }

    #[test]
    fn eigenvector_is_unit_or_zero(records in arb_records()) {
        let graph = CityGraph::build(&records).expect("build graph");
        let ev = eigenvector_centrality(&graph, &EigenvectorConfig::default())
            .expect("cliques converge");

        let sum_sq: f64 = ev.scores.iter().map(|(_, s)| s * s).sum();
        if graph.edge_count() == 0 {
            prop_assert_eq!(sum_sq, 0.0);
        } else {
            prop_assert!((sum_sq - 1.0).abs() < 1e-9, "sum of squares {}", sum_sq);
        }
        for (city, score) in ev.scores.iter() {
            prop_assert!(score >= 0.0);
            if graph.degree(city) == Some(0) {
                prop_assert_eq!(score, 0.0, "{}", city);
            }
        }
    }

    #[test]
    fn metrics_are_pure(records in arb_records()) {
        let graph = CityGraph::build(&records).expect("build graph");
        let config = EigenvectorConfig::default();

        prop_assert_eq!(degree_centrality(&graph), degree_centrality(&graph));
        prop_assert_eq!(betweenness_centrality(&graph), betweenness_centrality(&graph));
        let a = eigenvector_centrality(&graph, &config).expect("converges");
        let b = eigenvector_centrality(&graph, &config).expect("converges");
        prop_assert_eq!(a.scores, b.scores);
    }

    #[test]
    fn ranking_ties_follow_node_order(records in arb_records(), n in 0usize..40) {
        let graph = CityGraph::build(&records).expect("build graph");
        let dc = degree_centrality(&graph);
        let position: HashMap<&str, usize> = graph
            .cities()
            .enumerate()
            .map(|(i, c)| (c.name.as_str(), i))
            .collect();

        for order in [Order::Descending, Order::Ascending] {
            let ranked = top_n(&dc, n, order);
            prop_assert_eq!(ranked.len(), n.min(graph.node_count()));
            for pair in ranked.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                match order {
                    Order::Descending => prop_assert!(a.score >= b.score),
                    Order::Ascending => prop_assert!(a.score <= b.score),
                }
                if a.score == b.score {
                    prop_assert!(position[a.city.as_str()] < position[b.city.as_str()]);
                }
            }
        }
    }
}
