//! Graph construction from metro records.
//!
//! # Overview
//!
//! Each record upserts a node keyed by its city name. Once every record has
//! been applied, nodes are grouped by their final country and each group is
//! expanded into a clique. Grouping first keeps construction linear in the
//! number of records plus the number of edges produced, instead of scanning
//! every pair of records.
//!
//! ## Duplicate Cities
//!
//! City names are global keys. When two records share a city, the later one
//! overwrites the node's attributes (country included) while the node keeps
//! its original position in enumeration order. Edges are derived from the
//! final country only, so an overwritten country leaves no trace.
//!
//! ## Node Order
//!
//! Nodes enumerate in first-appearance order of their city in the input.
//! Metric [`Scores`](crate::metrics::Scores) and ranking ties follow this
//! order.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{GraphError, RecordField};
use crate::record::Record;

// ---------------------------------------------------------------------------
// City
// ---------------------------------------------------------------------------

/// Node attributes for one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct City {
    /// City name, the node's unique key.
    pub name: String,
    pub country: String,
    /// Annual ridership in millions.
    pub ridership: f64,
    pub system_name: String,
}

impl From<&Record> for City {
    fn from(record: &Record) -> Self {
        Self {
            name: record.city.clone(),
            country: record.country.clone(),
            ridership: record.ridership,
            system_name: record.system_name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// CityGraph
// ---------------------------------------------------------------------------

/// An undirected, simple graph of cities connected by shared country.
///
/// Immutable once built. All metrics borrow it read-only, so a single
/// `CityGraph` can be shared across threads.
#[derive(Debug, Clone)]
pub struct CityGraph {
    graph: UnGraph<City, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl CityGraph {
    /// Build a [`CityGraph`] from cleaned records.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidRecord`] if any record has a blank city
    /// or country. Nothing is built in that case.
    #[instrument(skip(records), fields(records = records.len()))]
    pub fn build(records: &[Record]) -> Result<Self, GraphError> {
        let mut graph = UnGraph::<City, ()>::with_capacity(records.len(), 0);
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(records.len());

        // Step 1: upsert nodes, last write wins.
        for (index, record) in records.iter().enumerate() {
            validate(index, record)?;

            if let Some(&idx) = node_map.get(&record.city) {
                graph[idx] = City::from(record);
            } else {
                let idx = graph.add_node(City::from(record));
                node_map.insert(record.city.clone(), idx);
            }
        }

        // Step 2: one clique per country group.
        let groups = group_by_country(&graph);
        let edge_total: usize = groups
            .iter()
            .map(|g| g.len() * g.len().saturating_sub(1) / 2)
            .sum();
        graph.reserve_edges(edge_total);

        for members in &groups {
            for (i, &a) in members.iter().enumerate() {
                for &b in &members[i + 1..] {
                    graph.add_edge(a, b, ());
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            countries = groups.len(),
            "city graph built"
        );

        Ok(Self { graph, node_map })
    }

    /// Return the number of nodes (cities) in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of same-country edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` when the graph has no cities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Iterate cities in node enumeration order.
    pub fn cities(&self) -> impl Iterator<Item = &City> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Look up a city's attributes by name.
    #[must_use]
    pub fn city(&self, name: &str) -> Option<&City> {
        self.node_map.get(name).map(|&idx| &self.graph[idx])
    }

    /// Returns `true` if `name` is a node in the graph.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    /// Returns `true` if an edge joins the two named cities.
    ///
    /// Unknown cities and `a == b` yield `false` (the graph has no self-loops).
    #[must_use]
    pub fn contains_edge(&self, a: &str, b: &str) -> bool {
        match (self.node_map.get(a), self.node_map.get(b)) {
            (Some(&ia), Some(&ib)) if ia != ib => self.graph.contains_edge(ia, ib),
            _ => false,
        }
    }

    /// Iterate the names of cities adjacent to `name`.
    ///
    /// Empty for isolated or unknown cities.
    pub fn neighbors<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.node_map
            .get(name)
            .copied()
            .into_iter()
            .flat_map(move |idx| self.graph.neighbors(idx))
            .map(move |n| self.graph[n].name.as_str())
    }

    /// Number of edges incident to `name`, or `None` for an unknown city.
    #[must_use]
    pub fn degree(&self, name: &str) -> Option<usize> {
        self.node_map
            .get(name)
            .map(|&idx| self.graph.neighbors(idx).count())
    }

    /// Iterate edges as `(a, b)` city pairs. Each undirected edge appears once.
    pub fn edges(&self) -> impl Iterator<Item = (&City, &City)> + '_ {
        self.graph
            .raw_edges()
            .iter()
            .map(move |e| (&self.graph[e.source()], &self.graph[e.target()]))
    }

    /// Cities grouped by country, groups in order of first appearance.
    #[must_use]
    pub fn country_groups(&self) -> Vec<(&str, Vec<&City>)> {
        group_by_country(&self.graph)
            .into_iter()
            .filter_map(|members| {
                let first = *members.first()?;
                let country = self.graph[first].country.as_str();
                Some((country, members.iter().map(|&i| &self.graph[i]).collect()))
            })
            .collect()
    }

    /// Borrow the underlying petgraph graph.
    pub(crate) const fn inner(&self) -> &UnGraph<City, ()> {
        &self.graph
    }

}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate(index: usize, record: &Record) -> Result<(), GraphError> {
    if record.city.trim().is_empty() {
        return Err(GraphError::InvalidRecord {
            index,
            field: RecordField::City,
        });
    }
    if record.country.trim().is_empty() {
        return Err(GraphError::InvalidRecord {
            index,
            field: RecordField::Country,
        });
    }
    Ok(())
}

/// Group node indices by country, preserving first-appearance order of
/// countries and node order within each group.
fn group_by_country(graph: &UnGraph<City, ()>) -> Vec<Vec<NodeIndex>> {
    let mut slot: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<NodeIndex>> = Vec::new();

    for idx in graph.node_indices() {
        let country = graph[idx].country.as_str();
        let next = groups.len();
        let i = *slot.entry(country).or_insert(next);
        if i == next {
            groups.push(Vec::new());
        }
        groups[i].push(idx);
    }

    groups
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
