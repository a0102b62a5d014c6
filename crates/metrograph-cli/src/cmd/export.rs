//! `metrograph export`: write the graph for external visualizers.

use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};
use metrograph_core::{CentralityReport, CityGraph};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use super::{InputArgs, compute_report};
use crate::config::Config;
use crate::output::{OutputMode, render_mode};

/// Graph export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    /// Graphviz DOT, one cluster per country.
    #[default]
    Dot,
    /// Nodes with attributes and scores, plus an edge list.
    Json,
}

/// Arguments for `metrograph export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Export format.
    #[arg(long, value_enum, default_value_t = ExportFormat::Dot)]
    pub to: ExportFormat,

    /// Output path (defaults to stdout).
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ExportNode<'a> {
    name: &'a str,
    country: &'a str,
    system: &'a str,
    ridership: f64,
    degree: f64,
    betweenness: f64,
    eigenvector: f64,
}

#[derive(Debug, Serialize)]
struct ExportGraph<'a> {
    nodes: Vec<ExportNode<'a>>,
    edges: Vec<(&'a str, &'a str)>,
}

#[derive(Debug, Serialize)]
struct ExportSummary {
    path: PathBuf,
    format: &'static str,
    nodes: usize,
    edges: usize,
}

/// Execute `metrograph export`.
pub fn run_export(args: &ExportArgs, config: &Config, output: OutputMode) -> Result<()> {
    let graph = args.input.load_graph(config)?;
    let report = compute_report(&graph, config)?;

    let Some(path) = args.output.as_ref() else {
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        write_graph(&mut out, args.to, &graph, &report)?;
        out.flush()?;
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_graph(&mut out, args.to, &graph, &report)?;
    out.flush()
        .with_context(|| format!("failed to write {}", path.display()))?;

    let summary = ExportSummary {
        path: path.clone(),
        format: match args.to {
            ExportFormat::Dot => "dot",
            ExportFormat::Json => "json",
        },
        nodes: graph.node_count(),
        edges: graph.edge_count(),
    };
    render_mode(
        output,
        &summary,
        |s, w| writeln!(w, "{}\t{}\t{}\t{}", s.path.display(), s.format, s.nodes, s.edges),
        |s, w| {
            writeln!(
                w,
                "✓ wrote {} ({} cities, {} edges) to {}",
                s.format,
                s.nodes,
                s.edges,
                s.path.display()
            )
        },
    )
}

fn write_graph(
    w: &mut dyn Write,
    format: ExportFormat,
    graph: &CityGraph,
    report: &CentralityReport,
) -> Result<()> {
    match format {
        ExportFormat::Dot => write_dot(w, graph, report)?,
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut *w, &export_graph(graph, report))?;
            writeln!(w)?;
        }
    }
    Ok(())
}

fn export_graph<'a>(graph: &'a CityGraph, report: &CentralityReport) -> ExportGraph<'a> {
    let nodes = graph
        .cities()
        .zip(report.rows())
        .map(|(city, row)| ExportNode {
            name: &city.name,
            country: &city.country,
            system: &city.system_name,
            ridership: city.ridership,
            degree: row.degree,
            betweenness: row.betweenness,
            eigenvector: row.eigenvector,
        })
        .collect();
    let edges = graph
        .edges()
        .map(|(a, b)| (a.name.as_str(), b.name.as_str()))
        .collect();
    ExportGraph { nodes, edges }
}

/// Graphviz output. Node width grows with degree centrality.
fn write_dot(w: &mut dyn Write, graph: &CityGraph, report: &CentralityReport) -> io::Result<()> {
    writeln!(w, "graph metrograph {{")?;
    writeln!(
        w,
        "  node [shape=circle, style=filled, fillcolor=skyblue, fontsize=8];"
    )?;

    for (i, (country, cities)) in graph.country_groups().into_iter().enumerate() {
        writeln!(w, "  subgraph cluster_{i} {{")?;
        writeln!(w, "    label={};", quote(country))?;
        for city in cities {
            let degree = report.degree.get(&city.name).unwrap_or(0.0);
            writeln!(
                w,
                "    {} [width={:.3}, ridership={:.2}];",
                quote(&city.name),
                0.25 + 2.0 * degree,
                city.ridership
            )?;
        }
        writeln!(w, "  }}")?;
    }

    for (a, b) in graph.edges() {
        writeln!(w, "  {} -- {};", quote(&a.name), quote(&b.name))?;
    }
    writeln!(w, "}}")
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrograph_core::{EigenvectorConfig, Record};

    fn fixture() -> (CityGraph, CentralityReport) {
        let graph = CityGraph::build(&[
            Record::new("Tokyo", "Japan", "Tokyo Metro", 3463.0),
            Record::new("Osaka", "Japan", "Osaka Metro", 1261.0),
            Record::new("Oslo", "Norway", "Oslo \"T-bane\"", 118.0),
        ])
        .expect("build graph");
        let report =
            CentralityReport::compute(&graph, &EigenvectorConfig::default()).expect("report");
        (graph, report)
    }

    fn render(format: ExportFormat) -> String {
        let (graph, report) = fixture();
        let mut buf = Vec::new();
        write_graph(&mut buf, format, &graph, &report).expect("write");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn dot_has_one_cluster_per_country() {
        let dot = render(ExportFormat::Dot);
        assert!(dot.starts_with("graph metrograph {\n"));
        assert!(dot.contains("  subgraph cluster_0 {\n    label=\"Japan\";"));
        assert!(dot.contains("  subgraph cluster_1 {\n    label=\"Norway\";"));
        assert!(dot.contains("\"Tokyo\" [width=1.250, ridership=3463.00];"));
        assert!(dot.contains("\"Oslo\" [width=0.250, ridership=118.00];"));
        assert!(dot.contains("  \"Tokyo\" -- \"Osaka\";"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn json_lists_nodes_and_edges() {
        let json: serde_json::Value =
            serde_json::from_str(&render(ExportFormat::Json)).expect("valid json");
        let nodes = json["nodes"].as_array().expect("nodes");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[2]["name"], "Oslo");
        assert_eq!(nodes[2]["system"], "Oslo \"T-bane\"");
        assert_eq!(nodes[0]["degree"], 0.5);
        assert_eq!(json["edges"], serde_json::json!([["Tokyo", "Osaka"]]));
    }

    #[test]
    fn quote_escapes_dot_strings() {
        assert_eq!(quote(r#"a"b\c"#), r#""a\"b\\c""#);
    }
}
