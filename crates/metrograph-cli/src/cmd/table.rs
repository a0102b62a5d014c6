//! `metrograph table`: combined top-N and bottom-N tables for every metric.
//!
//! Each table holds all four scores per city, rounded for display (4 places,
//! ridership 2). Rows are sorted on the rounded column; equal values keep
//! node order.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use metrograph_core::{CentralityReport, CityMetrics, Metric, Order};
use serde::Serialize;

use super::{InputArgs, compute_report, round_for};
use crate::config::Config;
use crate::output::{OutputMode, pretty_table, render_mode};

const HEADERS: [&str; 5] = ["City", "Degree", "Betweenness", "Eigenvector", "Ridership (M)"];

/// Arguments for `metrograph table`.
#[derive(Args, Debug)]
pub struct TableArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Rows per table [default: analysis.table_limit, 20].
    #[arg(long, short = 'n', value_name = "N")]
    pub limit: Option<usize>,
}

/// One city's rounded scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub city: String,
    pub degree: f64,
    pub betweenness: f64,
    pub eigenvector: f64,
    pub ridership: f64,
}

impl TableRow {
    fn from_metrics(m: &CityMetrics) -> Self {
        Self {
            city: m.city.clone(),
            degree: round_for(Metric::Degree, m.degree),
            betweenness: round_for(Metric::Betweenness, m.betweenness),
            eigenvector: round_for(Metric::Eigenvector, m.eigenvector),
            ridership: round_for(Metric::Ridership, m.ridership),
        }
    }

    const fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Degree => self.degree,
            Metric::Betweenness => self.betweenness,
            Metric::Eigenvector => self.eigenvector,
            Metric::Ridership => self.ridership,
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.city.clone(),
            format!("{:.4}", self.degree),
            format!("{:.4}", self.betweenness),
            format!("{:.4}", self.eigenvector),
            format!("{:.2}", self.ridership),
        ]
    }
}

/// One titled table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricTable {
    pub title: String,
    pub metric: Metric,
    pub order: Order,
    pub rows: Vec<TableRow>,
}

/// Execute `metrograph table`.
pub fn run_table(args: &TableArgs, config: &Config, output: OutputMode) -> Result<()> {
    let graph = args.input.load_graph(config)?;
    let report = compute_report(&graph, config)?;
    let limit = args.limit.unwrap_or(config.analysis.table_limit);

    let payload = tables(&report, limit);
    render_mode(output, &payload, render_table_text, render_table_pretty)
}

/// Top tables for every metric, then bottom tables.
pub fn tables(report: &CentralityReport, limit: usize) -> Vec<MetricTable> {
    let rows: Vec<TableRow> = report.rows().iter().map(TableRow::from_metrics).collect();

    [Order::Descending, Order::Ascending]
        .into_iter()
        .flat_map(|order| Metric::ALL.into_iter().map(move |metric| (order, metric)))
        .map(|(order, metric)| {
            let mut sorted: Vec<&TableRow> = rows.iter().collect();
            sorted.sort_by(|a, b| match order {
                Order::Descending => b.value(metric).total_cmp(&a.value(metric)),
                Order::Ascending => a.value(metric).total_cmp(&b.value(metric)),
            });

            let side = match order {
                Order::Descending => "Top",
                Order::Ascending => "Bottom",
            };
            let rows: Vec<TableRow> = sorted.into_iter().take(limit).cloned().collect();
            MetricTable {
                title: format!("{side} {} by {}", rows.len(), metric.title()),
                metric,
                order,
                rows,
            }
        })
        .collect()
}

fn render_table_text(tables: &Vec<MetricTable>, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "table\tcity\tdegree\tbetweenness\teigenvector\tridership_m")?;
    for table in tables {
        let side = match table.order {
            Order::Descending => "top",
            Order::Ascending => "bottom",
        };
        for row in &table.rows {
            writeln!(w, "{side}_{}\t{}", table.metric, row.cells().join("\t"))?;
        }
    }
    Ok(())
}

fn render_table_pretty(tables: &Vec<MetricTable>, w: &mut dyn Write) -> std::io::Result<()> {
    for table in tables {
        writeln!(w)?;
        writeln!(w, "{}", table.title)?;
        let cells: Vec<Vec<String>> = table.rows.iter().map(TableRow::cells).collect();
        pretty_table(w, &HEADERS, &cells)?;
    }
    Ok(())
}
