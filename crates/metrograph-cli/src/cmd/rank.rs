//! `metrograph rank`: top-N (or bottom-N) cities per metric.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use metrograph_core::{CentralityReport, Metric, Order, RankEntry};
use serde::Serialize;

use super::{InputArgs, MetricArg, compute_report, decimals};
use crate::config::Config;
use crate::output::{OutputMode, render_mode};

/// Arguments for `metrograph rank`.
#[derive(Args, Debug)]
pub struct RankArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Rank by a single metric instead of all four.
    #[arg(long, short, value_enum)]
    pub metric: Option<MetricArg>,

    /// Cities per ranking [default: analysis.top, 10].
    #[arg(long, short = 'n', value_name = "N")]
    pub top: Option<usize>,

    /// List the lowest-scoring cities instead.
    #[arg(long)]
    pub bottom: bool,
}

/// One metric's ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub metric: Metric,
    pub order: Order,
    pub entries: Vec<RankEntry>,
}

impl Ranking {
    fn heading(&self) -> String {
        let side = match self.order {
            Order::Descending => "Top",
            Order::Ascending => "Bottom",
        };
        format!("{side} {} by {}", self.entries.len(), self.metric.title())
    }
}

/// Execute `metrograph rank`.
pub fn run_rank(args: &RankArgs, config: &Config, output: OutputMode) -> Result<()> {
    let graph = args.input.load_graph(config)?;
    let report = compute_report(&graph, config)?;

    let metrics: Vec<Metric> = args
        .metric
        .map_or_else(|| Metric::ALL.to_vec(), |m| vec![m.into()]);
    let n = args.top.unwrap_or(config.analysis.top);
    let order = if args.bottom {
        Order::Ascending
    } else {
        Order::Descending
    };

    let payload = rankings(&report, &metrics, n, order);
    render_mode(output, &payload, render_rank_text, render_rank_pretty)
}

/// Build one ranking per metric, in the order given.
pub fn rankings(
    report: &CentralityReport,
    metrics: &[Metric],
    n: usize,
    order: Order,
) -> Vec<Ranking> {
    metrics
        .iter()
        .map(|&metric| Ranking {
            metric,
            order,
            entries: report.top(metric, n, order),
        })
        .collect()
}

fn render_rank_text(rankings: &Vec<Ranking>, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "metric\trank\tcity\tscore")?;
    for ranking in rankings {
        let places = decimals(ranking.metric);
        for (i, entry) in ranking.entries.iter().enumerate() {
            writeln!(
                w,
                "{}\t{}\t{}\t{:.places$}",
                ranking.metric,
                i + 1,
                entry.city,
                entry.score
            )?;
        }
    }
    Ok(())
}

fn render_rank_pretty(rankings: &Vec<Ranking>, w: &mut dyn Write) -> std::io::Result<()> {
    for (i, ranking) in rankings.iter().enumerate() {
        if i > 0 {
            writeln!(w)?;
        }
        writeln!(w, "{}:", ranking.heading())?;
        for entry in &ranking.entries {
            match ranking.metric {
                Metric::Ridership => {
                    writeln!(w, "{}: {:.2} million riders", entry.city, entry.score)?;
                }
                _ => writeln!(w, "{}: {:.4}", entry.city, entry.score)?,
            }
        }
    }
    Ok(())
}
