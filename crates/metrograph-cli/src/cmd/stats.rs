//! `metrograph stats`: shape of the co-location graph.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use metrograph_core::GraphStats;

use super::InputArgs;
use crate::config::Config;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use crate::timing::timed;

/// Arguments for `metrograph stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Execute `metrograph stats`.
pub fn run_stats(args: &StatsArgs, config: &Config, output: OutputMode) -> Result<()> {
    let graph = args.input.load_graph(config)?;
    let stats = timed("stats", || GraphStats::from_graph(&graph));
    render_mode(output, &stats, render_stats_text, render_stats_pretty)
}

fn stat_lines(stats: &GraphStats) -> Vec<(&'static str, String)> {
    let largest = stats
        .largest_country
        .as_ref()
        .map_or_else(|| "-".to_string(), |l| format!("{} ({})", l.country, l.city_count));

    vec![
        ("nodes", stats.node_count.to_string()),
        ("edges", stats.edge_count.to_string()),
        ("density", format!("{:.4}", stats.density)),
        ("countries", stats.country_count.to_string()),
        ("components", stats.component_count.to_string()),
        ("isolated", stats.isolated_node_count.to_string()),
        ("max_degree", stats.max_degree.to_string()),
        ("largest_country", largest),
    ]
}

fn render_stats_text(stats: &GraphStats, w: &mut dyn Write) -> std::io::Result<()> {
    for (key, value) in stat_lines(stats) {
        writeln!(w, "{key}\t{value}")?;
    }
    Ok(())
}

fn render_stats_pretty(stats: &GraphStats, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Co-location graph")?;
    for (key, value) in stat_lines(stats) {
        pretty_kv(w, &key.replace('_', " "), value)?;
    }
    if stats.is_edgeless() && stats.node_count > 0 {
        writeln!(w, "\nNo country has more than one city; every graph-derived score is zero.")?;
    }
    Ok(())
}
