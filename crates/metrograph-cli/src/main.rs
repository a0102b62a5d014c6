#![forbid(unsafe_code)]

mod cmd;
mod config;
mod loader;
mod output;
mod timing;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "metrograph: co-location graph and centrality rankings for metro systems",
    long_about = None
)]
struct Cli {
    /// Enable debug logging (overridden by METROGRAPH_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit command timing report to stderr.
    #[arg(long, global = true)]
    timing: bool,

    /// Output format [default: pretty on a TTY, text when piped].
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file [default: ./metrograph.toml when present].
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Rank cities by centrality",
        long_about = "List the top (or bottom) N cities for each centrality metric, or for one metric.",
        after_help = "EXAMPLES:\n    # Top 10 by every metric\n    metrograph rank country_city.csv\n\n    # Bottom 5 by eigenvector centrality\n    metrograph rank country_city.csv --metric eigenvector --top 5 --bottom\n\n    # Emit machine-readable output\n    metrograph rank country_city.csv --format json"
    )]
    Rank(cmd::rank::RankArgs),

    #[command(
        about = "Print top and bottom tables",
        long_about = "Print top-N and bottom-N tables for every metric with all four scores per city.",
        after_help = "EXAMPLES:\n    # Top/bottom 20 tables\n    metrograph table country_city.csv\n\n    # Shorter tables\n    metrograph table country_city.csv --limit 5"
    )]
    Table(cmd::table::TableArgs),

    #[command(
        about = "Show graph statistics",
        long_about = "Show node, edge, country and component counts for the co-location graph.",
        after_help = "EXAMPLES:\n    metrograph stats country_city.csv"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        about = "Export the graph",
        long_about = "Export the co-location graph with scores as Graphviz DOT or JSON.",
        after_help = "EXAMPLES:\n    # DOT to stdout\n    metrograph export country_city.csv | dot -Tsvg > metro.svg\n\n    # JSON to a file\n    metrograph export country_city.csv --to json --output graph.json"
    )]
    Export(cmd::export::ExportArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    metrograph completions bash > ~/.local/share/bash-completion/completions/metrograph"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("METROGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "metrograph=debug,info"
        } else {
            "metrograph=info,warn"
        })
    });

    let format = env::var("METROGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Project (or `--config`) settings plus the user-level output preference.
fn load_settings(cli: &Cli) -> anyhow::Result<(config::Config, Option<String>)> {
    let cwd = env::current_dir()?;
    let cfg = config::load_config(cli.config.as_deref(), &cwd)?;
    let user_output = config::load_user_output()?;
    Ok((cfg, user_output))
}

fn run(cli: &Cli, cfg: &config::Config, output: OutputMode) -> anyhow::Result<()> {
    match cli.command {
        Commands::Rank(ref args) => {
            timing::timed("cmd.rank", || cmd::rank::run_rank(args, cfg, output))
        }
        Commands::Table(ref args) => {
            timing::timed("cmd.table", || cmd::table::run_table(args, cfg, output))
        }
        Commands::Stats(ref args) => {
            timing::timed("cmd.stats", || cmd::stats::run_stats(args, cfg, output))
        }
        Commands::Export(ref args) => {
            timing::timed("cmd.export", || cmd::export::run_export(args, cfg, output))
        }
        Commands::Completions(ref args) => timing::timed("cmd.completions", || {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
        }),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let timing_enabled = cli.timing || timing::timing_enabled_from_env();
    timing::set_timing_enabled(timing_enabled);
    timing::clear_timings();

    let (output, result) = match timing::timed("config", || load_settings(&cli)) {
        Ok((cfg, user_output)) => {
            // Project config wins over the user-level preference.
            let preferred = cfg.output.as_deref().or(user_output.as_deref());
            let output = resolve_output_mode(cli.format, cli.json, preferred);
            (output, run(&cli, &cfg, output))
        }
        Err(err) => (resolve_output_mode(cli.format, cli.json, None), Err(err)),
    };

    if timing_enabled {
        let report = timing::collect_report();
        if report.is_empty() {
            eprintln!("timing report: no samples recorded");
        } else {
            eprintln!("timing report:");
            eprintln!("{}", report.display_table());
            eprintln!("timing report (json):");
            eprintln!("{:#}", report.to_json());
        }
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            if render_error(output, &CliError::from_anyhow(&err)).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_flag_parses_before_subcommand() {
        let cli = Cli::parse_from(["metrograph", "--timing", "stats", "x.csv"]);
        assert!(cli.timing);
        assert!(matches!(cli.command, Commands::Stats(_)));
    }

    #[test]
    fn timing_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["metrograph", "stats", "x.csv", "--timing"]);
        assert!(cli.timing);
    }

    #[test]
    fn format_flag_is_global() {
        let cli = Cli::parse_from(["metrograph", "rank", "x.csv", "--format", "json"]);
        assert_eq!(cli.format, Some(OutputMode::Json));
    }

    #[test]
    fn hidden_json_flag_parses() {
        let cli = Cli::parse_from(["metrograph", "--json", "table", "x.csv"]);
        assert!(cli.json);
        assert!(cli.format.is_none());
    }

    #[test]
    fn rank_subcommand_parses_options() {
        let cli = Cli::parse_from([
            "metrograph",
            "rank",
            "x.csv",
            "--metric",
            "weighted",
            "-n",
            "5",
            "--bottom",
        ]);
        let Commands::Rank(args) = cli.command else {
            panic!("expected rank");
        };
        assert_eq!(args.input.input, PathBuf::from("x.csv"));
        assert_eq!(args.metric, Some(cmd::MetricArg::Ridership));
        assert_eq!(args.top, Some(5));
        assert!(args.bottom);
    }

    #[test]
    fn export_defaults_to_dot_on_stdout() {
        let cli = Cli::parse_from(["metrograph", "export", "x.csv"]);
        let Commands::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.to, cmd::export::ExportFormat::Dot);
        assert!(args.output.is_none());
    }

    #[test]
    fn config_flag_parses() {
        let cli = Cli::parse_from(["metrograph", "--config", "m.toml", "stats", "x.csv"]);
        assert_eq!(cli.config, Some(PathBuf::from("m.toml")));
    }

    #[test]
    fn rank_requires_input() {
        assert!(Cli::try_parse_from(["metrograph", "rank"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
