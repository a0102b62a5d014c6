//! Shared output layer for pretty/text/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: aligned tables for humans, tab-separated rows for pipes, or
//! stable JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / hidden `--json` flag
//! 2. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. `output` in the project config, then in the user config
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use clap::ValueEnum;
use metrograph_core::GraphError;
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

use crate::config::normalize_output_mode;

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<20} {}", format!("{key}:"), value.as_ref())
}

/// Write a boxed grid table: header row, then one row per entry.
///
/// Column widths fit the widest cell. The first column is left-aligned and
/// the rest right-aligned.
pub fn pretty_table(w: &mut dyn Write, headers: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = widths
        .iter()
        .map(|&width| "-".repeat(width + 2))
        .collect::<Vec<_>>()
        .join("+");
    writeln!(w, "+{border}+")?;
    write_grid_row(w, headers.iter().copied(), &widths)?;
    writeln!(w, "+{border}+")?;
    for row in rows {
        write_grid_row(w, row.iter().map(String::as_str), &widths)?;
    }
    writeln!(w, "+{border}+")
}

fn write_grid_row<'a>(
    w: &mut dyn Write,
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
) -> io::Result<()> {
    write!(w, "|")?;
    for (i, (cell, &width)) in cells.zip(widths).enumerate() {
        if i == 0 {
            write!(w, " {cell:<width$} |")?;
        } else {
            write!(w, " {cell:>width$} |")?;
        }
    }
    writeln!(w)
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (tables, sections, visual framing).
    Pretty,
    /// Plain tab-separated text for pipes and scripts.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Core resolution logic, separated from I/O for testability.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    user_output: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if json_flag {
        return OutputMode::Json;
    }

    // Unknown values fall through to the next source.
    if let Some(mode) = format_env.and_then(normalize_output_mode) {
        return mode;
    }

    if let Some(mode) = user_output.and_then(normalize_output_mode) {
        return mode;
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from CLI flags, environment, user config and TTY
/// defaults.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    user_output: Option<&str>,
) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(
        format_flag,
        json_flag,
        env_val.as_deref(),
        user_output,
        is_tty,
    )
}

/// Render a serializable value with explicit pretty/text renderers.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_mode_to(&mut out, mode, value, text_fn, pretty_fn)
}

/// [`render_mode`] into an arbitrary writer.
pub fn render_mode_to<T: Serialize>(
    out: &mut dyn Write,
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, out)?,
        OutputMode::Pretty => pretty_fn(value, out)?,
    }
    Ok(())
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (e.g. "invalid_record", "convergence").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Create a simple error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            error_code: None,
        }
    }

    /// Build from any `anyhow` error, lifting code and hint from a
    /// [`GraphError`] anywhere in the chain.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        err.chain()
            .find_map(|cause| cause.downcast_ref::<GraphError>())
            .map_or_else(|| Self::new(format!("{err:#}")), Self::from)
    }
}

impl From<&GraphError> for CliError {
    fn from(err: &GraphError) -> Self {
        Self {
            message: err.to_string(),
            suggestion: Some(err.hint().to_string()),
            error_code: Some(err.code().to_string()),
        }
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    render_error_to(&mut out, mode, error)
}

fn render_error_to(out: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut *out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            writeln!(out, "error: {}", error.message)?;
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use metrograph_core::error::RecordField;

    // ── resolve_output_mode_inner ───────────────────────────────────────────

    #[test]
    fn resolve_format_flag_wins_over_everything() {
        let mode = resolve_output_mode_inner(
            Some(OutputMode::Text),
            true,
            Some("pretty"),
            Some("json"),
            true,
        );
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_json_flag_wins_over_env() {
        let mode = resolve_output_mode_inner(None, true, Some("pretty"), None, true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_env_wins_over_user_config() {
        let mode = resolve_output_mode_inner(None, false, Some("text"), Some("json"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_user_config_wins_over_tty() {
        let mode = resolve_output_mode_inner(None, false, None, Some("json"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_format_env_case_insensitive() {
        let mode = resolve_output_mode_inner(None, false, Some("TEXT"), None, true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_unknown_values_fall_through_to_tty() {
        let tty = resolve_output_mode_inner(None, false, Some("fancy"), Some("nope"), true);
        assert_eq!(tty, OutputMode::Pretty);
        let pipe = resolve_output_mode_inner(None, false, Some("fancy"), Some("nope"), false);
        assert_eq!(pipe, OutputMode::Text);
    }

    // ── render ──────────────────────────────────────────────────────────────

    #[derive(Serialize)]
    struct Sample {
        name: &'static str,
    }

    fn render_to_string(mode: OutputMode) -> String {
        let mut buf = Vec::new();
        render_mode_to(
            &mut buf,
            mode,
            &Sample { name: "Tokyo" },
            |v, w| writeln!(w, "text\t{}", v.name),
            |v, w| writeln!(w, "pretty {}", v.name),
        )
        .expect("render");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn render_mode_dispatches() {
        assert_eq!(render_to_string(OutputMode::Text), "text\tTokyo\n");
        assert_eq!(render_to_string(OutputMode::Pretty), "pretty Tokyo\n");

        let json: serde_json::Value =
            serde_json::from_str(&render_to_string(OutputMode::Json)).expect("valid json");
        assert_eq!(json["name"], "Tokyo");
    }

    #[test]
    fn pretty_table_aligns_columns() {
        let mut buf = Vec::new();
        pretty_table(
            &mut buf,
            &["City", "Score"],
            &[
                vec!["Tokyo".to_string(), "0.5".to_string()],
                vec!["Oslo".to_string(), "12.25".to_string()],
            ],
        )
        .expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(
            text,
            "+-------+-------+\n\
             | City  | Score |\n\
             +-------+-------+\n\
             | Tokyo |   0.5 |\n\
             | Oslo  | 12.25 |\n\
             +-------+-------+\n"
        );
    }

    // ── errors ──────────────────────────────────────────────────────────────

    #[test]
    fn graph_error_carries_code_and_hint() {
        let err = GraphError::InvalidRecord {
            index: 2,
            field: RecordField::City,
        };
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("invalid_record"));
        assert!(cli.suggestion.is_some());
    }

    #[test]
    fn from_anyhow_finds_graph_error_under_context() {
        let result: Result<(), GraphError> = Err(GraphError::Convergence {
            iterations: 5,
            tolerance: 1e-6,
        });
        let err = result.context("computing report").expect_err("is error");
        let cli = CliError::from_anyhow(&err);
        assert_eq!(cli.error_code.as_deref(), Some("convergence"));
    }

    #[test]
    fn from_anyhow_plain_error_has_no_code() {
        let err = anyhow::anyhow!("boom").context("outer");
        let cli = CliError::from_anyhow(&err);
        assert_eq!(cli.message, "outer: boom");
        assert!(cli.error_code.is_none());
    }

    #[test]
    fn render_error_json_wraps_error() {
        let mut buf = Vec::new();
        render_error_to(&mut buf, OutputMode::Json, &CliError::new("bad input")).expect("render");
        let json: serde_json::Value = serde_json::from_slice(&buf).expect("valid json");
        assert_eq!(json["error"]["message"], "bad input");
        assert!(json["error"].get("error_code").is_none());
    }

    #[test]
    fn render_error_text_includes_suggestion() {
        let mut buf = Vec::new();
        let err = CliError {
            message: "bad input".to_string(),
            suggestion: Some("fix it".to_string()),
            error_code: None,
        };
        render_error_to(&mut buf, OutputMode::Text, &err).expect("render");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(text, "error: bad input\n  suggestion: fix it\n");
    }
}
