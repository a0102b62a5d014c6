//! Opt-in phase timing for `--timing` / `METROGRAPH_TIMING`.
//!
//! Phases (`config`, `load`, `build`, `metrics`, `cmd.*`) are wrapped in
//! [`timed`]; samples are kept per thread, grouped by phase name.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::output::pretty_table;

/// Percentile summary for every recorded phase, sorted by phase name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimingReport {
    pub phases: Vec<PhaseTiming>,
}

/// Nearest-rank percentiles for one phase, in microseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseTiming {
    pub name: String,
    pub count: usize,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
}

thread_local! {
    static SAMPLES: RefCell<BTreeMap<String, Vec<Duration>>> = const { RefCell::new(BTreeMap::new()) };
}

static TIMING_ENABLED: AtomicBool = AtomicBool::new(false);

/// Returns true when `METROGRAPH_TIMING` is `1`, `true`, `yes` or `on`.
#[must_use]
pub fn timing_enabled_from_env() -> bool {
    std::env::var("METROGRAPH_TIMING").is_ok_and(|value| is_truthy(&value))
}

pub fn set_timing_enabled(enabled: bool) {
    TIMING_ENABLED.store(enabled, Ordering::Relaxed);
    if !enabled {
        clear_timings();
    }
}

#[must_use]
pub fn is_timing_enabled() -> bool {
    TIMING_ENABLED.load(Ordering::Relaxed)
}

pub fn clear_timings() {
    SAMPLES.with_borrow_mut(BTreeMap::clear);
}

/// Run `f`, recording its duration under `phase` when timing is enabled.
pub fn timed<R>(phase: &str, f: impl FnOnce() -> R) -> R {
    if !is_timing_enabled() {
        return f();
    }

    let started = Instant::now();
    let result = f();
    let elapsed = started.elapsed();
    SAMPLES.with_borrow_mut(|samples| {
        samples.entry(phase.to_string()).or_default().push(elapsed);
    });
    result
}

/// Drain this thread's samples into a report.
#[must_use]
pub fn collect_report() -> TimingReport {
    let samples = SAMPLES.with_borrow_mut(std::mem::take);
    let phases = samples
        .into_iter()
        .map(|(name, mut durations)| {
            durations.sort_unstable();
            PhaseTiming {
                name,
                count: durations.len(),
                p50_us: micros(percentile(&durations, 50)),
                p95_us: micros(percentile(&durations, 95)),
                p99_us: micros(percentile(&durations, 99)),
            }
        })
        .collect();
    TimingReport { phases }
}

impl TimingReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Boxed grid with one row per phase.
    #[must_use]
    pub fn display_table(&self) -> String {
        let rows: Vec<Vec<String>> = self
            .phases
            .iter()
            .map(|p| {
                vec![
                    p.name.clone(),
                    p.count.to_string(),
                    format_micros(p.p50_us),
                    format_micros(p.p95_us),
                    format_micros(p.p99_us),
                ]
            })
            .collect();

        let mut buf = Vec::new();
        if pretty_table(&mut buf, &["phase", "count", "p50", "p95", "p99"], &rows).is_err() {
            return String::new();
        }
        String::from_utf8_lossy(&buf).trim_end().to_string()
    }
}

/// Nearest-rank percentile of an ascending slice.
fn percentile(sorted: &[Duration], pct: usize) -> Duration {
    let Some(last) = sorted.len().checked_sub(1) else {
        return Duration::ZERO;
    };
    let rank = (sorted.len() * pct.min(100)).div_ceil(100);
    sorted[rank.saturating_sub(1).min(last)]
}

fn micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

#[allow(clippy::cast_precision_loss)]
fn format_micros(micros: u64) -> String {
    match micros {
        0..1_000 => format!("{micros}µs"),
        1_000..1_000_000 => format!("{:.3}ms", micros as f64 / 1e3),
        _ => format!("{:.3}s", micros as f64 / 1e6),
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
