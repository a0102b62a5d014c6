//! CSV input for the metro-system table.
//!
//! Rows with a missing or blank city or country are dropped. City and
//! country are trimmed. Ridership that is missing, unparseable, negative or
//! non-finite becomes `0.0`. The system-name column is optional.

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord};
use metrograph_core::Record;
use std::io::Read;
use std::path::Path;
use tracing::{debug, instrument};

use crate::config::InputConfig;

/// Records kept after cleaning plus how many rows were discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub records: Vec<Record>,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

struct ColumnIndex {
    city: usize,
    country: usize,
    system: Option<usize>,
    ridership: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, columns: &InputConfig) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let Some(city) = find(&columns.city) else {
            bail!("missing required column '{}'", columns.city);
        };
        let Some(country) = find(&columns.country) else {
            bail!("missing required column '{}'", columns.country);
        };

        Ok(Self {
            city,
            country,
            system: find(&columns.system),
            ridership: find(&columns.ridership),
        })
    }
}

/// Load and clean records from a CSV file.
#[instrument(skip(columns))]
pub fn load_records(path: &Path, columns: &InputConfig) -> Result<Loaded> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    read_records(file, columns).with_context(|| format!("Failed to load {}", path.display()))
}

/// Load and clean records from any CSV reader with a header row.
pub fn read_records<R: Read>(reader: R, columns: &InputConfig) -> Result<Loaded> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    let index = ColumnIndex::resolve(&headers, columns)?;

    let mut records = Vec::new();
    let mut rows_read = 0;
    for (line, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("Failed to parse CSV row {}", line + 1))?;
        rows_read += 1;

        let city = row.get(index.city).map_or("", str::trim);
        let country = row.get(index.country).map_or("", str::trim);
        if city.is_empty() || country.is_empty() {
            continue;
        }

        let system = index
            .system
            .and_then(|i| row.get(i))
            .map_or("", str::trim);
        let ridership = parse_ridership(index.ridership.and_then(|i| row.get(i)));

        records.push(Record::new(city, country, system, ridership));
    }

    let rows_dropped = rows_read - records.len();
    debug!(rows_read, rows_dropped, "loaded records");

    Ok(Loaded {
        records,
        rows_read,
        rows_dropped,
    })
}

fn parse_ridership(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}
