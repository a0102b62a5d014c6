//! Error types for graph construction and centrality computation.
//!
//! Degenerate graphs (too few nodes for a metric, isolated cities) are not
//! errors; every metric defines a zero result for them. Only malformed input
//! records and a non-converging eigenvector iteration are surfaced here.

use std::fmt;

/// Record field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    City,
    Country,
}

impl RecordField {
    /// Stable lowercase name used in messages and JSON error codes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Country => "country",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from building the city graph or computing centrality.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// A record has an empty or whitespace-only key field.
    #[error("invalid record at index {index}: {field} must not be empty")]
    InvalidRecord { index: usize, field: RecordField },

    /// Eigenvector power iteration hit its cap before reaching tolerance.
    #[error(
        "eigenvector centrality failed to converge within {iterations} iterations (tolerance {tolerance:e})"
    )]
    Convergence { iterations: usize, tolerance: f64 },
}

impl GraphError {
    /// Machine-readable error code for CLI/JSON output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRecord { .. } => "invalid_record",
            Self::Convergence { .. } => "convergence",
        }
    }

    /// Optional remediation hint surfaced alongside the message.
    #[must_use]
    pub const fn hint(&self) -> &'static str {
        match self {
            Self::InvalidRecord { .. } => {
                "Drop or repair rows with a blank city or country before analysis."
            }
            Self::Convergence { .. } => {
                "Raise eigenvector_max_iter or loosen eigenvector_tolerance and retry."
            }
        }
    }
}
