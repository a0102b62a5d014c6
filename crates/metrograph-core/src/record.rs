//! Input records: one row per metro system.

use serde::{Deserialize, Serialize};

/// One transit system entry, already cleaned by the loader.
///
/// `city` and `country` are expected trimmed and non-empty; the graph
/// builder rejects blank keys with [`crate::GraphError::InvalidRecord`].
/// `ridership` is annual ridership in millions with missing values already
/// mapped to `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub city: String,
    pub country: String,
    pub system_name: String,
    pub ridership: f64,
}

impl Record {
    #[must_use]
    pub fn new(
        city: impl Into<String>,
        country: impl Into<String>,
        system_name: impl Into<String>,
        ridership: f64,
    ) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
            system_name: system_name.into(),
            ridership,
        }
    }
}
