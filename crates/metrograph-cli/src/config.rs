use anyhow::{Context, Result};
use metrograph_core::EigenvectorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputMode;

/// Project config file looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "metrograph.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub input: InputConfig,
    /// Default output mode (`pretty`, `text` or `json`).
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_top")]
    pub top: usize,
    #[serde(default = "default_table_limit")]
    pub table_limit: usize,
    #[serde(default = "default_max_iter")]
    pub eigenvector_max_iter: usize,
    #[serde(default = "default_tolerance")]
    pub eigenvector_tolerance: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top: default_top(),
            table_limit: default_table_limit(),
            eigenvector_max_iter: default_max_iter(),
            eigenvector_tolerance: default_tolerance(),
        }
    }
}

impl AnalysisConfig {
    #[must_use]
    pub const fn eigenvector(&self) -> EigenvectorConfig {
        EigenvectorConfig {
            max_iter: self.eigenvector_max_iter,
            tolerance: self.eigenvector_tolerance,
        }
    }
}

/// CSV column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_city_column")]
    pub city: String,
    #[serde(default = "default_country_column")]
    pub country: String,
    #[serde(default = "default_system_column")]
    pub system: String,
    #[serde(default = "default_ridership_column")]
    pub ridership: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            city: default_city_column(),
            country: default_country_column(),
            system: default_system_column(),
            ridership: default_ridership_column(),
        }
    }
}

/// Load the analysis config.
///
/// An explicit `--config` path must exist. Otherwise `metrograph.toml` in
/// `cwd` is used when present, falling back to defaults.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config> {
    if let Some(path) = explicit {
        return read_toml(path);
    }

    let path = cwd.join(PROJECT_CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    read_toml(&path)
}

/// Output preference from `<config_dir>/metrograph/config.toml`, if any.
pub fn load_user_output() -> Result<Option<String>> {
    let Some(path) = user_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    Ok(read_toml(&path)?.output)
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("metrograph/config.toml"))
}

fn read_toml(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<Config>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse a configured output mode, ignoring case and surrounding space.
#[must_use]
pub fn normalize_output_mode(raw: &str) -> Option<OutputMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" => Some(OutputMode::Pretty),
        "text" => Some(OutputMode::Text),
        "json" => Some(OutputMode::Json),
        _ => None,
    }
}

const fn default_top() -> usize {
    10
}

const fn default_table_limit() -> usize {
    20
}

const fn default_max_iter() -> usize {
    1000
}

const fn default_tolerance() -> f64 {
    1e-6
}

fn default_city_column() -> String {
    "City".to_string()
}

fn default_country_column() -> String {
    "Country".to_string()
}

fn default_system_column() -> String {
    "Name".to_string()
}

fn default_ridership_column() -> String {
    "Annual ridership (millions)".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_config_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cfg = load_config(None, dir.path()).expect("load should succeed");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.analysis.top, 10);
        assert_eq!(cfg.analysis.table_limit, 20);
        assert_eq!(cfg.analysis.eigenvector(), EigenvectorConfig::default());
        assert_eq!(cfg.input.ridership, "Annual ridership (millions)");
        assert!(cfg.output.is_none());
    }

    #[test]
    fn project_config_overrides_some_fields() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            r#"
output = "json"

[analysis]
top = 5
eigenvector_max_iter = 50

[input]
city = "city_name"
"#,
        )
        .expect("write config");

        let cfg = load_config(None, dir.path()).expect("load should succeed");
        assert_eq!(cfg.output.as_deref(), Some("json"));
        assert_eq!(cfg.analysis.top, 5);
        assert_eq!(cfg.analysis.table_limit, 20);
        assert_eq!(cfg.analysis.eigenvector().max_iter, 50);
        assert_eq!(cfg.input.city, "city_name");
        assert_eq!(cfg.input.country, "Country");
    }

    #[test]
    fn explicit_path_wins_over_project_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join(PROJECT_CONFIG_FILE), "[analysis]\ntop = 3\n")
            .expect("write project config");
        let explicit = dir.path().join("other.toml");
        std::fs::write(&explicit, "[analysis]\ntop = 7\n").expect("write explicit config");

        let cfg = load_config(Some(&explicit), dir.path()).expect("load should succeed");
        assert_eq!(cfg.analysis.top, 7);
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("nope.toml");
        assert!(load_config(Some(&missing), dir.path()).is_err());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join(PROJECT_CONFIG_FILE), "[analysis\ntop = ")
            .expect("write config");
        let err = load_config(None, dir.path()).expect_err("parse must fail");
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn output_modes_are_normalized() {
        assert_eq!(normalize_output_mode("Pretty"), Some(OutputMode::Pretty));
        assert_eq!(normalize_output_mode(" TEXT "), Some(OutputMode::Text));
        assert_eq!(normalize_output_mode("json"), Some(OutputMode::Json));
        assert_eq!(normalize_output_mode("human"), None);
        assert_eq!(normalize_output_mode("table"), None);
    }
}
