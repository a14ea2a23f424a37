//! Dashboard configuration.
//!
//! Read from the JSON file named by `MORTALITY_DASH_CONFIG`, else
//! `dashboard.json` in the working directory, else built-in defaults.
//! Every field is optional.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_ENV: &str = "MORTALITY_DASH_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub risk_factors_path: PathBuf,
    pub causes_path: PathBuf,

    /// Countries selected at startup (names missing from the data are skipped).
    pub default_entities: Vec<String>,
    pub default_causes: Vec<String>,
    pub default_risk_factors: Vec<String>,

    pub top_bar_risk: usize,
    pub top_pie_risk: usize,
    pub top_bar_causes: usize,
    pub top_pie_causes: usize,
    pub heatmap_columns: usize,
    pub correlation_columns: usize,
    pub treemap_columns: usize,
    pub compare_columns: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let strings = |xs: &[&str]| -> Vec<String> { xs.iter().map(|s| s.to_string()).collect() };
        Self {
            risk_factors_path: PathBuf::from("data/death rate of countries and its causes.csv"),
            causes_path: PathBuf::from("data/cause_of_deaths2.csv"),
            default_entities: strings(&["France", "Germany", "United States", "Japan", "Brazil"]),
            default_causes: strings(&[
                "Cardiovascular Diseases",
                "Neoplasms",
                "Lower Respiratory Infections",
                "Diabetes Mellitus",
                "Chronic Kidney Disease",
            ]),
            default_risk_factors: strings(&[
                "Smoking",
                "High systolic blood pressure",
                "Air pollution",
                "High body mass index",
                "High fasting plasma glucose",
            ]),
            top_bar_risk: 10,
            top_pie_risk: 8,
            top_bar_causes: 12,
            top_pie_causes: 10,
            heatmap_columns: 15,
            correlation_columns: 10,
            treemap_columns: 10,
            compare_columns: 5,
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Resolve the config from the environment / working directory.
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            let path = PathBuf::from(path);
            log::info!("Using config from ${CONFIG_ENV}: {}", path.display());
            return Self::from_file(&path);
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            log::info!("Using config from {}", local.display());
            return Self::from_file(local);
        }
        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = DashboardConfig::from_json(r#"{ "top_bar_risk": 3, "default_entities": ["Chad"] }"#).unwrap();
        assert_eq!(cfg.top_bar_risk, 3);
        assert_eq!(cfg.default_entities, ["Chad"]);
        assert_eq!(cfg.top_pie_risk, 8);
        assert_eq!(cfg.causes_path, PathBuf::from("data/cause_of_deaths2.csv"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(DashboardConfig::from_json(r#"{ "top_bar": 3 }"#).is_err());
    }

    #[test]
    fn from_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = DashboardConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }
}
