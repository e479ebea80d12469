//! Configuration loading
//!
//! Priority: CLI flags (with env fallbacks) > TOML file > compiled defaults.
//! The CLI layer lives in `main`; this module covers the file and defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "college_roi.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the raw and processed CSV files.
    pub data_dir: PathBuf,
    pub salary_file: String,
    pub tuition_file: String,
    pub processed_salary_file: String,
    pub processed_tuition_file: String,
    pub host: String,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            salary_file: "final-post-college-salaries.csv".to_string(),
            tuition_file: "historical_tuition.csv".to_string(),
            processed_salary_file: "processed_salary_data.csv".to_string(),
            processed_tuition_file: "processed_tuition_trend.csv".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8050,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&content, path)?;
        info!("Loaded config from {}", path.display());
        Ok(settings)
    }

    /// Load settings from an explicit file, or from `college_roi.toml` in
    /// the working directory when it exists, or fall back to defaults.
    ///
    /// An explicit path that cannot be read is an error; the implicit file
    /// is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let implicit = Path::new(DEFAULT_CONFIG_FILE);
                if implicit.is_file() {
                    Self::from_file(implicit)
                } else {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Socket address string for the dashboard server.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
