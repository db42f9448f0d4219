//! Runtime configuration.
//!
//! Layers, lowest first: built-in defaults, `<config dir>/course-planner/config.json`,
//! `COURSE_PLANNER_*` environment variables, then command-line flags (applied by
//! the binary).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogSource;
use crate::storage::SqliteStore;

const APP_NAME: &str = "course-planner";
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_CATALOG: &str = "courses.json";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog file path or `http(s)://` URL.
    pub catalog: String,
    /// Schedule database. Defaults to the platform data directory.
    pub database: Option<PathBuf>,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: DEFAULT_CATALOG.to_string(),
            database: None,
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Config file plus environment overrides. A missing or unreadable file
    /// falls back to defaults.
    pub fn load() -> Self {
        let config = match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    fn try_load() -> Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(&config_path)
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Applies `COURSE_PLANNER_CATALOG`, `COURSE_PLANNER_DB` and
    /// `COURSE_PLANNER_PORT`. An unparsable port is ignored.
    pub fn with_env<F>(mut self, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(catalog) = var("COURSE_PLANNER_CATALOG") {
            self.catalog = catalog;
        }
        if let Some(db) = var("COURSE_PLANNER_DB") {
            self.database = Some(PathBuf::from(db));
        }
        if let Some(port) = var("COURSE_PLANNER_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!("Ignoring invalid COURSE_PLANNER_PORT: {}", port),
            }
        }
        self
    }

    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::parse(&self.catalog)
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => SqliteStore::default_path().context("Could not determine data directory"),
        }
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
