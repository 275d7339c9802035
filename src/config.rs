use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api;
use crate::filters::{FilterField, FilterSelection};

/// Overrides the configured endpoint when set.
pub const ENDPOINT_ENV_VAR: &str = "EDUQUERY_API_URL";

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub endpoint: Option<String>,
    pub board: Option<String>,
    pub language: Option<String>,
    pub class_level: Option<String>,
    pub subject: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the service endpoint: env var, then config, then the default.
    pub fn endpoint(&self) -> String {
        std::env::var(ENDPOINT_ENV_VAR)
            .ok()
            .or_else(|| self.endpoint.clone())
            .unwrap_or_else(|| api::DEFAULT_ENDPOINT.to_string())
    }

    /// Seed a filter selection from configured defaults. Values outside the
    /// enumerations end up unselected via the closed-set check in `set`.
    pub fn default_filters(&self) -> FilterSelection {
        let mut filters = FilterSelection::new();
        if let Some(board) = &self.board {
            filters.set(FilterField::Board, board);
        }
        if let Some(language) = &self.language {
            filters.set(FilterField::Language, language);
        }
        if let Some(class_level) = &self.class_level {
            filters.set(FilterField::ClassLevel, class_level);
        }
        if let Some(subject) = &self.subject {
            filters.set(FilterField::Subject, subject);
        }
        filters
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("eduquery").join("config.json"))
    }
}
