//! Application-level configuration loading, including the runtime team catalog.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

use crate::{
    catalog::{CENTER_COLOR, TeamCatalog, TeamEntry},
    dto::validation::validate_hex_color,
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SCOREBOARD_CONFIG_PATH";
/// Text color used when a catalog entry does not provide one.
const DEFAULT_TEXT_COLOR: &str = "#FFFFFF";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    catalog: TeamCatalog,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the built-in catalog.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json_str(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        count = app_config.catalog.len(),
                        "loaded team catalog from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a configuration document. Teams with invalid colors are skipped.
    pub fn from_json_str(contents: &str) -> serde_json::Result<Self> {
        let raw = serde_json::from_str::<RawConfig>(contents)?;
        Ok(raw.into())
    }

    /// Configuration using `catalog` as the team catalog.
    pub fn with_catalog(catalog: TeamCatalog) -> Self {
        Self { catalog }
    }

    /// Team catalog used to resolve team keys.
    pub fn catalog(&self) -> &TeamCatalog {
        &self.catalog
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: TeamCatalog::builtin(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    teams: Vec<RawTeam>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let mut teams = IndexMap::with_capacity(value.teams.len());
        for team in value.teams {
            if let Err(err) = team.validate() {
                warn!(key = %team.key, error = %err, "skipping invalid team catalog entry");
                continue;
            }
            let (key, entry) = team.into_entry();
            teams.insert(key, entry);
        }
        Self {
            catalog: TeamCatalog::new(teams),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of a single team inside the configuration file.
struct RawTeam {
    key: String,
    name: String,
    #[serde(default)]
    short_name: Option<String>,
    logo: String,
    primary_color: String,
    #[serde(default)]
    secondary_color: Option<String>,
    #[serde(default)]
    text_color: Option<String>,
}

impl Validate for RawTeam {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_hex_color(&self.primary_color) {
            errors.add("primary_color", e);
        }
        if let Some(color) = &self.secondary_color {
            if let Err(e) = validate_hex_color(color) {
                errors.add("secondary_color", e);
            }
        }
        if let Some(color) = &self.text_color {
            if let Err(e) = validate_hex_color(color) {
                errors.add("text_color", e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl RawTeam {
    fn into_entry(self) -> (String, TeamEntry) {
        let short_name = self
            .short_name
            .unwrap_or_else(|| self.name.chars().take(3).collect());
        (
            self.key,
            TeamEntry {
                name: self.name,
                short_name,
                logo: self.logo,
                primary_color: self.primary_color,
                secondary_color: self
                    .secondary_color
                    .unwrap_or_else(|| CENTER_COLOR.to_string()),
                text_color: self
                    .text_color
                    .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string()),
            },
        )
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
