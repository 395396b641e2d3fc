//! TOML-based configuration for mschema.
//!
//! Supports a config file (mschema.toml) with environment variable expansion
//! in paths.
//!
//! Example configuration:
//! ```toml
//! [render]
//! example_cap = 3
//! show_type_detail = false
//!
//! [introspect]
//! sample_limit = 5
//! db_id = "shop"
//! namespace = "main"
//!
//! [cache]
//! enabled = true
//! path = "${HOME}/.mschema/cache.db"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::metadata::DEFAULT_SAMPLE_LIMIT;
use crate::render::{RenderOptions, DEFAULT_EXAMPLE_CAP};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub render: RenderSettings,
    pub introspect: IntrospectSettings,
    pub cache: CacheSettings,
}

/// Rendering defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Maximum examples shown per field.
    pub example_cap: usize,

    /// Keep type parameters such as `(255)`.
    pub show_type_detail: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            example_cap: DEFAULT_EXAMPLE_CAP,
            show_type_detail: false,
        }
    }
}

impl RenderSettings {
    /// Render options with these defaults and no filters.
    pub fn to_options(&self) -> RenderOptions {
        RenderOptions::new()
            .with_example_cap(self.example_cap)
            .with_type_detail(self.show_type_detail)
    }
}

/// Introspection settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IntrospectSettings {
    /// Distinct values fetched per column.
    pub sample_limit: usize,

    /// Database id; defaults to the database file stem.
    pub db_id: Option<String>,

    /// Restrict introspection to one namespace.
    pub namespace: Option<String>,
}

impl Default for IntrospectSettings {
    fn default() -> Self {
        Self {
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            db_id: None,
            namespace: None,
        }
    }
}

/// Document cache settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Reuse cached documents for unchanged databases.
    pub enabled: bool,

    /// Cache database path (supports ${ENV_VAR} expansion).
    pub path: Option<String>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl CacheSettings {
    /// Configured cache path with environment variables expanded.
    pub fn resolved_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.path
            .as_deref()
            .map(|p| expand_env_vars(p).map(PathBuf::from))
            .transpose()
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `MSCHEMA_CONFIG`
    /// 2. `./mschema.toml`
    /// 3. `~/.config/mschema/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("MSCHEMA_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("mschema.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("mschema").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.introspect.sample_limit == 0 {
            return Err(SettingsError::InvalidConfig(
                "introspect.sample_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax; a lone `$` is kept.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }

        let mut var_name = String::new();
        while let Some(&ch) = chars.peek() {
            if braced {
                chars.next();
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            } else if ch.is_alphanumeric() || ch == '_' {
                var_name.push(ch);
                chars.next();
            } else {
                break;
            }
        }

        if var_name.is_empty() && !braced {
            result.push('$');
            continue;
        }
        let value = env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name))?;
        result.push_str(&value);
    }

    Ok(result)
}
