//! # Theme Configuration
//!
//! [ThemeConfig] decides which theme a host starts with, which one to fall
//! back to, which theme bundle files to load into the registry, and whether
//! registration should also reject themes that only carry audit warnings.
//!
//! ## Sources
//!
//! Configuration is layered, later layers winning:
//!
//! 1. [ThemeConfig::default]: `material-light`, falling back to `material-dark`
//! 2. a TOML file named by `THEMEKIT_THEME_CONFIG`
//! 3. the `THEMEKIT_THEME`, `THEMEKIT_THEME_FALLBACK` and
//!    `THEMEKIT_STRICT_VALIDATION` environment variables
//!
//! ## File Format
//!
//! ```toml
//! [theme]
//! default = "ocean"
//! fallback = "material-dark"
//! files = ["themes/ocean.json"]
//! strict_validation = true
//! ```
//!
//! Relative `files` entries are resolved against the directory of the
//! configuration file. An empty id (`fallback = ""`) removes the setting
//! inherited from the layer below.
//!
//! ```rust
//! use themekit_theme::config::ThemeConfig;
//!
//! let config = ThemeConfig::from_toml("[theme]\ndefault = \"ocean\"\n").unwrap();
//! assert_eq!(config.default_theme.as_deref(), Some("ocean"));
//! assert_eq!(config.fallback_theme.as_deref(), Some("material-dark"));
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::builtin::{MATERIAL_DARK_ID, MATERIAL_LIGHT_ID};
use crate::error::{ThemeError, ThemeResult};

/// Environment variable naming the default theme id.
pub const ENV_THEME: &str = "THEMEKIT_THEME";
/// Environment variable naming the fallback theme id.
pub const ENV_THEME_FALLBACK: &str = "THEMEKIT_THEME_FALLBACK";
/// Environment variable pointing at a TOML configuration file.
pub const ENV_THEME_CONFIG: &str = "THEMEKIT_THEME_CONFIG";
/// Environment variable toggling strict validation.
pub const ENV_STRICT_VALIDATION: &str = "THEMEKIT_STRICT_VALIDATION";

/// Theme selection and loading settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Id of the theme to use by default.
    #[serde(rename = "default", serialize_with = "blank_if_none")]
    pub default_theme: Option<String>,
    /// Id of the theme to use when the default is not registered.
    #[serde(rename = "fallback", serialize_with = "blank_if_none")]
    pub fallback_theme: Option<String>,
    /// Theme bundle files to import.
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// Reject themes whose audit report has warnings.
    #[serde(default)]
    pub strict_validation: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    theme: Option<ThemeConfig>,
}

impl ThemeConfig {
    /// The default configuration.
    pub fn new() -> Self {
        Self {
            default_theme: Some(MATERIAL_LIGHT_ID.to_string()),
            fallback_theme: Some(MATERIAL_DARK_ID.to_string()),
            files: Vec::new(),
            strict_validation: false,
        }
    }

    /// Read the process environment on top of the defaults.
    pub fn from_env_or_default() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Like [ThemeConfig::from_env_or_default], reading variables through
    /// `lookup` instead of the process environment.
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(path) = lookup(ENV_THEME_CONFIG) {
            match Self::load_layer(Path::new(&path)) {
                Ok(layer) => config = config.merge(layer),
                Err(err) => log::warn!("Ignoring theme config {}: {}", path, err),
            }
        }

        if let Some(theme) = non_blank(lookup(ENV_THEME)) {
            config.default_theme = Some(theme);
        }
        if let Some(fallback) = non_blank(lookup(ENV_THEME_FALLBACK)) {
            config.fallback_theme = Some(fallback);
        }
        if let Some(strict) = lookup(ENV_STRICT_VALIDATION) {
            match parse_flag(&strict) {
                Some(flag) => config.strict_validation = flag,
                None => log::warn!("Ignoring {}={:?}: not a boolean", ENV_STRICT_VALIDATION, strict),
            }
        }

        config
    }

    /// Load a `.toml` configuration file on top of the defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ThemeResult<Self> {
        Ok(Self::new().merge(Self::load_layer(path.as_ref())?))
    }

    fn load_layer(path: &Path) -> ThemeResult<Self> {
        if path.extension().and_then(|s| s.to_str()) != Some("toml") {
            return Err(ThemeError::parse_error(
                path,
                "unsupported configuration file format, use .toml",
            ));
        }

        let content = fs::read_to_string(path)?;
        let mut layer = Self::parse_layer(&content)
            .map_err(|err| ThemeError::parse_error(path, err.to_string()))?;

        if let Some(dir) = path.parent() {
            layer.files = layer
                .files
                .into_iter()
                .map(|file| if file.is_relative() { dir.join(file) } else { file })
                .collect();
        }

        log::info!("Loaded theme config from {:?}", path);
        Ok(layer)
    }

    /// Parse configuration from TOML text on top of the defaults.
    pub fn from_toml(content: &str) -> ThemeResult<Self> {
        let layer =
            Self::parse_layer(content).map_err(|err| ThemeError::Serialization(err.to_string()))?;
        Ok(Self::new().merge(layer))
    }

    // Absent keys stay `None` so they do not mask earlier layers.
    fn parse_layer(content: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.theme.unwrap_or(ThemeConfig {
            default_theme: None,
            fallback_theme: None,
            files: Vec::new(),
            strict_validation: false,
        }))
    }

    /// Render as a TOML document with a `[theme]` table.
    pub fn to_toml(&self) -> ThemeResult<String> {
        #[derive(Serialize)]
        struct Document<'a> {
            theme: &'a ThemeConfig,
        }

        toml::to_string(&Document { theme: self })
            .map_err(|err| ThemeError::Serialization(err.to_string()))
    }

    /// Layer `other` on top of `self`. Present values in `other` win and a
    /// present blank id clears the setting. File lists are concatenated
    /// without duplicates, strict validation sticks once enabled.
    pub fn merge(mut self, other: ThemeConfig) -> Self {
        if let Some(id) = other.default_theme {
            self.default_theme = non_blank(Some(id));
        }
        if let Some(id) = other.fallback_theme {
            self.fallback_theme = non_blank(Some(id));
        }
        for file in other.files {
            if !self.files.contains(&file) {
                self.files.push(file);
            }
        }
        self.strict_validation |= other.strict_validation;
        self
    }

    /// Set the default theme id.
    pub fn with_default_theme(mut self, id: impl Into<String>) -> Self {
        self.default_theme = Some(id.into());
        self
    }

    /// Set the fallback theme id.
    pub fn with_fallback_theme(mut self, id: impl Into<String>) -> Self {
        self.fallback_theme = Some(id.into());
        self
    }

    /// Remove the fallback theme.
    pub fn without_fallback(mut self) -> Self {
        self.fallback_theme = None;
        self
    }

    /// Add a bundle file to import.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Toggle strict validation.
    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    /// Theme ids to try, in order: default, then fallback.
    pub fn candidates(&self) -> Vec<&str> {
        let mut ids = Vec::with_capacity(2);
        ids.extend(self.default_theme.as_deref().filter(|id| !id.trim().is_empty()));
        if let Some(fallback) = self.fallback_theme.as_deref().filter(|id| !id.trim().is_empty()) {
            if !ids.contains(&fallback) {
                ids.push(fallback);
            }
        }
        ids
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self::new()
    }
}

// An unset id is written as "" so that reading the file back clears it.
fn blank_if_none<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or_default())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
