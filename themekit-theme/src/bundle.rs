//! # Theme Bundles
//!
//! A [ThemeBundle] is the self-describing export format for a single theme:
//!
//! ```json
//! {
//!   "metadata": { "version": "1.0.0", "exportedAt": "...", "exportedBy": "..." },
//!   "theme": { "identity": { ... }, "properties": { ... } },
//!   "dependencies": { "themes": [...], "breakpoints": [...], "units": [...] },
//!   "custom": { ... }
//! }
//! ```
//!
//! Exporting a theme and importing the bundle again yields an equal theme.
//!
//! ```rust
//! use themekit_theme::builtin::material_dark;
//! use themekit_theme::bundle::ThemeBundle;
//!
//! let bundle = ThemeBundle::new(material_dark(), "docs");
//! let json = bundle.to_json().unwrap();
//!
//! let restored = ThemeBundle::from_json(&json).unwrap();
//! assert_eq!(restored.theme, material_dark());
//! ```

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ThemeError, ThemeResult};
use crate::theme::Theme;
use crate::value::PropertyMap;

/// Version written into newly exported bundles.
pub const BUNDLE_FORMAT_VERSION: &str = "1.0.0";

/// Export bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleMetadata {
    /// Bundle format version.
    pub version: String,
    /// When the bundle was written.
    pub exported_at: DateTime<Utc>,
    /// Who wrote it.
    pub exported_by: String,
}

/// What the bundled theme refers to outside itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BundleDependencies {
    /// Other theme ids, e.g. the opposite theme.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub themes: Option<Vec<String>>,
    /// Breakpoint names the theme defines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakpoints: Option<Vec<String>>,
    /// Units the theme's scales are expressed in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Vec<String>>,
}

impl BundleDependencies {
    /// Collect dependencies from a theme.
    pub fn of(theme: &Theme) -> Self {
        let properties = theme.properties();

        let themes = theme
            .identity()
            .opposite_theme_id
            .as_ref()
            .map(|id| vec![id.clone()]);
        let breakpoints = properties
            .breakpoints
            .as_ref()
            .map(|breakpoints| breakpoints.keys().cloned().collect());
        let units = properties
            .spacing
            .as_ref()
            .and_then(|spacing| spacing.unit.clone())
            .map(|unit| vec![unit]);

        Self {
            themes,
            breakpoints,
            units,
        }
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.themes.is_none() && self.breakpoints.is_none() && self.units.is_none()
    }
}

/// A theme plus export metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeBundle {
    /// Export bookkeeping.
    pub metadata: BundleMetadata,
    /// The theme itself.
    pub theme: Theme,
    /// External references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<BundleDependencies>,
    /// Free-form data for the importing side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<PropertyMap>,
}

impl ThemeBundle {
    /// Bundle `theme`, stamping the current time.
    pub fn new(theme: Theme, exported_by: impl Into<String>) -> Self {
        let dependencies = BundleDependencies::of(&theme);
        Self {
            metadata: BundleMetadata {
                version: BUNDLE_FORMAT_VERSION.to_string(),
                exported_at: Utc::now(),
                exported_by: exported_by.into(),
            },
            theme,
            dependencies: (!dependencies.is_empty()).then_some(dependencies),
            custom: None,
        }
    }

    /// Attach free-form data.
    pub fn with_custom(mut self, custom: PropertyMap) -> Self {
        self.custom = Some(custom);
        self
    }

    /// Take the theme out of the bundle.
    pub fn into_theme(self) -> Theme {
        self.theme
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> ThemeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> ThemeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a bundle file.
    pub fn load<P: AsRef<Path>>(path: P) -> ThemeResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|err| ThemeError::parse_error(path, err.to_string()))
    }

    /// Write the bundle to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ThemeResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json()?)?;
        log::info!("Saved theme bundle '{}' to {:?}", self.theme.id(), path);
        Ok(())
    }
}
