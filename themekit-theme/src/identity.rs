//! # Theme Identity
//!
//! The identity half of a [Theme](crate::theme::Theme): who the theme is, as
//! opposed to what it looks like. Identity and properties are kept in separate
//! value objects so that properties can be swapped or merged without touching
//! identity.
//!
//! ```rust
//! use themekit_theme::identity::{ThemeIdentity, ThemeType, ThemeVariant};
//!
//! let identity = ThemeIdentity::new("ocean-dark", "Ocean Dark")
//!     .with_label("Ocean (dark)")
//!     .with_theme_type(ThemeType::Dark)
//!     .with_variant(ThemeVariant::Primary)
//!     .with_opposite_theme("ocean-light");
//!
//! assert_eq!(identity.opposite_theme_id.as_deref(), Some("ocean-light"));
//! ```

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// The category of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeType {
    /// A light theme.
    Light,
    /// A dark theme.
    Dark,
    /// A Material Design theme.
    Material,
    /// Anything else.
    Custom,
}

impl ThemeType {
    /// All theme types, in declaration order.
    pub const ALL: [ThemeType; 4] = [
        ThemeType::Light,
        ThemeType::Dark,
        ThemeType::Material,
        ThemeType::Custom,
    ];

    /// The lowercase tag used in serialized themes.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeType::Light => "light",
            ThemeType::Dark => "dark",
            ThemeType::Material => "material",
            ThemeType::Custom => "custom",
        }
    }
}

impl Default for ThemeType {
    fn default() -> Self {
        Self::Custom
    }
}

impl Display for ThemeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The semantic style role of a theme, orthogonal to its [ThemeType].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    /// Default role.
    Default,
    /// Primary role.
    Primary,
    /// Secondary role.
    Secondary,
    /// Success role.
    Success,
    /// Warning role.
    Warning,
    /// Error role.
    Error,
    /// Informational role.
    Info,
}

impl ThemeVariant {
    /// All variants, in declaration order.
    pub const ALL: [ThemeVariant; 7] = [
        ThemeVariant::Default,
        ThemeVariant::Primary,
        ThemeVariant::Secondary,
        ThemeVariant::Success,
        ThemeVariant::Warning,
        ThemeVariant::Error,
        ThemeVariant::Info,
    ];

    /// The lowercase tag used in serialized themes.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeVariant::Default => "default",
            ThemeVariant::Primary => "primary",
            ThemeVariant::Secondary => "secondary",
            ThemeVariant::Success => "success",
            ThemeVariant::Warning => "warning",
            ThemeVariant::Error => "error",
            ThemeVariant::Info => "info",
        }
    }
}

impl Default for ThemeVariant {
    fn default() -> Self {
        Self::Default
    }
}

impl Display for ThemeVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity metadata of a theme. Immutable once the theme is built.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeIdentity {
    /// Unique id.
    pub id: String,
    /// Unique display name.
    pub name: String,
    /// Human-readable label.
    #[serde(default)]
    pub label: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Theme category.
    #[serde(default, rename = "type")]
    pub theme_type: ThemeType,
    /// Semantic role.
    #[serde(default)]
    pub variant: ThemeVariant,
    /// Whether the theme is marked active.
    #[serde(default)]
    pub is_active: bool,
    /// Whether the theme can render in dark mode.
    #[serde(default)]
    pub supports_dark_mode: bool,
    /// Id of the light/dark counterpart. Not checked for existence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opposite_theme_id: Option<String>,
    /// Theme version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Theme author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ThemeIdentity {
    /// Create an identity with the given id and display name.
    ///
    /// The label starts out equal to the name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            label: name.clone(),
            name,
            ..Default::default()
        }
    }

    /// Set the human label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the theme category.
    pub fn with_theme_type(mut self, theme_type: ThemeType) -> Self {
        self.theme_type = theme_type;
        self
    }

    /// Set the semantic role.
    pub fn with_variant(mut self, variant: ThemeVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Mark the theme active or inactive.
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Declare dark mode support.
    pub fn with_dark_mode(mut self, supports_dark_mode: bool) -> Self {
        self.supports_dark_mode = supports_dark_mode;
        self
    }

    /// Set the id of the opposite (light/dark) theme.
    pub fn with_opposite_theme(mut self, id: impl Into<String>) -> Self {
        self.opposite_theme_id = Some(id.into());
        self
    }

    /// Set the version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Add a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// A partial identity. Every present field replaces the original's value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentityOverride {
    /// Replacement id.
    pub id: Option<String>,
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement label.
    pub label: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement category.
    #[serde(rename = "type")]
    pub theme_type: Option<ThemeType>,
    /// Replacement role.
    pub variant: Option<ThemeVariant>,
    /// Replacement active flag.
    pub is_active: Option<bool>,
    /// Replacement dark mode flag.
    pub supports_dark_mode: Option<bool>,
    /// Replacement opposite theme id.
    pub opposite_theme_id: Option<String>,
    /// Replacement version.
    pub version: Option<String>,
    /// Replacement author.
    pub author: Option<String>,
    /// Replacement tags.
    pub tags: Option<Vec<String>>,
}

impl IdentityOverride {
    /// Apply this override on top of `base`.
    pub fn apply(&self, base: &ThemeIdentity) -> ThemeIdentity {
        ThemeIdentity {
            id: self.id.clone().unwrap_or_else(|| base.id.clone()),
            name: self.name.clone().unwrap_or_else(|| base.name.clone()),
            label: self.label.clone().unwrap_or_else(|| base.label.clone()),
            description: self.description.clone().or_else(|| base.description.clone()),
            theme_type: self.theme_type.unwrap_or(base.theme_type),
            variant: self.variant.unwrap_or(base.variant),
            is_active: self.is_active.unwrap_or(base.is_active),
            supports_dark_mode: self.supports_dark_mode.unwrap_or(base.supports_dark_mode),
            opposite_theme_id: self
                .opposite_theme_id
                .clone()
                .or_else(|| base.opposite_theme_id.clone()),
            version: self.version.clone().or_else(|| base.version.clone()),
            author: self.author.clone().or_else(|| base.author.clone()),
            tags: self.tags.clone().unwrap_or_else(|| base.tags.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_serde_names() {
        let identity = ThemeIdentity::new("t1", "Test Theme")
            .with_theme_type(ThemeType::Material)
            .with_dark_mode(true);
        let json = serde_json::to_value(&identity).unwrap();

        assert_eq!(json["type"], "material");
        assert_eq!(json["variant"], "default");
        assert_eq!(json["supportsDarkMode"], true);
        assert!(json.get("oppositeThemeId").is_none());
    }

    #[test]
    fn test_override_apply() {
        let base = ThemeIdentity::new("t1", "Test Theme")
            .with_version("1.0.0")
            .with_tag("blue");
        let patch = IdentityOverride {
            name: Some("Renamed".to_string()),
            variant: Some(ThemeVariant::Warning),
            ..Default::default()
        };

        let merged = patch.apply(&base);
        assert_eq!(merged.id, "t1");
        assert_eq!(merged.name, "Renamed");
        assert_eq!(merged.variant, ThemeVariant::Warning);
        assert_eq!(merged.version.as_deref(), Some("1.0.0"));
        assert_eq!(merged.tags, vec!["blue".to_string()]);
    }
}
