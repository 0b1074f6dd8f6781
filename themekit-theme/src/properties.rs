//! # Theme Properties
//!
//! The style half of a [Theme](crate::theme::Theme): colors, typography,
//! spacing, border radius, shadows, animation timing and breakpoints, plus
//! optional style classes, a free-form `custom` bag and metadata.
//!
//! ## Overview
//!
//! - **[ThemeProperties]**: the full property bundle
//! - **[ColorTokens]**: color sections, each a nested tree of named shades
//! - **[Typography]**, **[Spacing]**, **[Animation]**: structured groups
//! - **[Scale]** / **[TokenMap]**: flat named numeric / string scales
//! - **[StyleClass]**: a reusable flat bag of [Scalar] values
//!
//! Every mandatory group is an `Option` so that an incomplete theme can exist
//! while it is being assembled. Completeness is checked when the theme is
//! registered, see [validation](crate::validation).
//!
//! ## Tree Form
//!
//! Deep merging works on [PropertyValue] trees. [ThemeProperties::to_tree]
//! and [ThemeProperties::from_tree] convert between the typed groups and that
//! form through serde, so the serialized field names (`borderRadius`,
//! `fontSize`, ...) are also the path segments used by the resolver.
//!
//! ```rust
//! use themekit_theme::properties::{Spacing, ThemeProperties, scale_of};
//!
//! let properties = ThemeProperties {
//!     spacing: Some(Spacing {
//!         scale: scale_of(&[("sm", 8.0), ("md", 16.0)]),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//!
//! let tree = properties.to_tree().unwrap();
//! assert!(tree.contains_key("spacing"));
//! assert_eq!(properties.missing_groups().len(), 6);
//! ```

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ThemeError, ThemeResult};
use crate::value::{tagged_date, PropertyMap, PropertyValue};

/// A named numeric scale (`md -> 16`).
pub type Scale = IndexMap<String, f64>;

/// A named string scale (`md -> "0 2px 4px rgba(0,0,0,0.2)"`).
pub type TokenMap = IndexMap<String, String>;

/// A reusable named style class: a flat bag of scalars.
pub type StyleClass = IndexMap<String, Scalar>;

/// Path segment of the colors group.
pub const GROUP_COLORS: &str = "colors";
/// Path segment of the typography group.
pub const GROUP_TYPOGRAPHY: &str = "typography";
/// Path segment of the spacing group.
pub const GROUP_SPACING: &str = "spacing";
/// Path segment of the border radius group.
pub const GROUP_BORDER_RADIUS: &str = "borderRadius";
/// Path segment of the shadows group.
pub const GROUP_SHADOWS: &str = "shadows";
/// Path segment of the animation group.
pub const GROUP_ANIMATION: &str = "animation";
/// Path segment of the breakpoints group.
pub const GROUP_BREAKPOINTS: &str = "breakpoints";
/// Path segment of the style class map.
pub const GROUP_THEME_CLASSES: &str = "themeClasses";
/// Path segment of the metadata block.
pub const GROUP_METADATA: &str = "metadata";

/// Groups every registrable theme must carry.
pub const MANDATORY_GROUPS: [&str; 7] = [
    GROUP_COLORS,
    GROUP_TYPOGRAPHY,
    GROUP_SPACING,
    GROUP_BORDER_RADIUS,
    GROUP_SHADOWS,
    GROUP_ANIMATION,
    GROUP_BREAKPOINTS,
];

/// A scalar value inside a [StyleClass].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    Text(String),
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// Color sections. Each section maps shade names to color strings and may
/// nest further (`semantic.brand.primary`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ColorTokens {
    /// Primary brand shades (`main`, `light`, `dark`, `contrast`).
    pub primary: PropertyMap,
    /// Secondary brand shades.
    pub secondary: PropertyMap,
    /// Surface and page backgrounds.
    pub background: PropertyMap,
    /// Text colors.
    pub text: PropertyMap,
    /// Status colors (success, warning, error, info).
    pub status: PropertyMap,
    /// UI chrome colors (borders, dividers, focus rings).
    pub ui: PropertyMap,
    /// Free-form semantic aliases.
    pub semantic: PropertyMap,
}

impl ColorTokens {
    /// Section names, in declaration order.
    pub const SECTIONS: [&'static str; 7] = [
        "primary",
        "secondary",
        "background",
        "text",
        "status",
        "ui",
        "semantic",
    ];

    /// Look up a section by name.
    pub fn section(&self, name: &str) -> Option<&PropertyMap> {
        match name {
            "primary" => Some(&self.primary),
            "secondary" => Some(&self.secondary),
            "background" => Some(&self.background),
            "text" => Some(&self.text),
            "status" => Some(&self.status),
            "ui" => Some(&self.ui),
            "semantic" => Some(&self.semantic),
            _ => None,
        }
    }

    /// Iterate over `(name, section)` pairs.
    pub fn sections(&self) -> impl Iterator<Item = (&'static str, &PropertyMap)> {
        Self::SECTIONS
            .into_iter()
            .filter_map(move |name| self.section(name).map(|section| (name, section)))
    }
}

/// Typography tokens.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Typography {
    /// Font family stacks by role (`body`, `heading`, `mono`).
    pub font_family: TokenMap,
    /// Font size scale.
    pub font_size: Scale,
    /// Font weight scale.
    pub font_weight: Scale,
    /// Line height scale.
    pub line_height: Scale,
    /// Letter spacing scale.
    pub letter_spacing: Scale,
}

/// Spacing tokens.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Spacing {
    /// Base unit the scale was derived from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<f64>,
    /// CSS-like unit the scale is expressed in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Named spacing scale.
    pub scale: Scale,
}

/// Animation tokens.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Animation {
    /// Named durations in milliseconds.
    pub duration: Scale,
    /// Named easing curves.
    pub easing: TokenMap,
    /// Named animatable property names.
    pub properties: TokenMap,
}

/// Bookkeeping attached to a theme.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ThemeMetadata {
    /// When the theme was created.
    #[serde(with = "tagged_date", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the theme was last updated.
    #[serde(with = "tagged_date", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Property schema version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Who produced the properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// The complete property bundle of a theme.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ThemeProperties {
    /// Color sections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorTokens>,
    /// Typography tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typography: Option<Typography>,
    /// Spacing tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<Spacing>,
    /// Border radius scale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<Scale>,
    /// Named box shadows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadows: Option<TokenMap>,
    /// Animation tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
    /// Named pixel-width thresholds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakpoints: Option<Scale>,
    /// Reusable named style classes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_classes: Option<IndexMap<String, StyleClass>>,
    /// Free-form extension point for keys the typed groups do not cover.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<PropertyMap>,
    /// Bookkeeping.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ThemeMetadata>,
    /// Partial property trees keyed by breakpoint name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakpoint_overrides: Option<IndexMap<String, PropertyMap>>,
}

impl ThemeProperties {
    /// Names of mandatory groups that are absent.
    pub fn missing_groups(&self) -> Vec<&'static str> {
        let present = [
            self.colors.is_some(),
            self.typography.is_some(),
            self.spacing.is_some(),
            self.border_radius.is_some(),
            self.shadows.is_some(),
            self.animation.is_some(),
            self.breakpoints.is_some(),
        ];
        MANDATORY_GROUPS
            .iter()
            .zip(present)
            .filter(|(_, present)| !present)
            .map(|(group, _)| *group)
            .collect()
    }

    /// Convert the typed groups into a property tree.
    pub fn to_tree(&self) -> ThemeResult<PropertyMap> {
        let json = serde_json::to_value(self)?;
        match serde_json::from_value::<PropertyValue>(json)? {
            PropertyValue::Record(map) => Ok(map),
            other => Err(ThemeError::structure(format!(
                "properties serialized to a {} instead of a record",
                other.kind()
            ))),
        }
    }

    /// Rebuild typed groups from a property tree.
    ///
    /// Fails with [ThemeError::Structure] when the tree does not fit the
    /// model, e.g. a string where the spacing scale should be.
    pub fn from_tree(tree: PropertyMap) -> ThemeResult<Self> {
        let json = serde_json::to_value(PropertyValue::Record(tree))?;
        serde_json::from_value(json).map_err(ThemeError::structure)
    }
}

/// Build a [Scale] from `(name, value)` pairs.
pub fn scale_of(entries: &[(&str, f64)]) -> Scale {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

/// Build a [TokenMap] from `(name, value)` pairs.
pub fn tokens_of(entries: &[(&str, &str)]) -> TokenMap {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// Build a flat [PropertyMap] of strings from `(name, value)` pairs.
pub fn shades_of(entries: &[(&str, &str)]) -> PropertyMap {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), PropertyValue::from(*value)))
        .collect()
}
