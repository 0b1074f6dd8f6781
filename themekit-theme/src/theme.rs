//! # Theme
//!
//! A [Theme] is an immutable, named bundle of style properties: a
//! [ThemeIdentity] plus a [ThemeProperties]. The two halves are separate value
//! objects so properties can be swapped or merged without touching identity.
//!
//! ## Reading
//!
//! Typed accessors cover the common lookups:
//!
//! - [Theme::get_color] walks a dotted path below `colors` (`primary.main`)
//! - [Theme::get_spacing], [Theme::get_font_size], [Theme::get_border_radius]
//!   and [Theme::get_animation_duration] read named numeric scales
//! - [Theme::get_shadow] reads a named shadow
//! - [Theme::lookup] resolves any dotted path across the whole property tree
//!
//! A missing group is [ThemeError::MissingGroup]; a missing key is
//! [ThemeError::PropertyNotFound]. A theme can exist without every mandatory
//! group. Completeness is enforced when it is registered.
//!
//! ## Deriving
//!
//! Themes never change in place. [Theme::merge] returns a new theme with a
//! [ThemeOverride] deep-merged on top: records merge key by key and every
//! other value, lists included, replaces the original wholesale.
//!
//! ```rust
//! use themekit_theme::builtin::material_light;
//! use themekit_theme::theme::ThemeOverride;
//!
//! let base = material_light();
//! let patch = ThemeOverride::new()
//!     .with_value("colors.primary.main", "#ff5722")
//!     .unwrap();
//!
//! let branded = base.merge(Some(&patch)).unwrap();
//! assert_eq!(branded.get_color("primary.main").unwrap(), "#ff5722");
//! assert_eq!(base.get_color("primary.main").unwrap(), "#1976d2");
//! ```

use serde::{Deserialize, Serialize};

use crate::deep::{get_in, get_path, merge_maps, set_path, split_path};
use crate::diagnostics::{Component, Diagnostics};
use crate::error::{ThemeError, ThemeResult};
use crate::identity::{IdentityOverride, ThemeIdentity, ThemeType, ThemeVariant};
use crate::properties::{
    Scale, ThemeProperties, GROUP_ANIMATION, GROUP_BORDER_RADIUS, GROUP_BREAKPOINTS,
    GROUP_COLORS, GROUP_SHADOWS, GROUP_SPACING, GROUP_TYPOGRAPHY,
};
use crate::value::{PropertyMap, PropertyValue};

/// A partial theme used by [Theme::merge].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeOverride {
    /// Identity fields to replace.
    pub identity: IdentityOverride,
    /// Property tree to deep-merge over the theme's properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyMap>,
}

impl ThemeOverride {
    /// An override that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace identity fields.
    pub fn with_identity(mut self, identity: IdentityOverride) -> Self {
        self.identity = identity;
        self
    }

    /// Replace the whole property tree to merge.
    pub fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Set one value at a dotted property path (`colors.primary.main`).
    pub fn with_value(
        mut self,
        path: &str,
        value: impl Into<PropertyValue>,
    ) -> ThemeResult<Self> {
        let properties = self.properties.get_or_insert_with(PropertyMap::new);
        if !set_path(properties, path, value.into()) {
            return Err(ThemeError::invalid_input(
                "with_value",
                format!("malformed property path '{}'", path),
            ));
        }
        Ok(self)
    }
}

/// An immutable theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    identity: ThemeIdentity,
    properties: ThemeProperties,
    #[serde(skip)]
    diagnostics: Diagnostics,
}

impl PartialEq for Theme {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity && self.properties == other.properties
    }
}

impl Theme {
    /// Create a theme. No validation happens here.
    pub fn new(identity: ThemeIdentity, properties: ThemeProperties) -> Self {
        Self {
            identity,
            properties,
            diagnostics: Diagnostics::default(),
        }
    }

    /// Replace the diagnostics handle.
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// The diagnostics handle.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// The identity bundle.
    pub fn identity(&self) -> &ThemeIdentity {
        &self.identity
    }

    /// The property bundle.
    pub fn properties(&self) -> &ThemeProperties {
        &self.properties
    }

    /// The theme id.
    pub fn id(&self) -> &str {
        &self.identity.id
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// The theme category.
    pub fn theme_type(&self) -> ThemeType {
        self.identity.theme_type
    }

    /// The semantic role.
    pub fn variant(&self) -> ThemeVariant {
        self.identity.variant
    }

    /// Look up a color by dotted path below `colors`, e.g. `primary.main`.
    pub fn get_color(&self, path: &str) -> ThemeResult<&str> {
        let result = self.color_at(path);
        self.report_failure("get_color", path, result)
    }

    fn color_at(&self, path: &str) -> ThemeResult<&str> {
        let colors = self
            .properties
            .colors
            .as_ref()
            .ok_or_else(|| ThemeError::missing_group(GROUP_COLORS))?;
        let segments = split_path(path).ok_or_else(|| {
            ThemeError::invalid_input("get_color", format!("malformed color path '{}'", path))
        })?;

        let (section, rest) = segments
            .split_first()
            .ok_or_else(|| ThemeError::property_not_found(GROUP_COLORS, path))?;
        let section = colors
            .section(section)
            .ok_or_else(|| ThemeError::property_not_found(GROUP_COLORS, path))?;

        get_in(section, rest)
            .and_then(PropertyValue::as_str)
            .ok_or_else(|| ThemeError::property_not_found(GROUP_COLORS, path))
    }

    /// Look up a named spacing value from `spacing.scale`.
    pub fn get_spacing(&self, size: &str) -> ThemeResult<f64> {
        let result = self
            .properties
            .spacing
            .as_ref()
            .ok_or_else(|| ThemeError::missing_group(GROUP_SPACING))
            .and_then(|spacing| scale_value(&spacing.scale, GROUP_SPACING, "get_spacing", size));
        self.report_failure("get_spacing", size, result)
    }

    /// Look up a named font size from `typography.fontSize`.
    pub fn get_font_size(&self, size: &str) -> ThemeResult<f64> {
        let result = self
            .properties
            .typography
            .as_ref()
            .ok_or_else(|| ThemeError::missing_group(GROUP_TYPOGRAPHY))
            .and_then(|typography| {
                scale_value(&typography.font_size, GROUP_TYPOGRAPHY, "get_font_size", size)
            });
        self.report_failure("get_font_size", size, result)
    }

    /// Look up a named border radius.
    pub fn get_border_radius(&self, size: &str) -> ThemeResult<f64> {
        let result = self
            .properties
            .border_radius
            .as_ref()
            .ok_or_else(|| ThemeError::missing_group(GROUP_BORDER_RADIUS))
            .and_then(|scale| scale_value(scale, GROUP_BORDER_RADIUS, "get_border_radius", size));
        self.report_failure("get_border_radius", size, result)
    }

    /// Look up a named shadow.
    pub fn get_shadow(&self, size: &str) -> ThemeResult<&str> {
        let result = self
            .properties
            .shadows
            .as_ref()
            .ok_or_else(|| ThemeError::missing_group(GROUP_SHADOWS))
            .and_then(|shadows| {
                check_key("get_shadow", size)?;
                shadows
                    .get(size)
                    .map(String::as_str)
                    .ok_or_else(|| ThemeError::property_not_found(GROUP_SHADOWS, size))
            });
        self.report_failure("get_shadow", size, result)
    }

    /// Look up a named animation duration in milliseconds.
    pub fn get_animation_duration(&self, size: &str) -> ThemeResult<f64> {
        let result = self
            .properties
            .animation
            .as_ref()
            .ok_or_else(|| ThemeError::missing_group(GROUP_ANIMATION))
            .and_then(|animation| {
                scale_value(&animation.duration, GROUP_ANIMATION, "get_animation_duration", size)
            });
        self.report_failure("get_animation_duration", size, result)
    }

    /// Whether the breakpoints group defines `name`, whatever its value.
    ///
    /// Fails only when the breakpoints group itself is missing.
    pub fn supports_breakpoint(&self, name: &str) -> ThemeResult<bool> {
        let result = self
            .properties
            .breakpoints
            .as_ref()
            .map(|breakpoints| breakpoints.contains_key(name))
            .ok_or_else(|| ThemeError::missing_group(GROUP_BREAKPOINTS));
        self.report_failure("supports_breakpoint", name, result)
    }

    /// The id of the light/dark counterpart, if one is declared.
    pub fn get_opposite_theme(&self) -> ThemeResult<Option<&str>> {
        Ok(self.identity.opposite_theme_id.as_deref())
    }

    /// Copy the theme. Property trees are owned, so the copy shares nothing
    /// mutable with the original.
    pub fn clone_theme(&self) -> ThemeResult<Theme> {
        self.diagnostics.debug(
            Component::SegregatedTheme,
            "clone",
            "cloned theme",
            &[("id", self.id())],
        );
        Ok(self.clone())
    }

    /// Derive a new theme with `partial` applied on top.
    ///
    /// `None` returns an unchanged copy.
    pub fn merge(&self, partial: Option<&ThemeOverride>) -> ThemeResult<Theme> {
        let Some(partial) = partial else {
            return Ok(self.clone());
        };

        let result = self.merged_properties(partial).map(|properties| Theme {
            identity: partial.identity.apply(&self.identity),
            properties,
            diagnostics: self.diagnostics.clone(),
        });

        match &result {
            Ok(merged) => self.diagnostics.debug(
                Component::SegregatedTheme,
                "merge",
                "merged override",
                &[("id", self.id()), ("result_id", merged.id())],
            ),
            Err(err) => self.diagnostics.warn(
                Component::SegregatedTheme,
                "merge",
                err.to_string(),
                &[("id", self.id())],
            ),
        }
        result
    }

    fn merged_properties(&self, partial: &ThemeOverride) -> ThemeResult<ThemeProperties> {
        match &partial.properties {
            Some(tree) => {
                let base = self.properties.to_tree().map_err(ThemeError::structure)?;
                ThemeProperties::from_tree(merge_maps(&base, tree))
            },
            None => Ok(self.properties.clone()),
        }
    }

    /// The full property tree.
    pub fn to_tree(&self) -> ThemeResult<PropertyMap> {
        self.properties.to_tree()
    }

    /// Resolve a dotted path across the whole property tree, e.g.
    /// `spacing.scale.md` or `colors.primary.main`.
    pub fn lookup(&self, path: &str) -> ThemeResult<PropertyValue> {
        let segments = split_path(path).ok_or_else(|| {
            ThemeError::invalid_input("lookup", format!("malformed property path '{}'", path))
        })?;
        let tree = self.to_tree()?;
        get_path(&tree, path)
            .cloned()
            .ok_or_else(|| ThemeError::property_not_found(group_name(segments[0]), path))
    }

    fn report_failure<T>(
        &self,
        operation: &'static str,
        key: &str,
        result: ThemeResult<T>,
    ) -> ThemeResult<T> {
        if let Err(err) = &result {
            self.diagnostics.debug(
                Component::SegregatedTheme,
                operation,
                err.to_string(),
                &[("id", self.id()), ("key", key)],
            );
        }
        result
    }
}

fn check_key(operation: &'static str, key: &str) -> ThemeResult<()> {
    if key.trim().is_empty() {
        return Err(ThemeError::invalid_input(operation, "key must not be empty"));
    }
    Ok(())
}

fn scale_value(
    scale: &Scale,
    group: &'static str,
    operation: &'static str,
    key: &str,
) -> ThemeResult<f64> {
    check_key(operation, key)?;
    scale
        .get(key)
        .copied()
        .ok_or_else(|| ThemeError::property_not_found(group, key))
}

/// Map a top-level path segment onto a static group name for error reports.
pub(crate) fn group_name(segment: &str) -> &'static str {
    use crate::properties::{GROUP_METADATA, GROUP_THEME_CLASSES};

    match segment {
        GROUP_COLORS => GROUP_COLORS,
        GROUP_TYPOGRAPHY => GROUP_TYPOGRAPHY,
        GROUP_SPACING => GROUP_SPACING,
        GROUP_BORDER_RADIUS => GROUP_BORDER_RADIUS,
        GROUP_SHADOWS => GROUP_SHADOWS,
        GROUP_ANIMATION => GROUP_ANIMATION,
        GROUP_BREAKPOINTS => GROUP_BREAKPOINTS,
        GROUP_THEME_CLASSES => GROUP_THEME_CLASSES,
        GROUP_METADATA => GROUP_METADATA,
        "custom" => "custom",
        _ => "properties",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::diagnostics::MemorySink;
    use crate::properties::{
        scale_of, shades_of, tokens_of, Animation, ColorTokens, Spacing, Typography,
    };

    fn sample() -> Theme {
        let mut semantic = PropertyMap::new();
        semantic.insert(
            "brand".to_string(),
            PropertyValue::Record(shades_of(&[("accent", "#ff4081")])),
        );

        let properties = ThemeProperties {
            colors: Some(ColorTokens {
                primary: shades_of(&[("main", "#1976d2"), ("light", "#42a5f5")]),
                semantic,
                ..Default::default()
            }),
            typography: Some(Typography {
                font_family: tokens_of(&[("body", "Roboto")]),
                font_size: scale_of(&[("sm", 14.0), ("md", 16.0)]),
                ..Default::default()
            }),
            spacing: Some(Spacing {
                scale: scale_of(&[("sm", 8.0), ("md", 16.0)]),
                ..Default::default()
            }),
            border_radius: Some(scale_of(&[("none", 0.0), ("md", 8.0)])),
            shadows: Some(tokens_of(&[("md", "0 2px 4px rgba(0,0,0,0.2)")])),
            animation: Some(Animation {
                duration: scale_of(&[("fast", 150.0)]),
                ..Default::default()
            }),
            breakpoints: Some(scale_of(&[("xs", 0.0), ("md", 960.0)])),
            ..Default::default()
        };

        Theme::new(
            ThemeIdentity::new("t1", "Test Theme")
                .with_theme_type(ThemeType::Material)
                .with_opposite_theme("t1-dark"),
            properties,
        )
    }

    #[test]
    fn test_get_color() {
        let theme = sample();
        assert_eq!(theme.get_color("primary.main").unwrap(), "#1976d2");
        assert_eq!(theme.get_color("semantic.brand.accent").unwrap(), "#ff4081");
        assert!(matches!(
            theme.get_color("primary.nonexistent"),
            Err(ThemeError::PropertyNotFound { .. })
        ));
        assert!(theme.get_color("primary").is_err());
        assert!(theme.get_color("gradients.main").is_err());
        assert!(matches!(theme.get_color(""), Err(ThemeError::InvalidInput { .. })));
    }

    #[test]
    fn test_scale_accessors() {
        let theme = sample();
        assert_eq!(theme.get_spacing("md").unwrap(), 16.0);
        assert!(theme.get_spacing("unknown").is_err());
        assert_eq!(theme.get_font_size("sm").unwrap(), 14.0);
        assert_eq!(theme.get_border_radius("none").unwrap(), 0.0);
        assert_eq!(theme.get_animation_duration("fast").unwrap(), 150.0);
        assert_eq!(theme.get_shadow("md").unwrap(), "0 2px 4px rgba(0,0,0,0.2)");
        assert!(matches!(theme.get_spacing(" "), Err(ThemeError::InvalidInput { .. })));
    }

    #[test]
    fn test_missing_group_is_reported() {
        let mut properties = sample().properties().clone();
        properties.spacing = None;
        properties.breakpoints = None;
        let theme = Theme::new(ThemeIdentity::new("t2", "Partial"), properties);

        assert!(matches!(
            theme.get_spacing("md"),
            Err(ThemeError::MissingGroup { group: "spacing" })
        ));
        assert!(theme.supports_breakpoint("md").is_err());
    }

    #[test]
    fn test_supports_breakpoint_zero_value() {
        let theme = sample();
        assert!(theme.supports_breakpoint("xs").unwrap());
        assert!(!theme.supports_breakpoint("xl").unwrap());
    }

    #[test]
    fn test_opposite_theme() {
        assert_eq!(sample().get_opposite_theme().unwrap(), Some("t1-dark"));
    }

    #[test]
    fn test_clone_is_equal_and_independent() {
        let theme = sample();
        let mut copy = theme.clone_theme().unwrap();
        assert_eq!(copy, theme);

        if let Some(colors) = copy.properties.colors.as_mut() {
            colors.primary.insert("main".to_string(), PropertyValue::from("#000000"));
        }
        assert_eq!(theme.get_color("primary.main").unwrap(), "#1976d2");
        assert_ne!(copy, theme);
    }

    #[test]
    fn test_merge_none_is_noop() {
        let theme = sample();
        assert_eq!(theme.merge(None).unwrap(), theme);
    }

    #[test]
    fn test_merge_precedence() {
        let theme = sample();
        let patch = ThemeOverride::new()
            .with_identity(IdentityOverride {
                name: Some("Patched".to_string()),
                ..Default::default()
            })
            .with_value("colors.primary.main", "#ff0000")
            .unwrap()
            .with_value("spacing.scale.xl", 32.0)
            .unwrap();

        let merged = theme.merge(Some(&patch)).unwrap();
        assert_eq!(merged.name(), "Patched");
        assert_eq!(merged.id(), "t1");
        assert_eq!(merged.get_color("primary.main").unwrap(), "#ff0000");
        assert_eq!(merged.get_color("primary.light").unwrap(), "#42a5f5");
        assert_eq!(merged.get_spacing("xl").unwrap(), 32.0);
        assert_eq!(merged.get_spacing("md").unwrap(), 16.0);
        assert_eq!(theme.get_color("primary.main").unwrap(), "#1976d2");
    }

    #[test]
    fn test_merge_replaces_lists() {
        let mut properties = sample().properties().clone();
        let mut custom = PropertyMap::new();
        custom.insert(
            "fonts".to_string(),
            PropertyValue::List(vec!["Roboto".into(), "Arial".into(), "sans-serif".into()]),
        );
        properties.custom = Some(custom);
        let theme = Theme::new(ThemeIdentity::new("t3", "Lists"), properties);

        let patch = ThemeOverride::new()
            .with_value("custom.fonts", PropertyValue::List(vec!["Inter".into()]))
            .unwrap();
        let merged = theme.merge(Some(&patch)).unwrap();

        assert_eq!(
            merged.lookup("custom.fonts").unwrap(),
            PropertyValue::List(vec!["Inter".into()])
        );
    }

    #[test]
    fn test_merge_reshaping_fails_with_structure_error() {
        let theme = sample();
        let patch = ThemeOverride::new()
            .with_value("spacing.scale", "huge")
            .unwrap();

        assert!(matches!(
            theme.merge(Some(&patch)),
            Err(ThemeError::Structure { .. })
        ));
    }

    #[test]
    fn test_lookup_whole_tree() {
        let theme = sample();
        assert_eq!(theme.lookup("spacing.scale.md").unwrap().as_number(), Some(16.0));
        assert_eq!(
            theme.lookup("typography.fontFamily.body").unwrap().as_str(),
            Some("Roboto")
        );
        assert!(matches!(
            theme.lookup("shadows.xl"),
            Err(ThemeError::PropertyNotFound { group: "shadows", .. })
        ));
    }

    #[test]
    fn test_failures_emit_diagnostics() {
        let sink = Arc::new(MemorySink::new());
        let theme = sample().with_diagnostics(Diagnostics::new(sink.clone()));

        let _ = theme.get_spacing("md");
        assert!(sink.events().is_empty());

        let _ = theme.get_spacing("huge");
        let events = sink.events_for("get_spacing");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].component, Component::SegregatedTheme);
        assert_eq!(events[0].context_value("key"), Some("huge"));
    }

    #[test]
    fn test_serde_round_trip_ignores_diagnostics() {
        let theme = sample().with_diagnostics(Diagnostics::silent());
        let json = serde_json::to_string(&theme).unwrap();
        let restored: Theme = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, theme);
    }

    #[test]
    fn test_merge_date_leaf_into_metadata() {
        use chrono::{TimeZone, Utc};

        let updated = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let patch = ThemeOverride::new()
            .with_value("metadata.updatedAt", updated)
            .unwrap();
        let merged = crate::builtin::material_light().merge(Some(&patch)).unwrap();

        let metadata = merged.properties().metadata.as_ref().unwrap();
        assert_eq!(metadata.updated_at, Some(updated));
        assert!(metadata.created_at.is_some());
        assert_eq!(
            merged.lookup("metadata.updatedAt").unwrap(),
            PropertyValue::Date(updated)
        );
    }
}
