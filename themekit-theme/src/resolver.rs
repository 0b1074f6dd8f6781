//! # Property Resolver
//!
//! [ThemePropertyResolver] turns a theme plus a property request into a
//! concrete value. It keeps no state between calls: every method is a function
//! of `(theme, selector, fallback)`.
//!
//! ## Fallbacks
//!
//! A fallback is a last-resort default. When the lookup fails for any reason
//! and a fallback was supplied, the fallback is returned as success. Without
//! one, the original error comes back unchanged. A missing theme is always an
//! error, fallback or not.
//!
//! ```rust
//! use themekit_theme::builtin::material_light;
//! use themekit_theme::resolver::ThemePropertyResolver;
//!
//! let resolver = ThemePropertyResolver::new();
//! let theme = material_light();
//!
//! assert_eq!(resolver.resolve_color(Some(&theme), "primary.main", None).unwrap(), "#1976d2");
//! assert_eq!(resolver.resolve_color(Some(&theme), "missing.path", Some("DEFAULT")).unwrap(), "DEFAULT");
//! assert!(resolver.resolve_color(Some(&theme), "missing.path", None).is_err());
//! assert!(resolver.resolve_color(None, "primary.main", Some("DEFAULT")).is_err());
//! ```
//!
//! ## Inheritance
//!
//! [ThemePropertyResolver::resolve_with_inheritance] walks up the scopes of a
//! path while keeping its leaf key: `components.button.primary.padding` is
//! tried as is, then as `components.button.padding`, then as
//! `components.padding`.
//!
//! ## Breakpoints
//!
//! [ThemePropertyResolver::resolve_for_breakpoint] first looks in the theme's
//! override tree for that breakpoint, then at the base value.

use crate::deep::{get_path, leaf_paths, split_path, PATH_SEPARATOR};
use crate::diagnostics::{Component, Diagnostics};
use crate::error::{ThemeError, ThemeResult};
use crate::properties::{StyleClass, GROUP_METADATA};
use crate::theme::{group_name, Theme};
use crate::validation::{audit, ValidationReport};
use crate::value::PropertyValue;

/// Override trees live under this key in the property tree.
const GROUP_BREAKPOINT_OVERRIDES: &str = "breakpointOverrides";

/// Stateless lookups of style values with fallbacks.
#[derive(Debug, Clone, Default)]
pub struct ThemePropertyResolver {
    diagnostics: Diagnostics,
}

impl ThemePropertyResolver {
    /// Create a resolver reporting to the `log` crate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver with an explicit diagnostics handle.
    pub fn with_diagnostics(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Resolve a color path such as `primary.main`.
    pub fn resolve_color(
        &self,
        theme: Option<&Theme>,
        path: &str,
        fallback: Option<&str>,
    ) -> ThemeResult<String> {
        let theme = self.require("resolve_color", theme)?;
        let result = theme.get_color(path).map(str::to_string);
        self.or_fallback("resolve_color", path, result, fallback.map(str::to_string))
    }

    /// Resolve a named spacing value.
    pub fn resolve_spacing(
        &self,
        theme: Option<&Theme>,
        size: &str,
        fallback: Option<f64>,
    ) -> ThemeResult<f64> {
        let theme = self.require("resolve_spacing", theme)?;
        self.or_fallback("resolve_spacing", size, theme.get_spacing(size), fallback)
    }

    /// Resolve a named font size.
    pub fn resolve_font_size(
        &self,
        theme: Option<&Theme>,
        size: &str,
        fallback: Option<f64>,
    ) -> ThemeResult<f64> {
        let theme = self.require("resolve_font_size", theme)?;
        self.or_fallback("resolve_font_size", size, theme.get_font_size(size), fallback)
    }

    /// Resolve a named border radius.
    pub fn resolve_border_radius(
        &self,
        theme: Option<&Theme>,
        size: &str,
        fallback: Option<f64>,
    ) -> ThemeResult<f64> {
        let theme = self.require("resolve_border_radius", theme)?;
        self.or_fallback("resolve_border_radius", size, theme.get_border_radius(size), fallback)
    }

    /// Resolve a named shadow.
    pub fn resolve_shadow(
        &self,
        theme: Option<&Theme>,
        size: &str,
        fallback: Option<&str>,
    ) -> ThemeResult<String> {
        let theme = self.require("resolve_shadow", theme)?;
        let result = theme.get_shadow(size).map(str::to_string);
        self.or_fallback("resolve_shadow", size, result, fallback.map(str::to_string))
    }

    /// Resolve a named animation duration in milliseconds.
    pub fn resolve_animation_duration(
        &self,
        theme: Option<&Theme>,
        size: &str,
        fallback: Option<f64>,
    ) -> ThemeResult<f64> {
        let theme = self.require("resolve_animation_duration", theme)?;
        let result = theme.get_animation_duration(size);
        self.or_fallback("resolve_animation_duration", size, result, fallback)
    }

    /// Look up a style class.
    ///
    /// An absent class is `Ok(None)`, or the fallback when one is given.
    pub fn resolve_theme_class(
        &self,
        theme: Option<&Theme>,
        name: &str,
        fallback: Option<&StyleClass>,
    ) -> ThemeResult<Option<StyleClass>> {
        let theme = self.require("resolve_theme_class", theme)?;
        let class = theme
            .properties()
            .theme_classes
            .as_ref()
            .and_then(|classes| classes.get(name));

        match class {
            Some(class) => Ok(Some(class.clone())),
            None => {
                self.diagnostics.debug(
                    Component::ThemePropertyResolver,
                    "resolve_theme_class",
                    "class not defined",
                    &[("id", theme.id()), ("class", name)],
                );
                Ok(fallback.cloned())
            },
        }
    }

    /// Resolve a full property path, widening its scope until a value is
    /// found.
    pub fn resolve_with_inheritance(
        &self,
        theme: Option<&Theme>,
        path: &str,
        fallback: Option<PropertyValue>,
    ) -> ThemeResult<PropertyValue> {
        let theme = self.require("resolve_with_inheritance", theme)?;
        let result = self.inherited_value(theme, path);
        self.or_fallback("resolve_with_inheritance", path, result, fallback)
    }

    fn inherited_value(&self, theme: &Theme, path: &str) -> ThemeResult<PropertyValue> {
        let chain = inheritance_chain(path).ok_or_else(|| {
            ThemeError::invalid_input(
                "resolve_with_inheritance",
                format!("malformed property path '{}'", path),
            )
        })?;
        let tree = theme.to_tree()?;

        for candidate in &chain {
            if let Some(value) = get_path(&tree, candidate) {
                if candidate != path {
                    self.diagnostics.debug(
                        Component::ThemePropertyResolver,
                        "resolve_with_inheritance",
                        "resolved through inherited scope",
                        &[("path", path), ("resolved", candidate.as_str())],
                    );
                }
                return Ok(value.clone());
            }
        }

        let group = path.split(PATH_SEPARATOR).next().unwrap_or_default();
        Err(ThemeError::property_not_found(group_name(group), path))
    }

    /// Resolve a property path for one breakpoint.
    ///
    /// The breakpoint's override tree wins; otherwise the base value is used.
    pub fn resolve_for_breakpoint(
        &self,
        theme: Option<&Theme>,
        path: &str,
        breakpoint: &str,
        fallback: Option<PropertyValue>,
    ) -> ThemeResult<PropertyValue> {
        let theme = self.require("resolve_for_breakpoint", theme)?;

        let overridden = theme
            .properties()
            .breakpoint_overrides
            .as_ref()
            .and_then(|overrides| overrides.get(breakpoint))
            .and_then(|tree| get_path(tree, path));
        if let Some(value) = overridden {
            return Ok(value.clone());
        }

        self.or_fallback("resolve_for_breakpoint", path, theme.lookup(path), fallback)
    }

    /// Whether the theme defines the breakpoint.
    pub fn supports_breakpoint(&self, theme: Option<&Theme>, breakpoint: &str) -> ThemeResult<bool> {
        self.require("supports_breakpoint", theme)?
            .supports_breakpoint(breakpoint)
    }

    /// Every dotted leaf path of the theme's properties, without metadata or
    /// breakpoint overrides.
    pub fn get_available_properties(&self, theme: Option<&Theme>) -> ThemeResult<Vec<String>> {
        let theme = self.require("get_available_properties", theme)?;
        let mut tree = theme.to_tree()?;
        tree.shift_remove(GROUP_METADATA);
        tree.shift_remove(GROUP_BREAKPOINT_OVERRIDES);
        Ok(leaf_paths(&tree))
    }

    /// Read-only structural audit of a theme.
    pub fn validate_theme_properties(&self, theme: Option<&Theme>) -> ThemeResult<ValidationReport> {
        let theme = self.require("validate_theme_properties", theme)?;
        let report = audit(theme);

        if !report.is_valid {
            self.diagnostics.warn(
                Component::ThemePropertyResolver,
                "validate_theme_properties",
                report.errors.join("; "),
                &[("id", theme.id())],
            );
        }
        Ok(report)
    }

    fn require<'a>(&self, operation: &'static str, theme: Option<&'a Theme>) -> ThemeResult<&'a Theme> {
        theme.ok_or_else(|| {
            self.diagnostics.warn(
                Component::ThemePropertyResolver,
                operation,
                "no theme supplied",
                &[],
            );
            ThemeError::MissingTheme { operation }
        })
    }

    fn or_fallback<T>(
        &self,
        operation: &'static str,
        key: &str,
        result: ThemeResult<T>,
        fallback: Option<T>,
    ) -> ThemeResult<T> {
        match (result, fallback) {
            (Ok(value), _) => Ok(value),
            (Err(err), Some(fallback)) => {
                self.diagnostics.debug(
                    Component::ThemePropertyResolver,
                    operation,
                    format!("using fallback: {}", err),
                    &[("key", key)],
                );
                Ok(fallback)
            },
            (Err(err), None) => {
                self.diagnostics.debug(
                    Component::ThemePropertyResolver,
                    operation,
                    err.to_string(),
                    &[("key", key)],
                );
                Err(err)
            },
        }
    }
}

/// Candidate paths for inherited resolution, most specific first.
///
/// `a.b.c.leaf` yields `a.b.c.leaf`, `a.b.leaf`, `a.leaf`. A single segment
/// path yields only itself. `None` for a malformed path.
pub fn inheritance_chain(path: &str) -> Option<Vec<String>> {
    let segments = split_path(path)?;
    let (leaf, scopes) = segments.split_last()?;
    if scopes.is_empty() {
        return Some(vec![path.to_string()]);
    }

    let separator = PATH_SEPARATOR.to_string();
    Some(
        (1..=scopes.len())
            .rev()
            .map(|depth| {
                let mut parts = scopes[..depth].to_vec();
                parts.push(*leaf);
                parts.join(separator.as_str())
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::builtin::material_light;
    use crate::diagnostics::MemorySink;
    use crate::properties::Scalar;
    use crate::theme::ThemeOverride;

    #[test]
    fn test_inheritance_chain() {
        assert_eq!(
            inheritance_chain("a.b.c.leaf").unwrap(),
            vec!["a.b.c.leaf", "a.b.leaf", "a.leaf"]
        );
        assert_eq!(inheritance_chain("a.leaf").unwrap(), vec!["a.leaf"]);
        assert_eq!(inheritance_chain("leaf").unwrap(), vec!["leaf"]);
        assert!(inheritance_chain("a..leaf").is_none());
    }

    #[test]
    fn test_fallback_precedence() {
        let resolver = ThemePropertyResolver::new();
        let theme = material_light();

        assert_eq!(
            resolver.resolve_color(Some(&theme), "missing.path", Some("DEFAULT")).unwrap(),
            "DEFAULT"
        );
        assert!(matches!(
            resolver.resolve_color(Some(&theme), "missing.path", None),
            Err(ThemeError::PropertyNotFound { .. })
        ));
        assert_eq!(resolver.resolve_spacing(Some(&theme), "huge", Some(99.0)).unwrap(), 99.0);
        assert_eq!(resolver.resolve_font_size(Some(&theme), "md", Some(1.0)).unwrap(), 16.0);
        assert_eq!(resolver.resolve_border_radius(Some(&theme), "lg", None).unwrap(), 8.0);
        assert_eq!(
            resolver.resolve_animation_duration(Some(&theme), "short", None).unwrap(),
            250.0
        );
        assert_eq!(
            resolver.resolve_shadow(Some(&theme), "xxl", Some("none")).unwrap(),
            "none"
        );
    }

    #[test]
    fn test_missing_theme_ignores_fallback() {
        let resolver = ThemePropertyResolver::new();
        assert!(matches!(
            resolver.resolve_spacing(None, "md", Some(4.0)),
            Err(ThemeError::MissingTheme { operation: "resolve_spacing" })
        ));
        assert!(resolver.get_available_properties(None).is_err());
        assert!(resolver.validate_theme_properties(None).is_err());
    }

    #[test]
    fn test_theme_class() {
        let resolver = ThemePropertyResolver::new();
        let theme = material_light();

        let button = resolver.resolve_theme_class(Some(&theme), "button", None).unwrap().unwrap();
        assert_eq!(button["textTransform"], Scalar::from("uppercase"));
        assert!(resolver.resolve_theme_class(Some(&theme), "chip", None).unwrap().is_none());

        let mut default_class = StyleClass::new();
        default_class.insert("padding".to_string(), Scalar::Number(4.0));
        let resolved = resolver
            .resolve_theme_class(Some(&theme), "chip", Some(&default_class))
            .unwrap();
        assert_eq!(resolved, Some(default_class));
    }

    #[test]
    fn test_resolve_with_inheritance() {
        let resolver = ThemePropertyResolver::new();
        let theme = material_light()
            .merge(Some(
                &ThemeOverride::new()
                    .with_value("custom.components.padding", 12.0)
                    .unwrap()
                    .with_value("custom.components.button.primary.padding", 20.0)
                    .unwrap(),
            ))
            .unwrap();

        let exact = resolver
            .resolve_with_inheritance(Some(&theme), "custom.components.button.primary.padding", None)
            .unwrap();
        assert_eq!(exact.as_number(), Some(20.0));

        let inherited = resolver
            .resolve_with_inheritance(Some(&theme), "custom.components.button.secondary.padding", None)
            .unwrap();
        assert_eq!(inherited.as_number(), Some(12.0));

        assert!(resolver
            .resolve_with_inheritance(Some(&theme), "custom.components.button.margin", None)
            .is_err());
        let fallback = resolver
            .resolve_with_inheritance(
                Some(&theme),
                "custom.components.button.margin",
                Some(PropertyValue::from(0.0)),
            )
            .unwrap();
        assert_eq!(fallback.as_number(), Some(0.0));
    }

    #[test]
    fn test_resolve_for_breakpoint() {
        let resolver = ThemePropertyResolver::new();
        let theme = material_light();

        let compact = resolver
            .resolve_for_breakpoint(Some(&theme), "spacing.scale.md", "xs", None)
            .unwrap();
        assert_eq!(compact.as_number(), Some(12.0));

        let base = resolver
            .resolve_for_breakpoint(Some(&theme), "spacing.scale.md", "lg", None)
            .unwrap();
        assert_eq!(base.as_number(), Some(16.0));

        let not_overridden = resolver
            .resolve_for_breakpoint(Some(&theme), "spacing.scale.sm", "xs", None)
            .unwrap();
        assert_eq!(not_overridden.as_number(), Some(8.0));

        let fallback = resolver
            .resolve_for_breakpoint(Some(&theme), "spacing.scale.huge", "xs", Some(PropertyValue::from(64.0)))
            .unwrap();
        assert_eq!(fallback.as_number(), Some(64.0));
    }

    #[test]
    fn test_available_properties_skip_metadata() {
        let resolver = ThemePropertyResolver::new();
        let paths = resolver.get_available_properties(Some(&material_light())).unwrap();

        assert!(paths.contains(&"colors.primary.main".to_string()));
        assert!(paths.contains(&"spacing.scale.md".to_string()));
        assert!(paths.contains(&"themeClasses.button.paddingX".to_string()));
        assert!(!paths.iter().any(|p| p.starts_with("metadata")));
        assert!(!paths.iter().any(|p| p.starts_with("breakpointOverrides")));
    }

    #[test]
    fn test_validate_theme_properties() {
        let resolver = ThemePropertyResolver::new();
        let report = resolver.validate_theme_properties(Some(&material_light())).unwrap();
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_supports_breakpoint() {
        let resolver = ThemePropertyResolver::new();
        let theme = material_light();
        assert!(resolver.supports_breakpoint(Some(&theme), "xs").unwrap());
        assert!(!resolver.supports_breakpoint(Some(&theme), "xxl").unwrap());
    }

    #[test]
    fn test_diagnostics_never_change_results() {
        let sink = Arc::new(MemorySink::new());
        let observed = ThemePropertyResolver::with_diagnostics(Diagnostics::new(sink.clone()));
        let silent = ThemePropertyResolver::with_diagnostics(Diagnostics::silent());
        let theme = material_light();

        for path in ["primary.main", "primary.nope", "nope"] {
            assert_eq!(
                observed.resolve_color(Some(&theme), path, Some("x")).unwrap(),
                silent.resolve_color(Some(&theme), path, Some("x")).unwrap()
            );
        }
        assert_eq!(sink.events_for("resolve_color").len(), 2);
    }
}
