//! Structural checks on themes.
//!
//! Two levels exist. [validate_for_registration] is the hard gate the
//! registry applies: a blank id or name, a missing mandatory group, or a
//! number with no JSON form rejects the theme. [audit] is a read-only report that also collects warnings about
//! things that are legal but probably wrong.

use serde::Serialize;

use crate::deep::{get_path, leaf_paths};
use crate::error::{ThemeError, ThemeResult};
use crate::properties::{ColorTokens, Scalar, Scale, ThemeProperties};
use crate::theme::Theme;
use crate::value::{PropertyMap, PropertyValue};

/// Outcome of [audit].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// `true` when `errors` is empty.
    pub is_valid: bool,
    /// Problems that would block registration.
    pub errors: Vec<String>,
    /// Suspicious but legal findings.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Problems that block registration.
pub fn registration_errors(theme: &Theme) -> Vec<String> {
    let mut errors = Vec::new();

    if theme.id().trim().is_empty() {
        errors.push("id must not be empty".to_string());
    }
    if theme.name().trim().is_empty() {
        errors.push("name must not be empty".to_string());
    }
    for group in theme.properties().missing_groups() {
        errors.push(format!("missing required property group '{}'", group));
    }
    for path in non_finite_paths(theme.properties()) {
        errors.push(format!("{} is not a finite number", path));
    }

    errors
}

/// Dotted paths of numbers that have no JSON form (NaN, infinities).
///
/// Such values turn into `null` on the way to a property tree or a bundle,
/// after which the theme can neither be merged nor imported again.
pub fn non_finite_paths(properties: &ThemeProperties) -> Vec<String> {
    let mut paths = Vec::new();
    let mut check = |label: &str, scale: &Scale| {
        for (name, value) in scale {
            if !value.is_finite() {
                paths.push(format!("{}.{}", label, name));
            }
        }
    };

    if let Some(typography) = &properties.typography {
        check("typography.fontSize", &typography.font_size);
        check("typography.fontWeight", &typography.font_weight);
        check("typography.lineHeight", &typography.line_height);
        check("typography.letterSpacing", &typography.letter_spacing);
    }
    if let Some(spacing) = &properties.spacing {
        check("spacing.scale", &spacing.scale);
    }
    if let Some(radius) = &properties.border_radius {
        check("borderRadius", radius);
    }
    if let Some(animation) = &properties.animation {
        check("animation.duration", &animation.duration);
    }
    if let Some(breakpoints) = &properties.breakpoints {
        check("breakpoints", breakpoints);
    }

    if let Some(base) = properties.spacing.as_ref().and_then(|spacing| spacing.base) {
        if !base.is_finite() {
            paths.push("spacing.base".to_string());
        }
    }
    if let Some(classes) = &properties.theme_classes {
        for (class, entries) in classes {
            for (key, value) in entries {
                if matches!(value, Scalar::Number(n) if !n.is_finite()) {
                    paths.push(format!("themeClasses.{}.{}", class, key));
                }
            }
        }
    }
    if let Some(colors) = &properties.colors {
        for (name, section) in colors.sections() {
            tree_non_finite(&format!("colors.{}", name), section, &mut paths);
        }
    }
    if let Some(custom) = &properties.custom {
        tree_non_finite("custom", custom, &mut paths);
    }
    if let Some(overrides) = &properties.breakpoint_overrides {
        for (breakpoint, tree) in overrides {
            tree_non_finite(&format!("breakpointOverrides.{}", breakpoint), tree, &mut paths);
        }
    }

    paths
}

fn tree_non_finite(prefix: &str, map: &PropertyMap, paths: &mut Vec<String>) {
    for (key, value) in map {
        value_non_finite(&format!("{}.{}", prefix, key), value, paths);
    }
}

fn value_non_finite(path: &str, value: &PropertyValue, paths: &mut Vec<String>) {
    match value {
        PropertyValue::Number(n) if !n.is_finite() => paths.push(path.to_string()),
        PropertyValue::Record(map) => tree_non_finite(path, map, paths),
        PropertyValue::List(items) => {
            for (index, item) in items.iter().enumerate() {
                value_non_finite(&format!("{}[{}]", path, index), item, paths);
            }
        },
        _ => {},
    }
}

/// The registration gate.
pub fn validate_for_registration(theme: &Theme) -> ThemeResult<()> {
    let problems = registration_errors(theme);
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ThemeError::Validation {
            id: theme.id().to_string(),
            problems,
        })
    }
}

/// Full audit: registration errors plus warnings.
pub fn audit(theme: &Theme) -> ValidationReport {
    let errors = registration_errors(theme);
    let mut warnings = Vec::new();
    let properties = theme.properties();

    if let Some(colors) = &properties.colors {
        color_warnings(colors, &mut warnings);
    }
    if let Some(typography) = &properties.typography {
        scale_warnings("typography.fontSize", &typography.font_size, &mut warnings);
        if typography.font_family.is_empty() {
            warnings.push("typography.fontFamily is empty".to_string());
        }
    }
    if let Some(spacing) = &properties.spacing {
        scale_warnings("spacing.scale", &spacing.scale, &mut warnings);
    }
    if let Some(radius) = &properties.border_radius {
        scale_warnings("borderRadius", radius, &mut warnings);
    }
    if let Some(shadows) = &properties.shadows {
        if shadows.is_empty() {
            warnings.push("shadows is empty".to_string());
        }
    }
    if let Some(animation) = &properties.animation {
        scale_warnings("animation.duration", &animation.duration, &mut warnings);
    }
    if let Some(breakpoints) = &properties.breakpoints {
        scale_warnings("breakpoints", breakpoints, &mut warnings);
        ordering_warnings(breakpoints, &mut warnings);

        if let Some(overrides) = &properties.breakpoint_overrides {
            for name in overrides.keys() {
                if !breakpoints.contains_key(name) {
                    warnings.push(format!(
                        "breakpoint override '{}' targets an undefined breakpoint",
                        name
                    ));
                }
            }
        }
    }

    if theme.identity().opposite_theme_id.as_deref() == Some(theme.id()) {
        warnings.push("theme names itself as its opposite theme".to_string());
    }

    ValidationReport::from_findings(errors, warnings)
}

fn color_warnings(colors: &ColorTokens, warnings: &mut Vec<String>) {
    for (name, section) in colors.sections() {
        // `semantic` is optional by convention.
        if section.is_empty() && name != "semantic" {
            warnings.push(format!("colors.{} is empty", name));
        }
    }

    if !colors.primary.contains_key("main") {
        warnings.push("colors.primary.main is not defined".to_string());
    }

    for (name, section) in colors.sections() {
        for path in leaf_paths(section) {
            let value = get_path(section, &path);
            match value {
                Some(PropertyValue::String(color)) if !looks_like_color(color) => {
                    warnings.push(format!(
                        "colors.{}.{} does not look like a color: '{}'",
                        name, path, color
                    ));
                },
                Some(PropertyValue::String(_)) => {},
                Some(other) => warnings.push(format!(
                    "colors.{}.{} should be a string, found {}",
                    name,
                    path,
                    other.kind()
                )),
                None => {},
            }
        }
    }
}

fn scale_warnings(label: &str, scale: &Scale, warnings: &mut Vec<String>) {
    if scale.is_empty() {
        warnings.push(format!("{} is empty", label));
    }
    for (name, value) in scale {
        if *value < 0.0 {
            warnings.push(format!("{}.{} is negative ({})", label, name, value));
        }
    }
}

fn ordering_warnings(breakpoints: &Scale, warnings: &mut Vec<String>) {
    let values: Vec<(&String, &f64)> = breakpoints.iter().collect();
    for pair in values.windows(2) {
        let (prev_name, prev) = pair[0];
        let (name, value) = pair[1];
        if value < prev {
            warnings.push(format!(
                "breakpoint '{}' ({}) is smaller than the preceding '{}' ({})",
                name, value, prev_name, prev
            ));
        }
    }
}

/// Loose CSS color check: hex, functional notation, or a keyword.
pub fn looks_like_color(value: &str) -> bool {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }

    const FUNCTIONS: [&str; 7] = ["rgb(", "rgba(", "hsl(", "hsla(", "hwb(", "color(", "var("];
    let lower = value.to_ascii_lowercase();
    if FUNCTIONS.iter().any(|prefix| lower.starts_with(prefix)) {
        return lower.ends_with(')');
    }

    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::material_light;
    use crate::identity::ThemeIdentity;
    use crate::properties::scale_of;

    #[test]
    fn test_builtin_passes_cleanly() {
        let report = audit(&material_light());
        assert!(report.is_valid);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert!(validate_for_registration(&material_light()).is_ok());
    }

    #[test]
    fn test_registration_errors() {
        let theme = Theme::new(ThemeIdentity::new("", " "), ThemeProperties::default());
        let err = validate_for_registration(&theme).unwrap_err();

        match err {
            ThemeError::Validation { problems, .. } => {
                assert_eq!(problems.len(), 9);
                assert!(problems[0].contains("id"));
                assert!(problems[1].contains("name"));
                assert!(problems[2].contains("colors"));
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_audit_warnings() {
        let base = material_light();
        let mut properties = base.properties().clone();
        properties.breakpoints = Some(scale_of(&[("sm", 600.0), ("md", 400.0)]));
        properties.spacing.as_mut().unwrap().scale.insert("weird".to_string(), -4.0);
        properties.colors.as_mut().unwrap().primary.insert(
            "main".to_string(),
            PropertyValue::from("not a color"),
        );
        let mut overrides = indexmap::IndexMap::new();
        overrides.insert("xxl".to_string(), PropertyMap::new());
        properties.breakpoint_overrides = Some(overrides);

        let identity = base.identity().clone().with_opposite_theme(base.id());
        let report = audit(&Theme::new(identity, properties));

        assert!(report.is_valid);
        let joined = report.warnings.join("\n");
        assert!(joined.contains("'md' (400) is smaller"));
        assert!(joined.contains("spacing.scale.weird is negative"));
        assert!(joined.contains("colors.primary.main does not look like a color"));
        assert!(joined.contains("'xxl' targets an undefined breakpoint"));
        assert!(joined.contains("opposite theme"));
    }

    #[test]
    fn test_looks_like_color() {
        assert!(looks_like_color("#1976d2"));
        assert!(looks_like_color("#fff"));
        assert!(looks_like_color("rgba(0, 0, 0, 0.87)"));
        assert!(looks_like_color("transparent"));
        assert!(!looks_like_color("#12345"));
        assert!(!looks_like_color("rgb(0,0,0"));
        assert!(!looks_like_color("not a color"));
    }

    #[test]
    fn test_non_finite_numbers_block_registration() {
        let base = material_light();
        let mut properties = base.properties().clone();
        properties.breakpoints.as_mut().unwrap().insert("max".to_string(), f64::INFINITY);
        properties.custom = Some(
            [("ratio".to_string(), PropertyValue::Number(f64::NAN))]
                .into_iter()
                .collect(),
        );
        let theme = Theme::new(base.identity().clone(), properties);

        match validate_for_registration(&theme).unwrap_err() {
            ThemeError::Validation { problems, .. } => assert_eq!(
                problems,
                vec![
                    "breakpoints.max is not a finite number".to_string(),
                    "custom.ratio is not a finite number".to_string(),
                ]
            ),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!audit(&theme).is_valid);
    }
}
