//! Built-in Material Design themes.
//!
//! [material_light] and [material_dark] are complete themes: every mandatory
//! group is present, so both register without further setup, and each names
//! the other as its opposite.

use chrono::{TimeZone, Utc};
use indexmap::IndexMap;

use crate::identity::{ThemeIdentity, ThemeType, ThemeVariant};
use crate::properties::{
    scale_of, shades_of, tokens_of, Animation, ColorTokens, Scalar, Spacing, StyleClass,
    ThemeMetadata, ThemeProperties, TokenMap, Typography,
};
use crate::theme::Theme;
use crate::value::{PropertyMap, PropertyValue};

/// Id of the light Material theme.
pub const MATERIAL_LIGHT_ID: &str = "material-light";
/// Id of the dark Material theme.
pub const MATERIAL_DARK_ID: &str = "material-dark";

/// Every built-in theme.
pub fn builtin_themes() -> Vec<Theme> {
    vec![material_light(), material_dark()]
}

/// A built-in theme by id.
pub fn builtin_theme(id: &str) -> Option<Theme> {
    match id {
        MATERIAL_LIGHT_ID => Some(material_light()),
        MATERIAL_DARK_ID => Some(material_dark()),
        _ => None,
    }
}

/// The light Material theme.
pub fn material_light() -> Theme {
    let colors = ColorTokens {
        primary: shades_of(&[
            ("main", "#1976d2"),
            ("light", "#42a5f5"),
            ("dark", "#1565c0"),
            ("contrast", "#ffffff"),
        ]),
        secondary: shades_of(&[
            ("main", "#9c27b0"),
            ("light", "#ba68c8"),
            ("dark", "#7b1fa2"),
            ("contrast", "#ffffff"),
        ]),
        background: shades_of(&[("default", "#ffffff"), ("paper", "#f5f5f5")]),
        text: shades_of(&[
            ("primary", "rgba(0, 0, 0, 0.87)"),
            ("secondary", "rgba(0, 0, 0, 0.6)"),
            ("disabled", "rgba(0, 0, 0, 0.38)"),
        ]),
        status: status_colors(),
        ui: shades_of(&[
            ("border", "#e0e0e0"),
            ("divider", "rgba(0, 0, 0, 0.12)"),
            ("focus", "#1976d2"),
        ]),
        semantic: semantic_colors("#1976d2", "#ffffff"),
    };

    let shadows = tokens_of(&[
        ("none", "none"),
        ("sm", "0 1px 3px rgba(0, 0, 0, 0.12)"),
        ("md", "0 3px 6px rgba(0, 0, 0, 0.16)"),
        ("lg", "0 10px 20px rgba(0, 0, 0, 0.19)"),
    ]);

    let identity = ThemeIdentity::new(MATERIAL_LIGHT_ID, "Material Light")
        .with_description("Material Design light theme")
        .with_theme_type(ThemeType::Material)
        .with_variant(ThemeVariant::Default)
        .with_active(true)
        .with_opposite_theme(MATERIAL_DARK_ID)
        .with_version("1.0.0")
        .with_tag("material")
        .with_tag("light");

    Theme::new(identity, material_properties(colors, shadows))
}

/// The dark Material theme.
pub fn material_dark() -> Theme {
    let colors = ColorTokens {
        primary: shades_of(&[
            ("main", "#90caf9"),
            ("light", "#e3f2fd"),
            ("dark", "#42a5f5"),
            ("contrast", "#000000"),
        ]),
        secondary: shades_of(&[
            ("main", "#ce93d8"),
            ("light", "#f3e5f5"),
            ("dark", "#ab47bc"),
            ("contrast", "#000000"),
        ]),
        background: shades_of(&[("default", "#121212"), ("paper", "#1e1e1e")]),
        text: shades_of(&[
            ("primary", "#ffffff"),
            ("secondary", "rgba(255, 255, 255, 0.7)"),
            ("disabled", "rgba(255, 255, 255, 0.5)"),
        ]),
        status: status_colors(),
        ui: shades_of(&[
            ("border", "#424242"),
            ("divider", "rgba(255, 255, 255, 0.12)"),
            ("focus", "#90caf9"),
        ]),
        semantic: semantic_colors("#90caf9", "#1e1e1e"),
    };

    let shadows = tokens_of(&[
        ("none", "none"),
        ("sm", "0 1px 3px rgba(0, 0, 0, 0.5)"),
        ("md", "0 3px 6px rgba(0, 0, 0, 0.6)"),
        ("lg", "0 10px 20px rgba(0, 0, 0, 0.7)"),
    ]);

    let identity = ThemeIdentity::new(MATERIAL_DARK_ID, "Material Dark")
        .with_description("Material Design dark theme")
        .with_theme_type(ThemeType::Material)
        .with_variant(ThemeVariant::Default)
        .with_dark_mode(true)
        .with_opposite_theme(MATERIAL_LIGHT_ID)
        .with_version("1.0.0")
        .with_tag("material")
        .with_tag("dark");

    Theme::new(identity, material_properties(colors, shadows))
}

fn status_colors() -> PropertyMap {
    shades_of(&[
        ("success", "#2e7d32"),
        ("warning", "#ed6c02"),
        ("error", "#d32f2f"),
        ("info", "#0288d1"),
    ])
}

fn semantic_colors(accent: &str, surface: &str) -> PropertyMap {
    let mut semantic = PropertyMap::new();
    semantic.insert(
        "action".to_string(),
        PropertyValue::Record(shades_of(&[("active", accent), ("surface", surface)])),
    );
    semantic
}

// Everything except colors and shadows is shared between light and dark.
fn material_properties(colors: ColorTokens, shadows: TokenMap) -> ThemeProperties {
    let typography = Typography {
        font_family: tokens_of(&[
            ("body", "Roboto, Helvetica, Arial, sans-serif"),
            ("heading", "Roboto, Helvetica, Arial, sans-serif"),
            ("mono", "Roboto Mono, monospace"),
        ]),
        font_size: scale_of(&[
            ("xs", 12.0),
            ("sm", 14.0),
            ("md", 16.0),
            ("lg", 20.0),
            ("xl", 24.0),
            ("xxl", 34.0),
        ]),
        font_weight: scale_of(&[
            ("light", 300.0),
            ("regular", 400.0),
            ("medium", 500.0),
            ("bold", 700.0),
        ]),
        line_height: scale_of(&[("tight", 1.2), ("normal", 1.5), ("relaxed", 1.75)]),
        letter_spacing: scale_of(&[("tight", -0.5), ("normal", 0.0), ("wide", 0.5)]),
    };

    let spacing = Spacing {
        base: Some(8.0),
        unit: Some("px".to_string()),
        scale: scale_of(&[
            ("none", 0.0),
            ("xs", 4.0),
            ("sm", 8.0),
            ("md", 16.0),
            ("lg", 24.0),
            ("xl", 32.0),
            ("xxl", 48.0),
        ]),
    };

    let animation = Animation {
        duration: scale_of(&[
            ("shortest", 150.0),
            ("short", 250.0),
            ("standard", 300.0),
            ("long", 375.0),
        ]),
        easing: tokens_of(&[
            ("standard", "cubic-bezier(0.4, 0, 0.2, 1)"),
            ("decelerate", "cubic-bezier(0.0, 0, 0.2, 1)"),
            ("accelerate", "cubic-bezier(0.4, 0, 1, 1)"),
        ]),
        properties: tokens_of(&[
            ("color", "color"),
            ("background", "background-color"),
            ("shadow", "box-shadow"),
        ]),
    };

    let mut theme_classes = IndexMap::new();
    theme_classes.insert(
        "button".to_string(),
        style_class(&[
            ("paddingX", Scalar::Number(16.0)),
            ("paddingY", Scalar::Number(8.0)),
            ("borderRadius", Scalar::Number(4.0)),
            ("textTransform", Scalar::from("uppercase")),
        ]),
    );
    theme_classes.insert(
        "card".to_string(),
        style_class(&[("padding", Scalar::Number(16.0)), ("elevated", Scalar::Bool(true))]),
    );

    // Compact spacing and type below the `sm` breakpoint.
    let mut compact = PropertyMap::new();
    compact.insert(
        "spacing".to_string(),
        PropertyValue::Record(single("scale", record_of(&[("md", 12.0), ("lg", 16.0)]))),
    );
    compact.insert(
        "typography".to_string(),
        PropertyValue::Record(single("fontSize", record_of(&[("xxl", 28.0)]))),
    );
    let mut breakpoint_overrides = IndexMap::new();
    breakpoint_overrides.insert("xs".to_string(), compact);

    ThemeProperties {
        colors: Some(colors),
        typography: Some(typography),
        spacing: Some(spacing),
        border_radius: Some(scale_of(&[
            ("none", 0.0),
            ("sm", 2.0),
            ("md", 4.0),
            ("lg", 8.0),
            ("full", 9999.0),
        ])),
        shadows: Some(shadows),
        animation: Some(animation),
        breakpoints: Some(scale_of(&[
            ("xs", 0.0),
            ("sm", 600.0),
            ("md", 900.0),
            ("lg", 1200.0),
            ("xl", 1536.0),
        ])),
        theme_classes: Some(theme_classes),
        custom: None,
        metadata: Some(ThemeMetadata {
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single(),
            updated_at: None,
            version: Some("1.0.0".to_string()),
            author: Some("themekit".to_string()),
        }),
        breakpoint_overrides: Some(breakpoint_overrides),
    }
}

fn style_class(entries: &[(&str, Scalar)]) -> StyleClass {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

fn record_of(entries: &[(&str, f64)]) -> PropertyMap {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), PropertyValue::Number(*value)))
        .collect()
}

fn single(key: &str, value: PropertyMap) -> PropertyMap {
    let mut map = PropertyMap::new();
    map.insert(key.to_string(), PropertyValue::Record(value));
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_complete_and_paired() {
        let light = material_light();
        let dark = material_dark();

        assert!(light.properties().missing_groups().is_empty());
        assert!(dark.properties().missing_groups().is_empty());
        assert_eq!(light.get_opposite_theme().unwrap(), Some(MATERIAL_DARK_ID));
        assert_eq!(dark.get_opposite_theme().unwrap(), Some(MATERIAL_LIGHT_ID));
        assert_ne!(light.name(), dark.name());
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(builtin_theme(MATERIAL_DARK_ID).unwrap().id(), MATERIAL_DARK_ID);
        assert!(builtin_theme("sepia").is_none());
        assert_eq!(builtin_themes().len(), 2);
    }

    #[test]
    fn test_builtin_values() {
        let light = material_light();
        assert_eq!(light.get_color("primary.main").unwrap(), "#1976d2");
        assert_eq!(light.get_spacing("md").unwrap(), 16.0);
        assert_eq!(light.get_color("semantic.action.active").unwrap(), "#1976d2");
        assert!(material_dark().identity().supports_dark_mode);
    }
}
