use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use themekit_theme::builtin::{material_dark, MATERIAL_DARK_ID, MATERIAL_LIGHT_ID};
use themekit_theme::bundle::ThemeBundle;
use themekit_theme::config::{ThemeConfig, ENV_STRICT_VALIDATION, ENV_THEME, ENV_THEME_CONFIG};
use themekit_theme::identity::{IdentityOverride, ThemeType};
use themekit_theme::registry::ThemeRegistry;
use themekit_theme::theme::ThemeOverride;
use themekit_theme::ThemeError;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("themekit-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn ocean() -> themekit_theme::Theme {
    let patch = ThemeOverride::new()
        .with_identity(IdentityOverride {
            id: Some("ocean".to_string()),
            name: Some("Ocean".to_string()),
            theme_type: Some(ThemeType::Dark),
            opposite_theme_id: Some(MATERIAL_LIGHT_ID.to_string()),
            ..Default::default()
        })
        .with_value("colors.primary.main", "#006994")
        .unwrap();
    material_dark().merge(Some(&patch)).unwrap()
}

#[test]
fn test_bundle_save_and_load() {
    let dir = scratch_dir("bundle");
    let path = dir.join("nested").join("ocean.json");

    let bundle = ThemeBundle::new(ocean(), "bundle-tests");
    bundle.save(&path).unwrap();
    let loaded = ThemeBundle::load(&path).unwrap();

    assert_eq!(loaded, bundle);
    assert_eq!(loaded.theme.get_color("primary.main").unwrap(), "#006994");
    let dependencies = loaded.dependencies.unwrap();
    assert_eq!(dependencies.themes, Some(vec![MATERIAL_LIGHT_ID.to_string()]));

    fs::write(dir.join("broken.json"), "{ not json").unwrap();
    assert!(matches!(
        ThemeBundle::load(dir.join("broken.json")),
        Err(ThemeError::ParseError { .. })
    ));
    assert!(matches!(
        ThemeBundle::load(dir.join("absent.json")),
        Err(ThemeError::Io(_))
    ));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_config_file_resolves_relative_bundles() {
    let dir = scratch_dir("config");
    ThemeBundle::new(ocean(), "config-tests")
        .save(dir.join("themes").join("ocean.json"))
        .unwrap();
    let config_path = dir.join("theme.toml");
    fs::write(
        &config_path,
        "[theme]\ndefault = \"ocean\"\nfiles = [\"themes/ocean.json\"]\n",
    )
    .unwrap();

    let config = ThemeConfig::from_file(&config_path).unwrap();
    assert_eq!(config.default_theme.as_deref(), Some("ocean"));
    assert_eq!(config.fallback_theme.as_deref(), Some(MATERIAL_DARK_ID));
    assert_eq!(config.files, vec![dir.join("themes").join("ocean.json")]);

    let registry = ThemeRegistry::from_config(&config).unwrap();
    assert_eq!(registry.count(), 3);
    assert_eq!(registry.resolve_default(&config).unwrap().id(), "ocean");
    assert_eq!(
        registry.get_opposite_theme("ocean").unwrap().unwrap().id(),
        MATERIAL_LIGHT_ID
    );
    registry.verify_indexes().unwrap();

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_config_rejects_non_toml_files() {
    assert!(matches!(
        ThemeConfig::from_file("theme.yaml"),
        Err(ThemeError::ParseError { .. })
    ));
}

#[test]
fn test_env_layers_override_file() {
    let dir = scratch_dir("env");
    let config_path = dir.join("theme.toml");
    fs::write(&config_path, "[theme]\ndefault = \"ocean\"\nfallback = \"sand\"\n").unwrap();

    let mut vars = HashMap::new();
    vars.insert(ENV_THEME_CONFIG, config_path.to_string_lossy().into_owned());
    vars.insert(ENV_THEME, "forest".to_string());
    vars.insert(ENV_STRICT_VALIDATION, "yes".to_string());

    let config = ThemeConfig::from_env_with(|key| vars.get(key).cloned());
    assert_eq!(config.default_theme.as_deref(), Some("forest"));
    assert_eq!(config.fallback_theme.as_deref(), Some("sand"));
    assert!(config.strict_validation);
    assert_eq!(config.candidates(), vec!["forest", "sand"]);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_bundle_file_fails_registry_load() {
    let config = ThemeConfig::new().with_file("/definitely/not/here/theme.json");
    assert!(ThemeRegistry::from_config(&config).is_err());
}
