//! # Theme Registry
//!
//! [ThemeRegistry] stores many themes at once and keeps four structures in
//! step:
//!
//! - the primary store, id to theme, in registration order
//! - a unique name index, display name to id
//! - a type index, [ThemeType] to the set of ids of that type
//! - a variant index, [ThemeVariant] to the set of ids with that role
//!
//! Registration validates the theme first and touches nothing when it fails.
//! Every register and unregister is appended to an in-memory history.
//!
//! ## Usage
//!
//! ```rust
//! use themekit_theme::builtin::material_light;
//! use themekit_theme::identity::ThemeType;
//! use themekit_theme::registry::ThemeRegistry;
//!
//! let mut registry = ThemeRegistry::new();
//! registry.register_theme(material_light()).unwrap();
//!
//! let theme = registry.get_theme_by_name("Material Light").unwrap().unwrap();
//! assert_eq!(theme.id(), "material-light");
//! assert_eq!(registry.get_themes_by_type(ThemeType::Material).len(), 1);
//!
//! assert!(registry.unregister_theme("material-light").unwrap());
//! assert!(registry.get_theme("material-light").unwrap().is_none());
//! ```
//!
//! ## Threading
//!
//! Mutation takes `&mut self`. Hosts that share a registry between threads
//! wrap it in a [SharedThemeRegistry], so readers never observe a theme that
//! is in the store but missing from an index.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::builtin::builtin_themes;
use crate::bundle::ThemeBundle;
use crate::config::ThemeConfig;
use crate::diagnostics::{Component, Diagnostics};
use crate::error::{ThemeError, ThemeResult};
use crate::identity::{ThemeType, ThemeVariant};
use crate::theme::Theme;
use crate::validation::{audit, validate_for_registration};

/// What happened to a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    /// The theme was registered.
    Register,
    /// The theme was unregistered.
    Unregister,
}

/// One entry of the registry history.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// The theme as it was at the time.
    pub theme: Arc<Theme>,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub action: HistoryAction,
}

/// Snapshot counts of a registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    /// Registered themes.
    pub total: usize,
    /// Themes per type, every type listed.
    pub by_type: IndexMap<ThemeType, usize>,
    /// Themes per variant, every variant listed.
    pub by_variant: IndexMap<ThemeVariant, usize>,
    /// Themes declaring dark mode support.
    pub dark_mode_capable: usize,
    /// History length.
    pub history_entries: usize,
}

/// A multi-index store of themes.
#[derive(Debug)]
pub struct ThemeRegistry {
    themes: IndexMap<String, Arc<Theme>>,
    names: HashMap<String, String>,
    by_type: HashMap<ThemeType, IndexSet<String>>,
    by_variant: HashMap<ThemeVariant, IndexSet<String>>,
    history: Vec<HistoryEntry>,
    strict_validation: bool,
    diagnostics: Diagnostics,
}

impl ThemeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            themes: IndexMap::new(),
            names: HashMap::new(),
            by_type: HashMap::new(),
            by_variant: HashMap::new(),
            history: Vec::new(),
            strict_validation: false,
            diagnostics: Diagnostics::default(),
        }
    }

    /// Replace the diagnostics handle.
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Also reject themes whose audit report carries warnings.
    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    /// A registry holding the built-in themes.
    pub fn with_builtin_themes() -> ThemeResult<Self> {
        let mut registry = Self::new();
        registry.register_builtin_themes()?;
        Ok(registry)
    }

    /// Register every built-in theme that is not registered yet.
    pub fn register_builtin_themes(&mut self) -> ThemeResult<()> {
        for theme in builtin_themes() {
            if !self.has_theme(theme.id()) {
                self.register_theme(theme.with_diagnostics(self.diagnostics.clone()))?;
            }
        }
        Ok(())
    }

    /// A registry holding the built-in themes plus every bundle file listed
    /// in `config`.
    pub fn from_config(config: &ThemeConfig) -> ThemeResult<Self> {
        Self::from_config_with(config, Diagnostics::default())
    }

    /// Like [ThemeRegistry::from_config] with an explicit diagnostics handle.
    pub fn from_config_with(config: &ThemeConfig, diagnostics: Diagnostics) -> ThemeResult<Self> {
        let mut registry = Self::new()
            .with_diagnostics(diagnostics)
            .with_strict_validation(config.strict_validation);
        registry.register_builtin_themes()?;

        for path in &config.files {
            let bundle = ThemeBundle::load(path)?;
            registry.import_bundle(bundle)?;
        }

        Ok(registry)
    }

    /// Whether registration also rejects audit warnings.
    pub fn strict_validation(&self) -> bool {
        self.strict_validation
    }

    /// Validate and insert a theme.
    ///
    /// Fails on a validation problem, an id that is already registered, or a
    /// name held by another theme. Nothing changes on failure.
    pub fn register_theme(&mut self, theme: impl Into<Arc<Theme>>) -> ThemeResult<()> {
        let theme = theme.into();
        let result = self.check_registration(&theme);
        if let Err(err) = result {
            self.diagnostics.warn(
                Component::ThemeRegistry,
                "register_theme",
                err.to_string(),
                &[("id", theme.id()), ("name", theme.name())],
            );
            return Err(err);
        }

        let id = theme.id().to_string();
        self.names.insert(theme.name().to_string(), id.clone());
        self.by_type
            .entry(theme.theme_type())
            .or_default()
            .insert(id.clone());
        self.by_variant
            .entry(theme.variant())
            .or_default()
            .insert(id.clone());
        self.themes.insert(id, theme.clone());
        self.record(theme.clone(), HistoryAction::Register);

        self.diagnostics.info(
            Component::ThemeRegistry,
            "register_theme",
            "registered theme",
            &[
                ("id", theme.id()),
                ("type", theme.theme_type().as_str()),
                ("variant", theme.variant().as_str()),
            ],
        );
        Ok(())
    }

    fn check_registration(&self, theme: &Theme) -> ThemeResult<()> {
        validate_for_registration(theme)?;

        if self.strict_validation {
            let report = audit(theme);
            if !report.warnings.is_empty() {
                return Err(ThemeError::Validation {
                    id: theme.id().to_string(),
                    problems: report.warnings,
                });
            }
        }

        if self.themes.contains_key(theme.id()) {
            return Err(ThemeError::DuplicateId {
                id: theme.id().to_string(),
            });
        }
        if let Some(existing_id) = self.names.get(theme.name()) {
            return Err(ThemeError::DuplicateName {
                name: theme.name().to_string(),
                existing_id: existing_id.clone(),
            });
        }
        Ok(())
    }

    /// Remove a theme from every index.
    ///
    /// Returns `Ok(false)` when no theme has that id.
    pub fn unregister_theme(&mut self, id: &str) -> ThemeResult<bool> {
        check_blank("unregister_theme", "id", id)?;

        let Some(theme) = self.themes.shift_remove(id) else {
            self.diagnostics.debug(
                Component::ThemeRegistry,
                "unregister_theme",
                "no such theme",
                &[("id", id)],
            );
            return Ok(false);
        };

        self.names.remove(theme.name());
        remove_from_index(&mut self.by_type, theme.theme_type(), id);
        remove_from_index(&mut self.by_variant, theme.variant(), id);
        self.record(theme.clone(), HistoryAction::Unregister);

        self.diagnostics.info(
            Component::ThemeRegistry,
            "unregister_theme",
            "unregistered theme",
            &[("id", id)],
        );
        Ok(true)
    }

    /// Look up a theme by id.
    pub fn get_theme(&self, id: &str) -> ThemeResult<Option<Arc<Theme>>> {
        check_blank("get_theme", "id", id)?;
        Ok(self.themes.get(id).cloned())
    }

    /// Look up a theme by display name.
    pub fn get_theme_by_name(&self, name: &str) -> ThemeResult<Option<Arc<Theme>>> {
        check_blank("get_theme_by_name", "name", name)?;
        Ok(self
            .names
            .get(name)
            .and_then(|id| self.themes.get(id))
            .cloned())
    }

    /// All themes in registration order, optionally filtered.
    pub fn get_themes(&self, filter: Option<&dyn Fn(&Theme) -> bool>) -> Vec<Arc<Theme>> {
        self.themes
            .values()
            .filter(|theme| {
                let theme: &Theme = theme;
                filter.map_or(true, |keep| keep(theme))
            })
            .cloned()
            .collect()
    }

    /// Themes of one type.
    pub fn get_themes_by_type(&self, theme_type: ThemeType) -> Vec<Arc<Theme>> {
        self.collect_ids(self.by_type.get(&theme_type))
    }

    /// Themes with one variant.
    pub fn get_themes_by_variant(&self, variant: ThemeVariant) -> Vec<Arc<Theme>> {
        self.collect_ids(self.by_variant.get(&variant))
    }

    fn collect_ids(&self, ids: Option<&IndexSet<String>>) -> Vec<Arc<Theme>> {
        ids.into_iter()
            .flatten()
            .filter_map(|id| self.themes.get(id))
            .cloned()
            .collect()
    }

    /// The light/dark counterpart of a registered theme.
    ///
    /// `Ok(None)` when the theme declares no opposite or the opposite is not
    /// registered. Fails when `id` itself is not registered.
    pub fn get_opposite_theme(&self, id: &str) -> ThemeResult<Option<Arc<Theme>>> {
        let theme = self
            .get_theme(id)?
            .ok_or_else(|| ThemeError::theme_not_found(id))?;
        Ok(theme
            .get_opposite_theme()?
            .and_then(|opposite| self.themes.get(opposite))
            .cloned())
    }

    /// The configured default theme, else the fallback.
    pub fn resolve_default(&self, config: &ThemeConfig) -> ThemeResult<Arc<Theme>> {
        let candidates = config.candidates();
        if candidates.is_empty() {
            return Err(ThemeError::invalid_input(
                "resolve_default",
                "no default or fallback theme configured",
            ));
        }

        for (position, id) in candidates.iter().copied().enumerate() {
            if let Some(theme) = self.themes.get(id) {
                if position > 0 {
                    self.diagnostics.warn(
                        Component::ThemeRegistry,
                        "resolve_default",
                        "default theme not registered, using fallback",
                        &[("default", candidates[0]), ("fallback", id)],
                    );
                }
                return Ok(theme.clone());
            }
        }

        Err(ThemeError::theme_not_found(candidates[0]))
    }

    /// Register the theme carried by a bundle.
    pub fn import_bundle(&mut self, bundle: ThemeBundle) -> ThemeResult<Arc<Theme>> {
        let theme = Arc::new(bundle.into_theme().with_diagnostics(self.diagnostics.clone()));
        self.register_theme(theme.clone())?;
        Ok(theme)
    }

    /// Bundle a registered theme for export.
    pub fn export_bundle(&self, id: &str, exported_by: &str) -> ThemeResult<ThemeBundle> {
        let theme = self
            .get_theme(id)?
            .ok_or_else(|| ThemeError::theme_not_found(id))?;
        Ok(ThemeBundle::new(theme.as_ref().clone(), exported_by))
    }

    /// Number of registered themes.
    pub fn count(&self) -> usize {
        self.themes.len()
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> Vec<&str> {
        self.themes.keys().map(String::as_str).collect()
    }

    /// Registered display names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.themes.values().map(|theme| theme.name()).collect()
    }

    /// Whether a theme with this id is registered.
    pub fn has_theme(&self, id: &str) -> bool {
        self.themes.contains_key(id)
    }

    /// Whether a theme with this display name is registered.
    pub fn has_theme_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Counts per type and variant.
    pub fn stats(&self) -> RegistryStats {
        let set_len = |set: Option<&IndexSet<String>>| set.map_or(0, IndexSet::len);

        RegistryStats {
            total: self.count(),
            by_type: ThemeType::ALL
                .into_iter()
                .map(|t| (t, set_len(self.by_type.get(&t))))
                .collect(),
            by_variant: ThemeVariant::ALL
                .into_iter()
                .map(|v| (v, set_len(self.by_variant.get(&v))))
                .collect(),
            dark_mode_capable: self
                .themes
                .values()
                .filter(|theme| theme.identity().supports_dark_mode)
                .count(),
            history_entries: self.history.len(),
        }
    }

    /// Every register and unregister, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Remove every theme. The history is kept.
    pub fn clear(&mut self) {
        let removed = self.themes.len().to_string();
        self.themes.clear();
        self.names.clear();
        self.by_type.clear();
        self.by_variant.clear();

        self.diagnostics.info(
            Component::ThemeRegistry,
            "clear",
            "cleared registry",
            &[("removed", removed.as_str())],
        );
    }

    /// Check that the four structures agree with each other.
    pub fn verify_indexes(&self) -> ThemeResult<()> {
        let stored: IndexSet<&str> = self.themes.keys().map(String::as_str).collect();
        let named: IndexSet<&str> = self.names.values().map(String::as_str).collect();
        let typed: IndexSet<&str> = self.by_type.values().flatten().map(String::as_str).collect();
        let varied: IndexSet<&str> = self
            .by_variant
            .values()
            .flatten()
            .map(String::as_str)
            .collect();

        let typed_total: usize = self.by_type.values().map(IndexSet::len).sum();
        let varied_total: usize = self.by_variant.values().map(IndexSet::len).sum();

        let agree = |other: &IndexSet<&str>| {
            other.len() == stored.len() && other.iter().all(|id| stored.contains(id))
        };

        if !agree(&named) || self.names.len() != stored.len() {
            return Err(ThemeError::structure("name index disagrees with the store"));
        }
        if !agree(&typed) || typed_total != stored.len() {
            return Err(ThemeError::structure("type index disagrees with the store"));
        }
        if !agree(&varied) || varied_total != stored.len() {
            return Err(ThemeError::structure("variant index disagrees with the store"));
        }
        if self.by_type.values().any(IndexSet::is_empty)
            || self.by_variant.values().any(IndexSet::is_empty)
        {
            return Err(ThemeError::structure("empty index set was not pruned"));
        }
        Ok(())
    }

    fn record(&mut self, theme: Arc<Theme>, action: HistoryAction) {
        self.history.push(HistoryEntry {
            theme,
            timestamp: Utc::now(),
            action,
        });
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn check_blank(operation: &'static str, what: &str, value: &str) -> ThemeResult<()> {
    if value.trim().is_empty() {
        return Err(ThemeError::invalid_input(
            operation,
            format!("{} must not be empty", what),
        ));
    }
    Ok(())
}

fn remove_from_index<K>(index: &mut HashMap<K, IndexSet<String>>, key: K, id: &str)
where
    K: std::hash::Hash + Eq,
{
    if let Some(set) = index.get_mut(&key) {
        set.shift_remove(id);
        if set.is_empty() {
            index.remove(&key);
        }
    }
}

/// A registry shared between threads.
pub type SharedThemeRegistry = Arc<RwLock<ThemeRegistry>>;

/// Create an empty shared registry.
pub fn create_shared_theme_registry() -> SharedThemeRegistry {
    Arc::new(RwLock::new(ThemeRegistry::new()))
}

/// Share an existing registry.
pub fn share_theme_registry(registry: ThemeRegistry) -> SharedThemeRegistry {
    Arc::new(RwLock::new(registry))
}
