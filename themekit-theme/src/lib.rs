#![warn(missing_docs)]

//! # themekit Theme Subsystem
//!
//! Typed theme data plus the two services that work on it: a registry that
//! stores and indexes many themes, and a resolver that looks up individual
//! style values with path addressing, fallbacks and breakpoint awareness.
//!
//! ## Overview
//!
//! - **[Theme](theme::Theme)**: an immutable identity plus property bundle
//! - **[ThemeRegistry](registry::ThemeRegistry)**: id, name, type and variant
//!   indexes kept consistent across register and unregister
//! - **[ThemePropertyResolver](resolver::ThemePropertyResolver)**: stateless
//!   value lookups with fallbacks
//! - **[deep](deep)**: clone, merge and path traversal over property trees
//! - **[ThemeConfig](config::ThemeConfig)**: default/fallback selection from
//!   environment variables and TOML files
//! - **[ThemeBundle](bundle::ThemeBundle)**: JSON import/export format
//! - **Built-in Themes**: Material light and dark
//!
//! ## Quick Start
//!
//! ```rust
//! use themekit_theme::registry::ThemeRegistry;
//! use themekit_theme::resolver::ThemePropertyResolver;
//!
//! let registry = ThemeRegistry::with_builtin_themes().unwrap();
//! let resolver = ThemePropertyResolver::new();
//!
//! let theme = registry.get_theme("material-dark").unwrap();
//! let background = resolver
//!     .resolve_color(theme.as_deref(), "background.default", Some("#000000"))
//!     .unwrap();
//! assert_eq!(background, "#121212");
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns a [ThemeResult](error::ThemeResult).
//! Lookups that find nothing in a collection return `Ok(None)` or an empty
//! list; lookups of a property path that cannot be resolved return
//! [ThemeError::PropertyNotFound](error::ThemeError::PropertyNotFound).
//!
//! ## Diagnostics
//!
//! Themes, the registry and the resolver report through an injected
//! [Diagnostics](diagnostics::Diagnostics) handle. The default forwards to the
//! `log` crate; tests use [MemorySink](diagnostics::MemorySink).

/// Contains the built-in Material themes.
pub mod builtin;
/// Contains the [bundle::ThemeBundle] import/export format.
pub mod bundle;
/// Contains the [config::ThemeConfig] struct for theme configuration.
pub mod config;
/// Contains deep clone, deep merge and path helpers for property trees.
pub mod deep;
/// Contains the injected diagnostics channel.
pub mod diagnostics;
/// Contains the [error::ThemeError] type.
pub mod error;
/// Contains theme identity types.
pub mod identity;
/// Contains typed theme property groups.
pub mod properties;
/// Contains the [registry::ThemeRegistry].
pub mod registry;
/// Contains the [resolver::ThemePropertyResolver].
pub mod resolver;
/// Contains the [theme::Theme] entity.
pub mod theme;
/// Contains registration checks and the audit report.
pub mod validation;
/// Contains the [value::PropertyValue] tree node.
pub mod value;

pub use error::{ThemeError, ThemeResult};
pub use registry::{SharedThemeRegistry, ThemeRegistry};
pub use resolver::ThemePropertyResolver;
pub use theme::{Theme, ThemeOverride};
