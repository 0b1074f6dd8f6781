#![warn(missing_docs)]

//! Typed themes, a multi-index theme registry and a property resolver.

pub use themekit_theme as theme;

/// A "prelude" for users of themekit.
///
/// Importing this module brings into scope the types needed to register
/// themes and resolve style values from them.
///
/// ```rust
/// use themekit::prelude::*;
///
/// let registry = ThemeRegistry::with_builtin_themes().unwrap();
/// let theme = registry.get_theme(MATERIAL_LIGHT_ID).unwrap();
///
/// let spacing = ThemePropertyResolver::new()
///     .resolve_spacing(theme.as_deref(), "md", None)
///     .unwrap();
/// assert_eq!(spacing, 16.0);
/// ```
pub mod prelude {
    // Model
    pub use crate::theme::identity::{ThemeIdentity, ThemeType, ThemeVariant};
    pub use crate::theme::properties::{StyleClass, ThemeProperties};
    pub use crate::theme::theme::{Theme, ThemeOverride};
    pub use crate::theme::value::{PropertyMap, PropertyValue};

    // Services
    pub use crate::theme::registry::{SharedThemeRegistry, ThemeRegistry};
    pub use crate::theme::resolver::ThemePropertyResolver;
    pub use crate::theme::validation::ValidationReport;

    // Configuration and interchange
    pub use crate::theme::bundle::ThemeBundle;
    pub use crate::theme::config::ThemeConfig;
    pub use crate::theme::diagnostics::{Diagnostics, DiagnosticSink};

    // Built-in themes
    pub use crate::theme::builtin::{MATERIAL_DARK_ID, MATERIAL_LIGHT_ID};

    // Errors
    pub use crate::theme::error::{ThemeError, ThemeResult};
}
