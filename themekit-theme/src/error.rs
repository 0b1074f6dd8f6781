//! # Theme Error Types
//!
//! Every public operation in this crate returns a [ThemeResult]. Expected
//! conditions (a missing property, a duplicate id, a theme missing a group)
//! are variants of [ThemeError]; nothing in the crate panics on them.
//!
//! Absence is not always an error: registry lookups report a missing theme as
//! `Ok(None)`, and only property lookups turn absence into
//! [ThemeError::PropertyNotFound].

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the theme subsystem.
#[derive(Error, Debug)]
pub enum ThemeError {
    /// An argument was malformed (blank id, empty path, ...).
    #[error("{operation}: {message}")]
    InvalidInput {
        /// The operation that rejected the input.
        operation: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// No theme with the given id is registered.
    #[error("Theme '{id}' not found")]
    ThemeNotFound {
        /// The id that was looked up.
        id: String,
    },

    /// A property path could not be resolved inside a group.
    #[error("Property '{path}' not found in {group}")]
    PropertyNotFound {
        /// The property group that was searched.
        group: &'static str,
        /// The path or key that was requested.
        path: String,
    },

    /// A mandatory property group is absent from the theme.
    #[error("Theme is missing the '{group}' property group")]
    MissingGroup {
        /// The name of the absent group.
        group: &'static str,
    },

    /// A resolver operation was called without a theme.
    #[error("{operation}: no theme supplied")]
    MissingTheme {
        /// The resolver operation.
        operation: &'static str,
    },

    /// A theme with this id is already registered.
    #[error("Theme with id '{id}' is already registered")]
    DuplicateId {
        /// The conflicting id.
        id: String,
    },

    /// The display name is already taken by a different theme.
    #[error("Theme name '{name}' is already used by theme '{existing_id}'")]
    DuplicateName {
        /// The conflicting name.
        name: String,
        /// The id currently holding the name.
        existing_id: String,
    },

    /// The theme failed structural validation.
    #[error("Theme '{id}' failed validation: {}", problems.join("; "))]
    Validation {
        /// The id of the rejected theme (may be blank).
        id: String,
        /// Every problem that was found.
        problems: Vec<String>,
    },

    /// A deep merge produced a tree that no longer fits the theme model.
    #[error("Theme structure error: {details}")]
    Structure {
        /// Description of the underlying failure.
        details: String,
    },

    /// Error parsing a configuration or bundle file.
    #[error("Failed to parse {path:?}: {details}")]
    ParseError {
        /// The file that failed to parse.
        path: PathBuf,
        /// Details about the parse error.
        details: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error serializing or deserializing theme data.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for theme operations.
pub type ThemeResult<T> = Result<T, ThemeError>;

impl ThemeError {
    /// Create an invalid input error.
    pub fn invalid_input(operation: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            operation,
            message: message.into(),
        }
    }

    /// Create a theme not found error.
    pub fn theme_not_found(id: impl Into<String>) -> Self {
        Self::ThemeNotFound { id: id.into() }
    }

    /// Create a property not found error.
    pub fn property_not_found(group: &'static str, path: impl Into<String>) -> Self {
        Self::PropertyNotFound {
            group,
            path: path.into(),
        }
    }

    /// Create a missing group error.
    pub fn missing_group(group: &'static str) -> Self {
        Self::MissingGroup { group }
    }

    /// Create a structure error from any displayable failure.
    pub fn structure(details: impl ToString) -> Self {
        Self::Structure {
            details: details.to_string(),
        }
    }

    /// Create a parse error.
    pub fn parse_error(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        Self::ParseError {
            path: path.into(),
            details: details.into(),
        }
    }

    /// Whether this error reports that something simply was not there.
    ///
    /// Resolver fallbacks apply to every failure, but callers deciding whether
    /// to surface an error usually only want to hide these.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ThemeNotFound { .. } | Self::PropertyNotFound { .. } | Self::MissingGroup { .. }
        )
    }

    /// Whether this error is a registration conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateId { .. } | Self::DuplicateName { .. })
    }
}

impl From<serde_json::Error> for ThemeError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ThemeError::DuplicateName {
            name: "Ocean".to_string(),
            existing_id: "ocean-1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Theme name 'Ocean' is already used by theme 'ocean-1'"
        );

        let err = ThemeError::Validation {
            id: "t1".to_string(),
            problems: vec!["missing colors".to_string(), "missing spacing".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Theme 't1' failed validation: missing colors; missing spacing"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(ThemeError::property_not_found("colors", "primary.x").is_not_found());
        assert!(ThemeError::missing_group("spacing").is_not_found());
        assert!(!ThemeError::missing_group("spacing").is_conflict());
        assert!(ThemeError::DuplicateId { id: "a".into() }.is_conflict());
    }
}
