//! Sketch error types
//!
//! The simulation itself is total; errors only come from configuration and the
//! rendering backend.

use std::fmt;

/// Top-level error enum for the sketch.
#[derive(Debug, Clone, PartialEq)]
pub enum SketchError {
    /// A settings field holds a value the simulation cannot run with.
    InvalidSettings {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable description of the accepted range.
        reason: &'static str,
    },

    /// Settings JSON could not be parsed.
    SettingsParse(String),

    /// The GPU backend failed to initialise.
    Render(String),
}

impl fmt::Display for SketchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SketchError::InvalidSettings { field, reason } => {
                write!(f, "invalid setting `{field}`: {reason}")
            }
            SketchError::SettingsParse(msg) => write!(f, "failed to parse settings: {msg}"),
            SketchError::Render(msg) => write!(f, "renderer error: {msg}"),
        }
    }
}

impl std::error::Error for SketchError {}

impl From<serde_json::Error> for SketchError {
    fn from(err: serde_json::Error) -> Self {
        SketchError::SettingsParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_field() {
        let err = SketchError::InvalidSettings {
            field: "min_sides",
            reason: "must be at least 3",
        };
        assert_eq!(err.to_string(), "invalid setting `min_sides`: must be at least 3");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: SketchError = json_err.into();
        assert!(matches!(err, SketchError::SettingsParse(_)));
    }
}
