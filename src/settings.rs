//! Sketch settings
//!
//! Read once at startup. The browser host passes JSON through the canvas
//! `data-settings` attribute; any missing field falls back to its default.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SketchError;
use crate::sim::ShapeConfig;

/// How a release event resolves merges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// A freshly merged shape is re-tested and may merge again in the same release
    #[default]
    Chain,
    /// At most one merge per grabbed shape per release
    Single,
}

impl MergePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergePolicy::Chain => "chain",
            MergePolicy::Single => "single",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "chain" | "cascade" => Some(MergePolicy::Chain),
            "single" | "once" => Some(MergePolicy::Single),
            _ => None,
        }
    }
}

/// Sketch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Startup grid ===
    pub rows: u32,
    pub cols: u32,
    /// Smallest side count in the startup grid
    pub min_sides: u32,
    /// Largest side count in the startup grid (inclusive)
    pub max_sides: u32,

    // === Shapes ===
    /// Radius of a level-1 shape
    pub base_radius: f32,
    /// Merge partners must sit within `merge_distance_factor * radius`
    pub merge_distance_factor: f32,
    pub base_rotation_speed: f32,
    pub near_mouse_rotation_speed: f32,
    pub near_mouse_radius: f32,

    // === Merging ===
    pub merge_policy: MergePolicy,

    /// RNG seed; the host picks one when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: GRID_ROWS,
            cols: GRID_COLS,
            min_sides: MIN_SIDES,
            max_sides: MAX_SIDES,

            base_radius: BASE_RADIUS,
            merge_distance_factor: MERGE_DISTANCE_FACTOR,
            base_rotation_speed: BASE_ROTATION_SPEED,
            near_mouse_rotation_speed: NEAR_MOUSE_ROTATION_SPEED,
            near_mouse_radius: NEAR_MOUSE_RADIUS,

            merge_policy: MergePolicy::Chain,

            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SketchError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SketchError> {
        if self.rows == 0 {
            return Err(SketchError::InvalidSettings {
                field: "rows",
                reason: "must be at least 1",
            });
        }
        if self.cols == 0 {
            return Err(SketchError::InvalidSettings {
                field: "cols",
                reason: "must be at least 1",
            });
        }
        if self.min_sides < 3 {
            return Err(SketchError::InvalidSettings {
                field: "min_sides",
                reason: "must be at least 3",
            });
        }
        if self.max_sides < self.min_sides {
            return Err(SketchError::InvalidSettings {
                field: "max_sides",
                reason: "must not be below min_sides",
            });
        }
        if self.base_radius.is_nan() || self.base_radius <= 0.0 {
            return Err(SketchError::InvalidSettings {
                field: "base_radius",
                reason: "must be positive",
            });
        }
        if self.merge_distance_factor.is_nan() || self.merge_distance_factor <= 0.0 {
            return Err(SketchError::InvalidSettings {
                field: "merge_distance_factor",
                reason: "must be positive",
            });
        }
        if self.near_mouse_radius.is_nan() || self.near_mouse_radius < 0.0 {
            return Err(SketchError::InvalidSettings {
                field: "near_mouse_radius",
                reason: "must not be negative",
            });
        }
        Ok(())
    }

    /// Per-shape configuration handed to every new shape
    pub fn shape_config(&self) -> ShapeConfig {
        ShapeConfig {
            base_rotation_speed: self.base_rotation_speed,
            near_mouse_radius: self.near_mouse_radius,
            near_mouse_rotation_speed: self.near_mouse_rotation_speed,
            base_radius: self.base_radius,
            merge_distance_factor: self.merge_distance_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(Settings::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "rows": 3, "merge_policy": "single" }"#).unwrap();
        assert_eq!(settings.rows, 3);
        assert_eq!(settings.cols, GRID_COLS);
        assert_eq!(settings.merge_policy, MergePolicy::Single);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn test_rejects_degenerate_polygons() {
        let err = Settings::from_json(r#"{ "min_sides": 2 }"#).unwrap_err();
        assert!(matches!(
            err,
            SketchError::InvalidSettings {
                field: "min_sides",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_inverted_side_range() {
        let err = Settings::from_json(r#"{ "min_sides": 6, "max_sides": 4 }"#).unwrap_err();
        assert!(matches!(
            err,
            SketchError::InvalidSettings {
                field: "max_sides",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Settings::from_json("{ rows: "),
            Err(SketchError::SettingsParse(_))
        ));
    }

    #[test]
    fn test_rejects_nan_and_non_positive_sizes() {
        let nan_radius = Settings {
            base_radius: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            nan_radius.validate(),
            Err(SketchError::InvalidSettings {
                field: "base_radius",
                ..
            })
        ));

        let zero_factor = Settings {
            merge_distance_factor: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            zero_factor.validate(),
            Err(SketchError::InvalidSettings {
                field: "merge_distance_factor",
                ..
            })
        ));

        let negative_reach = Settings {
            near_mouse_radius: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            negative_reach.validate(),
            Err(SketchError::InvalidSettings {
                field: "near_mouse_radius",
                ..
            })
        ));

        let no_reach = Settings {
            near_mouse_radius: 0.0,
            ..Default::default()
        };
        assert_eq!(no_reach.validate(), Ok(()));
    }

    #[test]
    fn test_merge_policy_parse() {
        assert_eq!(MergePolicy::parse("Chain"), Some(MergePolicy::Chain));
        assert_eq!(MergePolicy::parse("once"), Some(MergePolicy::Single));
        assert_eq!(MergePolicy::parse("never"), None);
        assert_eq!(MergePolicy::Single.as_str(), "single");
    }
}
