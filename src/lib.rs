//! Polymerge - drifting polygons that merge when three of a kind meet
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, repulsion, drag, merging)
//! - `renderer`: Render sink contract and WebGPU pipeline
//! - `settings`: Runtime configuration
//! - `palette`: Shape colours

pub mod error;
pub mod palette;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::SketchError;
pub use palette::Colour;
pub use settings::{MergePolicy, Settings};

use glam::Vec2;

/// Sketch configuration constants
pub mod consts {
    use std::f32::consts::TAU;

    /// Grid dimensions at startup
    pub const GRID_ROWS: u32 = 7;
    pub const GRID_COLS: u32 = 7;

    /// Side count range for the startup grid (inclusive)
    pub const MIN_SIDES: u32 = 3;
    pub const MAX_SIDES: u32 = 5;

    /// Radius of a level-1 shape; higher levels scale linearly
    pub const BASE_RADIUS: f32 = 30.0;
    /// Merge partners must be within this many radii of each other
    pub const MERGE_DISTANCE_FACTOR: f32 = 3.0;

    /// Resting rotation speed (radians per frame)
    pub const BASE_ROTATION_SPEED: f32 = TAU * 0.001;
    /// Rotation speed a shape is pulled toward when the pointer is close
    pub const NEAR_MOUSE_ROTATION_SPEED: f32 = TAU * 0.008;
    /// How close the pointer must be to excite a shape
    pub const NEAR_MOUSE_RADIUS: f32 = 50.0;

    /// Pull toward the excited speed (fast spin-up)
    pub const EXCITE_FACTOR: f32 = 0.9;
    /// Fraction of the current speed kept when relaxing (slow spin-down)
    pub const RELAX_FACTOR: f32 = 0.97;

    /// Velocity kept after each frame
    pub const VELOCITY_DAMPING: f32 = 0.9;
    /// Magnitude of the push away from an overlapping neighbour
    pub const FLEE_FORCE: f32 = 0.1;
    /// Per-axis jitter range applied when two shapes coincide exactly
    pub const COINCIDENT_JITTER: f32 = 0.1;

    /// Merge partners needed alongside the grabbed shape
    pub const MERGE_PARTNERS: usize = 2;
}

/// True iff `a` and `b` are strictly closer than `range`
#[inline]
pub fn is_within_radius(a: Vec2, b: Vec2, range: f32) -> bool {
    (a - b).length() < range
}

/// Linear interpolation from `a` to `b` by `t`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_point_is_within_any_positive_radius_of_itself() {
        let p = Vec2::new(12.5, -3.0);
        assert!(is_within_radius(p, p, 0.001));
        assert!(is_within_radius(p, p, 1000.0));
    }

    #[test]
    fn test_radius_boundary_is_exclusive() {
        let a = Vec2::ZERO;
        let b = Vec2::new(3.0, 4.0);
        assert!(!is_within_radius(a, b, 5.0));
        assert!(is_within_radius(a, b, 5.01));
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(2.0, 10.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 10.0, 1.0), 10.0);
        assert!((lerp(0.0, 1.0, 0.9) - 0.9).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_within_radius_is_symmetric(
            ax in -1000.0f32..1000.0,
            ay in -1000.0f32..1000.0,
            bx in -1000.0f32..1000.0,
            by in -1000.0f32..1000.0,
            r in 0.0f32..500.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(is_within_radius(a, b, r), is_within_radius(b, a, r));
        }
    }
}
