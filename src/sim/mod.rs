//! Deterministic simulation module
//!
//! All sketch logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (insertion order of the live collection)
//! - No GPU or platform dependencies

pub mod input;
pub mod merge;
pub mod shape;
pub mod state;
pub mod tick;

pub use input::{MOUSE_POINTER, PointerTracker};
pub use merge::{MergeReport, find_partners, resolve_merges};
pub use shape::{Shape, ShapeConfig, ShapeId};
pub use state::World;
pub use tick::{nearest_partners, tick};
