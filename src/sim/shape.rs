//! Shape entity
//!
//! A rotating polygon that drifts under a damped force integrator, can be
//! dragged by the pointer, and spins up while the pointer hovers nearby.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::palette::Colour;
use crate::renderer::{DrawCommand, RenderSink};
use crate::{is_within_radius, lerp};

/// Stable identifier of a shape within a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub u32);

/// Immutable per-shape tuning, shared by every shape in a world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeConfig {
    pub base_rotation_speed: f32,
    pub near_mouse_radius: f32,
    pub near_mouse_rotation_speed: f32,
    /// Radius of a level-1 shape
    pub base_radius: f32,
    /// Merge partners must be within this many radii
    pub merge_distance_factor: f32,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            base_rotation_speed: BASE_ROTATION_SPEED,
            near_mouse_radius: NEAR_MOUSE_RADIUS,
            near_mouse_rotation_speed: NEAR_MOUSE_ROTATION_SPEED,
            base_radius: BASE_RADIUS,
            merge_distance_factor: MERGE_DISTANCE_FACTOR,
        }
    }
}

/// A polygon instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Forces accumulated this frame; cleared by `update`
    pub acc: Vec2,
    pub colour: Colour,
    /// Tier, 1 for grid shapes and +1 per merge
    pub level: u32,
    pub sides: u32,
    pub radius: f32,
    /// Accumulated rotation (radians, unwrapped)
    pub phase: f32,
    pub rotation_speed: f32,
    /// Position follows the pointer while set
    pub grabbed: bool,
    /// Consumed by a merge; purged before the next frame
    pub merged: bool,
    pub config: ShapeConfig,
    /// Nearest merge-eligible neighbours, for the preview lines
    #[serde(skip)]
    pub partners: Vec<ShapeId>,
}

impl Shape {
    /// Create a resting shape.
    ///
    /// Panics if `sides < 3` or `level == 0`.
    pub fn new(
        id: ShapeId,
        config: ShapeConfig,
        pos: Vec2,
        colour: Colour,
        level: u32,
        sides: u32,
    ) -> Self {
        assert!(sides >= 3, "a polygon needs at least 3 sides, got {sides}");
        assert!(level >= 1, "shape level starts at 1");

        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            colour,
            level,
            sides,
            radius: config.base_radius * level as f32,
            phase: 0.0,
            rotation_speed: config.base_rotation_speed,
            grabbed: false,
            merged: false,
            config,
            partners: Vec::new(),
        }
    }

    /// Push away from a neighbour sitting inside this shape's radius
    pub fn flee(&mut self, other: Vec2, rng: &mut impl Rng) {
        let d = self.pos - other;
        let dist = d.length();

        if dist == 0.0 {
            // Exact overlap has no direction; nudge randomly
            self.acc += Vec2::new(
                rng.random_range(-COINCIDENT_JITTER..=COINCIDENT_JITTER),
                rng.random_range(-COINCIDENT_JITTER..=COINCIDENT_JITTER),
            );
        } else if dist < self.radius {
            self.acc += d / dist * FLEE_FORCE;
        }
    }

    /// Grab the shape if the press landed inside it
    pub fn mouse_pressed(&mut self, pointer: Vec2) {
        if is_within_radius(pointer, self.pos, self.radius) {
            self.grabbed = true;
        }
    }

    pub fn mouse_released(&mut self) {
        self.grabbed = false;
    }

    /// Advance one frame
    pub fn update(&mut self, pointer: Option<Vec2>) {
        if let Some(p) = pointer
            && is_within_radius(p, self.pos, self.config.near_mouse_radius)
        {
            self.rotation_speed = lerp(
                self.rotation_speed,
                self.config.near_mouse_rotation_speed,
                EXCITE_FACTOR,
            );
        }

        self.phase += self.rotation_speed;

        self.vel += self.acc;
        self.pos += self.vel;
        self.vel *= VELOCITY_DAMPING;
        self.acc = Vec2::ZERO;

        // Drag wins over physics
        if self.grabbed
            && let Some(p) = pointer
        {
            self.pos = p;
        }

        // Slow return toward the resting speed
        self.rotation_speed = lerp(
            self.config.base_rotation_speed,
            self.rotation_speed,
            RELAX_FACTOR,
        );
    }

    /// Centre distance below which two shapes may merge
    pub fn merge_threshold(&self) -> f32 {
        self.radius * self.config.merge_distance_factor
    }

    /// Same kind, same tier, both live, and close enough
    pub fn can_merge_with(&self, other: &Shape) -> bool {
        self.sides == other.sides
            && self.level == other.level
            && !self.merged
            && !other.merged
            && is_within_radius(
                self.pos,
                other.pos,
                self.merge_threshold().max(other.merge_threshold()),
            )
    }

    /// Radii of the concentric rings, outermost first
    pub fn ring_radii(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.level).map(move |ring| self.radius / (ring + 1) as f32)
    }

    /// Emit one filled polygon per ring
    pub fn draw(&self, sink: &mut impl RenderSink) {
        for radius in self.ring_radii() {
            sink.draw(DrawCommand::Polygon {
                center: self.pos,
                radius,
                sides: self.sides,
                rotation: self.phase,
                colour: self.colour.rgba(),
            });
        }
    }
}
