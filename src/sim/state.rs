//! World state
//!
//! Owns the live shape collection, the tracked pointer and the seeded RNG.
//! Only the world's own tick and interaction handlers mutate it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::merge::{MergeReport, resolve_merges};
use super::shape::{Shape, ShapeId};
use crate::palette::{Colour, PREVIEW_LINE};
use crate::renderer::{DrawCommand, RenderSink};
use crate::settings::Settings;

/// The simulation world
#[derive(Debug, Clone)]
pub struct World {
    pub settings: Settings,
    /// Viewport size the startup grid was laid out in
    pub width: f32,
    pub height: f32,
    /// Live shapes in insertion order
    pub shapes: Vec<Shape>,
    /// Last known pointer position; `None` until the first press or move
    pub pointer: Option<Vec2>,
    /// Frames simulated so far
    pub frame: u64,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl World {
    /// Create an empty world (no startup grid)
    pub fn empty(settings: Settings, width: f32, height: f32) -> Self {
        let seed = settings.seed.unwrap_or(0);
        Self {
            settings,
            width,
            height,
            shapes: Vec::new(),
            pointer: None,
            frame: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Create a world filled with the startup grid
    pub fn new(settings: Settings, width: f32, height: f32) -> Self {
        let mut world = Self::empty(settings, width, height);
        world.spawn_grid();
        log::info!(
            "World {}x{} created with {} shapes (seed {:?}, {} merges)",
            width,
            height,
            world.shapes.len(),
            world.settings.seed,
            world.settings.merge_policy.as_str()
        );
        world
    }

    /// Allocate a new shape ID
    pub fn next_shape_id(&mut self) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a fresh shape with a random palette colour
    pub fn spawn(&mut self, pos: Vec2, level: u32, sides: u32) -> ShapeId {
        let id = self.next_shape_id();
        let colour = Colour::random(&mut self.rng);
        let shape = Shape::new(id, self.settings.shape_config(), pos, colour, level, sides);
        self.shapes.push(shape);
        id
    }

    fn spawn_grid(&mut self) {
        let rows = self.settings.rows;
        let cols = self.settings.cols;
        let (min_sides, max_sides) = (self.settings.min_sides, self.settings.max_sides);

        for r in 0..rows {
            for c in 0..cols {
                let pos = Vec2::new(
                    (0.5 + r as f32) * self.width / rows as f32,
                    (0.5 + c as f32) * self.height / cols as f32,
                );
                let sides = self.rng.random_range(min_sides..=max_sides);
                self.spawn(pos, 1, sides);
            }
        }
    }

    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == id)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    /// IDs of shapes currently being dragged
    pub fn grabbed_ids(&self) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .filter(|s| s.grabbed)
            .map(|s| s.id)
            .collect()
    }

    /// Drop every tombstoned shape, returning how many were removed
    pub fn purge_merged(&mut self) -> usize {
        let before = self.shapes.len();
        self.shapes.retain(|s| !s.merged);
        before - self.shapes.len()
    }

    /// Pointer went down
    pub fn on_press_start(&mut self, pointer: Vec2) {
        self.pointer = Some(pointer);
        for shape in &mut self.shapes {
            shape.mouse_pressed(pointer);
        }
    }

    /// Pointer moved
    pub fn on_move(&mut self, pointer: Vec2) {
        self.pointer = Some(pointer);
    }

    /// Last pointer lifted: resolve merges, then let go of everything
    pub fn on_release_end(&mut self) -> MergeReport {
        let report = resolve_merges(self);
        for shape in &mut self.shapes {
            shape.mouse_released();
        }
        if !report.created.is_empty() {
            log::debug!(
                "Release merged {} shapes into {} ({} live)",
                report.consumed,
                report.created.len(),
                self.shapes.len()
            );
        }
        report
    }

    /// Emit the frame: merge preview lines under the shapes
    pub fn draw(&self, sink: &mut impl RenderSink) {
        for shape in &self.shapes {
            for partner in shape.partners.iter().filter_map(|&id| self.shape(id)) {
                sink.draw(DrawCommand::Line {
                    from: shape.pos,
                    to: partner.pos,
                    colour: PREVIEW_LINE,
                });
            }
        }
        for shape in &self.shapes {
            shape.draw(sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> Settings {
        Settings {
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_grid_layout() {
        let world = World::new(seeded(1), 700.0, 350.0);
        assert_eq!(world.shapes.len(), 49);

        let first = &world.shapes[0];
        assert_eq!(first.pos, Vec2::new(50.0, 25.0));
        // Column index advances the y coordinate first
        assert_eq!(world.shapes[1].pos, Vec2::new(50.0, 75.0));
        assert_eq!(world.shapes[7].pos, Vec2::new(150.0, 25.0));

        for s in &world.shapes {
            assert_eq!(s.level, 1);
            assert!((3..=5).contains(&s.sides));
            assert!(!s.grabbed && !s.merged);
        }
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let world = World::new(seeded(2), 100.0, 100.0);
        let ids: Vec<u32> = world.shapes.iter().map(|s| s.id.0).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_same_seed_same_grid() {
        let a = World::new(seeded(42), 500.0, 500.0);
        let b = World::new(seeded(42), 500.0, 500.0);
        let sides_a: Vec<u32> = a.shapes.iter().map(|s| s.sides).collect();
        let sides_b: Vec<u32> = b.shapes.iter().map(|s| s.sides).collect();
        assert_eq!(sides_a, sides_b);
        let colours_a: Vec<Colour> = a.shapes.iter().map(|s| s.colour).collect();
        let colours_b: Vec<Colour> = b.shapes.iter().map(|s| s.colour).collect();
        assert_eq!(colours_a, colours_b);
    }

    #[test]
    fn test_move_tracks_pointer_without_touching_shapes() {
        let mut world = World::new(seeded(3), 700.0, 700.0);
        let before: Vec<Vec2> = world.shapes.iter().map(|s| s.pos).collect();
        world.on_move(Vec2::new(50.0, 50.0));
        assert_eq!(world.pointer, Some(Vec2::new(50.0, 50.0)));
        assert!(world.shapes.iter().all(|s| !s.grabbed));
        let after: Vec<Vec2> = world.shapes.iter().map(|s| s.pos).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_press_grabs_shape_under_pointer() {
        let mut world = World::new(seeded(4), 700.0, 700.0);
        world.on_press_start(Vec2::new(50.0, 50.0));
        assert_eq!(world.grabbed_ids(), vec![world.shapes[0].id]);
    }

    #[test]
    fn test_purge_removes_only_tombstones() {
        let mut world = World::empty(seeded(5), 100.0, 100.0);
        let a = world.spawn(Vec2::ZERO, 1, 3);
        let b = world.spawn(Vec2::new(10.0, 0.0), 1, 3);
        world.shape_mut(a).unwrap().merged = true;
        assert_eq!(world.purge_merged(), 1);
        assert!(world.shape(a).is_none());
        assert!(world.shape(b).is_some());
    }

    #[test]
    fn test_draw_emits_rings_and_preview_lines() {
        let mut world = World::empty(seeded(6), 100.0, 100.0);
        let a = world.spawn(Vec2::ZERO, 2, 4);
        let b = world.spawn(Vec2::new(10.0, 0.0), 1, 3);
        world.shape_mut(a).unwrap().partners = vec![b];

        let mut commands: Vec<DrawCommand> = Vec::new();
        world.draw(&mut commands);

        let lines = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        let polygons = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Polygon { .. }))
            .count();
        assert_eq!(lines, 1);
        // Level 2 draws two rings, level 1 draws one
        assert_eq!(polygons, 3);
    }
}
