//! Pointer and touch bookkeeping
//!
//! Turns raw mouse/touch events into the three world calls. A release only
//! reaches the world once every active touch has ended, so lifting one finger
//! of a multi-touch gesture does not trigger merges.

use glam::Vec2;

use super::merge::MergeReport;
use super::state::World;

/// Pointer id used for mouse events
pub const MOUSE_POINTER: i32 = -1;

#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    active: Vec<i32>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pointers currently down
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// A pointer went down at `pos`
    ///
    /// A touch starting while the mouse still counts as down means its button
    /// release was never delivered; the mouse is forgotten so the touch gesture
    /// can end normally.
    pub fn press(&mut self, world: &mut World, pointer_id: i32, pos: Vec2) {
        if pointer_id != MOUSE_POINTER && self.active.contains(&MOUSE_POINTER) {
            log::debug!("Dropping stale mouse pointer on touch {}", pointer_id);
            self.active.retain(|&id| id != MOUSE_POINTER);
        }
        if !self.active.contains(&pointer_id) {
            self.active.push(pointer_id);
        }
        world.on_press_start(pos);
    }

    /// A pointer moved to `pos`
    pub fn moved(&mut self, world: &mut World, pos: Vec2) {
        world.on_move(pos);
    }

    /// A pointer lifted. Returns the merge report when it was the last one.
    pub fn release(&mut self, world: &mut World, pointer_id: i32) -> Option<MergeReport> {
        self.active.retain(|&id| id != pointer_id);
        if self.active.is_empty() {
            Some(world.on_release_end())
        } else {
            log::trace!("Pointer {} lifted, {} still down", pointer_id, self.active.len());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn world() -> World {
        World::empty(
            Settings {
                seed: Some(1),
                ..Default::default()
            },
            400.0,
            400.0,
        )
    }

    #[test]
    fn test_mouse_press_release() {
        let mut world = world();
        let id = world.spawn(Vec2::new(50.0, 50.0), 1, 3);
        let mut tracker = PointerTracker::new();

        tracker.press(&mut world, MOUSE_POINTER, Vec2::new(50.0, 50.0));
        assert!(world.shape(id).unwrap().grabbed);
        assert_eq!(tracker.active_count(), 1);

        assert!(tracker.release(&mut world, MOUSE_POINTER).is_some());
        assert!(!world.shape(id).unwrap().grabbed);
    }

    #[test]
    fn test_partial_multitouch_release_keeps_grab() {
        let mut world = world();
        let a = world.spawn(Vec2::new(50.0, 50.0), 1, 3);
        let b = world.spawn(Vec2::new(300.0, 300.0), 1, 3);
        let mut tracker = PointerTracker::new();

        tracker.press(&mut world, 0, Vec2::new(50.0, 50.0));
        tracker.press(&mut world, 1, Vec2::new(300.0, 300.0));

        assert!(tracker.release(&mut world, 0).is_none());
        assert!(world.shape(a).unwrap().grabbed);
        assert!(world.shape(b).unwrap().grabbed);

        assert!(tracker.release(&mut world, 1).is_some());
        assert!(!world.shape(a).unwrap().grabbed);
        assert!(!world.shape(b).unwrap().grabbed);
    }

    #[test]
    fn test_lost_mouse_release_does_not_block_touch_gesture() {
        let mut world = world();
        let a = world.spawn(Vec2::new(50.0, 50.0), 1, 3);
        let b = world.spawn(Vec2::new(300.0, 300.0), 1, 4);
        let mut tracker = PointerTracker::new();

        // Button released somewhere the host never saw
        tracker.press(&mut world, MOUSE_POINTER, Vec2::new(50.0, 50.0));
        assert!(world.shape(a).unwrap().grabbed);

        tracker.press(&mut world, 0, Vec2::new(300.0, 300.0));
        assert_eq!(tracker.active_count(), 1);
        assert!(tracker.release(&mut world, 0).is_some());
        assert_eq!(tracker.active_count(), 0);
        assert!(!world.shape(a).unwrap().grabbed);
        assert!(!world.shape(b).unwrap().grabbed);
    }

    #[test]
    fn test_repeated_mouse_press_counts_once() {
        let mut world = world();
        let id = world.spawn(Vec2::new(50.0, 50.0), 1, 3);
        let mut tracker = PointerTracker::new();

        tracker.press(&mut world, MOUSE_POINTER, Vec2::new(50.0, 50.0));
        tracker.press(&mut world, MOUSE_POINTER, Vec2::new(50.0, 50.0));
        assert_eq!(tracker.active_count(), 1);
        assert!(tracker.release(&mut world, MOUSE_POINTER).is_some());
        assert!(!world.shape(id).unwrap().grabbed);
    }

    #[test]
    fn test_move_updates_world_pointer() {
        let mut world = world();
        let mut tracker = PointerTracker::new();
        assert_eq!(world.pointer, None);
        tracker.moved(&mut world, Vec2::new(3.0, 4.0));
        assert_eq!(world.pointer, Some(Vec2::new(3.0, 4.0)));
    }
}
