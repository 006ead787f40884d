//! Per-frame simulation tick
//!
//! Runs repulsion, motion and rotation for every live shape, then refreshes
//! the merge previews. Called once per display refresh by the host.

use glam::Vec2;

use super::shape::{Shape, ShapeId};
use super::state::World;
use crate::consts::MERGE_PARTNERS;

/// Advance the world by one frame
pub fn tick(world: &mut World) {
    debug_assert!(
        world.shapes.iter().all(|s| !s.merged),
        "tombstoned shapes must be purged before ticking"
    );

    world.frame += 1;

    // Shapes avoid each other; positions are sampled before anyone moves
    let positions: Vec<Vec2> = world.shapes.iter().map(|s| s.pos).collect();
    let rng = &mut world.rng;
    for (i, shape) in world.shapes.iter_mut().enumerate() {
        for (j, &other) in positions.iter().enumerate() {
            if i != j {
                shape.flee(other, rng);
            }
        }
    }

    let pointer = world.pointer;
    for shape in &mut world.shapes {
        shape.update(pointer);
    }

    refresh_partners(&mut world.shapes);

    log::trace!("Frame {}: {} shapes", world.frame, world.shapes.len());
}

/// Up to two nearest shapes `shapes[index]` could merge with
pub fn nearest_partners(shapes: &[Shape], index: usize) -> Vec<ShapeId> {
    let me = &shapes[index];
    let mut candidates: Vec<(f32, ShapeId)> = shapes
        .iter()
        .enumerate()
        .filter(|&(j, other)| j != index && me.can_merge_with(other))
        .map(|(_, other)| (me.pos.distance_squared(other.pos), other.id))
        .collect();
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
    candidates
        .into_iter()
        .take(MERGE_PARTNERS)
        .map(|(_, id)| id)
        .collect()
}

fn refresh_partners(shapes: &mut [Shape]) {
    let partners: Vec<Vec<ShapeId>> = (0..shapes.len())
        .map(|i| nearest_partners(shapes, i))
        .collect();
    for (shape, p) in shapes.iter_mut().zip(partners) {
        shape.partners = p;
    }
}
