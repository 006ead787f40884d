//! Merge resolution
//!
//! Runs when the last pointer lifts. Each grabbed shape looks for two more
//! shapes of the same kind and tier nearby; if it finds them, all three are
//! tombstoned and replaced by one shape a level higher. Tombstones are purged
//! in a single pass once every grabbed shape has been resolved, so indices
//! stay valid while scanning.

use super::shape::{Shape, ShapeId};
use super::state::World;
use crate::consts::MERGE_PARTNERS;
use crate::settings::MergePolicy;

/// Outcome of one release event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Shapes created by merges, in creation order
    pub created: Vec<ShapeId>,
    /// Shapes consumed and purged
    pub consumed: usize,
}

/// First two shapes, in collection order, that `shapes[index]` can merge with
pub fn find_partners(shapes: &[Shape], index: usize) -> Vec<usize> {
    let me = &shapes[index];
    shapes
        .iter()
        .enumerate()
        .filter(|&(j, other)| j != index && me.can_merge_with(other))
        .map(|(j, _)| j)
        .take(MERGE_PARTNERS)
        .collect()
}

/// Resolve merges for every grabbed shape and purge what was consumed
pub fn resolve_merges(world: &mut World) -> MergeReport {
    let mut report = MergeReport::default();
    let policy = world.settings.merge_policy;

    // Snapshot: merging adds and tombstones shapes as we go
    for grabbed in world.grabbed_ids() {
        let mut candidate = Some(grabbed);

        while let Some(id) = candidate.take() {
            let Some(index) = world.index_of(id) else {
                break;
            };
            if world.shapes[index].merged {
                // Already eaten by an earlier grabbed shape
                break;
            }

            let partners = find_partners(&world.shapes, index);
            if partners.len() < MERGE_PARTNERS {
                break;
            }

            for &p in &partners {
                world.shapes[p].merged = true;
            }
            let source = &mut world.shapes[index];
            source.merged = true;
            let (pos, level, sides) = (source.pos, source.level + 1, source.sides);

            let new_id = world.spawn(pos, level, sides);
            log::debug!(
                "Merged {:?} + {} partners into {:?} (level {}, {} sides)",
                id,
                partners.len(),
                new_id,
                level,
                sides
            );
            report.created.push(new_id);

            if policy == MergePolicy::Chain {
                candidate = Some(new_id);
            }
        }
    }

    report.consumed = world.purge_merged();
    report
}
