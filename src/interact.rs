//! Block picking and editing on behalf of the player.

use strata_blocks::BlockType;
use strata_geom::Vec3;
use strata_runtime::Runtime;
use strata_world::y_in_range;

use crate::player::Walker;
use crate::raycast::{self, REACH, RayHit};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaceOutcome {
    Placed((i32, i32, i32)),
    /// The target cell already holds a block.
    Occupied,
    /// The new block would overlap the player.
    BlockedByPlayer,
    /// The target cell is above or below the world.
    OutOfWorld,
}

/// The block the player is looking at, if one is within reach.
pub fn target(rt: &Runtime, walker: &Walker, look: Vec3) -> Option<RayHit> {
    let store = rt.store();
    raycast::cast(walker.eye_position(), look, REACH, |x, y, z| store.is_solid(x, y, z))
}

/// Removes the hit block and returns what was there. Crediting it to an
/// inventory is up to the caller.
pub fn break_block(rt: &mut Runtime, hit: &RayHit) -> Option<BlockType> {
    let (x, y, z) = hit.block;
    let old = rt.get(x, y, z)?;
    rt.set(x, y, z, None);
    log::debug!(target: "edit", "broke {} at ({x},{y},{z})", old.name());
    Some(old)
}

/// Places `block` against the hit face unless the cell is taken or overlaps the player.
pub fn place_block(rt: &mut Runtime, walker: &Walker, hit: &RayHit, block: BlockType) -> PlaceOutcome {
    let (x, y, z) = hit.place_target();
    if !y_in_range(y) {
        return PlaceOutcome::OutOfWorld;
    }
    if rt.get(x, y, z).is_some() {
        return PlaceOutcome::Occupied;
    }
    if walker.blocks_placement(x, y, z) {
        return PlaceOutcome::BlockedByPlayer;
    }
    rt.set(x, y, z, Some(block));
    log::debug!(target: "edit", "placed {} at ({x},{y},{z})", block.name());
    PlaceOutcome::Placed((x, y, z))
}
