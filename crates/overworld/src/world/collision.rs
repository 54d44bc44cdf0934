use super::geometry::{Rect, Vec2};
use super::tilemap::TileMap;

/// Corners are pulled in by this much before sampling so a sprite's
/// visual overhang does not catch on neighbouring tiles.
pub const COLLISION_INSET_PX: f32 = 2.0;

pub fn can_occupy(bounds: Rect, tile_map: &TileMap) -> bool {
    can_occupy_with_inset(bounds, tile_map, COLLISION_INSET_PX)
}

pub fn can_occupy_with_inset(bounds: Rect, tile_map: &TileMap, inset: f32) -> bool {
    let sampled = bounds.inset(inset);
    sampled.corners().iter().all(|corner| {
        let tile = tile_map.tile_coord_of(*corner);
        !tile_map.is_solid(tile.x, tile.y)
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMoveOutcome {
    pub position: Vec2,
    pub blocked_x: bool,
    pub blocked_y: bool,
}

impl AxisMoveOutcome {
    pub fn moved_from(&self, start: Vec2) -> bool {
        self.position != start
    }
}

/// Resolves `delta` one axis at a time: X is tested and committed first,
/// then Y is tested from the post-X position. Blocking one axis never
/// cancels the other, which is what lets an actor slide along walls.
pub fn move_axis_separated(
    position: Vec2,
    size: Vec2,
    delta: Vec2,
    tile_map: &TileMap,
) -> AxisMoveOutcome {
    let mut current = position;
    let mut blocked_x = false;
    let mut blocked_y = false;

    if delta.x != 0.0 {
        let candidate = Vec2::new(current.x + delta.x, current.y);
        if can_occupy(Rect::new(candidate, size), tile_map) {
            current = candidate;
        } else {
            blocked_x = true;
        }
    }

    if delta.y != 0.0 {
        let candidate = Vec2::new(current.x, current.y + delta.y);
        if can_occupy(Rect::new(candidate, size), tile_map) {
            current = candidate;
        } else {
            blocked_y = true;
        }
    }

    AxisMoveOutcome {
        position: current,
        blocked_x,
        blocked_y,
    }
}
