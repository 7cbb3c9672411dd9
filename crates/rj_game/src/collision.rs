//! Tile collision queries: "is the tile under this world point of type T?"
//!
//! Gameplay never tests against sprite pixels. A query converts the world
//! point to a grid cell by floor division, indexes every collision layer at
//! that cell directly (no search) and compares the tile's type tag. Points
//! outside the grid are "not matching", which is what lets actors fall off
//! the bottom of the map instead of standing on nothing.
//!
//! Ground contact is probed at a single point: the left edge of the actor's
//! feet, `(x, y + height)`. Standing with only the right half over a ledge
//! therefore reads as airborne.

use glam::Vec2;

use crate::tilemap::TileMap;

/// Type tag of tiles that actors can stand on.
pub const FLOOR: &str = "floor";

/// Axis-aligned box in world pixels, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Aabb {
    pub fn from_pos_size(position: Vec2, size: Vec2) -> Self {
        Self {
            top: position.y,
            bottom: position.y + size.y,
            left: position.x,
            right: position.x + size.x,
        }
    }

    /// Strict overlap; boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}

impl TileMap {
    /// Grid cell containing a world point. May lie outside the grid.
    pub fn world_to_cell(&self, world_x: f32, world_y: f32) -> (i32, i32) {
        let col = ((world_x - self.origin.x) / self.tile_size.0 as f32).floor() as i32;
        let row = ((world_y - self.origin.y) / self.tile_size.1 as f32).floor() as i32;
        (col, row)
    }

    /// True when any collision layer holds a tile tagged `type_tag` at the
    /// cell containing `(world_x, world_y)`.
    pub fn is_type(&self, type_tag: &str, world_x: f32, world_y: f32) -> bool {
        let (col, row) = self.world_to_cell(world_x, world_y);
        if !self.in_bounds(col, row) {
            return false;
        }
        self.collision_layers().any(|layer| {
            self.tile_at(layer, col, row)
                .and_then(|id| self.tile_type(id))
                .is_some_and(|tag| tag == type_tag)
        })
    }

    /// Whether an actor at `position` with `size` has floor under its feet.
    pub fn ground_contact(&self, position: Vec2, size: Vec2) -> bool {
        let foot = ground_probe(position, size);
        self.is_type(FLOOR, foot.x, foot.y)
    }
}

/// The single point sampled for ground contact.
pub fn ground_probe(position: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(position.x, position.y + size.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::tests::floor_map;

    #[test]
    fn floor_tile_matches_its_cell_only() {
        let map = floor_map(10, 10, 32, &[(2, 3)]);
        assert!(map.is_type(FLOOR, 64.0, 96.0));
        assert!(map.is_type(FLOOR, 95.9, 127.9));
        assert!(!map.is_type(FLOOR, 64.0, 95.0), "one row up");
        assert!(!map.is_type(FLOOR, 96.0, 96.0), "one column right");
        assert!(map.is_type("empty", 64.0, 95.0));
    }

    #[test]
    fn off_grid_queries_are_false() {
        let map = floor_map(10, 10, 32, &[(0, 0), (9, 9)]);
        assert!(!map.is_type(FLOOR, 10_000.0, 10_000.0));
        assert!(!map.is_type(FLOOR, -0.5, 0.0), "floor division keeps -0.5 off grid");
        assert!(!map.is_type(FLOOR, 0.0, 320.0));
        assert!(map.is_type(FLOOR, 319.0, 319.0));
    }

    #[test]
    fn decorative_layers_are_ignored() {
        // Background layer is tagged floor everywhere but is not a collision layer.
        let map = floor_map(4, 4, 32, &[]);
        assert!(!map.is_type(FLOOR, 10.0, 10.0));
    }

    #[test]
    fn origin_offsets_the_grid() {
        let mut map = floor_map(4, 4, 32, &[(0, 0)]);
        map.origin = Vec2::new(100.0, 50.0);
        assert!(map.is_type(FLOOR, 100.0, 50.0));
        assert!(!map.is_type(FLOOR, 0.0, 0.0));
        assert_eq!(map.world_to_cell(99.0, 50.0), (-1, 0));
    }

    #[test]
    fn ground_contact_samples_left_foot() {
        let map = floor_map(10, 10, 32, &[(2, 3)]);
        let size = Vec2::new(32.0, 32.0);
        // Feet exactly on the top edge of the floor tile.
        assert!(map.ground_contact(Vec2::new(64.0, 64.0), size));
        // Left foot past the tile's right edge: no contact even though the
        // body still overlaps the tile.
        assert!(!map.ground_contact(Vec2::new(96.0, 64.0), size));
        // Right half over the tile, left foot over the gap.
        assert!(!map.ground_contact(Vec2::new(40.0, 64.0), size));
    }

    #[test]
    fn aabb_overlap_is_strict() {
        let a = Aabb::from_pos_size(Vec2::ZERO, Vec2::new(32.0, 32.0));
        let b = Aabb::from_pos_size(Vec2::new(16.0, 16.0), Vec2::new(32.0, 32.0));
        let touching = Aabb::from_pos_size(Vec2::new(32.0, 0.0), Vec2::new(32.0, 32.0));
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&touching));
    }
}
