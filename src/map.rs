//! Tile map - static collision layer, movement resolution, line of sight.
//!
//! The world is a grid of 8x8 pixel tiles. Entities collide with solid
//! tiles only, never with each other. Movement resolution is axis-separated
//! (X first, then Y against the corrected X) which makes diagonal movement
//! slide along an L-shaped corner; that asymmetry is load-bearing game feel
//! and must not be replaced with a swept test.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Tile edge length in pixels.
pub const TILE_SIZE: f32 = 8.0;

/// Sub-tile hitbox used for tile collision and the victim side of the
/// damage sweep. Offsets are relative to the entity's top-left corner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hitbox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Default for Hitbox {
    fn default() -> Self {
        // Feet-anchored 6x4 box inside the 8x8 tile.
        Self { x: 1.0, y: 4.0, w: 6.0, h: 4.0 }
    }
}

/// Static collision layer resource.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    pub cols: usize,
    pub rows: usize,
    /// Row-major solid flags.
    solid: Vec<bool>,
    pub hitbox: Hitbox,
}

impl TileMap {
    /// Create an all-open map of `cols` x `rows` tiles.
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            solid: vec![false; cols * rows],
            hitbox: Hitbox::default(),
        }
    }

    /// Build a map from ASCII rows: '#' marks a solid tile, anything else
    /// is open. Handy for tests and inline scene data.
    pub fn from_rows(rows: &[&str]) -> Self {
        let h = rows.len();
        let w = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut map = Self::new(w, h);
        for (ty, row) in rows.iter().enumerate() {
            for (tx, ch) in row.chars().enumerate() {
                if ch == '#' {
                    map.set_solid(tx as i32, ty as i32, true);
                }
            }
        }
        map
    }

    /// World width in pixels.
    pub fn width(&self) -> f32 {
        self.cols as f32 * TILE_SIZE
    }

    /// World height in pixels.
    pub fn height(&self) -> f32 {
        self.rows as f32 * TILE_SIZE
    }

    pub fn set_solid(&mut self, tx: i32, ty: i32, solid: bool) {
        if tx >= 0 && ty >= 0 && (tx as usize) < self.cols && (ty as usize) < self.rows {
            self.solid[ty as usize * self.cols + tx as usize] = solid;
        }
    }

    /// Solid lookup by tile coordinates. Out-of-bounds tiles are always
    /// solid, which closes the world at its edges.
    pub fn is_solid(&self, tx: i32, ty: i32) -> bool {
        if tx < 0 || ty < 0 || tx as usize >= self.cols || ty as usize >= self.rows {
            return true;
        }
        self.solid[ty as usize * self.cols + tx as usize]
    }

    /// Test the four corners of the sub-tile hitbox at a world position.
    pub fn collides_at(&self, wx: f32, wy: f32) -> bool {
        let x0 = wx + self.hitbox.x;
        let y0 = wy + self.hitbox.y;
        let x1 = x0 + self.hitbox.w - 1.0;
        let y1 = y0 + self.hitbox.h - 1.0;
        let tile = |v: f32| (v / TILE_SIZE).floor() as i32;
        self.is_solid(tile(x0), tile(y0))
            || self.is_solid(tile(x1), tile(y0))
            || self.is_solid(tile(x0), tile(y1))
            || self.is_solid(tile(x1), tile(y1))
    }

    /// Clamp a top-left position so the full tile-sized entity stays inside
    /// the world.
    pub fn clamp_to_world(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x.clamp(0.0, self.width() - TILE_SIZE),
            y.clamp(0.0, self.height() - TILE_SIZE),
        )
    }

    /// Axis-separated movement resolution. The full X displacement is tried
    /// against the original Y; if blocked, X stays put. Y is then tried
    /// against whichever X survived. Resolving Y first would change how
    /// diagonals slide around corners.
    pub fn resolve_move(&self, wx: f32, wy: f32, dx: f32, dy: f32) -> (f32, f32) {
        let (clamped_x, clamped_y) = self.clamp_to_world(wx + dx, wy + dy);
        let ax = if self.collides_at(clamped_x, wy) { wx } else { clamped_x };
        let ay = if self.collides_at(ax, clamped_y) { wy } else { clamped_y };
        (ax, ay)
    }

    /// Grid line-of-sight: integer Bresenham walk over the tiles between
    /// the two points, testing every stepped tile including both endpoints.
    /// Returns false the instant a solid tile is stepped on. Callers should
    /// pass sprite-center coordinates so standing flush against a wall does
    /// not produce false negatives.
    pub fn has_line_of_sight(&self, ax: f32, ay: f32, bx: f32, by: f32) -> bool {
        let mut x0 = (ax / TILE_SIZE).floor() as i32;
        let mut y0 = (ay / TILE_SIZE).floor() as i32;
        let x1 = (bx / TILE_SIZE).floor() as i32;
        let y1 = (by / TILE_SIZE).floor() as i32;

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if self.is_solid(x0, y0) {
                return false;
            }
            if x0 == x1 && y0 == y1 {
                return true;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_map() -> TileMap {
        TileMap::new(16, 16)
    }

    #[test]
    fn test_out_of_bounds_is_solid() {
        let map = open_map();
        assert!(map.is_solid(-1, 0));
        assert!(map.is_solid(0, -1));
        assert!(map.is_solid(16, 0));
        assert!(map.is_solid(0, 16));
        assert!(!map.is_solid(0, 0));
    }

    #[test]
    fn test_from_rows() {
        let map = TileMap::from_rows(&[
            "....",
            ".##.",
            "....",
        ]);
        assert!(map.is_solid(1, 1));
        assert!(map.is_solid(2, 1));
        assert!(!map.is_solid(0, 0));
        assert_eq!(map.cols, 4);
        assert_eq!(map.rows, 3);
    }

    #[test]
    fn test_collides_at_uses_hitbox() {
        let mut map = open_map();
        map.set_solid(2, 2, true);
        // Hitbox spans (x+1..x+7, y+4..y+8); standing just above the solid
        // tile is fine until the feet box reaches it.
        assert!(!map.collides_at(16.0, 4.0));
        assert!(map.collides_at(16.0, 14.0));
    }

    #[test]
    fn test_resolve_move_slides_along_wall() {
        let mut map = open_map();
        // Vertical wall at tile column 4.
        for ty in 0..16 {
            map.set_solid(4, ty, true);
        }
        // Moving diagonally into the wall: X is blocked, Y proceeds.
        let (x, y) = map.resolve_move(20.0, 40.0, 8.0, 8.0);
        assert_eq!(x, 20.0);
        assert_eq!(y, 48.0);
    }

    #[test]
    fn test_resolve_move_clamps_to_world() {
        let map = open_map();
        let (x, y) = map.resolve_move(2.0, 2.0, -50.0, -50.0);
        assert_eq!((x, y), (0.0, 0.0));
        let (x, y) = map.resolve_move(100.0, 100.0, 500.0, 500.0);
        assert_eq!((x, y), (map.width() - TILE_SIZE, map.height() - TILE_SIZE));
    }

    #[test]
    fn test_los_blocked_by_wall() {
        let map = TileMap::from_rows(&[
            "........",
            "...#....",
            "...#....",
            "...#....",
            "........",
        ]);
        // Horizontal ray through the wall column.
        assert!(!map.has_line_of_sight(8.0, 20.0, 52.0, 20.0));
        // Ray through the open row below.
        assert!(map.has_line_of_sight(8.0, 36.0, 52.0, 36.0));
    }

    #[test]
    fn test_los_symmetry() {
        let map = TileMap::from_rows(&[
            "........",
            "..##....",
            "....#...",
            "........",
            ".#......",
            "........",
        ]);
        let points = [
            (4.0, 4.0),
            (60.0, 4.0),
            (4.0, 44.0),
            (60.0, 44.0),
            (28.0, 28.0),
        ];
        for &(ax, ay) in &points {
            for &(bx, by) in &points {
                assert_eq!(
                    map.has_line_of_sight(ax, ay, bx, by),
                    map.has_line_of_sight(bx, by, ax, ay),
                    "LOS asymmetric between ({ax},{ay}) and ({bx},{by})"
                );
            }
        }
    }

    #[test]
    fn test_los_endpoint_tiles_tested() {
        let mut map = open_map();
        map.set_solid(1, 1, true);
        // Standing inside a solid tile blocks sight from that tile.
        assert!(!map.has_line_of_sight(12.0, 12.0, 40.0, 12.0));
        assert!(!map.has_line_of_sight(40.0, 12.0, 12.0, 12.0));
    }
}
