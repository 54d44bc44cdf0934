use thiserror::Error;

use super::geometry::{TileCoord, Vec2};

pub const DEFAULT_TILE_SIZE_PX: u32 = 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TileKind {
    #[default]
    Grass = 0,
    Path = 1,
    Tree = 2,
    Flowers = 3,
    Water = 4,
    TallGrass = 5,
    Rock = 6,
    Wall = 7,
}

const SOLID_TILE_KINDS: [TileKind; 4] = [
    TileKind::Tree,
    TileKind::Water,
    TileKind::Rock,
    TileKind::Wall,
];

impl TileKind {
    pub const ALL: [TileKind; 8] = [
        TileKind::Grass,
        TileKind::Path,
        TileKind::Tree,
        TileKind::Flowers,
        TileKind::Water,
        TileKind::TallGrass,
        TileKind::Rock,
        TileKind::Wall,
    ];

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<TileKind> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn is_solid(self) -> bool {
        SOLID_TILE_KINDS.contains(&self)
    }
}

/// Immutable grid of tile kinds. Row-major, `(0,0)` is the top-left tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    width: u32,
    height: u32,
    tile_size: u32,
    tiles: Vec<TileKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TileMapError {
    #[error("tile count mismatch: expected {expected}, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
    #[error("unknown tile code {code} at index {index}")]
    UnknownTileCode { code: u8, index: usize },
    #[error("tile size must be non-zero")]
    ZeroTileSize,
}

impl TileMap {
    pub fn new(
        width: u32,
        height: u32,
        tile_size: u32,
        tiles: Vec<TileKind>,
    ) -> Result<Self, TileMapError> {
        if tile_size == 0 {
            return Err(TileMapError::ZeroTileSize);
        }
        let expected = width as usize * height as usize;
        let actual = tiles.len();
        if expected != actual {
            return Err(TileMapError::TileCountMismatch { expected, actual });
        }
        Ok(Self {
            width,
            height,
            tile_size,
            tiles,
        })
    }

    pub fn from_codes(
        width: u32,
        height: u32,
        tile_size: u32,
        codes: &[u8],
    ) -> Result<Self, TileMapError> {
        let tiles = codes
            .iter()
            .enumerate()
            .map(|(index, code)| {
                TileKind::from_code(*code)
                    .ok_or(TileMapError::UnknownTileCode { code: *code, index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(width, height, tile_size, tiles)
    }

    pub fn filled(width: u32, height: u32, tile_size: u32, kind: TileKind) -> Self {
        Self {
            width,
            height,
            tile_size: tile_size.max(1),
            tiles: vec![kind; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * self.tile_size as f32
    }

    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * self.tile_size as f32
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as u32) < self.width
            && (coord.y as u32) < self.height
    }

    fn index_of(&self, coord: TileCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        Some(coord.y as usize * self.width as usize + coord.x as usize)
    }

    pub fn tile_at(&self, coord: TileCoord) -> Option<TileKind> {
        self.index_of(coord)
            .and_then(|index| self.tiles.get(index).copied())
    }

    pub fn is_solid(&self, tile_x: i32, tile_y: i32) -> bool {
        self.tile_at(TileCoord::new(tile_x, tile_y))
            .map_or(true, TileKind::is_solid)
    }

    pub fn tile_coord_of(&self, point: Vec2) -> TileCoord {
        TileCoord::from_point(point, self.tile_size)
    }

    /// Overwrites a single cell while the map is still being assembled.
    pub(crate) fn set(&mut self, coord: TileCoord, kind: TileKind) {
        if let Some(index) = self.index_of(coord) {
            self.tiles[index] = kind;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: u32, height: u32) -> TileMap {
        let mut tiles = Vec::new();
        for y in 0..height {
            for x in 0..width {
                tiles.push(if (x + y) % 2 == 0 {
                    TileKind::Grass
                } else {
                    TileKind::Rock
                });
            }
        }
        TileMap::new(width, height, DEFAULT_TILE_SIZE_PX, tiles).expect("tilemap")
    }

    #[test]
    fn new_rejects_invalid_tile_count() {
        let err = TileMap::new(2, 2, 16, vec![TileKind::Grass; 3]).expect_err("mismatch");
        assert_eq!(
            err,
            TileMapError::TileCountMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn from_codes_rejects_unknown_codes() {
        let err = TileMap::from_codes(2, 1, 16, &[0, 9]).expect_err("unknown");
        assert_eq!(err, TileMapError::UnknownTileCode { code: 9, index: 1 });
    }

    #[test]
    fn out_of_bounds_is_always_solid() {
        let map = TileMap::filled(4, 3, 16, TileKind::Grass);
        for (x, y) in [(-1, 0), (0, -1), (4, 0), (0, 3), (i32::MIN, i32::MAX), (100, 100)] {
            assert!(map.is_solid(x, y), "({x},{y}) should be solid");
        }
        for y in 0..3 {
            for x in 0..4 {
                assert!(!map.is_solid(x, y));
            }
        }
    }

    #[test]
    fn solidity_follows_fixed_set() {
        let solid: Vec<_> = TileKind::ALL.iter().filter(|kind| kind.is_solid()).collect();
        assert_eq!(
            solid,
            vec![&TileKind::Tree, &TileKind::Water, &TileKind::Rock, &TileKind::Wall]
        );
        let map = checker(3, 3);
        assert!(!map.is_solid(0, 0));
        assert!(map.is_solid(1, 0));
    }

    #[test]
    fn codes_round_trip() {
        for kind in TileKind::ALL {
            assert_eq!(TileKind::from_code(kind.code()), Some(kind));
        }
    }

    #[test]
    fn pixel_extent_uses_tile_size() {
        let map = TileMap::filled(50, 40, 16, TileKind::Grass);
        assert!((map.pixel_width() - 800.0).abs() < f32::EPSILON);
        assert!((map.pixel_height() - 640.0).abs() < f32::EPSILON);
    }

    #[test]
    fn pixel_extent_does_not_overflow_for_huge_tiles() {
        let map = TileMap::filled(2, 2, u32::MAX, TileKind::Grass);
        assert_eq!(map.pixel_width(), 2.0 * u32::MAX as f32);
        assert_eq!(map.pixel_height(), map.pixel_width());
    }
}
