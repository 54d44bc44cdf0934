use crate::world::{TileCoord, TileKind, TileMap};

pub const MEADOW_WIDTH: u32 = 50;
pub const MEADOW_HEIGHT: u32 = 40;

const FNV1A_OFFSET_BASIS_64: u64 = 0xcbf2_9ce4_8422_2325;
const FNV1A_PRIME_64: u64 = 0x0000_0100_0000_01b3;

// Scatter odds out of 1000, checked in order on otherwise plain grass.
const FLOWER_PER_MILLE: u64 = 50;
const ROCK_PER_MILLE: u64 = 20;

/// Deterministic meadow: tree border, two path rows and two path columns,
/// a pond in the lower right and a tall-grass patch, with flowers and rocks
/// scattered from `seed`. Same inputs always give the same map.
pub fn generate_meadow(width: u32, height: u32, tile_size: u32, seed: u64) -> TileMap {
    let mut map = TileMap::filled(width, height, tile_size, TileKind::Grass);
    let w = width as i32;
    let h = height as i32;

    for y in 0..h {
        for x in 0..w {
            let kind = if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                TileKind::Tree
            } else if (y == 10 || y == 20) && x > 5 && x < w - 5 {
                TileKind::Path
            } else if (x == 15 || x == 30) && y > 5 && y < h - 5 {
                TileKind::Path
            } else if x > 35 && x < 45 && y > 25 && y < 35 {
                TileKind::Water
            } else if x > 20 && x < 28 && y > 12 && y < 18 {
                TileKind::TallGrass
            } else {
                scatter(seed, x as u32, y as u32)
            };
            map.set(TileCoord::new(x, y), kind);
        }
    }
    map
}

fn scatter(seed: u64, x: u32, y: u32) -> TileKind {
    let roll = cell_hash(seed, x, y) % 1000;
    if roll < FLOWER_PER_MILLE {
        TileKind::Flowers
    } else if roll < FLOWER_PER_MILLE + ROCK_PER_MILLE {
        TileKind::Rock
    } else {
        TileKind::Grass
    }
}

fn cell_hash(seed: u64, x: u32, y: u32) -> u64 {
    let mut hash = FNV1A_OFFSET_BASIS_64;
    for byte in seed
        .to_le_bytes()
        .into_iter()
        .chain(x.to_le_bytes())
        .chain(y.to_le_bytes())
    {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV1A_PRIME_64);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meadow(seed: u64) -> TileMap {
        generate_meadow(MEADOW_WIDTH, MEADOW_HEIGHT, 16, seed)
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        assert_eq!(meadow(7), meadow(7));
        assert_ne!(meadow(7), meadow(8));
    }

    #[test]
    fn border_is_solid_trees() {
        let map = meadow(1);
        for x in 0..MEADOW_WIDTH as i32 {
            assert_eq!(map.tile_at(TileCoord::new(x, 0)), Some(TileKind::Tree));
            assert_eq!(
                map.tile_at(TileCoord::new(x, MEADOW_HEIGHT as i32 - 1)),
                Some(TileKind::Tree)
            );
        }
        for y in 0..MEADOW_HEIGHT as i32 {
            assert!(map.is_solid(0, y));
            assert!(map.is_solid(MEADOW_WIDTH as i32 - 1, y));
        }
    }

    #[test]
    fn fixed_landmarks_are_placed() {
        let map = meadow(3);
        assert_eq!(map.tile_at(TileCoord::new(10, 10)), Some(TileKind::Path));
        assert_eq!(map.tile_at(TileCoord::new(15, 9)), Some(TileKind::Path));
        assert_eq!(map.tile_at(TileCoord::new(30, 25)), Some(TileKind::Path));
        assert_eq!(map.tile_at(TileCoord::new(40, 30)), Some(TileKind::Water));
        assert_eq!(map.tile_at(TileCoord::new(24, 15)), Some(TileKind::TallGrass));
    }

    #[test]
    fn scatter_stays_sparse() {
        let map = meadow(42);
        let mut rocks = 0;
        let mut flowers = 0;
        for y in 0..MEADOW_HEIGHT as i32 {
            for x in 0..MEADOW_WIDTH as i32 {
                match map.tile_at(TileCoord::new(x, y)) {
                    Some(TileKind::Rock) => rocks += 1,
                    Some(TileKind::Flowers) => flowers += 1,
                    _ => {}
                }
            }
        }
        let cells = (MEADOW_WIDTH * MEADOW_HEIGHT) as usize;
        assert!(rocks < cells / 10);
        assert!(flowers < cells / 5);
    }
}
