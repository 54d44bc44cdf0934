mod atomic_io;
mod meadow;
mod overworld;

pub use atomic_io::write_text_atomic;
pub use meadow::{generate_meadow, MEADOW_HEIGHT, MEADOW_WIDTH};
pub use overworld::{
    builtin_overworld, load_overworld, parse_overworld, ContentError, ContentErrorCode, NpcDef,
    OverworldDef, PlayerDef, SourceLocation, MAX_MAP_SIDE_TILES, MAX_TILE_SIZE_PX,
    MIN_TILE_SIZE_PX,
};
