use crate::world::TileKind;

use super::canvas::Rgba;

pub(crate) const CLEAR_COLOR: Rgba = [0, 0, 0, 255];

pub(crate) const SKIN: Rgba = [248, 200, 160, 255];
pub(crate) const HAIR: Rgba = [74, 60, 40, 255];
pub(crate) const PANTS: Rgba = [74, 93, 142, 255];
pub(crate) const SHOES: Rgba = [42, 42, 42, 255];
pub(crate) const EYES: Rgba = [0, 0, 0, 255];
pub(crate) const SHADOW: Rgba = [0, 0, 0, 51];
pub(crate) const PLAYER_SHIRT: Rgba = [232, 93, 117, 255];
pub(crate) const NPC_SHIRTS: [Rgba; 3] = [
    [93, 142, 232, 255],
    [120, 180, 90, 255],
    [200, 160, 60, 255],
];

pub(crate) const DIALOGUE_FILL: Rgba = [248, 248, 248, 255];
pub(crate) const DIALOGUE_BORDER: Rgba = [64, 64, 64, 255];
pub(crate) const DIALOGUE_TEXT: Rgba = [32, 32, 32, 255];
pub(crate) const PAUSE_DIM: Rgba = [0, 0, 0, 140];
pub(crate) const PAUSE_TEXT: Rgba = [248, 248, 248, 255];

/// Base fill and accent color per tile kind.
pub(crate) fn tile_colors(kind: TileKind) -> (Rgba, Rgba) {
    match kind {
        TileKind::Grass => ([74, 124, 78, 255], [90, 140, 94, 255]),
        TileKind::Path => ([139, 115, 85, 255], [122, 98, 68, 255]),
        TileKind::Tree => ([45, 90, 45, 255], [29, 74, 29, 255]),
        TileKind::Flowers => ([74, 124, 78, 255], [238, 130, 170, 255]),
        TileKind::Water => ([43, 109, 159, 255], [75, 141, 191, 255]),
        TileKind::TallGrass => ([58, 108, 62, 255], [42, 92, 46, 255]),
        TileKind::Rock => ([119, 119, 119, 255], [85, 85, 85, 255]),
        TileKind::Wall => ([139, 111, 71, 255], [107, 79, 39, 255]),
    }
}

/// Drops the low three bits of every color channel, matching the 5-bit
/// channels of the handheld's BGR555 framebuffer. Alpha is untouched.
pub(crate) fn quantize_bgr555(frame: &mut [u8]) {
    for pixel in frame.chunks_exact_mut(4) {
        pixel[0] &= 0xF8;
        pixel[1] &= 0xF8;
        pixel[2] &= 0xF8;
    }
}
