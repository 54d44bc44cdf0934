use crate::world::{wrap_text, Actor, Camera, Facing, TileCoord, TileKind, World};

use super::canvas::{text_width, Canvas, Rgba, GLYPH_ADVANCE, GLYPH_HEIGHT, LINE_ADVANCE};
use super::palette::{
    tile_colors, CLEAR_COLOR, DIALOGUE_BORDER, DIALOGUE_FILL, DIALOGUE_TEXT, EYES, HAIR,
    NPC_SHIRTS, PANTS, PAUSE_DIM, PAUSE_TEXT, PLAYER_SHIRT, SHADOW, SHOES, SKIN,
};

const DIALOGUE_MARGIN_PX: i32 = 8;
const DIALOGUE_HEIGHT_PX: i32 = 48;
const DIALOGUE_BORDER_PX: i32 = 2;
const DIALOGUE_TEXT_INSET_PX: i32 = 8;
const DIALOGUE_TEXT_TOP_PX: i32 = 6;
const BLINK_PERIOD_MS: u64 = 500;
const WATER_SHIMMER_PERIOD_MS: u64 = 400;
const TREE_TRUNK: Rgba = [107, 79, 39, 255];

/// Draws one complete frame of `world` into `canvas`. `time_ms` only drives
/// cosmetic animation (water shimmer, the blinking continue marker).
pub(crate) fn draw_world(canvas: &mut Canvas<'_>, world: &World, time_ms: u64) {
    canvas.clear(CLEAR_COLOR);
    draw_tiles(canvas, world, time_ms);
    draw_actors(canvas, world);
    draw_dialogue(canvas, world, time_ms);
    if world.is_paused() {
        draw_pause_overlay(canvas);
    }
}

fn draw_tiles(canvas: &mut Canvas<'_>, world: &World, time_ms: u64) {
    let tile_map = world.tile_map();
    let camera = world.camera();
    let Some(rect) = camera.visible_tiles(tile_map) else {
        return;
    };
    let size = tile_map.tile_size() as i32;
    let shimmer = ((time_ms / WATER_SHIMMER_PERIOD_MS) % 4) as i32;

    for y in rect.y_min..=rect.y_max {
        for x in rect.x_min..=rect.x_max {
            let coord = TileCoord::new(x as i32, y as i32);
            let Some(kind) = tile_map.tile_at(coord) else {
                continue;
            };
            let (sx, sy) = camera.world_to_screen(coord.origin_px(tile_map.tile_size()));
            draw_tile(canvas, kind, sx, sy, size, coord, shimmer);
        }
    }
}

fn draw_tile(
    canvas: &mut Canvas<'_>,
    kind: TileKind,
    sx: i32,
    sy: i32,
    size: i32,
    coord: TileCoord,
    shimmer: i32,
) {
    let (base, accent) = tile_colors(kind);
    canvas.fill_rect(sx, sy, size, size, base);
    // Detail is laid out on a 16px tile and scaled for other sizes.
    let unit = |px: i32| px * size / 16;
    let speckle = (coord.x * 7 + coord.y * 13).rem_euclid(5);

    match kind {
        TileKind::Grass => {
            canvas.put_pixel(sx + unit(3 + speckle), sy + unit(4), accent);
            canvas.put_pixel(sx + unit(10), sy + unit(9 + speckle), accent);
        }
        TileKind::Path => {
            canvas.put_pixel(sx + unit(4 + speckle), sy + unit(6), accent);
            canvas.put_pixel(sx + unit(11), sy + unit(3 + speckle), accent);
            canvas.put_pixel(sx + unit(7), sy + unit(12), accent);
        }
        TileKind::Tree => {
            canvas.fill_rect(sx + unit(2), sy + unit(1), unit(12), unit(10), accent);
            canvas.fill_rect(sx + unit(6), sy + unit(11), unit(4), unit(5), TREE_TRUNK);
        }
        TileKind::Flowers => {
            let petal = unit(2).max(1);
            for (fx, fy) in [(3, 4), (10, 3), (6, 10), (12, 12)] {
                canvas.fill_rect(sx + unit(fx), sy + unit(fy), petal, petal, accent);
            }
        }
        TileKind::Water => {
            for row in [4, 11] {
                canvas.fill_rect(sx + unit(2 + shimmer), sy + unit(row), unit(6), 1, accent);
            }
        }
        TileKind::TallGrass => {
            for blade in 0..5 {
                let bx = sx + unit(1 + blade * 3);
                canvas.fill_rect(bx, sy + unit(3 + (blade + speckle) % 3), 1, unit(11), accent);
            }
        }
        TileKind::Rock => {
            canvas.outline_rect(sx + unit(2), sy + unit(3), unit(12), unit(11), 1, accent);
        }
        TileKind::Wall => {
            for row in [5, 10, 15] {
                canvas.fill_rect(sx, sy + unit(row), size, 1, accent);
            }
            canvas.fill_rect(sx + unit(8), sy, 1, unit(5), accent);
            canvas.fill_rect(sx + unit(4), sy + unit(5), 1, unit(5), accent);
            canvas.fill_rect(sx + unit(12), sy + unit(10), 1, unit(5), accent);
        }
    }
}

fn draw_actors(canvas: &mut Canvas<'_>, world: &World) {
    let mut actors: Vec<(&Actor, Rgba)> = Vec::with_capacity(world.npcs().len() + 1);
    actors.push((world.player(), PLAYER_SHIRT));
    for (index, npc) in world.npcs().iter().enumerate() {
        actors.push((npc.actor(), NPC_SHIRTS[index % NPC_SHIRTS.len()]));
    }
    // Painter's order: lower on screen draws later.
    actors.sort_by(|a, b| a.0.position().y.total_cmp(&b.0.position().y));

    for (actor, shirt) in actors {
        draw_actor(canvas, world.camera(), actor, shirt);
    }
}

fn draw_actor(canvas: &mut Canvas<'_>, camera: &Camera, actor: &Actor, shirt: Rgba) {
    let (x, y) = camera.world_to_screen(actor.position());
    let w = actor.size().x.round() as i32;
    let h = actor.size().y.round() as i32;
    if x + w < 0 || y + h < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
        return;
    }

    let (left_leg, right_leg) = match actor.animation_frame() {
        1 => (-1, 0),
        2 => (0, -1),
        _ => (0, 0),
    };

    canvas.fill_rect(x + 2, y + h - 1, w - 4, 2, SHADOW);
    canvas.fill_rect(x + 3, y + h - 3 + left_leg, 2, 2, SHOES);
    canvas.fill_rect(x + w - 5, y + h - 3 + right_leg, 2, 2, SHOES);
    canvas.fill_rect(x + 2, y + 8, w - 4, 2, PANTS);
    canvas.fill_rect(x + 1, y + 5, w - 2, 3, shirt);
    canvas.fill_rect(x + 3, y + 1, w - 6, 4, SKIN);
    canvas.fill_rect(x + 3, y, w - 6, 1, HAIR);

    match actor.facing() {
        Facing::Down => {
            canvas.put_pixel(x + 4, y + 2, EYES);
            canvas.put_pixel(x + w - 5, y + 2, EYES);
        }
        Facing::Up => canvas.fill_rect(x + 3, y, w - 6, 4, HAIR),
        Facing::Left => {
            canvas.fill_rect(x + w - 5, y, 2, 3, HAIR);
            canvas.put_pixel(x + 3, y + 2, EYES);
        }
        Facing::Right => {
            canvas.fill_rect(x + 3, y, 2, 3, HAIR);
            canvas.put_pixel(x + w - 4, y + 2, EYES);
        }
    }
}

fn draw_dialogue(canvas: &mut Canvas<'_>, world: &World, time_ms: u64) {
    let dialogue = world.dialogue();
    if !dialogue.is_open() {
        return;
    }
    let (x, y, w, h) = dialogue_box_rect(canvas.width(), canvas.height());
    canvas.fill_rect(x, y, w, h, DIALOGUE_FILL);
    canvas.outline_rect(x, y, w, h, DIALOGUE_BORDER_PX, DIALOGUE_BORDER);

    let columns = ((w - DIALOGUE_TEXT_INSET_PX * 2) / GLYPH_ADVANCE).max(1) as usize;
    let max_lines = ((h - DIALOGUE_TEXT_TOP_PX * 2) / LINE_ADVANCE).max(1) as usize;
    let text_x = x + DIALOGUE_TEXT_INSET_PX;
    let mut text_y = y + DIALOGUE_TEXT_TOP_PX;
    for line in wrap_text(dialogue.revealed_text(), columns)
        .iter()
        .take(max_lines)
    {
        canvas.draw_text(text_x, text_y, line, DIALOGUE_TEXT);
        text_y += LINE_ADVANCE;
    }

    if dialogue.is_waiting() && (time_ms / BLINK_PERIOD_MS) % 2 == 0 {
        canvas.fill_rect(x + w - 10, y + h - 10, 4, 4, DIALOGUE_BORDER);
    }
}

fn dialogue_box_rect(width: u32, height: u32) -> (i32, i32, i32, i32) {
    let w = (width as i32 - DIALOGUE_MARGIN_PX * 2).max(1);
    let h = DIALOGUE_HEIGHT_PX.min(height as i32);
    let y = (height as i32 - h - DIALOGUE_MARGIN_PX).max(0);
    (DIALOGUE_MARGIN_PX, y, w, h)
}

fn draw_pause_overlay(canvas: &mut Canvas<'_>) {
    let width = canvas.width() as i32;
    let height = canvas.height() as i32;
    canvas.fill_rect(0, 0, width, height, PAUSE_DIM);
    let label = "PAUSED";
    canvas.draw_text(
        (width - text_width(label)) / 2,
        (height - GLYPH_HEIGHT) / 2,
        label,
        PAUSE_TEXT,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{InputAction, InputSnapshot, MovementMode, Npc, TileMap, WorldConfig};

    const WIDTH: u32 = 240;
    const HEIGHT: u32 = 160;

    fn world() -> World {
        let map = TileMap::filled(20, 12, 16, TileKind::Grass);
        let player = Actor::at_tile(TileCoord::new(5, 5), 16, MovementMode::continuous());
        let npc = Npc::new(
            "elder",
            Actor::at_tile(TileCoord::new(5, 4), 16, MovementMode::continuous()),
            vec!["Hello traveler!".to_string()],
        );
        World::new(map, player, vec![npc], WorldConfig::default())
    }

    fn render(world: &World, time_ms: u64) -> Vec<u8> {
        let mut frame = vec![0u8; (WIDTH * HEIGHT * 4) as usize];
        let mut canvas = Canvas::new(&mut frame, WIDTH, HEIGHT);
        draw_world(&mut canvas, world, time_ms);
        frame
    }

    fn pixel(frame: &[u8], x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * WIDTH + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    #[test]
    fn closed_dialogue_draws_no_box() {
        let frame = render(&world(), 0);
        assert_ne!(pixel(&frame, 200, 140), DIALOGUE_FILL);
        assert_eq!(pixel(&frame, 200, 140)[3], 255);
    }

    #[test]
    fn open_dialogue_draws_box_with_border() {
        let mut world = world();
        world.update(16.0, &InputSnapshot::empty().with_action_down(InputAction::MoveUp, true));
        world.update(16.0, &InputSnapshot::empty().with_interact_pressed(true));
        assert!(world.dialogue().is_open());

        let frame = render(&world, 0);
        let (x, y, w, h) = dialogue_box_rect(WIDTH, HEIGHT);
        assert_eq!(pixel(&frame, 200, 140), DIALOGUE_FILL);
        assert_eq!(pixel(&frame, x as u32, y as u32), DIALOGUE_BORDER);
        assert_eq!(
            pixel(&frame, (x + w - 1) as u32, (y + h - 1) as u32),
            DIALOGUE_BORDER
        );
    }

    #[test]
    fn pause_dims_the_frame() {
        let mut world = world();
        let normal = render(&world, 0);
        world.update(16.0, &InputSnapshot::empty().with_pause_pressed(true));
        let paused = render(&world, 0);

        let before = pixel(&normal, 2, 2);
        let after = pixel(&paused, 2, 2);
        assert!(after[0] < before[0] || after[1] < before[1]);
    }

    #[test]
    fn dialogue_box_fits_small_frames() {
        let (x, y, w, h) = dialogue_box_rect(64, 32);
        assert!(x >= 0 && y >= 0);
        assert!(x + w <= 64);
        assert!(h <= 32);
    }
}
