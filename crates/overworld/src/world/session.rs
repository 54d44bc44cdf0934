use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::actor::{Actor, MovementMode};
use super::camera::{Camera, Viewport};
use super::collision::{can_occupy, COLLISION_INSET_PX};
use super::dialogue::{DialogueController, DEFAULT_CHAR_INTERVAL_MS};
use super::frame::{clamp_frame_delta_ms, DEFAULT_MAX_FRAME_DELTA};
use super::geometry::{Facing, Rect, Vec2};
use super::input::{InputSnapshot, MoveIntent};
use super::interaction::{try_interact, Npc};
use super::tilemap::{TileKind, TileMap};

pub const DEFAULT_ENCOUNTER_CHECK_INTERVAL_MS: f32 = 1000.0;
pub const DEFAULT_ENCOUNTER_CHANCE_PER_MILLE: u32 = 50;
const PER_MILLE: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldConfig {
    pub max_frame_delta_ms: f32,
    pub char_interval_ms: f32,
    pub viewport: Viewport,
    pub camera_smoothing: Option<f32>,
    /// Minimum time in tall grass between two encounter rolls.
    pub encounter_check_interval_ms: f32,
    /// Chance of a roll succeeding, out of 1000.
    pub encounter_chance_per_mille: u32,
    pub encounter_seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            max_frame_delta_ms: DEFAULT_MAX_FRAME_DELTA.as_millis() as f32,
            char_interval_ms: DEFAULT_CHAR_INTERVAL_MS,
            viewport: Viewport::default(),
            camera_smoothing: None,
            encounter_check_interval_ms: DEFAULT_ENCOUNTER_CHECK_INTERVAL_MS,
            encounter_chance_per_mille: DEFAULT_ENCOUNTER_CHANCE_PER_MILLE,
            encounter_seed: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub position: Vec2,
    pub facing: Facing,
}

/// Persistable slice of player state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSnapshot {
    pub x: f32,
    pub y: f32,
    pub facing: Facing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    pub dt_ms: f32,
    pub moved: bool,
    pub paused: bool,
    pub reset: bool,
    pub dialogue_started: bool,
    pub dialogue_closed: bool,
    /// The player box overlaps at least one tall grass tile.
    pub in_tall_grass: bool,
    pub encounter: bool,
}

/// The whole overworld session: map, actors, camera and dialogue, advanced
/// together by one `update` per frame.
#[derive(Debug, Clone)]
pub struct World {
    tile_map: TileMap,
    player: Actor,
    npcs: Vec<Npc>,
    camera: Camera,
    dialogue: DialogueController,
    config: WorldConfig,
    paused: bool,
    spawn: SpawnPoint,
    encounter_rng: StdRng,
    since_encounter_check_ms: f32,
}

impl World {
    pub fn new(tile_map: TileMap, player: Actor, npcs: Vec<Npc>, config: WorldConfig) -> Self {
        let spawn = SpawnPoint {
            position: player.position(),
            facing: player.facing(),
        };
        let mut camera = Camera::new(config.viewport).with_smoothing(config.camera_smoothing);
        camera.snap_to(&player, &tile_map);
        if !can_occupy(player.bounds(), &tile_map) {
            warn!(
                x = spawn.position.x,
                y = spawn.position.y,
                "player_spawn_overlaps_solid_tiles"
            );
        }
        info!(
            width = tile_map.width(),
            height = tile_map.height(),
            npc_count = npcs.len(),
            movement_mode = player.movement_mode().name(),
            "world_built"
        );
        Self {
            tile_map,
            player,
            npcs,
            camera,
            dialogue: DialogueController::new(config.char_interval_ms),
            config,
            paused: false,
            spawn,
            encounter_rng: StdRng::seed_from_u64(config.encounter_seed),
            since_encounter_check_ms: config.encounter_check_interval_ms,
        }
    }

    pub fn tile_map(&self) -> &TileMap {
        &self.tile_map
    }

    pub fn player(&self) -> &Actor {
        &self.player
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn dialogue(&self) -> &DialogueController {
        &self.dialogue
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn spawn(&self) -> SpawnPoint {
        self.spawn
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn update(&mut self, dt_ms: f32, input: &InputSnapshot) -> TickReport {
        let dt_ms = clamp_frame_delta_ms(dt_ms, self.config.max_frame_delta_ms);
        let mut report = TickReport {
            dt_ms,
            ..TickReport::default()
        };

        if input.pause_pressed() {
            self.paused = !self.paused;
            info!(paused = self.paused, "pause_toggled");
        }
        if self.paused {
            report.paused = true;
            return report;
        }

        if input.reset_pressed() {
            self.reset_player();
            report.reset = true;
        }

        if self.dialogue.is_open() {
            self.dialogue.update(dt_ms);
            if input.interact_pressed() || input.advance_pressed() {
                self.dialogue.advance();
                if !self.dialogue.is_open() {
                    report.dialogue_closed = true;
                    info!("dialogue_closed");
                }
            }
            // Lets an in-flight grid step land while the box is up.
            report.moved = self
                .player
                .update(MoveIntent::NONE, dt_ms, &self.tile_map)
                .moved;
        } else {
            report.moved = self
                .player
                .update(input.move_intent(), dt_ms, &self.tile_map)
                .moved;
            if input.interact_pressed() {
                report.dialogue_started = self.interact();
            }
        }

        for npc in &mut self.npcs {
            npc.actor_mut()
                .update(MoveIntent::NONE, dt_ms, &self.tile_map);
        }

        report.in_tall_grass = self.player_in_tall_grass();
        if !self.dialogue.is_open() {
            report.encounter = self.roll_encounter(dt_ms, report.in_tall_grass);
        }

        self.camera.follow(&self.player, &self.tile_map);
        report
    }

    /// Mid-step the destination is reported, so a grid actor is always
    /// saved on a grid cell.
    pub fn player_snapshot(&self) -> PlayerSnapshot {
        let position = self
            .player
            .step_target()
            .map_or(self.player.position(), |(destination, _)| destination);
        PlayerSnapshot {
            x: position.x,
            y: position.y,
            facing: self.player.facing(),
        }
    }

    /// Moves the player to a saved position. Grid-stepped players are
    /// snapped to the nearest cell first. Falls back to the spawn point when
    /// the saved box cannot be occupied on this map.
    pub fn restore_player(&mut self, snapshot: PlayerSnapshot) -> bool {
        let finite = snapshot.x.is_finite() && snapshot.y.is_finite();
        let position = match self.player.movement_mode() {
            MovementMode::GridStepped { step_px, .. } if step_px > 0.0 => Vec2::new(
                (snapshot.x / step_px).round() * step_px,
                (snapshot.y / step_px).round() * step_px,
            ),
            _ => Vec2::new(snapshot.x, snapshot.y),
        };
        if finite && can_occupy(Rect::new(position, self.player.size()), &self.tile_map) {
            self.player.teleport(position, snapshot.facing);
            self.camera.snap_to(&self.player, &self.tile_map);
            info!(
                x = position.x,
                y = position.y,
                facing = snapshot.facing.as_str(),
                "player_restored"
            );
            return true;
        }
        warn!(
            x = snapshot.x,
            y = snapshot.y,
            "saved_position_blocked_using_spawn"
        );
        self.reset_player();
        false
    }

    pub fn reset_player(&mut self) {
        self.player.teleport(self.spawn.position, Facing::Down);
        self.camera.snap_to(&self.player, &self.tile_map);
        info!(
            x = self.spawn.position.x,
            y = self.spawn.position.y,
            "player_reset_to_spawn"
        );
    }

    fn player_in_tall_grass(&self) -> bool {
        self.player
            .bounds()
            .inset(COLLISION_INSET_PX)
            .corners()
            .iter()
            .any(|corner| {
                let tile = self.tile_map.tile_coord_of(*corner);
                self.tile_map.tile_at(tile) == Some(TileKind::TallGrass)
            })
    }

    /// At most one roll per check interval, and only while in tall grass.
    fn roll_encounter(&mut self, dt_ms: f32, in_tall_grass: bool) -> bool {
        let interval_ms = self.config.encounter_check_interval_ms.max(0.0);
        self.since_encounter_check_ms = (self.since_encounter_check_ms + dt_ms).min(interval_ms);
        if !in_tall_grass || self.since_encounter_check_ms < interval_ms {
            return false;
        }
        self.since_encounter_check_ms = 0.0;
        let roll = self.encounter_rng.gen_range(0..PER_MILLE);
        let hit = roll < self.config.encounter_chance_per_mille;
        if hit {
            let tile = self.player.occupied_tile(self.tile_map.tile_size());
            info!(tile_x = tile.x, tile_y = tile.y, "wild_encounter");
        }
        hit
    }

    fn interact(&mut self) -> bool {
        let Some(pages) = try_interact(&self.player, &self.npcs, &self.tile_map) else {
            debug!(facing = self.player.facing().as_str(), "interact_found_nothing");
            return false;
        };
        let started = self.dialogue.start(pages);
        if started {
            info!(page_count = self.dialogue.page_count(), "dialogue_started");
        }
        started
    }
}
