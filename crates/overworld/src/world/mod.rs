mod actor;
mod camera;
mod collision;
mod dialogue;
mod frame;
mod geometry;
mod input;
mod interaction;
mod session;
mod tilemap;

pub use actor::{
    Actor, ActorTick, MovementMode, MovementState, WalkAnimation, DEFAULT_ACTOR_SIZE,
    DEFAULT_STEP_DURATION_MS, DEFAULT_STEP_PX, DEFAULT_WALK_SPEED_PX_PER_MS, WALK_FRAME_COUNT,
    WALK_FRAME_INTERVAL_MS,
};
pub use camera::{
    Camera, TileRectInclusive, Viewport, GBA_VIEWPORT_HEIGHT, GBA_VIEWPORT_WIDTH,
};
pub use collision::{
    can_occupy, can_occupy_with_inset, move_axis_separated, AxisMoveOutcome, COLLISION_INSET_PX,
};
pub use dialogue::{wrap_text, DialogueController, DialogueState, DEFAULT_CHAR_INTERVAL_MS};
pub use frame::{
    clamp_frame_delta, clamp_frame_delta_ms, normalize_non_zero_duration, FrameTimer,
    DEFAULT_MAX_FRAME_DELTA,
};
pub use geometry::{Facing, Rect, TileCoord, Vec2};
pub use input::{InputAction, InputSnapshot, MoveIntent};
pub(crate) use input::ActionStates;
pub use interaction::{facing_tile, try_interact, Interactable, Npc};
pub use session::{
    PlayerSnapshot, SpawnPoint, TickReport, World, WorldConfig,
    DEFAULT_ENCOUNTER_CHANCE_PER_MILLE, DEFAULT_ENCOUNTER_CHECK_INTERVAL_MS,
};
pub use tilemap::{TileKind, TileMap, TileMapError, DEFAULT_TILE_SIZE_PX};
