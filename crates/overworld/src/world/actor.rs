use super::collision::{can_occupy, move_axis_separated};
use super::geometry::{Facing, Rect, TileCoord, Vec2};
use super::input::MoveIntent;
use super::tilemap::TileMap;

pub const DEFAULT_ACTOR_SIZE: Vec2 = Vec2 { x: 12.0, y: 12.0 };
pub const DEFAULT_WALK_SPEED_PX_PER_MS: f32 = 0.12;
pub const DEFAULT_STEP_PX: f32 = 16.0;
pub const DEFAULT_STEP_DURATION_MS: f32 = 160.0;
pub const WALK_FRAME_COUNT: u8 = 3;
pub const WALK_FRAME_INTERVAL_MS: f32 = 150.0;
const MIN_STEP_DURATION_MS: f32 = 1.0;

/// How an actor turns intent into displacement. Both disciplines share the
/// same collision and animation rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementMode {
    /// Free pixel movement at a fixed speed; diagonals are normalized.
    Continuous { speed_px_per_ms: f32 },
    /// One committed step at a time, interpolated over a fixed duration.
    GridStepped { step_px: f32, step_duration_ms: f32 },
}

impl MovementMode {
    pub const fn continuous() -> Self {
        MovementMode::Continuous {
            speed_px_per_ms: DEFAULT_WALK_SPEED_PX_PER_MS,
        }
    }

    pub const fn grid_stepped() -> Self {
        MovementMode::GridStepped {
            step_px: DEFAULT_STEP_PX,
            step_duration_ms: DEFAULT_STEP_DURATION_MS,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            MovementMode::Continuous { .. } => "continuous",
            MovementMode::GridStepped { .. } => "grid_stepped",
        }
    }
}

impl Default for MovementMode {
    fn default() -> Self {
        Self::continuous()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementState {
    Idle,
    Moving,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Idle,
    Walking,
    Stepping {
        origin: Vec2,
        destination: Vec2,
        progress: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkAnimation {
    frame: u8,
    timer_ms: f32,
    frame_count: u8,
    frame_interval_ms: f32,
}

impl Default for WalkAnimation {
    fn default() -> Self {
        Self::new(WALK_FRAME_COUNT, WALK_FRAME_INTERVAL_MS)
    }
}

impl WalkAnimation {
    pub fn new(frame_count: u8, frame_interval_ms: f32) -> Self {
        Self {
            frame: 0,
            timer_ms: 0.0,
            frame_count: frame_count.max(1),
            frame_interval_ms,
        }
    }

    pub fn frame(&self) -> u8 {
        self.frame
    }

    pub fn timer_ms(&self) -> f32 {
        self.timer_ms
    }

    pub fn tick(&mut self, moving: bool, dt_ms: f32) {
        if !moving {
            self.reset();
            return;
        }
        self.timer_ms += dt_ms;
        if self.timer_ms > self.frame_interval_ms {
            self.timer_ms = 0.0;
            self.frame = (self.frame + 1) % self.frame_count;
        }
    }

    pub fn reset(&mut self) {
        self.frame = 0;
        self.timer_ms = 0.0;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActorTick {
    pub moved: bool,
    pub blocked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    position: Vec2,
    size: Vec2,
    facing: Facing,
    movement: MovementMode,
    motion: Motion,
    animation: WalkAnimation,
}

impl Actor {
    pub fn new(position: Vec2, movement: MovementMode) -> Self {
        Self {
            position,
            size: DEFAULT_ACTOR_SIZE,
            facing: Facing::Down,
            movement,
            motion: Motion::Idle,
            animation: WalkAnimation::default(),
        }
    }

    pub fn at_tile(tile: TileCoord, tile_size: u32, movement: MovementMode) -> Self {
        Self::new(tile.origin_px(tile_size), movement)
    }

    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn movement_mode(&self) -> MovementMode {
        self.movement
    }

    pub fn animation_frame(&self) -> u8 {
        self.animation.frame()
    }

    pub fn animation(&self) -> &WalkAnimation {
        &self.animation
    }

    pub fn movement_state(&self) -> MovementState {
        match self.motion {
            Motion::Idle => MovementState::Idle,
            Motion::Walking | Motion::Stepping { .. } => MovementState::Moving,
        }
    }

    /// Destination and progress in `[0,1]` of an in-flight grid step.
    pub fn step_target(&self) -> Option<(Vec2, f32)> {
        match self.motion {
            Motion::Stepping {
                destination,
                progress,
                ..
            } => Some((destination, progress)),
            _ => None,
        }
    }

    pub fn occupied_tile(&self, tile_size: u32) -> TileCoord {
        TileCoord::from_point(self.center(), tile_size)
    }

    /// Places the actor without collision checks and drops any motion.
    pub fn teleport(&mut self, position: Vec2, facing: Facing) {
        self.position = position;
        self.facing = facing;
        self.motion = Motion::Idle;
        self.animation.reset();
    }

    pub fn update(&mut self, intent: MoveIntent, dt_ms: f32, tile_map: &TileMap) -> ActorTick {
        let dt_ms = dt_ms.max(0.0);
        let tick = match self.movement {
            MovementMode::Continuous { speed_px_per_ms } => {
                self.update_continuous(intent, speed_px_per_ms * dt_ms, tile_map)
            }
            MovementMode::GridStepped {
                step_px,
                step_duration_ms,
            } => self.update_grid_stepped(intent, step_px, step_duration_ms, dt_ms, tile_map),
        };
        self.animation.tick(tick.moved, dt_ms);
        tick
    }

    fn update_continuous(
        &mut self,
        intent: MoveIntent,
        distance: f32,
        tile_map: &TileMap,
    ) -> ActorTick {
        let Some(facing) = Facing::from_intent(intent.x, intent.y) else {
            self.motion = Motion::Idle;
            return ActorTick::default();
        };
        self.facing = facing;

        let (dir_x, dir_y) = normalized(intent);
        let delta = Vec2::new(dir_x * distance, dir_y * distance);
        let start = self.position;
        let outcome = move_axis_separated(start, self.size, delta, tile_map);
        self.position = outcome.position;

        let moved = outcome.moved_from(start);
        self.motion = if moved { Motion::Walking } else { Motion::Idle };
        ActorTick {
            moved,
            blocked: outcome.blocked_x || outcome.blocked_y,
        }
    }

    fn update_grid_stepped(
        &mut self,
        intent: MoveIntent,
        step_px: f32,
        step_duration_ms: f32,
        dt_ms: f32,
        tile_map: &TileMap,
    ) -> ActorTick {
        let mut blocked = false;
        if matches!(self.motion, Motion::Idle | Motion::Walking) {
            self.motion = Motion::Idle;
            if let Some(facing) = single_axis_facing(intent) {
                self.facing = facing;
                let (ux, uy) = facing.unit();
                let destination = Vec2::new(
                    self.position.x + ux as f32 * step_px,
                    self.position.y + uy as f32 * step_px,
                );
                if can_occupy(Rect::new(destination, self.size), tile_map) {
                    self.motion = Motion::Stepping {
                        origin: self.position,
                        destination,
                        progress: 0.0,
                    };
                } else {
                    blocked = true;
                }
            }
        }

        let Motion::Stepping {
            origin,
            destination,
            progress,
        } = self.motion
        else {
            return ActorTick {
                moved: false,
                blocked,
            };
        };

        let next_progress = (progress + dt_ms / step_duration_ms.max(MIN_STEP_DURATION_MS)).min(1.0);
        if next_progress >= 1.0 {
            self.position = destination;
            self.motion = Motion::Idle;
        } else {
            self.position = origin.lerp(destination, next_progress);
            self.motion = Motion::Stepping {
                origin,
                destination,
                progress: next_progress,
            };
        }
        ActorTick {
            moved: true,
            blocked,
        }
    }
}

fn normalized(intent: MoveIntent) -> (f32, f32) {
    let x = intent.x as f32;
    let y = intent.y as f32;
    let len_sq = x * x + y * y;
    if len_sq <= 0.0 {
        return (0.0, 0.0);
    }
    let inv_len = len_sq.sqrt().recip();
    (x * inv_len, y * inv_len)
}

/// Grid steps accept one axis at a time; horizontal wins when both are held.
fn single_axis_facing(intent: MoveIntent) -> Option<Facing> {
    if intent.x != 0 {
        Facing::from_intent(intent.x, 0)
    } else {
        Facing::from_intent(0, intent.y)
    }
}
