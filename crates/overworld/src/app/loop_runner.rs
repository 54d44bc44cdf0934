use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{debug, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::content::ContentError;
use crate::world::{
    normalize_non_zero_duration, FrameTimer, PlayerSnapshot, World, DEFAULT_MAX_FRAME_DELTA,
};
use crate::StartupError;

use super::input::InputCollector;
use super::rendering::Renderer;

pub const DEFAULT_WINDOW_SCALE: u32 = 3;
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(5);
const MAX_WINDOW_SCALE: u32 = 8;

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    /// Integer upscale of the logical viewport for the initial window size.
    pub scale: u32,
    pub max_frame_delta: Duration,
    pub autosave_interval: Duration,
    /// Quantize every presented frame to 5 bits per channel.
    pub bgr555: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Overworld".to_string(),
            scale: DEFAULT_WINDOW_SCALE,
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA,
            autosave_interval: DEFAULT_AUTOSAVE_INTERVAL,
            bgr555: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to load overworld content: {0}")]
    Content(#[from] ContentError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Where the loop hands player state for safekeeping. Errors are reported
/// as messages and never stop the loop.
pub trait PersistenceHook {
    fn save(&mut self, snapshot: PlayerSnapshot) -> Result<(), String>;

    /// Forgets stored state after the player is reset to spawn.
    fn clear(&mut self) -> Result<(), String> {
        Ok(())
    }
}

/// Decides when an autosave is due. Unchanged snapshots are not rewritten.
#[derive(Debug, Clone)]
pub struct AutosaveTimer {
    interval: Duration,
    last_check: Instant,
    last_saved: Option<PlayerSnapshot>,
}

impl AutosaveTimer {
    pub fn starting_at(start: Instant, interval: Duration) -> Self {
        Self {
            interval: normalize_non_zero_duration(interval, DEFAULT_AUTOSAVE_INTERVAL),
            last_check: start,
            last_saved: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the snapshot to write when the interval has elapsed and the
    /// player state differs from the last successful save.
    pub fn poll(&mut self, now: Instant, current: PlayerSnapshot) -> Option<PlayerSnapshot> {
        if now.saturating_duration_since(self.last_check) < self.interval {
            return None;
        }
        self.last_check = now;
        (self.last_saved != Some(current)).then_some(current)
    }

    pub fn mark_saved(&mut self, snapshot: PlayerSnapshot) {
        self.last_saved = Some(snapshot);
    }

    pub fn mark_cleared(&mut self) {
        self.last_saved = None;
    }
}

pub fn run_app(
    config: LoopConfig,
    mut world: World,
    mut persistence: Option<Box<dyn PersistenceHook>>,
) -> Result<(), AppError> {
    let viewport = world.config().viewport;
    let scale = config.scale.clamp(1, MAX_WINDOW_SCALE);

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                (viewport.width * scale) as f64,
                (viewport.height * scale) as f64,
            ))
            .with_min_inner_size(LogicalSize::new(
                viewport.width as f64,
                viewport.height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer =
        Renderer::new(window, viewport, config.bgr555).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let started = Instant::now();
    let mut frame_timer = FrameTimer::starting_at(started, config.max_frame_delta);
    let mut autosave = AutosaveTimer::starting_at(started, config.autosave_interval);
    let mut input_collector = InputCollector::default();

    info!(
        viewport_width = viewport.width,
        viewport_height = viewport.height,
        scale,
        max_frame_delta_ms = frame_timer.max_frame_delta().as_millis() as u64,
        autosave_interval_ms = autosave.interval().as_millis() as u64,
        bgr555 = config.bgr555,
        persistence = persistence.is_some(),
        "loop_config"
    );

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == renderer.window().id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        info!(reason = "window_close", "shutdown_requested");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                        }
                    }
                    WindowEvent::ScaleFactorChanged { .. } => {
                        let size = renderer.window().inner_size();
                        if let Err(error) = renderer.resize(size.width, size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                        }
                    }
                    WindowEvent::Focused(false) => {
                        input_collector.release_all();
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        input_collector.handle_key(event.physical_key, event.state);
                        if input_collector.quit_requested {
                            info!(reason = "escape_key", "shutdown_requested");
                            window_target.exit();
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        let frame_dt = frame_timer.tick_at(now);
                        let input_snapshot = input_collector.snapshot_for_tick();
                        let report =
                            world.update(frame_dt.as_secs_f32() * 1000.0, &input_snapshot);

                        if let Some(hook) = persistence.as_deref_mut() {
                            if report.reset {
                                match hook.clear() {
                                    Ok(()) => autosave.mark_cleared(),
                                    Err(error) => warn!(error = %error, "player_save_clear_failed"),
                                }
                            }
                            if let Some(snapshot) = autosave.poll(now, world.player_snapshot()) {
                                save_snapshot(hook, &mut autosave, snapshot, "autosave");
                            }
                        }

                        let time_ms = now.saturating_duration_since(started).as_millis() as u64;
                        if let Err(error) = renderer.render(&world, time_ms) {
                            warn!(error = %error, "renderer_draw_failed");
                            window_target.exit();
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                renderer.window().request_redraw();
            }
            Event::LoopExiting => {
                if let Some(hook) = persistence.as_deref_mut() {
                    save_snapshot(hook, &mut autosave, world.player_snapshot(), "exit");
                }
                info!(
                    clamped_frames = frame_timer.clamped_frames(),
                    "shutdown"
                );
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

fn save_snapshot(
    hook: &mut dyn PersistenceHook,
    autosave: &mut AutosaveTimer,
    snapshot: PlayerSnapshot,
    reason: &'static str,
) {
    match hook.save(snapshot) {
        Ok(()) => {
            autosave.mark_saved(snapshot);
            debug!(reason, x = snapshot.x, y = snapshot.y, "player_saved");
        }
        Err(error) => warn!(reason, error = %error, "player_save_failed"),
    }
}
