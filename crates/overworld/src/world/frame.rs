use std::time::{Duration, Instant};

use tracing::debug;

pub const DEFAULT_MAX_FRAME_DELTA: Duration = Duration::from_millis(32);

/// Wall-clock frame delta source. Each `tick` returns the time since the
/// previous one, capped so a stall never becomes a teleport.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    last_instant: Instant,
    max_frame_delta: Duration,
    clamped_frames: u64,
}

impl FrameTimer {
    pub fn new(max_frame_delta: Duration) -> Self {
        Self::starting_at(Instant::now(), max_frame_delta)
    }

    pub fn starting_at(start: Instant, max_frame_delta: Duration) -> Self {
        Self {
            last_instant: start,
            max_frame_delta: normalize_non_zero_duration(max_frame_delta, DEFAULT_MAX_FRAME_DELTA),
            clamped_frames: 0,
        }
    }

    pub fn max_frame_delta(&self) -> Duration {
        self.max_frame_delta
    }

    pub fn clamped_frames(&self) -> u64 {
        self.clamped_frames
    }

    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Duration {
        let raw = now.saturating_duration_since(self.last_instant);
        self.last_instant = now;
        let clamped = clamp_frame_delta(raw, self.max_frame_delta);
        if clamped < raw {
            self.clamped_frames = self.clamped_frames.saturating_add(1);
            debug!(
                raw_frame_ms = raw.as_millis() as u64,
                max_frame_delta_ms = self.max_frame_delta.as_millis() as u64,
                "frame_delta_clamped"
            );
        }
        clamped
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_DELTA)
    }
}

pub fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

/// Millisecond form used by the simulation. Negative and non-finite input
/// collapses to zero.
pub fn clamp_frame_delta_ms(dt_ms: f32, max_frame_delta_ms: f32) -> f32 {
    if !dt_ms.is_finite() || dt_ms <= 0.0 {
        return 0.0;
    }
    dt_ms.min(max_frame_delta_ms.max(0.0))
}

pub fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
