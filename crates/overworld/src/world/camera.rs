use super::actor::Actor;
use super::geometry::{TileCoord, Vec2};
use super::tilemap::TileMap;

pub const GBA_VIEWPORT_WIDTH: u32 = 240;
pub const GBA_VIEWPORT_HEIGHT: u32 = 160;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: GBA_VIEWPORT_WIDTH,
            height: GBA_VIEWPORT_HEIGHT,
        }
    }
}

/// Inclusive range of tiles intersecting the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRectInclusive {
    pub x_min: u32,
    pub x_max: u32,
    pub y_min: u32,
    pub y_max: u32,
}

/// Viewport origin in world pixels. Derived state: recomputed from the
/// followed actor every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    origin: Vec2,
    viewport: Viewport,
    smoothing: Option<f32>,
}

impl Camera {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            origin: Vec2::ZERO,
            viewport,
            smoothing: None,
        }
    }

    /// Eases toward the clamped target by `factor` per tick instead of
    /// snapping. Values outside `(0,1]` disable smoothing.
    pub fn with_smoothing(mut self, factor: Option<f32>) -> Self {
        self.smoothing = factor.filter(|value| value.is_finite() && *value > 0.0 && *value <= 1.0);
        self
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn follow(&mut self, actor: &Actor, tile_map: &TileMap) -> Vec2 {
        let target = clamped_origin(actor.center(), self.viewport, tile_map);
        self.origin = match self.smoothing {
            Some(factor) => self.origin.lerp(target, factor),
            None => target,
        };
        self.origin
    }

    /// Jumps straight to the clamped target regardless of smoothing.
    pub fn snap_to(&mut self, actor: &Actor, tile_map: &TileMap) -> Vec2 {
        self.origin = clamped_origin(actor.center(), self.viewport, tile_map);
        self.origin
    }

    pub fn world_to_screen(&self, world: Vec2) -> (i32, i32) {
        (
            (world.x - self.origin.x).floor() as i32,
            (world.y - self.origin.y).floor() as i32,
        )
    }

    pub fn visible_tiles(&self, tile_map: &TileMap) -> Option<TileRectInclusive> {
        if tile_map.width() == 0 || tile_map.height() == 0 {
            return None;
        }
        let size = tile_map.tile_size();
        let top_left = TileCoord::from_point(self.origin, size);
        let bottom_right = TileCoord::from_point(
            Vec2::new(
                self.origin.x + self.viewport.width as f32 - 1.0,
                self.origin.y + self.viewport.height as f32 - 1.0,
            ),
            size,
        );

        let x_min = top_left.x.max(0);
        let y_min = top_left.y.max(0);
        let x_max = bottom_right.x.min(tile_map.width() as i32 - 1);
        let y_max = bottom_right.y.min(tile_map.height() as i32 - 1);
        if x_min > x_max || y_min > y_max {
            return None;
        }
        Some(TileRectInclusive {
            x_min: x_min as u32,
            x_max: x_max as u32,
            y_min: y_min as u32,
            y_max: y_max as u32,
        })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

fn clamped_origin(focus: Vec2, viewport: Viewport, tile_map: &TileMap) -> Vec2 {
    let target_x = focus.x - viewport.width as f32 * 0.5;
    let target_y = focus.y - viewport.height as f32 * 0.5;
    let max_x = (tile_map.pixel_width() - viewport.width as f32).max(0.0);
    let max_y = (tile_map.pixel_height() - viewport.height as f32).max(0.0);
    Vec2 {
        x: clamp_axis(target_x, max_x),
        y: clamp_axis(target_y, max_y),
    }
}

fn clamp_axis(value: f32, max: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::actor::MovementMode;
    use crate::world::tilemap::TileKind;

    fn actor_at(x: f32, y: f32) -> Actor {
        Actor::new(Vec2::new(x, y), MovementMode::continuous())
    }

    #[test]
    fn follow_centers_actor_when_away_from_edges() {
        let map = TileMap::filled(50, 40, 16, TileKind::Grass);
        let mut camera = Camera::default();
        let actor = actor_at(394.0, 314.0);
        let origin = camera.follow(&actor, &map);
        assert_eq!(origin, Vec2::new(400.0 - 120.0, 320.0 - 80.0));
    }

    #[test]
    fn origin_is_clamped_for_all_positions() {
        let map = TileMap::filled(30, 20, 16, TileKind::Grass);
        let mut camera = Camera::default();
        let max_x = map.pixel_width() - 240.0;
        let max_y = map.pixel_height() - 160.0;
        let mut y = 0.0;
        while y < map.pixel_height() {
            let mut x = 0.0;
            while x < map.pixel_width() {
                let origin = camera.follow(&actor_at(x, y), &map);
                assert!(origin.x >= 0.0 && origin.x <= max_x, "x {}", origin.x);
                assert!(origin.y >= 0.0 && origin.y <= max_y, "y {}", origin.y);
                x += 7.0;
            }
            y += 7.0;
        }
    }

    #[test]
    fn map_smaller_than_viewport_pins_origin() {
        let map = TileMap::filled(10, 5, 16, TileKind::Grass);
        let mut camera = Camera::default();
        for (x, y) in [(0.0, 0.0), (140.0, 60.0), (70.0, 30.0)] {
            assert_eq!(camera.follow(&actor_at(x, y), &map), Vec2::ZERO);
        }
    }

    #[test]
    fn pins_only_the_short_axis() {
        let map = TileMap::filled(40, 5, 16, TileKind::Grass);
        let mut camera = Camera::default();
        let origin = camera.follow(&actor_at(300.0, 40.0), &map);
        assert_eq!(origin.y, 0.0);
        assert!(origin.x > 0.0);
    }

    #[test]
    fn smoothing_eases_but_stays_clamped() {
        let map = TileMap::filled(50, 40, 16, TileKind::Grass);
        let mut camera = Camera::default().with_smoothing(Some(0.1));
        let actor = actor_at(600.0, 500.0);
        let first = camera.follow(&actor, &map);
        let target = Camera::default().snap_to(&actor, &map);
        assert!(first.x > 0.0 && first.x < target.x);
        for _ in 0..500 {
            camera.follow(&actor, &map);
        }
        assert!((camera.origin().x - target.x).abs() < 0.01);
    }

    #[test]
    fn invalid_smoothing_is_ignored() {
        let camera = Camera::default().with_smoothing(Some(1.5));
        assert_eq!(camera, Camera::default());
    }

    #[test]
    fn visible_tiles_cover_viewport() {
        let map = TileMap::filled(50, 40, 16, TileKind::Grass);
        let mut camera = Camera::default();
        camera.follow(&actor_at(394.0, 314.0), &map);
        let rect = camera.visible_tiles(&map).expect("rect");
        assert_eq!(rect.x_min, 17);
        assert_eq!(rect.x_max, 32);
        assert_eq!(rect.y_min, 15);
        assert_eq!(rect.y_max, 24);
    }

    #[test]
    fn world_to_screen_subtracts_origin() {
        let map = TileMap::filled(50, 40, 16, TileKind::Grass);
        let mut camera = Camera::default();
        camera.follow(&actor_at(394.0, 314.0), &map);
        assert_eq!(camera.world_to_screen(Vec2::new(290.0, 250.0)), (10, 10));
    }
}
