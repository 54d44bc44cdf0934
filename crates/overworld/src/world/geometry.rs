use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, target: Vec2, t: f32) -> Vec2 {
        Vec2 {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
        }
    }
}

/// Integer tile coordinate. Signed so that neighbours of edge tiles can be
/// expressed; anything outside the map is simply solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, facing: Facing) -> TileCoord {
        let (dx, dy) = facing.unit();
        TileCoord {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn from_point(point: Vec2, tile_size: u32) -> TileCoord {
        let size = tile_size.max(1) as f32;
        TileCoord {
            x: (point.x / size).floor() as i32,
            y: (point.y / size).floor() as i32,
        }
    }

    pub fn origin_px(self, tile_size: u32) -> Vec2 {
        Vec2 {
            x: self.x as f32 * tile_size as f32,
            y: self.y as f32 * tile_size as f32,
        }
    }
}

/// Axis-aligned box in pixel space, `position` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub position: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    pub fn center(&self) -> Vec2 {
        Vec2 {
            x: self.position.x + self.size.x * 0.5,
            y: self.position.y + self.size.y * 0.5,
        }
    }

    pub fn inset(&self, margin: f32) -> Rect {
        let margin_x = margin.min(self.size.x * 0.5).max(0.0);
        let margin_y = margin.min(self.size.y * 0.5).max(0.0);
        Rect {
            position: Vec2 {
                x: self.position.x + margin_x,
                y: self.position.y + margin_y,
            },
            size: Vec2 {
                x: self.size.x - margin_x * 2.0,
                y: self.size.y - margin_y * 2.0,
            },
        }
    }

    pub fn corners(&self) -> [Vec2; 4] {
        let left = self.position.x;
        let top = self.position.y;
        let right = self.position.x + self.size.x;
        let bottom = self.position.y + self.size.y;
        [
            Vec2::new(left, top),
            Vec2::new(right, top),
            Vec2::new(left, bottom),
            Vec2::new(right, bottom),
        ]
    }
}

/// Screen-space facing. Y grows downward, matching the tile grid rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    #[default]
    Down,
    Up,
    Left,
    Right,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::Down, Facing::Up, Facing::Left, Facing::Right];

    pub const fn unit(self) -> (i32, i32) {
        match self {
            Facing::Down => (0, 1),
            Facing::Up => (0, -1),
            Facing::Left => (-1, 0),
            Facing::Right => (1, 0),
        }
    }

    /// Facing for a raw intent vector. The dominant component wins and an
    /// exact tie resolves to the horizontal axis.
    pub fn from_intent(x: i8, y: i8) -> Option<Facing> {
        if x == 0 && y == 0 {
            return None;
        }
        if x.unsigned_abs() >= y.unsigned_abs() {
            Some(if x < 0 { Facing::Left } else { Facing::Right })
        } else {
            Some(if y < 0 { Facing::Up } else { Facing::Down })
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Facing::Down => "down",
            Facing::Up => "up",
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }

    pub fn parse(raw: &str) -> Option<Facing> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "down" => Some(Facing::Down),
            "up" => Some(Facing::Up),
            "left" => Some(Facing::Left),
            "right" => Some(Facing::Right),
            _ => None,
        }
    }
}
