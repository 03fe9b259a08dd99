use serde::{Deserialize, Serialize};

use crate::region::Rect;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CursorConfig {
    /// Side length of the square selection box.
    pub box_size: u32,
    /// Pixels moved per key press.
    pub step: u32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            box_size: 50,
            step: 10,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Fixed-size selection square that never leaves the picture.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CursorBox {
    x: u32,
    y: u32,
    size: u32,
}

impl CursorBox {
    pub fn new(size: u32) -> Self {
        Self { x: 0, y: 0, size }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.size, self.y + self.size)
    }

    /// Translates by `(dx, dy)`, clamped so the box stays inside `bounds` (width, height).
    pub fn move_by(&mut self, dx: i64, dy: i64, bounds: (u32, u32)) {
        let max_x = bounds.0.saturating_sub(self.size) as i64;
        let max_y = bounds.1.saturating_sub(self.size) as i64;
        self.x = (self.x as i64 + dx).clamp(0, max_x) as u32;
        self.y = (self.y as i64 + dy).clamp(0, max_y) as u32;
    }

    pub fn step(&mut self, direction: Direction, step: u32, bounds: (u32, u32)) {
        let step = step as i64;
        let (dx, dy) = match direction {
            Direction::Up => (0, -step),
            Direction::Down => (0, step),
            Direction::Left => (-step, 0),
            Direction::Right => (step, 0),
        };
        self.move_by(dx, dy, bounds);
    }
}
