use bevy::math::{Vec2, Vec3};
use tiles::Orientation;

/// Corner of a cell, named by its grid offset from the cell origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    /// `(x, y)`
    TopLeft,
    /// `(x + 1, y)`
    TopRight,
    /// `(x, y + 1)`
    BottomLeft,
    /// `(x + 1, y + 1)`
    BottomRight,
}

impl Corner {
    pub const fn offset(self) -> (usize, usize) {
        match self {
            Corner::TopLeft => (0, 0),
            Corner::TopRight => (1, 0),
            Corner::BottomLeft => (0, 1),
            Corner::BottomRight => (1, 1),
        }
    }

    /// Texture coordinate of the corner, equal to its offset.
    pub fn uv(self) -> Vec2 {
        let (dx, dy) = self.offset();
        Vec2::new(dx as f32, dy as f32)
    }

    /// Grid coordinates of this corner of cell `(x, y)`.
    pub const fn tile(self, x: usize, y: usize) -> (usize, usize) {
        let (dx, dy) = self.offset();
        (x + dx, y + dy)
    }

    /// World position of this corner of cell `(x, y)` at `height`.
    pub fn position(self, x: usize, y: usize, height: f32) -> Vec3 {
        let (gx, gy) = self.tile(x, y);
        Vec3::new(gx as f32, height, gy as f32)
    }
}

use Corner::*;

/// The two triangles of a cell for its orientation, texture1 half first.
pub const fn split(orientation: Orientation) -> [[Corner; 3]; 2] {
    match orientation {
        Orientation::DiagA => [[TopLeft, BottomLeft, BottomRight], [TopLeft, BottomRight, TopRight]],
        Orientation::DiagB => [[TopLeft, BottomLeft, TopRight], [TopRight, BottomLeft, BottomRight]],
    }
}
