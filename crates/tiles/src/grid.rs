use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tile::TileDescriptor;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid size must be at least 1")]
    Empty,
    #[error("expected {expected} tile columns, found {found}")]
    ColumnCount { expected: usize, found: usize },
    #[error("tile column {column} has {found} entries, expected {expected}")]
    ColumnLength {
        column: usize,
        expected: usize,
        found: usize,
    },
}

/// Wire layout of a grid: `tiles[x][y]` with `wSIZE + 1` entries per axis.
#[derive(Serialize, Deserialize)]
pub struct GridFile {
    #[serde(rename = "wSIZE")]
    size: usize,
    tiles: Vec<Vec<TileDescriptor>>,
}

/// A square grid of `(size + 1)²` tile descriptors.
///
/// Descriptors sit on grid vertices; cell `(x, y)` spans the four descriptors
/// `(x..=x+1, y..=y+1)`, so only `x, y < size` form complete cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridFile", into = "GridFile")]
pub struct TileGrid {
    size: usize,
    tiles: Vec<TileDescriptor>,
}

impl TryFrom<GridFile> for TileGrid {
    type Error = GridError;

    fn try_from(file: GridFile) -> Result<Self, Self::Error> {
        TileGrid::from_columns(file.size, file.tiles)
    }
}

impl From<TileGrid> for GridFile {
    fn from(grid: TileGrid) -> Self {
        let side = grid.size + 1;
        let mut tiles = grid.tiles.into_iter();
        let columns = (0..side)
            .map(|_| tiles.by_ref().take(side).collect())
            .collect();
        GridFile {
            size: grid.size,
            tiles: columns,
        }
    }
}

impl TileGrid {
    /// Grid of default descriptors. Panics when `size` is 0.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "tile grid size must be at least 1");
        let side = size + 1;
        Self {
            size,
            tiles: vec![TileDescriptor::default(); side * side],
        }
    }

    /// Builds a grid from x-major columns, validating every dimension.
    pub fn from_columns(
        size: usize,
        columns: Vec<Vec<TileDescriptor>>,
    ) -> Result<Self, GridError> {
        if size == 0 {
            return Err(GridError::Empty);
        }
        let side = size + 1;
        if columns.len() != side {
            return Err(GridError::ColumnCount {
                expected: side,
                found: columns.len(),
            });
        }
        if let Some((column, col)) = columns.iter().enumerate().find(|(_, c)| c.len() != side) {
            return Err(GridError::ColumnLength {
                column,
                expected: side,
                found: col.len(),
            });
        }
        Ok(Self {
            size,
            tiles: columns.into_iter().flatten().collect(),
        })
    }

    /// Number of cells per axis (`wSIZE`).
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        x * (self.size + 1) + y
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x <= self.size && y <= self.size
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&TileDescriptor> {
        if self.in_bounds(x, y) {
            Some(&self.tiles[self.index(x, y)])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut TileDescriptor> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.tiles[idx])
        } else {
            None
        }
    }

    /// Descriptor at `(x, y)`. Panics outside the grid.
    #[inline]
    pub fn tile(&self, x: usize, y: usize) -> &TileDescriptor {
        assert!(self.in_bounds(x, y), "tile ({x}, {y}) outside grid");
        &self.tiles[self.index(x, y)]
    }

    #[inline]
    pub fn tile_mut(&mut self, x: usize, y: usize) -> &mut TileDescriptor {
        assert!(self.in_bounds(x, y), "tile ({x}, {y}) outside grid");
        let idx = self.index(x, y);
        &mut self.tiles[idx]
    }

    /// Every descriptor with its grid coordinates, x-major.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &TileDescriptor)> {
        let side = self.size + 1;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, tile)| (i / side, i % side, tile))
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut TileDescriptor> {
        self.tiles.iter_mut()
    }

    /// Coordinates of every complete cell, x-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let size = self.size;
        (0..size).flat_map(move |x| (0..size).map(move |y| (x, y)))
    }

    #[inline]
    pub fn elevation(&self, x: usize, y: usize) -> f32 {
        self.tile(x, y).ground_height()
    }

    /// Wraps world coordinates onto a cell index, `floor(v) mod size`.
    fn wrap(&self, v: f32) -> usize {
        (v.floor() as i64).rem_euclid(self.size as i64) as usize
    }

    /// Terrain height at continuous grid coordinates.
    ///
    /// The cell is picked by wrapping the floored coordinates modulo the grid
    /// size. A tile override is returned unchanged; otherwise the four corner
    /// elevations are blended bilinearly with the fractional parts of `x` and
    /// `y`.
    pub fn height_at(&self, x: f32, y: f32) -> f32 {
        let xx = self.wrap(x);
        let yy = self.wrap(y);

        if let Some(h) = self.tile(xx, yy).elevation_override {
            return h;
        }

        let xxp = (xx + 1).min(self.size);
        let yyp = (yy + 1).min(self.size);

        let p0 = self.elevation(xx, yy);
        let p1 = self.elevation(xxp, yy);
        let p2 = self.elevation(xx, yyp);
        let p3 = self.elevation(xxp, yyp);

        let px = 1.0 - x.fract_positive();
        let py = 1.0 - y.fract_positive();

        let h0 = p0 * px + p1 * (1.0 - px);
        let h1 = p2 * px + p3 * (1.0 - px);
        h0 * py + h1 * (1.0 - py)
    }

    /// The four raw corner elevations of the wrapped cell, ordered
    /// `[(x, y), (x+1, y), (x, y+1), (x+1, y+1)]`.
    pub fn tile_heights(&self, x: f32, y: f32) -> [f32; 4] {
        let xx = self.wrap(x);
        let yy = self.wrap(y);
        [
            self.elevation(xx, yy),
            self.elevation(xx + 1, yy),
            self.elevation(xx, yy + 1),
            self.elevation(xx + 1, yy + 1),
        ]
    }

    /// Descriptor at the floored coordinates, `None` outside the grid.
    pub fn tile_at(&self, x: f32, y: f32) -> Option<&TileDescriptor> {
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        self.get(x.floor() as usize, y.floor() as usize)
    }
}

trait FractPositive {
    fn fract_positive(self) -> Self;
}

impl FractPositive for f32 {
    /// Fractional part in `[0, 1)`, also for negative values.
    #[inline]
    fn fract_positive(self) -> f32 {
        self - self.floor()
    }
}
