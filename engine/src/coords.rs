#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// An integer tile position on the isometric grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coords {
    pub x: i32,
    pub y: i32,
}

impl Coords {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The grid origin.
    #[must_use]
    pub const fn zero() -> Self {
        Self { x: 0, y: 0 }
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self == Self::zero()
    }

    /// Manhattan distance between two tiles.
    #[must_use]
    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }

    /// Component-wise minimum.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self { x: self.x.min(other.x), y: self.y.min(other.y) }
    }

    /// Component-wise maximum.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self { x: self.x.max(other.x), y: self.y.max(other.y) }
    }
}

// Saturates at the i32 bounds.
impl Add for Coords {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { x: self.x.saturating_add(rhs.x), y: self.y.saturating_add(rhs.y) }
    }
}

impl Sub for Coords {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x.saturating_sub(rhs.x), y: self.y.saturating_sub(rhs.y) }
    }
}

/// A point in screen space (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

/// Width and height in tile units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// An axis-aligned tile rectangle given by two opposite corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileRect {
    pub from: Coords,
    pub to: Coords,
}

impl TileRect {
    #[must_use]
    pub fn new(from: Coords, to: Coords) -> Self {
        Self { from, to }
    }

    /// Whether `tile` lies inside the rectangle, edges included.
    ///
    /// The corner order does not matter.
    #[must_use]
    pub fn contains(&self, tile: Coords) -> bool {
        let lo = self.from.min(self.to);
        let hi = self.from.max(self.to);
        tile.x >= lo.x && tile.x <= hi.x && tile.y >= lo.y && tile.y <= hi.y
    }

    /// The four corners in order: `from`, `(to.x, from.y)`, `to`, `(from.x, to.y)`.
    #[must_use]
    pub fn corners(&self) -> [Coords; 4] {
        [
            self.from,
            Coords::new(self.to.x, self.from.y),
            self.to,
            Coords::new(self.from.x, self.to.y),
        ]
    }
}
