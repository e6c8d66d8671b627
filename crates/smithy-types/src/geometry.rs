//! Integer block coordinates and face vectors.
//!
//! The world is a grid of unit blocks addressed by [`Position`]. Placement
//! targets are described as a reference block plus a [`FaceVector`] pointing at
//! the neighbouring cell that receives the new block.
//!
//! Positions serialize as a compact `[x, y, z]` triple so scenario files stay
//! readable.

use serde::{Deserialize, Serialize};

/// A block coordinate in the world grid.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "(i32, i32, i32)", into = "(i32, i32, i32)")]
pub struct Position {
    /// East-west axis.
    pub x: i32,
    /// Vertical axis; larger is higher.
    pub y: i32,
    /// North-south axis.
    pub z: i32,
}

impl Position {
    /// Create a position from its three coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Return the position shifted by the given deltas.
    ///
    /// Coordinates saturate at the `i32` bounds instead of wrapping.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            z: self.z.saturating_add(dz),
        }
    }

    /// Return the neighbouring cell in the direction of `face`.
    pub const fn step(self, face: FaceVector) -> Self {
        self.offset(face.dx, face.dy, face.dz)
    }

    /// Squared euclidean distance to `other`.
    pub fn distance_squared(self, other: Self) -> i64 {
        let dx = i64::from(self.x).saturating_sub(i64::from(other.x));
        let dy = i64::from(self.y).saturating_sub(i64::from(other.y));
        let dz = i64::from(self.z).saturating_sub(i64::from(other.z));
        dx.saturating_mul(dx)
            .saturating_add(dy.saturating_mul(dy))
            .saturating_add(dz.saturating_mul(dz))
    }

    /// Whether `other` lies within `radius` blocks (euclidean, inclusive).
    pub fn is_within(self, other: Self, radius: u32) -> bool {
        let r = i64::from(radius);
        self.distance_squared(other) <= r.saturating_mul(r)
    }
}

impl From<(i32, i32, i32)> for Position {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self { x, y, z }
    }
}

impl From<Position> for (i32, i32, i32) {
    fn from(p: Position) -> Self {
        (p.x, p.y, p.z)
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A unit direction from a reference block to one of its six neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceVector {
    /// X component.
    pub dx: i32,
    /// Y component.
    pub dy: i32,
    /// Z component.
    pub dz: i32,
}

impl FaceVector {
    /// The top face: place on top of the reference block.
    pub const UP: Self = Self { dx: 0, dy: 1, dz: 0 };
    /// The bottom face.
    pub const DOWN: Self = Self { dx: 0, dy: -1, dz: 0 };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_and_step() {
        let p = Position::new(1, 64, -3);
        assert_eq!(p.offset(1, -1, 0), Position::new(2, 63, -3));
        assert_eq!(p.step(FaceVector::UP), Position::new(1, 65, -3));
        assert_eq!(p.step(FaceVector::DOWN), Position::new(1, 63, -3));
    }

    #[test]
    fn offset_saturates() {
        let p = Position::new(i32::MAX, 0, i32::MIN);
        assert_eq!(p.offset(1, 0, -1), p);
    }

    #[test]
    fn distance_and_radius() {
        let a = Position::new(0, 0, 0);
        let b = Position::new(3, 0, 4);
        assert_eq!(a.distance_squared(b), 25);
        assert!(a.is_within(b, 5));
        assert!(!a.is_within(b, 4));
    }

    #[test]
    fn serializes_as_triple() {
        let p = Position::new(5, 1, -2);
        let json = serde_json::to_string(&p).unwrap_or_default();
        assert_eq!(json, "[5,1,-2]");
        let back: Result<Position, _> = serde_json::from_str("[5,1,-2]");
        assert_eq!(back.ok(), Some(p));
    }
}
