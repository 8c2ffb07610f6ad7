use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point in patient coordinates, millimetres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Snap this point to the whole-millimetre grid anchored at `origin`.
    ///
    /// The offset from `origin` is rounded per axis (ties to even) and the
    /// origin added back, so the result sits an integer number of
    /// millimetres away from `origin` on every axis.
    pub fn snap_to_grid(self, origin: Vector3) -> Self {
        let offset = self - origin;
        origin
            + Vector3::new(
                offset.x.round_ties_even(),
                offset.y.round_ties_even(),
                offset.z.round_ties_even(),
            )
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Jaw positions in millimetres, X1/Y1 negative side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JawRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl JawRect {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Field size along X.
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }
}

/// Margins around a structure's beam's-eye-view outline, millimetres.
///
/// Ordered like the jaws they push: `x1` is the left margin, `y1` the
/// bottom, `x2` the right and `y2` the top.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FitMargins {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl FitMargins {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }
}
