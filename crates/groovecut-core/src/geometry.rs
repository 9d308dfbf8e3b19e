//! Cylindrical and cartesian coordinates
//!
//! Stateless conversions between the two systems plus midpoint and distance
//! helpers. Angles are in radians. At radius 0 the angle is whatever `atan2`
//! returns, which matches the physical degeneracy at the disc centre.

use serde::{Deserialize, Serialize};

/// A point in cylindrical coordinates (radius, angle, elevation).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CylPoint {
    /// Distance from the axis (mm)
    pub radius: f64,
    /// Angle around the axis (rad)
    pub angle: f64,
    /// Position along the axis (mm)
    pub elevation: f64,
}

impl CylPoint {
    pub fn new(radius: f64, angle: f64, elevation: f64) -> Self {
        Self {
            radius,
            angle,
            elevation,
        }
    }

    /// Convert to cartesian coordinates
    pub fn to_cartesian(&self) -> CartPoint {
        let (x, y, z) = cyl_to_cart(self.radius, self.angle, self.elevation);
        CartPoint::new(x, y, z)
    }
}

/// A point in cartesian coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CartPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert to cylindrical coordinates
    pub fn to_cylindrical(&self) -> CylPoint {
        let (r, angle, z) = cart_to_cyl(self.x, self.y, self.z);
        CylPoint::new(r, angle, z)
    }
}

/// Cylindrical to cartesian: `x = r·cos(a)`, `y = r·sin(a)`, `z` unchanged.
#[inline]
pub fn cyl_to_cart(radius: f64, angle: f64, elevation: f64) -> (f64, f64, f64) {
    (radius * angle.cos(), radius * angle.sin(), elevation)
}

/// Cartesian to cylindrical. The returned angle lies in `(-π, π]`.
#[inline]
pub fn cart_to_cyl(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    (x.hypot(y), y.atan2(x), z)
}

/// Componentwise average of two points.
pub fn midpoint(a: CartPoint, b: CartPoint) -> CartPoint {
    CartPoint::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0, (a.z + b.z) / 2.0)
}

/// Euclidean distance between two cartesian points.
pub fn distance_cart(a: CartPoint, b: CartPoint) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Euclidean distance between two cylindrical points, measured in cartesian space.
pub fn distance_cyl(a: CylPoint, b: CylPoint) -> f64 {
    distance_cart(a.to_cartesian(), b.to_cartesian())
}
