//! 2D point/vector value type
//!
//! Points are plain `Copy` values; equality is tolerance-based because
//! intersection arithmetic accumulates rounding error.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::doubles_equal;
use crate::error::{PhysicsError, PhysicsResult};

/// A point (or free vector) in 2D space
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Point(DVec2);

/// Velocities are free vectors measured in units per second
pub type Velocity = Point;

impl Point {
    pub const ZERO: Self = Self(DVec2::ZERO);

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }

    /// Checked constructor for coordinates coming from outside the core
    pub fn try_new(x: f64, y: f64) -> PhysicsResult<Self> {
        if x.is_finite() && y.is_finite() {
            Ok(Self::new(x, y))
        } else {
            Err(PhysicsError::NonFinite { x, y })
        }
    }

    /// Vector of the given length pointing at `angle` radians
    pub fn from_angle_and_speed(angle: f64, speed: f64) -> Self {
        Self(DVec2::from_angle(angle) * speed)
    }

    #[inline]
    pub fn x(self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn y(self) -> f64 {
        self.0.y
    }

    #[inline]
    pub fn as_dvec2(self) -> DVec2 {
        self.0
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    pub fn distance(self, other: Point) -> f64 {
        self.0.distance(other.0)
    }

    #[inline]
    pub fn dot(self, other: Point) -> f64 {
        self.0.dot(other.0)
    }

    /// Z component of the 3D cross product
    #[inline]
    pub fn cross(self, other: Point) -> f64 {
        self.0.perp_dot(other.0)
    }

    /// Magnitude (speed, for velocities)
    #[inline]
    pub fn length(self) -> f64 {
        self.0.length()
    }

    /// Direction in radians, measured from the positive x axis
    pub fn angle(self) -> f64 {
        self.0.y.atan2(self.0.x)
    }

    /// Unit vector in the same direction; the zero vector stays zero
    #[inline]
    pub fn normalize(self) -> Self {
        Self(self.0.normalize_or_zero())
    }

    /// Counter-clockwise perpendicular (-y, x)
    #[inline]
    pub fn perp(self) -> Self {
        Self(self.0.perp())
    }

    /// Velocity scaled down to a single tick of `dt` seconds
    #[inline]
    pub fn per_step(self, dt: f64) -> Self {
        self * dt
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        doubles_equal(self.0.x, other.0.x) && doubles_equal(self.0.y, other.0.y)
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Self(v)
    }
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self {
        p.0
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point(self.0 + rhs.0)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.0 += rhs.0;
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point(self.0 - rhs.0)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point(self.0 * rhs)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_tolerant_equality() {
        assert_eq!(Point::new(1.0, 2.0), Point::new(1.000_001, 1.999_999));
        assert_ne!(Point::new(1.0, 2.0), Point::new(1.001, 2.0));
    }

    #[test]
    fn test_distance() {
        let d = Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_zero_stays_zero() {
        let n = Point::ZERO.normalize();
        assert_eq!(n, Point::ZERO);
        assert!(n.is_finite());
    }

    #[test]
    fn test_from_angle_and_speed() {
        let v = Point::from_angle_and_speed(FRAC_PI_2, 10.0);
        assert_eq!(v, Point::new(0.0, 10.0));
        assert!((v.angle() - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_cross_sign() {
        let a = Point::new(1.0, 0.0);
        let b = Point::new(0.0, 1.0);
        assert!(a.cross(b) > 0.0);
        assert!(b.cross(a) < 0.0);
        assert_eq!(a.cross(a * 3.0), 0.0);
    }

    #[test]
    fn test_try_new_rejects_nan() {
        assert!(Point::try_new(1.0, 2.0).is_ok());
        assert!(matches!(
            Point::try_new(f64::NAN, 0.0),
            Err(PhysicsError::NonFinite { .. })
        ));
        assert!(Point::try_new(0.0, f64::INFINITY).is_err());
    }
}
