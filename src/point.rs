// Copyright 2025 the Glyphtrace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Points in real-valued and exact-pixel space.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::Vec2;

/// A point in the image plane.
///
/// Coordinates follow the image frame: x grows to the right, y grows down.
#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// The x coordinate.
    pub x: f64,
    /// The y coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new `Point` with the provided `x` and `y` coordinates.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// The vector from the origin to this point.
    #[inline]
    pub const fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// The point a fraction `t` of the way to `other`.
    #[inline]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        self + t * (other - self)
    }

    /// The point halfway to `other`.
    #[inline]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new(0.5 * (self.x + other.x), 0.5 * (self.y + other.y))
    }

    /// Euclidean distance.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self - other).hypot()
    }

    /// Squared Euclidean distance.
    #[inline]
    pub fn distance_squared(self, other: Point) -> f64 {
        (self - other).hypot2()
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from((x, y): (f64, f64)) -> Point {
        Point::new(x, y)
    }
}

impl From<IntPoint> for Point {
    #[inline]
    fn from(p: IntPoint) -> Point {
        p.to_point()
    }
}

impl Add<Vec2> for Point {
    type Output = Point;

    #[inline]
    fn add(self, v: Vec2) -> Point {
        Point::new(self.x + v.x, self.y + v.y)
    }
}

impl AddAssign<Vec2> for Point {
    #[inline]
    fn add_assign(&mut self, v: Vec2) {
        *self = *self + v;
    }
}

impl Sub<Vec2> for Point {
    type Output = Point;

    #[inline]
    fn sub(self, v: Vec2) -> Point {
        Point::new(self.x - v.x, self.y - v.y)
    }
}

impl SubAssign<Vec2> for Point {
    #[inline]
    fn sub_assign(&mut self, v: Vec2) {
        *self = *self - v;
    }
}

impl Sub<Point> for Point {
    type Output = Vec2;

    #[inline]
    fn sub(self, other: Point) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

/// Formats as `(x, y)`, passing the precision on to both coordinates.
impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(precision) => write!(f, "({:.*}, {:.*})", precision, self.x, precision, self.y),
            None => write!(f, "({}, {})", self.x, self.y),
        }
    }
}

/// A point on the integer pixel-corner lattice.
///
/// Exact boundaries live here: the pixel at column `x`, row `y` is the unit
/// square from `(x, y)` to `(x + 1, y + 1)`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntPoint {
    /// The x coordinate.
    pub x: i32,
    /// The y coordinate.
    pub y: i32,
}

impl IntPoint {
    /// The point (0, 0).
    pub const ZERO: IntPoint = IntPoint::new(0, 0);

    /// Create a new `IntPoint`.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        IntPoint { x, y }
    }

    /// Convert to a real-valued point.
    #[inline]
    pub fn to_point(self) -> Point {
        Point::new(f64::from(self.x), f64::from(self.y))
    }

    /// The larger of the absolute coordinate values.
    ///
    /// For an axis-aligned step this is its length.
    #[inline]
    pub fn chebyshev_len(self) -> i32 {
        self.x.abs().max(self.y.abs())
    }

    /// Component-wise sign, mapping an axis-aligned step to its unit direction.
    #[inline]
    pub fn signum(self) -> IntPoint {
        IntPoint::new(self.x.signum(), self.y.signum())
    }
}

impl From<(i32, i32)> for IntPoint {
    #[inline]
    fn from((x, y): (i32, i32)) -> IntPoint {
        IntPoint::new(x, y)
    }
}

impl Add for IntPoint {
    type Output = IntPoint;

    #[inline]
    fn add(self, other: IntPoint) -> IntPoint {
        IntPoint::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign for IntPoint {
    #[inline]
    fn add_assign(&mut self, other: IntPoint) {
        *self = *self + other;
    }
}

impl Sub for IntPoint {
    type Output = IntPoint;

    #[inline]
    fn sub(self, other: IntPoint) -> IntPoint {
        IntPoint::new(self.x - other.x, self.y - other.y)
    }
}

impl fmt::Debug for IntPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp, reason = "distances in these tests are exact")]

    use super::*;

    #[test]
    fn point_arithmetic() {
        assert_eq!(
            Point::new(0., 0.) - Vec2::new(10., 0.),
            Point::new(-10., 0.)
        );
        assert_eq!(
            Point::new(0., 0.) - Point::new(-5., 101.),
            Vec2::new(5., -101.)
        );
    }

    #[test]
    fn distance() {
        let p1 = Point::new(0., 10.);
        let p2 = Point::new(0., 5.);
        assert_eq!(p1.distance(p2), 5.);

        let p1 = Point::new(-11., 1.);
        let p2 = Point::new(-7., -2.);
        assert_eq!(p1.distance(p2), 5.);
    }

    #[test]
    fn display() {
        let p = Point::new(0.12345, 9.87654);
        assert_eq!(format!("{}", p), "(0.12345, 9.87654)");
        assert_eq!(format!("{:.2}", p), "(0.12, 9.88)");
    }

    #[test]
    fn int_point_steps() {
        let step = IntPoint::new(0, -7);
        assert_eq!(step.chebyshev_len(), 7);
        assert_eq!(step.signum(), IntPoint::new(0, -1));
        assert_eq!(IntPoint::new(2, 3) - IntPoint::new(1, 1), IntPoint::new(1, 2));
        assert_eq!(IntPoint::new(2, -3).to_point(), Point::new(2., -3.));
    }
}
