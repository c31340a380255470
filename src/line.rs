// Copyright 2025 the Glyphtrace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line segments.

use crate::{Point, Vec2};

/// A single line segment of a polygon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    /// The line's start point.
    pub p0: Point,
    /// The line's end point.
    pub p1: Point,
}

impl Line {
    /// Create a new line.
    #[inline]
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Line {
        Line {
            p0: p0.into(),
            p1: p1.into(),
        }
    }

    /// The length of the line.
    #[inline]
    pub fn length(self) -> f64 {
        self.p0.distance(self.p1)
    }

    /// The midpoint of the line.
    #[inline]
    pub fn midpoint(self) -> Point {
        self.p0.midpoint(self.p1)
    }

    /// The direction vector from start to end.
    #[inline]
    pub fn delta(self) -> Vec2 {
        self.p1 - self.p0
    }

    /// Signed area contribution of the line, by Green's theorem.
    #[inline]
    pub fn signed_area(self) -> f64 {
        self.p0.to_vec2().cross(self.p1.to_vec2()) * 0.5
    }

    /// Find the nearest position on the line to `p`.
    ///
    /// Returns the parameter `t` in `0..=1` and the squared distance.
    pub fn nearest(self, p: Point) -> (f64, f64) {
        let d = self.p1 - self.p0;
        let dotp = d.dot(p - self.p0);
        let d_squared = d.dot(d);
        if dotp <= 0.0 {
            (0.0, (p - self.p0).hypot2())
        } else if dotp >= d_squared {
            (1.0, (p - self.p1).hypot2())
        } else {
            let t = dotp / d_squared;
            let dist = (p - self.p0.lerp(self.p1, t)).hypot2();
            (t, dist)
        }
    }

    /// Euclidean distance from `p` to the closest point of the segment.
    #[inline]
    pub fn distance(self, p: Point) -> f64 {
        self.nearest(p).1.sqrt()
    }

    /// Winding contribution of the line for a ray cast from `p` towards -x.
    pub fn winding(self, p: Point) -> i32 {
        let start = self.p0;
        let end = self.p1;
        let sign = if end.y > start.y {
            if p.y < start.y || p.y >= end.y {
                return 0;
            }
            -1
        } else if end.y < start.y {
            if p.y < end.y || p.y >= start.y {
                return 0;
            }
            1
        } else {
            return 0;
        };
        if p.x < start.x.min(end.x) {
            return 0;
        }
        if p.x >= start.x.max(end.x) {
            return sign;
        }
        // line equation ax + by = c
        let a = end.y - start.y;
        let b = start.x - end.x;
        let c = a * start.x + b * start.y;
        if (a * p.x + b * p.y - c) * f64::from(sign) <= 0.0 {
            sign
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_midpoint() {
        let l = Line::new((0.0, 0.0), (2.0, 4.0));
        assert_eq!(l.midpoint(), Point::new(1.0, 2.0));
    }

    #[test]
    fn line_nearest() {
        const EPSILON: f64 = 1e-9;

        let line = Line::new((-4., 0.), (2., 1.));

        // Projects onto the line segment end point.
        let point = Point::new(4., 0.);
        let nearest = line.nearest(point);
        assert_eq!(nearest.0, 1.);
        assert!((nearest.1 - line.p1.distance_squared(point)).abs() < EPSILON);

        // Projects onto the line segment start point.
        let point = Point::new(0., -50.);
        let nearest = line.nearest(point);
        assert_eq!(nearest.0, 0.);
        assert!((nearest.1 - line.p0.distance_squared(point)).abs() < EPSILON);

        let horizontal = Line::new((0., 0.), (4., 0.));
        assert!((horizontal.distance(Point::new(1., 3.)) - 3.).abs() < EPSILON);
    }

    #[test]
    fn line_winding_is_half_open() {
        let up = Line::new((1., 2.), (1., 0.));
        assert_eq!(up.winding(Point::new(2., 1.)), 1);
        assert_eq!(up.winding(Point::new(0., 1.)), 0);
        // The lower end point is excluded, the upper one included.
        assert_eq!(up.winding(Point::new(2., 2.)), 0);
        assert_eq!(up.winding(Point::new(2., 0.)), 1);
        assert_eq!(up.winding(Point::new(2., 0.)) + Line::new((1., 0.), (1., 2.)).winding(Point::new(2., 0.)), 0);
    }

    #[test]
    fn diagonal_winding_counts_points_to_the_right() {
        let down = Line::new((0., 0.), (1., 1.));
        assert_eq!(down.winding(Point::new(0.2, 0.5)), 0);
        assert_eq!(down.winding(Point::new(0.8, 0.5)), -1);
        let up = Line::new((1., 1.), (0., 0.));
        assert_eq!(up.winding(Point::new(0.2, 0.5)), 0);
        assert_eq!(up.winding(Point::new(0.8, 0.5)), 1);
    }
}
