// Copyright 2025 the Glyphtrace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed cubic Bézier splines.

use std::fmt;
use std::hash::{DefaultHasher, Hasher};

use crate::{BoundingBox, ContourPoint, LineContour, Outline, Point};

/// A single cubic Bézier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicBez {
    /// The start point.
    pub p0: Point,
    /// The first control point.
    pub p1: Point,
    /// The second control point.
    pub p2: Point,
    /// The end point.
    pub p3: Point,
}

impl CubicBez {
    /// Create a new cubic Bézier segment.
    #[inline]
    pub fn new<P: Into<Point>>(p0: P, p1: P, p2: P, p3: P) -> CubicBez {
        CubicBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
            p3: p3.into(),
        }
    }

    /// Evaluate the curve at parameter `t`.
    ///
    /// Generally `t` is in the range `0..=1`.
    #[inline]
    pub fn eval(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let v = self.p0.to_vec2() * (mt * mt * mt)
            + (self.p1.to_vec2() * (mt * mt * 3.0)
                + (self.p2.to_vec2() * (mt * 3.0) + self.p3.to_vec2() * t) * t)
                * t;
        v.to_point()
    }
}

/// One segment of a [`CubicContour`].
///
/// The segment starts at the `end` of the previous node.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicNode {
    /// Control point near the start of the segment.
    pub ctrl1: Point,
    /// Control point near the end of the segment.
    pub ctrl2: Point,
    /// End point of the segment.
    pub end: Point,
}

impl CubicNode {
    /// Create a new node.
    #[inline]
    pub fn new(ctrl1: impl Into<Point>, ctrl2: impl Into<Point>, end: impl Into<Point>) -> Self {
        CubicNode {
            ctrl1: ctrl1.into(),
            ctrl2: ctrl2.into(),
            end: end.into(),
        }
    }

    fn map(self, f: impl Fn(Point) -> Point) -> Self {
        CubicNode {
            ctrl1: f(self.ctrl1),
            ctrl2: f(self.ctrl2),
            end: f(self.end),
        }
    }
}

/// A closed spline of cubic segments.
#[derive(Clone)]
pub struct CubicContour {
    nodes: Vec<CubicNode>,
    hash: u64,
    bounds: BoundingBox<Point>,
}

impl CubicContour {
    /// Create a contour from its nodes.
    pub fn new(nodes: Vec<CubicNode>) -> Self {
        let mut hasher = DefaultHasher::new();
        hasher.write_usize(nodes.len());
        let mut points = Vec::with_capacity(nodes.len() * 3);
        for node in &nodes {
            for p in [node.ctrl1, node.ctrl2, node.end] {
                p.hash_coords(&mut hasher);
                points.push(p);
            }
        }
        CubicContour {
            bounds: BoundingBox::from_points(&points),
            nodes,
            hash: hasher.finish(),
        }
    }

    /// The nodes.
    #[inline]
    pub fn nodes(&self) -> &[CubicNode] {
        &self.nodes
    }

    /// The number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the contour has no segments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The segments as Bézier curves, each starting where the previous ends.
    pub fn segments(&self) -> impl Iterator<Item = CubicBez> + '_ {
        let n = self.nodes.len();
        (0..n).map(move |i| {
            let start = self.nodes[(i + n - 1) % n].end;
            let node = self.nodes[i];
            CubicBez::new(start, node.ctrl1, node.ctrl2, node.end)
        })
    }

    /// A polygon sampling every segment at `steps` evenly spaced parameters.
    pub fn flatten(&self, steps: usize) -> LineContour {
        let steps = steps.max(1);
        self.segments()
            .flat_map(|seg| {
                (1..=steps).map(move |i| seg.eval(i as f64 / steps as f64))
            })
            .collect()
    }
}

impl PartialEq for CubicContour {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.nodes == other.nodes
    }
}

impl fmt::Debug for CubicContour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CubicContour").field(&self.nodes).finish()
    }
}

impl Outline for CubicContour {
    type Point = Point;

    fn structural_hash(&self) -> u64 {
        self.hash
    }

    /// The bounds of the control polygon, which encloses the curve.
    fn bounds(&self) -> BoundingBox<Point> {
        self.bounds
    }

    fn translate(&self, offset: Point) -> Self {
        CubicContour::new(
            self.nodes
                .iter()
                .map(|node| node.map(|p| p.translate(offset)))
                .collect(),
        )
    }

    fn untranslate(&self, offset: Point) -> Self {
        CubicContour::new(
            self.nodes
                .iter()
                .map(|node| node.map(|p| p.untranslate(offset)))
                .collect(),
        )
    }

    /// Rotate so that the node ending at the lexicographically smallest point
    /// comes first.
    fn standardize(&self) -> Self {
        let start = self
            .nodes
            .iter()
            .enumerate()
            .fold(0, |best, (i, node)| {
                if node.end.lexicographic_lt(self.nodes[best].end) {
                    i
                } else {
                    best
                }
            });
        let mut nodes = self.nodes[start..].to_vec();
        nodes.extend_from_slice(&self.nodes[..start]);
        CubicContour::new(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> CubicContour {
        CubicContour::new(vec![
            CubicNode::new((2., 0.), (3., 0.), (4., 2.)),
            CubicNode::new((4., 3.), (3., 4.), (2., 4.)),
            CubicNode::new((1., 4.), (0., 3.), (0., 2.)),
            CubicNode::new((0., 1.), (1., 0.), (2., 0.)),
        ])
    }

    #[test]
    fn eval_endpoints() {
        let c = CubicBez::new((0., 0.), (1., 2.), (3., 2.), (4., 0.));
        assert_eq!(c.eval(0.), Point::new(0., 0.));
        assert_eq!(c.eval(1.), Point::new(4., 0.));
        assert_eq!(c.eval(0.5), Point::new(2., 1.5));
    }

    #[test]
    fn segments_are_closed() {
        let contour = diamond();
        let segments: Vec<_> = contour.segments().collect();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].p0, Point::new(2., 0.));
        for pair in segments.windows(2) {
            assert_eq!(pair[0].p3, pair[1].p0);
        }
        assert_eq!(contour.flatten(4).len(), 16);
    }

    #[test]
    fn standardize_and_translate() {
        let contour = diamond();
        let s = contour.standardize();
        assert_eq!(s.nodes()[0].end, Point::new(0., 2.));
        assert_eq!(s.standardize(), s);

        let offset = Point::new(3., 5.);
        let moved = contour.translate(offset);
        assert_eq!(moved.bounds().origin(), Point::new(3., 5.));
        assert_eq!(moved.untranslate(offset), contour);
    }
}
