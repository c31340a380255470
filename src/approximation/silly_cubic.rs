// Copyright 2025 the Glyphtrace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::{Approximation, Exact};
use crate::{Contour, ContourPoint, CubicContour, CubicNode, Point};

/// A naive cubic spline through every other vertex of a polygon.
///
/// The even vertices become the points the curve passes near, the odd ones
/// the segment joints, and the tangents come from the neighboring even
/// vertices. Polygons with an odd vertex count first get an extra vertex in
/// the middle of their longest edge.
///
/// This is meant for exercising cubic output in tests and demos; the curves
/// can be far from the input.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SillyCubic<Pre = Exact> {
    preliminary: Pre,
}

impl SillyCubic {
    /// Create a spline fit working directly on its input.
    pub fn new() -> Self {
        SillyCubic { preliminary: Exact }
    }
}

impl<Pre> SillyCubic<Pre> {
    /// Run `preliminary` before fitting.
    pub fn with_preliminary<Q>(self, preliminary: Q) -> SillyCubic<Q> {
        SillyCubic { preliminary }
    }
}

impl<P, Q, Pre> Approximation<P> for SillyCubic<Pre>
where
    P: ContourPoint,
    Q: ContourPoint,
    Pre: Approximation<P, Output = Contour<Q>>,
{
    type Output = CubicContour;

    fn approximate_contour(&self, contour: &Contour<P>) -> CubicContour {
        let polygon = self.preliminary.approximate_contour(contour);
        let mut points: Vec<Point> = polygon.points().iter().map(|p| p.to_point()).collect();
        if points.is_empty() {
            return CubicContour::new(Vec::new());
        }
        if points.len() % 2 != 0 {
            insert_midpoint_of_longest_edge(&mut points);
        }

        let middle: Vec<Point> = points.iter().step_by(2).copied().collect();
        let ends: Vec<Point> = points.iter().skip(1).step_by(2).copied().collect();
        let n = middle.len();
        let nodes = (0..n)
            .map(|i| {
                let (prev, next) = ((i + n - 1) % n, (i + 1) % n);
                let (start, mid, end) = (ends[prev], middle[i], ends[i]);
                let dir_start = (mid - middle[prev]).normalize_or_zero();
                let dir_end = (mid - middle[next]).normalize_or_zero();
                let len_start = dir_start.dot(mid - start).abs();
                let len_end = dir_end.dot(mid - end).abs();
                CubicNode::new(start + dir_start * len_start, end + dir_end * len_end, end)
            })
            .collect();
        CubicContour::new(nodes)
    }
}

/// Split the longest edge, counting the edge into each vertex from its
/// predecessor.
fn insert_midpoint_of_longest_edge(points: &mut Vec<Point>) {
    let n = points.len();
    let prev = |i: usize| points[(i + n - 1) % n];
    let longest = (0..n)
        .max_by(|&a, &b| {
            prev(a)
                .distance_squared(points[a])
                .total_cmp(&prev(b).distance_squared(points[b]))
        })
        .unwrap_or(0);
    let midpoint = prev(longest).midpoint(points[longest]);
    points.insert(longest, midpoint);
}
