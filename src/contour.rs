// Copyright 2025 the Glyphtrace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed polygonal contours.
//!
//! A [`Contour`] is a cyclic sequence of points: the last point connects back
//! to the first, and there is no explicit closing duplicate. Contours are
//! immutable; every transform returns a new contour, so the structural hash
//! and the bounding box are computed once at construction.
//!
//! Orientation follows the image frame (y down). A contour traversed with
//! the foreground on the left has a positive [`signed_area`] and is an outer
//! boundary; holes run the other way and have a negative area.
//!
//! [`signed_area`]: Contour::signed_area

use std::fmt;
use std::hash::{DefaultHasher, Hasher};

use crate::{BoundingBox, IntPoint, Line, Point};

/// Tolerance used when comparing real-valued segment lengths and directions.
const EPSILON: f64 = 1e-12;

/// The kinds of points a contour can be made of.
///
/// Implemented by [`IntPoint`] (exact pixel boundaries) and [`Point`]
/// (polygons after tracing or approximation).
pub trait ContourPoint: Copy + Default + PartialEq + fmt::Debug {
    /// Convert to a real-valued point.
    fn to_point(self) -> Point;

    /// Feed the exact coordinates into a hasher.
    fn hash_coords<H: Hasher>(self, state: &mut H);

    /// Component-wise sum.
    fn translate(self, offset: Self) -> Self;

    /// Component-wise difference.
    fn untranslate(self, offset: Self) -> Self;

    /// Component-wise minimum.
    fn min_coords(self, other: Self) -> Self;

    /// Component-wise maximum.
    fn max_coords(self, other: Self) -> Self;

    /// Compare by x first, then by y.
    fn lexicographic_lt(self, other: Self) -> bool;
}

impl ContourPoint for IntPoint {
    #[inline]
    fn to_point(self) -> Point {
        IntPoint::to_point(self)
    }

    #[inline]
    fn hash_coords<H: Hasher>(self, state: &mut H) {
        state.write_i32(self.x);
        state.write_i32(self.y);
    }

    #[inline]
    fn translate(self, offset: Self) -> Self {
        self + offset
    }

    #[inline]
    fn untranslate(self, offset: Self) -> Self {
        self - offset
    }

    #[inline]
    fn min_coords(self, other: Self) -> Self {
        IntPoint::new(self.x.min(other.x), self.y.min(other.y))
    }

    #[inline]
    fn max_coords(self, other: Self) -> Self {
        IntPoint::new(self.x.max(other.x), self.y.max(other.y))
    }

    #[inline]
    fn lexicographic_lt(self, other: Self) -> bool {
        self < other
    }
}

impl ContourPoint for Point {
    #[inline]
    fn to_point(self) -> Point {
        self
    }

    #[inline]
    fn hash_coords<H: Hasher>(self, state: &mut H) {
        // Adding zero folds -0.0 into +0.0, keeping the hash consistent with `==`.
        state.write_u64((self.x + 0.0).to_bits());
        state.write_u64((self.y + 0.0).to_bits());
    }

    #[inline]
    fn translate(self, offset: Self) -> Self {
        Point::new(self.x + offset.x, self.y + offset.y)
    }

    #[inline]
    fn untranslate(self, offset: Self) -> Self {
        Point::new(self.x - offset.x, self.y - offset.y)
    }

    #[inline]
    fn min_coords(self, other: Self) -> Self {
        Point::new(self.x.min(other.x), self.y.min(other.y))
    }

    #[inline]
    fn max_coords(self, other: Self) -> Self {
        Point::new(self.x.max(other.x), self.y.max(other.y))
    }

    #[inline]
    fn lexicographic_lt(self, other: Self) -> bool {
        self.x < other.x || (self.x == other.x && self.y < other.y)
    }
}

/// The capability set shared by every contour kind.
///
/// Glyphs, drawings, approximation and deduplication are generic over this
/// trait, so polygonal and cubic drawings flow through the same code.
pub trait Outline: Clone + PartialEq + fmt::Debug {
    /// The kind of point the outline is positioned with.
    type Point: ContourPoint;

    /// A hash of the exact geometry, stable for equal outlines.
    fn structural_hash(&self) -> u64;

    /// The axis-aligned bounds of the outline.
    fn bounds(&self) -> BoundingBox<Self::Point>;

    /// The outline moved by `offset`.
    fn translate(&self, offset: Self::Point) -> Self;

    /// The outline moved by minus `offset`.
    fn untranslate(&self, offset: Self::Point) -> Self;

    /// An equivalent outline with a canonical start point.
    fn standardize(&self) -> Self;
}

/// A closed polygon.
#[derive(Clone)]
pub struct Contour<P> {
    points: Vec<P>,
    hash: u64,
    bounds: BoundingBox<P>,
}

/// A contour along exact pixel edges, before approximation.
pub type ExactContour = Contour<IntPoint>;

/// A real-valued polygon.
pub type LineContour = Contour<Point>;

impl<P: ContourPoint> Contour<P> {
    /// Create a contour from its vertices.
    pub fn new(points: Vec<P>) -> Self {
        let mut hasher = DefaultHasher::new();
        hasher.write_usize(points.len());
        for p in &points {
            p.hash_coords(&mut hasher);
        }
        let bounds = BoundingBox::from_points(&points);
        Contour {
            points,
            hash: hasher.finish(),
            bounds,
        }
    }

    /// The vertices.
    #[inline]
    pub fn points(&self) -> &[P] {
        &self.points
    }

    /// Consume the contour, returning its vertices.
    #[inline]
    pub fn into_points(self) -> Vec<P> {
        self.points
    }

    /// The number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the contour has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The bounding box of the vertices.
    #[inline]
    pub fn bounds(&self) -> BoundingBox<P> {
        self.bounds
    }

    /// A hash of the vertex sequence.
    #[inline]
    pub fn structural_hash(&self) -> u64 {
        self.hash
    }

    /// The closed polygon's edges, including the one from the last vertex
    /// back to the first.
    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| {
            Line::new(
                self.points[i].to_point(),
                self.points[(i + 1) % n].to_point(),
            )
        })
    }

    /// Signed area, positive for outer boundaries.
    ///
    /// The y axis points down, so this is the negated shoelace sum.
    pub fn signed_area(&self) -> f64 {
        -self.segments().map(Line::signed_area).sum::<f64>()
    }

    /// Whether this is an outer boundary rather than a hole.
    #[inline]
    pub fn is_outer(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// The winding number of the contour around `p`.
    pub fn winding(&self, p: Point) -> i32 {
        self.segments().map(|seg| seg.winding(p)).sum()
    }

    /// Distance from `p` to the nearest point of the boundary.
    pub fn boundary_distance(&self, p: Point) -> f64 {
        self.segments()
            .map(|seg| seg.nearest(p).1)
            .fold(f64::INFINITY, f64::min)
            .sqrt()
    }

    /// Whether `p` lies inside the contour or on its boundary.
    pub fn contains(&self, p: Point) -> bool {
        self.winding(p) != 0 || self.boundary_distance(p) <= EPSILON
    }

    /// An equivalent contour starting at its lexicographically minimal vertex.
    ///
    /// Two traces of the same shape may start at different vertices; this
    /// makes them compare equal.
    pub fn standardize(&self) -> Self {
        let start = self
            .points
            .iter()
            .enumerate()
            .fold(0, |best, (i, &p)| {
                if p.lexicographic_lt(self.points[best]) {
                    i
                } else {
                    best
                }
            });
        if start == 0 {
            return self.clone();
        }
        let mut points = Vec::with_capacity(self.points.len());
        points.extend_from_slice(&self.points[start..]);
        points.extend_from_slice(&self.points[..start]);
        Contour::new(points)
    }

    /// The contour moved by `offset`.
    pub fn translate(&self, offset: P) -> Self {
        Contour::new(self.points.iter().map(|p| p.translate(offset)).collect())
    }

    /// The contour moved by minus `offset`.
    pub fn untranslate(&self, offset: P) -> Self {
        Contour::new(self.points.iter().map(|p| p.untranslate(offset)).collect())
    }

    /// Remove zero-length segments and merge consecutive segments that share
    /// a direction.
    ///
    /// Applying this twice gives the same result as applying it once.
    pub fn simplified(&self) -> Self {
        let points = remove_zero_length_segments(&self.points);
        let points = combine_same_direction_segments(&points);
        Contour::new(points)
    }

    /// Convert to a real-valued polygon.
    pub fn to_line_contour(&self) -> LineContour {
        Contour::new(self.points.iter().map(|p| p.to_point()).collect())
    }
}

fn remove_zero_length_segments<P: ContourPoint>(points: &[P]) -> Vec<P> {
    let n = points.len();
    let kept: Vec<P> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n].to_point();
            points[i].to_point().distance(prev) > EPSILON
        })
        .map(|i| points[i])
        .collect();
    if kept.is_empty() {
        // Every vertex coincides.
        points.first().copied().into_iter().collect()
    } else {
        kept
    }
}

fn combine_same_direction_segments<P: ContourPoint>(points: &[P]) -> Vec<P> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n].to_point();
            let cur = points[i].to_point();
            let next = points[(i + 1) % n].to_point();
            let dir_prev = (cur - prev).normalize_or_zero();
            let dir_next = (next - cur).normalize_or_zero();
            (dir_next - dir_prev).hypot() > EPSILON
        })
        .map(|i| points[i])
        .collect()
}

impl<P: ContourPoint> PartialEq for Contour<P> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.points == other.points
    }
}

impl<P: ContourPoint> fmt::Debug for Contour<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Contour").field(&self.points).finish()
    }
}

impl<P: ContourPoint> FromIterator<P> for Contour<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Contour::new(iter.into_iter().collect())
    }
}

impl<P: ContourPoint> Outline for Contour<P> {
    type Point = P;

    fn structural_hash(&self) -> u64 {
        self.hash
    }

    fn bounds(&self) -> BoundingBox<P> {
        self.bounds
    }

    fn translate(&self, offset: P) -> Self {
        Contour::translate(self, offset)
    }

    fn untranslate(&self, offset: P) -> Self {
        Contour::untranslate(self, offset)
    }

    fn standardize(&self) -> Self {
        Contour::standardize(self)
    }
}
