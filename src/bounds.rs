// Copyright 2025 the Glyphtrace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounding boxes.

use crate::{ContourPoint, Point, Vec2};

/// An axis-aligned bounding box over points of one kind.
///
/// `min` is the top left corner in the y-down image frame.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox<P> {
    /// The minimum x and y coordinates.
    pub min: P,
    /// The maximum x and y coordinates.
    pub max: P,
}

impl<P: ContourPoint> BoundingBox<P> {
    /// The bounding box of a set of points.
    ///
    /// An empty set yields the default (degenerate, zero-sized) box.
    pub fn from_points(points: &[P]) -> Self {
        let mut iter = points.iter().copied();
        let Some(first) = iter.next() else {
            return BoundingBox::default();
        };
        iter.fold(
            BoundingBox {
                min: first,
                max: first,
            },
            |bbox, p| BoundingBox {
                min: bbox.min.min_coords(p),
                max: bbox.max.max_coords(p),
            },
        )
    }

    /// The origin of the box, i.e. the minimum corner.
    #[inline]
    pub fn origin(&self) -> P {
        self.min
    }

    /// The width of the box.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.to_point().x - self.min.to_point().x
    }

    /// The height of the box.
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.to_point().y - self.min.to_point().y
    }

    /// The size of the box, as a vector.
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max.to_point() - self.min.to_point()
    }

    /// The center point of the box.
    #[inline]
    pub fn center(&self) -> Point {
        self.min.to_point().midpoint(self.max.to_point())
    }

    /// The smallest box enclosing both `self` and `other`.
    #[inline]
    pub fn union(&self, other: BoundingBox<P>) -> BoundingBox<P> {
        BoundingBox {
            min: self.min.min_coords(other.min),
            max: self.max.max_coords(other.max),
        }
    }

    /// The box moved by `offset`.
    #[inline]
    pub fn translate(&self, offset: P) -> BoundingBox<P> {
        BoundingBox {
            min: self.min.translate(offset),
            max: self.max.translate(offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IntPoint;

    #[test]
    fn bounds_of_points() {
        let points = [
            IntPoint::new(3, 1),
            IntPoint::new(-2, 4),
            IntPoint::new(0, -5),
        ];
        let bbox = BoundingBox::from_points(&points);
        assert_eq!(bbox.origin(), IntPoint::new(-2, -5));
        assert_eq!(bbox.max, IntPoint::new(3, 4));
        assert_eq!(bbox.size(), Vec2::new(5., 9.));
        assert_eq!(bbox.center(), Point::new(0.5, -0.5));
    }

    #[test]
    fn empty_is_default() {
        let bbox = BoundingBox::<Point>::from_points(&[]);
        assert_eq!(bbox, BoundingBox::default());
        assert_eq!(bbox.size(), Vec2::ZERO);
    }

    #[test]
    fn union_and_translate() {
        let a = BoundingBox::from_points(&[Point::new(0., 0.), Point::new(1., 1.)]);
        let b = BoundingBox::from_points(&[Point::new(2., -1.), Point::new(3., 0.5)]);
        let u = a.union(b);
        assert_eq!(u.min, Point::new(0., -1.));
        assert_eq!(u.max, Point::new(3., 1.));
        assert_eq!(a.translate(Point::new(1., 2.)).min, Point::new(1., 2.));
    }
}
