// Copyright 2025 the Glyphtrace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::{Approximation, Exact};
use crate::{ConfigError, Contour, ContourPoint, Line, Point};

/// Ramer–Douglas–Peucker simplification of closed polygons.
///
/// The result is a subset of the input vertices, in order, such that every
/// removed vertex lies within `max_distance` of the result. A preliminary
/// approximation producing polygons may run first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DouglasPeucker<Pre = Exact> {
    max_distance: f64,
    preliminary: Pre,
}

impl DouglasPeucker {
    /// Create a simplification working directly on its input.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MaxDistance`] unless `max_distance` is positive
    /// and finite.
    pub fn new(max_distance: f64) -> Result<Self, ConfigError> {
        if !(max_distance > 0.0 && max_distance.is_finite()) {
            return Err(ConfigError::MaxDistance(max_distance));
        }
        Ok(DouglasPeucker {
            max_distance,
            preliminary: Exact,
        })
    }
}

impl<Pre> DouglasPeucker<Pre> {
    /// Run `preliminary` before simplifying.
    pub fn with_preliminary<Q>(self, preliminary: Q) -> DouglasPeucker<Q> {
        DouglasPeucker {
            max_distance: self.max_distance,
            preliminary,
        }
    }

    /// The largest distance of a removed vertex from the result.
    #[inline]
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// The approximation applied first.
    #[inline]
    pub fn preliminary(&self) -> &Pre {
        &self.preliminary
    }
}

impl<P, Q, Pre> Approximation<P> for DouglasPeucker<Pre>
where
    P: ContourPoint,
    Q: ContourPoint,
    Pre: Approximation<P, Output = Contour<Q>>,
{
    type Output = Contour<Q>;

    fn approximate_contour(&self, contour: &Contour<P>) -> Contour<Q> {
        let polygon = self.preliminary.approximate_contour(contour);
        Contour::new(simplify_closed(polygon.points(), self.max_distance))
    }
}

/// Split the ring at the vertex farthest from the first one and simplify
/// both halves.
fn simplify_closed<Q: ContourPoint>(points: &[Q], max_distance: f64) -> Vec<Q> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    // Index `n` stands for the first vertex again.
    let at = |i: usize| points[i % n].to_point();
    let origin = at(0);
    let Some(far) = (1..n).max_by(|&a, &b| {
        origin
            .distance_squared(at(a))
            .total_cmp(&origin.distance_squared(at(b)))
    }) else {
        return points.to_vec();
    };
    if at(far) == origin {
        return vec![points[0]];
    }

    let mut kept = vec![0];
    simplify_open(&at, 0, far, max_distance, &mut kept);
    simplify_open(&at, far, n, max_distance, &mut kept);
    kept.pop();
    kept.into_iter().map(|i| points[i]).collect()
}

/// Push the kept vertices after `start` up to and including `end`.
fn simplify_open(
    at: &impl Fn(usize) -> Point,
    start: usize,
    end: usize,
    max_distance: f64,
    kept: &mut Vec<usize>,
) {
    let chord = Line::new(at(start), at(end));
    let farthest = (start + 1..end)
        .map(|i| (i, chord.distance(at(i))))
        .max_by(|a, b| a.1.total_cmp(&b.1));
    match farthest {
        Some((i, distance)) if distance > max_distance => {
            simplify_open(at, start, i, max_distance, kept);
            simplify_open(at, i, end, max_distance, kept);
        }
        _ => kept.push(end),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp, reason = "parameters are compared as given")]

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::trace::PolygonTracer;
    use crate::{IntPoint, LineContour};

    fn polygon(coords: &[(f64, f64)]) -> LineContour {
        coords.iter().map(|&p| Point::from(p)).collect()
    }

    #[test]
    fn invalid_distances() {
        for d in [0.0, -1.0, f64::INFINITY] {
            assert_eq!(DouglasPeucker::new(d), Err(ConfigError::MaxDistance(d)));
        }
        assert!(matches!(
            DouglasPeucker::new(f64::NAN),
            Err(ConfigError::MaxDistance(d)) if d.is_nan()
        ));
    }

    #[test]
    fn collinear_vertices_are_dropped() {
        let square = polygon(&[
            (0., 0.),
            (0., 5.),
            (0., 10.),
            (5., 10.),
            (10., 10.),
            (10., 5.),
            (10., 0.),
            (5., 0.),
        ]);
        let dp = DouglasPeucker::new(0.5).unwrap();
        assert_eq!(
            dp.approximate_contour(&square),
            polygon(&[(0., 0.), (0., 10.), (10., 10.), (10., 0.)])
        );
    }

    #[test]
    fn small_bumps_are_flattened() {
        let bumpy = polygon(&[(0., 0.), (0., 10.), (5., 10.3), (10., 10.), (10., 0.)]);
        let coarse = DouglasPeucker::new(0.5).unwrap();
        assert_eq!(coarse.approximate_contour(&bumpy).len(), 4);
        let fine = DouglasPeucker::new(0.2).unwrap();
        assert_eq!(fine.approximate_contour(&bumpy), bumpy);
    }

    #[test]
    fn exact_input_keeps_integer_points() {
        let exact: Contour<IntPoint> = [(0, 0), (0, 2), (0, 4), (3, 4), (3, 0)]
            .into_iter()
            .map(IntPoint::from)
            .collect();
        let simplified = DouglasPeucker::new(0.5).unwrap().approximate_contour(&exact);
        assert_eq!(
            simplified.points(),
            &[
                IntPoint::new(0, 0),
                IntPoint::new(0, 4),
                IntPoint::new(3, 4),
                IntPoint::new(3, 0)
            ]
        );
    }

    #[test]
    fn chained_after_the_polygon_tracer() {
        let exact: Contour<IntPoint> = [(0, 8), (8, 8), (8, 0), (0, 0)]
            .into_iter()
            .map(IntPoint::from)
            .collect();
        let dp = DouglasPeucker::new(0.1)
            .unwrap()
            .with_preliminary(PolygonTracer::default());
        let polygon = dp.approximate_contour(&exact);
        assert_eq!(polygon, PolygonTracer::default().polygonize(&exact));
        assert_eq!(dp.max_distance(), 0.1);
    }

    #[test]
    fn removed_vertices_stay_within_tolerance() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let n: u32 = rng.random_range(3..60);
            let radius = rng.random_range(5.0..40.0);
            let points: Vec<Point> = (0..n)
                .map(|i| {
                    let angle = std::f64::consts::TAU * f64::from(i) / f64::from(n);
                    let r = radius + rng.random_range(-2.0..2.0);
                    Point::new(r * angle.cos(), r * angle.sin())
                })
                .collect();
            let input = Contour::new(points);
            let max_distance = rng.random_range(0.1..3.0);
            let output = DouglasPeucker::new(max_distance)
                .unwrap()
                .approximate_contour(&input);

            assert!(output.len() <= input.len());
            // Output vertices are input vertices, in order.
            let mut rest = input.points().iter();
            for p in output.points() {
                assert!(rest.any(|q| q == p), "{p:?} is not an input vertex");
            }
            for &p in input.points() {
                let distance = output.boundary_distance(p);
                assert!(
                    distance <= max_distance + 1e-9,
                    "vertex {p:?} is {distance} away"
                );
            }
        }
    }
}
