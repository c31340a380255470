// Copyright 2025 the Glyphtrace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use arrayvec::ArrayVec;
use image::GrayImage;
use tracing::debug;

use super::{BinarizedExact, Tracing};
use crate::{
    ConfigError, Contour, ExactContour, Glyph, IntPoint, LineContour, Point, TraceError, Vec2,
};

/// Reduces exact pixel boundaries to polygons with far fewer vertices.
///
/// The polygon stays within half a pixel of the exact boundary, so
/// rasterizing it at the original resolution gives back the same pixels.
/// The heuristic only looks at the lengths and directions of neighboring
/// runs, which makes it symmetric under rotations and reflections of the
/// image.
///
/// Each run of the exact boundary is replaced by its midpoint, except:
///
/// - runs longer than `max_slope_ratio` keep two points, moved inward by
///   half the excess length from the midpoint in both directions;
/// - one pixel wide protrusions ("pins") keep two points at
///   `0.5 - corner_offset` from the midpoint, preserving their width;
/// - pins touching a long run on one side only get their midpoint shifted
///   toward the long run, and isolated unit steps against the direction of
///   the previous run;
/// - corners between two runs longer than one pixel get an extra point,
///   pulled `corner_offset` into the shape along both runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolygonTracer {
    max_slope_ratio: u32,
    corner_offset: f64,
}

impl Default for PolygonTracer {
    fn default() -> Self {
        PolygonTracer {
            max_slope_ratio: 10,
            corner_offset: 0.25,
        }
    }
}

/// One run of the exact boundary.
#[derive(Clone, Copy)]
struct Run {
    len: u32,
    dir: Vec2,
}

impl Run {
    fn between(p0: IntPoint, p1: IntPoint) -> Self {
        let step = p1 - p0;
        Run {
            len: step.chebyshev_len().unsigned_abs(),
            dir: step.signum().to_point().to_vec2(),
        }
    }
}

impl PolygonTracer {
    /// Create a tracer.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] unless `max_slope_ratio >= 1` and
    /// `0 <= corner_offset <= 0.25`.
    pub fn new(max_slope_ratio: u32, corner_offset: f64) -> Result<Self, ConfigError> {
        if max_slope_ratio < 1 {
            return Err(ConfigError::MaxSlopeRatio(max_slope_ratio));
        }
        if !(0.0..=0.25).contains(&corner_offset) {
            return Err(ConfigError::CornerOffset(corner_offset));
        }
        Ok(PolygonTracer {
            max_slope_ratio,
            corner_offset,
        })
    }

    /// The longest run collapsed to a single point.
    #[inline]
    pub fn max_slope_ratio(&self) -> u32 {
        self.max_slope_ratio
    }

    /// How far corner points are pulled into the shape.
    #[inline]
    pub fn corner_offset(&self) -> f64 {
        self.corner_offset
    }

    /// Reduce an exact boundary to a polygon.
    pub fn polygonize(&self, exact: &ExactContour) -> LineContour {
        let points = exact.points();
        let n = points.len();
        let runs: Vec<Run> = (0..n)
            .map(|i| Run::between(points[i], points[(i + 1) % n]))
            .collect();

        // A lone pixel has nothing to simplify.
        if n <= 4 && runs.iter().all(|run| run.len == 1) {
            return exact.to_line_contour();
        }

        let prev = |i: usize| (i + n - 1) % n;
        let next = |i: usize| (i + 1) % n;
        // Do the runs before and after run `i` lie on the same side of it?
        let convex = |i: usize| runs[prev(i)].dir + runs[next(i)].dir == Vec2::ZERO;
        let isolated: Vec<bool> = (0..n)
            .map(|i| {
                convex(i)
                    && runs[prev(i)].len == 1
                    && runs[i].len == 1
                    && runs[next(i)].len == 1
            })
            .collect();

        let co = self.corner_offset;
        let mut polygon = Vec::with_capacity(2 * n);
        for i in 0..n {
            let (run_prev, run, run_next) = (runs[prev(i)], runs[i], runs[next(i)]);
            let cur = points[i].to_point();
            let mut mid = cur.midpoint(points[next(i)].to_point());

            if co > 0.0 && convex(i) && run.len == 1 {
                if run_prev.len > 1 && run_next.len == 1 {
                    mid -= run.dir * (0.5 - co);
                } else if run_prev.len == 1 && run_next.len > 1 {
                    mid += run.dir * (0.5 - co);
                } else if isolated[i] && !isolated[prev(i)] && !isolated[next(i)] {
                    mid -= run_prev.dir * co;
                }
            }

            let is_pin = convex(i) && run_prev.len > 1 && run.len == 1 && run_next.len > 1;
            let offset = if run.len > self.max_slope_ratio {
                run.dir * (f64::from(run.len - self.max_slope_ratio) / 2.0)
            } else if is_pin {
                run.dir * (0.5 - co)
            } else {
                Vec2::ZERO
            };

            let mut replacement: ArrayVec<Point, 3> = ArrayVec::new();
            if run_prev.len > 1 && run.len > 1 {
                replacement.push(cur + co * (run.dir - run_prev.dir));
            }
            if offset != Vec2::ZERO {
                replacement.push(mid - offset);
            }
            replacement.push(mid + offset);
            polygon.extend(replacement);
        }
        Contour::new(polygon).simplified()
    }

    /// Polygonize every contour of a glyph.
    pub fn polygonize_glyph(&self, glyph: &Glyph<ExactContour>) -> Glyph<LineContour> {
        glyph.map(|contour| self.polygonize(contour))
    }
}

/// Exact boundary extraction followed by [`PolygonTracer`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BinarizedPolygon {
    /// The binarization step.
    pub exact: BinarizedExact,
    /// The polygon reduction step.
    pub polygon: PolygonTracer,
}

impl BinarizedPolygon {
    /// Create a tracer with the default threshold.
    ///
    /// # Errors
    ///
    /// See [`PolygonTracer::new`].
    pub fn new(max_slope_ratio: u32, corner_offset: f64) -> Result<Self, ConfigError> {
        Ok(BinarizedPolygon {
            exact: BinarizedExact::default(),
            polygon: PolygonTracer::new(max_slope_ratio, corner_offset)?,
        })
    }
}

impl Tracing for BinarizedPolygon {
    type Contour = LineContour;

    fn glyphs(&self, image: &GrayImage) -> Result<Vec<Glyph<LineContour>>, TraceError> {
        let glyphs: Vec<_> = self
            .exact
            .glyphs(image)?
            .iter()
            .map(|glyph| self.polygon.polygonize_glyph(glyph))
            .collect();
        debug!(
            glyphs = glyphs.len(),
            vertices = glyphs
                .iter()
                .flat_map(|g| g.contours())
                .map(Contour::len)
                .sum::<usize>(),
            "traced polygons"
        );
        Ok(glyphs)
    }
}
