// Copyright 2025 the Glyphtrace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::collections::HashSet;

use image::GrayImage;
use tracing::{debug, trace};

use super::{isoline::iso_lines, Tracing};
use crate::{Contour, Glyph, LineContour, Point, TraceError};

/// Follows the iso-line of the grayscale values at a threshold.
///
/// Samples below the threshold are foreground. Iso-lines that run into the
/// image border are closed along the border (see [`stitch_fragments`]), and
/// background regions that no outer contour encloses become holes of a glyph
/// covering the whole canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrayscalePolygon {
    /// The iso-level.
    pub threshold: f64,
}

impl Default for GrayscalePolygon {
    fn default() -> Self {
        // Halfway between two 8-bit values, so no sample sits on the level.
        GrayscalePolygon { threshold: 127.5 }
    }
}

impl GrayscalePolygon {
    /// Create a tracer with the given iso-level.
    pub fn new(threshold: f64) -> Self {
        GrayscalePolygon { threshold }
    }
}

impl Tracing for GrayscalePolygon {
    type Contour = LineContour;

    fn glyphs(&self, image: &GrayImage) -> Result<Vec<Glyph<LineContour>>, TraceError> {
        let (width, height) = image.dimensions();
        let lines = iso_lines(image, self.threshold);
        let stitched = stitch_fragments(&lines.open, width, height)?;
        debug!(
            closed = lines.closed.len(),
            fragments = lines.open.len(),
            stitched = stitched.len(),
            "traced iso-lines"
        );
        let contours = lines
            .closed
            .into_iter()
            .chain(stitched)
            .map(|points| Contour::new(points).simplified())
            .collect();
        let glyphs = assemble_glyphs(contours, f64::from(width), f64::from(height));
        debug!(glyphs = glyphs.len(), "traced grayscale polygons");
        Ok(glyphs)
    }
}

/// Give every hole to the smallest outer contour containing it.
///
/// Holes no outer contour contains belong to a glyph spanning the canvas.
fn assemble_glyphs(contours: Vec<LineContour>, width: f64, height: f64) -> Vec<Glyph<LineContour>> {
    let mut outers = Vec::new();
    let mut holes = Vec::new();
    for contour in contours {
        let area = contour.signed_area();
        if area > 0.0 {
            outers.push((area, contour));
        } else if area < 0.0 {
            holes.push(Some(contour));
        }
    }
    outers.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut claim = |outer: &LineContour| {
        let mut claimed = Vec::new();
        for slot in &mut holes {
            let inside = slot
                .as_ref()
                .is_some_and(|hole| outer.contains(hole.points()[0]));
            if inside {
                claimed.extend(slot.take());
            }
        }
        claimed
    };
    let mut glyphs: Vec<_> = outers
        .into_iter()
        .map(|(_, outer)| {
            let own = claim(&outer);
            trace!(points = outer.len(), holes = own.len(), "glyph");
            Glyph::new(outer, own)
        })
        .collect();

    let orphans: Vec<_> = holes.into_iter().flatten().collect();
    if !orphans.is_empty() {
        let canvas = Contour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, height),
            Point::new(width, height),
            Point::new(width, 0.0),
        ]);
        trace!(holes = orphans.len(), "canvas glyph");
        glyphs.push(Glyph::new(canvas, orphans));
    }
    glyphs
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EdgeKind {
    Corner,
    Start(usize),
    End(usize),
}

/// A point where an outline meets the canvas border.
#[derive(Clone, Copy, Debug)]
struct EdgePoint {
    point: Point,
    angle: f64,
    kind: EdgeKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    FindFirst,
    FindNext,
    FindEnd,
    Stop,
}

/// Move a fragment endpoint from the outermost pixel centers onto the canvas
/// border.
fn snap(p: Point, width: f64, height: f64) -> Result<Point, TraceError> {
    let left = p.x <= 0.5;
    let right = p.x >= width - 0.5;
    let top = p.y <= 0.5;
    let bottom = p.y >= height - 0.5;
    match (left || right, top || bottom) {
        (true, false) => Ok(Point::new(if left { 0.0 } else { width }, p.y)),
        (false, true) => Ok(Point::new(p.x, if top { 0.0 } else { height })),
        (true, true) => Err(TraceError::AmbiguousEndpoint(p)),
        (false, false) => Err(TraceError::EndpointOffBorder(p)),
    }
}

/// Close open iso-line fragments along the canvas border.
///
/// Each fragment runs from border to border with the foreground on its left.
/// Endpoints and canvas corners are ordered counterclockwise around the
/// image center (in the y-down frame). Starting from a fragment, the walk
/// continues at the fragment's end along the border, picking up corners,
/// until it reaches the start of another fragment, which is appended in
/// turn, or the start of the first one, which closes the contour.
///
/// Endpoints are snapped onto the border, so a fragment contributes its
/// points framed by their snapped copies.
///
/// # Errors
///
/// - [`TraceError::FragmentTooShort`] for a fragment with fewer than two points.
/// - [`TraceError::EndpointOffBorder`] for an endpoint away from the
///   outermost pixel centers.
/// - [`TraceError::AmbiguousEndpoint`] for an endpoint on a corner, or shared
///   by two fragments.
/// - [`TraceError::UnmatchedFragment`] if the walk along the border runs into
///   the end of a fragment it has not joined yet.
pub fn stitch_fragments(
    fragments: &[Vec<Point>],
    width: u32,
    height: u32,
) -> Result<Vec<Vec<Point>>, TraceError> {
    let (w, h) = (f64::from(width), f64::from(height));
    let center = Point::new(w / 2.0, h / 2.0);
    let edge_point = |point: Point, kind| {
        let d = point - center;
        EdgePoint {
            point,
            angle: d.x.atan2(d.y),
            kind,
        }
    };

    let mut edge_points: Vec<EdgePoint> = [(0.0, 0.0), (0.0, h), (w, h), (w, 0.0)]
        .into_iter()
        .map(|p| edge_point(Point::from(p), EdgeKind::Corner))
        .collect();
    let mut snapped = Vec::with_capacity(fragments.len());
    let mut seen = HashSet::new();
    for (i, fragment) in fragments.iter().enumerate() {
        let &[start, .., end] = fragment.as_slice() else {
            return Err(TraceError::FragmentTooShort { fragment: i });
        };
        for p in [start, end] {
            if !seen.insert(((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())) {
                return Err(TraceError::AmbiguousEndpoint(p));
            }
        }
        let (start, end) = (snap(start, w, h)?, snap(end, w, h)?);
        snapped.push((start, end));
        edge_points.push(edge_point(start, EdgeKind::Start(i)));
        edge_points.push(edge_point(end, EdgeKind::End(i)));
    }
    edge_points.sort_by(|a, b| a.angle.total_cmp(&b.angle));

    let mut contours = Vec::new();
    let mut joined = vec![false; fragments.len()];
    let mut remaining = fragments.len();
    let mut current = Vec::new();
    let mut first = 0;
    let mut open = 0;
    let mut state = if remaining > 0 {
        State::FindFirst
    } else {
        State::Stop
    };
    let mut idle = 0;
    for ep in edge_points.iter().cycle() {
        if state == State::Stop {
            break;
        }
        let progress = match (state, ep.kind) {
            (State::FindFirst | State::FindNext, EdgeKind::Start(f)) if !joined[f] => {
                if state == State::FindFirst {
                    first = f;
                }
                current.push(snapped[f].0);
                current.extend_from_slice(&fragments[f]);
                joined[f] = true;
                remaining -= 1;
                open = f;
                state = State::FindEnd;
                true
            }
            (State::FindNext, EdgeKind::Corner) => {
                current.push(ep.point);
                false
            }
            (State::FindNext, EdgeKind::Start(f)) if f == first => {
                contours.push(std::mem::take(&mut current));
                state = if remaining > 0 {
                    State::FindFirst
                } else {
                    State::Stop
                };
                true
            }
            (State::FindNext, EdgeKind::End(f)) if !joined[f] => {
                return Err(TraceError::UnmatchedFragment { fragment: f });
            }
            (State::FindEnd, EdgeKind::End(f)) if f == open => {
                current.push(snapped[f].1);
                state = State::FindNext;
                true
            }
            _ => false,
        };
        if progress {
            idle = 0;
        } else {
            idle += 1;
            if idle > edge_points.len() {
                return Err(TraceError::UnmatchedFragment { fragment: open });
            }
        }
    }
    Ok(contours)
}
