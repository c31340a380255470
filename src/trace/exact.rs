// Copyright 2025 the Glyphtrace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use tracing::{debug, trace};

use super::Tracing;
use crate::{Contour, ExactContour, Glyph, IntPoint, TraceError};

/// Unit steps, indexed by turn table entries. The first four repeat so that
/// a turn can be taken as a contiguous slice.
const DIRECTIONS: [IntPoint; 7] = [
    IntPoint::new(0, 1),  // down
    IntPoint::new(1, 0),  // right
    IntPoint::new(0, -1), // up
    IntPoint::new(-1, 0), // left
    IntPoint::new(0, 1),
    IntPoint::new(1, 0),
    IntPoint::new(0, -1),
];

/// First unit step around a chain pixel, by incoming chain step `[x + 1][y + 1]`.
const FROM_DIRECTION: [[usize; 3]; 3] = [[2, 3, 3], [2, 0, 0], [1, 1, 0]];

/// Last unit step around a chain pixel, by outgoing chain step `[x + 1][y + 1]`.
const TO_DIRECTION: [[usize; 3]; 3] = [[3, 3, 0], [2, 3, 0], [2, 1, 1]];

/// The pixel corner a walk starting in the given direction begins at.
const START_CORNER: [IntPoint; 4] = [
    IntPoint::new(0, 0),
    IntPoint::new(0, 1),
    IntPoint::new(1, 1),
    IntPoint::new(1, 0),
];

/// Binarizes an image with a fixed threshold and follows the exact pixel
/// boundaries of the foreground.
///
/// Pixels with a value of at most `threshold` are foreground.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinarizedExact {
    /// The largest value still counted as foreground.
    pub threshold: u8,
}

impl Default for BinarizedExact {
    fn default() -> Self {
        BinarizedExact { threshold: 128 }
    }
}

/// Whether a border chain bounds a foreground region from outside or a hole.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutlineKind {
    /// The outer border of a connected foreground region.
    Outer,
    /// The border of a background region enclosed by foreground.
    Hole,
}

/// A border chain as produced by border following: the centers of the
/// foreground pixels along a border, plus the containment hierarchy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawOutline {
    /// Border pixel coordinates, 8-connected.
    pub points: Vec<IntPoint>,
    /// Outer border or hole.
    pub kind: OutlineKind,
    /// Index of the enclosing outline.
    pub parent: Option<usize>,
}

impl BinarizedExact {
    /// Create a tracer with the given threshold.
    pub fn new(threshold: u8) -> Self {
        BinarizedExact { threshold }
    }

    /// Follow the borders of the binarized image.
    pub fn outlines(&self, image: &GrayImage) -> Vec<RawOutline> {
        let (width, height) = image.dimensions();
        // The border follower never starts an outer border in the first
        // column, so surround the image with background.
        let padded = GrayImage::from_fn(width + 2, height + 2, |x, y| {
            let inside = (1..=width).contains(&x) && (1..=height).contains(&y);
            if inside && image.get_pixel(x - 1, y - 1).0[0] <= self.threshold {
                Luma([255])
            } else {
                Luma([0])
            }
        });
        find_contours::<i32>(&padded)
            .into_iter()
            .map(|contour| RawOutline {
                points: contour
                    .points
                    .iter()
                    .map(|p| IntPoint::new(p.x - 1, p.y - 1))
                    .collect(),
                kind: match contour.border_type {
                    BorderType::Outer => OutlineKind::Outer,
                    BorderType::Hole => OutlineKind::Hole,
                },
                parent: contour.parent,
            })
            .collect()
    }
}

impl Tracing for BinarizedExact {
    type Contour = ExactContour;

    fn glyphs(&self, image: &GrayImage) -> Result<Vec<Glyph<ExactContour>>, TraceError> {
        let outlines = self.outlines(image);
        let glyphs = glyphs_from_outlines(&outlines)?;
        debug!(
            outlines = outlines.len(),
            glyphs = glyphs.len(),
            "traced exact boundaries"
        );
        Ok(glyphs)
    }
}

/// Group border chains into glyphs: each outer outline followed by the holes
/// whose parent it is.
///
/// Glyphs come in the order of their outer outlines.
///
/// # Errors
///
/// Returns [`TraceError::MalformedHierarchy`] if a parent index is out of
/// range, or a hole's parent is missing or not an outer outline.
pub fn glyphs_from_outlines(
    outlines: &[RawOutline],
) -> Result<Vec<Glyph<ExactContour>>, TraceError> {
    let mut holes: Vec<Vec<usize>> = vec![Vec::new(); outlines.len()];
    for (i, outline) in outlines.iter().enumerate() {
        let malformed = TraceError::MalformedHierarchy {
            outline: i,
            parent: outline.parent,
        };
        let parent = match outline.parent {
            Some(parent) => Some(outlines.get(parent).ok_or(malformed.clone())?),
            None => None,
        };
        if outline.kind == OutlineKind::Hole {
            match (outline.parent, parent) {
                (Some(index), Some(p)) if p.kind == OutlineKind::Outer => holes[index].push(i),
                _ => return Err(malformed),
            }
        }
    }

    let glyphs = outlines
        .iter()
        .zip(&holes)
        .filter(|(outline, _)| outline.kind == OutlineKind::Outer)
        .map(|(outline, holes)| {
            let outer = exact_contour(&outline.points);
            trace!(points = outer.len(), holes = holes.len(), "glyph");
            Glyph::new(
                outer,
                holes.iter().map(|&h| exact_contour(&outlines[h].points)),
            )
        })
        .collect();
    Ok(glyphs)
}

fn turn_index(table: &[[usize; 3]; 3], step: IntPoint) -> usize {
    let step = step.signum();
    table[(step.x + 1) as usize][(step.y + 1) as usize]
}

/// Convert a border chain of pixel centers into the polygon along the pixel
/// edges between foreground and background.
///
/// Around every chain pixel the walk takes between one and four unit steps,
/// depending on how the chain turns there. Runs of equal steps are merged,
/// so the result has one vertex per change of direction. The foreground is
/// on the left of the walk, so outer borders have a positive area and holes
/// a negative one.
pub fn exact_contour(chain: &[IntPoint]) -> ExactContour {
    let n = chain.len();
    if n == 0 {
        return Contour::new(Vec::new());
    }

    let incoming: Vec<IntPoint> = (0..n).map(|i| chain[i] - chain[(i + n - 1) % n]).collect();
    let first_direction = turn_index(&FROM_DIRECTION, incoming[0]);
    let mut steps = Vec::with_capacity(2 * n);
    for i in 0..n {
        let from = turn_index(&FROM_DIRECTION, incoming[i]);
        let to = turn_index(&TO_DIRECTION, incoming[(i + 1) % n]);
        let to = (to + 4 - from) % 4 + from + 1;
        steps.extend_from_slice(&DIRECTIONS[from..to]);
    }

    let m = steps.len();
    let run_starts: Vec<usize> = (0..m)
        .filter(|&i| steps[i] != steps[(i + m - 1) % m])
        .collect();
    let Some(&first_run) = run_starts.first() else {
        return Contour::new(vec![chain[0]]);
    };

    // The steps before the first run start belong to the run wrapping around
    // the end of the walk.
    let lead = steps[..first_run]
        .iter()
        .fold(IntPoint::ZERO, |acc, &step| acc + step);
    let mut point = chain[0] + lead + START_CORNER[first_direction];
    let mut points = Vec::with_capacity(run_starts.len());
    for (k, &start) in run_starts.iter().enumerate() {
        let end = run_starts.get(k + 1).copied().unwrap_or(m + first_run);
        point += (start..end).fold(IntPoint::ZERO, |acc, i| acc + steps[i % m]);
        points.push(point);
    }
    Contour::new(points)
}
