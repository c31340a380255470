// Copyright 2025 the Glyphtrace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Iso-lines of a grayscale image by marching squares.
//!
//! Samples sit at pixel centers `(x + 0.5, y + 0.5)`; a sample is foreground
//! when its value is below the threshold. Every line is oriented with the
//! foreground on its left (in the y-down image frame), so closed lines around
//! foreground are outer boundaries and closed lines around background are
//! holes, with the same area signs as exact pixel boundaries.
//!
//! Lines that reach the outermost row or column of samples cannot be closed
//! and are returned open, starting and ending on that border.

use arrayvec::ArrayVec;
use image::GrayImage;

use crate::Point;

/// The iso-lines of an image at one threshold.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IsoLines {
    /// Lines that loop back to their start; the closing point is not repeated.
    pub closed: Vec<Vec<Point>>,
    /// Lines clipped by the image border.
    pub open: Vec<Vec<Point>>,
}

/// The grid of samples, with edges between adjacent samples numbered
/// horizontal ones first, row by row.
struct Grid<'a> {
    samples: &'a [u8],
    width: usize,
    height: usize,
    threshold: f64,
}

impl Grid<'_> {
    fn value(&self, x: usize, y: usize) -> f64 {
        f64::from(self.samples[y * self.width + x])
    }

    fn is_foreground(&self, x: usize, y: usize) -> bool {
        self.value(x, y) < self.threshold
    }

    fn horizontal_edges(&self) -> usize {
        (self.width - 1) * self.height
    }

    fn edge_count(&self) -> usize {
        self.horizontal_edges() + self.width * (self.height - 1)
    }

    /// The edge from sample `(x, y)` to `(x + 1, y)`.
    fn horizontal(&self, x: usize, y: usize) -> usize {
        y * (self.width - 1) + x
    }

    /// The edge from sample `(x, y)` to `(x, y + 1)`.
    fn vertical(&self, x: usize, y: usize) -> usize {
        self.horizontal_edges() + y * self.width + x
    }

    /// Where the threshold crosses an edge, interpolated linearly.
    fn crossing(&self, edge: usize) -> Point {
        let ((x0, y0), (x1, y1)) = if edge < self.horizontal_edges() {
            let (x, y) = (edge % (self.width - 1), edge / (self.width - 1));
            ((x, y), (x + 1, y))
        } else {
            let edge = edge - self.horizontal_edges();
            let (x, y) = (edge % self.width, edge / self.width);
            ((x, y), (x, y + 1))
        };
        let (v0, v1) = (self.value(x0, y0), self.value(x1, y1));
        let t = (self.threshold - v0) / (v1 - v0);
        let center = |x: usize, y: usize| Point::new(x as f64 + 0.5, y as f64 + 0.5);
        center(x0, y0).lerp(center(x1, y1), t)
    }

    /// Line pieces through the cell whose top left sample is `(x, y)`, as
    /// pairs of entry and exit edges.
    fn cell(&self, x: usize, y: usize) -> ArrayVec<(usize, usize), 2> {
        // Samples and edges in clockwise order, edge `k` running from sample
        // `k` to sample `k + 1`.
        let samples = [(x, y), (x + 1, y), (x + 1, y + 1), (x, y + 1)];
        let edges = [
            self.horizontal(x, y),
            self.vertical(x + 1, y),
            self.horizontal(x, y + 1),
            self.vertical(x, y),
        ];
        let fg = samples.map(|(sx, sy)| self.is_foreground(sx, sy));

        let mut pieces = ArrayVec::new();
        let is_entry = |k: usize| !fg[k] && fg[(k + 1) % 4];
        let is_exit = |k: usize| fg[k] && !fg[(k + 1) % 4];
        let entries: ArrayVec<usize, 2> = (0..4).filter(|&k| is_entry(k)).collect();
        if entries.len() == 2 {
            // Saddle: either the foreground samples connect through the cell
            // center, cutting off the background corners, or they don't.
            let mean = samples
                .iter()
                .map(|&(sx, sy)| self.value(sx, sy))
                .sum::<f64>()
                / 4.0;
            let connected = mean < self.threshold;
            for &k in &entries {
                let exit = if connected { (k + 3) % 4 } else { (k + 1) % 4 };
                pieces.push((edges[k], edges[exit]));
            }
        } else if let Some(&k) = entries.first() {
            if let Some(exit) = (1..4).map(|d| (k + d) % 4).find(|&e| is_exit(e)) {
                pieces.push((edges[k], edges[exit]));
            }
        }
        pieces
    }
}

/// Trace the iso-lines of `image` at `threshold`.
pub fn iso_lines(image: &GrayImage, threshold: f64) -> IsoLines {
    let (width, height) = image.dimensions();
    let grid = Grid {
        samples: image.as_raw(),
        width: width as usize,
        height: height as usize,
        threshold,
    };
    if grid.width < 2 || grid.height < 2 {
        return IsoLines::default();
    }

    let edge_count = grid.edge_count();
    let mut outgoing: Vec<Option<usize>> = vec![None; edge_count];
    let mut has_incoming = vec![false; edge_count];
    for y in 0..grid.height - 1 {
        for x in 0..grid.width - 1 {
            for (entry, exit) in grid.cell(x, y) {
                outgoing[entry] = Some(exit);
                has_incoming[exit] = true;
            }
        }
    }

    let follow = |start: usize, visited: &mut [bool]| {
        let mut line = Vec::new();
        let mut edge = start;
        loop {
            visited[edge] = true;
            line.push(grid.crossing(edge));
            match outgoing[edge] {
                Some(next) if next != start => edge = next,
                _ => break,
            }
        }
        line
    };

    let mut visited = vec![false; edge_count];
    let mut lines = IsoLines::default();
    // Open lines start on border edges nothing flows into.
    for edge in 0..edge_count {
        if outgoing[edge].is_some() && !has_incoming[edge] {
            lines.open.push(follow(edge, &mut visited));
        }
    }
    for edge in 0..edge_count {
        if outgoing[edge].is_some() && !visited[edge] {
            lines.closed.push(follow(edge, &mut visited));
        }
    }
    lines
}
