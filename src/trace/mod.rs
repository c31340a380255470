// Copyright 2025 the Glyphtrace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing pixel images into drawings.
//!
//! There are two families of tracers. The binarized ones threshold the image
//! and follow the exact pixel boundaries ([`BinarizedExact`]), optionally
//! reducing them to polygons that rasterize back to the same pixels
//! ([`BinarizedPolygon`]). [`GrayscalePolygon`] instead follows the
//! iso-line of the grayscale values at a threshold, which gives smoother
//! outlines for anti-aliased input.

mod exact;
mod grayscale;
pub mod isoline;
mod polygon;

pub use exact::{exact_contour, glyphs_from_outlines, BinarizedExact, OutlineKind, RawOutline};
pub use grayscale::{stitch_fragments, GrayscalePolygon};
pub use polygon::{BinarizedPolygon, PolygonTracer};

use image::GrayImage;

use crate::{Drawing, Glyph, Outline, TraceError};

/// A strategy turning an 8-bit grayscale image into glyphs.
pub trait Tracing {
    /// The kind of contour produced.
    type Contour: Outline;

    /// Find the glyphs of an image, in absolute pixel coordinates.
    ///
    /// # Errors
    ///
    /// Returns a [`TraceError`] if the contour primitive yields malformed
    /// output. No glyphs are returned in that case.
    fn glyphs(&self, image: &GrayImage) -> Result<Vec<Glyph<Self::Contour>>, TraceError>;

    /// Trace an image into a drawing with one instance per glyph.
    ///
    /// # Errors
    ///
    /// See [`Tracing::glyphs`].
    fn trace(&self, image: &GrayImage) -> Result<Drawing<Self::Contour>, TraceError> {
        let glyphs = self.glyphs(image)?;
        Ok(Drawing::from_glyphs(image.width(), image.height(), &glyphs))
    }
}
