// Copyright 2025 the Glyphtrace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Replacing traced contours with simpler or smoother ones.
//!
//! An [`Approximation`] maps single contours; the provided methods lift that
//! map to glyphs, drawings and documents. Pooled glyphs are approximated in
//! place, so references keep pointing at the same pool entries and are
//! carried over unchanged.
//!
//! Approximations that produce polygons can be chained: both
//! [`DouglasPeucker`] and [`SillyCubic`] take a preliminary approximation
//! that runs first.
//!
//! ```
//! use glyphtrace::approximation::{Approximation, DouglasPeucker};
//! use glyphtrace::trace::PolygonTracer;
//! use glyphtrace::{Contour, IntPoint, Point};
//!
//! let exact: Contour<IntPoint> = [(0, 8), (8, 8), (8, 0), (0, 0)]
//!     .into_iter()
//!     .map(IntPoint::from)
//!     .collect();
//! let dp = DouglasPeucker::new(1.0)
//!     .unwrap()
//!     .with_preliminary(PolygonTracer::default());
//! let polygon: Contour<Point> = dp.approximate_contour(&exact);
//! assert!(polygon.len() <= 8);
//! ```

mod douglas_peucker;
mod silly_cubic;

pub use douglas_peucker::DouglasPeucker;
pub use silly_cubic::SillyCubic;

use tracing::debug;

use crate::trace::PolygonTracer;
use crate::{
    Contour, ContourPoint, Document, Drawing, Glyph, GlyphInstance, GlyphOccurrence,
    GlyphReference, IntPoint, LineContour, Outline,
};

/// A map from polygonal contours with points of type `P` to another kind of
/// contour.
pub trait Approximation<P: ContourPoint> {
    /// The kind of contour produced.
    type Output: Outline;

    /// Approximate one contour.
    fn approximate_contour(&self, contour: &Contour<P>) -> Self::Output;

    /// Approximate every contour of a glyph.
    fn approximate_glyph(&self, glyph: &Glyph<Contour<P>>) -> Glyph<Self::Output> {
        glyph.map(|contour| self.approximate_contour(contour))
    }

    /// Approximate the instances and the page-local pool of a drawing.
    ///
    /// Instances keep their positions; references are carried over as they
    /// are.
    fn approximate_drawing(&self, drawing: &Drawing<Contour<P>>) -> Drawing<Self::Output>
    where
        P: Into<<Self::Output as Outline>::Point>,
    {
        let occurrences = drawing
            .occurrences
            .iter()
            .map(|occurrence| match occurrence {
                GlyphOccurrence::Instance(instance) => GlyphOccurrence::Instance(GlyphInstance {
                    position: instance.position.into(),
                    glyph: self.approximate_glyph(&instance.glyph),
                }),
                GlyphOccurrence::Reference(reference) => GlyphOccurrence::Reference(GlyphReference {
                    position: reference.position.into(),
                    index: reference.index,
                    shared: reference.shared,
                }),
            })
            .collect();
        let referenced_glyphs = drawing
            .referenced_glyphs
            .iter()
            .map(|glyph| self.approximate_glyph(glyph))
            .collect();
        debug!(
            occurrences = drawing.occurrences.len(),
            pooled = drawing.referenced_glyphs.len(),
            "approximated drawing"
        );
        Drawing {
            width: drawing.width,
            height: drawing.height,
            occurrences,
            referenced_glyphs,
        }
    }

    /// Approximate every page and the shared pool of a document.
    fn approximate_document(&self, document: &Document<Contour<P>>) -> Document<Self::Output>
    where
        P: Into<<Self::Output as Outline>::Point>,
    {
        Document {
            pages: document
                .pages
                .iter()
                .map(|page| self.approximate_drawing(page))
                .collect(),
            shared_glyphs: document
                .shared_glyphs
                .iter()
                .map(|glyph| self.approximate_glyph(glyph))
                .collect(),
        }
    }
}

/// Leaves every contour as it is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Exact;

impl<P: ContourPoint> Approximation<P> for Exact {
    type Output = Contour<P>;

    fn approximate_contour(&self, contour: &Contour<P>) -> Contour<P> {
        contour.clone()
    }
}

/// Polygons within half a pixel of exact boundaries.
impl Approximation<IntPoint> for PolygonTracer {
    type Output = LineContour;

    fn approximate_contour(&self, contour: &Contour<IntPoint>) -> LineContour {
        self.polygonize(contour)
    }
}
