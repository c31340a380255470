// Copyright 2025 the Glyphtrace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawings and multi-page documents.

use image::{GrayImage, Luma};

use crate::{
    Contour, ContourPoint, Glyph, GlyphInstance, GlyphOccurrence, GlyphReference, Outline, Point,
    UnifyError,
};

/// A single vector page.
#[derive(Clone, Debug, PartialEq)]
pub struct Drawing<C: Outline> {
    /// Width of the source image in pixels.
    pub width: u32,
    /// Height of the source image in pixels.
    pub height: u32,
    /// Glyph placements, in tracing order.
    pub occurrences: Vec<GlyphOccurrence<C>>,
    /// Glyphs referenced more than once on this page.
    pub referenced_glyphs: Vec<Glyph<C>>,
}

impl<C: Outline> Drawing<C> {
    /// Create an empty drawing.
    pub fn new(width: u32, height: u32) -> Self {
        Drawing {
            width,
            height,
            occurrences: Vec::new(),
            referenced_glyphs: Vec::new(),
        }
    }

    /// Create a drawing with one instance per glyph, given in absolute
    /// coordinates.
    pub fn from_glyphs(width: u32, height: u32, glyphs: &[Glyph<C>]) -> Self {
        Drawing {
            occurrences: glyphs
                .iter()
                .map(|glyph| GlyphInstance::from_glyph(glyph).into())
                .collect(),
            ..Drawing::new(width, height)
        }
    }

    /// Resolve one occurrence to a glyph in absolute coordinates.
    ///
    /// `shared` is the document pool, if this drawing is a page of one.
    pub fn resolve(
        &self,
        occurrence: &GlyphOccurrence<C>,
        shared: Option<&[Glyph<C>]>,
    ) -> Result<Glyph<C>, UnifyError> {
        match occurrence {
            GlyphOccurrence::Instance(instance) => Ok(instance.absolute()),
            GlyphOccurrence::Reference(reference) => {
                let pool: &[Glyph<C>] = if reference.shared {
                    shared.ok_or(UnifyError::SharedReferenceOutsideDocument {
                        index: reference.index,
                    })?
                } else {
                    &self.referenced_glyphs
                };
                lookup(pool, reference).map(|glyph| glyph.translate(reference.position))
            }
        }
    }

    /// All glyphs of a standalone drawing in absolute coordinates.
    pub fn absolute_glyphs(&self) -> Result<Vec<Glyph<C>>, UnifyError> {
        self.absolute_glyphs_with(None)
    }

    pub(crate) fn absolute_glyphs_with(
        &self,
        shared: Option<&[Glyph<C>]>,
    ) -> Result<Vec<Glyph<C>>, UnifyError> {
        self.occurrences
            .iter()
            .map(|occurrence| self.resolve(occurrence, shared))
            .collect()
    }
}

fn lookup<'a, C: Outline>(
    pool: &'a [Glyph<C>],
    reference: &GlyphReference<C::Point>,
) -> Result<&'a Glyph<C>, UnifyError> {
    pool.get(reference.index)
        .ok_or(UnifyError::DanglingReference {
            index: reference.index,
            pool_len: pool.len(),
            shared: reference.shared,
        })
}

impl<P: ContourPoint> Drawing<Contour<P>> {
    /// Render the drawing back to pixels.
    ///
    /// Each pixel is sampled at its center with the non-zero winding rule;
    /// foreground is 0 and background 255.
    pub fn rasterize(&self) -> Result<GrayImage, UnifyError> {
        Ok(rasterize_glyphs(
            self.width,
            self.height,
            &self.absolute_glyphs()?,
        ))
    }
}

/// A multi-page document sharing one glyph pool.
#[derive(Clone, Debug, PartialEq)]
pub struct Document<C: Outline> {
    /// The pages, in order.
    pub pages: Vec<Drawing<C>>,
    /// Glyphs occurring on more than one page.
    pub shared_glyphs: Vec<Glyph<C>>,
}

impl<C: Outline> Document<C> {
    /// Create a document without shared glyphs.
    pub fn new(pages: Vec<Drawing<C>>) -> Self {
        Document {
            pages,
            shared_glyphs: Vec::new(),
        }
    }

    fn page(&self, page: usize) -> Result<&Drawing<C>, UnifyError> {
        self.pages.get(page).ok_or(UnifyError::MissingPage {
            page,
            pages: self.pages.len(),
        })
    }

    /// Resolve one occurrence of a page to a glyph in absolute coordinates.
    pub fn resolve(
        &self,
        page: usize,
        occurrence: &GlyphOccurrence<C>,
    ) -> Result<Glyph<C>, UnifyError> {
        self.page(page)?
            .resolve(occurrence, Some(&self.shared_glyphs))
    }

    /// All glyphs of a page in absolute coordinates.
    pub fn absolute_glyphs(&self, page: usize) -> Result<Vec<Glyph<C>>, UnifyError> {
        self.page(page)?
            .absolute_glyphs_with(Some(&self.shared_glyphs))
    }
}

impl<P: ContourPoint> Document<Contour<P>> {
    /// Render one page back to pixels, like [`Drawing::rasterize`].
    pub fn rasterize_page(&self, page: usize) -> Result<GrayImage, UnifyError> {
        let drawing = self.page(page)?;
        Ok(rasterize_glyphs(
            drawing.width,
            drawing.height,
            &self.absolute_glyphs(page)?,
        ))
    }
}

fn rasterize_glyphs<P: ContourPoint>(
    width: u32,
    height: u32,
    glyphs: &[Glyph<Contour<P>>],
) -> GrayImage {
    let contours: Vec<_> = glyphs
        .iter()
        .flat_map(|glyph| glyph.contours())
        .map(|contour| (contour.to_line_contour(), contour.bounds()))
        .collect();
    GrayImage::from_fn(width, height, |x, y| {
        let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        let winding: i32 = contours
            .iter()
            .filter(|(_, bounds)| {
                let (min, max) = (bounds.min.to_point(), bounds.max.to_point());
                (min.x..=max.x).contains(&p.x) && (min.y..=max.y).contains(&p.y)
            })
            .map(|(contour, _)| contour.winding(p))
            .sum();
        if winding != 0 {
            Luma([0])
        } else {
            Luma([255])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExactContour, IntPoint};

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> ExactContour {
        Contour::new(vec![
            IntPoint::new(x0, y1),
            IntPoint::new(x1, y1),
            IntPoint::new(x1, y0),
            IntPoint::new(x0, y0),
        ])
    }

    fn reversed(c: &ExactContour) -> ExactContour {
        Contour::new(c.points().iter().rev().copied().collect())
    }

    #[test]
    fn rasterize_ring() {
        let ring = Glyph::new(rect(1, 1, 5, 5), [reversed(&rect(2, 2, 4, 4))]);
        let drawing = Drawing::from_glyphs(6, 6, &[ring]);
        let image = drawing.rasterize().unwrap();
        for (x, y, pixel) in image.enumerate_pixels() {
            let on_ring = (1..5).contains(&x)
                && (1..5).contains(&y)
                && !((2..4).contains(&x) && (2..4).contains(&y));
            assert_eq!(pixel.0[0] == 0, on_ring, "pixel ({x}, {y})");
        }
    }

    #[test]
    fn references_resolve_against_pools() {
        let glyph = Glyph::new(rect(0, 0, 2, 2), []);
        let mut drawing = Drawing::new(10, 10);
        drawing.referenced_glyphs.push(glyph.clone());
        drawing
            .occurrences
            .push(GlyphOccurrence::Reference(GlyphReference {
                position: IntPoint::new(3, 4),
                index: 0,
                shared: false,
            }));
        let resolved = drawing.absolute_glyphs().unwrap();
        assert_eq!(resolved, vec![Glyph::new(rect(3, 4, 5, 6), [])]);

        let shared_ref = GlyphOccurrence::Reference(GlyphReference {
            position: IntPoint::ZERO,
            index: 0,
            shared: true,
        });
        assert_eq!(
            drawing.resolve(&shared_ref, None),
            Err(UnifyError::SharedReferenceOutsideDocument { index: 0 })
        );

        let document = Document {
            pages: vec![drawing.clone()],
            shared_glyphs: vec![glyph],
        };
        assert_eq!(
            document.resolve(0, &shared_ref).unwrap(),
            Glyph::new(rect(0, 0, 2, 2), [])
        );
        assert_eq!(
            document.resolve(1, &shared_ref),
            Err(UnifyError::MissingPage { page: 1, pages: 1 })
        );

        let dangling = GlyphOccurrence::Reference(GlyphReference {
            position: IntPoint::ZERO,
            index: 2,
            shared: false,
        });
        assert_eq!(
            drawing.resolve(&dangling, None),
            Err(UnifyError::DanglingReference {
                index: 2,
                pool_len: 1,
                shared: false
            })
        );
    }

    #[test]
    fn document_pages_rasterize() {
        let glyph = Glyph::new(rect(0, 0, 1, 1), []);
        let mut page = Drawing::new(3, 3);
        page.occurrences
            .push(GlyphOccurrence::Reference(GlyphReference {
                position: IntPoint::new(2, 1),
                index: 0,
                shared: true,
            }));
        let document = Document {
            pages: vec![page],
            shared_glyphs: vec![glyph],
        };
        let image = document.rasterize_page(0).unwrap();
        assert_eq!(image.get_pixel(2, 1).0, [0]);
        assert_eq!(image.pixels().filter(|p| p.0[0] == 0).count(), 1);
    }
}
