// Copyright 2025 the Glyphtrace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyphs and their placements in a drawing.

use smallvec::SmallVec;

use crate::{BoundingBox, Outline};

/// One connected foreground region: an outer contour plus its holes.
///
/// The first contour is always the outer one. Most glyphs have at most one
/// hole, so the contours are stored inline up to two.
#[derive(Clone, Debug)]
pub struct Glyph<C> {
    contours: SmallVec<[C; 2]>,
    hash: u64,
}

impl<C: Outline> Glyph<C> {
    /// Create a glyph from its outer contour and holes.
    pub fn new(outer: C, holes: impl IntoIterator<Item = C>) -> Self {
        let mut contours = SmallVec::new();
        contours.push(outer);
        contours.extend(holes);
        Self::from_contours(contours)
    }

    fn from_contours(contours: SmallVec<[C; 2]>) -> Self {
        let hash = contours
            .iter()
            .fold(0, |hash, c| hash ^ c.structural_hash());
        Glyph { contours, hash }
    }

    /// All contours, outer first.
    #[inline]
    pub fn contours(&self) -> &[C] {
        &self.contours
    }

    /// The outer contour.
    #[inline]
    pub fn outer(&self) -> &C {
        &self.contours[0]
    }

    /// The holes.
    #[inline]
    pub fn holes(&self) -> &[C] {
        &self.contours[1..]
    }

    /// The XOR of the contour hashes, independent of hole order.
    #[inline]
    pub fn structural_hash(&self) -> u64 {
        self.hash
    }

    /// The bounds of the outer contour.
    #[inline]
    pub fn bounds(&self) -> BoundingBox<C::Point> {
        self.outer().bounds()
    }

    /// Apply `f` to every contour.
    pub fn map<D: Outline>(&self, f: impl FnMut(&C) -> D) -> Glyph<D> {
        Glyph::from_contours(self.contours.iter().map(f).collect())
    }

    /// The glyph moved by `offset`.
    pub fn translate(&self, offset: C::Point) -> Self {
        self.map(|c| c.translate(offset))
    }

    /// The glyph moved by minus `offset`.
    pub fn untranslate(&self, offset: C::Point) -> Self {
        self.map(|c| c.untranslate(offset))
    }

    /// The glyph with every contour standardized.
    pub fn standardize(&self) -> Self {
        self.map(C::standardize)
    }
}

impl<C: Outline> PartialEq for Glyph<C> {
    /// Contours are compared as a multiset, so hole order does not matter.
    fn eq(&self, other: &Self) -> bool {
        if self.contours.len() != other.contours.len() || self.hash != other.hash {
            return false;
        }
        let mut matched: SmallVec<[bool; 4]> = SmallVec::from_elem(false, other.contours.len());
        self.contours.iter().all(|c| {
            let found = other.contours.iter().enumerate().position(|(j, o)| {
                !matched[j] && o.structural_hash() == c.structural_hash() && o == c
            });
            match found {
                Some(j) => {
                    matched[j] = true;
                    true
                }
                None => false,
            }
        })
    }
}

/// A glyph stored by value, relative to its position.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphInstance<C: Outline> {
    /// Where the glyph's local origin lies in the drawing.
    pub position: C::Point,
    /// The glyph, with coordinates relative to `position`.
    pub glyph: Glyph<C>,
}

impl<C: Outline> GlyphInstance<C> {
    /// Anchor a glyph given in absolute coordinates at the minimum corner of
    /// its outer contour's bounding box.
    ///
    /// Translated copies of the same shape then store identical contours.
    pub fn from_glyph(glyph: &Glyph<C>) -> Self {
        let position = glyph.bounds().origin();
        GlyphInstance {
            position,
            glyph: glyph.untranslate(position),
        }
    }

    /// The glyph in absolute coordinates.
    pub fn absolute(&self) -> Glyph<C> {
        self.glyph.translate(self.position)
    }
}

/// A placement of a pooled glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphReference<P> {
    /// Where the pooled glyph's local origin lies in the drawing.
    pub position: P,
    /// Index into the pool.
    pub index: usize,
    /// `true` for the document-shared pool, `false` for the page-local one.
    pub shared: bool,
}

/// One placement of a glyph within a drawing.
#[derive(Clone, Debug, PartialEq)]
pub enum GlyphOccurrence<C: Outline> {
    /// A glyph stored by value.
    Instance(GlyphInstance<C>),
    /// A glyph stored in a pool.
    Reference(GlyphReference<C::Point>),
}

impl<C: Outline> GlyphOccurrence<C> {
    /// The position of the occurrence.
    pub fn position(&self) -> C::Point {
        match self {
            GlyphOccurrence::Instance(instance) => instance.position,
            GlyphOccurrence::Reference(reference) => reference.position,
        }
    }
}

impl<C: Outline> From<GlyphInstance<C>> for GlyphOccurrence<C> {
    fn from(instance: GlyphInstance<C>) -> Self {
        GlyphOccurrence::Instance(instance)
    }
}
