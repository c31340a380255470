// Copyright 2025 the Glyphtrace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deduplication of repeated glyphs.
//!
//! Every occurrence is resolved to an absolute glyph and anchored at the
//! minimum corner of its outer bounding box, with every contour starting at
//! its lexicographically smallest vertex. Occurrences whose anchored glyphs
//! are equal form a group; groups with at least two members are moved into a
//! pool and their occurrences become references. Geometry never changes,
//! only its representation.
//!
//! ```
//! use glyphtrace::unify::unify_drawing;
//! use glyphtrace::{Contour, Drawing, Glyph, IntPoint};
//!
//! let square = |x: i32, y: i32| -> Glyph<Contour<IntPoint>> {
//!     let outer = [(x, y + 2), (x + 2, y + 2), (x + 2, y), (x, y)]
//!         .into_iter()
//!         .map(IntPoint::from)
//!         .collect();
//!     Glyph::new(outer, [])
//! };
//! let drawing = Drawing::from_glyphs(10, 10, &[square(1, 1), square(6, 3)]);
//! let unified = unify_drawing(&drawing).unwrap();
//! assert_eq!(unified.referenced_glyphs.len(), 1);
//! assert_eq!(unified.rasterize().unwrap(), drawing.rasterize().unwrap());
//! ```

use std::collections::HashMap;

use smallvec::SmallVec;
use tracing::debug;

use crate::{
    Document, Drawing, Glyph, GlyphInstance, GlyphOccurrence, GlyphReference, Outline, UnifyError,
};

/// Structurally distinct glyphs, found by hash and confirmed by comparison.
struct Grouping<C: Outline> {
    by_hash: HashMap<u64, SmallVec<[usize; 1]>>,
    glyphs: Vec<Glyph<C>>,
}

impl<C: Outline> Grouping<C> {
    fn new() -> Self {
        Grouping {
            by_hash: HashMap::new(),
            glyphs: Vec::new(),
        }
    }

    /// The group of `glyph`, created if needed. Groups are numbered in the
    /// order they are first seen.
    fn group(&mut self, glyph: &Glyph<C>) -> usize {
        let candidates = self.by_hash.entry(glyph.structural_hash()).or_default();
        if let Some(&group) = candidates.iter().find(|&&g| self.glyphs[g] == *glyph) {
            return group;
        }
        let group = self.glyphs.len();
        candidates.push(group);
        self.glyphs.push(glyph.clone());
        group
    }

    fn len(&self) -> usize {
        self.glyphs.len()
    }
}

/// An input occurrence together with its anchored form.
struct Placed<'a, C: Outline> {
    original: &'a GlyphOccurrence<C>,
    absolute: Glyph<C>,
    anchored: GlyphInstance<C>,
    group: usize,
}

fn place<'a, C: Outline>(
    drawing: &'a Drawing<C>,
    shared: Option<&[Glyph<C>]>,
    grouping: &mut Grouping<C>,
) -> Result<Vec<Placed<'a, C>>, UnifyError> {
    drawing
        .occurrences
        .iter()
        .map(|original| -> Result<_, UnifyError> {
            let absolute = drawing.resolve(original, shared)?;
            let anchored = GlyphInstance::from_glyph(&absolute.standardize());
            let group = grouping.group(&anchored.glyph);
            Ok(Placed {
                original,
                absolute,
                anchored,
                group,
            })
        })
        .collect()
}

/// Assign pool slots to the eligible groups occurring at least twice, in the
/// order each one reaches its second occurrence.
fn local_pool<C: Outline>(
    placed: &[Placed<'_, C>],
    group_count: usize,
    eligible: impl Fn(usize) -> bool,
) -> (Vec<Option<usize>>, Vec<usize>) {
    let mut seen = vec![0_u32; group_count];
    let mut slots = vec![None; group_count];
    let mut order = Vec::new();
    for p in placed.iter().filter(|p| eligible(p.group)) {
        seen[p.group] += 1;
        if seen[p.group] == 2 {
            slots[p.group] = Some(order.len());
            order.push(p.group);
        }
    }
    (slots, order)
}

/// Rewrite occurrences, turning those of pooled groups into references.
///
/// `slot` gives the pool index of a group and whether the pool is shared.
/// Unpooled occurrences stay as they were, except that references are
/// expanded into instances.
fn rewrite<C: Outline>(
    placed: Vec<Placed<'_, C>>,
    slot: impl Fn(usize) -> Option<(usize, bool)>,
) -> Vec<GlyphOccurrence<C>> {
    placed
        .into_iter()
        .map(|p| match (slot(p.group), p.original) {
            (Some((index, shared)), _) => GlyphOccurrence::Reference(GlyphReference {
                position: p.anchored.position,
                index,
                shared,
            }),
            (None, GlyphOccurrence::Instance(instance)) => {
                GlyphOccurrence::Instance(instance.clone())
            }
            (None, GlyphOccurrence::Reference(_)) => {
                GlyphInstance::from_glyph(&p.absolute).into()
            }
        })
        .collect()
}

/// Pool the glyphs repeated within a standalone drawing.
///
/// The result has one pooled glyph per structurally distinct glyph occurring
/// at least twice, and renders exactly like the input.
///
/// # Errors
///
/// Returns an [`UnifyError`] if a reference of the input cannot be
/// resolved, including references to a shared pool.
pub fn unify_drawing<C: Outline>(drawing: &Drawing<C>) -> Result<Drawing<C>, UnifyError> {
    let mut grouping = Grouping::new();
    let placed = place(drawing, None, &mut grouping)?;
    let (slots, order) = local_pool(&placed, grouping.len(), |_| true);

    let occurrences = rewrite(placed, |group| slots[group].map(|index| (index, false)));
    let referenced_glyphs: Vec<_> = order
        .into_iter()
        .map(|group| grouping.glyphs[group].clone())
        .collect();
    debug!(
        occurrences = occurrences.len(),
        distinct = grouping.len(),
        pooled = referenced_glyphs.len(),
        "unified drawing"
    );
    Ok(Drawing {
        width: drawing.width,
        height: drawing.height,
        occurrences,
        referenced_glyphs,
    })
}

/// Pool the glyphs repeated across and within the pages of a document.
///
/// Glyphs found on at least two pages go to the shared pool, most frequent
/// first, ties broken by the order they are first seen. Glyphs repeated
/// only within one page go to that page's pool.
///
/// # Errors
///
/// Returns an [`UnifyError`] if a reference of the input cannot be resolved.
pub fn unify_document<C: Outline>(document: &Document<C>) -> Result<Document<C>, UnifyError> {
    let mut grouping = Grouping::new();
    let pages = document
        .pages
        .iter()
        .map(|page| place(page, Some(&document.shared_glyphs), &mut grouping))
        .collect::<Result<Vec<_>, _>>()?;

    let group_count = grouping.len();
    let mut counts = vec![0_usize; group_count];
    let mut page_counts = vec![0_usize; group_count];
    let mut last_page = vec![None; group_count];
    for (page, placed) in pages.iter().enumerate() {
        for p in placed {
            counts[p.group] += 1;
            if last_page[p.group] != Some(page) {
                last_page[p.group] = Some(page);
                page_counts[p.group] += 1;
            }
        }
    }

    let mut shared_order: Vec<usize> = (0..group_count).filter(|&g| page_counts[g] >= 2).collect();
    // Stable, so equal counts keep first-seen order.
    shared_order.sort_by(|&a, &b| counts[b].cmp(&counts[a]));
    let mut shared_slots = vec![None; group_count];
    for (index, &group) in shared_order.iter().enumerate() {
        shared_slots[group] = Some(index);
    }

    let mut local_total = 0;
    let new_pages: Vec<_> = document
        .pages
        .iter()
        .zip(pages)
        .map(|(page, placed)| {
            let (slots, order) = local_pool(&placed, group_count, |g| shared_slots[g].is_none());
            local_total += order.len();
            let occurrences = rewrite(placed, |group| {
                shared_slots[group]
                    .map(|index| (index, true))
                    .or(slots[group].map(|index| (index, false)))
            });
            Drawing {
                width: page.width,
                height: page.height,
                occurrences,
                referenced_glyphs: order
                    .into_iter()
                    .map(|group| grouping.glyphs[group].clone())
                    .collect(),
            }
        })
        .collect();

    let shared_glyphs: Vec<_> = shared_order
        .into_iter()
        .map(|group| grouping.glyphs[group].clone())
        .collect();
    debug!(
        pages = new_pages.len(),
        distinct = group_count,
        shared = shared_glyphs.len(),
        local = local_total,
        "unified document"
    );
    Ok(Document {
        pages: new_pages,
        shared_glyphs,
    })
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::trace::{BinarizedExact, Tracing};
    use crate::{Contour, ExactContour, IntPoint};

    fn rect(x: i32, y: i32, w: i32, h: i32) -> ExactContour {
        Contour::new(vec![
            IntPoint::new(x, y + h),
            IntPoint::new(x + w, y + h),
            IntPoint::new(x + w, y),
            IntPoint::new(x, y),
        ])
    }

    fn block(x: i32, y: i32, w: i32, h: i32) -> Glyph<ExactContour> {
        Glyph::new(rect(x, y, w, h), [])
    }

    fn squares_image(width: u32, height: u32, corners: &[(u32, u32)], size: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let inside = corners
                .iter()
                .any(|&(cx, cy)| (cx..cx + size).contains(&x) && (cy..cy + size).contains(&y));
            if inside {
                Luma([0])
            } else {
                Luma([255])
            }
        })
    }

    fn standardized(glyphs: Vec<Glyph<ExactContour>>) -> Vec<Glyph<ExactContour>> {
        glyphs.iter().map(Glyph::standardize).collect()
    }

    fn reference(occurrence: &GlyphOccurrence<ExactContour>) -> GlyphReference<IntPoint> {
        match occurrence {
            GlyphOccurrence::Reference(reference) => *reference,
            GlyphOccurrence::Instance(_) => panic!("expected a reference, got {occurrence:?}"),
        }
    }

    #[test]
    fn two_equal_squares_share_one_glyph() {
        let image = squares_image(20, 12, &[(1, 1), (12, 5)], 5);
        let drawing = BinarizedExact::default().trace(&image).unwrap();
        assert_eq!(drawing.occurrences.len(), 2);

        let unified = unify_drawing(&drawing).unwrap();
        assert_eq!(unified.referenced_glyphs.len(), 1);
        let a = reference(&unified.occurrences[0]);
        let b = reference(&unified.occurrences[1]);
        assert_eq!((a.index, a.shared), (0, false));
        assert_eq!((b.index, b.shared), (0, false));
        assert_ne!(a.position, b.position);
        assert_eq!(unified.rasterize().unwrap(), image);
    }

    #[test]
    fn shared_across_three_pages() {
        let pages = [(2, 2), (7, 1), (4, 6)]
            .into_iter()
            .map(|corner| {
                let image = squares_image(16, 16, &[corner], 3);
                BinarizedExact::default().trace(&image).unwrap()
            })
            .collect();
        let document = Document::new(pages);
        let unified = unify_document(&document).unwrap();

        assert_eq!(unified.shared_glyphs.len(), 1);
        for (page, original) in unified.pages.iter().zip(&document.pages) {
            assert!(page.referenced_glyphs.is_empty());
            assert_eq!(page.occurrences.len(), 1);
            let r = reference(&page.occurrences[0]);
            assert_eq!((r.index, r.shared), (0, true));
            assert_eq!((page.width, page.height), (original.width, original.height));
        }
        for page in 0..3 {
            assert_eq!(
                unified.rasterize_page(page).unwrap(),
                document.rasterize_page(page).unwrap()
            );
        }
    }

    #[test]
    fn singletons_stay_instances() {
        let drawing = Drawing::from_glyphs(
            30,
            10,
            &[block(0, 0, 2, 2), block(5, 0, 3, 2), block(10, 4, 2, 2)],
        );
        let unified = unify_drawing(&drawing).unwrap();
        assert_eq!(unified.referenced_glyphs.len(), 1);
        assert_eq!(unified.occurrences[1], drawing.occurrences[1]);
        assert_eq!(reference(&unified.occurrences[2]).position, IntPoint::new(10, 4));
    }

    #[test]
    fn lone_references_are_expanded() {
        let mut drawing = Drawing::new(10, 10);
        drawing.referenced_glyphs.push(block(0, 0, 2, 3));
        drawing
            .occurrences
            .push(GlyphOccurrence::Reference(GlyphReference {
                position: IntPoint::new(4, 1),
                index: 0,
                shared: false,
            }));
        let unified = unify_drawing(&drawing).unwrap();
        assert!(unified.referenced_glyphs.is_empty());
        match &unified.occurrences[0] {
            GlyphOccurrence::Instance(instance) => {
                assert_eq!(instance.absolute(), block(4, 1, 2, 3));
            }
            other => panic!("expected an instance, got {other:?}"),
        }
    }

    #[test]
    fn start_vertex_and_hole_order_do_not_split_groups() {
        let outer = rect(0, 0, 6, 6);
        let rotated = Contour::new(
            outer.points()[2..]
                .iter()
                .chain(&outer.points()[..2])
                .map(|&p| p + IntPoint::new(10, 0))
                .collect(),
        );
        let holes = [rect(1, 1, 1, 1), rect(3, 3, 1, 1)];
        let a = Glyph::new(outer, holes.clone());
        let b = Glyph::new(
            rotated,
            holes.iter().rev().map(|h| h.translate(IntPoint::new(10, 0))),
        );
        let unified = unify_drawing(&Drawing::from_glyphs(20, 10, &[a, b])).unwrap();
        assert_eq!(unified.referenced_glyphs.len(), 1);
    }

    #[test]
    fn shared_pool_order() {
        let (a, b) = (block(0, 0, 2, 2), block(0, 0, 3, 1));
        let at = |glyph: &Glyph<ExactContour>, x: i32| glyph.translate(IntPoint::new(x, 0));
        let page = |glyphs: &[Glyph<ExactContour>]| Drawing::from_glyphs(40, 4, glyphs);

        // `b` is more frequent, so it comes first despite being seen later.
        let document = Document::new(vec![
            page(&[at(&a, 0), at(&b, 5), at(&b, 10)]),
            page(&[at(&a, 0), at(&b, 5)]),
        ]);
        let unified = unify_document(&document).unwrap();
        assert_eq!(
            unified.shared_glyphs,
            vec![b.standardize(), a.standardize()]
        );

        // Equal counts keep first-seen order.
        let tied = Document::new(vec![
            page(&[at(&a, 0), at(&b, 5)]),
            page(&[at(&b, 0), at(&a, 5)]),
        ]);
        let unified_tied = unify_document(&tied).unwrap();
        assert_eq!(
            unified_tied.shared_glyphs,
            vec![a.standardize(), b.standardize()]
        );
    }

    #[test]
    fn local_and_shared_pools_are_disjoint() {
        let (a, b, c) = (block(0, 0, 2, 2), block(0, 0, 3, 1), block(0, 0, 1, 4));
        let at = |glyph: &Glyph<ExactContour>, x: i32| glyph.translate(IntPoint::new(x, 0));
        let document = Document::new(vec![
            Drawing::from_glyphs(40, 5, &[at(&a, 0), at(&a, 5), at(&b, 10), at(&b, 15)]),
            Drawing::from_glyphs(40, 5, &[at(&b, 0), at(&c, 5)]),
        ]);
        let unified = unify_document(&document).unwrap();
        assert_eq!(unified.shared_glyphs, vec![b.standardize()]);
        assert_eq!(unified.pages[0].referenced_glyphs, vec![a.standardize()]);
        assert!(unified.pages[1].referenced_glyphs.is_empty());

        let first = &unified.pages[0].occurrences;
        assert_eq!((reference(&first[0]).index, reference(&first[0]).shared), (0, false));
        assert_eq!((reference(&first[2]).index, reference(&first[2]).shared), (0, true));
        assert!(matches!(
            unified.pages[1].occurrences[1],
            GlyphOccurrence::Instance(_)
        ));
        for page in 0..2 {
            assert_eq!(
                standardized(unified.absolute_glyphs(page).unwrap()),
                standardized(document.absolute_glyphs(page).unwrap())
            );
        }
    }

    #[test]
    fn unifying_twice_changes_nothing() {
        let image = squares_image(30, 12, &[(1, 1), (8, 1), (15, 4), (22, 2)], 4);
        let drawing = BinarizedExact::default().trace(&image).unwrap();
        let once = unify_drawing(&drawing).unwrap();
        assert_eq!(unify_drawing(&once).unwrap(), once);
    }

    #[test]
    fn grouping_is_translation_invariant() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let shapes: Vec<(i32, i32)> = (0..rng.random_range(1..6))
                .map(|_| (rng.random_range(1..4), rng.random_range(1..4)))
                .collect();
            let placements: Vec<(usize, i32, i32)> = (0..rng.random_range(1..15))
                .map(|_| {
                    (
                        rng.random_range(0..shapes.len()),
                        rng.random_range(0..100),
                        rng.random_range(0..100),
                    )
                })
                .collect();
            let glyphs_at = |dx: i32, dy: i32| -> Vec<Glyph<ExactContour>> {
                placements
                    .iter()
                    .map(|&(s, x, y)| block(x + dx, y + dy, shapes[s].0, shapes[s].1))
                    .collect()
            };

            let unified = unify_drawing(&Drawing::from_glyphs(200, 200, &glyphs_at(0, 0))).unwrap();
            let (dx, dy) = (rng.random_range(-50..50), rng.random_range(-50..50));
            let moved = unify_drawing(&Drawing::from_glyphs(200, 200, &glyphs_at(dx, dy))).unwrap();

            let mut repeated: Vec<(i32, i32)> = placements
                .iter()
                .map(|&(s, _, _)| shapes[s])
                .filter(|shape| {
                    placements.iter().filter(|&&(s, _, _)| shapes[s] == *shape).count() >= 2
                })
                .collect();
            repeated.sort_unstable();
            repeated.dedup();
            assert_eq!(unified.referenced_glyphs.len(), repeated.len());
            assert_eq!(unified.referenced_glyphs, moved.referenced_glyphs);
            for (a, b) in unified.occurrences.iter().zip(&moved.occurrences) {
                assert_eq!(a.position() + IntPoint::new(dx, dy), b.position());
                if let (GlyphOccurrence::Reference(a), GlyphOccurrence::Reference(b)) = (a, b) {
                    assert_eq!(a.index, b.index);
                }
            }
            assert_eq!(
                standardized(unified.absolute_glyphs().unwrap()),
                standardized(glyphs_at(0, 0))
            );
        }
    }

    #[test]
    fn unresolvable_references() {
        let mut drawing: Drawing<ExactContour> = Drawing::new(10, 10);
        drawing
            .occurrences
            .push(GlyphOccurrence::Reference(GlyphReference {
                position: IntPoint::ZERO,
                index: 0,
                shared: true,
            }));
        assert_eq!(
            unify_drawing(&drawing),
            Err(UnifyError::SharedReferenceOutsideDocument { index: 0 })
        );
        assert_eq!(
            unify_document(&Document::new(vec![drawing])),
            Err(UnifyError::DanglingReference {
                index: 0,
                pool_len: 0,
                shared: true
            })
        );
    }
}
