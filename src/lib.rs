// Copyright 2025 the Glyphtrace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raster to vector tracing, with deduplication of repeated glyphs.
//!
//! Glyphtrace turns a grayscale image into [`Glyph`]s: an outer contour
//! around each connected foreground region together with the contours of
//! the holes in it. The pipeline has three stages, each usable on its own:
//!
//! - [`trace`]: find glyph boundaries, either exactly along pixel edges or
//!   as interpolated iso-lines of the gray levels.
//! - [`unify`]: pool glyphs that repeat within a [`Drawing`] or across the
//!   pages of a [`Document`], replacing their occurrences with references.
//! - [`approximation`]: replace contours with simpler polygons or with
//!   cubic curves.
//!
//! All coordinates are in pixels with the y axis pointing down. Contours
//! keep the foreground on their left, so outer contours have positive
//! [signed area](Contour::signed_area) and holes negative.
//!
//! # Example
//!
//! ```
//! use glyphtrace::approximation::Approximation;
//! use glyphtrace::trace::{BinarizedExact, PolygonTracer, Tracing};
//! use glyphtrace::unify::unify_drawing;
//! use image::{GrayImage, Luma};
//!
//! // Two dark 3x3 squares on a light background.
//! let image = GrayImage::from_fn(12, 5, |x, y| {
//!     let inside = (1..4).contains(&y) && ((1..4).contains(&x) || (7..10).contains(&x));
//!     Luma([if inside { 0 } else { 255 }])
//! });
//!
//! let drawing = BinarizedExact::default().trace(&image).unwrap();
//! assert_eq!(drawing.occurrences.len(), 2);
//!
//! let unified = unify_drawing(&drawing).unwrap();
//! assert_eq!(unified.referenced_glyphs.len(), 1);
//!
//! let polygons = PolygonTracer::default().approximate_drawing(&unified);
//! assert_eq!(polygons.rasterize().unwrap(), image);
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Implement `serde::Deserialize` and `serde::Serialize` on points,
//!   vectors, bounding boxes, cubic nodes, glyph references and the
//!   thresholding tracers.

// LINEBENDER LINT SET - lib.rs - v1
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
// The following lints are part of the Linebender standard set,
// but resolving them has been deferred for now.
#![allow(
    clippy::use_self,
    clippy::return_self_not_must_use,
    clippy::missing_assert_message,
    clippy::exhaustive_enums,
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason
)]

mod bounds;
mod contour;
mod cubic;
mod debug_colors;
mod drawing;
mod error;
mod glyph;
mod line;
mod point;
mod vec2;

pub mod approximation;
pub mod trace;
pub mod unify;

pub use crate::bounds::*;
pub use crate::contour::*;
pub use crate::cubic::*;
pub use crate::debug_colors::*;
pub use crate::drawing::*;
pub use crate::error::*;
pub use crate::glyph::*;
pub use crate::line::*;
pub use crate::point::*;
pub use crate::vec2::*;
