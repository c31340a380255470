// Copyright 2025 the Glyphtrace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use std::{error::Error as StdError, fmt};

use crate::Point;

/// An invalid parameter passed to a tracer or approximation constructor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    /// `max_slope_ratio` must be at least 1.
    MaxSlopeRatio(u32),
    /// `corner_offset` must lie in `0..=0.25`.
    CornerOffset(f64),
    /// `max_distance` must be positive and finite.
    MaxDistance(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MaxSlopeRatio(value) => {
                write!(f, "max_slope_ratio must be at least 1, got {value}")
            }
            ConfigError::CornerOffset(value) => {
                write!(f, "corner_offset must be between 0 and 0.25, got {value}")
            }
            ConfigError::MaxDistance(value) => {
                write!(f, "max_distance must be positive and finite, got {value}")
            }
        }
    }
}

impl StdError for ConfigError {}

/// Malformed input reaching a tracer.
///
/// These are contract violations of the contour primitives a tracer consumes;
/// tracing stops at the first one and produces no partial output.
#[derive(Clone, Debug, PartialEq)]
pub enum TraceError {
    /// An outline names a parent that does not exist, or a hole's parent is
    /// not an outer outline.
    MalformedHierarchy {
        /// Index of the offending outline.
        outline: usize,
        /// The parent index it refers to, if any.
        parent: Option<usize>,
    },
    /// An open iso-contour fragment has fewer than two points.
    FragmentTooShort {
        /// Index of the fragment.
        fragment: usize,
    },
    /// An open fragment ends away from the image border.
    EndpointOffBorder(Point),
    /// Two fragment endpoints coincide, or an endpoint lies on an image corner.
    AmbiguousEndpoint(Point),
    /// A full pass over the border made no progress joining fragments.
    UnmatchedFragment {
        /// Index of the fragment that could not be closed.
        fragment: usize,
    },
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::MalformedHierarchy {
                outline,
                parent: Some(parent),
            } => write!(
                f,
                "outline {outline} has parent {parent}, which is missing or not an outer outline"
            ),
            TraceError::MalformedHierarchy {
                outline,
                parent: None,
            } => write!(f, "hole outline {outline} has no parent"),
            TraceError::FragmentTooShort { fragment } => {
                write!(f, "open fragment {fragment} has fewer than two points")
            }
            TraceError::EndpointOffBorder(p) => {
                write!(f, "open fragment endpoint {p} is not on the image border")
            }
            TraceError::AmbiguousEndpoint(p) => {
                write!(f, "open fragment endpoint {p} is ambiguous")
            }
            TraceError::UnmatchedFragment { fragment } => {
                write!(f, "open fragment {fragment} has no matching end on the border")
            }
        }
    }
}

impl StdError for TraceError {}

/// A reference that cannot be resolved against its pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnifyError {
    /// A reference index is past the end of its pool.
    DanglingReference {
        /// The referenced index.
        index: usize,
        /// The size of the pool.
        pool_len: usize,
        /// Whether the document-shared pool was referenced.
        shared: bool,
    },
    /// A drawing outside any document refers to the shared pool.
    SharedReferenceOutsideDocument {
        /// The referenced index.
        index: usize,
    },
    /// A page index is past the end of the document.
    MissingPage {
        /// The requested page.
        page: usize,
        /// The number of pages.
        pages: usize,
    },
}

impl fmt::Display for UnifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnifyError::DanglingReference {
                index,
                pool_len,
                shared,
            } => {
                let pool = if *shared { "shared" } else { "page-local" };
                write!(
                    f,
                    "reference to glyph {index} of the {pool} pool, which has {pool_len} glyphs"
                )
            }
            UnifyError::SharedReferenceOutsideDocument { index } => {
                write!(f, "shared reference to glyph {index} outside of a document")
            }
            UnifyError::MissingPage { page, pages } => {
                write!(f, "page {page} requested from a document of {pages} pages")
            }
        }
    }
}

impl StdError for UnifyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            ConfigError::MaxDistance(0.0).to_string(),
            "max_distance must be positive and finite, got 0"
        );
        assert_eq!(
            UnifyError::DanglingReference {
                index: 3,
                pool_len: 1,
                shared: true
            }
            .to_string(),
            "reference to glyph 3 of the shared pool, which has 1 glyphs"
        );
        assert_eq!(
            TraceError::EndpointOffBorder(Point::new(1.5, 2.0)).to_string(),
            "open fragment endpoint (1.5, 2) is not on the image border"
        );
    }
}
