// Copyright 2025 the Hilbertree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by geometry validation, key mapping, and deletion.

use crate::types::Rect;

/// Errors surfaced by the index.
///
/// Queries on an empty tree are not errors; they return empty results. A
/// structurally corrupt tree is a bug rather than a recoverable condition,
/// so no variant exists for it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A coordinate lies outside `[0, 2^order)`; the curve mapping is
    /// undefined beyond that grid.
    #[error("coordinate {coord} outside the order-{order} curve grid")]
    OutOfRange {
        /// The offending coordinate.
        coord: u32,
        /// The configured curve order.
        order: u32,
    },

    /// A rectangle whose min corner exceeds its max corner on some axis,
    /// rejected before key computation.
    #[error("invalid rectangle {rect:?}: min corner exceeds max corner")]
    InvalidGeometry {
        /// The offending rectangle.
        rect: Rect,
    },

    /// `delete` was called with a key absent from the tree; the tree is left
    /// unchanged.
    #[error("no object with hilbert key {key} in the tree")]
    NotFound {
        /// The key that was looked up.
        key: u64,
    },
}
