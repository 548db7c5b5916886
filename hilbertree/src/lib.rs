// Copyright 2025 the Hilbertree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hilbertree: a Hilbert-curve-ordered R-tree over 2D axis-aligned rectangles.
//!
//! Rectangles are keyed by the Hilbert curve position of their center, which
//! gives every object a single scalar key with strong spatial locality:
//! rectangles close on the curve are close in the plane. The tree keeps each
//! node's children in ascending key order, so bulk construction is a simple
//! bottom-up packing of the sorted sequence and point lookups descend by
//! binary search instead of comparing boxes.
//!
//! - Bulk-build a balanced tree from a batch, then insert and delete
//!   incrementally.
//! - Query by intersection window or by proximity along the curve.
//! - `no_std` + `alloc`; coordinates are `u32`, keys are `u64`.
//!
//! # Example
//!
//! ```rust
//! use hilbertree::{HilbertRTree, Rect, SpatialObject};
//!
//! let order = 16; // curve covers [0, 2^16) on each axis
//! let objects: Vec<SpatialObject> = [
//!     Rect::new(0, 0, 10, 10),
//!     Rect::new(40, 5, 60, 25),
//!     Rect::new(200, 200, 220, 230),
//! ]
//! .into_iter()
//! .map(|r| SpatialObject::new(r, order).unwrap())
//! .collect();
//!
//! let mut tree = HilbertRTree::bulk_build_with_order(objects, 4, order);
//! assert_eq!(tree.len(), 3);
//!
//! // Everything overlapping the lower-left corner region.
//! let hits = tree.window_query(Rect::new(0, 0, 50, 50));
//! assert_eq!(hits.len(), 2);
//!
//! // Insert and remove a rectangle keyed with the tree's own order.
//! let extra = tree.object(Rect::new(5, 40, 15, 55)).unwrap();
//! tree.insert(extra);
//! assert_eq!(tree.delete(extra).unwrap(), extra);
//! ```
//!
//! ## Intersection semantics
//!
//! Queries use an open-interval test: two rectangles intersect only when, on
//! both axes, one of them has an edge strictly inside the other's span.
//! Rectangles that merely share an edge, and identical rectangles, do not
//! intersect. See [`Rect::intersects_open`].

#![no_std]

extern crate alloc;

pub mod error;
pub mod hilbert;
pub mod tree;
pub mod types;

pub use error::Error;
pub use hilbert::{DEFAULT_ORDER, MAX_ORDER, hilbert_key};
pub use tree::HilbertRTree;
pub use types::{Rect, SpatialObject};
