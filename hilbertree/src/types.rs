// Copyright 2025 the Hilbertree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and the leaf-level record.

use crate::error::Error;
use crate::hilbert::hilbert_key;

/// Axis-aligned rectangle on the integer grid addressed by the Hilbert curve.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Minimum x (left)
    pub min_x: u32,
    /// Minimum y (bottom)
    pub min_y: u32,
    /// Maximum x (right)
    pub max_x: u32,
    /// Maximum y (top)
    pub max_y: u32,
}

impl Rect {
    /// Create a new rectangle from min/max corners.
    pub const fn new(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// The smallest rectangle covering both `self` and `other`.
    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Integer midpoint of the rectangle, rounded toward the min corner.
    pub const fn center(&self) -> (u32, u32) {
        let cx = ((self.min_x as u64 + self.max_x as u64) / 2) as u32;
        let cy = ((self.min_y as u64 + self.max_y as u64) / 2) as u32;
        (cx, cy)
    }

    /// Open-interval intersection test: the rectangles intersect iff, on both
    /// axes, at least one rectangle's edge lies strictly inside the other's
    /// span. Rectangles that merely share an edge (or are identical) do not
    /// intersect under this test.
    pub fn intersects_open(&self, other: &Self) -> bool {
        open_overlap(self.min_x, self.max_x, other.min_x, other.max_x)
            && open_overlap(self.min_y, self.max_y, other.min_y, other.max_y)
    }
}

fn open_overlap(a_lo: u32, a_hi: u32, b_lo: u32, b_hi: u32) -> bool {
    let inside = |lo: u32, hi: u32, p: u32| lo < p && p < hi;
    inside(a_lo, a_hi, b_lo)
        || inside(a_lo, a_hi, b_hi)
        || inside(b_lo, b_hi, a_lo)
        || inside(b_lo, b_hi, a_hi)
}

/// A leaf-level record: a rectangle plus the Hilbert key of its center.
///
/// Objects are created once from input geometry and never change identity or
/// key afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpatialObject {
    rect: Rect,
    key: u64,
}

impl SpatialObject {
    /// Validate `rect` and compute its Hilbert key for a curve of the given
    /// `order`.
    ///
    /// Returns [`Error::InvalidGeometry`] when a min corner exceeds the max
    /// corner on either axis, and [`Error::OutOfRange`] when any coordinate
    /// falls outside `[0, 2^order)`.
    ///
    /// # Panics
    ///
    /// Panics when `order` is outside `1..=`[`MAX_ORDER`](crate::MAX_ORDER).
    pub fn new(rect: Rect, order: u32) -> Result<Self, Error> {
        if rect.min_x > rect.max_x || rect.min_y > rect.max_y {
            return Err(Error::InvalidGeometry { rect });
        }
        // The mapper only sees the center, so the corners are checked here.
        let bound = 1_u64 << order;
        for coord in [rect.min_x, rect.min_y, rect.max_x, rect.max_y] {
            if u64::from(coord) >= bound {
                return Err(Error::OutOfRange { coord, order });
            }
        }
        let (cx, cy) = rect.center();
        let key = hilbert_key(cx, cy, order)?;
        Ok(Self { rect, key })
    }

    /// The object's rectangle.
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// The object's Hilbert key.
    pub const fn key(&self) -> u64 {
        self.key
    }
}
