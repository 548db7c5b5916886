// Copyright 2025 the Hilbertree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hilbert-curve key mapping for 2D integer coordinates.
//!
//! The mapper walks the coordinate bits from most- to least-significant,
//! tracking which of the four rotations/reflections of the base curve shape
//! applies inside the current quadrant. Nearby points on the grid tend to
//! receive nearby keys, which is what makes a one-dimensional sort of the
//! keys a useful spatial ordering.

use crate::error::Error;

/// Highest supported curve order. Keys spend two bits per order step, so
/// order 31 fills 62 of the 64 key bits.
pub const MAX_ORDER: u32 = 31;

/// Curve order used by the convenience constructors; bounds coordinates to
/// `[0, 65536)`.
pub const DEFAULT_ORDER: u32 = 16;

/// `(digit, next_state)` per (rotation state, quadrant selector). The
/// selector packs the x bit above the y bit; state 0 is the base orientation.
const QUADRANT_MAP: [[(u64, usize); 4]; 4] = [
    [(0, 3), (1, 0), (3, 1), (2, 0)],
    [(2, 1), (1, 1), (3, 1), (0, 2)],
    [(2, 2), (3, 1), (1, 2), (0, 1)],
    [(0, 0), (3, 2), (1, 3), (2, 3)],
];

/// Map a 2D coordinate to its position along a Hilbert curve of the given
/// `order`.
///
/// Both coordinates must lie in `[0, 2^order)`; anything larger fails with
/// [`Error::OutOfRange`] since the curve never visits such a point.
///
/// # Panics
///
/// Panics when `order` is outside `1..=`[`MAX_ORDER`]; the order is
/// configuration, not data.
pub fn hilbert_key(x: u32, y: u32, order: u32) -> Result<u64, Error> {
    assert!(
        (1..=MAX_ORDER).contains(&order),
        "curve order must be in 1..=31"
    );
    let bound = 1_u64 << order;
    if u64::from(x) >= bound {
        return Err(Error::OutOfRange { coord: x, order });
    }
    if u64::from(y) >= bound {
        return Err(Error::OutOfRange { coord: y, order });
    }

    let mut state = 0_usize;
    let mut key = 0_u64;
    for i in (0..order).rev() {
        let x_bit = (x >> i) & 1;
        let y_bit = (y >> i) & 1;
        let selector = ((x_bit << 1) | y_bit) as usize;
        let (digit, next_state) = QUADRANT_MAP[state][selector];
        key = (key << 2) | digit;
        state = next_state;
    }
    Ok(key)
}
