// Copyright 2025 the Hilbertree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hilbert R-tree walkthrough.
//!
//! Bulk-build a small tree from random rectangles, dump its structure, then
//! delete, query, and insert while printing the effect of each step.
//!
//! Run:
//! - `cargo run -p hilbertree_demos --example tree_walkthrough`

use hilbertree::{HilbertRTree, Rect, SpatialObject};

/// Small xorshift generator so the demo is deterministic without a rand dep.
struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn below(&mut self, bound: u32) -> u32 {
        (self.next_u64() % u64::from(bound)) as u32
    }
}

fn main() {
    let mut rng = Rng(0x5EED_5EED);
    let order = 16;

    // 25 random rectangles in a 1000x1000 region, keyed for curve order 16.
    let objects: Vec<SpatialObject> = (0..25)
        .map(|_| {
            let x = rng.below(1000);
            let y = rng.below(1000);
            let w = rng.below(200) + 1;
            let h = rng.below(200) + 1;
            SpatialObject::new(Rect::new(x, y, x + w, y + h), order)
                .expect("demo rects fit the curve domain")
        })
        .collect();

    // Capacity 2 forces several levels even for a tiny input.
    let mut tree = HilbertRTree::bulk_build_with_order(objects, 2, order);
    println!("built: {tree:?}");
    println!("{}", tree.dump());

    // Remove the object with the lowest Hilbert key; every ancestor on its
    // path gets a fresh key and bounding box.
    let lowest = tree.objects()[0];
    tree.delete(lowest).expect("lowest key is present");
    println!(
        "deleted key={} -> len={} height={:?}",
        lowest.key(),
        tree.len(),
        tree.height()
    );

    // Window query over the lower-left quadrant.
    let window = Rect::new(0, 0, 500, 500);
    let hits = tree.window_query(window);
    println!("window (0, 0, 500, 500) intersects {} rects:", hits.len());
    for obj in &hits {
        let r = obj.rect();
        println!(
            "  key={} rect=({}, {}, {}, {})",
            obj.key(),
            r.min_x,
            r.min_y,
            r.max_x,
            r.max_y
        );
    }

    // Nearest stored object along the curve from an arbitrary probe.
    let probe = tree
        .object(Rect::new(480, 480, 520, 520))
        .expect("probe fits the curve domain");
    if let Some(neighbor) = tree.proximity_search(&probe) {
        println!(
            "curve neighbor of probe key={}: key={}",
            probe.key(),
            neighbor.key()
        );
    }

    // A few incremental inserts, then the final shape.
    for _ in 0..5 {
        let x = rng.below(1000);
        let y = rng.below(1000);
        let obj = tree
            .object(Rect::new(x, y, x + 50, y + 50))
            .expect("demo rects fit the curve domain");
        tree.insert(obj);
    }
    println!("after 5 inserts: {tree:?}");
    println!("{}", tree.dump());
}
