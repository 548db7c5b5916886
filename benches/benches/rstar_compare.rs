// Copyright 2025 the Hilbertree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use hilbertree::{DEFAULT_ORDER, HilbertRTree, Rect, SpatialObject};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

fn gen_grid_rects(n: usize, cell: u32) -> Vec<Rect> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n as u32 {
        for x in 0..n as u32 {
            let x0 = x * cell;
            let y0 = y * cell;
            out.push(Rect::new(x0, y0, x0 + cell, y0 + cell));
        }
    }
    out
}

fn to_objects(rects: &[Rect]) -> Vec<SpatialObject> {
    rects
        .iter()
        .map(|r| SpatialObject::new(*r, DEFAULT_ORDER).expect("grid rects are in range"))
        .collect()
}

fn to_rstar_rects(rects: &[Rect]) -> Vec<Rectangle<[i64; 2]>> {
    rects
        .iter()
        .map(|r| {
            Rectangle::from_corners(
                [i64::from(r.min_x), i64::from(r.min_y)],
                [i64::from(r.max_x), i64::from(r.max_y)],
            )
        })
        .collect()
}

fn bench_rstar_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("rstar_compare");
    for &n in &[64usize, 128] {
        let rects = gen_grid_rects(n, 10);
        let window = Rect::new(100, 100, 500, 500);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("hilbertree_build_query_n{}", n), |b| {
            b.iter_batched(
                || to_objects(&rects),
                |objects| {
                    let tree = HilbertRTree::bulk_build(objects, 16);
                    let hits = tree.window_query(window).len();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_rects(&rects),
                |rectangles| {
                    let tree = RTree::bulk_load(rectangles);
                    let aabb = AABB::from_corners(
                        [i64::from(window.min_x), i64::from(window.min_y)],
                        [i64::from(window.max_x), i64::from(window.max_y)],
                    );
                    let hits: usize = tree.locate_in_envelope_intersecting(&aabb).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rstar_compare);
criterion_main!(benches);
