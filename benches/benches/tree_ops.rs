// Copyright 2025 the Hilbertree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use hilbertree::{DEFAULT_ORDER, HilbertRTree, Rect, SpatialObject};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
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

fn gen_random_objects(seed: u64, count: usize, span: u32, max_extent: u32) -> Vec<SpatialObject> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            let x = rng.below(span);
            let y = rng.below(span);
            let w = rng.below(max_extent) + 1;
            let h = rng.below(max_extent) + 1;
            SpatialObject::new(Rect::new(x, y, x + w, y + h), DEFAULT_ORDER)
                .expect("generated rects stay within the curve domain")
        })
        .collect()
}

/// Fan-out near the square root of the object count keeps bulk-built trees
/// at roughly two levels.
fn capacity_for(count: usize) -> usize {
    ((count as f64).sqrt() as usize).max(2)
}

fn bench_bulk_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_build");
    for &n in &[1024usize, 4096, 16384] {
        let objects = gen_random_objects(0xCAFE_F00D, n, 60_000, 500);
        let capacity = capacity_for(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("n{}", n), |b| {
            b.iter_batched(
                || objects.clone(),
                |objects| black_box(HilbertRTree::bulk_build(objects, capacity)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[1024usize, 4096, 16384] {
        let base = HilbertRTree::bulk_build(
            gen_random_objects(0xDEAD_BEEF, n, 60_000, 500),
            capacity_for(n),
        );
        let extra = gen_random_objects(0xBADC_0FFE, 256, 60_000, 500);
        group.throughput(Throughput::Elements(256));
        group.bench_function(format!("batch256_into_n{}", n), |b| {
            b.iter_batched(
                || base.clone(),
                |mut tree| {
                    for obj in extra.iter().copied() {
                        tree.insert(obj);
                    }
                    black_box(tree.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete");
    for &n in &[1024usize, 4096] {
        let base = HilbertRTree::bulk_build(
            gen_random_objects(0xFEED_FACE, n, 60_000, 500),
            capacity_for(n),
        );
        let victims: Vec<SpatialObject> = base.objects().into_iter().step_by(4).take(256).collect();
        group.throughput(Throughput::Elements(victims.len() as u64));
        group.bench_function(format!("batch256_from_n{}", n), |b| {
            b.iter_batched(
                || base.clone(),
                |mut tree| {
                    for obj in &victims {
                        let _ = tree.delete(*obj);
                    }
                    black_box(tree.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_window_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_query");
    for &n in &[1024usize, 4096, 16384] {
        let tree = HilbertRTree::bulk_build(
            gen_random_objects(0x1234_5678, n, 60_000, 500),
            capacity_for(n),
        );
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("many_windows_n{}", n), |b| {
            b.iter(|| {
                let mut total = 0usize;
                for q in 0..64u32 {
                    let x = (q % 8) * 7_000;
                    let y = (q / 8) * 7_000;
                    total += tree
                        .window_query(Rect::new(x, y, x + 5_000, y + 5_000))
                        .len();
                }
                black_box(total);
            })
        });
    }
    group.finish();
}

fn bench_proximity_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("proximity_search");
    let n = 16384usize;
    let tree = HilbertRTree::bulk_build(
        gen_random_objects(0x9E37_79B9, n, 60_000, 500),
        capacity_for(n),
    );
    let probes = gen_random_objects(0x5851_F42D, 1024, 60_000, 500);
    group.throughput(Throughput::Elements(probes.len() as u64));
    group.bench_function("probes1024_n16384", |b| {
        b.iter(|| {
            let mut found = 0usize;
            for probe in &probes {
                if tree.proximity_search(probe).is_some() {
                    found += 1;
                }
            }
            black_box(found);
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_bulk_build,
    bench_insert,
    bench_delete,
    bench_window_query,
    bench_proximity_search,
);
criterion_main!(benches);
