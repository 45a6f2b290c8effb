// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use locus_core::region::Region;
use locus_core::search::{AtOrAfter, Criterion as SearchCriterion};
use locus_core::space::Space;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::{hint::black_box, sync::Arc};

#[inline]
fn region(space: &Space, a: i64, b: i64) -> Region {
    space
        .region(&space.position(a).unwrap(), &space.position(b).unwrap())
        .unwrap()
}

/// A region of `runs` pieces spread over the whole space.
fn fragmented(space: &Space, runs: usize, rng: &mut impl Rng) -> Region {
    let (_, hi) = space.raw_bounds();
    let stride = (hi + 1) / runs as i64;
    let mut builder = space.sparse_region_builder();
    for i in 0..runs as i64 {
        let start = i * stride + rng.random_range(0..stride / 4);
        let end = start + rng.random_range(0..stride / 2);
        builder = builder.concatenate(&region(space, start, end));
    }
    builder.build().unwrap().into_region()
}

fn gen_regions(space: &Space, n: usize, runs: usize, rng: &mut impl Rng) -> Vec<Region> {
    (0..n).map(|_| fragmented(space, runs, rng)).collect()
}

fn bench_set_algebra(c: &mut Criterion) {
    let space = Space::integers(0, 1_000_000 - 1).unwrap();
    let mut group = c.benchmark_group("region_algebra");
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED_0F5B_ACE0);

    for &runs in &[8usize, 64, 512] {
        let left = gen_regions(&space, 16, runs, &mut rng);
        let right = gen_regions(&space, 16, runs, &mut rng);
        group.throughput(Throughput::Elements((left.len() * runs) as u64));

        group.bench_function(BenchmarkId::new("union", runs), |b| {
            b.iter(|| {
                for (l, r) in left.iter().zip(&right) {
                    black_box(l.expr().union(r));
                }
            })
        });
        group.bench_function(BenchmarkId::new("exclude", runs), |b| {
            b.iter(|| {
                for (l, r) in left.iter().zip(&right) {
                    black_box(l.expr().exclude(r));
                }
            })
        });
        group.bench_function(BenchmarkId::new("invert", runs), |b| {
            b.iter(|| {
                for l in &left {
                    black_box(l.expr().invert());
                }
            })
        });
    }
    group.finish();
}

fn bench_partitioning(c: &mut Criterion) {
    let space = Space::array(1 << 20).unwrap();
    let mut group = c.benchmark_group("region_partition");
    let mut rng = ChaCha8Rng::seed_from_u64(0xC0FF_EE00_1234);
    let free = fragmented(&space, 256, &mut rng);

    for &n in &[4i64, 64, 1024] {
        group.bench_function(BenchmarkId::new("split_into", n), |b| {
            b.iter(|| black_box(free.expr().split_into(n)))
        });
    }
    let page = space.size(4096).unwrap();
    group.bench_function("split_by/4096", |b| {
        b.iter(|| black_box(free.expr().split_by(&page)))
    });
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let space = Space::array(1 << 20).unwrap();
    let mut group = c.benchmark_group("region_search");
    let mut rng = ChaCha8Rng::seed_from_u64(0xD00D_F00D_F0F0);
    let haystack = fragmented(&space, 64, &mut rng);
    let targets: Vec<Arc<dyn SearchCriterion>> = (0..64)
        .map(|_| {
            let at = space.position(rng.random_range(0..1 << 20)).unwrap();
            Arc::new(AtOrAfter::new(at)) as Arc<dyn SearchCriterion>
        })
        .collect();
    group.throughput(Throughput::Elements(targets.len() as u64));

    group.bench_function("bisect", |b| {
        b.iter(|| {
            for t in &targets {
                black_box(haystack.searcher(std::slice::from_ref(t)).find());
            }
        })
    });
    group.bench_function("contains", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for i in (0..1 << 20).step_by(4099) {
                if haystack.contains(&space.position(i).unwrap()) {
                    hits += 1;
                }
            }
            black_box(hits)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_set_algebra, bench_partitioning, bench_search);
criterion_main!(benches);
