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

mod common;

use std::collections::BTreeSet;

use common::{enable_tracing, random_region, random_sparse, raws, region};
use locus_core::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const ROUNDS: usize = 300;

fn ints() -> Space {
    Space::integers(0, 99).unwrap()
}

fn members(region: &Region) -> BTreeSet<i64> {
    region.iter().map(|p| p.raw()).collect()
}

fn obligation<T>(e: &Expression<T>) -> Option<Obligation> {
    e.violation().map(|v| v.obligation())
}

#[test]
fn test_scale_past_the_lower_bound_fails() {
    enable_tracing();
    let s = ints();
    let e = region(&s, 2, 4).expr().scale(&s.size(9).unwrap());
    assert_eq!(obligation(&e), Some(Obligation::WithinBounds));
    let ok = region(&s, 3, 5).expr().scale(&s.size(9).unwrap()).unwrap();
    assert_eq!(ok, region(&s, 0, 8));
}

#[test]
fn test_split_into_gives_remainder_to_early_parts() {
    let s = ints();
    let parts = region(&s, 0, 9).expr().split_into(3).unwrap();
    let pieces: Vec<Region> = parts.pieces().collect();
    assert_eq!(
        pieces,
        vec![region(&s, 0, 3), region(&s, 4, 6), region(&s, 7, 9)]
    );
}

#[test]
fn test_difference_of_overlapping_runs() {
    let s = ints();
    let d = region(&s, 0, 3).expr().difference(&region(&s, 2, 5)).unwrap();
    let pieces: Vec<Region> = d.pieces().collect();
    assert_eq!(pieces, vec![region(&s, 0, 1), region(&s, 4, 5)]);
}

#[test]
fn test_disjoint_intersection_is_successful_and_empty() {
    let s = ints();
    let e = region(&s, 0, 3).expr().intersection(&region(&s, 10, 12));
    assert!(e.is_successful());
    let r = e.unwrap();
    assert!(r.is_empty());
    assert_eq!(r.violation().map(|v| v.kind()), Some(ViolationKind::Emptiness));
}

#[test]
fn test_cross_space_combination_fails() {
    let a = ints();
    let b = ints();
    let e = region(&a, 0, 3).expr().union(&region(&b, 0, 3));
    assert_eq!(obligation(&e), Some(Obligation::SameSpace));
    assert_eq!(
        e.violation().map(|v| v.kind()),
        Some(ViolationKind::SpaceMismatch)
    );
    let p = a.position(1).unwrap().expr().add(&b.one());
    assert_eq!(obligation(&p), Some(Obligation::SameSpace));
}

#[test]
fn test_failure_absorbs_every_operation() {
    let s = ints();
    let failed = s.region(&s.position(7).unwrap(), &s.position(3).unwrap());
    let first = failed.violation().cloned();
    let other = region(&s, 0, 5);
    let chained = failed
        .union(&other)
        .intersection(&other)
        .exclude(&other)
        .invert()
        .scale(&s.size(4).unwrap());
    assert_eq!(chained.violation().cloned(), first);
    assert_eq!(failed.split_into(2).violation().cloned(), first);
    assert_eq!(failed.search(&[]).find().violation().cloned(), first);

    let right = other.expr().union(&failed);
    assert_eq!(right.violation().cloned(), first);
}

#[test]
fn test_persisted_regions_round_trip() {
    let s = ints();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..ROUNDS {
        let r = random_region(&s, &mut rng);
        let (start, end) = (r.start().unwrap().raw(), r.end().unwrap().raw());
        let restored = s
            .region(&s.position(start), &s.position(end))
            .unwrap();
        assert_eq!(restored, r);
    }
}

#[test]
fn test_set_identities_hold() {
    let s = ints();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..ROUNDS {
        let a = random_sparse(&s, rng.random_range(1..=4), &mut rng);
        let b = random_sparse(&s, rng.random_range(1..=4), &mut rng);
        let (ma, mb) = (members(&a), members(&b));

        let union = members(&a.expr().union(&b).unwrap());
        let inter = members(&a.expr().intersection(&b).unwrap());
        let diff = members(&a.expr().difference(&b).unwrap());
        let excl = members(&a.expr().exclude(&b).unwrap());

        assert_eq!(union, ma.union(&mb).copied().collect());
        assert_eq!(inter, ma.intersection(&mb).copied().collect());
        assert_eq!(diff, ma.symmetric_difference(&mb).copied().collect());
        assert_eq!(excl, ma.difference(&mb).copied().collect());
        assert_eq!(union.len() + inter.len(), ma.len() + mb.len());

        let commuted = members(&b.expr().union(&a).unwrap());
        assert_eq!(commuted, union);
    }
}

#[test]
fn test_invert_partitions_the_space() {
    let s = ints();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for _ in 0..ROUNDS {
        let r = random_sparse(&s, 3, &mut rng);
        let inverted = r.expr().invert().unwrap();
        assert_eq!(
            inverted.size().units() + r.size().units(),
            s.count(),
            "{r} / {inverted}"
        );
        for p in inverted.iter() {
            assert!(!r.contains(&p));
        }
    }
}

#[test]
fn test_split_into_covers_region() {
    let s = ints();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    for _ in 0..ROUNDS {
        let r = random_region(&s, &mut rng);
        let total = r.size().units();
        let n = rng.random_range(1..=total);
        let parts = r.expr().split_into(n).unwrap();
        let sizes: Vec<i64> = parts.pieces().map(|p| p.size().units()).collect();
        assert_eq!(sizes.len() as i64, n);
        assert_eq!(sizes.iter().sum::<i64>(), total);
        let (min, max) = (sizes.iter().min().unwrap(), sizes.iter().max().unwrap());
        assert!(max - min <= 1, "{sizes:?}");
        assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
        let flattened: Vec<i64> = parts.iter().map(|p| p.raw()).collect();
        assert_eq!(flattened, raws(&r));
    }
}

#[test]
fn test_split_by_covers_sparse_region() {
    let s = ints();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    for _ in 0..ROUNDS {
        let r = random_sparse(&s, 4, &mut rng);
        let chunk = rng.random_range(1..=6);
        let parts = r.expr().split_by(&s.size(chunk).unwrap()).unwrap();
        assert!(parts.pieces().all(|p| p.size().units() <= chunk));
        let flattened: Vec<i64> = parts.iter().map(|p| p.raw()).collect();
        assert_eq!(flattened, raws(&r));
    }
}

#[test]
fn test_scale_hits_target_size() {
    let s = ints();
    let mut rng = ChaCha8Rng::seed_from_u64(19);
    for _ in 0..ROUNDS {
        let r = random_region(&s, &mut rng);
        let target = rng.random_range(1..=60);
        match r.expr().scale(&s.size(target).unwrap()) {
            Expression::Successful(scaled) => {
                assert_eq!(scaled.size().units(), target);
                let (before, after) = (r.start().unwrap().raw(), scaled.start().unwrap().raw());
                let lead = (before - after).abs();
                let delta = (target - r.size().units()).abs();
                assert!(lead == delta - delta / 2, "{r} -> {scaled}");
            }
            Expression::Failed(v) => assert_eq!(v.obligation(), Obligation::WithinBounds),
        }
    }
}

#[test]
fn test_descending_space_mirrors_ascending() {
    let up = ints();
    let down = up.with_order(PositionOrder::Descending);
    let r = region(&down, 60, 40);
    assert_eq!(r.start().map(|p| p.raw()), Some(60));
    let parts = r.expr().split_into(3).unwrap();
    let firsts: Vec<i64> = parts.pieces().map(|p| p.start().unwrap().raw()).collect();
    assert_eq!(firsts, vec![60, 53, 46]);
    assert_eq!(
        obligation(&region(&up, 40, 60).expr().union(&r)),
        Some(Obligation::SameSpace)
    );
    let back = r.expr().sort(PositionOrder::Ascending).unwrap();
    assert_eq!(back, region(&up, 40, 60));
}

#[test]
fn test_translation_between_spaces() {
    let bytes = Space::builder()
        .name("bytes")
        .bounds(0, 4095)
        .build()
        .unwrap();
    let blocks = Space::builder()
        .name("blocks")
        .bounds(0, 4096 * 7)
        .step(4096)
        .build()
        .unwrap();
    let p = bytes.position(3).unwrap();
    assert_eq!(blocks.from_position(&p).unwrap().raw(), 3 * 4096);
    assert_eq!(blocks.from_size(&bytes.size(2).unwrap()).unwrap().units(), 2);
    let r = region(&bytes, 1, 4);
    let moved = blocks.from_region(&r).unwrap();
    assert_eq!(moved.size().units(), 4);
    assert_eq!(moved.start().map(|p| p.raw()), Some(4096));
    assert_eq!(
        obligation(&blocks.from_position(&bytes.position(100).unwrap())),
        Some(Obligation::WithinBounds)
    );
}

#[test]
fn test_grid_positions() {
    let grid = Space::grid(&[3, 4]).unwrap();
    let p = grid.grid_position(&[1, 2]).unwrap();
    assert_eq!(p.raw(), 6);
    assert_eq!(p.coordinates(), Some(vec![1, 2]));
    assert_eq!(p.expr().next().unwrap().coordinates(), Some(vec![1, 3]));
    assert!(grid.grid_position(&[3, 0]).is_failed());
    assert_eq!(grid.all().size().units(), 12);
}
