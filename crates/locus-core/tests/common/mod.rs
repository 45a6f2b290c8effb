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

use locus_core::prelude::*;
use rand::Rng;
use tracing_subscriber::EnvFilter;

/// Installs a test subscriber once; later calls are no-ops.
pub fn enable_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

#[allow(dead_code)]
pub fn region(space: &Space, a: i64, b: i64) -> Region {
    space
        .region(&space.position(a).unwrap(), &space.position(b).unwrap())
        .unwrap()
}

#[allow(dead_code)]
fn by_rank(space: &Space, first: i64, last: i64) -> Region {
    space
        .region(
            &space.position_at(first).unwrap(),
            &space.position_at(last).unwrap(),
        )
        .unwrap()
}

/// A random contiguous region of up to 41 positions.
#[allow(dead_code)]
pub fn random_region(space: &Space, rng: &mut impl Rng) -> Region {
    let last_rank = space.count() - 1;
    let a = rng.random_range(0..=last_rank);
    let b = rng.random_range(a..=last_rank.min(a + 40));
    by_rank(space, a, b)
}

/// A random region with up to `runs` pieces separated by holes.
#[allow(dead_code)]
pub fn random_sparse(space: &Space, runs: usize, rng: &mut impl Rng) -> Region {
    let last_rank = space.count() - 1;
    let mut builder = space.sparse_region_builder();
    let mut next = 0;
    for _ in 0..runs {
        let start = next + rng.random_range(1..=8);
        if start > last_rank {
            break;
        }
        let end = (start + rng.random_range(0..=10)).min(last_rank);
        builder = builder.concatenate(&by_rank(space, start, end));
        next = end + 1;
    }
    builder.build().unwrap().into_region()
}

#[allow(dead_code)]
pub fn raws(region: &Region) -> Vec<i64> {
    region.iter().map(|p| p.raw()).collect()
}
