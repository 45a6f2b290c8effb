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

use std::iter::FusedIterator;

use crate::position::Position;
use crate::space::Space;
use crate::span::Span;

/// Iterator over the positions of a region, in the order of its space.
#[derive(Debug, Clone)]
pub struct RegionIter<'a> {
    space: &'a Space,
    spans: &'a [Span],
    // Rank cursor inside `spans[0]`, and the end of the last span from the back.
    front: i64,
    back: i64,
}

impl<'a> RegionIter<'a> {
    #[inline]
    pub(crate) fn new(space: &'a Space, spans: &'a [Span]) -> Self {
        let front = spans.first().map_or(0, Span::start);
        let back = spans.last().map_or(0, Span::end);
        Self {
            space,
            spans,
            front,
            back,
        }
    }

    #[inline]
    fn remaining(&self) -> i64 {
        match self.spans {
            [] => 0,
            [only] => (self.back.min(only.end()) - self.front).max(0),
            [first, middle @ .., last] => {
                (first.end() - self.front)
                    + middle.iter().map(Span::len).sum::<i64>()
                    + (self.back - last.start())
            }
        }
    }
}

impl Iterator for RegionIter<'_> {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (first, rest) = self.spans.split_first()?;
            let end = if rest.is_empty() { self.back } else { first.end() };
            if self.front < end {
                let rank = self.front;
                self.front += 1;
                return Some(Position::from_rank(self.space, rank));
            }
            self.spans = rest;
            if let Some(next) = rest.first() {
                self.front = next.start();
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining()).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for RegionIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        loop {
            let (last, rest) = self.spans.split_last()?;
            let start = if rest.is_empty() { self.front } else { last.start() };
            if self.back > start {
                self.back -= 1;
                return Some(Position::from_rank(self.space, self.back));
            }
            self.spans = rest;
            if let Some(prev) = rest.last() {
                self.back = prev.end();
            }
        }
    }
}

impl FusedIterator for RegionIter<'_> {}
