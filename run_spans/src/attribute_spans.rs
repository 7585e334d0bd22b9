// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style attribute spans over the bytes of a run.
//!
//! Spans may overlap. They are kept in application order and later spans win when two of them
//! set the same property ("change" semantics rather than "insert" semantics).

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::Range;

use crate::TextRange;

/// An ordered list of `(byte range, attribute)` pairs.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeSpans<A> {
    spans: Vec<(Range<usize>, A)>,
}

impl<A> Default for AttributeSpans<A> {
    fn default() -> Self {
        Self { spans: Vec::new() }
    }
}

impl<A: Clone + PartialEq + Debug> AttributeSpans<A> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of spans.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns `true` if no spans are present.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Iterate over all spans in application order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&Range<usize>, &A)> {
        self.spans.iter().map(|(range, attr)| (range, attr))
    }

    /// Apply `attr` over `range`. Empty ranges are ignored.
    pub fn apply(&mut self, range: TextRange, attr: A) {
        if !range.is_empty() {
            self.spans.push((range.as_range(), attr));
        }
    }

    /// Attributes covering byte `index`, in application order.
    ///
    /// Consumers resolving conflicts should fold in order so the last attribute wins.
    pub fn active_at(&self, index: usize) -> impl Iterator<Item = &A> {
        self.spans
            .iter()
            .filter(move |(range, _)| range.contains(&index))
            .map(|(_, attr)| attr)
    }

    /// Attributes intersecting `range`, in application order.
    pub fn for_range(&self, range: Range<usize>) -> impl Iterator<Item = &A> {
        self.spans
            .iter()
            .filter(move |(span, _)| span.start < range.end && span.end > range.start)
            .map(|(_, attr)| attr)
    }

    /// Remove every span.
    pub fn clear(&mut self) {
        self.spans.clear();
    }

    /// Open a gap of `len` bytes at `at` for inserted text.
    ///
    /// Spans strictly containing `at` grow to cover the insertion; spans starting at or after
    /// `at` move right; spans ending at or before `at` are untouched.
    pub fn insert_gap(&mut self, at: usize, len: usize) {
        if len == 0 {
            return;
        }
        for (range, _) in &mut self.spans {
            if range.start >= at {
                range.start += len;
            }
            if range.end > at {
                range.end += len;
            }
        }
    }

    /// Remove the bytes in `removed`.
    ///
    /// Spans after the removed bytes shift left, spans straddling an edge are truncated and
    /// spans left empty are dropped.
    pub fn remove_range(&mut self, removed: Range<usize>) {
        if removed.is_empty() {
            return;
        }
        let collapse = |index: usize| {
            if index <= removed.start {
                index
            } else if index >= removed.end {
                index - removed.len()
            } else {
                removed.start
            }
        };
        self.spans.retain_mut(|(range, _)| {
            range.start = collapse(range.start);
            range.end = collapse(range.end);
            range.start < range.end
        });
    }

    /// Split the list at byte `at`, returning the spans of the right half rebased to zero.
    ///
    /// A span straddling `at` is truncated into both halves, so no span is lost.
    #[must_use]
    pub fn split_off(&mut self, at: usize) -> Self {
        let mut right = Vec::new();
        for (range, attr) in &self.spans {
            if range.end > at {
                right.push((range.start.max(at) - at..range.end - at, attr.clone()));
            }
        }
        self.spans.retain_mut(|(range, _)| {
            range.end = range.end.min(at);
            range.start < at
        });
        Self { spans: right }
    }

    /// Append the spans of `other`, shifted right by `shift` bytes.
    ///
    /// A span of `other` starting at its beginning joins an equal span of `self` ending exactly
    /// at `shift`, which reunites spans truncated by [`split_off`](Self::split_off).
    pub fn append(&mut self, other: Self, shift: usize) {
        let seam = self.spans.len();
        let mut joined = Vec::new();
        for (range, attr) in other.spans {
            if range.start == 0 {
                let partner = self.spans[..seam].iter().position(|(own, own_attr)| {
                    own.end == shift && *own_attr == attr && !joined.contains(&own.start)
                });
                if let Some(ix) = partner {
                    joined.push(self.spans[ix].0.start);
                    self.spans[ix].0.end = range.end + shift;
                    continue;
                }
            }
            self.spans
                .push((range.start + shift..range.end + shift, attr));
        }
    }

    /// Copy of the spans intersecting `range`, clamped to it and rebased to zero.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        let spans = self
            .spans
            .iter()
            .filter(|(span, _)| span.start < range.end && span.end > range.start)
            .map(|(span, attr)| {
                (
                    span.start.max(range.start) - range.start
                        ..span.end.min(range.end) - range.start,
                    attr.clone(),
                )
            })
            .collect();
        Self { spans }
    }
}
