//! Priority frontier for the bounded search.
//!
//! Ordering is explicit: lowest `f = g + h` first, then lowest `h`, then
//! earliest insertion. Insertion sequence numbers are unique, so the pop order
//! never depends on heap internals.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::map::TileRef;

/// One open-set entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenNode {
    pub tile: TileRef,
    pub g: u32,
    pub h: u32,
    pub seq: u64,
}

impl OpenNode {
    pub fn f(&self) -> u32 {
        self.g.saturating_add(self.h)
    }
}

impl Ord for OpenNode {
    // Reversed: `BinaryHeap` is a max-heap and the best node must pop first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f()
            .cmp(&self.f())
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Open set keyed by `(f, h, insertion order)`.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<OpenNode>,
    next_seq: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tile: TileRef, g: u32, h: u32) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(OpenNode { tile, g, h, seq });
    }

    pub fn pop(&mut self) -> Option<OpenNode> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
