//! Scheduled events and the time-ordered pending-event queue.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// An immutable `{kind, time}` record.
///
/// `K` is the model's closed set of event tags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event<K> {
    kind: K,
    time: f64,
}

impl<K> Event<K> {
    /// Creates an event of `kind` due at `time`.
    pub fn new(kind: K, time: f64) -> Self {
        Self { kind, time }
    }

    /// Returns the event tag.
    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// Returns the time the event is due.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Consumes the event and returns its tag.
    pub fn into_kind(self) -> K {
        self.kind
    }
}

/// Heap entry: ordered by `(time, seq)`, smallest first.
#[derive(Debug)]
struct Scheduled<K> {
    time: f64,
    seq: u64,
    kind: K,
}

impl<K> PartialEq for Scheduled<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K> Eq for Scheduled<K> {}

impl<K> PartialOrd for Scheduled<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for Scheduled<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so both keys are reversed.
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Pending events, always yielding the earliest one next.
///
/// Events that share a time are drained first-scheduled-first-served, which
/// keeps runs with the same seed byte-for-byte reproducible.
#[derive(Debug)]
pub struct EventQueue<K> {
    heap: BinaryHeap<Scheduled<K>>,
    next_seq: u64,
}

impl<K> EventQueue<K> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Inserts an event, preserving min-time then insertion order.
    pub fn add(&mut self, kind: K, time: f64) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.heap.push(Scheduled { time, seq, kind });
    }

    /// Inserts an already built event.
    pub fn push(&mut self, event: Event<K>) {
        self.add(event.kind, event.time);
    }

    /// Removes and returns the earliest event, or `None` when empty.
    pub fn pop_min(&mut self) -> Option<Event<K>> {
        self.heap.pop().map(|s| Event::new(s.kind, s.time))
    }

    /// Time of the earliest pending event without consuming it.
    pub fn peek_min_time(&self) -> Option<f64> {
        self.heap.peek().map(|s| s.time)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drops every pending event.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.next_seq = 0;
    }
}

impl<K> Default for EventQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}
