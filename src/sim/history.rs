//! Position history of the live actor and delayed replay for the echo
//!
//! One entry is recorded per simulated frame. Entries are addressed by
//! logical index (0 = first frame since the last reset) so indices stay
//! stable when old entries fall off the bounded ring.

use std::collections::VecDeque;

use glam::Vec2;

use super::actor::Actor;

/// Bounded ring of recorded positions with stable logical indexing
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<Vec2>,
    /// Logical index of `entries[0]`
    first: usize,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(4096)),
            first: 0,
            capacity,
        }
    }

    /// Append this frame's position, dropping the oldest entry when full
    pub fn record(&mut self, pos: Vec2) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.first += 1;
        }
        self.entries.push_back(pos);
    }

    /// Entry at a logical index, if recorded and still retained
    pub fn get(&self, index: usize) -> Option<Vec2> {
        let offset = index.checked_sub(self.first)?;
        self.entries.get(offset).copied()
    }

    /// Entry `delay + 1` frames behind `frame`; `None` until enough history exists
    pub fn replay(&self, frame: usize, delay: usize) -> Option<Vec2> {
        let index = frame.checked_sub(delay)?.checked_sub(1)?;
        self.get(index)
    }

    /// Total frames recorded since the last reset (including evicted ones)
    pub fn recorded(&self) -> usize {
        self.first + self.entries.len()
    }

    /// Entries currently held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<Vec2> {
        self.entries.back().copied()
    }

    /// Forget everything (level restart)
    pub fn clear(&mut self) {
        self.entries.clear();
        self.first = 0;
    }
}

/// Drives the echo actor from recorded history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoReplayer {
    pub delay: usize,
}

impl EchoReplayer {
    pub fn new(delay: usize) -> Self {
        Self { delay }
    }

    /// Move the echo to its delayed position for `frame`.
    ///
    /// Returns the new position, or `None` (echo left where it was) while
    /// the delay has not elapsed yet.
    pub fn apply(&self, history: &HistoryBuffer, frame: usize, echo: &mut Actor) -> Option<Vec2> {
        debug_assert!(echo.is_echo(), "replay only drives echo actors");
        let pos = history.replay(frame, self.delay)?;
        echo.pos = pos;
        Some(pos)
    }
}
