//! Priority queue of Locked positions (min-heap by expiration)

use bulwark_common::PositionId;
use priority_queue::PriorityQueue;
use std::cmp::Reverse;

/// Locked positions ordered by expiration, earliest first.
///
/// Ties break on the position id so sweeps are deterministic.
pub struct ExpiryQueue {
    queue: PriorityQueue<PositionId, Reverse<(u64, PositionId)>>,
}

impl ExpiryQueue {
    pub fn new() -> Self {
        Self {
            queue: PriorityQueue::new(),
        }
    }

    /// Track a position, or move it if already tracked
    pub fn push(&mut self, id: PositionId, expiration: u64) {
        self.queue.push(id, Reverse((expiration, id)));
    }

    /// Earliest-expiring position without removing it
    pub fn peek(&self) -> Option<(PositionId, u64)> {
        let (id, Reverse((expiration, _))) = self.queue.peek()?;
        Some((*id, *expiration))
    }

    /// Remove and return up to `max` positions whose expiration is before `now`
    pub fn pop_due(&mut self, now: u64, max: usize) -> Vec<(PositionId, u64)> {
        let mut due = Vec::new();
        while due.len() < max {
            match self.peek() {
                Some((id, expiration)) if expiration < now => {
                    self.queue.pop();
                    due.push((id, expiration));
                }
                _ => break,
            }
        }
        due
    }

    pub fn remove(&mut self, id: &PositionId) -> bool {
        self.queue.remove(id).is_some()
    }

    pub fn contains(&self, id: &PositionId) -> bool {
        self.queue.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for ExpiryQueue {
    fn default() -> Self {
        Self::new()
    }
}
