//! Min-heap of timed tasks keyed on a millisecond clock.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct Entry<T> {
    due_ms: u64,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so BinaryHeap (a max-heap) pops the earliest entry; ties go to
    // whichever was scheduled first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

pub struct TimerQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: u64, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { due_ms, seq, task });
    }

    /// Earliest deadline, if anything is pending.
    pub fn next_due(&self) -> Option<u64> {
        self.heap.peek().map(|e| e.due_ms)
    }

    /// Remove and return the earliest task due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, T)> {
        if self.next_due()? > now_ms {
            return None;
        }
        self.heap.pop().map(|e| (e.due_ms, e.task))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(300, "c");
        q.schedule(100, "a");
        q.schedule(200, "b");
        assert_eq!(q.next_due(), Some(100));
        assert_eq!(q.pop_due(1000), Some((100, "a")));
        assert_eq!(q.pop_due(1000), Some((200, "b")));
        assert_eq!(q.pop_due(1000), Some((300, "c")));
        assert_eq!(q.pop_due(1000), None);
        assert!(q.is_empty());
    }

    #[test]
    fn equal_deadlines_keep_scheduling_order() {
        let mut q = TimerQueue::new();
        q.schedule(50, 1);
        q.schedule(50, 2);
        q.schedule(50, 3);
        let order: Vec<i32> = std::iter::from_fn(|| q.pop_due(50).map(|(_, t)| t)).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn future_tasks_stay_queued() {
        let mut q = TimerQueue::new();
        q.schedule(500, ());
        assert_eq!(q.pop_due(499), None);
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop_due(500), Some((500, ())));
    }
}
