//! FIFO wait queue of processes blocked on one memory module.

use crate::core::ProcessId;
use std::collections::VecDeque;
use std::fmt;

/// First-come first-served queue of waiting processes.
///
/// `push` does not reject duplicates; callers check `contains` first so a
/// process is queued at most once.
#[derive(Clone, Debug, Default)]
pub struct WaitQueue {
    waiting: VecDeque<ProcessId>,
}

impl WaitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a process to the back of the queue.
    pub fn push(&mut self, process: ProcessId) {
        self.waiting.push_back(process);
    }

    /// Removes and returns the process at the front, if any.
    pub fn pop(&mut self) -> Option<ProcessId> {
        self.waiting.pop_front()
    }

    /// Returns the process that will be served next without removing it.
    pub fn peek(&self) -> Option<ProcessId> {
        self.waiting.front().copied()
    }

    pub fn contains(&self, process: ProcessId) -> bool {
        self.waiting.contains(&process)
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    /// Releases every waiting entry. Safe on an empty queue.
    pub fn destroy(&mut self) {
        while self.pop().is_some() {}
    }

    /// Waiting processes, front first.
    pub fn iter(&self) -> impl Iterator<Item = ProcessId> + '_ {
        self.waiting.iter().copied()
    }
}

impl fmt::Display for WaitQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, process) in self.iter().enumerate() {
            writeln!(f, "Node {}, Attached Process: {}", position + 1, process.0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn queue_starts_empty() {
        let mut q = WaitQueue::new();
        assert!(q.is_empty());
        assert_eq!(q.peek(), None);
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn queue_peek_does_not_remove() {
        let mut q = WaitQueue::new();
        q.push(ProcessId(4));
        q.push(ProcessId(1));
        assert_eq!(q.peek(), Some(ProcessId(4)));
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop(), Some(ProcessId(4)));
        assert_eq!(q.peek(), Some(ProcessId(1)));
    }

    #[test]
    fn queue_destroy_drains_and_is_idempotent() {
        let mut q = WaitQueue::new();
        q.push(ProcessId(0));
        q.push(ProcessId(2));
        q.destroy();
        assert!(q.is_empty());
        q.destroy();
        assert!(q.is_empty());
    }

    #[test]
    fn queue_display_lists_nodes() {
        let mut q = WaitQueue::new();
        q.push(ProcessId(7));
        q.push(ProcessId(3));
        assert_eq!(
            q.to_string(),
            "Node 1, Attached Process: 7\nNode 2, Attached Process: 3\n"
        );
    }

    proptest! {
        #[test]
        fn queue_is_fifo(ids in proptest::collection::vec(0usize..1000, 0..64)) {
            let mut q = WaitQueue::new();
            for &id in &ids {
                q.push(ProcessId(id));
            }
            let mut popped = Vec::new();
            while let Some(p) = q.pop() {
                popped.push(p.0);
            }
            prop_assert_eq!(popped, ids);
        }

        #[test]
        fn queue_contains_tracks_pending(
            ids in proptest::collection::hash_set(0usize..200, 0..32),
            pops in 0usize..32,
        ) {
            let ids: Vec<usize> = ids.into_iter().collect();
            let mut q = WaitQueue::new();
            for &id in &ids {
                q.push(ProcessId(id));
            }
            let pops = pops.min(ids.len());
            for _ in 0..pops {
                q.pop();
            }
            for (i, &id) in ids.iter().enumerate() {
                prop_assert_eq!(q.contains(ProcessId(id)), i >= pops);
            }
            prop_assert!(!q.contains(ProcessId(500)));
        }
    }
}
