//! Shared memory module with a FIFO wait queue deciding who gets access each cycle.

use crate::core::ProcessId;
use crate::queue::WaitQueue;

/// One shared memory module.
#[derive(Clone, Debug, Default)]
pub struct MemoryModule {
    busy: bool,
    attached: Option<ProcessId>,
    queue: WaitQueue,
}

impl MemoryModule {
    /// A free module with no attached process and an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `process` may access this module now: the module is free,
    /// has nobody attached, or is already attached to `process`.
    pub fn grants(&self, process: ProcessId) -> bool {
        !self.busy || self.attached.map_or(true, |p| p == process)
    }

    /// Hands the module to `process` and marks it busy.
    pub fn attach(&mut self, process: ProcessId) {
        self.attached = Some(process);
        self.busy = true;
    }

    /// Queues `process` unless it is already waiting here. Returns true if it was added.
    pub fn enqueue(&mut self, process: ProcessId) -> bool {
        if self.queue.contains(process) {
            return false;
        }
        self.queue.push(process);
        true
    }

    /// Advances the queue by one position: the front process becomes the
    /// attached one. The module is marked free once the queue is empty.
    pub fn arbitrate(&mut self) -> Option<ProcessId> {
        let next = self.queue.pop();
        if let Some(process) = next {
            self.attached = Some(process);
        }
        if self.queue.is_empty() {
            self.busy = false;
        }
        next
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn attached(&self) -> Option<ProcessId> {
        self.attached
    }

    pub fn queue(&self) -> &WaitQueue {
        &self.queue
    }
}
