//! Tokio mpsc DispatchQueue implementation.
//!
//! The in-process reference transport: an unbounded channel whose
//! receiver is shared by all workers behind an async mutex. It shares
//! fate with the in-memory store, so "at-least-once" reduces to
//! exactly-once here; a broker-backed queue implements the same trait
//! when delivery must survive the process.

use async_trait::async_trait;
use revu_core::{DispatchQueue, Result, RevuError, WorkItem};
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Unbounded-mpsc-backed dispatch queue.
pub struct MpscDispatchQueue {
    sender: Mutex<Option<mpsc::UnboundedSender<WorkItem>>>,
    receiver: tokio::sync::Mutex<mpsc::UnboundedReceiver<WorkItem>>,
}

impl MpscDispatchQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender: Mutex::new(Some(sender)),
            receiver: tokio::sync::Mutex::new(receiver),
        }
    }
}

impl Default for MpscDispatchQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DispatchQueue for MpscDispatchQueue {
    async fn enqueue(&self, item: WorkItem) -> Result<()> {
        let sender = {
            let guard = self
                .sender
                .lock()
                .map_err(|_| RevuError::queue("queue lock poisoned"))?;
            guard.clone()
        };
        match sender {
            Some(sender) => sender
                .send(item)
                .map_err(|_| RevuError::queue("dispatch queue is closed")),
            None => Err(RevuError::queue("dispatch queue is closed")),
        }
    }

    async fn recv(&self) -> Option<WorkItem> {
        // One receiver, many workers: the mutex serializes the waiters,
        // each delivered item goes to exactly one of them.
        self.receiver.lock().await.recv().await
    }

    fn close(&self) {
        if let Ok(mut guard) = self.sender.lock() {
            guard.take();
        }
    }
}
