//! Ring buffer of recently accepted node ids.
//!
//! Newly connected clients are seeded with this sample instead of the full
//! history. A single task owns the buffer; [`Recents`] handles only send it
//! requests.

use std::num::NonZeroUsize;

use bough_shared::protocol::NodeId;
use tokio::sync::{mpsc, oneshot};

/// Default number of ids kept for the welcome sample.
pub const DEFAULT_RECENTS_CAPACITY: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// Fixed-capacity ring buffer of node ids.
#[derive(Debug, Clone)]
pub struct RecentBuffer {
    slots: Vec<NodeId>,
    index: usize,
    filled: bool,
}

impl RecentBuffer {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            slots: vec![NodeId::unassigned(); capacity.get()],
            index: 0,
            filled: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Record `id` as the most recently accepted, overwriting the oldest
    /// slot once full.
    pub fn add(&mut self, id: NodeId) {
        self.slots[self.index] = id;
        self.index += 1;
        if self.index == self.slots.len() {
            self.index = 0;
            self.filled = true;
        }
    }

    /// Ids currently held, oldest first.
    ///
    /// Until the buffer has wrapped once only the written slots are returned,
    /// so the result never contains empty padding.
    pub fn data(&self) -> Vec<NodeId> {
        if self.filled {
            let (newer, older) = self.slots.split_at(self.index);
            older.iter().chain(newer).cloned().collect()
        } else {
            self.slots[..self.index].to_vec()
        }
    }
}

enum RecentsRequest {
    Add(NodeId),
    Data(oneshot::Sender<Vec<NodeId>>),
}

/// Handle to the task owning a [`RecentBuffer`].
///
/// Cheap to clone. The owning task stops once every handle is dropped.
#[derive(Clone)]
pub struct Recents {
    requests: mpsc::UnboundedSender<RecentsRequest>,
}

impl Recents {
    /// Spawn the owning task. Must be called inside a tokio runtime.
    pub fn spawn(capacity: NonZeroUsize) -> Self {
        let (requests, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run_recents(RecentBuffer::new(capacity), receiver));
        Self { requests }
    }

    /// Record a newly accepted id. Does not wait for the owning task.
    pub fn add(&self, id: NodeId) {
        if self.requests.send(RecentsRequest::Add(id)).is_err() {
            tracing::warn!("Recents task has stopped, dropping id");
        }
    }

    /// Snapshot of the held ids, oldest first.
    pub async fn data(&self) -> Vec<NodeId> {
        let (reply, response) = oneshot::channel();
        if self.requests.send(RecentsRequest::Data(reply)).is_err() {
            tracing::warn!("Recents task has stopped, returning empty sample");
            return Vec::new();
        }
        response.await.unwrap_or_default()
    }
}

async fn run_recents(
    mut buffer: RecentBuffer,
    mut requests: mpsc::UnboundedReceiver<RecentsRequest>,
) {
    while let Some(request) = requests.recv().await {
        match request {
            RecentsRequest::Add(id) => buffer.add(id),
            RecentsRequest::Data(reply) => {
                // The requester may have given up; nothing to do then.
                let _ = reply.send(buffer.data());
            }
        }
    }
    tracing::debug!("Recents task finished");
}
