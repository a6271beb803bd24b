//! Bounded FIFO task queue with explicit close semantics.
//!
//! The producer half blocks once `capacity` records are buffered, which is
//! what bounds in-flight intermediate artifacts. End-of-stream is an
//! explicit marker sent by [`TaskSender::close`], not a dropped-sender
//! `None`: a sender that disappears without closing is a protocol violation
//! and surfaces as [`QueueError::ClosedPrematurely`].

use tokio::sync::mpsc;
use tracing::debug;

use subscrub_models::TaskRecord;

use crate::error::{QueueError, QueueResult};

/// Wire format inside the channel.
enum Slot {
    Task(TaskRecord),
    Done,
}

/// Result of a dequeue.
#[derive(Debug)]
pub enum Dequeued {
    /// Next task, in enqueue order.
    Task(TaskRecord),
    /// The producer closed the queue and every buffered task has been
    /// retrieved. Terminal: repeated once reached.
    Drained,
}

/// Create a bounded queue.
///
/// # Panics
///
/// Panics if `capacity` is zero; validate configuration first.
pub fn bounded(capacity: usize) -> (TaskSender, TaskReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (
        TaskSender { tx },
        TaskReceiver { rx, drained: false },
    )
}

/// Producer half.
pub struct TaskSender {
    tx: mpsc::Sender<Slot>,
}

impl TaskSender {
    /// Enqueue a record, waiting while the queue is full.
    pub async fn put(&self, record: TaskRecord) -> QueueResult<()> {
        self.tx
            .send(Slot::Task(record))
            .await
            .map_err(|_| QueueError::ConsumerGone)
    }

    /// Signal that no further records will arrive.
    ///
    /// Buffered records stay retrievable; the consumer sees
    /// [`Dequeued::Drained`] only after taking all of them. Consumes the
    /// sender so it can only be called once.
    pub async fn close(self) -> QueueResult<()> {
        debug!("Closing task queue");
        self.tx
            .send(Slot::Done)
            .await
            .map_err(|_| QueueError::ConsumerGone)
    }
}

/// Consumer half.
pub struct TaskReceiver {
    rx: mpsc::Receiver<Slot>,
    drained: bool,
}

impl TaskReceiver {
    /// Dequeue the next record, waiting while the queue is empty.
    pub async fn get(&mut self) -> QueueResult<Dequeued> {
        if self.drained {
            return Ok(Dequeued::Drained);
        }

        match self.rx.recv().await {
            Some(Slot::Task(record)) => Ok(Dequeued::Task(record)),
            Some(Slot::Done) => {
                debug!("Task queue drained");
                self.drained = true;
                self.rx.close();
                Ok(Dequeued::Drained)
            }
            None => Err(QueueError::ClosedPrematurely),
        }
    }
}
