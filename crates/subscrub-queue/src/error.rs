//! Queue error types.

use thiserror::Error;

pub type QueueResult<T> = Result<T, QueueError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    /// The producer vanished without calling `close()`. Under the
    /// single-producer discipline this is an internal-invariant violation
    /// and fatal to the run.
    #[error("queue closed prematurely: producer dropped without close")]
    ClosedPrematurely,

    /// The consumer vanished while the producer was still sending.
    #[error("queue consumer is gone")]
    ConsumerGone,
}
