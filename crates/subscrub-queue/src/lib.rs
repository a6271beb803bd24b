//! Bounded task queue between the pipeline stages.
//!
//! This crate provides:
//! - A capacity-bounded FIFO channel carrying task records
//! - Backpressure on the producer when the consumer lags
//! - Explicit close/drained semantics instead of sentinel values

pub mod error;
pub mod queue;

pub use error::{QueueError, QueueResult};
pub use queue::{bounded, Dequeued, TaskReceiver, TaskSender};
