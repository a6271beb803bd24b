//! Pipeline error types.
//!
//! Per-item collaborator failures never surface here: the stages convert
//! them to failure records and keep going. These errors are the fatal ones
//! with no well-defined "next item".

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("queue error: {0}")]
    Queue(#[from] subscrub_queue::QueueError),

    #[error("stage worker panicked or was aborted: {0}")]
    StageJoin(#[from] tokio::task::JoinError),
}
