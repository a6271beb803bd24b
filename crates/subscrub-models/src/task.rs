//! Task types flowing through the pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::range::TimeRange;

/// Outcome of one stage for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Stage has not run yet
    #[default]
    Pending,
    /// Stage completed successfully
    Success,
    /// Stage failed
    Failed,
}

/// One video's journey through both stages.
///
/// Constructed by the cutter stage only after a successful cut (so a record
/// in the queue always has `stage1_status == Success`), then owned by the
/// subtitle-removal stage for the rest of its life.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Origin manifest row, used for failure attribution
    pub row_index: u32,
    /// Original video path
    pub source_path: PathBuf,
    /// Stage-1 output, consumed (and optionally deleted) by stage 2
    pub intermediate_path: PathBuf,
    /// Stage-2 output; present iff stage 2 succeeded
    pub final_path: Option<PathBuf>,
    /// Cutter outcome
    pub stage1_status: StageStatus,
    /// Subtitle-removal outcome
    pub stage2_status: StageStatus,
    /// Human-readable reason when either stage failed
    pub failure_reason: Option<String>,
}

impl TaskRecord {
    /// Create a record for a video that passed the cutter stage.
    pub fn cut(row_index: u32, source_path: PathBuf, intermediate_path: PathBuf) -> Self {
        Self {
            row_index,
            source_path,
            intermediate_path,
            final_path: None,
            stage1_status: StageStatus::Success,
            stage2_status: StageStatus::Pending,
            failure_reason: None,
        }
    }

    /// Mark stage 2 as succeeded with the produced artifact.
    pub fn mark_stage2_success(&mut self, final_path: PathBuf) {
        self.stage2_status = StageStatus::Success;
        self.final_path = Some(final_path);
    }

    /// Mark stage 2 as failed.
    pub fn mark_stage2_failed(&mut self, reason: impl Into<String>) {
        self.stage2_status = StageStatus::Failed;
        self.failure_reason = Some(reason.into());
    }
}

impl std::fmt::Display for TaskRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "task[row={}, source={}]",
            self.row_index,
            self.source_path.display()
        )
    }
}

/// One manifest row handed to the cutter stage.
///
/// `parse_errors` carries range cells the manifest reader could not parse;
/// the cutter stage reports such rows as stage-1 failures instead of calling
/// the collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutSpec {
    /// Physical spreadsheet row (header row is 1)
    pub row_index: u32,
    /// Resolved source video path
    pub source_path: PathBuf,
    /// Ranges to remove, in cell order
    pub ranges: Vec<TimeRange>,
    /// Per-cell parse failures, empty for a well-formed row
    pub parse_errors: Vec<String>,
}

impl CutSpec {
    pub fn new(row_index: u32, source_path: impl AsRef<Path>, ranges: Vec<TimeRange>) -> Self {
        Self {
            row_index,
            source_path: source_path.as_ref().to_path_buf(),
            ranges,
            parse_errors: Vec::new(),
        }
    }
}
