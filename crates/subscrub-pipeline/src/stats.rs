//! Run statistics shared by both stages.
//!
//! One instance per run, shared via `Arc`. The two stage workers are the
//! only writers, each from its own task, so a plain mutex around the
//! tallies is enough. `finalize` is called once after both workers join and
//! yields the immutable report.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Which stage a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Stage 1: range removal
    Cut,
    /// Stage 2: subtitle removal
    SubtitleRemoval,
}

impl PipelineStage {
    pub fn number(&self) -> u8 {
        match self {
            PipelineStage::Cut => 1,
            PipelineStage::SubtitleRemoval => 2,
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::Cut => f.write_str("cut"),
            PipelineStage::SubtitleRemoval => f.write_str("subtitle removal"),
        }
    }
}

/// One failed item.
#[derive(Debug, Clone)]
pub struct FailureRecord {
    /// Origin manifest row
    pub row_index: u32,
    /// Source path for stage-1 failures, intermediate path for stage-2
    pub path: PathBuf,
    /// Failing stage
    pub stage: PipelineStage,
    /// Human-readable reason
    pub reason: String,
}

/// Per-stage counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageTally {
    pub attempted: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Wall time across all attempts
    pub elapsed: Duration,
    /// Wall time across successful attempts only
    pub success_elapsed: Duration,
}

#[derive(Debug, Default)]
struct Tallies {
    stage1: StageTally,
    stage2: StageTally,
    failures: Vec<FailureRecord>,
}

/// Thread-safe accumulator for one pipeline run.
#[derive(Debug)]
pub struct RunStatistics {
    started: Instant,
    inner: Mutex<Tallies>,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            inner: Mutex::new(Tallies::default()),
        }
    }

    pub fn record_stage1_success(&self, elapsed: Duration) {
        let mut inner = self.inner.lock().expect("stats mutex poisoned");
        record_success(&mut inner.stage1, elapsed);
    }

    pub fn record_stage1_failure(
        &self,
        row_index: u32,
        path: &Path,
        reason: impl Into<String>,
        elapsed: Duration,
    ) {
        let mut inner = self.inner.lock().expect("stats mutex poisoned");
        record_failure(&mut inner.stage1, elapsed);
        inner.failures.push(FailureRecord {
            row_index,
            path: path.to_path_buf(),
            stage: PipelineStage::Cut,
            reason: reason.into(),
        });
    }

    pub fn record_stage2_success(&self, elapsed: Duration) {
        let mut inner = self.inner.lock().expect("stats mutex poisoned");
        record_success(&mut inner.stage2, elapsed);
    }

    pub fn record_stage2_failure(
        &self,
        row_index: u32,
        path: &Path,
        reason: impl Into<String>,
        elapsed: Duration,
    ) {
        let mut inner = self.inner.lock().expect("stats mutex poisoned");
        record_failure(&mut inner.stage2, elapsed);
        inner.failures.push(FailureRecord {
            row_index,
            path: path.to_path_buf(),
            stage: PipelineStage::SubtitleRemoval,
            reason: reason.into(),
        });
    }

    /// Produce the immutable end-of-run report.
    pub fn finalize(&self) -> RunReport {
        let inner = self.inner.lock().expect("stats mutex poisoned");

        let mut failures = inner.failures.clone();
        failures.sort_by_key(|f| (f.row_index, f.stage.number()));

        let avg_stage2 = if inner.stage2.succeeded > 0 {
            Some(inner.stage2.success_elapsed / inner.stage2.succeeded as u32)
        } else {
            None
        };

        RunReport {
            total_elapsed: self.started.elapsed(),
            stage1: inner.stage1,
            stage2: inner.stage2,
            avg_stage2,
            failures,
        }
    }
}

impl Default for RunStatistics {
    fn default() -> Self {
        Self::new()
    }
}

fn record_success(tally: &mut StageTally, elapsed: Duration) {
    tally.attempted += 1;
    tally.succeeded += 1;
    tally.elapsed += elapsed;
    tally.success_elapsed += elapsed;
}

fn record_failure(tally: &mut StageTally, elapsed: Duration) {
    tally.attempted += 1;
    tally.failed += 1;
    tally.elapsed += elapsed;
}

/// Immutable end-of-run report.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Wall time from statistics creation to finalize
    pub total_elapsed: Duration,
    pub stage1: StageTally,
    pub stage2: StageTally,
    /// Average stage-2 duration over stage-2-successful items
    pub avg_stage2: Option<Duration>,
    /// Failures ordered by origin row
    pub failures: Vec<FailureRecord>,
}

impl RunReport {
    /// Total failed items across both stages.
    pub fn total_failed(&self) -> u64 {
        self.stage1.failed + self.stage2.failed
    }
}
