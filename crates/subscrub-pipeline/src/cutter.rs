//! Producer stage: range removal.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};

use subscrub_media::RangeCutter;
use subscrub_models::{CutSpec, PipelineConfig, TaskRecord};
use subscrub_queue::TaskSender;

use crate::error::PipelineResult;
use crate::paths::intermediate_path;
use crate::stats::RunStatistics;

/// Producer stage: walks the manifest rows in order, invokes the
/// range-removal collaborator, and enqueues a task record per successful
/// cut. Blocks on `put` when the queue is full, so it can never outrun the
/// consumer by more than the queue capacity.
pub struct CutterStage<C> {
    cutter: Arc<C>,
    config: Arc<PipelineConfig>,
    stats: Arc<RunStatistics>,
}

impl<C: RangeCutter> CutterStage<C> {
    pub fn new(cutter: Arc<C>, config: Arc<PipelineConfig>, stats: Arc<RunStatistics>) -> Self {
        Self {
            cutter,
            config,
            stats,
        }
    }

    /// Run the stage to completion, closing the queue afterwards.
    pub async fn run(self, specs: Vec<CutSpec>, queue: TaskSender) -> PipelineResult<()> {
        info!(rows = specs.len(), "Cutter stage started");

        for spec in specs {
            self.process_spec(spec, &queue).await?;
        }

        // Exactly one close, after the last spec
        queue.close().await?;
        info!("Cutter stage finished");
        Ok(())
    }

    async fn process_spec(&self, spec: CutSpec, queue: &TaskSender) -> PipelineResult<()> {
        let started = Instant::now();

        // Rows the manifest reader could not fully parse fail here, without
        // a collaborator call, so they still show up in the failure log.
        if !spec.parse_errors.is_empty() {
            let reason = spec.parse_errors.join("; ");
            error!(row = spec.row_index, %reason, "Skipping malformed row");
            self.stats.record_stage1_failure(
                spec.row_index,
                &spec.source_path,
                reason,
                started.elapsed(),
            );
            return Ok(());
        }
        if spec.ranges.is_empty() {
            error!(row = spec.row_index, "Row has no removal ranges");
            self.stats.record_stage1_failure(
                spec.row_index,
                &spec.source_path,
                "no removal ranges",
                started.elapsed(),
            );
            return Ok(());
        }

        let dest = intermediate_path(&self.config.intermediate_dir, &spec.source_path);

        info!(
            row = spec.row_index,
            source = %spec.source_path.display(),
            ranges = spec.ranges.len(),
            "Cutting"
        );

        match self
            .cutter
            .remove_ranges(&spec.source_path, &spec.ranges, &dest)
            .await
        {
            Ok(()) => {
                let elapsed = started.elapsed();
                self.stats.record_stage1_success(elapsed);
                info!(
                    row = spec.row_index,
                    dest = %dest.display(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Cut complete"
                );

                let record = TaskRecord::cut(spec.row_index, spec.source_path, dest);
                queue.put(record).await?;
            }
            Err(e) => {
                error!(row = spec.row_index, error = %e, "Cut failed");
                self.stats.record_stage1_failure(
                    spec.row_index,
                    &spec.source_path,
                    e.to_string(),
                    started.elapsed(),
                );
            }
        }

        Ok(())
    }
}
