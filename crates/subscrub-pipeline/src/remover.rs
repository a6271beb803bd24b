//! Consumer stage: subtitle removal.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use subscrub_inpaint::{AcceleratorLock, SubtitleInpainter};
use subscrub_models::{PipelineConfig, SubtitleArea, TaskRecord};
use subscrub_queue::{Dequeued, TaskReceiver};

use crate::error::PipelineResult;
use crate::paths::final_path;
use crate::stats::RunStatistics;

/// Consumer stage: drains the queue in FIFO order, holds the accelerator
/// lock across each inpainting call, and optionally deletes the
/// intermediate artifact after a success.
pub struct SubtitleRemovalStage<I> {
    inpainter: Arc<I>,
    lock: Arc<AcceleratorLock>,
    config: Arc<PipelineConfig>,
    area: Option<SubtitleArea>,
    stats: Arc<RunStatistics>,
}

impl<I: SubtitleInpainter> SubtitleRemovalStage<I> {
    pub fn new(
        inpainter: Arc<I>,
        lock: Arc<AcceleratorLock>,
        config: Arc<PipelineConfig>,
        area: Option<SubtitleArea>,
        stats: Arc<RunStatistics>,
    ) -> Self {
        Self {
            inpainter,
            lock,
            config,
            area,
            stats,
        }
    }

    /// Run the stage until the queue reports drained.
    pub async fn run(self, mut queue: TaskReceiver) -> PipelineResult<()> {
        info!(collaborator = self.inpainter.name(), "Subtitle-removal stage started");

        loop {
            match queue.get().await? {
                Dequeued::Drained => break,
                Dequeued::Task(record) => self.process_task(record).await,
            }
        }

        info!("Subtitle-removal stage finished");
        Ok(())
    }

    async fn process_task(&self, mut record: TaskRecord) {
        let started = Instant::now();
        let dest = final_path(&self.config.final_dir, &record.source_path);

        info!(
            row = record.row_index,
            input = %record.intermediate_path.display(),
            "Removing subtitles"
        );

        let result = {
            // Permit drops at the end of this scope on every exit path
            let _accelerator = self.lock.acquire().await;
            self.inpainter
                .remove_subtitles(
                    &record.intermediate_path,
                    self.area.as_ref(),
                    self.config.algorithm,
                    &dest,
                )
                .await
        };
        let elapsed = started.elapsed();

        match result {
            Ok(()) => {
                record.mark_stage2_success(dest.clone());
                self.stats.record_stage2_success(elapsed);
                info!(
                    row = record.row_index,
                    output = %dest.display(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Subtitles removed"
                );

                if !self.config.keep_intermediate {
                    // Best effort: a leftover intermediate is not a failure
                    if let Err(e) = tokio::fs::remove_file(&record.intermediate_path).await {
                        warn!(
                            row = record.row_index,
                            path = %record.intermediate_path.display(),
                            error = %e,
                            "Failed to delete intermediate file"
                        );
                    }
                }
            }
            Err(e) => {
                error!(row = record.row_index, error = %e, "Subtitle removal failed");
                record.mark_stage2_failed(e.to_string());
                self.stats.record_stage2_failure(
                    record.row_index,
                    &record.intermediate_path,
                    e.to_string(),
                    elapsed,
                );
            }
        }
    }
}
