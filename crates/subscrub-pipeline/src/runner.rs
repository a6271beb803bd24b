//! Two-worker pipeline runner.

use std::sync::Arc;

use tracing::info;

use subscrub_inpaint::{AcceleratorLock, SubtitleInpainter};
use subscrub_media::RangeCutter;
use subscrub_models::{CutSpec, PipelineConfig, SubtitleArea};

use crate::cutter::CutterStage;
use crate::error::PipelineResult;
use crate::remover::SubtitleRemovalStage;
use crate::stats::{RunReport, RunStatistics};

/// Run the full pipeline over the given manifest rows.
///
/// Spawns the cutter and subtitle-removal stages as concurrent workers
/// joined only by the bounded queue, waits for both to terminate, and
/// finalizes the statistics into a report. Per-item failures are inside the
/// report; an `Err` here means the run itself broke (queue invariant
/// violation or a worker panic).
pub async fn run_pipeline<C, I>(
    cutter: C,
    inpainter: I,
    config: PipelineConfig,
    area: Option<SubtitleArea>,
    specs: Vec<CutSpec>,
) -> PipelineResult<RunReport>
where
    C: RangeCutter + 'static,
    I: SubtitleInpainter + 'static,
{
    let config = Arc::new(config);
    let stats = Arc::new(RunStatistics::new());
    let lock = Arc::new(AcceleratorLock::new());

    let (tx, rx) = subscrub_queue::bounded(config.max_queue_size);

    info!(
        rows = specs.len(),
        queue_capacity = config.max_queue_size,
        algorithm = %config.algorithm,
        "Starting pipeline"
    );

    let producer = tokio::spawn(
        CutterStage::new(Arc::new(cutter), Arc::clone(&config), Arc::clone(&stats))
            .run(specs, tx),
    );
    let consumer = tokio::spawn(
        SubtitleRemovalStage::new(
            Arc::new(inpainter),
            lock,
            Arc::clone(&config),
            area,
            Arc::clone(&stats),
        )
        .run(rx),
    );

    let (producer_result, consumer_result) = tokio::try_join!(producer, consumer)?;
    producer_result?;
    consumer_result?;

    let report = stats.finalize();
    info!(
        stage1_succeeded = report.stage1.succeeded,
        stage2_succeeded = report.stage2.succeeded,
        failed = report.total_failed(),
        "Pipeline finished"
    );

    Ok(report)
}
