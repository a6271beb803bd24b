//! End-to-end pipeline tests with scripted collaborators.
//!
//! The fakes stand in for FFmpeg and the inpainting service: they create
//! real files in temp directories so the cleanup behavior is observable,
//! and they record invocation order and concurrency so the ordering,
//! backpressure, and mutual-exclusion guarantees can be asserted.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use subscrub_inpaint::{InpaintError, InpaintResult, SubtitleInpainter};
use subscrub_media::{MediaError, MediaResult, RangeCutter};
use subscrub_models::{CutSpec, InpaintAlgorithm, PipelineConfig, SubtitleArea, TimeRange};
use subscrub_pipeline::{run_pipeline, PipelineStage};

/// Pull the row number back out of a `v{row}*` file name.
fn row_from_path(path: &Path) -> u32 {
    let stem = path.file_stem().unwrap().to_string_lossy();
    let digits: String = stem.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap()
}

#[derive(Default)]
struct Trace {
    cuts_finished: AtomicUsize,
    inpaints_started: AtomicUsize,
    inpaint_order: Mutex<Vec<u32>>,
    inpaints_in_flight: AtomicUsize,
    overlap_seen: AtomicBool,
    backpressure_violated: AtomicBool,
}

struct FakeCutter {
    trace: Arc<Trace>,
    fail_rows: HashSet<u32>,
    /// Buffered-items bound the producer must respect, when set
    max_ahead: Option<usize>,
}

#[async_trait]
impl RangeCutter for FakeCutter {
    async fn remove_ranges(
        &self,
        source: &Path,
        _ranges: &[TimeRange],
        dest: &Path,
    ) -> MediaResult<()> {
        let row = row_from_path(source);
        if self.fail_rows.contains(&row) {
            return Err(MediaError::InvalidVideo(format!("scripted failure row {row}")));
        }

        std::fs::write(dest, b"cut")?;
        let finished = self.trace.cuts_finished.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(max_ahead) = self.max_ahead {
            // Items cut but not yet picked up by the consumer can be: the
            // queue buffer plus the one record the producer is about to put.
            let started = self.trace.inpaints_started.load(Ordering::SeqCst);
            if finished - started > max_ahead + 1 {
                self.trace.backpressure_violated.store(true, Ordering::SeqCst);
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "fake-cutter"
    }
}

struct FakeInpainter {
    trace: Arc<Trace>,
    fail_rows: HashSet<u32>,
    delay: Duration,
}

#[async_trait]
impl SubtitleInpainter for FakeInpainter {
    async fn remove_subtitles(
        &self,
        input: &Path,
        _area: Option<&SubtitleArea>,
        _algorithm: InpaintAlgorithm,
        output: &Path,
    ) -> InpaintResult<()> {
        let row = row_from_path(input);
        self.trace.inpaints_started.fetch_add(1, Ordering::SeqCst);
        self.trace.inpaint_order.lock().unwrap().push(row);

        if self.trace.inpaints_in_flight.fetch_add(1, Ordering::SeqCst) > 0 {
            self.trace.overlap_seen.store(true, Ordering::SeqCst);
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.trace.inpaints_in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_rows.contains(&row) {
            return Err(InpaintError::request_failed(format!(
                "scripted failure row {row}"
            )));
        }

        std::fs::write(output, b"clean")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "fake-inpainter"
    }
}

struct Fixture {
    _dir: tempfile::TempDir,
    source_dir: PathBuf,
    config: PipelineConfig,
    trace: Arc<Trace>,
}

impl Fixture {
    fn new(max_queue_size: usize, keep_intermediate: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let source_dir = dir.path().join("sources");
        let config = PipelineConfig {
            intermediate_dir: dir.path().join("intermediate"),
            final_dir: dir.path().join("final"),
            keep_intermediate,
            max_queue_size,
            ..Default::default()
        };
        std::fs::create_dir_all(&source_dir).unwrap();
        std::fs::create_dir_all(&config.intermediate_dir).unwrap();
        std::fs::create_dir_all(&config.final_dir).unwrap();

        Self {
            _dir: dir,
            source_dir,
            config,
            trace: Arc::new(Trace::default()),
        }
    }

    /// Manifest rows 2..2+count, one valid range each.
    fn specs(&self, count: u32) -> Vec<CutSpec> {
        (2..2 + count)
            .map(|row| {
                let source = self.source_dir.join(format!("v{row}.mp4"));
                std::fs::write(&source, b"source").unwrap();
                CutSpec::new(row, source, vec!["5-10".parse().unwrap()])
            })
            .collect()
    }

    fn cutter(&self, fail_rows: impl IntoIterator<Item = u32>) -> FakeCutter {
        FakeCutter {
            trace: Arc::clone(&self.trace),
            fail_rows: fail_rows.into_iter().collect(),
            max_ahead: None,
        }
    }

    fn inpainter(&self, fail_rows: impl IntoIterator<Item = u32>, delay: Duration) -> FakeInpainter {
        FakeInpainter {
            trace: Arc::clone(&self.trace),
            fail_rows: fail_rows.into_iter().collect(),
            delay,
        }
    }

    fn intermediate(&self, row: u32) -> PathBuf {
        self.config.intermediate_dir.join(format!("v{row}_cut.mp4"))
    }

    fn final_artifact(&self, row: u32) -> PathBuf {
        self.config.final_dir.join(format!("v{row}_no_sub.mp4"))
    }
}

#[tokio::test]
async fn test_all_rows_succeed() {
    // Scenario: 3 rows, both stages succeed for all of them
    let fx = Fixture::new(10, false);
    let specs = fx.specs(3);

    let report = run_pipeline(
        fx.cutter([]),
        fx.inpainter([], Duration::ZERO),
        fx.config.clone(),
        None,
        specs,
    )
    .await
    .unwrap();

    assert_eq!(report.stage1.attempted, 3);
    assert_eq!(report.stage1.succeeded, 3);
    assert_eq!(report.stage1.failed, 0);
    assert_eq!(report.stage2.attempted, 3);
    assert_eq!(report.stage2.succeeded, 3);
    assert_eq!(report.stage2.failed, 0);
    assert!(report.failures.is_empty());
    assert!(report.avg_stage2.is_some());

    for row in 2..5 {
        assert!(fx.final_artifact(row).exists(), "missing artifact for row {row}");
    }
}

#[tokio::test]
async fn test_cut_failure_never_reaches_stage_two() {
    // Scenario: the middle row fails its cut; it must not enter the queue
    let fx = Fixture::new(10, false);
    let specs = fx.specs(3);

    let report = run_pipeline(
        fx.cutter([3]),
        fx.inpainter([], Duration::ZERO),
        fx.config.clone(),
        None,
        specs,
    )
    .await
    .unwrap();

    assert_eq!(report.stage1.attempted, 3);
    assert_eq!(report.stage1.succeeded, 2);
    assert_eq!(report.stage1.failed, 1);
    assert_eq!(report.stage2.attempted, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].row_index, 3);
    assert_eq!(report.failures[0].stage, PipelineStage::Cut);

    let order = fx.trace.inpaint_order.lock().unwrap().clone();
    assert_eq!(order, vec![2, 4]);
}

#[tokio::test]
async fn test_malformed_row_is_a_cut_failure() {
    // A row the manifest reader could not parse fails stage 1 without a
    // collaborator call
    let fx = Fixture::new(10, false);
    let mut specs = fx.specs(3);
    specs[1].ranges.clear();
    specs[1]
        .parse_errors
        .push("column 2: invalid timestamp component: bogus".to_string());

    let report = run_pipeline(
        fx.cutter([]),
        fx.inpainter([], Duration::ZERO),
        fx.config.clone(),
        None,
        specs,
    )
    .await
    .unwrap();

    assert_eq!(report.stage1.failed, 1);
    assert_eq!(report.stage2.attempted, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].row_index, 3);
    assert!(report.failures[0].reason.contains("column 2"));
    // The scripted cutter only ran for the two valid rows
    assert_eq!(fx.trace.cuts_finished.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_inpaint_failure_keeps_intermediate() {
    let fx = Fixture::new(10, false);
    let specs = fx.specs(3);

    let report = run_pipeline(
        fx.cutter([]),
        fx.inpainter([3], Duration::ZERO),
        fx.config.clone(),
        None,
        specs,
    )
    .await
    .unwrap();

    assert_eq!(report.stage2.attempted, 3);
    assert_eq!(report.stage2.succeeded, 2);
    assert_eq!(report.stage2.failed, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].stage, PipelineStage::SubtitleRemoval);
    assert_eq!(report.failures[0].path, fx.intermediate(3));

    // Failed row keeps its intermediate, successful rows lose theirs
    assert!(fx.intermediate(3).exists());
    assert!(!fx.intermediate(2).exists());
    assert!(!fx.intermediate(4).exists());
    assert!(!fx.final_artifact(3).exists());
}

#[tokio::test]
async fn test_keep_intermediate_retains_artifacts() {
    let fx = Fixture::new(10, true);
    let specs = fx.specs(2);

    run_pipeline(
        fx.cutter([]),
        fx.inpainter([], Duration::ZERO),
        fx.config.clone(),
        None,
        specs,
    )
    .await
    .unwrap();

    assert!(fx.intermediate(2).exists());
    assert!(fx.intermediate(3).exists());
}

#[tokio::test]
async fn test_slow_consumer_preserves_order_and_backpressure() {
    // Scenario: capacity 1, five rows, fast cuts, slow inpainting. The
    // producer must stall behind the consumer and stage-2 must complete in
    // input order.
    let fx = Fixture::new(1, false);
    let specs = fx.specs(5);

    let mut cutter = fx.cutter([]);
    cutter.max_ahead = Some(1);

    let report = run_pipeline(
        cutter,
        fx.inpainter([], Duration::from_millis(30)),
        fx.config.clone(),
        None,
        specs,
    )
    .await
    .unwrap();

    assert_eq!(report.stage2.succeeded, 5);

    let order = fx.trace.inpaint_order.lock().unwrap().clone();
    assert_eq!(order, vec![2, 3, 4, 5, 6], "stage-2 order must match input order");
    assert!(
        !fx.trace.backpressure_violated.load(Ordering::SeqCst),
        "producer ran more than capacity + 1 items ahead of the consumer"
    );
}

#[tokio::test]
async fn test_single_inpaint_in_flight() {
    let fx = Fixture::new(4, false);
    let specs = fx.specs(6);

    run_pipeline(
        fx.cutter([]),
        fx.inpainter([], Duration::from_millis(5)),
        fx.config.clone(),
        None,
        specs,
    )
    .await
    .unwrap();

    assert!(
        !fx.trace.overlap_seen.load(Ordering::SeqCst),
        "two inpainting invocations overlapped"
    );
}

#[tokio::test]
async fn test_empty_manifest_reports_zero_everything() {
    let fx = Fixture::new(10, false);

    let report = run_pipeline(
        fx.cutter([]),
        fx.inpainter([], Duration::ZERO),
        fx.config.clone(),
        None,
        Vec::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.stage1.attempted, 0);
    assert_eq!(report.stage2.attempted, 0);
    assert!(report.failures.is_empty());
    assert!(report.avg_stage2.is_none());
}
