//! End-of-run presentation: console summary and failure log.

use std::io::Write;
use std::path::{Path, PathBuf};

use subscrub_pipeline::{RunReport, StageTally};

const RULE: &str = "============================================================";

/// Print the run summary to stdout.
pub fn print_report(report: &RunReport, final_dir: &Path) {
    let total_secs = report.total_elapsed.as_secs_f64();

    println!("\n{RULE}");
    println!("Run summary");
    println!("{RULE}");
    println!(
        "Total time: {:.2}s ({:.2} min)",
        total_secs,
        total_secs / 60.0
    );

    println!("\nStage 1 - range removal:");
    print_tally(&report.stage1);

    println!("\nStage 2 - subtitle removal:");
    print_tally(&report.stage2);
    if let Some(avg) = report.avg_stage2 {
        println!("  average per video: {:.1}s", avg.as_secs_f64());
    }

    if !report.failures.is_empty() {
        println!("\nFailures:");
        for failure in &report.failures {
            println!(
                "  [row {}] {} (stage {})",
                failure.row_index,
                failure.path.display(),
                failure.stage.number()
            );
            println!("    reason: {}", failure.reason);
        }
    }

    println!("\nFinal output directory: {}", final_dir.display());
    println!("{RULE}");
}

fn print_tally(tally: &StageTally) {
    println!("  attempted: {}", tally.attempted);
    println!("  succeeded: {}", tally.succeeded);
    println!("  failed:    {}", tally.failed);
}

/// Write `failed_tasks.txt` into the final directory when anything failed.
///
/// Returns the log path, or `None` when the run was clean.
pub fn write_failure_log(report: &RunReport, final_dir: &Path) -> std::io::Result<Option<PathBuf>> {
    if report.failures.is_empty() {
        return Ok(None);
    }

    let log_path = final_dir.join("failed_tasks.txt");
    let mut file = std::fs::File::create(&log_path)?;

    writeln!(file, "Failed tasks")?;
    writeln!(file, "{RULE}")?;
    writeln!(file)?;
    for failure in &report.failures {
        writeln!(
            file,
            "[row {}] {} (stage {})",
            failure.row_index,
            failure.path.display(),
            failure.stage.number()
        )?;
        writeln!(file, "  reason: {}", failure.reason)?;
        writeln!(file)?;
    }

    Ok(Some(log_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use subscrub_pipeline::{FailureRecord, PipelineStage};

    fn report_with_failures(failures: Vec<FailureRecord>) -> RunReport {
        RunReport {
            total_elapsed: Duration::from_secs(1),
            stage1: StageTally::default(),
            stage2: StageTally::default(),
            avg_stage2: None,
            failures,
        }
    }

    #[test]
    fn test_clean_run_writes_no_log() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_failure_log(&report_with_failures(Vec::new()), dir.path()).unwrap();
        assert!(written.is_none());
        assert!(!dir.path().join("failed_tasks.txt").exists());
    }

    #[test]
    fn test_failures_written_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let report = report_with_failures(vec![
            FailureRecord {
                row_index: 2,
                path: "/in/a.mp4".into(),
                stage: PipelineStage::Cut,
                reason: "bad range".into(),
            },
            FailureRecord {
                row_index: 5,
                path: "/tmp/b_cut.mp4".into(),
                stage: PipelineStage::SubtitleRemoval,
                reason: "service error".into(),
            },
        ]);

        let path = write_failure_log(&report, dir.path()).unwrap().unwrap();
        let body = std::fs::read_to_string(path).unwrap();

        let first = body.find("[row 2]").unwrap();
        let second = body.find("[row 5]").unwrap();
        assert!(first < second);
        assert!(body.contains("(stage 1)"));
        assert!(body.contains("(stage 2)"));
    }
}
