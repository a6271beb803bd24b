//! CSV manifest reading.
//!
//! Column 1 is the video path; every further column is a removal range,
//! `HH:MM:SS-HH:MM:SS` or raw seconds `A-B`. Rows keep their physical
//! spreadsheet index (header row is 1) so failures can be traced back to
//! the file the user edited. Cell-level problems become `parse_errors` on
//! the spec — the cutter stage turns those into recorded failures — while
//! an unreadable manifest is fatal.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use subscrub_models::CutSpec;

/// Read every non-empty manifest row, in file order.
pub fn read_manifest(path: &Path) -> anyhow::Result<Vec<CutSpec>> {
    let manifest_dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("cannot open manifest {}", path.display()))?;

    let mut specs = Vec::new();

    for (i, result) in reader.records().enumerate() {
        // Header occupies row 1; the first data record is row 2
        let row_index = (i + 2) as u32;
        let record = result.with_context(|| format!("cannot read manifest row {row_index}"))?;

        let raw_source = record.get(0).unwrap_or("").trim();
        if raw_source.is_empty() {
            debug!(row = row_index, "Skipping row without a video path");
            continue;
        }

        let mut spec = CutSpec::new(row_index, PathBuf::from(raw_source), Vec::new());

        match resolve_source(raw_source, &manifest_dir) {
            Ok(resolved) => spec.source_path = resolved,
            Err(reason) => spec.parse_errors.push(reason),
        }

        for (col, cell) in record.iter().enumerate().skip(1) {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            match cell.parse() {
                Ok(range) => spec.ranges.push(range),
                Err(e) => spec
                    .parse_errors
                    .push(format!("column {}: {}", col + 1, e)),
            }
        }

        specs.push(spec);
    }

    Ok(specs)
}

/// Resolve a manifest path: absolute, relative to the manifest's
/// directory, or relative to the working directory, first hit wins.
fn resolve_source(raw: &str, manifest_dir: &Path) -> Result<PathBuf, String> {
    let raw_path = Path::new(raw);

    if raw_path.is_absolute() {
        if raw_path.exists() {
            return Ok(raw_path.to_path_buf());
        }
        return Err(format!("source video not found: {raw}"));
    }

    let relative_to_manifest = manifest_dir.join(raw_path);
    if relative_to_manifest.exists() {
        return Ok(relative_to_manifest);
    }
    if raw_path.exists() {
        return Ok(raw_path.to_path_buf());
    }

    Err(format!("source video not found: {raw}"))
}
