//! Output path construction for both stages.

use std::path::{Path, PathBuf};

/// Stage-1 output path: `{intermediate_dir}/{stem}_cut{ext}`.
pub fn intermediate_path(intermediate_dir: &Path, source: &Path) -> PathBuf {
    intermediate_dir.join(suffixed_name(source, "_cut"))
}

/// Stage-2 output path: `{final_dir}/{stem}_no_sub{ext}`.
///
/// The stem comes from the original source, not the intermediate, so the
/// final artifact carries the user's file name.
pub fn final_path(final_dir: &Path, source: &Path) -> PathBuf {
    final_dir.join(suffixed_name(source, "_no_sub"))
}

fn suffixed_name(source: &Path, suffix: &str) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());

    match source.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    }
}
