//! Batch orchestration: input enumeration, output naming, sequential runs.
//!
//! The orchestrator is deliberately sequential: one engine call at a time,
//! outcomes appended in enumeration order, and a per-file failure never stops
//! the files after it.

use std::path::{Path, PathBuf};

use crate::engine::{StampOptions, StampResult, WatermarkEngine};
use crate::error::{Error, Result};

/// Extensions accepted by the directory scan, matched case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "webp"];

/// Suffix inserted before the extension of every output filename.
pub const OUTPUT_SUFFIX: &str = "_watermarked";

/// Outcome of a batch run: one [`StampResult`] per input, in input order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Per-file results, ordered as the inputs were enumerated.
    pub results: Vec<StampResult>,
}

impl BatchOutcome {
    /// Number of files stamped successfully.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Number of files that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

/// Check whether a path carries a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Enumerate supported images in a directory, non-recursively.
///
/// Entries are sorted by filename so repeated runs enumerate in the same
/// order.
///
/// # Errors
///
/// Returns [`Error::InputDirMissing`] if `dir` does not exist or is not a
/// directory, or [`Error::Io`] if it cannot be read.
pub fn collect_images(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::InputDirMissing(dir.to_path_buf()));
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|e| e.path())
        .filter(|p| is_supported_image(p))
        .collect();
    files.sort();
    Ok(files)
}

/// Derive the output path for an input file.
///
/// The filename becomes `<stem>_watermarked<original-extension>`, placed
/// beside the source when `output_dir` is `None`, otherwise under
/// `output_dir`. Re-running on the same input derives the same path, so
/// outputs are overwritten rather than duplicated.
#[must_use]
pub fn watermarked_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let name = match input.extension() {
        Some(ext) => format!("{stem}{OUTPUT_SUFFIX}.{}", ext.to_string_lossy()),
        None => format!("{stem}{OUTPUT_SUFFIX}"),
    };
    let parent = output_dir.unwrap_or_else(|| input.parent().unwrap_or(Path::new(".")));
    parent.join(name)
}

/// Run a batch over an explicit list of input files.
///
/// Inputs are processed strictly in the given order; every input yields
/// exactly one result and a failure never skips or aborts the remainder.
#[must_use]
pub fn run_batch(
    engine: &WatermarkEngine,
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    opts: &StampOptions,
) -> BatchOutcome {
    run_batch_with_progress(engine, inputs, output_dir, opts, |_, _, _| {})
}

/// Like [`run_batch`], invoking `progress(index, total, result)` after each
/// file. Used by the background worker to stream per-file events.
pub fn run_batch_with_progress<F>(
    engine: &WatermarkEngine,
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    opts: &StampOptions,
    mut progress: F,
) -> BatchOutcome
where
    F: FnMut(usize, usize, &StampResult),
{
    let total = inputs.len();
    let mut outcome = BatchOutcome::default();
    for (index, input) in inputs.iter().enumerate() {
        let output = watermarked_output_path(input, output_dir);
        let result = engine.process_file(input, &output, opts);
        progress(index, total, &result);
        outcome.results.push(result);
    }
    outcome
}

/// Scan a directory and run a batch over every supported image in it.
///
/// # Errors
///
/// Returns an error only for the directory scan itself; per-file stamping
/// failures are recorded in the outcome.
pub fn run_directory(
    engine: &WatermarkEngine,
    input_dir: &Path,
    output_dir: Option<&Path>,
    opts: &StampOptions,
) -> Result<BatchOutcome> {
    let inputs = collect_images(input_dir)?;
    Ok(run_batch(engine, &inputs, output_dir, opts))
}
