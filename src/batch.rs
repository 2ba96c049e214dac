use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::nric_masker::NricMasker;
use crate::processing::{ImageProcessor, OcrEngine};
use crate::utils::{ErrorKind, MaskError};

const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "tif", "tiff"];

/// Result for one input of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub masked_count: usize,
    pub error: Option<String>,
    pub error_kind: Option<ErrorKind>,
}

impl BatchEntry {
    fn failed(input: &Path, error: String, kind: ErrorKind) -> Self {
        BatchEntry {
            input: input.to_path_buf(),
            output: None,
            masked_count: 0,
            error: Some(error),
            error_kind: Some(kind),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    pub total_masked: usize,
    pub failures: usize,
}

impl BatchReport {
    fn from_entries(entries: Vec<BatchEntry>) -> Self {
        let total_masked = entries.iter().map(|e| e.masked_count).sum();
        let failures = entries.iter().filter(|e| !e.is_ok()).count();
        BatchReport {
            entries,
            total_masked,
            failures,
        }
    }

    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Image files directly inside `dir`, sorted by path.
pub fn collect_images(dir: &Path) -> Result<Vec<PathBuf>, MaskError> {
    let entries = fs::read_dir(dir).map_err(|e| MaskError::UnreadableInput {
        path: dir.to_path_buf(),
        source: image::ImageError::IoError(e),
    })?;

    let mut images: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    images.sort();
    Ok(images)
}

/// Masks each input into `output_dir`. Inputs run in parallel, each with its
/// own image buffer; a failing input is recorded in its entry and the rest
/// carry on. Entries keep the order of `inputs`.
///
/// Outputs are named after the full input file name. An input whose output
/// path was already claimed by an earlier input is not processed and is
/// reported as a failure.
pub fn mask_files<E>(
    masker: &NricMasker<E>,
    inputs: &[PathBuf],
    output_dir: &Path,
    debug: bool,
) -> BatchReport
where
    E: OcrEngine + Sync,
{
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    let jobs: Vec<(&PathBuf, PathBuf, Option<&Path>)> = inputs
        .iter()
        .map(|input| {
            let output =
                ImageProcessor::batch_output_path(output_dir, input, &masker.config().output);
            let owner = *claimed.entry(output.clone()).or_insert(input.as_path());
            let clash = (owner != input.as_path()).then_some(owner);
            (input, output, clash)
        })
        .collect();

    let entries: Vec<BatchEntry> = jobs
        .par_iter()
        .map(|(input, output, clash)| {
            if let Some(owner) = clash {
                let message = format!(
                    "Output {} already used by {}",
                    output.display(),
                    owner.display()
                );
                log::warn!("Skipping {}: {}", input.display(), message);
                return BatchEntry::failed(input, message, ErrorKind::Persistence);
            }
            match masker.mask_file(input, Some(output.as_path()), debug) {
                Ok((path, count)) => BatchEntry {
                    input: input.to_path_buf(),
                    output: Some(path),
                    masked_count: count,
                    error: None,
                    error_kind: None,
                },
                Err(e) => {
                    log::warn!("Skipping {}: {}", input.display(), e);
                    BatchEntry::failed(input, e.to_string(), e.kind())
                }
            }
        })
        .collect();

    let report = BatchReport::from_entries(entries);
    log::info!(
        "Batch finished: {} image(s), {} region(s) masked, {} failure(s)",
        report.entries.len(),
        report.total_masked,
        report.failures
    );
    report
}
