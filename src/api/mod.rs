//! High-level, ergonomic library API: trim a sheet file to an in-memory report
//! or to a report file, batch helpers for directories of sheets, and the PNG
//! area survey. Prefer these entrypoints over the `core` engine when working
//! with files.
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::params::ScanParams;
use crate::core::sheet::scan_sheet_with;
use crate::error::{Error, Result};
use crate::io::loader::{is_png, load_sheet};
use crate::io::writers::report::{SheetReport, write_report};

pub use crate::io::survey::{survey_directories, survey_directory};

/// Decode `input` and trim every cell of it.
pub fn trim_sheet_file(input: &Path, params: &ScanParams) -> Result<SheetReport> {
    let sheet = load_sheet(input)?;
    let buffer = sheet.view()?;
    let result = scan_sheet_with(&buffer, &params.grid, params.rule, params.execution)?;
    info!(
        "Trimmed {:?}: {}/{} cells with content",
        input,
        result.non_empty_count(),
        result.len()
    );
    Ok(SheetReport::new(
        input.display().to_string(),
        sheet.width(),
        sheet.height(),
        params.clone(),
        result,
    ))
}

/// Trim `input` and write the report to `output` in `params.format`.
pub fn trim_sheet_to_path(input: &Path, output: &Path, params: &ScanParams) -> Result<()> {
    let report = trim_sheet_file(input, params)?;
    write_report(&report, output, params.format)
}

/// Batch processing report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// PNG files directly inside `input_dir`, sorted by path.
pub fn iterate_sheet_images(input_dir: &Path) -> Result<std::vec::IntoIter<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(input_dir)? {
        let path = entry?.path();
        if path.is_file() && is_png(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files.into_iter())
}

/// Trim every PNG sheet in `input_dir`, writing one report per sheet into `output_dir`.
/// If `continue_on_error` is true, failures are counted in the report and processing
/// continues; otherwise, the first error is returned.
pub fn process_directory_to_path(
    input_dir: &Path,
    output_dir: &Path,
    params: &ScanParams,
    continue_on_error: bool,
) -> Result<BatchReport> {
    if !input_dir.is_dir() {
        return Err(Error::InvalidArgument {
            arg: "input_dir",
            value: input_dir.display().to_string(),
        });
    }
    std::fs::create_dir_all(output_dir)?;

    let mut report = BatchReport::default();
    for entry in std::fs::read_dir(input_dir)? {
        let path = entry?.path();
        if !(path.is_file() && is_png(&path)) {
            info!("Skipping non-PNG entry: {:?}", path);
            report.skipped += 1;
        }
    }

    for path in iterate_sheet_images(input_dir)? {
        let output_path = report_path(&path, output_dir, params);
        info!("Processing: {:?} -> {:?}", path, output_path);
        match trim_sheet_to_path(&path, &output_path, params) {
            Ok(()) => report.processed += 1,
            Err(e) if continue_on_error => {
                warn!("Error processing {:?}: {}", path, e);
                report.errors += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "Batch complete: processed={} skipped={} errors={}",
        report.processed, report.skipped, report.errors
    );
    Ok(report)
}

fn report_path(sheet: &Path, output_dir: &Path, params: &ScanParams) -> PathBuf {
    let stem = sheet
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sheet".to_string());
    output_dir.join(format!("{}.{}", stem, params.format.extension()))
}
