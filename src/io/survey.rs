//! Pixel-area survey of PNG asset trees.
//!
//! Sums `width * height` of every PNG under a directory, and separately under
//! each of its immediate subdirectories, so the share of texture area each
//! asset group consumes can be compared. Only image headers are read.
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::io::loader::{image_dimensions, is_png};

/// Entries at or above this share of the total are flagged.
pub const HIGH_SHARE_THRESHOLD: f64 = 0.2;

/// One immediate subdirectory of the surveyed root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyEntry {
    pub name: String,
    pub pixels: u64,
    /// Fraction of the root total, 0 when the total is 0
    pub share: f64,
    pub high_share: bool,
    /// Side of the square with the same area, `floor(sqrt(pixels))`
    pub edge: u64,
}

impl SurveyEntry {
    /// Share as a whole percentage, halves rounded up.
    pub fn percent(&self) -> u64 {
        (self.share * 100.0 + 0.5).floor() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyReport {
    pub root: PathBuf,
    pub total_pixels: u64,
    pub total_edge: u64,
    /// Sorted by pixel count, largest first
    pub entries: Vec<SurveyEntry>,
}

impl SurveyReport {
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Directory: {}", self.root.display());
        let _ = writeln!(out, "Total pixels: {} px²", self.total_edge);
        let _ = writeln!(out, "Content:");
        for entry in &self.entries {
            let _ = writeln!(
                out,
                "    {}: {} px² ({}%){}",
                entry.name,
                entry.edge,
                entry.percent(),
                if entry.high_share { " *" } else { "" }
            );
        }
        out
    }
}

/// Survey `root`: total PNG area plus a per-subdirectory breakdown.
pub fn survey_directory(root: &Path) -> Result<SurveyReport> {
    if !root.is_dir() {
        return Err(Error::InvalidArgument {
            arg: "directory",
            value: root.display().to_string(),
        });
    }

    let total_pixels = count_png_pixels(root)?;
    let mut entries = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let pixels = count_png_pixels(&path)?;
        let share = if total_pixels == 0 {
            0.0
        } else {
            pixels as f64 / total_pixels as f64
        };
        entries.push(SurveyEntry {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            pixels,
            share,
            high_share: share >= HIGH_SHARE_THRESHOLD,
            edge: square_edge(pixels),
        });
    }
    entries.sort_by(|a, b| b.pixels.cmp(&a.pixels).then_with(|| a.name.cmp(&b.name)));

    info!(
        "Surveyed {:?}: {} px total across {} subdirectories",
        root,
        total_pixels,
        entries.len()
    );
    Ok(SurveyReport {
        root: root.to_path_buf(),
        total_pixels,
        total_edge: square_edge(total_pixels),
        entries,
    })
}

/// Survey each directory in `roots`, in order. Paths that are not directories
/// are skipped with a warning.
pub fn survey_directories(roots: &[PathBuf]) -> Result<Vec<SurveyReport>> {
    let mut reports = Vec::with_capacity(roots.len());
    for root in roots {
        if !root.is_dir() {
            warn!("Skipping non-directory survey path: {:?}", root);
            continue;
        }
        reports.push(survey_directory(root)?);
    }
    Ok(reports)
}

/// Recursive sum of PNG areas under `dir`.
pub fn count_png_pixels(dir: &Path) -> Result<u64> {
    let mut count = 0u64;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            count += count_png_pixels(&path)?;
        } else if path.is_file() && is_png(&path) {
            let (width, height) = image_dimensions(&path)?;
            debug!("{:?}: {}x{}", path, width, height);
            count += width as u64 * height as u64;
        }
    }
    Ok(count)
}

/// `floor(sqrt(pixels))`, exact for all `u64`.
fn square_edge(pixels: u64) -> u64 {
    let mut edge = (pixels as f64).sqrt() as u64;
    while edge.saturating_mul(edge) > pixels {
        edge -= 1;
    }
    while (edge + 1).saturating_mul(edge + 1) <= pixels {
        edge += 1;
    }
    edge
}
