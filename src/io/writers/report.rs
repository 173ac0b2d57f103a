use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::bounds::TrimResult;
use crate::core::params::ScanParams;
use crate::core::sheet::ScanResult;
use crate::error::Result;
use crate::types::OutputFormat;

/// Aggregate figures over a scan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub cells: usize,
    pub non_empty: usize,
    pub empty: usize,
    pub trimmed_area: usize,
    /// Trimmed area over total cell area; 0 when there are no cells
    pub trimmed_ratio: f64,
}

impl ScanSummary {
    pub fn from_result(result: &ScanResult) -> Self {
        let non_empty = result.non_empty_count();
        let trimmed_area = result.trimmed_area();
        let cell_area = result.cell_area();
        Self {
            cells: result.len(),
            non_empty,
            empty: result.len() - non_empty,
            trimmed_area,
            trimmed_ratio: if cell_area == 0 {
                0.0
            } else {
                trimmed_area as f64 / cell_area as f64
            },
        }
    }
}

/// Everything written for one scanned sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetReport {
    pub source: String,
    pub width: usize,
    pub height: usize,
    pub params: ScanParams,
    pub generated_at: String,
    pub summary: ScanSummary,
    pub result: ScanResult,
}

impl SheetReport {
    pub fn new(
        source: String,
        width: usize,
        height: usize,
        params: ScanParams,
        result: ScanResult,
    ) -> Self {
        Self {
            source,
            width,
            height,
            params,
            generated_at: chrono::Utc::now().to_rfc3339(),
            summary: ScanSummary::from_result(&result),
            result,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Text => Ok(render_text(self)),
        }
    }
}

/// Line-per-cell table: `index col row x y w h`, or `index col row empty`.
pub fn render_text(report: &SheetReport) -> String {
    let mut out = String::new();
    let grid = &report.params.grid;
    let _ = writeln!(out, "# source: {}", report.source);
    let _ = writeln!(
        out,
        "# image: {}x{}  cell: {}x{}  spacing: {}  margin: {}",
        report.width, report.height, grid.cell_width, grid.cell_height, grid.spacing, grid.margin
    );
    let _ = writeln!(
        out,
        "# grid: {}x{}  non-empty: {}/{}",
        report.result.grid.columns,
        report.result.grid.rows,
        report.summary.non_empty,
        report.summary.cells
    );
    for entry in &report.result {
        match entry.trim {
            TrimResult::Empty => {
                let _ = writeln!(out, "{} {} {} empty", entry.index, entry.column, entry.row);
            }
            TrimResult::Trimmed(rect) => {
                let _ = writeln!(
                    out,
                    "{} {} {} {} {} {} {}",
                    entry.index, entry.column, entry.row, rect.x, rect.y, rect.width, rect.height
                );
            }
        }
    }
    out
}

/// Write `report` to `output_path` in `format`.
pub fn write_report(report: &SheetReport, output_path: &Path, format: OutputFormat) -> Result<()> {
    let text = report.render(format)?;
    std::fs::write(output_path, text)?;
    info!("Wrote {} trim report: {:?}", format, output_path);
    Ok(())
}
