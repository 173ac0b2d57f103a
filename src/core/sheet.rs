//! Whole-sheet scan: lay the grid over the buffer, trim every cell, and keep
//! the results in row-major grid order.
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::bounds::{TrimResult, scan_cell};
use crate::core::grid::{CellRect, GridDims, GridLayout, GridSpec};
use crate::core::sampler::{ClassificationRule, PixelBuffer, PixelSampler};
use crate::error::{Error, Result};
use crate::types::Execution;

/// Trim outcome of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellTrim {
    /// Row-major position in the grid
    pub index: usize,
    pub column: usize,
    pub row: usize,
    /// Untrimmed cell, image coordinates
    pub cell: CellRect,
    /// Trim rectangle, cell coordinates
    pub trim: TrimResult,
}

/// Per-cell results of a sheet scan, one entry per grid cell in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanResult {
    pub grid: GridDims,
    pub cells: Vec<CellTrim>,
}

impl ScanResult {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CellTrim> {
        self.cells.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CellTrim> {
        self.cells.iter()
    }

    /// Cells holding at least one foreground pixel.
    pub fn non_empty_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.trim.is_empty()).count()
    }

    pub fn trimmed_area(&self) -> usize {
        self.cells.iter().map(|c| c.trim.area()).sum()
    }

    pub fn cell_area(&self) -> usize {
        self.cells.iter().map(|c| c.cell.area()).sum()
    }
}

impl<'a> IntoIterator for &'a ScanResult {
    type Item = &'a CellTrim;
    type IntoIter = std::slice::Iter<'a, CellTrim>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Scan every cell of `buffer` sequentially.
pub fn scan_sheet(
    buffer: &PixelBuffer<'_>,
    grid: &GridSpec,
    rule: ClassificationRule,
) -> Result<ScanResult> {
    scan_sheet_with(buffer, grid, rule, Execution::Sequential)
}

/// Scan every cell of `buffer`, optionally fanning cells out over the rayon pool.
/// Both modes return identical, row-major results.
pub fn scan_sheet_with(
    buffer: &PixelBuffer<'_>,
    grid: &GridSpec,
    rule: ClassificationRule,
    execution: Execution,
) -> Result<ScanResult> {
    if buffer.is_empty() {
        return Err(Error::invalid_input(format!(
            "pixel buffer has zero area ({}x{})",
            buffer.width(),
            buffer.height()
        )));
    }
    let layout = GridLayout::new(*grid, buffer.width(), buffer.height())?;
    let sampler = PixelSampler::new(*buffer, rule)?;
    let dims = layout.dims();

    debug!(
        "Scanning {}x{} sheet: {} columns x {} rows of {}x{} cells ({}, {:?})",
        buffer.width(),
        buffer.height(),
        dims.columns,
        dims.rows,
        grid.cell_width,
        grid.cell_height,
        execution,
        rule
    );

    let cells = match execution {
        Execution::Sequential => layout
            .cells()
            .enumerate()
            .map(|(index, cell)| trim_cell(&sampler, &layout, index, cell))
            .collect::<Result<Vec<_>>>()?,
        Execution::Parallel => {
            let rects: Vec<CellRect> = layout.cells().collect();
            // Indexed collect keeps row-major order
            rects
                .par_iter()
                .enumerate()
                .map(|(index, cell)| trim_cell(&sampler, &layout, index, *cell))
                .collect::<Result<Vec<_>>>()?
        }
    };

    let result = ScanResult { grid: dims, cells };
    debug!(
        "Scan complete: {} cells, {} non-empty, trimmed area {}",
        result.len(),
        result.non_empty_count(),
        result.trimmed_area()
    );
    Ok(result)
}

fn trim_cell(
    sampler: &PixelSampler<'_>,
    layout: &GridLayout,
    index: usize,
    cell: CellRect,
) -> Result<CellTrim> {
    let (column, row) = layout.position(index).ok_or(Error::OutOfRange {
        x: cell.x,
        y: cell.y,
        width: sampler.buffer().width(),
        height: sampler.buffer().height(),
    })?;
    Ok(CellTrim {
        index,
        column,
        row,
        cell,
        trim: scan_cell(sampler, &cell)?,
    })
}
