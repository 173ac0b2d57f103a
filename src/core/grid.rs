//! Grid geometry: cell size/spacing/margin and the row-major cell sequence it
//! lays over an image.
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Cell layout of a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSpec {
    pub cell_width: usize,
    pub cell_height: usize,
    /// Gap between adjacent cells, both axes
    #[serde(default)]
    pub spacing: usize,
    /// Border around the whole grid
    #[serde(default)]
    pub margin: usize,
}

impl GridSpec {
    pub fn new(cell_width: usize, cell_height: usize) -> Self {
        Self {
            cell_width,
            cell_height,
            spacing: 0,
            margin: 0,
        }
    }

    pub fn with_spacing(mut self, spacing: usize) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(Error::invalid_input(format!(
                "cell size must be positive, got {}x{}",
                self.cell_width, self.cell_height
            )));
        }
        if self.cell_width.checked_add(self.spacing).is_none()
            || self.cell_height.checked_add(self.spacing).is_none()
        {
            return Err(Error::invalid_input(format!(
                "cell step overflows: {}x{} cells with spacing {}",
                self.cell_width, self.cell_height, self.spacing
            )));
        }
        Ok(())
    }

    /// Whole columns and rows that fit in a `width` x `height` image.
    pub fn dimensions(&self, width: usize, height: usize) -> GridDims {
        GridDims {
            columns: axis_count(width, self.cell_width, self.spacing, self.margin),
            rows: axis_count(height, self.cell_height, self.spacing, self.margin),
        }
    }
}

/// `floor((extent - 2*margin + spacing) / (cell + spacing))`, or 0 if the margins eat the extent.
fn axis_count(extent: usize, cell: usize, spacing: usize, margin: usize) -> usize {
    let available = match margin
        .checked_mul(2)
        .and_then(|both| extent.checked_sub(both))
    {
        Some(available) => available,
        None => return 0,
    };
    if cell == 0 || available < cell {
        return 0;
    }
    1 + (available - cell) / cell.saturating_add(spacing)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridDims {
    pub columns: usize,
    pub rows: usize,
}

impl GridDims {
    /// Total cells, saturating at `usize::MAX`.
    pub fn count(&self) -> usize {
        self.columns.saturating_mul(self.rows)
    }

    pub fn checked_count(&self) -> Option<usize> {
        self.columns.checked_mul(self.rows)
    }
}

/// One untrimmed cell, in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl CellRect {
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}

/// A validated grid laid over concrete image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    spec: GridSpec,
    dims: GridDims,
}

impl GridLayout {
    pub fn new(spec: GridSpec, width: usize, height: usize) -> Result<Self> {
        spec.validate()?;
        let dims = spec.dimensions(width, height);
        if dims.checked_count().is_none() {
            return Err(Error::invalid_input(format!(
                "{} columns x {} rows overflows the cell count",
                dims.columns, dims.rows
            )));
        }
        Ok(Self { spec, dims })
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.dims.count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column and row of the `index`-th cell in row-major order.
    pub fn position(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.len()).then(|| (index % self.dims.columns, index / self.dims.columns))
    }

    pub fn cell(&self, index: usize) -> Option<CellRect> {
        let (column, row) = self.position(index)?;
        Some(CellRect {
            x: self.spec.margin + column * (self.spec.cell_width + self.spec.spacing),
            y: self.spec.margin + row * (self.spec.cell_height + self.spec.spacing),
            width: self.spec.cell_width,
            height: self.spec.cell_height,
        })
    }

    pub fn cells(&self) -> CellIter {
        CellIter {
            layout: *self,
            next: 0,
        }
    }
}

/// Lazy row-major sequence of cells. Cloning restarts from the clone's position.
#[derive(Debug, Clone)]
pub struct CellIter {
    layout: GridLayout,
    next: usize,
}

impl CellIter {
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }
}

impl Iterator for CellIter {
    type Item = CellRect;

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.layout.cell(self.next)?;
        self.next += 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.layout.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CellIter {}

/// Cells of `grid` over a `width` x `height` image, row-major.
pub fn iterate_cells(width: usize, height: usize, grid: &GridSpec) -> Result<CellIter> {
    Ok(GridLayout::new(*grid, width, height)?.cells())
}
