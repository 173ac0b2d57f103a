//! Per-cell trim: the tight bounding box of foreground pixels inside one cell.
use serde::{Deserialize, Serialize};

use crate::core::grid::CellRect;
use crate::core::sampler::{ClassificationRule, PixelBuffer, PixelSampler};
use crate::error::{Error, Result};

/// Trimmed rectangle in cell-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrimRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl TrimRect {
    /// Rectangle spanning inclusive extremes.
    pub fn from_extremes(min_x: usize, min_y: usize, max_x: usize, max_y: usize) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        }
    }

    /// Inclusive right column.
    pub fn max_x(&self) -> usize {
        self.x + self.width - 1
    }

    /// Inclusive bottom row.
    pub fn max_y(&self) -> usize {
        self.y + self.height - 1
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// The same rectangle in image coordinates.
    pub fn to_image(&self, cell: &CellRect) -> CellRect {
        CellRect {
            x: cell.x + self.x,
            y: cell.y + self.y,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TrimResult {
    /// No foreground pixel in the cell.
    Empty,
    Trimmed(TrimRect),
}

impl TrimResult {
    pub fn is_empty(&self) -> bool {
        matches!(self, TrimResult::Empty)
    }

    pub fn rect(&self) -> Option<&TrimRect> {
        match self {
            TrimResult::Empty => None,
            TrimResult::Trimmed(rect) => Some(rect),
        }
    }

    pub fn area(&self) -> usize {
        self.rect().map_or(0, TrimRect::area)
    }
}

/// Running min/max of foreground coordinates.
#[derive(Debug, Clone, Copy)]
struct Extents {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl Extents {
    fn point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    #[inline]
    fn include(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }
}

/// Trim one cell of `buffer` under `rule`.
pub fn scan_cell_bounds(
    buffer: &PixelBuffer<'_>,
    cell: &CellRect,
    rule: ClassificationRule,
) -> Result<TrimResult> {
    let sampler = PixelSampler::new(*buffer, rule)?;
    scan_cell(&sampler, cell)
}

/// Trim one cell with an already validated sampler.
///
/// Every pixel of the cell is visited exactly once, row-major; there is no
/// early exit because an extremal pixel may sit anywhere.
pub fn scan_cell(sampler: &PixelSampler<'_>, cell: &CellRect) -> Result<TrimResult> {
    if cell.width == 0 || cell.height == 0 {
        return Err(Error::invalid_input(format!(
            "cell at ({}, {}) has zero size {}x{}",
            cell.x, cell.y, cell.width, cell.height
        )));
    }
    let region = sampler.region(cell)?;

    let mut extents: Option<Extents> = None;
    for (y, row) in region.outer_iter().enumerate() {
        for (x, lane) in row.outer_iter().enumerate() {
            if !sampler.is_foreground_lane(lane) {
                continue;
            }
            extents = Some(match extents {
                Some(mut e) => {
                    e.include(x, y);
                    e
                }
                None => Extents::point(x, y),
            });
        }
    }

    Ok(match extents {
        None => TrimResult::Empty,
        Some(e) => {
            let rect = TrimRect::from_extremes(e.min_x, e.min_y, e.max_x, e.max_y);
            debug_assert!(rect.x + rect.width <= cell.width && rect.y + rect.height <= cell.height);
            TrimResult::Trimmed(rect)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_plane(width: usize, height: usize, opaque: &[(usize, usize)]) -> Vec<u8> {
        let mut data = vec![0u8; width * height];
        for &(x, y) in opaque {
            data[y * width + x] = 255;
        }
        data
    }

    fn whole(width: usize, height: usize) -> CellRect {
        CellRect {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    #[test]
    fn test_single_pixel_cell() {
        let data = alpha_plane(4, 4, &[(1, 2)]);
        let buffer = PixelBuffer::from_alpha(&data, 4, 4).unwrap();
        let trim = scan_cell_bounds(&buffer, &whole(4, 4), ClassificationRule::default()).unwrap();
        assert_eq!(
            trim,
            TrimResult::Trimmed(TrimRect {
                x: 1,
                y: 2,
                width: 1,
                height: 1
            })
        );
    }

    #[test]
    fn test_transparent_cell_is_empty() {
        let data = alpha_plane(7, 3, &[]);
        let buffer = PixelBuffer::from_alpha(&data, 7, 3).unwrap();
        let trim = scan_cell_bounds(&buffer, &whole(7, 3), ClassificationRule::default()).unwrap();
        assert!(trim.is_empty());
        assert_eq!(trim.area(), 0);
    }

    #[test]
    fn test_opaque_cell_is_full() {
        let data = vec![255u8; 5 * 6];
        let buffer = PixelBuffer::from_alpha(&data, 5, 6).unwrap();
        let trim = scan_cell_bounds(&buffer, &whole(5, 6), ClassificationRule::default()).unwrap();
        assert_eq!(
            trim.rect(),
            Some(&TrimRect {
                x: 0,
                y: 0,
                width: 5,
                height: 6
            })
        );
    }

    #[test]
    fn test_corner_pixels_are_included() {
        let data = alpha_plane(6, 6, &[(5, 0), (0, 5)]);
        let buffer = PixelBuffer::from_alpha(&data, 6, 6).unwrap();
        let trim = scan_cell_bounds(&buffer, &whole(6, 6), ClassificationRule::default()).unwrap();
        let rect = trim.rect().unwrap();
        assert_eq!((rect.x, rect.y, rect.max_x(), rect.max_y()), (0, 0, 5, 5));
    }

    #[test]
    fn test_late_isolated_pixel_extends_bounds() {
        // A blob near the top-left plus a lone pixel in the last row
        let data = alpha_plane(8, 8, &[(1, 1), (2, 1), (1, 2), (6, 7)]);
        let buffer = PixelBuffer::from_alpha(&data, 8, 8).unwrap();
        let trim = scan_cell_bounds(&buffer, &whole(8, 8), ClassificationRule::default()).unwrap();
        assert_eq!(
            trim.rect(),
            Some(&TrimRect {
                x: 1,
                y: 1,
                width: 6,
                height: 7
            })
        );
    }

    #[test]
    fn test_result_is_cell_local() {
        // 8x4 image, second 4x4 cell has a pixel at image (5, 3)
        let data = alpha_plane(8, 4, &[(5, 3)]);
        let buffer = PixelBuffer::from_alpha(&data, 8, 4).unwrap();
        let cell = CellRect {
            x: 4,
            y: 0,
            width: 4,
            height: 4,
        };
        let trim = scan_cell_bounds(&buffer, &cell, ClassificationRule::default()).unwrap();
        let rect = *trim.rect().unwrap();
        assert_eq!((rect.x, rect.y), (1, 3));
        assert_eq!(
            rect.to_image(&cell),
            CellRect {
                x: 5,
                y: 3,
                width: 1,
                height: 1,
            }
        );
    }

    #[test]
    fn test_threshold_boundary_pixel_is_background() {
        let mut data = vec![0u8; 9];
        data[4] = 128;
        let buffer = PixelBuffer::from_alpha(&data, 3, 3).unwrap();

        let at = ClassificationRule::Alpha { threshold: 128 };
        assert!(scan_cell_bounds(&buffer, &whole(3, 3), at).unwrap().is_empty());

        let below = ClassificationRule::Alpha { threshold: 127 };
        let below = scan_cell_bounds(&buffer, &whole(3, 3), below);
        assert_eq!(below.unwrap().area(), 1);
    }

    #[test]
    fn test_cell_outside_buffer_fails() {
        let data = alpha_plane(4, 4, &[]);
        let buffer = PixelBuffer::from_alpha(&data, 4, 4).unwrap();
        let cell = CellRect {
            x: 2,
            y: 2,
            width: 4,
            height: 4,
        };
        assert!(matches!(
            scan_cell_bounds(&buffer, &cell, ClassificationRule::default()),
            Err(Error::OutOfRange { .. })
        ));
    }
}
