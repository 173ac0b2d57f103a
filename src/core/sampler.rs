//! Borrowed pixel buffers and the foreground/background classification rules
//! applied to them.
use ndarray::{ArrayView1, ArrayView3, s};
use serde::{Deserialize, Serialize};

use crate::core::grid::CellRect;
use crate::error::{Error, Result};
use crate::types::ClassificationMode;

/// Channel layout of a [`PixelBuffer`].
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum PixelLayout {
    /// One channel holding alpha only.
    Alpha,
    /// Interleaved RGBA, alpha last.
    Rgba,
}

impl PixelLayout {
    pub fn channels(&self) -> usize {
        match self {
            PixelLayout::Alpha => 1,
            PixelLayout::Rgba => 4,
        }
    }

    pub fn alpha_channel(&self) -> usize {
        self.channels() - 1
    }

    fn from_channels(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(PixelLayout::Alpha),
            4 => Some(PixelLayout::Rgba),
            _ => None,
        }
    }
}

/// Read-only view over decoded pixels, shaped `(height, width, channels)`.
///
/// The buffer never owns its pixels; it borrows the caller's memory for the
/// duration of a scan.
#[derive(Copy, Clone, Debug)]
pub struct PixelBuffer<'a> {
    pixels: ArrayView3<'a, u8>,
    layout: PixelLayout,
}

impl<'a> PixelBuffer<'a> {
    /// Wrap interleaved RGBA8 bytes (4 bytes per pixel, row-major).
    pub fn from_rgba(data: &'a [u8], width: usize, height: usize) -> Result<Self> {
        Self::from_raw(data, width, height, PixelLayout::Rgba)
    }

    /// Wrap a plain alpha plane (1 byte per pixel, row-major).
    pub fn from_alpha(data: &'a [u8], width: usize, height: usize) -> Result<Self> {
        Self::from_raw(data, width, height, PixelLayout::Alpha)
    }

    /// Wrap an existing ndarray view. The last axis must have 1 (alpha) or 4 (RGBA) lanes.
    pub fn from_view(pixels: ArrayView3<'a, u8>) -> Result<Self> {
        let channels = pixels.dim().2;
        let layout = PixelLayout::from_channels(channels).ok_or_else(|| {
            Error::invalid_input(format!(
                "pixel view must have 1 or 4 channels, got {}",
                channels
            ))
        })?;
        Ok(Self { pixels, layout })
    }

    fn from_raw(data: &'a [u8], width: usize, height: usize, layout: PixelLayout) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(layout.channels()))
            .ok_or_else(|| {
                Error::invalid_input(format!("buffer dimensions overflow: {}x{}", width, height))
            })?;
        if data.len() != expected {
            return Err(Error::invalid_input(format!(
                "buffer holds {} bytes, {}x{} {:?} needs {}",
                data.len(),
                width,
                height,
                layout,
                expected
            )));
        }
        let pixels = ArrayView3::from_shape((height, width, layout.channels()), data)
            .map_err(|e| Error::invalid_input(e.to_string()))?;
        Ok(Self { pixels, layout })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// True when the buffer has zero area.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn pixels(&self) -> &ArrayView3<'a, u8> {
        &self.pixels
    }
}

/// Decides whether a pixel is background. Values equal to the threshold are background.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ClassificationRule {
    /// `alpha <= threshold` is background.
    Alpha { threshold: u8 },
    /// Rec.601 luma `<= threshold` is background; fully transparent pixels always are.
    Luminance { threshold: u8 },
}

impl Default for ClassificationRule {
    fn default() -> Self {
        ClassificationRule::Alpha { threshold: 0 }
    }
}

impl ClassificationRule {
    pub fn new(mode: ClassificationMode, threshold: u8) -> Self {
        match mode {
            ClassificationMode::Alpha => ClassificationRule::Alpha { threshold },
            ClassificationMode::Luminance => ClassificationRule::Luminance { threshold },
        }
    }

    pub fn mode(&self) -> ClassificationMode {
        match self {
            ClassificationRule::Alpha { .. } => ClassificationMode::Alpha,
            ClassificationRule::Luminance { .. } => ClassificationMode::Luminance,
        }
    }

    pub fn threshold(&self) -> u8 {
        match *self {
            ClassificationRule::Alpha { threshold }
            | ClassificationRule::Luminance { threshold } => threshold,
        }
    }

    /// Reject rule/layout pairs that cannot be evaluated.
    pub fn check_layout(&self, layout: PixelLayout) -> Result<()> {
        match (self, layout) {
            (ClassificationRule::Luminance { .. }, PixelLayout::Alpha) => Err(
                Error::invalid_input("luminance classification needs an RGBA buffer"),
            ),
            _ => Ok(()),
        }
    }

    /// Classify one pixel given its channel lane. The layout must already be checked.
    #[inline]
    pub fn is_background(&self, lane: ArrayView1<'_, u8>, layout: PixelLayout) -> bool {
        let alpha = lane[layout.alpha_channel()];
        match *self {
            ClassificationRule::Alpha { threshold } => alpha <= threshold,
            ClassificationRule::Luminance { threshold } => {
                alpha == 0 || luma(lane[0], lane[1], lane[2]) <= threshold
            }
        }
    }
}

/// Integer Rec.601 luma, 8.8 fixed point.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    const COEF_R: u32 = 77;
    const COEF_G: u32 = 150;
    const COEF_B: u32 = 29;
    ((COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8) as u8
}

/// A buffer paired with the rule used to classify its pixels.
#[derive(Copy, Clone, Debug)]
pub struct PixelSampler<'a> {
    buffer: PixelBuffer<'a>,
    rule: ClassificationRule,
}

impl<'a> PixelSampler<'a> {
    pub fn new(buffer: PixelBuffer<'a>, rule: ClassificationRule) -> Result<Self> {
        rule.check_layout(buffer.layout())?;
        Ok(Self { buffer, rule })
    }

    pub fn buffer(&self) -> &PixelBuffer<'a> {
        &self.buffer
    }

    pub fn rule(&self) -> ClassificationRule {
        self.rule
    }

    /// Classify the pixel at `(x, y)`. Coordinates outside the buffer are an error.
    pub fn is_foreground(&self, x: usize, y: usize) -> Result<bool> {
        if x >= self.buffer.width() || y >= self.buffer.height() {
            return Err(self.out_of_range(x, y));
        }
        let lane = self.buffer.pixels.slice(s![y, x, ..]);
        Ok(self.is_foreground_lane(lane))
    }

    #[inline]
    pub fn is_foreground_lane(&self, lane: ArrayView1<'_, u8>) -> bool {
        !self.rule.is_background(lane, self.buffer.layout)
    }

    /// Sub-view covering `cell`, after a single bounds check for the whole rectangle.
    pub fn region(&self, cell: &CellRect) -> Result<ArrayView3<'a, u8>> {
        let right = cell.x.checked_add(cell.width);
        let bottom = cell.y.checked_add(cell.height);
        match (right, bottom) {
            (Some(r), Some(b)) if r <= self.buffer.width() && b <= self.buffer.height() => Ok(self
                .buffer
                .pixels
                .slice_move(s![cell.y..b, cell.x..r, ..])),
            _ => Err(self.out_of_range(
                cell.x.saturating_add(cell.width.saturating_sub(1)),
                cell.y.saturating_add(cell.height.saturating_sub(1)),
            )),
        }
    }

    fn out_of_range(&self, x: usize, y: usize) -> Error {
        Error::OutOfRange {
            x,
            y,
            width: self.buffer.width(),
            height: self.buffer.height(),
        }
    }
}
