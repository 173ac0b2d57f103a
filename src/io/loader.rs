use std::path::{Path, PathBuf};

use ndarray::Array3;
use tracing::debug;

use crate::core::sampler::{PixelBuffer, PixelLayout};
use crate::error::{Error, Result};

/// A decoded sheet held as owned RGBA8 pixels, shaped `(height, width, 4)`.
#[derive(Debug, Clone)]
pub struct DecodedSheet {
    pub path: Option<PathBuf>,
    pixels: Array3<u8>,
}

impl DecodedSheet {
    pub fn from_rgba_image(image: image::RgbaImage) -> Result<Self> {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let channels = PixelLayout::Rgba.channels();
        let pixels = Array3::from_shape_vec((height, width, channels), image.into_raw())
            .map_err(|e| Error::invalid_input(e.to_string()))?;
        Ok(Self { path: None, pixels })
    }

    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }

    /// Borrowed view for the scanning engine.
    pub fn view(&self) -> Result<PixelBuffer<'_>> {
        PixelBuffer::from_view(self.pixels.view())
    }
}

/// Decode an image file to RGBA8.
pub fn load_sheet(path: &Path) -> Result<DecodedSheet> {
    let rgba = image::open(path)?.to_rgba8();
    let mut sheet = DecodedSheet::from_rgba_image(rgba)?;
    sheet.path = Some(path.to_path_buf());
    debug!(
        "Decoded {:?}: {}x{} RGBA",
        path,
        sheet.width(),
        sheet.height()
    );
    Ok(sheet)
}

/// Image dimensions from the file header, without decoding pixels.
pub fn image_dimensions(path: &Path) -> Result<(u32, u32)> {
    Ok(image::image_dimensions(path)?)
}

/// True for paths with a `.png` extension, any case.
pub fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}
