#![doc = r#"
spritetrim — per-cell trim rectangles for sprite sheets.

A sprite sheet is an image split into a grid of fixed-size cells. For each cell this
crate finds the minimal rectangle enclosing its non-background pixels, so packers and
renderers can skip transparent padding. It powers the `spritetrim` CLI and can be
embedded in your own asset pipeline.

The scanning engine (`core`) is pure: it borrows an already-decoded pixel buffer and
returns geometry. Decoding, report writing, and the directory survey live in `io` and
`api`.

Quick start: trim an in-memory buffer
-------------------------------------
```rust
use spritetrim::{ClassificationRule, GridSpec, PixelBuffer, TrimRect, TrimResult, scan_sheet};

fn main() -> spritetrim::Result<()> {
    // 16x16 RGBA sheet, fully transparent except one opaque pixel at (9, 2)
    let mut rgba = vec![0u8; 16 * 16 * 4];
    let idx = (2 * 16 + 9) * 4;
    rgba[idx..idx + 4].copy_from_slice(&[255, 255, 255, 255]);

    let buffer = PixelBuffer::from_rgba(&rgba, 16, 16)?;
    let result = scan_sheet(&buffer, &GridSpec::new(8, 8), ClassificationRule::default())?;

    assert_eq!(result.len(), 4);
    assert_eq!(
        result.cells[1].trim,
        TrimResult::Trimmed(TrimRect { x: 1, y: 2, width: 1, height: 1 })
    );
    assert!(result.cells[0].trim.is_empty());
    Ok(())
}
```

Trim a PNG to a report file
---------------------------
```rust,no_run
use std::path::Path;
use spritetrim::{trim_sheet_to_path, GridSpec, OutputFormat, ScanParams};

fn main() -> spritetrim::Result<()> {
    let mut params = ScanParams::new(GridSpec::new(32, 32).with_spacing(2).with_margin(1));
    params.format = OutputFormat::Text;
    trim_sheet_to_path(Path::new("hero.png"), Path::new("hero.txt"), &params)
}
```

Batch helpers
-------------
```rust,no_run
use std::path::Path;
use spritetrim::{process_directory_to_path, GridSpec, ScanParams};

fn main() -> spritetrim::Result<()> {
    let params = ScanParams::new(GridSpec::new(64, 64));
    let report = process_directory_to_path(
        Path::new("/assets/sheets"),
        Path::new("/out"),
        &params,
        true, // continue_on_error
    )?;
    println!("processed={} skipped={} errors={}", report.processed, report.skipped, report.errors);
    Ok(())
}
```

Error handling
--------------
All public functions return `spritetrim::Result<T>`. `Error::InvalidInput` covers
zero-area buffers and invalid grids; `Error::OutOfRange` signals a coordinate outside
the buffer and is never silently clamped.

Useful modules
--------------
- [`api`] — file and directory entry points.
- [`core`] — the scanning engine (`sampler`, `grid`, `bounds`, `sheet`) and `ScanParams`.
- [`io`] — sheet decoding, report writers, and the PNG area survey.
- [`types`] — CLI/config enums.
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Engine
pub use crate::core::bounds::{TrimRect, TrimResult, scan_cell_bounds};
pub use crate::core::grid::{CellIter, CellRect, GridDims, GridLayout, GridSpec, iterate_cells};
pub use crate::core::params::ScanParams;
pub use crate::core::sampler::{ClassificationRule, PixelBuffer, PixelLayout, PixelSampler};
pub use crate::core::sheet::{CellTrim, ScanResult, scan_sheet, scan_sheet_with};
pub use error::{Error, Result};
pub use types::{ClassificationMode, Execution, OutputFormat};

// I/O
pub use io::loader::{DecodedSheet, load_sheet};
pub use io::survey::{SurveyEntry, SurveyReport, survey_directories, survey_directory};
pub use io::writers::report::{ScanSummary, SheetReport};

// High-level API re-exports
pub use api::{
    BatchReport, iterate_sheet_images, process_directory_to_path, trim_sheet_file,
    trim_sheet_to_path,
};
