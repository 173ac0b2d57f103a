pub mod report;
pub use report::{ScanSummary, SheetReport, render_text, write_report};
