//! I/O layer around the scanning engine: decoding sheets with the `image`
//! crate, the directory pixel-area `survey`, and `writers` for JSON/text
//! trim reports.
pub mod loader;
pub use loader::{DecodedSheet, load_sheet};

pub mod survey;
pub use survey::{SurveyEntry, SurveyReport, survey_directory};

pub mod writers;
