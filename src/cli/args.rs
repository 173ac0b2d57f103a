use clap::Parser;
use std::path::PathBuf;

use spritetrim::{ClassificationMode, Execution, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "spritetrim", version, about = "Sprite sheet trim rectangles")]
pub struct CliArgs {
    /// Input sprite sheet (single file mode)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Report file (single file mode); stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory of PNG sheets (batch mode)
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Output directory for batch reports (batch mode)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Report total PNG pixel area per subdirectory of each directory given;
    /// paths that are not directories are skipped
    #[arg(long, num_args = 1..)]
    pub survey: Vec<PathBuf>,

    /// JSON file with scan parameters; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Cell width in pixels
    #[arg(long)]
    pub cell_width: Option<usize>,

    /// Cell height in pixels (defaults to the cell width)
    #[arg(long)]
    pub cell_height: Option<usize>,

    /// Gap between adjacent cells in pixels
    #[arg(long)]
    pub spacing: Option<usize>,

    /// Border around the whole grid in pixels
    #[arg(long)]
    pub margin: Option<usize>,

    /// Background test (alpha or luminance)
    #[arg(long, value_enum)]
    pub mode: Option<ClassificationMode>,

    /// Values at or below this are background (0-255)
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Cell dispatch (sequential or parallel)
    #[arg(long, value_enum)]
    pub execution: Option<Execution>,

    /// Report format (json or text)
    #[arg(short = 'f', long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Batch mode: continue with other sheets when one fails
    #[arg(long, default_value_t = false)]
    pub batch: bool,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
