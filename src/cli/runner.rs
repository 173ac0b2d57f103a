use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use spritetrim::api::{process_directory_to_path, survey_directories, trim_sheet_file};
use spritetrim::io::writers::write_report;
use spritetrim::{ClassificationRule, GridSpec, ScanParams};

use super::args::CliArgs;
use super::errors::AppError;

/// Merge `--config` (if any) with the grid and rule flags.
fn build_params(args: &CliArgs) -> Result<ScanParams, AppError> {
    let mut params = match &args.config {
        Some(path) => {
            let mut params = ScanParams::from_json_file(path)?;
            if let Some(width) = args.cell_width {
                params.grid.cell_width = width;
                params.grid.cell_height = args.cell_height.unwrap_or(width);
            } else if let Some(height) = args.cell_height {
                params.grid.cell_height = height;
            }
            params
        }
        None => {
            let width = args.cell_width.ok_or(AppError::MissingArgument {
                arg: "--cell-width".to_string(),
            })?;
            ScanParams::new(GridSpec::new(width, args.cell_height.unwrap_or(width)))
        }
    };

    if let Some(spacing) = args.spacing {
        params.grid.spacing = spacing;
    }
    if let Some(margin) = args.margin {
        params.grid.margin = margin;
    }
    if args.mode.is_some() || args.threshold.is_some() {
        params.rule = ClassificationRule::new(
            args.mode.unwrap_or(params.rule.mode()),
            args.threshold.unwrap_or(params.rule.threshold()),
        );
    }
    if let Some(execution) = args.execution {
        params.execution = execution;
    }
    if let Some(format) = args.format {
        params.format = format;
    }

    params.grid.validate()?;
    Ok(params)
}

fn run_single(args: &CliArgs, input: &Path, params: &ScanParams) -> Result<(), AppError> {
    let report = trim_sheet_file(input, params)?;
    match &args.output {
        Some(output) => {
            write_report(&report, output, params.format)?;
            info!("Successfully processed: {:?} -> {:?}", input, output);
        }
        None => println!("{}", report.render(params.format)?),
    }
    Ok(())
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    if !args.survey.is_empty() {
        if args.input.is_some() || args.input_dir.is_some() {
            return Err(AppError::ConflictingArguments {
                first: "--survey",
                second: "--input/--input-dir",
            }
            .into());
        }
        for report in survey_directories(&args.survey)? {
            print!("{}", report.render_text());
        }
        return Ok(());
    }

    let params = build_params(&args)?;
    let batch_mode = args.batch || args.input_dir.is_some();

    if batch_mode {
        let input_dir = args.input_dir.as_deref().ok_or(AppError::MissingArgument {
            arg: "--input-dir".to_string(),
        })?;
        let output_dir = args.output_dir.as_deref().ok_or(AppError::MissingArgument {
            arg: "--output-dir".to_string(),
        })?;

        info!("Starting batch processing from directory: {:?}", input_dir);
        info!("Output directory: {:?}", output_dir);

        let report = process_directory_to_path(input_dir, output_dir, &params, args.batch)?;
        info!("Processed: {}", report.processed);
        info!("Skipped: {}", report.skipped);
        info!("Errors: {}", report.errors);
    } else {
        let input = args.input.as_deref().ok_or(AppError::MissingArgument {
            arg: "--input".to_string(),
        })?;
        run_single(&args, input, &params)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;
    use spritetrim::{ClassificationMode, Execution, OutputFormat};

    fn parse(argv: &[&str]) -> CliArgs {
        CliArgs::parse_from(std::iter::once("spritetrim").chain(argv.iter().copied()))
    }

    #[test]
    fn test_flags_build_params() {
        let args = parse(&[
            "-i", "sheet.png", "--cell-width", "16", "--spacing", "2", "--mode", "luminance",
            "--threshold", "40", "--execution", "parallel", "-f", "text",
        ]);
        let params = build_params(&args).unwrap();
        assert_eq!(params.grid, GridSpec::new(16, 16).with_spacing(2));
        assert_eq!(params.rule.mode(), ClassificationMode::Luminance);
        assert_eq!(params.rule.threshold(), 40);
        assert_eq!(params.execution, Execution::Parallel);
        assert_eq!(params.format, OutputFormat::Text);
    }

    #[test]
    fn test_cell_width_is_required_without_config() {
        let args = parse(&["-i", "sheet.png"]);
        assert!(matches!(
            build_params(&args),
            Err(AppError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_zero_cell_is_rejected() {
        let args = parse(&["-i", "sheet.png", "--cell-width", "0"]);
        assert!(matches!(build_params(&args), Err(AppError::Trim(_))));
    }

    #[test]
    fn test_survey_takes_several_paths() {
        let args = parse(&["--survey", "assets/ui", "assets/chars", "notes.txt"]);
        assert_eq!(
            args.survey,
            vec![
                PathBuf::from("assets/ui"),
                PathBuf::from("assets/chars"),
                PathBuf::from("notes.txt"),
            ]
        );
        assert!(parse(&["-i", "sheet.png"]).survey.is_empty());
    }

    #[test]
    fn test_survey_conflicts_with_input() {
        let args = parse(&["--survey", "assets", "-i", "sheet.png"]);
        let err = run(args).unwrap_err();
        assert!(err.to_string().contains("--survey"));
    }

    #[test]
    fn test_config_file_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(
            &path,
            r#"{ "grid": { "cell_width": 32, "cell_height": 16, "margin": 3 },
                 "rule": { "mode": "alpha", "threshold": 5 } }"#,
        )
        .unwrap();

        let config = path.to_str().unwrap();
        let args = parse(&["-i", "sheet.png", "--config", config, "--threshold", "9"]);
        let params = build_params(&args).unwrap();
        assert_eq!(params.grid, GridSpec::new(32, 16).with_margin(3));
        assert_eq!(params.rule, ClassificationRule::Alpha { threshold: 9 });
    }
}
