use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;

use sweep_correlate::cli::{Cli, OutputFormat};
use sweep_correlate::config::AnalysisConfig;
use sweep_correlate::data::input::{load_input_file, parse_input_pairs};
use sweep_correlate::data::loader::load_files;
use sweep_correlate::export::write_matrix_csv;
use sweep_correlate::pipeline::AnalysisRun;
use sweep_correlate::report::{json_summary, text_summary};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = AnalysisConfig::load(cli.config.as_deref())?;
    let config = cli.apply_overrides(config);
    config.validate().context("invalid command-line overrides")?;

    let files = load_files(&cli.files);
    if files.is_empty() {
        bail!("None of the {} input files could be loaded", cli.files.len());
    }

    let run = AnalysisRun::new(&files, config);

    if let Some(path) = &cli.export_csv {
        write_matrix_csv(&run.matrix, path)?;
        info!("Wrote correlation matrix to {}", path.display());
    }

    let predictions = if cli.wants_prediction() {
        let input = match &cli.predict_from {
            Some(path) => load_input_file(path)?,
            None => parse_input_pairs(&cli.input)?,
        };
        Some(run.predict(&input))
    } else {
        None
    };

    match cli.format {
        OutputFormat::Text => print!("{}", text_summary(&run, predictions.as_ref())),
        OutputFormat::Json => println!("{}", json_summary(&run, predictions.as_ref())?),
    }

    Ok(())
}
