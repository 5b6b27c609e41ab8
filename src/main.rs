//! Vitalscan command line.
//!
//! Usage:
//!   vitalscan <input> [-o output.json] [-c config.json] [-v]
//!
//! `<input>` is an OCR text file or a directory of them. Reports are written as a
//! JSON array to `--output`, or to stdout when no output file is given.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use vitalscan_lib::config;
use vitalscan_lib::pipeline::{write_reports, BatchEntry, ProcessingError, VitalsProcessor};
use vitalscan_lib::pipeline_config::PipelineConfig;

#[derive(Parser, Debug)]
#[command(name = "vitalscan", version)]
#[command(about = "Extract vital signs from OCR text of medical reports and assess risk")]
struct Args {
    /// OCR text file or directory of text files
    input: PathBuf,

    /// Write the JSON reports here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pipeline config (JSON); missing fields take defaults
    #[arg(short, long, env = "VITALSCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    vitalscan_lib::init_tracing(args.verbose);

    tracing::info!("{} v{}", config::APP_NAME, config::APP_VERSION);

    match run(&args) {
        Ok(entries) if !entries.is_empty() && entries.iter().all(|e| !e.is_processed()) => {
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Processing aborted");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<Vec<BatchEntry>, ProcessingError> {
    let config = PipelineConfig::load_or_default(args.config.as_deref())?;
    let processor = VitalsProcessor::new(config);

    let entries = processor.process_input(&args.input)?;
    let processed = entries.iter().filter(|e| e.is_processed()).count();

    match &args.output {
        Some(path) => {
            write_reports(path, &entries)?;
            tracing::info!(output = %path.display(), "Reports written");
        }
        None => {
            let json = serde_json::to_string_pretty(&entries)?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")
                .map_err(|e| ProcessingError::Output(PathBuf::from("<stdout>"), e))?;
        }
    }

    tracing::info!("processed {}/{}", processed, entries.len());
    Ok(entries)
}
