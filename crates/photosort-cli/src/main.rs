mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use photosort_core::{ProgressEvent, SortError, SortOptions};

#[derive(Parser)]
#[command(name = "photosort", version, about = "Copy photos into folders named by the date they were taken")]
struct Cli {
    /// Directory to scan for photos
    source: String,

    /// Directory that receives one YEAR_MONTH_DAY folder per date
    destination: String,

    /// Write a JSON report of every copied or failed file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_logger();

    let options = SortOptions::from_args(&cli.source, &cli.destination).with_report(cli.report);
    let source = options.source.display().to_string();

    let result = photosort_core::run(&options, &|event| match event {
        ProgressEvent::Started { total } => println!("Copying {} files from {}", total, source),
        ProgressEvent::Percent(p) => println!("{}%", p),
        ProgressEvent::Failed { path, error } => {
            println!("{}\nCould not copy file. {}", path.display(), error)
        }
    });

    let summary = match result {
        Ok(summary) => summary,
        Err(e @ (SortError::SourceIsFile(_) | SortError::SourceNotFound(_) | SortError::Enumerate(_))) => {
            println!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    if summary.errors() > 0 {
        println!("{} errors copying from {}", summary.errors(), source);
    }
    if summary.total() == 0 {
        println!("No files found in {}", source);
    }

    Ok(ExitCode::SUCCESS)
}
