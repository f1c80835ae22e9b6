use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::SortError;
use crate::{SortOptions, SortSummary};

#[derive(Serialize)]
struct FileRecord {
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct RunReport {
    source: String,
    destination: String,
    total: usize,
    copied: usize,
    errors: usize,
    files: Vec<FileRecord>,
}

/// Write a JSON record of every file handled in a run.
pub fn write_report(options: &SortOptions, summary: &SortSummary, path: &Path) -> Result<(), SortError> {
    let files = summary
        .results
        .iter()
        .map(|r| FileRecord {
            source: r.source.to_string_lossy().into_owned(),
            destination: r.destination().map(|d| d.to_string_lossy().into_owned()),
            error: r.outcome.as_ref().err().map(ToString::to_string),
        })
        .collect();

    let report = RunReport {
        source: options.source.to_string_lossy().into_owned(),
        destination: options.destination.to_string_lossy().into_owned(),
        total: summary.total(),
        copied: summary.copied(),
        errors: summary.errors(),
        files,
    };

    save(&report, path).map_err(|source| SortError::Report {
        path: path.to_path_buf(),
        source,
    })
}

fn save(report: &RunReport, path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()
}
