pub mod date;
pub mod error;
pub mod media;
pub mod report;
pub mod scan;
pub mod writer;

use std::path::{Path, PathBuf};

use image::ImageReader;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use error::{FileError, SortError};
pub use media::{CandidateFile, CopyResult};

/// What to sort and where to put it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortOptions {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Optional JSON report of every file handled.
    #[serde(default)]
    pub report: Option<PathBuf>,
}

impl SortOptions {
    /// Build options from raw command-line strings, normalizing both paths.
    pub fn from_args(source: &str, destination: &str) -> Self {
        Self {
            source: normalize_source(source),
            destination: normalize_destination(destination),
            report: None,
        }
    }

    pub fn with_report(mut self, report: Option<PathBuf>) -> Self {
        self.report = report;
        self
    }
}

fn trim_path_arg(raw: &str) -> &str {
    raw.trim_matches('"').trim_end_matches(['/', '\\'])
}

/// Strip surrounding quotes and trailing separators.
pub fn normalize_source(raw: &str) -> PathBuf {
    let trimmed = trim_path_arg(raw);
    if trimmed.is_empty() {
        // Only separators: keep the root.
        PathBuf::from(raw.trim_matches('"'))
    } else {
        PathBuf::from(trimmed)
    }
}

/// Strip surrounding quotes and end the path with exactly one separator.
pub fn normalize_destination(raw: &str) -> PathBuf {
    PathBuf::from(format!("{}/", trim_path_arg(raw)))
}

/// Anchor a relative source at the working directory so every candidate path is absolute.
fn absolute_source(source: &Path) -> PathBuf {
    std::path::absolute(source).unwrap_or_else(|_| source.to_path_buf())
}

/// Events reported while a batch runs.
#[derive(Debug)]
pub enum ProgressEvent<'a> {
    /// Number of files about to be processed.
    Started { total: usize },
    /// A new whole percentage of files has been handled.
    Percent(u32),
    /// One file could not be copied; the batch continues.
    Failed { path: &'a Path, error: &'a FileError },
}

pub type ProgressCallback<'a> = dyn Fn(ProgressEvent<'_>) + Send + Sync + 'a;

/// Percentage reporter, emits each integer percentage at most once, starting with 0.
pub struct PercentProgress<'a> {
    inner: &'a ProgressCallback<'a>,
    total: usize,
    done: usize,
    last: u32,
}

impl<'a> PercentProgress<'a> {
    pub fn new(inner: &'a ProgressCallback<'a>, total: usize) -> Self {
        inner(ProgressEvent::Percent(0));
        Self {
            inner,
            total,
            done: 0,
            last: 0,
        }
    }

    pub fn advance(&mut self) {
        self.done += 1;
        let percent = (self.done * 100 / self.total.max(1)) as u32;
        if percent > self.last {
            self.last = percent;
            (self.inner)(ProgressEvent::Percent(percent));
        }
    }
}

/// Outcome of a whole run.
#[derive(Debug, Default)]
pub struct SortSummary {
    pub results: Vec<CopyResult>,
}

impl SortSummary {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn copied(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn errors(&self) -> usize {
        self.total() - self.copied()
    }
}

/// Validate the source, scan it and copy every image into dated folders.
pub fn run(options: &SortOptions, progress_callback: &ProgressCallback<'_>) -> Result<SortSummary, SortError> {
    scan::check_source(&options.source)?;
    let files = scan::scan_dir(&absolute_source(&options.source))?;

    progress_callback(ProgressEvent::Started { total: files.len() });
    let summary = SortSummary {
        results: process_files(&files, &options.destination, progress_callback),
    };

    if let Some(path) = &options.report {
        report::write_report(options, &summary, path)?;
    }
    Ok(summary)
}

/// Copy each file in turn. A failing file is reported and counted; the rest still run.
/// Returns one result per input file, in input order.
pub fn process_files(
    files: &[CandidateFile],
    dest_root: &Path,
    progress_callback: &ProgressCallback<'_>,
) -> Vec<CopyResult> {
    let mut progress = PercentProgress::new(progress_callback, files.len());
    let mut results = Vec::with_capacity(files.len());

    for file in files {
        let path = file.path();
        let outcome = process_file(path, dest_root);
        if let Err(e) = &outcome {
            warn!(file = %path.display(), error = %e, "could not copy file");
            progress_callback(ProgressEvent::Failed { path, error: e });
        }
        results.push(CopyResult {
            source: path.to_path_buf(),
            outcome,
        });
        progress.advance();
    }

    results
}

/// Decode check, date resolution, destination planning and copy for one file.
pub fn process_file(path: &Path, dest_root: &Path) -> Result<PathBuf, FileError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()?;

    let metadata = date::exif::read_capture_metadata(path);
    let date_key = date::resolve_date_key(path, metadata.as_ref());
    let dest = writer::plan_destination(dest_root, &date_key, path)?;
    writer::copy_file(path, &dest)?;

    debug!(file = %path.display(), dest = %dest.display(), "copied");
    Ok(dest)
}
