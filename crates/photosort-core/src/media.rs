use std::path::{Path, PathBuf};

use crate::error::FileError;

/// Extensions accepted by discovery, matched case-insensitively against the file name.
pub const IMAGE_EXTENSIONS: &[&str] = &[".bmp", ".gif", ".exif", ".jpg", ".png", ".tiff"];

/// An image file found under the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    path: PathBuf,
}

impl CandidateFile {
    /// Wrap `path` if its name ends with one of [`IMAGE_EXTENSIONS`].
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let name = path.file_name()?.to_string_lossy().to_lowercase();
        if IMAGE_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
            Some(Self { path })
        } else {
            None
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Outcome of processing one candidate.
#[derive(Debug)]
pub struct CopyResult {
    pub source: PathBuf,
    pub outcome: Result<PathBuf, FileError>,
}

impl CopyResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Destination path, if the copy succeeded.
    pub fn destination(&self) -> Option<&Path> {
        self.outcome.as_ref().ok().map(PathBuf::as_path)
    }
}
