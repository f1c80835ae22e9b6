use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a run before any file is copied.
#[derive(Error, Debug)]
pub enum SortError {
    #[error("{} is a file, not a directory.", .0.display())]
    SourceIsFile(PathBuf),

    #[error("{} returned no results.", .0.display())]
    SourceNotFound(PathBuf),

    #[error("{0}")]
    Enumerate(#[from] walkdir::Error),

    #[error("Could not write report {}: {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors confined to a single file. The batch counts them and moves on.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("{0}")]
    Decode(#[from] image::ImageError),

    #[error("Could not create directory {}: {source}", dir.display())]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not find valid name for duplicate file.")]
    NoAvailableName,

    #[error("{0}")]
    Io(#[from] io::Error),
}
