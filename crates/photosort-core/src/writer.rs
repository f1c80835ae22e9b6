use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tracing::warn;

use crate::date::DateKey;
use crate::error::FileError;

/// Highest " (n)" suffix tried before a file is given up on.
pub const MAX_RENAME_ATTEMPTS: u32 = 1000;

/// Create `dest_root/date_key` and return a path inside it that no file occupies yet.
///
/// The first candidate is the source's own file name. Each retry derives a new
/// name from that original name, `photo.jpg` -> `photo (1).jpg` -> `photo (2).jpg`.
pub fn plan_destination(
    dest_root: &Path,
    date_key: &DateKey,
    source: &Path,
) -> Result<PathBuf, FileError> {
    let sub_dir = dest_root.join(date_key);
    fs::create_dir_all(&sub_dir).map_err(|source| FileError::CreateDir {
        dir: sub_dir.clone(),
        source,
    })?;

    let filename = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut dest = sub_dir.join(&filename);
    let mut retry = 0u32;
    while dest.exists() {
        retry += 1;
        if retry > MAX_RENAME_ATTEMPTS {
            return Err(FileError::NoAvailableName);
        }
        dest = sub_dir.join(numbered_name(&filename, retry));
    }
    Ok(dest)
}

/// Insert ` (n)` before the last '.' of `filename`, or append it when there is none.
fn numbered_name(filename: &str, n: u32) -> String {
    match filename.rfind('.') {
        Some(dot) => format!("{} ({}){}", &filename[..dot], n, &filename[dot..]),
        None => format!("{} ({})", filename, n),
    }
}

/// Copy `source` to `dest`, which must not exist yet.
/// The copy takes over the source's modification time.
pub fn copy_file(source: &Path, dest: &Path) -> Result<(), FileError> {
    let mut input = File::open(source)?;
    let out_file = OpenOptions::new().write(true).create_new(true).open(dest)?;

    if let Err(e) = stream_into(&mut input, out_file) {
        fs::remove_file(dest).ok();
        return Err(e.into());
    }

    match fs::metadata(source) {
        Ok(meta) => {
            let mtime = FileTime::from_last_modification_time(&meta);
            if let Err(e) = filetime::set_file_mtime(dest, mtime) {
                warn!(file = %dest.display(), error = %e, "could not set modification time");
            }
        }
        Err(e) => warn!(file = %source.display(), error = %e, "could not read modification time"),
    }
    Ok(())
}

fn stream_into(input: &mut File, out_file: File) -> io::Result<()> {
    let mut out_file = BufWriter::new(out_file);
    io::copy(input, &mut out_file)?;
    out_file.flush()
}
