use std::path::Path;

use walkdir::WalkDir;

use crate::error::SortError;
use crate::media::CandidateFile;

/// Check that `source` is a directory that can be scanned.
pub fn check_source(source: &Path) -> Result<(), SortError> {
    if source.is_dir() {
        Ok(())
    } else if source.is_file() {
        Err(SortError::SourceIsFile(source.to_path_buf()))
    } else {
        Err(SortError::SourceNotFound(source.to_path_buf()))
    }
}

/// Recursively list the image files under `source`, sorted by name within
/// each directory. Any unreadable directory aborts the scan.
pub fn scan_dir(source: &Path) -> Result<Vec<CandidateFile>, SortError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        // Symlinked files count; symlinked directories are not descended into.
        if !entry.path().is_file() {
            continue;
        }
        if let Some(candidate) = CandidateFile::from_path(entry.into_path()) {
            files.push(candidate);
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_scan_filters_and_recurses() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("2019/trip")).unwrap();
        fs::write(root.join("a.JPG"), b"").unwrap();
        fs::write(root.join("notes.txt"), b"").unwrap();
        fs::write(root.join("2019/b.png"), b"").unwrap();
        fs::write(root.join("2019/trip/c.tiff"), b"").unwrap();
        fs::write(root.join("2019/trip/d.jpeg"), b"").unwrap();

        let files = scan_dir(root).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.path().strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                Path::new("2019/b.png").to_path_buf(),
                Path::new("2019/trip/c.tiff").to_path_buf(),
                Path::new("a.JPG").to_path_buf(),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_includes_symlinked_images() {
        let dir = tempdir().unwrap();
        let elsewhere = tempdir().unwrap();
        let target = elsewhere.path().join("real.jpg");
        fs::write(&target, b"").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("link.jpg")).unwrap();
        std::os::unix::fs::symlink(elsewhere.path(), dir.path().join("linked_dir")).unwrap();

        let files = scan_dir(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path(), dir.path().join("link.jpg"));
    }

    #[test]
    fn test_check_source() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("f.jpg");
        fs::write(&file, b"").unwrap();

        assert!(check_source(dir.path()).is_ok());
        assert!(matches!(check_source(&file), Err(SortError::SourceIsFile(_))));
        assert!(matches!(
            check_source(&dir.path().join("missing")),
            Err(SortError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            scan_dir(&dir.path().join("missing")),
            Err(SortError::Enumerate(_))
        ));
    }
}
