pub mod exif;

use std::fmt;
use std::fs;
use std::path::{Component, Path};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Datelike, Local};
use tracing::{debug, warn};

use self::exif::{find_date_taken, CaptureMetadata};

/// Name of the per-day destination folder, `YEAR_MONTH_DAY`. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(String);

impl DateKey {
    /// Key from an EXIF timestamp such as `2023:07:04 10:15:00`.
    /// The digits are kept as written, so this is `2023_07_04`.
    pub fn from_exif_timestamp(value: &str) -> Option<Self> {
        let date = value.split(' ').next().unwrap_or_default();
        if date.is_empty() || date == "0" {
            return None;
        }
        let key = date.replace(':', "_");
        // The key names one folder directly under the destination root.
        let mut components = Path::new(&key).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) if !key.contains(['/', '\\']) => Some(Self(key)),
            _ => None,
        }
    }

    /// Key from a local calendar date, without zero-padding (`2022_4_3`).
    pub fn from_date<D: Datelike>(date: &D) -> Self {
        Self(format!("{}_{}_{}", date.year(), date.month(), date.day()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for DateKey {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

/// Pick the folder key for `path`: the embedded capture date when one is
/// present, otherwise the file's last-write time in local time.
pub fn resolve_date_key(path: &Path, metadata: Option<&CaptureMetadata>) -> DateKey {
    if let Some(key) = metadata
        .and_then(find_date_taken)
        .and_then(|taken| DateKey::from_exif_timestamp(&taken))
    {
        debug!(file = %path.display(), key = %key, "date from EXIF");
        return key;
    }

    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or_else(|e| {
            warn!(file = %path.display(), error = %e, "no modification time, using epoch");
            UNIX_EPOCH
        });
    let key = key_from_system_time(modified);
    debug!(file = %path.display(), key = %key, "date from modification time");
    key
}

fn key_from_system_time(time: SystemTime) -> DateKey {
    DateKey::from_date(&DateTime::<Local>::from(time))
}

#[cfg(test)]
mod tests {
    use super::exif::{TAG_DATE_TIME_DIGITIZED, TAG_DATE_TIME_ORIGINAL};
    use super::*;
    use chrono::TimeZone;
    use filetime::FileTime;

    fn file_with_mtime(dir: &Path, name: &str, y: i32, m: u32, d: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"x").unwrap();
        let local = Local.with_ymd_and_hms(y, m, d, 12, 0, 0).single().unwrap();
        filetime::set_file_mtime(&path, FileTime::from_unix_time(local.timestamp(), 0)).unwrap();
        path
    }

    #[test]
    fn test_exif_key_keeps_padding() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_with_mtime(dir.path(), "a.jpg", 2022, 4, 3);
        let metadata: CaptureMetadata = [(TAG_DATE_TIME_ORIGINAL, b"2023:07:04 10:15:00\0".to_vec())]
            .into_iter()
            .collect();
        assert_eq!(resolve_date_key(&path, Some(&metadata)).as_str(), "2023_07_04");
    }

    #[test]
    fn test_digitized_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_with_mtime(dir.path(), "a.jpg", 2022, 4, 3);
        let metadata: CaptureMetadata = [(TAG_DATE_TIME_DIGITIZED, b"2011:12:13 01:02:03".to_vec())]
            .into_iter()
            .collect();
        assert_eq!(resolve_date_key(&path, Some(&metadata)).as_str(), "2011_12_13");
    }

    #[test]
    fn test_mtime_fallback_unpadded() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_with_mtime(dir.path(), "b.png", 2022, 4, 3);
        assert_eq!(resolve_date_key(&path, None).as_str(), "2022_4_3");
        assert_eq!(
            resolve_date_key(&path, Some(&CaptureMetadata::new())).as_str(),
            "2022_4_3"
        );
    }

    #[test]
    fn test_unusable_timestamp_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_with_mtime(dir.path(), "c.jpg", 2021, 11, 30);
        for value in [&b"0"[..], b" 10:15:00", b"\0"] {
            let metadata: CaptureMetadata = [(TAG_DATE_TIME_ORIGINAL, value.to_vec())]
                .into_iter()
                .collect();
            assert_eq!(resolve_date_key(&path, Some(&metadata)).as_str(), "2021_11_30");
        }
    }

    #[test]
    fn test_exif_key_stays_under_destination() {
        for value in ["/etc/x 00:00:00", "../.. 00:00:00", "..", ".", "2023/07/04 10:15:00", "2023\\07 10:15:00"] {
            assert!(DateKey::from_exif_timestamp(value).is_none(), "{value}");
        }

        let dir = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let path = file_with_mtime(dir.path(), "a.jpg", 2022, 4, 3);
        let value = format!("{} 10:15:00", elsewhere.path().display());
        let metadata: CaptureMetadata = [(TAG_DATE_TIME_ORIGINAL, value.into_bytes())]
            .into_iter()
            .collect();
        let key = resolve_date_key(&path, Some(&metadata));
        assert_eq!(key.as_str(), "2022_4_3");
        assert!(dir.path().join(&key).starts_with(dir.path()));
    }

    #[test]
    fn test_from_exif_timestamp() {
        assert_eq!(
            DateKey::from_exif_timestamp("2023:07:04 10:15:00").unwrap().as_str(),
            "2023_07_04"
        );
        assert_eq!(
            DateKey::from_exif_timestamp("2023:07:04").unwrap().as_str(),
            "2023_07_04"
        );
        assert!(DateKey::from_exif_timestamp("").is_none());
    }
}
