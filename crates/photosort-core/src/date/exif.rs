use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use exif::{Reader, Value};

/// EXIF DateTimeOriginal.
pub const TAG_DATE_TIME_ORIGINAL: u16 = 36867;
/// EXIF DateTimeDigitized.
pub const TAG_DATE_TIME_DIGITIZED: u16 = 36868;

/// Raw text-valued tags of one image, keyed by tag id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureMetadata {
    tags: BTreeMap<u16, Vec<u8>>,
}

impl CaptureMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` for `tag`. An earlier usable value for the same tag is kept.
    pub fn insert(&mut self, tag: u16, value: Vec<u8>) {
        let slot = self.tags.entry(tag).or_default();
        if decode_text(slot).is_none() {
            *slot = value;
        }
    }

    pub fn get(&self, tag: u16) -> Option<&[u8]> {
        self.tags.get(&tag).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl FromIterator<(u16, Vec<u8>)> for CaptureMetadata {
    fn from_iter<I: IntoIterator<Item = (u16, Vec<u8>)>>(iter: I) -> Self {
        let mut metadata = Self::new();
        for (tag, value) in iter {
            metadata.insert(tag, value);
        }
        metadata
    }
}

/// Read the ASCII-valued EXIF fields of an image file.
/// Returns None when the container carries no readable EXIF block.
pub fn read_capture_metadata(path: &Path) -> Option<CaptureMetadata> {
    let file = File::open(path).ok()?;
    let exif = Reader::new()
        .read_from_container(&mut BufReader::new(file))
        .ok()?;

    let metadata = exif
        .fields()
        .filter_map(|field| match &field.value {
            Value::Ascii(parts) => Some((field.tag.number(), parts.first()?.clone())),
            _ => None,
        })
        .collect();
    Some(metadata)
}

/// Capture timestamp as stored in the tags, DateTimeOriginal first, then
/// DateTimeDigitized. Values are NUL-trimmed; empty values don't count.
pub fn find_date_taken(metadata: &CaptureMetadata) -> Option<String> {
    [TAG_DATE_TIME_ORIGINAL, TAG_DATE_TIME_DIGITIZED]
        .iter()
        .find_map(|&tag| metadata.get(tag).and_then(decode_text))
}

fn decode_text(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim_end_matches('\0');
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
