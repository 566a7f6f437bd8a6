//! Static format tables: extensions, defaults and per-category format lists.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::types::{ConversionCategory, FileType};

const IMAGE_FORMATS: [FileType; 6] = [
    FileType::Jpeg,
    FileType::Png,
    FileType::Bmp,
    FileType::Gif,
    FileType::Webp,
    FileType::Tiff,
];

const AUDIO_FORMATS: [FileType; 6] = [
    FileType::Mp3,
    FileType::Wav,
    FileType::Flac,
    FileType::Aac,
    FileType::Ogg,
    FileType::M4a,
];

const VIDEO_FORMATS: [FileType; 7] = [
    FileType::Mp4,
    FileType::Avi,
    FileType::Mov,
    FileType::Mkv,
    FileType::Webm,
    FileType::Wmv,
    FileType::Flv,
];

/// Lowercase extension -> file type. Keys carry no leading dot.
static EXTENSIONS: Lazy<HashMap<&'static str, FileType>> = Lazy::new(|| {
    HashMap::from([
        ("jpg", FileType::Jpeg),
        ("jpeg", FileType::Jpeg),
        ("png", FileType::Png),
        ("bmp", FileType::Bmp),
        ("gif", FileType::Gif),
        ("webp", FileType::Webp),
        ("tiff", FileType::Tiff),
        ("tif", FileType::Tiff),
        ("mp3", FileType::Mp3),
        ("wav", FileType::Wav),
        ("flac", FileType::Flac),
        ("aac", FileType::Aac),
        ("ogg", FileType::Ogg),
        ("m4a", FileType::M4a),
        ("mp4", FileType::Mp4),
        ("avi", FileType::Avi),
        ("mov", FileType::Mov),
        ("mkv", FileType::Mkv),
        ("webm", FileType::Webm),
        ("wmv", FileType::Wmv),
        ("flv", FileType::Flv),
    ])
});

/// Looks up an extension, ignoring case and an optional leading dot.
pub fn lookup_extension(extension: &str) -> FileType {
    let ext = extension.strip_prefix('.').unwrap_or(extension);
    if ext.is_empty() {
        return FileType::Unknown;
    }
    EXTENSIONS
        .get(ext.to_ascii_lowercase().as_str())
        .copied()
        .unwrap_or(FileType::Unknown)
}

/// Default extension written for a format.
pub fn default_extension(file_type: FileType) -> Option<&'static str> {
    let ext = match file_type {
        FileType::Unknown => return None,
        FileType::Jpeg => "jpg",
        FileType::Png => "png",
        FileType::Bmp => "bmp",
        FileType::Gif => "gif",
        FileType::Webp => "webp",
        FileType::Tiff => "tiff",
        FileType::Mp3 => "mp3",
        FileType::Wav => "wav",
        FileType::Flac => "flac",
        FileType::Aac => "aac",
        FileType::Ogg => "ogg",
        FileType::M4a => "m4a",
        FileType::Mp4 => "mp4",
        FileType::Avi => "avi",
        FileType::Mov => "mov",
        FileType::Mkv => "mkv",
        FileType::Webm => "webm",
        FileType::Wmv => "wmv",
        FileType::Flv => "flv",
    };
    Some(ext)
}

/// Fixed, ordered format list for a category.
pub fn supported_formats(category: ConversionCategory) -> &'static [FileType] {
    match category {
        ConversionCategory::Image => &IMAGE_FORMATS,
        ConversionCategory::Audio => &AUDIO_FORMATS,
        ConversionCategory::Video => &VIDEO_FORMATS,
    }
}

/// Whether the format appears in any category list.
pub fn is_supported(format: FileType) -> bool {
    format.is_known()
        && ConversionCategory::ALL
            .iter()
            .any(|c| supported_formats(*c).contains(&format))
}
