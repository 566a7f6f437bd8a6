//! Path-based file type detection.

use std::path::Path;

use crate::converter::ConverterError;

use super::catalog;
use super::types::{ConversionCategory, FileType};

/// Detects file types from path extensions.
///
/// Detection never touches the file system; only the extension is inspected.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTypeDetector;

impl FileTypeDetector {
    pub fn new() -> Self {
        Self
    }

    /// Maps a path's extension to a [`FileType`].
    ///
    /// Returns [`FileType::Unknown`] for an empty path, a path without an
    /// extension, or an unmapped extension.
    pub fn detect_file_type(&self, path: impl AsRef<Path>) -> FileType {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return FileType::Unknown;
        }

        path.extension()
            .and_then(|ext| ext.to_str())
            .map(catalog::lookup_extension)
            .unwrap_or(FileType::Unknown)
    }

    /// Returns the category of a file type.
    ///
    /// `Unknown` has no category and yields [`ConverterError::NoCategory`].
    pub fn category(&self, file_type: FileType) -> Result<ConversionCategory, ConverterError> {
        file_type
            .category()
            .ok_or(ConverterError::NoCategory { format: file_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_is_case_insensitive() {
        let detector = FileTypeDetector::new();
        assert_eq!(detector.detect_file_type("IMAGE.JPG"), FileType::Jpeg);
        assert_eq!(detector.detect_file_type("image.jpg"), FileType::Jpeg);
        assert_eq!(detector.detect_file_type("clip.MkV"), FileType::Mkv);
    }

    #[test]
    fn test_detect_all_extensions() {
        let detector = FileTypeDetector::new();
        let cases = [
            ("a.jpeg", FileType::Jpeg),
            ("a.png", FileType::Png),
            ("a.bmp", FileType::Bmp),
            ("a.gif", FileType::Gif),
            ("a.webp", FileType::Webp),
            ("a.tif", FileType::Tiff),
            ("a.tiff", FileType::Tiff),
            ("a.mp3", FileType::Mp3),
            ("a.wav", FileType::Wav),
            ("a.flac", FileType::Flac),
            ("a.aac", FileType::Aac),
            ("a.ogg", FileType::Ogg),
            ("a.m4a", FileType::M4a),
            ("a.mp4", FileType::Mp4),
            ("a.avi", FileType::Avi),
            ("a.mov", FileType::Mov),
            ("a.webm", FileType::Webm),
            ("a.wmv", FileType::Wmv),
            ("a.flv", FileType::Flv),
        ];
        for (path, expected) in cases {
            assert_eq!(detector.detect_file_type(path), expected, "{}", path);
        }
    }

    #[test]
    fn test_detect_unknown() {
        let detector = FileTypeDetector::new();
        assert_eq!(detector.detect_file_type(""), FileType::Unknown);
        assert_eq!(detector.detect_file_type("README"), FileType::Unknown);
        assert_eq!(detector.detect_file_type("notes.txt"), FileType::Unknown);
        assert_eq!(detector.detect_file_type("archive.tar.gz"), FileType::Unknown);
        assert_eq!(detector.detect_file_type(".png"), FileType::Unknown);
    }

    #[test]
    fn test_detect_uses_last_extension() {
        let detector = FileTypeDetector::new();
        assert_eq!(detector.detect_file_type("song.backup.flac"), FileType::Flac);
        assert_eq!(
            detector.detect_file_type("/tmp/dir.with.dots/photo.PNG"),
            FileType::Png
        );
    }

    #[test]
    fn test_category_for_known_types() {
        let detector = FileTypeDetector::new();
        assert_eq!(
            detector.category(FileType::Gif).unwrap(),
            ConversionCategory::Image
        );
        assert_eq!(
            detector.category(FileType::Ogg).unwrap(),
            ConversionCategory::Audio
        );
        assert_eq!(
            detector.category(FileType::Flv).unwrap(),
            ConversionCategory::Video
        );
    }

    #[test]
    fn test_category_for_unknown_fails() {
        let detector = FileTypeDetector::new();
        let err = detector.category(FileType::Unknown).unwrap_err();
        assert!(matches!(
            err,
            ConverterError::NoCategory {
                format: FileType::Unknown
            }
        ));
    }
}
