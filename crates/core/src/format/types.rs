//! File type and category definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::catalog;

/// A concrete file format understood by the converters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    /// Unrecognised or missing extension.
    Unknown,

    // Image formats
    Jpeg,
    Png,
    Bmp,
    Gif,
    Webp,
    Tiff,

    // Audio formats
    Mp3,
    Wav,
    Flac,
    Aac,
    Ogg,
    M4a,

    // Video formats
    Mp4,
    Avi,
    Mov,
    Mkv,
    Webm,
    Wmv,
    Flv,
}

impl FileType {
    /// Every variant, `Unknown` first.
    pub const ALL: [FileType; 20] = [
        Self::Unknown,
        Self::Jpeg,
        Self::Png,
        Self::Bmp,
        Self::Gif,
        Self::Webp,
        Self::Tiff,
        Self::Mp3,
        Self::Wav,
        Self::Flac,
        Self::Aac,
        Self::Ogg,
        Self::M4a,
        Self::Mp4,
        Self::Avi,
        Self::Mov,
        Self::Mkv,
        Self::Webm,
        Self::Wmv,
        Self::Flv,
    ];

    /// Returns the variant name, e.g. `"Jpeg"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Jpeg => "Jpeg",
            Self::Png => "Png",
            Self::Bmp => "Bmp",
            Self::Gif => "Gif",
            Self::Webp => "Webp",
            Self::Tiff => "Tiff",
            Self::Mp3 => "Mp3",
            Self::Wav => "Wav",
            Self::Flac => "Flac",
            Self::Aac => "Aac",
            Self::Ogg => "Ogg",
            Self::M4a => "M4a",
            Self::Mp4 => "Mp4",
            Self::Avi => "Avi",
            Self::Mov => "Mov",
            Self::Mkv => "Mkv",
            Self::Webm => "Webm",
            Self::Wmv => "Wmv",
            Self::Flv => "Flv",
        }
    }

    /// Returns the category this format belongs to, `None` for `Unknown`.
    pub fn category(self) -> Option<ConversionCategory> {
        match self {
            Self::Unknown => None,
            Self::Jpeg | Self::Png | Self::Bmp | Self::Gif | Self::Webp | Self::Tiff => {
                Some(ConversionCategory::Image)
            }
            Self::Mp3 | Self::Wav | Self::Flac | Self::Aac | Self::Ogg | Self::M4a => {
                Some(ConversionCategory::Audio)
            }
            Self::Mp4
            | Self::Avi
            | Self::Mov
            | Self::Mkv
            | Self::Webm
            | Self::Wmv
            | Self::Flv => Some(ConversionCategory::Video),
        }
    }

    /// Returns the default file extension (without the dot).
    pub fn extension(self) -> Option<&'static str> {
        catalog::default_extension(self)
    }

    /// Whether this is a real format rather than `Unknown`.
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no known format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown file format: {0}")]
pub struct ParseFileTypeError(pub String);

impl FromStr for FileType {
    type Err = ParseFileTypeError;

    /// Accepts a variant name (`"png"`, `"Png"`) or an extension (`"jpg"`, `".TIF"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(found) = Self::ALL
            .iter()
            .copied()
            .filter(|t| t.is_known())
            .find(|t| t.name().eq_ignore_ascii_case(trimmed))
        {
            return Ok(found);
        }

        match catalog::lookup_extension(trimmed) {
            FileType::Unknown => Err(ParseFileTypeError(s.to_string())),
            found => Ok(found),
        }
    }
}

/// Media category. Partitions every known [`FileType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionCategory {
    Image,
    Audio,
    Video,
}

impl ConversionCategory {
    pub const ALL: [ConversionCategory; 3] = [Self::Image, Self::Audio, Self::Video];

    /// Returns the fixed, ordered list of formats in this category.
    pub fn supported_formats(self) -> &'static [FileType] {
        catalog::supported_formats(self)
    }

    /// Whether `format` is a member of this category.
    pub fn contains(self, format: FileType) -> bool {
        format.category() == Some(self)
    }

    /// Lowercase noun used in result messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for ConversionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => f.write_str("Image"),
            Self::Audio => f.write_str("Audio"),
            Self::Video => f.write_str("Video"),
        }
    }
}
