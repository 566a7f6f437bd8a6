//! Format catalog and file type detection.
//!
//! Every known [`FileType`] belongs to exactly one [`ConversionCategory`]; the
//! category lists returned by [`ConversionCategory::supported_formats`] partition
//! the known formats (6 image, 6 audio, 7 video).

mod catalog;
mod detector;
mod types;

pub use catalog::{default_extension, is_supported, lookup_extension, supported_formats};
pub use detector::FileTypeDetector;
pub use types::{ConversionCategory, FileType, ParseFileTypeError};
