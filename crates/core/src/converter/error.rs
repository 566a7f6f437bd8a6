//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

use crate::format::{ConversionCategory, FileType};

/// Broad classification of a [`ConverterError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any backend was touched (paths, formats, options).
    Validation,
    /// A required resource was missing (input file, output dir, FFmpeg).
    Resource,
    /// The codec library or FFmpeg failed while transcoding.
    Backend,
}

/// Errors that can occur while dispatching or performing a conversion.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// Input or output path is empty.
    #[error("Invalid input or output path")]
    InvalidPath,

    /// Input file does not exist.
    #[error("Input file does not exist: {path}")]
    InputNotFound { path: PathBuf },

    /// Source format could not be detected from the input path.
    #[error("Unsupported file type: {path}")]
    UnsupportedFileType { path: PathBuf },

    /// Target format could not be detected from the output path.
    #[error("Unable to determine target format from output path: {path}")]
    UnknownTargetFormat { path: PathBuf },

    /// `FileType::Unknown` has no category.
    #[error("File type {format} has no conversion category")]
    NoCategory { format: FileType },

    /// Source and target belong to different categories.
    #[error("Cannot convert between different media categories: {source_category} to {target_category}")]
    CategoryMismatch {
        source_category: ConversionCategory,
        target_category: ConversionCategory,
    },

    /// No converter is registered for the category.
    #[error("No converter available for {category}")]
    NoConverter { category: ConversionCategory },

    /// The converter rejected the format pair.
    #[error("Conversion from {source_format} to {target_format} is not supported")]
    UnsupportedConversion {
        source_format: FileType,
        target_format: FileType,
    },

    /// Target format is outside the converter's supported set.
    #[error("Unsupported target format for {label} conversion: {format}", label = .category.label())]
    UnsupportedTargetFormat {
        format: FileType,
        category: ConversionCategory,
    },

    /// Options failed validation or belong to another category.
    #[error("Invalid conversion options: {reason}")]
    InvalidOptions { reason: String },

    /// FFmpeg could not be found or acquired.
    #[error("FFmpeg is not available: {reason}. Install FFmpeg and make sure it is on PATH")]
    ToolUnavailable { reason: String },

    /// Output directory does not exist and could not be created.
    #[error("Failed to create output directory: {path}")]
    OutputDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image codec failed to decode or encode.
    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    /// FFmpeg exited unsuccessfully.
    #[error("Conversion failed: {reason}")]
    ConversionFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// I/O error during conversion.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A converter task panicked or was aborted.
    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl ConverterError {
    /// Creates a new conversion failed error with stderr output.
    pub fn conversion_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ConversionFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Creates a new invalid options error.
    pub fn invalid_options(reason: impl Into<String>) -> Self {
        Self::InvalidOptions {
            reason: reason.into(),
        }
    }

    /// Creates a new tool unavailable error.
    pub fn tool_unavailable(reason: impl Into<String>) -> Self {
        Self::ToolUnavailable {
            reason: reason.into(),
        }
    }

    /// Creates a new internal error.
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }

    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPath
            | Self::UnsupportedFileType { .. }
            | Self::UnknownTargetFormat { .. }
            | Self::NoCategory { .. }
            | Self::CategoryMismatch { .. }
            | Self::UnsupportedConversion { .. }
            | Self::UnsupportedTargetFormat { .. }
            | Self::InvalidOptions { .. } => ErrorKind::Validation,
            Self::InputNotFound { .. }
            | Self::NoConverter { .. }
            | Self::ToolUnavailable { .. }
            | Self::OutputDirectoryFailed { .. } => ErrorKind::Resource,
            Self::Image(_) | Self::ConversionFailed { .. } | Self::Io(_) | Self::Internal { .. } => {
                ErrorKind::Backend
            }
        }
    }
}
