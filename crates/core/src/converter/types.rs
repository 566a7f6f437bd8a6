//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::ConverterError;
use crate::format::{ConversionCategory, FileType};

/// Default JPEG/WebP quality.
pub const DEFAULT_IMAGE_QUALITY: u8 = 75;
/// Default audio bitrate in kbps.
pub const DEFAULT_AUDIO_BITRATE_KBPS: u32 = 128;
/// Default WAV sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 44_100;
/// Default video bitrate in kbps.
pub const DEFAULT_VIDEO_BITRATE_KBPS: u32 = 1000;
/// Default output frame rate.
pub const DEFAULT_FRAME_RATE: u32 = 30;

/// Encoder options for image conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOptions {
    /// Encoder quality, 1-100. Used by the lossy JPEG and WebP encoders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
}

impl ImageOptions {
    pub fn with_quality(quality: u8) -> Result<Self, ConverterError> {
        let options = Self {
            quality: Some(quality),
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConverterError> {
        match self.quality {
            Some(q) if q == 0 || q > 100 => Err(ConverterError::invalid_options(format!(
                "image quality must be between 1 and 100, got {}",
                q
            ))),
            _ => Ok(()),
        }
    }

    /// Fills unset fields from `fallback`.
    pub fn or(self, fallback: &Self) -> Self {
        Self {
            quality: self.quality.or(fallback.quality),
        }
    }

    pub fn quality_or_default(&self) -> u8 {
        self.quality.unwrap_or(DEFAULT_IMAGE_QUALITY)
    }
}

/// Encoder options for audio conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioOptions {
    /// Target bitrate in kbps (MP3, AAC, OGG, M4A).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate_kbps: Option<u32>,
    /// Target sample rate in Hz (WAV).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate_hz: Option<u32>,
}

impl AudioOptions {
    pub fn validate(&self) -> Result<(), ConverterError> {
        if self.bitrate_kbps == Some(0) {
            return Err(ConverterError::invalid_options(
                "audio bitrate must be greater than 0",
            ));
        }
        if self.sample_rate_hz == Some(0) {
            return Err(ConverterError::invalid_options(
                "sample rate must be greater than 0",
            ));
        }
        Ok(())
    }

    pub fn or(self, fallback: &Self) -> Self {
        Self {
            bitrate_kbps: self.bitrate_kbps.or(fallback.bitrate_kbps),
            sample_rate_hz: self.sample_rate_hz.or(fallback.sample_rate_hz),
        }
    }

    pub fn bitrate_or_default(&self) -> u32 {
        self.bitrate_kbps.unwrap_or(DEFAULT_AUDIO_BITRATE_KBPS)
    }

    pub fn sample_rate_or_default(&self) -> u32 {
        self.sample_rate_hz.unwrap_or(DEFAULT_SAMPLE_RATE_HZ)
    }
}

/// Output frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Resizing only happens when both dimensions are set.
    pub fn is_applicable(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Encoder options for video conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_bitrate_kbps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_bitrate_kbps: Option<u32>,
    /// Output frame rate. `Some(0)` keeps the source rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
}

impl VideoOptions {
    pub fn validate(&self) -> Result<(), ConverterError> {
        if self.video_bitrate_kbps == Some(0) {
            return Err(ConverterError::invalid_options(
                "video bitrate must be greater than 0",
            ));
        }
        if self.audio_bitrate_kbps == Some(0) {
            return Err(ConverterError::invalid_options(
                "audio bitrate must be greater than 0",
            ));
        }
        Ok(())
    }

    pub fn or(self, fallback: &Self) -> Self {
        Self {
            video_bitrate_kbps: self.video_bitrate_kbps.or(fallback.video_bitrate_kbps),
            audio_bitrate_kbps: self.audio_bitrate_kbps.or(fallback.audio_bitrate_kbps),
            frame_rate: self.frame_rate.or(fallback.frame_rate),
            resolution: self.resolution.or(fallback.resolution),
        }
    }

    pub fn video_bitrate_or_default(&self) -> u32 {
        self.video_bitrate_kbps.unwrap_or(DEFAULT_VIDEO_BITRATE_KBPS)
    }

    pub fn audio_bitrate_or_default(&self) -> u32 {
        self.audio_bitrate_kbps.unwrap_or(DEFAULT_AUDIO_BITRATE_KBPS)
    }

    pub fn frame_rate_or_default(&self) -> u32 {
        self.frame_rate.unwrap_or(DEFAULT_FRAME_RATE)
    }
}

/// Per-request encoder options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversionOptions {
    /// Use the converter's configured defaults.
    #[default]
    Defaults,
    Image(ImageOptions),
    Audio(AudioOptions),
    Video(VideoOptions),
}

impl ConversionOptions {
    /// Category the options apply to, `None` for `Defaults`.
    pub fn category(&self) -> Option<ConversionCategory> {
        match self {
            Self::Defaults => None,
            Self::Image(_) => Some(ConversionCategory::Image),
            Self::Audio(_) => Some(ConversionCategory::Audio),
            Self::Video(_) => Some(ConversionCategory::Video),
        }
    }

    fn mismatch(&self, expected: ConversionCategory) -> ConverterError {
        ConverterError::invalid_options(format!(
            "{} options given to the {} converter",
            self.category().map(|c| c.label()).unwrap_or("default"),
            expected.label()
        ))
    }

    /// Extracts image options, rejecting options for another category.
    pub fn image(&self) -> Result<ImageOptions, ConverterError> {
        match self {
            Self::Defaults => Ok(ImageOptions::default()),
            Self::Image(o) => o.validate().map(|_| *o),
            _ => Err(self.mismatch(ConversionCategory::Image)),
        }
    }

    pub fn audio(&self) -> Result<AudioOptions, ConverterError> {
        match self {
            Self::Defaults => Ok(AudioOptions::default()),
            Self::Audio(o) => o.validate().map(|_| *o),
            _ => Err(self.mismatch(ConversionCategory::Audio)),
        }
    }

    pub fn video(&self) -> Result<VideoOptions, ConverterError> {
        match self {
            Self::Defaults => Ok(VideoOptions::default()),
            Self::Video(o) => o.validate().map(|_| *o),
            _ => Err(self.mismatch(ConversionCategory::Video)),
        }
    }
}

/// A single conversion request, built per call.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    /// Input file path.
    pub input_path: PathBuf,
    /// Output file path.
    pub output_path: PathBuf,
    /// Format to encode to.
    pub target_format: FileType,
    /// Encoder options.
    pub options: ConversionOptions,
}

impl ConversionRequest {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        target_format: FileType,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            target_format,
            options: ConversionOptions::Defaults,
        }
    }

    pub fn with_options(mut self, options: ConversionOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether either path is empty.
    pub fn has_empty_path(&self) -> bool {
        self.input_path.as_os_str().is_empty() || self.output_path.as_os_str().is_empty()
    }
}

/// Outcome of one conversion attempt.
///
/// Every conversion path returns one of these; failures carry the underlying
/// [`ConverterError`] in `error`.
#[derive(Debug)]
pub struct ConversionResult {
    pub success: bool,
    /// Human readable summary.
    pub message: String,
    /// Written file, set on success.
    pub output_path: Option<PathBuf>,
    /// Wall time from the start of the call, validation included.
    pub processing_time: Duration,
    pub error: Option<ConverterError>,
}

impl ConversionResult {
    pub fn success(message: impl Into<String>, output_path: &Path, elapsed: Duration) -> Self {
        Self {
            success: true,
            message: message.into(),
            output_path: Some(output_path.to_path_buf()),
            processing_time: elapsed,
            error: None,
        }
    }

    /// Builds a failure whose message is the error's own description.
    pub fn failure(error: ConverterError, elapsed: Duration) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            output_path: None,
            processing_time: elapsed,
            error: Some(error),
        }
    }

    /// Builds a failure with a custom message, keeping the error attached.
    pub fn failure_with_message(
        message: impl Into<String>,
        error: ConverterError,
        elapsed: Duration,
    ) -> Self {
        Self {
            success: false,
            message: message.into(),
            output_path: None,
            processing_time: elapsed,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_quality_bounds() {
        assert!(ImageOptions::with_quality(1).is_ok());
        assert!(ImageOptions::with_quality(100).is_ok());
        assert!(matches!(
            ImageOptions::with_quality(0),
            Err(ConverterError::InvalidOptions { .. })
        ));
        assert!(ImageOptions::with_quality(101).is_err());
        assert_eq!(ImageOptions::default().quality_or_default(), 75);
    }

    #[test]
    fn test_audio_defaults_and_validation() {
        let options = AudioOptions::default();
        assert_eq!(options.bitrate_or_default(), 128);
        assert_eq!(options.sample_rate_or_default(), 44_100);
        let zero = AudioOptions {
            bitrate_kbps: Some(0),
            sample_rate_hz: None,
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_video_defaults() {
        let options = VideoOptions::default();
        assert_eq!(options.video_bitrate_or_default(), 1000);
        assert_eq!(options.audio_bitrate_or_default(), 128);
        assert_eq!(options.frame_rate_or_default(), 30);
        assert!(options.resolution.is_none());
        assert!(!Resolution::new(1280, 0).is_applicable());
        assert!(Resolution::new(1280, 720).is_applicable());
    }

    #[test]
    fn test_options_merge_prefers_request_values() {
        let configured = AudioOptions {
            bitrate_kbps: Some(192),
            sample_rate_hz: Some(48_000),
        };
        let request = AudioOptions {
            bitrate_kbps: Some(320),
            sample_rate_hz: None,
        };
        let merged = request.or(&configured);
        assert_eq!(merged.bitrate_kbps, Some(320));
        assert_eq!(merged.sample_rate_hz, Some(48_000));
    }

    #[test]
    fn test_options_category_mismatch() {
        let options = ConversionOptions::Audio(AudioOptions::default());
        assert!(options.audio().is_ok());
        let err = options.image().unwrap_err();
        assert!(err.to_string().contains("audio options given to the image converter"));
        assert!(ConversionOptions::Defaults.video().is_ok());
    }

    #[test]
    fn test_options_validated_on_extract() {
        let options = ConversionOptions::Video(VideoOptions {
            video_bitrate_kbps: Some(0),
            ..Default::default()
        });
        assert!(options.video().is_err());
    }

    #[test]
    fn test_options_deserialize_tagged() {
        let options: ConversionOptions =
            serde_json::from_str(r#"{"type":"image","quality":90}"#).unwrap();
        assert_eq!(
            options,
            ConversionOptions::Image(ImageOptions { quality: Some(90) })
        );
    }

    #[test]
    fn test_request_empty_path() {
        let request = ConversionRequest::new("", "out.png", FileType::Png);
        assert!(request.has_empty_path());
        let request = ConversionRequest::new("in.jpg", "out.png", FileType::Png);
        assert!(!request.has_empty_path());
        assert_eq!(request.options, ConversionOptions::Defaults);
    }

    #[test]
    fn test_result_constructors() {
        let ok = ConversionResult::success(
            "done",
            Path::new("out.png"),
            Duration::from_millis(5),
        );
        assert!(ok.is_success());
        assert_eq!(ok.output_path, Some(PathBuf::from("out.png")));
        assert!(ok.error.is_none());

        let failed = ConversionResult::failure(ConverterError::InvalidPath, Duration::ZERO);
        assert!(!failed.success);
        assert_eq!(failed.message, "Invalid input or output path");
        assert!(failed.output_path.is_none());
        assert!(failed.error.is_some());
    }
}
