//! Converters for the three media categories.
//!
//! Every converter implements [`Converter`] and reports each outcome, failures
//! included, as a [`ConversionResult`]:
//!
//! - [`ImageConverter`] decodes and re-encodes in-process with the `image` crate.
//! - [`AudioConverter`] and [`VideoConverter`] run one FFmpeg process per request,
//!   resolving the binary through a shared [`FfmpegLocator`](crate::toolchain::FfmpegLocator).
//!
//! # Example
//!
//! ```ignore
//! use mediaconv_core::converter::{Converter, ConversionRequest, ImageConverter};
//! use mediaconv_core::format::FileType;
//!
//! let converter = ImageConverter::default();
//! let result = converter
//!     .convert(ConversionRequest::new("photo.png", "photo.jpg", FileType::Jpeg))
//!     .await;
//! println!("{} in {:?}", result.message, result.processing_time);
//! ```

mod audio;
mod common;
mod error;
mod ffmpeg;
mod image;
#[cfg(test)]
mod testing_support;
mod traits;
mod types;
mod video;

pub use self::image::{output_path_for, ImageConverter};
pub use audio::AudioConverter;
pub use error::{ConverterError, ErrorKind};
pub use ffmpeg::{audio_codec, build_audio_args, build_video_args, video_codecs};
pub use traits::Converter;
pub use types::{
    AudioOptions, ConversionOptions, ConversionRequest, ConversionResult, ImageOptions,
    Resolution, VideoOptions, DEFAULT_AUDIO_BITRATE_KBPS, DEFAULT_FRAME_RATE,
    DEFAULT_IMAGE_QUALITY, DEFAULT_SAMPLE_RATE_HZ, DEFAULT_VIDEO_BITRATE_KBPS,
};
pub use video::VideoConverter;
