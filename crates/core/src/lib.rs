//! Conversion dispatch and format compatibility for image, audio and video files.
//!
//! Images are converted in-process with the `image` crate; audio and video are
//! handed to an FFmpeg subprocess. The [`ConversionDispatcher`] picks the right
//! converter from the file extensions and reports every outcome as a
//! [`ConversionResult`].

pub mod config;
pub mod converter;
pub mod dispatcher;
pub mod format;
pub mod testing;
pub mod toolchain;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError,
};
pub use converter::{
    ConversionOptions, ConversionRequest, ConversionResult, Converter, ConverterError,
};
pub use dispatcher::{ConversionDispatcher, ConversionJob};
pub use format::{ConversionCategory, FileType, FileTypeDetector};
pub use toolchain::{FfmpegConfig, FfmpegLocator};
