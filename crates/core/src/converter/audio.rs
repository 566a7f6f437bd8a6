//! Audio conversion through FFmpeg.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

use super::common::{check_input_exists, check_request, ensure_output_dir, finish};
use super::error::ConverterError;
use super::ffmpeg::{build_audio_args, run_ffmpeg};
use super::traits::Converter;
use super::types::{AudioOptions, ConversionRequest, ConversionResult};
use crate::format::ConversionCategory;
use crate::toolchain::FfmpegLocator;

/// Transcodes audio files by running FFmpeg once per request.
#[derive(Debug, Clone)]
pub struct AudioConverter {
    locator: Arc<FfmpegLocator>,
    defaults: AudioOptions,
}

impl AudioConverter {
    pub fn new(locator: Arc<FfmpegLocator>, defaults: AudioOptions) -> Self {
        Self { locator, defaults }
    }

    async fn run(&self, request: &ConversionRequest) -> Result<(), ConverterError> {
        check_request(request, ConversionCategory::Audio)?;
        let options = request.options.audio()?.or(&self.defaults);
        check_input_exists(&request.input_path).await?;
        let ffmpeg = self.locator.ensure_available().await?;
        ensure_output_dir(&request.output_path).await?;

        let args = build_audio_args(
            &request.input_path,
            &request.output_path,
            request.target_format,
            &options,
            self.locator.config(),
        )?;
        run_ffmpeg(&ffmpeg, &args).await
    }
}

#[async_trait]
impl Converter for AudioConverter {
    fn name(&self) -> &str {
        "audio"
    }

    fn supported_category(&self) -> ConversionCategory {
        ConversionCategory::Audio
    }

    async fn convert(&self, request: ConversionRequest) -> ConversionResult {
        let start = Instant::now();
        let outcome = self.run(&request).await;
        finish(ConversionCategory::Audio, &request, start, outcome)
    }
}
