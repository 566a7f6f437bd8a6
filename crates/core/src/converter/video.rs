//! Video conversion through FFmpeg.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

use super::common::{check_input_exists, check_request, ensure_output_dir, finish};
use super::error::ConverterError;
use super::ffmpeg::{build_video_args, run_ffmpeg};
use super::traits::Converter;
use super::types::{ConversionRequest, ConversionResult, VideoOptions};
use crate::format::ConversionCategory;
use crate::toolchain::FfmpegLocator;

/// Transcodes video files by running FFmpeg once per request.
#[derive(Debug, Clone)]
pub struct VideoConverter {
    locator: Arc<FfmpegLocator>,
    defaults: VideoOptions,
}

impl VideoConverter {
    pub fn new(locator: Arc<FfmpegLocator>, defaults: VideoOptions) -> Self {
        Self { locator, defaults }
    }

    async fn run(&self, request: &ConversionRequest) -> Result<(), ConverterError> {
        check_request(request, ConversionCategory::Video)?;
        let options = request.options.video()?.or(&self.defaults);
        check_input_exists(&request.input_path).await?;
        let ffmpeg = self.locator.ensure_available().await?;
        ensure_output_dir(&request.output_path).await?;

        let args = build_video_args(
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
impl Converter for VideoConverter {
    fn name(&self) -> &str {
        "video"
    }

    fn supported_category(&self) -> ConversionCategory {
        ConversionCategory::Video
    }

    async fn convert(&self, request: ConversionRequest) -> ConversionResult {
        let start = Instant::now();
        let outcome = self.run(&request).await;
        finish(ConversionCategory::Video, &request, start, outcome)
    }
}
