//! The conversion dispatcher.

use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use super::types::ConversionJob;
use crate::config::Config;
use crate::converter::{
    AudioConverter, ConversionOptions, ConversionRequest, ConversionResult, Converter,
    ConverterError, ImageConverter, VideoConverter,
};
use crate::format::{self, ConversionCategory, FileType, FileTypeDetector};
use crate::toolchain::FfmpegLocator;

/// Routes conversion requests to the converter registered for their category.
///
/// Converters are registered once, at construction. The dispatcher holds no
/// per-request state, so one instance can serve many concurrent calls.
pub struct ConversionDispatcher {
    detector: FileTypeDetector,
    converters: HashMap<ConversionCategory, Arc<dyn Converter>>,
    locator: Option<Arc<FfmpegLocator>>,
    admission: Arc<Semaphore>,
    max_parallel: usize,
}

impl ConversionDispatcher {
    /// Builds the image, audio and video converters from configuration.
    ///
    /// The audio and video converters share one [`FfmpegLocator`].
    pub fn new(config: &Config) -> Self {
        let locator = Arc::new(FfmpegLocator::new(config.ffmpeg.clone()));
        let converters: [Arc<dyn Converter>; 3] = [
            Arc::new(ImageConverter::new(config.image)),
            Arc::new(AudioConverter::new(Arc::clone(&locator), config.audio)),
            Arc::new(VideoConverter::new(Arc::clone(&locator), config.video)),
        ];

        let mut dispatcher =
            Self::from_converters(converters, config.concurrency.max_parallel_conversions);
        dispatcher.locator = Some(locator);
        dispatcher
    }

    /// Builds a dispatcher from explicit converters.
    ///
    /// A later converter for the same category replaces an earlier one.
    pub fn from_converters(
        converters: impl IntoIterator<Item = Arc<dyn Converter>>,
        max_parallel: usize,
    ) -> Self {
        let max_parallel = max_parallel.max(1);
        let mut dispatcher = Self {
            detector: FileTypeDetector::new(),
            converters: HashMap::new(),
            locator: None,
            admission: Arc::new(Semaphore::new(max_parallel)),
            max_parallel,
        };
        for converter in converters {
            dispatcher.register(converter);
        }
        dispatcher
    }

    fn register(&mut self, converter: Arc<dyn Converter>) {
        let category = converter.supported_category();
        debug!(category = %category, converter = converter.name(), "Registering converter");
        self.converters.insert(category, converter);
    }

    /// The FFmpeg locator shared by the audio and video converters, if built from config.
    pub fn locator(&self) -> Option<&Arc<FfmpegLocator>> {
        self.locator.as_ref()
    }

    /// Upper bound on conversions in flight during [`convert_batch`](Self::convert_batch).
    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    /// Formats of a category, in catalog order.
    pub fn supported_formats(&self, category: ConversionCategory) -> &'static [FileType] {
        format::supported_formats(category)
    }

    /// Whether `format` belongs to any category.
    pub fn is_format_supported(&self, format: FileType) -> bool {
        format::is_supported(format)
    }

    /// Converts `input` to `output` with default options.
    ///
    /// When `target` is `None` the target format is detected from the output
    /// extension. Never fails: every outcome is a [`ConversionResult`].
    pub async fn convert_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        target: Option<FileType>,
    ) -> ConversionResult {
        self.convert_file_with_options(input, output, target, ConversionOptions::Defaults)
            .await
    }

    /// Converts `input` to `output` with explicit options.
    pub async fn convert_file_with_options(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        target: Option<FileType>,
        options: ConversionOptions,
    ) -> ConversionResult {
        let start = Instant::now();
        let input = input.as_ref();
        let output = output.as_ref();

        let (converter, request) = match self.route(input, output, target, options).await {
            Ok(routed) => routed,
            Err(e) => {
                warn!(input = %input.display(), output = %output.display(), error = %e, "Conversion rejected");
                return ConversionResult::failure(e, start.elapsed());
            }
        };

        debug!(
            input = %input.display(),
            format = %request.target_format,
            converter = converter.name(),
            "Dispatching conversion"
        );

        match AssertUnwindSafe(converter.convert(request))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(panic) => {
                let reason = panic_message(&*panic);
                error!(converter = converter.name(), reason = %reason, "Converter panicked");
                ConversionResult::failure(
                    ConverterError::internal(format!(
                        "{} converter panicked: {}",
                        converter.name(),
                        reason
                    )),
                    start.elapsed(),
                )
            }
        }
    }

    /// Converts every job, with at most `max_parallel` running at once.
    ///
    /// Results are returned in job order.
    pub async fn convert_batch(&self, jobs: Vec<ConversionJob>) -> Vec<ConversionResult> {
        info!(jobs = jobs.len(), max_parallel = self.max_parallel, "Starting batch conversion");

        let conversions = jobs.into_iter().map(|job| async move {
            let _permit = match self.admission.acquire().await {
                Ok(permit) => permit,
                Err(_) => {
                    return ConversionResult::failure(
                        ConverterError::internal("admission gate closed"),
                        Default::default(),
                    )
                }
            };
            self.convert_file_with_options(
                &job.input_path,
                &job.output_path,
                job.target_format,
                job.options,
            )
            .await
        });

        let results = join_all(conversions).await;
        let succeeded = results.iter().filter(|r| r.success).count();
        info!(
            succeeded,
            failed = results.len() - succeeded,
            "Batch conversion finished"
        );
        results
    }

    /// Runs the dispatcher-level checks and picks the converter.
    async fn route(
        &self,
        input: &Path,
        output: &Path,
        target: Option<FileType>,
        options: ConversionOptions,
    ) -> Result<(Arc<dyn Converter>, ConversionRequest), ConverterError> {
        if input.as_os_str().is_empty() || output.as_os_str().is_empty() {
            return Err(ConverterError::InvalidPath);
        }

        let is_file = tokio::fs::metadata(input)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(ConverterError::InputNotFound {
                path: input.to_path_buf(),
            });
        }

        let source_format = self.detector.detect_file_type(input);
        if !source_format.is_known() {
            return Err(ConverterError::UnsupportedFileType {
                path: input.to_path_buf(),
            });
        }

        let target_format = target
            .filter(|t| t.is_known())
            .unwrap_or_else(|| self.detector.detect_file_type(output));
        if !target_format.is_known() {
            return Err(ConverterError::UnknownTargetFormat {
                path: output.to_path_buf(),
            });
        }

        let source_category = self.detector.category(source_format)?;
        let target_category = self.detector.category(target_format)?;
        if source_category != target_category {
            return Err(ConverterError::CategoryMismatch {
                source_category,
                target_category,
            });
        }

        let converter = self
            .converters
            .get(&source_category)
            .cloned()
            .ok_or(ConverterError::NoConverter {
                category: source_category,
            })?;

        if !converter.can_convert(source_format, target_format) {
            return Err(ConverterError::UnsupportedConversion {
                source_format,
                target_format,
            });
        }

        let request = ConversionRequest::new(input, output, target_format).with_options(options);
        Ok((converter, request))
    }
}

impl std::fmt::Debug for ConversionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut categories: Vec<_> = self.converters.keys().map(|c| c.label()).collect();
        categories.sort_unstable();
        f.debug_struct("ConversionDispatcher")
            .field("converters", &categories)
            .field("max_parallel", &self.max_parallel)
            .finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
