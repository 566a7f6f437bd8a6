//! Mock converter for testing.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::converter::{ConversionRequest, ConversionResult, Converter, ConverterError};
use crate::format::{ConversionCategory, FileType};

/// A recorded conversion request for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedConversion {
    /// The request that was submitted.
    pub request: ConversionRequest,
    /// Whether the conversion succeeded.
    pub success: bool,
}

/// Mock implementation of the Converter trait.
///
/// Provides controllable behavior for testing:
/// - Track requests for assertions
/// - Simulate success/failure
/// - Reject chosen target formats in `can_convert`
/// - Hold each conversion for a while and report peak concurrency
/// - Panic inside `convert`
///
/// Nothing is read or written on disk.
#[derive(Debug)]
pub struct MockConverter {
    category: ConversionCategory,
    /// Targets `can_convert` refuses even though they are in the category.
    rejected_targets: Vec<FileType>,
    /// Whether `convert` panics.
    panics: bool,
    /// Recorded conversions.
    conversions: Arc<RwLock<Vec<RecordedConversion>>>,
    /// If set, the next conversion will fail with this error.
    next_error: Arc<RwLock<Option<ConverterError>>>,
    /// Simulated conversion duration.
    conversion_duration: Arc<RwLock<Duration>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockConverter {
    /// Create a mock that accepts every format pair of `category`.
    pub fn new(category: ConversionCategory) -> Self {
        Self {
            category,
            rejected_targets: Vec::new(),
            panics: false,
            conversions: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            conversion_duration: Arc::new(RwLock::new(Duration::ZERO)),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Make `can_convert` refuse `target`.
    pub fn rejecting_target(mut self, target: FileType) -> Self {
        self.rejected_targets.push(target);
        self
    }

    /// Make every `convert` call panic.
    pub fn panicking(mut self) -> Self {
        self.panics = true;
        self
    }

    /// Get all recorded conversions.
    pub async fn recorded_conversions(&self) -> Vec<RecordedConversion> {
        self.conversions.read().await.clone()
    }

    /// Get the number of conversions performed.
    pub async fn conversion_count(&self) -> usize {
        self.conversions.read().await.len()
    }

    /// Output paths of recorded conversions, in call order.
    pub async fn recorded_outputs(&self) -> Vec<PathBuf> {
        self.conversions
            .read()
            .await
            .iter()
            .map(|c| c.request.output_path.clone())
            .collect()
    }

    /// Configure the next conversion to fail with the given error.
    pub async fn set_next_error(&self, error: ConverterError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set the simulated conversion duration.
    pub async fn set_conversion_duration(&self, duration: Duration) {
        *self.conversion_duration.write().await = duration;
    }

    /// Highest number of conversions that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn take_error(&self) -> Option<ConverterError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    fn supported_category(&self) -> ConversionCategory {
        self.category
    }

    fn can_convert(&self, source: FileType, target: FileType) -> bool {
        let formats = self.supported_formats();
        formats.contains(&source)
            && formats.contains(&target)
            && !self.rejected_targets.contains(&target)
    }

    async fn convert(&self, request: ConversionRequest) -> ConversionResult {
        let start = Instant::now();
        if self.panics {
            panic!("mock converter panicked on {}", request.input_path.display());
        }

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        let duration = *self.conversion_duration.read().await;
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }

        let result = match self.take_error().await {
            Some(error) => ConversionResult::failure(error, start.elapsed()),
            None => ConversionResult::success(
                format!(
                    "Successfully converted {} to {}",
                    self.category.label(),
                    request.target_format
                ),
                &request.output_path,
                start.elapsed(),
            ),
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.conversions.write().await.push(RecordedConversion {
            request,
            success: result.success,
        });
        result
    }
}
