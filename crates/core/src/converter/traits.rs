//! Trait definitions for the converter module.

use async_trait::async_trait;

use super::types::{ConversionRequest, ConversionResult};
use crate::format::{ConversionCategory, FileType};

/// A converter for one media category.
///
/// Implementations never return errors from [`Converter::convert`]: every
/// outcome, including validation failures, is reported as a [`ConversionResult`].
#[async_trait]
pub trait Converter: Send + Sync {
    /// Returns the name of this converter implementation.
    fn name(&self) -> &str;

    /// The single category this converter handles.
    fn supported_category(&self) -> ConversionCategory;

    /// Formats this converter reads and writes.
    fn supported_formats(&self) -> &'static [FileType] {
        self.supported_category().supported_formats()
    }

    /// Whether both formats are in this converter's supported set.
    ///
    /// Always false for cross-category pairs since the set never spans categories.
    fn can_convert(&self, source: FileType, target: FileType) -> bool {
        let formats = self.supported_formats();
        formats.contains(&source) && formats.contains(&target)
    }

    /// Performs the conversion and reports the outcome.
    async fn convert(&self, request: ConversionRequest) -> ConversionResult;
}
