//! Types for the dispatcher module.

use std::path::PathBuf;

use crate::converter::ConversionOptions;
use crate::format::FileType;

/// One entry of a batch submitted to the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionJob {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Explicit target; detected from the output extension when `None`.
    pub target_format: Option<FileType>,
    pub options: ConversionOptions,
}

impl ConversionJob {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            target_format: None,
            options: ConversionOptions::Defaults,
        }
    }

    pub fn with_target(mut self, target: FileType) -> Self {
        self.target_format = Some(target);
        self
    }

    pub fn with_options(mut self, options: ConversionOptions) -> Self {
        self.options = options;
        self
    }
}
