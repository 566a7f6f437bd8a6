//! Steps shared by every converter: request checks, output directory setup and
//! result reporting.

use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use super::error::{ConverterError, ErrorKind};
use super::types::{ConversionRequest, ConversionResult};
use crate::format::ConversionCategory;

/// Checks the paths and the target format against the converter's category.
pub(crate) fn check_request(
    request: &ConversionRequest,
    category: ConversionCategory,
) -> Result<(), ConverterError> {
    if request.has_empty_path() {
        return Err(ConverterError::InvalidPath);
    }
    if !category.contains(request.target_format) {
        return Err(ConverterError::UnsupportedTargetFormat {
            format: request.target_format,
            category,
        });
    }
    Ok(())
}

/// Fails with `InputNotFound` unless `path` is an existing file.
pub(crate) async fn check_input_exists(path: &Path) -> Result<(), ConverterError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(ConverterError::InputNotFound {
            path: path.to_path_buf(),
        }),
    }
}

/// Creates the parent directory of `output_path` if it is missing.
pub(crate) async fn ensure_output_dir(output_path: &Path) -> Result<(), ConverterError> {
    let Some(parent) = output_path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    // create_dir_all succeeds if another conversion created it first.
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|source| ConverterError::OutputDirectoryFailed {
            path: parent.to_path_buf(),
            source,
        })
}

/// Turns the outcome of a conversion into its result.
pub(crate) fn finish(
    category: ConversionCategory,
    request: &ConversionRequest,
    start: Instant,
    outcome: Result<(), ConverterError>,
) -> ConversionResult {
    let elapsed = start.elapsed();
    match outcome {
        Ok(()) => {
            info!(
                input = %request.input_path.display(),
                output = %request.output_path.display(),
                format = %request.target_format,
                elapsed_ms = elapsed.as_millis() as u64,
                "Conversion completed"
            );
            ConversionResult::success(
                format!(
                    "Successfully converted {} to {}",
                    category.label(),
                    request.target_format
                ),
                &request.output_path,
                elapsed,
            )
        }
        Err(e) => {
            warn!(
                input = %request.input_path.display(),
                format = %request.target_format,
                error = %e,
                "Conversion failed"
            );
            if e.kind() == ErrorKind::Backend {
                ConversionResult::failure_with_message(
                    format!("Failed to convert {}: {}", category.label(), e),
                    e,
                    elapsed,
                )
            } else {
                ConversionResult::failure(e, elapsed)
            }
        }
    }
}
