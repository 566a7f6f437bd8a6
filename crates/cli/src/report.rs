use std::fmt::Write;

use mediaconv_core::converter::ConverterError;
use mediaconv_core::{ConversionCategory, ConversionResult};

/// The `--formats` listing. Static, so it needs no configuration.
pub fn format_list() -> String {
    let mut out = String::from("Supported formats:\n");
    for category in ConversionCategory::ALL {
        let formats: Vec<String> = category
            .supported_formats()
            .iter()
            .map(|format| match format.extension() {
                Some(extension) => format!("{} (.{})", format, extension),
                None => format.to_string(),
            })
            .collect();
        let _ = writeln!(out, "  {:<6} {}", format!("{}:", category), formats.join(", "));
    }
    out
}

/// Summary printed after a conversion.
pub fn conversion_report(result: &ConversionResult) -> String {
    let mut out = String::new();
    if result.success {
        let _ = writeln!(out, "{}", result.message);
        let _ = writeln!(
            out,
            "Processing time: {:.2}s",
            result.processing_time.as_secs_f64()
        );
        if let Some(path) = &result.output_path {
            let _ = writeln!(out, "Output: {}", path.display());
        }
        return out;
    }

    let _ = writeln!(out, "Conversion failed: {}", result.message);
    if let Some(error) = &result.error {
        let detail = error.to_string();
        if detail != result.message {
            let _ = writeln!(out, "Error: {}", detail);
        }
        if let ConverterError::ConversionFailed {
            stderr: Some(stderr),
            ..
        } = error
        {
            let _ = writeln!(out, "FFmpeg output:\n{}", stderr.trim_end());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::Duration;

    #[test]
    fn test_format_list() {
        let list = format_list();
        assert!(list.contains("Image: Jpeg (.jpg), Png (.png)"));
        assert!(list.contains("Audio: Mp3 (.mp3)"));
        assert!(list.contains("Webm (.webm)"));
        assert!(!list.contains("Unknown"));
    }

    #[test]
    fn test_success_report() {
        let result = ConversionResult::success(
            "Successfully converted image to Png",
            Path::new("/tmp/out.png"),
            Duration::from_millis(1234),
        );
        let report = conversion_report(&result);
        assert!(report.contains("Successfully converted image to Png"));
        assert!(report.contains("Processing time: 1.23s"));
        assert!(report.contains("Output: /tmp/out.png"));
    }

    #[test]
    fn test_failure_report_includes_ffmpeg_output() {
        let error = ConverterError::conversion_failed(
            "ffmpeg exited with code 1",
            Some("Error opening input\n".to_string()),
        );
        let result = ConversionResult::failure_with_message(
            "Failed to convert audio: Conversion failed: ffmpeg exited with code 1",
            error,
            Duration::ZERO,
        );
        let report = conversion_report(&result);
        assert!(report.starts_with("Conversion failed: Failed to convert audio"));
        assert!(report.contains("Error: Conversion failed: ffmpeg exited with code 1"));
        assert!(report.contains("FFmpeg output:\nError opening input"));
    }

    #[test]
    fn test_failure_report_does_not_repeat_message() {
        let result = ConversionResult::failure(ConverterError::InvalidPath, Duration::ZERO);
        let report = conversion_report(&result);
        assert_eq!(report, "Conversion failed: Invalid input or output path\n");
    }
}
