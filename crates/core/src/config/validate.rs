use super::{types::Config, ConfigError};

const LOG_LEVELS: &[&str] = &[
    "quiet", "panic", "fatal", "error", "warning", "info", "verbose", "debug", "trace",
];

/// Validate configuration
/// Currently validates:
/// - Option defaults are in range (quality 1-100, non-zero rates)
/// - FFmpeg log level is one ffmpeg accepts
/// - Download timeout and concurrency limit are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let invalid = |section: &str, e: crate::converter::ConverterError| {
        ConfigError::ValidationError(format!("[{}] {}", section, e))
    };
    config.image.validate().map_err(|e| invalid("image", e))?;
    config.audio.validate().map_err(|e| invalid("audio", e))?;
    config.video.validate().map_err(|e| invalid("video", e))?;

    if !LOG_LEVELS.contains(&config.ffmpeg.log_level.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "ffmpeg.log_level must be one of {}, got '{}'",
            LOG_LEVELS.join(", "),
            config.ffmpeg.log_level
        )));
    }

    if config.ffmpeg.download_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "ffmpeg.download_timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.ffmpeg.primary_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "ffmpeg.primary_url cannot be empty".to_string(),
        ));
    }

    if config.concurrency.max_parallel_conversions == 0 {
        return Err(ConfigError::ValidationError(
            "concurrency.max_parallel_conversions cannot be 0".to_string(),
        ));
    }

    Ok(())
}
