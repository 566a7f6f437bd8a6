//! FFmpeg argument building and process execution.

use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use super::error::ConverterError;
use super::types::{AudioOptions, VideoOptions};
use crate::format::{ConversionCategory, FileType};
use crate::toolchain::FfmpegConfig;

/// Returns the ffmpeg audio encoder for an audio target format.
pub fn audio_codec(format: FileType) -> Option<&'static str> {
    match format {
        FileType::Mp3 => Some("libmp3lame"),
        FileType::Wav => Some("pcm_s16le"),
        FileType::Flac => Some("flac"),
        FileType::Aac | FileType::M4a => Some("aac"),
        FileType::Ogg => Some("libvorbis"),
        _ => None,
    }
}

/// Returns the (video, audio) encoder pair for a video target format.
pub fn video_codecs(format: FileType) -> Option<(&'static str, &'static str)> {
    match format {
        FileType::Mp4 | FileType::Mov | FileType::Mkv | FileType::Wmv | FileType::Flv => {
            Some(("libx264", "aac"))
        }
        FileType::Avi => Some(("libx264", "libmp3lame")),
        FileType::Webm => Some(("libvpx", "libvorbis")),
        _ => None,
    }
}

fn input_args(input_path: &Path) -> Vec<String> {
    vec![
        "-y".to_string(), // Overwrite output
        "-i".to_string(),
        input_path.to_string_lossy().to_string(),
    ]
}

fn output_args(args: &mut Vec<String>, output_path: &Path, config: &FfmpegConfig) {
    args.extend(["-loglevel".to_string(), config.log_level.clone()]);
    args.extend(config.extra_args.iter().cloned());
    args.push(output_path.to_string_lossy().to_string());
}

/// Builds ffmpeg arguments for audio conversion.
pub fn build_audio_args(
    input_path: &Path,
    output_path: &Path,
    target: FileType,
    options: &AudioOptions,
    config: &FfmpegConfig,
) -> Result<Vec<String>, ConverterError> {
    let codec = audio_codec(target).ok_or(ConverterError::UnsupportedTargetFormat {
        format: target,
        category: ConversionCategory::Audio,
    })?;

    let mut args = input_args(input_path);
    args.extend(["-c:a".to_string(), codec.to_string()]);

    match target {
        FileType::Wav => {
            args.extend(["-ar".to_string(), options.sample_rate_or_default().to_string()]);
        }
        // Lossless, no bitrate
        FileType::Flac => {}
        _ => {
            args.extend(["-b:a".to_string(), format!("{}k", options.bitrate_or_default())]);
        }
    }

    output_args(&mut args, output_path, config);
    Ok(args)
}

/// Builds ffmpeg arguments for video conversion.
pub fn build_video_args(
    input_path: &Path,
    output_path: &Path,
    target: FileType,
    options: &VideoOptions,
    config: &FfmpegConfig,
) -> Result<Vec<String>, ConverterError> {
    let (video_codec, audio_codec) =
        video_codecs(target).ok_or(ConverterError::UnsupportedTargetFormat {
            format: target,
            category: ConversionCategory::Video,
        })?;

    let mut args = input_args(input_path);
    args.extend([
        "-c:v".to_string(),
        video_codec.to_string(),
        "-c:a".to_string(),
        audio_codec.to_string(),
        "-b:v".to_string(),
        format!("{}k", options.video_bitrate_or_default()),
        "-b:a".to_string(),
        format!("{}k", options.audio_bitrate_or_default()),
    ]);

    let fps = options.frame_rate_or_default();
    if fps > 0 {
        args.extend(["-r".to_string(), fps.to_string()]);
    }

    if let Some(resolution) = options.resolution.filter(|r| r.is_applicable()) {
        args.extend([
            "-s".to_string(),
            format!("{}x{}", resolution.width, resolution.height),
        ]);
    }

    output_args(&mut args, output_path, config);
    Ok(args)
}

/// Runs ffmpeg to completion. The exit status is the only success signal.
pub async fn run_ffmpeg(binary: &Path, args: &[String]) -> Result<(), ConverterError> {
    debug!(binary = %binary.display(), ?args, "Running ffmpeg");

    let mut child = Command::new(binary)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConverterError::tool_unavailable(format!("{} not found", binary.display()))
            } else {
                ConverterError::Io(e)
            }
        })?;

    // Drain stderr to EOF so ffmpeg never blocks on a full pipe. Lines may
    // carry non-UTF-8 metadata. Only error lines are kept.
    let mut error_output = String::new();
    if let Some(stderr) = child.stderr.take() {
        let mut reader = BufReader::new(stderr);
        let mut line = Vec::new();
        loop {
            line.clear();
            match reader.read_until(b'\n', &mut line).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    let text = String::from_utf8_lossy(&line);
                    let text = text.trim_end();
                    if text.to_ascii_lowercase().contains("error") {
                        error_output.push_str(text);
                        error_output.push('\n');
                    }
                }
            }
        }
    }

    let status = child.wait().await?;
    if status.success() {
        return Ok(());
    }

    let reason = match status.code() {
        Some(code) => format!("ffmpeg exited with code {}", code),
        None => "ffmpeg was terminated by a signal".to_string(),
    };
    Err(ConverterError::conversion_failed(
        reason,
        if error_output.is_empty() {
            None
        } else {
            Some(error_output)
        },
    ))
}
