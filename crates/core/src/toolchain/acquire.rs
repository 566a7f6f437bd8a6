//! One-shot download and extraction of a prebuilt FFmpeg archive.

use reqwest::Client;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use zip::ZipArchive;

use super::config::FfmpegConfig;

/// Archive file name written into the bundled directory while extracting.
const ARCHIVE_NAME: &str = "ffmpeg.zip";

/// Errors from the acquisition sequence.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("automatic download is disabled")]
    Disabled,

    #[error("automatic download is only supported on Windows")]
    UnsupportedPlatform,

    #[error("download failed from every source ({0})")]
    DownloadFailed(String),

    #[error("archive does not contain {0}")]
    BinaryNotInArchive(String),

    #[error("failed to read archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction task failed: {0}")]
    Task(String),
}

/// Runs the acquisition sequence and returns the extracted binary path.
///
/// Only attempted on Windows; other platforms need a pre-existing installation.
pub async fn acquire(config: &FfmpegConfig) -> Result<PathBuf, AcquireError> {
    if !config.auto_download {
        return Err(AcquireError::Disabled);
    }
    if !cfg!(windows) {
        return Err(AcquireError::UnsupportedPlatform);
    }
    download_and_extract(config).await
}

async fn download_and_extract(config: &FfmpegConfig) -> Result<PathBuf, AcquireError> {
    tokio::fs::create_dir_all(&config.bundled_dir).await?;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.download_timeout_secs))
        .user_agent(concat!("mediaconv/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AcquireError::DownloadFailed(e.to_string()))?;

    info!("Downloading FFmpeg, this may take a few minutes");
    let bytes = download_first(&client, &config.download_urls()).await?;

    let archive_path = config.bundled_dir.join(ARCHIVE_NAME);
    tokio::fs::write(&archive_path, &bytes).await?;

    let dest_dir = config.bundled_dir.clone();
    let archive = archive_path.clone();
    let extracted = tokio::task::spawn_blocking(move || {
        extract_binaries(&archive, &dest_dir, "ffmpeg.exe", Some("ffprobe.exe"))
    })
    .await
    .map_err(|e| AcquireError::Task(e.to_string()))?;

    if let Err(e) = tokio::fs::remove_file(&archive_path).await {
        warn!(path = %archive_path.display(), error = %e, "Failed to remove FFmpeg archive");
    }

    let path = extracted?;
    info!(path = %path.display(), "FFmpeg extracted");
    Ok(path)
}

/// Tries each URL in order and returns the first successful body.
async fn download_first(client: &Client, urls: &[&str]) -> Result<Vec<u8>, AcquireError> {
    let mut failures = Vec::new();
    for url in urls {
        match fetch(client, url).await {
            Ok(bytes) => return Ok(bytes),
            Err(e) => {
                warn!(url = %url, error = %e, "FFmpeg download failed");
                failures.push(format!("{}: {}", url, e));
            }
        }
    }
    Err(AcquireError::DownloadFailed(failures.join("; ")))
}

async fn fetch(client: &Client, url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

/// Extracts `binary` (and optionally `companion`) from a zip archive into `dest_dir`.
///
/// Entries under a `bin` directory win over other entries with the same name.
pub(crate) fn extract_binaries(
    archive_path: &Path,
    dest_dir: &Path,
    binary: &str,
    companion: Option<&str>,
) -> Result<PathBuf, AcquireError> {
    let mut archive = ZipArchive::new(File::open(archive_path)?)?;

    let entry = find_entry(&archive, binary)
        .ok_or_else(|| AcquireError::BinaryNotInArchive(binary.to_string()))?;
    let target = dest_dir.join(binary);
    extract_entry(&mut archive, &entry, &target)?;

    if let Some(companion) = companion {
        if let Some(entry) = find_entry(&archive, companion) {
            extract_entry(&mut archive, &entry, &dest_dir.join(companion))?;
        }
    }

    Ok(target)
}

fn find_entry(archive: &ZipArchive<File>, binary: &str) -> Option<String> {
    let matches: Vec<&str> = archive
        .file_names()
        .filter(|name| entry_file_name(name).eq_ignore_ascii_case(binary))
        .collect();

    matches
        .iter()
        .find(|name| name.split('/').any(|segment| segment == "bin"))
        .or_else(|| matches.first())
        .map(|name| name.to_string())
}

fn entry_file_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn extract_entry(
    archive: &mut ZipArchive<File>,
    name: &str,
    target: &Path,
) -> Result<(), AcquireError> {
    let mut entry = archive.by_name(name)?;
    let mut out = File::create(target)?;
    std::io::copy(&mut entry, &mut out)?;
    Ok(())
}
