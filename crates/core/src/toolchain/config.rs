//! Configuration for locating and running FFmpeg.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Primary download source for the prebuilt Windows FFmpeg archive.
pub const PRIMARY_DOWNLOAD_URL: &str =
    "https://github.com/BtbN/FFmpeg-Builds/releases/download/latest/ffmpeg-master-latest-win64-gpl.zip";

/// Secondary download source, tried once if the primary fails.
pub const FALLBACK_DOWNLOAD_URL: &str =
    "https://www.gyan.dev/ffmpeg/builds/packages/ffmpeg-6.1.1-essentials_build.zip";

/// FFmpeg location, acquisition and invocation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FfmpegConfig {
    /// Explicit path to the ffmpeg binary, checked before anything else.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Whether to look for ffmpeg on the system PATH.
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// Directory holding a bundled (or downloaded) ffmpeg binary.
    #[serde(default = "default_bundled_dir")]
    pub bundled_dir: PathBuf,

    /// Whether a missing ffmpeg may be downloaded (Windows only).
    #[serde(default = "default_true")]
    pub auto_download: bool,

    #[serde(default = "default_primary_url")]
    pub primary_url: String,

    #[serde(default = "default_fallback_url")]
    pub fallback_url: Option<String>,

    /// Timeout for the archive download in seconds.
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Additional ffmpeg arguments placed before the output path.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_bundled_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("ffmpeg")))
        .unwrap_or_else(|| PathBuf::from("ffmpeg"))
}

fn default_primary_url() -> String {
    PRIMARY_DOWNLOAD_URL.to_string()
}

fn default_fallback_url() -> Option<String> {
    Some(FALLBACK_DOWNLOAD_URL.to_string())
}

fn default_download_timeout() -> u64 {
    600 // 10 minutes
}

fn default_log_level() -> String {
    "error".to_string()
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            path: None,
            search_path: true,
            bundled_dir: default_bundled_dir(),
            auto_download: true,
            primary_url: default_primary_url(),
            fallback_url: default_fallback_url(),
            download_timeout_secs: default_download_timeout(),
            log_level: default_log_level(),
            extra_args: Vec::new(),
        }
    }
}

impl FfmpegConfig {
    /// Creates a config pinned to one ffmpeg binary.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            ..Default::default()
        }
    }

    /// Sets the bundled binary directory.
    pub fn with_bundled_dir(mut self, dir: PathBuf) -> Self {
        self.bundled_dir = dir;
        self
    }

    /// Enables or disables the PATH search.
    pub fn with_search_path(mut self, search: bool) -> Self {
        self.search_path = search;
        self
    }

    /// Enables or disables automatic download.
    pub fn with_auto_download(mut self, enabled: bool) -> Self {
        self.auto_download = enabled;
        self
    }

    /// Download sources in the order they are tried.
    pub fn download_urls(&self) -> Vec<&str> {
        std::iter::once(self.primary_url.as_str())
            .chain(self.fallback_url.as_deref())
            .collect()
    }
}
