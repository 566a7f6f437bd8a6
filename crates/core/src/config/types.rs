use serde::{Deserialize, Serialize};

use crate::converter::{AudioOptions, ImageOptions, VideoOptions};
use crate::toolchain::FfmpegConfig;

/// Root configuration
///
/// Every section is optional; an empty file yields the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub ffmpeg: FfmpegConfig,
    /// Defaults for image requests that leave options unset.
    #[serde(default)]
    pub image: ImageOptions,
    #[serde(default)]
    pub audio: AudioOptions,
    #[serde(default)]
    pub video: VideoOptions,
    #[serde(default)]
    pub concurrency: ConcurrencyConfig,
}

/// Limits for batch conversion
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConcurrencyConfig {
    /// Maximum conversions in flight at once.
    #[serde(default = "default_max_parallel")]
    pub max_parallel_conversions: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_parallel_conversions: default_max_parallel(),
        }
    }
}

fn default_max_parallel() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
