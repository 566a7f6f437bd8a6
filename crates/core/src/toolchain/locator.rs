//! Resolution of the ffmpeg binary.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::acquire;
use super::config::FfmpegConfig;
use crate::converter::ConverterError;

/// How long `ffmpeg -version` may take before the candidate is rejected.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Default)]
struct LocatorState {
    resolved: Option<PathBuf>,
    acquisition_attempted: bool,
}

/// Finds a working ffmpeg binary and remembers it.
///
/// Candidates are checked in order: the configured path, the system PATH (when
/// enabled) and the bundled directory. If none works, a single acquisition is
/// attempted; its outcome is remembered for the lifetime of the locator.
#[derive(Debug)]
pub struct FfmpegLocator {
    config: FfmpegConfig,
    state: Mutex<LocatorState>,
}

impl FfmpegLocator {
    pub fn new(config: FfmpegConfig) -> Self {
        Self {
            config,
            state: Mutex::new(LocatorState::default()),
        }
    }

    pub fn config(&self) -> &FfmpegConfig {
        &self.config
    }

    /// Platform file name of the ffmpeg executable.
    pub fn binary_name() -> &'static str {
        if cfg!(windows) {
            "ffmpeg.exe"
        } else {
            "ffmpeg"
        }
    }

    /// Location of the bundled binary, whether or not it exists.
    pub fn bundled_binary(&self) -> PathBuf {
        self.config.bundled_dir.join(Self::binary_name())
    }

    /// The previously resolved binary, if any.
    pub async fn resolved_path(&self) -> Option<PathBuf> {
        self.state.lock().await.resolved.clone()
    }

    /// Checks the candidates without attempting acquisition.
    pub async fn find(&self) -> Option<PathBuf> {
        for candidate in self.candidates() {
            if probe(&candidate).await {
                debug!(path = %candidate.display(), "Found working ffmpeg");
                return Some(candidate);
            }
        }
        None
    }

    /// Returns a usable ffmpeg path, acquiring it once if needed.
    ///
    /// Concurrent callers are serialised, so at most one acquisition runs.
    pub async fn ensure_available(&self) -> Result<PathBuf, ConverterError> {
        let mut state = self.state.lock().await;

        if let Some(path) = &state.resolved {
            return Ok(path.clone());
        }

        if let Some(path) = self.find().await {
            state.resolved = Some(path.clone());
            return Ok(path);
        }

        if state.acquisition_attempted {
            return Err(ConverterError::tool_unavailable(
                "ffmpeg was not found and the earlier acquisition attempt failed",
            ));
        }
        state.acquisition_attempted = true;

        match acquire::acquire(&self.config).await {
            Ok(path) => {
                if !probe(&path).await {
                    warn!(path = %path.display(), "Acquired ffmpeg does not run");
                    return Err(ConverterError::tool_unavailable(format!(
                        "acquired binary at {} does not run",
                        path.display()
                    )));
                }
                info!(path = %path.display(), "Using acquired ffmpeg");
                state.resolved = Some(path.clone());
                Ok(path)
            }
            Err(e) => {
                warn!(error = %e, "FFmpeg acquisition failed");
                Err(ConverterError::tool_unavailable(format!(
                    "ffmpeg was not found and could not be acquired: {}",
                    e
                )))
            }
        }
    }

    fn candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(path) = &self.config.path {
            candidates.push(path.clone());
        }
        if self.config.search_path {
            if let Ok(path) = which::which("ffmpeg") {
                candidates.push(path);
            }
        }
        let bundled = self.bundled_binary();
        if bundled.is_file() {
            candidates.push(bundled);
        }
        candidates
    }
}

/// Runs `<path> -version` and reports whether it exited successfully.
async fn probe(path: &Path) -> bool {
    let child = Command::new(path)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status();

    match timeout(PROBE_TIMEOUT, child).await {
        Ok(Ok(status)) => status.success(),
        Ok(Err(e)) => {
            debug!(path = %path.display(), error = %e, "ffmpeg candidate failed to start");
            false
        }
        Err(_) => {
            debug!(path = %path.display(), "ffmpeg candidate timed out");
            false
        }
    }
}
