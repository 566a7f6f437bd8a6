//! Fixtures for the FFmpeg-backed converter tests.

use std::path::Path;

use crate::toolchain::{FfmpegConfig, FfmpegLocator};

/// A locator that only looks in `dir` and never downloads.
pub(crate) fn isolated_locator(dir: &Path) -> FfmpegLocator {
    FfmpegLocator::new(
        FfmpegConfig::default()
            .with_bundled_dir(dir.to_path_buf())
            .with_search_path(false)
            .with_auto_download(false),
    )
}

/// Writes a stand-in ffmpeg into `dir`.
///
/// It answers `-version`, records its arguments in `args.txt`, and then either
/// creates the output file (last argument) or exits with `exit_code`.
#[cfg(unix)]
pub(crate) fn fake_ffmpeg(dir: &Path, exit_code: i32) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::create_dir_all(dir).unwrap();
    let script = format!(
        r#"#!/bin/sh
if [ "$1" = "-version" ]; then
  echo "ffmpeg version stand-in"
  exit 0
fi
printf '%s\n' "$@" > "$(dirname "$0")/args.txt"
if [ {code} -ne 0 ]; then
  echo "Error while encoding stream" >&2
  exit {code}
fi
for last; do :; done
: > "$last"
exit 0
"#,
        code = exit_code
    );
    let path = dir.join("ffmpeg");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

/// Arguments passed to the last run of the stand-in.
#[cfg(unix)]
pub(crate) fn recorded_args(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("args.txt"))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
