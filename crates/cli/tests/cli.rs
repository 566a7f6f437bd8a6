//! End-to-end tests for the `mediaconv` binary.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn mediaconv(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mediaconv"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run mediaconv")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_no_arguments_prints_help() {
    let dir = TempDir::new().unwrap();
    let output = mediaconv(&[], dir.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage"));
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    let output = mediaconv(&["--version"], dir.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_formats_listing() {
    let dir = TempDir::new().unwrap();
    let output = mediaconv(&["--formats"], dir.path());
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Image:"));
    assert!(text.contains("Mkv (.mkv)"));
}

#[test]
fn test_missing_output_fails() {
    let dir = TempDir::new().unwrap();
    let output = mediaconv(&["-i", "a.png"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("missing output file"));
}

#[test]
fn test_bad_flag_fails_with_code_one() {
    let dir = TempDir::new().unwrap();
    let output = mediaconv(&["--no-such-flag"], dir.path());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let output = mediaconv(&["-c", "absent.toml", "a.png", "b.bmp"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to load config"));
}

#[test]
fn test_formats_listing_ignores_bad_config() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_mediaconv"))
        .args(["--formats"])
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env("MEDIACONV_CONCURRENCY__MAX_PARALLEL_CONVERSIONS", "not-a-number")
        .output()
        .expect("failed to run mediaconv");
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Supported formats:"));
}

#[test]
fn test_converts_image() {
    let dir = TempDir::new().unwrap();
    image::RgbImage::from_pixel(5, 3, image::Rgb([200, 10, 10]))
        .save_with_format(dir.path().join("red.png"), image::ImageFormat::Png)
        .unwrap();

    let output = mediaconv(&["red.png", "out/red.bmp"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Successfully converted image to Bmp"));
    assert!(text.contains("Processing time:"));
    assert!(dir.path().join("out/red.bmp").exists());
}

#[test]
fn test_unknown_format_warns_and_uses_extension() {
    let dir = TempDir::new().unwrap();
    image::RgbImage::from_pixel(2, 2, image::Rgb([0, 0, 0]))
        .save_with_format(dir.path().join("black.png"), image::ImageFormat::Png)
        .unwrap();

    let output = mediaconv(&["-i", "black.png", "-o", "black.gif", "-f", "heic"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stderr(&output).contains("unknown format 'heic'"));
    assert!(dir.path().join("black.gif").exists());
}

#[test]
fn test_cross_category_conversion_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("song.mp3"), b"ID3").unwrap();

    let output = mediaconv(&["song.mp3", "song.png"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output)
        .contains("Cannot convert between different media categories: Audio to Image"));
}
