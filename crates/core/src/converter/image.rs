//! Image conversion through the `image` codec library.

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;
use webp::Encoder as WebPEncoder;

use super::common::{check_input_exists, check_request, ensure_output_dir, finish};
use super::error::ConverterError;
use super::traits::Converter;
use super::types::{ConversionRequest, ConversionResult, ImageOptions};
use crate::format::{ConversionCategory, FileType};

/// Largest width or height libwebp will encode.
const WEBP_MAX_DIMENSION: u32 = 16383;

/// Converts between still image formats in-process.
#[derive(Debug, Clone, Default)]
pub struct ImageConverter {
    defaults: ImageOptions,
}

impl ImageConverter {
    /// Creates a converter whose unset request options fall back to `defaults`.
    pub fn new(defaults: ImageOptions) -> Self {
        Self { defaults }
    }

    async fn run(&self, request: &ConversionRequest) -> Result<(), ConverterError> {
        check_request(request, ConversionCategory::Image)?;
        let options = request.options.image()?.or(&self.defaults);
        check_input_exists(&request.input_path).await?;
        ensure_output_dir(&request.output_path).await?;

        let input = request.input_path.clone();
        let output = request.output_path.clone();
        let target = request.target_format;
        tokio::task::spawn_blocking(move || transcode(&input, &output, target, &options))
            .await
            .map_err(|e| ConverterError::internal(format!("image task failed: {}", e)))?
    }
}

#[async_trait]
impl Converter for ImageConverter {
    fn name(&self) -> &str {
        "image"
    }

    fn supported_category(&self) -> ConversionCategory {
        ConversionCategory::Image
    }

    async fn convert(&self, request: ConversionRequest) -> ConversionResult {
        let start = Instant::now();
        let outcome = self.run(&request).await;
        finish(ConversionCategory::Image, &request, start, outcome)
    }
}

fn transcode(
    input: &Path,
    output: &Path,
    target: FileType,
    options: &ImageOptions,
) -> Result<(), ConverterError> {
    // Decode by content, not by extension.
    let image = ImageReader::open(input)?.with_guessed_format()?.decode()?;
    debug!(
        input = %input.display(),
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        "Decoded image"
    );

    // Encode in memory so a failed encode never leaves a partial output file.
    let bytes = encode(image, target, options)?;
    if let Err(e) = std::fs::write(output, &bytes) {
        let _ = std::fs::remove_file(output);
        return Err(e.into());
    }
    Ok(())
}

fn encode(
    image: DynamicImage,
    target: FileType,
    options: &ImageOptions,
) -> Result<Vec<u8>, ConverterError> {
    let mut buffer = Cursor::new(Vec::new());
    match target {
        FileType::Jpeg => {
            let mut encoder =
                JpegEncoder::new_with_quality(&mut buffer, options.quality_or_default());
            encoder.encode_image(&image.to_rgb8())?;
        }
        FileType::Png => widen_float(image).write_to(&mut buffer, ImageFormat::Png)?,
        FileType::Tiff => for_tiff(image).write_to(&mut buffer, ImageFormat::Tiff)?,
        FileType::Bmp => normalise(image).write_to(&mut buffer, ImageFormat::Bmp)?,
        FileType::Gif => normalise(image).write_to(&mut buffer, ImageFormat::Gif)?,
        FileType::Webp => return encode_webp(image, options.quality_or_default()),
        other => {
            return Err(ConverterError::UnsupportedTargetFormat {
                format: other,
                category: ConversionCategory::Image,
            })
        }
    }
    Ok(buffer.into_inner())
}

/// Lossy WebP at the requested quality.
fn encode_webp(image: DynamicImage, quality: u8) -> Result<Vec<u8>, ConverterError> {
    let (width, height) = (image.width(), image.height());
    if width > WEBP_MAX_DIMENSION || height > WEBP_MAX_DIMENSION {
        return Err(ConverterError::conversion_failed(
            format!(
                "{}x{} exceeds the WebP limit of {} pixels per side",
                width, height, WEBP_MAX_DIMENSION
            ),
            None,
        ));
    }

    let pixels = normalise(image);
    let encoder = match &pixels {
        DynamicImage::ImageRgba8(rgba) => WebPEncoder::from_rgba(rgba.as_raw(), width, height),
        other => WebPEncoder::from_rgb(other.as_bytes(), width, height),
    };
    let encoded = encoder
        .encode_simple(false, f32::from(quality))
        .map_err(|e| {
            ConverterError::conversion_failed(format!("WebP encoding failed: {:?}", e), None)
        })?;
    Ok(encoded.to_vec())
}

/// Reduces an image to 8-bit RGB, or RGBA when it carries alpha.
fn normalise(image: DynamicImage) -> DynamicImage {
    if image.color().has_alpha() {
        DynamicImage::ImageRgba8(image.into_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.into_rgb8())
    }
}

/// Maps floating point pixels to 16-bit RGB(A), which the PNG encoder accepts.
fn widen_float(image: DynamicImage) -> DynamicImage {
    match image.color() {
        ColorType::Rgb32F => DynamicImage::ImageRgb16(image.into_rgb16()),
        ColorType::Rgba32F => DynamicImage::ImageRgba16(image.into_rgba16()),
        _ => image,
    }
}

/// The TIFF encoder has no grey+alpha or float variants.
fn for_tiff(image: DynamicImage) -> DynamicImage {
    match image.color() {
        ColorType::La8 => DynamicImage::ImageRgba8(image.into_rgba8()),
        ColorType::La16 => DynamicImage::ImageRgba16(image.into_rgba16()),
        _ => widen_float(image),
    }
}

/// Output path with the target format's default extension, used by callers
/// that only know the target format.
pub fn output_path_for(input: &Path, target: FileType) -> Option<PathBuf> {
    target
        .extension()
        .map(|extension| input.with_extension(extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::types::ConversionOptions;
    use crate::converter::AudioOptions;
    use image::{GrayAlphaImage, LumaA, Rgb, Rgb32FImage, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let image = RgbImage::from_fn(8, 6, |x, y| Rgb([(x * 30) as u8, (y * 40) as u8, 128]));
        image.save_with_format(&path, ImageFormat::Png).unwrap();
        path
    }

    #[tokio::test]
    async fn test_converts_to_every_image_format() {
        let dir = TempDir::new().unwrap();
        let input = write_png(dir.path(), "source.png");
        let converter = ImageConverter::default();

        for target in ConversionCategory::Image.supported_formats() {
            let output = output_path_for(&dir.path().join("out/result"), *target).unwrap();
            let result = converter
                .convert(ConversionRequest::new(&input, &output, *target))
                .await;

            assert!(result.success, "{}: {}", target, result.message);
            assert_eq!(
                result.message,
                format!("Successfully converted image to {}", target)
            );
            assert_eq!(result.output_path.as_deref(), Some(output.as_path()));

            let decoded = ImageReader::open(&output)
                .unwrap()
                .with_guessed_format()
                .unwrap()
                .decode()
                .unwrap();
            assert_eq!((decoded.width(), decoded.height()), (8, 6), "{}", target);
        }
    }

    #[tokio::test]
    async fn test_decodes_by_content() {
        let dir = TempDir::new().unwrap();
        // PNG bytes behind a .jpg name.
        let input = write_png(dir.path(), "mislabelled.jpg");
        let output = dir.path().join("fixed.bmp");

        let result = ImageConverter::default()
            .convert(ConversionRequest::new(&input, &output, FileType::Bmp))
            .await;
        assert!(result.success, "{}", result.message);
        assert!(output.exists());
    }

    #[tokio::test]
    async fn test_alpha_survives_webp() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("alpha.png");
        RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 40]))
            .save_with_format(&input, ImageFormat::Png)
            .unwrap();
        let output = dir.path().join("alpha.webp");

        let result = ImageConverter::default()
            .convert(ConversionRequest::new(&input, &output, FileType::Webp))
            .await;
        assert!(result.success, "{}", result.message);

        let decoded = image::open(&output).unwrap();
        assert!(decoded.color().has_alpha());
    }

    #[tokio::test]
    async fn test_quality_changes_lossy_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("noise.png");
        RgbImage::from_fn(64, 64, |x, y| {
            Rgb([(x * 7 + y * 13) as u8, (x * y) as u8, (x ^ y) as u8])
        })
        .save_with_format(&input, ImageFormat::Png)
        .unwrap();

        let converter = ImageConverter::default();
        for target in [FileType::Jpeg, FileType::Webp] {
            let low = output_path_for(&dir.path().join("low"), target).unwrap();
            let high = output_path_for(&dir.path().join("high"), target).unwrap();
            for (path, quality) in [(&low, 10), (&high, 95)] {
                let options = ImageOptions::with_quality(quality).unwrap();
                let result = converter
                    .convert(
                        ConversionRequest::new(&input, path, target)
                            .with_options(ConversionOptions::Image(options)),
                    )
                    .await;
                assert!(result.success, "{}: {}", target, result.message);
            }

            let low_size = std::fs::metadata(&low).unwrap().len();
            let high_size = std::fs::metadata(&high).unwrap().len();
            assert!(low_size < high_size, "{}: {} >= {}", target, low_size, high_size);
        }
    }

    #[tokio::test]
    async fn test_converts_unusual_color_types() {
        let dir = TempDir::new().unwrap();
        let converter = ImageConverter::default();

        let grey_alpha = dir.path().join("grey_alpha.png");
        GrayAlphaImage::from_fn(5, 4, |x, y| LumaA([(x * 40) as u8, (y * 60) as u8]))
            .save_with_format(&grey_alpha, ImageFormat::Png)
            .unwrap();

        let float = dir.path().join("float.tiff");
        DynamicImage::ImageRgb32F(Rgb32FImage::from_fn(5, 4, |x, y| {
            Rgb([x as f32 / 5.0, y as f32 / 4.0, 0.5])
        }))
        .save_with_format(&float, ImageFormat::Tiff)
        .unwrap();

        for input in [grey_alpha.as_path(), float.as_path()] {
            for target in ConversionCategory::Image.supported_formats() {
                let stem = input.file_stem().unwrap().to_str().unwrap();
                let output =
                    output_path_for(&dir.path().join("out").join(stem), *target).unwrap();
                let result = converter
                    .convert(ConversionRequest::new(input, &output, *target))
                    .await;
                assert!(
                    result.success,
                    "{} -> {}: {}",
                    input.display(),
                    target,
                    result.message
                );
                let decoded = image::open(&output).unwrap();
                assert_eq!((decoded.width(), decoded.height()), (5, 4));
            }
        }
    }

    #[tokio::test]
    async fn test_failed_encode_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("wide.png");
        RgbImage::from_pixel(WEBP_MAX_DIMENSION + 1, 1, Rgb([1, 2, 3]))
            .save_with_format(&input, ImageFormat::Png)
            .unwrap();
        let output = dir.path().join("wide.webp");

        let result = ImageConverter::default()
            .convert(ConversionRequest::new(&input, &output, FileType::Webp))
            .await;
        assert!(!result.success);
        assert!(result.message.starts_with("Failed to convert image: "));
        assert!(result.message.contains("WebP limit"));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_validation_failures() {
        let dir = TempDir::new().unwrap();
        let input = write_png(dir.path(), "source.png");
        let converter = ImageConverter::default();

        let result = converter
            .convert(ConversionRequest::new("", "out.png", FileType::Png))
            .await;
        assert_eq!(result.message, "Invalid input or output path");

        let result = converter
            .convert(ConversionRequest::new(&input, "out.mp3", FileType::Mp3))
            .await;
        assert_eq!(
            result.message,
            "Unsupported target format for image conversion: Mp3"
        );

        let result = converter
            .convert(
                ConversionRequest::new(&input, dir.path().join("x.png"), FileType::Png)
                    .with_options(ConversionOptions::Audio(AudioOptions::default())),
            )
            .await;
        assert!(matches!(
            result.error,
            Some(ConverterError::InvalidOptions { .. })
        ));
        assert!(!dir.path().join("x.png").exists());

        let missing = dir.path().join("missing.png");
        let result = converter
            .convert(ConversionRequest::new(&missing, "out.png", FileType::Png))
            .await;
        assert_eq!(
            result.message,
            format!("Input file does not exist: {}", missing.display())
        );
    }

    #[tokio::test]
    async fn test_corrupt_input_is_backend_failure() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("broken.png");
        std::fs::write(&input, b"definitely not an image").unwrap();

        let result = ImageConverter::default()
            .convert(ConversionRequest::new(
                &input,
                dir.path().join("out.jpg"),
                FileType::Jpeg,
            ))
            .await;
        assert!(!result.success);
        assert!(result.message.starts_with("Failed to convert image: "));
        assert!(result.error.is_some());
    }

    #[test]
    fn test_output_path_for() {
        assert_eq!(
            output_path_for(Path::new("/photos/cat.png"), FileType::Jpeg),
            Some(PathBuf::from("/photos/cat.jpg"))
        );
        assert_eq!(output_path_for(Path::new("cat.png"), FileType::Unknown), None);
    }
}
