//! Image file loading for templates and captured drawings
//!
//! Decodes common raster formats through the `image` crate and binarizes
//! them into ink rasters.
//!
//! ## Supported Formats
//!
//! - JPEG, PNG, GIF (first frame), WebP, TIFF, BMP
//!
//! ## Design
//!
//! Every image is decoded to RGBA so that transparent canvases (the usual
//! export of a whiteboard capture) and opaque scans go through the same
//! ink test: opaque enough, and not background-colored.

use std::path::Path;

use image::{ImageReader, RgbaImage};

use crate::config::NormalizationConfig;
use crate::error::{EvaluationError, Result};
use crate::raster::{ink_mask, BinaryRaster};

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG image
    Jpeg,
    /// PNG image
    Png,
    /// GIF image (first frame only)
    Gif,
    /// WebP image
    WebP,
    /// TIFF image
    Tiff,
    /// BMP image
    Bmp,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    /// Whether the format can carry an alpha channel
    pub fn supports_alpha(&self) -> bool {
        matches!(
            self,
            ImageFormat::Png | ImageFormat::Gif | ImageFormat::WebP | ImageFormat::Tiff
        )
    }
}

/// Load an image from disk as 8-bit RGBA
///
/// # Errors
///
/// Returns `EvaluationError::ImageLoadError` if:
/// - The extension is not a supported format
/// - File cannot be opened
/// - Decoding fails
///
/// # Example
///
/// ```rust,no_run
/// use sketch_judge::image_loader::load_image;
/// use std::path::Path;
///
/// let image = load_image(Path::new("template.png"))?;
/// println!("Loaded image: {}x{}", image.width(), image.height());
/// # Ok::<(), sketch_judge::EvaluationError>(())
/// ```
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    if ImageFormat::from_extension(path).is_none() {
        return Err(EvaluationError::ImageLoadError {
            message: format!("Unknown image format for file: {}", path.display()),
            source: None,
        });
    }

    let reader = ImageReader::open(path).map_err(|e| {
        EvaluationError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;

    let decoded = reader.decode().map_err(|e| {
        EvaluationError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    tracing::debug!(
        path = %path.display(),
        width = decoded.width(),
        height = decoded.height(),
        "decoded image"
    );
    Ok(decoded.to_rgba8())
}

/// Load an image and binarize it with the configured ink thresholds
pub fn load_ink_raster(path: &Path, config: &NormalizationConfig) -> Result<BinaryRaster> {
    let image = load_image(path)?;
    Ok(ink_mask(
        &image,
        config.ink_alpha_threshold,
        config.ink_brightness_threshold,
    ))
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["jpg", "jpeg", "png", "gif", "webp", "tiff", "tif", "bmp"]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ImageFormat::from_extension(Path::new("shape.jpg")),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_extension(Path::new("shape.JPEG")),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_extension(Path::new("shape.png")),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_extension(Path::new("shape.tif")),
            Some(ImageFormat::Tiff)
        );
        assert_eq!(ImageFormat::from_extension(Path::new("shape.heic")), None);
        assert_eq!(ImageFormat::from_extension(Path::new("shape")), None);
    }

    #[test]
    fn test_alpha_support() {
        assert!(ImageFormat::Png.supports_alpha());
        assert!(!ImageFormat::Jpeg.supports_alpha());
        assert!(!ImageFormat::Bmp.supports_alpha());
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_extension("png"));
        assert!(is_supported_extension("JPG"));
        assert!(is_supported_extension("webp"));
        assert!(!is_supported_extension("heic"));
        assert!(!is_supported_extension("svg"));
    }

    #[test]
    fn test_unknown_format_is_load_error() {
        let result = load_image(Path::new("drawing.svg"));
        assert!(matches!(result, Err(EvaluationError::ImageLoadError { .. })));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let result = load_image(Path::new("no/such/template.png"));
        assert!(matches!(result, Err(EvaluationError::ImageLoadError { .. })));
    }

    #[test]
    fn test_png_roundtrip_to_ink_raster() {
        let path = std::env::temp_dir().join(format!("sketch_judge_ink_{}.png", std::process::id()));

        // Transparent canvas with an opaque dark bar and a translucent dark bar
        let mut image = RgbaImage::from_pixel(20, 10, Rgba([0, 0, 0, 0]));
        for x in 2..18 {
            image.put_pixel(x, 3, Rgba([10, 10, 10, 255]));
            image.put_pixel(x, 7, Rgba([10, 10, 10, 40]));
        }
        image.save(&path).unwrap();

        let raster = load_ink_raster(&path, &NormalizationConfig::default()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(raster.dimensions(), (20, 10));
        assert_eq!(raster.count_ink(), 16);
        assert!(raster.get(5, 3));
        assert!(!raster.get(5, 7));
    }
}
