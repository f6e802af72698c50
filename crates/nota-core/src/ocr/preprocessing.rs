//! Image preparation before recognition.

use image::{DynamicImage, GenericImageView};
use tracing::debug;

use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Decode an uploaded photo, cap its size and optionally drop color.
pub fn prepare_image(bytes: &[u8], config: &OcrConfig) -> Result<DynamicImage, OcrError> {
    if bytes.is_empty() {
        return Err(OcrError::InvalidImage("empty upload".to_string()));
    }

    let image = image::load_from_memory(bytes)
        .map_err(|e| OcrError::InvalidImage(format!("failed to decode image: {}", e)))?;

    let (width, height) = image.dimensions();
    let (new_width, new_height) = calculate_resize_dimensions(width, height, config.max_image_size);

    let image = if (new_width, new_height) != (width, height) {
        debug!("Resizing {}x{} to {}x{}", width, height, new_width, new_height);
        image.resize_exact(new_width, new_height, image::imageops::FilterType::Lanczos3)
    } else {
        image
    };

    if config.grayscale {
        Ok(DynamicImage::ImageLuma8(image.to_luma8()))
    } else {
        Ok(image)
    }
}

/// Scale dimensions so the longer side fits `max_size`, keeping aspect ratio.
///
/// A `max_size` of zero disables resizing.
pub fn calculate_resize_dimensions(width: u32, height: u32, max_size: u32) -> (u32, u32) {
    let max_dim = width.max(height);

    if max_size == 0 || max_dim <= max_size {
        return (width, height);
    }

    let scale = max_size as f32 / max_dim as f32;
    let new_width = (width as f32 * scale) as u32;
    let new_height = (height as f32 * scale) as u32;

    (new_width.max(1), new_height.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_resize_dimensions() {
        assert_eq!(calculate_resize_dimensions(500, 300, 960), (500, 300));

        let (w, h) = calculate_resize_dimensions(1920, 1080, 960);
        assert_eq!(w, 960);
        assert!(h < 960);

        assert_eq!(calculate_resize_dimensions(4000, 3000, 0), (4000, 3000));
    }

    #[test]
    fn test_prepare_image_grayscale_and_resize() {
        let config = OcrConfig {
            max_image_size: 16,
            ..OcrConfig::default()
        };
        let image = prepare_image(&png_bytes(64, 32), &config).unwrap();

        assert_eq!(image.dimensions(), (16, 8));
        assert!(matches!(image, DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn test_prepare_image_rejects_garbage() {
        let config = OcrConfig::default();
        assert!(matches!(prepare_image(&[], &config), Err(OcrError::InvalidImage(_))));
        assert!(matches!(
            prepare_image(b"definitely not a png", &config),
            Err(OcrError::InvalidImage(_))
        ));
    }
}
