//! Decode and grayscale/blur preprocessing
//!
//! Pure transforms: encoded bytes in, smoothed single-channel intensity
//! buffer out. High-frequency noise that survives this stage would register
//! as spurious edges downstream.

use crate::error::{FrameRemovalError, Result};
use image::{DynamicImage, GrayImage};

/// Stateless preprocessing utilities for the detection pipeline
pub struct ImagePreprocessor;

impl ImagePreprocessor {
    /// Decode raw image bytes into a pixel buffer
    ///
    /// # Errors
    /// Returns `FrameRemovalError::Decode` when the bytes are not a
    /// decodable image or the decoded dimensions are degenerate.
    pub fn decode(image_bytes: &[u8]) -> Result<DynamicImage> {
        let image = image::load_from_memory(image_bytes).map_err(|e| {
            FrameRemovalError::decode(format!("Failed to decode image from bytes: {}", e))
        })?;

        if image.width() == 0 || image.height() == 0 {
            return Err(FrameRemovalError::decode(
                "Decoded image has zero width or height",
            ));
        }

        Ok(image)
    }

    /// Reduce an image to blurred single-channel luminance
    ///
    /// The Gaussian sigma is `blur_kernel_size / 2`, matching the smoothing
    /// the gradient threshold downstream is tuned against.
    #[must_use]
    pub fn blurred_luma(image: &DynamicImage, blur_kernel_size: u32) -> GrayImage {
        let gray = image.to_luma8();
        let sigma = blur_kernel_size as f32 / 2.0;
        if sigma <= 0.0 {
            return gray;
        }
        image::imageops::blur(&gray, sigma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn encode_png(image: &DynamicImage) -> Vec<u8> {
        let mut buffer = Vec::new();
        image
            .write_to(
                &mut std::io::Cursor::new(&mut buffer),
                image::ImageFormat::Png,
            )
            .unwrap();
        buffer
    }

    #[test]
    fn test_decode_valid_png() {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(32, 16, Rgb([10, 20, 30]));
        let bytes = encode_png(&DynamicImage::ImageRgb8(img));

        let decoded = ImagePreprocessor::decode(&bytes).unwrap();
        assert_eq!(decoded.width(), 32);
        assert_eq!(decoded.height(), 16);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = ImagePreprocessor::decode(b"definitely not an image");
        assert!(matches!(
            result.unwrap_err(),
            FrameRemovalError::Decode(_)
        ));
    }

    #[test]
    fn test_decode_empty_fails() {
        assert!(ImagePreprocessor::decode(&[]).is_err());
    }

    #[test]
    fn test_blurred_luma_dimensions_preserved() {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(40, 30, Rgb([255, 200, 100]));
        let gray = ImagePreprocessor::blurred_luma(&DynamicImage::ImageRgb8(img), 5);
        assert_eq!(gray.dimensions(), (40, 30));
    }

    #[test]
    fn test_blur_smooths_uniform_image_to_uniform() {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(20, 20, Rgb([120, 120, 120]));
        let gray = ImagePreprocessor::blurred_luma(&DynamicImage::ImageRgb8(img), 5);

        let first = gray.get_pixel(10, 10)[0];
        for pixel in gray.pixels() {
            assert!(pixel[0].abs_diff(first) <= 1);
        }
    }
}
