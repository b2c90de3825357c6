//! Source-format detection and format-preserving re-encoding
//!
//! After a crop the output must stay in the input's encoding so a caller's
//! storage keys and content types remain valid. JPEG is re-encoded near the
//! quality ceiling and PNG with fast compression to avoid visible loss on
//! the round trip.

use crate::error::{FrameRemovalError, Result};
use image::{
    codecs::{
        jpeg::JpegEncoder,
        png::{CompressionType, FilterType, PngEncoder},
    },
    DynamicImage, ImageFormat,
};
use std::io::Cursor;

/// JPEG re-encode quality for cropped output
const JPEG_REENCODE_QUALITY: u8 = 95;

/// Image format sniffed from the input bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// JPEG input, re-encoded lossy near the quality ceiling
    Jpeg,
    /// PNG input, re-encoded lossless
    Png,
    /// WebP input, re-encoded lossless
    WebP,
    /// BMP input
    Bmp,
    /// TIFF input
    Tiff,
}

impl SourceFormat {
    /// Sniff the encoding from the leading bytes of the input
    ///
    /// Decodable formats without an encoder counterpart fall back to PNG so
    /// the crop stays lossless.
    #[must_use]
    pub fn detect(image_bytes: &[u8]) -> Option<Self> {
        match image::guess_format(image_bytes).ok()? {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::WebP => Some(Self::WebP),
            ImageFormat::Bmp => Some(Self::Bmp),
            ImageFormat::Tiff => Some(Self::Tiff),
            _ => Some(Self::Png),
        }
    }

    /// File extension (without the dot) for this format
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jpeg => write!(f, "jpeg"),
            Self::Png => write!(f, "png"),
            Self::WebP => write!(f, "webp"),
            Self::Bmp => write!(f, "bmp"),
            Self::Tiff => write!(f, "tiff"),
        }
    }
}

/// Service for re-encoding cropped images in their source format
pub struct OutputFormatHandler;

impl OutputFormatHandler {
    /// Encode an image in the given source format
    ///
    /// # Errors
    /// Returns `FrameRemovalError::Image` when the underlying encoder
    /// fails, `FrameRemovalError::Processing` when the buffer cannot be
    /// written.
    pub fn encode(image: &DynamicImage, format: SourceFormat) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);

        match format {
            SourceFormat::Jpeg => {
                // JPEG has no alpha; flatten before encoding.
                let rgb_image = image.to_rgb8();
                let mut encoder =
                    JpegEncoder::new_with_quality(&mut cursor, JPEG_REENCODE_QUALITY);
                encoder.encode_image(&rgb_image)?;
            },
            SourceFormat::Png => {
                let encoder = PngEncoder::new_with_quality(
                    &mut cursor,
                    CompressionType::Fast,
                    FilterType::Adaptive,
                );
                image.write_with_encoder(encoder)?;
            },
            SourceFormat::WebP => {
                image.write_to(&mut cursor, ImageFormat::WebP)?;
            },
            SourceFormat::Bmp => {
                image.write_to(&mut cursor, ImageFormat::Bmp)?;
            },
            SourceFormat::Tiff => {
                image.write_to(&mut cursor, ImageFormat::Tiff)?;
            },
        }

        if buffer.is_empty() {
            return Err(FrameRemovalError::processing_stage_error(
                "encode",
                "encoder produced no output",
                Some(&format!("format: {}", format)),
            ));
        }

        Ok(buffer)
    }
}
