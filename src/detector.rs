//! Frame detection and removal orchestrator
//!
//! This module provides the main [`FrameDetector`] that runs the full
//! pipeline: decode, grayscale/blur, Sobel edge map, boundary location,
//! confidence scoring, validation, and (for removal) crop plus
//! format-preserving re-encode.
//!
//! The detector never propagates an error across its public boundary:
//! every call returns a fully-populated result whose fields communicate
//! success, failure, or ambiguity. Each invocation is a pure, synchronous
//! computation over one in-memory buffer; instances are cheap and hold
//! nothing but the resolved configuration, so one detector can be shared
//! freely across worker threads.

use crate::{
    boundary::BoundaryLocator,
    confidence::{ConfidenceScorer, DetectionValidator},
    config::FrameDetectionConfig,
    edges::SobelEdgeDetector,
    error::{FrameRemovalError, Result},
    preprocess::ImagePreprocessor,
    services::{OutputFormatHandler, SourceFormat},
    types::{
        BoundingBox, DetectionTimings, FrameDetectionResult, FrameRemovalResult, ImageDimensions,
    },
};
use image::DynamicImage;
use instant::Instant;
use log::debug;
use tracing::{instrument, span, Level};

/// Frame detector with immutable, pre-validated configuration
pub struct FrameDetector {
    config: FrameDetectionConfig,
}

impl FrameDetector {
    /// Create a detector from a configuration
    ///
    /// # Errors
    /// Returns `FrameRemovalError::InvalidConfig` when the configuration
    /// fails validation; see [`FrameDetectionConfig::validate`].
    pub fn new(config: FrameDetectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a detector with the documented default thresholds
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            config: FrameDetectionConfig::default(),
        }
    }

    /// Get the resolved configuration
    #[must_use]
    pub fn config(&self) -> &FrameDetectionConfig {
        &self.config
    }

    /// Detect a decorative frame in an encoded image
    ///
    /// Never panics or returns an error: an undecodable input yields
    /// `has_frame=false, confidence=0.0` with 0x0 original dimensions.
    #[instrument(skip(self, image_bytes), fields(input_bytes = image_bytes.len()))]
    pub fn detect_frame(&self, image_bytes: &[u8]) -> FrameDetectionResult {
        let total_start = Instant::now();

        match self.run_detection(image_bytes, total_start) {
            Ok((detection, _)) => detection,
            Err(e) => {
                debug!("Frame detection aborted: {}", e);
                let timings = DetectionTimings {
                    total_ms: total_start.elapsed().as_millis() as u64,
                    ..DetectionTimings::default()
                };
                FrameDetectionResult::undecodable(timings)
            },
        }
    }

    /// Detect and, when confident, remove a decorative frame
    ///
    /// When no frame is found (including the undecodable case) the call
    /// succeeds with no processed bytes: that outcome is "nothing to do",
    /// not a failure. The crop is applied to the original decoded image,
    /// not the blurred grayscale working copy, and re-encoded in the
    /// source format.
    #[instrument(skip(self, image_bytes), fields(input_bytes = image_bytes.len()))]
    pub fn remove_frame(&self, image_bytes: &[u8]) -> FrameRemovalResult {
        let total_start = Instant::now();

        let (detection, image) = match self.run_detection(image_bytes, total_start) {
            Ok(pair) => pair,
            Err(e) => {
                debug!("Frame removal found nothing to process: {}", e);
                let timings = DetectionTimings {
                    total_ms: total_start.elapsed().as_millis() as u64,
                    ..DetectionTimings::default()
                };
                let elapsed = total_start.elapsed().as_millis() as u64;
                return FrameRemovalResult::no_frame(
                    FrameDetectionResult::undecodable(timings),
                    elapsed,
                );
            },
        };

        let Some(bounding_box) = detection.bounding_box else {
            let elapsed = total_start.elapsed().as_millis() as u64;
            return FrameRemovalResult::no_frame(detection, elapsed);
        };

        let crop_result = {
            let _span = span!(
                Level::DEBUG,
                "crop_encode",
                x = bounding_box.x,
                y = bounding_box.y,
                width = bounding_box.width,
                height = bounding_box.height
            )
            .entered();
            Self::crop_and_encode(&image, bounding_box, image_bytes)
        };

        let elapsed = total_start.elapsed().as_millis() as u64;
        match crop_result {
            Ok(bytes) => FrameRemovalResult::cropped(bytes, detection, elapsed),
            Err(e) => FrameRemovalResult::failed(e.to_string(), detection, elapsed),
        }
    }

    /// Run the fallible pipeline, keeping the decoded image for a
    /// subsequent crop
    fn run_detection(
        &self,
        image_bytes: &[u8],
        total_start: Instant,
    ) -> Result<(FrameDetectionResult, DynamicImage)> {
        let mut timings = DetectionTimings::default();

        let decode_start = Instant::now();
        let image = ImagePreprocessor::decode(image_bytes)?;
        timings.decode_ms = decode_start.elapsed().as_millis() as u64;

        let original = ImageDimensions::new(image.width(), image.height());

        let gray = {
            let _span = span!(Level::DEBUG, "preprocessing", dimensions = %original).entered();
            let preprocess_start = Instant::now();
            let gray = ImagePreprocessor::blurred_luma(&image, self.config.blur_kernel_size);
            timings.preprocess_ms = preprocess_start.elapsed().as_millis() as u64;
            gray
        };

        let edges = {
            let _span = span!(Level::DEBUG, "edge_detection").entered();
            let edge_start = Instant::now();
            let edges = SobelEdgeDetector::detect(&gray, self.config.edge_threshold);
            timings.edge_ms = edge_start.elapsed().as_millis() as u64;
            edges
        };

        let locate_start = Instant::now();
        let candidate = BoundaryLocator::locate(&edges);
        let confidence = ConfidenceScorer::score(&candidate, original, &edges);
        let accepted = DetectionValidator::validate(&candidate, confidence, original, &self.config);
        timings.locate_ms = locate_start.elapsed().as_millis() as u64;
        timings.total_ms = total_start.elapsed().as_millis() as u64;

        debug!(
            "Frame detection: candidate {:?}, confidence {:.3}, accepted {}",
            candidate, confidence, accepted
        );

        let detection = if accepted {
            FrameDetectionResult::accepted(candidate, confidence, original, timings)
        } else {
            FrameDetectionResult::rejected(confidence, original, timings)
        };

        Ok((detection, image))
    }

    /// Crop the original image to the accepted box and re-encode it in the
    /// source format
    fn crop_and_encode(
        image: &DynamicImage,
        bounding_box: BoundingBox,
        original_bytes: &[u8],
    ) -> Result<Vec<u8>> {
        let format = SourceFormat::detect(original_bytes).ok_or_else(|| {
            FrameRemovalError::unsupported_format(
                "source format could not be determined for re-encoding",
            )
        })?;

        let cropped = image.crop_imm(
            bounding_box.x,
            bounding_box.y,
            bounding_box.width,
            bounding_box.height,
        );

        if cropped.width() == 0 || cropped.height() == 0 {
            return Err(FrameRemovalError::processing_stage_error(
                "crop",
                "crop produced an empty image",
                Some(&format!("box: {:?}", bounding_box)),
            ));
        }

        OutputFormatHandler::encode(&cropped, format)
    }
}
