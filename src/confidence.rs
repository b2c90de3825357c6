//! Multi-signal confidence scoring and detection validation
//!
//! Combines crop ratio, centering, aspect-ratio preservation, and interior
//! edge density into a single score in [0, 1], then gates acceptance on the
//! configured thresholds. Bonus and penalty magnitudes are empirically
//! tuned against photographed artwork.

use crate::{
    config::FrameDetectionConfig,
    types::{BoundingBox, EdgeMap, ImageDimensions},
};

/// Starting score before any signal is applied
const BASE_CONFIDENCE: f64 = 0.25;

/// Crop ratio 0.5-0.85: the classic decorative-frame signature
const CLEAR_FRAME_BONUS: f64 = 0.30;
/// Crop ratio 0.3-0.5: plausible thick frame
const THICK_FRAME_BONUS: f64 = 0.15;
/// Crop ratio 0.85-0.96: plausible thin frame
const THIN_FRAME_BONUS: f64 = 0.15;
/// Crop ratio above 0.96: barely any frame to remove
const NEAR_FULL_PENALTY: f64 = -0.05;

/// Both axes within 10% of center
const CENTERED_BONUS: f64 = 0.15;
/// Both axes within 20% of center
const NEAR_CENTERED_BONUS: f64 = 0.08;
/// Either axis more than 40% off center
const OFF_CENTER_PENALTY: f64 = -0.15;

/// Aspect ratio within 10% of the original
const ASPECT_PRESERVED_BONUS: f64 = 0.15;
/// Aspect ratio within 20% of the original
const ASPECT_CLOSE_BONUS: f64 = 0.08;
/// Aspect ratio more than 30% off the original
const ASPECT_DISTORTED_PENALTY: f64 = -0.10;

/// Border fraction excluded when sampling interior edge density
const INTERIOR_BORDER_FRACTION: f64 = 0.1;
/// Interior edge fraction below this counts as "no interior structure"
const SPARSE_INTERIOR_EPSILON: f64 = 5e-4;
/// Crop ratio above which a structureless interior flags a solid-color image
const SPARSE_INTERIOR_RATIO: f64 = 0.95;
/// Penalty for the solid-color / frameless signature
const SOLID_COLOR_PENALTY: f64 = -0.20;

/// Stateless confidence scorer for candidate bounding boxes
pub struct ConfidenceScorer;

impl ConfidenceScorer {
    /// Score a candidate box against the original image and its edge map
    ///
    /// The interior edge-density signal catches the case where the
    /// boundary locator's full-extent fallback produces a valid-looking
    /// near-full-size box with no structural evidence behind it.
    #[must_use]
    pub fn score(bbox: &BoundingBox, original: ImageDimensions, edges: &EdgeMap) -> f64 {
        let crop_ratio = bbox.crop_ratio(original);

        let mut confidence = BASE_CONFIDENCE;
        confidence += Self::crop_ratio_signal(crop_ratio);
        confidence += Self::centering_signal(bbox, original);
        confidence += Self::aspect_signal(bbox, original);

        let interior = edges.interior_edge_fraction(INTERIOR_BORDER_FRACTION);
        if interior < SPARSE_INTERIOR_EPSILON && crop_ratio > SPARSE_INTERIOR_RATIO {
            confidence += SOLID_COLOR_PENALTY;
        }

        confidence.clamp(0.0, 1.0)
    }

    fn crop_ratio_signal(crop_ratio: f64) -> f64 {
        if (0.5..=0.85).contains(&crop_ratio) {
            CLEAR_FRAME_BONUS
        } else if (0.3..0.5).contains(&crop_ratio) {
            THICK_FRAME_BONUS
        } else if (0.85..=0.96).contains(&crop_ratio) {
            THIN_FRAME_BONUS
        } else if crop_ratio > 0.96 {
            NEAR_FULL_PENALTY
        } else {
            // Below 0.3: outside every bonus tier.
            0.0
        }
    }

    fn centering_signal(bbox: &BoundingBox, original: ImageDimensions) -> f64 {
        let (box_cx, box_cy) = bbox.center();
        let image_cx = f64::from(original.width) / 2.0;
        let image_cy = f64::from(original.height) / 2.0;

        if image_cx <= 0.0 || image_cy <= 0.0 {
            return 0.0;
        }

        let off_x = (box_cx - image_cx).abs() / image_cx;
        let off_y = (box_cy - image_cy).abs() / image_cy;
        let worst = off_x.max(off_y);

        if worst < 0.1 {
            CENTERED_BONUS
        } else if worst < 0.2 {
            NEAR_CENTERED_BONUS
        } else if worst > 0.4 {
            OFF_CENTER_PENALTY
        } else {
            0.0
        }
    }

    fn aspect_signal(bbox: &BoundingBox, original: ImageDimensions) -> f64 {
        let original_aspect = original.aspect_ratio();
        if original_aspect <= 0.0 {
            return 0.0;
        }

        let deviation = (original_aspect - bbox.aspect_ratio()).abs() / original_aspect;

        if deviation < 0.1 {
            ASPECT_PRESERVED_BONUS
        } else if deviation < 0.2 {
            ASPECT_CLOSE_BONUS
        } else if deviation > 0.3 {
            ASPECT_DISTORTED_PENALTY
        } else {
            0.0
        }
    }
}

/// Stateless accept/reject gate for scored candidates
pub struct DetectionValidator;

impl DetectionValidator {
    /// Accept iff the confidence clears the configured floor, the crop
    /// ratio lies within the configured band, and the box is fully inside
    /// the original image bounds
    #[must_use]
    pub fn validate(
        bbox: &BoundingBox,
        confidence: f64,
        original: ImageDimensions,
        config: &FrameDetectionConfig,
    ) -> bool {
        if confidence < config.min_confidence {
            return false;
        }

        let crop_ratio = bbox.crop_ratio(original);
        if crop_ratio < config.min_crop_percentage || crop_ratio > config.max_crop_percentage {
            return false;
        }

        bbox.width > 0 && bbox.height > 0 && bbox.contained_in(original)
    }
}
