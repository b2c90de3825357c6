//! Core types for frame detection and removal operations

use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};

/// Pixel dimensions of an image, derived once per detection call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ImageDimensions {
    /// Create new dimensions
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Zero-by-zero dimensions, reported when even metadata could not be read
    #[must_use]
    pub fn zero() -> Self {
        Self {
            width: 0,
            height: 0,
        }
    }

    /// Total pixel count
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Width over height; 0.0 for degenerate dimensions
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            0.0
        } else {
            f64::from(self.width) / f64::from(self.height)
        }
    }

    /// Whether either dimension is zero
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for ImageDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Inferred artwork region within the original image, in pixel coordinates
///
/// Invariant for accepted detections: `x + width <= original.width` and
/// `y + height <= original.height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Region width in pixels
    pub width: u32,
    /// Region height in pixels
    pub height: u32,
}

impl BoundingBox {
    /// Create a new bounding box
    #[must_use]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Full-extent box covering the entire image (the no-crop fallback)
    #[must_use]
    pub fn full(dimensions: ImageDimensions) -> Self {
        Self {
            x: 0,
            y: 0,
            width: dimensions.width,
            height: dimensions.height,
        }
    }

    /// Region pixel count
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Box center in pixel coordinates
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            f64::from(self.x) + f64::from(self.width) / 2.0,
            f64::from(self.y) + f64::from(self.height) / 2.0,
        )
    }

    /// Width over height; 0.0 for degenerate boxes
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            0.0
        } else {
            f64::from(self.width) / f64::from(self.height)
        }
    }

    /// Cropped area over original area; 0.0 when the original is degenerate
    #[must_use]
    pub fn crop_ratio(&self, original: ImageDimensions) -> f64 {
        if original.area() == 0 {
            0.0
        } else {
            self.area() as f64 / original.area() as f64
        }
    }

    /// Whether the box lies fully inside the original image bounds
    #[must_use]
    pub fn contained_in(&self, original: ImageDimensions) -> bool {
        u64::from(self.x) + u64::from(self.width) <= u64::from(original.width)
            && u64::from(self.y) + u64::from(self.height) <= u64::from(original.height)
    }

    /// Dimensions of the region
    #[must_use]
    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height)
    }
}

/// Value marking an edge pixel in an [`EdgeMap`]
pub const EDGE_PIXEL: u8 = 255;

/// Dense binary edge mask, one byte per pixel (0 or 255)
///
/// Ephemeral: computed fresh per detection call and discarded after
/// boundary location and confidence scoring.
#[derive(Debug, Clone)]
pub struct EdgeMap {
    grid: Array2<u8>,
}

impl EdgeMap {
    /// Create an all-zero edge map with the given dimensions
    #[must_use]
    pub fn zeros(width: u32, height: u32) -> Self {
        Self {
            grid: Array2::zeros((height as usize, width as usize)),
        }
    }

    /// Wrap an existing grid (rows are image rows)
    #[must_use]
    pub fn from_grid(grid: Array2<u8>) -> Self {
        Self { grid }
    }

    /// Map width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.grid.ncols() as u32
    }

    /// Map height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.grid.nrows() as u32
    }

    /// Whether the pixel at (x, y) is marked as an edge
    #[must_use]
    pub fn is_edge(&self, x: u32, y: u32) -> bool {
        self.grid
            .get((y as usize, x as usize))
            .is_some_and(|&v| v != 0)
    }

    /// Mark the pixel at (x, y) as an edge
    pub fn set_edge(&mut self, x: u32, y: u32) {
        if let Some(v) = self.grid.get_mut((y as usize, x as usize)) {
            *v = EDGE_PIXEL;
        }
    }

    /// Count of edge pixels per row, top to bottom
    #[must_use]
    pub fn row_density(&self) -> Vec<u32> {
        self.grid
            .rows()
            .into_iter()
            .map(|row| row.iter().filter(|&&v| v != 0).count() as u32)
            .collect()
    }

    /// Count of edge pixels per column, left to right
    #[must_use]
    pub fn column_density(&self) -> Vec<u32> {
        self.grid
            .columns()
            .into_iter()
            .map(|col| col.iter().filter(|&&v| v != 0).count() as u32)
            .collect()
    }

    /// Fraction of pixels marked as edges inside the central region,
    /// excluding `border_fraction` of each dimension on every side
    ///
    /// Returns 0.0 when the interior region is empty.
    #[must_use]
    pub fn interior_edge_fraction(&self, border_fraction: f64) -> f64 {
        let (rows, cols) = self.grid.dim();
        let y_margin = (rows as f64 * border_fraction).round() as usize;
        let x_margin = (cols as f64 * border_fraction).round() as usize;

        if rows <= 2 * y_margin || cols <= 2 * x_margin {
            return 0.0;
        }

        let interior = self
            .grid
            .slice(s![y_margin..rows - y_margin, x_margin..cols - x_margin]);
        let edge_count = interior.iter().filter(|&&v| v != 0).count();
        edge_count as f64 / interior.len() as f64
    }

    /// Total count of edge pixels
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.grid.iter().filter(|&&v| v != 0).count()
    }
}

/// Per-stage timing breakdown for a detection call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionTimings {
    /// Image decode time in milliseconds
    pub decode_ms: u64,
    /// Grayscale conversion and blur time in milliseconds
    pub preprocess_ms: u64,
    /// Sobel edge-map construction time in milliseconds
    pub edge_ms: u64,
    /// Boundary location and scoring time in milliseconds
    pub locate_ms: u64,
    /// Total wall-clock time in milliseconds
    pub total_ms: u64,
}

/// Result of a frame detection call
///
/// `bounding_box` and `cropped_dimensions` are present iff `has_frame`.
/// The confidence is reported even for rejected candidates, for
/// diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameDetectionResult {
    /// Whether a frame was detected and the candidate box accepted
    pub has_frame: bool,

    /// Detection confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Inferred artwork region, present iff `has_frame`
    pub bounding_box: Option<BoundingBox>,

    /// Dimensions of the original image (0x0 when undecodable)
    pub original_dimensions: ImageDimensions,

    /// Dimensions of the accepted region, present iff `has_frame`
    pub cropped_dimensions: Option<ImageDimensions>,

    /// Per-stage timing breakdown
    pub timings: DetectionTimings,
}

impl FrameDetectionResult {
    /// Result for an accepted candidate box
    #[must_use]
    pub fn accepted(
        bounding_box: BoundingBox,
        confidence: f64,
        original_dimensions: ImageDimensions,
        timings: DetectionTimings,
    ) -> Self {
        Self {
            has_frame: true,
            confidence,
            cropped_dimensions: Some(bounding_box.dimensions()),
            bounding_box: Some(bounding_box),
            original_dimensions,
            timings,
        }
    }

    /// Result for a rejected candidate; the diagnostic confidence is kept
    #[must_use]
    pub fn rejected(
        confidence: f64,
        original_dimensions: ImageDimensions,
        timings: DetectionTimings,
    ) -> Self {
        Self {
            has_frame: false,
            confidence,
            bounding_box: None,
            original_dimensions,
            cropped_dimensions: None,
            timings,
        }
    }

    /// Result for an input that could not be decoded at all
    #[must_use]
    pub fn undecodable(timings: DetectionTimings) -> Self {
        Self::rejected(0.0, ImageDimensions::zero(), timings)
    }
}

/// Result of a frame removal call
///
/// `processed_image` is `None` both on failure and on the legitimate
/// "no frame, nothing to crop" outcome; callers distinguish the two via
/// `detection.has_frame`, not via presence of bytes alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRemovalResult {
    /// Whether the call completed without a processing failure
    pub success: bool,

    /// Cropped, re-encoded image bytes; present only when a frame was
    /// detected and the crop succeeded
    pub processed_image: Option<Vec<u8>>,

    /// The detection that drove the removal decision
    pub detection: FrameDetectionResult,

    /// Failure message when `success` is false
    pub error: Option<String>,

    /// Wall-clock time from entry to return in milliseconds
    pub processing_time_ms: u64,
}

impl FrameRemovalResult {
    /// Successful result carrying cropped bytes
    #[must_use]
    pub fn cropped(
        processed_image: Vec<u8>,
        detection: FrameDetectionResult,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            success: true,
            processed_image: Some(processed_image),
            detection,
            error: None,
            processing_time_ms,
        }
    }

    /// Successful result with nothing to crop
    #[must_use]
    pub fn no_frame(detection: FrameDetectionResult, processing_time_ms: u64) -> Self {
        Self {
            success: true,
            processed_image: None,
            detection,
            error: None,
            processing_time_ms,
        }
    }

    /// Failed result; the detection is still included for diagnostics
    #[must_use]
    pub fn failed(
        error: String,
        detection: FrameDetectionResult,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            success: false,
            processed_image: None,
            detection,
            error: Some(error),
            processing_time_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_helpers() {
        let dims = ImageDimensions::new(800, 600);
        assert_eq!(dims.area(), 480_000);
        assert!((dims.aspect_ratio() - 800.0 / 600.0).abs() < 1e-9);
        assert!(!dims.is_empty());
        assert_eq!(dims.to_string(), "800x600");

        let zero = ImageDimensions::zero();
        assert!(zero.is_empty());
        assert_eq!(zero.aspect_ratio(), 0.0);
    }

    #[test]
    fn test_bounding_box_containment() {
        let original = ImageDimensions::new(500, 500);
        let inside = BoundingBox::new(50, 50, 400, 400);
        assert!(inside.contained_in(original));

        let overflowing = BoundingBox::new(200, 200, 400, 400);
        assert!(!overflowing.contained_in(original));

        let full = BoundingBox::full(original);
        assert!(full.contained_in(original));
        assert!((full.crop_ratio(original) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounding_box_center_and_ratio() {
        let original = ImageDimensions::new(500, 500);
        let bbox = BoundingBox::new(50, 50, 400, 400);
        assert_eq!(bbox.center(), (250.0, 250.0));
        assert!((bbox.crop_ratio(original) - 0.64).abs() < 1e-9);
        assert!((bbox.aspect_ratio() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_edge_map_density() {
        let mut edges = EdgeMap::zeros(4, 3);
        edges.set_edge(0, 0);
        edges.set_edge(1, 0);
        edges.set_edge(3, 2);

        assert_eq!(edges.row_density(), vec![2, 0, 1]);
        assert_eq!(edges.column_density(), vec![1, 1, 0, 1]);
        assert_eq!(edges.edge_count(), 3);
        assert!(edges.is_edge(0, 0));
        assert!(!edges.is_edge(2, 1));
    }

    #[test]
    fn test_edge_map_out_of_bounds_is_noop() {
        let mut edges = EdgeMap::zeros(2, 2);
        edges.set_edge(10, 10);
        assert_eq!(edges.edge_count(), 0);
        assert!(!edges.is_edge(10, 10));
    }

    #[test]
    fn test_interior_edge_fraction() {
        // 20x20 map with edges only in the outer 2-pixel ring: a 10% border
        // excludes them all.
        let mut edges = EdgeMap::zeros(20, 20);
        for i in 0..20 {
            edges.set_edge(i, 0);
            edges.set_edge(i, 19);
            edges.set_edge(0, i);
            edges.set_edge(19, i);
        }
        assert_eq!(edges.interior_edge_fraction(0.1), 0.0);

        // An interior edge registers.
        edges.set_edge(10, 10);
        assert!(edges.interior_edge_fraction(0.1) > 0.0);
    }

    #[test]
    fn test_interior_fraction_degenerate_map() {
        let edges = EdgeMap::zeros(1, 1);
        assert_eq!(edges.interior_edge_fraction(0.5), 0.0);
    }

    #[test]
    fn test_detection_result_constructors() {
        let original = ImageDimensions::new(500, 500);
        let bbox = BoundingBox::new(50, 50, 400, 400);

        let accepted =
            FrameDetectionResult::accepted(bbox, 0.85, original, DetectionTimings::default());
        assert!(accepted.has_frame);
        assert_eq!(accepted.bounding_box, Some(bbox));
        assert_eq!(
            accepted.cropped_dimensions,
            Some(ImageDimensions::new(400, 400))
        );

        let rejected = FrameDetectionResult::rejected(0.3, original, DetectionTimings::default());
        assert!(!rejected.has_frame);
        assert_eq!(rejected.bounding_box, None);
        assert_eq!(rejected.cropped_dimensions, None);
        assert!((rejected.confidence - 0.3).abs() < 1e-9);

        let undecodable = FrameDetectionResult::undecodable(DetectionTimings::default());
        assert!(!undecodable.has_frame);
        assert_eq!(undecodable.confidence, 0.0);
        assert!(undecodable.original_dimensions.is_empty());
    }

    #[test]
    fn test_removal_result_serde() {
        let detection = FrameDetectionResult::rejected(
            0.4,
            ImageDimensions::new(100, 100),
            DetectionTimings::default(),
        );
        let result = FrameRemovalResult::no_frame(detection, 12);

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("has_frame"));

        let parsed: FrameRemovalResult = serde_json::from_str(&json).unwrap();
        assert!(parsed.success);
        assert!(parsed.processed_image.is_none());
        assert!(!parsed.detection.has_frame);
    }
}
