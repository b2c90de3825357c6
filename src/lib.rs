#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Artframe
//!
//! A Rust library for detecting and removing decorative frames from
//! photographed artwork images using Sobel edge analysis, statistical
//! boundary inference, and a multi-signal confidence model.
//!
//! Given an encoded image, the detector decides whether the artwork is
//! enclosed by a frame, computes the bounding region of the actual
//! artwork, and — when confident — crops to that region while preserving
//! the source encoding (JPEG stays JPEG, PNG stays PNG).
//!
//! ## Features
//!
//! - **Graceful failure contract**: the public detection API never throws;
//!   undecodable inputs yield a zero-confidence, no-frame result
//! - **Adaptive boundary search**: one median/max-based threshold handles
//!   thin and thick frames without separate code paths
//! - **Format preservation**: cropped output is re-encoded in the source
//!   format at near-ceiling quality
//! - **Queue-worker glue**: job message types, storage/repository seams,
//!   and status mapping for batch processing pipelines
//! - **CLI integration**: optional command-line interface (enable with the
//!   `cli` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use artframe::{FrameDetectionConfig, FrameDetector};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = FrameDetectionConfig::builder()
//!     .min_confidence(0.5)
//!     .build()?;
//! let detector = FrameDetector::new(config)?;
//!
//! let image_bytes = std::fs::read("artwork.jpg")?;
//! let result = detector.remove_frame(&image_bytes);
//!
//! if let Some(cropped) = result.processed_image {
//!     std::fs::write("artwork_cropped.jpg", cropped)?;
//! } else if result.success {
//!     println!(
//!         "no frame found (confidence {:.2})",
//!         result.detection.confidence
//!     );
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Detection only
//!
//! ```rust,no_run
//! use artframe::FrameDetector;
//!
//! # fn example(image_bytes: Vec<u8>) {
//! let detector = FrameDetector::with_defaults();
//! let detection = detector.detect_frame(&image_bytes);
//! println!(
//!     "has_frame={} confidence={:.2}",
//!     detection.has_frame, detection.confidence
//! );
//! # }
//! ```

pub mod boundary;
#[cfg(feature = "cli")]
pub mod cli;
pub mod confidence;
pub mod config;
pub mod detector;
pub mod edges;
pub mod error;
pub mod preprocess;
pub mod services;
pub mod tracing_config;
pub mod types;
pub mod worker;

// Internal imports for lib functions
use tokio::io::AsyncRead;

// Public API exports
pub use boundary::BoundaryLocator;
pub use confidence::{ConfidenceScorer, DetectionValidator};
pub use config::{FrameDetectionConfig, FrameDetectionConfigBuilder};
pub use detector::FrameDetector;
pub use edges::SobelEdgeDetector;
pub use error::{FrameRemovalError, Result};
pub use preprocess::ImagePreprocessor;
pub use services::{ImageIOService, OutputFormatHandler, SourceFormat};
pub use types::{
    BoundingBox, DetectionTimings, EdgeMap, FrameDetectionResult, FrameRemovalResult,
    ImageDimensions,
};
pub use worker::{
    ArtworkRepository, FrameJob, FrameJobWorker, ImageStore, JobOutcome, JobStatus,
    MemoryArtworkRepository, MemoryImageStore,
};

#[cfg(feature = "cli")]
pub use tracing_config::init_cli_tracing;
pub use tracing_config::{TracingConfig, TracingFormat};

/// Detect a frame in an image provided as bytes
///
/// Convenience wrapper that builds a single-use [`FrameDetector`] from the
/// given configuration.
///
/// # Errors
/// Returns an error only when the configuration is invalid; detection
/// itself never fails (see [`FrameDetector::detect_frame`]).
pub fn detect_frame_from_bytes(
    image_bytes: &[u8],
    config: &FrameDetectionConfig,
) -> Result<FrameDetectionResult> {
    let detector = FrameDetector::new(config.clone())?;
    Ok(detector.detect_frame(image_bytes))
}

/// Detect and remove a frame from an image provided as bytes
///
/// # Errors
/// Returns an error only when the configuration is invalid; removal
/// failures surface inside the returned [`FrameRemovalResult`].
pub fn remove_frame_from_bytes(
    image_bytes: &[u8],
    config: &FrameDetectionConfig,
) -> Result<FrameRemovalResult> {
    let detector = FrameDetector::new(config.clone())?;
    Ok(detector.remove_frame(image_bytes))
}

/// Detect and remove a frame from an async reader stream
///
/// Reads the stream to its end and processes the buffered bytes; suitable
/// for network streams or large files at the orchestration layer. The
/// detection itself stays a synchronous, CPU-bound computation.
///
/// # Errors
/// Returns an error when the stream cannot be read or the configuration is
/// invalid.
pub async fn remove_frame_from_reader<R: AsyncRead + Unpin>(
    mut reader: R,
    config: &FrameDetectionConfig,
) -> Result<FrameRemovalResult> {
    let mut buffer = Vec::new();
    tokio::io::AsyncReadExt::read_to_end(&mut reader, &mut buffer)
        .await
        .map_err(|e| FrameRemovalError::processing(format!("Failed to read from stream: {}", e)))?;

    remove_frame_from_bytes(&buffer, config)
}
