//! Image file I/O operations service
//!
//! Separates file I/O from the detection logic so the CLI and tests share
//! one loading path. The detection core itself only sees byte slices.

use crate::error::{FrameRemovalError, Result};
use std::path::Path;

/// Service for reading and writing image files
pub struct ImageIOService;

impl ImageIOService {
    /// Read raw image bytes from a file path
    ///
    /// The bytes are not decoded here; the detector owns decoding and its
    /// graceful-failure contract.
    ///
    /// # Errors
    /// Returns `FrameRemovalError::Io` when the file is missing or
    /// unreadable.
    pub fn load_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(FrameRemovalError::file_io_error(
                "read image file",
                path_ref,
                &std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
            ));
        }

        std::fs::read(path_ref)
            .map_err(|e| FrameRemovalError::file_io_error("read image data", path_ref, &e))
    }

    /// Write encoded image bytes to a file path, creating parent
    /// directories as needed
    ///
    /// # Errors
    /// Returns `FrameRemovalError::Io` when the directory cannot be
    /// created or the file cannot be written.
    pub fn save_bytes<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
        let path_ref = path.as_ref();

        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    FrameRemovalError::file_io_error("create output directory", parent, &e)
                })?;
            }
        }

        std::fs::write(path_ref, bytes)
            .map_err(|e| FrameRemovalError::file_io_error("write image data", path_ref, &e))
    }

    /// Whether a path has a recognized image extension
    #[must_use]
    pub fn has_image_extension<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .is_some_and(|ext| {
                matches!(
                    ext.as_str(),
                    "jpg" | "jpeg" | "png" | "webp" | "bmp" | "tif" | "tiff"
                )
            })
    }
}
