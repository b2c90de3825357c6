//! Service layer for frame detection and removal
//!
//! This module contains service structs that separate infrastructure
//! concerns (codecs, file I/O) from the detection logic, improving
//! testability and maintainability.

pub mod format;
pub mod io;

pub use format::{OutputFormatHandler, SourceFormat};
pub use io::ImageIOService;
