//! Sobel gradient-magnitude edge detection
//!
//! Builds the binary edge mask the boundary locator reduces to density
//! profiles. Deterministic O(width * height) pass over the interior pixels;
//! the 1-pixel border is never marked.

use crate::types::EdgeMap;
use image::GrayImage;

/// Stateless Sobel edge detector
pub struct SobelEdgeDetector;

impl SobelEdgeDetector {
    /// Compute a binary edge map from a blurred grayscale buffer
    ///
    /// For every interior pixel the 3x3 Sobel kernels are applied:
    ///
    /// ```text
    /// Gx: [-1 0 1; -2 0 2; -1 0 1]
    /// Gy: [-1 -2 -1; 0 0 0; 1 2 1]
    /// ```
    ///
    /// A pixel is an edge iff `sqrt(gx^2 + gy^2) > threshold`.
    #[must_use]
    pub fn detect(gray: &GrayImage, threshold: f64) -> EdgeMap {
        let (width, height) = gray.dimensions();
        let mut edges = EdgeMap::zeros(width, height);

        if width < 3 || height < 3 {
            return edges;
        }

        let raw = gray.as_raw();
        let w = width as usize;
        let at = |x: usize, y: usize| -> i32 { i32::from(raw[y * w + x]) };

        for y in 1..(height as usize - 1) {
            for x in 1..(w - 1) {
                let tl = at(x - 1, y - 1);
                let tc = at(x, y - 1);
                let tr = at(x + 1, y - 1);
                let ml = at(x - 1, y);
                let mr = at(x + 1, y);
                let bl = at(x - 1, y + 1);
                let bc = at(x, y + 1);
                let br = at(x + 1, y + 1);

                let gx = -tl + tr - 2 * ml + 2 * mr - bl + br;
                let gy = -tl - 2 * tc - tr + bl + 2 * bc + br;

                let magnitude = f64::from(gx * gx + gy * gy).sqrt();
                if magnitude > threshold {
                    edges.set_edge(x as u32, y as u32);
                }
            }
        }

        edges
    }
}
