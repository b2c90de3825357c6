//! Frame boundary location from edge-density profiles
//!
//! Reduces the 2-D edge mask to two 1-D density profiles (edge counts per
//! row and per column) and scans each of the four directions for the
//! frame-to-artwork transition. The adaptive, median/max-based threshold is
//! what lets one code path handle both thin and thick frames.

use crate::types::{BoundingBox, EdgeMap, ImageDimensions};

/// A profile maximum below this carries no sustained edge signal
const MIN_PEAK_DENSITY: u32 = 5;

/// A profile average below this carries no sustained edge signal
const MIN_AVERAGE_DENSITY: f64 = 1.0;

/// Median multiplier for the adaptive peak threshold
const MEDIAN_FACTOR: f64 = 1.5;

/// Maximum-density multiplier for the adaptive peak threshold
const MAX_FACTOR: f64 = 0.3;

/// Fraction of the peak threshold a density must fall below to count as
/// the transition into the artwork interior
const FALLOFF_FACTOR: f64 = 0.4;

/// Minimum scan distance past the peak before a falloff is accepted
const MIN_STEPS_PAST_PEAK: usize = 2;

/// Stateless boundary locator over an [`EdgeMap`]
///
/// The numeric constants above are empirically tuned against photographed
/// artwork; they are not physically derived.
pub struct BoundaryLocator;

impl BoundaryLocator {
    /// Locate the candidate artwork region
    ///
    /// Every direction that yields no usable transition falls back to the
    /// outermost coordinate, i.e. no cropping on that side. A degenerate
    /// composition (crossed boundaries) likewise falls back to the full
    /// image extent.
    #[must_use]
    pub fn locate(edges: &EdgeMap) -> BoundingBox {
        let dimensions = ImageDimensions::new(edges.width(), edges.height());
        let row_density = edges.row_density();
        let col_density = edges.column_density();

        let top = Self::find_transition(row_density.iter().copied()).unwrap_or(0);
        let bottom = match Self::find_transition(row_density.iter().rev().copied()) {
            Some(pos) => row_density.len() - pos,
            None => row_density.len(),
        };
        let left = Self::find_transition(col_density.iter().copied()).unwrap_or(0);
        let right = match Self::find_transition(col_density.iter().rev().copied()) {
            Some(pos) => col_density.len() - pos,
            None => col_density.len(),
        };

        if right <= left || bottom <= top {
            return BoundingBox::full(dimensions);
        }

        BoundingBox::new(
            left as u32,
            top as u32,
            (right - left) as u32,
            (bottom - top) as u32,
        )
    }

    /// Scan one density profile (already ordered in scan direction) for the
    /// frame-to-artwork transition
    ///
    /// Returns the number of steps from the profile start to the first
    /// index past the frame peak whose density falls below the falloff
    /// threshold, or `None` when the profile carries no usable signal.
    fn find_transition(profile: impl Iterator<Item = u32>) -> Option<usize> {
        let densities: Vec<u32> = profile.collect();
        if densities.is_empty() {
            return None;
        }

        let max = *densities.iter().max()?;
        let sum: u64 = densities.iter().map(|&d| u64::from(d)).sum();
        let average = sum as f64 / densities.len() as f64;

        // Frameless/solid-color escape hatch: nothing sustained to find.
        if max < MIN_PEAK_DENSITY || average < MIN_AVERAGE_DENSITY {
            return None;
        }

        let median = Self::median(&densities);
        let threshold = (median * MEDIAN_FACTOR).max(f64::from(max) * MAX_FACTOR);

        let peak = densities
            .iter()
            .position(|&d| f64::from(d) > threshold)?;

        let falloff = threshold * FALLOFF_FACTOR;
        densities
            .iter()
            .enumerate()
            .skip(peak + MIN_STEPS_PAST_PEAK + 1)
            .find(|&(_, &d)| f64::from(d) < falloff)
            .map(|(index, _)| index)
    }

    fn median(densities: &[u32]) -> f64 {
        let mut sorted = densities.to_vec();
        sorted.sort_unstable();
        f64::from(sorted[sorted.len() / 2])
    }
}
