//! Configuration types for frame detection and removal operations

use serde::{Deserialize, Serialize};

/// Configuration for frame detection and removal
///
/// All thresholds are resolved at construction time and stay immutable for
/// the lifetime of a [`crate::FrameDetector`]. Use the builder to override
/// individual fields over the documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameDetectionConfig {
    /// Sobel gradient-magnitude threshold above which a pixel counts as an edge
    pub edge_threshold: f64,

    /// Upper gradient threshold, kept for hysteresis-style tuning; must be
    /// at least `edge_threshold`. The single-pass edge builder only consumes
    /// the lower threshold.
    pub edge_high_threshold: f64,

    /// Minimum confidence required to accept a detected frame (0.0-1.0)
    pub min_confidence: f64,

    /// Minimum accepted crop ratio, cropped area over original area (0.0-1.0)
    pub min_crop_percentage: f64,

    /// Maximum accepted crop ratio, cropped area over original area (0.0-1.0)
    pub max_crop_percentage: f64,

    /// Blur kernel size; the Gaussian sigma is derived as `kernel / 2`
    pub blur_kernel_size: u32,
}

impl Default for FrameDetectionConfig {
    fn default() -> Self {
        Self {
            edge_threshold: 50.0,
            edge_high_threshold: 150.0,
            min_confidence: 0.5,
            min_crop_percentage: 0.3,
            max_crop_percentage: 0.99,
            blur_kernel_size: 5,
        }
    }
}

impl FrameDetectionConfig {
    /// Create a new configuration builder for fluent API construction
    ///
    /// # Examples
    ///
    /// ```rust
    /// use artframe::FrameDetectionConfig;
    ///
    /// let config = FrameDetectionConfig::builder()
    ///     .min_confidence(0.6)
    ///     .edge_threshold(40.0)
    ///     .build()
    ///     .unwrap();
    /// ```
    #[must_use]
    pub fn builder() -> FrameDetectionConfigBuilder {
        FrameDetectionConfigBuilder::default()
    }

    /// Gaussian blur sigma derived from the configured kernel size
    #[must_use]
    pub fn blur_sigma(&self) -> f32 {
        self.blur_kernel_size as f32 / 2.0
    }

    /// Validate all configuration parameters
    ///
    /// Invalid threshold combinations are reported here, at construction
    /// time, rather than surfacing as confusing rejections on first use.
    ///
    /// # Errors
    /// - `min_crop_percentage` greater than `max_crop_percentage`
    /// - crop percentages outside (0.0, 1.0]
    /// - `min_confidence` outside [0.0, 1.0]
    /// - non-positive `edge_threshold`, or `edge_high_threshold` below it
    /// - zero `blur_kernel_size`
    pub fn validate(&self) -> crate::Result<()> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(crate::error::FrameRemovalError::config_value_error(
                "min_confidence",
                self.min_confidence,
                "0.0-1.0",
                Some(0.5),
            ));
        }

        if self.min_crop_percentage <= 0.0 || self.min_crop_percentage > 1.0 {
            return Err(crate::error::FrameRemovalError::config_value_error(
                "min_crop_percentage",
                self.min_crop_percentage,
                "0.0-1.0 exclusive of 0",
                Some(0.3),
            ));
        }

        if self.max_crop_percentage <= 0.0 || self.max_crop_percentage > 1.0 {
            return Err(crate::error::FrameRemovalError::config_value_error(
                "max_crop_percentage",
                self.max_crop_percentage,
                "0.0-1.0 exclusive of 0",
                Some(0.99),
            ));
        }

        if self.min_crop_percentage > self.max_crop_percentage {
            return Err(crate::error::FrameRemovalError::invalid_config(format!(
                "min_crop_percentage ({}) must not exceed max_crop_percentage ({})",
                self.min_crop_percentage, self.max_crop_percentage
            )));
        }

        if self.edge_threshold <= 0.0 {
            return Err(crate::error::FrameRemovalError::config_value_error(
                "edge_threshold",
                self.edge_threshold,
                "> 0.0",
                Some(50.0),
            ));
        }

        if self.edge_high_threshold < self.edge_threshold {
            return Err(crate::error::FrameRemovalError::invalid_config(format!(
                "edge_high_threshold ({}) must be at least edge_threshold ({})",
                self.edge_high_threshold, self.edge_threshold
            )));
        }

        if self.blur_kernel_size == 0 {
            return Err(crate::error::FrameRemovalError::config_value_error(
                "blur_kernel_size",
                self.blur_kernel_size,
                ">= 1",
                Some(5),
            ));
        }

        Ok(())
    }
}

/// Builder for `FrameDetectionConfig`
#[derive(Debug, Default)]
pub struct FrameDetectionConfigBuilder {
    config: FrameDetectionConfig,
}

impl FrameDetectionConfigBuilder {
    /// Set the Sobel gradient-magnitude edge threshold
    #[must_use]
    pub fn edge_threshold(mut self, threshold: f64) -> Self {
        self.config.edge_threshold = threshold;
        self
    }

    /// Set the upper gradient threshold
    #[must_use]
    pub fn edge_high_threshold(mut self, threshold: f64) -> Self {
        self.config.edge_high_threshold = threshold;
        self
    }

    /// Set the minimum confidence required to accept a detection
    #[must_use]
    pub fn min_confidence(mut self, confidence: f64) -> Self {
        self.config.min_confidence = confidence;
        self
    }

    /// Set the minimum accepted crop ratio
    #[must_use]
    pub fn min_crop_percentage(mut self, ratio: f64) -> Self {
        self.config.min_crop_percentage = ratio;
        self
    }

    /// Set the maximum accepted crop ratio
    #[must_use]
    pub fn max_crop_percentage(mut self, ratio: f64) -> Self {
        self.config.max_crop_percentage = ratio;
        self
    }

    /// Set the blur kernel size (sigma is derived as `kernel / 2`)
    #[must_use]
    pub fn blur_kernel_size(mut self, kernel: u32) -> Self {
        self.config.blur_kernel_size = kernel;
        self
    }

    /// Build and validate the configuration
    ///
    /// # Errors
    /// Returns `FrameRemovalError::InvalidConfig` when any threshold is out
    /// of range or the crop-percentage bounds are inverted; see
    /// [`FrameDetectionConfig::validate`].
    pub fn build(self) -> crate::Result<FrameDetectionConfig> {
        let config = self.config;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FrameDetectionConfig::default();
        assert_eq!(config.edge_threshold, 50.0);
        assert_eq!(config.edge_high_threshold, 150.0);
        assert_eq!(config.min_confidence, 0.5);
        assert_eq!(config.min_crop_percentage, 0.3);
        assert_eq!(config.max_crop_percentage, 0.99);
        assert_eq!(config.blur_kernel_size, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blur_sigma_derivation() {
        let config = FrameDetectionConfig::default();
        assert!((config.blur_sigma() - 2.5).abs() < f32::EPSILON);

        let config = FrameDetectionConfig::builder()
            .blur_kernel_size(9)
            .build()
            .unwrap();
        assert!((config.blur_sigma() - 4.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_config_builder_chaining() {
        let config = FrameDetectionConfig::builder()
            .edge_threshold(30.0)
            .edge_high_threshold(90.0)
            .min_confidence(0.7)
            .min_crop_percentage(0.2)
            .max_crop_percentage(0.95)
            .blur_kernel_size(3)
            .build()
            .unwrap();

        assert_eq!(config.edge_threshold, 30.0);
        assert_eq!(config.edge_high_threshold, 90.0);
        assert_eq!(config.min_confidence, 0.7);
        assert_eq!(config.min_crop_percentage, 0.2);
        assert_eq!(config.max_crop_percentage, 0.95);
        assert_eq!(config.blur_kernel_size, 3);
    }

    #[test]
    fn test_inverted_crop_bounds_rejected() {
        let result = FrameDetectionConfig::builder()
            .min_crop_percentage(0.9)
            .max_crop_percentage(0.5)
            .build();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("min_crop_percentage"));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert!(FrameDetectionConfig::builder()
            .min_confidence(1.5)
            .build()
            .is_err());
        assert!(FrameDetectionConfig::builder()
            .min_crop_percentage(0.0)
            .build()
            .is_err());
        assert!(FrameDetectionConfig::builder()
            .max_crop_percentage(1.2)
            .build()
            .is_err());
        assert!(FrameDetectionConfig::builder()
            .edge_threshold(-1.0)
            .build()
            .is_err());
        assert!(FrameDetectionConfig::builder()
            .blur_kernel_size(0)
            .build()
            .is_err());
    }

    #[test]
    fn test_high_threshold_below_low_rejected() {
        let result = FrameDetectionConfig::builder()
            .edge_threshold(100.0)
            .edge_high_threshold(50.0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = FrameDetectionConfig::builder()
            .min_confidence(0.65)
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("min_confidence"));

        let deserialized: FrameDetectionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, config);
    }
}
