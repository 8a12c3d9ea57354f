//! Configuration types for Threadmap layouts.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as a TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration root.
//! - [`LayoutConfig`] - The caller-settable layout constants.
//!
//! # Example
//!
//! ```
//! # use threadmap::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().top_margin(), 40.0);
//! assert!(config.layout().validate().is_ok());
//! ```

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the given layout section.
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }
}

/// Layout constants.
///
/// Missing fields in a configuration file fall back to the defaults listed on
/// each accessor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    thread_width: f32,
    column_gap: f32,
    min_gap: f32,
    root_gap: f32,
    top_margin: f32,
    default_height: f32,
    center_parents: bool,
    centering_passes: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            thread_width: 420.0,
            column_gap: 80.0,
            min_gap: 14.0,
            root_gap: 40.0,
            top_margin: 40.0,
            default_height: 200.0,
            center_parents: false,
            centering_passes: 1,
        }
    }
}

impl LayoutConfig {
    /// Width of every thread box. Default `420`.
    pub fn thread_width(&self) -> f32 {
        self.thread_width
    }

    /// Horizontal gap between depth columns. Default `80`.
    pub fn column_gap(&self) -> f32 {
        self.column_gap
    }

    /// Minimum vertical gap between threads of one column. Default `14`.
    pub fn min_gap(&self) -> f32 {
        self.min_gap
    }

    /// Vertical gap between consecutively seeded roots. Default `40`.
    pub fn root_gap(&self) -> f32 {
        self.root_gap
    }

    /// Y coordinate of the topmost thread after a recompute. Default `40`.
    pub fn top_margin(&self) -> f32 {
        self.top_margin
    }

    /// Height used when a thread cannot be measured. Default `200`.
    pub fn default_height(&self) -> f32 {
        self.default_height
    }

    /// Whether recomputes center parents over their children unless told
    /// otherwise. Default `false`.
    pub fn center_parents(&self) -> bool {
        self.center_parents
    }

    /// Number of centering rounds run when centering is enabled. Default `1`.
    pub fn centering_passes(&self) -> usize {
        self.centering_passes
    }

    pub fn with_thread_width(mut self, width: f32) -> Self {
        self.thread_width = width;
        self
    }

    pub fn with_column_gap(mut self, gap: f32) -> Self {
        self.column_gap = gap;
        self
    }

    pub fn with_min_gap(mut self, gap: f32) -> Self {
        self.min_gap = gap;
        self
    }

    pub fn with_root_gap(mut self, gap: f32) -> Self {
        self.root_gap = gap;
        self
    }

    pub fn with_top_margin(mut self, margin: f32) -> Self {
        self.top_margin = margin;
        self
    }

    pub fn with_default_height(mut self, height: f32) -> Self {
        self.default_height = height;
        self
    }

    pub fn with_center_parents(mut self, center: bool) -> Self {
        self.center_parents = center;
        self
    }

    pub fn with_centering_passes(mut self, passes: usize) -> Self {
        self.centering_passes = passes;
        self
    }

    /// Checks that every constant is usable by the engine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if a width, gap or margin is
    /// negative or not finite, or if the default height is not positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("thread_width", self.thread_width),
            ("column_gap", self.column_gap),
            ("min_gap", self.min_gap),
            ("root_gap", self.root_gap),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "`{name}` must be a finite, non-negative number, got {value}"
                )));
            }
        }

        if !self.top_margin.is_finite() {
            return Err(ConfigError::Validation(format!(
                "`top_margin` must be finite, got {}",
                self.top_margin
            )));
        }

        if !self.default_height.is_finite() || self.default_height <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "`default_height` must be positive, got {}",
                self.default_height
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_gap_is_rejected() {
        let config = LayoutConfig::default().with_min_gap(-1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("min_gap")
        ));
    }

    #[test]
    fn test_zero_default_height_is_rejected() {
        let config = LayoutConfig::default().with_default_height(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_margin_is_rejected() {
        let config = LayoutConfig::default().with_top_margin(f32::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_top_margin_is_allowed() {
        let config = LayoutConfig::default().with_top_margin(-20.0);
        assert!(config.validate().is_ok());
    }
}
