//! Configuration types for Dagscope.
//!
//! This module provides configuration structures that control how pipeline
//! graphs are laid out, drawn, styled and hit-tested. All types implement
//! [`serde::Deserialize`] for loading from external sources; every section
//! and every field is optional and falls back to its default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`LayoutConfig`] - Which [`LayoutEngine`] is used and how far apart nodes are.
//! - [`EdgeConfig`] - Edge trimming and arrowhead geometry.
//! - [`StyleConfig`] - Colors and sizes of the rendered scene.
//! - [`LocateConfig`] - Hit-testing tolerance.
//!
//! # Example
//!
//! ```
//! # use dagscope::config::AppConfig;
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [layout]
//!     engine = "sugiyama"
//!
//!     [style]
//!     highlight_color = "orange"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.layout().horizontal_spacing(), 80.0);
//! assert!(config.style().highlight_color().is_ok());
//! ```

use serde::Deserialize;

use dagscope_core::color::Color;

use crate::{
    draw::{ArrowPosition, EdgeCurveParams},
    error::LayoutError,
    layout::LayoutEngine,
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    edge: EdgeConfig,

    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    locate: LocateConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        layout: LayoutConfig,
        edge: EdgeConfig,
        style: StyleConfig,
        locate: LocateConfig,
    ) -> Self {
        Self {
            layout,
            edge,
            style,
            locate,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn edge(&self) -> &EdgeConfig {
        &self.edge
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn locate(&self) -> &LocateConfig {
        &self.locate
    }
}

/// Layout engine selection and spacing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    engine: LayoutEngine,
    horizontal_spacing: f32,
    vertical_spacing: f32,
    /// Upper bound on barycenter sweep rounds of the layered engine. Sweeping
    /// stops early once a round no longer reduces edge crossings.
    crossing_sweeps: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            engine: LayoutEngine::default(),
            horizontal_spacing: 80.0,
            vertical_spacing: 80.0,
            crossing_sweeps: 8,
        }
    }
}

impl LayoutConfig {
    /// Creates a layout configuration for `engine` with default spacing.
    pub fn new(engine: LayoutEngine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    /// Sets both spacings (builder style).
    pub fn with_spacing(mut self, horizontal: f32, vertical: f32) -> Self {
        self.horizontal_spacing = horizontal;
        self.vertical_spacing = vertical;
        self
    }

    /// Checks that both spacings are finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidSpacing`] for the first offending axis.
    pub fn validate(&self) -> Result<(), LayoutError> {
        for (axis, value) in [
            ("horizontal", self.horizontal_spacing),
            ("vertical", self.vertical_spacing),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::InvalidSpacing { axis, value });
            }
        }
        Ok(())
    }

    pub fn engine(&self) -> LayoutEngine {
        self.engine
    }

    pub fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing
    }

    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }

    pub fn crossing_sweeps(&self) -> usize {
        self.crossing_sweeps
    }
}

/// Geometry of the drawn edges.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    length_fraction: f32,
    arrow_length: f32,
    /// Half-angle of the arrowhead, in degrees.
    arrow_angle: f32,
    /// Distance kept free around each endpoint so edges stop at the marker.
    dot_size: f32,
    arrow_position: ArrowPosition,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            length_fraction: 1.0,
            arrow_length: 12.0,
            arrow_angle: 20.0,
            dot_size: 10.0,
            arrow_position: ArrowPosition::End,
        }
    }
}

impl EdgeConfig {
    /// Returns the edge curve parameters described by this section.
    pub fn curve_params(&self) -> EdgeCurveParams {
        EdgeCurveParams::default()
            .with_length_fraction(self.length_fraction)
            .with_arrow(self.arrow_length, self.arrow_angle)
            .with_dot_size(self.dot_size)
            .with_arrow_position(self.arrow_position)
    }
}

/// Visual styling of the rendered scene.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Background color of exported images; transparent when unset.
    background_color: Option<String>,
    node_color: String,
    node_stroke_color: String,
    highlight_color: String,
    edge_color: String,
    marker_size: f32,
    edge_width: f32,
    font_size: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            node_color: "rgb(200,200,200)".to_string(),
            node_stroke_color: "black".to_string(),
            highlight_color: "red".to_string(),
            edge_color: "rgb(160,160,160)".to_string(),
            marker_size: 20.0,
            edge_width: 0.75,
            font_size: 16.0,
        }
    }
}

fn parse_color(value: &str, field: &str) -> Result<Color, String> {
    Color::new(value).map_err(|err| format!("Invalid {field} in config: {err}"))
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .map(|color| parse_color(color, "background color"))
            .transpose()
    }

    /// Sets the highlight color (builder style).
    pub fn with_highlight_color(mut self, color: impl Into<String>) -> Self {
        self.highlight_color = color.into();
        self
    }

    pub fn node_color(&self) -> Result<Color, String> {
        parse_color(&self.node_color, "node color")
    }

    pub fn node_stroke_color(&self) -> Result<Color, String> {
        parse_color(&self.node_stroke_color, "node stroke color")
    }

    pub fn highlight_color(&self) -> Result<Color, String> {
        parse_color(&self.highlight_color, "highlight color")
    }

    pub fn edge_color(&self) -> Result<Color, String> {
        parse_color(&self.edge_color, "edge color")
    }

    /// Diameter of a node marker.
    pub fn marker_size(&self) -> f32 {
        self.marker_size
    }

    pub fn edge_width(&self) -> f32 {
        self.edge_width
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }
}

/// Hit-testing configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LocateConfig {
    /// Maximum distance of a coordinate pick from a node; `0` means exact match only.
    tolerance: f32,
}

impl LocateConfig {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }
}
