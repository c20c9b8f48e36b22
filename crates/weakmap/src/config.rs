//! Configuration types for Weakmap layout and rendering.
//!
//! This module provides configuration structures that control how topic
//! graphs are built, laid out and styled. All types implement
//! [`serde::Deserialize`] so the CLI can load them from TOML, and every field
//! has a default, so partial files are fine.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`GraphConfig`] - Which reference lists produce edges, consistency checking.
//! - [`LayoutConfig`] - Orientation, grid pitch and box sizes.
//! - [`ViewportConfig`] - Zoom limits.
//! - [`StyleConfig`] - Colors, legend and font for the SVG exporter.
//!
//! # Example
//!
//! ```
//! # use weakmap::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().column_pitch(), 260.0);
//! assert!(config.validate().is_ok());
//! ```

use std::{
    collections::BTreeMap,
    hash::{Hash, Hasher},
};

use serde::Deserialize;

use weakmap_core::{
    color::Color,
    geometry::{Point, Size},
    mastery::{BandPalette, MasteryBand},
};

use crate::{graph::EdgeSource, layout::Orientation};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    graph: GraphConfig,

    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    viewport: ViewportConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(
        graph: GraphConfig,
        layout: LayoutConfig,
        viewport: ViewportConfig,
        style: StyleConfig,
    ) -> Self {
        Self {
            graph,
            layout,
            viewport,
            style,
        }
    }

    pub fn graph(&self) -> &GraphConfig {
        &self.graph
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn viewport(&self) -> &ViewportConfig {
        &self.viewport
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn with_graph(mut self, graph: GraphConfig) -> Self {
        self.graph = graph;
        self
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_style(mut self, style: StyleConfig) -> Self {
        self.style = style;
        self
    }

    /// Checks every section for values that cannot produce a usable map.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending setting.
    pub fn validate(&self) -> Result<(), String> {
        self.layout.validate()?;
        self.viewport.validate()?;
        self.style.validate()
    }
}

/// Graph construction settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    edge_source: EdgeSource,
    check_consistency: bool,
}

impl GraphConfig {
    pub fn new(edge_source: EdgeSource, check_consistency: bool) -> Self {
        Self {
            edge_source,
            check_consistency,
        }
    }

    pub fn edge_source(&self) -> EdgeSource {
        self.edge_source
    }

    pub fn check_consistency(&self) -> bool {
        self.check_consistency
    }
}

/// Grid layout settings. All lengths are in layout units (SVG user units).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    orientation: Orientation,
    column_pitch: f32,
    row_pitch: f32,
    origin_x: f32,
    origin_y: f32,
    node_width: f32,
    node_height: f32,
    margin_width: f32,
    margin_height: f32,
    min_width: f32,
    min_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            column_pitch: 260.0,
            row_pitch: 84.0,
            origin_x: 16.0,
            origin_y: 16.0,
            node_width: 170.0,
            node_height: 56.0,
            margin_width: 120.0,
            margin_height: 40.0,
            min_width: 640.0,
            min_height: 320.0,
        }
    }
}

impl Hash for LayoutConfig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.orientation.hash(state);
        for value in [
            self.column_pitch,
            self.row_pitch,
            self.origin_x,
            self.origin_y,
            self.node_width,
            self.node_height,
            self.margin_width,
            self.margin_height,
            self.min_width,
            self.min_height,
        ] {
            value.to_bits().hash(state);
        }
    }
}

impl LayoutConfig {
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Distance between the left edges of neighbouring columns.
    pub fn column_pitch(&self) -> f32 {
        self.column_pitch
    }

    /// Distance between the top edges of neighbouring rows.
    pub fn row_pitch(&self) -> f32 {
        self.row_pitch
    }

    /// Top-left corner of the first node.
    pub fn origin(&self) -> Point {
        Point::new(self.origin_x, self.origin_y)
    }

    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }

    /// Space added after the last column and row.
    pub fn margin(&self) -> Size {
        Size::new(self.margin_width, self.margin_height)
    }

    pub fn min_canvas(&self) -> Size {
        Size::new(self.min_width, self.min_height)
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_pitch(mut self, column_pitch: f32, row_pitch: f32) -> Self {
        self.column_pitch = column_pitch;
        self.row_pitch = row_pitch;
        self
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin_x = origin.x();
        self.origin_y = origin.y();
        self
    }

    pub fn with_node_size(mut self, size: Size) -> Self {
        self.node_width = size.width();
        self.node_height = size.height();
        self
    }

    pub fn with_margin(mut self, margin: Size) -> Self {
        self.margin_width = margin.width();
        self.margin_height = margin.height();
        self
    }

    pub fn with_min_canvas(mut self, size: Size) -> Self {
        self.min_width = size.width();
        self.min_height = size.height();
        self
    }

    fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("column_pitch", self.column_pitch),
            ("row_pitch", self.row_pitch),
            ("node_width", self.node_width),
            ("node_height", self.node_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("layout.{name} must be a positive number, got {value}"));
            }
        }
        for (name, value) in [
            ("origin_x", self.origin_x),
            ("origin_y", self.origin_y),
            ("margin_width", self.margin_width),
            ("margin_height", self.margin_height),
            ("min_width", self.min_width),
            ("min_height", self.min_height),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("layout.{name} must not be negative, got {value}"));
            }
        }
        Ok(())
    }
}

/// Zoom limits for [`Viewport`](crate::viewport::Viewport).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    min_zoom: f32,
    max_zoom: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.25,
            max_zoom: 4.0,
        }
    }
}

impl ViewportConfig {
    pub fn new(min_zoom: f32, max_zoom: f32) -> Self {
        Self { min_zoom, max_zoom }
    }

    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if !(self.min_zoom.is_finite() && self.max_zoom.is_finite())
            || self.min_zoom <= 0.0
            || self.min_zoom > self.max_zoom
        {
            return Err(format!(
                "viewport zoom limits must satisfy 0 < min_zoom <= max_zoom, got {}..{}",
                self.min_zoom, self.max_zoom
            ));
        }
        Ok(())
    }
}

/// Color overrides for one mastery band. Unset colors keep the built-in palette.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BandStyleConfig {
    fill: Option<String>,
    stroke: Option<String>,
    text: Option<String>,
}

/// Visual styling configuration for the SVG exporter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: Option<String>,
    edge_color: Option<String>,
    show_legend: bool,
    font_family: Option<String>,
    bands: BTreeMap<MasteryBand, BandStyleConfig>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            edge_color: None,
            show_legend: true,
            font_family: None,
            bands: BTreeMap::new(),
        }
    }
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the edge [`Color`], defaulting to a neutral slate.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn edge_color(&self) -> Result<Color, String> {
        Color::new(self.edge_color.as_deref().unwrap_or("#94a3b8"))
            .map_err(|err| format!("Invalid edge color in config: {err}"))
    }

    pub fn show_legend(&self) -> bool {
        self.show_legend
    }

    pub fn font_family(&self) -> &str {
        self.font_family.as_deref().unwrap_or("sans-serif")
    }

    /// Returns the palette for `band` with configured overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be parsed.
    pub fn palette(&self, band: MasteryBand) -> Result<BandPalette, String> {
        let defaults = band.default_palette();
        let Some(overrides) = self.bands.get(&band) else {
            return Ok(defaults);
        };

        let pick = |value: &Option<String>, fallback: Color, part: &str| {
            value
                .as_deref()
                .map(Color::new)
                .transpose()
                .map(|color| color.unwrap_or(fallback))
                .map_err(|err| format!("Invalid {part} color for band `{band}` in config: {err}"))
        };

        Ok(BandPalette::new(
            pick(&overrides.fill, defaults.fill(), "fill")?,
            pick(&overrides.stroke, defaults.stroke(), "stroke")?,
            pick(&overrides.text, defaults.text(), "text")?,
        ))
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn with_legend(mut self, show_legend: bool) -> Self {
        self.show_legend = show_legend;
        self
    }

    fn validate(&self) -> Result<(), String> {
        self.background_color()?;
        self.edge_color()?;
        for band in MasteryBand::ALL {
            self.palette(band)?;
        }
        Ok(())
    }
}
