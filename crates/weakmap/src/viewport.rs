//! Zoom and pan over a computed layout.
//!
//! A [`Viewport`] maps layout coordinates to screen coordinates with
//! `screen = layout * zoom + pan`. Zooming never changes the layout itself,
//! so one [`Layout`](crate::layout::Layout) serves every zoom level.

use log::warn;
use weakmap_core::geometry::{Point, Size};

use crate::config::ViewportConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f32,
    pan: Point,
    min_zoom: f32,
    max_zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&ViewportConfig::default())
    }
}

impl Viewport {
    /// A viewport at zoom 1 (or the nearest allowed zoom) with no pan.
    ///
    /// Limits that are not finite and positive fall back to the defaults,
    /// and reversed limits are swapped, so the zoom is always positive.
    pub fn new(config: &ViewportConfig) -> Self {
        let (min_zoom, max_zoom) = zoom_limits(config);
        Self {
            zoom: 1.0_f32.clamp(min_zoom, max_zoom),
            pan: Point::default(),
            min_zoom,
            max_zoom,
        }
    }

    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    /// Sets the zoom factor, clamped to the configured limits.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = self.clamp(zoom);
    }

    pub fn set_pan(&mut self, pan: Point) {
        self.pan = pan;
    }

    /// Moves the view by a screen-space offset.
    pub fn pan_by(&mut self, offset: Point) {
        self.pan = self.pan.add_point(offset);
    }

    pub fn to_screen(&self, point: Point) -> Point {
        point.scale(self.zoom).add_point(self.pan)
    }

    pub fn to_layout(&self, point: Point) -> Point {
        point.sub_point(self.pan).scale(1.0 / self.zoom)
    }

    /// Multiplies the zoom by `factor` while keeping the screen point `anchor` fixed.
    pub fn zoom_at(&mut self, anchor: Point, factor: f32) {
        let fixed = self.to_layout(anchor);
        self.zoom = self.clamp(self.zoom * factor);
        self.pan = anchor.sub_point(fixed.scale(self.zoom));
    }

    /// Zooms and pans so the whole `canvas` is visible and centered on `screen`.
    pub fn fit(&mut self, canvas: Size, screen: Size) {
        if canvas.width() <= 0.0 || canvas.height() <= 0.0 {
            self.zoom = self.clamp(1.0);
            self.pan = Point::default();
            return;
        }
        let zoom = (screen.width() / canvas.width()).min(screen.height() / canvas.height());
        self.zoom = self.clamp(zoom);
        let scaled = canvas.scale(self.zoom);
        self.pan = Point::new(
            (screen.width() - scaled.width()) / 2.0,
            (screen.height() - scaled.height()) / 2.0,
        );
    }

    fn clamp(&self, zoom: f32) -> f32 {
        if zoom.is_finite() {
            zoom.clamp(self.min_zoom, self.max_zoom)
        } else {
            self.zoom
        }
    }
}

fn zoom_limits(config: &ViewportConfig) -> (f32, f32) {
    let (min_zoom, max_zoom) = (config.min_zoom(), config.max_zoom());
    if config.validate().is_ok() {
        return (min_zoom, max_zoom);
    }

    let defaults = ViewportConfig::default();
    let usable = |zoom: f32, fallback: f32| {
        if zoom.is_finite() && zoom > 0.0 {
            zoom
        } else {
            fallback
        }
    };
    let min_zoom = usable(min_zoom, defaults.min_zoom());
    let max_zoom = usable(max_zoom, defaults.max_zoom());
    let limits = (min_zoom.min(max_zoom), min_zoom.max(max_zoom));

    warn!(
        min_zoom = config.min_zoom(),
        max_zoom = config.max_zoom();
        "Invalid zoom limits, using {}..{}", limits.0, limits.1
    );
    limits
}
