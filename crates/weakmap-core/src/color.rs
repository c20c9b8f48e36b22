//! Color handling for Weakmap rendering
//!
//! [`Color`] wraps the `color` crate's `DynamicColor` so mastery palettes
//! and style overrides can be written as CSS color strings and emitted back
//! into SVG attributes unchanged.

use std::{fmt, str::FromStr};

use color::DynamicColor;

/// A parsed CSS color.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Color {
    /// Parses a CSS color string (`#fee2e2`, `rgb(148, 163, 184)`, `slategray`).
    ///
    /// # Errors
    ///
    /// Returns a message naming the rejected input.
    ///
    /// # Examples
    ///
    /// ```
    /// use weakmap_core::color::Color;
    ///
    /// let weak = Color::new("#fee2e2").unwrap();
    /// let edge = Color::new("slategray").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// The color as a fragment usable inside an SVG `id`, e.g. for the
    /// arrow marker of an edge color.
    ///
    /// ```
    /// use weakmap_core::color::Color;
    ///
    /// let id = Color::new("#94a3b8").unwrap().to_id_safe_string();
    /// assert!(id.chars().all(|c| c.is_alphanumeric() || c == '_'));
    /// ```
    pub fn to_id_safe_string(self) -> String {
        let color_str = self.to_string();
        let mut sanitized = color_str
            .replace('#', "hex")
            .replace(['(', ')', ',', ' ', ';', '.', '%', '/'], "_");

        // SVG ids must start with a letter
        if sanitized.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            sanitized = format!("c_{sanitized}");
        }

        sanitized
    }

    /// Opacity between 0.0 and 1.0; arrow heads copy it into `fill-opacity`.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<Color> for svg::node::Value {
    fn from(color: Color) -> Self {
        Self::from(color.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("not-a-color").is_err());
    }

    #[test]
    fn test_color_error_names_input() {
        let err = Color::new("mauve-ish").unwrap_err();
        assert!(err.contains("mauve-ish"));
    }

    #[test]
    fn test_color_alpha() {
        assert_eq!(Color::new("#94a3b8").unwrap().alpha(), 1.0);
        assert!((Color::new("rgba(0, 0, 0, 0.5)").unwrap().alpha() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_color_into_svg_value() {
        let color = Color::new("black").unwrap();
        let value: svg::node::Value = color.into();
        assert_eq!(value.to_string(), "black");
    }

    #[test]
    fn test_color_to_id_safe_string() {
        let color = Color::new("rgb(148, 163, 184)").unwrap();
        let safe_id = color.to_id_safe_string();
        assert!(safe_id.chars().all(|c| c.is_alphanumeric() || c == '_'));
    }

    #[test]
    fn test_color_eq() {
        assert_eq!(Color::new("red").unwrap(), Color::new("red").unwrap());
        assert_ne!(Color::new("red").unwrap(), Color::new("blue").unwrap());
    }
}
