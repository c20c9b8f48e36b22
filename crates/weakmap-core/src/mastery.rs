//! Mastery score bands.
//!
//! Mastery is an opaque 0–100 score supplied by the surrounding application.
//! The map only classifies it into coarse [`MasteryBand`]s, each of which
//! carries a [`BandPalette`] used by renderers to color the topic box.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Coarse classification of a 0–100 mastery score.
///
/// | band         | range     |
/// |--------------|-----------|
/// | `Weak`       | `< 60`    |
/// | `Developing` | `60..75`  |
/// | `Proficient` | `75..85`  |
/// | `Mastered`   | `>= 85`   |
/// | `Unknown`    | no score  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryBand {
    Weak,
    Developing,
    Proficient,
    Mastered,
    Unknown,
}

impl MasteryBand {
    /// All bands in legend order.
    pub const ALL: [MasteryBand; 5] = [
        MasteryBand::Weak,
        MasteryBand::Developing,
        MasteryBand::Proficient,
        MasteryBand::Mastered,
        MasteryBand::Unknown,
    ];

    /// Classifies an optional mastery score.
    ///
    /// # Examples
    ///
    /// ```
    /// use weakmap_core::mastery::MasteryBand;
    ///
    /// assert_eq!(MasteryBand::from_mastery(Some(59)), MasteryBand::Weak);
    /// assert_eq!(MasteryBand::from_mastery(Some(60)), MasteryBand::Developing);
    /// assert_eq!(MasteryBand::from_mastery(Some(85)), MasteryBand::Mastered);
    /// assert_eq!(MasteryBand::from_mastery(None), MasteryBand::Unknown);
    /// ```
    pub fn from_mastery(mastery: Option<u8>) -> Self {
        match mastery {
            None => Self::Unknown,
            Some(m) if m < 60 => Self::Weak,
            Some(m) if m < 75 => Self::Developing,
            Some(m) if m < 85 => Self::Proficient,
            Some(_) => Self::Mastered,
        }
    }

    /// Short legend label for the band's score range.
    pub fn range_label(self) -> &'static str {
        match self {
            Self::Weak => "<60%",
            Self::Developing => "60–75%",
            Self::Proficient => "75–85%",
            Self::Mastered => "85%+",
            Self::Unknown => "n/a",
        }
    }

    /// The built-in palette for this band.
    pub fn default_palette(self) -> BandPalette {
        let (fill, stroke, text) = match self {
            Self::Weak => ("#fee2e2", "#fca5a5", "#b91c1c"),
            Self::Developing => ("#ffedd5", "#fdba74", "#c2410c"),
            Self::Proficient => ("#fef9c3", "#fde047", "#854d0e"),
            Self::Mastered => ("#dcfce7", "#86efac", "#15803d"),
            Self::Unknown => ("#f3f4f6", "#d1d5db", "#374151"),
        };
        BandPalette::new(
            Color::new(fill).expect("built-in fill is a valid CSS color"),
            Color::new(stroke).expect("built-in stroke is a valid CSS color"),
            Color::new(text).expect("built-in text color is a valid CSS color"),
        )
    }
}

impl fmt::Display for MasteryBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Weak => "weak",
            Self::Developing => "developing",
            Self::Proficient => "proficient",
            Self::Mastered => "mastered",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Fill, stroke and text colors for one mastery band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandPalette {
    fill: Color,
    stroke: Color,
    text: Color,
}

impl BandPalette {
    pub fn new(fill: Color, stroke: Color, text: Color) -> Self {
        Self { fill, stroke, text }
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn stroke(&self) -> Color {
        self.stroke
    }

    pub fn text(&self) -> Color {
        self.text
    }
}
