//! Label measuring and fitting for node boxes.
//!
//! Widths come from shaping the text with `cosmic-text` against the system
//! fonts, so kana, kanji and proportional Latin glyphs are measured as they
//! will actually be drawn. One [`FontSystem`] is loaded lazily and shared by
//! every measurement.

use std::{
    borrow::Cow,
    sync::{Mutex, OnceLock, PoisonError},
};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::{info, trace};

const ELLIPSIS: &str = "…";

/// Average advance, in ems, used when no font could shape the text.
const FALLBACK_ADVANCE: f32 = 0.55;

/// Measures rendered text widths with a shared [`FontSystem`].
struct TextMeasurer {
    font_system: Mutex<FontSystem>,
}

impl TextMeasurer {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    fn width(&self, text: &str, font_size: f32, font_family: &str) -> f32 {
        if text.is_empty() {
            return 0.0;
        }

        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let metrics = Metrics::new(font_size, font_size * 1.15);
        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(family(font_family));
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let width = buffer
            .layout_runs()
            .filter_map(|run| run.glyphs.last().map(|last| last.x + last.w))
            .fold(0.0_f32, f32::max);

        if width > 0.0 {
            width
        } else {
            trace!(text; "No glyphs shaped, using average advance");
            text.chars().count() as f32 * font_size * FALLBACK_ADVANCE
        }
    }
}

static TEXT_MEASURER: OnceLock<TextMeasurer> = OnceLock::new();

fn measurer() -> &'static TextMeasurer {
    TEXT_MEASURER.get_or_init(TextMeasurer::new)
}

/// Maps the first entry of a CSS `font-family` list onto a cosmic-text family.
fn family(font_family: &str) -> Family<'_> {
    let first = font_family
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c| c == '"' || c == '\'');
    match first {
        "" | "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        name => Family::Name(name),
    }
}

/// Rendered width of `text` in SVG user units.
pub fn measure_width(text: &str, font_size: f32, font_family: &str) -> f32 {
    measurer().width(text, font_size, font_family)
}

/// Shortens `text` with a trailing ellipsis until it fits in `max_width`.
///
/// Keeps the longest prefix whose measured width, ellipsis included, is at
/// most `max_width`. When not even the ellipsis fits, returns the ellipsis.
pub fn fit_to_width<'a>(
    text: &'a str,
    max_width: f32,
    font_size: f32,
    font_family: &str,
) -> Cow<'a, str> {
    if measure_width(text, font_size, font_family) <= max_width {
        return Cow::Borrowed(text);
    }

    let boundaries: Vec<usize> = text.char_indices().map(|(index, _)| index).collect();
    let truncated = |chars: usize| format!("{}{ELLIPSIS}", &text[..boundaries[chars]]);

    // Widest prefix length in `0..boundaries.len()` that still fits.
    let (mut low, mut high) = (0, boundaries.len() - 1);
    while low < high {
        let mid = (low + high).div_ceil(2);
        if measure_width(&truncated(mid), font_size, font_family) <= max_width {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    Cow::Owned(truncated(low))
}
