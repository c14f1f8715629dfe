//! Static glyph-class width tables for the row fonts used on printed forms.
//!
//! Widths are in em units (relative to font size). Glyphs are bucketed into a
//! handful of classes instead of per-codepoint tables: annotation text is mostly
//! translated prose in many scripts, so a class-level estimate is as good as an
//! ASCII-exact table for deciding how many lines a row wraps to.
//!
//! Anything outside the known classes falls back to `average`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

/// Font families a form row can be rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    /// Humanist sans-serif, the default print stylesheet face.
    Sans,
    /// Transitional serif.
    Serif,
    /// Fixed pitch.
    Mono,
}

impl FromStr for FontFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sans" | "sans-serif" => Ok(FontFamily::Sans),
            "serif" => Ok(FontFamily::Serif),
            "mono" | "monospace" => Ok(FontFamily::Mono),
            other => Err(format!("unknown font family '{other}'")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Per-class glyph widths for one family, in em.
///
/// ```text
/// narrow  = i j l ! | ' . , : ;
/// wide    = m w M W @ % &
/// upper   = remaining A-Z
/// digit   = 0-9
/// lower   = remaining a-z and other alphabetic characters
/// ```
pub struct FontMetricTable {
    narrow: f32,
    lower: f32,
    upper: f32,
    digit: f32,
    wide: f32,
    pub space_width: f32,
    /// Fallback for punctuation and symbols outside the classes above.
    pub average_char_width: f32,
}

impl FontMetricTable {
    /// Width of a single glyph in em.
    pub fn char_width(&self, c: char) -> f32 {
        match c {
            ' ' | '\u{a0}' => self.space_width,
            'i' | 'j' | 'l' | '!' | '|' | '\'' | '.' | ',' | ':' | ';' => self.narrow,
            'm' | 'w' | 'M' | 'W' | '@' | '%' | '&' => self.wide,
            'A'..='Z' => self.upper,
            '0'..='9' => self.digit,
            c if c.is_alphabetic() => self.lower,
            _ => self.average_char_width,
        }
    }

    /// Rendered width of a string in em.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    /// Rendered width of a string in pixels at `font_size_px`.
    pub fn measure_px(&self, s: &str, font_size_px: f32) -> f32 {
        self.measure_str(s) * font_size_px
    }

    /// Number of lines `text` occupies when greedily word-wrapped into `max_width_px`.
    ///
    /// Hard line breaks start a new line; an empty line between breaks still takes
    /// up one line. A single word wider than the box is kept on its own line and
    /// overflows horizontally. Empty text occupies zero lines.
    pub fn wrapped_lines(&self, text: &str, max_width_px: f32, font_size_px: f32) -> u32 {
        if text.trim().is_empty() {
            return 0;
        }

        let space_px = self.space_width * font_size_px;
        let mut lines = 0u32;

        for paragraph in text.split('\n') {
            lines += 1;
            let mut current_width = 0.0_f32;
            let mut first_on_line = true;

            for word in paragraph.split_whitespace() {
                let word_px = self.measure_px(word, font_size_px);
                if first_on_line {
                    current_width = word_px;
                    first_on_line = false;
                } else if current_width + space_px + word_px > max_width_px {
                    lines += 1;
                    current_width = word_px;
                } else {
                    current_width += space_px + word_px;
                }
            }
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static tables
// ────────────────────────────────────────────────────────────────────────────

static SANS_TABLE: FontMetricTable = FontMetricTable {
    narrow: 0.24,
    lower: 0.53,
    upper: 0.64,
    digit: 0.56,
    wide: 0.83,
    space_width: 0.27,
    average_char_width: 0.45,
};

/// Serif faces run roughly 8% narrower than the sans table.
static SERIF_TABLE: FontMetricTable = FontMetricTable {
    narrow: 0.25,
    lower: 0.47,
    upper: 0.63,
    digit: 0.50,
    wide: 0.76,
    space_width: 0.25,
    average_char_width: 0.42,
};

static MONO_TABLE: FontMetricTable = FontMetricTable {
    narrow: 0.60,
    lower: 0.60,
    upper: 0.60,
    digit: 0.60,
    wide: 0.60,
    space_width: 0.60,
    average_char_width: 0.60,
};

/// Returns the static metric table for a font family.
pub fn get_metrics(font: FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Sans => &SANS_TABLE,
        FontFamily::Serif => &SERIF_TABLE,
        FontFamily::Mono => &MONO_TABLE,
    }
}
