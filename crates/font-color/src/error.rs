//! Error types for palette parsing and color table construction.

use std::result;

use scriptify_font_glyphs::GlyphName;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A palette file line that does not follow the expected layout.
    #[error("line {line}: {reason}: {text:?}")]
    MalformedColorSpec { line: usize, text: String, reason: &'static str },

    #[error("palette index {index} out of range for {len} colors")]
    PaletteIndex { index: u16, len: usize },

    #[error("palette has {0} colors, more than a CPAL table can hold")]
    TooManyColors(usize),

    #[error("glyph '{0}' has no glyph ID")]
    UnknownGlyph(GlyphName),

    #[error("lightness range {0:?} is empty")]
    EmptyRange((f64, f64)),
}

pub type Result<T> = result::Result<T, Error>;
