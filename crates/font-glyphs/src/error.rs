//! Error types for glyph store and synthesis operations.

use std::result;

use read_fonts::ReadError;
use write_fonts::BuilderError;

use crate::GlyphName;

/// Errors that can occur while loading, deriving or emitting glyphs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse font: {0}")]
    Parse(#[from] ReadError),

    #[error("failed to build font: {0}")]
    Build(#[from] BuilderError),

    #[error("failed to write glyph data: {0}")]
    Write(#[from] write_fonts::error::Error),

    /// Contour end points in a source glyph run backwards.
    #[error("glyph '{0}' has malformed contour data")]
    MalformedGlyph(GlyphName),

    #[error("font has no '{0}' table")]
    MissingTable(&'static str),

    /// A source or component glyph is not in the store.
    #[error("unknown glyph '{0}'")]
    UnknownGlyph(GlyphName),

    /// A derived glyph would overwrite a glyph that came from the font.
    #[error("derived glyph '{0}' collides with an original glyph")]
    NameCollision(GlyphName),

    /// A composite references a glyph registered after it.
    #[error("composite '{glyph}' references '{component}' which is registered later")]
    ForwardReference { glyph: GlyphName, component: GlyphName },

    #[error("composite '{0}' is part of a component cycle")]
    ComponentCycle(GlyphName),

    #[error("glyph '{0}' is wider than the coordinate range")]
    TooWide(GlyphName),

    #[error("font would have {0} glyphs, more than 65535")]
    TooManyGlyphs(usize),
}

pub type Result<T> = result::Result<T, Error>;
