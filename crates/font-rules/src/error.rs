//! Error types for sequence validation and rule compilation.

use std::result;

/// Errors raised while validating sequences or compiling them into lookups.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A character of a sequence (or one of its delimiters) has no glyph in the cmap.
    #[error("character {ch:?} in sequence {sequence:?} is not mapped by the font")]
    MissingGlyph { ch: char, sequence: String },

    #[error("sequence {0:?} is listed more than once")]
    DuplicateSequence(String),

    #[error("empty sequence")]
    EmptySequence,

    /// A rule or chain that cannot be expressed as single substitutions.
    #[error("invalid rule: {0}")]
    InvalidRule(String),

    /// A glyph class was defined twice with different members.
    #[error("glyph class @{0} redefined with different members")]
    ConflictingClass(String),

    #[error(transparent)]
    Glyphs(#[from] scriptify_font_glyphs::Error),
}

pub type Result<T> = result::Result<T, Error>;
