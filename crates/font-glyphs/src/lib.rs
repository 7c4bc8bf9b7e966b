//! Glyph store and synthesis for TrueType fonts.
//!
//! A [`GlyphStore`] is loaded from a font, extended with derived glyphs through
//! a [`Synthesizer`], and written back as glyf/loca/hmtx/post tables.

mod emit;
mod error;
mod glyph;
mod load;
mod name;
mod store;
mod synth;

pub use error::{Error, Result};
pub use glyph::{
    ComponentAnchor, ComponentFlags, ComponentRef, Composite, Glyph, GlyphBody, Metrics, Outline,
};
pub use name::GlyphName;
pub use store::GlyphStore;
pub use synth::{ScaleTransform, Synthesizer};
