//! Palette files and color tables.
//!
//! Parses the tab-separated palette formats, turns glyph color assignments
//! into single-palette CPAL and version 0 COLR tables, and remaps palette
//! lightness in CIELab.

mod error;
mod layers;
mod luminance;
mod palette;

pub use error::{Error, Result};
pub use layers::ColorLayers;
pub use luminance::{Lab, LuminanceRange, LuminanceWarning, lab_to_srgb, remap, remap_palette, srgb_to_lab};
pub use palette::{ByteOrder, Color, Palette, PaletteEntry, PaletteFormat};
