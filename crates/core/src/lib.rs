//! Scriptify core: recipes that add derived glyphs, substitution chains and
//! color tables to a TrueType font.

pub mod config;
mod context;
mod features;
pub mod io;
pub mod recipes;
mod unicode;

pub use context::{Build, BuildContext, Naming};
pub use features::compile_gsub;
pub use recipes::{
    build_chem, build_fasta, build_liga, build_script, build_tint, remap_palette_text,
};
pub use scriptify_font_color::{ByteOrder, LuminanceRange};
pub use unicode::UnicodeSelection;
