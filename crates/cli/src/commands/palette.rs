use std::path::Path;

use anyhow::Result;
use scriptify_core::{config::RemapOptions, io::read_text, remap_palette_text};

/// Remap a palette file's lightness and return the rewritten palette text.
pub fn remap_palette_file(path: &Path, options: &RemapOptions) -> Result<String> {
    let text = read_text(path)?;
    remap_palette_text(&text, options)
}
