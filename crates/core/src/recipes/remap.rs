use anyhow::{Context, Result};
use log::info;
use scriptify_font_color::remap_palette;

use crate::config::RemapOptions;

/// Remap the lightness of every line of a `#RRGGBB<TAB>rest` palette file.
///
/// Out-of-range lightness is clamped and logged, never fatal.
pub fn remap_palette_text(text: &str, options: &RemapOptions) -> Result<String> {
    let (out, warnings) = remap_palette(text, &options.range).context("Invalid palette")?;
    if !warnings.is_empty() {
        info!("{} lightness warnings", warnings.len());
    }
    Ok(out)
}
