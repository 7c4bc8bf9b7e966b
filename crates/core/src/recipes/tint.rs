//! Per-character coloring from a `text<TAB>#hex` palette, no substitutions.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use log::{info, warn};
use scriptify_font_color::{ColorLayers, Palette, PaletteFormat};
use scriptify_font_rules::FeatureTag;

use crate::{Build, BuildContext, Naming, config::TintOptions};

pub fn build_tint(data: &[u8], palette: &str, options: &TintOptions) -> Result<Build> {
    let palette = Palette::parse(palette, PaletteFormat::TextFirst, options.byte_order)
        .context("Invalid palette map")?;
    let mut ctx = BuildContext::load(data, FeatureTag::Calt)?;

    let mut colors = ColorLayers::new(palette.colors());
    for (index, entry) in palette.entries().iter().enumerate() {
        let index = u16::try_from(index).context("Too many palette entries")?;
        for text in &entry.items {
            let cased: BTreeSet<char> = text
                .to_lowercase()
                .chars()
                .chain(text.to_uppercase().chars())
                .collect();
            for ch in cased {
                match ctx.store.glyph_for_char(ch) {
                    Some(glyph) => colors.assign(glyph.clone(), index)?,
                    None => warn!("{ch:?} is not mapped by the font, left uncolored"),
                }
            }
        }
    }
    info!("Colored {} glyphs", colors.len());
    ctx.colors = Some(colors);

    if let Some(family) = &options.family {
        ctx.naming = Naming::RenameFamily(family.clone());
    }
    ctx.finish()
}
