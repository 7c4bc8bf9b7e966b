//! Colored ligatures from a sequence file (`#hex<TAB>seq<TAB>seq...`).
//!
//! Every item of two or more characters becomes a ligature chain; every item,
//! ligature or single character, is colored with its line's palette entry.

use anyhow::{Context, Result};
use log::info;
use scriptify_font_color::{ColorLayers, Palette, PaletteFormat};
use scriptify_font_glyphs::GlyphName;
use scriptify_font_rules::{
    FeatureTag, Role, Sequence, SequenceSet, compile_ligatures, lower_ligatures,
};

use crate::{Build, BuildContext, Naming, config::LigaOptions};

pub fn build_liga(data: &[u8], sequences: &str, options: &LigaOptions) -> Result<Build> {
    let palette = Palette::parse(sequences, PaletteFormat::ColorFirst, options.byte_order)
        .context("Invalid sequence file")?;
    let mut ctx = BuildContext::load(data, FeatureTag::Calt)?;

    let mut set = SequenceSet::new();
    for (index, entry) in palette.entries().iter().enumerate() {
        let index = u16::try_from(index).context("Too many palette entries")?;
        for item in &entry.items {
            let sequence = match item.chars().count() {
                1 => Sequence::new(item, Role::ColoredRun),
                _ => Sequence::ligature(item),
            };
            set.push(sequence.with_color(index))?;
        }
    }
    let resolved = set.resolve(&ctx.store)?;

    let chains = compile_ligatures(&mut ctx.store, &resolved, options.ligatures)?;
    lower_ligatures(&chains, &mut ctx.feature)?;

    let mut colors = ColorLayers::new(palette.colors());
    for sequence in &resolved {
        let Some(index) = sequence.color else {
            continue;
        };
        let glyph = match sequence.glyphs.as_slice() {
            [single] => single.clone(),
            glyphs => GlyphName::ligature(glyphs),
        };
        colors.assign(glyph, index)?;
    }
    info!(
        "{} ligatures, {} colored glyphs",
        chains.len(),
        colors.len()
    );
    ctx.colors = Some(colors);

    ctx.naming = Naming::Reset(options.family.clone());
    ctx.finish()
}
