//! Recipes: one per kind of font the tool produces.

mod chem;
mod fasta;
mod liga;
mod remap;
mod script;
mod tint;

use std::collections::HashSet;

use anyhow::Result;
use scriptify_font_glyphs::{GlyphName, GlyphStore, Synthesizer};
use scriptify_font_rules::ScriptForm;

pub use chem::build_chem;
pub use fasta::build_fasta;
pub use liga::build_liga;
pub use remap::remap_palette_text;
pub use script::build_script;
pub use tint::build_tint;

use crate::config::ScriptStyle;

/// Characters from `chars` the font maps, paired with their glyphs; a glyph
/// reached through several characters is kept once, at its first character.
fn mapped_chars(
    store: &GlyphStore,
    chars: impl IntoIterator<Item = char>,
) -> Vec<(char, GlyphName)> {
    let mut seen = HashSet::new();
    let mut mapped = Vec::new();
    for ch in chars {
        if let Some(glyph) = store.glyph_for_char(ch)
            && seen.insert(glyph)
        {
            mapped.push((ch, glyph.clone()));
        }
    }
    mapped
}

/// Derive scaled script forms of `bases`.
///
/// A bracketed run gets `{tag}c` chain forms plus `{tag}1` clones for a lone
/// first character; an unbounded run gets a single `{tag}` form.
fn script_forms(
    store: &mut GlyphStore,
    bases: &[GlyphName],
    tag: &str,
    style: ScriptStyle,
    bracketed: bool,
) -> Result<Vec<ScriptForm>> {
    let transform = style.transform(store.units_per_em());
    let mut synth = Synthesizer::new(store);
    let mut forms = Vec::with_capacity(bases.len());
    for base in bases {
        let form = if bracketed {
            let chain =
                synth.derive_transformed(base, base.with_suffix(&format!("{tag}c")), transform)?;
            let first = synth.derive_composite(&chain, base.with_suffix(&format!("{tag}1")))?;
            ScriptForm {
                base: base.clone(),
                chain,
                first: Some(first),
            }
        } else {
            let chain = synth.derive_transformed(base, base.with_suffix(tag), transform)?;
            ScriptForm {
                base: base.clone(),
                chain,
                first: None,
            }
        };
        forms.push(form);
    }
    Ok(forms)
}
