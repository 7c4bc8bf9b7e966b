//! Bracketed superscript and subscript (`^{...}`, `_{...}`, `^x`, `_x`) in `ccmp`.

use anyhow::{Result, bail};
use log::info;
use scriptify_font_glyphs::GlyphName;
use scriptify_font_rules::{Delimiters, FeatureTag, Role, Sequence, SequenceSet, compile_script};

use super::{mapped_chars, script_forms};
use crate::{
    Build, BuildContext, Naming,
    config::{CLOSE_BRACKET, OPEN_BRACKET, SUBSCRIPT_MARKER, SUPERSCRIPT_MARKER, ScriptOptions},
};

pub fn build_script(data: &[u8], options: &ScriptOptions) -> Result<Build> {
    let mut ctx = BuildContext::load(data, FeatureTag::Ccmp)?;

    let selected = options
        .unicodes
        .select(ctx.store.codepoints())
        .into_iter()
        .filter_map(char::from_u32)
        .filter(|c| ![OPEN_BRACKET, CLOSE_BRACKET].contains(c));
    let (chars, bases): (String, Vec<GlyphName>) =
        mapped_chars(&ctx.store, selected).into_iter().unzip();
    if bases.is_empty() {
        bail!("None of the selected characters is mapped by the font");
    }
    info!("Deriving script forms for {} glyphs", bases.len());

    let mut runs = SequenceSet::new();
    runs.push(
        Sequence::new(&chars, Role::Superscript).with_delimiters(Delimiters::bracketed(
            SUPERSCRIPT_MARKER,
            OPEN_BRACKET,
            CLOSE_BRACKET,
        )),
    )?;
    runs.push(
        Sequence::new(&chars, Role::Subscript).with_delimiters(Delimiters::bracketed(
            SUBSCRIPT_MARKER,
            OPEN_BRACKET,
            CLOSE_BRACKET,
        )),
    )?;
    let runs = runs.resolve(&ctx.store)?;

    let sup_forms = script_forms(&mut ctx.store, &bases, "sup", options.superscript, true)?;
    let sub_forms = script_forms(&mut ctx.store, &bases, "sub", options.subscript, true)?;
    let chains = [
        compile_script(&mut ctx.store, &runs[0], sup_forms)?,
        compile_script(&mut ctx.store, &runs[1], sub_forms)?,
    ];
    for chain in &chains {
        for lookup in chain.lower(&mut ctx.feature)?.into_lookups() {
            ctx.feature.push_lookup(lookup)?;
        }
    }

    ctx.naming = Naming::Reset(options.family.clone());
    ctx.finish()
}
