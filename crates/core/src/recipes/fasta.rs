//! FASTA coloring: residues are colored, while a header line after `>` is
//! switched to plain clones of the printable ASCII glyphs.

use anyhow::{Context, Result};
use log::info;
use scriptify_font_color::{ColorLayers, Palette, PaletteFormat};
use scriptify_font_glyphs::{GlyphName, Synthesizer};
use scriptify_font_rules::{
    Delimiters, FeatureTag, Role, ScriptForm, Sequence, SequenceSet, compile_script,
};

use super::mapped_chars;
use crate::{
    Build, BuildContext, Naming,
    config::{FastaOptions, HEADER_MARKER},
};

pub fn build_fasta(data: &[u8], palette: &str, options: &FastaOptions) -> Result<Build> {
    let palette = Palette::parse(palette, PaletteFormat::ColorFirst, options.byte_order)
        .context("Invalid palette map")?;
    let mut ctx = BuildContext::load(data, FeatureTag::Calt)?;

    let printable = FastaOptions::PLAIN_RANGE.filter_map(char::from_u32);
    let (chars, bases): (String, Vec<GlyphName>) =
        mapped_chars(&ctx.store, printable).into_iter().unzip();

    let mut set = SequenceSet::new();
    set.push(
        Sequence::new(&chars, Role::StripDecoration)
            .with_delimiters(Delimiters::marker(HEADER_MARKER)),
    )?;
    for (index, entry) in palette.entries().iter().enumerate() {
        let index = u16::try_from(index).context("Too many palette entries")?;
        for item in &entry.items {
            set.push(Sequence::new(item, Role::ColoredRun).with_color(index))?;
        }
    }
    let resolved = set.resolve(&ctx.store)?;
    let (header, residues) = resolved.split_first().context("No header run")?;

    let forms = {
        let mut synth = Synthesizer::new(&mut ctx.store);
        bases
            .iter()
            .map(|base| {
                let chain = synth.derive_composite(base, base.with_suffix("plain"))?;
                Ok(ScriptForm {
                    base: base.clone(),
                    chain,
                    first: None,
                })
            })
            .collect::<Result<Vec<_>>>()?
    };
    info!("Derived {} plain glyphs", forms.len());
    let chain = compile_script(&mut ctx.store, header, forms)?;
    for lookup in chain.lower(&mut ctx.feature)?.into_lookups() {
        ctx.feature.push_lookup(lookup)?;
    }

    let mut colors = ColorLayers::new(palette.colors());
    for run in residues {
        let Some(index) = run.color else { continue };
        for glyph in &run.glyphs {
            colors.assign(glyph.clone(), index)?;
        }
    }
    ctx.colors = Some(colors);

    ctx.naming = Naming::Reset(options.family.clone());
    ctx.finish()
}
