//! Chemical formulas: `H_2O`, `SO_4^2-` in `calt`.
//!
//! Runs are unbounded: every digit (and sign, for superscripts) after the
//! marker or after another script glyph is raised or lowered.

use anyhow::Result;
use scriptify_font_rules::{Delimiters, FeatureTag, Role, Sequence, SequenceSet, compile_script};

use super::script_forms;
use crate::{
    Build, BuildContext, Naming,
    config::{ChemOptions, SUBSCRIPT_MARKER, SUPERSCRIPT_MARKER},
};

pub fn build_chem(data: &[u8], options: &ChemOptions) -> Result<Build> {
    let mut ctx = BuildContext::load(data, FeatureTag::Calt)?;

    let mut runs = SequenceSet::new();
    runs.push(
        Sequence::new(ChemOptions::SUPERSCRIPT_CHARS, Role::Superscript)
            .with_delimiters(Delimiters::marker(SUPERSCRIPT_MARKER)),
    )?;
    runs.push(
        Sequence::new(ChemOptions::SUBSCRIPT_CHARS, Role::Subscript)
            .with_delimiters(Delimiters::marker(SUBSCRIPT_MARKER)),
    )?;
    let runs = runs.resolve(&ctx.store)?;
    let (sup_run, sub_run) = (&runs[0], &runs[1]);

    let sup_forms = script_forms(
        &mut ctx.store,
        &sup_run.glyphs,
        "sup",
        options.superscript,
        false,
    )?;
    let sub_forms = script_forms(
        &mut ctx.store,
        &sub_run.glyphs,
        "sub",
        options.subscript,
        false,
    )?;
    let sup = compile_script(&mut ctx.store, sup_run, sup_forms)?.lower(&mut ctx.feature)?;
    let sub = compile_script(&mut ctx.store, sub_run, sub_forms)?.lower(&mut ctx.feature)?;

    // Both runs advance before either marker is hidden.
    for lookup in sub
        .body
        .into_iter()
        .chain(sup.body)
        .chain(sup.hide)
        .chain(sub.hide)
    {
        ctx.feature.push_lookup(lookup)?;
    }

    ctx.naming = Naming::Reset(options.family.clone());
    ctx.finish()
}
