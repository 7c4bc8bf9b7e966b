//! Turn resolved sequences into chains, synthesizing the state glyphs the
//! chains need along the way.

use std::collections::HashSet;

use log::{debug, info};
use scriptify_font_glyphs::{GlyphName, GlyphStore, Synthesizer};

use crate::{
    ChainShape, Error, Feature, LigatureChain, ResolvedSequence, Result, Role, ScriptChain,
    ScriptForm, order_chains,
};

/// Name of the shared zero-width placeholder that swallows markers and brackets.
pub const HIDE_GLYPH: &str = "hide.glyph";

/// Width given to the placeholders that replace consumed ligature components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HiddenAdvance {
    /// Same advance as the glyph it replaces.
    #[default]
    Keep,
    Zero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LigatureOptions {
    pub hidden_advance: HiddenAdvance,
}

impl LigatureOptions {
    pub const DEFAULT: Self = Self { hidden_advance: HiddenAdvance::Keep };
}

impl Default for LigatureOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Build ligature chains for every ligature sequence of two or more glyphs.
///
/// Registers the ligature composites and the hidden placeholders in `store`.
/// The returned chains are already in lookup order.
pub fn compile_ligatures(
    store: &mut GlyphStore,
    sequences: &[ResolvedSequence],
    options: LigatureOptions,
) -> Result<Vec<LigatureChain>> {
    let candidates: Vec<&ResolvedSequence> = sequences
        .iter()
        .filter(|s| s.role == Role::Ligature && s.glyphs.len() >= 2)
        .collect();

    // Characters that share a glyph make different texts compile to the same chain.
    let mut seen = HashSet::new();
    for sequence in &candidates {
        if !seen.insert(&sequence.glyphs) {
            return Err(Error::DuplicateSequence(sequence.text.clone()));
        }
    }

    let mut synth = Synthesizer::new(store);
    let mut chains = Vec::with_capacity(candidates.len());
    for sequence in candidates {
        let ligature =
            synth.derive_ligature(&sequence.glyphs, GlyphName::ligature(&sequence.glyphs))?;
        let mut hidden = Vec::with_capacity(sequence.glyphs.len() - 1);
        for glyph in &sequence.glyphs[1..] {
            let name = glyph.with_suffix("hide");
            if !synth.store().contains(&name) {
                let width = match options.hidden_advance {
                    HiddenAdvance::Keep => Some(glyph.as_str()),
                    HiddenAdvance::Zero => None,
                };
                synth.derive_empty(name.clone(), width)?;
            }
            hidden.push(name);
        }
        chains.push(LigatureChain {
            text: sequence.text.clone(),
            glyphs: sequence.glyphs.clone(),
            ligature,
            hidden,
        });
    }

    order_chains(&mut chains);
    info!("Compiled {} ligature chains", chains.len());
    Ok(chains)
}

/// Append one lookup per chain to `feature`, keeping the chains' order.
pub fn lower_ligatures(chains: &[LigatureChain], feature: &mut Feature) -> Result<()> {
    for (index, chain) in chains.iter().enumerate() {
        feature.push_lookup(chain.lower(format!("LIGA_{index}")))?;
    }
    debug!("Lowered {} ligature lookups", chains.len());
    Ok(())
}

/// Build a script chain for `run` from per-glyph derived forms.
///
/// The run's delimiters decide the shape: a bracket pair gives a bracketed
/// chain, a lone marker an unbounded one, and strip decoration keeps its
/// marker visible. Placeholders are registered in `store` as needed.
pub fn compile_script(
    store: &mut GlyphStore,
    run: &ResolvedSequence,
    forms: Vec<ScriptForm>,
) -> Result<ScriptChain> {
    let Some(delimiters) = &run.delimiters else {
        return Err(Error::InvalidRule(format!("run {:?} has no marker", run.text)));
    };
    if !matches!(run.role, Role::Superscript | Role::Subscript | Role::StripDecoration) {
        return Err(Error::InvalidRule(format!("{:?} is not a run role", run.role)));
    }
    for form in &forms {
        if !run.glyphs.contains(&form.base) {
            return Err(Error::InvalidRule(format!(
                "{} has a derived form but is not part of run {:?}",
                form.base, run.text
            )));
        }
        for name in [Some(&form.chain), form.first.as_ref()].into_iter().flatten() {
            store.try_get(name)?;
        }
    }

    let mut synth = Synthesizer::new(store);
    let mut placeholder = |name: GlyphName| -> Result<GlyphName> {
        if synth.store().contains(&name) {
            Ok(name)
        } else {
            Ok(synth.derive_empty(name, None)?)
        }
    };

    let shape = match (&delimiters.brackets, run.role) {
        (_, Role::StripDecoration) => ChainShape::Strip,
        (Some((open, close)), role) => ChainShape::Bracketed {
            start: placeholder(open.with_suffix(&format!("{}start", role.tag())))?,
            open: open.clone(),
            close: close.clone(),
            hide: placeholder(GlyphName::new(HIDE_GLYPH))?,
        },
        (None, _) => ChainShape::Unbounded { hide: placeholder(GlyphName::new(HIDE_GLYPH))? },
    };

    debug!("{} chain after {} with {} forms", run.role.tag(), delimiters.marker, forms.len());
    Ok(ScriptChain { role: run.role, marker: delimiters.marker.clone(), shape, forms })
}
