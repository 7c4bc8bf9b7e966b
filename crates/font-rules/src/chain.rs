//! Linear chain automata and their lowering to lookups.
//!
//! States are glyph names minted by the synthesizer (ligatures, hidden
//! placeholders, script tiers); transitions are single substitutions guarded
//! by adjacent glyphs. A chain is lowered to one or more [`Lookup`]s whose
//! order matters and is part of the output.

use scriptify_font_glyphs::GlyphName;

use crate::{Feature, Lookup, Result, Role, Rule, Slot};

/// A fixed-length ligature: `glyphs[0]` becomes `ligature`, the remaining
/// glyphs become their hidden placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LigatureChain {
    pub text: String,
    pub glyphs: Vec<GlyphName>,
    pub ligature: GlyphName,
    /// Placeholders for `glyphs[1..]`, in order.
    pub hidden: Vec<GlyphName>,
}

impl LigatureChain {
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// One chain rule per trailing glyph, then the start rule.
    ///
    /// Chain rule `i` sees the ligature and the placeholders already written
    /// by rules `1..i` as backtrack, so a single pass consumes the whole run.
    /// The chain rules come first: a trailing glyph equal to the first one
    /// must be consumed, not start another ligature.
    pub fn lower(&self, name: impl Into<String>) -> Lookup {
        let mut lookup = Lookup::new(name).with_comment(self.text.clone());
        let Some((first, rest)) = self.glyphs.split_first() else {
            return lookup;
        };
        for (i, (glyph, hidden)) in rest.iter().zip(&self.hidden).enumerate() {
            let backtrack = std::iter::once(&self.ligature)
                .chain(&self.hidden[..i])
                .map(Slot::glyph);
            lookup.push(Rule::new(Slot::glyph(glyph), Slot::glyph(hidden)).after(backtrack));
        }
        lookup.push(
            Rule::new(Slot::glyph(first), Slot::glyph(&self.ligature))
                .before(rest.iter().map(Slot::glyph)),
        );
        lookup
    }
}

/// Sort chains so that longer sequences are tried first; equal lengths are
/// ordered by their glyph names.
pub fn order_chains(chains: &mut [LigatureChain]) {
    chains.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.glyphs.cmp(&b.glyphs)));
}

/// Derived forms of one base glyph inside a script run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptForm {
    pub base: GlyphName,
    /// Form used mid-run.
    pub chain: GlyphName,
    /// Form used for a lone character right after the marker (bracketed runs only).
    pub first: Option<GlyphName>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainShape {
    /// `marker c c c`: the run continues while glyphs have a derived form,
    /// and the marker is hidden once followed by one.
    Unbounded { hide: GlyphName },
    /// `marker open c c c close`, or `marker c` for a single character.
    Bracketed { open: GlyphName, close: GlyphName, start: GlyphName, hide: GlyphName },
    /// `marker c c c`: every glyph after the marker switches to its plain clone;
    /// the marker itself stays visible.
    Strip,
}

/// A run of derived forms opened by a marker glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptChain {
    pub role: Role,
    pub marker: GlyphName,
    pub shape: ChainShape,
    pub forms: Vec<ScriptForm>,
}

/// Lookups produced by a [`ScriptChain`], kept apart so callers can
/// interleave several chains before the hide passes.
#[derive(Debug, Clone, Default)]
pub struct LoweredChain {
    pub body: Vec<Lookup>,
    pub hide: Option<Lookup>,
}

impl LoweredChain {
    pub fn into_lookups(self) -> impl Iterator<Item = Lookup> {
        self.body.into_iter().chain(self.hide)
    }
}

impl ScriptChain {
    /// Define the chain's classes in `feature` and build its lookups.
    pub fn lower(&self, feature: &mut Feature) -> Result<LoweredChain> {
        let tag = self.role.tag();
        let prefix = tag.to_uppercase();
        let marker = Slot::glyph(&self.marker);
        let bases = self.forms.iter().map(|f| f.base.clone());
        let chained = self.forms.iter().map(|f| f.chain.clone());

        match &self.shape {
            ChainShape::Unbounded { hide } => {
                let base = feature.define_class(&format!("{tag}char0"), bases)?;
                let chain = feature.define_class(&format!("{tag}char"), chained.clone())?;
                let run = feature.define_class(
                    &format!("{tag}prefix"),
                    std::iter::once(self.marker.clone()).chain(chained),
                )?;

                let mut body = Lookup::new(format!("{prefix}_CHAIN"));
                body.push(Rule::new(base, chain.clone()).after([run]));
                let mut hide_lookup = Lookup::new(self.hide_name());
                hide_lookup.push(Rule::new(marker, Slot::glyph(hide)).before([chain]));
                Ok(LoweredChain { body: vec![body], hide: Some(hide_lookup) })
            }
            ChainShape::Bracketed { open, close, start, hide } => {
                let firsts: Vec<GlyphName> =
                    self.forms.iter().filter_map(|f| f.first.clone()).collect();
                if firsts.len() != self.forms.len() {
                    return Err(crate::Error::InvalidRule(format!(
                        "{tag} chain needs a first-character form for every glyph"
                    )));
                }
                let base = feature.define_class("orichar", bases)?;
                let chain = feature.define_class(&format!("{tag}char"), chained.clone())?;
                let first = feature.define_class(&format!("{tag}1char"), firsts.iter().cloned())?;
                let run = feature.define_class(
                    &format!("{tag}prefix"),
                    std::iter::once(start.clone()).chain(chained),
                )?;
                let hide_suffix = feature.define_class(
                    &format!("{tag}hidesuffix"),
                    std::iter::once(start.clone()).chain(firsts),
                )?;

                let mut mark_first = Lookup::new(format!("{prefix}_CHAR"));
                mark_first.push(Rule::new(base.clone(), first).after([marker.clone()]));
                let mut chain_start = Lookup::new(format!("{prefix}_CHAIN_START"));
                chain_start.push(Rule::new(Slot::glyph(open), Slot::glyph(start)).after([marker.clone()]));
                let mut chain_body = Lookup::new(format!("{prefix}_CHAIN"));
                chain_body.push(Rule::new(base, chain.clone()).after([run]));
                let mut end = Lookup::new(format!("{prefix}_END"));
                end.push(Rule::new(Slot::glyph(close), Slot::glyph(hide)).after([chain]));
                let mut hide_lookup = Lookup::new(self.hide_name());
                hide_lookup.push(Rule::new(marker, Slot::glyph(hide)).before([hide_suffix]));

                Ok(LoweredChain {
                    body: vec![mark_first, chain_start, chain_body, end],
                    hide: Some(hide_lookup),
                })
            }
            ChainShape::Strip => {
                let base = feature.define_class("original", bases)?;
                let chain = feature.define_class(tag, chained)?;

                let mut start = Lookup::new(format!("{prefix}_START"));
                start.push(Rule::new(base.clone(), chain.clone()).after([marker]));
                let mut body = Lookup::new(format!("{prefix}_CHAIN"));
                body.push(Rule::new(base, chain.clone()).after([chain]));
                Ok(LoweredChain { body: vec![start, body], hide: None })
            }
        }
    }

    fn hide_name(&self) -> String {
        format!("HIDE_{}", self.marker.as_str().to_uppercase().replace('.', "_"))
    }
}
