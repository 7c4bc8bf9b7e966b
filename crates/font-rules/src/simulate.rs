//! Reference shaper for compiled features.
//!
//! Applies lookups the way a single-pass contextual substitution engine does:
//! each lookup is one left-to-right pass, the first matching rule at a
//! position wins, backtrack sees glyphs already rewritten in this pass and
//! lookahead sees glyphs not yet visited.

use scriptify_font_glyphs::GlyphName;

use crate::{Feature, Lookup, Rule};

/// Run every lookup of `feature` over `input`.
pub fn shape(feature: &Feature, input: &[GlyphName]) -> Vec<GlyphName> {
    let mut glyphs = input.to_vec();
    for lookup in feature.lookups() {
        apply_lookup(feature, lookup, &mut glyphs);
    }
    glyphs
}

/// Convenience wrapper taking glyph names as strings.
pub fn shape_names(feature: &Feature, input: &[&str]) -> Vec<GlyphName> {
    let input: Vec<GlyphName> = input.iter().map(|n| GlyphName::new(*n)).collect();
    shape(feature, &input)
}

pub fn apply_lookup(feature: &Feature, lookup: &Lookup, glyphs: &mut [GlyphName]) {
    for pos in 0..glyphs.len() {
        let replacement = lookup
            .rules
            .iter()
            .filter(|rule| feature.is_live(rule))
            .find(|rule| matches_at(feature, rule, glyphs, pos))
            .and_then(|rule| feature.replacement(rule, &glyphs[pos]));
        if let Some(replacement) = replacement {
            glyphs[pos] = replacement;
        }
    }
}

fn matches_at(feature: &Feature, rule: &Rule, glyphs: &[GlyphName], pos: usize) -> bool {
    if !feature.matches(&rule.input, &glyphs[pos]) {
        return false;
    }
    let Some(start) = pos.checked_sub(rule.backtrack.len()) else {
        return false;
    };
    let end = pos + 1 + rule.lookahead.len();
    if end > glyphs.len() {
        return false;
    }
    rule.backtrack.iter().zip(&glyphs[start..pos]).all(|(s, g)| feature.matches(s, g))
        && rule.lookahead.iter().zip(&glyphs[pos + 1..end]).all(|(s, g)| feature.matches(s, g))
}
