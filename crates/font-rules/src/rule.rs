//! Lowered rule representation: slots, rules, lookups and the feature that
//! holds them.

use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use scriptify_font_glyphs::GlyphName;

use crate::{Error, Result, fea::glyph_token};

/// One position of a rule: a single glyph or a named glyph class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    Glyph(GlyphName),
    Class(String),
}

impl Slot {
    pub fn glyph(name: &GlyphName) -> Self {
        Slot::Glyph(name.clone())
    }

    pub fn class(name: impl Into<String>) -> Self {
        Slot::Class(name.into())
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Glyph(name) => f.write_str(&glyph_token(name)),
            Slot::Class(name) => write!(f, "@{name}"),
        }
    }
}

/// A contextual single substitution.
///
/// `input` is replaced by `replacement` when `backtrack` matches the glyphs
/// immediately before it and `lookahead` the glyphs immediately after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub backtrack: Vec<Slot>,
    pub input: Slot,
    pub lookahead: Vec<Slot>,
    pub replacement: Slot,
}

impl Rule {
    pub fn new(input: Slot, replacement: Slot) -> Self {
        Self { backtrack: Vec::new(), input, lookahead: Vec::new(), replacement }
    }

    pub fn after(mut self, backtrack: impl IntoIterator<Item = Slot>) -> Self {
        self.backtrack = backtrack.into_iter().collect();
        self
    }

    pub fn before(mut self, lookahead: impl IntoIterator<Item = Slot>) -> Self {
        self.lookahead = lookahead.into_iter().collect();
        self
    }

    fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.backtrack
            .iter()
            .chain(std::iter::once(&self.input))
            .chain(&self.lookahead)
            .chain(std::iter::once(&self.replacement))
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("sub")?;
        for slot in &self.backtrack {
            write!(f, " {slot}")?;
        }
        write!(f, " {}'", self.input)?;
        for slot in &self.lookahead {
            write!(f, " {slot}")?;
        }
        write!(f, " by {}", self.replacement)
    }
}

/// A named group of rules; the first rule that matches at a position wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub name: String,
    /// Free-form note carried into the feature text.
    pub comment: Option<String>,
    pub rules: Vec<Rule>,
}

impl Lookup {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), comment: None, rules: Vec::new() }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }
}

/// Feature tags the compiler emits into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureTag {
    Calt,
    Ccmp,
}

impl FeatureTag {
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureTag::Calt => "calt",
            FeatureTag::Ccmp => "ccmp",
        }
    }
}

/// Glyph classes plus an ordered list of lookups, each applied as one full
/// pass over the glyph run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    tag: FeatureTag,
    classes: IndexMap<String, Vec<GlyphName>>,
    lookups: Vec<Lookup>,
}

impl Feature {
    pub fn new(tag: FeatureTag) -> Self {
        Self { tag, classes: IndexMap::new(), lookups: Vec::new() }
    }

    pub fn tag(&self) -> FeatureTag {
        self.tag
    }

    /// Define a glyph class and return a slot referring to it.
    ///
    /// Redefining a class with the same members is a no-op.
    pub fn define_class(
        &mut self,
        name: &str,
        glyphs: impl IntoIterator<Item = GlyphName>,
    ) -> Result<Slot> {
        let glyphs: Vec<GlyphName> = glyphs.into_iter().collect();
        match self.classes.get(name) {
            Some(existing) if *existing != glyphs => {
                return Err(Error::ConflictingClass(name.to_string()));
            }
            Some(_) => {}
            None => {
                self.classes.insert(name.to_string(), glyphs);
            }
        }
        Ok(Slot::class(name))
    }

    pub fn class(&self, name: &str) -> Option<&[GlyphName]> {
        self.classes.get(name).map(Vec::as_slice)
    }

    pub fn classes(&self) -> impl Iterator<Item = (&str, &[GlyphName])> {
        self.classes.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Append a lookup after checking that every rule can be applied.
    pub fn push_lookup(&mut self, lookup: Lookup) -> Result<()> {
        if self.lookups.iter().any(|l| l.name == lookup.name) {
            return Err(Error::InvalidRule(format!("lookup {} defined twice", lookup.name)));
        }
        for rule in &lookup.rules {
            self.check_rule(rule)?;
        }
        self.lookups.push(lookup);
        Ok(())
    }

    pub fn lookups(&self) -> &[Lookup] {
        &self.lookups
    }

    /// Whether no rule of any lookup can ever fire.
    pub fn is_empty(&self) -> bool {
        self.lookups.iter().flat_map(|l| &l.rules).all(|r| !self.is_live(r))
    }

    /// Whether `glyph` is matched by `slot`.
    pub fn matches(&self, slot: &Slot, glyph: &GlyphName) -> bool {
        match slot {
            Slot::Glyph(name) => name == glyph,
            Slot::Class(class) => self.class(class).is_some_and(|members| members.contains(glyph)),
        }
    }

    /// The glyph that replaces `glyph` when `rule` fires on it.
    ///
    /// A class replacing a class maps members by position; a single glyph
    /// replaces every member of the input.
    pub fn replacement(&self, rule: &Rule, glyph: &GlyphName) -> Option<GlyphName> {
        match (&rule.input, &rule.replacement) {
            (_, Slot::Glyph(to)) => Some(to.clone()),
            (Slot::Class(from), Slot::Class(to)) => {
                let index = self.class(from)?.iter().position(|g| g == glyph)?;
                self.class(to)?.get(index).cloned()
            }
            (Slot::Glyph(_), Slot::Class(_)) => None,
        }
    }

    /// Whether every class the rule references is non-empty.
    pub fn is_live(&self, rule: &Rule) -> bool {
        rule.slots().all(|slot| match slot {
            Slot::Glyph(_) => true,
            Slot::Class(class) => self.class(class).is_some_and(|m| !m.is_empty()),
        })
    }

    fn check_rule(&self, rule: &Rule) -> Result<()> {
        for slot in rule.slots() {
            if let Slot::Class(class) = slot
                && self.class(class).is_none()
            {
                return Err(Error::InvalidRule(format!("{rule}: undefined class @{class}")));
            }
        }
        match (&rule.input, &rule.replacement) {
            (Slot::Glyph(_), Slot::Class(_)) => {
                Err(Error::InvalidRule(format!("{rule}: one glyph cannot become a class")))
            }
            (Slot::Class(from), Slot::Class(to)) => {
                let (from_len, to_len) = (
                    self.class(from).map_or(0, <[_]>::len),
                    self.class(to).map_or(0, <[_]>::len),
                );
                if from_len != to_len {
                    return Err(Error::InvalidRule(format!(
                        "{rule}: @{from} has {from_len} glyphs but @{to} has {to_len}"
                    )));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
