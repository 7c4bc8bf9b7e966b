//! The sequence model: the character runs the rule compiler is asked to render.

use scriptify_font_glyphs::{GlyphName, GlyphStore};

use crate::{Error, Result};

/// How a sequence is displayed once its rules fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Ligature,
    Superscript,
    Subscript,
    ColoredRun,
    StripDecoration,
}

impl Role {
    /// Short tag used in derived glyph, class and lookup names.
    pub fn tag(self) -> &'static str {
        match self {
            Role::Ligature => "liga",
            Role::Superscript => "sup",
            Role::Subscript => "sub",
            Role::ColoredRun => "color",
            Role::StripDecoration => "plain",
        }
    }
}

/// Marker character that opens a run, with an optional bracket pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub marker: char,
    pub brackets: Option<(char, char)>,
}

impl Delimiters {
    pub const fn marker(marker: char) -> Self {
        Self { marker, brackets: None }
    }

    pub const fn bracketed(marker: char, open: char, close: char) -> Self {
        Self { marker, brackets: Some((open, close)) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    chars: Vec<char>,
    role: Role,
    color: Option<u16>,
    delimiters: Option<Delimiters>,
}

impl Sequence {
    pub fn new(text: &str, role: Role) -> Self {
        Self { chars: text.chars().collect(), role, color: None, delimiters: None }
    }

    pub fn ligature(text: &str) -> Self {
        Self::new(text, Role::Ligature)
    }

    pub fn with_color(mut self, index: u16) -> Self {
        self.color = Some(index);
        self
    }

    pub fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = Some(delimiters);
        self
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn color(&self) -> Option<u16> {
        self.color
    }

    pub fn delimiters(&self) -> Option<Delimiters> {
        self.delimiters
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// Delimiters mapped to glyph names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDelimiters {
    pub marker: GlyphName,
    pub brackets: Option<(GlyphName, GlyphName)>,
}

/// A sequence whose characters have all been mapped through the cmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSequence {
    pub text: String,
    pub glyphs: Vec<GlyphName>,
    pub role: Role,
    pub color: Option<u16>,
    pub delimiters: Option<ResolvedDelimiters>,
}

/// An ordered, validated collection of sequences.
#[derive(Debug, Clone, Default)]
pub struct SequenceSet {
    sequences: Vec<Sequence>,
}

impl SequenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sequence. Empty sequences and repeated ligatures are rejected.
    pub fn push(&mut self, sequence: Sequence) -> Result<()> {
        if sequence.is_empty() {
            return Err(Error::EmptySequence);
        }
        if sequence.role == Role::Ligature
            && self
                .sequences
                .iter()
                .any(|s| s.role == Role::Ligature && s.chars == sequence.chars)
        {
            return Err(Error::DuplicateSequence(sequence.text()));
        }
        self.sequences.push(sequence);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sequence> {
        self.sequences.iter()
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Map every character of every sequence to a glyph.
    ///
    /// Fails on the first unmapped character; nothing is returned for the
    /// sequences that did resolve.
    pub fn resolve(&self, store: &GlyphStore) -> Result<Vec<ResolvedSequence>> {
        self.sequences.iter().map(|s| resolve_sequence(s, store)).collect()
    }
}

fn resolve_sequence(sequence: &Sequence, store: &GlyphStore) -> Result<ResolvedSequence> {
    let text = sequence.text();
    let lookup = |ch: char| {
        store
            .glyph_for_char(ch)
            .cloned()
            .ok_or_else(|| Error::MissingGlyph { ch, sequence: text.clone() })
    };

    let glyphs = sequence.chars.iter().map(|&ch| lookup(ch)).collect::<Result<Vec<_>>>()?;
    let delimiters = match sequence.delimiters {
        Some(d) => Some(ResolvedDelimiters {
            marker: lookup(d.marker)?,
            brackets: match d.brackets {
                Some((open, close)) => Some((lookup(open)?, lookup(close)?)),
                None => None,
            },
        }),
        None => None,
    };

    Ok(ResolvedSequence {
        text: text.clone(),
        glyphs,
        role: sequence.role,
        color: sequence.color,
        delimiters,
    })
}
