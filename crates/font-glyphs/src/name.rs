//! Glyph names
//!
//! Every glyph in the store is addressed by name; numeric glyph IDs only exist
//! once the store is written back into a font.

use std::{
    borrow::Borrow,
    fmt::{Display, Formatter, Result},
    ops::Deref,
};

/// A glyph name as it appears in the `post` table and in feature files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphName(String);

impl GlyphName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of a glyph derived from this one for the given role, e.g. `two.sup`.
    ///
    /// Derived names always carry a role suffix so they stay out of the
    /// namespace of glyphs shipped with the font.
    pub fn with_suffix(&self, role: &str) -> Self {
        Self(format!("{}.{role}", self.0))
    }

    /// Name of a ligature glyph built from `parts`, e.g. `C_O_two.liga`.
    pub fn ligature<'a>(parts: impl IntoIterator<Item = &'a GlyphName>) -> Self {
        let joined = parts.into_iter().map(GlyphName::as_str).collect::<Vec<_>>().join("_");
        Self(format!("{joined}.liga"))
    }
}

impl Deref for GlyphName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GlyphName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for GlyphName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for GlyphName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for GlyphName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Display for GlyphName {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GlyphName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for GlyphName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
