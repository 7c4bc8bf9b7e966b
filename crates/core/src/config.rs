//! Build defaults and recipe options.

use scriptify_font_color::{ByteOrder, LuminanceRange};
use scriptify_font_glyphs::ScaleTransform;
pub use scriptify_font_rules::{HiddenAdvance, LigatureOptions};

use crate::UnicodeSelection;

/// Family name written when a recipe resets the naming records.
pub const DEFAULT_FAMILY: &str = "MyFont";

/// Marker that opens a superscript run.
pub const SUPERSCRIPT_MARKER: char = '^';
/// Marker that opens a subscript run.
pub const SUBSCRIPT_MARKER: char = '_';
pub const OPEN_BRACKET: char = '{';
pub const CLOSE_BRACKET: char = '}';
/// Marker that starts a FASTA header line.
pub const HEADER_MARKER: char = '>';

/// Scale and vertical shift (in em) of a script form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptStyle {
    pub scale: f64,
    pub offset_em: f64,
}

impl ScriptStyle {
    pub const SUPERSCRIPT: Self = Self {
        scale: 0.6,
        offset_em: 0.35,
    };
    pub const SUBSCRIPT: Self = Self {
        scale: 0.6,
        offset_em: -0.1,
    };

    /// The glyph transform for a font with `units_per_em`.
    ///
    /// The vertical shift is truncated to whole units.
    pub fn transform(&self, units_per_em: u16) -> ScaleTransform {
        ScaleTransform::uniform(
            self.scale,
            (f64::from(units_per_em) * self.offset_em).trunc(),
        )
    }
}

/// Options for the bracketed super/subscript recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptOptions {
    pub unicodes: UnicodeSelection,
    pub superscript: ScriptStyle,
    pub subscript: ScriptStyle,
    pub family: String,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            unicodes: UnicodeSelection::All,
            superscript: ScriptStyle::SUPERSCRIPT,
            subscript: ScriptStyle::SUBSCRIPT,
            family: DEFAULT_FAMILY.to_string(),
        }
    }
}

/// Options for the chemical-formula recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct ChemOptions {
    pub superscript: ScriptStyle,
    pub subscript: ScriptStyle,
    pub family: String,
}

impl ChemOptions {
    /// Characters that get a superscript form.
    pub const SUPERSCRIPT_CHARS: &str = "0123456789+-";
    /// Characters that get a subscript form.
    pub const SUBSCRIPT_CHARS: &str = "0123456789";
}

impl Default for ChemOptions {
    fn default() -> Self {
        Self {
            superscript: ScriptStyle::SUPERSCRIPT,
            subscript: ScriptStyle::SUBSCRIPT,
            family: DEFAULT_FAMILY.to_string(),
        }
    }
}

/// Options for the colored ligature recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct LigaOptions {
    pub byte_order: ByteOrder,
    pub ligatures: LigatureOptions,
    pub family: String,
}

impl Default for LigaOptions {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::Rgb,
            ligatures: LigatureOptions::DEFAULT,
            family: DEFAULT_FAMILY.to_string(),
        }
    }
}

/// Options for the colored-run recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct TintOptions {
    pub byte_order: ByteOrder,
    /// Rewrites family, full and PostScript names when set; naming is otherwise untouched.
    pub family: Option<String>,
}

impl Default for TintOptions {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::Bgr,
            family: None,
        }
    }
}

/// Options for the FASTA recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct FastaOptions {
    pub byte_order: ByteOrder,
    pub family: String,
}

impl FastaOptions {
    /// Codepoints that get an undecorated clone.
    pub const PLAIN_RANGE: std::ops::RangeInclusive<u32> = 32..=126;
}

impl Default for FastaOptions {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::Bgr,
            family: DEFAULT_FAMILY.to_string(),
        }
    }
}

/// Options for palette lightness remapping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RemapOptions {
    pub range: LuminanceRange,
}
