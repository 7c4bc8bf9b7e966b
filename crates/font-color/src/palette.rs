//! Palette files.
//!
//! Two tab-separated layouts are understood:
//!
//! - color first: `#RRGGBB<TAB>item<TAB>item...`
//! - text first: `text<TAB>#RRGGBB`
//!
//! The byte order of the hex triplet is configurable; see [`ByteOrder`].

use std::{fmt, str::FromStr};

use crate::{Error, Result};

/// How the three bytes of a hex color are assigned to channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ByteOrder {
    /// `#RRGGBB`
    #[default]
    Rgb,
    /// `#BBGGRR`
    Bgr,
}

impl FromStr for ByteOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rgb" => Ok(ByteOrder::Rgb),
            "bgr" => Ok(ByteOrder::Bgr),
            other => Err(format!("unknown byte order '{other}', expected 'rgb' or 'bgr'")),
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ByteOrder::Rgb => "rgb",
            ByteOrder::Bgr => "bgr",
        })
    }
}

/// An opaque-by-default sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue, alpha: 0xFF }
    }

    /// Parse `#XXXXXX`, reading the bytes in `order`.
    pub fn parse_hex(spec: &str, order: ByteOrder) -> std::result::Result<Self, &'static str> {
        let hex = spec.strip_prefix('#').ok_or("color must start with '#'")?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err("color must have six hex digits");
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| "invalid hex digit");
        let (first, second, third) = (byte(0)?, byte(2)?, byte(4)?);
        Ok(match order {
            ByteOrder::Rgb => Self::rgb(first, second, third),
            ByteOrder::Bgr => Self::rgb(third, second, first),
        })
    }

    /// Format as `#XXXXXX` (uppercase) in `order`.
    pub fn to_hex(&self, order: ByteOrder) -> String {
        let (first, third) = match order {
            ByteOrder::Rgb => (self.red, self.blue),
            ByteOrder::Bgr => (self.blue, self.red),
        };
        format!("#{first:02X}{:02X}{third:02X}", self.green)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteFormat {
    ColorFirst,
    TextFirst,
}

/// One palette line: its color plus the items listed with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub color: Color,
    pub items: Vec<String>,
}

/// Palette entries in file order; an entry's position is its palette index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Parse a whole palette file. Blank lines are skipped; any other line that
    /// does not match `format` fails the whole file.
    pub fn parse(text: &str, format: PaletteFormat, order: ByteOrder) -> Result<Self> {
        let mut entries = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim_end_matches(['\t', '\r', '\n']);
            if line.trim().is_empty() {
                continue;
            }
            let malformed = |reason| Error::MalformedColorSpec {
                line: index + 1,
                text: raw.to_string(),
                reason,
            };
            let entry = match format {
                PaletteFormat::ColorFirst => {
                    let mut fields = line.split('\t');
                    let color = fields.next().unwrap_or_default();
                    PaletteEntry {
                        color: Color::parse_hex(color.trim(), order).map_err(malformed)?,
                        items: fields.filter(|f| !f.is_empty()).map(str::to_string).collect(),
                    }
                }
                PaletteFormat::TextFirst => {
                    let fields: Vec<&str> = line.trim_end().split('\t').collect();
                    let &[text, color] = fields.as_slice() else {
                        return Err(malformed("expected 'text<TAB>#color'"));
                    };
                    PaletteEntry {
                        color: Color::parse_hex(color.trim(), order).map_err(malformed)?,
                        items: vec![text.to_string()],
                    }
                }
            };
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    pub fn from_entries(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn colors(&self) -> Vec<Color> {
        self.entries.iter().map(|e| e.color).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render back to the color-first layout.
    pub fn to_color_first(&self, order: ByteOrder) -> String {
        self.entries
            .iter()
            .map(|e| {
                let mut line = e.color.to_hex(order);
                for item in &e.items {
                    line.push('\t');
                    line.push_str(item);
                }
                line.push('\n');
                line
            })
            .collect()
    }
}
