//! CIELab lightness remapping of palette colors.
//!
//! Colors are converted sRGB → XYZ (D65) → CIELab, their `L*` is mapped
//! linearly from one range to another, and the result converted back.
//! Ranges are given as fractions of the full `[0, 100]` lightness scale.

use log::warn;

use crate::{ByteOrder, Color, Error, Palette, PaletteFormat, Result};

const WHITE_D65: [f64; 3] = [95.047, 100.0, 108.883];

const SRGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.4124, 0.3576, 0.1805],
    [0.2126, 0.7152, 0.0722],
    [0.0193, 0.1192, 0.9505],
];

const DELTA: f64 = 6.0 / 29.0;

/// A linear map of lightness fractions from `from` onto `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LuminanceRange {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

impl LuminanceRange {
    pub const IDENTITY: Self = Self { from: (0.0, 1.0), to: (0.0, 1.0) };

    pub fn new(from: (f64, f64), to: (f64, f64)) -> Result<Self> {
        if from.0 == from.1 {
            return Err(Error::EmptyRange(from));
        }
        Ok(Self { from, to })
    }

    fn slope(&self) -> f64 {
        (self.to.1 - self.to.0) / (self.from.1 - self.from.0)
    }

    fn intercept(&self) -> f64 {
        (self.to.0 - self.slope() * self.from.0) * 100.0
    }

    /// Map an `L*` value; the result is not clamped.
    pub fn apply(&self, lightness: f64) -> f64 {
        lightness * self.slope() + self.intercept()
    }

    fn covers(&self, lightness: f64) -> bool {
        let (low, high) = (self.from.0 * 100.0, self.from.1 * 100.0);
        (low..=high).contains(&lightness)
    }
}

impl Default for LuminanceRange {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// Non-fatal findings while remapping one color.
#[derive(Debug, Clone, PartialEq)]
pub enum LuminanceWarning {
    /// The color's lightness lies outside the source range.
    OutOfSourceRange { color: Color, lightness: f64 },
    /// The mapped lightness left `[0, 100]` and was clamped.
    OutOfRangeLuminance { color: Color, lightness: f64 },
}

fn to_linear(c: f64) -> f64 {
    if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

fn from_linear(c: f64) -> f64 {
    if c <= 0.0031308 { c * 12.92 } else { 1.055 * c.powf(1.0 / 2.4) - 0.055 }
}

fn lab_f(t: f64) -> f64 {
    if t > DELTA.powi(3) { t.cbrt() } else { t / (3.0 * DELTA * DELTA) + 4.0 / 29.0 }
}

fn lab_f_inv(t: f64) -> f64 {
    if t > DELTA { t.powi(3) } else { 3.0 * DELTA * DELTA * (t - 4.0 / 29.0) }
}

fn mul(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    m.map(|row| row[0] * v[0] + row[1] * v[1] + row[2] * v[2])
}

fn invert(m: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let cofactor = |r: usize, c: usize| {
        let (r1, r2) = ((r + 1) % 3, (r + 2) % 3);
        let (c1, c2) = ((c + 1) % 3, (c + 2) % 3);
        m[r1][c1] * m[r2][c2] - m[r1][c2] * m[r2][c1]
    };
    let det = (0..3).map(|c| m[0][c] * cofactor(0, c)).sum::<f64>();
    let mut inverse = [[0.0; 3]; 3];
    for (r, row) in inverse.iter_mut().enumerate() {
        for (c, value) in row.iter_mut().enumerate() {
            *value = cofactor(c, r) / det;
        }
    }
    inverse
}

/// sRGB channels in `[0, 1]` to CIELab under D65.
pub fn srgb_to_lab(rgb: [f64; 3]) -> Lab {
    let xyz = mul(&SRGB_TO_XYZ, rgb.map(to_linear)).map(|v| v * 100.0);
    let [fx, fy, fz] = [0, 1, 2].map(|i| lab_f(xyz[i] / WHITE_D65[i]));
    Lab { l: 116.0 * fy - 16.0, a: 500.0 * (fx - fy), b: 200.0 * (fy - fz) }
}

/// CIELab to sRGB channels; values may fall outside `[0, 1]`.
pub fn lab_to_srgb(lab: Lab) -> [f64; 3] {
    let fy = (lab.l + 16.0) / 116.0;
    let f = [fy + lab.a / 500.0, fy, fy - lab.b / 200.0];
    let xyz = [0, 1, 2].map(|i| lab_f_inv(f[i]) * WHITE_D65[i] / 100.0);
    mul(&invert(&SRGB_TO_XYZ), xyz).map(from_linear)
}

/// Remap the lightness of one color, returning the new color and any warnings.
pub fn remap(color: Color, range: &LuminanceRange) -> (Color, Vec<LuminanceWarning>) {
    let mut warnings = Vec::new();
    let channels = [color.red, color.green, color.blue].map(|c| f64::from(c) / 255.0);
    let mut lab = srgb_to_lab(channels);

    if !range.covers(lab.l) {
        warn!("L {:.2} out of source range for {}", lab.l / 100.0, color.to_hex(ByteOrder::Rgb));
        warnings.push(LuminanceWarning::OutOfSourceRange { color, lightness: lab.l });
    }
    lab.l = range.apply(lab.l);
    if !(0.0..=100.0).contains(&lab.l) {
        warn!(
            "L {:.2} out of bounds for {}, truncated",
            lab.l / 100.0,
            color.to_hex(ByteOrder::Rgb)
        );
        warnings.push(LuminanceWarning::OutOfRangeLuminance { color, lightness: lab.l });
        lab.l = lab.l.clamp(0.0, 100.0);
    }

    let [red, green, blue] = lab_to_srgb(lab).map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    (Color { red, green, blue, alpha: color.alpha }, warnings)
}

/// Remap every line of a color-first palette file (`#RRGGBB<TAB>rest`).
pub fn remap_palette(text: &str, range: &LuminanceRange) -> Result<(String, Vec<LuminanceWarning>)> {
    let palette = Palette::parse(text, PaletteFormat::ColorFirst, ByteOrder::Rgb)?;
    let mut out = String::new();
    let mut warnings = Vec::new();
    for entry in palette.entries() {
        let (color, mut found) = remap(entry.color, range);
        warnings.append(&mut found);
        out.push_str(&color.to_hex(ByteOrder::Rgb));
        out.push('\t');
        out.push_str(&entry.items.join("\t"));
        out.push('\n');
    }
    Ok((out, warnings))
}
