//! In-memory glyph representation.

use kurbo::{Affine, Point};
use read_fonts::tables::glyf::CurvePoint;
use write_fonts::tables::glyf::Bbox;

use crate::GlyphName;

/// Horizontal metrics in font design units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub advance: u16,
    pub lsb: i16,
}

impl Metrics {
    pub const fn new(advance: u16, lsb: i16) -> Self {
        Self { advance, lsb }
    }
}

/// TrueType contour data, copied verbatim from a source glyph or transformed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    pub contours: Vec<Vec<CurvePoint>>,
    pub instructions: Vec<u8>,
}

impl Outline {
    pub fn is_empty(&self) -> bool {
        self.contours.iter().all(Vec::is_empty)
    }

    /// Apply an affine transform to every point, rounding to the unit grid.
    ///
    /// Hinting instructions do not survive a transform and are dropped.
    pub fn transformed(&self, affine: Affine) -> Outline {
        let contours = self
            .contours
            .iter()
            .map(|contour| {
                contour
                    .iter()
                    .map(|p| {
                        let t = affine * Point::new(p.x as f64, p.y as f64);
                        CurvePoint::new(round_i16(t.x), round_i16(t.y), p.on_curve)
                    })
                    .collect()
            })
            .collect();
        Outline { contours, instructions: Vec::new() }
    }

    /// Append the contours of `other` (instructions are not merged).
    pub fn append(&mut self, other: Outline) {
        self.contours.extend(other.contours.into_iter().filter(|c| !c.is_empty()));
    }

    /// The point with TrueType point number `index`.
    pub fn point(&self, index: u16) -> Option<&CurvePoint> {
        self.contours.iter().flatten().nth(index as usize)
    }

    pub fn bbox(&self) -> Option<Bbox> {
        let mut points = self.contours.iter().flatten();
        let first = points.next()?;
        let init = Bbox { x_min: first.x, y_min: first.y, x_max: first.x, y_max: first.y };
        Some(points.fold(init, |b, p| Bbox {
            x_min: b.x_min.min(p.x),
            y_min: b.y_min.min(p.y),
            x_max: b.x_max.max(p.x),
            y_max: b.y_max.max(p.y),
        }))
    }
}

fn round_i16(v: f64) -> i16 {
    v.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Where a component is placed inside its composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentAnchor {
    Offset { x: i16, y: i16 },
    /// Point `component` of the component lands on point `base` of the
    /// components placed before it.
    Points { base: u16, component: u16 },
}

/// Component flags carried through unchanged from the source font.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComponentFlags {
    pub round_to_grid: bool,
    pub use_my_metrics: bool,
    pub scaled_offset: bool,
    pub unscaled_offset: bool,
    pub overlap: bool,
}

/// A positioned reference to another glyph inside a composite.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRef {
    pub glyph: GlyphName,
    pub anchor: ComponentAnchor,
    /// 2x2 matrix `[xx, yx, xy, yy]`.
    pub scale: [f32; 4],
    pub flags: ComponentFlags,
}

impl ComponentRef {
    pub const IDENTITY: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    pub fn offset(glyph: GlyphName, x: i16, y: i16) -> Self {
        Self {
            glyph,
            anchor: ComponentAnchor::Offset { x, y },
            scale: Self::IDENTITY,
            flags: ComponentFlags { round_to_grid: true, ..Default::default() },
        }
    }

    /// The component's 2x2 transform, without any offset.
    pub fn linear(&self) -> Affine {
        let [xx, yx, xy, yy] = self.scale.map(f64::from);
        Affine::new([xx, yx, xy, yy, 0.0, 0.0])
    }
}

/// Components plus the composite's own hinting instructions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composite {
    pub components: Vec<ComponentRef>,
    pub instructions: Vec<u8>,
}

impl Composite {
    pub fn new(components: Vec<ComponentRef>) -> Self {
        Self { components, instructions: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GlyphBody {
    Outline(Outline),
    Composite(Composite),
}

impl GlyphBody {
    pub fn empty() -> Self {
        GlyphBody::Outline(Outline::default())
    }

    pub fn components(&self) -> &[ComponentRef] {
        match self {
            GlyphBody::Composite(composite) => &composite.components,
            GlyphBody::Outline(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub metrics: Metrics,
    pub body: GlyphBody,
}

impl Glyph {
    pub fn new(metrics: Metrics, body: GlyphBody) -> Self {
        Self { metrics, body }
    }

    pub fn empty(advance: u16) -> Self {
        Self::new(Metrics::new(advance, 0), GlyphBody::empty())
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.body, GlyphBody::Composite(_))
    }
}
