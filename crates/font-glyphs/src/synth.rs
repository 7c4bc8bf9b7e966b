//! Glyph synthesis: derive new glyphs from glyphs already in the store.

use kurbo::Affine;
use log::debug;

use crate::{
    ComponentRef, Composite, Error, Glyph, GlyphBody, GlyphName, GlyphStore, Metrics, Result,
};

/// Scale and offset applied by [`Synthesizer::derive_transformed`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTransform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl ScaleTransform {
    /// Uniform scale with a vertical shift, as used for script forms.
    pub fn uniform(scale: f64, offset_y: f64) -> Self {
        Self { scale_x: scale, scale_y: scale, offset_x: 0.0, offset_y }
    }

    fn affine(&self) -> Affine {
        Affine::new([self.scale_x, 0.0, 0.0, self.scale_y, self.offset_x, self.offset_y])
    }
}

/// Writes derived glyphs into a [`GlyphStore`].
pub struct Synthesizer<'a> {
    store: &'a mut GlyphStore,
}

impl<'a> Synthesizer<'a> {
    pub fn new(store: &'a mut GlyphStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &GlyphStore {
        self.store
    }

    /// Copy `source` (decomposed) under an affine transform.
    ///
    /// The advance becomes `round(source advance * scale_x)`; the side bearing is
    /// reset to zero and can be overridden with [`GlyphStore::set_metrics`].
    pub fn derive_transformed(
        &mut self,
        source: &str,
        name: GlyphName,
        transform: ScaleTransform,
    ) -> Result<GlyphName> {
        let advance = self.store.metrics(source)?.advance;
        let outline = self.store.flatten(source)?.transformed(transform.affine());
        let advance = (advance as f64 * transform.scale_x).round().clamp(0.0, u16::MAX as f64);
        let glyph = Glyph::new(Metrics::new(advance as u16, 0), GlyphBody::Outline(outline));
        self.register(name, glyph)
    }

    /// A zero-offset single-component composite of `source`.
    ///
    /// Renders exactly like `source` but has its own identity, which is what
    /// lets substitution rules tell "already consumed" glyphs apart.
    pub fn derive_composite(&mut self, source: &str, name: GlyphName) -> Result<GlyphName> {
        let metrics = self.store.metrics(source)?;
        let mut component = ComponentRef::offset(GlyphName::new(source), 0, 0);
        component.flags.use_my_metrics = true;
        let glyph = Glyph::new(metrics, GlyphBody::Composite(Composite::new(vec![component])));
        self.register(name, glyph)
    }

    /// A glyph with no contours, as wide as `width_source` or zero-width.
    pub fn derive_empty(&mut self, name: GlyphName, width_source: Option<&str>) -> Result<GlyphName> {
        let advance = match width_source {
            Some(source) => self.store.metrics(source)?.advance,
            None => 0,
        };
        self.register(name, Glyph::empty(advance))
    }

    /// A composite placing `parts` left to right with a running x offset.
    ///
    /// The advance is the sum of the parts' advances.
    pub fn derive_ligature(&mut self, parts: &[GlyphName], name: GlyphName) -> Result<GlyphName> {
        let mut components = Vec::with_capacity(parts.len());
        let mut x: u32 = 0;
        for part in parts {
            let advance = self.store.metrics(part)?.advance;
            let offset = i16::try_from(x).map_err(|_| Error::TooWide(name.clone()))?;
            components.push(ComponentRef::offset(part.clone(), offset, 0));
            x += advance as u32;
        }
        let advance = u16::try_from(x).map_err(|_| Error::TooWide(name.clone()))?;
        let glyph =
            Glyph::new(Metrics::new(advance, 0), GlyphBody::Composite(Composite::new(components)));
        self.register(name, glyph)
    }

    fn register(&mut self, name: GlyphName, glyph: Glyph) -> Result<GlyphName> {
        debug!("Derived {name} (advance {})", glyph.metrics.advance);
        self.store.register(name.clone(), glyph)?;
        Ok(name)
    }
}
