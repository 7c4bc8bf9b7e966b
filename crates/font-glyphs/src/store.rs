//! The glyph store: name → glyph, in registration order.
//!
//! Registration order is also the glyph ID order of the emitted font, so
//! re-registering a name replaces the glyph in place instead of appending.

use std::collections::{BTreeMap, HashSet};

use indexmap::IndexMap;
use kurbo::{Affine, Point};
use log::warn;

use crate::{
    Error, Result,
    glyph::{ComponentAnchor, Glyph, GlyphBody, Metrics, Outline},
    name::GlyphName,
};

/// Deepest component nesting followed when flattening composites.
const MAX_COMPONENT_DEPTH: usize = 64;

#[derive(Debug, Clone, Default)]
pub struct GlyphStore {
    glyphs: IndexMap<GlyphName, Glyph>,
    originals: HashSet<GlyphName>,
    cmap: BTreeMap<u32, GlyphName>,
    units_per_em: u16,
}

impl GlyphStore {
    pub fn new(units_per_em: u16) -> Self {
        Self { units_per_em, ..Default::default() }
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Add a glyph that ships with the font.
    ///
    /// Original glyphs keep whatever component order the font had; only
    /// derived glyphs are held to the no-forward-reference rule.
    pub fn insert_original(&mut self, name: GlyphName, glyph: Glyph) {
        self.originals.insert(name.clone());
        self.glyphs.insert(name, glyph);
    }

    pub fn map_codepoint(&mut self, codepoint: u32, name: GlyphName) {
        self.cmap.insert(codepoint, name);
    }

    /// Register a derived glyph.
    ///
    /// Every component must already be registered ahead of `name`. Replacing an
    /// existing derived glyph keeps its position in the glyph order.
    pub fn register(&mut self, name: GlyphName, glyph: Glyph) -> Result<()> {
        if self.originals.contains(&name) {
            return Err(Error::NameCollision(name));
        }
        let position = self.glyphs.get_index_of(&name).unwrap_or(self.glyphs.len());
        for component in glyph.body.components() {
            if component.glyph == name {
                return Err(Error::ComponentCycle(name));
            }
            let Some(index) = self.glyphs.get_index_of(&component.glyph) else {
                return Err(Error::UnknownGlyph(component.glyph.clone()));
            };
            if index >= position {
                if self.reaches(&component.glyph, &name) {
                    return Err(Error::ComponentCycle(name));
                }
                return Err(Error::ForwardReference {
                    glyph: name,
                    component: component.glyph.clone(),
                });
            }
        }
        self.glyphs.insert(name, glyph);
        Ok(())
    }

    /// Whether `target` is reachable from `from` through component references.
    fn reaches(&self, from: &GlyphName, target: &GlyphName) -> bool {
        let mut stack = vec![from];
        let mut seen = HashSet::new();
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(glyph) = self.glyphs.get(current) {
                stack.extend(glyph.body.components().iter().map(|c| &c.glyph));
            }
        }
        false
    }

    pub fn get(&self, name: &str) -> Option<&Glyph> {
        self.glyphs.get(name)
    }

    pub fn try_get(&self, name: &str) -> Result<&Glyph> {
        self.glyphs
            .get(name)
            .ok_or_else(|| Error::UnknownGlyph(GlyphName::new(name)))
    }

    pub fn metrics(&self, name: &str) -> Result<Metrics> {
        self.try_get(name).map(|g| g.metrics)
    }

    /// Override the metrics of a derived glyph (e.g. a caller-chosen side bearing).
    pub fn set_metrics(&mut self, name: &str, metrics: Metrics) -> Result<()> {
        if self.originals.contains(name) {
            return Err(Error::NameCollision(GlyphName::new(name)));
        }
        let glyph = self
            .glyphs
            .get_mut(name)
            .ok_or_else(|| Error::UnknownGlyph(GlyphName::new(name)))?;
        glyph.metrics = metrics;
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.glyphs.contains_key(name)
    }

    pub fn is_original(&self, name: &str) -> bool {
        self.originals.contains(name)
    }

    /// Whether any glyph was registered on top of the font's own.
    pub fn has_derived(&self) -> bool {
        self.glyphs.len() > self.originals.len()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyph_id(&self, name: &str) -> Option<u16> {
        self.glyphs.get_index_of(name).and_then(|i| u16::try_from(i).ok())
    }

    /// Glyph names in registration (glyph ID) order.
    pub fn glyph_order(&self) -> impl Iterator<Item = &GlyphName> {
        self.glyphs.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GlyphName, &Glyph)> {
        self.glyphs.iter()
    }

    /// Glyph mapped to `ch` by the font's best cmap.
    pub fn glyph_for_char(&self, ch: char) -> Option<&GlyphName> {
        self.cmap.get(&(ch as u32))
    }

    /// All mapped codepoints in ascending order.
    pub fn codepoints(&self) -> impl Iterator<Item = u32> + '_ {
        self.cmap.keys().copied()
    }

    /// Resolve a glyph to plain contours, following components recursively.
    pub fn flatten(&self, name: &str) -> Result<Outline> {
        self.flatten_at_depth(name, 0)
    }

    fn flatten_at_depth(&self, name: &str, depth: usize) -> Result<Outline> {
        if depth > MAX_COMPONENT_DEPTH {
            return Err(Error::ComponentCycle(GlyphName::new(name)));
        }
        match &self.try_get(name)?.body {
            GlyphBody::Outline(outline) => Ok(outline.clone()),
            GlyphBody::Composite(composite) => {
                let mut outline = Outline::default();
                for component in &composite.components {
                    let part = self.flatten_at_depth(&component.glyph, depth + 1)?;
                    let (x, y) = match component.anchor {
                        ComponentAnchor::Offset { x, y } if component.flags.scaled_offset => {
                            let p = component.linear() * Point::new(x as f64, y as f64);
                            (p.x, p.y)
                        }
                        ComponentAnchor::Offset { x, y } => (x as f64, y as f64),
                        ComponentAnchor::Points { base, component: point } => {
                            match (outline.point(base), part.point(point)) {
                                (Some(b), Some(c)) => {
                                    let c = component.linear() * Point::new(c.x as f64, c.y as f64);
                                    (b.x as f64 - c.x.round(), b.y as f64 - c.y.round())
                                }
                                _ => {
                                    warn!("{name}: anchor points of {} out of range", component.glyph);
                                    (0.0, 0.0)
                                }
                            }
                        }
                    };
                    outline.append(part.transformed(Affine::translate((x, y)) * component.linear()));
                }
                Ok(outline)
            }
        }
    }

    /// Check that every component reference resolves.
    pub fn validate_references(&self) -> Result<()> {
        for (name, glyph) in &self.glyphs {
            for component in glyph.body.components() {
                if !self.glyphs.contains_key(&component.glyph) {
                    return Err(Error::UnknownGlyph(component.glyph.clone()));
                }
            }
            if glyph.is_composite() {
                self.flatten(name)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use read_fonts::tables::glyf::CurvePoint;

    use super::*;
    use crate::{ComponentRef, Composite};

    fn outline_glyph(advance: u16) -> Glyph {
        let outline = Outline {
            contours: vec![vec![
                CurvePoint::new(10, 0, true),
                CurvePoint::new(90, 0, true),
                CurvePoint::new(50, 100, true),
            ]],
            instructions: vec![],
        };
        Glyph::new(Metrics::new(advance, 10), GlyphBody::Outline(outline))
    }

    fn composite(of: &str) -> Glyph {
        Glyph::new(
            Metrics::new(100, 0),
            GlyphBody::Composite(Composite::new(vec![ComponentRef::offset(GlyphName::new(of), 0, 0)])),
        )
    }

    fn store() -> GlyphStore {
        let mut store = GlyphStore::new(1000);
        store.insert_original(GlyphName::new(".notdef"), Glyph::empty(500));
        store.insert_original(GlyphName::new("A"), outline_glyph(600));
        store.map_codepoint(0x41, GlyphName::new("A"));
        store
    }

    #[test]
    fn test_reregister_replaces_in_place() {
        let mut store = store();
        store.register(GlyphName::new("A.hide"), Glyph::empty(600)).unwrap();
        store.register(GlyphName::new("B.hide"), Glyph::empty(0)).unwrap();
        store.register(GlyphName::new("A.hide"), Glyph::empty(0)).unwrap();

        let order: Vec<_> = store.glyph_order().map(|n| n.as_str()).collect();
        assert_eq!(order, [".notdef", "A", "A.hide", "B.hide"]);
        assert_eq!(store.metrics("A.hide").unwrap().advance, 0);
    }

    #[test]
    fn test_register_rejects_original_name() {
        let mut store = store();
        let err = store.register(GlyphName::new("A"), Glyph::empty(0)).unwrap_err();
        assert!(matches!(err, Error::NameCollision(n) if n == "A"));
    }

    #[test]
    fn test_register_rejects_unknown_component() {
        let mut store = store();
        let err = store.register(GlyphName::new("x.clone"), composite("x")).unwrap_err();
        assert!(matches!(err, Error::UnknownGlyph(n) if n == "x"));
    }

    #[test]
    fn test_register_rejects_cycle_and_forward_reference() {
        let mut store = store();
        store.register(GlyphName::new("p"), composite("A")).unwrap();
        store.register(GlyphName::new("q"), composite("p")).unwrap();
        store.register(GlyphName::new("r"), composite("A")).unwrap();

        let err = store.register(GlyphName::new("p"), composite("q")).unwrap_err();
        assert!(matches!(err, Error::ComponentCycle(n) if n == "p"));

        let err = store.register(GlyphName::new("p"), composite("r")).unwrap_err();
        assert!(matches!(err, Error::ForwardReference { .. }));

        let err = store.register(GlyphName::new("s"), composite("s")).unwrap_err();
        assert!(matches!(err, Error::ComponentCycle(_)));
    }

    #[test]
    fn test_flatten_applies_component_offsets() {
        let mut store = store();
        let glyph = Glyph::new(
            Metrics::new(600, 0),
            GlyphBody::Composite(Composite::new(vec![ComponentRef::offset(
                GlyphName::new("A"),
                100,
                20,
            )])),
        );
        store.register(GlyphName::new("A.shifted"), glyph).unwrap();

        let bbox = store.flatten("A.shifted").unwrap().bbox().unwrap();
        assert_eq!((bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max), (110, 20, 190, 120));
        store.validate_references().unwrap();
    }

    #[test]
    fn test_flatten_matches_anchor_points() {
        let mut store = store();
        let joined = ComponentRef {
            anchor: ComponentAnchor::Points { base: 1, component: 0 },
            ..ComponentRef::offset(GlyphName::new("A"), 0, 0)
        };
        let glyph = Glyph::new(
            Metrics::new(1200, 0),
            GlyphBody::Composite(Composite::new(vec![
                ComponentRef::offset(GlyphName::new("A"), 0, 0),
                joined,
            ])),
        );
        store.register(GlyphName::new("A_A"), glyph).unwrap();

        let outline = store.flatten("A_A").unwrap();
        assert_eq!(outline.point(3).map(|p| (p.x, p.y)), Some((90, 0)));
        let bbox = outline.bbox().unwrap();
        assert_eq!((bbox.x_min, bbox.x_max), (10, 170));
    }

    #[test]
    fn test_glyph_for_char() {
        let store = store();
        assert_eq!(store.glyph_for_char('A').map(|n| n.as_str()), Some("A"));
        assert_eq!(store.glyph_for_char('B'), None);
        assert_eq!(store.glyph_id("A"), Some(1));
    }
}
