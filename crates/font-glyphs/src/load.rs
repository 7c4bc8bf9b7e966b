//! Populate a [`GlyphStore`] from a TrueType font.

use std::collections::{BTreeMap, HashMap};

use log::warn;
use read_fonts::{
    FontRef, TableProvider,
    tables::{
        cmap::{Cmap, CmapIterLimits, CmapSubtable, PlatformId},
        glyf::{Anchor, CompositeGlyphFlags, Glyph as ReadGlyph},
    },
    types::{GlyphId, GlyphId16},
};

use crate::{
    ComponentAnchor, ComponentFlags, ComponentRef, Composite, Error, Glyph, GlyphBody, GlyphName,
    GlyphStore, Metrics, Outline, Result,
};

impl GlyphStore {
    /// Read glyph order, outlines, metrics and the best Unicode cmap from `font`.
    pub fn from_font(font: &FontRef) -> Result<Self> {
        let upem = font.head()?.units_per_em();
        let names = glyph_order(font);
        let glyf = font.glyf().map_err(|_| Error::MissingTable("glyf"))?;
        let loca = font.loca(None).map_err(|_| Error::MissingTable("loca"))?;
        let hmtx = font.hmtx()?;

        let mut store = GlyphStore::new(upem);
        for (gid, name) in names.iter().enumerate() {
            let glyph_id = GlyphId::new(gid as u32);
            let metrics = Metrics::new(
                hmtx.advance(glyph_id).unwrap_or(0),
                hmtx.side_bearing(glyph_id).unwrap_or(0),
            );
            let body = match loca.get_glyf(glyph_id, &glyf)? {
                Some(glyph) => convert_glyph(&glyph, name, &names)?,
                None => GlyphBody::empty(),
            };
            store.insert_original(name.clone(), Glyph::new(metrics, body));
        }

        if let Ok(cmap) = font.cmap() {
            for (codepoint, gid) in best_cmap(&cmap, CmapIterLimits::default_for_font(font)) {
                if let Some(name) = names.get(gid as usize) {
                    store.map_codepoint(codepoint, name.clone());
                }
            }
        }
        Ok(store)
    }
}

/// Glyph names from the `post` table, made unique with numeric suffixes.
fn glyph_order(font: &FontRef) -> Vec<GlyphName> {
    let num_glyphs = font.maxp().map(|m| m.num_glyphs()).unwrap_or_default();
    let post = font.post().ok();
    let mut seen: HashMap<String, usize> = HashMap::new();

    (0..num_glyphs)
        .map(|gid| {
            let name = post
                .as_ref()
                .and_then(|p| p.glyph_name(GlyphId16::new(gid)).map(str::to_owned))
                .unwrap_or_else(|| format!("glyph{gid:05}"));
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            match *count {
                1 => GlyphName::new(name),
                n => GlyphName::new(format!("{name}.{}", n - 1)),
            }
        })
        .collect()
}

fn convert_glyph(glyph: &ReadGlyph, name: &GlyphName, names: &[GlyphName]) -> Result<GlyphBody> {
    match glyph {
        ReadGlyph::Simple(simple) => {
            let mut points = simple.points();
            let mut contours = Vec::new();
            let mut start = 0usize;
            for end in simple.end_pts_of_contours() {
                let end = end.get() as usize + 1;
                let len = end
                    .checked_sub(start)
                    .ok_or_else(|| Error::MalformedGlyph(name.clone()))?;
                contours.push(points.by_ref().take(len).collect());
                start = end;
            }
            let instructions = simple.instructions().to_vec();
            Ok(GlyphBody::Outline(Outline { contours, instructions }))
        }
        ReadGlyph::Composite(composite) => {
            let components = composite
                .components()
                .filter_map(|comp| {
                    let Some(glyph) = names.get(comp.glyph.to_u16() as usize) else {
                        warn!("{name}: dropping component with glyph ID {}", comp.glyph.to_u16());
                        return None;
                    };
                    let anchor = match comp.anchor {
                        Anchor::Offset { x, y } => ComponentAnchor::Offset { x, y },
                        Anchor::Point { base, component } => {
                            ComponentAnchor::Points { base, component }
                        }
                    };
                    let t = comp.transform;
                    let has = |flag| comp.flags.contains(flag);
                    Some(ComponentRef {
                        glyph: glyph.clone(),
                        anchor,
                        scale: [t.xx.to_f32(), t.yx.to_f32(), t.xy.to_f32(), t.yy.to_f32()],
                        flags: ComponentFlags {
                            round_to_grid: has(CompositeGlyphFlags::ROUND_XY_TO_GRID),
                            use_my_metrics: has(CompositeGlyphFlags::USE_MY_METRICS),
                            scaled_offset: has(CompositeGlyphFlags::SCALED_COMPONENT_OFFSET),
                            unscaled_offset: has(CompositeGlyphFlags::UNSCALED_COMPONENT_OFFSET),
                            overlap: has(CompositeGlyphFlags::OVERLAP_COMPOUND),
                        },
                    })
                })
                .collect();
            let instructions = composite.instructions().unwrap_or_default().to_vec();
            Ok(GlyphBody::Composite(Composite { components, instructions }))
        }
    }
}

/// Codepoint → glyph ID from the preferred Unicode subtable.
fn best_cmap(cmap: &Cmap, limits: CmapIterLimits) -> BTreeMap<u32, u16> {
    let Some(subtable) = find_best_subtable(cmap) else {
        warn!("No Unicode cmap subtable; no characters mapped");
        return BTreeMap::new();
    };
    subtable
        .iter_with_limits(limits)
        .filter_map(|(codepoint, gid)| {
            let gid = u16::try_from(gid.to_u32()).ok()?;
            (gid != 0).then_some((codepoint, gid))
        })
        .collect()
}

fn find_best_subtable<'a>(cmap: &Cmap<'a>) -> Option<CmapSubtable<'a>> {
    let records = cmap.encoding_records();
    let is_unicode = |platform: PlatformId, encoding: u16, full: bool| {
        platform == PlatformId::Unicode
            || (platform == PlatformId::Windows && encoding == if full { 10 } else { 1 })
    };

    for full in [true, false] {
        for record in records {
            if !is_unicode(record.platform_id(), record.encoding_id(), full) {
                continue;
            }
            if let Ok(subtable) = record.subtable(cmap.offset_data()) {
                match (&subtable, full) {
                    (CmapSubtable::Format12(_), true) | (CmapSubtable::Format4(_), false) => {
                        return Some(subtable);
                    }
                    _ => {}
                }
            }
        }
    }
    records.iter().find_map(|r| r.subtable(cmap.offset_data()).ok())
}
