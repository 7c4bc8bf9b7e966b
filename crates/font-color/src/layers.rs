//! Glyph → palette index assignments and their CPAL/COLRv0 tables.

use indexmap::IndexMap;
use log::{debug, warn};
use scriptify_font_glyphs::{GlyphName, GlyphStore};
use write_fonts::{
    NullableOffsetMarker,
    tables::{
        colr::{BaseGlyph, Colr, Layer},
        cpal::{ColorRecord, Cpal},
    },
    types::GlyphId16,
};

use crate::{Color, Error, Result};

/// Every colored glyph gets a single layer: itself, drawn in its palette color.
#[derive(Debug, Clone, Default)]
pub struct ColorLayers {
    palette: Vec<Color>,
    assignments: IndexMap<GlyphName, u16>,
}

impl ColorLayers {
    pub fn new(palette: Vec<Color>) -> Self {
        Self { palette, assignments: IndexMap::new() }
    }

    /// Color `glyph` with palette entry `index`.
    ///
    /// A glyph assigned twice keeps the later index.
    pub fn assign(&mut self, glyph: GlyphName, index: u16) -> Result<()> {
        if index as usize >= self.palette.len() {
            return Err(Error::PaletteIndex { index, len: self.palette.len() });
        }
        if let Some(previous) = self.assignments.insert(glyph.clone(), index)
            && previous != index
        {
            warn!("{glyph}: palette index {previous} replaced by {index}");
        }
        Ok(())
    }

    pub fn get(&self, glyph: &str) -> Option<u16> {
        self.assignments.get(glyph).copied()
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GlyphName, u16)> {
        self.assignments.iter().map(|(g, i)| (g, *i))
    }

    /// A single-palette CPAL table.
    pub fn cpal(&self) -> Result<Cpal> {
        let count = u16::try_from(self.palette.len())
            .map_err(|_| Error::TooManyColors(self.palette.len()))?;
        let records: Vec<ColorRecord> = self
            .palette
            .iter()
            .map(|c| ColorRecord { red: c.red, green: c.green, blue: c.blue, alpha: c.alpha })
            .collect();
        Ok(Cpal {
            num_palette_entries: count,
            num_palettes: 1,
            num_color_records: count,
            color_records_array: NullableOffsetMarker::new(Some(records)),
            color_record_indices: vec![0],
            ..Default::default()
        })
    }

    /// `(glyph ID, palette index)` pairs sorted by glyph ID.
    pub fn records(&self, store: &GlyphStore) -> Result<Vec<(u16, u16)>> {
        let mut records = self
            .assignments
            .iter()
            .map(|(glyph, index)| {
                store
                    .glyph_id(glyph)
                    .map(|gid| (gid, *index))
                    .ok_or_else(|| Error::UnknownGlyph(glyph.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        records.sort_by_key(|(gid, _)| *gid);
        Ok(records)
    }

    /// A version 0 COLR table in which each base glyph is its own single layer.
    pub fn colr(&self, store: &GlyphStore) -> Result<Colr> {
        let records = self.records(store)?;
        let base_glyphs: Vec<BaseGlyph> = records
            .iter()
            .enumerate()
            .map(|(i, (gid, _))| BaseGlyph::new(GlyphId16::new(*gid), i as u16, 1))
            .collect();
        let layers: Vec<Layer> = records
            .iter()
            .map(|(gid, index)| Layer::new(GlyphId16::new(*gid), *index))
            .collect();
        let count = u16::try_from(records.len()).map_err(|_| Error::TooManyColors(records.len()))?;
        debug!("COLR: {count} base glyphs over {} palette entries", self.palette.len());
        Ok(Colr::new(count, Some(base_glyphs), Some(layers), count))
    }
}
