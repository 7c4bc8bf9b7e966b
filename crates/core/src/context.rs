//! The build context every recipe works on.

use anyhow::{Context, Result};
use log::{debug, info};
use read_fonts::{FontRef, types::Tag};
use scriptify_font_color::ColorLayers;
use scriptify_font_glyphs::GlyphStore;
use scriptify_font_ops::{GLYPH_COUNT_TABLES, rename_family, reset_names, rewrite_font};
use scriptify_font_rules::{Feature, FeatureTag, to_fea};

use crate::features::compile_gsub;

/// What happens to the font's naming records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Naming {
    Keep,
    /// Replace the name table with family, subfamily, full and PostScript names.
    Reset(String),
    /// Rewrite family, full and PostScript names in the existing records.
    RenameFamily(String),
}

/// The result of a build: font bytes plus the feature text that was compiled
/// into them.
#[derive(Debug, Clone)]
pub struct Build {
    pub font: Vec<u8>,
    pub fea: Option<String>,
}

/// Exclusively owned state of one build.
///
/// Glyphs are added to `store`, lookups to `feature` and color assignments to
/// `colors`; [`BuildContext::finish`] writes everything into a copy of the
/// source font.
pub struct BuildContext<'a> {
    data: &'a [u8],
    pub store: GlyphStore,
    pub feature: Feature,
    pub colors: Option<ColorLayers>,
    pub naming: Naming,
}

impl<'a> BuildContext<'a> {
    pub fn load(data: &'a [u8], tag: FeatureTag) -> Result<Self> {
        let font = FontRef::new(data).context("Failed to parse font")?;
        let store = GlyphStore::from_font(&font).context("Failed to load glyphs")?;
        info!(
            "Loaded {} glyphs, {} mapped codepoints",
            store.len(),
            store.codepoints().count()
        );
        Ok(Self {
            data,
            store,
            feature: Feature::new(tag),
            colors: None,
            naming: Naming::Keep,
        })
    }

    /// Write glyphs, GSUB, color tables and names into the font.
    ///
    /// Glyph tables are only rebuilt when glyphs were added, and an empty
    /// feature leaves any GSUB the font already has in place.
    pub fn finish(self) -> Result<Build> {
        let fea = (!self.feature.is_empty()).then(|| to_fea(&self.feature));
        let gsub = match &fea {
            Some(fea) => {
                debug!("Feature text:\n{fea}");
                Some(compile_gsub(fea, &self.store)?)
            }
            None => None,
        };

        let dropped: &[Tag] = if self.store.has_derived() {
            &GLYPH_COUNT_TABLES
        } else {
            &[]
        };
        let font = rewrite_font(self.data, dropped, |font, builder| {
            if self.store.has_derived() {
                self.store.write_tables(font, builder)?;
            }
            if let Some(gsub) = gsub {
                builder.add_raw(Tag::new(b"GSUB"), gsub);
            }
            if let Some(colors) = &self.colors {
                builder.add_table(&colors.cpal()?)?;
                builder.add_table(&colors.colr(&self.store)?)?;
                info!(
                    "Colored {} glyphs with {} colors",
                    colors.len(),
                    colors.palette().len()
                );
            }
            match &self.naming {
                Naming::Keep => {}
                Naming::Reset(family) => {
                    builder.add_table(&reset_names(font, family)?)?;
                }
                Naming::RenameFamily(family) => {
                    builder.add_table(&rename_family(font, family)?)?;
                }
            }
            Ok(())
        })?;
        info!(
            "Wrote font with {} glyphs ({} bytes)",
            self.store.len(),
            font.len()
        );
        Ok(Build { font, fea })
    }
}
