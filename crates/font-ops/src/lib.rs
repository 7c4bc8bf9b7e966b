//! Table-level font rewriting and naming records.

use anyhow::{Context, Result};
use log::debug;
use read_fonts::{
    FontRef, TableProvider,
    types::{NameId, Tag},
};
use write_fonts::{
    FontBuilder,
    tables::name::{Name, NameRecord},
};

/// Tables holding one entry per glyph that are not regenerated when glyphs are added.
pub const GLYPH_COUNT_TABLES: [Tag; 3] = [Tag::new(b"hdmx"), Tag::new(b"LTSH"), Tag::new(b"DSIG")];

const WINDOWS_PLATFORM: u16 = 3;
const UNICODE_BMP_ENCODING: u16 = 1;
const ENGLISH_US: u16 = 0x409;

/// Rebuild a font: every table except those in `dropped` is copied as is,
/// then `f` may add or replace tables on the builder.
pub fn rewrite_font(
    data: &[u8],
    dropped: &[Tag],
    f: impl FnOnce(&FontRef, &mut FontBuilder) -> Result<()>,
) -> Result<Vec<u8>> {
    let font = FontRef::new(data).context("Failed to parse font")?;
    let mut builder = FontBuilder::new();

    for record in font.table_directory.table_records() {
        let tag = record.tag();
        if dropped.contains(&tag) {
            debug!("Dropping {tag}");
            continue;
        }
        if let Some(table_data) = font.table_data(tag) {
            builder.add_raw(tag, table_data);
        }
    }

    f(&font, &mut builder)?;
    Ok(builder.build())
}

/// Raw bytes of each of `tags` present in the font `data`.
pub fn extract_tables(data: &[u8], tags: &[Tag]) -> Result<Vec<(Tag, Vec<u8>)>> {
    let font = FontRef::new(data).context("Failed to parse font")?;
    Ok(tags
        .iter()
        .filter_map(|tag| font.table_data(*tag).map(|d| (*tag, d.as_bytes().to_vec())))
        .collect())
}

/// Map name table records.
///
/// The mapper receives `(name_id, current_string)`; `None` keeps the record unchanged.
pub fn map_name_records(
    font: &FontRef,
    mut mapper: impl FnMut(u16, &str) -> Option<String>,
) -> Result<Name> {
    let name = font.name().context("Font has no name table")?;
    let mut records = Vec::new();

    for record in name.name_record() {
        let Ok(current) = record.string(name.string_data()) else {
            continue;
        };
        let current: String = current.chars().collect();
        let name_id = record.name_id().to_u16();
        let string = mapper(name_id, &current).unwrap_or(current);

        records.push(NameRecord::new(
            record.platform_id(),
            record.encoding_id(),
            record.language_id(),
            NameId::new(name_id),
            string.into(),
        ));
    }

    Ok(Name::new(records))
}

/// The first decodable subfamily (ID 2) string, if any.
pub fn subfamily(font: &FontRef) -> Result<Option<String>> {
    let name = font.name().context("Font has no name table")?;
    Ok(name
        .name_record()
        .iter()
        .filter(|r| r.name_id() == NameId::SUBFAMILY_NAME)
        .find_map(|r| r.string(name.string_data()).ok())
        .map(|s| s.chars().collect()))
}

/// PostScript form of a family name: spaces removed.
pub fn postscript_name(family: &str) -> String {
    family.replace(' ', "")
}

/// A fresh name table with family, subfamily, full and PostScript names only.
///
/// The subfamily is carried over from the font (`Regular` when it has none);
/// every record is written for Windows, Unicode BMP, US English.
pub fn reset_names(font: &FontRef, family: &str) -> Result<Name> {
    let subfamily = subfamily(font)?.unwrap_or_else(|| "Regular".to_string());
    let record = |id: NameId, string: String| {
        NameRecord::new(WINDOWS_PLATFORM, UNICODE_BMP_ENCODING, ENGLISH_US, id, string.into())
    };
    Ok(Name::new(vec![
        record(NameId::FAMILY_NAME, family.to_string()),
        record(NameId::SUBFAMILY_NAME, subfamily),
        record(NameId::FULL_NAME, family.to_string()),
        record(NameId::POSTSCRIPT_NAME, postscript_name(family)),
    ]))
}

/// Replace the family, full and PostScript names in the records the font already has.
pub fn rename_family(font: &FontRef, family: &str) -> Result<Name> {
    let postscript = postscript_name(family);
    map_name_records(font, |name_id, _| match name_id {
        1 | 4 => Some(family.to_string()),
        6 => Some(postscript.clone()),
        _ => None,
    })
}
