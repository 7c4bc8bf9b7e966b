//! Compile generated feature text into a GSUB table with fea-rs.

use std::{
    ffi::OsString,
    fmt::{self, Display},
    path::Path,
    sync::Arc,
};

use anyhow::{Result, anyhow};
use fea_rs::{
    Compiler, GlyphIdent as FeaRsGlyphName, GlyphMap,
    compile::{NopFeatureProvider, NopVariationInfo},
    parse::{SourceLoadError, SourceResolver},
};
use log::debug;
use read_fonts::types::Tag;
use scriptify_font_glyphs::GlyphStore;
use scriptify_font_ops::extract_tables;

/// Serves the generated feature text; there are no include files to resolve.
struct InMemoryResolver {
    content_path: OsString,
    content: Arc<str>,
}

impl SourceResolver for InMemoryResolver {
    fn get_contents(&self, path: &Path) -> Result<Arc<str>, SourceLoadError> {
        if path.as_os_str() == &*self.content_path {
            return Ok(self.content.clone());
        }
        Err(SourceLoadError::new(
            path.to_path_buf(),
            IncludeNotSupported,
        ))
    }
}

#[derive(Debug)]
struct IncludeNotSupported;

impl std::error::Error for IncludeNotSupported {}

impl Display for IncludeNotSupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("include statements are not supported")
    }
}

/// Compile `fea` against the store's glyph order and return the GSUB table bytes.
pub fn compile_gsub(fea: &str, store: &GlyphStore) -> Result<Vec<u8>> {
    let glyph_map: GlyphMap = store
        .glyph_order()
        .map(|n| Into::<FeaRsGlyphName>::into(n.as_str()))
        .collect();
    let root = OsString::new();
    let binary =
        Compiler::<'_, NopFeatureProvider, NopVariationInfo>::new(root.clone(), &glyph_map)
            .with_resolver(InMemoryResolver {
                content_path: root,
                content: Arc::from(fea),
            })
            .print_warnings(false)
            .compile_binary()
            .map_err(|e| anyhow!("Feature compilation failed: {e}"))?;

    let gsub = Tag::new(b"GSUB");
    let (_, data) = extract_tables(&binary, &[gsub])?
        .pop()
        .ok_or_else(|| anyhow!("Compiled features contain no GSUB table"))?;
    debug!("GSUB: {} bytes", data.len());
    Ok(data)
}
