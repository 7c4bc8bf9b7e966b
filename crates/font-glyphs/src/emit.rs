//! Write a [`GlyphStore`] back into font tables.
//!
//! Rebuilds glyf/loca, hmtx and post from the store and patches the header
//! tables (head, hhea, maxp) that depend on them. All other tables are left to
//! the caller.

use log::debug;
use read_fonts::{
    FontData, FontRead, FontRef, ReadError, TableProvider, tables::glyf::CompositeGlyphFlags,
};
use write_fonts::{
    FontBuilder, dump_table,
    from_obj::ToOwnedTable,
    tables::{
        glyf::{
            Anchor, Bbox, Component, ComponentFlags as WriteFlags, CompositeGlyph, Contour,
            GlyfLocaBuilder, Glyph as WriteGlyph, SimpleGlyph, Transform,
        },
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        maxp::Maxp,
        post::Post,
    },
    types::{F2Dot14, GlyphId16},
};

use crate::{
    ComponentAnchor, ComponentRef, Composite, Error, GlyphBody, GlyphName, GlyphStore, Result,
};

/// Per-font maxima that have to be reflected in `maxp`.
#[derive(Debug, Default)]
struct Profile {
    points: u16,
    contours: u16,
    component_elements: u16,
    component_depth: u16,
}

impl GlyphStore {
    /// Add glyf, loca, hmtx, post, head, hhea and maxp tables built from this
    /// store to `builder`, using `font` as the template for header fields.
    pub fn write_tables(&self, font: &FontRef, builder: &mut FontBuilder) -> Result<()> {
        if self.len() > u16::MAX as usize {
            return Err(Error::TooManyGlyphs(self.len()));
        }
        self.validate_references()?;

        let mut profile = Profile::default();
        let mut bounds: Option<Bbox> = None;
        let mut x_mins: Vec<Option<i16>> = Vec::with_capacity(self.len());
        let mut glyf_builder = GlyfLocaBuilder::new();
        for (name, glyph) in self.iter() {
            let converted = match &glyph.body {
                GlyphBody::Outline(outline) if !outline.is_empty() => {
                    profile.points = profile
                        .points
                        .max(outline.contours.iter().map(Vec::len).sum::<usize>() as u16);
                    profile.contours = profile.contours.max(outline.contours.len() as u16);
                    let bbox = outline.bbox().unwrap_or(EMPTY_BBOX);
                    x_mins.push(Some(bbox.x_min));
                    bounds = Some(union(bounds, &bbox));
                    WriteGlyph::Simple(SimpleGlyph {
                        bbox,
                        contours: outline.contours.iter().cloned().map(Contour::from).collect(),
                        instructions: outline.instructions.clone(),
                    })
                }
                GlyphBody::Outline(_) => {
                    x_mins.push(None);
                    WriteGlyph::Empty
                }
                GlyphBody::Composite(composite) => {
                    // Composites that resolve to nothing are written as empty
                    // glyphs; some sanitizers reject them otherwise.
                    match self.flatten(name)?.bbox() {
                        Some(bbox) => {
                            profile.component_elements =
                                profile.component_elements.max(composite.components.len() as u16);
                            profile.component_depth =
                                profile.component_depth.max(self.component_depth(name));
                            x_mins.push(Some(bbox.x_min));
                            bounds = Some(union(bounds, &bbox));
                            WriteGlyph::Composite(self.composite(composite, bbox)?)
                        }
                        None => {
                            debug!("{name}: composite has no ink, writing empty glyph");
                            x_mins.push(None);
                            WriteGlyph::Empty
                        }
                    }
                }
            };
            glyf_builder.add_glyph(&converted)?;
        }
        let (glyf, loca, loca_format) = glyf_builder.build();
        builder.add_table(&glyf)?;
        builder.add_table(&loca)?;

        // Derived glyphs take their side bearing from the written outline.
        let h_metrics: Vec<LongMetric> = self
            .iter()
            .zip(&x_mins)
            .map(|((name, g), x_min)| {
                let side_bearing = match x_min {
                    Some(x_min) if !self.is_original(name) => *x_min,
                    _ => g.metrics.lsb,
                };
                LongMetric { advance: g.metrics.advance, side_bearing }
            })
            .collect();
        let advance_max = h_metrics.iter().map(|m| m.advance).max().unwrap_or(0);
        let num_h_metrics = h_metrics.len() as u16;
        builder.add_table(&Hmtx::new(h_metrics, Vec::new()))?;

        let mut head: Head = font.head()?.to_owned_table();
        head.index_to_loc_format = loca_format as i16;
        if let Some(b) = bounds {
            head.x_min = head.x_min.min(b.x_min);
            head.y_min = head.y_min.min(b.y_min);
            head.x_max = head.x_max.max(b.x_max);
            head.y_max = head.y_max.max(b.y_max);
        }
        builder.add_table(&head)?;

        let mut hhea: Hhea = font.hhea()?.to_owned_table();
        hhea.number_of_h_metrics = num_h_metrics;
        hhea.advance_width_max = advance_max.into();
        builder.add_table(&hhea)?;

        let mut maxp: Maxp = font.maxp()?.to_owned_table();
        maxp.num_glyphs = self.len() as u16;
        raise(&mut maxp.max_points, profile.points);
        raise(&mut maxp.max_contours, profile.contours);
        raise(&mut maxp.max_component_elements, profile.component_elements);
        raise(&mut maxp.max_component_depth, profile.component_depth);
        builder.add_table(&maxp)?;

        builder.add_table(&self.post_table(font)?)?;
        debug!("Wrote {} glyphs ({num_h_metrics} metrics)", self.len());
        Ok(())
    }

    fn composite(&self, composite: &Composite, bbox: Bbox) -> Result<CompositeGlyph> {
        let mut converted = composite.components.iter().map(|c| self.component(c));
        let first = converted
            .next()
            .ok_or_else(|| Error::UnknownGlyph(GlyphName::new("<empty composite>")))??;
        let mut glyph = CompositeGlyph::new(first, bbox);
        for component in converted {
            glyph.add_component(component?, bbox);
        }
        with_instructions(glyph, &composite.instructions)
    }

    fn component(&self, component: &ComponentRef) -> Result<Component> {
        let gid = self
            .glyph_id(&component.glyph)
            .ok_or_else(|| Error::UnknownGlyph(component.glyph.clone()))?;
        let [xx, yx, xy, yy] = component.scale.map(F2Dot14::from_f32);
        let anchor = match component.anchor {
            ComponentAnchor::Offset { x, y } => Anchor::Offset { x, y },
            ComponentAnchor::Points { base, component } => Anchor::Point { base, component },
        };
        let flags = component.flags;
        Ok(Component {
            glyph: GlyphId16::new(gid),
            anchor,
            flags: WriteFlags {
                round_xy_to_grid: flags.round_to_grid,
                use_my_metrics: flags.use_my_metrics,
                scaled_component_offset: flags.scaled_offset,
                unscaled_component_offset: flags.unscaled_offset,
                overlap_compound: flags.overlap,
            },
            transform: Transform { xx, yx, xy, yy },
        })
    }

    fn component_depth(&self, name: &str) -> u16 {
        self.get(name)
            .map(|g| {
                g.body
                    .components()
                    .iter()
                    .map(|c| 1 + self.component_depth(&c.glyph))
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }

    /// A version 2 post table carrying the store's glyph names.
    fn post_table(&self, font: &FontRef) -> Result<Post> {
        let glyph_names: Vec<&str> = self.glyph_order().map(|n| n.as_str()).collect();
        let mut post = Post::new_v2(glyph_names);
        if let Ok(source) = font.post() {
            post.italic_angle = source.italic_angle();
            post.underline_position = source.underline_position();
            post.underline_thickness = source.underline_thickness();
            post.is_fixed_pitch = source.is_fixed_pitch();
        }
        Ok(post)
    }
}

/// Attach hinting instructions to a composite.
///
/// write-fonts only keeps composite instructions on glyphs it reads, so the
/// compiled glyph gets the instructions flag on its last component and the
/// bytecode appended, then is read back.
fn with_instructions(glyph: CompositeGlyph, instructions: &[u8]) -> Result<CompositeGlyph> {
    if instructions.is_empty() {
        return Ok(glyph);
    }
    let len = u16::try_from(instructions.len()).map_err(|_| ReadError::OutOfBounds)?;
    let mut data = dump_table(&glyph)?;
    let last = last_component(&data).ok_or(ReadError::OutOfBounds)?;
    let flags = u16::from_be_bytes([data[last], data[last + 1]])
        | CompositeGlyphFlags::WE_HAVE_INSTRUCTIONS.bits();
    data[last..last + 2].copy_from_slice(&flags.to_be_bytes());
    data.extend_from_slice(&len.to_be_bytes());
    data.extend_from_slice(instructions);
    CompositeGlyph::read(FontData::new(&data)).map_err(Error::from)
}

/// Byte offset of the flags of the last component in a compiled composite.
fn last_component(data: &[u8]) -> Option<usize> {
    // numberOfContours and the bounding box
    let mut pos = 10;
    loop {
        let flags = CompositeGlyphFlags::from_bits_truncate(u16::from_be_bytes([
            *data.get(pos)?,
            *data.get(pos + 1)?,
        ]));
        if !flags.contains(CompositeGlyphFlags::MORE_COMPONENTS) {
            return Some(pos);
        }
        let args = if flags.contains(CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS) { 4 } else { 2 };
        let transform = if flags.contains(CompositeGlyphFlags::WE_HAVE_A_SCALE) {
            2
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
            4
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO) {
            8
        } else {
            0
        };
        pos += 4 + args + transform;
    }
}

const EMPTY_BBOX: Bbox = Bbox { x_min: 0, y_min: 0, x_max: 0, y_max: 0 };

fn union(acc: Option<Bbox>, b: &Bbox) -> Bbox {
    match acc {
        None => Bbox { x_min: b.x_min, y_min: b.y_min, x_max: b.x_max, y_max: b.y_max },
        Some(a) => Bbox {
            x_min: a.x_min.min(b.x_min),
            y_min: a.y_min.min(b.y_min),
            x_max: a.x_max.max(b.x_max),
            y_max: a.y_max.max(b.y_max),
        },
    }
}

fn raise(field: &mut Option<u16>, value: u16) {
    if let Some(current) = field {
        *current = (*current).max(value);
    }
}
