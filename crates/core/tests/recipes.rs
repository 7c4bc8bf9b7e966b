//! End-to-end recipe tests on a small synthetic TrueType font.

use read_fonts::{
    FontData, FontRead, FontRef, TableProvider,
    tables::glyf::{Anchor, CompositeGlyphFlags, CurvePoint, Glyph as ReadGlyph},
    types::{GlyphId, NameId, Tag},
};
use scriptify_core::{
    ByteOrder, LuminanceRange, UnicodeSelection, build_chem, build_fasta, build_liga, build_script,
    build_tint,
    config::{ChemOptions, FastaOptions, LigaOptions, RemapOptions, ScriptOptions, TintOptions},
    remap_palette_text,
};
use scriptify_font_glyphs::GlyphStore;
use write_fonts::{
    FontBuilder,
    tables::{
        cmap::Cmap,
        glyf::{Bbox, CompositeGlyph, Contour, GlyfLocaBuilder, Glyph, SimpleGlyph},
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
        name::{Name, NameRecord},
        post::Post,
    },
};

const BASIC: &[(char, &str, u16)] = &[
    (' ', "space", 250),
    ('A', "A", 600),
    ('C', "C", 600),
    ('G', "G", 620),
    ('O', "O", 650),
    ('T', "T", 560),
    ('a', "a", 500),
    ('b', "b", 520),
    ('^', "asciicircum", 400),
    ('_', "underscore", 500),
    ('{', "braceleft", 300),
    ('}', "braceright", 300),
    ('>', "greater", 550),
    ('+', "plus", 550),
    ('-', "hyphen", 350),
];

const DIGITS: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

fn rectangle(advance: u16) -> Glyph {
    let right = advance as i16 - 50;
    let points = vec![
        CurvePoint::new(50, 0, true),
        CurvePoint::new(right, 0, true),
        CurvePoint::new(right, 700, true),
        CurvePoint::new(50, 700, true),
    ];
    Glyph::Simple(SimpleGlyph {
        bbox: Bbox {
            x_min: 50,
            y_min: 0,
            x_max: right,
            y_max: 700,
        },
        contours: vec![Contour::from(points)],
        instructions: vec![],
    })
}

/// `A` with a half-size `hyphen` hung off its top right corner by point
/// matching, carrying its own hinting instructions.
fn accented(a: u16, mark: u16) -> Glyph {
    let [a, mark] = [a.to_be_bytes(), mark.to_be_bytes()];
    #[rustfmt::skip]
    let data = [
        0xFF, 0xFF, 0x00, 0x32, 0x00, 0x00, 0x02, 0xA3, 0x04, 0x1A,
        // more components, xy values, round to grid, use my metrics
        0x02, 0x26, a[0], a[1], 0x00, 0x00,
        // instructions, scale, scaled offset; point 0 onto point 2
        0x09, 0x08, mark[0], mark[1], 0x02, 0x00, 0x20, 0x00,
        0x00, 0x03, 0xB0, 0x01, 0x2C,
    ];
    Glyph::Composite(CompositeGlyph::read(FontData::new(&data)).unwrap())
}

/// A font with `.notdef` followed by `chars`, each a rectangle inset by 50 units.
///
/// `Adieresis` is built as a composite of `A` and `hyphen`.
fn make_font(chars: &[(char, &str, u16)]) -> Vec<u8> {
    let mut glyphs: Vec<(&str, u16)> = vec![(".notdef", 500)];
    glyphs.extend(chars.iter().map(|&(_, name, advance)| (name, advance)));
    let gid = |name: &str| glyphs.iter().position(|&(n, _)| n == name).unwrap() as u16;

    let mut glyf_builder = GlyfLocaBuilder::new();
    for &(name, advance) in &glyphs {
        let glyph = match name {
            "space" | ".notdef" => Glyph::Empty,
            "Adieresis" => accented(gid("A"), gid("hyphen")),
            _ => rectangle(advance),
        };
        glyf_builder.add_glyph(&glyph).unwrap();
    }
    let (glyf, loca, loca_format) = glyf_builder.build();

    let mappings: Vec<(char, GlyphId)> = chars
        .iter()
        .enumerate()
        .map(|(i, &(ch, _, _))| (ch, GlyphId::new(i as u32 + 1)))
        .collect();
    let cmap = Cmap::from_mappings(mappings).unwrap();

    let head = Head {
        font_revision: font_types::Fixed::from_f64(1.0),
        checksum_adjustment: 0,
        magic_number: 0x5F0F3CF5,
        flags: write_fonts::tables::head::Flags::empty(),
        units_per_em: 1000,
        created: font_types::LongDateTime::new(0),
        modified: font_types::LongDateTime::new(0),
        x_min: 0,
        y_min: 0,
        x_max: 600,
        y_max: 700,
        mac_style: write_fonts::tables::head::MacStyle::empty(),
        lowest_rec_ppem: 8,
        font_direction_hint: 2,
        index_to_loc_format: match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
    };
    let hhea = Hhea {
        ascender: font_types::FWord::new(800),
        descender: font_types::FWord::new(-200),
        line_gap: font_types::FWord::new(0),
        advance_width_max: font_types::UfWord::new(650),
        min_left_side_bearing: font_types::FWord::new(0),
        min_right_side_bearing: font_types::FWord::new(0),
        x_max_extent: font_types::FWord::new(600),
        caret_slope_rise: 1,
        caret_slope_run: 0,
        caret_offset: 0,
        number_of_h_metrics: glyphs.len() as u16,
    };
    let hmtx = Hmtx {
        h_metrics: glyphs
            .iter()
            .map(|&(name, advance)| LongMetric {
                advance,
                side_bearing: if name == "space" || name == ".notdef" {
                    0
                } else {
                    50
                },
            })
            .collect(),
        left_side_bearings: vec![],
    };
    let maxp = Maxp {
        num_glyphs: glyphs.len() as u16,
        max_points: Some(4),
        max_contours: Some(1),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(1),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    };
    let post = Post::new_v2(glyphs.iter().map(|(name, _)| *name).collect::<Vec<_>>());
    let record =
        |id: u16, s: &str| NameRecord::new(3, 1, 0x409, NameId::new(id), s.to_string().into());
    let name = Name::new(vec![
        record(1, "Test Sans"),
        record(2, "Regular"),
        record(4, "Test Sans"),
        record(6, "TestSans-Regular"),
    ]);

    let mut builder = FontBuilder::new();
    builder.add_table(&head).unwrap();
    builder.add_table(&hhea).unwrap();
    builder.add_table(&hmtx).unwrap();
    builder.add_table(&maxp).unwrap();
    builder.add_table(&cmap).unwrap();
    builder.add_table(&post).unwrap();
    builder.add_table(&glyf).unwrap();
    builder.add_table(&loca).unwrap();
    builder.add_table(&name).unwrap();
    builder.build()
}

fn full_font() -> Vec<u8> {
    let mut chars = BASIC.to_vec();
    for (i, name) in DIGITS.iter().enumerate() {
        chars.push((char::from(b'0' + i as u8), name, 500));
    }
    make_font(&chars)
}

fn glyph_store(data: &[u8]) -> GlyphStore {
    GlyphStore::from_font(&FontRef::new(data).unwrap()).unwrap()
}

fn feature_tags(font: &FontRef) -> Vec<Tag> {
    let gsub = font.gsub().unwrap();
    gsub.feature_list()
        .unwrap()
        .feature_records()
        .iter()
        .map(|r| r.feature_tag())
        .collect()
}

fn lookup_names(fea: &str) -> Vec<&str> {
    fea.lines()
        .filter_map(|l| l.strip_prefix("lookup ")?.strip_suffix(" {"))
        .collect()
}

fn name_string(font: &FontRef, id: NameId) -> Option<String> {
    let name = font.name().ok()?;
    name.name_record()
        .iter()
        .find(|r| r.name_id() == id)
        .and_then(|r| r.string(name.string_data()).ok())
        .map(|s| s.chars().collect())
}

#[test]
fn test_script_recipe() {
    let data = full_font();
    let options = ScriptOptions {
        unicodes: "61-62,7B-7D".parse::<UnicodeSelection>().unwrap(),
        family: "Script Sans".to_string(),
        ..Default::default()
    };
    let build = build_script(&data, &options).unwrap();
    let font = FontRef::new(&build.font).unwrap();

    let store = glyph_store(&build.font);
    for name in [
        "a.supc",
        "a.sup1",
        "a.subc",
        "a.sub1",
        "b.supc",
        "b.sub1",
        "hide.glyph",
        "braceleft.supstart",
        "braceleft.substart",
    ] {
        assert!(store.contains(name), "{name} missing");
    }
    // Brackets never get script forms.
    assert!(!store.contains("braceleft.supc"));
    assert_eq!(
        font.maxp().unwrap().num_glyphs() as usize,
        glyph_store(&data).len() + 11
    );

    assert_eq!(store.metrics("a.supc").unwrap().advance, 300);
    assert_eq!(store.metrics("a.sup1").unwrap().advance, 300);
    assert_eq!(store.metrics("hide.glyph").unwrap().advance, 0);
    let bbox = store.flatten("a.supc").unwrap().bbox().unwrap();
    assert_eq!(
        (bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max),
        (30, 350, 270, 770)
    );
    let bbox = store.flatten("a.sub1").unwrap().bbox().unwrap();
    assert_eq!((bbox.y_min, bbox.y_max), (-100, 320));

    let fea = build.fea.unwrap();
    assert_eq!(
        lookup_names(&fea),
        [
            "SUP_CHAR",
            "SUP_CHAIN_START",
            "SUP_CHAIN",
            "SUP_END",
            "HIDE_ASCIICIRCUM",
            "SUB_CHAR",
            "SUB_CHAIN_START",
            "SUB_CHAIN",
            "SUB_END",
            "HIDE_UNDERSCORE",
        ]
    );
    assert!(fea.contains("@orichar = [a b];"));
    assert_eq!(feature_tags(&font), [Tag::new(b"ccmp")]);
    assert_eq!(
        font.gsub().unwrap().lookup_list().unwrap().lookup_count(),
        10
    );

    assert_eq!(
        name_string(&font, NameId::FAMILY_NAME).as_deref(),
        Some("Script Sans")
    );
    assert_eq!(
        name_string(&font, NameId::SUBFAMILY_NAME).as_deref(),
        Some("Regular")
    );
    assert_eq!(
        name_string(&font, NameId::POSTSCRIPT_NAME).as_deref(),
        Some("ScriptSans")
    );
}

#[test]
fn test_composites_survive_rebuild() {
    let mut chars = BASIC.to_vec();
    chars.push(('\u{C4}', "Adieresis", 600));
    let data = make_font(&chars);
    let options = ScriptOptions {
        unicodes: "C4".parse().unwrap(),
        ..Default::default()
    };
    let build = build_script(&data, &options).unwrap();

    let store = glyph_store(&build.font);
    let bbox = store.flatten("Adieresis").unwrap().bbox().unwrap();
    assert_eq!(
        (bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max),
        (50, 0, 675, 1050)
    );
    let bbox = store.flatten("Adieresis.supc").unwrap().bbox().unwrap();
    assert_eq!(
        (bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max),
        (30, 350, 405, 980)
    );

    let font = FontRef::new(&build.font).unwrap();
    let gid = GlyphId::new(store.glyph_id("Adieresis").unwrap() as u32);
    let glyf = font.glyf().unwrap();
    let Some(ReadGlyph::Composite(glyph)) = font.loca(None).unwrap().get_glyf(gid, &glyf).unwrap()
    else {
        panic!("Adieresis is no longer a composite");
    };
    assert_eq!(glyph.instructions(), Some(&[0xB0, 0x01, 0x2C][..]));

    let components: Vec<_> = glyph.components().collect();
    let [base, mark] = components.as_slice() else {
        panic!("two components")
    };
    assert_eq!(base.glyph.to_u16(), store.glyph_id("A").unwrap());
    assert_eq!(base.anchor, Anchor::Offset { x: 0, y: 0 });
    assert!(base.flags.contains(CompositeGlyphFlags::USE_MY_METRICS));
    assert!(base.flags.contains(CompositeGlyphFlags::ROUND_XY_TO_GRID));

    assert_eq!(mark.glyph.to_u16(), store.glyph_id("hyphen").unwrap());
    assert_eq!(
        mark.anchor,
        Anchor::Point {
            base: 2,
            component: 0
        }
    );
    assert!(
        mark.flags
            .contains(CompositeGlyphFlags::SCALED_COMPONENT_OFFSET)
    );
    assert!(!mark.flags.contains(CompositeGlyphFlags::USE_MY_METRICS));
    assert_eq!(mark.transform.xx.to_f32(), 0.5);
}

#[test]
fn test_script_selection_skips_unmapped() {
    let data = full_font();
    let options = ScriptOptions {
        unicodes: "U+0061,U+0263".parse().unwrap(),
        ..Default::default()
    };
    let build = build_script(&data, &options).unwrap();
    let store = glyph_store(&build.font);
    assert!(store.contains("a.supc"));
    assert!(!store.contains("b.supc"));

    let options = ScriptOptions {
        unicodes: "263".parse().unwrap(),
        ..Default::default()
    };
    assert!(build_script(&data, &options).is_err());
}

#[test]
fn test_chem_recipe() {
    let data = full_font();
    let build = build_chem(&data, &ChemOptions::default()).unwrap();
    let font = FontRef::new(&build.font).unwrap();
    let store = glyph_store(&build.font);

    for name in [
        "zero.sup",
        "nine.sub",
        "plus.sup",
        "hyphen.sup",
        "hide.glyph",
    ] {
        assert!(store.contains(name), "{name} missing");
    }
    assert!(!store.contains("plus.sub"));
    assert_eq!(store.metrics("two.sub").unwrap().advance, 300);

    let fea = build.fea.unwrap();
    assert_eq!(
        lookup_names(&fea),
        [
            "SUB_CHAIN",
            "SUP_CHAIN",
            "HIDE_ASCIICIRCUM",
            "HIDE_UNDERSCORE"
        ]
    );
    assert!(fea.contains("sub @subprefix @subchar0' by @subchar;"));
    assert_eq!(feature_tags(&font), [Tag::new(b"calt")]);
    assert_eq!(
        name_string(&font, NameId::FAMILY_NAME).as_deref(),
        Some("MyFont")
    );
}

#[test]
fn test_chem_needs_digits() {
    let data = make_font(BASIC);
    let err = build_chem(&data, &ChemOptions::default()).unwrap_err();
    assert!(format!("{err:#}").contains("not mapped"), "{err:#}");
}

#[test]
fn test_liga_recipe() {
    let data = full_font();
    let sequences = "#FF0000\tCO\tCO2\n#0000FF\tA\n";
    let build = build_liga(&data, sequences, &LigaOptions::default()).unwrap();
    let font = FontRef::new(&build.font).unwrap();
    let store = glyph_store(&build.font);

    for name in ["C_O.liga", "C_O_two.liga", "O.hide", "two.hide"] {
        assert!(store.contains(name), "{name} missing");
    }
    assert_eq!(
        store.metrics("C_O_two.liga").unwrap().advance,
        600 + 650 + 500
    );
    assert_eq!(store.metrics("two.hide").unwrap().advance, 500);

    let fea = build.fea.unwrap();
    assert_eq!(lookup_names(&fea), ["LIGA_0", "LIGA_1"]);
    assert!(fea.contains("# CO2\nlookup LIGA_0"));
    assert!(fea.contains("sub C_O_two.liga O.hide two' by two.hide;"));

    let cpal = font.cpal().unwrap();
    assert_eq!(cpal.num_palette_entries(), 2);
    let colors = cpal.color_records_array().unwrap().unwrap();
    assert_eq!((colors[0].red(), colors[0].blue()), (0xFF, 0));
    assert_eq!((colors[1].red(), colors[1].blue()), (0, 0xFF));

    let colr = font.colr().unwrap();
    assert_eq!(colr.num_base_glyph_records(), 3);
    let bases = colr.base_glyph_records().unwrap().unwrap();
    let ids: Vec<u16> = bases.iter().map(|b| b.glyph_id().to_u16()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    let a = store.glyph_id("A").unwrap();
    let a_record = bases
        .iter()
        .position(|b| b.glyph_id().to_u16() == a)
        .unwrap();
    let layers = colr.layer_records().unwrap().unwrap();
    let layer = &layers[bases[a_record].first_layer_index() as usize];
    assert_eq!((layer.glyph_id().to_u16(), layer.palette_index()), (a, 1));
}

#[test]
fn test_liga_rejects_bad_input_before_writing() {
    let data = full_font();
    let err = build_liga(&data, "#FF0000\tA\nFF0000\tC\n", &LigaOptions::default()).unwrap_err();
    assert!(format!("{err:#}").contains("line 2"), "{err:#}");

    let err = build_liga(&data, "#FF0000\tCz\n", &LigaOptions::default()).unwrap_err();
    assert!(format!("{err:#}").contains("'z'"), "{err:#}");

    let err = build_liga(&data, "#FF0000\tCO\n#00FF00\tCO\n", &LigaOptions::default()).unwrap_err();
    assert!(format!("{err:#}").contains("CO"), "{err:#}");
}

#[test]
fn test_tint_recipe() {
    let data = full_font();
    let build = build_tint(&data, "a\t#0000FF\nT\t#00FF00\n", &TintOptions::default()).unwrap();
    let font = FontRef::new(&build.font).unwrap();

    assert!(build.fea.is_none());
    assert!(font.gsub().is_err());
    assert_eq!(
        font.maxp().unwrap().num_glyphs(),
        FontRef::new(&data).unwrap().maxp().unwrap().num_glyphs()
    );

    // Byte order defaults to BGR: #0000FF is red.
    let colors = font.cpal().unwrap().color_records_array().unwrap().unwrap();
    assert_eq!((colors[0].red(), colors[0].blue()), (0xFF, 0));
    // a, A and T; lowercase t is not in the font.
    assert_eq!(font.colr().unwrap().num_base_glyph_records(), 3);
    assert_eq!(
        name_string(&font, NameId::FAMILY_NAME).as_deref(),
        Some("Test Sans")
    );

    let options = TintOptions {
        byte_order: ByteOrder::Rgb,
        family: Some("Tinted Sans".into()),
    };
    let build = build_tint(&data, "a\t#0000FF\n", &options).unwrap();
    let font = FontRef::new(&build.font).unwrap();
    let colors = font.cpal().unwrap().color_records_array().unwrap().unwrap();
    assert_eq!(colors[0].blue(), 0xFF);
    assert_eq!(
        name_string(&font, NameId::FAMILY_NAME).as_deref(),
        Some("Tinted Sans")
    );
    assert_eq!(
        name_string(&font, NameId::POSTSCRIPT_NAME).as_deref(),
        Some("TintedSans")
    );
    assert_eq!(
        name_string(&font, NameId::SUBFAMILY_NAME).as_deref(),
        Some("Regular")
    );
}

#[test]
fn test_fasta_recipe() {
    let data = full_font();
    let palette = "#0000FF\tA\n#00FF00\tC\tT\n";
    let build = build_fasta(&data, palette, &FastaOptions::default()).unwrap();
    let font = FontRef::new(&build.font).unwrap();
    let store = glyph_store(&build.font);

    for name in ["A.plain", "greater.plain", "zero.plain", "space.plain"] {
        assert!(store.contains(name), "{name} missing");
    }
    assert_eq!(store.metrics("A.plain").unwrap().advance, 600);

    let fea = build.fea.unwrap();
    assert_eq!(lookup_names(&fea), ["PLAIN_START", "PLAIN_CHAIN"]);
    assert!(fea.contains("sub greater @original' by @plain;"));
    assert!(fea.contains("sub @plain @original' by @plain;"));
    assert_eq!(feature_tags(&font), [Tag::new(b"calt")]);

    assert_eq!(font.colr().unwrap().num_base_glyph_records(), 3);
    let colors = font.cpal().unwrap().color_records_array().unwrap().unwrap();
    assert_eq!((colors[0].red(), colors[1].green()), (0xFF, 0xFF));
}

#[test]
fn test_fasta_residue_must_be_mapped() {
    let data = full_font();
    let err = build_fasta(&data, "#0000FF\tU\n", &FastaOptions::default()).unwrap_err();
    assert!(format!("{err:#}").contains("'U'"), "{err:#}");
}

#[test]
fn test_remap_palette_text() {
    let out = remap_palette_text("#FF0000\tA\n", &RemapOptions::default()).unwrap();
    assert_eq!(out, "#FF0000\tA\n");

    let options = RemapOptions {
        range: LuminanceRange::new((0.0, 1.0), (0.0, 0.0)).unwrap(),
    };
    let out = remap_palette_text("#FFFFFF\tW\n", &options).unwrap();
    assert_eq!(out, "#000000\tW\n");
}
