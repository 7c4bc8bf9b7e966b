use scriptify_font_glyphs::{Glyph, GlyphName, GlyphStore, ScaleTransform, Synthesizer};
use scriptify_font_rules::{
    Delimiters, Error, Feature, FeatureTag, LigatureOptions, Role, ScriptForm, Sequence,
    SequenceSet, compile_ligatures, compile_script, lower_ligatures, simulate::shape_names,
};

const CHARS: &[(char, &str, u16)] = &[
    ('a', "a", 500),
    ('b', "b", 520),
    ('c', "c", 480),
    ('d', "d", 510),
    ('C', "C", 600),
    ('O', "O", 650),
    ('2', "two", 500),
    ('+', "plus", 550),
    ('=', "equal", 560),
    ('^', "asciicircum", 400),
    ('_', "underscore", 500),
    ('{', "braceleft", 300),
    ('}', "braceright", 300),
    ('>', "greater", 550),
];

fn test_store() -> GlyphStore {
    let mut store = GlyphStore::new(1000);
    store.insert_original(GlyphName::new(".notdef"), Glyph::empty(500));
    for &(ch, name, advance) in CHARS {
        store.insert_original(GlyphName::new(name), Glyph::empty(advance));
        store.map_codepoint(ch as u32, GlyphName::new(name));
    }
    store
}

fn ligature_feature(store: &mut GlyphStore, texts: &[&str]) -> Feature {
    let mut set = SequenceSet::new();
    for text in texts {
        set.push(Sequence::ligature(text)).unwrap();
    }
    let resolved = set.resolve(store).unwrap();
    let chains = compile_ligatures(store, &resolved, LigatureOptions::DEFAULT).unwrap();
    let mut feature = Feature::new(FeatureTag::Calt);
    lower_ligatures(&chains, &mut feature).unwrap();
    feature
}

#[test]
fn test_longest_match_wins() {
    let mut store = test_store();
    let feature = ligature_feature(&mut store, &["ab", "abc"]);

    assert_eq!(shape_names(&feature, &["a", "b", "c"]), ["a_b_c.liga", "b.hide", "c.hide"]);
    assert_eq!(shape_names(&feature, &["a", "b", "d"]), ["a_b.liga", "b.hide", "d"]);
    assert_eq!(shape_names(&feature, &["a", "c"]), ["a", "c"]);
}

#[test]
fn test_lookup_order_is_explicit() {
    let mut store = test_store();
    let feature = ligature_feature(&mut store, &["ab", "ba", "abc"]);
    let comments: Vec<_> =
        feature.lookups().iter().map(|l| l.comment.as_deref().unwrap_or("")).collect();
    assert_eq!(comments, ["abc", "ab", "ba"]);
}

#[test]
fn test_co2_scenario() {
    let mut store = test_store();
    let feature = ligature_feature(&mut store, &["CO", "CO2"]);

    assert_eq!(
        shape_names(&feature, &["C", "O", "two"]),
        ["C_O_two.liga", "O.hide", "two.hide"]
    );
    assert_eq!(shape_names(&feature, &["C", "O"]), ["C_O.liga", "O.hide"]);
}

#[test]
fn test_consumption_completeness() {
    let mut store = test_store();
    let feature = ligature_feature(&mut store, &["abcd", "bc"]);

    let out = shape_names(&feature, &["a", "b", "c", "d"]);
    let visible: Vec<_> = out.iter().filter(|g| !g.ends_with(".hide")).collect();
    assert_eq!(visible, [&GlyphName::new("a_b_c_d.liga")]);
    assert_eq!(out[1..], ["b.hide", "c.hide", "d.hide"]);

    // A run shaped twice in a row compiles to two ligatures, not one long chain.
    let out = shape_names(&feature, &["a", "b", "c", "d", "a", "b", "c", "d"]);
    assert_eq!(out.iter().filter(|g| g.ends_with(".liga")).count(), 2);
}

#[test]
fn test_repeated_glyph_is_consumed() {
    let mut store = test_store();
    let feature = ligature_feature(&mut store, &["=="]);

    assert_eq!(
        shape_names(&feature, &["equal", "equal", "equal"]),
        ["equal_equal.liga", "equal.hide", "equal"]
    );
    assert_eq!(
        shape_names(&feature, &["equal", "equal", "equal", "equal"]),
        ["equal_equal.liga", "equal.hide", "equal_equal.liga", "equal.hide"]
    );
}

#[test]
fn test_trailing_glyph_matching_first_does_not_restart() {
    let mut store = test_store();
    let feature = ligature_feature(&mut store, &["aba"]);

    assert_eq!(
        shape_names(&feature, &["a", "b", "a", "b", "a"]),
        ["a_b_a.liga", "b.hide", "a.hide", "b", "a"]
    );
    assert_eq!(shape_names(&feature, &["a", "b", "a"]), ["a_b_a.liga", "b.hide", "a.hide"]);
}

#[test]
fn test_ligature_width_is_sum_of_parts() {
    let mut store = test_store();
    ligature_feature(&mut store, &["abc"]);
    assert_eq!(store.metrics("a_b_c.liga").unwrap().advance, 500 + 520 + 480);
    store.validate_references().unwrap();
}

#[test]
fn test_missing_glyph_leaves_store_untouched() {
    let store = test_store();
    let before = store.len();
    let mut set = SequenceSet::new();
    set.push(Sequence::ligature("ab")).unwrap();
    set.push(Sequence::ligature("az")).unwrap();

    let err = set.resolve(&store).unwrap_err();
    assert!(matches!(err, Error::MissingGlyph { ch: 'z', .. }));
    assert_eq!(store.len(), before);
}

/// Derive `.{tag}c`/`.{tag}1` (bracketed) or `.{tag}` (unbounded) forms.
fn script_forms(
    store: &mut GlyphStore,
    bases: &[&str],
    tag: &str,
    offset: f64,
    bracketed: bool,
) -> Vec<ScriptForm> {
    let mut synth = Synthesizer::new(store);
    bases
        .iter()
        .map(|base| {
            let base = GlyphName::new(*base);
            let transform = ScaleTransform::uniform(0.6, offset);
            if bracketed {
                let chain =
                    synth.derive_transformed(&base, base.with_suffix(&format!("{tag}c")), transform).unwrap();
                let first = synth.derive_composite(&chain, base.with_suffix(&format!("{tag}1"))).unwrap();
                ScriptForm { base, chain, first: Some(first) }
            } else {
                let chain = synth.derive_transformed(&base, base.with_suffix(tag), transform).unwrap();
                ScriptForm { base, chain, first: None }
            }
        })
        .collect()
}

fn run(text: &str, role: Role, delimiters: Delimiters, store: &GlyphStore) -> scriptify_font_rules::ResolvedSequence {
    let mut set = SequenceSet::new();
    set.push(Sequence::new(text, role).with_delimiters(delimiters)).unwrap();
    set.resolve(store).unwrap().remove(0)
}

#[test]
fn test_bracketed_superscript() {
    let mut store = test_store();
    let sup_run = run("ab", Role::Superscript, Delimiters::bracketed('^', '{', '}'), &store);
    let sub_run = run("ab", Role::Subscript, Delimiters::bracketed('_', '{', '}'), &store);
    let sup_forms = script_forms(&mut store, &["a", "b"], "sup", 350.0, true);
    let sub_forms = script_forms(&mut store, &["a", "b"], "sub", -100.0, true);

    let sup = compile_script(&mut store, &sup_run, sup_forms).unwrap();
    let sub = compile_script(&mut store, &sub_run, sub_forms).unwrap();
    let mut feature = Feature::new(FeatureTag::Ccmp);
    for chain in [sup, sub] {
        for lookup in chain.lower(&mut feature).unwrap().into_lookups() {
            feature.push_lookup(lookup).unwrap();
        }
    }

    let out = shape_names(&feature, &["asciicircum", "braceleft", "a", "b", "braceright"]);
    assert_eq!(out, ["hide.glyph", "braceleft.supstart", "a.supc", "b.supc", "hide.glyph"]);
    let marker_width: u16 = [&out[0], &out[1], &out[4]]
        .iter()
        .map(|g| store.metrics(g).unwrap().advance)
        .sum();
    assert_eq!(marker_width, 0);

    // A lone character after the marker takes the first-character tier.
    assert_eq!(shape_names(&feature, &["asciicircum", "a", "b"]), ["hide.glyph", "a.sup1", "b"]);
    assert_eq!(
        shape_names(&feature, &["underscore", "braceleft", "b", "braceright"]),
        ["hide.glyph", "braceleft.substart", "b.subc", "hide.glyph"]
    );
    // An empty bracket pair opens a chain that has nothing to continue.
    assert_eq!(
        shape_names(&feature, &["asciicircum", "braceleft", "braceright"]),
        ["hide.glyph", "braceleft.supstart", "braceright"]
    );
}

#[test]
fn test_unbounded_script_run() {
    let mut store = test_store();
    let sup_run = run("2+", Role::Superscript, Delimiters::marker('^'), &store);
    let sub_run = run("2", Role::Subscript, Delimiters::marker('_'), &store);
    let sup_forms = script_forms(&mut store, &["two", "plus"], "sup", 350.0, false);
    let sub_forms = script_forms(&mut store, &["two"], "sub", -100.0, false);
    let sup = compile_script(&mut store, &sup_run, sup_forms).unwrap();
    let sub = compile_script(&mut store, &sub_run, sub_forms).unwrap();

    let mut feature = Feature::new(FeatureTag::Calt);
    let sub = sub.lower(&mut feature).unwrap();
    let sup = sup.lower(&mut feature).unwrap();
    for lookup in sub.body.into_iter().chain(sup.body).chain(sup.hide).chain(sub.hide) {
        feature.push_lookup(lookup).unwrap();
    }

    assert_eq!(
        shape_names(&feature, &["C", "O", "underscore", "two"]),
        ["C", "O", "hide.glyph", "two.sub"]
    );
    assert_eq!(
        shape_names(&feature, &["C", "asciicircum", "two", "plus", "a"]),
        ["C", "hide.glyph", "two.sup", "plus.sup", "a"]
    );
    // A marker with nothing to raise stays visible.
    assert_eq!(shape_names(&feature, &["asciicircum", "a"]), ["asciicircum", "a"]);
}

#[test]
fn test_strip_decoration() {
    let mut store = test_store();
    let strip = run("abc", Role::StripDecoration, Delimiters::marker('>'), &store);
    let forms: Vec<ScriptForm> = {
        let mut synth = Synthesizer::new(&mut store);
        ["a", "b", "c"]
            .iter()
            .map(|base| {
                let base = GlyphName::new(*base);
                let chain = synth.derive_composite(&base, base.with_suffix("plain")).unwrap();
                ScriptForm { base, chain, first: None }
            })
            .collect()
    };
    let chain = compile_script(&mut store, &strip, forms).unwrap();
    let mut feature = Feature::new(FeatureTag::Calt);
    for lookup in chain.lower(&mut feature).unwrap().into_lookups() {
        feature.push_lookup(lookup).unwrap();
    }

    assert_eq!(
        shape_names(&feature, &["greater", "a", "b", "c", "a"]),
        ["greater", "a.plain", "b.plain", "c.plain", "a.plain"]
    );
    assert_eq!(shape_names(&feature, &["a", "b"]), ["a", "b"]);
}
