//! Feature file text for a compiled [`Feature`].

use std::fmt::Write;

use log::debug;

use crate::Feature;

/// Words the feature file grammar reserves; glyphs with these names are
/// written with a leading backslash.
const RESERVED: &[&str] = &[
    "anchor", "anchorDef", "anon", "anonymous", "by", "contourpoint", "cursive", "device",
    "enum", "enumerate", "exclude_dflt", "excludeDFLT", "feature", "from", "ignore",
    "include", "include_dflt", "includeDFLT", "language", "languagesystem", "lookup",
    "lookupflag", "mark", "markClass", "nameid", "NULL", "parameters", "pos", "position",
    "required", "reversesub", "rsub", "script", "sub", "substitute", "subtable", "table",
    "useExtension", "valueRecordDef",
];

/// A glyph name as it is written in feature text.
pub(crate) fn glyph_token(name: &str) -> String {
    if RESERVED.contains(&name) { format!("\\{name}") } else { name.to_string() }
}

/// Render `feature` as feature file source.
///
/// Classes with no members and the rules that use them are left out, as are
/// lookups left without rules.
pub fn to_fea(feature: &Feature) -> String {
    let mut out = String::from("languagesystem DFLT dflt;\n");

    for (name, glyphs) in feature.classes() {
        if glyphs.is_empty() {
            debug!("Skipping empty class @{name}");
            continue;
        }
        let members: Vec<String> = glyphs.iter().map(|g| glyph_token(g)).collect();
        let _ = write!(out, "\n@{name} = [{}];", members.join(" "));
    }
    out.push('\n');

    let mut emitted = Vec::new();
    for lookup in feature.lookups() {
        let rules: Vec<_> = lookup.rules.iter().filter(|r| feature.is_live(r)).collect();
        if rules.is_empty() {
            debug!("Skipping lookup {} with no live rules", lookup.name);
            continue;
        }
        out.push('\n');
        if let Some(comment) = &lookup.comment {
            let _ = writeln!(out, "# {}", comment.replace('\n', " "));
        }
        let _ = writeln!(out, "lookup {} {{", lookup.name);
        for rule in rules {
            let _ = writeln!(out, "    {rule};");
        }
        let _ = writeln!(out, "}} {};", lookup.name);
        emitted.push(lookup.name.as_str());
    }

    let tag = feature.tag().as_str();
    let _ = writeln!(out, "\nfeature {tag} {{");
    for name in &emitted {
        let _ = writeln!(out, "    lookup {name};");
    }
    let _ = writeln!(out, "}} {tag};");
    out
}
