//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use scriptify_core::{
    ByteOrder, LuminanceRange, UnicodeSelection, build_chem, build_fasta, build_liga,
    build_script, build_tint,
    config::{
        ChemOptions, DEFAULT_FAMILY, FastaOptions, HiddenAdvance, LigaOptions, LigatureOptions,
        RemapOptions, ScriptOptions, TintOptions,
    },
    io::read_text,
};

use crate::commands::{FontJob, remap_palette_file, run_recipe};

#[derive(Parser)]
#[command(name = "scriptify")]
#[command(about = "Add superscripts, chemical formulas, colored ligatures and color runs to TrueType fonts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Positional input/output plus the optional feature dump.
#[derive(Debug, Clone, Args)]
pub struct FontArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Write the generated feature file here.
    #[arg(long)]
    pub emit_fea: Option<PathBuf>,
}

impl FontArgs {
    fn job(self) -> FontJob {
        FontJob::new(self.input, self.output).with_emit_fea(self.emit_fea)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ByteOrderArg {
    Rgb,
    Bgr,
}

impl From<ByteOrderArg> for ByteOrder {
    fn from(order: ByteOrderArg) -> Self {
        match order {
            ByteOrderArg::Rgb => ByteOrder::Rgb,
            ByteOrderArg::Bgr => ByteOrder::Bgr,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HiddenAdvanceArg {
    /// Placeholders keep the width of the glyph they replace.
    Keep,
    Zero,
}

impl From<HiddenAdvanceArg> for HiddenAdvance {
    fn from(advance: HiddenAdvanceArg) -> Self {
        match advance {
            HiddenAdvanceArg::Keep => HiddenAdvance::Keep,
            HiddenAdvanceArg::Zero => HiddenAdvance::Zero,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bracketed superscript and subscript: `^{...}`, `_{...}`, `^x`, `_x`.
    Script {
        #[command(flatten)]
        font: FontArgs,
        /// `*` or comma-separated hex codepoints and ranges, e.g. `U+0041-005A,61`.
        #[arg(long, default_value = "*", value_parser = parse_unicodes)]
        unicodes: UnicodeSelection,
        #[arg(long)]
        font_name: Option<String>,
    },
    /// Chemical formulas: digits after `_`, digits and signs after `^`.
    Chem {
        #[command(flatten)]
        font: FontArgs,
        #[arg(long)]
        font_name: Option<String>,
    },
    /// Colored ligatures from a `#hex<TAB>seq<TAB>seq...` file.
    Liga {
        #[command(flatten)]
        font: FontArgs,
        #[arg(long)]
        sequences: PathBuf,
        #[arg(long, value_enum, default_value_t = ByteOrderArg::Rgb)]
        byte_order: ByteOrderArg,
        #[arg(long, value_enum, default_value_t = HiddenAdvanceArg::Keep)]
        hidden_advance: HiddenAdvanceArg,
        #[arg(long)]
        font_name: Option<String>,
    },
    /// Color characters from a `text<TAB>#hex` palette map.
    Tint {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        palette_map: PathBuf,
        #[arg(long, value_enum, default_value_t = ByteOrderArg::Bgr)]
        byte_order: ByteOrderArg,
        /// Rename the family; names are left alone otherwise.
        #[arg(long)]
        font_name: Option<String>,
    },
    /// Color FASTA residues while keeping header lines plain.
    TintFasta {
        #[command(flatten)]
        font: FontArgs,
        #[arg(long)]
        palette_map: PathBuf,
        #[arg(long, value_enum, default_value_t = ByteOrderArg::Bgr)]
        byte_order: ByteOrderArg,
        #[arg(long)]
        font_name: Option<String>,
    },
    /// Remap the lightness of a `#hex<TAB>...` palette and print it.
    RemapPalette {
        input: PathBuf,
        #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
        l_from: Option<Vec<f64>>,
        #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
        l_to: Option<Vec<f64>>,
    },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Script { font, unicodes, font_name } => {
                let options =
                    ScriptOptions { unicodes, family: family(font_name), ..Default::default() };
                run_recipe(&font.job(), |data| build_script(data, &options))?;
            }
            Commands::Chem { font, font_name } => {
                let options = ChemOptions { family: family(font_name), ..Default::default() };
                run_recipe(&font.job(), |data| build_chem(data, &options))?;
            }
            Commands::Liga { font, sequences, byte_order, hidden_advance, font_name } => {
                let sequences = read_text(&sequences)?;
                let options = LigaOptions {
                    byte_order: byte_order.into(),
                    ligatures: LigatureOptions { hidden_advance: hidden_advance.into() },
                    family: family(font_name),
                };
                run_recipe(&font.job(), |data| build_liga(data, &sequences, &options))?;
            }
            Commands::Tint { input, output, palette_map, byte_order, font_name } => {
                let palette = read_text(&palette_map)?;
                let options = TintOptions { byte_order: byte_order.into(), family: font_name };
                run_recipe(&FontJob::new(input, output), |data| build_tint(data, &palette, &options))?;
            }
            Commands::TintFasta { font, palette_map, byte_order, font_name } => {
                let palette = read_text(&palette_map)?;
                let options =
                    FastaOptions { byte_order: byte_order.into(), family: family(font_name) };
                run_recipe(&font.job(), |data| build_fasta(data, &palette, &options))?;
            }
            Commands::RemapPalette { input, l_from, l_to } => {
                let identity = LuminanceRange::IDENTITY;
                let range = LuminanceRange::new(
                    l_from.as_deref().map_or(Ok(identity.from), pair)?,
                    l_to.as_deref().map_or(Ok(identity.to), pair)?,
                )
                .context("Invalid lightness range")?;
                print!("{}", remap_palette_file(&input, &RemapOptions { range })?);
            }
        }
        Ok(())
    }
}

fn family(font_name: Option<String>) -> String {
    font_name.unwrap_or_else(|| DEFAULT_FAMILY.to_string())
}

fn pair(values: &[f64]) -> Result<(f64, f64)> {
    match values {
        [from, to] => Ok((*from, *to)),
        _ => anyhow::bail!("Expected two lightness values, got {}", values.len()),
    }
}

fn parse_unicodes(s: &str) -> Result<UnicodeSelection, String> {
    s.parse().map_err(|e| format!("{e:#}"))
}
