//! Read a font, run a recipe on it, write the result.

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::Result;
use log::info;
use scriptify_core::{
    Build,
    io::{FontFile, write_text},
};

/// Input and output locations of one font build.
#[derive(Debug, Clone)]
pub struct FontJob {
    pub input: FontFile,
    pub output: FontFile,
    /// Where to dump the generated feature text, if anywhere.
    pub emit_fea: Option<PathBuf>,
}

impl FontJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self { input: FontFile::new(input), output: FontFile::new(output), emit_fea: None }
    }

    pub fn with_emit_fea(mut self, path: Option<PathBuf>) -> Self {
        self.emit_fea = path;
        self
    }
}

/// Run `recipe` on the job's input font and write the font and, when asked,
/// its feature text.
pub fn run_recipe(job: &FontJob, recipe: impl FnOnce(&[u8]) -> Result<Build>) -> Result<()> {
    let start = Instant::now();
    let data = job.input.read()?;
    let build = recipe(&data)?;

    job.output.write(&build.font)?;
    if let Some(path) = &job.emit_fea {
        write_fea(path, build.fea.as_deref())?;
    }
    info!(
        "{} -> {} ({:.2}s)",
        job.input.path().display(),
        job.output.path().display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn write_fea(path: &Path, fea: Option<&str>) -> Result<()> {
    match fea {
        Some(fea) => write_text(path, fea),
        None => {
            info!("No feature text generated, {} not written", path.display());
            Ok(())
        }
    }
}
