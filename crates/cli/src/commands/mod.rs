//! Command implementations.

mod build;
mod palette;

pub use build::{FontJob, run_recipe};
pub use palette::remap_palette_file;
