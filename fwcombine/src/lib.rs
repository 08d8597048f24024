pub mod chip;
mod combiner;
mod config;
mod error;
pub mod fs;
mod image;
mod segment;

pub use combiner::Combiner;
pub use config::{Config, Settings, DEFAULT_CONFIG_FILE};
pub use error::Error;
pub use image::{CombinedImage, WrittenImage};
pub use segment::RomSegment;

use std::path::PathBuf;

/// Builds the combined image described by `settings` and returns its path.
pub fn combine(settings: &Settings) -> Result<PathBuf, Error> {
    Combiner::new(settings.base_offset, settings.fill_byte).combine(
        &settings.bootloader,
        &settings.main,
        &settings.output,
    )
}
