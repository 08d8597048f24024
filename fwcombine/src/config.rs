use crate::{chip::Chip, fs::parent_dir, Error};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "fwcombine.toml";

/// One layer of settings. Every field is optional so layers can be stacked
/// with [`Config::merge`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub bootloader: Option<PathBuf>,
    pub main: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub base_offset: Option<u32>,
    pub fill_byte: Option<u8>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bootloader: PathBuf,
    pub main: PathBuf,
    pub output: PathBuf,
    pub base_offset: u32,
    pub fill_byte: u8,
}

impl Config {
    /// Loads `path`, or [`DEFAULT_CONFIG_FILE`] if it exists when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            None => Ok(Config::default()),
        }
    }

    /// Parses a config file. Relative image paths in it are taken relative to
    /// the directory holding the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        log::debug!("Loading config {}", path.display());
        let data = std::fs::read(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_slice(&data).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(config.relative_to(parent_dir(path)))
    }

    fn relative_to(self, dir: &Path) -> Self {
        let rebase = |p: Option<PathBuf>| p.map(|p| if p.is_relative() { dir.join(p) } else { p });
        Config {
            bootloader: rebase(self.bootloader),
            main: rebase(self.main),
            output: rebase(self.output),
            ..self
        }
    }

    /// Fields set in `over` win over the ones in `self`.
    pub fn merge(self, over: Config) -> Config {
        Config {
            bootloader: over.bootloader.or(self.bootloader),
            main: over.main.or(self.main),
            output: over.output.or(self.output),
            base_offset: over.base_offset.or(self.base_offset),
            fill_byte: over.fill_byte.or(self.fill_byte),
        }
    }

    /// Fills the offset and fill byte from `chip` where unset and checks
    /// that every path is present.
    pub fn resolve(self, chip: &dyn Chip) -> Result<Settings, Error> {
        Ok(Settings {
            bootloader: self.bootloader.ok_or(Error::MissingSetting("bootloader"))?,
            main: self.main.ok_or(Error::MissingSetting("main"))?,
            output: self.output.ok_or(Error::MissingSetting("output"))?,
            base_offset: self.base_offset.unwrap_or_else(|| chip.app_offset()),
            fill_byte: self.fill_byte.unwrap_or_else(|| chip.erased_byte()),
        })
    }
}
