use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to read image {}", path.display())]
    ReadImage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create output directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write combined image {}", path.display())]
    WriteImage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to move combined image into place at {}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("bootloader is {size:#x} bytes, larger than the application offset {base_offset:#x}")]
    BootloaderTooLarge { size: usize, base_offset: u32 },
    #[error("application of {size:#x} bytes at {base_offset:#x} exceeds the 32-bit address space")]
    ImageTooLarge { base_offset: u32, size: usize },
    #[error("failed to read config file {}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("no {0} path given, pass it on the command line or in the config file")]
    MissingSetting(&'static str),
}

impl Error {
    /// Kind of the underlying I/O failure, if this error came from the filesystem.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Error::ReadImage { source, .. }
            | Error::CreateDir { source, .. }
            | Error::WriteImage { source, .. }
            | Error::Persist { source, .. }
            | Error::ReadConfig { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}
