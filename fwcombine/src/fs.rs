use crate::Error;
use std::{
    fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

/// Reads a whole image file.
pub fn read_image<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, Error> {
    let path = path.as_ref();
    fs::read(path).map_err(|source| Error::ReadImage {
        path: path.to_path_buf(),
        source,
    })
}

/// Directory the file at `path` lives in. A bare file name lives in the current directory.
pub fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// A file written next to its destination and renamed over it on
/// [`commit`](AtomicFile::commit). Dropping it uncommitted removes the
/// temporary file and leaves the destination untouched.
pub struct AtomicFile {
    path: PathBuf,
    writer: BufWriter<NamedTempFile>,
}

impl AtomicFile {
    /// Creates the destination directory if needed and opens a temporary file in it.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let dir = parent_dir(&path);
        fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut builder = tempfile::Builder::new();
        builder.prefix(".fwcombine").suffix(".tmp");
        // the umask still applies, as for a file made by File::create
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let temp = builder
            .tempfile_in(dir)
            .map_err(|source| Error::WriteImage {
                path: path.clone(),
                source,
            })?;
        log::trace!("Writing to temporary file {}", temp.path().display());

        Ok(AtomicFile {
            path,
            writer: BufWriter::new(temp),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes the data to disk and moves the file into place. A replaced
    /// file keeps its permissions.
    pub fn commit(self) -> Result<PathBuf, Error> {
        let AtomicFile { path, writer } = self;
        let temp = writer
            .into_inner()
            .map_err(|err| err.into_error())
            .and_then(|temp| {
                if let Ok(existing) = fs::metadata(&path) {
                    temp.as_file().set_permissions(existing.permissions())?;
                }
                temp.as_file().sync_all()?;
                Ok(temp)
            })
            .map_err(|source| Error::WriteImage {
                path: path.clone(),
                source,
            })?;
        temp.persist(&path).map_err(|err| Error::Persist {
            path: path.clone(),
            source: err.error,
        })?;

        Ok(path)
    }
}

impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
