use crate::{segment::RomSegment, Error};
use sha2::{Digest, Sha256};
use std::io::{self, Read, Write};

/// Bootloader at address 0 followed by the application at a fixed offset,
/// with the gap between them filled.
#[derive(Debug, Clone)]
pub struct CombinedImage<'a> {
    bootloader: RomSegment<'a>,
    main: RomSegment<'a>,
    fill_byte: u8,
}

/// Size and SHA-256 of an image as it was written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenImage {
    pub len: u64,
    pub sha256: [u8; 32],
}

impl<'a> CombinedImage<'a> {
    pub fn new(
        bootloader: RomSegment<'a>,
        main: RomSegment<'a>,
        fill_byte: u8,
    ) -> Result<Self, Error> {
        debug_assert_eq!(bootloader.addr, 0);
        let base_offset = main.addr;
        if bootloader.size() > base_offset as usize {
            return Err(Error::BootloaderTooLarge {
                size: bootloader.size(),
                base_offset,
            });
        }
        if main.end().is_none() {
            return Err(Error::ImageTooLarge {
                base_offset,
                size: main.size(),
            });
        }
        Ok(CombinedImage {
            bootloader,
            main,
            fill_byte,
        })
    }

    pub fn base_offset(&self) -> u32 {
        self.main.addr
    }

    pub fn fill_byte(&self) -> u8 {
        self.fill_byte
    }

    pub fn padding_len(&self) -> u64 {
        (self.base_offset() as usize - self.bootloader.size()) as u64
    }

    /// Total size of the combined image.
    pub fn size(&self) -> u64 {
        self.base_offset() as u64 + self.main.size() as u64
    }

    /// Streams the image into `writer`. The padding is never buffered.
    pub fn write_to<W: Write>(&self, writer: W) -> io::Result<WrittenImage> {
        let mut writer = HashWriter::new(writer);

        writer.write_all(&self.bootloader.data)?;
        let padded = io::copy(
            &mut io::repeat(self.fill_byte).take(self.padding_len()),
            &mut writer,
        )?;
        log::trace!(
            "Padded {:#x}..{:#x} with {:#04x}",
            self.bootloader.size(),
            self.base_offset(),
            self.fill_byte
        );
        debug_assert_eq!(padded, self.padding_len());
        writer.write_all(&self.main.data)?;
        writer.flush()?;

        Ok(writer.finish())
    }
}

struct HashWriter<W> {
    inner: W,
    hasher: Sha256,
    len: u64,
}

impl<W: Write> HashWriter<W> {
    fn new(inner: W) -> Self {
        HashWriter {
            inner,
            hasher: Sha256::new(),
            len: 0,
        }
    }

    fn finish(self) -> WrittenImage {
        let mut sha256 = [0; 32];
        sha256.copy_from_slice(&self.hasher.finalize());
        WrittenImage {
            len: self.len,
            sha256,
        }
    }
}

impl<W: Write> Write for HashWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.len += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
