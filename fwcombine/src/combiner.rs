use crate::{
    chip::Chip,
    fs::{read_image, AtomicFile},
    image::CombinedImage,
    segment::RomSegment,
    Error,
};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Writes a bootloader and an application into one flash image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combiner {
    base_offset: u32,
    fill_byte: u8,
}

impl Combiner {
    pub fn new(base_offset: u32, fill_byte: u8) -> Self {
        Combiner {
            base_offset,
            fill_byte,
        }
    }

    /// Uses the application offset and erased byte of `chip`.
    pub fn for_chip(chip: &dyn Chip) -> Self {
        Self::new(chip.app_offset(), chip.erased_byte())
    }

    pub fn base_offset(&self) -> u32 {
        self.base_offset
    }

    pub fn fill_byte(&self) -> u8 {
        self.fill_byte
    }

    /// Combines the images at `bootloader` and `main` into `output` and returns
    /// the output path.
    ///
    /// Both inputs are read and the layout is checked before anything touches
    /// the destination. The output only appears once it is complete, so a
    /// failed run keeps whatever file was there before.
    pub fn combine(
        &self,
        bootloader: impl AsRef<Path>,
        main: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<PathBuf, Error> {
        let (bootloader, main, output) = (bootloader.as_ref(), main.as_ref(), output.as_ref());

        let bootloader_data = read_image(bootloader)?;
        log::debug!(
            "Bootloader {} size: {:#x} sha256: {}",
            bootloader.display(),
            bootloader_data.len(),
            hex::encode(Sha256::digest(&bootloader_data))
        );
        let main_data = read_image(main)?;
        log::debug!(
            "Application {} size: {:#x} sha256: {}",
            main.display(),
            main_data.len(),
            hex::encode(Sha256::digest(&main_data))
        );

        let image = CombinedImage::new(
            RomSegment::from_vec(0, bootloader_data),
            RomSegment::from_vec(self.base_offset, main_data),
            self.fill_byte,
        )?;
        log::info!(
            "Bootloader at 0x0, {:#x} bytes of {:#04x} padding, application at {:#x}, image size: {:#x}",
            image.padding_len(),
            image.fill_byte(),
            image.base_offset(),
            image.size()
        );

        let mut file = AtomicFile::create(output)?;
        let written = image.write_to(&mut file).map_err(|source| Error::WriteImage {
            path: file.path().to_path_buf(),
            source,
        })?;
        let output = file.commit()?;

        log::info!(
            "Wrote {} size: {:#x} sha256: {}",
            output.display(),
            written.len,
            hex::encode(written.sha256)
        );

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::{esp32c3, Esp32c3};
    use assert_matches::assert_matches;
    use std::fs;

    #[test]
    fn esp32c3_defaults() {
        let combiner = Combiner::for_chip(&Esp32c3);
        assert_eq!(combiner.base_offset(), 0x10000);
        assert_eq!(combiner.fill_byte(), 0xFF);
        assert_eq!(combiner, Combiner::new(esp32c3::APP_OFFSET, esp32c3::ERASED_BYTE));
    }

    #[test]
    fn combine_files() {
        let dir = tempfile::tempdir().unwrap();
        let bootloader = dir.path().join("bootloader.bin");
        let main = dir.path().join("main.bin");
        fs::write(&bootloader, [0xAAu8; 10]).unwrap();
        fs::write(&main, [0xBBu8; 5]).unwrap();
        let output = dir.path().join("combined/firmware.bin");

        let result = Combiner::new(20, 0xFF)
            .combine(&bootloader, &main, &output)
            .unwrap();
        assert_eq!(result, output);

        let data = fs::read(&output).unwrap();
        assert_eq!(data.len(), 25);
        assert_eq!(&data[..10], &[0xAA; 10][..]);
        assert_eq!(&data[10..20], &[0xFF; 10][..]);
        assert_eq!(&data[20..], &[0xBB; 5][..]);
    }

    #[test]
    fn missing_main_creates_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let bootloader = dir.path().join("bootloader.bin");
        fs::write(&bootloader, [0xAAu8; 10]).unwrap();
        let output = dir.path().join("out/firmware.bin");

        let err = Combiner::new(20, 0xFF)
            .combine(&bootloader, dir.path().join("main.bin"), &output)
            .unwrap_err();
        assert_matches!(err, Error::ReadImage { .. });
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
        assert!(!output.parent().unwrap().exists());
    }
}
