use super::Chip;

/// Flash address the second stage bootloader loads the application from.
pub const APP_OFFSET: u32 = 0x10000;
/// Erased NOR flash reads back as all ones.
pub const ERASED_BYTE: u8 = 0xFF;

#[derive(Copy, Clone, Debug, Default)]
pub struct Esp32c3;

impl Chip for Esp32c3 {
    fn app_offset(&self) -> u32 {
        APP_OFFSET
    }

    fn erased_byte(&self) -> u8 {
        ERASED_BYTE
    }
}
