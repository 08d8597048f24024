pub mod esp32c3;
pub use esp32c3::Esp32c3;

/// Flash layout defaults of a target microcontroller.
pub trait Chip {
    fn app_offset(&self) -> u32;
    fn erased_byte(&self) -> u8;
}
