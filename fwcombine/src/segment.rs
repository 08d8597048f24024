use std::borrow::Cow;
use std::convert::TryFrom;

/// A segment of data placed at a flash address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomSegment<'a> {
    pub addr: u32,
    pub data: Cow<'a, [u8]>,
}

impl<'a> RomSegment<'a> {
    pub fn size(&self) -> usize {
        self.data.len()
    }
    pub fn from_vec(addr: u32, data: Vec<u8>) -> Self {
        RomSegment {
            addr,
            data: Cow::Owned(data),
        }
    }
    pub fn from_slice(addr: u32, data: &'a [u8]) -> RomSegment<'a> {
        RomSegment {
            addr,
            data: Cow::Borrowed(data),
        }
    }
    /// First address past the end of the segment, `None` if it would not fit in 32 bits.
    pub fn end(&self) -> Option<u32> {
        u32::try_from(self.data.len())
            .ok()
            .and_then(|len| self.addr.checked_add(len))
    }
}
