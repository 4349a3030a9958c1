mod phys;
mod reader;
mod text;

pub use phys::{PHYS_PAYLOAD_LEN, PhysicalDimensions, ResolutionUnit, decode_phys};
pub use reader::{Chunk, ChunkReader, ChunkStream, ReaderState};
pub use text::{TextDecodeMode, TextEntry, decode_text};

use serde::{Serialize, Serializer};
use std::fmt;

pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Four-byte chunk type code, e.g. `IHDR` or `tEXt`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    pub const IHDR: Self = Self(*b"IHDR");
    pub const IDAT: Self = Self(*b"IDAT");
    pub const IEND: Self = Self(*b"IEND");
    pub const TEXT: Self = Self(*b"tEXt");
    pub const PHYS: Self = Self(*b"pHYs");
    pub const GAMA: Self = Self(*b"gAMA");
    pub const CHRM: Self = Self(*b"cHRM");
    pub const SRGB: Self = Self(*b"sRGB");
    pub const ICCP: Self = Self(*b"iCCP");

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<[u8; 4]> for ChunkType {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.as_bytes() {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Serialize for ChunkType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
