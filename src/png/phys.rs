use serde::{Serialize, Serializer};

use super::ChunkType;
use crate::cursor::read_u32_be;
use crate::error::FormatError;

pub const PHYS_PAYLOAD_LEN: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionUnit {
    Undefined,
    Meters,
    Inches,
    Unknown(u8),
}

impl ResolutionUnit {
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Undefined,
            1 => Self::Meters,
            2 => Self::Inches,
            other => Self::Unknown(other),
        }
    }

    pub const fn code(&self) -> u8 {
        match self {
            Self::Undefined => 0,
            Self::Meters => 1,
            Self::Inches => 2,
            Self::Unknown(code) => *code,
        }
    }
}

impl Serialize for ResolutionUnit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Undefined => serializer.serialize_str("undefined"),
            Self::Meters => serializer.serialize_str("meters"),
            Self::Inches => serializer.serialize_str("inches"),
            Self::Unknown(code) => serializer.serialize_u8(*code),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhysicalDimensions {
    pub pixels_per_unit_x: u32,
    pub pixels_per_unit_y: u32,
    pub unit: ResolutionUnit,
}

/// Decodes a `pHYs` payload. Bytes past the ninth are ignored.
pub fn decode_phys(payload: &[u8]) -> Result<PhysicalDimensions, FormatError> {
    match (read_u32_be(payload, 0), read_u32_be(payload, 4), payload.get(8)) {
        (Some(x), Some(y), Some(&unit)) => Ok(PhysicalDimensions {
            pixels_per_unit_x: x,
            pixels_per_unit_y: y,
            unit: ResolutionUnit::from_code(unit),
        }),
        _ => Err(FormatError::MalformedChunkPayload {
            chunk_type: ChunkType::PHYS,
            expected: PHYS_PAYLOAD_LEN,
            actual: payload.len(),
        }),
    }
}
