use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// How a NUL byte inside a `tEXt` value is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDecodeMode {
    /// Keep the value read up to the NUL.
    #[default]
    Lenient,
    /// Reject the payload with `UnexpectedNul`.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEntry {
    pub keyword: String,
    pub value: String,
}

/// Decodes a `tEXt` payload: Latin-1 keyword, NUL, Latin-1 value.
///
/// A payload with no separator at all yields the whole payload as keyword and
/// an empty value.
pub fn decode_text(payload: &[u8], mode: TextDecodeMode) -> Result<TextEntry, FormatError> {
    let (keyword_bytes, value_bytes) = match memchr::memchr(0, payload) {
        Some(sep) => (&payload[..sep], &payload[sep + 1..]),
        None => (payload, &[][..]),
    };

    let value_bytes = match memchr::memchr(0, value_bytes) {
        Some(nul) => match mode {
            TextDecodeMode::Strict => {
                return Err(FormatError::UnexpectedNul {
                    offset: keyword_bytes.len() + 1 + nul,
                });
            }
            TextDecodeMode::Lenient => &value_bytes[..nul],
        },
        None => value_bytes,
    };

    Ok(TextEntry {
        keyword: latin1(keyword_bytes),
        value: latin1(value_bytes),
    })
}

#[inline]
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
