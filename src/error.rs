use std::io;
use thiserror::Error;

use crate::png::ChunkType;

/// Errors raised while decoding the PNG byte layout.
///
/// Only `BadSignature` aborts a whole decode. The other variants are raised by
/// the per-field and per-chunk decoders and are normally recovered close to
/// where they happen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid PNG signature")]
    BadSignature,

    #[error("Truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("Unexpected NUL in text value at offset {offset}")]
    UnexpectedNul { offset: usize },

    #[error("Malformed {chunk_type:?} payload: expected {expected} bytes, got {actual}")]
    MalformedChunkPayload {
        chunk_type: ChunkType,
        expected: usize,
        actual: usize,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
