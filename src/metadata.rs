//! Folds a chunk stream into a [`MetadataRecord`].

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::FormatError;
use crate::png::{
    Chunk, ChunkReader, ChunkType, PhysicalDimensions, TextDecodeMode, decode_phys, decode_text,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    /// `tEXt` keyword to value; a repeated keyword keeps the last value.
    pub text: BTreeMap<String, String>,
    /// Last well-formed `pHYs`.
    pub physical: Option<PhysicalDimensions>,
    /// Every chunk type seen, decoded or not.
    pub chunk_types: BTreeSet<ChunkType>,
}

impl MetadataRecord {
    #[inline]
    pub fn text_value(&self, keyword: &str) -> Option<&str> {
        self.text.get(keyword).map(String::as_str)
    }

    #[inline]
    pub fn has_chunk(&self, chunk_type: ChunkType) -> bool {
        self.chunk_types.contains(&chunk_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodeOutcome {
    pub record: MetadataRecord,
    /// The buffer ended before `IEND`.
    pub truncated: bool,
}

pub struct MetadataAggregator {
    text_mode: TextDecodeMode,
    record: MetadataRecord,
}

impl MetadataAggregator {
    pub fn new(text_mode: TextDecodeMode) -> Self {
        Self {
            text_mode,
            record: MetadataRecord::default(),
        }
    }

    /// Only fails for a NUL inside a `tEXt` value in strict mode. Malformed
    /// `pHYs` payloads degrade to presence-only.
    pub fn push(&mut self, chunk: &Chunk<'_>) -> Result<(), FormatError> {
        self.record.chunk_types.insert(chunk.chunk_type);

        match chunk.chunk_type {
            ChunkType::TEXT => {
                let entry = decode_text(chunk.payload, self.text_mode)?;
                self.record.text.insert(entry.keyword, entry.value);
            }
            ChunkType::PHYS => match decode_phys(chunk.payload) {
                Ok(dims) => self.record.physical = Some(dims),
                Err(e) => tracing::debug!("Keeping pHYs as presence-only: {}", e),
            },
            _ => {}
        }

        Ok(())
    }

    pub fn finish(self) -> MetadataRecord {
        self.record
    }
}

/// Reads every chunk in `data` and aggregates them.
pub fn decode_metadata(
    data: &[u8],
    text_mode: TextDecodeMode,
) -> Result<DecodeOutcome, FormatError> {
    let stream = ChunkReader::read_all(data)?;
    let mut aggregator = MetadataAggregator::new(text_mode);

    for chunk in &stream.chunks {
        aggregator.push(chunk)?;
    }

    if stream.truncated {
        tracing::debug!(
            "Chunk stream truncated after {} chunks ({} bytes)",
            stream.chunks.len(),
            data.len()
        );
    }

    Ok(DecodeOutcome {
        record: aggregator.finish(),
        truncated: stream.truncated,
    })
}
