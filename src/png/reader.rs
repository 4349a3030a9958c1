use super::{ChunkType, PNG_SIGNATURE};
use crate::cursor::ByteCursor;
use crate::error::FormatError;

/// One length-prefixed chunk, borrowing its payload from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub chunk_type: ChunkType,
    pub payload: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    ReadingChunks,
    /// An `IEND` chunk was reached.
    Complete,
    /// The buffer ran out before `IEND`.
    Truncated,
}

/// Single forward pass over a (possibly truncated) PNG byte stream.
///
/// The signature is checked up front by [`ChunkReader::new`]; after that the
/// reader only ever yields chunks or stops. Running out of input is reported
/// through [`ChunkReader::state`], never as an error, since callers routinely
/// hand in a bounded prefix of the file.
pub struct ChunkReader<'a> {
    cursor: ByteCursor<'a>,
    state: ReaderState,
}

impl<'a> ChunkReader<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self, FormatError> {
        let mut cursor = ByteCursor::new(data);
        match cursor.read_array::<8>() {
            Ok(signature) if signature == PNG_SIGNATURE => Ok(Self {
                cursor,
                state: ReaderState::ReadingChunks,
            }),
            // fewer than 8 bytes cannot be told apart from a non-PNG
            _ => Err(FormatError::BadSignature),
        }
    }

    #[inline]
    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// Byte offset of the next unread field.
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    fn read_chunk(&mut self) -> Result<Chunk<'a>, FormatError> {
        let length = self.cursor.read_u32_be()? as usize;
        let chunk_type = ChunkType(self.cursor.read_array::<4>()?);

        if chunk_type == ChunkType::IEND {
            return Ok(Chunk {
                chunk_type,
                payload: &[],
            });
        }

        let payload = self.cursor.read_bytes(length)?;
        // CRC is not verified
        self.cursor.read_bytes(4)?;

        Ok(Chunk {
            chunk_type,
            payload,
        })
    }

    /// Drains the reader into a [`ChunkStream`].
    pub fn read_all(data: &'a [u8]) -> Result<ChunkStream<'a>, FormatError> {
        let mut reader = Self::new(data)?;
        let chunks: Vec<Chunk<'a>> = reader.by_ref().collect();
        Ok(ChunkStream {
            chunks,
            truncated: reader.state() == ReaderState::Truncated,
        })
    }
}

impl<'a> Iterator for ChunkReader<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state != ReaderState::ReadingChunks {
            return None;
        }

        match self.read_chunk() {
            Ok(chunk) => {
                if chunk.chunk_type == ChunkType::IEND {
                    self.state = ReaderState::Complete;
                }
                Some(chunk)
            }
            Err(_) => {
                self.state = ReaderState::Truncated;
                None
            }
        }
    }
}

/// Every chunk read from one buffer, plus whether the stream was cut short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkStream<'a> {
    pub chunks: Vec<Chunk<'a>>,
    pub truncated: bool,
}
