use crate::error::FormatError;

/// Reads a big-endian `u32` at `offset`, or `None` if fewer than four bytes
/// are available there.
#[inline]
pub fn read_u32_be(data: &[u8], offset: usize) -> Option<u32> {
    let end = offset.checked_add(4)?;
    let bytes = data.get(offset..end)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Sequential reader over a borrowed byte buffer.
///
/// A failed read leaves the position untouched, so the caller can still ask
/// how much was left when the input ran out.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[inline]
    pub const fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub const fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn read_u32_be(&mut self) -> Result<u32, FormatError> {
        let value = read_u32_be(self.data, self.pos).ok_or(FormatError::Truncated {
            needed: 4,
            remaining: self.remaining(),
        })?;
        self.pos += 4;
        Ok(value)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        if n > self.remaining() {
            return Err(FormatError::Truncated {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], FormatError> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}
