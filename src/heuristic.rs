//! Best-effort prompt recovery from raw bytes
//!
//! Used when the chunk decoder found no usable keyword, e.g. when the text
//! chunk was cut mid-payload or its framing is damaged. The embedded text
//! always precedes the first image-data chunk, so everything after the
//! anchor is ignored.

use aho_corasick::AhoCorasick;
use memchr::memmem;

use crate::config::HeuristicConfig;
use crate::error::{Error, Result};

pub struct HeuristicExtractor {
    anchor: memmem::Finder<'static>,
    markers: AhoCorasick,
    min_len: usize,
}

impl HeuristicExtractor {
    pub fn new(config: &HeuristicConfig) -> Result<Self> {
        if config.anchor.is_empty() {
            return Err(Error::Config("heuristic anchor must not be empty".into()));
        }
        let markers = AhoCorasick::new(&config.markers)
            .map_err(|e| Error::Config(format!("heuristic markers: {e}")))?;

        Ok(Self {
            anchor: memmem::Finder::new(config.anchor.as_bytes()).into_owned(),
            markers,
            min_len: config.min_len,
        })
    }

    /// Returns the printable text starting at the latest marker before the
    /// anchor, if it is longer than the configured minimum.
    ///
    /// Everything up to the marker (chunk length, type tag, earlier chunks)
    /// is dropped; the marker keyword itself is kept.
    pub fn extract(&self, data: &[u8]) -> Option<String> {
        let anchor_pos = self.anchor.find(data)?;
        let head = &data[..anchor_pos];

        let marker_start = self
            .markers
            .find_overlapping_iter(head)
            .max_by_key(|m| m.end())?
            .start();

        let text: String = head[marker_start..]
            .iter()
            .copied()
            .filter(|&b| is_kept(b))
            .map(char::from)
            .collect();

        if text.len() > self.min_len {
            Some(text)
        } else {
            tracing::debug!(
                "Heuristic text too short ({} <= {} chars)",
                text.len(),
                self.min_len
            );
            None
        }
    }
}

#[inline]
fn is_kept(b: u8) -> bool {
    matches!(b, 0x20..=0x7E | b'\n' | b'\t')
}
