//! Picks the best prompt text for one buffer.
//!
//! Structured keywords always win over the raw-byte heuristic:
//!
//! 1. the configured keyword pair, joined with a space,
//! 2. the `parameters` keyword, verbatim,
//! 3. [`HeuristicExtractor`] over the raw buffer,
//! 4. nothing.

use serde::Serialize;

use crate::config::{ExtractorConfig, KeywordConfig};
use crate::error::{FormatError, Result};
use crate::heuristic::HeuristicExtractor;
use crate::metadata::{DecodeOutcome, MetadataRecord, decode_metadata};
use crate::png::TextDecodeMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptSource {
    KeywordPair,
    Parameters,
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPrompt {
    pub text: String,
    pub source: PromptSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub prompt: Option<ResolvedPrompt>,
    pub outcome: DecodeOutcome,
}

impl Resolution {
    #[inline]
    pub fn prompt_text(&self) -> Option<&str> {
        self.prompt.as_ref().map(|p| p.text.as_str())
    }
}

/// Immutable after construction and shared freely between worker threads.
pub struct MetadataResolver {
    keywords: KeywordConfig,
    text_mode: TextDecodeMode,
    heuristic: HeuristicExtractor,
}

impl MetadataResolver {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self {
            keywords: config.keywords.clone(),
            text_mode: config.text_mode,
            heuristic: HeuristicExtractor::new(&config.heuristic)?,
        })
    }

    /// Fails only for `BadSignature`, or `UnexpectedNul` in strict text mode.
    pub fn resolve(&self, data: &[u8]) -> std::result::Result<Resolution, FormatError> {
        let outcome = decode_metadata(data, self.text_mode)?;

        let prompt = self.structured_prompt(&outcome.record).or_else(|| {
            tracing::debug!("No prompt keyword found, trying heuristic scan");
            self.heuristic.extract(data).map(|text| ResolvedPrompt {
                text,
                source: PromptSource::Heuristic,
            })
        });

        Ok(Resolution { prompt, outcome })
    }

    fn structured_prompt(&self, record: &MetadataRecord) -> Option<ResolvedPrompt> {
        if let Some(pair) = &self.keywords.pair {
            if let Some(first) = record.text_value(&pair.first) {
                let second = record.text_value(&pair.second).unwrap_or_default();
                return Some(ResolvedPrompt {
                    text: format!("{first} {second}"),
                    source: PromptSource::KeywordPair,
                });
            }
        }

        record
            .text_value(&self.keywords.parameters)
            .map(|value| ResolvedPrompt {
                text: value.to_string(),
                source: PromptSource::Parameters,
            })
    }
}
