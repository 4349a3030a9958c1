//! Tunable extraction settings
//!
//! Every field has a default, and a JSON file only needs to name what it
//! overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::io::DEFAULT_PREFIX_CAP;
use crate::png::{PNG_SIGNATURE, TextDecodeMode};

/// Two `tEXt` keywords that one embedding convention writes together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordPair {
    pub first: String,
    pub second: String,
}

/// Keywords the resolver looks for in the structured text map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// Checked before `parameters`; `None` disables it.
    pub pair: Option<KeywordPair>,
    pub parameters: String,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            pair: Some(KeywordPair {
                first: "Description".to_string(),
                second: "Comment".to_string(),
            }),
            parameters: "parameters".to_string(),
        }
    }
}

/// Raw-byte fallback settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Marker that must follow the embedded text, normally the first image-data chunk.
    pub anchor: String,
    /// Tokens after which the embedded text starts.
    pub markers: Vec<String>,
    /// Recovered text must be strictly longer than this.
    pub min_len: usize,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            anchor: "IDAT".to_string(),
            markers: vec!["parameters".to_string(), "Description".to_string()],
            min_len: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub keywords: KeywordConfig,
    pub heuristic: HeuristicConfig,
    pub text_mode: TextDecodeMode,
    /// Bytes read from each input before decoding.
    pub max_prefix_bytes: usize,
    /// Simultaneous decodes in a batch.
    pub concurrency: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            keywords: KeywordConfig::default(),
            heuristic: HeuristicConfig::default(),
            text_mode: TextDecodeMode::Lenient,
            max_prefix_bytes: DEFAULT_PREFIX_CAP,
            concurrency: 4,
        }
    }
}

impl ExtractorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".into()));
        }
        if self.max_prefix_bytes < PNG_SIGNATURE.len() {
            return Err(Error::Config(format!(
                "max_prefix_bytes must be at least {}",
                PNG_SIGNATURE.len()
            )));
        }
        if self.heuristic.anchor.is_empty() {
            return Err(Error::Config("heuristic anchor must not be empty".into()));
        }
        if self.heuristic.markers.iter().any(String::is_empty) {
            return Err(Error::Config("heuristic markers must not be empty".into()));
        }
        Ok(())
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_max_prefix_bytes(mut self, bytes: usize) -> Self {
        self.max_prefix_bytes = bytes;
        self
    }

    pub fn with_text_mode(mut self, mode: TextDecodeMode) -> Self {
        self.text_mode = mode;
        self
    }

    pub fn with_heuristic(mut self, heuristic: HeuristicConfig) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_keywords(mut self, keywords: KeywordConfig) -> Self {
        self.keywords = keywords;
        self
    }
}
