//! Recovery of generation prompts embedded in PNG `tEXt` chunks, working on
//! whatever prefix of the file is available.

pub mod batch;
pub mod config;
pub mod cursor;
pub mod error;
pub mod heuristic;
pub mod io;
pub mod metadata;
pub mod png;
pub mod resolver;

pub use batch::{BatchExtractor, BatchItem, BatchReport};
pub use config::{ExtractorConfig, HeuristicConfig, KeywordConfig, KeywordPair};
pub use error::{Error, FormatError, Result};
pub use metadata::{DecodeOutcome, MetadataAggregator, MetadataRecord, decode_metadata};
pub use resolver::{MetadataResolver, PromptSource, Resolution, ResolvedPrompt};
