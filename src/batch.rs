//! Fixed-size worker pool for resolving many images at once.
//!
//! Each job owns its buffer; the only shared value is the immutable resolver.

use crossbeam_channel::bounded;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ExtractorConfig;
use crate::error::{Error, FormatError, Result};
use crate::io::read_file_prefix;
use crate::metadata::MetadataRecord;
use crate::resolver::{MetadataResolver, ResolvedPrompt};

#[derive(Debug, Clone)]
pub struct BatchItem {
    pub label: String,
    pub bytes: Vec<u8>,
}

impl BatchItem {
    pub fn new(label: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub label: String,
    pub prompt: Option<ResolvedPrompt>,
    pub truncated: bool,
    pub record: Option<MetadataRecord>,
    pub error: Option<String>,
}

impl BatchReport {
    fn failed(label: String, error: String) -> Self {
        Self {
            label,
            prompt: None,
            truncated: false,
            record: None,
            error: Some(error),
        }
    }
}

enum Job {
    Bytes(BatchItem),
    Path(PathBuf),
}

impl Job {
    fn label(&self) -> String {
        match self {
            Job::Bytes(item) => item.label.clone(),
            Job::Path(path) => path.display().to_string(),
        }
    }
}

pub struct BatchExtractor {
    pool: rayon::ThreadPool,
    resolver: Arc<MetadataResolver>,
    max_prefix_bytes: usize,
}

impl BatchExtractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        config.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.concurrency)
            .thread_name(|i| format!("pngprompt-worker-{i}"))
            .build()
            .map_err(|e| Error::Config(format!("worker pool: {e}")))?;

        Ok(Self {
            pool,
            resolver: Arc::new(MetadataResolver::new(config)?),
            max_prefix_bytes: config.max_prefix_bytes,
        })
    }

    pub fn concurrency(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Reports come back in input order.
    pub fn extract_all(&self, items: Vec<BatchItem>) -> Vec<BatchReport> {
        self.run(items.into_iter().map(Job::Bytes).collect())
    }

    /// Reads at most `max_prefix_bytes` of each file inside the worker.
    pub fn extract_paths(&self, paths: &[PathBuf]) -> Vec<BatchReport> {
        self.run(paths.iter().cloned().map(Job::Path).collect())
    }

    fn run(&self, jobs: Vec<Job>) -> Vec<BatchReport> {
        let labels: Vec<String> = jobs.iter().map(Job::label).collect();
        let (tx, rx) = bounded(self.concurrency() * 2);

        for (index, job) in jobs.into_iter().enumerate() {
            let tx = tx.clone();
            let resolver = Arc::clone(&self.resolver);
            let cap = self.max_prefix_bytes;

            self.pool.spawn(move || {
                let report = process(&resolver, job, cap);
                let _ = tx.send((index, report));
            });
        }
        drop(tx);

        in_input_order(labels, rx.iter())
    }
}

/// One report per label; a job that never sent its result (its worker
/// panicked) gets a failed report instead of disappearing.
fn in_input_order<I>(labels: Vec<String>, results: I) -> Vec<BatchReport>
where
    I: IntoIterator<Item = (usize, BatchReport)>,
{
    let mut slots: Vec<Option<BatchReport>> = vec![None; labels.len()];
    for (index, report) in results {
        slots[index] = Some(report);
    }

    slots
        .into_iter()
        .zip(labels)
        .map(|(slot, label)| {
            slot.unwrap_or_else(|| {
                tracing::warn!("No result for {}, worker did not finish", label);
                BatchReport::failed(label, "worker did not report a result".into())
            })
        })
        .collect()
}

fn process(resolver: &MetadataResolver, job: Job, cap: usize) -> BatchReport {
    let label = job.label();

    let bytes = match job {
        Job::Bytes(mut item) => {
            item.bytes.truncate(cap);
            item.bytes
        }
        Job::Path(path) => match read_file_prefix(&path, cap) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", label, e);
                return BatchReport::failed(label, e.to_string());
            }
        },
    };

    match resolver.resolve(&bytes) {
        Ok(resolution) => {
            tracing::debug!(
                "{}: {} bytes, truncated={}, prompt={}",
                label,
                bytes.len(),
                resolution.outcome.truncated,
                resolution.prompt.is_some()
            );
            BatchReport {
                label,
                prompt: resolution.prompt,
                truncated: resolution.outcome.truncated,
                record: Some(resolution.outcome.record),
                error: None,
            }
        }
        Err(FormatError::BadSignature) => {
            tracing::warn!("{} is not a PNG: {}", label, FormatError::BadSignature);
            BatchReport::failed(label, FormatError::BadSignature.to_string())
        }
        Err(e) => {
            tracing::debug!("{} rejected: {}", label, e);
            BatchReport::failed(label, e.to_string())
        }
    }
}
