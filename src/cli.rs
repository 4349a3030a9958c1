use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use pngprompt::png::TextDecodeMode;
use pngprompt::{BatchExtractor, BatchReport, ExtractorConfig};

#[derive(Parser, Debug)]
#[command(name = "pngprompt")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Show generation prompts embedded in PNG images", long_about = None)]
pub struct Cli {
    /// PNG files to inspect
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Bytes read from the start of each file
    #[arg(long)]
    pub max_bytes: Option<usize>,

    /// Files decoded at the same time
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Reject text chunks containing a NUL in their value
    #[arg(long)]
    pub strict: bool,

    /// Print one JSON document instead of text
    #[arg(long)]
    pub json: bool,

    /// Also list keywords, pHYs and chunk types
    #[arg(long)]
    pub metadata: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

impl Cli {
    pub fn log_filter(&self) -> EnvFilter {
        let default = if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    }

    pub fn build_config(&self) -> Result<ExtractorConfig> {
        let mut config = match &self.config {
            Some(path) => ExtractorConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ExtractorConfig::default(),
        };

        if let Some(bytes) = self.max_bytes {
            config = config.with_max_prefix_bytes(bytes);
        }
        if let Some(jobs) = self.jobs {
            config = config.with_concurrency(jobs);
        }
        if self.strict {
            config = config.with_text_mode(TextDecodeMode::Strict);
        }

        config.validate().context("Invalid options")?;
        Ok(config)
    }
}

pub fn run(cli: &Cli) -> Result<()> {
    let config = cli.build_config()?;
    let batch = BatchExtractor::new(&config).context("Failed to start workers")?;

    tracing::info!(
        "Inspecting {} files with {} workers, {} byte prefix",
        cli.files.len(),
        batch.concurrency(),
        config.max_prefix_bytes
    );

    let reports = batch.extract_paths(&cli.files);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &reports)?;
        writeln!(out)?;
    } else {
        for report in &reports {
            write_report(&mut out, report, cli.metadata)?;
        }
    }

    Ok(())
}

pub fn write_report<W: Write>(out: &mut W, report: &BatchReport, metadata: bool) -> Result<()> {
    match (&report.error, &report.prompt) {
        (Some(error), _) => writeln!(out, "{}: error: {}", report.label, error)?,
        (None, Some(prompt)) => writeln!(out, "{}: {}", report.label, prompt.text)?,
        (None, None) => writeln!(out, "{}: (no prompt)", report.label)?,
    }

    if !metadata {
        return Ok(());
    }

    if let Some(record) = &report.record {
        for (keyword, value) in &record.text {
            writeln!(out, "  tEXt {keyword} = {} chars", value.chars().count())?;
        }
        if let Some(phys) = &record.physical {
            writeln!(
                out,
                "  pHYs {} x {} per {:?}",
                phys.pixels_per_unit_x, phys.pixels_per_unit_y, phys.unit
            )?;
        }
        let types: Vec<String> = record.chunk_types.iter().map(|t| t.to_string()).collect();
        writeln!(out, "  chunks: {}", types.join(" "))?;
        if report.truncated {
            writeln!(out, "  (stream truncated before IEND)")?;
        }
    }

    Ok(())
}
