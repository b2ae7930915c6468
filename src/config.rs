use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::dashboard::render::RenderOptions;
use crate::dashboard::Variant;
use crate::data::loader::{HeaderMode, LoadOptions};

/// Command-line arguments for panda-dash
#[derive(Parser, Debug)]
#[command(version, about = "Interactive dashboards over delimited data files")]
pub struct Args {
    /// Data file to explore; defaults to the dashboard's own dataset
    pub path: Option<PathBuf>,

    /// Which dashboard to show
    #[arg(long, value_enum)]
    pub variant: Option<Variant>,

    /// Skip this many rows before the header
    #[arg(long = "skip-rows")]
    pub skip_rows: Option<usize>,

    /// How column names are obtained
    #[arg(long, value_enum)]
    pub header: Option<HeaderMode>,

    /// Field delimiter of delimited files
    #[arg(long)]
    pub delimiter: Option<char>,

    /// JSON config file; command-line flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Source settings of a config file. Unset fields fall back to the
/// variant's default source.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub path: Option<PathBuf>,
    pub skip_rows: Option<usize>,
    pub header: Option<HeaderMode>,
    pub delimiter: Option<char>,
}

/// Contents of a `--config` JSON file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub variant: Option<Variant>,
    pub source: SourceConfig,
    pub preview_rows: Option<usize>,
    pub histogram_bins: Option<usize>,
}

impl ConfigFile {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Resolved configuration of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub variant: Variant,
    pub source: LoadOptions,
    pub preview_rows: usize,
    pub histogram_bins: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let render = RenderOptions::default();
        let variant = Variant::default();
        Self {
            variant,
            source: variant.default_source(),
            preview_rows: render.preview_rows,
            histogram_bins: render.histogram_bins,
        }
    }
}

fn ascii_delimiter(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| format!("delimiter '{delimiter}' is not a single ASCII character"))
}

impl AppConfig {
    /// Defaults < config file < command-line flags, field by field.
    pub fn resolve(args: Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => ConfigFile::from_file(path)?,
            None => ConfigFile::default(),
        };
        let source = file.source;

        let variant = args.variant.or(file.variant).unwrap_or_default();
        let fallback = variant.default_source();
        let delimiter = match args.delimiter.or(source.delimiter) {
            Some(c) => ascii_delimiter(c)?,
            None => fallback.delimiter,
        };
        let render = RenderOptions::default();

        Ok(Self {
            variant,
            source: LoadOptions {
                path: args.path.or(source.path).unwrap_or(fallback.path),
                skip_rows: args.skip_rows.or(source.skip_rows).unwrap_or(fallback.skip_rows),
                header: args.header.or(source.header).unwrap_or(fallback.header),
                delimiter,
            },
            preview_rows: file.preview_rows.unwrap_or(render.preview_rows),
            histogram_bins: file.histogram_bins.unwrap_or(render.histogram_bins),
        })
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            preview_rows: self.preview_rows,
            histogram_bins: self.histogram_bins,
        }
    }
}
