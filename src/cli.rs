use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::danbooru::{self, ExtractError, Extraction, PostSource};
use crate::models::{CategorizedTags, CategoryVisibility, TagCategory};
use crate::tags::combine;
use crate::tui::{ClipboardError, ClipboardWriter};

#[derive(Parser)]
#[command(name = "dantags")]
#[command(about = "Danbooru tag extractor - split a post's tags into copyable strings")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the Danbooru API base URL
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Print the combined tags of a post and exit
    Extract {
        /// Post URL, e.g. https://danbooru.donmai.us/posts/123
        url: String,
        /// Include meta tags
        #[arg(long)]
        meta: bool,
        /// Leave a category out (artist, copyright, character, general, meta)
        #[arg(long, value_name = "CATEGORY")]
        hide: Vec<TagCategory>,
        /// Also copy the combined tags to the clipboard
        #[arg(long)]
        copy: bool,
        /// Print the full categorized record as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Options of the extract command
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub meta: bool,
    pub hide: Vec<TagCategory>,
    pub json: bool,
}

impl ExtractOptions {
    /// Default visibility, with `--meta` switching meta on and `--hide` winning over both
    pub fn visibility(&self) -> CategoryVisibility {
        let mut visibility = CategoryVisibility::default();
        if self.meta {
            visibility.set(TagCategory::Meta, true);
        }
        for category in &self.hide {
            visibility.set(*category, false);
        }
        visibility
    }
}

#[derive(Serialize)]
struct ExtractReport<'a> {
    id: u64,
    post_url: String,
    preview_file_url: Option<&'a str>,
    tags: &'a CategorizedTags,
    combined: &'a str,
}

/// Text printed for a finished extraction
pub fn format_extraction(
    extraction: &Extraction,
    api_base_url: &str,
    options: &ExtractOptions,
) -> Result<String, CliError> {
    let combined = combine(&extraction.tags, &options.visibility());
    if !options.json {
        return Ok(combined);
    }

    let report = ExtractReport {
        id: extraction.post.id,
        post_url: danbooru::post_page_url(api_base_url, extraction.post.id),
        preview_file_url: extraction.post.preview_file_url.as_deref(),
        tags: &extraction.tags,
        combined: &combined,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Handle the extract command
pub fn handle_extract(
    url: &str,
    options: &ExtractOptions,
    source: &dyn PostSource,
    api_base_url: &str,
    clipboard: Option<&mut dyn ClipboardWriter>,
) -> Result<(), CliError> {
    let extraction = danbooru::extract(source, url)?;
    let output = format_extraction(&extraction, api_base_url, options)?;
    println!("{}", output);

    if let Some(clipboard) = clipboard {
        // The clipboard always gets the plain combined string, even with --json
        let combined = combine(&extraction.tags, &options.visibility());
        clipboard.set_text(&combined)?;
        info!(post_id = extraction.post.id, "copied combined tags");
        eprintln!("Copied to clipboard");
    }

    Ok(())
}
