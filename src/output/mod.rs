//! Output module for crawl records and statistics
//!
//! This module handles:
//! - The `RecordSink` contract records are delivered through
//! - JSON Lines and JSON array writers
//! - In-memory and channel sinks for library use
//! - Crawl statistics

mod json;
pub mod stats;
mod traits;

pub use json::{JsonArraySink, JsonLinesSink};
pub use stats::{print_statistics, CrawlStats};
pub use traits::{ChannelSink, MemorySink, OutputError, OutputResult, RecordSink};

use crate::config::{OutputConfig, OutputFormat};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Opens the sink described by the output configuration
///
/// Writes to the configured file, or to stdout when no path is set.
///
/// # Returns
///
/// * `Ok(Box<dyn RecordSink + Send>)` - Ready to receive records
/// * `Err(OutputError)` - The output file could not be created
pub fn open_sink(config: &OutputConfig) -> OutputResult<Box<dyn RecordSink + Send>> {
    let writer: Box<dyn Write + Send> = match &config.path {
        Some(path) => {
            tracing::info!("Writing records to {}", path);
            Box::new(BufWriter::new(File::create(Path::new(path))?))
        }
        None => Box::new(io::stdout()),
    };

    let sink: Box<dyn RecordSink + Send> = match config.format {
        OutputFormat::JsonLines => Box::new(JsonLinesSink::new(writer)),
        OutputFormat::Json => Box::new(JsonArraySink::new(writer)),
    };

    Ok(sink)
}
