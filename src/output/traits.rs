//! Record sink trait and in-process sinks
//!
//! A sink receives every record the crawler produces, in emission order.
//! Records are handed over whole; a sink never sees a partial record.

use crate::model::JutsuRecord;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record receiver was dropped")]
    ChannelClosed,

    #[error("Sink already finished")]
    Finished,
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Receives records produced by the crawler
pub trait RecordSink {
    /// Accepts one fully extracted record
    fn accept(&mut self, record: JutsuRecord) -> OutputResult<()>;

    /// Flushes and closes the sink
    ///
    /// Called once after the crawl ends, including cancelled crawls.
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

impl<S: RecordSink + ?Sized> RecordSink for Box<S> {
    fn accept(&mut self, record: JutsuRecord) -> OutputResult<()> {
        (**self).accept(record)
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}

/// Sink that keeps every record in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<JutsuRecord>,
}

impl MemorySink {
    /// Creates an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the records received so far
    pub fn records(&self) -> &[JutsuRecord] {
        &self.records
    }

    /// Consumes the sink and returns its records
    pub fn into_records(self) -> Vec<JutsuRecord> {
        self.records
    }
}

impl RecordSink for MemorySink {
    fn accept(&mut self, record: JutsuRecord) -> OutputResult<()> {
        self.records.push(record);
        Ok(())
    }
}

/// Sink that forwards records over a tokio channel
///
/// Turns a crawl into a stream of records for a concurrent consumer.
#[derive(Debug)]
pub struct ChannelSink {
    sender: UnboundedSender<JutsuRecord>,
}

impl ChannelSink {
    pub fn new(sender: UnboundedSender<JutsuRecord>) -> Self {
        Self { sender }
    }
}

impl RecordSink for ChannelSink {
    fn accept(&mut self, record: JutsuRecord) -> OutputResult<()> {
        self.sender
            .send(record)
            .map_err(|_| OutputError::ChannelClosed)
    }
}
