//! JSON record writers
//!
//! - `JsonLinesSink`: one JSON object per line, flushed per record
//! - `JsonArraySink`: a single JSON array, closed by `finish`

use crate::model::JutsuRecord;
use crate::output::traits::{OutputError, OutputResult, RecordSink};
use std::io::Write;

/// Writes one JSON object per line
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn accept(&mut self, record: JutsuRecord) -> OutputResult<()> {
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes every record into one JSON array
///
/// The opening bracket is written with the first record (or by `finish`
/// for an empty crawl), so the output is a valid array once `finish` runs.
pub struct JsonArraySink<W: Write> {
    writer: W,
    written: usize,
    finished: bool,
}

impl<W: Write> JsonArraySink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            finished: false,
        }
    }

    /// Consumes the sink and returns the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonArraySink<W> {
    fn accept(&mut self, record: JutsuRecord) -> OutputResult<()> {
        if self.finished {
            return Err(OutputError::Finished);
        }

        let separator: &[u8] = if self.written == 0 { b"[\n" } else { b",\n" };
        self.writer.write_all(separator)?;
        serde_json::to_writer(&mut self.writer, &record)?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }

        let closing: &[u8] = if self.written == 0 { b"[]\n" } else { b"\n]\n" };
        self.writer.write_all(closing)?;
        self.writer.flush()?;
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, classification: &str) -> JutsuRecord {
        JutsuRecord {
            name: name.to_string(),
            classification: classification.to_string(),
            description: format!("About {}.", name),
        }
    }

    #[test]
    fn test_json_lines_output() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.accept(record("Rasengan", "Ninjutsu")).unwrap();
        sink.accept(record("Kamui", "Dōjutsu")).unwrap();
        sink.finish().unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: JutsuRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first, record("Rasengan", "Ninjutsu"));
        assert!(lines[1].contains("\"jutsu_type\":\"Dōjutsu\""));
    }

    #[test]
    fn test_json_array_output() {
        let mut sink = JsonArraySink::new(Vec::new());
        sink.accept(record("Rasengan", "Ninjutsu")).unwrap();
        sink.accept(record("Chidori", "Ninjutsu")).unwrap();
        sink.finish().unwrap();

        let output = sink.into_inner();
        let parsed: Vec<JutsuRecord> = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].name, "Chidori");
    }

    #[test]
    fn test_json_array_empty() {
        let mut sink = JsonArraySink::new(Vec::new());
        sink.finish().unwrap();
        sink.finish().unwrap();

        let parsed: Vec<JutsuRecord> = serde_json::from_slice(&sink.into_inner()).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_json_array_rejects_after_finish() {
        let mut sink = JsonArraySink::new(Vec::new());
        sink.finish().unwrap();

        assert!(matches!(
            sink.accept(record("Late", "Ninjutsu")),
            Err(OutputError::Finished)
        ));
    }
}
