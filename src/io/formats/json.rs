//! JSON record sources and output writer.
//!
//! Raw records arrive either as a directory of one-record files (the layout
//! the downloaders leave behind) or as a single stream in NDJSON or array form.

use crate::io::traits::{RawRecord, RecordSource};
use crate::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};

/// JSON stream source.
///
/// Automatically detects and handles both formats:
/// - **NDJSON/JSONL**: One JSON object per line
/// - **Array**: A JSON array of objects `[{...}, {...}]`
///
/// Records are named from their `code`/`postCode`/`courseCode` field.
pub struct JsonRecordSource<R: BufRead> {
    reader: R,
    /// Buffered records when parsing array format.
    buffer: Vec<Value>,
    /// Current index into buffer.
    buffer_index: usize,
    /// Whether we've detected and started parsing.
    started: bool,
    /// Whether we're in array mode.
    array_mode: bool,
    /// Line number for error reporting.
    line_number: usize,
    /// Records handed out so far.
    emitted: usize,
}

impl<R: BufRead> JsonRecordSource<R> {
    /// Creates a new JSON stream source.
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            buffer_index: 0,
            started: false,
            array_mode: false,
            line_number: 0,
            emitted: 0,
        }
    }

    /// Reads the next non-blank line, trimmed. Line numbers keep counting
    /// across calls.
    fn next_line(&mut self) -> Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        loop {
            line.clear();
            let bytes_read = self
                .reader
                .read_until(b'\n', &mut line)
                .map_err(|e| Error::operation("read_json", e))?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let trimmed = line.trim_ascii();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_vec()));
            }
        }
    }

    /// Peeks at the first non-blank line to detect format.
    fn detect_format(&mut self) -> Result<bool> {
        self.started = true;
        let Some(first_line) = self.next_line()? else {
            return Ok(false);
        };

        if first_line.starts_with(b"[") {
            self.array_mode = true;
            let mut full_content = first_line;
            self.reader
                .read_to_end(&mut full_content)
                .map_err(|e| Error::operation("read_json", e))?;

            self.buffer = serde_json::from_slice(&full_content)
                .map_err(|e| Error::InvalidInput(format!("Failed to parse JSON array: {e}")))?;
        } else {
            let value = self.parse_line(&first_line)?;
            self.buffer.push(value);
        }

        self.buffer_index = 0;
        Ok(true)
    }

    fn parse_line(&self, line: &[u8]) -> Result<Value> {
        serde_json::from_slice(line).map_err(|e| {
            Error::InvalidInput(format!(
                "Line {}: Failed to parse JSON: {e}",
                self.line_number
            ))
        })
    }

    fn emit(&mut self, value: Value) -> RawRecord {
        let record = RawRecord::named_from_value(value, self.emitted);
        self.emitted += 1;
        record
    }
}

impl<R: BufRead> RecordSource for JsonRecordSource<R> {
    fn next(&mut self) -> Result<Option<RawRecord>> {
        if !self.started && !self.detect_format()? {
            return Ok(None);
        }

        if self.buffer_index < self.buffer.len() {
            let value = std::mem::take(&mut self.buffer[self.buffer_index]);
            self.buffer_index += 1;
            return Ok(Some(self.emit(value)));
        }
        if self.array_mode {
            return Ok(None);
        }

        let Some(line) = self.next_line()? else {
            return Ok(None);
        };
        let value = self.parse_line(&line)?;

        Ok(Some(self.emit(value)))
    }

    fn size_hint(&self) -> Option<usize> {
        if self.array_mode {
            Some(self.buffer.len())
        } else {
            None
        }
    }
}

/// Directory source: every `*.json` file is one record named by its stem.
///
/// Files are read in sorted order so output is stable across runs.
pub struct DirectoryRecordSource {
    paths: Vec<PathBuf>,
    index: usize,
}

impl DirectoryRecordSource {
    /// Lists the JSON files in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `dir` does not exist and
    /// [`Error::OperationFailed`] if it cannot be listed.
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::NotFound(dir.display().to_string()));
        }
        let entries = std::fs::read_dir(dir)
            .map_err(|e| Error::operation("list_records", format!("{}: {e}", dir.display())))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| Error::operation("list_records", e))?
                .path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(Self { paths, index: 0 })
    }
}

impl RecordSource for DirectoryRecordSource {
    fn next(&mut self) -> Result<Option<RawRecord>> {
        let Some(path) = self.paths.get(self.index) else {
            return Ok(None);
        };
        self.index += 1;

        let contents = std::fs::read(path)
            .map_err(|e| Error::operation("read_record", format!("{}: {e}", path.display())))?;
        let value: Value = serde_json::from_slice(&contents).map_err(|e| {
            Error::InvalidInput(format!("{}: failed to parse JSON: {e}", path.display()))
        })?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Some(RawRecord::new(name, value)))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.paths.len())
    }
}

/// Writes `value` as JSON, compact or indented.
///
/// # Errors
///
/// Returns an error if serialization or I/O fails.
pub fn write_json<W: Write, T: Serialize>(mut writer: W, value: &T, pretty: bool) -> Result<()> {
    let written = if pretty {
        serde_json::to_writer_pretty(&mut writer, value)
    } else {
        serde_json::to_writer(&mut writer, value)
    };
    written.map_err(|e| Error::operation("write_json", e))?;
    writeln!(writer).map_err(|e| Error::operation("write_json", e))?;
    writer.flush().map_err(|e| Error::operation("flush_json", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Cursor;

    #[test]
    fn test_ndjson_records() {
        let input = r#"{"code": "BR=1", "includeItems": []}

{"code": "BR=2"}
"#;
        let mut source = JsonRecordSource::new(Cursor::new(input));

        let first = source.next().unwrap().unwrap();
        assert_eq!(first.name, "BR=1");
        let second = source.next().unwrap().unwrap();
        assert_eq!(second.name, "BR=2");
        assert!(source.next().unwrap().is_none());
    }

    #[test]
    fn test_array_records() {
        let input = r#"[
            {"postCode": "ASMAJ1689", "title": "Computer Science Major"},
            {"title": "Untitled"}
        ]"#;
        let mut source = JsonRecordSource::new(Cursor::new(input));

        assert_eq!(source.next().unwrap().unwrap().name, "ASMAJ1689");
        assert_eq!(source.size_hint(), Some(2));
        assert_eq!(source.next().unwrap().unwrap().name, "record-1");
        assert!(source.next().unwrap().is_none());
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let input = "{\"code\": \"A\"}\n{oops}\n";
        let mut source = JsonRecordSource::new(Cursor::new(input));
        source.next().unwrap();
        let err = source.next().unwrap_err();
        assert!(err.to_string().contains("Line 2"));
    }

    #[test]
    fn test_leading_blank_lines_skipped() {
        let input = "\n  \n{\"code\": \"BR=1\"}\n{\"code\": \"BR=2\"}\n";
        let mut source = JsonRecordSource::new(Cursor::new(input));

        assert_eq!(source.next().unwrap().unwrap().name, "BR=1");
        assert_eq!(source.next().unwrap().unwrap().name, "BR=2");
        assert!(source.next().unwrap().is_none());
    }

    #[test]
    fn test_bad_first_line_keeps_stream_going() {
        let input = "{oops}\n\n{\"code\": \"BR=1\"}\n{\"code\": \"BR=2\"}\n{bad}\n";
        let mut source = JsonRecordSource::new(Cursor::new(input));

        let err = source.next().unwrap_err();
        assert!(matches!(&err, Error::InvalidInput(msg) if msg.starts_with("Line 1:")));
        assert_eq!(source.next().unwrap().unwrap().name, "BR=1");
        assert_eq!(source.next().unwrap().unwrap().name, "BR=2");
        let err = source.next().unwrap_err();
        assert!(err.to_string().contains("Line 5"));
        assert!(source.next().unwrap().is_none());
    }

    #[test]
    fn test_invalid_utf8_line_is_invalid_input() {
        let input: &[u8] = b"{\"code\": \"caf\xe9\"}\n{\"code\": \"BR=1\"}\n";
        let mut source = JsonRecordSource::new(Cursor::new(input));

        assert!(matches!(source.next(), Err(Error::InvalidInput(_))));
        assert_eq!(source.next().unwrap().unwrap().name, "BR=1");
    }

    #[test]
    fn test_empty_stream() {
        let mut source = JsonRecordSource::new(Cursor::new(""));
        assert!(source.next().unwrap().is_none());
    }

    #[test]
    fn test_directory_source_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("MAT137Y1.json"), r#"{"title": "Calculus"}"#).unwrap();
        std::fs::write(dir.path().join("CSC236H1.json"), r#"{"title": "Theory"}"#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut source = DirectoryRecordSource::open(dir.path()).unwrap();
        assert_eq!(source.size_hint(), Some(2));
        assert_eq!(source.next().unwrap().unwrap().name, "CSC236H1");
        assert_eq!(source.next().unwrap().unwrap().name, "MAT137Y1");
        assert!(source.next().unwrap().is_none());
    }

    #[test]
    fn test_directory_source_invalid_utf8_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("AAA100H1.json"), r#"{"title": "A"}"#).unwrap();
        std::fs::write(dir.path().join("BBB100H1.json"), b"{\"title\": \"caf\xe9\"}").unwrap();
        std::fs::write(dir.path().join("CCC100H1.json"), r#"{"title": "C"}"#).unwrap();

        let mut source = DirectoryRecordSource::open(dir.path()).unwrap();
        assert_eq!(source.next().unwrap().unwrap().name, "AAA100H1");
        let err = source.next().unwrap_err();
        assert!(matches!(&err, Error::InvalidInput(msg) if msg.contains("BBB100H1")));
        assert_eq!(source.next().unwrap().unwrap().name, "CCC100H1");
        assert!(source.next().unwrap().is_none());
    }

    #[test]
    fn test_write_json_compact_and_pretty() {
        let mut value = BTreeMap::new();
        value.insert("regex", "CSC[0-9]");

        let mut compact = Vec::new();
        write_json(&mut compact, &value, false).unwrap();
        assert_eq!(String::from_utf8(compact).unwrap(), "{\"regex\":\"CSC[0-9]\"}\n");

        let mut pretty = Vec::new();
        write_json(&mut pretty, &value, true).unwrap();
        assert!(String::from_utf8(pretty).unwrap().contains("\n  \"regex\""));
    }
}
