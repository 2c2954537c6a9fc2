//! Record source adapters.
//!
//! | Input | Adapter |
//! |-------|---------|
//! | directory of `*.json` files | [`DirectoryRecordSource`] |
//! | `.json` / `.jsonl` / `.ndjson` file | [`JsonRecordSource`] |

mod json;

pub use json::{DirectoryRecordSource, JsonRecordSource, write_json};

use crate::io::traits::RecordSource;
use crate::{Error, Result};
use std::io::BufReader;
use std::path::Path;

/// Opens a record source for `path`, choosing the adapter by what the path is.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the path does not exist and
/// [`Error::InvalidInput`] for files with an unsupported extension.
pub fn open_source(path: &Path) -> Result<Box<dyn RecordSource>> {
    if path.is_dir() {
        return Ok(Box::new(DirectoryRecordSource::open(path)?));
    }
    if !path.exists() {
        return Err(Error::NotFound(path.display().to_string()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();
    match extension.as_str() {
        "json" | "jsonl" | "ndjson" => {
            let file = std::fs::File::open(path)
                .map_err(|e| Error::operation("open_records", format!("{}: {e}", path.display())))?;
            Ok(Box::new(JsonRecordSource::new(BufReader::new(file))))
        },
        other => Err(Error::InvalidInput(format!(
            "unsupported record file extension '{other}'"
        ))),
    }
}
