//! Core traits for record acquisition.
//!
//! The category compiler only needs one thing from the outside world: the raw
//! record for a code, or word that there is none. [`CategoryResolver`] is that
//! seam. Batch aggregation reads whole records through [`RecordSource`].

use crate::Result;
use crate::models::RawCategory;
use serde_json::Value;

/// Keys checked, in order, when naming a record that has no file name.
const NAME_KEYS: &[&str] = &["code", "postCode", "courseCode"];

/// One raw record plus the name it is filed under.
///
/// The name is the program or course code for programs and courses (taken
/// from the file stem when read from a directory) and the category code for
/// categories.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Owner name used to key the normalized output.
    pub name: String,
    /// The untyped record tree.
    pub value: Value,
}

impl RawRecord {
    /// Creates a record with an explicit name.
    #[must_use]
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Names a record from its own identifying field, or `record-<ordinal>`.
    #[must_use]
    pub fn named_from_value(value: Value, ordinal: usize) -> Self {
        let name = NAME_KEYS
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_str))
            .filter(|name| !name.is_empty())
            .map_or_else(|| format!("record-{ordinal}"), ToString::to_string);
        Self { name, value }
    }
}

/// Source of raw records for a batch.
///
/// Implementations yield records one at a time.
pub trait RecordSource {
    /// Reads the next record.
    ///
    /// Returns `Ok(None)` when the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails. A record that reads but does not
    /// decode as JSON is also an error; typed decoding happens later.
    fn next(&mut self) -> Result<Option<RawRecord>>;

    /// Returns an estimate of the total number of records.
    fn size_hint(&self) -> Option<usize> {
        None
    }
}

/// Source of raw category records.
///
/// # Contract
///
/// - `Ok(Some(record))`: the record exists.
/// - `Ok(None)`: no record for this code.
/// - `Err(_)`: the lookup itself failed (I/O, decode).
///
/// The compiler treats `Ok(None)` and `Err(_)` alike: the code contributes
/// nothing and is marked unresolvable. It never calls `resolve` twice for the
/// same code within one run.
///
/// # Example Implementation
///
/// ```rust,ignore
/// impl CategoryResolver for ApiCategories {
///     fn resolve(&self, code: &str) -> Result<Option<RawCategory>> {
///         match self.client.get_category_courses(code)? {
///             Response::Ok(body) => Ok(Some(serde_json::from_value(body)?)),
///             Response::NotFound => Ok(None),
///         }
///     }
/// }
/// ```
pub trait CategoryResolver {
    /// Loads the raw record for `code`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails for a reason other than absence.
    fn resolve(&self, code: &str) -> Result<Option<RawCategory>>;
}

impl<T: CategoryResolver + ?Sized> CategoryResolver for &T {
    fn resolve(&self, code: &str) -> Result<Option<RawCategory>> {
        (**self).resolve(code)
    }
}
