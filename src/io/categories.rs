//! Category resolvers backed by memory or by a directory of JSON files.

use crate::io::traits::CategoryResolver;
use crate::models::RawCategory;
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Characters the downloader strips from a category code to form a file stem.
const UNSAFE_FILENAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '<', '>', '|'];

/// Maps a category code to the file stem it is stored under.
///
/// `"CSC* (GR)"` becomes `"CSC (GR)"`.
#[must_use]
pub fn category_file_stem(code: &str) -> String {
    code.chars()
        .filter(|c| !UNSAFE_FILENAME_CHARS.contains(c))
        .collect()
}

/// Category records held in memory, keyed by code.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCategories {
    records: HashMap<String, RawCategory>,
}

impl InMemoryCategories {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from records, keyed by each record's own code.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = RawCategory>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Adds or replaces a record.
    pub fn insert(&mut self, record: RawCategory) {
        self.records.insert(record.code.clone(), record);
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CategoryResolver for InMemoryCategories {
    fn resolve(&self, code: &str) -> Result<Option<RawCategory>> {
        Ok(self.records.get(code).cloned())
    }
}

/// Category records stored one per file as `<dir>/<stem>.json`.
#[derive(Debug, Clone)]
pub struct DirectoryCategories {
    dir: PathBuf,
}

impl DirectoryCategories {
    /// Creates a resolver over `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `dir` is not a directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(Error::NotFound(dir.display().to_string()));
        }
        Ok(Self { dir })
    }

    /// The directory being read.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, code: &str) -> PathBuf {
        self.dir.join(format!("{}.json", category_file_stem(code)))
    }
}

impl CategoryResolver for DirectoryCategories {
    fn resolve(&self, code: &str) -> Result<Option<RawCategory>> {
        let path = self.path_for(code);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::operation(
                    "read_category",
                    format!("{}: {e}", path.display()),
                ));
            },
        };
        let record: RawCategory = serde_json::from_str(&contents).map_err(|e| {
            Error::InvalidInput(format!("{}: failed to parse category: {e}", path.display()))
        })?;
        Ok(Some(record))
    }
}

/// Looks a code up in `primary`, then in `fallback` when `primary` has no
/// record for it.
#[derive(Debug, Clone)]
pub struct LayeredCategories<P, F> {
    primary: P,
    fallback: F,
}

impl<P: CategoryResolver, F: CategoryResolver> LayeredCategories<P, F> {
    /// Stacks `primary` over `fallback`.
    pub const fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: CategoryResolver, F: CategoryResolver> CategoryResolver for LayeredCategories<P, F> {
    fn resolve(&self, code: &str) -> Result<Option<RawCategory>> {
        match self.primary.resolve(code)? {
            Some(record) => Ok(Some(record)),
            None => self.fallback.resolve(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryItem;
    use std::fs;

    #[test]
    fn test_category_file_stem() {
        assert_eq!(category_file_stem("CSC* (GR)"), "CSC (GR)");
        assert_eq!(category_file_stem("*3*"), "3");
        assert_eq!(category_file_stem("BR=1"), "BR=1");
        assert_eq!(category_file_stem("A/B:C?"), "ABC");
    }

    #[test]
    fn test_in_memory_resolve() {
        let store = InMemoryCategories::from_records(vec![RawCategory {
            code: "BR=1".to_string(),
            include_items: vec![CategoryItem::terminal("ENG*")],
            ..RawCategory::default()
        }]);
        assert_eq!(store.len(), 1);
        assert!(store.resolve("BR=1").unwrap().is_some());
        assert!(store.resolve("BR=2").unwrap().is_none());
    }

    #[test]
    fn test_directory_resolve() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("HUM (GR).json"),
            r#"{"code": "HUM* (GR)", "includeItems": [{"code": "ENG* (GR)"}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();

        let resolver = DirectoryCategories::new(dir.path()).unwrap();
        let record = resolver.resolve("HUM* (GR)").unwrap().unwrap();
        assert_eq!(record.include_items[0].code, "ENG* (GR)");

        assert!(resolver.resolve("NOPE").unwrap().is_none());
        assert!(matches!(
            resolver.resolve("broken"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_layered_prefers_primary() {
        let primary = InMemoryCategories::from_records(vec![RawCategory {
            code: "BR=1".to_string(),
            include_items: vec![CategoryItem::terminal("ENG*")],
            ..RawCategory::default()
        }]);
        let fallback = InMemoryCategories::from_records(vec![
            RawCategory {
                code: "BR=1".to_string(),
                include_items: vec![CategoryItem::terminal("HIS*")],
                ..RawCategory::default()
            },
            RawCategory {
                code: "BR=2".to_string(),
                ..RawCategory::default()
            },
        ]);
        let layered = LayeredCategories::new(&primary, &fallback);

        let br1 = layered.resolve("BR=1").unwrap().unwrap();
        assert_eq!(br1.include_items[0].code, "ENG*");
        assert!(layered.resolve("BR=2").unwrap().is_some());
        assert!(layered.resolve("BR=3").unwrap().is_none());
    }

    #[test]
    fn test_directory_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        assert!(matches!(
            DirectoryCategories::new(&missing),
            Err(Error::NotFound(_))
        ));
    }
}
