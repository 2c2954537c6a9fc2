//! Record acquisition and output.
//!
//! The classification core consumes raw records and a [`CategoryResolver`];
//! this module supplies both from files and from memory, and writes the
//! aggregated output back out as JSON.
//!
//! # Architecture
//!
//! - **Resolvers** implement [`CategoryResolver`] for on-demand category lookup
//! - **Record sources** implement [`RecordSource`] for batch input
//! - [`write_json`] serializes aggregated output
//!
//! # Examples
//!
//! ```rust,ignore
//! use dxnorm::io::{DirectoryCategories, open_source};
//!
//! let resolver = DirectoryCategories::new("./course_category_data")?;
//! let mut source = open_source(Path::new("./course_category_data"))?;
//! while let Some(record) = source.next()? {
//!     println!("{}", record.name);
//! }
//! ```

mod categories;
pub mod formats;
pub mod traits;

pub use categories::{
    DirectoryCategories, InMemoryCategories, LayeredCategories, category_file_stem,
};
pub use formats::{DirectoryRecordSource, JsonRecordSource, open_source, write_json};
pub use traits::{CategoryResolver, RawRecord, RecordSource};
