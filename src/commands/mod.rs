//! Command handlers module.
//!
//! - `aggregate.rs`: batch commands (categories, programs, courses)
//! - `classify.rs`: code vocabulary lookup

mod aggregate;
mod classify;

pub use aggregate::{cmd_categories, cmd_courses, cmd_programs};
pub use classify::cmd_classify_code;
