//! # dxnorm
//!
//! Normalizes raw degree-planner records into two derived artifacts:
//!
//! - one regular expression per course category, recognizing the course codes
//!   that satisfy it ([`CategoryCompiler`])
//! - a closed, typed model of program requirements and course prerequisites
//!   ([`RequirementClassifier`])
//!
//! Both compilers share the code vocabulary in [`models::code`], which decides
//! whether a code denotes a course, a program, a category, or a reference to a
//! sibling requirement.
//!
//! Raw records arrive as loosely typed JSON trees from an external acquisition
//! step. Nothing here fetches pages or talks to the network; the
//! [`io::CategoryResolver`] trait is the only seam through which the category
//! compiler asks for more data.
//!
//! ## Example
//!
//! ```rust
//! use dxnorm::io::InMemoryCategories;
//! use dxnorm::models::{CategoryItem, RawCategory};
//! use dxnorm::CategoryCompiler;
//!
//! let categories = InMemoryCategories::from_records(vec![RawCategory {
//!     code: "CSC-LEVEL-3".to_string(),
//!     include_items: vec![CategoryItem::terminal("CSC3*")],
//!     exclude_items: vec![CategoryItem::terminal("CSC300H1")],
//!     ..RawCategory::default()
//! }]);
//!
//! let mut compiler = CategoryCompiler::new(&categories);
//! let compiled = compiler.compile("CSC-LEVEL-3");
//! assert_eq!(&*compiled.pattern, "((?!CSC300H1)(CSC3[0-9][0-9][HY]1))");
//! assert!(compiled.resolvable);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod config;
pub mod io;
pub mod models;
pub mod observability;
pub mod services;

pub use config::DxnormConfig;
pub use models::{
    CodeKind, CompiledCategory, Diagnostic, DiagnosticKind, Diagnostics, NormalizedRequirement,
    RequirementKind,
};
pub use services::{
    CategoryAggregator, CategoryCompiler, CourseAggregator, ProgramAggregator,
    RequirementClassifier,
};

/// Error type for dxnorm operations.
///
/// Classification itself never fails on bad data: unresolvable categories and
/// unmatched requirement shapes degrade locally and surface as
/// [`Diagnostics`]. These variants cover the plumbing around the core.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | A raw record is not valid JSON or has the wrong top-level shape |
/// | `OperationFailed` | File I/O fails, config cannot be parsed, logging cannot start |
/// | `NotFound` | An input directory or config file does not exist |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - A raw record file does not parse as JSON
    /// - A record's top level is not an object
    /// - An output format name is not recognized
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - Reading or writing a file fails
    /// - The TOML configuration cannot be parsed
    /// - The tracing subscriber was already installed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// A required path does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Builds an [`Error::OperationFailed`] from an operation name and any displayable cause.
    pub fn operation(operation: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for dxnorm operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("not an object".to_string());
        assert_eq!(err.to_string(), "invalid input: not an object");

        let err = Error::OperationFailed {
            operation: "read_category".to_string(),
            cause: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "operation 'read_category' failed: permission denied"
        );

        let err = Error::NotFound("./course_data".to_string());
        assert_eq!(err.to_string(), "not found: ./course_data");
    }

    #[test]
    fn test_operation_helper() {
        let err = Error::operation("write_output", "disk full");
        assert!(matches!(
            err,
            Error::OperationFailed { ref operation, ref cause }
                if operation == "write_output" && cause == "disk full"
        ));
    }
}
