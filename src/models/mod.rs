//! Data models for dxnorm.
//!
//! Raw records mirror the planner payloads and decode leniently. Normalized
//! records are built fresh by the services and carry only what downstream
//! consumers need.

mod category;
pub mod code;
mod diagnostic;
pub mod raw;
mod record;
mod requirement;

pub use category::{CategoryEntry, CategoryItem, CompiledCategory, RawCategory};
pub use code::{CodeKind, CodePartition, Unclassifiable, classify};
pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
pub use record::{
    Credits, NormalizedCourse, NormalizedProgram, RawAssessment, RawCourse, RawPrerequisite,
    RawProgram, RequirementSet, strip_brackets,
};
pub use requirement::{
    CountType, NormalizedRequirement, RECURS_MARKER, RawRequirement, RawType, RequirementKind,
    RequisiteItem,
};
