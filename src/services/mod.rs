//! Compilers and batch aggregation.
//!
//! - [`CategoryCompiler`] turns category codes into course-code regexes.
//! - [`RequirementClassifier`] turns raw requirement nodes into typed ones.
//! - The aggregators run either compiler over a batch of raw records.

mod aggregator;
mod category_compiler;
pub mod description;
pub mod pattern_table;
mod requirement_classifier;

pub use aggregator::{
    CategoryAggregator, CategoryBatch, CourseAggregator, ProgramAggregator, RequirementAggregator,
    RequirementBatch, RequirementOwner, referenced_categories,
};
pub use category_compiler::{CategoryCompiler, combine};
pub use requirement_classifier::{
    CLASSIFICATION_RULES, ClassificationRule, RequirementClassifier, RuleInput,
};
