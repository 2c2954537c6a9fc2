//! Batch aggregation over raw records.
//!
//! Aggregators take a whole batch of raw records, decode each one, run it
//! through the compilers, and collect the normalized output keyed by code
//! together with the batch's diagnostics. A record that fails to decode is
//! reported and skipped; it never stops the batch.

use crate::io::{
    CategoryResolver, InMemoryCategories, LayeredCategories, RawRecord, RecordSource,
};
use crate::models::{
    CategoryEntry, CodeKind, DiagnosticKind, Diagnostics, NormalizedCourse, NormalizedProgram,
    RawCategory, RawCourse, RawProgram, RawRequirement, RequirementSet, classify,
};
use crate::services::{CategoryCompiler, RequirementClassifier};
use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use tracing::{info, instrument};

/// Output of one category batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryBatch {
    /// Compiled entries keyed by category code.
    pub entries: BTreeMap<String, CategoryEntry>,
    /// Records read, including ones that failed to decode.
    pub attempted: usize,
    /// Everything repaired along the way.
    pub diagnostics: Diagnostics,
}

impl CategoryBatch {
    /// Number of entries whose regex is approximate.
    #[must_use]
    pub fn unvalidatable(&self) -> usize {
        self.entries.values().filter(|e| !e.validatable).count()
    }
}

/// Compiles every category of a batch with one shared cache.
///
/// Records in the batch resolve against each other, so a category whose
/// children sit in the same batch compiles fully.
#[derive(Debug, Default)]
pub struct CategoryAggregator {
    records: Vec<RawCategory>,
    attempted: usize,
    diagnostics: Diagnostics,
}

impl CategoryAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes and queues one record. The record's own `code` wins over its
    /// file name when both are present.
    pub fn push(&mut self, record: RawRecord) {
        self.attempted += 1;
        match serde_json::from_value::<RawCategory>(record.value) {
            Ok(mut category) => {
                if category.code.is_empty() {
                    category.code = record.name;
                }
                self.records.push(category);
            },
            Err(e) => self.diagnostics.push(
                record.name,
                None,
                DiagnosticKind::MalformedRecord {
                    cause: e.to_string(),
                },
            ),
        }
    }

    /// Queues every record from `source`.
    ///
    /// A record that is not valid JSON is reported and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails to read.
    pub fn read_all(&mut self, source: &mut dyn RecordSource) -> Result<()> {
        while let Some(record) =
            next_or_report(source, &mut self.attempted, &mut self.diagnostics)?
        {
            self.push(record);
        }
        Ok(())
    }

    /// Compiles the queued categories.
    pub fn finish(self) -> CategoryBatch {
        self.finish_with_fallback(InMemoryCategories::new())
    }

    /// Compiles the queued categories, looking up codes the batch does not
    /// hold in `fallback`.
    #[instrument(skip(self, fallback), fields(records = self.records.len()))]
    pub fn finish_with_fallback<F: CategoryResolver>(self, fallback: F) -> CategoryBatch {
        let Self {
            records,
            attempted,
            mut diagnostics,
        } = self;
        let batch_store = InMemoryCategories::from_records(records.iter().cloned());
        let store = LayeredCategories::new(batch_store, fallback);

        let mut compiler = CategoryCompiler::new(&store);
        let mut entries = BTreeMap::new();
        for record in &records {
            let compiled = compiler.compile(&record.code);
            entries.insert(record.code.clone(), CategoryEntry::new(record, &compiled));
        }
        diagnostics.extend(compiler.into_diagnostics());

        let batch = CategoryBatch {
            entries,
            attempted,
            diagnostics,
        };
        info!(
            attempted = batch.attempted,
            compiled = batch.entries.len(),
            unvalidatable = batch.unvalidatable(),
            "category batch complete"
        );
        batch
    }
}

/// A record kind whose requirements the classifier normalizes.
pub trait RequirementOwner: DeserializeOwned {
    /// Normalized form of the record.
    type Normalized: Serialize;

    /// Label used in logs.
    const LABEL: &'static str;

    /// The keyed raw requirement nodes.
    fn requirement_nodes(&self) -> Vec<(String, RawRequirement)>;

    /// Builds the normalized record from its classified requirements.
    fn normalize(self, requirements: RequirementSet) -> Self::Normalized;
}

impl RequirementOwner for RawProgram {
    type Normalized = NormalizedProgram;
    const LABEL: &'static str = "program";

    fn requirement_nodes(&self) -> Vec<(String, RawRequirement)> {
        Self::requirement_nodes(self)
    }

    fn normalize(self, requirements: RequirementSet) -> NormalizedProgram {
        NormalizedProgram {
            title: self.title,
            detail_assessments: requirements,
        }
    }
}

impl RequirementOwner for RawCourse {
    type Normalized = NormalizedCourse;
    const LABEL: &'static str = "course";

    fn requirement_nodes(&self) -> Vec<(String, RawRequirement)> {
        Self::requirement_nodes(self)
    }

    fn normalize(self, requirements: RequirementSet) -> NormalizedCourse {
        NormalizedCourse {
            title: self.title,
            prerequisites: requirements,
        }
    }
}

/// Output of one program or course batch.
#[derive(Debug, Clone, Serialize)]
#[serde(bound(serialize = "N: Serialize"))]
pub struct RequirementBatch<N> {
    /// Normalized records keyed by owner code.
    pub records: BTreeMap<String, N>,
    /// Records read, including ones that failed to decode.
    pub attempted: usize,
    /// Everything repaired along the way.
    pub diagnostics: Diagnostics,
}

impl<N> RequirementBatch<N> {
    /// Number of owners with at least one diagnostic.
    #[must_use]
    pub fn flagged(&self) -> usize {
        let mut owners: Vec<&str> = self.diagnostics.iter().map(|d| d.owner.as_str()).collect();
        owners.sort_unstable();
        owners.dedup();
        owners.len()
    }
}

/// Normalizes the requirements of every record in a batch.
pub struct RequirementAggregator<T: RequirementOwner> {
    classifier: RequirementClassifier,
    records: BTreeMap<String, T::Normalized>,
    attempted: usize,
    diagnostics: Diagnostics,
    _owner: PhantomData<T>,
}

/// Aggregates program records.
pub type ProgramAggregator = RequirementAggregator<RawProgram>;

/// Aggregates course records.
pub type CourseAggregator = RequirementAggregator<RawCourse>;

impl<T: RequirementOwner> Default for RequirementAggregator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RequirementOwner> RequirementAggregator<T> {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            classifier: RequirementClassifier::new(),
            records: BTreeMap::new(),
            attempted: 0,
            diagnostics: Diagnostics::new(),
            _owner: PhantomData,
        }
    }

    /// Decodes and normalizes one record, filed under its name.
    pub fn push(&mut self, record: RawRecord) {
        self.attempted += 1;
        let owner = match serde_json::from_value::<T>(record.value) {
            Ok(owner) => owner,
            Err(e) => {
                self.diagnostics.push(
                    record.name,
                    None,
                    DiagnosticKind::MalformedRecord {
                        cause: e.to_string(),
                    },
                );
                return;
            },
        };

        let nodes = owner.requirement_nodes();
        let (requirements, diagnostics) = self.classifier.classify_all(&record.name, &nodes);
        self.diagnostics.extend(diagnostics);
        self.records.insert(record.name, owner.normalize(requirements));
    }

    /// Normalizes every record from `source`.
    ///
    /// A record that is not valid JSON is reported and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails to read.
    pub fn read_all(&mut self, source: &mut dyn RecordSource) -> Result<()> {
        while let Some(record) =
            next_or_report(source, &mut self.attempted, &mut self.diagnostics)?
        {
            self.push(record);
        }
        Ok(())
    }

    /// Returns the collected output.
    pub fn finish(self) -> RequirementBatch<T::Normalized> {
        let batch = RequirementBatch {
            records: self.records,
            attempted: self.attempted,
            diagnostics: self.diagnostics,
        };
        info!(
            kind = T::LABEL,
            attempted = batch.attempted,
            normalized = batch.records.len(),
            flagged = batch.flagged(),
            "requirement batch complete"
        );
        batch
    }
}

/// Owner recorded for records too broken to name.
const UNNAMED_OWNER: &str = "<input>";

/// Reads the next decodable record, reporting and skipping unparsable ones.
fn next_or_report(
    source: &mut dyn RecordSource,
    attempted: &mut usize,
    diagnostics: &mut Diagnostics,
) -> Result<Option<RawRecord>> {
    loop {
        match source.next() {
            Ok(record) => return Ok(record),
            Err(Error::InvalidInput(cause)) => {
                *attempted += 1;
                diagnostics.push(UNNAMED_OWNER, None, DiagnosticKind::MalformedRecord { cause });
            },
            Err(e) => return Err(e),
        }
    }
}

/// Collects every category code a program's requirements mention, in order
/// of first appearance.
#[must_use]
pub fn referenced_categories(program: &RawProgram) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for assessment in &program.detail_assessments {
        for code in assessment.requirement.codes() {
            if classify(code) == Ok(CodeKind::Category) && !found.iter().any(|f| f == code) {
                found.push(code.to_string());
            }
        }
    }
    found
}
