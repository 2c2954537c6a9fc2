//! Batch aggregation commands.
//!
//! Each command reads one directory (or stream file) of raw records, runs the
//! matching aggregator, writes the normalized output as pretty JSON, and
//! prints a one-line summary plus any diagnostics to stderr.

use dxnorm::io::{DirectoryCategories, open_source, write_json};
use dxnorm::models::Diagnostics;
use dxnorm::services::{RequirementAggregator, RequirementOwner};
use dxnorm::{CategoryAggregator, Error, Result};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Categories command.
///
/// With `resolve_dir`, categories referenced but not present in the batch are
/// looked up there by file stem.
pub fn cmd_categories(input: &Path, output: &Path, resolve_dir: Option<&Path>) -> Result<()> {
    let mut source = open_source(input)?;
    let mut aggregator = CategoryAggregator::new();
    aggregator.read_all(source.as_mut())?;
    let batch = match resolve_dir {
        Some(dir) => aggregator.finish_with_fallback(DirectoryCategories::new(dir)?),
        None => aggregator.finish(),
    };

    write_output(output, &batch.entries)?;
    eprintln!(
        "{} categories attempted, {} compiled, {} not validatable -> {}",
        batch.attempted,
        batch.entries.len(),
        batch.unvalidatable(),
        output.display()
    );
    print_diagnostics(&batch.diagnostics);
    Ok(())
}

/// Programs command.
pub fn cmd_programs(input: &Path, output: &Path) -> Result<()> {
    run_requirements::<dxnorm::models::RawProgram>(input, output, "programs")
}

/// Courses command.
pub fn cmd_courses(input: &Path, output: &Path) -> Result<()> {
    run_requirements::<dxnorm::models::RawCourse>(input, output, "courses")
}

fn run_requirements<T: RequirementOwner>(input: &Path, output: &Path, label: &str) -> Result<()> {
    let mut source = open_source(input)?;
    let mut aggregator = RequirementAggregator::<T>::new();
    aggregator.read_all(source.as_mut())?;
    let batch = aggregator.finish();

    write_output(output, &batch.records)?;
    eprintln!(
        "{} {label} attempted, {} normalized, {} flagged -> {}",
        batch.attempted,
        batch.records.len(),
        batch.flagged(),
        output.display()
    );
    print_diagnostics(&batch.diagnostics);
    Ok(())
}

fn write_output<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::operation("create_output_dir", e))?;
    }
    let file = File::create(path)
        .map_err(|e| Error::operation("create_output", format!("{}: {e}", path.display())))?;
    write_json(BufWriter::new(file), value, true)
}

fn print_diagnostics(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics.iter() {
        eprintln!("  {diagnostic}");
    }
}
