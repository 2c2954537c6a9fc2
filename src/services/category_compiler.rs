//! Category regex compiler.
//!
//! Resolves a category code into one regex over course codes. Include items
//! are OR-ed together; exclude items become a negative lookahead in front of
//! the include group. Child categories are compiled recursively through the
//! per-run cache, so each code is resolved at most once and cycles terminate.
//!
//! # Composition
//!
//! | Includes | Excludes | Pattern |
//! |----------|----------|---------|
//! | yes | no | `(i1\|i2)` |
//! | no | yes | `(?!e1\|e2)` |
//! | yes | yes | `((?!e1\|e2)(i1\|i2))` |
//! | no | no | empty |
//!
//! # Failure
//!
//! A code with no record (or whose lookup errors) compiles to an empty,
//! unresolvable pattern. Its parent drops it and is itself marked
//! unresolvable, but keeps every other item.

use crate::io::CategoryResolver;
use crate::models::{CategoryItem, CompiledCategory, DiagnosticKind, Diagnostics, RawCategory};
use crate::services::pattern_table;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Per-run compiler state.
///
/// The cache lives as long as the compiler. Build one compiler per batch and
/// drop it afterward.
pub struct CategoryCompiler<R: CategoryResolver> {
    resolver: R,
    cache: HashMap<String, CompiledCategory>,
    in_progress: HashSet<String>,
    diagnostics: Diagnostics,
}

impl<R: CategoryResolver> CategoryCompiler<R> {
    /// Creates a compiler over `resolver` with an empty cache.
    #[must_use]
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            cache: HashMap::new(),
            in_progress: HashSet::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Compiles a category code.
    ///
    /// The resolver is consulted first. A code with no record that is itself
    /// a top-level shorthand (`*`, `CSC*`, ...) expands directly; any other
    /// missing code compiles to an empty, unresolvable pattern.
    ///
    /// Repeated calls for the same code return the cached result, sharing the
    /// same pattern allocation.
    #[instrument(skip(self))]
    pub fn compile(&mut self, code: &str) -> CompiledCategory {
        if let Some(hit) = self.cached(code) {
            return hit;
        }
        if self.in_progress.contains(code) {
            debug!(code, "cycle detected, using partial result");
            return CompiledCategory::unresolved();
        }

        self.in_progress.insert(code.to_string());
        let compiled = match self.load(code) {
            Some(record) => {
                let includes = self.compile_items(code, &record.include_items);
                let excludes = self.compile_items(code, &record.exclude_items);
                CompiledCategory::new(
                    combine(&includes.patterns, &excludes.patterns),
                    includes.resolvable && excludes.resolvable,
                )
            },
            None => self.expand_or_unresolved(code),
        };
        self.in_progress.remove(code);

        let status = if compiled.resolvable {
            "resolved"
        } else {
            "partial"
        };
        metrics::counter!("category_compilations_total", "status" => status).increment(1);
        self.cache.insert(code.to_string(), compiled.clone());
        compiled
    }

    /// Returns the cached result for `code`, if any.
    #[must_use]
    pub fn cached(&self, code: &str) -> Option<CompiledCategory> {
        let hit = self.cache.get(code).cloned();
        if hit.is_some() {
            metrics::counter!("category_cache_hits_total").increment(1);
        }
        hit
    }

    /// Number of distinct codes compiled so far.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Diagnostics gathered so far.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Consumes the compiler, returning its diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    fn load(&self, code: &str) -> Option<RawCategory> {
        match self.resolver.resolve(code) {
            Ok(found) => found,
            Err(e) => {
                debug!(code, error = %e, "category lookup failed");
                None
            },
        }
    }

    fn expand_or_unresolved(&mut self, code: &str) -> CompiledCategory {
        if let Some(pattern) = pattern_table::expand(code) {
            return CompiledCategory::new(pattern, true);
        }
        self.diagnostics.push(
            code,
            None,
            DiagnosticKind::UnresolvedCategory {
                code: code.to_string(),
            },
        );
        CompiledCategory::unresolved()
    }

    fn compile_items(&mut self, owner: &str, items: &[CategoryItem]) -> ItemPatterns {
        let mut out = ItemPatterns {
            patterns: Vec::with_capacity(items.len()),
            resolvable: true,
        };
        for item in items {
            if item.category_entity {
                let child = self.compile(&item.code);
                if child.resolvable {
                    out.patterns.push(child.pattern.to_string());
                } else {
                    out.resolvable = false;
                }
            } else if let Some(pattern) = pattern_table::expand(&item.code) {
                out.patterns.push(pattern);
            } else {
                out.resolvable = false;
                self.diagnostics.push(
                    owner,
                    None,
                    DiagnosticKind::UnknownPattern {
                        code: item.code.clone(),
                    },
                );
            }
        }
        out
    }
}

struct ItemPatterns {
    patterns: Vec<String>,
    resolvable: bool,
}

/// Joins include and exclude patterns into one regex source.
#[must_use]
pub fn combine(includes: &[String], excludes: &[String]) -> String {
    let include = if includes.is_empty() {
        String::new()
    } else {
        format!("({})", includes.join("|"))
    };
    let exclude = if excludes.is_empty() {
        String::new()
    } else {
        format!("(?!{})", excludes.join("|"))
    };

    match (include.is_empty(), exclude.is_empty()) {
        (true, _) => exclude,
        (false, true) => include,
        (false, false) => format!("({exclude}{include})"),
    }
}
