//! # hymnlink
//!
//! A library for reconciling cross-references between hymn records stored
//! under two incompatible numbering schemes.
//!
//! Decades of hand-maintained hymnal data accumulate small errors: a
//! translation declared on one side only, a reference typed under the wrong
//! dialect marker, a link to a renumbered record that no longer exists.
//! `hymnlink` normalizes every identifier into one canonical key space,
//! computes the transitive closure of "this hymn is a translation /
//! alternate tune of that hymn", audits each closure for internal
//! consistency, and plans the minimal set of missing references to write
//! back.
//!
//! ## Features
//!
//! - **Canonical keys**: one `HymnKey` space behind two external dialects,
//!   with explicit table-driven translation (offsets and irregular tokens
//!   included)
//! - **Closure computation**: worklist traversal with ignore/rewrite rules
//! - **Disjointness enforcement**: overlapping closures are a fatal defect,
//!   never silently repaired
//! - **Consistency audit**: cardinality and type-compatibility rules with a
//!   curated exception-override table
//! - **Minimal diffs**: idempotent write planning per record
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use hymnlink::{InMemoryRecordStore, PlanCollector, Reconciler, RuleTables};
//!
//! // Load the record set and the curated rule tables
//! let store = InMemoryRecordStore::load_from_file(Path::new("records.json")).unwrap();
//! let rules = RuleTables::builtin();
//!
//! // Run the pipeline; planned writes accumulate in the sink
//! let reconciler = Reconciler::new(&store, &rules);
//! let mut sink = PlanCollector::new();
//! let summary = reconciler.run(&mut sink).unwrap();
//!
//! for write in &sink.writes {
//!     println!("{} {}: {} new references", write.key, write.kind, write.references.len());
//! }
//! println!("{} language writes planned", summary.language_writes);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Canonical keys, references, records and classification types
//! - [`parsing`]: The two external identifier dialects and their translation tables
//! - [`rules`]: Curated rule tables (ignores, rewrites, exceptions, labels)
//! - [`closure`]: Closure builder, disjoint merger, auditor and write planner
//! - [`store`]: Record store and persistence sink seams
//! - [`reconcile`]: The batch pipeline
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod closure;
pub mod core;
pub mod error;
pub mod parsing;
pub mod reconcile;
pub mod rules;
pub mod store;

// Re-export commonly used types for convenience
pub use crate::core::key::{HymnKey, Reference};
pub use crate::core::record::{HymnRecord, RawReference};
pub use crate::core::types::{HymnType, RelationKind};
pub use crate::error::{KeyError, ReconcileError};
pub use crate::reconcile::{Reconciler, RunSummary};
pub use crate::rules::RuleTables;
pub use crate::store::{InMemoryRecordStore, PersistenceSink, PlanCollector, RecordStore};
