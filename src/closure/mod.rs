//! Cross-reference closure computation and consistency auditing.
//!
//! This is the core of the tool:
//!
//! - [`ClosureBuilder`]: worklist traversal computing the full reachable set
//!   of references from one seed hymn, with ignore/rewrite rules applied
//! - [`DisjointClosures`]: the global collection of pairwise-disjoint
//!   closures, merged one freshly computed closure at a time
//! - [`ConsistencyAuditor`]: cardinality and type-compatibility validation
//!   with the recursive exception-override mechanism
//! - [`WritePlanner`]: the minimal per-record write-back diff
//!
//! ## Pipeline shape
//!
//! For each relation kind, a single pass over all records in stable key
//! order: build closure → merge into the global collection → (once all seeds
//! are processed) audit every closure → plan writes per member. Any
//! invariant violation aborts the batch; see [`crate::error::ReconcileError`].
//!
//! [`ClosureBuilder`]: builder::ClosureBuilder
//! [`DisjointClosures`]: merger::DisjointClosures
//! [`ConsistencyAuditor`]: auditor::ConsistencyAuditor
//! [`WritePlanner`]: planner::WritePlanner

pub mod auditor;
pub mod builder;
pub mod merger;
pub mod planner;

pub use merger::ClosureMember;
