//! Closure traversal: the full reachable set of references from one seed.

use std::collections::BTreeSet;

use tracing::debug;

use crate::core::key::{HymnKey, Reference};
use crate::core::record::{extract, HymnRecord};
use crate::core::types::RelationKind;
use crate::error::ReconcileError;
use crate::rules::RuleTables;
use crate::store::RecordStore;

/// Computes language and relevant closures over a record store.
///
/// Traversal is an explicit worklist with an owned visited set, so cycles in
/// the reference graph terminate trivially and there is no recursion-depth
/// concern.
pub struct ClosureBuilder<'a, S: RecordStore> {
    store: &'a S,
    rules: &'a RuleTables,
}

impl<'a, S: RecordStore> ClosureBuilder<'a, S> {
    pub fn new(store: &'a S, rules: &'a RuleTables) -> Self {
        Self { store, rules }
    }

    /// The set of keys transitively reachable from `seed` through language
    /// references, including the seed itself.
    ///
    /// A seed whose stored language field is empty yields `None`: a hymn with
    /// no references is not a data-quality concern. A closure that is still a
    /// singleton after traversal (every declared reference filtered out or
    /// self-directed) *is* emitted, and the auditor rejects it as dangling.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::MissingRecord`] when a reference points at a
    /// key absent from the store, or a key error for a malformed stored path.
    pub fn language_closure(
        &self,
        seed: &HymnKey,
    ) -> Result<Option<BTreeSet<HymnKey>>, ReconcileError> {
        let record = self.record(seed, seed, RelationKind::Language)?;
        if record.raw_references(RelationKind::Language).is_empty() {
            return Ok(None);
        }

        let mut visited: BTreeSet<HymnKey> = BTreeSet::new();
        let mut worklist = vec![seed.clone()];

        while let Some(key) = worklist.pop() {
            if !visited.insert(key.clone()) {
                continue;
            }
            let record = self.record(&key, seed, RelationKind::Language)?;
            for reference in self.filtered_references(record, RelationKind::Language)? {
                if !visited.contains(&reference.key) {
                    worklist.push(reference.key);
                }
            }
        }

        debug!(seed = %seed, size = visited.len(), "language closure");
        Ok(Some(visited))
    }

    /// The set of `(label, key)` references transitively reachable from
    /// `seed` through relevant references.
    ///
    /// The seed must itself appear as a target of some member's relevant
    /// list; the relation is declared symmetrically somewhere in the graph,
    /// and the backlink is the only source for the seed's own display label.
    ///
    /// # Errors
    ///
    /// [`ReconcileError::MissingRecord`] for a dangling reference,
    /// [`ReconcileError::UnresolvedBacklink`] when the seed is unreachable
    /// from its declared neighbors.
    pub fn relevant_closure(
        &self,
        seed: &HymnKey,
    ) -> Result<Option<BTreeSet<Reference>>, ReconcileError> {
        let record = self.record(seed, seed, RelationKind::Relevant)?;
        if record.raw_references(RelationKind::Relevant).is_empty() {
            return Ok(None);
        }

        let mut visited: BTreeSet<HymnKey> = BTreeSet::new();
        let mut members: BTreeSet<Reference> = BTreeSet::new();
        let mut worklist = vec![seed.clone()];

        while let Some(key) = worklist.pop() {
            if !visited.insert(key.clone()) {
                continue;
            }
            let record = self.record(&key, seed, RelationKind::Relevant)?;
            for reference in self.filtered_references(record, RelationKind::Relevant)? {
                if !visited.contains(&reference.key) {
                    worklist.push(reference.key.clone());
                }
                members.insert(reference);
            }
        }

        if !members.iter().any(|member| &member.key == seed) {
            return Err(ReconcileError::UnresolvedBacklink { seed: seed.clone() });
        }

        debug!(seed = %seed, size = members.len(), "relevant closure");
        Ok(Some(members))
    }

    fn record(
        &self,
        key: &HymnKey,
        seed: &HymnKey,
        kind: RelationKind,
    ) -> Result<&'a HymnRecord, ReconcileError> {
        self.store.get(key).ok_or_else(|| ReconcileError::MissingRecord {
            key: key.clone(),
            seed: seed.clone(),
            kind,
        })
    }

    /// A record's references for one relation kind with the ignore/rewrite
    /// table applied: exact-key ignores first (against the stored key),
    /// then type rewrites, then the numeric-range rules.
    fn filtered_references(
        &self,
        record: &HymnRecord,
        kind: RelationKind,
    ) -> Result<Vec<Reference>, ReconcileError> {
        let references = extract(record, kind)?;
        Ok(references
            .into_iter()
            .filter(|r| !self.rules.ignored(kind, &r.key))
            .map(|mut r| {
                r.key = self.rules.rewrite(r.key);
                r
            })
            .filter(|r| !self.rules.over_threshold(&r.key))
            .collect())
    }
}
