//! The batch pipeline: build closures, merge, audit, plan, write.
//!
//! Single-threaded, single pass, fail-fast: the whole record set is loaded
//! before traversal begins and any invariant violation aborts the batch. All
//! output writes are computed before the first sink call for a relation kind,
//! so no transactional machinery is needed.

use serde::Serialize;
use std::collections::BTreeSet;

use tracing::info;

use crate::closure::auditor::ConsistencyAuditor;
use crate::closure::builder::ClosureBuilder;
use crate::closure::merger::DisjointClosures;
use crate::closure::planner::WritePlanner;
use crate::core::key::{HymnKey, Reference};
use crate::core::record::extract;
use crate::core::types::RelationKind;
use crate::error::ReconcileError;
use crate::rules::RuleTables;
use crate::store::{PersistenceSink, RecordStore};

/// Counters for one batch run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RunSummary {
    pub records: usize,
    pub language_closures: usize,
    pub relevant_closures: usize,
    pub language_writes: usize,
    pub relevant_writes: usize,
}

pub struct Reconciler<'a, S: RecordStore> {
    store: &'a S,
    rules: &'a RuleTables,
}

impl<'a, S: RecordStore> Reconciler<'a, S> {
    pub fn new(store: &'a S, rules: &'a RuleTables) -> Self {
        Self { store, rules }
    }

    /// Run the full pipeline for both relation kinds, handing every planned
    /// write to `sink`.
    ///
    /// # Errors
    ///
    /// Propagates the first invariant violation or sink failure; nothing is
    /// caught internally.
    pub fn run(&self, sink: &mut dyn PersistenceSink) -> Result<RunSummary, ReconcileError> {
        let mut summary = RunSummary {
            records: self.store.keys().count(),
            ..RunSummary::default()
        };

        let language = self.language_closures()?;
        summary.language_closures = language.len();
        info!(closures = language.len(), "language closures audited");

        let planner = WritePlanner::new(self.rules);
        for closure in language.iter() {
            for member in closure {
                let stored = self.stored_references(member, RelationKind::Language)?;
                let writes = planner.plan_language(member, closure, &stored)?;
                summary.language_writes += self.flush(sink, member, RelationKind::Language, &writes)?;
            }
        }

        let relevant = self.relevant_closures()?;
        summary.relevant_closures = relevant.len();
        info!(closures = relevant.len(), "relevant closures audited");

        for closure in relevant.iter() {
            let member_keys: BTreeSet<HymnKey> =
                closure.iter().map(|r| r.key.clone()).collect();
            for member in &member_keys {
                let stored = self.stored_references(member, RelationKind::Relevant)?;
                let writes = planner.plan_relevant(member, closure, &stored);
                summary.relevant_writes += self.flush(sink, member, RelationKind::Relevant, &writes)?;
            }
        }

        info!(
            language_writes = summary.language_writes,
            relevant_writes = summary.relevant_writes,
            "batch complete"
        );
        Ok(summary)
    }

    /// Build, merge and audit all language closures.
    ///
    /// # Errors
    ///
    /// Any closure, merge or audit error aborts immediately.
    pub fn language_closures(&self) -> Result<DisjointClosures<HymnKey>, ReconcileError> {
        let builder = ClosureBuilder::new(self.store, self.rules);
        let mut global = DisjointClosures::new();
        for seed in self.store.keys() {
            if let Some(closure) = builder.language_closure(seed)? {
                global.merge(closure)?;
            }
        }
        let auditor = ConsistencyAuditor::new(self.rules);
        for closure in global.iter() {
            auditor.audit_keys(closure)?;
        }
        Ok(global)
    }

    /// Build, merge and audit all relevant closures.
    ///
    /// # Errors
    ///
    /// Any closure, merge or audit error aborts immediately.
    pub fn relevant_closures(&self) -> Result<DisjointClosures<Reference>, ReconcileError> {
        let builder = ClosureBuilder::new(self.store, self.rules);
        let mut global = DisjointClosures::new();
        for seed in self.store.keys() {
            if let Some(closure) = builder.relevant_closure(seed)? {
                global.merge(closure)?;
            }
        }
        let auditor = ConsistencyAuditor::new(self.rules);
        for closure in global.iter() {
            auditor.audit_references(closure)?;
        }
        Ok(global)
    }

    fn stored_references(
        &self,
        member: &HymnKey,
        kind: RelationKind,
    ) -> Result<Vec<Reference>, ReconcileError> {
        let record = self
            .store
            .get(member)
            .ok_or_else(|| ReconcileError::MissingRecord {
                key: member.clone(),
                seed: member.clone(),
                kind,
            })?;
        Ok(extract(record, kind)?)
    }

    fn flush(
        &self,
        sink: &mut dyn PersistenceSink,
        member: &HymnKey,
        kind: RelationKind,
        writes: &[Reference],
    ) -> Result<usize, ReconcileError> {
        if writes.is_empty() {
            return Ok(0);
        }
        sink.write(member, kind, writes)
            .map_err(|source| ReconcileError::Sink {
                key: member.clone(),
                kind,
                source,
            })?;
        Ok(writes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::{HymnRecord, RawReference};
    use crate::core::types::HymnType;
    use crate::store::{InMemoryRecordStore, PlanCollector};

    fn key(ty: HymnType, number: &str) -> HymnKey {
        HymnKey::new(ty, number)
    }

    fn language_record(path: &str, refs: &[(&str, &str)]) -> HymnRecord {
        let seed = crate::parsing::scheme_b::parse_scheme_b(path).unwrap();
        HymnRecord::new(seed).with_languages(
            refs.iter()
                .map(|(p, v)| RawReference::new(*p, *v))
                .collect(),
        )
    }

    /// The full reference family of hymn 720: English seed with cebuano,
    /// tagalog and german translations, declared unevenly.
    fn store_720() -> InMemoryRecordStore {
        InMemoryRecordStore::from_records(vec![
            language_record(
                "h/720",
                &[
                    ("cb/720", "Cebuano"),
                    ("ht/720", "Tagalog"),
                    ("de/720", "German"),
                ],
            ),
            language_record("cb/720", &[("h/720", "English")]),
            language_record("ht/720", &[("h/720", "English")]),
            language_record("de/720", &[("h/720", "English")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_run_plans_missing_language_references() {
        let store = store_720();
        let rules = RuleTables::builtin();
        let reconciler = Reconciler::new(&store, &rules);
        let mut sink = PlanCollector::new();

        let summary = reconciler.run(&mut sink).unwrap();
        assert_eq!(summary.records, 4);
        assert_eq!(summary.language_closures, 1);

        // cb/720 already stores h/720, so it gains exactly the other two
        let cb = sink
            .writes
            .iter()
            .find(|w| w.key == key(HymnType::Cebuano, "720"))
            .unwrap();
        assert_eq!(
            cb.references,
            vec![
                Reference::new("Tagalog", key(HymnType::Tagalog, "720")),
                Reference::new("German", key(HymnType::German, "720")),
            ]
        );

        // The seed already stores everything and plans nothing
        assert!(!sink
            .writes
            .iter()
            .any(|w| w.key == key(HymnType::Classic, "720")));
    }

    #[test]
    fn test_run_is_idempotent_after_writes_applied() {
        let store = store_720();
        let rules = RuleTables::builtin();
        let reconciler = Reconciler::new(&store, &rules);
        let mut sink = PlanCollector::new();
        reconciler.run(&mut sink).unwrap();

        // Apply every planned write, then run again: nothing is planned
        let base = store_720();
        let mut records: Vec<HymnRecord> = base
            .keys()
            .map(|k| base.get(k).unwrap().clone())
            .collect();
        for write in &sink.writes {
            let record = records.iter_mut().find(|r| r.key == write.key).unwrap();
            for reference in &write.references {
                record.languages.push(RawReference::new(
                    reference.key.to_string(),
                    reference.label.clone(),
                ));
            }
        }
        let applied = InMemoryRecordStore::from_records(records).unwrap();
        let reconciler = Reconciler::new(&applied, &rules);
        let mut second = PlanCollector::new();
        let summary = reconciler.run(&mut second).unwrap();
        assert!(second.writes.is_empty());
        assert_eq!(summary.language_writes, 0);
    }

    #[test]
    fn test_global_closures_are_disjoint() {
        let mut records = vec![
            language_record("h/1", &[("ch/1", "Chinese")]),
            language_record("ch/1", &[("h/1", "English")]),
            language_record("h/2", &[("ch/2", "Chinese")]),
            language_record("ch/2", &[("h/2", "English")]),
        ];
        records.push(language_record("de/1", &[("h/1", "English")]));
        let store = InMemoryRecordStore::from_records(records).unwrap();
        let rules = RuleTables::builtin();
        let reconciler = Reconciler::new(&store, &rules);

        let closures = reconciler.language_closures().unwrap();
        assert_eq!(closures.len(), 2);

        let all: Vec<&HymnKey> = closures.iter().flatten().collect();
        let unique: BTreeSet<&HymnKey> = all.iter().copied().collect();
        assert_eq!(all.len(), unique.len());
    }

    #[test]
    fn test_symmetry_of_containment() {
        // Every member of a closure reaches every other member through edges
        // restricted to the closure
        let store = store_720();
        let rules = RuleTables::builtin();
        let reconciler = Reconciler::new(&store, &rules);
        let closures = reconciler.language_closures().unwrap();

        let builder = ClosureBuilder::new(&store, &rules);
        for closure in closures.iter() {
            for member in closure {
                let reached = builder.language_closure(member).unwrap().unwrap();
                assert_eq!(&reached, closure, "closure must look the same from {member}");
            }
        }
    }

    #[test]
    fn test_incompatible_closure_aborts_run() {
        let store = InMemoryRecordStore::from_records(vec![
            language_record("h/5", &[("ns/5", "New Song")]),
            language_record("ns/5", &[("h/5", "English")]),
        ])
        .unwrap();
        let rules = RuleTables::builtin();
        let reconciler = Reconciler::new(&store, &rules);
        let mut sink = PlanCollector::new();
        assert!(matches!(
            reconciler.run(&mut sink),
            Err(ReconcileError::IncompatibleClosure { .. })
        ));
    }

    #[test]
    fn test_dangling_closure_aborts_run() {
        let store = InMemoryRecordStore::from_records(vec![language_record(
            "h/79",
            &[("h/79", "English")],
        )])
        .unwrap();
        let rules = RuleTables::builtin();
        let reconciler = Reconciler::new(&store, &rules);
        let mut sink = PlanCollector::new();
        assert!(matches!(
            reconciler.run(&mut sink),
            Err(ReconcileError::DanglingClosure { .. })
        ));
    }
}
