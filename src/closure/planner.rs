//! Minimal write-back diff per closure member.

use std::collections::BTreeSet;

use crate::core::key::{HymnKey, Reference};
use crate::core::types::RelationKind;
use crate::error::ReconcileError;
use crate::rules::RuleTables;

pub struct WritePlanner<'a> {
    rules: &'a RuleTables,
}

impl<'a> WritePlanner<'a> {
    pub fn new(rules: &'a RuleTables) -> Self {
        Self { rules }
    }

    /// New language references `member` should store, given its audited
    /// closure and what it already stores. Membership is by key; labels are
    /// regenerated fresh from the display-label table (keyed by the target's
    /// type), with literal per-pair overrides. Output is ordered by key.
    ///
    /// # Errors
    ///
    /// [`ReconcileError::WriteMismatch`] when the stored list's emptiness
    /// disagrees with the computed closure's: language closures are seeded
    /// from stored references, so a member with nothing stored that still
    /// landed in a multi-member closure means the closure computation
    /// disagrees with persisted state and must be investigated, not
    /// overwritten. [`ReconcileError::MissingDisplayLabel`] for an unlabeled
    /// target type.
    pub fn plan_language(
        &self,
        member: &HymnKey,
        closure: &BTreeSet<HymnKey>,
        stored: &[Reference],
    ) -> Result<Vec<Reference>, ReconcileError> {
        let others: Vec<&HymnKey> = closure.iter().filter(|key| *key != member).collect();

        if others.is_empty() != stored.is_empty() {
            let detail = if stored.is_empty() {
                format!("closure has {} other members but nothing is stored", others.len())
            } else {
                format!("{} references stored but the closure is empty", stored.len())
            };
            return Err(ReconcileError::WriteMismatch {
                key: member.clone(),
                kind: RelationKind::Language,
                detail,
            });
        }

        let stored_keys: BTreeSet<&HymnKey> = stored.iter().map(|r| &r.key).collect();

        let mut writes = Vec::new();
        for target in others {
            if stored_keys.contains(target) {
                continue;
            }
            let label = self.rules.label_for(member, target)?;
            writes.push(Reference::new(label, target.clone()));
        }
        Ok(writes)
    }

    /// New relevant references `member` should store. Membership is by
    /// `(label, key)` jointly; a computed-but-unstored link is expected here,
    /// since relevant closures may introduce previously undeclared links.
    /// Output is ordered by key, then label.
    pub fn plan_relevant(
        &self,
        member: &HymnKey,
        closure: &BTreeSet<Reference>,
        stored: &[Reference],
    ) -> Vec<Reference> {
        let stored_set: BTreeSet<&Reference> = stored.iter().collect();

        let mut writes: Vec<Reference> = closure
            .iter()
            .filter(|r| &r.key != member)
            .filter(|r| !stored_set.contains(r))
            .cloned()
            .collect();
        writes.sort_by(|a, b| (&a.key, &a.label).cmp(&(&b.key, &b.label)));
        writes
    }
}
