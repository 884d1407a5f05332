//! Global collection of pairwise-disjoint closures.

use std::collections::BTreeSet;

use crate::core::key::{HymnKey, Reference};
use crate::error::{closure_context, ReconcileError};

/// A closure member that can be identified by its hymn key. Language closures
/// carry bare keys; relevant closures carry labelled references. Merging
/// always compares on key identity, never on labels.
pub trait ClosureMember: Ord + Clone {
    fn key(&self) -> &HymnKey;
}

impl ClosureMember for HymnKey {
    fn key(&self) -> &HymnKey {
        self
    }
}

impl ClosureMember for Reference {
    fn key(&self) -> &HymnKey {
        &self.key
    }
}

/// The process-lifetime collection of disjoint closures for one relation
/// kind. Disjointness is enforced on every merge, not assumed.
#[derive(Debug)]
pub struct DisjointClosures<M: ClosureMember> {
    closures: Vec<BTreeSet<M>>,
}

impl<M: ClosureMember> Default for DisjointClosures<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ClosureMember> DisjointClosures<M> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            closures: Vec::new(),
        }
    }

    /// Merge a freshly computed closure into the collection.
    ///
    /// Zero existing closures sharing a key: the new closure is appended.
    /// Exactly one: the new closure is unioned into it in place. More than
    /// one would mean two previously separate closures should have been one —
    /// a reference-graph defect the pipeline surfaces rather than repairs.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::NonUniqueClosure`] when the new closure
    /// intersects more than one existing closure.
    pub fn merge(&mut self, new: BTreeSet<M>) -> Result<(), ReconcileError> {
        let new_keys: BTreeSet<&HymnKey> = new.iter().map(ClosureMember::key).collect();

        let hits: Vec<usize> = self
            .closures
            .iter()
            .enumerate()
            .filter(|(_, existing)| existing.iter().any(|m| new_keys.contains(m.key())))
            .map(|(index, _)| index)
            .collect();

        match hits.as_slice() {
            [] => {
                self.closures.push(new);
                Ok(())
            }
            [index] => {
                self.closures[*index].extend(new);
                Ok(())
            }
            many => {
                let seed = new
                    .iter()
                    .next()
                    .map(|m| m.key().clone())
                    .unwrap_or_else(|| {
                        HymnKey::new(crate::core::types::HymnType::Unclassified, "0")
                    });
                let existing = many
                    .iter()
                    .map(|&i| {
                        format!(
                            "[{}]",
                            closure_context(self.closures[i].iter().map(ClosureMember::key))
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(" and ");
                Err(ReconcileError::NonUniqueClosure {
                    seed,
                    count: many.len(),
                    existing,
                })
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BTreeSet<M>> {
        self.closures.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.closures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.closures.is_empty()
    }

    /// Which closure, if any, contains this key.
    #[must_use]
    pub fn find(&self, key: &HymnKey) -> Option<&BTreeSet<M>> {
        self.closures
            .iter()
            .find(|closure| closure.iter().any(|m| m.key() == key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::HymnType;

    fn key(ty: HymnType, number: &str) -> HymnKey {
        HymnKey::new(ty, number)
    }

    fn set(keys: &[HymnKey]) -> BTreeSet<HymnKey> {
        keys.iter().cloned().collect()
    }

    #[test]
    fn test_merge_disjoint_appends() {
        let mut global = DisjointClosures::new();
        global
            .merge(set(&[key(HymnType::Classic, "1"), key(HymnType::Chinese, "1")]))
            .unwrap();
        global
            .merge(set(&[key(HymnType::Classic, "2"), key(HymnType::Chinese, "2")]))
            .unwrap();
        assert_eq!(global.len(), 2);
    }

    #[test]
    fn test_merge_single_overlap_unions_in_place() {
        let mut global = DisjointClosures::new();
        global
            .merge(set(&[key(HymnType::Classic, "1"), key(HymnType::Chinese, "1")]))
            .unwrap();
        global
            .merge(set(&[key(HymnType::Chinese, "1"), key(HymnType::German, "1")]))
            .unwrap();

        assert_eq!(global.len(), 1);
        let merged = global.find(&key(HymnType::German, "1")).unwrap();
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_merge_double_overlap_is_fatal() {
        let mut global = DisjointClosures::new();
        global.merge(set(&[key(HymnType::Classic, "1")])).unwrap();
        global.merge(set(&[key(HymnType::Chinese, "1")])).unwrap();

        let bridging = set(&[key(HymnType::Classic, "1"), key(HymnType::Chinese, "1")]);
        assert!(matches!(
            global.merge(bridging),
            Err(ReconcileError::NonUniqueClosure { count: 2, .. })
        ));
    }

    #[test]
    fn test_reference_closures_merge_on_key_identity() {
        let mut global = DisjointClosures::new();
        let a = Reference::new("New Tune", key(HymnType::NewTune, "1170"));
        let b = Reference::new("Nouvelle", key(HymnType::NewTune, "1170"));

        global.merge(BTreeSet::from([a.clone()])).unwrap();
        // Same key under a different label still lands in the same closure
        global.merge(BTreeSet::from([b.clone()])).unwrap();

        assert_eq!(global.len(), 1);
        let closure = global.find(&key(HymnType::NewTune, "1170")).unwrap();
        assert_eq!(closure.len(), 2);
    }
}
