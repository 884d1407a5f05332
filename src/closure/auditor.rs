//! Cardinality and type-compatibility validation of closures.
//!
//! Closures come out of decades of hand-curated cross-reference data, so the
//! auditor tolerates a fixed, reviewed list of known-legitimate anomalies
//! (the exception sets) while treating everything else as a regression. It
//! never expands that list on its own.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::key::{HymnKey, Reference};
use crate::core::types::HymnType;
use crate::error::{closure_context, ReconcileError};
use crate::rules::RuleTables;

/// Type pairs that can never describe the same hymn.
const INCOMPATIBLE_PAIRS: &[(HymnType, HymnType)] = &[
    (HymnType::Classic, HymnType::NewSong),
    (HymnType::Classic, HymnType::Children),
    (HymnType::Children, HymnType::NewSong),
    (HymnType::Chinese, HymnType::ChineseSupplement),
];

/// Classes whose members with a letter-suffixed number are legitimate
/// alternate arrangements and earn an extra multiplicity allowance.
const SUFFIX_ALLOWANCE_CLASSES: &[HymnType] = &[
    HymnType::Classic,
    HymnType::NewTune,
    HymnType::NewSong,
    HymnType::Children,
];

pub struct ConsistencyAuditor<'a> {
    rules: &'a RuleTables,
}

impl<'a> ConsistencyAuditor<'a> {
    pub fn new(rules: &'a RuleTables) -> Self {
        Self { rules }
    }

    /// Validate a language closure.
    ///
    /// # Errors
    ///
    /// [`ReconcileError::DanglingClosure`] for a singleton,
    /// [`ReconcileError::IncompatibleClosure`] for any multiplicity or
    /// mutual-exclusion violation that survives exception removal.
    pub fn audit_keys(&self, closure: &BTreeSet<HymnKey>) -> Result<(), ReconcileError> {
        if closure.len() == 1 {
            if let Some(key) = closure.iter().next() {
                return Err(ReconcileError::DanglingClosure { key: key.clone() });
            }
        }
        self.check(closure, false)
    }

    /// Validate a relevant closure on its key-set view.
    ///
    /// # Errors
    ///
    /// Same as [`ConsistencyAuditor::audit_keys`].
    pub fn audit_references(&self, closure: &BTreeSet<Reference>) -> Result<(), ReconcileError> {
        let keys: BTreeSet<HymnKey> = closure.iter().map(|r| r.key.clone()).collect();
        self.audit_keys(&keys)
    }

    /// Recursive audit step. On a violation, look for an exception set fully
    /// contained in the closure, remove it, and re-audit the remainder; a
    /// removed set can never match again, so this terminates. A non-empty
    /// remainder reduced to a single member cannot stand as a closure of its
    /// own and fails.
    fn check(&self, keys: &BTreeSet<HymnKey>, is_remainder: bool) -> Result<(), ReconcileError> {
        if is_remainder && keys.len() == 1 {
            return Err(ReconcileError::IncompatibleClosure {
                closure: closure_context(keys),
                reason: "single member left over after exception removal".to_string(),
            });
        }

        let Some(reason) = self.find_violation(keys) else {
            return Ok(());
        };

        if let Some(exception) = self.rules.matching_exception(keys) {
            let remainder: BTreeSet<HymnKey> = keys.difference(exception).cloned().collect();
            if remainder.is_empty() {
                return Ok(());
            }
            return self.check(&remainder, true);
        }

        Err(ReconcileError::IncompatibleClosure {
            closure: closure_context(keys),
            reason,
        })
    }

    /// First multiplicity or mutual-exclusion violation in the closure, if
    /// any. Multiplicities are counted per relation class, so Howard Higashi
    /// members conflict with new songs.
    fn find_violation(&self, keys: &BTreeSet<HymnKey>) -> Option<String> {
        let mut by_class: BTreeMap<HymnType, Vec<&HymnKey>> = BTreeMap::new();
        for key in keys {
            by_class
                .entry(key.hymn_type.relation_class())
                .or_default()
                .push(key);
        }

        for (class, members) in &by_class {
            let mut allowed = match class {
                // Traditional + simplified counterparts coexist
                HymnType::Chinese | HymnType::ChineseSupplement => 2,
                _ => 1,
            };
            if SUFFIX_ALLOWANCE_CLASSES.contains(class) {
                allowed += members.iter().filter(|k| k.has_letter_suffix()).count();
            }
            if members.len() > allowed {
                return Some(format!(
                    "{class} appears {} times, {allowed} allowed",
                    members.len()
                ));
            }
        }

        for (a, b) in INCOMPATIBLE_PAIRS {
            if by_class.contains_key(a) && by_class.contains_key(b) {
                return Some(format!("{a} and {b} cannot describe the same hymn"));
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(ty: HymnType, number: &str) -> HymnKey {
        HymnKey::new(ty, number)
    }

    fn set(keys: &[HymnKey]) -> BTreeSet<HymnKey> {
        keys.iter().cloned().collect()
    }

    #[test]
    fn test_one_translation_per_type_passes() {
        let rules = RuleTables::builtin();
        let auditor = ConsistencyAuditor::new(&rules);
        let closure = set(&[
            key(HymnType::Classic, "720"),
            key(HymnType::Cebuano, "720"),
            key(HymnType::Tagalog, "720"),
            key(HymnType::German, "720"),
        ]);
        auditor.audit_keys(&closure).unwrap();
    }

    #[test]
    fn test_singleton_is_dangling() {
        let rules = RuleTables::builtin();
        let auditor = ConsistencyAuditor::new(&rules);
        let closure = set(&[key(HymnType::Classic, "79")]);
        assert!(matches!(
            auditor.audit_keys(&closure),
            Err(ReconcileError::DanglingClosure { .. })
        ));
    }

    #[test]
    fn test_chinese_allows_both_scripts() {
        let rules = RuleTables::builtin();
        let auditor = ConsistencyAuditor::new(&rules);
        let closure = set(&[
            key(HymnType::Classic, "1"),
            key(HymnType::Chinese, "1"),
            key(HymnType::Chinese, "1").with_variant("gb"),
        ]);
        auditor.audit_keys(&closure).unwrap();

        let too_many = set(&[
            key(HymnType::Classic, "1"),
            key(HymnType::Chinese, "1"),
            key(HymnType::Chinese, "1").with_variant("gb"),
            key(HymnType::Chinese, "2"),
        ]);
        assert!(auditor.audit_keys(&too_many).is_err());
    }

    #[test]
    fn test_letter_suffix_earns_allowance() {
        let rules = RuleTables::builtin();
        let auditor = ConsistencyAuditor::new(&rules);
        let closure = set(&[
            key(HymnType::Classic, "225"),
            key(HymnType::Classic, "225b"),
            key(HymnType::Chinese, "181"),
        ]);
        auditor.audit_keys(&closure).unwrap();

        // No suffix anywhere: two classics are one too many
        let dupes = set(&[
            key(HymnType::Classic, "225"),
            key(HymnType::Classic, "226"),
            key(HymnType::Chinese, "181"),
        ]);
        assert!(matches!(
            auditor.audit_keys(&dupes),
            Err(ReconcileError::IncompatibleClosure { .. })
        ));
    }

    #[test]
    fn test_howard_higashi_conflicts_with_new_song() {
        let rules = RuleTables::builtin();
        let auditor = ConsistencyAuditor::new(&rules);
        let closure = set(&[
            key(HymnType::NewSong, "154"),
            key(HymnType::HowardHigashi, "54"),
        ]);
        assert!(matches!(
            auditor.audit_keys(&closure),
            Err(ReconcileError::IncompatibleClosure { .. })
        ));
    }

    #[test]
    fn test_incompatible_pairs() {
        let rules = RuleTables::builtin();
        let auditor = ConsistencyAuditor::new(&rules);
        let closure = set(&[
            key(HymnType::Classic, "5"),
            key(HymnType::NewSong, "5"),
        ]);
        assert!(matches!(
            auditor.audit_keys(&closure),
            Err(ReconcileError::IncompatibleClosure { .. })
        ));

        let children = set(&[
            key(HymnType::Children, "5"),
            key(HymnType::NewSong, "5"),
        ]);
        assert!(auditor.audit_keys(&children).is_err());
    }

    #[test]
    fn test_exception_set_passes_exact_closure() {
        let rules = RuleTables::builtin();
        let auditor = ConsistencyAuditor::new(&rules);
        // Registered exception: two classics plus french, tagalog and both
        // Chinese scripts
        let closure = set(&[
            key(HymnType::Classic, "1353"),
            key(HymnType::Classic, "8476"),
            key(HymnType::French, "129"),
            key(HymnType::Tagalog, "1353"),
            key(HymnType::Chinese, "476"),
            key(HymnType::Chinese, "476").with_variant("gb"),
        ]);
        auditor.audit_keys(&closure).unwrap();
    }

    #[test]
    fn test_exception_set_minus_any_member_fails() {
        let full = [
            key(HymnType::Classic, "1353"),
            key(HymnType::Classic, "8476"),
            key(HymnType::French, "129"),
            key(HymnType::Tagalog, "1353"),
            key(HymnType::Chinese, "476"),
            key(HymnType::Chinese, "476").with_variant("gb"),
        ];
        let closure = set(&full);

        for drop in &full {
            let mut rules = RuleTables::builtin();
            rules.cardinality_exceptions[0].remove(drop);
            let auditor = ConsistencyAuditor::new(&rules);
            assert!(
                matches!(
                    auditor.audit_keys(&closure),
                    Err(ReconcileError::IncompatibleClosure { .. })
                ),
                "shrunken exception set must not legitimize {drop}"
            );
        }
    }

    #[test]
    fn test_exception_with_valid_remainder_passes() {
        let rules = RuleTables::builtin();
        let auditor = ConsistencyAuditor::new(&rules);
        // ns/73 + lb/14 is a registered exception; the remainder is a valid
        // two-member closure on its own
        let closure = set(&[
            key(HymnType::NewSong, "73"),
            key(HymnType::HowardHigashi, "14"),
            key(HymnType::Chinese, "900"),
            key(HymnType::Classic, "900"),
        ]);
        auditor.audit_keys(&closure).unwrap();
    }
}
