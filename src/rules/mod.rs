//! Static rule tables: curated domain corrections threaded into the pipeline.
//!
//! The tables encode one-off decisions accumulated over decades of
//! hand-maintained cross-reference data: identifiers to drop, mistyped
//! dialect markers to rewrite, a numeric threshold above which near-duplicate
//! entries are skipped, closed exception sets that legitimize otherwise
//! invalid closures, and the display labels regenerated for language
//! write-backs.
//!
//! They are configuration data, versioned with the code and reproduced
//! exactly — never derived, learned, or expanded at runtime. [`RuleTables`]
//! is an explicit immutable value passed into constructors (no module-level
//! singletons), so tests and operators can swap in their own tables:
//!
//! ```rust
//! use hymnlink::rules::RuleTables;
//!
//! let builtin = RuleTables::builtin();
//! let from_file = RuleTables::from_json("{\"display_labels\":{}}").unwrap();
//! assert!(from_file.cardinality_exceptions.is_empty());
//! assert!(!builtin.cardinality_exceptions.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;

use crate::core::key::HymnKey;
use crate::core::types::{HymnType, RelationKind};
use crate::error::ReconcileError;
use crate::parsing::translate;

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Failed to read rule tables: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse rule tables: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Type-level rewrite applied to a reference key before traversal recurses
/// into it (a mistyped dialect marker corrected to the real type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    pub from: HymnType,
    pub to: HymnType,
}

/// Keys of `hymn_type` with a numeric part above `above` are dropped during
/// traversal as low-value near-duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub hymn_type: HymnType,
    pub above: u32,
}

/// Literal display label for one known-ambiguous `(source, target)` pair,
/// taking precedence over the per-type label table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelOverride {
    pub from: HymnKey,
    pub to: HymnKey,
    pub label: String,
}

/// The full set of curated rule tables consumed by the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleTables {
    /// Exact keys dropped from language reference lists
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub language_ignores: Vec<HymnKey>,

    /// Exact keys dropped from relevant reference lists
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relevant_ignores: Vec<HymnKey>,

    /// Type-level rewrites applied before recursion
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rewrites: Vec<RewriteRule>,

    /// Numeric-range drop rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thresholds: Vec<ThresholdRule>,

    /// Closed key sets that are known, reviewed, legitimate violations of the
    /// default cardinality/compatibility rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cardinality_exceptions: Vec<BTreeSet<HymnKey>>,

    /// Display label regenerated for a language write, keyed by the target's
    /// type
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub display_labels: BTreeMap<HymnType, String>,

    /// Literal per-pair label overrides for known-ambiguous cases
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub label_overrides: Vec<LabelOverride>,
}

impl RuleTables {
    /// The curated tables shipped with the tool.
    #[must_use]
    pub fn builtin() -> Self {
        let key = HymnKey::new;

        let language_ignores = vec![
            // Orphaned mappings left behind by source-site renumbering
            key(HymnType::Tagalog, "437"),
            key(HymnType::German, "786b"),
            key(HymnType::Chinese, "641"),
        ];

        let relevant_ignores = vec![
            // Known-bad alternate-tune links pointing at unrelated songs
            key(HymnType::NewTune, "477"),
            key(HymnType::NewSong, "7"),
        ];

        let rewrites = vec![
            // Scripture songs were filed under the new-song marker upstream
            RewriteRule {
                from: HymnType::Scripture,
                to: HymnType::NewSong,
            },
        ];

        let thresholds = vec![
            // Classic numbers above 8000 are alternate-key near-duplicates
            ThresholdRule {
                hymn_type: HymnType::Classic,
                above: 8000,
            },
        ];

        let cardinality_exceptions = vec![
            // Reviewed multi-member groups; each set must be reproduced
            // exactly, members are not individually removable
            BTreeSet::from([
                key(HymnType::Classic, "1353"),
                key(HymnType::Classic, "8476"),
                key(HymnType::French, "129"),
                key(HymnType::Tagalog, "1353"),
                key(HymnType::Chinese, "476"),
                key(HymnType::Chinese, "476").with_variant("gb"),
            ]),
            BTreeSet::from([
                key(HymnType::NewSong, "73"),
                key(HymnType::HowardHigashi, "14"),
            ]),
            BTreeSet::from([
                key(HymnType::Children, "23"),
                key(HymnType::Classic, "1057"),
            ]),
        ];

        let display_labels = BTreeMap::from(
            [
                (HymnType::Classic, "English"),
                (HymnType::NewTune, "New Tune"),
                (HymnType::NewSong, "New Song"),
                (HymnType::Children, "Children"),
                (HymnType::Chinese, "Chinese"),
                (HymnType::ChineseSupplement, "Chinese Supplement"),
                (HymnType::Tagalog, "Tagalog"),
                (HymnType::Cebuano, "Cebuano"),
                (HymnType::French, "French"),
                (HymnType::German, "German"),
                (HymnType::Korean, "Korean"),
                (HymnType::Japanese, "Japanese"),
                (HymnType::Farsi, "Farsi"),
                (HymnType::Indonesian, "Indonesian"),
                (HymnType::Scripture, "Scripture"),
                (HymnType::HowardHigashi, "Howard Higashi"),
                (HymnType::BeFilled, "Be Filled"),
            ]
            .map(|(ty, label)| (ty, label.to_string())),
        );

        let label_overrides = vec![
            LabelOverride {
                from: key(HymnType::Classic, "921"),
                to: key(HymnType::NewTune, "921b"),
                label: "New Tune (Alternate)".to_string(),
            },
            LabelOverride {
                from: key(HymnType::Chinese, "1090"),
                to: key(HymnType::Classic, "1090"),
                label: "English (Original)".to_string(),
            },
        ];

        Self {
            language_ignores,
            relevant_ignores,
            rewrites,
            thresholds,
            cardinality_exceptions,
            display_labels,
            label_overrides,
        }
    }

    /// Load rule tables from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::ReadError` if the file cannot be read or
    /// `RuleError::ParseError` if it is not a valid rule-table document.
    pub fn load_from_file(path: &Path) -> Result<Self, RuleError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse rule tables from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::ParseError` on malformed input.
    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Export the tables to JSON (for operators bootstrapping a custom file).
    ///
    /// # Errors
    ///
    /// Returns `RuleError::ParseError` if serialization fails.
    pub fn to_json(&self) -> Result<String, RuleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Is this exact key unconditionally dropped for the given relation kind?
    #[must_use]
    pub fn ignored(&self, kind: RelationKind, key: &HymnKey) -> bool {
        let ignores = match kind {
            RelationKind::Language => &self.language_ignores,
            RelationKind::Relevant => &self.relevant_ignores,
        };
        ignores.contains(key)
    }

    /// Apply the type-level rewrite rules to a key.
    #[must_use]
    pub fn rewrite(&self, mut key: HymnKey) -> HymnKey {
        if let Some(rule) = self.rewrites.iter().find(|r| r.from == key.hymn_type) {
            key.hymn_type = rule.to;
        }
        key
    }

    /// Does a numeric-range rule drop this key?
    #[must_use]
    pub fn over_threshold(&self, key: &HymnKey) -> bool {
        let Some((numeric, _)) = translate::split_number(&key.number) else {
            return false;
        };
        self.thresholds
            .iter()
            .any(|rule| rule.hymn_type == key.hymn_type && numeric > rule.above)
    }

    /// First registered exception set fully contained in the closure, if any.
    /// Once a set has been removed it can never match the remainder again, so
    /// exception removal is idempotent.
    #[must_use]
    pub fn matching_exception(&self, closure: &BTreeSet<HymnKey>) -> Option<&BTreeSet<HymnKey>> {
        self.cardinality_exceptions
            .iter()
            .find(|ex| !ex.is_empty() && ex.is_subset(closure))
    }

    /// Display label for a target type.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::MissingDisplayLabel`] for an unmapped type;
    /// falling through silently would write a wrong label.
    pub fn display_label(&self, hymn_type: HymnType) -> Result<&str, ReconcileError> {
        self.display_labels
            .get(&hymn_type)
            .map(String::as_str)
            .ok_or(ReconcileError::MissingDisplayLabel { hymn_type })
    }

    /// Label for a language write from `from` to `to`: the literal override
    /// when one is registered, otherwise the target type's label.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::MissingDisplayLabel`] if no override exists
    /// and the target type is unmapped.
    pub fn label_for(&self, from: &HymnKey, to: &HymnKey) -> Result<String, ReconcileError> {
        if let Some(over) = self
            .label_overrides
            .iter()
            .find(|o| &o.from == from && &o.to == to)
        {
            return Ok(over.label.clone());
        }
        Ok(self.display_label(to.hymn_type)?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ignores() {
        let rules = RuleTables::builtin();
        let ignored = HymnKey::new(HymnType::Tagalog, "437");
        assert!(rules.ignored(RelationKind::Language, &ignored));
        assert!(!rules.ignored(RelationKind::Relevant, &ignored));
        assert!(!rules.ignored(RelationKind::Language, &HymnKey::new(HymnType::Tagalog, "438")));
    }

    #[test]
    fn test_rewrite_changes_type_only() {
        let rules = RuleTables::builtin();
        let rewritten = rules.rewrite(HymnKey::new(HymnType::Scripture, "12b"));
        assert_eq!(rewritten, HymnKey::new(HymnType::NewSong, "12b"));

        let untouched = rules.rewrite(HymnKey::new(HymnType::Classic, "720"));
        assert_eq!(untouched, HymnKey::new(HymnType::Classic, "720"));
    }

    #[test]
    fn test_threshold_rule() {
        let rules = RuleTables::builtin();
        assert!(rules.over_threshold(&HymnKey::new(HymnType::Classic, "8001")));
        assert!(rules.over_threshold(&HymnKey::new(HymnType::Classic, "8476b")));
        assert!(!rules.over_threshold(&HymnKey::new(HymnType::Classic, "8000")));
        assert!(!rules.over_threshold(&HymnKey::new(HymnType::NewSong, "8001")));
    }

    #[test]
    fn test_matching_exception_is_subset_based_and_idempotent() {
        let rules = RuleTables::builtin();
        let exception = rules.cardinality_exceptions[0].clone();

        let mut closure = exception.clone();
        closure.insert(HymnKey::new(HymnType::German, "1353"));

        let matched = rules.matching_exception(&closure).unwrap().clone();
        assert_eq!(matched, exception);

        let remainder: BTreeSet<HymnKey> = closure.difference(&matched).cloned().collect();
        assert!(rules.matching_exception(&remainder).is_none());
    }

    #[test]
    fn test_labels_and_overrides() {
        let rules = RuleTables::builtin();
        let seed = HymnKey::new(HymnType::Cebuano, "720");
        let target = HymnKey::new(HymnType::German, "720");
        assert_eq!(rules.label_for(&seed, &target).unwrap(), "German");

        let from = HymnKey::new(HymnType::Classic, "921");
        let to = HymnKey::new(HymnType::NewTune, "921b");
        assert_eq!(rules.label_for(&from, &to).unwrap(), "New Tune (Alternate)");

        let unmapped = HymnKey::new(HymnType::Unclassified, "3");
        assert!(matches!(
            rules.label_for(&seed, &unmapped),
            Err(ReconcileError::MissingDisplayLabel { .. })
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let rules = RuleTables::builtin();
        let json = rules.to_json().unwrap();
        let back = RuleTables::from_json(&json).unwrap();
        assert_eq!(back.language_ignores, rules.language_ignores);
        assert_eq!(back.cardinality_exceptions, rules.cardinality_exceptions);
        assert_eq!(back.display_labels, rules.display_labels);
    }
}
