use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::types::HymnType;
use crate::parsing::scheme_b;

/// Canonical identity of one hymn record.
///
/// Two keys are equal iff all three fields match. The `number` is an opaque
/// alphanumeric token and may embed a letter suffix (`225b`); the `variant`
/// distinguishes script variants of the same number (`gb` for simplified
/// Chinese) and is the empty string when absent.
///
/// Keys serialize as their scheme B path (`h/720`, `ch/476?gb=1`), which is
/// also their `Display` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HymnKey {
    pub hymn_type: HymnType,
    pub number: String,
    pub variant: String,
}

impl HymnKey {
    pub fn new(hymn_type: HymnType, number: impl Into<String>) -> Self {
        Self {
            hymn_type,
            number: number.into(),
            variant: String::new(),
        }
    }

    #[must_use]
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = variant.into();
        self
    }

    /// True when the number carries a letter-variant suffix (`225b`): digits
    /// followed by a non-empty non-digit tail. Such keys represent legitimate
    /// alternate arrangements and relax the auditor's cardinality rule.
    #[must_use]
    pub fn has_letter_suffix(&self) -> bool {
        match self.number.rfind(|c: char| c.is_ascii_digit()) {
            Some(last_digit) => last_digit + 1 < self.number.len(),
            None => false,
        }
    }

    /// True if two keys would conflict under the "at most one translation per
    /// type" rule. Howard Higashi songs are compared by relation class rather
    /// than raw type.
    #[must_use]
    pub fn same_relation_class(&self, other: &Self) -> bool {
        self.hymn_type.relation_class() == other.hymn_type.relation_class()
    }
}

impl std::fmt::Display for HymnKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", scheme_b::to_scheme_b(self))
    }
}

impl Serialize for HymnKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&scheme_b::to_scheme_b(self))
    }
}

impl<'de> Deserialize<'de> for HymnKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let path = String::deserialize(deserializer)?;
        scheme_b::parse_scheme_b(&path).map_err(D::Error::custom)
    }
}

/// One entry of a record's stored reference list: a display label plus the
/// key it points at.
///
/// The label is free text in the target record's display language and is not
/// semantically compared for equality of relation; equality of a `Reference`
/// is defined over `(label, key)` jointly, matching write-back dedup
/// semantics.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub label: String,
    pub key: HymnKey,
}

impl Reference {
    pub fn new(label: impl Into<String>, key: HymnKey) -> Self {
        Self {
            label: label.into(),
            key,
        }
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.key, self.label)
    }
}
