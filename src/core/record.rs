use serde::{Deserialize, Serialize};

use crate::core::key::{HymnKey, Reference};
use crate::core::types::RelationKind;
use crate::error::KeyError;

/// One reference entry as it sits in the source record: a scheme B path plus
/// the display label stored next to it. Structural parsing of the wire
/// payload (JSON or otherwise) happens upstream; this is the already
/// deserialized shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReference {
    pub path: String,
    pub value: String,
}

impl RawReference {
    pub fn new(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

/// One hymn record as loaded into memory for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HymnRecord {
    pub key: HymnKey,

    /// Stored language-translation references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<RawReference>,

    /// Stored relevant-song (alternate tune / adaptation) references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relevant: Vec<RawReference>,
}

impl HymnRecord {
    pub fn new(key: HymnKey) -> Self {
        Self {
            key,
            languages: Vec::new(),
            relevant: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_languages(mut self, languages: Vec<RawReference>) -> Self {
        self.languages = languages;
        self
    }

    #[must_use]
    pub fn with_relevant(mut self, relevant: Vec<RawReference>) -> Self {
        self.relevant = relevant;
        self
    }

    /// The raw stored reference list for one relation kind.
    #[must_use]
    pub fn raw_references(&self, kind: RelationKind) -> &[RawReference] {
        match kind {
            RelationKind::Language => &self.languages,
            RelationKind::Relevant => &self.relevant,
        }
    }
}

/// Turn a record's stored reference list into `(label, key)` pairs.
///
/// An absent field yields an empty list. No validation beyond structural
/// shape happens here; consistency checking is the auditor's job.
///
/// # Errors
///
/// Returns [`KeyError::MalformedKey`] if a stored path does not parse as a
/// scheme B identifier.
pub fn extract(record: &HymnRecord, kind: RelationKind) -> Result<Vec<Reference>, KeyError> {
    record
        .raw_references(kind)
        .iter()
        .map(|raw| {
            let key = crate::parsing::scheme_b::parse_scheme_b(&raw.path)?;
            Ok(Reference::new(raw.value.clone(), key))
        })
        .collect()
}
