//! Error taxonomy for the reconciliation pipeline.
//!
//! Every variant here is fatal by design: the tool is a batch data-migration
//! utility, and masking an inconsistency is worse than stopping. Errors carry
//! the offending key or closure so an operator can add a rule-table entry and
//! rerun the batch.

use thiserror::Error;

use crate::core::key::HymnKey;
use crate::core::types::{HymnType, RelationKind};

/// Failure to parse or translate an external identifier.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("malformed scheme {scheme} identifier: {token:?}")]
    MalformedKey { scheme: char, token: String },

    #[error("no scheme {scheme} equivalent for {key}")]
    UnsupportedTranslation { scheme: char, key: String },
}

impl KeyError {
    pub(crate) fn malformed(scheme: char, token: impl Into<String>) -> Self {
        Self::MalformedKey {
            scheme,
            token: token.into(),
        }
    }

    pub(crate) fn unsupported(scheme: char, key: impl ToString) -> Self {
        Self::UnsupportedTranslation {
            scheme,
            key: key.to_string(),
        }
    }
}

/// Fatal inconsistency surfaced by the closure/merge/audit/plan pipeline.
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("{kind} reference to {key} (reached from {seed}) has no backing record")]
    MissingRecord {
        key: HymnKey,
        seed: HymnKey,
        kind: RelationKind,
    },

    #[error("closure seeded at {seed} intersects {count} existing closures: {existing}")]
    NonUniqueClosure {
        seed: HymnKey,
        count: usize,
        existing: String,
    },

    #[error("dangling closure: {key} resolves only to itself")]
    DanglingClosure { key: HymnKey },

    #[error("{seed} is not referenced back by any member of its relevant closure")]
    UnresolvedBacklink { seed: HymnKey },

    #[error("incompatible closure [{closure}]: {reason}")]
    IncompatibleClosure { closure: String, reason: String },

    #[error("no display label registered for hymn type {hymn_type}")]
    MissingDisplayLabel { hymn_type: HymnType },

    #[error("stored {kind} references for {key} disagree with computed closure: {detail}")]
    WriteMismatch {
        key: HymnKey,
        kind: RelationKind,
        detail: String,
    },

    #[error("persistence sink failed writing {kind} references for {key}")]
    Sink {
        key: HymnKey,
        kind: RelationKind,
        #[source]
        source: std::io::Error,
    },
}

/// Render a closure's keys for error context.
pub(crate) fn closure_context<'a, I>(keys: I) -> String
where
    I: IntoIterator<Item = &'a HymnKey>,
{
    keys.into_iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
