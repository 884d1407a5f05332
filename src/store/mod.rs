//! Record store and persistence sink seams.
//!
//! The pipeline never talks to the source database or the destination
//! directly: it reads records through [`RecordStore`] and hands computed
//! diffs to a [`PersistenceSink`]. The batch tool loads the full record set
//! into an [`InMemoryRecordStore`] before traversal begins (the working set
//! is a few thousand records) and collects planned writes with a
//! [`PlanCollector`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::core::key::{HymnKey, Reference};
use crate::core::record::HymnRecord;
use crate::core::types::RelationKind;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read record set: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse record set: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("duplicate record for {0}")]
    DuplicateRecord(HymnKey),
}

/// Read access to the loaded record set. Key enumeration must be in a stable
/// order so batch runs are deterministic.
pub trait RecordStore {
    fn get(&self, key: &HymnKey) -> Option<&HymnRecord>;

    fn contains(&self, key: &HymnKey) -> bool {
        self.get(key).is_some()
    }

    /// All record keys, in a stable order.
    fn keys(&self) -> Box<dyn Iterator<Item = &HymnKey> + '_>;
}

/// The whole record set, memory-resident for the duration of one batch run.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: BTreeMap<HymnKey, HymnRecord>,
}

impl InMemoryRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a list of records.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateRecord` if two records share a key.
    pub fn from_records(records: Vec<HymnRecord>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    /// Load a record set from a JSON file (an array of records).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ReadError` if the file cannot be read,
    /// `StoreError::ParseError` if it is not a valid record array, or
    /// `StoreError::DuplicateRecord` on a repeated key.
    pub fn load_from_file(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a record set from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ParseError` or `StoreError::DuplicateRecord`.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let records: Vec<HymnRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Add one record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateRecord` if the key is already present.
    pub fn insert(&mut self, record: HymnRecord) -> Result<(), StoreError> {
        let key = record.key.clone();
        if self.records.insert(key.clone(), record).is_some() {
            return Err(StoreError::DuplicateRecord(key));
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get(&self, key: &HymnKey) -> Option<&HymnRecord> {
        self.records.get(key)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &HymnKey> + '_> {
        Box::new(self.records.keys())
    }
}

/// One planned reference-list write for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedWrite {
    pub key: HymnKey,
    pub kind: RelationKind,
    pub references: Vec<Reference>,
}

/// Destination for computed diffs: an idempotent upsert of new reference
/// entries for one record. Errors are fatal and abort the batch.
pub trait PersistenceSink {
    /// Append `references` to the stored list for `key`.
    ///
    /// # Errors
    ///
    /// Any error here propagates as a fatal pipeline error.
    fn write(
        &mut self,
        key: &HymnKey,
        kind: RelationKind,
        references: &[Reference],
    ) -> std::io::Result<()>;
}

/// Sink that accumulates planned writes in memory, for plan output and for
/// tests.
#[derive(Debug, Default)]
pub struct PlanCollector {
    pub writes: Vec<PlannedWrite>,
}

impl PlanCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistenceSink for PlanCollector {
    fn write(
        &mut self,
        key: &HymnKey,
        kind: RelationKind,
        references: &[Reference],
    ) -> std::io::Result<()> {
        self.writes.push(PlannedWrite {
            key: key.clone(),
            kind,
            references: references.to_vec(),
        });
        Ok(())
    }
}
