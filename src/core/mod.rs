//! Core data types for hymn cross-reference reconciliation.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`HymnKey`]: Canonical identity of a hymn record (type + number + variant)
//! - [`Reference`]: One stored cross-reference, a display label plus a key
//! - [`HymnRecord`]: A record's key and its stored reference lists
//! - [`HymnType`], [`RelationKind`]: Classification types
//!
//! ## Identity
//!
//! Identifiers arrive in two external dialects:
//!
//! | Dialect  | Shape                       | Example       |
//! |----------|-----------------------------|---------------|
//! | scheme A | letter-prefixed token       | `E720`, `Z476`|
//! | scheme B | type-segment/number path    | `h/720`, `ch/476?gb=1` |
//!
//! Both parse into the same canonical [`HymnKey`] space. Equality is over
//! exact fields only; dialect translation never participates in identity
//! comparison.
//!
//! [`HymnKey`]: key::HymnKey
//! [`Reference`]: key::Reference
//! [`HymnRecord`]: record::HymnRecord
//! [`HymnType`]: types::HymnType
//! [`RelationKind`]: types::RelationKind

pub mod key;
pub mod record;
pub mod types;
