//! Parsers and renderers for the two external identifier dialects.
//!
//! | Module | Dialect | Shape |
//! |--------|---------|-------|
//! | [`scheme_a`] | scheme A | `E720`, `NS154c`, `Z476` |
//! | [`scheme_b`] | scheme B | `h/720`, `ch/476?gb=1` |
//! | [`translate`] | — | the static code tables both dialects share |
//!
//! Translation between the dialects is an explicit function table (see
//! [`translate`]): the Howard Higashi offset, the simplified-script codes,
//! and the irregular fixed-up tokens are all data, not derived logic.
//!
//! ## Example
//!
//! ```rust
//! use hymnlink::parsing::scheme_a::{parse_scheme_a, to_scheme_a};
//! use hymnlink::parsing::scheme_b::{parse_scheme_b, to_scheme_b};
//!
//! let key = parse_scheme_b("lb/87").unwrap();
//! assert_eq!(to_scheme_a(&key).unwrap(), "NS1087b");
//! assert_eq!(parse_scheme_a("NS1087").unwrap(), key);
//! assert_eq!(to_scheme_b(&key), "lb/87");
//! ```

pub mod scheme_a;
pub mod scheme_b;
pub mod translate;
