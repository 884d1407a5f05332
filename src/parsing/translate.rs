//! Static bidirectional dialect-code tables.
//!
//! Translation between the two external numbering dialects is table-driven,
//! never inferred. Three wrinkles prevent it from being a pure bijection:
//!
//! 1. Howard Higashi songs have no scheme A code of their own; scheme A files
//!    them as new songs offset by [`HOWARD_HIGASHI_OFFSET`] (`lb/87` ⇄
//!    `NS1087`).
//! 2. Simplified script is a key *variant* in scheme B (`ch/476?gb=1`) but a
//!    distinct *code* in scheme A (`Z476`).
//! 3. Three numbers were published in scheme A under irregular fixed-up
//!    tokens, reproduced verbatim in [`IRREGULAR_SCHEME_A`]. The naive token
//!    for these numbers still parses, but re-rendering always produces the
//!    corrected token.

use crate::core::key::HymnKey;
use crate::core::types::HymnType;

/// Fixed offset applied to Howard Higashi numbers in scheme A.
pub const HOWARD_HIGASHI_OFFSET: u32 = 1000;

/// Dialect codes per hymn type. Scheme B codes are total; scheme A codes are
/// absent where the dialect has no representation for the type.
const DIALECT_CODES: &[(HymnType, Option<&str>, &str)] = &[
    (HymnType::Classic, Some("E"), "h"),
    (HymnType::NewTune, Some("NT"), "nt"),
    (HymnType::NewSong, Some("NS"), "ns"),
    (HymnType::Children, Some("CH"), "c"),
    (HymnType::Chinese, Some("C"), "ch"),
    (HymnType::ChineseSupplement, Some("CS"), "ts"),
    (HymnType::Tagalog, Some("T"), "ht"),
    (HymnType::Cebuano, Some("CB"), "cb"),
    (HymnType::French, Some("FR"), "hf"),
    (HymnType::German, Some("G"), "de"),
    (HymnType::Korean, Some("K"), "ko"),
    (HymnType::Japanese, Some("J"), "ja"),
    (HymnType::Farsi, Some("F"), "fa"),
    (HymnType::Indonesian, Some("I"), "in"),
    (HymnType::Scripture, Some("S"), "sc"),
    (HymnType::HowardHigashi, None, "lb"),
    (HymnType::BeFilled, Some("BF"), "bf"),
    (HymnType::Unclassified, None, "x"),
];

/// Scheme A codes for the simplified-script variant of the Chinese types.
const SIMPLIFIED_CODES: &[(HymnType, &str)] = &[
    (HymnType::Chinese, "Z"),
    (HymnType::ChineseSupplement, "ZS"),
];

/// Irregular scheme A tokens: `(token, type, number)`. Curated domain data,
/// reproduced exactly; there is no derivation rule.
const IRREGULAR_SCHEME_A: &[(&str, HymnType, &str)] = &[
    ("NS1087b", HymnType::HowardHigashi, "87"),
    ("C513a", HymnType::Chinese, "513"),
    ("NS722c", HymnType::NewSong, "722"),
];

/// Scheme B code for a type. Total: every canonical type renders in scheme B.
#[must_use]
pub fn scheme_b_code(hymn_type: HymnType) -> &'static str {
    DIALECT_CODES
        .iter()
        .find(|(ty, _, _)| *ty == hymn_type)
        .map(|(_, _, b)| *b)
        .unwrap_or("x")
}

/// Type for a scheme B code, if any.
#[must_use]
pub fn type_for_scheme_b(code: &str) -> Option<HymnType> {
    DIALECT_CODES
        .iter()
        .find(|(_, _, b)| *b == code)
        .map(|(ty, _, _)| *ty)
}

/// Scheme A code for a type, if the dialect can express it.
#[must_use]
pub fn scheme_a_code(hymn_type: HymnType) -> Option<&'static str> {
    DIALECT_CODES
        .iter()
        .find(|(ty, _, _)| *ty == hymn_type)
        .and_then(|(_, a, _)| *a)
}

/// Scheme A code for the simplified-script variant of a type, if any.
#[must_use]
pub fn simplified_scheme_a_code(hymn_type: HymnType) -> Option<&'static str> {
    SIMPLIFIED_CODES
        .iter()
        .find(|(ty, _)| *ty == hymn_type)
        .map(|(_, code)| *code)
}

/// Resolve a scheme A code to `(type, variant)`. The simplified codes carry
/// the `gb` variant.
#[must_use]
pub fn type_for_scheme_a(code: &str) -> Option<(HymnType, &'static str)> {
    if let Some((ty, _)) = SIMPLIFIED_CODES.iter().find(|(_, c)| *c == code) {
        return Some((*ty, "gb"));
    }
    DIALECT_CODES
        .iter()
        .find(|(_, a, _)| *a == Some(code))
        .map(|(ty, _, _)| (*ty, ""))
}

/// Canonical key for an irregular scheme A token, if registered.
#[must_use]
pub fn irregular_token(token: &str) -> Option<HymnKey> {
    IRREGULAR_SCHEME_A
        .iter()
        .find(|(tok, _, _)| *tok == token)
        .map(|(_, ty, number)| HymnKey::new(*ty, *number))
}

/// Registered irregular scheme A token for a key, if any.
#[must_use]
pub fn irregular_key(key: &HymnKey) -> Option<&'static str> {
    if !key.variant.is_empty() {
        return None;
    }
    IRREGULAR_SCHEME_A
        .iter()
        .find(|(_, ty, number)| *ty == key.hymn_type && *number == key.number)
        .map(|(tok, _, _)| *tok)
}

/// Split a number token into its numeric part and letter suffix.
/// `None` if the token does not start with digits or the suffix is not
/// lowercase letters.
#[must_use]
pub(crate) fn split_number(number: &str) -> Option<(u32, &str)> {
    let digits_end = number
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(number.len());
    let (digits, suffix) = number.split_at(digits_end);
    let numeric = digits.parse().ok()?;
    if suffix.chars().all(|c| c.is_ascii_lowercase()) {
        Some((numeric, suffix))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_b_codes_are_unique() {
        for (i, (_, _, a)) in DIALECT_CODES.iter().enumerate() {
            for (_, _, b) in &DIALECT_CODES[i + 1..] {
                assert_ne!(a, b, "duplicate scheme B code {a}");
            }
        }
    }

    #[test]
    fn test_scheme_a_codes_are_unique() {
        let mut codes: Vec<&str> = DIALECT_CODES.iter().filter_map(|(_, a, _)| *a).collect();
        codes.extend(SIMPLIFIED_CODES.iter().map(|(_, c)| *c));
        let total = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), total);
    }

    #[test]
    fn test_simplified_codes_map_to_variant() {
        assert_eq!(type_for_scheme_a("Z"), Some((HymnType::Chinese, "gb")));
        assert_eq!(
            type_for_scheme_a("ZS"),
            Some((HymnType::ChineseSupplement, "gb"))
        );
    }

    #[test]
    fn test_irregular_tokens_round_trip_through_key() {
        for (token, ty, number) in IRREGULAR_SCHEME_A {
            let key = irregular_token(token).unwrap();
            assert_eq!(key, HymnKey::new(*ty, *number));
            assert_eq!(irregular_key(&key), Some(*token));
        }
    }

    #[test]
    fn test_split_number() {
        assert_eq!(split_number("225b"), Some((225, "b")));
        assert_eq!(split_number("720"), Some((720, "")));
        assert_eq!(split_number("b225"), None);
        assert_eq!(split_number("225B"), None);
    }
}
