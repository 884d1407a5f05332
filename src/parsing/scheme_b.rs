//! Scheme B identifiers: slash-delimited paths such as `h/720`, `lb/87`,
//! `ch/476?gb=1`.
//!
//! Stored reference paths may carry a longer site prefix
//! (`/en/hymn/h/720`); only the last two segments are significant. The
//! `gb=1` query marks the simplified-script variant of the Chinese types.

use crate::core::key::HymnKey;
use crate::core::types::HymnType;
use crate::error::KeyError;
use crate::parsing::translate;

/// Parse a scheme B path into a canonical key.
///
/// # Errors
///
/// Returns [`KeyError::MalformedKey`] if the path has fewer than two
/// segments, an unknown type code, a malformed number, an unrecognized query
/// suffix, or a `gb=1` variant on a non-Chinese type.
pub fn parse_scheme_b(path: &str) -> Result<HymnKey, KeyError> {
    let trimmed = path.trim();

    let (route, query) = match trimmed.split_once('?') {
        Some((route, query)) => (route, query),
        None => (trimmed, ""),
    };

    let variant = match query {
        "" => "",
        "gb=1" => "gb",
        _ => return Err(KeyError::malformed('B', trimmed)),
    };

    let segments: Vec<&str> = route.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < 2 {
        return Err(KeyError::malformed('B', trimmed));
    }
    let code = segments[segments.len() - 2];
    let number = segments[segments.len() - 1];

    let hymn_type =
        translate::type_for_scheme_b(code).ok_or_else(|| KeyError::malformed('B', trimmed))?;
    if translate::split_number(number).is_none() {
        return Err(KeyError::malformed('B', trimmed));
    }
    if variant == "gb"
        && !matches!(
            hymn_type,
            HymnType::Chinese | HymnType::ChineseSupplement
        )
    {
        return Err(KeyError::malformed('B', trimmed));
    }

    Ok(HymnKey::new(hymn_type, number).with_variant(variant))
}

/// Render a canonical key as a scheme B path. Total: every canonical type
/// has a scheme B code.
#[must_use]
pub fn to_scheme_b(key: &HymnKey) -> String {
    let code = translate::scheme_b_code(key.hymn_type);
    if key.variant.is_empty() {
        format!("{code}/{}", key.number)
    } else {
        format!("{code}/{}?gb=1", key.number)
    }
}
