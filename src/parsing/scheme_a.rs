//! Scheme A identifiers: letter-prefixed tokens such as `E720`, `NS154c`,
//! `Z476`.
//!
//! Token shape is `<code letters><digits><optional lowercase suffix>`. The
//! code embeds the type (and, for `Z`/`ZS`, the simplified-script variant);
//! the suffix stays part of the number.

use crate::core::key::HymnKey;
use crate::core::types::HymnType;
use crate::error::KeyError;
use crate::parsing::translate;

/// Parse a scheme A token into a canonical key.
///
/// New-song tokens whose numeric part exceeds the Howard Higashi offset are
/// canonicalized to the Howard Higashi type with the offset removed.
///
/// # Errors
///
/// Returns [`KeyError::MalformedKey`] if the token does not match the
/// expected shape or carries an unknown code.
pub fn parse_scheme_a(token: &str) -> Result<HymnKey, KeyError> {
    let trimmed = token.trim();

    if let Some(key) = translate::irregular_token(trimmed) {
        return Ok(key);
    }

    let code_end = trimmed
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| KeyError::malformed('A', trimmed))?;
    let (code, number) = trimmed.split_at(code_end);

    let (hymn_type, variant) =
        translate::type_for_scheme_a(code).ok_or_else(|| KeyError::malformed('A', trimmed))?;
    let (numeric, suffix) =
        translate::split_number(number).ok_or_else(|| KeyError::malformed('A', trimmed))?;

    if hymn_type == HymnType::NewSong && numeric > translate::HOWARD_HIGASHI_OFFSET {
        let shifted = numeric - translate::HOWARD_HIGASHI_OFFSET;
        return Ok(HymnKey::new(
            HymnType::HowardHigashi,
            format!("{shifted}{suffix}"),
        ));
    }

    Ok(HymnKey::new(hymn_type, number).with_variant(variant))
}

/// Render a canonical key as a scheme A token.
///
/// # Errors
///
/// Returns [`KeyError::UnsupportedTranslation`] if the key's type (or its
/// variant) has no scheme A representation, or [`KeyError::MalformedKey`] if
/// a Howard Higashi number cannot take the offset.
pub fn to_scheme_a(key: &HymnKey) -> Result<String, KeyError> {
    if let Some(token) = translate::irregular_key(key) {
        return Ok(token.to_string());
    }

    if key.hymn_type == HymnType::HowardHigashi {
        let (numeric, suffix) = translate::split_number(&key.number)
            .ok_or_else(|| KeyError::malformed('A', key.to_string()))?;
        let code = translate::scheme_a_code(HymnType::NewSong)
            .ok_or_else(|| KeyError::unsupported('A', key))?;
        let shifted = numeric + translate::HOWARD_HIGASHI_OFFSET;
        return Ok(format!("{code}{shifted}{suffix}"));
    }

    let code = if key.variant == "gb" {
        translate::simplified_scheme_a_code(key.hymn_type)
    } else if key.variant.is_empty() {
        translate::scheme_a_code(key.hymn_type)
    } else {
        None
    }
    .ok_or_else(|| KeyError::unsupported('A', key))?;

    Ok(format!("{code}{}", key.number))
}
