//! Resolution of character references to text.

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;

const REPLACEMENT: char = '\u{FFFD}';

/// Resolves a full character reference token (`&name;`, `&#NNN;`,
/// `&#xHHHH;`) to the text it denotes.
///
/// Implementations must be total: a token that cannot be resolved comes back
/// unchanged.
pub trait EntityDecoder: Send + Sync {
    fn decode<'a>(&self, reference: &'a str) -> Cow<'a, str>;
}

impl<D: EntityDecoder + ?Sized> EntityDecoder for &D {
    fn decode<'a>(&self, reference: &'a str) -> Cow<'a, str> {
        (**self).decode(reference)
    }
}

impl<D: EntityDecoder + ?Sized> EntityDecoder for Box<D> {
    fn decode<'a>(&self, reference: &'a str) -> Cow<'a, str> {
        (**self).decode(reference)
    }
}

// HTML5 named references keyed on the full `&name;` token. Legacy entries
// without the trailing `;` are left out.
static NAMED_REFERENCES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    entities::ENTITIES
        .iter()
        .filter(|entity| entity.entity.ends_with(';'))
        .map(|entity| (entity.entity, entity.characters))
        .collect()
});

/// Numeric references are decoded directly; named references go through the
/// HTML5 entity table.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlEntityDecoder;

impl EntityDecoder for HtmlEntityDecoder {
    fn decode<'a>(&self, reference: &'a str) -> Cow<'a, str> {
        let Some(body) = reference
            .strip_prefix('&')
            .and_then(|rest| rest.strip_suffix(';'))
        else {
            return Cow::Borrowed(reference);
        };

        if let Some(number) = body.strip_prefix('#') {
            return match decode_numeric(number) {
                Some(ch) => Cow::Owned(ch.to_string()),
                None => Cow::Borrowed(reference),
            };
        }

        match NAMED_REFERENCES.get(reference) {
            Some(&characters) => Cow::Borrowed(characters),
            None => {
                tracing::trace!(reference, "unknown character reference left as is");
                Cow::Borrowed(reference)
            }
        }
    }
}

/// Decode the digits of `&#...;`, with an optional `x`/`X` radix marker.
///
/// Zero, surrogates and anything beyond U+10FFFF decode to U+FFFD. Every other
/// value, C1 controls and noncharacters included, is its own code point.
pub(crate) fn decode_numeric(number: &str) -> Option<char> {
    let (digits, radix) = match number.strip_prefix(['x', 'X']) {
        Some(hex) => (hex, 16),
        None => (number, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let ch = match u32::from_str_radix(digits, radix) {
        Ok(0) | Err(_) => REPLACEMENT,
        Ok(value) => char::from_u32(value).unwrap_or(REPLACEMENT),
    };
    Some(ch)
}
