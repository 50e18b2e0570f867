use std::borrow::Cow;

use crate::grammar::{XML_SPECIAL, XML_SPECIAL_OR_ENTITY, substitute};

fn replace_unsafe_char(unit: &str) -> Option<&'static str> {
    match unit {
        "&" => Some("&amp;"),
        "<" => Some("&lt;"),
        ">" => Some("&gt;"),
        "\"" => Some("&quot;"),
        _ => None,
    }
}

/// Escape `& < > "` as named entities.
///
/// With `preserve_entities`, character references already present in `text`
/// are copied through instead of having their `&` escaped.
pub fn escape_xml(text: &str, preserve_entities: bool) -> Cow<'_, str> {
    if !XML_SPECIAL.is_match(text) {
        return Cow::Borrowed(text);
    }
    let pattern = if preserve_entities {
        &*XML_SPECIAL_OR_ENTITY
    } else {
        &*XML_SPECIAL
    };
    substitute(pattern, text, |unit, out| {
        out.push_str(replace_unsafe_char(unit).unwrap_or(unit));
    })
}

/// [`escape_xml`] for text that may be absent; absent text escapes to `""`.
pub fn escape_output(text: Option<&str>, preserve_entities: bool) -> Cow<'_, str> {
    match text {
        Some(text) => escape_xml(text, preserve_entities),
        None => Cow::Borrowed(""),
    }
}
