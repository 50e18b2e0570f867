use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};

/// Letters, digits and `_ . - ~` are never encoded.
const UNRESERVED_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

const FALLBACK_ENCODE_SET: &AsciiSet = &UNRESERVED_ENCODE_SET.remove(b'/');

/// Characters that already carry meaning in a link target.
const URI_ENCODE_SET: &AsciiSet = &FALLBACK_ENCODE_SET
    .remove(b'@')
    .remove(b':')
    .remove(b'+')
    .remove(b'?')
    .remove(b'=')
    .remove(b'&')
    .remove(b'(')
    .remove(b')')
    .remove(b'%')
    .remove(b'#')
    .remove(b'*')
    .remove(b',');

// Applied in order, each over the whole string.
const FALLBACK_REVERTS: [(&str, &str); 12] = [
    ("%40", "@"),
    ("%3A", ":"),
    ("%2B", "+"),
    ("%3F", "?"),
    ("%3D", "="),
    ("%26", "&"),
    ("%28", "("),
    ("%29", ")"),
    ("%25", "%"),
    ("%23", "#"),
    ("%2A", "*"),
    ("%2C", ","),
];

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum UriError {
    #[error("uri is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },
}

/// Percent-encode `uri` for use as a link or image target.
///
/// Existing `%XX` sequences are not decoded, so encoded input may be encoded
/// again.
pub fn normalize_uri(uri: &str) -> String {
    percent_encode(uri.as_bytes(), URI_ENCODE_SET).to_string()
}

/// Byte-oriented [`normalize_uri`] that fails instead of falling back.
pub fn try_normalize_uri_bytes(uri: &[u8]) -> Result<String, UriError> {
    let text = std::str::from_utf8(uri).map_err(|err| UriError::InvalidUtf8 {
        valid_up_to: err.valid_up_to(),
    })?;
    Ok(normalize_uri(text))
}

/// Byte-oriented [`normalize_uri`].
///
/// Input that is not valid UTF-8 is encoded with every reserved character
/// escaped, after which the allowlisted triples are turned back into their
/// literal characters. This approximates the primary path but can differ from
/// it, e.g. a literal `%2A` in the input ends up as `*`.
pub fn normalize_uri_bytes(uri: &[u8]) -> String {
    match try_normalize_uri_bytes(uri) {
        Ok(normalized) => normalized,
        Err(err) => {
            tracing::debug!(error = %err, "falling back to reserved-character reverts");
            normalize_uri_fallback(uri)
        }
    }
}

fn normalize_uri_fallback(uri: &[u8]) -> String {
    let mut encoded = percent_encode(uri, FALLBACK_ENCODE_SET).to_string();
    for (triple, literal) in FALLBACK_REVERTS {
        if encoded.contains(triple) {
            encoded = encoded.replace(triple, literal);
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_allowlisted_characters() {
        assert_eq!(
            normalize_uri("http://a.com/a b?x=1&y=2"),
            "http://a.com/a%20b?x=1&y=2"
        );
        assert_eq!(
            normalize_uri("/@:+?=&()%#*,_.-~"),
            "/@:+?=&()%#*,_.-~"
        );
    }

    #[test]
    fn encodes_everything_else() {
        assert_eq!(normalize_uri("a\"b<c>d"), "a%22b%3Cc%3Ed");
        assert_eq!(normalize_uri("[x]\\{y}|^`'!$;"), "%5Bx%5D%5C%7By%7D%7C%5E%60%27%21%24%3B");
        assert_eq!(normalize_uri("ö"), "%C3%B6");
        assert_eq!(normalize_uri("\t\n"), "%09%0A");
        assert_eq!(normalize_uri(""), "");
    }

    #[test]
    fn does_not_decode_existing_escapes() {
        assert_eq!(normalize_uri("a%20b"), "a%20b");
        assert_eq!(normalize_uri("100%"), "100%");
    }

    #[test]
    fn valid_bytes_take_the_primary_path() {
        assert_eq!(
            normalize_uri_bytes("x y/ä?q=1".as_bytes()),
            normalize_uri("x y/ä?q=1")
        );
        assert_eq!(try_normalize_uri_bytes(b"a b"), Ok("a%20b".to_string()));
    }

    #[test]
    fn invalid_bytes_report_position() {
        assert_eq!(
            try_normalize_uri_bytes(b"ab\xffcd"),
            Err(UriError::InvalidUtf8 { valid_up_to: 2 })
        );
    }

    #[test]
    fn invalid_bytes_fall_back() {
        assert_eq!(
            normalize_uri_bytes(b"http://a.com/\xff b?x=1&y=(2)#f*,@+"),
            "http://a.com/%FF%20b?x=1&y=(2)#f*,@+"
        );
        assert_eq!(normalize_uri_bytes(b"\xc3"), "%C3");
    }

    #[test]
    fn fallback_reverts_apply_in_sequence() {
        // `%` is reverted before `*`, so an encoded star in the input collapses.
        assert_eq!(normalize_uri_bytes(b"\xff%2A"), "%FF*");
        assert_eq!(normalize_uri_bytes(b"\xff%3A"), "%FF%3A");
    }
}
