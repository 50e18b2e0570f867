use std::borrow::Cow;

use crate::entity::{EntityDecoder, HtmlEntityDecoder};
use crate::grammar::{BACKSLASH_OR_AMP, ENTITY_OR_ESCAPED_CHAR, substitute};

/// Replace backslash escapes and character references with the literal
/// characters they stand for, using the HTML5 entity table.
///
/// Unknown references and backslashes before non-punctuation stay as they are.
pub fn unescape_string(input: &str) -> Cow<'_, str> {
    Unescaper::new(HtmlEntityDecoder).unescape(input)
}

#[derive(Clone, Debug, Default)]
pub struct Unescaper<D = HtmlEntityDecoder> {
    decoder: D,
}

impl<D: EntityDecoder> Unescaper<D> {
    pub fn new(decoder: D) -> Self {
        Self { decoder }
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    pub fn unescape<'a>(&self, input: &'a str) -> Cow<'a, str> {
        if !BACKSLASH_OR_AMP.is_match(input) {
            return Cow::Borrowed(input);
        }
        self.unescape_scan(input)
    }

    /// Same as [`Unescaper::unescape`] but always runs the full scan.
    pub fn unescape_scan<'a>(&self, input: &'a str) -> Cow<'a, str> {
        substitute(&ENTITY_OR_ESCAPED_CHAR, input, |token, out| {
            match token.strip_prefix('\\') {
                Some(escaped) => out.push_str(escaped),
                None => out.push_str(&self.decoder.decode(token)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shouting;

    impl EntityDecoder for Shouting {
        fn decode<'a>(&self, reference: &'a str) -> Cow<'a, str> {
            Cow::Owned(reference.to_uppercase())
        }
    }

    #[test]
    fn removes_backslash_before_punctuation() {
        assert_eq!(unescape_string("\\*hello\\*"), "*hello*");
        assert_eq!(unescape_string("\\\\"), "\\");
        assert_eq!(unescape_string("\\[x\\]"), "[x]");
    }

    #[test]
    fn keeps_backslash_before_other_chars() {
        assert_eq!(unescape_string("\\a\\ \\é"), "\\a\\ \\é");
        assert_eq!(unescape_string("trailing\\"), "trailing\\");
    }

    #[test]
    fn decodes_references() {
        assert_eq!(unescape_string("&#65;"), "A");
        assert_eq!(unescape_string("&#x41;"), "A");
        assert_eq!(unescape_string("a &amp; b"), "a & b");
        assert_eq!(unescape_string("&notarealentity;"), "&notarealentity;");
    }

    #[test]
    fn multi_code_point_references_decode_in_full() {
        assert_eq!(unescape_string("&fjlig;"), "fj");
        assert_eq!(unescape_string("&ngE;"), "\u{2267}\u{0338}");
        assert_eq!(unescape_string("x&ThickSpace;y"), "x\u{205F}\u{200A}y");
    }

    #[test]
    fn escaped_ampersand_does_not_start_a_reference() {
        assert_eq!(unescape_string("\\&amp;"), "&amp;");
    }

    #[test]
    fn malformed_references_are_plain_text() {
        assert_eq!(unescape_string("& amp;"), "& amp;");
        assert_eq!(unescape_string("&#123456789;"), "&#123456789;");
        assert_eq!(unescape_string("&amp"), "&amp");
    }

    #[test]
    fn fast_path_borrows() {
        assert!(matches!(unescape_string("plain text"), Cow::Borrowed(_)));
        assert!(matches!(unescape_string(""), Cow::Borrowed("")));
    }

    #[test]
    fn uses_injected_decoder_for_references_only() {
        let unescaper = Unescaper::new(Shouting);
        assert_eq!(unescaper.unescape("\\* &foo; &#x61;"), "* &FOO; &#X61;");
    }
}
