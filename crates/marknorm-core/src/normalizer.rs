use std::borrow::Cow;

use crate::entity::{EntityDecoder, HtmlEntityDecoder};
use crate::escape::escape_xml;
use crate::unescape::Unescaper;
use crate::uri::{normalize_uri, normalize_uri_bytes};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NormalizeOptions {
    /// Leave character references in escaped output untouched.
    pub preserve_entities: bool,
}

/// The three transforms bundled with one decoder and one set of options, for
/// callers that thread them through a whole render.
#[derive(Clone, Debug, Default)]
pub struct Normalizer<D = HtmlEntityDecoder> {
    unescaper: Unescaper<D>,
    options: NormalizeOptions,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: EntityDecoder> Normalizer<D> {
    pub fn with_decoder<E: EntityDecoder>(self, decoder: E) -> Normalizer<E> {
        Normalizer {
            unescaper: Unescaper::new(decoder),
            options: self.options,
        }
    }

    pub fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    pub fn decoder(&self) -> &D {
        self.unescaper.decoder()
    }

    pub fn unescape<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.unescaper.unescape(text)
    }

    pub fn normalize_uri(&self, uri: &str) -> String {
        normalize_uri(uri)
    }

    pub fn normalize_uri_bytes(&self, uri: &[u8]) -> String {
        normalize_uri_bytes(uri)
    }

    pub fn escape<'a>(&self, text: &'a str) -> Cow<'a, str> {
        escape_xml(text, self.options.preserve_entities)
    }

    pub fn escape_output<'a>(&self, text: Option<&'a str>) -> Cow<'a, str> {
        match text {
            Some(text) => self.escape(text),
            None => Cow::Borrowed(""),
        }
    }

    /// Raw link destination as written in the source to an encoded target.
    pub fn link_destination(&self, raw: &str) -> String {
        normalize_uri(&self.unescape(raw))
    }

    /// Raw title or attribute text to an escaped attribute value.
    pub fn attribute_value(&self, raw: &str) -> String {
        let unescaped = self.unescape(raw);
        self.escape(&unescaped).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoNames;

    impl EntityDecoder for NoNames {
        fn decode<'a>(&self, reference: &'a str) -> Cow<'a, str> {
            Cow::Borrowed(reference)
        }
    }

    #[test]
    fn defaults_do_not_preserve_entities() {
        let normalizer = Normalizer::new();
        assert!(!normalizer.options().preserve_entities);
        assert_eq!(normalizer.escape("&amp;"), "&amp;amp;");
    }

    #[test]
    fn options_control_escaping() {
        let normalizer = Normalizer::new().with_options(NormalizeOptions {
            preserve_entities: true,
        });
        assert_eq!(normalizer.escape("&amp;&"), "&amp;&amp;");
        assert_eq!(normalizer.escape_output(None), "");
    }

    #[test]
    fn link_destination_unescapes_then_encodes() {
        let normalizer = Normalizer::new();
        assert_eq!(
            normalizer.link_destination("/url\\*with&#32;space?a=b&amp;c=d"),
            "/url*with%20space?a=b&c=d"
        );
        assert_eq!(normalizer.normalize_uri_bytes(b"a\xffb"), "a%FFb");
    }

    #[test]
    fn attribute_value_unescapes_then_escapes() {
        let normalizer = Normalizer::new();
        assert_eq!(
            normalizer.attribute_value("say \\\"hi\\\" &amp; &lt;go&gt;"),
            "say &quot;hi&quot; &amp; &lt;go&gt;"
        );
    }

    #[test]
    fn swapping_the_decoder_keeps_options() {
        let normalizer = Normalizer::new()
            .with_options(NormalizeOptions {
                preserve_entities: true,
            })
            .with_decoder(NoNames);
        assert!(normalizer.options().preserve_entities);
        assert_eq!(normalizer.unescape("\\# &amp;"), "# &amp;");
    }
}
