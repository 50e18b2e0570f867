mod entity;
mod escape;
pub mod grammar;
mod normalizer;
mod unescape;
mod uri;

pub use entity::{EntityDecoder, HtmlEntityDecoder};
pub use escape::{escape_output, escape_xml};
pub use grammar::{HtmlTag, HtmlTagKind, is_escapable, match_html_tag};
pub use normalizer::{NormalizeOptions, Normalizer};
pub use unescape::{Unescaper, unescape_string};
pub use uri::{UriError, normalize_uri, normalize_uri_bytes, try_normalize_uri_bytes};
