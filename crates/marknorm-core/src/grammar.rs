//! Character classes and structural patterns shared by the transforms.
//!
//! The `&str` constants are regex sources so callers can compose them into
//! their own patterns. The compiled forms are built on first use and are
//! read-only afterwards.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// Character reference: `&#xHHHH;`, `&#NNNN;` or `&name;`.
pub const ENTITY: &str = "&(?:#x[a-f0-9]{1,8}|#[0-9]{1,8}|[a-z][a-z0-9]{1,31});";

/// ASCII punctuation that may follow a backslash.
pub const ESCAPABLE: &str = r##"[!"#$%&'()*+,./:;<=>?@\[\\\]^_`{|}~-]"##;

pub const XML_SPECIAL_CLASS: &str = r#"[&<>"]"#;

pub const TAGNAME: &str = "[A-Za-z][A-Za-z0-9-]*";
pub const ATTRIBUTENAME: &str = "[a-zA-Z_:][a-zA-Z0-9:._-]*";
pub const UNQUOTEDVALUE: &str = r#"[^"'=<>`\x00-\x20]+"#;
pub const SINGLEQUOTEDVALUE: &str = "'[^']*'";
pub const DOUBLEQUOTEDVALUE: &str = r#""[^"]*""#;
// Empty comments and comments opening with `>` or `->` are not comments.
pub const HTMLCOMMENT: &str = "<!---->|<!--(?:-?[^>-])(?:-?[^-])*-->";
pub const PROCESSINGINSTRUCTION: &str = r"[<][?].*?[?][>]";
pub const DECLARATION: &str = r"<![A-Z]+\s+[^>]*>";
pub const CDATA: &str = r"<!\[CDATA\[[\s\S]*?\]\]>";

pub fn attribute_value() -> String {
    format!("(?:{UNQUOTEDVALUE}|{SINGLEQUOTEDVALUE}|{DOUBLEQUOTEDVALUE})")
}

pub fn attribute_value_spec() -> String {
    format!(r"(?:\s*=\s*{})", attribute_value())
}

pub fn attribute() -> String {
    format!(r"(?:\s+{ATTRIBUTENAME}{}?)", attribute_value_spec())
}

pub fn open_tag() -> String {
    format!(r"<{TAGNAME}{}*\s*/?>", attribute())
}

pub fn close_tag() -> String {
    format!(r"</{TAGNAME}\s*[>]")
}

pub fn html_tag() -> String {
    format!(
        "(?:{}|{}|{HTMLCOMMENT}|{PROCESSINGINSTRUCTION}|{DECLARATION}|{CDATA})",
        open_tag(),
        close_tag()
    )
}

pub(crate) static BACKSLASH_OR_AMP: Lazy<Regex> = Lazy::new(|| compile(r"[\\&]"));

pub(crate) static ENTITY_OR_ESCAPED_CHAR: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"(?i)\\{ESCAPABLE}|{ENTITY}")));

pub(crate) static XML_SPECIAL: Lazy<Regex> = Lazy::new(|| compile(XML_SPECIAL_CLASS));

pub(crate) static XML_SPECIAL_OR_ENTITY: Lazy<Regex> =
    Lazy::new(|| compile(&format!("(?i){ENTITY}|{XML_SPECIAL_CLASS}")));

static HTML_TAG: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        "(?i)^(?:(?P<open>{})|(?P<close>{})|(?P<comment>{HTMLCOMMENT})|(?P<pi>{PROCESSINGINSTRUCTION})|(?P<decl>{DECLARATION})|(?P<cdata>{CDATA}))",
        open_tag(),
        close_tag()
    ))
});

fn compile(pattern: &str) -> Regex {
    // Every source above is a constant; a failure here is a programming error.
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid grammar pattern {pattern:?}: {err}"))
}

pub fn is_escapable(ch: char) -> bool {
    ch.is_ascii_punctuation()
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HtmlTagKind {
    OpenTag,
    CloseTag,
    Comment,
    ProcessingInstruction,
    Declaration,
    Cdata,
}

/// A tag recognized at the start of some input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HtmlTag<'a> {
    pub kind: HtmlTagKind,
    pub text: &'a str,
}

/// Recognize an HTML tag, comment, processing instruction, declaration or
/// CDATA section at the very start of `input`.
pub fn match_html_tag(input: &str) -> Option<HtmlTag<'_>> {
    let caps = HTML_TAG.captures(input)?;
    let kinds = [
        ("open", HtmlTagKind::OpenTag),
        ("close", HtmlTagKind::CloseTag),
        ("comment", HtmlTagKind::Comment),
        ("pi", HtmlTagKind::ProcessingInstruction),
        ("decl", HtmlTagKind::Declaration),
        ("cdata", HtmlTagKind::Cdata),
    ];
    kinds.into_iter().find_map(|(group, kind)| {
        caps.name(group).map(|m| HtmlTag {
            kind,
            text: m.as_str(),
        })
    })
}

/// Copy `input`, handing every match of `pattern` to `replace` and keeping
/// the text between matches verbatim. Borrows when nothing matches.
pub(crate) fn substitute<'a, F>(pattern: &Regex, input: &'a str, mut replace: F) -> Cow<'a, str>
where
    F: FnMut(&str, &mut String),
{
    let mut matches = pattern.find_iter(input).peekable();
    if matches.peek().is_none() {
        return Cow::Borrowed(input);
    }
    let mut out = String::with_capacity(input.len() + 16);
    let mut last = 0usize;
    for m in matches {
        out.push_str(&input[last..m.start()]);
        replace(m.as_str(), &mut out);
        last = m.end();
    }
    out.push_str(&input[last..]);
    Cow::Owned(out)
}
