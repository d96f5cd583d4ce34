//! Keys and table headers.
//!
//! Every name on the left of `=` and every `[header]` / `[[header]]` is turned
//! into an [`Identifier`] before the table builder sees it. Validation is a
//! small state machine over the characters of the name: bare segments may use
//! `A-Z a-z 0-9 _ -`, quoted segments may use anything, and segments are joined
//! by dots. Whitespace may surround a segment but never split one.
//!
//! Invalid names are reported here, with the diagnostic matching the kind of
//! name: a key, a table or a table array. A doubled dot (`a..b`) is reported as
//! an empty implicit table whatever the kind.

use crate::de::context::Context;
use crate::de::readers::string::decode_basic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IdentifierKind {
    Key,
    Table,
    TableArray,
}

/// A validated key or header name.
///
/// `name` keeps the canonical spelling used in diagnostics: quotes preserved,
/// whitespace outside quotes removed, brackets kept for headers. `segments`
/// holds the dot-separated parts with quotes stripped and escapes decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Identifier {
    name: String,
    kind: Option<IdentifierKind>,
    segments: Vec<String>,
}

enum Violation {
    Invalid,
    EmptySegment,
}

impl Identifier {
    /// The sentinel for a name that failed validation.
    pub(crate) fn invalid() -> Self {
        Identifier {
            name: String::new(),
            kind: None,
            segments: Vec::new(),
        }
    }

    /// Validates `raw` and builds the identifier, recording a diagnostic and
    /// returning [`Identifier::invalid`] when it is malformed.
    ///
    /// A leading bracket makes `raw` a header; anything else is a key.
    pub(crate) fn from(raw: &str, ctx: &mut Context<'_>) -> Self {
        let raw = raw.trim();
        if raw.starts_with("[[") {
            let inner = raw
                .strip_prefix("[[")
                .and_then(|rest| rest.strip_suffix("]]"));
            Self::build(IdentifierKind::TableArray, raw, inner, ctx)
        } else if raw.starts_with('[') {
            let inner = raw.strip_prefix('[').and_then(|rest| rest.strip_suffix(']'));
            Self::build(IdentifierKind::Table, raw, inner, ctx)
        } else {
            Self::key(raw, ctx)
        }
    }

    /// Validates the left-hand side of `key = value`. Brackets are never
    /// header syntax here and fail like any other non-key character.
    pub(crate) fn key(raw: &str, ctx: &mut Context<'_>) -> Self {
        let raw = raw.trim();
        Self::build(IdentifierKind::Key, raw, Some(raw), ctx)
    }

    fn build(kind: IdentifierKind, raw: &str, inner: Option<&str>, ctx: &mut Context<'_>) -> Self {
        let parsed = match inner {
            Some(inner) => parse_name(inner),
            None => Err(Violation::Invalid),
        };

        match parsed {
            Ok((canonical, segments)) => {
                let name = match kind {
                    IdentifierKind::Key => canonical,
                    IdentifierKind::Table => format!("[{canonical}]"),
                    IdentifierKind::TableArray => format!("[[{canonical}]]"),
                };
                Identifier {
                    name,
                    kind: Some(kind),
                    segments,
                }
            }
            Err(violation) => {
                let line = ctx.line();
                match (violation, kind) {
                    (Violation::EmptySegment, _) => ctx.errors.empty_implicit_table(raw, line),
                    (Violation::Invalid, IdentifierKind::Key) => ctx.errors.invalid_key(raw, line),
                    (Violation::Invalid, IdentifierKind::Table) => {
                        ctx.errors.invalid_table(raw, line);
                    }
                    (Violation::Invalid, IdentifierKind::TableArray) => {
                        ctx.errors.invalid_table_array(raw, line);
                    }
                }
                Identifier::invalid()
            }
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// The name without its header brackets.
    pub(crate) fn bare_name(&self) -> &str {
        match self.kind {
            Some(IdentifierKind::Table) => &self.name[1..self.name.len() - 1],
            Some(IdentifierKind::TableArray) => &self.name[2..self.name.len() - 2],
            _ => &self.name,
        }
    }

    pub(crate) fn segments(&self) -> &[String] {
        &self.segments
    }

    pub(crate) fn kind(&self) -> Option<IdentifierKind> {
        self.kind
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.kind.is_some()
    }
}

pub(crate) fn is_bare_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn parse_name(inner: &str) -> Result<(String, Vec<String>), Violation> {
    let inner = inner.trim();
    if inner.is_empty() || inner.starts_with('.') || inner.ends_with('.') {
        return Err(Violation::Invalid);
    }

    let mut canonical = String::with_capacity(inner.len());
    let mut segments = Vec::new();
    let mut segment = String::new();

    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut char_allowed = true;
    let mut dot_allowed = false;
    let mut quote_allowed = true;
    let mut prev: Option<char> = None;

    for c in inner.chars() {
        if let Some(q) = quote {
            segment.push(c);
            if q == '"' && c == '\\' && !escaped {
                escaped = true;
            } else {
                if c == q && !escaped {
                    quote = None;
                    char_allowed = false;
                    dot_allowed = true;
                    quote_allowed = false;
                }
                escaped = false;
            }
            prev = Some(c);
            continue;
        }

        match c {
            '"' | '\'' => {
                if !quote_allowed {
                    return Err(Violation::Invalid);
                }
                quote = Some(c);
                segment.push(c);
            }
            '.' => {
                if !dot_allowed {
                    return Err(Violation::EmptySegment);
                }
                segments.push(decode_segment(&segment)?);
                canonical.push_str(&segment);
                canonical.push('.');
                segment.clear();
                char_allowed = true;
                dot_allowed = false;
                quote_allowed = true;
            }
            c if c.is_whitespace() => {
                // whitespace after a segment closes it
                if prev.is_some_and(|p| !p.is_whitespace() && p != '.') {
                    char_allowed = false;
                    dot_allowed = true;
                    quote_allowed = false;
                }
            }
            c if is_bare_key_char(c) => {
                if !char_allowed {
                    return Err(Violation::Invalid);
                }
                segment.push(c);
                dot_allowed = true;
                quote_allowed = false;
            }
            _ => return Err(Violation::Invalid),
        }
        prev = Some(c);
    }

    if quote.is_some() || segment.is_empty() {
        return Err(Violation::Invalid);
    }
    segments.push(decode_segment(&segment)?);
    canonical.push_str(&segment);

    Ok((canonical, segments))
}

fn decode_segment(segment: &str) -> Result<String, Violation> {
    let inner = |s: &str| s[1..s.len() - 1].to_string();
    if segment.starts_with('"') {
        decode_basic(&inner(segment)).ok_or(Violation::Invalid)
    } else if segment.starts_with('\'') {
        Ok(inner(segment))
    } else {
        Ok(segment.to_string())
    }
}

/// Consumes a `[header]` or `[[header]]`, returning its raw text including the
/// brackets. Brackets inside quotes do not close the header.
pub(crate) fn scan_header<'a>(ctx: &mut Context<'a>) -> Option<&'a str> {
    let start = ctx.position();
    let is_array = ctx.rest().starts_with("[[");
    ctx.advance_by(if is_array { 2 } else { 1 });

    let mut quote: Option<char> = None;
    let mut escaped = false;
    while let Some(c) = ctx.peek() {
        if c == '\n' {
            break;
        }
        ctx.advance();

        if let Some(q) = quote {
            if q == '"' && c == '\\' && !escaped {
                escaped = true;
            } else {
                if c == q && !escaped {
                    quote = None;
                }
                escaped = false;
            }
            continue;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            ']' if !is_array => return Some(ctx.slice(start, ctx.position())),
            ']' if ctx.peek() == Some(']') => {
                ctx.advance();
                return Some(ctx.slice(start, ctx.position()));
            }
            ']' => break,
            _ => {}
        }
    }

    let text = ctx.line_from(start).trim();
    let line = ctx.line();
    if is_array {
        ctx.errors.invalid_table_array(text, line);
    } else {
        ctx.errors.invalid_table(text, line);
    }
    None
}

/// Consumes a key and the `=` after it, returning the key's raw text.
///
/// Scanning stops without a key at a line break, the end of input, or any of
/// `terminators` outside quotes; an unterminated key is then recorded.
pub(crate) fn scan_key<'a>(ctx: &mut Context<'a>, terminators: &[char]) -> Option<&'a str> {
    let start = ctx.position();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    while let Some(c) = ctx.peek() {
        if c == '\n' {
            break;
        }
        if quote.is_none() {
            if c == '=' {
                let key = ctx.slice(start, ctx.position());
                ctx.advance();
                return Some(key);
            }
            if terminators.contains(&c) {
                break;
            }
        }
        ctx.advance();

        match quote {
            Some(q) => {
                if q == '"' && c == '\\' && !escaped {
                    escaped = true;
                } else {
                    if c == q && !escaped {
                        quote = None;
                    }
                    escaped = false;
                }
            }
            None if c == '"' || c == '\'' => quote = Some(c),
            None => {}
        }
    }

    let text = ctx.slice(start, ctx.position()).trim();
    let line = ctx.line();
    ctx.errors.unterminated_key(text, line);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn identify(raw: &str) -> (Identifier, Vec<ErrorKind>) {
        let mut ctx = Context::new("");
        let id = Identifier::from(raw, &mut ctx);
        let kinds = ctx.errors.kinds().collect();
        (id, kinds)
    }

    #[test]
    fn test_bare_and_dotted_keys() {
        let (id, errors) = identify("  server.port ");
        assert!(errors.is_empty());
        assert_eq!(id.kind(), Some(IdentifierKind::Key));
        assert_eq!(id.name(), "server.port");
        assert_eq!(id.segments(), ["server", "port"]);
    }

    #[test]
    fn test_whitespace_around_segments_is_dropped() {
        let (id, _) = identify("[ a . b ]");
        assert_eq!(id.kind(), Some(IdentifierKind::Table));
        assert_eq!(id.name(), "[a.b]");
        assert_eq!(id.bare_name(), "a.b");
        assert_eq!(id.segments(), ["a", "b"]);
    }

    #[test]
    fn test_quoted_segments_keep_dots_and_spaces() {
        let (id, errors) = identify(r#"[[ fruit."tropical fruit".'x.y' ]]"#);
        assert!(errors.is_empty());
        assert_eq!(id.kind(), Some(IdentifierKind::TableArray));
        assert_eq!(id.bare_name(), r#"fruit."tropical fruit".'x.y'"#);
        assert_eq!(id.segments(), ["fruit", "tropical fruit", "x.y"]);
    }

    #[test]
    fn test_quoted_key_escapes_are_decoded() {
        let (id, errors) = identify(r#""a\"bA""#);
        assert!(errors.is_empty());
        assert_eq!(id.segments(), ["a\"bA"]);
    }

    #[test]
    fn test_invalid_names_by_kind() {
        assert_eq!(identify("a b").1, vec![ErrorKind::InvalidKey]);
        assert_eq!(identify("[]").1, vec![ErrorKind::InvalidTable]);
        assert_eq!(identify("[.a]").1, vec![ErrorKind::InvalidTable]);
        assert_eq!(identify("[a.]").1, vec![ErrorKind::InvalidTable]);
        assert_eq!(identify("[[]]").1, vec![ErrorKind::InvalidTableArray]);
        assert_eq!(identify("[[a]").1, vec![ErrorKind::InvalidTableArray]);
        assert_eq!(identify("a\"b\"").1, vec![ErrorKind::InvalidKey]);
        assert_eq!(identify("\"open").1, vec![ErrorKind::InvalidKey]);
        assert_eq!(identify("a$b").1, vec![ErrorKind::InvalidKey]);
    }

    #[test]
    fn test_bracketed_keys_are_invalid_keys() {
        for raw in ["[a]", "[[a]]", "a]"] {
            let mut ctx = Context::new("");
            let id = Identifier::key(raw, &mut ctx);
            assert!(!id.is_valid(), "{raw}");
            assert_eq!(ctx.errors.kinds().collect::<Vec<_>>(), vec![ErrorKind::InvalidKey], "{raw}");
        }
    }

    #[test]
    fn test_doubled_dot_is_an_empty_implicit_table() {
        for raw in ["a..b", "[a..b]", "[[a. .b]]"] {
            let (id, errors) = identify(raw);
            assert!(!id.is_valid());
            assert_eq!(errors, vec![ErrorKind::EmptyImplicitTable], "{raw}");
        }
    }

    #[test]
    fn test_scan_header_ignores_brackets_in_quotes() {
        let mut ctx = Context::new("[a.\"]\"] # c\n");
        assert_eq!(scan_header(&mut ctx), Some("[a.\"]\"]"));
        assert_eq!(ctx.rest(), " # c\n");

        let mut ctx = Context::new("[[arr]]\n");
        assert_eq!(scan_header(&mut ctx), Some("[[arr]]"));

        let mut ctx = Context::new("[open\nx = 1");
        assert_eq!(scan_header(&mut ctx), None);
        assert_eq!(ctx.errors.kinds().collect::<Vec<_>>(), vec![ErrorKind::InvalidTable]);
    }

    #[test]
    fn test_scan_key_stops_at_equals_outside_quotes() {
        let mut ctx = Context::new("\"a=b\" = 1");
        assert_eq!(scan_key(&mut ctx, &[]), Some("\"a=b\" "));
        assert_eq!(ctx.rest(), " 1");

        let mut ctx = Context::new("no_equals here\n");
        assert_eq!(scan_key(&mut ctx, &[]), None);
        assert_eq!(
            ctx.errors.iter().next().map(|d| d.message().to_string()),
            Some("Key is not followed by an equals sign on line 1: no_equals here".to_string())
        );
    }
}
