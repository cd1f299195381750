//! Placeholder tokenizer shared by the catalog and the renderer.
//!
//! Template sources contain `{{name}}` tokens. The scanner splits a source into
//! text and placeholder segments and records whether each placeholder sits
//! inside a string literal, so the renderer can escape values for that literal.
//! Which literals exist depends on the [`Syntax`] of the source; plain text
//! has none and is always substituted verbatim.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// String literal delimiter enclosing a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Single,
    Double,
    Backtick,
}

impl Quote {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'\'' => Some(Quote::Single),
            b'"' => Some(Quote::Double),
            b'`' => Some(Quote::Backtick),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Quote::Single => '\'',
            Quote::Double => '"',
            Quote::Backtick => '`',
        }
    }
}

/// Lexical rules used to find string literals around placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// JavaScript and TypeScript: `'`, `"` and `` ` `` literals, `//` and `/* */` comments
    Script,
    /// JSON: `"` literals only
    Json,
    /// Anything else. No literal tracking.
    Plain,
}

impl Syntax {
    /// Picks the syntax from the extension of `path`.
    pub fn from_path(path: &str) -> Self {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("ts" | "tsx" | "mts" | "cts" | "js" | "jsx" | "mjs" | "cjs") => Syntax::Script,
            Some("json") => Syntax::Json,
            _ => Syntax::Plain,
        }
    }

    fn opens_literal(self, b: u8) -> Option<Quote> {
        match self {
            Syntax::Script => Quote::from_byte(b),
            Syntax::Json if b == b'"' => Some(Quote::Double),
            Syntax::Json | Syntax::Plain => None,
        }
    }

    fn has_comments(self) -> bool {
        self == Syntax::Script
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Placeholder { name: &'a str, quote: Option<Quote>, line: usize },
}

#[derive(Clone, Copy)]
enum State {
    Code,
    Literal(Quote),
    LineComment,
    BlockComment,
}

/// Splits `source` into text and placeholder segments, tracking literals
/// according to `syntax`.
///
/// `template` only names the source in error messages.
///
/// # Errors
/// * `Error::MalformedPlaceholder` if a `{{` does not start a valid token
pub fn scan<'a>(source: &'a str, template: &str, syntax: Syntax) -> Result<Vec<Segment<'a>>> {
    let bytes = source.as_bytes();
    let mut segments = Vec::new();
    let mut state = State::Code;
    let mut text_start = 0;
    let mut line = 1;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();

        if b == b'{' && next == Some(b'{') {
            let (whole, name) = TOKEN_RE
                .captures(&source[i..])
                .and_then(|caps| Some((caps.get(0)?, caps.get(1)?)))
                .ok_or_else(|| Error::MalformedPlaceholder {
                    template: template.to_string(),
                    line,
                })?;

            if text_start < i {
                segments.push(Segment::Text(&source[text_start..i]));
            }
            let quote = match state {
                State::Literal(quote) => Some(quote),
                _ => None,
            };
            segments.push(Segment::Placeholder { name: name.as_str(), quote, line });

            line += whole.as_str().matches('\n').count();
            i += whole.end();
            text_start = i;
            continue;
        }

        match state {
            State::Code => match (b, next) {
                (b'/', Some(b'/')) if syntax.has_comments() => {
                    state = State::LineComment;
                    i += 1;
                }
                (b'/', Some(b'*')) if syntax.has_comments() => {
                    state = State::BlockComment;
                    i += 1;
                }
                _ => {
                    if let Some(quote) = syntax.opens_literal(b) {
                        state = State::Literal(quote);
                    }
                }
            },
            State::Literal(quote) => {
                if b == b'\\' {
                    if next == Some(b'\n') {
                        line += 1;
                    }
                    i += 2;
                    continue;
                }
                if b == quote.as_char() as u8 {
                    state = State::Code;
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Code;
                }
            }
            State::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    state = State::Code;
                    i += 1;
                }
            }
        }

        if b == b'\n' {
            line += 1;
        }
        i += 1;
    }

    if text_start < bytes.len() {
        segments.push(Segment::Text(&source[text_start..]));
    }

    Ok(segments)
}

/// Returns the distinct placeholder names of `source` in order of first appearance.
pub fn placeholder_names(source: &str, template: &str, syntax: Syntax) -> Result<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    for segment in scan(source, template, syntax)? {
        if let Segment::Placeholder { name, .. } = segment {
            if !names.iter().any(|known| known == name) {
                names.push(name.to_string());
            }
        }
    }
    Ok(names)
}

/// Escapes `value` so it can be spliced into a literal delimited by `quote`.
pub fn escape_for(quote: Quote, value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '$' if quote == Quote::Backtick && chars.peek() == Some(&'{') => out.push_str("\\$"),
            c if c == quote.as_char() => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
