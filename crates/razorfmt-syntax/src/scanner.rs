//! # Scanner - Single-Pass Token Recognition
//!
//! Razor mixes three grammars that share lexical shapes: markup tags, C#
//! braces and `@` transitions, and two comment syntaxes. The scanner walks the
//! text once and, at every candidate offset, tries a fixed table of rule
//! families in precedence order:
//!
//! ```text
//! Comment  >  Tag  >  Code
//! <!-- --> / @* *@    <p>, </p>, <br/>    {, }, @{, @if (..), @Model.Name, else
//! ```
//!
//! The first rule that matches wins, so `<!-- <p> -->` is one comment and
//! `<p title="{x}">` is one tag. Everything between tokens is text; the
//! scanner does not emit text tokens, callers slice the gaps themselves.
//!
//! ## Text that looks like code
//!
//! - `@(expr)` is an explicit expression and stays inline text.
//! - `@@` is an escaped `@`; `@:` starts a text line.
//! - An `@` right after a letter or digit is part of an e-mail address.
//!
//! ## Lexical modes
//!
//! The scanner keeps a small mode stack (code vs. markup) purely to avoid
//! misreading C#: inside a code block, `List<string>` is not a tag and
//! `"}"` is a string literal, not a closing brace. The content of `<script>`
//! and `<style>` is raw text and produces no tokens.

use std::sync::OnceLock;

use regex::Regex;

use crate::classify::is_default_void;
use crate::cursor::Cursor;
use crate::node::{is_continuation_keyword, is_directive_keyword, is_raw_text_element, leading_word};
use crate::span::Span;

/// The lexical class of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<!-- ... -->` or `@* ... *@`
    Comment,
    /// `<name attrs>`
    OpenTag,
    /// `</name>`
    CloseTag,
    /// `<name attrs/>` or a `<!...>` declaration
    VoidTag,
    /// `{` or `@{`
    BraceOpen,
    /// `}`
    BraceClose,
    /// `@` + directive keyword, up to the opening brace or end of line
    Directive,
    /// `@` + identifier chain
    Expression,
    /// Bare `else`/`catch`/`finally`/`while` after a closing brace
    Continuation,
}

/// A scanned token with its kind, span and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub span: Span,
    pub text: &'a str,
}

/// Rule families tried at a candidate offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Comment,
    Tag,
    Code,
}

/// Match precedence at a single offset, highest first.
pub const PRECEDENCE: [Rule; 3] = [Rule::Comment, Rule::Tag, Rule::Code];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Code,
    Markup(String),
}

fn tag_regex() -> &'static Regex {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    TAG_REGEX.get_or_init(|| {
        Regex::new(r#"^(?:</?[A-Za-z][^\s/<>"']*(?:"[^"]*"|'[^']*'|[^'"<>])*>|<![A-Za-z][^<>]*>)"#)
            .expect("Invalid tag regex")
    })
}

/// Iterator over the tokens of a template (without its code section).
pub struct Scanner<'a> {
    cur: Cursor<'a>,
    prev: Option<(TokenKind, usize)>,
    modes: Vec<Mode>,
    raw_text: Option<String>,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            cur: Cursor::new(text),
            prev: None,
            modes: Vec::new(),
            raw_text: None,
        }
    }

    fn in_code(&self) -> bool {
        matches!(self.modes.last(), Some(Mode::Code))
    }

    /// Tries one rule family at the cursor, returning the token kind and its
    /// end offset.
    fn try_rule(&self, rule: Rule) -> Option<(TokenKind, usize)> {
        match rule {
            Rule::Comment => self.comment(),
            Rule::Tag => self.tag(),
            Rule::Code => self.code(),
        }
    }

    fn comment(&self) -> Option<(TokenKind, usize)> {
        let (open, close) = if self.cur.starts_with(b"<!--") {
            ("<!--", "-->")
        } else if self.cur.starts_with(b"@*") {
            ("@*", "*@")
        } else {
            return None;
        };
        // An unterminated opener is plain text.
        let body = self.cur.pos() + open.len();
        let rel = self.cur.s[body..].find(close)?;
        Some((TokenKind::Comment, body + rel + close.len()))
    }

    fn tag(&self) -> Option<(TokenKind, usize)> {
        if self.cur.peek() != Some(b'<') {
            return None;
        }
        if self.in_code() && self.cur.prev_char().is_some_and(is_ident_char) {
            return None;
        }
        let m = tag_regex().find(self.cur.rest())?;
        let text = m.as_str();
        let kind = if text.starts_with("</") {
            TokenKind::CloseTag
        } else if text.starts_with("<!") || text.ends_with("/>") {
            TokenKind::VoidTag
        } else {
            TokenKind::OpenTag
        };
        Some((kind, self.cur.pos() + m.end()))
    }

    fn code(&self) -> Option<(TokenKind, usize)> {
        let pos = self.cur.pos();
        match self.cur.peek()? {
            b'{' => Some((TokenKind::BraceOpen, pos + 1)),
            b'}' => Some((TokenKind::BraceClose, pos + 1)),
            b'@' => self.transition(),
            _ => self.continuation(),
        }
    }

    fn transition(&self) -> Option<(TokenKind, usize)> {
        if self.cur.prev_char().is_some_and(|c| c.is_alphanumeric()) {
            return None;
        }
        let pos = self.cur.pos();
        if self.cur.peek_nth(1) == Some(b'{') {
            return Some((TokenKind::BraceOpen, pos + 2));
        }
        let s = self.cur.s;
        let word = leading_word(&s[pos + 1..]);
        if !word.starts_with(is_ident_start) {
            return None;
        }
        let after = pos + 1 + word.len();
        if is_directive_keyword(word) {
            Some((TokenKind::Directive, directive_end(s, after)))
        } else {
            Some((TokenKind::Expression, expression_end(s, after, word == "await")))
        }
    }

    fn continuation(&self) -> Option<(TokenKind, usize)> {
        let Some((TokenKind::BraceClose, prev_end)) = self.prev else {
            return None;
        };
        let pos = self.cur.pos();
        if !self.cur.s[prev_end..pos].trim().is_empty() {
            return None;
        }
        let word = leading_word(self.cur.rest());
        if !is_continuation_keyword(word) {
            return None;
        }
        let is_while = word.eq_ignore_ascii_case("while");
        Some((
            TokenKind::Continuation,
            continuation_end(self.cur.s, pos + word.len(), is_while),
        ))
    }

    /// Advances over text that matched no rule.
    fn skip_text(&mut self) {
        let pos = self.cur.pos();
        let s = self.cur.s;
        match self.cur.peek() {
            Some(b'@') if self.cur.peek_nth(1) == Some(b'@') => self.cur.bump_n(2),
            Some(b'@') if self.cur.peek_nth(1) == Some(b'(') => {
                match skip_balanced(s, pos + 1) {
                    Some(end) => self.cur.seek(end),
                    None => self.cur.bump_n(1),
                }
            }
            Some(b'"' | b'\'') if self.in_code() => match skip_literal(s, pos) {
                Some(end) => self.cur.seek(end),
                None => self.cur.bump_n(1),
            },
            Some(b'/') if self.in_code() => match skip_code_comment(s, pos) {
                Some(end) => self.cur.seek(end),
                None => self.cur.bump_n(1),
            },
            _ => {
                self.cur.bump();
            }
        }
    }

    /// Jumps over raw text up to the matching close tag.
    fn skip_raw_text(&mut self, name: &str) {
        let needle = format!("</{}", name.to_ascii_lowercase());
        let rest = self.cur.rest().to_ascii_lowercase();
        match rest.find(&needle) {
            Some(rel) => self.cur.seek(self.cur.pos() + rel),
            None => self.cur.seek(self.cur.s.len()),
        }
    }

    fn track_modes(&mut self, token: &Token<'_>) {
        match token.kind {
            TokenKind::BraceOpen => self.modes.push(Mode::Code),
            TokenKind::BraceClose => {
                if let Some(at) = self.modes.iter().rposition(|m| *m == Mode::Code) {
                    self.modes.truncate(at);
                }
            }
            TokenKind::OpenTag => {
                let name = tag_name(token.text);
                if is_raw_text_element(name) {
                    self.raw_text = Some(name.to_string());
                } else if !is_default_void(name) {
                    self.modes.push(Mode::Markup(name.to_ascii_lowercase()));
                }
            }
            TokenKind::CloseTag => {
                let name = Mode::Markup(tag_name(token.text).to_ascii_lowercase());
                if let Some(at) = self.modes.iter().rposition(|m| *m == name) {
                    self.modes.truncate(at);
                }
            }
            _ => {}
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if let Some(name) = self.raw_text.take() {
            self.skip_raw_text(&name);
        }
        while !self.cur.eof() {
            let matched = PRECEDENCE.iter().find_map(|&rule| self.try_rule(rule));
            if let Some((kind, end)) = matched {
                let s = self.cur.s;
                let start = self.cur.pos();
                self.cur.seek(end);
                let token = Token {
                    kind,
                    span: Span::new(start, end),
                    text: &s[start..end],
                };
                log::trace!("scanned {:?} {:?}", token.kind, token.text);
                self.track_modes(&token);
                self.prev = Some((kind, end));
                return Some(token);
            }
            self.skip_text();
        }
        None
    }
}

/// The element name of a tag token (`div` for `<div class="x">`).
pub fn tag_name(text: &str) -> &str {
    let inner = text.trim_start_matches('<');
    let inner = inner.strip_prefix('/').unwrap_or(inner);
    let end = inner
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(inner.len());
    &inner[..end]
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// End of a directive header: the first brace outside parentheses, a close
/// tag, or the end of the line. Trailing whitespace is excluded.
fn directive_end(s: &str, from: usize) -> usize {
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b'"' | b'\'' => {
                if let Some(end) = skip_literal(s, i) {
                    i = end;
                    continue;
                }
            }
            b'{' | b'}' | b'\n' if depth == 0 => break,
            b'<' if depth == 0 && bytes.get(i + 1) == Some(&b'/') => break,
            _ => {}
        }
        i += 1;
    }
    if i >= bytes.len() && depth > 0 {
        // Unbalanced parentheses: only claim the first line.
        i = s[from..].find('\n').map_or(s.len(), |rel| from + rel);
    }
    trim_end_from(s, from, i)
}

/// End of a bare `else`/`catch`/`finally`/`while` header. Unlike a directive
/// header it also stops in front of markup, and a `while` ends after its `;`
/// (the tail of `do { } while (x);`).
fn continuation_end(s: &str, from: usize, is_while: bool) -> usize {
    let header = directive_end(s, from);
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    let mut i = from;
    while i < header {
        match bytes[i] {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b'"' | b'\'' => {
                if let Some(end) = skip_literal(s, i) {
                    i = end;
                    continue;
                }
            }
            b';' if depth == 0 && is_while => return i + 1,
            b'<' if depth == 0 && starts_markup(bytes.get(i + 1).copied()) => {
                return trim_end_from(s, from, i);
            }
            _ => {}
        }
        i += 1;
    }
    header
}

fn starts_markup(next: Option<u8>) -> bool {
    next.is_some_and(|b| b.is_ascii_alphabetic() || b == b'/' || b == b'!')
}

fn trim_end_from(s: &str, from: usize, mut end: usize) -> usize {
    let bytes = s.as_bytes();
    while end > from && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    end
}

/// Skips a C# `//` line comment (up to, not including, the line break) or a
/// closed `/* */` block comment.
fn skip_code_comment(s: &str, start: usize) -> Option<usize> {
    let rest = &s[start..];
    if rest.starts_with("//") {
        Some(rest.find('\n').map_or(s.len(), |rel| start + rel))
    } else if rest.starts_with("/*") {
        rest[2..].find("*/").map(|rel| start + 2 + rel + 2)
    } else {
        None
    }
}

/// End of an implicit expression: `.member`, `(args)` and `[index]` chains.
fn expression_end(s: &str, from: usize, is_await: bool) -> usize {
    let bytes = s.as_bytes();
    let mut i = from;
    if is_await {
        let ws = s[i..].len() - s[i..].trim_start_matches([' ', '\t']).len();
        let word = leading_word(&s[i + ws..]);
        if ws > 0 && word.starts_with(is_ident_start) {
            i += ws + word.len();
        }
    }
    loop {
        match bytes.get(i) {
            Some(b'.') if s[i + 1..].starts_with(is_ident_start) => {
                i += 1 + leading_word(&s[i + 1..]).len();
            }
            Some(b'(' | b'[') => match skip_balanced(s, i) {
                Some(end) => i = end,
                None => break,
            },
            _ => break,
        }
    }
    i
}

/// Skips a balanced `(...)` or `[...]` group starting at `open`, honouring
/// string literals. Returns the offset just past the closing bracket.
fn skip_balanced(s: &str, open: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let (open_byte, close_byte) = match bytes.get(open)? {
        b'(' => (b'(', b')'),
        b'[' => (b'[', b']'),
        _ => return None,
    };
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b if b == open_byte => depth += 1,
            b if b == close_byte => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            b'"' | b'\'' => {
                if let Some(end) = skip_literal(s, i) {
                    i = end;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Skips a quoted literal starting at `quote`. Literals end on the same line;
/// an unterminated quote returns `None`.
fn skip_literal(s: &str, quote: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let q = *bytes.get(quote)?;
    let mut i = quote + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return None,
            b if b == q => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}
