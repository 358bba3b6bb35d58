//! # Attribute Lexer
//!
//! Splits the attribute region of a tag (everything between the element name
//! and the closing `>`) into an ordered [`Attributes`] map using a [Logos]
//! lexer.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ```text
//! <input  type="text"  disabled  @bind-Value:event="oninput"  data-n=3 />
//!        |----------| |--------| |---------------------------| |------|
//!         name=value     bare         Razor-flavoured name       unquoted
//! ```
//!
//! Names are whatever runs up to `=` or whitespace, so Razor's `@bind-Value`
//! or `@onclick:preventDefault` come through unchanged. Values lose their
//! surrounding quotes; the printer decides which quotes to put back.
//!
//! A quoted literal with no name in front (the public identifier in a
//! `<!DOCTYPE>`) is kept as a bare attribute whose name is the literal itself.

use logos::Logos;

use crate::node::Attributes;

/// Token kinds inside a tag's attribute region.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrToken {
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[token("=")]
    Eq,

    #[regex(r#""[^"]*""#)]
    DoubleQuoted,

    #[regex(r"'[^']*'")]
    SingleQuoted,

    #[token("/")]
    Slash,

    /// Anything else: names and unquoted values
    #[regex(r#"[^ \t\r\n\f"'=/]+"#)]
    Word,
}

impl AttrToken {
    fn is_quoted(self) -> bool {
        matches!(self, AttrToken::DoubleQuoted | AttrToken::SingleQuoted)
    }
}

fn lex(source: &str) -> Vec<(AttrToken, &str)> {
    let mut lexer = AttrToken::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        // An unterminated quote is a lexer error; keep it as a word character
        let kind = result.unwrap_or(AttrToken::Word);
        tokens.push((kind, lexer.slice()));
    }
    tokens
}

/// Parses an attribute region into ordered name/value pairs.
pub fn parse_attributes(source: &str) -> Attributes {
    let tokens = lex(source);
    let mut attributes = Attributes::new();
    let mut i = 0;

    while i < tokens.len() {
        let (kind, text) = tokens[i];
        match kind {
            AttrToken::Whitespace | AttrToken::Eq | AttrToken::Slash => i += 1,
            AttrToken::DoubleQuoted | AttrToken::SingleQuoted => {
                attributes.insert(text, "");
                i += 1;
            }
            AttrToken::Word => {
                let mut name = String::new();
                while let Some(&(kind, text)) = tokens.get(i) {
                    if matches!(kind, AttrToken::Whitespace | AttrToken::Eq) {
                        break;
                    }
                    name.push_str(text);
                    i += 1;
                }

                let mut j = skip_whitespace(&tokens, i);
                if tokens.get(j).map(|t| t.0) != Some(AttrToken::Eq) {
                    attributes.insert(name, "");
                    continue;
                }
                j = skip_whitespace(&tokens, j + 1);

                let start = j;
                while tokens
                    .get(j)
                    .is_some_and(|t| t.0 != AttrToken::Whitespace)
                {
                    j += 1;
                }
                let value = match &tokens[start..j] {
                    [(kind, text)] if kind.is_quoted() => text[1..text.len() - 1].to_string(),
                    parts => parts.iter().map(|(_, text)| *text).collect(),
                };
                attributes.insert(name, value);
                i = j;
            }
        }
    }

    attributes
}

fn skip_whitespace(tokens: &[(AttrToken, &str)], mut i: usize) -> usize {
    while tokens.get(i).is_some_and(|t| t.0 == AttrToken::Whitespace) {
        i += 1;
    }
    i
}
