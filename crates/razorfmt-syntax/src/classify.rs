//! Token classification.
//!
//! Turns each scanned token into a node shell: something that opens (and may
//! immediately close) a node, something that closes one, or a comment.

use crate::attributes::parse_attributes;
use crate::node::{CodeConstruct, MarkupElement, Node};
use crate::scanner::{Token, TokenKind, tag_name};

/// Elements that never have content, matched case-insensitively.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr", "command", "menuitem", "basefont", "bgsound", "frame", "image",
    "isindex", "nextid",
];

pub fn is_default_void(name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(name))
}

/// What a closing token closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseKind {
    /// `</name>`
    Tag(String),
    /// `}`
    Brace,
}

/// A classified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shell {
    Open { node: Node, self_closing: bool },
    Close(CloseKind),
    Comment(Node),
}

/// Classifies tokens against a void-element table.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    extra_void: Vec<String>,
}

impl Classifier {
    /// A classifier that also treats `extra_void` names as void elements.
    pub fn new(extra_void: &[String]) -> Self {
        Self {
            extra_void: extra_void.to_vec(),
        }
    }

    pub fn is_void(&self, name: &str) -> bool {
        is_default_void(name)
            || self
                .extra_void
                .iter()
                .any(|void| void.eq_ignore_ascii_case(name))
    }

    /// `followed_by_block` tells directives whether a `{` comes next, in which
    /// case they stay open to receive the block.
    pub fn classify(&self, token: &Token<'_>, followed_by_block: bool) -> Shell {
        match token.kind {
            TokenKind::Comment => Shell::Comment(Node::comment(token.text)),
            TokenKind::CloseTag => Shell::Close(CloseKind::Tag(tag_name(token.text).to_string())),
            TokenKind::OpenTag | TokenKind::VoidTag => {
                let element = self.element(token.text, token.kind == TokenKind::VoidTag);
                let self_closing = element.self_closing;
                Shell::Open {
                    node: Node::Markup(element),
                    self_closing,
                }
            }
            TokenKind::BraceOpen => open_code(token.text, false),
            TokenKind::BraceClose => Shell::Close(CloseKind::Brace),
            TokenKind::Expression => open_code(token.text, true),
            TokenKind::Directive | TokenKind::Continuation => {
                open_code(token.text, !followed_by_block)
            }
        }
    }

    fn element(&self, text: &str, void_syntax: bool) -> MarkupElement {
        let name = tag_name(text);
        let inner = text.strip_prefix('<').unwrap_or(text);
        let inner = inner.strip_suffix('>').unwrap_or(inner);
        let inner = inner.strip_suffix('/').unwrap_or(inner);
        let region = inner.get(name.len()..).unwrap_or("");

        let mut element = MarkupElement::new(name);
        element.attributes = parse_attributes(region);
        element.self_closing = void_syntax || element.is_declaration() || self.is_void(name);
        element
    }
}

fn open_code(text: &str, self_closing: bool) -> Shell {
    Shell::Open {
        node: Node::Code(CodeConstruct::new(text, self_closing)),
        self_closing,
    }
}
