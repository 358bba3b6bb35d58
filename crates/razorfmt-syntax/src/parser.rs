//! Parser driver: extraction, scanning, classification and tree building.

use crate::builder::TreeBuilder;
use crate::classify::{Classifier, CloseKind, Shell};
use crate::extract::extract_code_section;
use crate::node::Node;
use crate::scanner::{Scanner, TokenKind};

/// Parser settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Element names treated as void in addition to the built-in table.
    pub void_elements: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Parser {
    classifier: Classifier,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: &ParseOptions) -> Self {
        Self {
            classifier: Classifier::new(&options.void_elements),
        }
    }

    /// Parses a template into a list of root nodes. Never fails.
    pub fn parse(&self, text: &str) -> Vec<Node> {
        let (parsable, code_section) = extract_code_section(text);

        let mut nodes = self.build(parsable).finish();
        if nodes.is_empty() && !parsable.is_empty() {
            log::debug!("no structure found, keeping input as text");
            let content = if parsable.trim().is_empty() { " " } else { parsable };
            nodes.push(Node::text(content));
        }
        if let Some(section) = code_section {
            nodes.push(Node::text(section));
        }
        nodes
    }

    /// Runs scanner, classifier and builder over text without a code
    /// section, leaving any unclosed nodes open.
    fn build(&self, parsable: &str) -> TreeBuilder {
        let mut builder = TreeBuilder::new();
        let mut tokens = Scanner::new(parsable).peekable();
        let mut cursor = 0;
        let mut prev_kind = None;

        while let Some(token) = tokens.next() {
            let between_expressions =
                prev_kind == Some(TokenKind::Expression) && token.kind == TokenKind::Expression;
            builder.gap(&parsable[cursor..token.span.start], between_expressions);

            let followed_by_block = tokens.peek().is_some_and(|next| {
                next.kind == TokenKind::BraceOpen
                    && parsable[token.span.end..next.span.start].trim().is_empty()
            });

            match self.classifier.classify(&token, followed_by_block) {
                Shell::Open { node, self_closing } => builder.open(node, self_closing),
                Shell::Close(CloseKind::Tag(name)) => builder.close_tag(&name),
                Shell::Close(CloseKind::Brace) => builder.close_brace(),
                Shell::Comment(node) => builder.open(node, true),
            }

            cursor = token.span.end;
            prev_kind = Some(token.kind);
        }
        builder.gap(&parsable[cursor..], false);
        builder
    }
}

/// Parses `text` with default options.
pub fn parse(text: &str) -> Vec<Node> {
    Parser::new().parse(text)
}
