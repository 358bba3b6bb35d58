//! # Node Model
//!
//! The parser produces a forest of [`Node`]s. Each node is one of four kinds:
//!
//! - [`MarkupElement`] - an HTML-style tag with ordered attributes
//! - [`CodeConstruct`] - a brace block, a directive, or an inline expression
//! - `Text` - literal content between tokens
//! - `Comment` - a markup (`<!-- -->`) or template (`@* *@`) comment
//!
//! Self-closing nodes never carry children. The builder enforces this by
//! never pushing a self-closing node onto the parse stack.

/// Razor directives and control-flow keywords that follow the `@` prefix.
///
/// These start their own line when formatted, unlike implicit expressions
/// such as `@Model.Title`.
pub const DIRECTIVE_KEYWORDS: &[&str] = &[
    "addTagHelper",
    "attribute",
    "do",
    "for",
    "foreach",
    "functions",
    "helper",
    "if",
    "implements",
    "inherits",
    "inject",
    "layout",
    "lock",
    "model",
    "namespace",
    "page",
    "preservewhitespace",
    "removeTagHelper",
    "rendermode",
    "section",
    "switch",
    "tagHelperPrefix",
    "try",
    "typeparam",
    "using",
    "while",
];

/// Bare keywords that continue a construct after its closing brace
/// (`} else {`, `} catch (e) {`, `} while (x);`). Matched case-insensitively.
pub const CONTINUATION_KEYWORDS: &[&str] = &["else", "catch", "finally", "while"];

/// Elements whose content is scanned as raw text.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// A parsed template node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Markup(MarkupElement),
    Code(CodeConstruct),
    Text { content: String },
    Comment { content: String },
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Node::Comment {
            content: content.into(),
        }
    }

    /// Child nodes; always empty for text and comments.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Markup(element) => &element.children,
            Node::Code(code) => &code.children,
            Node::Text { .. } | Node::Comment { .. } => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Markup(element) => Some(&mut element.children),
            Node::Code(code) => Some(&mut code.children),
            Node::Text { .. } | Node::Comment { .. } => None,
        }
    }

    pub fn is_self_closing(&self) -> bool {
        match self {
            Node::Markup(element) => element.self_closing,
            Node::Code(code) => code.self_closing,
            Node::Text { .. } | Node::Comment { .. } => false,
        }
    }

    /// Returns the text content if this is a `Text` node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text { content } => Some(content),
            _ => None,
        }
    }
}

/// An HTML-style element: `<name attr="value">children</name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupElement {
    pub name: String,
    pub attributes: Attributes,
    pub children: Vec<Node>,
    pub self_closing: bool,
}

impl MarkupElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }

    /// `<!DOCTYPE html>` and friends.
    pub fn is_declaration(&self) -> bool {
        self.name.starts_with('!')
    }

    /// `<script>` and `<style>` keep their content as a single raw text child.
    pub fn is_raw_text(&self) -> bool {
        is_raw_text_element(&self.name)
    }
}

pub fn is_raw_text_element(name: &str) -> bool {
    RAW_TEXT_ELEMENTS
        .iter()
        .any(|raw| raw.eq_ignore_ascii_case(name))
}

/// Embedded code: `@{ ... }`, `{ ... }`, `@if (x)`, `else`, `@Model.Name`.
///
/// The `keyword` holds the token text as scanned (for blocks, the opening
/// brace; for directives, everything up to the opening brace).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeConstruct {
    pub keyword: String,
    pub children: Vec<Node>,
    pub self_closing: bool,
}

/// What a [`CodeConstruct`] represents, derived from its keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    /// `@{ ... }` or a nested `{ ... }`.
    Block,
    /// `@if (x)`, `@page "/"`, `else`, ... Always starts its own line.
    Directive,
    /// `@Model.Name`, `@item.Format(x)`. Stays inline with surrounding text.
    Expression,
}

impl CodeConstruct {
    pub fn new(keyword: impl Into<String>, self_closing: bool) -> Self {
        Self {
            keyword: keyword.into(),
            children: Vec::new(),
            self_closing,
        }
    }

    pub fn kind(&self) -> CodeKind {
        let keyword = self.keyword.trim();
        if keyword == "{" || keyword == "@{" {
            return CodeKind::Block;
        }
        match keyword.strip_prefix('@') {
            Some(rest) if is_directive_keyword(leading_word(rest)) => CodeKind::Directive,
            Some(_) => CodeKind::Expression,
            None => CodeKind::Directive,
        }
    }
}

pub fn is_directive_keyword(word: &str) -> bool {
    DIRECTIVE_KEYWORDS.contains(&word)
}

pub fn is_continuation_keyword(word: &str) -> bool {
    CONTINUATION_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(word))
}

/// The identifier prefix of `s` (`if` for `if (x)`).
pub fn leading_word(s: &str) -> &str {
    let end = s
        .char_indices()
        .find(|&(_, c)| !(c.is_alphanumeric() || c == '_'))
        .map_or(s.len(), |(i, _)| i);
    &s[..end]
}

/// Order-preserving attribute mapping.
///
/// Inserting a name that already exists replaces the value but keeps the
/// original position. Bare attributes (`disabled`) hold an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn code_kind_from_keyword() {
        assert_eq!(CodeConstruct::new("@{", false).kind(), CodeKind::Block);
        assert_eq!(CodeConstruct::new("{", false).kind(), CodeKind::Block);
        assert_eq!(
            CodeConstruct::new("@if (x)", false).kind(),
            CodeKind::Directive
        );
        assert_eq!(
            CodeConstruct::new("@page \"/\"", true).kind(),
            CodeKind::Directive
        );
        assert_eq!(CodeConstruct::new("else", false).kind(), CodeKind::Directive);
        assert_eq!(
            CodeConstruct::new("@Model.Name", true).kind(),
            CodeKind::Expression
        );
        // Prefix match only counts whole words
        assert_eq!(
            CodeConstruct::new("@iffy", true).kind(),
            CodeKind::Expression
        );
    }

    #[test]
    fn continuation_keywords_ignore_case() {
        assert!(is_continuation_keyword("else"));
        assert!(is_continuation_keyword("ELSE"));
        assert!(is_continuation_keyword("Finally"));
        assert!(!is_continuation_keyword("elsewhere"));
    }

    #[test]
    fn leading_word_stops_at_punctuation() {
        assert_eq!(leading_word("if (x)"), "if");
        assert_eq!(leading_word("Model.Name"), "Model");
        assert_eq!(leading_word("foreach"), "foreach");
        assert_eq!(leading_word("(x)"), "");
    }

    #[test]
    fn attributes_keep_first_position() {
        let mut attrs = Attributes::new();
        attrs.insert("class", "a");
        attrs.insert("id", "main");
        attrs.insert("class", "b");

        let entries: Vec<_> = attrs.iter().collect();
        assert_eq!(entries, vec![("class", "b"), ("id", "main")]);
        assert_eq!(attrs.get("id"), Some("main"));
        assert_eq!(attrs.get("missing"), None);
    }

    #[test]
    fn self_closing_nodes_report_no_children() {
        let node = Node::Code(CodeConstruct::new("@Model.Name", true));
        assert!(node.is_self_closing());
        assert!(node.children().is_empty());
        assert!(!Node::text("x").is_self_closing());
    }
}
