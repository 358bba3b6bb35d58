//! Node tree → layout.
//!
//! Formatting rules in brief:
//!
//! - Markup, comments, blocks and directives are block-level: each starts on
//!   its own line. Text and inline expressions flow together as one run.
//! - A markup element whose body holds anything block-level puts its body on
//!   indented lines and its close tag on a line of its own. Otherwise the
//!   body stays between the tags.
//! - A `{` block right after a text run stays on that line (`if (x) {`).
//! - Inside a brace block, `;`, `,` or `)` right after a closing `}` stays on
//!   that line (`new[] { 1, 2 };`).
//! - Text loses its outer whitespace at run edges and its common indentation.

use razorfmt_syntax::{CodeConstruct, CodeKind, MarkupElement, Node, is_code_section};

use crate::layout::Doc;
use crate::options::FormatOptions;

/// What kind of node a sequence of children lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// The document itself.
    Root,
    /// The body of a brace block. Text here is C#.
    Block,
    /// The body of a markup element.
    Element,
}

/// Formatting context handed down to each node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatContext {
    pub container: Container,
    /// Drop leading whitespace instead of collapsing it to a space.
    pub trim_start: bool,
    /// Drop trailing whitespace instead of collapsing it to a space.
    pub trim_end: bool,
}

impl FormatContext {
    pub fn new(container: Container) -> Self {
        Self {
            container,
            trim_start: true,
            trim_end: true,
        }
    }

    fn edges(self, trim_start: bool, trim_end: bool) -> Self {
        Self {
            trim_start,
            trim_end,
            ..self
        }
    }
}

/// One entry of a formatted sequence: a single block-level node or a run
/// of consecutive inline nodes.
#[derive(Clone, Copy)]
enum Item<'n> {
    Single(&'n Node),
    Run(&'n [Node]),
}

fn is_inline(node: &Node) -> bool {
    match node {
        Node::Text { .. } => true,
        Node::Code(code) => code.kind() == CodeKind::Expression,
        Node::Markup(_) | Node::Comment { .. } => false,
    }
}

fn items(nodes: &[Node]) -> Vec<Item<'_>> {
    let mut items = Vec::new();
    let mut i = 0;
    while i < nodes.len() {
        if is_inline(&nodes[i]) {
            let start = i;
            while i < nodes.len() && is_inline(&nodes[i]) {
                i += 1;
            }
            items.push(Item::Run(&nodes[start..i]));
        } else {
            items.push(Item::Single(&nodes[i]));
            i += 1;
        }
    }
    items
}

fn is_bare_block(node: &Node) -> bool {
    matches!(node, Node::Code(code) if code.keyword.trim() == "{")
}

/// Blocks and block directives print a closing `}` last.
fn ends_with_brace(node: &Node) -> bool {
    matches!(node, Node::Code(code) if !code.self_closing)
}

/// Whether the last line of `text` holds a C# `//` comment, which would
/// swallow anything placed after it on the same line.
fn ends_in_line_comment(text: &str) -> bool {
    text.trim_end()
        .lines()
        .last()
        .is_some_and(|line| line.contains("//"))
}

fn starts_with_punctuation(run: &[Node]) -> bool {
    matches!(
        run.first(),
        Some(Node::Text { content }) if content.trim_start().starts_with([';', ',', ')'])
    )
}

/// What goes between two consecutive non-empty items of a sequence.
fn separator(prev: Item<'_>, next: Item<'_>, container: Container) -> Doc {
    match (prev, next) {
        (Item::Run(run), Item::Single(node))
            if is_bare_block(node)
                && !matches!(run.last(), Some(Node::Text { content }) if ends_in_line_comment(content)) =>
        {
            Doc::text(" ")
        }
        (Item::Single(node), Item::Run(run))
            if container == Container::Block
                && ends_with_brace(node)
                && starts_with_punctuation(run) =>
        {
            Doc::nil()
        }
        _ => Doc::hardline(),
    }
}

pub struct Formatter {
    indent_width: usize,
}

impl Formatter {
    pub fn new(options: &FormatOptions) -> Self {
        Self {
            indent_width: options.indent_width,
        }
    }

    /// Lays out a whole document, ending with a newline unless empty.
    pub fn format_document(&self, nodes: &[Node]) -> Doc {
        let (body, code_section) = match nodes.split_last() {
            Some((Node::Text { content }, rest)) if is_code_section(content) => {
                (rest, Some(content.as_str()))
            }
            _ => (nodes, None),
        };

        let mut parts = vec![self.sequence(body, FormatContext::new(Container::Root))];
        if let Some(section) = code_section {
            if !parts[0].is_nil() {
                parts.push(Doc::hardline());
                parts.push(Doc::hardline());
            }
            parts.push(verbatim(section));
        }

        let doc = Doc::concat(parts);
        if doc.is_nil() {
            doc
        } else {
            Doc::concat(vec![doc, Doc::hardline()])
        }
    }

    /// Lays out a single node as if it stood alone at the root.
    pub fn format_node(&self, node: &Node) -> Doc {
        self.node(node, FormatContext::new(Container::Root))
    }

    fn node(&self, node: &Node, ctx: FormatContext) -> Doc {
        match node {
            Node::Text { content } => text(content, ctx),
            Node::Comment { content } => lines(&normalize_lines(content)),
            Node::Code(code) => self.code(code),
            Node::Markup(element) => self.element(element),
        }
    }

    /// Formats the children of the root or of a brace block.
    fn sequence(&self, nodes: &[Node], ctx: FormatContext) -> Doc {
        let mut parts = Vec::new();
        let mut prev = None;

        for item in items(nodes) {
            let doc = match item {
                Item::Run(run) => self.run(run, ctx),
                Item::Single(node) => self.node(node, ctx),
            };
            if doc.is_nil() {
                continue;
            }
            if let Some(prev) = prev {
                parts.push(separator(prev, item, ctx.container));
            }
            parts.push(doc);
            prev = Some(item);
        }

        Doc::concat(parts)
    }

    /// Formats the children of a markup element. Returns the body and
    /// whether it must break onto indented lines.
    fn element_body(&self, nodes: &[Node]) -> (Doc, bool) {
        let ctx = FormatContext::new(Container::Element);
        let mut entries = Vec::new();
        let mut forced = false;

        for item in items(nodes) {
            let (doc, line) = match item {
                Item::Run(run) => (self.run(run, ctx), Doc::softline()),
                Item::Single(node) => {
                    let line = match node {
                        Node::Markup(_) => Doc::hardline(),
                        _ => Doc::softline(),
                    };
                    (self.node(node, ctx), line)
                }
            };
            if doc.is_nil() {
                continue;
            }
            // Block-level children and multi-line text both need their own lines
            forced |= matches!(item, Item::Single(_)) || doc.has_hardline();
            entries.push((line, doc));
        }

        let body = if forced {
            Doc::concat(
                entries
                    .into_iter()
                    .flat_map(|(line, doc)| [line, doc])
                    .collect(),
            )
        } else {
            Doc::concat(entries.into_iter().map(|(_, doc)| doc).collect())
        };
        (body, forced)
    }

    /// Formats consecutive text and expressions as one line of flow.
    fn run(&self, run: &[Node], ctx: FormatContext) -> Doc {
        let last = run.len().saturating_sub(1);
        Doc::concat(
            run.iter()
                .enumerate()
                .map(|(i, node)| self.node(node, ctx.edges(i == 0, i == last)))
                .collect(),
        )
    }

    fn code(&self, code: &CodeConstruct) -> Doc {
        match code.kind() {
            CodeKind::Block => {
                let keyword = Doc::text(code.keyword.trim());
                let body = self.sequence(&code.children, FormatContext::new(Container::Block));
                if body.is_nil() {
                    return Doc::concat(vec![keyword, Doc::hardline(), Doc::text("}")]);
                }
                Doc::concat(vec![
                    keyword,
                    Doc::concat(vec![Doc::hardline(), body]).indent(self.indent_width),
                    Doc::hardline(),
                    Doc::text("}"),
                ])
            }
            CodeKind::Directive => {
                let head = lines(&normalize_lines(&code.keyword));
                let block = self.sequence(&code.children, FormatContext::new(Container::Block));
                if block.is_nil() {
                    head
                } else {
                    Doc::concat(vec![head, Doc::text(" "), block])
                }
            }
            CodeKind::Expression => lines(&normalize_lines(&code.keyword)),
        }
    }

    fn element(&self, element: &MarkupElement) -> Doc {
        let head = self.head(element);
        if element.self_closing {
            return head;
        }
        let close = Doc::text(format!("</{}>", element.name));

        if let Some(content) = raw_text_block(element) {
            return Doc::concat(vec![
                head,
                Doc::concat(vec![Doc::hardline(), content]).indent(self.indent_width),
                Doc::hardline(),
                close,
            ]);
        }

        let (body, forced) = self.element_body(&element.children);
        if forced {
            let tail = Doc::concat(vec![
                body.indent(self.indent_width),
                Doc::hardline(),
                close,
            ]);
            Doc::concat(vec![head, tail.group()])
        } else {
            Doc::concat(vec![head, body, close])
        }
    }

    /// `<name attr="v" ...>`, breaking one attribute per line when too wide.
    fn head(&self, element: &MarkupElement) -> Doc {
        let attributes: Vec<Doc> = element
            .attributes
            .iter()
            .map(|(name, value)| Doc::concat(vec![Doc::softline(), attribute(name, value)]))
            .collect();
        let end = if element.self_closing && !element.is_declaration() {
            "/>"
        } else {
            ">"
        };
        Doc::concat(vec![
            Doc::text(format!("<{}", element.name)),
            Doc::concat(attributes).indent(self.indent_width),
            Doc::text(end),
        ])
        .group()
    }
}

/// `name="value"`. A multi-line value keeps its lines, dedented, and forces
/// the tag onto one attribute per line.
fn attribute(name: &str, value: &str) -> Doc {
    let text = if value.is_empty() {
        name.to_string()
    } else if value.contains('"') && !value.contains('\'') {
        format!("{name}='{value}'")
    } else {
        format!("{name}=\"{value}\"")
    };
    if text.contains('\n') {
        lines(&normalize_lines(&text))
    } else {
        Doc::text(text)
    }
}

/// Multi-line `<script>`/`<style>` content, dedented.
fn raw_text_block(element: &MarkupElement) -> Option<Doc> {
    if !element.is_raw_text() {
        return None;
    }
    let [Node::Text { content }] = element.children.as_slice() else {
        return None;
    };
    if !content.trim().contains('\n') {
        return None;
    }
    Some(lines(&normalize_lines(content)))
}

fn text(content: &str, ctx: FormatContext) -> Doc {
    let core = content.trim();
    if core.is_empty() {
        return if ctx.trim_start || ctx.trim_end {
            Doc::nil()
        } else {
            Doc::text(" ")
        };
    }
    let leading = !ctx.trim_start && content.starts_with(char::is_whitespace);
    let trailing = if ctx.trim_end || !content.ends_with(char::is_whitespace) {
        Doc::nil()
    } else if ctx.container == Container::Block && ends_in_line_comment(core) {
        Doc::hardline()
    } else {
        Doc::text(" ")
    };
    Doc::concat(vec![
        if leading { Doc::text(" ") } else { Doc::nil() },
        lines(&normalize_lines(core)),
        trailing,
    ])
}

/// The opaque code section, line by line with line ends trimmed.
fn verbatim(section: &str) -> Doc {
    let section_lines: Vec<String> = section
        .trim_end()
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect();
    lines(&section_lines)
}

/// Joins lines with hard breaks. Empty lines stay as blank lines.
fn lines(lines: &[String]) -> Doc {
    let mut parts = Vec::with_capacity(lines.len() * 2);
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            parts.push(Doc::hardline());
        }
        parts.push(Doc::text(line.as_str()));
    }
    Doc::concat(parts)
}

/// Splits text into lines without their shared indentation.
///
/// Leading and trailing blank lines are dropped and runs of blank lines
/// collapse to one. When the text starts on its first line, that line is
/// trimmed on its own and only the remaining lines are dedented together.
pub fn normalize_lines(text: &str) -> Vec<String> {
    let raw: Vec<&str> = text.lines().collect();
    let Some(first) = raw.iter().position(|line| !line.trim().is_empty()) else {
        return Vec::new();
    };
    let last = raw
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .unwrap_or(first);

    let mut out = Vec::new();
    let rest = if first == 0 {
        out.push(raw[0].trim().to_string());
        &raw[1..=last]
    } else {
        &raw[first..=last]
    };

    let indent = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    for line in rest {
        let line = dedent(line, indent).trim_end();
        if line.is_empty() && out.last().is_some_and(|prev: &String| prev.is_empty()) {
            continue;
        }
        out.push(line.to_string());
    }
    out
}

fn dedent(line: &str, count: usize) -> &str {
    let offset = line
        .char_indices()
        .take_while(|(_, c)| c.is_whitespace())
        .take(count)
        .last()
        .map_or(0, |(i, c)| i + c.len_utf8());
    &line[offset..]
}
