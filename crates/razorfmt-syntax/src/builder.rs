//! Tree construction from classified tokens.
//!
//! The builder keeps a stack of open nodes. Each open node owns the children
//! attached so far; when it closes it is attached to the node below it (or
//! to the root list). Nothing points back up the tree.

use crate::node::{CodeKind, Node};

#[derive(Debug, Default)]
pub struct TreeBuilder {
    root: Vec<Node>,
    stack: Vec<Node>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently open nodes.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Handles the text between two tokens.
    ///
    /// `between_expressions` is true when the tokens on both sides of the gap
    /// are inline expressions. Whitespace there separates the two expressions
    /// and is kept as a single space; elsewhere whitespace-only gaps vanish.
    pub fn gap(&mut self, gap: &str, between_expressions: bool) {
        if gap.is_empty() {
            return;
        }
        if !gap.trim().is_empty() {
            self.attach(Node::text(gap));
        } else if between_expressions {
            self.attach(Node::text(" "));
        }
    }

    /// Attaches a self-closing node, or pushes an open one.
    pub fn open(&mut self, node: Node, self_closing: bool) {
        if self_closing {
            self.attach(node);
        } else {
            self.stack.push(node);
        }
    }

    /// Closes the innermost open element named `name` and everything above
    /// it. A close tag without a matching element is ignored.
    pub fn close_tag(&mut self, name: &str) {
        let matching = self.stack.iter().rposition(|node| match node {
            Node::Markup(element) => element.name.eq_ignore_ascii_case(name),
            _ => false,
        });
        match matching {
            Some(at) => self.pop_to(at),
            None => log::debug!("ignoring unmatched close tag </{name}>"),
        }
    }

    /// Closes the innermost brace block, then the directive that owns it.
    pub fn close_brace(&mut self) {
        let matching = self
            .stack
            .iter()
            .rposition(|node| matches!(node, Node::Code(code) if code.kind() == CodeKind::Block));
        let Some(at) = matching else {
            log::debug!("ignoring unmatched closing brace");
            return;
        };
        self.pop_to(at);
        let owned_by_directive = matches!(
            self.stack.last(),
            Some(Node::Code(owner)) if owner.kind() == CodeKind::Directive
        );
        if owned_by_directive {
            self.pop_frame();
        }
    }

    /// Closes every open node and returns the root nodes.
    pub fn finish(mut self) -> Vec<Node> {
        if !self.stack.is_empty() {
            log::debug!("closing {} unterminated node(s) at end of input", self.stack.len());
        }
        while !self.stack.is_empty() {
            self.pop_frame();
        }
        self.root
    }

    fn pop_to(&mut self, at: usize) {
        while self.stack.len() > at {
            self.pop_frame();
        }
    }

    fn pop_frame(&mut self) {
        if let Some(node) = self.stack.pop() {
            self.attach(node);
        }
    }

    fn attach(&mut self, node: Node) {
        match self.stack.last_mut().and_then(Node::children_mut) {
            Some(children) => children.push(node),
            None => self.root.push(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{CodeConstruct, MarkupElement};
    use pretty_assertions::assert_eq;

    fn element(name: &str) -> Node {
        Node::Markup(MarkupElement::new(name))
    }

    fn element_with(name: &str, children: Vec<Node>) -> Node {
        let mut element = MarkupElement::new(name);
        element.children = children;
        Node::Markup(element)
    }

    fn code_with(keyword: &str, children: Vec<Node>) -> Node {
        let mut code = CodeConstruct::new(keyword, false);
        code.children = children;
        Node::Code(code)
    }

    #[test]
    fn gap_rules() {
        let mut builder = TreeBuilder::new();
        builder.gap("", false);
        builder.gap("  \n  ", false);
        builder.gap("   ", false);
        assert_eq!(builder.depth(), 0);
        builder.gap(" \t", true);
        builder.gap("\n  ", true);
        builder.gap(" hi ", false);
        assert_eq!(
            builder.finish(),
            vec![Node::text(" "), Node::text(" "), Node::text(" hi ")]
        );
    }

    #[test]
    fn nested_elements_attach_on_close() {
        let mut builder = TreeBuilder::new();
        builder.open(element("div"), false);
        builder.open(element("p"), false);
        assert_eq!(builder.depth(), 2);
        builder.gap("Hi", false);
        builder.close_tag("p");
        builder.close_tag("DIV");
        assert_eq!(builder.depth(), 0);
        assert_eq!(
            builder.finish(),
            vec![element_with("div", vec![element_with("p", vec![Node::text("Hi")])])]
        );
    }

    #[test]
    fn close_tag_pops_unclosed_children() {
        let mut builder = TreeBuilder::new();
        builder.open(element("ul"), false);
        builder.open(element("li"), false);
        builder.close_tag("ul");
        builder.gap("after", false);
        assert_eq!(
            builder.finish(),
            vec![
                element_with("ul", vec![element("li")]),
                Node::text("after"),
            ]
        );
    }

    #[test]
    fn unmatched_close_tag_is_ignored() {
        let mut builder = TreeBuilder::new();
        builder.open(element("div"), false);
        builder.close_tag("span");
        assert_eq!(builder.depth(), 1);
    }

    #[test]
    fn closing_brace_closes_owning_directive() {
        let mut builder = TreeBuilder::new();
        builder.open(Node::Code(CodeConstruct::new("@if (x)", false)), false);
        builder.open(Node::Code(CodeConstruct::new("{", false)), false);
        builder.gap("go();", false);
        builder.close_brace();
        assert_eq!(builder.depth(), 0);
        assert_eq!(
            builder.finish(),
            vec![code_with(
                "@if (x)",
                vec![code_with("{", vec![Node::text("go();")])]
            )]
        );
    }

    #[test]
    fn closing_brace_does_not_close_enclosing_markup() {
        let mut builder = TreeBuilder::new();
        builder.open(element("div"), false);
        builder.open(Node::Code(CodeConstruct::new("@{", false)), false);
        builder.close_brace();
        assert_eq!(builder.depth(), 1);
    }

    #[test]
    fn closing_brace_closes_markup_left_open_inside_the_block() {
        let mut builder = TreeBuilder::new();
        builder.open(Node::Code(CodeConstruct::new("@{", false)), false);
        builder.open(element("p"), false);
        builder.close_brace();
        assert_eq!(builder.depth(), 0);
        assert_eq!(builder.finish(), vec![code_with("@{", vec![element("p")])]);
    }

    #[test]
    fn unmatched_closing_brace_is_ignored() {
        let mut builder = TreeBuilder::new();
        builder.open(element("div"), false);
        builder.close_brace();
        assert_eq!(builder.depth(), 1);
    }

    #[test]
    fn self_closing_nodes_do_not_change_depth() {
        let mut builder = TreeBuilder::new();
        builder.open(Node::Code(CodeConstruct::new("@Model.Name", true)), true);
        builder.open(Node::comment("<!-- c -->"), true);
        assert_eq!(builder.depth(), 0);
        assert_eq!(builder.finish().len(), 2);
    }

    #[test]
    fn finish_closes_everything_in_order() {
        let mut builder = TreeBuilder::new();
        builder.open(element("html"), false);
        builder.open(element("body"), false);
        builder.gap("x", false);
        assert_eq!(
            builder.finish(),
            vec![element_with(
                "html",
                vec![element_with("body", vec![Node::text("x")])]
            )]
        );
    }
}
