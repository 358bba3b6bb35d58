//! Formatting engine for Razor templates.
//!
//! ```text
//! Vec<Node> → Formatter → Doc → render → String
//! ```
//!
//! The [`formatter`] module maps the node tree onto [`Doc`] layout
//! primitives; [`render`] chooses line breaks for a print width.

pub mod formatter;
pub mod layout;
pub mod options;
pub mod render;

pub use formatter::{Container, FormatContext, Formatter, normalize_lines};
pub use layout::{Doc, LineKind};
pub use options::{DEFAULT_INDENT_WIDTH, DEFAULT_PRINT_WIDTH, FormatOptions};
pub use render::render;

use razorfmt_syntax::Parser;

/// Parses and formats `source` in one step.
pub fn format_text(source: &str, options: &FormatOptions) -> String {
    let nodes = Parser::with_options(&options.parse).parse(source);
    log::debug!("parsed {} root node(s)", nodes.len());
    let doc = Formatter::new(options).format_document(&nodes);
    render(&doc, options)
}
