//! # razorfmt-syntax
//!
//! Scanner and tree builder for Razor templates: HTML-style markup mixed with
//! C# code introduced by `@`.
//!
//! ## Architecture Overview
//!
//! ```text
//! Source → extract → Scanner → Tokens → Classifier → Shells → TreeBuilder → Vec<Node>
//!          (@code)   (regex,            (void table,          (owned stack)
//!                     cursor)            logos attrs)
//! ```
//!
//! ### 1. Code-section extraction ([`extract`] module)
//!
//! A trailing `@code { ... }` block is pure C#. It is cut off before scanning
//! and re-attached verbatim as the last root text node, so nothing in it is
//! ever mistaken for markup.
//!
//! ### 2. Scanning ([`scanner`] module)
//!
//! A single pass over the text recognizes comments, tags and code tokens.
//! Rule families are tried in a fixed precedence order at each offset, and
//! the text between tokens is left for the builder.
//!
//! ```text
//! "@if (x) { <p>Yes</p> }" → [Directive("@if (x)"), BraceOpen, OpenTag("<p>"),
//!                            CloseTag("</p>"), BraceClose]
//! ```
//!
//! ### 3. Classification ([`classify`] module)
//!
//! Each token becomes an open, close or comment shell. This is where void
//! elements are recognized and attributes are parsed ([`attributes`] module).
//!
//! ### 4. Tree building ([`builder`] module)
//!
//! Open nodes live on a stack and are attached to their parent when they
//! close. Unmatched closers are ignored and unclosed nodes are closed at the
//! end, so every input produces a tree.
//!
//! ## Module Structure
//!
//! ```text
//! razorfmt-syntax/
//! ├── lib.rs         # This file - public API and integration tests
//! ├── node.rs        # Node, MarkupElement, CodeConstruct, Attributes
//! ├── extract.rs     # @code section extraction
//! ├── cursor.rs      # Byte cursor used by the scanner
//! ├── span.rs        # Byte ranges
//! ├── scanner.rs     # Token recognition
//! ├── attributes.rs  # Logos attribute lexer
//! ├── classify.rs    # Token → shell, void table
//! ├── builder.rs     # Stack-based tree construction
//! └── parser.rs      # Driver and options
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use razorfmt_syntax::{Node, parse};
//!
//! let nodes = parse("<div>Hello</div>");
//! let Node::Markup(div) = &nodes[0] else { panic!() };
//! assert_eq!(div.name, "div");
//! assert_eq!(div.children, vec![Node::text("Hello")]);
//! ```

pub mod attributes;
pub mod builder;
pub mod classify;
pub mod cursor;
pub mod extract;
pub mod node;
pub mod parser;
pub mod scanner;
pub mod span;

pub use extract::{extract_code_section, is_code_section};
pub use node::{Attributes, CodeConstruct, CodeKind, MarkupElement, Node};
pub use parser::{ParseOptions, Parser, parse};
pub use scanner::{Scanner, Token, TokenKind};
pub use span::Span;
