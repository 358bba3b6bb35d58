use razorfmt_syntax::ParseOptions;

pub const DEFAULT_INDENT_WIDTH: usize = 4;
pub const DEFAULT_PRINT_WIDTH: usize = 100;

/// Settings shared by the formatter and the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Spaces per nesting level.
    pub indent_width: usize,
    /// Target line width. Groups wider than this break.
    pub print_width: usize,
    pub parse: ParseOptions,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            print_width: DEFAULT_PRINT_WIDTH,
            parse: ParseOptions::default(),
        }
    }
}
