/// Tunables for a [`Parser`](super::parser::Parser).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Columns added to the required indentation for each nested block
    pub indent_width: u32,
    /// Maximum nesting of `parse_expression` calls
    pub max_depth: usize,
    /// Whether a token at the start of a line is kept from continuing the
    /// expression of the previous line. Indented blocks rely on this.
    pub line_breaks_end_expressions: bool,
}

impl ParserConfig {
    pub fn with_indent_width(mut self, indent_width: u32) -> Self {
        self.indent_width = indent_width;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_line_breaks_end_expressions(mut self, enabled: bool) -> Self {
        self.line_breaks_end_expressions = enabled;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            indent_width: 2,
            max_depth: 256,
            line_breaks_end_expressions: true,
        }
    }
}
