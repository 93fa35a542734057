/// A zero-based line/column location, both measured in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
}

impl CursorPosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for CursorPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Convert a flat character index into a line/column position.
///
/// The line is the number of `\n` characters before `char_index` and the
/// column is the number of characters since the last of them. Indices past
/// the end of `text` resolve to the end of the text.
pub fn resolve_position(text: &str, char_index: usize) -> CursorPosition {
    let mut position = CursorPosition::default();
    for c in text.chars().take(char_index) {
        if c == '\n' {
            position.line += 1;
            position.column = 0;
        } else {
            position.column += 1;
        }
    }
    position
}
