//! Statement splitting for create/undo migration files
//!
//! Splitting is purely lexical. A `;` or `--` inside a quoted string literal
//! is treated like any other, so such literals are mis-split. Files that need
//! them should be written as procedure (`p`) files, which are never split.

const STATEMENT_DELIMITER: char = ';';
const LINE_COMMENT: &str = "--";
const TRIM_CHARS: &[char] = &[' ', '\t', '\r', '\n'];

/// Remove every `--` line comment, up to but not including the newline.
pub fn strip_line_comments(text: &str) -> String {
    text.split('\n')
        .map(|line| match line.find(LINE_COMMENT) {
            Some(pos) => &line[..pos],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split raw file content into executable statements.
///
/// Comments are stripped first, then the text is cut at each `;`. Every line
/// of a candidate is trimmed and the lines are concatenated with no
/// separator; empty results are dropped. Multi-line statements therefore
/// need a space or punctuation at each line break to stay valid SQL.
pub fn split_statements(text: &str) -> Vec<String> {
    strip_line_comments(text)
        .split(STATEMENT_DELIMITER)
        .map(|candidate| {
            candidate
                .split('\n')
                .map(|line| line.trim_matches(TRIM_CHARS))
                .collect::<String>()
        })
        .filter(|statement| !statement.is_empty())
        .collect()
}
