//! Character classification mirroring the editor's word semantics.
//!
//! A small "word" is a run of keyword characters (alphanumeric plus `_`); a
//! big "WORD" is any run of non-blanks. Newlines count as blank so that word
//! motions treat line wraps as boundaries.

/// Space, tab, or the newline sentinel.
pub fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\n'
}

/// Keyword character: approximates `iskeyword` as alphanumeric or underscore.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Any non-blank character (a WORD constituent).
pub fn is_big_word_char(c: char) -> bool {
    !is_blank(c)
}

/// Sentence-ending punctuation.
pub fn is_sentence_end(c: char) -> bool {
    c == '.' || c == '!' || c == '?'
}

/// Closers that may trail sentence-ending punctuation.
pub fn is_sentence_closer(c: char) -> bool {
    c == ')' || c == ']' || c == '"' || c == '\''
}

/// Word-boundary characters for diff-region merging: whitespace and
/// punctuation, excluding underscore (part of identifiers in code).
pub fn is_word_boundary_char(c: char) -> bool {
    if c.is_whitespace() {
        return true;
    }
    matches!(
        c,
        '.' | ','
            | ';'
            | ':'
            | '!'
            | '?'
            | '('
            | ')'
            | '['
            | ']'
            | '{'
            | '}'
            | '"'
            | '\''
            | '`'
            | '<'
            | '>'
            | '/'
            | '\\'
            | '@'
            | '#'
            | '$'
            | '%'
            | '^'
            | '&'
            | '*'
            | '-'
            | '+'
            | '='
            | '|'
            | '~'
    )
}

/// Empty or whitespace-only line.
pub fn is_blank_line(line: &str) -> bool {
    line.chars().all(|c| c == ' ' || c == '\t')
}

/// Column of the first non-blank character, 0 if the line is all blank.
pub fn first_non_blank_col(line: &str) -> usize {
    line.chars()
        .position(|c| c != ' ' && c != '\t')
        .unwrap_or(0)
}
