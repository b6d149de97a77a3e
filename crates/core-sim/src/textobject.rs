//! Text objects: structural regions usable as operator arguments.
//!
//! "Inner" objects exclude surrounding delimiters/whitespace, "around"
//! objects include them. All resolvers return a normalized [`Range`]; when no
//! object exists at the cursor the degenerate single-cell range is returned,
//! mirroring operator behavior on a failed lookup.

use core_text::chars::{is_big_word_char, is_blank, is_blank_line, is_word_char};
use core_text::{Lines, Position, Range};

fn line_chars(lines: &Lines, line: usize) -> Vec<char> {
    lines[line].chars().collect()
}

/// First line index of the paragraph (or blank-line run) containing `line`.
pub fn paragraph_start_line(lines: &Lines, line: usize) -> usize {
    let line = line.min(lines.len() - 1);
    let blank = is_blank_line(&lines[line]);
    let mut i = line;
    while i > 0 && is_blank_line(&lines[i - 1]) == blank {
        i -= 1;
    }
    i
}

/// Last line index of the paragraph (or blank-line run) containing `line`.
pub fn paragraph_end_line(lines: &Lines, line: usize) -> usize {
    let line = line.min(lines.len() - 1);
    let blank = is_blank_line(&lines[line]);
    let mut i = line;
    while i + 1 < lines.len() && is_blank_line(&lines[i + 1]) == blank {
        i += 1;
    }
    i
}

/// `iw`/`iW`: the word, whitespace run, or symbol run under the cursor.
pub fn inner_word(lines: &Lines, pos: Position, big_word: bool) -> Range {
    let line = pos.line.min(lines.len() - 1);
    let chars = line_chars(lines, line);
    if chars.is_empty() {
        return Range::new(pos, pos, false, true);
    }
    let col = pos.col.min(chars.len() - 1);

    let is_word = |c: char| {
        if big_word {
            is_big_word_char(c)
        } else {
            is_word_char(c)
        }
    };
    let c = chars[col];
    let on_blank = is_blank(c);
    let on_word = is_word(c);

    let same_run = |other: char| -> bool {
        if on_blank {
            is_blank(other)
        } else if on_word {
            is_word(other)
        } else {
            !is_word(other) && !is_blank(other)
        }
    };

    let mut start = col;
    while start > 0 && same_run(chars[start - 1]) {
        start -= 1;
    }
    let mut end = col;
    while end + 1 < chars.len() && same_run(chars[end + 1]) {
        end += 1;
    }

    Range::new(
        Position::new(line, start),
        Position::new(line, end),
        false,
        true,
    )
}

/// `aw`/`aW`: the word plus trailing whitespace, or leading whitespace when
/// there is none trailing.
pub fn around_word(lines: &Lines, pos: Position, big_word: bool) -> Range {
    let inner = inner_word(lines, pos, big_word);
    let line = inner.start.line;
    let chars = line_chars(lines, line);
    let len = chars.len();

    let mut trail_end = inner.end.col;
    while trail_end + 1 < len && is_blank(chars[trail_end + 1]) {
        trail_end += 1;
    }
    if trail_end > inner.end.col {
        return Range::new(
            inner.start,
            Position::new(line, trail_end),
            false,
            true,
        );
    }

    let mut lead_start = inner.start.col;
    while lead_start > 0 && is_blank(chars[lead_start - 1]) {
        lead_start -= 1;
    }
    if lead_start < inner.start.col {
        return Range::new(
            Position::new(line, lead_start),
            inner.end,
            false,
            true,
        );
    }

    inner
}

/// `ip`: the whole paragraph (or blank run) as a linewise range.
pub fn inner_paragraph(lines: &Lines, pos: Position) -> Range {
    let line = pos.line.min(lines.len() - 1);
    let start_line = paragraph_start_line(lines, line);
    let end_line = paragraph_end_line(lines, line);
    let end_col = lines.line_len(end_line).saturating_sub(1);
    Range::new(
        Position::new(start_line, 0),
        Position::new(end_line, end_col),
        true,
        true,
    )
}

/// `ap`: the paragraph plus trailing blank lines (or, from a blank run, the
/// following paragraph).
pub fn around_paragraph(lines: &Lines, pos: Position) -> Range {
    let n = lines.len();
    let line = pos.line.min(n - 1);
    let start_line = paragraph_start_line(lines, line);
    let mut end_line = paragraph_end_line(lines, line);

    if !is_blank_line(&lines[line]) {
        while end_line + 1 < n && is_blank_line(&lines[end_line + 1]) {
            end_line += 1;
        }
    } else if end_line + 1 < n {
        end_line = paragraph_end_line(lines, end_line + 1);
    }

    let end_col = lines.line_len(end_line).saturating_sub(1);
    Range::new(
        Position::new(start_line, 0),
        Position::new(end_line, end_col),
        true,
        true,
    )
}

/// `i"`/`i'`: contents of the quote pair containing (or following) the
/// cursor on its line. Quote pairs are non-nesting, paired left to right.
pub fn inner_quote(lines: &Lines, pos: Position, quote: char) -> Range {
    let line = pos.line.min(lines.len() - 1);
    let chars = line_chars(lines, line);
    if chars.is_empty() {
        return Range::new(pos, pos, false, true);
    }
    let col = pos.col.min(chars.len() - 1);

    let quote_positions: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(_, c)| **c == quote)
        .map(|(i, _)| i)
        .collect();

    let mut pair = None;
    for chunk in quote_positions.chunks_exact(2) {
        let (open, close) = (chunk[0], chunk[1]);
        if col >= open && col <= close {
            pair = Some((open, close));
            break;
        }
    }
    if pair.is_none() {
        for chunk in quote_positions.chunks_exact(2) {
            if chunk[0] > col {
                pair = Some((chunk[0], chunk[1]));
                break;
            }
        }
    }

    let Some((open, close)) = pair else {
        return Range::new(pos, pos, false, true);
    };
    if close - open <= 1 {
        // Empty pair: zero-width range just inside.
        return Range::new(
            Position::new(line, open + 1),
            Position::new(line, open),
            false,
            false,
        );
    }
    Range::new(
        Position::new(line, open + 1),
        Position::new(line, close - 1),
        false,
        true,
    )
}

/// `a"`/`a'`: the pair including the quotes themselves.
pub fn around_quote(lines: &Lines, pos: Position, quote: char) -> Range {
    let inner = inner_quote(lines, pos, quote);
    if inner.start.line != inner.end.line {
        return inner;
    }
    let line = inner.start.line;
    let len = lines.line_len(line);
    let start_col = inner.start.col.saturating_sub(1);
    let end_col = if inner.end.col + 1 < len {
        inner.end.col + 1
    } else {
        inner.end.col
    };
    Range::new(
        Position::new(line, start_col),
        Position::new(line, end_col),
        false,
        true,
    )
}

/// Matching `(open, close)` pair around the cursor, handling nesting.
fn find_matching_brackets(
    lines: &Lines,
    pos: Position,
    open: char,
    close: char,
) -> Option<(Position, Position)> {
    let n = lines.len();
    let pos = lines.clamp(pos);

    // Determine the opening bracket: the cursor may sit on one.
    let open_pos = if lines.char_at(pos.line, pos.col) == Some(open) {
        Some(Position::new(pos.line, pos.col))
    } else {
        // Search backward with depth counting.
        let mut depth = 0i32;
        let mut found = None;
        'outer: for line in (0..=pos.line).rev() {
            let chars = line_chars(lines, line);
            let start_col = if line == pos.line {
                pos.col.min(chars.len().saturating_sub(1))
            } else {
                chars.len().saturating_sub(1)
            };
            if chars.is_empty() {
                continue;
            }
            for col in (0..=start_col).rev() {
                if chars[col] == close {
                    depth += 1;
                } else if chars[col] == open {
                    if depth == 0 {
                        found = Some(Position::new(line, col));
                        break 'outer;
                    }
                    depth -= 1;
                }
            }
        }
        found
    };
    let open_pos = open_pos?;

    // Search forward for the matching close.
    let mut depth = 1i32;
    let mut line = open_pos.line;
    let mut col = open_pos.col + 1;
    while line < n {
        let chars = line_chars(lines, line);
        while col < chars.len() {
            if chars[col] == open {
                depth += 1;
            } else if chars[col] == close {
                depth -= 1;
                if depth == 0 {
                    return Some((open_pos, Position::new(line, col)));
                }
            }
            col += 1;
        }
        line += 1;
        col = 0;
    }
    None
}

/// `i(`/`i{`/`i[`: contents between the matching pair, exclusive of the
/// brackets.
pub fn inner_bracket(lines: &Lines, pos: Position, open: char, close: char) -> Range {
    let Some((open_pos, close_pos)) = find_matching_brackets(lines, pos, open, close) else {
        return Range::new(pos, pos, false, true);
    };

    let mut start = Position::new(open_pos.line, open_pos.col + 1);
    if start.col >= lines.line_len(start.line) {
        start = Position::new(start.line + 1, 0);
    }

    let mut end = close_pos;
    if end.col > 0 {
        end = Position::new(end.line, end.col - 1);
    } else if end.line > 0 {
        let prev = end.line - 1;
        end = Position::new(prev, lines.line_len(prev).saturating_sub(1));
    }

    if start > end {
        // Empty pair like ().
        return Range::new(close_pos, close_pos, false, false);
    }
    Range::new(start, end, false, true)
}

/// `a(`/`a{`/`a[`: the pair including the brackets.
pub fn around_bracket(lines: &Lines, pos: Position, open: char, close: char) -> Range {
    match find_matching_brackets(lines, pos, open, close) {
        Some((open_pos, close_pos)) => Range::new(open_pos, close_pos, false, true),
        None => Range::new(pos, pos, false, true),
    }
}

/// Resolve a text-object name (`"iw"`, `"a("`, ...) at the cursor.
pub fn resolve(lines: &Lines, pos: Position, object: &str) -> Option<Range> {
    let mut chars = object.chars();
    let scope = chars.next()?;
    let kind = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let inner = match scope {
        'i' => true,
        'a' => false,
        _ => return None,
    };
    let range = match kind {
        'w' if inner => inner_word(lines, pos, false),
        'w' => around_word(lines, pos, false),
        'W' if inner => inner_word(lines, pos, true),
        'W' => around_word(lines, pos, true),
        'p' if inner => inner_paragraph(lines, pos),
        'p' => around_paragraph(lines, pos),
        '"' | '\'' if inner => inner_quote(lines, pos, kind),
        '"' | '\'' => around_quote(lines, pos, kind),
        '(' | ')' if inner => inner_bracket(lines, pos, '(', ')'),
        '(' | ')' => around_bracket(lines, pos, '(', ')'),
        '{' | '}' if inner => inner_bracket(lines, pos, '{', '}'),
        '{' | '}' => around_bracket(lines, pos, '{', '}'),
        '[' | ']' if inner => inner_bracket(lines, pos, '[', ']'),
        '[' | ']' => around_bracket(lines, pos, '[', ']'),
        _ => return None,
    };
    Some(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buf(lines: &[&str]) -> Lines {
        Lines::from_strs(lines)
    }

    #[test]
    fn inner_word_selects_run_under_cursor() {
        let lines = buf(&["foo bar-baz"]);
        let r = inner_word(&lines, Position::new(0, 1), false);
        assert_eq!((r.start.col, r.end.col), (0, 2));
        let r = inner_word(&lines, Position::new(0, 7), false);
        assert_eq!((r.start.col, r.end.col), (7, 7)); // the '-'
        let r = inner_word(&lines, Position::new(0, 7), true);
        assert_eq!((r.start.col, r.end.col), (4, 10)); // whole WORD
    }

    #[test]
    fn around_word_prefers_trailing_whitespace() {
        let lines = buf(&["foo  bar"]);
        let r = around_word(&lines, Position::new(0, 0), false);
        assert_eq!((r.start.col, r.end.col), (0, 4));
        let r = around_word(&lines, Position::new(0, 6), false);
        assert_eq!((r.start.col, r.end.col), (3, 7)); // leading blanks
    }

    #[test]
    fn paragraph_objects_are_linewise() {
        let lines = buf(&["a", "b", "", "c"]);
        let r = inner_paragraph(&lines, Position::new(1, 0));
        assert!(r.linewise);
        assert_eq!((r.start.line, r.end.line), (0, 1));
        let r = around_paragraph(&lines, Position::new(1, 0));
        assert_eq!((r.start.line, r.end.line), (0, 2));
    }

    #[test]
    fn quote_pairing_left_to_right() {
        let lines = buf(&[r#"say "hi there" ok"#]);
        let r = inner_quote(&lines, Position::new(0, 7), '"');
        assert_eq!((r.start.col, r.end.col), (5, 12));
        let r = around_quote(&lines, Position::new(0, 7), '"');
        assert_eq!((r.start.col, r.end.col), (4, 13));
        // Before the pair: next pair on the line is used.
        let r = inner_quote(&lines, Position::new(0, 0), '"');
        assert_eq!((r.start.col, r.end.col), (5, 12));
    }

    #[test]
    fn brackets_handle_nesting() {
        let lines = buf(&["f(a, g(b), c)"]);
        let r = inner_bracket(&lines, Position::new(0, 4), '(', ')');
        assert_eq!((r.start.col, r.end.col), (2, 11));
        let r = inner_bracket(&lines, Position::new(0, 7), '(', ')');
        assert_eq!((r.start.col, r.end.col), (7, 7));
        let r = around_bracket(&lines, Position::new(0, 4), '(', ')');
        assert_eq!((r.start.col, r.end.col), (1, 12));
    }

    #[test]
    fn brackets_across_lines() {
        let lines = buf(&["{", "  body", "}"]);
        let r = inner_bracket(&lines, Position::new(1, 2), '{', '}');
        assert_eq!((r.start.line, r.start.col), (1, 0));
        assert_eq!((r.end.line, r.end.col), (1, 5));
    }

    #[test]
    fn resolve_maps_names() {
        let lines = buf(&["foo (bar)"]);
        assert!(resolve(&lines, Position::origin(), "iw").is_some());
        assert!(resolve(&lines, Position::new(0, 5), "a(").is_some());
        assert!(resolve(&lines, Position::origin(), "zz").is_none());
    }
}
