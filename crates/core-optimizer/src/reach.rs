//! Reach levels: how much destructive scope is safe at a position inside an
//! edit region.
//!
//! The edit search works on the region's text as a standalone mini-buffer.
//! Commands scoped to word/WORD/line boundaries behave identically there and
//! in the full buffer only when they cannot cross the region's outer
//! boundary; these levels encode exactly that. Each level includes all the
//! ones below it.

use core_diff::EditBoundary;
use core_text::chars::{is_blank, is_word_char};

/// Total ordering from most to least restrictive scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReachLevel {
    /// No deletion in this direction.
    None = 0,
    /// Single characters (`x`, `X`, `<BS>`, `<Del>`).
    Char = 1,
    /// Up to a word boundary (`dw`, `db`, `<C-w>`).
    Word = 2,
    /// Up to a WORD boundary (`dW`, `dB`).
    BigWord = 3,
    /// To a line boundary (`d0`, `D`, `C`, `<C-u>`).
    Line = 4,
}

/// What the region's left edge itself permits: a deletion landing exactly on
/// the edge is safe only if the edge coincides with a boundary of that rank.
pub fn back_boundary_reach(boundary: &EditBoundary) -> ReachLevel {
    if !boundary.starts_mid_line {
        ReachLevel::Line
    } else if !boundary.starts_mid_big_word {
        ReachLevel::BigWord
    } else if !boundary.starts_mid_word {
        ReachLevel::Word
    } else {
        ReachLevel::Char
    }
}

/// Right-edge counterpart of [`back_boundary_reach`].
pub fn forward_boundary_reach(boundary: &EditBoundary) -> ReachLevel {
    if !boundary.ends_mid_line {
        ReachLevel::Line
    } else if !boundary.ends_mid_big_word {
        ReachLevel::BigWord
    } else if !boundary.ends_mid_word {
        ReachLevel::Word
    } else {
        ReachLevel::Char
    }
}

/// End column (inclusive) of the first word in the line: a run of keyword
/// characters or a run of other non-blanks. `None` when the line is blank.
pub fn find_first_word_end(line: &str) -> Option<usize> {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    while i < chars.len() && is_blank(chars[i]) {
        i += 1;
    }
    if i >= chars.len() {
        return None;
    }
    if is_word_char(chars[i]) {
        while i < chars.len() && is_word_char(chars[i]) {
            i += 1;
        }
    } else {
        while i < chars.len() && !is_word_char(chars[i]) && !is_blank(chars[i]) {
            i += 1;
        }
    }
    Some(i - 1)
}

/// End column (inclusive) of the first WORD (any non-blank run).
pub fn find_first_big_word_end(line: &str) -> Option<usize> {
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    while i < chars.len() && is_blank(chars[i]) {
        i += 1;
    }
    if i >= chars.len() {
        return None;
    }
    while i < chars.len() && !is_blank(chars[i]) {
        i += 1;
    }
    Some(i - 1)
}

/// Start column of the last word in the line; `line.len()` when blank.
pub fn find_last_word_start(line: &str) -> usize {
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        return 0;
    }
    let mut i = chars.len() - 1;
    while is_blank(chars[i]) {
        if i == 0 {
            return chars.len();
        }
        i -= 1;
    }
    if is_word_char(chars[i]) {
        while i > 0 && is_word_char(chars[i - 1]) {
            i -= 1;
        }
    } else {
        while i > 0 && !is_word_char(chars[i - 1]) && !is_blank(chars[i - 1]) {
            i -= 1;
        }
    }
    i
}

/// Start column of the last WORD; `line.len()` when blank.
pub fn find_last_big_word_start(line: &str) -> usize {
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        return 0;
    }
    let mut i = chars.len() - 1;
    while is_blank(chars[i]) {
        if i == 0 {
            return chars.len();
        }
        i -= 1;
    }
    while i > 0 && !is_blank(chars[i - 1]) {
        i -= 1;
    }
    i
}

/// Maximal safe backward reach at `(line, col)` of the region (region-local
/// coordinates). Interior lines always allow full lines; the first line
/// grades by how far past its leading word(s) the position sits, capped by
/// what the region's left edge permits.
pub fn compute_back_reach(
    line: usize,
    col: usize,
    line_str: &str,
    boundary: ReachLevel,
) -> ReachLevel {
    if line > 0 {
        return ReachLevel::Line;
    }
    if col == 0 {
        return ReachLevel::None;
    }

    let first_word_end = find_first_word_end(line_str);
    let first_big_word_end = find_first_big_word_end(line_str);

    // Past the first WORD: WORD-scoped deletes land inside the region, only
    // line-scoped ones touch the edge.
    if let Some(end) = first_big_word_end
        && col > end + 1
    {
        return ReachLevel::Line.min(boundary.max(ReachLevel::BigWord));
    }
    // Past the first word but within the first WORD.
    if let Some(end) = first_word_end
        && col > end + 1
    {
        return ReachLevel::BigWord.min(boundary.max(ReachLevel::Word));
    }
    // Inside the first word: only single characters are free.
    ReachLevel::Word.min(boundary.max(ReachLevel::Char))
}

/// Forward counterpart of [`compute_back_reach`], graded against the last
/// line's trailing word(s).
pub fn compute_forward_reach(
    line: usize,
    col: usize,
    line_str: &str,
    last_line: usize,
    boundary: ReachLevel,
) -> ReachLevel {
    let len = line_str.chars().count();
    if line < last_line {
        return ReachLevel::Line;
    }
    if col >= len {
        return ReachLevel::None;
    }

    let last_word_start = find_last_word_start(line_str);
    let last_big_word_start = find_last_big_word_start(line_str);

    if col < last_big_word_start {
        return ReachLevel::Line.min(boundary.max(ReachLevel::BigWord));
    }
    if col < last_word_start {
        return ReachLevel::BigWord.min(boundary.max(ReachLevel::Word));
    }
    ReachLevel::Word.min(boundary.max(ReachLevel::Char))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_total() {
        assert!(ReachLevel::None < ReachLevel::Char);
        assert!(ReachLevel::Char < ReachLevel::Word);
        assert!(ReachLevel::Word < ReachLevel::BigWord);
        assert!(ReachLevel::BigWord < ReachLevel::Line);
    }

    #[test]
    fn word_scans() {
        assert_eq!(find_first_word_end("foo bar"), Some(2));
        assert_eq!(find_first_word_end("  foo"), Some(4));
        assert_eq!(find_first_word_end("--x"), Some(1));
        assert_eq!(find_first_word_end("   "), None);
        assert_eq!(find_first_big_word_end("foo-x bar"), Some(4));
        assert_eq!(find_last_word_start("foo bar"), 4);
        assert_eq!(find_last_big_word_start("foo bar-baz"), 4);
        assert_eq!(find_last_word_start("   "), 3);
    }

    #[test]
    fn interior_lines_are_line_level() {
        assert_eq!(
            compute_back_reach(2, 0, "anything", ReachLevel::Char),
            ReachLevel::Line
        );
        assert_eq!(
            compute_forward_reach(0, 0, "anything", 2, ReachLevel::Char),
            ReachLevel::Line
        );
    }

    #[test]
    fn first_line_grades_by_position() {
        // "foo-bar baz qux": first word ends at 2, first WORD at 6.
        let line = "foo-bar baz qux";
        // At column 0: nothing backward.
        assert_eq!(
            compute_back_reach(0, 0, line, ReachLevel::Line),
            ReachLevel::None
        );
        // Inside the first word with a line-edge boundary: word-level safe.
        assert_eq!(
            compute_back_reach(0, 2, line, ReachLevel::Line),
            ReachLevel::Word
        );
        // Inside the first word with a cut-word boundary: chars only.
        assert_eq!(
            compute_back_reach(0, 2, line, ReachLevel::Char),
            ReachLevel::Char
        );
        // Past the first word, inside the first WORD.
        assert_eq!(
            compute_back_reach(0, 5, line, ReachLevel::Line),
            ReachLevel::BigWord
        );
        // Word-level deletes stay free even with a restrictive edge.
        assert_eq!(
            compute_back_reach(0, 5, line, ReachLevel::Char),
            ReachLevel::Word
        );
        // Past the first WORD.
        assert_eq!(
            compute_back_reach(0, 13, line, ReachLevel::Line),
            ReachLevel::Line
        );
        assert_eq!(
            compute_back_reach(0, 13, line, ReachLevel::Char),
            ReachLevel::BigWord
        );
    }

    #[test]
    fn forward_mirrors_backward() {
        // "foo bar-baz": last word "baz" starts at 8, last WORD at 4.
        let line = "foo bar-baz";
        // Inside the last word.
        assert_eq!(
            compute_forward_reach(0, 9, line, 0, ReachLevel::Line),
            ReachLevel::Word
        );
        // Inside the last WORD, before the last word.
        assert_eq!(
            compute_forward_reach(0, 5, line, 0, ReachLevel::Line),
            ReachLevel::BigWord
        );
        // Before the last WORD.
        assert_eq!(
            compute_forward_reach(0, 2, line, 0, ReachLevel::Line),
            ReachLevel::Line
        );
        // Past end of line: nothing forward.
        assert_eq!(
            compute_forward_reach(0, 11, line, 0, ReachLevel::Line),
            ReachLevel::None
        );
    }

    #[test]
    fn boundary_reach_from_flags() {
        let open = EditBoundary::default();
        assert_eq!(back_boundary_reach(&open), ReachLevel::Line);
        assert_eq!(forward_boundary_reach(&open), ReachLevel::Line);
        let cut = EditBoundary {
            starts_mid_line: true,
            starts_mid_big_word: true,
            starts_mid_word: true,
            ..Default::default()
        };
        assert_eq!(back_boundary_reach(&cut), ReachLevel::Char);
        let word_edge = EditBoundary {
            starts_mid_line: true,
            ..Default::default()
        };
        assert_eq!(back_boundary_reach(&word_edge), ReachLevel::BigWord);
    }
}
