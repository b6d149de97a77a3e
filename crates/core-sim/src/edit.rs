//! Buffer-mutating commands: single-character edits, line operations,
//! operator + motion / text-object forms, and Insert-mode keys.
//!
//! Join/jump semantics follow the modern editor defaults: `J` inserts a
//! single space, `gg`/`G` keep the column.

use crate::motion::apply_motion;
use crate::parse::{parse_motions, ParsedMotion};
use crate::textobject;
use core_text::chars::{first_non_blank_col, is_blank, is_word_char};
use core_text::{Lines, Mode, Position, Range};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("unknown edit '{0}'")]
    UnknownEdit(String),
}

// ---------------------------------------------------------------------------
// Character-indexed string helpers. Columns are character positions, so all
// line surgery goes through these instead of byte slicing.
// ---------------------------------------------------------------------------

fn char_substring(line: &str, start: usize, end: usize) -> String {
    line.chars().skip(start).take(end.saturating_sub(start)).collect()
}

fn remove_char_range(line: &str, start: usize, end: usize) -> String {
    let mut out: String = line.chars().take(start).collect();
    out.extend(line.chars().skip(end));
    out
}

fn insert_at_char(line: &str, idx: usize, text: &str) -> String {
    let mut out: String = line.chars().take(idx).collect();
    out.push_str(text);
    out.extend(line.chars().skip(idx));
    out
}

fn is_valid_position(lines: &Lines, pos: Position) -> bool {
    pos.line < lines.len() && pos.col < lines.line_len(pos.line)
}

// ---------------------------------------------------------------------------
// Range-based operations (operators d, c, y with motions/text objects)
// ---------------------------------------------------------------------------

/// Delete the text in `range`, leaving the cursor at the deletion point.
pub fn delete_range(lines: &mut Lines, range: &Range, pos: &mut Position) {
    let mut r = *range;
    r.normalize();

    if r.linewise {
        let start_line = r.start.line.min(lines.len() - 1);
        let end_line = r.end.line.min(lines.len() - 1);
        lines.drain(start_line..=end_line);
        if lines.is_empty() {
            lines.push(String::new());
        }
        let new_line = start_line.min(lines.len() - 1);
        pos.line = new_line;
        pos.set_col(first_non_blank_col(&lines[new_line]));
        return;
    }

    let start_line = r.start.line.min(lines.len() - 1);
    let end_line = r.end.line.min(lines.len() - 1);
    let start_col = r.start.col;
    let end_col = if r.inclusive { r.end.col + 1 } else { r.end.col };

    if start_line == end_line {
        let len = lines.line_len(start_line);
        let sc = start_col.min(len);
        let ec = end_col.min(len);
        if sc < ec {
            lines[start_line] = remove_char_range(&lines[start_line], sc, ec);
        }
    } else {
        let first_len = lines.line_len(start_line);
        let sc = start_col.min(first_len);
        let last_len = lines.line_len(end_line);
        let ec = end_col.min(last_len);
        let head = char_substring(&lines[start_line], 0, sc);
        let tail = char_substring(&lines[end_line], ec, last_len);
        lines[start_line] = head + &tail;
        lines.drain(start_line + 1..=end_line);
    }

    pos.line = start_line;
    pos.set_col(start_col);
    *pos = lines.clamp(*pos);
}

// ---------------------------------------------------------------------------
// Single character operations
// ---------------------------------------------------------------------------

/// `x`: delete the character under the cursor. No-op at line end.
pub fn delete_char(lines: &mut Lines, pos: &mut Position) {
    if !is_valid_position(lines, *pos) {
        *pos = lines.clamp(*pos);
        return;
    }
    let r = Range::new(*pos, *pos, false, true);
    delete_range(lines, &r, pos);
}

/// `X`: delete the character before the cursor. No-op at column 0.
pub fn delete_char_before(lines: &mut Lines, pos: &mut Position) {
    if pos.col == 0 {
        *pos = lines.clamp(*pos);
        return;
    }
    let before = Position::new(pos.line, pos.col - 1);
    let r = Range::new(before, before, false, true);
    delete_range(lines, &r, pos);
}

/// `r{c}`: replace the character under the cursor in place.
pub fn replace_char(lines: &mut Lines, pos: &mut Position, new_char: char) {
    if !is_valid_position(lines, *pos) {
        *pos = lines.clamp(*pos);
        return;
    }
    let line = &lines[pos.line];
    let replaced: String = line
        .chars()
        .enumerate()
        .map(|(i, c)| if i == pos.col { new_char } else { c })
        .collect();
    lines[pos.line] = replaced;
}

/// `~`: toggle case under the cursor, then step right if possible.
pub fn toggle_case(lines: &mut Lines, pos: &mut Position) {
    if !is_valid_position(lines, *pos) {
        *pos = lines.clamp(*pos);
        return;
    }
    let line = &lines[pos.line];
    let toggled: String = line
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if i != pos.col {
                c
            } else if c.is_uppercase() {
                c.to_lowercase().next().unwrap_or(c)
            } else if c.is_lowercase() {
                c.to_uppercase().next().unwrap_or(c)
            } else {
                c
            }
        })
        .collect();
    lines[pos.line] = toggled;
    if pos.col + 1 < lines.line_len(pos.line) {
        pos.set_col(pos.col + 1);
    }
}

// ---------------------------------------------------------------------------
// Line operations
// ---------------------------------------------------------------------------

/// `dd`: delete the whole current line.
pub fn delete_line(lines: &mut Lines, pos: &mut Position) {
    let line = pos.line.min(lines.len() - 1);
    let r = Range::new(Position::new(line, 0), Position::new(line, 0), true, true);
    delete_range(lines, &r, pos);
}

/// `D`: delete from the cursor to end of line.
pub fn delete_to_end_of_line(lines: &mut Lines, pos: &mut Position) {
    *pos = lines.clamp(*pos);
    let len = lines.line_len(pos.line);
    if len == 0 || pos.col >= len {
        return;
    }
    lines[pos.line] = char_substring(&lines[pos.line], 0, pos.col);
    let len = lines.line_len(pos.line);
    if len > 0 && pos.col >= len {
        pos.set_col(len - 1);
    }
}

/// `J` (`add_space`) / `gJ`: join the next line onto this one. The spaced
/// variant trims trailing blanks here and leading blanks there, inserting a
/// single space; the cursor lands on the join point.
pub fn join_lines(lines: &mut Lines, pos: &mut Position, add_space: bool) {
    let n = lines.len();
    let line_idx = pos.line;
    if line_idx + 1 >= n {
        *pos = lines.clamp(*pos);
        return;
    }

    let mut current: Vec<char> = lines[line_idx].chars().collect();
    if add_space {
        while matches!(current.last(), Some(' ') | Some('\t')) {
            current.pop();
        }
    }
    let mut join_col = current.len();

    let next: Vec<char> = lines[line_idx + 1].chars().collect();
    let mut start = 0;
    while start < next.len() && (next[start] == ' ' || next[start] == '\t') {
        start += 1;
    }

    if add_space && !current.is_empty() && start < next.len() {
        current.push(' ');
        join_col += 1;
    }
    current.extend(&next[start..]);

    lines[line_idx] = current.into_iter().collect();
    lines.remove(line_idx + 1);

    *pos = Position::new(line_idx, join_col.saturating_sub(1));
}

/// `o`: open a new empty line below, cursor on it.
pub fn open_line_below(lines: &mut Lines, pos: &mut Position) {
    let line = pos.line.min(lines.len() - 1);
    lines.insert(line + 1, String::new());
    *pos = Position::new(line + 1, 0);
}

/// `O`: open a new empty line above, cursor on it.
pub fn open_line_above(lines: &mut Lines, pos: &mut Position) {
    let line = pos.line.min(lines.len() - 1);
    lines.insert(line, String::new());
    *pos = Position::new(line, 0);
}

/// `cc`/`S`: clear the line's contents, keeping the line.
pub fn clear_line(lines: &mut Lines, pos: &mut Position) {
    let line = pos.line.min(lines.len() - 1);
    lines[line].clear();
    *pos = Position::new(line, 0);
}

// ---------------------------------------------------------------------------
// Insert mode text manipulation
// ---------------------------------------------------------------------------

/// Insert text (possibly containing newlines) at the cursor, leaving the
/// cursor after the inserted text.
pub fn insert_text(lines: &mut Lines, pos: &mut Position, text: &str) {
    if text.is_empty() {
        return;
    }
    pos.line = pos.line.min(lines.len() - 1);
    pos.col = pos.col.min(lines.line_len(pos.line));

    let parts: Vec<&str> = text.split('\n').collect();
    if parts.len() == 1 {
        lines[pos.line] = insert_at_char(&lines[pos.line], pos.col, text);
        pos.set_col(pos.col + text.chars().count());
        return;
    }

    let original = lines[pos.line].clone();
    let before = char_substring(&original, 0, pos.col);
    let after = char_substring(&original, pos.col, original.chars().count());

    lines[pos.line] = before + parts[0];
    let mut insert_at = pos.line + 1;
    for (i, part) in parts.iter().enumerate().skip(1) {
        if i == parts.len() - 1 {
            lines.insert(insert_at, format!("{part}{after}"));
            *pos = Position::new(insert_at, part.chars().count());
            pos.target_col = pos.col;
        } else {
            lines.insert(insert_at, (*part).to_string());
        }
        insert_at += 1;
    }
}

/// Delete `[start, end)` characterwise (exclusive end), cursor to `start`.
pub fn delete_text(lines: &mut Lines, start: Position, end: Position, pos: &mut Position) {
    let r = Range::new(start, end, false, false);
    delete_range(lines, &r, pos);
}

/// Insert-mode entry point for typed characters (printables and newline).
pub fn insert_text_at(lines: &mut Lines, pos: &mut Position, mode: Mode, text: &str) {
    debug_assert_eq!(mode, Mode::Insert);
    insert_text(lines, pos, text);
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Whether a motion's landing position is included in an operator range.
fn motion_is_inclusive(motion: &str) -> bool {
    matches!(motion.chars().next(), Some('f') | Some('F'))
        || matches!(motion, "e" | "E" | "ge" | "gE" | "$")
}

/// Motions that make an operator act linewise.
fn motion_is_linewise(motion: &str) -> bool {
    matches!(motion, "j" | "k" | "gg" | "G")
}

fn operator_range_from_motion(
    lines: &Lines,
    pos: Position,
    parsed: &ParsedMotion,
) -> Range {
    let mut target = pos;
    for _ in 0..parsed.effective_count() {
        apply_motion(lines, &mut target, &parsed.motion);
    }
    if motion_is_linewise(&parsed.motion) {
        let mut r = Range::new(pos, target, true, true);
        r.normalize();
        r
    } else {
        Range::from_motion(pos, target, motion_is_inclusive(&parsed.motion))
    }
}

fn apply_operator(
    lines: &mut Lines,
    pos: &mut Position,
    mode: &mut Mode,
    op: char,
    range: Range,
) {
    match op {
        'd' => delete_range(lines, &range, pos),
        'c' => {
            if range.linewise {
                // Change keeps the line, clearing its contents.
                let mut r = range;
                r.normalize();
                let start = r.start.line;
                let end = r.end.line.min(lines.len() - 1);
                if end > start {
                    lines.drain(start + 1..=end);
                }
                lines[start].clear();
                *pos = Position::new(start, 0);
            } else {
                delete_range(lines, &range, pos);
            }
            *mode = Mode::Insert;
        }
        'y' => {
            let mut r = range;
            r.normalize();
            if r.linewise {
                pos.line = r.start.line;
                pos.set_col(first_non_blank_col(&lines[r.start.line]));
            } else {
                *pos = r.start;
            }
        }
        _ => unreachable!("operator checked by caller"),
    }
}

/// Apply one edit command in the current mode. Unknown commands fail so a
/// caller enumerating primitives notices immediately.
pub fn apply_edit(
    lines: &mut Lines,
    pos: &mut Position,
    mode: &mut Mode,
    edit: &str,
    count: u32,
) -> Result<(), EditError> {
    let count = count.max(1);

    if *mode == Mode::Normal {
        // r{c}: variable second character.
        if edit.chars().count() == 2 && edit.starts_with('r') {
            let new_char = edit.chars().nth(1).expect("two chars");
            for i in 0..count {
                replace_char(lines, pos, new_char);
                if i + 1 < count && pos.col + 1 < lines.line_len(pos.line) {
                    pos.set_col(pos.col + 1);
                }
            }
            return Ok(());
        }

        match edit {
            "x" => {
                for _ in 0..count {
                    delete_char(lines, pos);
                }
                return Ok(());
            }
            "X" => {
                for _ in 0..count {
                    delete_char_before(lines, pos);
                }
                return Ok(());
            }
            "~" => {
                for _ in 0..count {
                    toggle_case(lines, pos);
                }
                return Ok(());
            }
            "D" => {
                delete_to_end_of_line(lines, pos);
                return Ok(());
            }
            "C" => {
                delete_to_end_of_line(lines, pos);
                *mode = Mode::Insert;
                return Ok(());
            }
            "J" => {
                for _ in 0..count {
                    join_lines(lines, pos, true);
                }
                return Ok(());
            }
            "gJ" => {
                for _ in 0..count {
                    join_lines(lines, pos, false);
                }
                return Ok(());
            }
            "dd" => {
                for _ in 0..count {
                    delete_line(lines, pos);
                }
                return Ok(());
            }
            "cc" | "S" => {
                clear_line(lines, pos);
                *mode = Mode::Insert;
                return Ok(());
            }
            "o" => {
                open_line_below(lines, pos);
                *mode = Mode::Insert;
                return Ok(());
            }
            "O" => {
                open_line_above(lines, pos);
                *mode = Mode::Insert;
                return Ok(());
            }
            "s" => {
                delete_char(lines, pos);
                *mode = Mode::Insert;
                return Ok(());
            }
            "i" => {
                *mode = Mode::Insert;
                return Ok(());
            }
            "I" => {
                pos.set_col(first_non_blank_col(&lines[pos.line]));
                *mode = Mode::Insert;
                return Ok(());
            }
            "a" => {
                let len = lines.line_len(pos.line);
                pos.set_col(if len > 0 { (pos.col + 1).min(len) } else { 0 });
                *mode = Mode::Insert;
                return Ok(());
            }
            "A" => {
                pos.set_col(lines.line_len(pos.line));
                *mode = Mode::Insert;
                return Ok(());
            }
            _ => {}
        }

        // Operator + text object / motion.
        let mut chars = edit.chars();
        if let Some(op @ ('d' | 'c' | 'y')) = chars.next() {
            let rest: String = chars.collect();
            if !rest.is_empty() {
                if let Some(range) = textobject::resolve(lines, *pos, &rest) {
                    apply_operator(lines, pos, mode, op, range);
                    return Ok(());
                }
                if let Ok(parsed) = parse_motions(&rest)
                    && parsed.len() == 1
                {
                    // cw acts like ce when the cursor is on a non-blank:
                    // trailing whitespace is not consumed.
                    let mut parsed = parsed.into_iter().next().expect("len checked");
                    if op == 'c'
                        && matches!(parsed.motion.as_str(), "w" | "W")
                        && lines
                            .char_at(pos.line, pos.col)
                            .is_some_and(|c| !is_blank(c))
                    {
                        parsed.motion = if parsed.motion == "w" {
                            "e".to_string()
                        } else {
                            "E".to_string()
                        };
                    }
                    let range = operator_range_from_motion(lines, *pos, &parsed);
                    apply_operator(lines, pos, mode, op, range);
                    return Ok(());
                }
            }
        }
    }

    if *mode == Mode::Insert {
        match edit {
            "<Esc>" => {
                if pos.col > 0 {
                    pos.set_col(pos.col - 1);
                }
                *mode = Mode::Normal;
                return Ok(());
            }
            "<BS>" => {
                if pos.col == 0 {
                    if pos.line > 0 {
                        let prev_len = lines.line_len(pos.line - 1);
                        let mut join_pos = Position::new(pos.line - 1, 0);
                        join_lines(lines, &mut join_pos, false);
                        *pos = Position::new(join_pos.line, prev_len);
                    }
                } else {
                    let before = Position::new(pos.line, pos.col - 1);
                    delete_text(lines, before, *pos, pos);
                }
                return Ok(());
            }
            "<Del>" => {
                let len = lines.line_len(pos.line);
                if pos.col >= len {
                    if pos.line + 1 < lines.len() {
                        join_lines(lines, pos, false);
                    }
                } else {
                    let mut del_pos = *pos;
                    delete_char(lines, &mut del_pos);
                }
                return Ok(());
            }
            "<CR>" => {
                insert_text(lines, pos, "\n");
                return Ok(());
            }
            "<C-u>" => {
                if pos.col > 0 {
                    delete_text(lines, Position::new(pos.line, 0), *pos, pos);
                }
                return Ok(());
            }
            "<C-w>" => {
                if pos.col > 0 {
                    let chars: Vec<char> = lines[pos.line].chars().collect();
                    let mut col = pos.col - 1;
                    while col > 0 && is_blank(chars[col]) {
                        col -= 1;
                    }
                    if is_word_char(chars[col]) {
                        while col > 0 && is_word_char(chars[col - 1]) {
                            col -= 1;
                        }
                    } else if !is_blank(chars[col]) {
                        while col > 0 && !is_word_char(chars[col - 1]) && !is_blank(chars[col - 1])
                        {
                            col -= 1;
                        }
                    }
                    delete_text(lines, Position::new(pos.line, col), *pos, pos);
                }
                return Ok(());
            }
            _ => {}
        }
    }

    Err(EditError::UnknownEdit(edit.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buf(lines: &[&str]) -> Lines {
        Lines::from_strs(lines)
    }

    fn apply(lines: &mut Lines, pos: &mut Position, mode: &mut Mode, edit: &str) {
        apply_edit(lines, pos, mode, edit, 1).unwrap();
    }

    #[test]
    fn x_and_count_deletes() {
        let mut lines = buf(&["hello world"]);
        let mut pos = Position::new(0, 5);
        let mut mode = Mode::Normal;
        apply_edit(&mut lines, &mut pos, &mut mode, "x", 6).unwrap();
        assert_eq!(lines[0], "hello");
        assert_eq!(pos.col, 4);
    }

    #[test]
    fn capital_x_deletes_backward() {
        let mut lines = buf(&["abcdef"]);
        let mut pos = Position::new(0, 4);
        let mut mode = Mode::Normal;
        apply_edit(&mut lines, &mut pos, &mut mode, "X", 2).unwrap();
        assert_eq!(lines[0], "abef");
        assert_eq!(pos.col, 2); // still on 'e'
        // At column 0 it is a no-op.
        pos = Position::origin();
        apply_edit(&mut lines, &mut pos, &mut mode, "X", 1).unwrap();
        assert_eq!(lines[0], "abef");
    }

    #[test]
    fn tilde_toggles_and_advances() {
        let mut lines = buf(&["abC"]);
        let mut pos = Position::origin();
        let mut mode = Mode::Normal;
        apply(&mut lines, &mut pos, &mut mode, "~");
        assert_eq!(lines[0], "AbC");
        assert_eq!(pos.col, 1);
        apply_edit(&mut lines, &mut pos, &mut mode, "~", 2).unwrap();
        assert_eq!(lines[0], "ABc");
    }

    #[test]
    fn join_inserts_single_space() {
        let mut lines = buf(&["aaa  ", "  bbb"]);
        let mut pos = Position::origin();
        let mut mode = Mode::Normal;
        apply(&mut lines, &mut pos, &mut mode, "J");
        assert_eq!(lines.0, vec!["aaa bbb".to_string()]);
        assert_eq!(pos.col, 3); // on the inserted space
    }

    #[test]
    fn gj_joins_without_space() {
        let mut lines = buf(&["aaa", "bbb"]);
        let mut pos = Position::origin();
        let mut mode = Mode::Normal;
        apply(&mut lines, &mut pos, &mut mode, "gJ");
        assert_eq!(lines.0, vec!["aaabbb".to_string()]);
    }

    #[test]
    fn dd_on_last_line_keeps_one_line() {
        let mut lines = buf(&["only"]);
        let mut pos = Position::origin();
        let mut mode = Mode::Normal;
        apply(&mut lines, &mut pos, &mut mode, "dd");
        assert_eq!(lines.0, vec![String::new()]);
    }

    #[test]
    fn c_and_d_to_end_of_line() {
        let mut lines = buf(&["hello world"]);
        let mut pos = Position::new(0, 5);
        let mut mode = Mode::Normal;
        apply(&mut lines, &mut pos, &mut mode, "C");
        assert_eq!(lines[0], "hello");
        assert_eq!(mode, Mode::Insert);
    }

    #[test]
    fn insert_mode_entries_position_cursor() {
        let mut lines = buf(&["  text"]);
        let mut pos = Position::new(0, 4);
        let mut mode = Mode::Normal;
        apply(&mut lines, &mut pos, &mut mode, "I");
        assert_eq!((pos.col, mode), (2, Mode::Insert));
        mode = Mode::Normal;
        apply(&mut lines, &mut pos, &mut mode, "A");
        assert_eq!(pos.col, 6);
        mode = Mode::Normal;
        pos = Position::new(0, 2);
        apply(&mut lines, &mut pos, &mut mode, "a");
        assert_eq!(pos.col, 3);
    }

    #[test]
    fn operator_with_word_motion() {
        let mut lines = buf(&["foo bar baz"]);
        let mut pos = Position::origin();
        let mut mode = Mode::Normal;
        apply(&mut lines, &mut pos, &mut mode, "dw");
        assert_eq!(lines[0], "bar baz");
        assert_eq!(mode, Mode::Normal);
    }

    #[test]
    fn change_word_behaves_like_change_to_word_end() {
        let mut lines = buf(&["foo bar"]);
        let mut pos = Position::origin();
        let mut mode = Mode::Normal;
        apply(&mut lines, &mut pos, &mut mode, "cw");
        assert_eq!(lines[0], " bar");
        assert_eq!(mode, Mode::Insert);
    }

    #[test]
    fn operator_with_find_motion_is_inclusive() {
        let mut lines = buf(&["abcdef"]);
        let mut pos = Position::origin();
        let mut mode = Mode::Normal;
        apply(&mut lines, &mut pos, &mut mode, "dfd");
        assert_eq!(lines[0], "ef");
    }

    #[test]
    fn operator_with_backward_motion() {
        let mut lines = buf(&["foo bar"]);
        let mut pos = Position::new(0, 4);
        let mut mode = Mode::Normal;
        apply(&mut lines, &mut pos, &mut mode, "db");
        assert_eq!(lines[0], "bar");
        assert_eq!(pos.col, 0);
    }

    #[test]
    fn operator_with_text_object() {
        let mut lines = buf(&["foo (bar) baz"]);
        let mut pos = Position::new(0, 6);
        let mut mode = Mode::Normal;
        apply(&mut lines, &mut pos, &mut mode, "di(");
        assert_eq!(lines[0], "foo () baz");
        let mut lines = buf(&["foo bar baz"]);
        let mut pos = Position::new(0, 5);
        apply(&mut lines, &mut pos, &mut mode, "daw");
        assert_eq!(lines[0], "foo baz");
    }

    #[test]
    fn linewise_operator_motion() {
        let mut lines = buf(&["a", "b", "c"]);
        let mut pos = Position::origin();
        let mut mode = Mode::Normal;
        apply(&mut lines, &mut pos, &mut mode, "dj");
        assert_eq!(lines.0, vec!["c".to_string()]);
    }

    #[test]
    fn insert_mode_backspace_joins_lines() {
        let mut lines = buf(&["ab", "cd"]);
        let mut pos = Position::new(1, 0);
        let mut mode = Mode::Insert;
        apply(&mut lines, &mut pos, &mut mode, "<BS>");
        assert_eq!(lines.0, vec!["abcd".to_string()]);
        assert_eq!((pos.line, pos.col), (0, 2));
    }

    #[test]
    fn insert_mode_cr_splits_line() {
        let mut lines = buf(&["abcd"]);
        let mut pos = Position::new(0, 2);
        let mut mode = Mode::Insert;
        apply(&mut lines, &mut pos, &mut mode, "<CR>");
        assert_eq!(lines.0, vec!["ab".to_string(), "cd".to_string()]);
        assert_eq!((pos.line, pos.col), (1, 0));
    }

    #[test]
    fn ctrl_u_deletes_to_line_start() {
        let mut lines = buf(&["hello world"]);
        let mut pos = Position::new(0, 6);
        let mut mode = Mode::Insert;
        apply(&mut lines, &mut pos, &mut mode, "<C-u>");
        assert_eq!(lines[0], "world");
        assert_eq!(pos.col, 0);
    }

    #[test]
    fn ctrl_w_deletes_word_before() {
        let mut lines = buf(&["foo bar "]);
        let mut pos = Position::new(0, 8);
        let mut mode = Mode::Insert;
        apply(&mut lines, &mut pos, &mut mode, "<C-w>");
        assert_eq!(lines[0], "foo ");
        apply(&mut lines, &mut pos, &mut mode, "<C-w>");
        assert_eq!(lines[0], "");
    }

    #[test]
    fn esc_steps_left_and_returns_to_normal() {
        let mut lines = buf(&["ab"]);
        let mut pos = Position::new(0, 2);
        let mut mode = Mode::Insert;
        apply(&mut lines, &mut pos, &mut mode, "<Esc>");
        assert_eq!((pos.col, mode), (1, Mode::Normal));
    }

    #[test]
    fn typing_inserts_text() {
        let mut lines = buf(&["fooar"]);
        let mut pos = Position::new(0, 3);
        insert_text_at(&mut lines, &mut pos, Mode::Insert, "b");
        assert_eq!(lines[0], "foobar");
        assert_eq!(pos.col, 4);
    }

    #[test]
    fn multi_line_insert() {
        let mut lines = buf(&["abef"]);
        let mut pos = Position::new(0, 2);
        insert_text(&mut lines, &mut pos, "cd\ngh");
        assert_eq!(lines.0, vec!["abcd".to_string(), "ghef".to_string()]);
        assert_eq!((pos.line, pos.col), (1, 2));
    }

    #[test]
    fn unknown_edit_errors() {
        let mut lines = buf(&["a"]);
        let mut pos = Position::origin();
        let mut mode = Mode::Normal;
        assert!(apply_edit(&mut lines, &mut pos, &mut mode, "Q", 1).is_err());
    }
}
