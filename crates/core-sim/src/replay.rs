//! Replay a full command string against a buffer, tracking mode transitions.
//!
//! This is the consistency oracle for search results: a returned sequence is
//! correct exactly when replaying it over the start buffer reproduces the end
//! buffer. The grammar covers everything the searches emit: counts, motions
//! (including `f{c};;` groups), operators with motions and text objects,
//! single-key edits, and Insert-mode typing with bracketed special keys.

use crate::edit::apply_edit;
use crate::motion::apply_motion;
use crate::parse::{apply_parsed_motion, ParsedMotion};
use core_text::{Lines, Mode, Position};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("unexpected input at position {pos} near '{preview}'")]
    Unexpected { pos: usize, preview: String },
    #[error("truncated command at position {pos}")]
    Truncated { pos: usize },
}

const SINGLE_MOTIONS: &[char] = &[
    'h', 'j', 'k', 'l', 'w', 'W', 'b', 'B', 'e', 'E', '0', '^', '$', '{', '}', '(', ')',
];

const SINGLE_EDITS: &[char] = &[
    'x', 'X', '~', 'D', 'C', 'J', 'o', 'O', 's', 'S', 'i', 'I', 'a', 'A',
];

fn err_at(chars: &[char], i: usize) -> ReplayError {
    ReplayError::Unexpected {
        pos: i,
        preview: chars[i..].iter().take(8).collect(),
    }
}

/// One Normal-mode motion token starting at `i` (after any count): returns
/// the motion string and characters consumed, or `None` when it is not a
/// motion.
fn take_motion(chars: &[char], i: usize) -> Option<(String, usize)> {
    let c = *chars.get(i)?;
    if matches!(c, 'f' | 'F' | 't' | 'T') {
        let target = *chars.get(i + 1)?;
        let mut len = 2;
        let mut motion = format!("{c}{target}");
        while let Some(&rep) = chars.get(i + len) {
            if rep == ';' || rep == ',' {
                motion.push(rep);
                len += 1;
            } else {
                break;
            }
        }
        return Some((motion, len));
    }
    if c == 'g' {
        let next = *chars.get(i + 1)?;
        if matches!(next, 'g' | 'e' | 'E') {
            return Some((format!("g{next}"), 2));
        }
        return None;
    }
    if SINGLE_MOTIONS.contains(&c) {
        return Some((c.to_string(), 1));
    }
    None
}

/// Replay `seq` in place. The caller owns the starting state; motions,
/// edits, and typed text all flow through the same simulator the optimizers
/// used.
pub fn replay_commands(
    seq: &str,
    lines: &mut Lines,
    pos: &mut Position,
    mode: &mut Mode,
) -> Result<(), ReplayError> {
    let chars: Vec<char> = seq.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match *mode {
            Mode::Insert => {
                if chars[i] == '<' {
                    let close = chars[i..]
                        .iter()
                        .position(|&c| c == '>')
                        .ok_or(ReplayError::Truncated { pos: i })?;
                    let token: String = chars[i..=i + close].iter().collect();
                    apply_edit(lines, pos, mode, &token, 1).map_err(|_| err_at(&chars, i))?;
                    i += close + 1;
                } else {
                    crate::edit::insert_text_at(lines, pos, Mode::Insert, &chars[i].to_string());
                    i += 1;
                }
            }
            Mode::Normal => {
                let c = chars[i];

                // Count prefix (a bare '0' is the line-start motion).
                if c.is_ascii_digit() && c != '0' {
                    let mut count: u32 = 0;
                    let start = i;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        count = count
                            .saturating_mul(10)
                            .saturating_add(chars[i] as u32 - '0' as u32);
                        i += 1;
                    }
                    let (motion, len) =
                        take_motion(&chars, i).ok_or_else(|| err_at(&chars, start))?;
                    apply_parsed_motion(lines, pos, &ParsedMotion::with_count(motion, count));
                    i += len;
                    continue;
                }

                // Operators: dd/cc, text objects, motions.
                if matches!(c, 'd' | 'c' | 'y') {
                    let next = *chars.get(i + 1).ok_or(ReplayError::Truncated { pos: i })?;
                    let (cmd, len) = if next == c {
                        (format!("{c}{next}"), 2)
                    } else if matches!(next, 'i' | 'a') {
                        let obj = *chars
                            .get(i + 2)
                            .ok_or(ReplayError::Truncated { pos: i })?;
                        (format!("{c}{next}{obj}"), 3)
                    } else if let Some((motion, len)) = take_motion(&chars, i + 1) {
                        (format!("{c}{motion}"), 1 + len)
                    } else {
                        return Err(err_at(&chars, i));
                    };
                    apply_edit(lines, pos, mode, &cmd, 1).map_err(|_| err_at(&chars, i))?;
                    i += len;
                    continue;
                }

                if c == 'r' {
                    let target = *chars.get(i + 1).ok_or(ReplayError::Truncated { pos: i })?;
                    apply_edit(lines, pos, mode, &format!("r{target}"), 1)
                        .map_err(|_| err_at(&chars, i))?;
                    i += 2;
                    continue;
                }

                if c == 'g' {
                    let next = *chars.get(i + 1).ok_or(ReplayError::Truncated { pos: i })?;
                    if next == 'J' {
                        apply_edit(lines, pos, mode, "gJ", 1).map_err(|_| err_at(&chars, i))?;
                        i += 2;
                        continue;
                    }
                    // gg / ge / gE fall through to the motion path.
                }

                if let Some((motion, len)) = take_motion(&chars, i) {
                    apply_motion(lines, pos, &motion);
                    i += len;
                    continue;
                }

                if SINGLE_EDITS.contains(&c) {
                    apply_edit(lines, pos, mode, &c.to_string(), 1)
                        .map_err(|_| err_at(&chars, i))?;
                    i += 1;
                    continue;
                }

                return Err(err_at(&chars, i));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(seq: &str, start: &[&str]) -> (Lines, Position, Mode) {
        let mut lines = Lines::from_strs(start);
        let mut pos = Position::origin();
        let mut mode = Mode::Normal;
        replay_commands(seq, &mut lines, &mut pos, &mut mode).unwrap();
        (lines, pos, mode)
    }

    #[test]
    fn motions_and_counts() {
        let (lines, pos, mode) = run("2w", &["aa bb cc"]);
        assert_eq!(lines, Lines::from_strs(&["aa bb cc"]));
        assert_eq!(pos, Position::new(0, 6));
        assert_eq!(mode, Mode::Normal);
    }

    #[test]
    fn mode_change_mid_sequence() {
        let (lines, pos, mode) = run("ciwnew<Esc>", &["old text"]);
        assert_eq!(lines, Lines::from_strs(&["new text"]));
        assert_eq!(mode, Mode::Normal);
        assert_eq!(pos, Position::new(0, 2));
    }

    #[test]
    fn join_and_find() {
        let (lines, _, _) = run("J", &["aaa", "bbb"]);
        assert_eq!(lines, Lines::from_strs(&["aaa bbb"]));
        let (_, pos, _) = run("fb;", &["abab"]);
        assert_eq!(pos.col, 3);
    }

    #[test]
    fn operator_forms() {
        let (lines, _, _) = run("dfc", &["abcdef"]);
        assert_eq!(lines, Lines::from_strs(&["def"]));
        let (lines, _, mode) = run("cE", &["foo-bar baz"]);
        assert_eq!(lines, Lines::from_strs(&[" baz"]));
        assert_eq!(mode, Mode::Insert);
    }

    #[test]
    fn insert_mode_special_keys() {
        let (lines, _, mode) = run("ixy<BS>z<Esc>", &["_"]);
        assert_eq!(lines, Lines::from_strs(&["xz_"]));
        assert_eq!(mode, Mode::Normal);
    }

    #[test]
    fn replace_and_toggle() {
        let (lines, _, _) = run("rZ~", &["ab"]);
        // r leaves the cursor in place; ~ then toggles the same cell.
        assert_eq!(lines, Lines::from_strs(&["zb"]));
    }

    #[test]
    fn rejects_garbage() {
        let mut lines = Lines::from_strs(&["a"]);
        let mut pos = Position::origin();
        let mut mode = Mode::Normal;
        assert!(replay_commands("q", &mut lines, &mut pos, &mut mode).is_err());
        assert!(replay_commands("d", &mut lines, &mut pos, &mut mode).is_err());
        assert!(replay_commands("3", &mut lines, &mut pos, &mut mode).is_err());
    }
}
