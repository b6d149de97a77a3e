//! Semantic parsing of motion strings.
//!
//! This is the *meaning* side of a command string: `"3w"` is one motion with
//! a count, `"fa;;"` is one find motion with two repeats. Physical-key
//! tokenization (what the fingers press) lives in `core-keyboard`.

use crate::motion::apply_motion;
use core_text::{Lines, Mode, Position};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown motion at position {pos} near '{preview}'")]
    UnknownMotion { pos: usize, preview: String },
}

/// One parsed motion with an optional count. A count of `None` is distinct
/// from 1 (`1{motion}` is not always `{motion}`), hence not a plain default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMotion {
    pub motion: String,
    pub count: Option<u32>,
}

impl ParsedMotion {
    pub fn new(motion: impl Into<String>) -> Self {
        Self {
            motion: motion.into(),
            count: None,
        }
    }

    pub fn with_count(motion: impl Into<String>, count: u32) -> Self {
        Self {
            motion: motion.into(),
            count: Some(count),
        }
    }

    pub fn effective_count(&self) -> u32 {
        self.count.unwrap_or(1)
    }
}

/// Motions the parser recognizes, longest first so `"gg"` wins over `"g"`.
/// The bracketed scroll motions are parseable (user transcripts contain
/// them) but simulate as no-ops.
const MOTION_TOKENS: &[&str] = &[
    "<C-b>", "<C-d>", "<C-f>", "<C-u>", "gg", "ge", "gE", "h", "j", "k", "l", "0", "^", "$", "w",
    "W", "b", "B", "e", "E", "G", "{", "}", "(", ")",
];

/// Split a motion sequence into parsed motions. `f/F/t/T` consume the next
/// character as their target and greedily absorb trailing `;`/`,` repeats.
pub fn parse_motions(seq: &str) -> Result<Vec<ParsedMotion>, ParseError> {
    let chars: Vec<char> = seq.chars().collect();
    let mut result = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Count prefix: 1-9 then digits. A leading '0' is the motion '0'.
        let mut count = None;
        if c.is_ascii_digit() && c != '0' {
            let mut value: u32 = 0;
            while i < chars.len() && chars[i].is_ascii_digit() {
                value = value
                    .saturating_mul(10)
                    .saturating_add(chars[i] as u32 - '0' as u32);
                i += 1;
            }
            count = Some(value.min(999_999));
            if i >= chars.len() {
                return Err(ParseError::UnknownMotion {
                    pos: seq.len(),
                    preview: String::new(),
                });
            }
        }

        let c = chars[i];
        // f/F/t/T take a target character, then max-munch ;/, repeats.
        if matches!(c, 'f' | 'F' | 't' | 'T') && i + 1 < chars.len() {
            let start = i;
            i += 2;
            while i < chars.len() && matches!(chars[i], ';' | ',') {
                i += 1;
            }
            let motion: String = chars[start..i].iter().collect();
            result.push(ParsedMotion {
                motion,
                count,
            });
            continue;
        }

        // Longest match over the fixed tokens.
        let rest: String = chars[i..].iter().collect();
        match MOTION_TOKENS.iter().find(|t| rest.starts_with(**t)) {
            Some(token) => {
                result.push(ParsedMotion {
                    motion: (*token).to_string(),
                    count,
                });
                i += token.chars().count();
            }
            None => {
                return Err(ParseError::UnknownMotion {
                    pos: i,
                    preview: rest.chars().take(8).collect(),
                });
            }
        }
    }
    Ok(result)
}

/// Apply one parsed motion (count times) to the cursor.
pub fn apply_parsed_motion(lines: &Lines, pos: &mut Position, parsed: &ParsedMotion) {
    for _ in 0..parsed.effective_count() {
        apply_motion(lines, pos, &parsed.motion);
    }
}

/// Parse and apply a whole motion sequence, returning the resulting cursor
/// and (unchanged) mode.
pub fn simulate_motions(
    seq: &str,
    lines: &Lines,
    start: Position,
    mode: Mode,
) -> Result<(Position, Mode), ParseError> {
    let mut pos = start;
    for parsed in parse_motions(seq)? {
        apply_parsed_motion(lines, &mut pos, &parsed);
    }
    Ok((pos, mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn counts_and_multichar_motions() {
        let parsed = parse_motions("3w5jgg2ge").unwrap();
        assert_eq!(parsed, vec![
            ParsedMotion::with_count("w", 3),
            ParsedMotion::with_count("j", 5),
            ParsedMotion::new("gg"),
            ParsedMotion::with_count("ge", 2),
        ]);
    }

    #[test]
    fn find_motions_absorb_repeats() {
        let parsed = parse_motions("fa;;Tb,w").unwrap();
        assert_eq!(parsed, vec![
            ParsedMotion::new("fa;;"),
            ParsedMotion::new("Tb,"),
            ParsedMotion::new("w"),
        ]);
    }

    #[test]
    fn leading_zero_is_line_start() {
        let parsed = parse_motions("10j0").unwrap();
        assert_eq!(parsed, vec![
            ParsedMotion::with_count("j", 10),
            ParsedMotion::new("0"),
        ]);
    }

    #[test]
    fn scroll_motions_parse() {
        assert!(parse_motions("<C-d><C-u><C-f><C-b>").is_ok());
    }

    #[test]
    fn unknown_motion_reports_position() {
        let err = parse_motions("wwq").unwrap_err();
        assert_eq!(err, ParseError::UnknownMotion {
            pos: 2,
            preview: "q".to_string()
        });
        assert!(parse_motions("x").is_err());
        assert!(parse_motions("<C-x>").is_err());
        assert!(parse_motions("<C-d").is_err());
    }

    #[test]
    fn trailing_count_is_an_error() {
        assert!(parse_motions("w3").is_err());
    }

    #[test]
    fn counted_motion_applies_repeatedly() {
        let lines = core_text::Lines::from_strs(&["a b c d e"]);
        let (pos, _) =
            simulate_motions("3w", &lines, Position::origin(), Mode::Normal).unwrap();
        assert_eq!(pos.col, 6);
    }
}
