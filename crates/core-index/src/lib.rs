//! Precomputed landing positions for count-prefixed motions.
//!
//! One forward scan classifies every character transition into six sorted
//! vectors (word/WORD begins and ends, paragraph boundaries, sentence
//! starts). With them, "how many `w` presses reach that column" is two binary
//! searches instead of repeated simulation.
//!
//! The first and last non-blank positions of the buffer are injected into
//! every vector as sentinels: spamming a motion eventually pins the cursor at
//! a buffer edge, so count queries always bracket their goal.

use core_text::chars::{
    is_big_word_char, is_blank, is_blank_line, is_sentence_end, is_word_char,
};
use core_text::{Lines, Position};

/// Landing position categories, one sorted vector each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandingType {
    /// `w` / `b`
    WordBegin = 0,
    /// `e` / `ge`
    WordEnd = 1,
    /// `W` / `B`
    WordBeginBig = 2,
    /// `E` / `gE`
    WordEndBig = 3,
    /// `{` / `}`
    Paragraph = 4,
    /// `(` / `)`
    Sentence = 5,
}

const LANDING_TYPE_COUNT: usize = 6;

/// One count-prefixed landing: the position reached and how many motion
/// presses it takes. A count of 0 or 1 is not worth emitting as
/// `{count}{motion}`, so such entries are invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatMotion {
    pub pos: Position,
    pub count: usize,
}

impl RepeatMotion {
    pub fn valid(&self) -> bool {
        self.count > 1
    }
}

/// Sorted landing vectors for one buffer. Immutable after construction.
#[derive(Debug)]
pub struct BufferIndex {
    positions: [Vec<Position>; LANDING_TYPE_COUNT],
}

impl BufferIndex {
    fn get(&self, landing: LandingType) -> &Vec<Position> {
        &self.positions[landing as usize]
    }

    /// Build the index with a single forward scan.
    pub fn new(lines: &Lines) -> Self {
        let mut positions: [Vec<Position>; LANDING_TYPE_COUNT] =
            std::array::from_fn(|_| Vec::new());
        let mut push = |landing: LandingType, line: usize, col: usize| {
            positions[landing as usize].push(Position::new(line, col));
        };

        let mut first_non_blank: Option<Position> = None;
        let mut last_non_blank: Option<Position> = None;
        let mut prev_was_sentence_end = false;
        // Treat the top sentinel as blank so line 0 is a paragraph boundary
        // only when non-blank (first line after a "blank run").
        let mut prev_line_was_blank = true;

        for (line_no, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            let line_blank = is_blank_line(line);

            // Paragraph boundary: blank line, or first non-blank after one.
            if line_blank || prev_line_was_blank {
                push(LandingType::Paragraph, line_no, 0);
            }
            prev_line_was_blank = line_blank;

            if chars.is_empty() {
                prev_was_sentence_end = false;
                continue;
            }

            for (col, &curr) in chars.iter().enumerate() {
                let prev = if col > 0 { Some(chars[col - 1]) } else { None };
                let next = chars.get(col + 1).copied();

                if !is_blank(curr) {
                    if first_non_blank.is_none() {
                        first_non_blank = Some(Position::new(line_no, col));
                    }
                    last_non_blank = Some(Position::new(line_no, col));
                }

                let curr_word = is_word_char(curr);
                let curr_big = is_big_word_char(curr);
                let prev_word = prev.is_some_and(is_word_char);
                let prev_big = prev.is_some_and(is_big_word_char);
                let next_word = next.is_some_and(is_word_char);
                let next_big = next.is_some_and(is_big_word_char);

                // Begins: non-blank whose predecessor is blank or another class.
                if curr_word && (prev.is_none() || prev.is_some_and(is_blank) || !prev_word) {
                    push(LandingType::WordBegin, line_no, col);
                }
                if curr_big && (prev.is_none() || !prev_big) {
                    push(LandingType::WordBeginBig, line_no, col);
                }

                // Ends: non-blank whose successor is blank or another class.
                if curr_word && (next.is_none() || next.is_some_and(is_blank) || !next_word) {
                    push(LandingType::WordEnd, line_no, col);
                }
                if curr_big && (next.is_none() || !next_big) {
                    push(LandingType::WordEndBig, line_no, col);
                }

                // Sentence starts: first non-blank after end punctuation.
                if prev_was_sentence_end && !is_blank(curr) {
                    push(LandingType::Sentence, line_no, col);
                    prev_was_sentence_end = false;
                }
                if is_sentence_end(curr) && (next.is_none() || next.is_some_and(is_blank)) {
                    prev_was_sentence_end = true;
                } else if !is_blank(curr) {
                    prev_was_sentence_end = false;
                }
            }

            if chars.last().copied().is_some_and(is_sentence_end) {
                prev_was_sentence_end = true;
            }
        }

        // Boundary sentinels so count queries always bracket.
        if let (Some(first), Some(last)) = (first_non_blank, last_non_blank) {
            for vec in &mut positions {
                if vec.first() != Some(&first) {
                    vec.insert(0, first);
                }
                if vec.last() != Some(&last) {
                    vec.push(last);
                }
            }
        }

        Self { positions }
    }

    pub fn count(&self, landing: LandingType) -> usize {
        self.get(landing).len()
    }

    /// Land `count` steps away (negative = backward), clamping at the ends.
    pub fn apply(&self, landing: LandingType, current: Position, count: isize) -> Position {
        let positions = self.get(landing);
        if count == 0 || positions.is_empty() {
            return current;
        }
        let mut result = current;
        if count > 0 {
            for _ in 0..count {
                let idx = positions.partition_point(|p| *p <= result);
                if idx >= positions.len() {
                    break;
                }
                result = positions[idx];
            }
        } else {
            for _ in 0..(-count) {
                let idx = positions.partition_point(|p| *p < result);
                if idx == 0 {
                    break;
                }
                result = positions[idx - 1];
            }
        }
        result
    }

    /// The landing just before and just after `goal` in the direction from
    /// `current`, each with the press count from `current`. Entries with
    /// count <= 1 are present but invalid (not worth a count prefix).
    pub fn two_closest(
        &self,
        landing: LandingType,
        current: Position,
        goal: Position,
    ) -> Option<[RepeatMotion; 2]> {
        let positions = self.get(landing);
        if positions.is_empty() {
            return None;
        }

        if goal > current {
            let past_current = positions.partition_point(|p| *p <= current);
            let overshoot = positions.partition_point(|p| *p < goal);
            if overshoot >= positions.len() || overshoot == 0 {
                return None;
            }
            let dist = overshoot.saturating_sub(past_current) + 1;
            Some([
                RepeatMotion {
                    pos: positions[overshoot - 1],
                    count: dist - 1,
                },
                RepeatMotion {
                    pos: positions[overshoot],
                    count: dist,
                },
            ])
        } else {
            // Mirror of the forward case on the reversed vector.
            let past_current = positions.partition_point(|p| *p < current);
            let overshoot = positions.partition_point(|p| *p <= goal);
            if overshoot >= positions.len() || overshoot == 0 {
                return None;
            }
            let dist = past_current.saturating_sub(overshoot) + 1;
            Some([
                RepeatMotion {
                    pos: positions[overshoot],
                    count: dist - 1,
                },
                RepeatMotion {
                    pos: positions[overshoot - 1],
                    count: dist,
                },
            ])
        }
    }
}
