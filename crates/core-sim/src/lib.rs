//! Pure modal-editor simulator.
//!
//! Every supported command is a pure transition on `(buffer, cursor, mode)`.
//! Motions never touch the buffer; edits may. Commands that would fall off
//! the buffer clamp silently; commands the simulator does not know are logged
//! at debug level and leave the state unchanged, so a search treats them as
//! no-ops that the closed set immediately prunes.

pub mod edit;
pub mod motion;
pub mod parse;
pub mod replay;
pub mod textobject;

pub use edit::{apply_edit, insert_text_at};
pub use motion::apply_motion;
pub use parse::{parse_motions, simulate_motions, ParseError, ParsedMotion};
pub use replay::{replay_commands, ReplayError};

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::{Lines, Mode, Position};
    use proptest::prelude::*;

    // Motion clamping invariant: after any single motion the cursor is on a
    // valid cell: line < line_count and col <= max(0, len - 1).
    proptest! {
        #[test]
        fn motions_clamp_to_valid_cells(
            text in proptest::collection::vec("[ a-z.!?()]{0,12}", 1..6),
            line in 0usize..6,
            col in 0usize..14,
            motion_idx in 0usize..21,
        ) {
            let motions = [
                "h", "j", "k", "l", "0", "^", "$", "w", "W", "b", "B", "e",
                "E", "ge", "gE", "gg", "G", "{", "}", "(", ")",
            ];
            let lines = Lines::new(text);
            let mut pos = lines.clamp(Position::new(line.min(lines.len() - 1), col));
            apply_motion(&lines, &mut pos, motions[motion_idx]);
            prop_assert!(pos.line < lines.len());
            prop_assert!(pos.col <= lines.line_len(pos.line).saturating_sub(1));
        }
    }

    #[test]
    fn simulate_composes_parse_and_apply() {
        let lines = Lines::from_strs(&["the quick brown fox"]);
        let end = simulate_motions("we", &lines, Position::origin(), Mode::Normal).unwrap();
        // w -> "quick" (col 4), e -> end of "quick" (col 8)
        assert_eq!(end.0, Position::new(0, 8));
        assert_eq!(end.1, Mode::Normal);
    }
}
