//! Normal-mode cursor motions.
//!
//! Column semantics: horizontal motions go through [`Position::set_col`] so
//! the sticky target column follows; vertical motions assign `col` directly,
//! restored from `target_col` and clamped to the new line.

use core_text::chars::{
    first_non_blank_col, is_big_word_char, is_blank, is_blank_line, is_sentence_closer,
    is_sentence_end, is_word_char,
};
use core_text::{Lines, Position};

/// Apply one motion. Unknown motions are logged and leave the cursor alone.
pub fn apply_motion(lines: &Lines, pos: &mut Position, motion: &str) {
    match motion {
        "h" => move_col(lines, pos, -1),
        "l" => move_col(lines, pos, 1),
        "j" => move_line(lines, pos, 1),
        "k" => move_line(lines, pos, -1),
        "0" => pos.set_col(0),
        "$" => {
            let len = lines.line_len(pos.line);
            pos.set_col(len.saturating_sub(1));
        }
        "^" => {
            let line = &lines[pos.line];
            let col = line
                .chars()
                .position(|c| !c.is_whitespace())
                .unwrap_or(line.chars().count());
            pos.set_col(lines.clamp_col(pos.line, col));
        }
        "gg" => {
            pos.line = 0;
            pos.col = lines.clamp_col(pos.line, pos.col);
        }
        "G" => {
            pos.line = lines.len() - 1;
            pos.col = lines.clamp_col(pos.line, pos.col);
        }
        "w" => motion_w(lines, pos, false),
        "W" => motion_w(lines, pos, true),
        "b" => motion_b(lines, pos, false),
        "B" => motion_b(lines, pos, true),
        "e" => motion_e(lines, pos, false),
        "E" => motion_e(lines, pos, true),
        "ge" => motion_ge(lines, pos, false),
        "gE" => motion_ge(lines, pos, true),
        "{" => motion_paragraph_prev(lines, pos),
        "}" => motion_paragraph_next(lines, pos),
        "(" => motion_sentence_prev(lines, pos),
        ")" => motion_sentence_next(lines, pos),
        _ if motion.len() >= 2 && matches!(&motion[..1], "f" | "F" | "t" | "T") => {
            apply_find_motion(lines, pos, motion);
        }
        _ => {
            tracing::debug!(target: "sim.motion", motion, "motion not supported");
        }
    }
}

/// `f{c}`/`F{c}`/`t{c}`/`T{c}` with optional trailing `;`/`,` repeats
/// (e.g. `"fa;;"`, `"Ta,"`).
fn apply_find_motion(lines: &Lines, pos: &mut Position, motion: &str) {
    let mut chars = motion.chars();
    let cmd = chars.next().expect("checked by caller");
    let Some(target) = chars.next() else { return };
    let forward = cmd == 'f' || cmd == 't';
    let till = cmd == 't' || cmd == 'T';
    let line = &lines[pos.line];

    if let Some(col) = find_char_in_line(target, line, pos.col, forward, till) {
        pos.set_col(col);
    }
    for repeat in chars {
        let repeat_forward = if repeat == ';' { forward } else { !forward };
        if let Some(col) = find_char_in_line(target, line, pos.col, repeat_forward, till) {
            pos.set_col(col);
        }
    }
}

/// Destination column of a single character search, or `None` if the target
/// does not occur. `till` stops one short of the target.
pub fn find_char_in_line(
    target: char,
    line: &str,
    start_col: usize,
    forward: bool,
    till: bool,
) -> Option<usize> {
    let chars: Vec<char> = line.chars().collect();
    if forward {
        for i in start_col + 1..chars.len() {
            if chars[i] == target {
                return Some(if till { i - 1 } else { i });
            }
        }
    } else {
        for i in (0..start_col.min(chars.len())).rev() {
            if chars[i] == target {
                return Some(if till { i + 1 } else { i });
            }
        }
    }
    None
}

pub fn move_col(lines: &Lines, pos: &mut Position, dx: isize) {
    let col = pos.col.saturating_add_signed(dx);
    pos.set_col(lines.clamp_col(pos.line, col));
}

pub fn move_line(lines: &Lines, pos: &mut Position, dy: isize) {
    let line = pos
        .line
        .saturating_add_signed(dy)
        .min(lines.len().saturating_sub(1));
    pos.line = line;
    pos.col = lines.clamp_col(line, pos.target_col);
}

fn word_pred(big: bool) -> fn(char) -> bool {
    if big { is_big_word_char } else { is_word_char }
}

/// `w`/`W`: start of the next word/WORD. Punctuation runs are standalone
/// stops for the small variant; a line wrap counts as a boundary.
pub fn motion_w(lines: &Lines, pos: &mut Position, big: bool) {
    let is_word = word_pred(big);
    let (mut line, mut col) = (pos.line, pos.col);

    let Some(c0) = lines.char_at(line, col) else {
        return;
    };

    if is_blank(c0) {
        // Starting on blank: skip blanks to the next non-blank.
        loop {
            if !lines.step_fwd(&mut line, &mut col) {
                break;
            }
            if !is_blank(lines.char_at(line, col).unwrap_or('\n')) {
                break;
            }
        }
        pos.line = line;
        pos.set_col(col);
        return;
    }

    let in_word = is_word(c0);

    // Skip the current word / anti-word group.
    loop {
        let old_line = line;
        if !lines.step_fwd(&mut line, &mut col) {
            pos.line = line;
            pos.set_col(col);
            return;
        }
        if line != old_line {
            break;
        }
        let c = lines.char_at(line, col).unwrap_or('\n');
        if is_blank(c) || is_word(c) != in_word {
            break;
        }
    }

    let c = lines.char_at(line, col).unwrap_or('\n');
    if !is_blank(c) {
        // Adjacent group start, no intervening whitespace.
        pos.line = line;
        pos.set_col(col);
        return;
    }

    loop {
        if !lines.step_fwd(&mut line, &mut col) {
            break;
        }
        if !is_blank(lines.char_at(line, col).unwrap_or('\n')) {
            break;
        }
    }
    pos.line = line;
    pos.set_col(col);
}

/// `b`/`B`: start of the current word if inside it, else the previous one.
pub fn motion_b(lines: &Lines, pos: &mut Position, big: bool) {
    let is_word = word_pred(big);
    let (mut line, mut col) = (pos.line, pos.col);

    if lines.char_at(line, col).is_none() {
        return;
    }
    // Always step back one character first.
    if !lines.step_back(&mut line, &mut col) {
        return;
    }

    let mut c = lines.char_at(line, col).unwrap_or('\n');
    while is_blank(c) {
        if !lines.step_back(&mut line, &mut col) {
            pos.line = line;
            pos.set_col(col);
            return;
        }
        c = lines.char_at(line, col).unwrap_or('\n');
    }

    let in_word = is_word(c);
    loop {
        let (mut prev_line, mut prev_col) = (line, col);
        if !lines.step_back(&mut prev_line, &mut prev_col) {
            break;
        }
        let pc = lines.char_at(prev_line, prev_col).unwrap_or('\n');
        if is_blank(pc) || is_word(pc) != in_word {
            break;
        }
        line = prev_line;
        col = prev_col;
    }
    pos.line = line;
    pos.set_col(col);
}

/// `e`/`E`: end of the current word if not already there, else the next.
pub fn motion_e(lines: &Lines, pos: &mut Position, big: bool) {
    let is_word = word_pred(big);
    let (mut line, mut col) = (pos.line, pos.col);

    if !lines.step_fwd(&mut line, &mut col) {
        return;
    }
    let mut c = lines.char_at(line, col).unwrap_or('\n');
    while is_blank(c) {
        if !lines.step_fwd(&mut line, &mut col) {
            pos.line = line;
            pos.set_col(col);
            return;
        }
        c = lines.char_at(line, col).unwrap_or('\n');
    }

    let in_word = is_word(c);
    loop {
        let (mut next_line, mut next_col) = (line, col);
        if !lines.step_fwd(&mut next_line, &mut next_col) {
            break;
        }
        if next_line != line {
            break;
        }
        let nc = lines.char_at(next_line, next_col).unwrap_or('\n');
        if is_blank(nc) || is_word(nc) != in_word {
            break;
        }
        line = next_line;
        col = next_col;
    }
    pos.line = line;
    pos.set_col(col);
}

/// `ge`/`gE`: backward to the end of the previous word. A word end is a word
/// character whose successor is blank, a different class, or EOL.
pub fn motion_ge(lines: &Lines, pos: &mut Position, big: bool) {
    let is_word = word_pred(big);
    let (mut line, mut col) = (pos.line, pos.col);

    let is_word_end = |l: usize, c: usize| -> bool {
        let curr = lines.char_at(l, c).unwrap_or('\n');
        if !is_word(curr) {
            return false;
        }
        let (mut nl, mut nc) = (l, c);
        if !lines.step_fwd(&mut nl, &mut nc) || nl != l {
            return true;
        }
        !is_word(lines.char_at(nl, nc).unwrap_or('\n'))
    };

    while lines.step_back(&mut line, &mut col) {
        if is_word_end(line, col) {
            pos.line = line;
            pos.set_col(col);
            return;
        }
    }
}

/// `{`: backward to the previous blank line (or the top of the buffer).
pub fn motion_paragraph_prev(lines: &Lines, pos: &mut Position) {
    pos.line = pos.line.min(lines.len() - 1);
    // Skip a current blank-line run first.
    while pos.line > 0 && is_blank_line(&lines[pos.line]) {
        pos.line -= 1;
    }
    let mut i = pos.line;
    loop {
        if i == 0 {
            pos.line = 0;
            break;
        }
        i -= 1;
        if is_blank_line(&lines[i]) {
            pos.line = i;
            break;
        }
    }
    pos.set_col(0);
}

/// `}`: forward to the next blank line, or the last character of the buffer.
pub fn motion_paragraph_next(lines: &Lines, pos: &mut Position) {
    let n = lines.len();
    pos.line = pos.line.min(n - 1);
    let mut line = pos.line;
    while line < n && is_blank_line(&lines[line]) {
        line += 1;
    }
    if line >= n {
        pos.line = n - 1;
        pos.set_col(0);
        return;
    }
    let mut i = line + 1;
    while i < n && !is_blank_line(&lines[i]) {
        i += 1;
    }
    if i < n {
        pos.line = i;
        pos.set_col(0);
    } else {
        pos.line = n - 1;
        pos.set_col(lines.line_len(pos.line).saturating_sub(1));
    }
}

/// Sentence end at `(line, col)`: `.`/`!`/`?`, then optional closers, then
/// whitespace or EOL.
fn is_sentence_end_at(lines: &Lines, line: usize, col: usize) -> bool {
    let Some(c) = lines.char_at(line, col) else {
        return false;
    };
    if !is_sentence_end(c) {
        return false;
    }
    let (mut l, mut k) = (line, col);
    loop {
        let (mut nl, mut nk) = (l, k);
        if !lines.step_fwd(&mut nl, &mut nk) {
            return true; // EOF after punctuation
        }
        if nl != l {
            return true; // EOL after punctuation/closers
        }
        let d = lines.char_at(nl, nk).unwrap_or('\n');
        if is_sentence_closer(d) {
            l = nl;
            k = nk;
            continue;
        }
        return d == ' ' || d == '\t';
    }
}

/// Skip closers (same line only), then spaces/tabs and blank lines, landing
/// on the first character of the next sentence. `None` past the buffer end.
fn skip_to_sentence_start(lines: &Lines, mut l: usize, mut k: usize) -> Option<(usize, usize)> {
    let n = lines.len();
    loop {
        let c = lines.char_at(l, k).unwrap_or('\n');
        if !is_sentence_closer(c) {
            break;
        }
        let (mut tl, mut tk) = (l, k);
        if !lines.step_fwd(&mut tl, &mut tk) || tl != l {
            break;
        }
        l = tl;
        k = tk;
    }
    loop {
        if l >= n {
            return None;
        }
        if is_blank_line(&lines[l]) || lines.line_len(l) == 0 {
            l += 1;
            k = 0;
            continue;
        }
        k = k.min(lines.line_len(l) - 1);
        let c = lines.char_at(l, k).unwrap_or('\n');
        if c == ' ' || c == '\t' {
            if !lines.step_fwd(&mut l, &mut k) {
                return None;
            }
            continue;
        }
        break;
    }
    Some((l, k))
}

/// `)`: forward to the start of the next sentence.
pub fn motion_sentence_next(lines: &Lines, pos: &mut Position) {
    let n = lines.len();
    let mut line = pos.line.min(n - 1);

    // On a blank run: jump to the next non-blank line start.
    if is_blank_line(&lines[line]) {
        while line < n && is_blank_line(&lines[line]) {
            line += 1;
        }
        if line >= n {
            return;
        }
        pos.line = line;
        pos.set_col(first_non_blank_col(&lines[line]));
        return;
    }

    let mut l = line;
    let mut k = lines.clamp_col(line, pos.col);
    loop {
        if is_sentence_end_at(lines, l, k) {
            if !lines.step_fwd(&mut l, &mut k) {
                return;
            }
            if let Some((sl, sk)) = skip_to_sentence_start(lines, l, k) {
                pos.line = sl;
                pos.set_col(sk);
            }
            return;
        }
        if !lines.step_fwd(&mut l, &mut k) {
            return;
        }
    }
}

/// Start of the sentence containing `(line, col)`.
fn find_sentence_start(lines: &Lines, line: usize, col: usize) -> (usize, usize) {
    let n = lines.len();
    let mut line = line.min(n - 1);
    let mut col = lines.clamp_col(line, col);

    // On a blank run: move up to the last non-blank character before it.
    while line > 0 && is_blank_line(&lines[line]) {
        line -= 1;
        col = lines.line_len(line).saturating_sub(1);
    }

    let (mut l, mut k) = (line, col);
    loop {
        if is_sentence_end_at(lines, l, k) {
            let (mut sl, mut sk) = (l, k);
            if !lines.step_fwd(&mut sl, &mut sk) {
                return (l, k);
            }
            if let Some(found) = skip_to_sentence_start(lines, sl, sk) {
                return found;
            }
            return (n - 1, 0);
        }

        let (mut pl, mut pk) = (l, k);
        if !lines.step_back(&mut pl, &mut pk) {
            break;
        }
        l = pl;
        k = pk;

        if is_blank_line(&lines[l]) {
            let mut i = l;
            while i < n && is_blank_line(&lines[i]) {
                i += 1;
            }
            if i >= n {
                return (n - 1, 0);
            }
            return (i, first_non_blank_col(&lines[i]));
        }
    }

    let mut i = 0;
    while i < n && is_blank_line(&lines[i]) {
        i += 1;
    }
    if i >= n {
        return (n - 1, 0);
    }
    (i, first_non_blank_col(&lines[i]))
}

/// `(`: backward to the start of the current sentence, or the previous one
/// when already at a sentence start.
pub fn motion_sentence_prev(lines: &Lines, pos: &mut Position) {
    let (sl, sc) = find_sentence_start(lines, pos.line, pos.col);
    if sl == pos.line && sc == pos.col {
        let (mut l, mut k) = (sl, sc);
        if lines.step_back(&mut l, &mut k) {
            // Skip the boundary run (whitespace, closers, terminators) so the
            // scan lands inside the previous sentence, not on its end mark.
            loop {
                let c = lines.char_at(l, k).unwrap_or('\n');
                let boundary =
                    is_blank(c) || is_sentence_closer(c) || is_sentence_end(c);
                if !boundary || !lines.step_back(&mut l, &mut k) {
                    break;
                }
            }
            let (pl, pc) = find_sentence_start(lines, l, k);
            pos.line = pl;
            pos.set_col(pc);
            return;
        }
    }
    pos.line = sl;
    pos.set_col(sc);
}

/// Candidate `f`/`F` targets near a goal column: `(char, landing col, repeats)`
/// where `repeats` is how many `;` presses follow the initial find. The
/// window spans `threshold` characters either side of the goal, shrunk to the
/// travel distance.
pub fn find_targets(
    line: &str,
    curr_col: usize,
    target_col: usize,
    threshold: usize,
    forward: bool,
) -> Vec<(char, usize, usize)> {
    let chars: Vec<char> = line.chars().collect();
    let n = chars.len();
    let mut res = Vec::new();
    if n == 0 {
        return res;
    }

    let threshold = threshold.min(curr_col.abs_diff(target_col));
    let mut lo = target_col.saturating_sub(threshold);
    let mut hi = (target_col + threshold).min(n - 1);
    if forward {
        lo = lo.max(curr_col + 1);
    } else {
        if curr_col == 0 {
            return res;
        }
        hi = hi.min(curr_col - 1);
    }
    if lo > hi {
        return res;
    }

    let mut counts: std::collections::HashMap<char, usize> = std::collections::HashMap::new();
    if forward {
        for &c in chars.iter().take(lo).skip(curr_col + 1) {
            *counts.entry(c).or_default() += 1;
        }
        for i in lo..=hi {
            let c = chars[i];
            let entry = counts.entry(c).or_default();
            res.push((c, i, *entry));
            *entry += 1;
        }
    } else {
        for i in (hi + 1..curr_col).rev() {
            *counts.entry(chars[i]).or_default() += 1;
        }
        for i in (lo..=hi).rev() {
            let c = chars[i];
            let entry = counts.entry(c).or_default();
            res.push((c, i, *entry));
            *entry += 1;
        }
    }
    res
}
