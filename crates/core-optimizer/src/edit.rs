//! A\* enumeration of keystroke sequences realizing one change region.
//!
//! The search runs on the region's deleted text as a standalone mini-buffer
//! whose goal is the inserted text. Every start offset inside the deleted
//! text seeds a row; every goal arrival fills a matrix cell keyed by (start
//! offset, final cursor offset in the inserted text).
//!
//! Commands are enumerated only where their mini-buffer effect provably
//! matches their effect on the full buffer: line- and word-scoped commands
//! are gated by reach levels against the region's boundary flags, motion
//! targets that clamp at a mini-buffer edge are admitted only when that edge
//! coincides with a matching real boundary.

use crate::levenshtein::Levenshtein;
use crate::params::OptimizerParams;
use crate::reach::{
    back_boundary_reach, compute_back_reach, compute_forward_reach, forward_boundary_reach,
    ReachLevel,
};
use crate::result::{EditMatrix, EditPath};
use crate::sequence::{push_keys, Sequence};
use core_diff::EditBoundary;
use core_effort::RunningEffort;
use core_keyboard::tables::{char_keys, string_keys};
use core_keyboard::{CostModel, Key, KeySeq};
use core_sim::{apply_edit, apply_motion, insert_text_at, textobject};
use core_text::chars::{is_blank, is_word_char};
use core_text::{Lines, Mode, Position};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::hash::{DefaultHasher, Hash, Hasher};

/// Region-local flat offset: characters before the position, newlines not
/// counted (mirrors the matrix addressing).
fn flat_offset(lines: &Lines, pos: Position) -> usize {
    lines
        .iter()
        .take(pos.line)
        .map(|l| l.chars().count())
        .sum::<usize>()
        + pos.col
}

/// Inverse of [`flat_offset`], clamped to the last character.
fn pos_at_offset(lines: &Lines, offset: usize) -> Position {
    let mut acc = 0;
    for (line_no, line) in lines.iter().enumerate() {
        let len = line.chars().count();
        if offset < acc + len {
            return Position::new(line_no, offset - acc);
        }
        acc += len;
    }
    let last = lines.len() - 1;
    Position::new(last, lines.line_len(last).saturating_sub(1))
}

/// Plain cursor motions the edit search may use between edits.
fn is_plain_motion(cmd: &str) -> bool {
    matches!(cmd, "h" | "l" | "w" | "b" | "e" | "0" | "$")
}

#[derive(Clone)]
struct EditState {
    lines: Lines,
    pos: Position,
    mode: Mode,
    running: RunningEffort,
    effort: f64,
    cost: f64,
    typed_index: usize,
    did_type: bool,
    start_index: usize,
    sequences: Vec<Sequence>,
    keys: KeySeq,
}

impl EditState {
    fn key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.lines.0.hash(&mut hasher);
        self.pos.line.hash(&mut hasher);
        self.pos.col.hash(&mut hasher);
        (self.mode == Mode::Insert).hash(&mut hasher);
        self.typed_index.hash(&mut hasher);
        self.did_type.hash(&mut hasher);
        self.start_index.hash(&mut hasher);
        hasher.finish()
    }

    /// Record a command under the mode it was issued in (which may differ
    /// from the mode it produced).
    fn push(&mut self, cmd: &str, keys: &KeySeq, issued_in: Mode, model: &CostModel) {
        push_keys(&mut self.sequences, issued_in, cmd);
        self.keys.extend(keys.iter().copied());
        self.effort = self.running.append(keys, model);
    }
}

impl PartialEq for EditState {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}
impl Eq for EditState {}
impl PartialOrd for EditState {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for EditState {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.cost.total_cmp(&other.cost)
    }
}

pub struct EditOptimizer<'a> {
    model: &'a CostModel,
    pub params: OptimizerParams,
    /// Secondary absolute cap on explored effort, in units of the synthetic
    /// baseline.
    pub absolute_explore_factor: f64,
}

impl<'a> EditOptimizer<'a> {
    pub fn new(model: &'a CostModel, params: OptimizerParams) -> Self {
        Self {
            model,
            params,
            absolute_explore_factor: 3.0,
        }
    }

    /// Synthetic baseline: delete everything with `x`, retype the insertion.
    /// Used to scale the budget when no user sequence applies.
    fn naive_baseline(&self, deleted: &Lines, inserted_flat: &str) -> f64 {
        let mut keys = KeySeq::new();
        let x = char_keys('x').expect("x is mapped");
        for _ in 0..deleted.char_count() {
            keys.extend(x.iter().copied());
        }
        keys.extend(char_keys('i').expect("i is mapped"));
        for c in inserted_flat.chars() {
            if let Some(ck) = char_keys(c) {
                keys.extend(ck);
            }
        }
        keys.push(Key::Esc);
        let mut running = RunningEffort::new();
        running.append(&keys, self.model)
    }

    /// Build the effort matrix for one region.
    pub fn optimize_region(
        &self,
        deleted: &Lines,
        inserted: &Lines,
        boundary: &EditBoundary,
        params_override: Option<OptimizerParams>,
    ) -> EditMatrix {
        let params = params_override.unwrap_or(self.params);
        let target_flat = inserted.flatten();
        let inserted_chars: Vec<char> = target_flat.chars().collect();

        let n_chars: usize = deleted.iter().map(|l| l.chars().count()).sum();
        let m_chars: usize = inserted.iter().map(|l| l.chars().count()).sum();
        let mut matrix = EditMatrix::new(n_chars, m_chars);

        let lev = Levenshtein::new(&target_flat);
        let baseline = self.naive_baseline(deleted, &target_flat);
        let budget = params
            .budget(baseline)
            .min(baseline * self.absolute_explore_factor);
        tracing::debug!(
            target: "optimizer.edit",
            n = matrix.n,
            m = matrix.m,
            baseline,
            budget,
            "starting edit search"
        );

        let back_cap = back_boundary_reach(boundary);
        let fwd_cap = forward_boundary_reach(boundary);

        let mut pq: BinaryHeap<Reverse<EditState>> = BinaryHeap::new();
        let mut cost_map: HashMap<u64, f64> = HashMap::new();

        for i in 0..matrix.n {
            let pos = if n_chars == 0 {
                Position::origin()
            } else {
                pos_at_offset(deleted, i)
            };
            let mut state = EditState {
                lines: deleted.clone(),
                pos,
                mode: Mode::Normal,
                running: RunningEffort::new(),
                effort: 0.0,
                cost: 0.0,
                typed_index: 0,
                did_type: false,
                start_index: i,
                sequences: Vec::new(),
                keys: KeySeq::new(),
            };
            state.cost = self.heuristic(&state, &lev, params.cost_weight);
            cost_map.insert(state.key(), state.cost);
            pq.push(Reverse(state));
        }

        let goal_cap = (matrix.n * matrix.m * 4).max(params.max_results);
        let mut goals = 0usize;
        let mut explored = 0usize;

        while let Some(Reverse(state)) = pq.pop() {
            explored += 1;
            if explored > params.max_search_depth {
                tracing::debug!(target: "optimizer.edit", "max search depth reached");
                break;
            }

            if state.mode == Mode::Normal && state.lines == *inserted {
                let j = if m_chars == 0 {
                    0
                } else {
                    flat_offset(&state.lines, state.pos).min(matrix.m - 1)
                };
                matrix.offer(state.start_index, j, EditPath {
                    sequences: state.sequences.clone(),
                    keys: state.keys.clone(),
                    key_cost: state.running.cost(self.model),
                });
                goals += 1;
                if goals >= goal_cap {
                    break;
                }
                continue;
            }

            let key = state.key();
            if cost_map.get(&key).is_some_and(|&c| c < state.cost) {
                continue;
            }

            let emit = |cmd: &str, keys: KeySeq, pq: &mut BinaryHeap<Reverse<EditState>>,
                        cost_map: &mut HashMap<u64, f64>| {
                let mut next = state.clone();
                let issued_in = next.mode;
                if is_plain_motion(cmd) && next.mode == Mode::Normal {
                    apply_motion(&next.lines, &mut next.pos, cmd);
                } else if apply_edit(&mut next.lines, &mut next.pos, &mut next.mode, cmd, 1)
                    .is_err()
                {
                    return;
                }
                next.push(cmd, &keys, issued_in, self.model);
                next.cost = self.heuristic(&next, &lev, params.cost_weight);
                if next.effort > budget {
                    return;
                }
                let next_key = next.key();
                let is_goal = next.mode == Mode::Normal && next.lines == *inserted;
                match cost_map.get_mut(&next_key) {
                    None => {
                        if !is_goal {
                            cost_map.insert(next_key, next.cost);
                        }
                        pq.push(Reverse(next));
                    }
                    Some(existing) if next.cost <= *existing => {
                        *existing = next.cost;
                        pq.push(Reverse(next));
                    }
                    Some(_) => {}
                }
            };

            match state.mode {
                Mode::Normal => {
                    for cmd in self.normal_commands(&state, boundary, back_cap, fwd_cap,
                        &inserted_chars)
                    {
                        if let Some(keys) = bracketed_keys(&cmd).or_else(|| string_keys(&cmd)) {
                            emit(&cmd, keys, &mut pq, &mut cost_map);
                        }
                    }
                }
                Mode::Insert => {
                    for cmd in self.insert_commands(&state, boundary, &inserted_chars) {
                        // Typing the next goal character advances typed_index.
                        let typed = cmd.chars().count() == 1 || cmd == "<CR>";
                        let keys = if cmd == "<CR>" {
                            Some(KeySeq::from_slice(&[Key::Enter]))
                        } else {
                            bracketed_keys(&cmd).or_else(|| string_keys(&cmd))
                        };
                        let Some(keys) = keys else { continue };
                        if typed {
                            let mut next = state.clone();
                            let text = if cmd == "<CR>" {
                                "\n".to_string()
                            } else {
                                cmd.clone()
                            };
                            insert_text_at(&mut next.lines, &mut next.pos, Mode::Insert, &text);
                            next.typed_index += 1;
                            next.did_type = true;
                            next.push(&cmd, &keys, Mode::Insert, self.model);
                            next.cost = self.heuristic(&next, &lev, params.cost_weight);
                            if next.effort <= budget {
                                let next_key = next.key();
                                match cost_map.get_mut(&next_key) {
                                    None => {
                                        cost_map.insert(next_key, next.cost);
                                        pq.push(Reverse(next));
                                    }
                                    Some(existing) if next.cost <= *existing => {
                                        *existing = next.cost;
                                        pq.push(Reverse(next));
                                    }
                                    Some(_) => {}
                                }
                            }
                        } else {
                            emit(&cmd, keys, &mut pq, &mut cost_map);
                        }
                    }
                }
            }
        }

        matrix
    }

    fn heuristic(&self, s: &EditState, lev: &Levenshtein, cost_weight: f64) -> f64 {
        cost_weight * s.effort + lev.distance(&s.lines.flatten()) as f64
    }

    /// Normal-mode candidates at this state, fully gated for mini/real
    /// equivalence.
    fn normal_commands(
        &self,
        s: &EditState,
        boundary: &EditBoundary,
        back_cap: ReachLevel,
        fwd_cap: ReachLevel,
        inserted_chars: &[char],
    ) -> Vec<String> {
        let lines = &s.lines;
        let pos = s.pos;
        let last = lines.len() - 1;
        let line_len = lines.line_len(pos.line);
        let line_str = &lines[pos.line];
        let first_complete = !boundary.starts_mid_line;
        let last_complete = !boundary.ends_mid_line;
        let line_complete =
            |l: usize| (l > 0 || first_complete) && (l < last || last_complete);

        let back = compute_back_reach(pos.line, pos.col, line_str, back_cap);
        let fwd = compute_forward_reach(pos.line, pos.col, line_str, last, fwd_cap);

        let mini_last = {
            let len = lines.line_len(last);
            Position::new(last, len.saturating_sub(1))
        };

        let mut out: Vec<String> = Vec::new();

        // Single-character commands.
        if fwd >= ReachLevel::Char {
            out.push("x".into());
            out.push("s".into());
            if lines
                .char_at(pos.line, pos.col)
                .is_some_and(|c| c.is_alphabetic())
            {
                out.push("~".into());
            }
            // Replace with the character the goal wants at this offset.
            if !inserted_chars.is_empty() {
                let idx = flat_offset(lines, pos).min(inserted_chars.len() - 1);
                let want = inserted_chars[idx];
                if want != '\n'
                    && lines.char_at(pos.line, pos.col) != Some(want)
                    && char_keys(want).is_some()
                {
                    out.push(format!("r{want}"));
                }
            }
        }
        if back >= ReachLevel::Char && pos.col > 0 {
            out.push("X".into());
        }

        // Line-scoped commands.
        if fwd == ReachLevel::Line && pos.col < line_len {
            out.push("D".into());
            out.push("C".into());
        }
        if back == ReachLevel::Line && pos.col > 0 {
            out.push("d0".into());
        }
        if line_complete(pos.line) && lines.len() > 1 {
            out.push("dd".into());
        }
        if line_complete(pos.line) {
            out.push("cc".into());
            out.push("S".into());
        }

        // Joins: the removed newline is interior to the region; the
        // whitespace stripping must stay inside the next mini line.
        if pos.line < last {
            let next_line = &lines[pos.line + 1];
            let strip_safe = pos.line + 1 < last
                || last_complete
                || next_line.chars().any(|c| !is_blank(c));
            if strip_safe {
                out.push("J".into());
                out.push("gJ".into());
            }
        }

        // Line opens and insert entries.
        if pos.line < last || last_complete {
            out.push("o".into());
            out.push("A".into());
        }
        if pos.line > 0 || first_complete {
            out.push("O".into());
            out.push("I".into());
        }
        out.push("i".into());
        if line_len > 0 || line_complete(pos.line) {
            out.push("a".into());
        }

        // Operators over word motions, admitted when the motion target is
        // strictly interior or pinned on a matching real boundary.
        let motion_ok = |motion: &str| -> bool {
            let mut target = pos;
            apply_motion(lines, &mut target, motion);
            match motion {
                "w" | "W" => target < mini_last && target != pos,
                "e" => {
                    target != pos
                        && (target < mini_last
                            || (target == mini_last && !boundary.ends_mid_word))
                }
                "E" => {
                    target != pos
                        && (target < mini_last
                            || (target == mini_last && !boundary.ends_mid_big_word))
                }
                "b" => {
                    target != pos
                        && (target > Position::origin()
                            || !boundary.starts_mid_word)
                }
                "B" => {
                    target != pos
                        && (target > Position::origin()
                            || !boundary.starts_mid_big_word)
                }
                _ => false,
            }
        };
        let reach_for = |motion: &str| match motion {
            "w" | "e" => (fwd, ReachLevel::Word),
            "W" | "E" => (fwd, ReachLevel::BigWord),
            "b" => (back, ReachLevel::Word),
            "B" => (back, ReachLevel::BigWord),
            _ => (ReachLevel::None, ReachLevel::Line),
        };
        for motion in ["w", "W", "b", "B", "e", "E"] {
            let (have, need) = reach_for(motion);
            if have >= need && motion_ok(motion) {
                out.push(format!("d{motion}"));
                out.push(format!("c{motion}"));
            }
        }

        // Word text objects.
        let object_ok = |object: &str| -> Option<()> {
            let range = textobject::resolve(lines, pos, object)?;
            let (start_flag, end_flag) = match object {
                "iw" => (boundary.starts_mid_word, boundary.ends_mid_word),
                "iW" => (boundary.starts_mid_big_word, boundary.ends_mid_big_word),
                // Around-variants may consume adjacent blanks; require full
                // line edges when they touch the region rim.
                "aw" | "aW" => (boundary.starts_mid_line, boundary.ends_mid_line),
                _ => return None,
            };
            if range.start == Position::origin() && start_flag {
                return None;
            }
            if range.end >= mini_last && end_flag {
                return None;
            }
            Some(())
        };
        for object in ["iw", "aw", "iW", "aW"] {
            if object_ok(object).is_some() {
                out.push(format!("d{object}"));
                out.push(format!("c{object}"));
            }
        }

        // Quote and bracket objects: only when the whole region sits on line
        // boundaries, so pairing in the region text equals pairing in the
        // buffer.
        if first_complete && last_complete {
            for (object, probe) in [
                ("i\"", '"'),
                ("a\"", '"'),
                ("i'", '\''),
                ("a'", '\''),
                ("i(", '('),
                ("a(", '('),
                ("i{", '{'),
                ("a{", '{'),
                ("i[", '['),
                ("a[", '['),
            ] {
                if lines.iter().any(|l| l.contains(probe))
                    && textobject::resolve(lines, pos, object).is_some()
                {
                    out.push(format!("d{object}"));
                    out.push(format!("c{object}"));
                }
            }
        }

        // Plain cursor motions so multi-spot edits inside one region can
        // reposition without leaving Normal mode.
        for motion in ["h", "l"] {
            out.push(motion.into());
        }
        for motion in ["w", "b", "e"] {
            if motion_ok(motion) {
                out.push(motion.into());
            }
        }
        if pos.col > 0 && (pos.line > 0 || first_complete) {
            out.push("0".into());
        }
        if pos.line < last || last_complete {
            out.push("$".into());
        }

        out
    }

    /// Insert-mode candidates: type the next goal character or edit locally.
    fn insert_commands(
        &self,
        s: &EditState,
        boundary: &EditBoundary,
        inserted_chars: &[char],
    ) -> Vec<String> {
        let lines = &s.lines;
        let pos = s.pos;
        let last = lines.len() - 1;
        let line_len = lines.line_len(pos.line);
        let first_complete = !boundary.starts_mid_line;

        let mut out: Vec<String> = Vec::new();

        if let Some(&next_char) = inserted_chars.get(s.typed_index) {
            if next_char == '\n' {
                out.push("<CR>".into());
            } else if char_keys(next_char).is_some() {
                out.push(next_char.to_string());
            }
        }

        out.push("<Esc>".into());

        if pos != Position::origin() {
            out.push("<BS>".into());
        }
        if pos.col < line_len || pos.line < last {
            out.push("<Del>".into());
        }
        if pos.col > 0 && (pos.line > 0 || first_complete) {
            out.push("<C-u>".into());
        }
        if pos.col > 0 {
            // The word-delete must stop inside the region.
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
                while col > 0 && !is_word_char(chars[col - 1]) && !is_blank(chars[col - 1]) {
                    col -= 1;
                }
            }
            if col > 0 || pos.line > 0 || first_complete {
                out.push("<C-w>".into());
            }
        }

        out
    }
}

/// Keys for the bracketed command names the edit search emits.
fn bracketed_keys(cmd: &str) -> Option<KeySeq> {
    let keys: &[Key] = match cmd {
        "<Esc>" => &[Key::Esc],
        "<BS>" => &[Key::Backspace],
        "<Del>" => &[Key::Delete],
        "<CR>" => &[Key::Enter],
        "<C-u>" => &[Key::Ctrl, Key::U],
        "<C-w>" => &[Key::Ctrl, Key::W],
        _ => return None,
    };
    Some(KeySeq::from_slice(keys))
}
