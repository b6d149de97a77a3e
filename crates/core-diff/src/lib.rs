//! Character-level minimal diff between two buffers.
//!
//! Buffers are flattened with `\n` and diffed with Myers O(ND). The raw edit
//! script is grouped into contiguous change regions with character-precise
//! bounds in the original buffer. Short common substrings between changes are
//! absorbed into one region so "world" -> "there" is one edit, not two,
//! unless the common run consists entirely of word-boundary characters, which
//! keeps `" b "` intact in `"a b c" -> "d b e"`.

use core_text::chars::{is_big_word_char, is_blank, is_word_boundary_char, is_word_char};
use core_text::{Lines, Position};

/// Minimum length for a common substring to survive as a separate match.
/// Shorter matches merge into adjacent diffs for more intuitive regions.
const MIN_MATCH_LENGTH: usize = 4;

/// How each edge of a region relates to its surrounding context in the
/// original buffer. All-false is the most permissive: the edge sits on a line
/// boundary, so line-scoped destruction cannot cross it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditBoundary {
    /// Region begins mid-line: `d0`-style deletes would eat preceding text.
    pub starts_mid_line: bool,
    /// Region begins mid-WORD: `dB` would cross the left edge.
    pub starts_mid_big_word: bool,
    /// Region begins mid-word: `db` would cross the left edge.
    pub starts_mid_word: bool,
    pub ends_mid_line: bool,
    pub ends_mid_big_word: bool,
    pub ends_mid_word: bool,
}

/// One contiguous change region at character granularity.
///
/// `pos_begin..=pos_end` pinpoints exactly which characters of the original
/// buffer change; for a pure insertion both name the insertion point.
/// `deleted_text` and `inserted_text` may contain newlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRegion {
    pub pos_begin: Position,
    pub pos_end: Position,
    pub deleted_text: String,
    pub inserted_text: String,
    pub boundary: EditBoundary,
}

impl DiffRegion {
    pub fn deleted_lines(&self) -> Lines {
        Lines::unflatten(&self.deleted_text)
    }

    pub fn inserted_lines(&self) -> Lines {
        Lines::unflatten(&self.inserted_text)
    }

    pub fn deleted_char_count(&self) -> usize {
        self.deleted_text.chars().count()
    }

    pub fn inserted_char_count(&self) -> usize {
        self.inserted_text.chars().count()
    }

    pub fn is_pure_insertion(&self) -> bool {
        self.deleted_text.is_empty() && !self.inserted_text.is_empty()
    }

    pub fn is_pure_deletion(&self) -> bool {
        !self.deleted_text.is_empty() && self.inserted_text.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Keep,
    Del,
    Ins,
}

/// Myers O(ND) edit script between two character sequences.
fn myers_ops(a: &[char], b: &[char]) -> Vec<Op> {
    let n = a.len();
    let m = b.len();
    if n == 0 {
        return vec![Op::Ins; m];
    }
    if m == 0 {
        return vec![Op::Del; n];
    }

    let max = n + m;
    let offset = max as isize;
    // v[k + offset] = furthest x on diagonal k after the current depth.
    let mut v = vec![0usize; 2 * max + 1];
    // trace[d] = v before depth d (diagonals of parity d-1 are current).
    let mut trace: Vec<Vec<usize>> = Vec::new();
    let mut found_d = 0isize;

    'outer: for d in 0..=(max as isize) {
        trace.push(v.clone());
        let mut k = -d;
        while k <= d {
            let ki = (k + offset) as usize;
            let down = k == -d || (k != d && v[ki - 1] < v[ki + 1]);
            let mut x = if down { v[ki + 1] } else { v[ki - 1] + 1 };
            let mut y = (x as isize - k) as usize;
            while x < n && y < m && a[x] == b[y] {
                x += 1;
                y += 1;
            }
            v[ki] = x;
            if x >= n && y >= m {
                found_d = d;
                break 'outer;
            }
            k += 2;
        }
    }

    // Backtrack from (n, m): undo the snake, then the single down/right move
    // that entered this diagonal at each depth.
    let mut ops = Vec::new();
    let (mut x, mut y) = (n, m);
    let mut d = found_d;
    while d > 0 {
        let v = &trace[d as usize];
        let k = x as isize - y as isize;
        let ki = (k + offset) as usize;
        let down = k == -d || (k != d && v[ki - 1] < v[ki + 1]);
        let prev_k = if down { k + 1 } else { k - 1 };
        let prev_ki = (prev_k + offset) as usize;
        let prev_x = v[prev_ki];
        let prev_y = (prev_x as isize - prev_k) as usize;

        while x > prev_x && y > prev_y {
            ops.push(Op::Keep);
            x -= 1;
            y -= 1;
        }
        if down {
            ops.push(Op::Ins);
        } else {
            ops.push(Op::Del);
        }
        x = prev_x;
        y = prev_y;
        d -= 1;
    }
    // Depth 0: a leading snake along the main diagonal.
    while x > 0 {
        ops.push(Op::Keep);
        x -= 1;
        y -= 1;
    }
    debug_assert_eq!(y, 0);
    ops.reverse();
    ops
}

/// Line-start character offsets of the flattened buffer.
fn line_offsets(lines: &Lines) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(lines.len());
    let mut acc = 0;
    for line in lines.iter() {
        offsets.push(acc);
        acc += line.chars().count() + 1; // +1 for '\n'
    }
    offsets
}

/// Map a flat character index to `(line, col)`. An index on a `\n` separator
/// maps to the end-of-line column.
fn pos_of_flat(offsets: &[usize], lines: &Lines, flat: usize) -> Position {
    let line = offsets.partition_point(|&o| o <= flat).saturating_sub(1);
    let col = (flat - offsets[line]).min(lines.line_len(line));
    Position::new(line, col)
}

fn flat_of_pos(offsets: &[usize], pos: Position) -> usize {
    offsets[pos.line] + pos.col
}

fn same_word_run(a: char, b: char) -> bool {
    if is_blank(a) || is_blank(b) {
        return false;
    }
    is_word_char(a) == is_word_char(b)
}

fn compute_boundary(flat: &[char], begin: usize, end: usize) -> EditBoundary {
    let mut boundary = EditBoundary::default();

    let prev = if begin > 0 { Some(flat[begin - 1]) } else { None };
    let first = flat.get(begin).copied();
    if let Some(p) = prev
        && p != '\n'
    {
        boundary.starts_mid_line = true;
        if is_big_word_char(p) && first.is_some_and(is_big_word_char) {
            boundary.starts_mid_big_word = true;
        }
        if let Some(f) = first
            && same_word_run(p, f)
        {
            boundary.starts_mid_word = true;
        }
    }

    let next = flat.get(end).copied();
    let last = if end > begin {
        Some(flat[end - 1])
    } else {
        first
    };
    if let Some(nx) = next
        && nx != '\n'
    {
        boundary.ends_mid_line = true;
        if is_big_word_char(nx) && last.is_some_and(is_big_word_char) {
            boundary.ends_mid_big_word = true;
        }
        if let Some(l) = last
            && same_word_run(l, nx)
        {
            boundary.ends_mid_word = true;
        }
    }

    boundary
}

/// Minimal diff between two buffers as ordered change regions with
/// character-precise bounds in `start`.
pub fn calculate(start: &Lines, end: &Lines) -> Vec<DiffRegion> {
    let a: Vec<char> = start.flatten().chars().collect();
    let b: Vec<char> = end.flatten().chars().collect();
    let ops = myers_ops(&a, &b);
    let offsets = line_offsets(start);

    struct Raw {
        begin: usize,
        deleted: String,
        inserted: String,
    }

    let mut regions: Vec<Raw> = Vec::new();
    let mut current: Option<Raw> = None;
    let mut ai = 0usize;
    let mut bi = 0usize;
    let mut i = 0usize;

    while i < ops.len() {
        match ops[i] {
            Op::Del | Op::Ins => {
                let region = current.get_or_insert_with(|| Raw {
                    begin: ai,
                    deleted: String::new(),
                    inserted: String::new(),
                });
                if ops[i] == Op::Del {
                    region.deleted.push(a[ai]);
                    ai += 1;
                } else {
                    region.inserted.push(b[bi]);
                    bi += 1;
                }
                i += 1;
            }
            Op::Keep => {
                // Measure the common run.
                let mut run = 0;
                while i + run < ops.len() && ops[i + run] == Op::Keep {
                    run += 1;
                }
                let followed_by_change = i + run < ops.len();
                let all_boundary = (0..run).all(|j| is_word_boundary_char(a[ai + j]));
                // Short non-boundary runs are absorbed into an adjacent
                // region: the open one behind, or the change ahead (the line
                // join "aaa\nbbb" -> "aaa bbb" needs its context either way).
                let absorb = run < MIN_MATCH_LENGTH
                    && !all_boundary
                    && (current.is_some() || followed_by_change);

                if absorb {
                    let region = current.get_or_insert_with(|| Raw {
                        begin: ai,
                        deleted: String::new(),
                        inserted: String::new(),
                    });
                    for j in 0..run {
                        region.deleted.push(a[ai + j]);
                        region.inserted.push(a[ai + j]);
                    }
                } else if let Some(region) = current.take() {
                    regions.push(region);
                }
                ai += run;
                bi += run;
                i += run;
            }
        }
    }
    if let Some(region) = current.take() {
        regions.push(region);
    }

    regions
        .into_iter()
        .map(|raw| {
            let deleted_len = raw.deleted.chars().count();
            let end_flat = raw.begin + deleted_len;
            let pos_begin = pos_of_flat(&offsets, start, raw.begin);
            let pos_end = if deleted_len == 0 {
                pos_begin
            } else {
                pos_of_flat(&offsets, start, end_flat - 1)
            };
            let boundary = compute_boundary(&a, raw.begin, end_flat);
            DiffRegion {
                pos_begin,
                pos_end,
                deleted_text: raw.deleted,
                inserted_text: raw.inserted,
                boundary,
            }
        })
        .collect()
}

/// Apply one region (positions relative to `lines`) and return the result.
pub fn apply_region(diff: &DiffRegion, lines: &Lines) -> Lines {
    let offsets = line_offsets(lines);
    let flat: Vec<char> = lines.flatten().chars().collect();
    let begin = flat_of_pos(&offsets, diff.pos_begin);
    let deleted_len = diff.deleted_char_count();

    let mut out: String = flat[..begin].iter().collect();
    out.push_str(&diff.inserted_text);
    out.extend(flat[begin + deleted_len..].iter());
    Lines::unflatten(&out)
}

/// Rebase regions for sequential application: region `k`'s positions become
/// relative to the buffer with regions `0..k` already applied. Works for any
/// application order (forward or reversed document order).
pub fn adjust_for_sequential(diffs: &[DiffRegion], start: &Lines) -> Vec<DiffRegion> {
    let offsets = line_offsets(start);
    // (original flat begin, char delta) of already-applied regions.
    let mut applied: Vec<(usize, isize)> = Vec::new();
    let mut current = start.clone();
    let mut out = Vec::with_capacity(diffs.len());

    for diff in diffs {
        let orig_begin = flat_of_pos(&offsets, diff.pos_begin);
        let shift: isize = applied
            .iter()
            .filter(|(begin, _)| *begin < orig_begin)
            .map(|(_, delta)| *delta)
            .sum();
        let new_begin = orig_begin.saturating_add_signed(shift);
        let deleted_len = diff.deleted_char_count();

        let cur_offsets = line_offsets(&current);
        let pos_begin = pos_of_flat(&cur_offsets, &current, new_begin);
        let pos_end = if deleted_len == 0 {
            pos_begin
        } else {
            pos_of_flat(&cur_offsets, &current, new_begin + deleted_len - 1)
        };
        let adjusted = DiffRegion {
            pos_begin,
            pos_end,
            deleted_text: diff.deleted_text.clone(),
            inserted_text: diff.inserted_text.clone(),
            boundary: diff.boundary,
        };
        current = apply_region(&adjusted, &current);
        applied.push((
            orig_begin,
            diff.inserted_char_count() as isize - deleted_len as isize,
        ));
        out.push(adjusted);
    }
    out
}

/// Apply a sequentially-adjusted diff list in order.
pub fn apply_all(adjusted: &[DiffRegion], start: &Lines) -> Lines {
    let mut current = start.clone();
    for diff in adjusted {
        current = apply_region(diff, &current);
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn buf(lines: &[&str]) -> Lines {
        Lines::from_strs(lines)
    }

    fn round_trip(start: &Lines, end: &Lines) -> Lines {
        let diffs = calculate(start, end);
        let adjusted = adjust_for_sequential(&diffs, start);
        apply_all(&adjusted, start)
    }

    #[test]
    fn identical_buffers_produce_no_regions() {
        let a = buf(&["same", "text"]);
        assert!(calculate(&a, &a).is_empty());
    }

    #[test]
    fn single_word_replacement() {
        let a = buf(&["aaa bbb ccc"]);
        let b = buf(&["aaa xyz ccc"]);
        let diffs = calculate(&a, &b);
        assert_eq!(diffs.len(), 1);
        let d = &diffs[0];
        assert_eq!(d.deleted_text, "bbb");
        assert_eq!(d.inserted_text, "xyz");
        assert_eq!(d.pos_begin, Position::new(0, 4));
        assert_eq!(d.pos_end, Position::new(0, 6));
    }

    #[test]
    fn short_common_run_is_absorbed() {
        // "world" -> "there" shares 'r'; one region, not two.
        let a = buf(&["world"]);
        let b = buf(&["there"]);
        let diffs = calculate(&a, &b);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].deleted_text, "world");
        assert_eq!(diffs[0].inserted_text, "there");
    }

    #[test]
    fn word_boundary_run_is_preserved() {
        // " b " is short but all word-boundary characters: two regions.
        let a = buf(&["a b c"]);
        let b = buf(&["d b e"]);
        let diffs = calculate(&a, &b);
        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs[0].deleted_text, "a");
        assert_eq!(diffs[0].inserted_text, "d");
        assert_eq!(diffs[1].deleted_text, "c");
        assert_eq!(diffs[1].inserted_text, "e");
    }

    #[test]
    fn longer_common_substring_splits_regions() {
        let a = buf(&["migration"]);
        let b = buf(&["arbitrations"]);
        let diffs = calculate(&a, &b);
        assert!(diffs.len() >= 2, "shared 'ration' should split regions");
    }

    #[test]
    fn multi_line_deletion_region() {
        let a = buf(&["aaa", "bbb", "ccc"]);
        let b = buf(&["aaa", "ccc"]);
        let diffs = calculate(&a, &b);
        // The short common neighbor of the deleted line is absorbed; one
        // region either way.
        assert_eq!(diffs.len(), 1);
        assert!(diffs[0].deleted_text.contains("bbb"));
        assert_eq!(round_trip(&a, &b), b);
    }

    #[test]
    fn line_join_region_carries_its_context() {
        let a = buf(&["aaa", "bbb"]);
        let b = buf(&["aaa bbb"]);
        let diffs = calculate(&a, &b);
        assert_eq!(diffs.len(), 1);
        // Both short line fragments are absorbed so the region sees the
        // whole join.
        assert_eq!(diffs[0].deleted_text, "aaa\nbbb");
        assert_eq!(diffs[0].inserted_text, "aaa bbb");
        assert_eq!(diffs[0].pos_begin, Position::new(0, 0));
        assert_eq!(diffs[0].pos_end, Position::new(1, 2));
        assert_eq!(round_trip(&a, &b), b);
    }

    #[test]
    fn pure_insertion_marks_a_point() {
        let a = buf(&["foo barbara"]);
        let b = buf(&["foo XXbarbara"]);
        let diffs = calculate(&a, &b);
        assert_eq!(diffs.len(), 1);
        assert!(diffs[0].is_pure_insertion());
        assert_eq!(diffs[0].inserted_text, "XX");
        assert_eq!(diffs[0].pos_begin, diffs[0].pos_end);
        assert_eq!(diffs[0].pos_begin, Position::new(0, 4));
        assert_eq!(round_trip(&a, &b), b);
    }

    #[test]
    fn boundary_flags_reflect_context() {
        let a = buf(&["aaa bbb ccc"]);
        let b = buf(&["aaa xyz ccc"]);
        let d = &calculate(&a, &b)[0];
        // "bbb" sits between spaces: mid-line both sides, but on word
        // boundaries.
        assert!(d.boundary.starts_mid_line && d.boundary.ends_mid_line);
        assert!(!d.boundary.starts_mid_word && !d.boundary.ends_mid_word);
        assert!(!d.boundary.starts_mid_big_word);

        let a = buf(&["prefix_mid_suffix"]);
        let b = buf(&["prefix_XYZ_suffix"]);
        let d = &calculate(&a, &b)[0];
        assert!(d.boundary.starts_mid_word && d.boundary.ends_mid_word);
    }

    #[test]
    fn whole_line_region_has_line_edges() {
        let a = buf(&["keep", "xxxx", "keep2"]);
        let b = buf(&["keep", "yyyy", "keep2"]);
        let diffs = calculate(&a, &b);
        assert_eq!(diffs.len(), 1);
        let d = &diffs[0];
        assert_eq!(d.deleted_text, "xxxx");
        assert!(!d.boundary.starts_mid_line);
        // The region ends right before the trailing '\n'.
        assert!(!d.boundary.ends_mid_line);
    }

    #[test]
    fn multi_region_sequential_adjustment() {
        let a = buf(&["abc", "def", "ghi"]);
        let b = buf(&["Abcdef", "def", "gHi"]);
        assert_eq!(round_trip(&a, &b), b);
    }

    #[test]
    fn reversed_order_application_also_round_trips() {
        let a = buf(&["abc", "def", "ghi"]);
        let b = buf(&["Abc", "def", "ghI"]);
        let mut diffs = calculate(&a, &b);
        diffs.reverse();
        let adjusted = adjust_for_sequential(&diffs, &a);
        assert_eq!(apply_all(&adjusted, &a), b);
    }

    #[test]
    fn minimality_no_overlap_and_ordered() {
        let a = buf(&["the quick brown fox", "jumps over"]);
        let b = buf(&["the quack brown cat", "leaps over"]);
        let diffs = calculate(&a, &b);
        for pair in diffs.windows(2) {
            assert!(pair[0].pos_end < pair[1].pos_begin);
        }
        assert_eq!(round_trip(&a, &b), b);
    }

    proptest! {
        // Diff round-trip: applying the adjusted regions to A yields B.
        #[test]
        fn diff_round_trip(
            a in proptest::collection::vec("[ab c]{0,8}", 1..5),
            b in proptest::collection::vec("[ab c]{0,8}", 1..5),
        ) {
            let a = Lines::new(a);
            let b = Lines::new(b);
            prop_assert_eq!(round_trip(&a, &b), b);
        }

        // Myers minimality: without merges, total inserted+deleted equals
        // the raw edit-script length; regions never overlap.
        #[test]
        fn script_length_matches_ops(
            a in "[abc]{0,12}",
            b in "[abc]{0,12}",
        ) {
            let av: Vec<char> = a.chars().collect();
            let bv: Vec<char> = b.chars().collect();
            let ops = myers_ops(&av, &bv);
            let dels = ops.iter().filter(|o| **o == Op::Del).count();
            let inss = ops.iter().filter(|o| **o == Op::Ins).count();
            let keeps = ops.iter().filter(|o| **o == Op::Keep).count();
            prop_assert_eq!(dels + keeps, av.len());
            prop_assert_eq!(inss + keeps, bv.len());
            // Reconstruct b from the script.
            let mut rebuilt = String::new();
            let mut ai = 0;
            let mut bi = 0;
            for op in &ops {
                match op {
                    Op::Keep => { rebuilt.push(av[ai]); ai += 1; bi += 1; }
                    Op::Del => { ai += 1; }
                    Op::Ins => { rebuilt.push(bv[bi]); bi += 1; }
                }
            }
            prop_assert_eq!(rebuilt, b);
        }
    }
}
