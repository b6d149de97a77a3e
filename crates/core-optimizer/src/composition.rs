//! A\* composition of movement and edit sub-searches across all change
//! regions between two buffers.
//!
//! The Myers diff runs once up front. Each region gets an effort matrix from
//! the edit optimizer; movement between regions delegates to the movement
//! optimizer's range variant with the global budget threaded through. The
//! heuristic combines distance to the next region (overshooting past it is
//! penalized, backtracking costs more than traveling forward) with suffix
//! sums of per-region median edit cost, which is robust to outlier cells.

use crate::edit::EditOptimizer;
use crate::movement::{MotionExclusions, MovementOptimizer};
use crate::params::OptimizerParams;
use crate::result::{EditMatrix, SearchResult};
use crate::sequence::{flatten_sequences, push_keys, Sequence};
use core_diff::{adjust_for_sequential, apply_region, calculate, DiffRegion};
use core_effort::{sequence_effort, RunningEffort};
use core_keyboard::tables::MotionTable;
use core_keyboard::{CostModel, SequenceTokenizer};
use core_text::{Lines, Mode, Position};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

#[derive(Clone)]
struct CompositionState {
    pos: Position,
    mode: Mode,
    edits_completed: usize,
    running: RunningEffort,
    effort: f64,
    cost: f64,
    sequences: Vec<Sequence>,
}

impl CompositionState {
    fn key(&self) -> (usize, usize, bool, usize) {
        (
            self.pos.line,
            self.pos.col,
            self.mode == Mode::Insert,
            self.edits_completed,
        )
    }
}

impl PartialEq for CompositionState {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}
impl Eq for CompositionState {}
impl PartialOrd for CompositionState {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for CompositionState {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.cost.total_cmp(&other.cost)
    }
}

pub struct CompositionOptimizer<'a> {
    model: &'a CostModel,
    pub params: OptimizerParams,
    /// Extra weight on distance when the cursor has gone past the next
    /// region: backtracking is worse than approaching.
    pub overshoot_penalty: f64,
    /// Slack granted to the natural top-to-bottom processing order when
    /// choosing direction.
    pub forward_bias: f64,
}

fn dist(p: Position, q: Position) -> f64 {
    (p.line.abs_diff(q.line) + p.col.abs_diff(q.col)) as f64
}

/// Flat index of a cursor inside the region's deleted text, `None` when the
/// cursor is not a valid start position for the region.
fn buffer_pos_to_edit_index(pos: Position, diff: &DiffRegion) -> Option<usize> {
    let deleted = diff.deleted_lines();
    let edit_line = pos.line.checked_sub(diff.pos_begin.line)?;
    if edit_line >= deleted.len() {
        return None;
    }
    if edit_line == 0 {
        pos.col.checked_sub(diff.pos_begin.col)
    } else {
        let prior: usize = deleted
            .iter()
            .take(edit_line)
            .map(|l| l.chars().count())
            .sum();
        Some(prior + pos.col)
    }
}

/// Buffer position of a flat index inside the region's inserted text, in the
/// buffer state after the region applies.
fn edit_index_to_buffer_pos(j: usize, diff: &DiffRegion) -> Position {
    let inserted = diff.inserted_lines();
    let mut remaining = j;
    for (i, line) in inserted.iter().enumerate() {
        let len = line.chars().count();
        if remaining < len {
            let col = if i == 0 {
                remaining + diff.pos_begin.col
            } else {
                remaining
            };
            return Position::new(diff.pos_begin.line + i, col);
        }
        remaining -= len;
    }
    let last = inserted.len() - 1;
    let mut col = inserted.line_len(last);
    if inserted.len() == 1 {
        col += diff.pos_begin.col;
    }
    Position::new(diff.pos_begin.line + last, col)
}

fn region_contains(pos: Position, diff: &DiffRegion) -> bool {
    if diff.deleted_text.is_empty() {
        return pos == diff.pos_begin;
    }
    pos >= diff.pos_begin && pos <= diff.pos_end
}

impl<'a> CompositionOptimizer<'a> {
    pub fn new(model: &'a CostModel, params: OptimizerParams) -> Self {
        Self {
            model,
            params,
            overshoot_penalty: 3.0,
            forward_bias: 2.0,
        }
    }

    fn heuristic(
        &self,
        s: &CompositionState,
        edits_completed: usize,
        suffix_costs: &[f64],
        diffs: &[DiffRegion],
        cost_weight: f64,
    ) -> f64 {
        let mut h = suffix_costs[edits_completed];
        if let Some(next) = diffs.get(edits_completed) {
            if s.pos < next.pos_begin {
                h += dist(s.pos, next.pos_begin);
            } else if s.pos > next.pos_end {
                h += self.overshoot_penalty * dist(s.pos, next.pos_end);
            }
        }
        cost_weight * s.effort + h
    }

    /// Per-region median of valid matrix costs, summed from the back:
    /// `suffix[k]` estimates the effort for the remaining edits `k..`.
    fn suffix_median_costs(matrices: &[EditMatrix]) -> Vec<f64> {
        let mut suffix = vec![0.0; matrices.len() + 1];
        for (k, matrix) in matrices.iter().enumerate().rev() {
            let mut costs: Vec<f64> =
                matrix.iter_valid().map(|(_, _, path)| path.key_cost).collect();
            let median = if costs.is_empty() {
                100.0
            } else {
                costs.sort_by(f64::total_cmp);
                costs[costs.len() / 2]
            };
            suffix[k] = suffix[k + 1] + median;
        }
        suffix
    }

    /// Search for full sequences transforming `start_lines` into `end_lines`.
    #[allow(clippy::too_many_arguments)]
    pub fn optimize(
        &self,
        start_lines: &Lines,
        start_pos: Position,
        end_lines: &Lines,
        user_sequence: &str,
        exclusions: MotionExclusions,
        motions: &MotionTable,
        params_override: Option<OptimizerParams>,
    ) -> Vec<SearchResult> {
        let params = params_override.unwrap_or(self.params);
        let tokenizer = SequenceTokenizer::new();

        let mut raw_diffs = calculate(start_lines, end_lines);
        if raw_diffs.is_empty() {
            return Vec::new();
        }

        // Direction: process top-to-bottom unless the cursor is clearly
        // closer to the last region.
        let to_first = dist(start_pos, raw_diffs[0].pos_begin);
        let to_last = dist(start_pos, raw_diffs[raw_diffs.len() - 1].pos_end);
        let forward = to_first <= to_last + self.forward_bias;
        if !forward {
            tracing::debug!(target: "optimizer.composition", "processing edits bottom-up");
            raw_diffs.reverse();
        }

        let diffs = adjust_for_sequential(&raw_diffs, start_lines);
        let total_edits = diffs.len();

        // Intermediate buffers: [0] untouched, [k] after the first k edits.
        let mut buffers: Vec<Lines> = Vec::with_capacity(total_edits + 1);
        buffers.push(start_lines.clone());
        for diff in &diffs {
            let next = apply_region(diff, buffers.last().expect("non-empty"));
            buffers.push(next);
        }
        debug_assert_eq!(buffers[total_edits], *end_lines);

        let edit_optimizer = EditOptimizer::new(self.model, params);
        let matrices: Vec<EditMatrix> = diffs
            .iter()
            .map(|diff| {
                edit_optimizer.optimize_region(
                    &diff.deleted_lines(),
                    &diff.inserted_lines(),
                    &diff.boundary,
                    None,
                )
            })
            .collect();
        let suffix_costs = Self::suffix_median_costs(&matrices);

        let baseline = sequence_effort(user_sequence, &tokenizer, self.model);
        let budget = params.budget(baseline);
        tracing::debug!(
            target: "optimizer.composition",
            total_edits,
            baseline,
            budget,
            "starting composition search"
        );

        let movement = MovementOptimizer::new(self.model, params);

        let mut results: Vec<SearchResult> = Vec::new();
        let mut cost_map: HashMap<(usize, usize, bool, usize), f64> = HashMap::new();
        let mut pq: BinaryHeap<Reverse<CompositionState>> = BinaryHeap::new();

        let mut initial = CompositionState {
            pos: start_pos,
            mode: Mode::Normal,
            edits_completed: 0,
            running: RunningEffort::new(),
            effort: 0.0,
            cost: 0.0,
            sequences: Vec::new(),
        };
        initial.cost = self.heuristic(&initial, 0, &suffix_costs, &diffs, params.cost_weight);
        cost_map.insert(initial.key(), initial.cost);
        pq.push(Reverse(initial));

        let mut explored = 0usize;
        while let Some(Reverse(state)) = pq.pop() {
            explored += 1;
            if explored > params.max_search_depth {
                tracing::debug!(target: "optimizer.composition", "max search depth reached");
                break;
            }

            let k = state.edits_completed;
            if k == total_edits {
                // Final consistency gate: the flattened sequence must replay
                // to exactly the end buffer. Mini-buffer cursor drift can
                // produce near-miss candidates; they are dropped here.
                let flat = flatten_sequences(&state.sequences);
                let mut check_lines = start_lines.clone();
                let mut check_pos = start_pos;
                let mut check_mode = Mode::Normal;
                let consistent = core_sim::replay_commands(
                    &flat,
                    &mut check_lines,
                    &mut check_pos,
                    &mut check_mode,
                )
                .is_ok()
                    && check_lines == *end_lines
                    && check_mode == Mode::Normal;
                if consistent {
                    results.push(SearchResult::new(
                        state.sequences.clone(),
                        state.running.cost(self.model),
                    ));
                    if results.len() >= params.max_results {
                        break;
                    }
                } else {
                    tracing::debug!(
                        target: "optimizer.composition",
                        %flat,
                        "dropping inconsistent candidate"
                    );
                }
                continue;
            }
            if cost_map.get(&state.key()).is_some_and(|&c| c < state.cost) {
                continue;
            }

            let current_lines = &buffers[k];
            let diff = &diffs[k];

            // Edit transition: consume region k from a valid start offset.
            if state.mode == Mode::Normal
                && region_contains(state.pos, diff)
                && let Some(i) = buffer_pos_to_edit_index(state.pos, diff)
                && i < matrices[k].n
            {
                for j in 0..matrices[k].m {
                    let Some(cell) = matrices[k].get(i, j) else {
                        continue;
                    };
                    let mut next = state.clone();
                    next.edits_completed = k + 1;
                    next.mode = Mode::Normal;
                    next.pos = buffers[k + 1].clamp(edit_index_to_buffer_pos(j, diff));
                    for seq in &cell.sequences {
                        push_keys(&mut next.sequences, seq.mode, &seq.keys);
                    }
                    next.effort = next.running.append(&cell.keys, self.model);
                    next.cost = self.heuristic(
                        &next,
                        k + 1,
                        &suffix_costs,
                        &diffs,
                        params.cost_weight,
                    );
                    Self::explore(&mut pq, &mut cost_map, total_edits, budget, next);
                }
            }

            // Movement transition: approach region k.
            let last_line = current_lines.len() - 1;
            let sub_exclusions = MotionExclusions::new(
                exclusions.exclude_g || diff.pos_end.line < last_line,
                exclusions.exclude_gg || diff.pos_begin.line > 0,
            );
            let max_results = diff.deleted_char_count().clamp(1, 10);
            let movement_results = movement.optimize_to_range(
                current_lines,
                state.pos,
                &state.running,
                diff.pos_begin,
                diff.pos_end,
                "",
                false,
                sub_exclusions,
                motions,
                Some(OptimizerParams {
                    max_results,
                    effort_budget: Some(budget),
                    ..params
                }),
            );
            for moved in movement_results {
                let flat = flatten_sequences(&moved.sequences);
                if flat.is_empty() {
                    continue;
                }
                let Ok(keys) = tokenizer.tokenize(&flat) else {
                    tracing::debug!(target: "optimizer.composition", %flat, "untokenizable movement");
                    continue;
                };
                let mut next = state.clone();
                next.pos = moved.end_pos;
                push_keys(&mut next.sequences, Mode::Normal, &flat);
                next.effort = next.running.append(&keys, self.model);
                next.cost =
                    self.heuristic(&next, k, &suffix_costs, &diffs, params.cost_weight);
                Self::explore(&mut pq, &mut cost_map, total_edits, budget, next);
            }
        }

        results
    }

    fn explore(
        pq: &mut BinaryHeap<Reverse<CompositionState>>,
        cost_map: &mut HashMap<(usize, usize, bool, usize), f64>,
        total_edits: usize,
        budget: f64,
        state: CompositionState,
    ) {
        if state.effort > budget {
            return;
        }
        let key = state.key();
        match cost_map.get_mut(&key) {
            None => {
                // Goal states stay open so multiple full sequences surface.
                if state.edits_completed != total_edits {
                    cost_map.insert(key, state.cost);
                }
                pq.push(Reverse(state));
            }
            Some(existing) if state.cost <= *existing => {
                *existing = state.cost;
                pq.push(Reverse(state));
            }
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_diff::calculate;
    use pretty_assertions::assert_eq;

    #[test]
    fn edit_index_round_trips_through_buffer_positions() {
        let start = Lines::from_strs(&["aaa bbb ccc"]);
        let end = Lines::from_strs(&["aaa xyz ccc"]);
        let diff = &calculate(&start, &end)[0];
        // Region "bbb" at cols 4..=6.
        assert_eq!(buffer_pos_to_edit_index(Position::new(0, 4), diff), Some(0));
        assert_eq!(buffer_pos_to_edit_index(Position::new(0, 6), diff), Some(2));
        assert_eq!(buffer_pos_to_edit_index(Position::new(0, 3), diff), None);
        assert_eq!(edit_index_to_buffer_pos(0, diff), Position::new(0, 4));
        assert_eq!(edit_index_to_buffer_pos(2, diff), Position::new(0, 6));
    }

    #[test]
    fn multiline_edit_index_mapping() {
        let start = Lines::from_strs(&["abcd", "cd", "efgh"]);
        let end = Lines::from_strs(&["abcd", "XY", "efgh"]);
        let diff = &calculate(&start, &end)[0];
        assert_eq!(diff.deleted_text, "cd");
        assert_eq!(buffer_pos_to_edit_index(Position::new(1, 0), diff), Some(0));
        assert_eq!(buffer_pos_to_edit_index(Position::new(1, 1), diff), Some(1));
    }

    #[test]
    fn region_containment() {
        let start = Lines::from_strs(&["foo barbara"]);
        let end = Lines::from_strs(&["foo XXbarbara"]);
        let diff = &calculate(&start, &end)[0];
        assert!(diff.is_pure_insertion());
        assert!(region_contains(diff.pos_begin, diff));
        assert!(!region_contains(Position::new(0, 0), diff));
    }
}
