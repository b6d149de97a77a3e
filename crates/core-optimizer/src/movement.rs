//! A\* search for low-effort cursor paths.
//!
//! Nodes are `(position, running effort)`; `f = w·g + h` with Manhattan
//! distance as the heuristic. The closed set is keyed by `(line, col)` and
//! re-pushes equal-cost nodes so multiple optimal sequences surface. A node
//! is pruned once its accumulated effort exceeds the adaptive budget derived
//! from the user's own sequence.

use crate::params::OptimizerParams;
use crate::result::{RangeResult, SearchResult};
use core_effort::{sequence_effort, RunningEffort};
use core_index::{BufferIndex, LandingType};
use core_keyboard::tables::{char_keys, MotionTable};
use core_keyboard::{CostModel, KeySeq, SequenceTokenizer};
use core_sim::apply_motion;
use core_sim::motion::find_targets;
use core_text::{Lines, Position};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, BTreeMap, HashMap};

/// Jump motions a caller may forbid when the search region cannot reach the
/// buffer's first or last line (prevents degenerate "press G then backtrack"
/// paths).
#[derive(Debug, Clone, Copy, Default)]
pub struct MotionExclusions {
    pub exclude_g: bool,
    pub exclude_gg: bool,
}

impl MotionExclusions {
    pub fn new(exclude_g: bool, exclude_gg: bool) -> Self {
        Self {
            exclude_g,
            exclude_gg,
        }
    }

    fn apply(&self, table: &MotionTable) -> MotionTable {
        let mut table = table.clone();
        if self.exclude_g {
            table.remove("G");
        }
        if self.exclude_gg {
            table.remove("gg");
        }
        table
    }
}

/// Count-prefixed motions priced via the buffer index: forward name,
/// backward name, landing category. The word family only pays off within a
/// line; paragraphs and sentences work globally.
const COUNT_SEARCHABLE_LINE: &[(&str, &str, LandingType)] = &[
    ("w", "b", LandingType::WordBegin),
    ("e", "ge", LandingType::WordEnd),
    ("W", "B", LandingType::WordBeginBig),
    ("E", "gE", LandingType::WordEndBig),
];

const COUNT_SEARCHABLE_GLOBAL: &[(&str, &str, LandingType)] = &[
    ("}", "{", LandingType::Paragraph),
    (")", "(", LandingType::Sentence),
];

#[derive(Clone)]
struct MotionState {
    pos: Position,
    running: RunningEffort,
    effort: f64,
    cost: f64,
    seq: String,
}

impl MotionState {
    fn key(&self) -> (usize, usize) {
        (self.pos.line, self.pos.col)
    }
}

impl PartialEq for MotionState {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}
impl Eq for MotionState {}
impl PartialOrd for MotionState {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for MotionState {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.cost.total_cmp(&other.cost)
    }
}

/// The index prices candidates from coarse landing categories, which can
/// diverge from exact motion semantics around punctuation and paragraph
/// edges. A candidate only survives if pressing the motion `count` times
/// really lands there, so emitted sequences always replay exactly.
fn count_motion_verifies(
    lines: &Lines,
    start: Position,
    motion: &str,
    candidate: &core_index::RepeatMotion,
) -> bool {
    let mut pos = start;
    for _ in 0..candidate.count {
        apply_motion(lines, &mut pos, motion);
    }
    pos == candidate.pos
}

/// Physical keys for `{count}{motion}`.
fn count_prefixed_keys(count: usize, motion_keys: &KeySeq) -> KeySeq {
    let mut keys = KeySeq::new();
    for c in count.to_string().chars() {
        keys.extend(char_keys(c).expect("digits are in the model"));
    }
    keys.extend(motion_keys.iter().copied());
    keys
}

pub struct MovementOptimizer<'a> {
    model: &'a CostModel,
    pub params: OptimizerParams,
    tokenizer: SequenceTokenizer,
}

impl<'a> MovementOptimizer<'a> {
    pub fn new(model: &'a CostModel, params: OptimizerParams) -> Self {
        Self {
            model,
            params,
            tokenizer: SequenceTokenizer::new(),
        }
    }

    fn dist(p: Position, q: Position) -> f64 {
        (p.line.abs_diff(q.line) + p.target_col.abs_diff(q.target_col)) as f64
    }

    fn heuristic(&self, s: &MotionState, goal: Position, cost_weight: f64) -> f64 {
        cost_weight * s.effort + Self::dist(s.pos, goal)
    }

    fn heuristic_to_range(
        &self,
        s: &MotionState,
        begin: Position,
        end: Position,
        cost_weight: f64,
    ) -> f64 {
        if s.pos >= begin && s.pos <= end {
            return cost_weight * s.effort;
        }
        let closest = if s.pos < begin { begin } else { end };
        cost_weight * s.effort + Self::dist(s.pos, closest)
    }

    /// Single-goal search. `starting_effort` is continued from the caller so
    /// bigram effects across the seam are priced; everything else is fresh.
    #[allow(clippy::too_many_arguments)]
    pub fn optimize(
        &self,
        lines: &Lines,
        start_pos: Position,
        starting_effort: &RunningEffort,
        end_pos: Position,
        user_sequence: &str,
        exclusions: MotionExclusions,
        motions: &MotionTable,
        params_override: Option<OptimizerParams>,
    ) -> Vec<SearchResult> {
        let params = params_override.unwrap_or(self.params);
        let motions = exclusions.apply(motions);
        let index = BufferIndex::new(lines);

        let baseline = sequence_effort(user_sequence, &self.tokenizer, self.model);
        let budget = params.budget(baseline);
        tracing::debug!(
            target: "optimizer.movement",
            user_sequence,
            baseline,
            budget,
            "starting movement search"
        );

        let mut results: Vec<SearchResult> = Vec::new();
        let mut cost_map: HashMap<(usize, usize), f64> = HashMap::new();
        let goal_key = (end_pos.line, end_pos.col);

        let mut pq: BinaryHeap<Reverse<MotionState>> = BinaryHeap::new();

        let mut initial = MotionState {
            pos: start_pos,
            running: starting_effort.clone(),
            effort: starting_effort.cost(self.model),
            cost: 0.0,
            seq: String::new(),
        };
        initial.cost = self.heuristic(&initial, end_pos, params.cost_weight);
        cost_map.insert(initial.key(), initial.cost);
        pq.push(Reverse(initial));

        let mut explored = 0usize;
        while let Some(Reverse(state)) = pq.pop() {
            explored += 1;
            if explored > params.max_search_depth {
                tracing::debug!(target: "optimizer.movement", "max search depth reached");
                break;
            }

            let state_key = state.key();
            if state_key == goal_key {
                results.push(SearchResult::normal(
                    state.seq.clone(),
                    state.running.cost(self.model),
                ));
                if results.len() >= params.max_results {
                    tracing::debug!(target: "optimizer.movement", "max result count reached");
                    break;
                }
                continue;
            }
            // Stale entry: a cheaper path to this position was found since.
            if cost_map.get(&state_key).is_some_and(|&c| c < state.cost) {
                continue;
            }

            let forward = state.pos < end_pos;

            // Same-line expansions: f{c};; candidates and count-prefixed
            // word-family motions.
            if state.pos.line == end_pos.line {
                let line = &lines[state.pos.line];
                let (find_cmd, repeat) = if forward { ('f', ';') } else { ('F', ';') };
                for (c, col, repeats) in find_targets(
                    line,
                    state.pos.col,
                    end_pos.col,
                    params.f_motion_threshold,
                    forward,
                ) {
                    let Some(target_keys) = char_keys(c) else {
                        tracing::debug!(target: "optimizer.movement", ?c, "unsupported f target");
                        continue;
                    };
                    let mut motion = String::new();
                    let mut keys = char_keys(find_cmd).expect("f/F are mapped");
                    motion.push(find_cmd);
                    motion.push(c);
                    keys.extend(target_keys);
                    for _ in 0..repeats {
                        motion.push(repeat);
                        keys.extend(char_keys(repeat).expect("';' is mapped"));
                    }
                    let mut next = state.clone();
                    next.pos.set_col(col);
                    next.seq.push_str(&motion);
                    next.effort = next.running.append(&keys, self.model);
                    next.cost = self.heuristic(&next, end_pos, params.cost_weight);
                    Self::explore(&mut pq, &mut cost_map, goal_key, budget, next);
                }

                for (fwd, back, landing) in COUNT_SEARCHABLE_LINE {
                    let motion = if forward { fwd } else { back };
                    let Some(motion_keys) = motions.get(motion) else {
                        continue;
                    };
                    let Some(closest) = index.two_closest(*landing, state.pos, end_pos) else {
                        continue;
                    };
                    for candidate in closest {
                        if !candidate.valid()
                            || !count_motion_verifies(lines, state.pos, motion, &candidate)
                        {
                            continue;
                        }
                        let keys = count_prefixed_keys(candidate.count, motion_keys);
                        let mut next = state.clone();
                        next.pos = candidate.pos;
                        next.seq.push_str(&candidate.count.to_string());
                        next.seq.push_str(motion);
                        next.effort = next.running.append(&keys, self.model);
                        next.cost = self.heuristic(&next, end_pos, params.cost_weight);
                        Self::explore(&mut pq, &mut cost_map, goal_key, budget, next);
                    }
                }
            }

            // Global expansions: every enabled motion, plus count-prefixed
            // paragraph/sentence jumps.
            for (motion, keys) in &motions {
                let mut next = state.clone();
                apply_motion(lines, &mut next.pos, motion);
                next.seq.push_str(motion);
                next.effort = next.running.append(keys, self.model);
                next.cost = self.heuristic(&next, end_pos, params.cost_weight);
                Self::explore(&mut pq, &mut cost_map, goal_key, budget, next);
            }

            for (fwd, back, landing) in COUNT_SEARCHABLE_GLOBAL {
                let motion = if forward { fwd } else { back };
                let Some(motion_keys) = motions.get(motion) else {
                    continue;
                };
                let Some(closest) = index.two_closest(*landing, state.pos, end_pos) else {
                    continue;
                };
                for candidate in closest {
                    if !candidate.valid()
                        || !count_motion_verifies(lines, state.pos, motion, &candidate)
                    {
                        continue;
                    }
                    let keys = count_prefixed_keys(candidate.count, motion_keys);
                    let mut next = state.clone();
                    next.pos = candidate.pos;
                    next.seq.push_str(&candidate.count.to_string());
                    next.seq.push_str(motion);
                    next.effort = next.running.append(&keys, self.model);
                    next.cost = self.heuristic(&next, end_pos, params.cost_weight);
                    Self::explore(&mut pq, &mut cost_map, goal_key, budget, next);
                }
            }
        }

        results
    }

    fn explore(
        pq: &mut BinaryHeap<Reverse<MotionState>>,
        cost_map: &mut HashMap<(usize, usize), f64>,
        goal_key: (usize, usize),
        budget: f64,
        state: MotionState,
    ) {
        if state.effort > budget {
            return;
        }
        let key = state.key();
        match cost_map.get_mut(&key) {
            None => {
                // Goal positions stay open so multiple paths can reach them.
                if key != goal_key {
                    cost_map.insert(key, state.cost);
                }
                pq.push(Reverse(state));
            }
            // Equal costs re-push: equal-optimum sequences are wanted.
            Some(existing) if state.cost <= *existing => {
                *existing = state.cost;
                pq.push(Reverse(state));
            }
            Some(_) => {}
        }
    }

    /// Range-goal variant: reach any position in `[range_begin, range_end]`.
    /// Only plain motions are expanded. Returns the best path per distinct
    /// end position, or every found path when `all_paths_per_position`.
    #[allow(clippy::too_many_arguments)]
    pub fn optimize_to_range(
        &self,
        lines: &Lines,
        start_pos: Position,
        starting_effort: &RunningEffort,
        range_begin: Position,
        range_end: Position,
        user_sequence: &str,
        all_paths_per_position: bool,
        exclusions: MotionExclusions,
        motions: &MotionTable,
        params_override: Option<OptimizerParams>,
    ) -> Vec<RangeResult> {
        let params = params_override.unwrap_or(self.params);
        let motions = exclusions.apply(motions);

        let baseline = sequence_effort(user_sequence, &self.tokenizer, self.model);
        let budget = params.budget(baseline);

        let in_range = |pos: Position| pos >= range_begin && pos <= range_end;

        let mut best_by_pos: BTreeMap<(usize, usize), RangeResult> = BTreeMap::new();
        let mut all_results: Vec<RangeResult> = Vec::new();
        let mut cost_map: HashMap<(usize, usize), f64> = HashMap::new();
        let mut pq: BinaryHeap<Reverse<MotionState>> = BinaryHeap::new();

        let mut initial = MotionState {
            pos: start_pos,
            running: starting_effort.clone(),
            effort: starting_effort.cost(self.model),
            cost: 0.0,
            seq: String::new(),
        };
        initial.cost =
            self.heuristic_to_range(&initial, range_begin, range_end, params.cost_weight);
        cost_map.insert(initial.key(), initial.cost);
        pq.push(Reverse(initial));

        let mut explored = 0usize;
        while let Some(Reverse(state)) = pq.pop() {
            explored += 1;
            if explored > params.max_search_depth {
                tracing::debug!(target: "optimizer.movement", "range search depth reached");
                break;
            }

            let state_key = state.key();
            if in_range(state.pos) {
                let effort = state.running.cost(self.model);
                if all_paths_per_position {
                    all_results.push(RangeResult {
                        sequences: SearchResult::normal(state.seq.clone(), effort).sequences,
                        key_cost: effort,
                        end_pos: state.pos,
                    });
                    if all_results.len() >= params.max_results {
                        break;
                    }
                } else {
                    match best_by_pos.get_mut(&state_key) {
                        None => {
                            best_by_pos.insert(state_key, RangeResult {
                                sequences: SearchResult::normal(state.seq.clone(), effort)
                                    .sequences,
                                key_cost: effort,
                                end_pos: state.pos,
                            });
                            if best_by_pos.len() >= params.max_results {
                                break;
                            }
                        }
                        Some(existing) if effort < existing.key_cost => {
                            *existing = RangeResult {
                                sequences: SearchResult::normal(state.seq.clone(), effort)
                                    .sequences,
                                key_cost: effort,
                                end_pos: state.pos,
                            };
                        }
                        Some(_) => {}
                    }
                }
                continue;
            }
            if cost_map.get(&state_key).is_some_and(|&c| c < state.cost) {
                continue;
            }

            for (motion, keys) in &motions {
                let mut next = state.clone();
                apply_motion(lines, &mut next.pos, motion);
                next.seq.push_str(motion);
                next.effort = next.running.append(keys, self.model);
                next.cost =
                    self.heuristic_to_range(&next, range_begin, range_end, params.cost_weight);

                if next.effort > budget {
                    continue;
                }
                let key = next.key();
                match cost_map.get_mut(&key) {
                    None => {
                        if !in_range(next.pos) {
                            cost_map.insert(key, next.cost);
                        }
                        pq.push(Reverse(next));
                    }
                    Some(existing) if next.cost <= *existing => {
                        *existing = next.cost;
                        pq.push(Reverse(next));
                    }
                    Some(_) => {}
                }
            }
        }

        if all_paths_per_position {
            all_results
        } else {
            best_by_pos.into_values().collect()
        }
    }
}
