//! End-to-end movement search scenarios.

use core_effort::RunningEffort;
use core_keyboard::tables::{explorable_motions, sliced_motions, MotionTable};
use core_keyboard::CostModel;
use core_optimizer::{MotionExclusions, MovementOptimizer, OptimizerParams, SearchResult};
use core_sim::simulate_motions;
use core_text::{Lines, Mode, Position};

fn params() -> OptimizerParams {
    OptimizerParams {
        max_results: 60,
        max_search_depth: 20_000,
        ..OptimizerParams::default()
    }
}

fn run(
    lines: &Lines,
    start: Position,
    end: Position,
    user_seq: &str,
    motions: &MotionTable,
) -> Vec<SearchResult> {
    let model = CostModel::uniform();
    let optimizer = MovementOptimizer::new(&model, params());
    optimizer.optimize(
        lines,
        start,
        &RunningEffort::new(),
        end,
        user_seq,
        MotionExclusions::default(),
        motions,
        None,
    )
}

fn flats(results: &[SearchResult]) -> Vec<String> {
    results.iter().map(|r| r.flat()).collect()
}

fn contains_all(results: &[SearchResult], expected: &[&str]) -> bool {
    let flats = flats(results);
    expected.iter().all(|e| flats.iter().any(|f| f == e))
}

#[test]
fn single_line_horizontal() {
    let lines = Lines::from_strs(&["the quick brown fox"]);
    let user_seq = "we";
    let start = Position::origin();
    let (end, _) = simulate_motions(user_seq, &lines, start, Mode::Normal).unwrap();
    assert_eq!(end, Position::new(0, 8));

    let results = run(&lines, start, end, user_seq, &explorable_motions());
    assert!(
        contains_all(&results, &["we", "wE", "2e", "2E"]),
        "missing expected sequences in {:?}",
        flats(&results)
    );
}

#[test]
fn vertical_over_blank_lines() {
    // Blank lines at 4 and 7; nine lines total.
    let lines = Lines::from_strs(&["l0", "l1", "l2", "l3", "", "l5", "l6", "", "l8"]);
    let user_seq = "jjjjj";
    let start = Position::new(2, 0);
    let (end, _) = simulate_motions(user_seq, &lines, start, Mode::Normal).unwrap();
    assert_eq!(end, Position::new(7, 0));

    let motions = sliced_motions(&["j", "k", "G", "{", "}", "(", ")"]);
    let results = run(&lines, start, end, user_seq, &motions);
    assert!(
        contains_all(&results, &["Gk", "G{", "}}", "}jjj"]),
        "missing expected sequences in {:?}",
        flats(&results)
    );
}

#[test]
fn results_come_back_cheapest_first() {
    let lines = Lines::from_strs(&["the quick brown fox jumps over"]);
    let start = Position::origin();
    let end = Position::new(0, 16);
    let results = run(&lines, start, end, "wwww", &explorable_motions());
    assert!(!results.is_empty());
    for pair in results.windows(2) {
        assert!(pair[0].key_cost <= pair[1].key_cost + 1e-9);
    }
}

#[test]
fn budget_bounds_every_result() {
    let model = CostModel::uniform();
    let lines = Lines::from_strs(&["alpha beta gamma delta"]);
    let user_seq = "ww";
    let start = Position::origin();
    let (end, _) = simulate_motions(user_seq, &lines, start, Mode::Normal).unwrap();

    let optimizer = MovementOptimizer::new(&model, params());
    let results = optimizer.optimize(
        &lines,
        start,
        &RunningEffort::new(),
        end,
        user_seq,
        MotionExclusions::default(),
        &explorable_motions(),
        None,
    );
    assert!(!results.is_empty());
    // "ww" under uniform weights: 2.0 base minus the same-key reward, then
    // the 2.0 explore factor.
    let budget = (2.0 - 0.2) * 2.0;
    for result in &results {
        assert!(
            result.key_cost <= budget + 1e-9,
            "{} over budget",
            result.flat()
        );
    }
}

#[test]
fn every_result_lands_on_the_goal() {
    let lines = Lines::from_strs(&["One two. Three four.", "", "Five six seven"]);
    let user_seq = "jjww";
    let start = Position::origin();
    let (end, _) = simulate_motions(user_seq, &lines, start, Mode::Normal).unwrap();
    let results = run(&lines, start, end, user_seq, &explorable_motions());
    assert!(!results.is_empty());
    for result in &results {
        let (pos, _) =
            simulate_motions(&result.flat(), &lines, start, Mode::Normal).unwrap();
        assert_eq!(pos, end, "{} missed the goal", result.flat());
    }
}

#[test]
fn exclusions_remove_file_jumps() {
    let lines = Lines::from_strs(&["a", "b", "c", "d", "e"]);
    let start = Position::new(1, 0);
    let end = Position::new(3, 0);
    let motions = sliced_motions(&["j", "k", "G", "gg"]);
    let model = CostModel::uniform();
    let optimizer = MovementOptimizer::new(&model, params());
    let results = optimizer.optimize(
        &lines,
        start,
        &RunningEffort::new(),
        end,
        "jj",
        MotionExclusions::new(true, true),
        &motions,
        None,
    );
    for result in &results {
        let flat = result.flat();
        assert!(!flat.contains('G'), "G leaked into {flat}");
        assert!(!flat.contains("gg"), "gg leaked into {flat}");
    }
}

#[test]
fn range_variant_reaches_multiple_positions() {
    let lines = Lines::from_strs(&["alpha beta gamma delta"]);
    let model = CostModel::uniform();
    let optimizer = MovementOptimizer::new(&model, params());
    let results = optimizer.optimize_to_range(
        &lines,
        Position::origin(),
        &RunningEffort::new(),
        Position::new(0, 11),
        Position::new(0, 15),
        "www",
        false,
        MotionExclusions::default(),
        &explorable_motions(),
        None,
    );
    assert!(!results.is_empty());
    let mut seen = std::collections::HashSet::new();
    for result in &results {
        assert!(result.end_pos.col >= 11 && result.end_pos.col <= 15);
        assert!(seen.insert((result.end_pos.line, result.end_pos.col)));
        let (pos, _) = simulate_motions(
            &core_optimizer::flatten_sequences(&result.sequences),
            &lines,
            Position::origin(),
            Mode::Normal,
        )
        .unwrap();
        assert_eq!(pos, result.end_pos);
    }
}
