//! Flat embedding API: configure a layout, override weights or individual
//! keys, and analyze a transcript in one call.
//!
//! Configuration is a plain owned value threaded into the searches; nothing
//! process-wide. Output is newline-separated `<sequence> <cost>` lines with
//! three decimals, best first.

use crate::composition::CompositionOptimizer;
use crate::movement::{MotionExclusions, MovementOptimizer};
use crate::params::OptimizerParams;
use crate::result::SearchResult;
use core_effort::RunningEffort;
use core_keyboard::tables::explorable_motions;
use core_keyboard::{CostModel, Key, KeyInfo, Weights};
use core_text::{Lines, Position};

/// The shipped layouts. `None` keeps whatever per-key table was already
/// configured (useful when every key is overridden by hand).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Uniform,
    Qwerty,
    ColemakDh,
    None,
}

impl LayoutKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "uniform" => Some(Self::Uniform),
            "qwerty" => Some(Self::Qwerty),
            "colemak-dh" | "colemakDh" | "colemak_dh" => Some(Self::ColemakDh),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// One analysis configuration: cost model plus search parameters.
#[derive(Debug, Clone)]
pub struct Analyzer {
    model: CostModel,
    pub params: OptimizerParams,
}

impl Analyzer {
    pub fn new(layout: LayoutKind) -> Self {
        let model = match layout {
            LayoutKind::Uniform | LayoutKind::None => CostModel::uniform(),
            LayoutKind::Qwerty => CostModel::qwerty(),
            LayoutKind::ColemakDh => CostModel::colemak_dh(),
        };
        Self {
            model,
            params: OptimizerParams::default(),
        }
    }

    pub fn set_layout(&mut self, layout: LayoutKind) {
        if layout != LayoutKind::None {
            *self = Self {
                model: Self::new(layout).model,
                params: self.params,
            };
        }
    }

    pub fn set_weights(&mut self, weights: Weights) {
        self.model.weights = weights;
    }

    pub fn set_key(&mut self, key: Key, info: KeyInfo) {
        self.model.set_key(key, info);
    }

    pub fn model(&self) -> &CostModel {
        &self.model
    }

    /// Run the analysis: movement search when the buffers are identical,
    /// composition otherwise. Results come back best first.
    #[allow(clippy::too_many_arguments)]
    pub fn analyze_results(
        &self,
        start_text: &str,
        start_row: usize,
        start_col: usize,
        end_text: &str,
        end_row: usize,
        end_col: usize,
        user_sequence: &str,
    ) -> Vec<SearchResult> {
        let start_lines = Lines::unflatten(start_text);
        let end_lines = Lines::unflatten(end_text);
        let start_pos = start_lines.clamp(Position::new(start_row, start_col));
        let motions = explorable_motions();
        let exclusions = MotionExclusions::default();

        let mut results = if start_lines == end_lines {
            let end_pos = end_lines.clamp(Position::new(end_row, end_col));
            let optimizer = MovementOptimizer::new(&self.model, self.params);
            optimizer.optimize(
                &start_lines,
                start_pos,
                &RunningEffort::new(),
                end_pos,
                user_sequence,
                exclusions,
                &motions,
                None,
            )
        } else {
            let optimizer = CompositionOptimizer::new(&self.model, self.params);
            optimizer.optimize(
                &start_lines,
                start_pos,
                &end_lines,
                user_sequence,
                exclusions,
                &motions,
                None,
            )
        };

        results.sort_by(|a, b| a.key_cost.total_cmp(&b.key_cost));
        results
    }

    /// String form of [`Analyzer::analyze_results`], one
    /// `<sequence> <cost>` line per result.
    #[allow(clippy::too_many_arguments)]
    pub fn analyze(
        &self,
        start_text: &str,
        start_row: usize,
        start_col: usize,
        end_text: &str,
        end_row: usize,
        end_col: usize,
        user_sequence: &str,
    ) -> String {
        let results = self.analyze_results(
            start_text,
            start_row,
            start_col,
            end_text,
            end_row,
            end_col,
            user_sequence,
        );
        if results.is_empty() {
            return "no results".to_string();
        }
        results
            .iter()
            .map(|r| format!("{} {:.3}", r.flat(), r.key_cost))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_names_parse() {
        assert_eq!(LayoutKind::parse("qwerty"), Some(LayoutKind::Qwerty));
        assert_eq!(LayoutKind::parse("colemak-dh"), Some(LayoutKind::ColemakDh));
        assert_eq!(LayoutKind::parse("dvorak"), None);
    }

    #[test]
    fn movement_analysis_formats_costs() {
        let analyzer = Analyzer::new(LayoutKind::Uniform);
        let out = analyzer.analyze("the quick brown fox", 0, 0, "the quick brown fox", 0, 8, "we");
        assert!(!out.is_empty());
        let first = out.lines().next().unwrap();
        let (_, cost) = first.rsplit_once(' ').unwrap();
        assert_eq!(cost.split('.').nth(1).unwrap().len(), 3);
    }

    #[test]
    fn key_overrides_change_costs() {
        let mut analyzer = Analyzer::new(LayoutKind::Uniform);
        analyzer.set_key(Key::W, KeyInfo {
            hand: None,
            finger: None,
            base_cost: 50.0,
        });
        assert_eq!(analyzer.model().info(Key::W).base_cost, 50.0);
    }
}
