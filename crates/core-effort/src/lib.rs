//! Running typing-effort accumulator.
//!
//! Consumes a stream of physical keys and maintains the per-term sums the
//! weighted cost is computed from: base key cost, same-finger and same-key
//! bigrams, hand alternation, same-hand run length past the threshold, and
//! roll direction. Value-typed: search nodes clone it freely.

use core_keyboard::{CostModel, Finger, Hand, Key, KeySeq, SequenceTokenizer, RUN_THRESHOLD};

/// Incremental effort state for a sequence of key presses. The reset state
/// (no prior key) scores zero.
#[derive(Debug, Clone, Default)]
pub struct RunningEffort {
    strokes: u32,
    sum_key_cost: f64,
    sum_same_finger: f64,
    sum_same_key: f64,
    sum_alternation: f64,
    sum_run_penalty: f64,
    sum_roll_good: f64,
    sum_roll_bad: f64,

    // Short-term memory
    last_key: Option<Key>,
    last_finger: Option<Finger>,
    last_hand: Option<Hand>,
    prev_finger: Option<Finger>,
    run_hand: Option<Hand>,
    run_len: u32,
}

impl RunningEffort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> u32 {
        self.strokes
    }

    /// Append a whole key sequence; returns the updated total cost.
    pub fn append(&mut self, keys: &KeySeq, model: &CostModel) -> f64 {
        for &key in keys {
            self.append_single(key, model);
        }
        self.cost(model)
    }

    fn append_single(&mut self, key: Key, model: &CostModel) {
        let info = model.info(key);

        self.strokes += 1;
        self.sum_key_cost += info.base_cost;

        if let (Some(last), Some(curr)) = (self.last_finger, info.finger)
            && last == curr
        {
            self.sum_same_finger += 1.0;
        }
        if self.last_key == Some(key) {
            self.sum_same_key += 1.0;
        }

        // Hand alternation and run length
        match (self.last_key, info.hand, self.last_hand) {
            (None, hand, _) => {
                self.run_hand = hand;
                self.run_len = hand.map_or(0, |_| 1);
            }
            (Some(_), Some(hand), Some(last_hand)) => {
                if hand != last_hand {
                    self.sum_alternation += 1.0;
                    self.run_hand = Some(hand);
                    self.run_len = 1;
                } else {
                    self.run_len += 1;
                    if self.run_len > RUN_THRESHOLD {
                        self.sum_run_penalty += f64::from(self.run_len - RUN_THRESHOLD);
                    }
                }
            }
            (Some(_), hand, _) => {
                self.run_hand = hand;
                self.run_len = hand.map_or(0, |_| 1);
            }
        }

        // Roll direction: consecutive same-hand strokes on different finger
        // positions. Positive delta moves inward (outer finger to inner).
        if self.last_key.is_some()
            && let (Some(last), Some(curr)) = (self.last_finger, info.finger)
            && last.hand() == curr.hand()
        {
            let prev_pos = last.position() as i8;
            let curr_pos = curr.position() as i8;
            if curr_pos > prev_pos {
                self.sum_roll_good += 1.0;
            } else if curr_pos < prev_pos {
                self.sum_roll_bad += 1.0;
            }
        }

        self.prev_finger = self.last_finger;
        self.last_finger = info.finger;
        self.last_hand = info.hand;
        self.last_key = Some(key);
    }

    /// Weighted total cost under the model's weights.
    pub fn cost(&self, model: &CostModel) -> f64 {
        let w = &model.weights;
        w.key * self.sum_key_cost
            + w.same_finger * self.sum_same_finger
            + w.same_key * self.sum_same_key
            + w.alternation * self.sum_alternation
            + w.run_penalty * self.sum_run_penalty
            + w.roll_good * self.sum_roll_good
            + w.roll_bad * self.sum_roll_bad
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Effort of a whole command string under a model. An untokenizable sequence
/// scores zero with a debug note so partial transcripts don't abort analysis.
pub fn sequence_effort(seq: &str, tokenizer: &SequenceTokenizer, model: &CostModel) -> f64 {
    match tokenizer.tokenize(seq) {
        Ok(keys) => {
            let mut effort = RunningEffort::new();
            effort.append(&keys, model)
        }
        Err(err) => {
            tracing::debug!(target: "effort", sequence = seq, %err, "malformed key sequence");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_keyboard::tables::string_keys;
    use proptest::prelude::*;

    #[test]
    fn reset_state_scores_zero() {
        let model = CostModel::qwerty();
        let effort = RunningEffort::new();
        assert_eq!(effort.cost(&model), 0.0);
        assert_eq!(effort.strokes(), 0);
    }

    #[test]
    fn uniform_counts_strokes() {
        let model = CostModel::uniform();
        let mut effort = RunningEffort::new();
        let keys: KeySeq = string_keys("we").unwrap();
        let cost = effort.append(&keys, &model);
        assert_eq!(effort.strokes(), 2);
        // Uniform has no hand metadata, so only base cost applies.
        assert!((cost - 2.0).abs() < 1e-9);
    }

    #[test]
    fn modifiers_are_free_under_uniform() {
        let model = CostModel::uniform();
        let mut effort = RunningEffort::new();
        // "W" = Shift + w: two strokes, Shift costs nothing.
        effort.append(&string_keys("W").unwrap(), &model);
        assert_eq!(effort.strokes(), 2);
        assert!((effort.cost(&model) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn same_key_repeat_is_rewarded_by_default() {
        let model = CostModel::uniform();
        let mut repeat = RunningEffort::new();
        repeat.append(&string_keys("jj").unwrap(), &model);
        let mut distinct = RunningEffort::new();
        distinct.append(&string_keys("jk").unwrap(), &model);
        assert!(repeat.cost(&model) < distinct.cost(&model));
    }

    #[test]
    fn alternation_and_rolls_need_hand_metadata() {
        let model = CostModel::qwerty();
        // j then f alternates hands (right index, left index).
        let mut alt = RunningEffort::new();
        alt.append(&string_keys("jf").unwrap(), &model);
        // a then s is a left-hand inward roll (pinky -> ring).
        let mut roll = RunningEffort::new();
        roll.append(&string_keys("as").unwrap(), &model);
        let base: f64 = [Key::A, Key::S]
            .iter()
            .map(|k| model.info(*k).base_cost)
            .sum();
        // Inward roll reward pulls the total under the plain base sum.
        assert!(roll.cost(&model) < base);
        let alt_base: f64 = [Key::J, Key::F]
            .iter()
            .map(|k| model.info(*k).base_cost)
            .sum();
        assert!(alt.cost(&model) < alt_base);
    }

    #[test]
    fn long_same_hand_run_penalized_when_weighted() {
        let mut model = CostModel::qwerty();
        model.weights.run_penalty = 1.0;
        model.weights.alternation = 0.0;
        model.weights.roll_good = 0.0;
        model.weights.roll_bad = 0.0;
        model.weights.same_key = 0.0;
        model.weights.same_finger = 0.0;
        // Six strokes on the right hand: runs of 5 and 6 exceed threshold 4.
        let mut run = RunningEffort::new();
        run.append(&string_keys("jkjkjk").unwrap(), &model);
        let base: f64 = "jkjkjk"
            .chars()
            .map(|c| {
                let keys = core_keyboard::tables::char_keys(c).unwrap();
                keys.iter().map(|k| model.info(*k).base_cost).sum::<f64>()
            })
            .sum();
        assert!((run.cost(&model) - (base + 1.0 + 2.0)).abs() < 1e-9);
    }

    proptest! {
        // Base-cost sum and stroke count never decrease.
        #[test]
        fn append_is_monotone(seq in "[a-z0-9]{0,24}") {
            let model = CostModel::qwerty();
            let mut effort = RunningEffort::new();
            let mut prev_strokes = 0;
            let mut prev_base = 0.0;
            for c in seq.chars() {
                let keys = core_keyboard::tables::char_keys(c).unwrap();
                effort.append(&keys, &model);
                prop_assert!(effort.strokes() >= prev_strokes);
                prop_assert!(effort.sum_key_cost >= prev_base);
                prev_strokes = effort.strokes();
                prev_base = effort.sum_key_cost;
            }
        }

        // Identical sequences under identical weights cost the same.
        #[test]
        fn determinism(seq in "[a-zA-Z0-9;,.]{0,24}") {
            let model = CostModel::colemak_dh();
            let keys = match string_keys(&seq) {
                Some(k) => k,
                None => return Ok(()),
            };
            let mut a = RunningEffort::new();
            let mut b = RunningEffort::new();
            prop_assert_eq!(a.append(&keys, &model), b.append(&keys, &model));
        }
    }
}
