//! Longest-match tokenizer from command strings to physical key sequences.
//!
//! This prices *keystrokes*, not semantics: `"gg"` is two `g` presses, `"G"`
//! is `Shift`+`g`. Semantic parsing (counts, operators, `f{c}` targets) lives
//! in `core-sim`.

use crate::tables::{action_tokens, explorable_motions};
use crate::KeySeq;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("unknown token at position {pos} near '{preview}'")]
    UnknownToken { pos: usize, preview: String },
}

/// Greedy longest-match tokenizer over a fixed token dictionary. Pure and
/// side-effect free; build once, share freely.
pub struct SequenceTokenizer {
    /// Sorted by descending token length (then lexicographically for a
    /// stable order), so `"gg"` wins over `"g"`.
    tokens: Vec<(String, KeySeq)>,
}

impl SequenceTokenizer {
    pub fn new() -> Self {
        let mut tokens = action_tokens();
        for (name, keys) in explorable_motions() {
            if !tokens.iter().any(|(t, _)| t == name) {
                tokens.push((name.to_string(), keys));
            }
        }
        tokens.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Self { tokens }
    }

    /// Flatten a command string into physical keys. Fails loudly with the
    /// position and a short preview of the unmatched input.
    pub fn tokenize(&self, s: &str) -> Result<KeySeq, TokenizeError> {
        let mut out = KeySeq::new();
        let mut i = 0;
        while i < s.len() {
            let rest = &s[i..];
            let matched = self
                .tokens
                .iter()
                .find(|(token, _)| rest.starts_with(token.as_str()));
            match matched {
                Some((token, keys)) => {
                    out.extend(keys.iter().copied());
                    i += token.len();
                }
                None => {
                    return Err(TokenizeError::UnknownToken {
                        pos: i,
                        preview: rest.chars().take(8).collect(),
                    });
                }
            }
        }
        Ok(out)
    }
}

impl Default for SequenceTokenizer {
    fn default() -> Self {
        Self::new()
    }
}
