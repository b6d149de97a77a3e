//! Mode-tagged command segments.
//!
//! A full result can change mode mid-way (`ci(new text<Esc>`), so results
//! carry an ordered list of `(mode, keys)` segments. Flattening drops the
//! annotations; formatting keeps them for display.

use core_text::Mode;

/// A run of command keys executed in one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub keys: String,
    pub mode: Mode,
}

impl Sequence {
    pub fn new(mode: Mode) -> Self {
        Self {
            keys: String::new(),
            mode,
        }
    }

    pub fn with_keys(keys: impl Into<String>, mode: Mode) -> Self {
        Self {
            keys: keys.into(),
            mode,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn append(&mut self, s: &str) {
        self.keys.push_str(s);
    }
}

/// Concatenate all segment keys, dropping mode annotations.
pub fn flatten_sequences(seqs: &[Sequence]) -> String {
    let total: usize = seqs.iter().map(|s| s.keys.len()).sum();
    let mut out = String::with_capacity(total);
    for s in seqs {
        out.push_str(&s.keys);
    }
    out
}

/// Human-readable form with mode annotations, e.g. `[n]ci([i]new text<Esc>`.
pub fn format_sequences(seqs: &[Sequence]) -> String {
    let mut out = String::new();
    for s in seqs {
        out.push_str(match s.mode {
            Mode::Normal => "[n]",
            Mode::Insert => "[i]",
        });
        out.push_str(&s.keys);
    }
    out
}

/// Append keys to a segment list, merging with the tail segment when the
/// mode matches.
pub fn push_keys(seqs: &mut Vec<Sequence>, mode: Mode, keys: &str) {
    match seqs.last_mut() {
        Some(last) if last.mode == mode => last.append(keys),
        _ => seqs.push(Sequence::with_keys(keys, mode)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_merges_same_mode_runs() {
        let mut seqs = Vec::new();
        push_keys(&mut seqs, Mode::Normal, "ci(");
        push_keys(&mut seqs, Mode::Insert, "new");
        push_keys(&mut seqs, Mode::Insert, " text");
        push_keys(&mut seqs, Mode::Insert, "<Esc>");
        assert_eq!(seqs.len(), 2);
        assert_eq!(flatten_sequences(&seqs), "ci(new text<Esc>");
        assert_eq!(format_sequences(&seqs), "[n]ci([i]new text<Esc>");
    }
}
