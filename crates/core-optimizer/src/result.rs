//! Result types shared by the three searches.

use crate::sequence::{flatten_sequences, format_sequences, Sequence};
use core_keyboard::KeySeq;
use core_text::{Mode, Position};

/// One found keystroke sequence with its scalar effort.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub sequences: Vec<Sequence>,
    pub key_cost: f64,
}

impl SearchResult {
    pub fn new(sequences: Vec<Sequence>, key_cost: f64) -> Self {
        Self {
            sequences,
            key_cost,
        }
    }

    /// Single Normal-mode sequence from a plain string.
    pub fn normal(keys: impl Into<String>, key_cost: f64) -> Self {
        let keys = keys.into();
        let sequences = if keys.is_empty() {
            Vec::new()
        } else {
            vec![Sequence::with_keys(keys, Mode::Normal)]
        };
        Self {
            sequences,
            key_cost,
        }
    }

    pub fn flat(&self) -> String {
        flatten_sequences(&self.sequences)
    }

    pub fn formatted(&self) -> String {
        format_sequences(&self.sequences)
    }
}

/// A found sequence plus where it ends; used by the range variant of the
/// movement search.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeResult {
    pub sequences: Vec<Sequence>,
    pub key_cost: f64,
    pub end_pos: Position,
}

impl RangeResult {
    pub fn flat(&self) -> String {
        flatten_sequences(&self.sequences)
    }
}

/// One edit-matrix cell: the cheapest found way to realize the region's
/// change starting at deleted-offset `i` and ending at inserted-offset `j`,
/// with the physical keys so callers can splice the effort stream.
#[derive(Debug, Clone, PartialEq)]
pub struct EditPath {
    pub sequences: Vec<Sequence>,
    pub keys: KeySeq,
    pub key_cost: f64,
}

/// Dense `n x m` table over (start offset in deleted text, end offset in
/// inserted text). Dimensions are clamped to at least 1 so pure insertions
/// and deletions keep a valid row/column (offset 0).
#[derive(Debug)]
pub struct EditMatrix {
    pub n: usize,
    pub m: usize,
    cells: Vec<Option<EditPath>>,
}

impl EditMatrix {
    pub fn new(deleted_chars: usize, inserted_chars: usize) -> Self {
        let n = deleted_chars.max(1);
        let m = inserted_chars.max(1);
        Self {
            n,
            m,
            cells: vec![None; n * m],
        }
    }

    pub fn get(&self, i: usize, j: usize) -> Option<&EditPath> {
        self.cells[i * self.m + j].as_ref()
    }

    /// Keep the cheaper of the existing cell and `path`.
    pub fn offer(&mut self, i: usize, j: usize, path: EditPath) {
        let slot = &mut self.cells[i * self.m + j];
        match slot {
            Some(existing) if existing.key_cost <= path.key_cost => {}
            _ => *slot = Some(path),
        }
    }

    pub fn valid_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn iter_valid(&self) -> impl Iterator<Item = (usize, usize, &EditPath)> {
        self.cells.iter().enumerate().filter_map(|(idx, cell)| {
            cell.as_ref().map(|path| (idx / self.m, idx % self.m, path))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_dimensions_clamp_to_one() {
        let m = EditMatrix::new(0, 3);
        assert_eq!((m.n, m.m), (1, 3));
        let m = EditMatrix::new(4, 0);
        assert_eq!((m.n, m.m), (4, 1));
    }

    #[test]
    fn offer_keeps_cheapest() {
        let mut m = EditMatrix::new(2, 2);
        let cheap = EditPath {
            sequences: vec![Sequence::with_keys("x", Mode::Normal)],
            keys: KeySeq::new(),
            key_cost: 1.0,
        };
        let pricey = EditPath {
            key_cost: 5.0,
            ..cheap.clone()
        };
        m.offer(0, 1, pricey.clone());
        m.offer(0, 1, cheap.clone());
        assert_eq!(m.get(0, 1).unwrap().key_cost, 1.0);
        m.offer(0, 1, pricey);
        assert_eq!(m.get(0, 1).unwrap().key_cost, 1.0);
        assert_eq!(m.valid_count(), 1);
    }
}
