//! Levenshtein distance against a fixed goal with a prefix cache.
//!
//! The edit search queries distances for many sources sharing long prefixes
//! (each expansion perturbs the buffer tail far more often than the head).
//! Completed DP rows are cached keyed by a hash of the source prefix; a query
//! resumes from the longest cached prefix instead of row 0.
//!
//! The prefix length is mixed into the hash: without it, a cached row for
//! "abc" as a prefix of "abcd" could be picked up for "abcx".

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

pub struct Levenshtein {
    goal: Vec<char>,
    /// DP row for the empty source.
    base_row: Vec<usize>,
    cache: std::cell::RefCell<HashMap<u64, Vec<usize>>>,
    cache_interval: usize,
}

impl Levenshtein {
    pub fn new(goal: &str) -> Self {
        let goal: Vec<char> = goal.chars().collect();
        let base_row: Vec<usize> = (0..=goal.len()).collect();
        Self {
            goal,
            base_row,
            cache: std::cell::RefCell::new(HashMap::new()),
            cache_interval: 4,
        }
    }

    pub fn goal(&self) -> String {
        self.goal.iter().collect()
    }

    /// Cache a row every N source rows. Lower = more memory, fewer
    /// recomputed rows.
    pub fn set_cache_interval(&mut self, interval: usize) {
        self.cache_interval = interval.max(1);
    }

    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    fn hash_prefix(source: &[char], len: usize) -> u64 {
        let mut hasher = DefaultHasher::new();
        source[..len].hash(&mut hasher);
        let mut h = hasher.finish();
        // Mix in the length to distinguish equal-content prefixes of
        // different strings.
        h ^= (len as u64)
            .wrapping_add(0x9e37_79b9)
            .wrapping_add(h << 6)
            .wrapping_add(h >> 2);
        h
    }

    /// Edit distance from `source` to the goal.
    pub fn distance(&self, source: &str) -> usize {
        let source: Vec<char> = source.chars().collect();
        if source == self.goal {
            return 0;
        }
        if source.is_empty() {
            return self.goal.len();
        }
        if self.goal.is_empty() {
            return source.len();
        }

        // Longest cached prefix wins.
        let mut cached_len = 0;
        let mut prev_row = self.base_row.clone();
        {
            let cache = self.cache.borrow();
            for len in (1..=source.len()).rev() {
                if let Some(row) = cache.get(&Self::hash_prefix(&source, len)) {
                    cached_len = len;
                    prev_row = row.clone();
                    break;
                }
            }
        }

        let mut curr_row = vec![0usize; self.goal.len() + 1];
        for i in cached_len..source.len() {
            curr_row[0] = i + 1;
            for j in 0..self.goal.len() {
                let delete = prev_row[j + 1] + 1;
                let insert = curr_row[j] + 1;
                let replace = prev_row[j] + usize::from(source[i] != self.goal[j]);
                curr_row[j + 1] = delete.min(insert).min(replace);
            }
            if (i + 1) % self.cache_interval == 0 || i == source.len() - 1 {
                self.cache
                    .borrow_mut()
                    .insert(Self::hash_prefix(&source, i + 1), curr_row.clone());
            }
            std::mem::swap(&mut prev_row, &mut curr_row);
        }

        prev_row[self.goal.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reference(a: &str, b: &str) -> usize {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
        for (i, row) in dp.iter_mut().enumerate() {
            row[0] = i;
        }
        for j in 0..=b.len() {
            dp[0][j] = j;
        }
        for i in 1..=a.len() {
            for j in 1..=b.len() {
                dp[i][j] = (dp[i - 1][j] + 1)
                    .min(dp[i][j - 1] + 1)
                    .min(dp[i - 1][j - 1] + usize::from(a[i - 1] != b[j - 1]));
            }
        }
        dp[a.len()][b.len()]
    }

    #[test]
    fn classic_cases() {
        let lev = Levenshtein::new("hello");
        assert_eq!(lev.distance("hello"), 0);
        assert_eq!(lev.distance(""), 5);
        assert_eq!(lev.distance("hallo"), 1);
        assert_eq!(lev.distance("helo"), 1);
        assert_eq!(lev.distance("helloo"), 1);
        let lev = Levenshtein::new("sitting");
        assert_eq!(lev.distance("kitten"), 3);
    }

    #[test]
    fn newlines_are_plain_characters() {
        let lev = Levenshtein::new("aaa\nbbb");
        assert_eq!(lev.distance("aaa\nbbb"), 0);
        assert_eq!(lev.distance("aaabbb"), 1);
        assert_eq!(lev.distance("aaa\nccc"), 3);
        let lev = Levenshtein::new("aaabbb");
        assert_eq!(lev.distance("aaa\nbbb"), 1);
    }

    #[test]
    fn caching_does_not_change_results() {
        let lev = Levenshtein::new("hello world");
        let d1 = lev.distance("hello earth");
        let d2 = lev.distance("hello venus");
        let d3 = lev.distance("hello earth");
        assert_eq!(d1, d3);
        assert_eq!(d1, 4);
        assert_eq!(d2, 5);
    }

    #[test]
    fn clear_cache_is_safe() {
        let lev = Levenshtein::new("goal");
        lev.distance("test1");
        lev.distance("test2");
        lev.clear_cache();
        assert_eq!(lev.distance("goal"), 0);
        assert_eq!(lev.distance("goa"), 1);
    }

    #[test]
    fn different_prefixes_do_not_collide() {
        let lev = Levenshtein::new("abcdefgh");
        assert_eq!(lev.distance("abcXefgh"), 1);
        assert_eq!(lev.distance("abYdefgh"), 1);
        assert_eq!(lev.distance("Zbcdefgh"), 1);
        // A shorter string sharing a cached prefix of a longer one.
        assert_eq!(lev.distance("abcX"), 5);
        assert_eq!(lev.distance("abc"), 5);
    }

    proptest! {
        // Agreement with the reference O(nm) DP on short 4-letter strings,
        // interleaving queries so the cache is actually exercised.
        #[test]
        fn agrees_with_reference(
            goal in "[abcd]{0,20}",
            sources in proptest::collection::vec("[abcd]{0,20}", 1..8),
        ) {
            let lev = Levenshtein::new(&goal);
            for source in &sources {
                prop_assert_eq!(lev.distance(source), reference(source, &goal));
            }
            // Repeat in reverse to hit cached prefixes.
            for source in sources.iter().rev() {
                prop_assert_eq!(lev.distance(source), reference(source, &goal));
            }
        }
    }
}
