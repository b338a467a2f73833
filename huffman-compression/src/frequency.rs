use std::collections::HashMap;

use itertools::Itertools;

use crate::tree::Node;

/// Occurrence count of every distinct symbol in a text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable(HashMap<char, usize>);

impl FrequencyTable {
    pub fn from_text(text: &str) -> Self {
        let counts = text
            .chars()
            .into_grouping_map_by(|&ch| ch)
            .fold(0, |acc, _key, _value| acc + 1);
        Self(counts)
    }

    /// Folds in the counts of another table, e.g. one counted over a different shard
    /// of the same input.
    pub fn merge(mut self, other: FrequencyTable) -> Self {
        for (symbol, count) in other.0 {
            *self.0.entry(symbol).or_default() += count;
        }
        self
    }

    pub fn count(&self, symbol: char) -> Option<usize> {
        self.0.get(&symbol).copied()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of symbols counted, i.e. the length of the input in characters.
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// `(symbol, count)` pairs ordered by `(count, symbol)` ascending.
    pub fn sorted_counts(&self) -> Vec<(char, usize)> {
        self.0
            .iter()
            .map(|(&symbol, &count)| (symbol, count))
            .sorted_by_key(|&(symbol, count)| (count, symbol))
            .collect_vec()
    }

    /// One leaf per distinct symbol, in the same order as [`Self::sorted_counts`].
    pub fn leaves(&self) -> Vec<Node> {
        self.sorted_counts().into_iter().map_into().collect_vec()
    }
}

impl FromIterator<(char, usize)> for FrequencyTable {
    fn from_iter<T: IntoIterator<Item = (char, usize)>>(iter: T) -> Self {
        let table = iter
            .into_iter()
            .filter(|&(_, count)| count > 0)
            .into_grouping_map()
            .sum();
        Self(table)
    }
}
