// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use indexmap::IndexMap;
use serde::Serialize;

/// Total occurrences of one distinct word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedCount {
    pub key: String,
    pub total: u64,
}

/// One row of the top-N result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub key: String,
    pub total: u64,
}

impl From<AggregatedCount> for RankedEntry {
    fn from(count: AggregatedCount) -> Self {
        Self {
            key: count.key,
            total: count.total,
        }
    }
}

/// Length of a key in characters
pub fn key_length(key: &str) -> usize {
    key.chars().count()
}

/// Keep entries whose key has at least `min_key_length` characters, in their original order
pub fn filter_by_key_length(
    counts: impl IntoIterator<Item = AggregatedCount>,
    min_key_length: usize,
) -> Vec<AggregatedCount> {
    counts
        .into_iter()
        .filter(|count| key_length(&count.key) >= min_key_length)
        .collect()
}

/// The `n` highest totals. Equal totals keep their relative input order.
pub fn top_n(mut entries: Vec<AggregatedCount>, n: usize) -> Vec<RankedEntry> {
    // stable
    entries.sort_by(|a, b| b.total.cmp(&a.total));
    entries.truncate(n);
    entries.into_iter().map(RankedEntry::from).collect()
}

/// Filter then select the top `n`, walking `counts` in its own order
pub fn rank(counts: &IndexMap<String, u64>, min_key_length: usize, n: usize) -> Vec<RankedEntry> {
    let aggregated = counts.iter().map(|(key, total)| AggregatedCount {
        key: key.clone(),
        total: *total,
    });
    top_n(filter_by_key_length(aggregated, min_key_length), n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> IndexMap<String, u64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn entry(key: &str, total: u64) -> RankedEntry {
        RankedEntry {
            key: key.to_string(),
            total,
        }
    }

    #[test]
    fn test_filter_removes_short_keys() {
        let ranked = rank(&counts(&[("banana", 3), ("apple", 2), ("orange", 1)]), 6, 10);
        assert_eq!(ranked, vec![entry("banana", 3), entry("orange", 1)]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = rank(
            &counts(&[("gamma", 2), ("alpha", 5), ("beta", 2), ("delta", 2)]),
            0,
            10,
        );
        assert_eq!(
            ranked,
            vec![entry("alpha", 5), entry("gamma", 2), entry("beta", 2), entry("delta", 2)]
        );
    }

    #[test]
    fn test_truncates_to_n() {
        let ranked = rank(&counts(&[("aaaaaa", 1), ("bbbbbb", 3), ("cccccc", 2)]), 6, 2);
        assert_eq!(ranked, vec![entry("bbbbbb", 3), entry("cccccc", 2)]);
    }

    #[test]
    fn test_fewer_than_n_returns_all() {
        let ranked = rank(&counts(&[("longword", 1)]), 6, 10);
        assert_eq!(ranked, vec![entry("longword", 1)]);
    }

    #[test]
    fn test_zero_n_is_empty() {
        assert!(rank(&counts(&[("longword", 1)]), 0, 0).is_empty());
    }

    #[test]
    fn test_key_length_counts_characters() {
        assert_eq!(key_length("naïve"), 5);
        assert_eq!(
            filter_by_key_length(
                vec![AggregatedCount {
                    key: "éééééé".to_string(),
                    total: 1
                }],
                6
            )
            .len(),
            1
        );
    }
}
