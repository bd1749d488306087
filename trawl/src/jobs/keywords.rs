use std::collections::HashMap;

use crate::reduce::{Fold, Reduce};
use crate::transform::Transform;

/// One keyword and its cumulative occurrence count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCount {
    /// The matched keyword.
    pub keyword: String,
    /// Number of lines the keyword occurred in.
    pub count: u64,
}

/// Transform counting keyword occurrences in a batch of lines.
///
/// A keyword is counted at most once per line, however often it occurs within
/// the line. Batches without any match produce no partial result.
#[derive(Debug, Clone)]
pub struct KeywordScan {
    keywords: Vec<String>,
}

impl KeywordScan {
    /// Creates a scan for the given keyword set.
    pub fn new(keywords: Vec<String>) -> Self {
        Self { keywords }
    }
}

impl Transform for KeywordScan {
    type Item = Vec<String>;
    type Partial = HashMap<String, u64>;

    fn apply(&self, lines: Vec<String>) -> Option<HashMap<String, u64>> {
        let mut counts = HashMap::new();

        for line in &lines {
            for keyword in &self.keywords {
                if line.contains(keyword.as_str()) {
                    *counts.entry(keyword.clone()).or_insert(0) += 1;
                }
            }
        }

        if counts.is_empty() { None } else { Some(counts) }
    }
}

/// Reducer accumulating per-keyword counts across all partial results.
#[derive(Debug, Default)]
pub struct KeywordTally {
    counts: HashMap<String, u64>,
}

impl KeywordTally {
    /// Creates an empty tally.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reduce for KeywordTally {
    type Partial = HashMap<String, u64>;
    type Output = Vec<KeywordCount>;

    fn merge(&mut self, partial: HashMap<String, u64>) -> Fold {
        for (keyword, count) in partial {
            *self.counts.entry(keyword).or_insert(0) += count;
        }

        Fold::Continue
    }

    /// Returns the tally sorted by count descending, ties broken by keyword
    /// ascending. The tie-break makes the output deterministic across runs
    /// and worker counts.
    fn finish(self) -> Vec<KeywordCount> {
        let mut result: Vec<KeywordCount> = self
            .counts
            .into_iter()
            .map(|(keyword, count)| KeywordCount { keyword, count })
            .collect();

        result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));

        result
    }
}
