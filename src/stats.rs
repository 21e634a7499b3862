//! Per-run statistics.
//!
//! A [`RunSummary`] is created fresh for every organize run and accumulates
//! one [`CategoryStats`] entry per category a file was moved into.

use serde::Serialize;
use std::collections::BTreeMap;

/// Count and byte total for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub count: u64,
    pub total_size: u64,
}

/// Aggregated statistics of a single organize run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    processed_files: u64,
    categories: BTreeMap<String, CategoryStats>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one successfully moved file.
    ///
    /// The category entry is created on first use.
    pub fn record(&mut self, category: &str, size_bytes: u64) {
        let stats = self.categories.entry(category.to_string()).or_default();
        stats.count += 1;
        stats.total_size += size_bytes;
        self.processed_files += 1;
    }

    /// Number of files moved in this run.
    pub fn processed_files(&self) -> u64 {
        self.processed_files
    }

    /// Sum of the sizes of every moved file, in bytes.
    pub fn total_size(&self) -> u64 {
        self.categories.values().map(|s| s.total_size).sum()
    }

    pub fn category(&self, name: &str) -> Option<&CategoryStats> {
        self.categories.get(name)
    }

    /// Iterates categories in name order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &CategoryStats)> {
        self.categories.iter().map(|(name, stats)| (name.as_str(), stats))
    }

    pub fn is_empty(&self) -> bool {
        self.processed_files == 0
    }
}
