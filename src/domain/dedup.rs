//! Exact-duplicate filtering of product records
//!
//! Records are indexed by their canonical content hash; a hash hit is only
//! treated as a duplicate after a structural comparison, so the result is
//! exactly first-occurrence filtering under field-by-field equality.

use super::product::ProductRecord;
use std::collections::HashMap;
use tracing::debug;

/// Incremental deduplicator preserving first-occurrence order.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashMap<blake3::Hash, Vec<usize>>,
    records: Vec<ProductRecord>,
    dropped: usize,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, returning `false` when an equal record was already kept.
    pub fn push(&mut self, record: ProductRecord) -> bool {
        let hash = record.content_hash();
        let candidates = self.seen.entry(hash).or_default();

        if candidates.iter().any(|&i| self.records[i] == record) {
            debug!("Dropping duplicate record: {}", record.name);
            self.dropped += 1;
            return false;
        }

        candidates.push(self.records.len());
        self.records.push(record);
        true
    }

    /// Number of records rejected as duplicates so far
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn into_records(self) -> Vec<ProductRecord> {
        self.records
    }
}

/// Remove exact duplicates, keeping the first occurrence of each record.
pub fn deduplicate<I>(records: I) -> Vec<ProductRecord>
where
    I: IntoIterator<Item = ProductRecord>,
{
    let mut deduplicator = Deduplicator::new();
    for record in records {
        deduplicator.push(record);
    }
    deduplicator.into_records()
}
