//! Sequence-keyed record collection.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::collections::btree_map::{Entry, Values};
use std::ops::RangeInclusive;

use crate::TickerRecord;

/// Records of one fetch, keyed by sequence number.
///
/// Iteration is always in ascending sequence order. The set only grows: once
/// a sequence number is present its record is never replaced, so a duplicate
/// arrival keeps the first record seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    records: BTreeMap<i32, TickerRecord>,
}

impl RecordSet {
    /// Creates an empty record set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Inserts a record unless its sequence number is already present.
    ///
    /// Returns `true` if the record was added.
    pub fn insert(&mut self, record: TickerRecord) -> bool {
        match self.records.entry(record.sequence) {
            Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Returns the record with the given sequence number.
    #[must_use]
    pub fn get(&self, sequence: i32) -> Option<&TickerRecord> {
        self.records.get(&sequence)
    }

    /// Returns true if a record with the given sequence number is present.
    #[must_use]
    pub fn contains(&self, sequence: i32) -> bool {
        self.records.contains_key(&sequence)
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the set holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the lowest and highest sequence numbers observed.
    #[must_use]
    pub fn sequence_range(&self) -> Option<RangeInclusive<i32>> {
        let first = *self.records.first_key_value()?.0;
        let last = *self.records.last_key_value()?.0;
        Some(first..=last)
    }

    /// Iterates over the gaps between consecutive present sequence numbers,
    /// ascending, without materializing the numbers inside them.
    pub fn missing_ranges(&self) -> impl Iterator<Item = RangeInclusive<i32>> + '_ {
        let keys = self.records.keys().copied();
        keys.clone()
            .zip(keys.skip(1))
            .filter(|&(previous, current)| previous + 1 < current)
            .map(|(previous, current)| previous + 1..=current - 1)
    }

    /// Returns the sequence numbers absent from the observed range, ascending.
    ///
    /// Only numbers between the lowest and highest present sequence are
    /// considered, so an empty set has no gaps. Every gap is materialized; for
    /// ranges that may be wide use [`Self::missing_within`] or
    /// [`Self::missing_count`].
    #[must_use]
    pub fn missing_sequences(&self) -> Vec<i32> {
        self.missing_ranges().flatten().collect()
    }

    /// Returns the missing sequence numbers that fall inside `window`, ascending.
    ///
    /// The result never holds more numbers than the window does.
    #[must_use]
    pub fn missing_within(&self, window: RangeInclusive<i32>) -> Vec<i32> {
        self.missing_ranges()
            .filter_map(|gap| {
                let start = (*gap.start()).max(*window.start());
                let end = (*gap.end()).min(*window.end());
                (start <= end).then_some(start..=end)
            })
            .flatten()
            .collect()
    }

    /// Returns the number of gaps without materializing them.
    #[must_use]
    pub fn missing_count(&self) -> u64 {
        self.sequence_range().map_or(0, |range| {
            let span = i64::from(*range.end()) - i64::from(*range.start()) + 1;
            span.unsigned_abs() - self.records.len() as u64
        })
    }

    /// Returns true if there are no gaps in the observed range.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.missing_count() == 0
    }

    /// Iterates over the records in ascending sequence order.
    pub fn iter(&self) -> Values<'_, i32, TickerRecord> {
        self.records.values()
    }

    /// Iterates over the present sequence numbers in ascending order.
    pub fn sequences(&self) -> impl Iterator<Item = i32> + '_ {
        self.records.keys().copied()
    }

    /// Consumes the set, returning the records in ascending sequence order.
    #[must_use]
    pub fn into_records(self) -> Vec<TickerRecord> {
        self.records.into_values().collect()
    }
}

impl Extend<TickerRecord> for RecordSet {
    fn extend<I: IntoIterator<Item = TickerRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl FromIterator<TickerRecord> for RecordSet {
    fn from_iter<I: IntoIterator<Item = TickerRecord>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a TickerRecord;
    type IntoIter = Values<'a, i32, TickerRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for RecordSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for RecordSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<TickerRecord>::deserialize(deserializer)?;
        Ok(records.into_iter().collect())
    }
}
