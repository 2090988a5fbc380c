//! Capacity-bounded backlog store.

use std::collections::VecDeque;

use super::entry::BacklogEntry;
use crate::core::error::DomainError;

/// Default number of displayed lines kept in memory.
pub const DEFAULT_BACKLOG_CAPACITY: usize = 50;

/// Ordered sequence of [`BacklogEntry`], oldest first.
///
/// The length never exceeds the capacity: appending to a full backlog evicts
/// the head. Callers holding positions into the backlog must shift them by
/// the number of evicted entries (see
/// [`EngineState::shift_for_eviction`](crate::legislation::EngineState::shift_for_eviction)).
#[derive(Debug, Clone)]
pub struct Backlog {
    entries: VecDeque<BacklogEntry>,
    capacity: usize,
}

impl Backlog {
    /// Create an empty backlog; a zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the newest entry
    pub fn newest_index(&self) -> Option<usize> {
        self.entries.len().checked_sub(1)
    }

    /// Append to the tail, returning how many head entries were evicted.
    pub fn append(&mut self, entry: BacklogEntry) -> usize {
        self.entries.push_back(entry);
        self.trim()
    }

    /// Change the capacity, returning how many head entries were evicted.
    pub fn set_capacity(&mut self, capacity: usize) -> usize {
        self.capacity = capacity.max(1);
        self.trim()
    }

    fn trim(&mut self) -> usize {
        let mut evicted = 0;
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Entry at `index`
    pub fn at(&self, index: usize) -> Result<&BacklogEntry, DomainError> {
        self.entries.get(index).ok_or(DomainError::IndexOutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    pub(crate) fn at_mut(&mut self, index: usize) -> Result<&mut BacklogEntry, DomainError> {
        let len = self.entries.len();
        self.entries
            .get_mut(index)
            .ok_or(DomainError::IndexOutOfRange { index, len })
    }

    /// Iterate newest to oldest together with positions
    pub fn iter_rev(&self) -> impl Iterator<Item = (usize, &BacklogEntry)> {
        self.entries.iter().enumerate().rev()
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &BacklogEntry> {
        self.entries.iter()
    }

    /// The `count` most recent entries ending at `from_index` (inclusive),
    /// oldest first. Clamped to the start of the backlog.
    pub fn slice(&self, from_index: usize, count: usize) -> Result<Vec<&BacklogEntry>, DomainError> {
        self.at(from_index)?;
        let end = from_index + 1;
        let start = end.saturating_sub(count);
        Ok(self.entries.range(start..end).collect())
    }
}

impl Default for Backlog {
    fn default() -> Self {
        Self::new(DEFAULT_BACKLOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(text: &str) -> BacklogEntry {
        BacklogEntry::new(text, Utc::now())
    }

    fn texts(entries: &[&BacklogEntry]) -> Vec<String> {
        entries.iter().map(|e| e.text().to_string()).collect()
    }

    #[test]
    fn test_append_within_capacity() {
        let mut backlog = Backlog::new(3);
        assert_eq!(backlog.append(entry("<a> one")), 0);
        assert_eq!(backlog.append(entry("<a> two")), 0);
        assert_eq!(backlog.len(), 2);
        assert_eq!(backlog.newest_index(), Some(1));
    }

    #[test]
    fn test_append_evicts_head() {
        let mut backlog = Backlog::new(2);
        backlog.append(entry("<a> one"));
        backlog.append(entry("<a> two"));
        assert_eq!(backlog.append(entry("<a> three")), 1);
        assert_eq!(backlog.len(), 2);
        assert_eq!(backlog.at(0).unwrap().text(), "<a> two");
    }

    #[test]
    fn test_length_never_exceeds_capacity() {
        let mut backlog = Backlog::default();
        for i in 0..120 {
            backlog.append(entry(&format!("<a> line {i}")));
            assert!(backlog.len() <= DEFAULT_BACKLOG_CAPACITY);
        }
        assert_eq!(backlog.at(0).unwrap().text(), "<a> line 70");
    }

    #[test]
    fn test_at_out_of_range() {
        let backlog = Backlog::new(5);
        assert_eq!(
            backlog.at(0).unwrap_err(),
            DomainError::IndexOutOfRange { index: 0, len: 0 }
        );
    }

    #[test]
    fn test_slice_ends_at_index() {
        let mut backlog = Backlog::new(10);
        for text in ["<a> 0", "<a> 1", "<a> 2", "<a> 3", "<a> 4"] {
            backlog.append(entry(text));
        }
        let slice = backlog.slice(3, 2).unwrap();
        assert_eq!(texts(&slice), vec!["<a> 2", "<a> 3"]);
    }

    #[test]
    fn test_slice_clamps_to_start() {
        let mut backlog = Backlog::new(10);
        for text in ["<a> 0", "<a> 1", "<a> 2"] {
            backlog.append(entry(text));
        }
        let slice = backlog.slice(1, 25).unwrap();
        assert_eq!(texts(&slice), vec!["<a> 0", "<a> 1"]);
        assert!(backlog.slice(3, 1).is_err());
    }

    #[test]
    fn test_shrinking_capacity_evicts() {
        let mut backlog = Backlog::new(5);
        for text in ["<a> 0", "<a> 1", "<a> 2", "<a> 3"] {
            backlog.append(entry(text));
        }
        assert_eq!(backlog.set_capacity(2), 2);
        assert_eq!(backlog.at(0).unwrap().text(), "<a> 2");
    }
}
