//! Bounded, linear undo/redo history of full-state snapshots.
//!
//! The entry under the cursor is always the current state. Undo and redo only
//! move the cursor and hand back the snapshot to restore; the caller clones it
//! into live state, so stored snapshots are never aliased.

/// Default maximum number of snapshots to keep.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Snapshot stack plus cursor.
#[derive(Debug, Clone)]
pub struct History<S> {
    entries: Vec<S>,
    /// `None` iff `entries` is empty.
    index: Option<usize>,
    limit: usize,
}

impl<S> Default for History<S> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl<S> History<S> {
    /// Create an empty history holding at most `limit` snapshots (at least one).
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: None,
            limit: limit.max(1),
        }
    }

    /// Record a snapshot of the state produced by a committed mutation.
    ///
    /// Discards the redo branch, appends, then evicts the oldest entries until
    /// the history fits its limit. The cursor ends on the new snapshot.
    pub fn commit(&mut self, snapshot: S) {
        if let Some(index) = self.index {
            self.entries.truncate(index + 1);
        }

        self.entries.push(snapshot);

        if self.entries.len() > self.limit {
            let overflow = self.entries.len() - self.limit;
            self.entries.drain(..overflow);
            log::trace!("history full, evicted {overflow} snapshot(s)");
        }

        self.index = Some(self.entries.len() - 1);
    }

    /// Step back one snapshot. Returns the snapshot to restore, or `None` at
    /// the oldest entry.
    pub fn undo(&mut self) -> Option<&S> {
        match self.index {
            Some(index) if index > 0 => {
                self.index = Some(index - 1);
                self.entries.get(index - 1)
            }
            _ => None,
        }
    }

    /// Step forward one snapshot. Returns the snapshot to restore, or `None`
    /// at the newest entry.
    pub fn redo(&mut self) -> Option<&S> {
        match self.index {
            Some(index) if index + 1 < self.entries.len() => {
                self.index = Some(index + 1);
                self.entries.get(index + 1)
            }
            _ => None,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.index.is_some_and(|index| index > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.index.is_some_and(|index| index + 1 < self.entries.len())
    }

    /// The snapshot under the cursor.
    pub fn current(&self) -> Option<&S> {
        self.index.and_then(|index| self.entries.get(index))
    }

    /// Cursor position, `None` while empty.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_with(values: &[i32], limit: usize) -> History<i32> {
        let mut history = History::new(limit);
        for &v in values {
            history.commit(v);
        }
        history
    }

    #[test]
    fn test_empty_history() {
        let mut history: History<i32> = History::default();
        assert!(history.is_empty());
        assert_eq!(history.index(), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
        assert_eq!(history.index(), None);
    }

    #[test]
    fn test_commit_moves_cursor_to_end() {
        let history = history_with(&[1, 2, 3], 20);
        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), Some(2));
        assert_eq!(history.current(), Some(&3));
    }

    #[test]
    fn test_undo_redo_walk() {
        let mut history = history_with(&[1, 2, 3], 20);
        assert_eq!(history.undo(), Some(&2));
        assert_eq!(history.undo(), Some(&1));
        assert_eq!(history.undo(), None);
        assert_eq!(history.index(), Some(0));

        assert_eq!(history.redo(), Some(&2));
        assert_eq!(history.redo(), Some(&3));
        assert_eq!(history.redo(), None);
        assert_eq!(history.index(), Some(2));
    }

    #[test]
    fn test_commit_after_undo_discards_redo_branch() {
        let mut history = history_with(&[1, 2, 3], 20);
        history.undo();
        history.undo();
        history.commit(10);
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.redo(), None);
        assert_eq!(history.undo(), Some(&1));
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let values: Vec<i32> = (0..21).collect();
        let mut history = history_with(&values, 20);
        assert_eq!(history.len(), 20);
        assert_eq!(history.index(), Some(19));
        assert_eq!(history.current(), Some(&20));

        while history.undo().is_some() {}
        // Snapshot 0 is unreachable.
        assert_eq!(history.current(), Some(&1));
    }

    #[test]
    fn test_eviction_keeps_cursor_on_newest() {
        let mut history = history_with(&[1, 2, 3], 3);
        history.undo();
        history.commit(4);
        history.commit(5);
        assert_eq!(history.len(), 3);
        assert_eq!(history.current(), Some(&5));
        assert_eq!(history.undo(), Some(&4));
        assert_eq!(history.undo(), Some(&2));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn test_zero_limit_is_raised_to_one() {
        let mut history = history_with(&[1, 2], 0);
        assert_eq!(history.limit(), 1);
        assert_eq!(history.len(), 1);
        assert_eq!(history.undo(), None);
    }
}
