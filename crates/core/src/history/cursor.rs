use super::{HistoryError, HistoryStore};
use crate::config::MAX_RECORDS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorState {
    /// Not browsing; the user is typing fresh input.
    Fresh,
    Browsing(usize),
}

/// Up/down recall over a snapshot taken at session start.
///
/// The snapshot is never refreshed, and editing the field does not move the
/// cursor; only `older` and `newer` do.
#[derive(Clone, Debug, Default)]
pub struct HistoryCursor {
    items: Vec<String>,
    position: usize,
}

impl HistoryCursor {
    pub fn new(items: Vec<String>) -> Self {
        let position = items.len();
        Self { items, position }
    }

    /// Snapshot of the newest `MAX_RECORDS` prompts, whatever the store's own limit.
    pub fn from_store(store: &HistoryStore) -> Result<Self, HistoryError> {
        Ok(Self::new(store.last_n(MAX_RECORDS)?))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index in `0..=len`; `len` means fresh input.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn state(&self) -> CursorState {
        if self.position >= self.items.len() {
            CursorState::Fresh
        } else {
            CursorState::Browsing(self.position)
        }
    }

    pub fn is_browsing(&self) -> bool {
        matches!(self.state(), CursorState::Browsing(_))
    }

    /// Step back in time. Stops at the oldest entry and keeps returning it.
    /// `None` only when there is no history at all.
    pub fn older(&mut self) -> Option<&str> {
        if self.items.is_empty() {
            return None;
        }
        if self.position > 0 {
            self.position -= 1;
        }
        Some(self.items[self.position].as_str())
    }

    /// Step forward in time. Moving past the newest entry returns `""` and
    /// goes back to fresh input; `None` when already fresh.
    pub fn newer(&mut self) -> Option<&str> {
        match self.state() {
            CursorState::Fresh => None,
            CursorState::Browsing(i) if i + 1 < self.items.len() => {
                self.position = i + 1;
                Some(self.items[self.position].as_str())
            }
            CursorState::Browsing(_) => {
                self.position = self.items.len();
                Some("")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HistoryConfig;

    fn cursor(items: &[&str]) -> HistoryCursor {
        HistoryCursor::new(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn starts_fresh() {
        let c = cursor(&["a", "b"]);
        assert_eq!(c.state(), CursorState::Fresh);
        assert_eq!(c.position(), 2);
        assert!(!c.is_browsing());
    }

    #[test]
    fn up_up_down_down() {
        let mut c = cursor(&["x", "y", "z"]);
        assert_eq!(c.older(), Some("z"));
        assert_eq!(c.older(), Some("y"));
        assert_eq!(c.newer(), Some("z"));
        assert_eq!(c.newer(), Some(""));
        assert_eq!(c.state(), CursorState::Fresh);
    }

    #[test]
    fn full_walk_returns_to_fresh() {
        for k in 1..=10 {
            let items: Vec<String> = (0..k).map(|i| format!("p{i}")).collect();
            let mut c = HistoryCursor::new(items.clone());
            for i in (0..k).rev() {
                assert_eq!(c.older(), Some(items[i].as_str()));
            }
            let mut last = None;
            for _ in 0..k {
                last = c.newer().map(str::to_string);
            }
            assert_eq!(last.as_deref(), Some(""));
            assert_eq!(c.state(), CursorState::Fresh);
        }
    }

    #[test]
    fn older_stops_at_oldest() {
        let mut c = cursor(&["a", "b"]);
        c.older();
        assert_eq!(c.older(), Some("a"));
        assert_eq!(c.older(), Some("a"));
        assert_eq!(c.state(), CursorState::Browsing(0));
    }

    #[test]
    fn newer_from_fresh_is_noop() {
        let mut c = cursor(&["a"]);
        assert_eq!(c.newer(), None);
        assert_eq!(c.state(), CursorState::Fresh);
    }

    #[test]
    fn empty_snapshot_never_moves() {
        let mut c = HistoryCursor::default();
        assert_eq!(c.older(), None);
        assert_eq!(c.newer(), None);
        assert_eq!(c.position(), 0);
        assert_eq!(c.state(), CursorState::Fresh);
    }

    #[test]
    fn snapshot_ignores_later_appends() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(HistoryConfig::new(dir.path().join("h.jsonl")));
        store.append("first").unwrap();
        let mut c = HistoryCursor::from_store(&store).unwrap();
        store.append("second").unwrap();
        assert_eq!(c.len(), 1);
        assert_eq!(c.older(), Some("first"));
        assert_eq!(c.older(), Some("first"));
    }

    #[test]
    fn snapshot_is_capped_at_ten() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(
            HistoryConfig::new(dir.path().join("h.jsonl")).with_max_records(25),
        );
        for i in 0..15 {
            store.append(&format!("p{i}")).unwrap();
        }
        assert_eq!(store.load().unwrap().len(), 15);

        let mut c = HistoryCursor::from_store(&store).unwrap();
        assert_eq!(c.len(), MAX_RECORDS);
        assert_eq!(c.older(), Some("p14"));
        for _ in 0..20 {
            c.older();
        }
        assert_eq!(c.older(), Some("p5"));
    }

    #[test]
    fn from_store_propagates_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h.jsonl");
        std::fs::write(&path, "{oops\n").unwrap();
        let store = HistoryStore::new(HistoryConfig::new(path));
        assert!(HistoryCursor::from_store(&store).is_err());
    }
}
