use crate::core::classify::classify;
use crate::domain::model::{Account, ResultRecord, Tag};
use std::collections::HashSet;

/// Shape a list of reconciled handles into display records, classifying
/// each handle on the way.
pub fn project(handles: &[String]) -> Vec<ResultRecord> {
    handles
        .iter()
        .map(|handle| ResultRecord {
            handle: handle.clone(),
            tags: classify(&Account::from_handle(handle.clone())),
            marked: false,
        })
        .collect()
}

/// Session-local view state: the record list plus the handle list of the
/// last bulk mark, retained so exactly that one operation can be undone.
/// Persisting this to session storage is the caller's concern.
#[derive(Debug, Default)]
pub struct SessionContext {
    records: Vec<ResultRecord>,
    last_marked: Vec<String>,
}

impl SessionContext {
    pub fn new(records: Vec<ResultRecord>) -> Self {
        Self {
            records,
            last_marked: Vec::new(),
        }
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    /// Bulk-mark the given handles. Idempotent: handles already in the
    /// requested state are left alone and excluded from the undo list.
    pub fn mark(&mut self, handles: &[String], value: bool) {
        let wanted: HashSet<&str> = handles.iter().map(String::as_str).collect();
        let mut changed = Vec::new();
        for record in &mut self.records {
            if wanted.contains(record.handle.as_str()) && record.marked != value {
                record.marked = value;
                changed.push(record.handle.clone());
            }
        }
        self.last_marked = changed;
    }

    /// Reverse the immediately preceding bulk mark. Not a history stack:
    /// only the retained handle list is flipped back, and a second undo is
    /// a no-op.
    pub fn undo_last_mark(&mut self) {
        let handles = std::mem::take(&mut self.last_marked);
        let set: HashSet<&str> = handles.iter().map(String::as_str).collect();
        for record in &mut self.records {
            if set.contains(record.handle.as_str()) {
                record.marked = !record.marked;
            }
        }
    }
}

/// Keep records whose handle starts with `letter` (case-insensitive);
/// `"All"` returns everything. Never mutates the source list.
pub fn filter_by_letter<'a>(records: &'a [ResultRecord], letter: &str) -> Vec<&'a ResultRecord> {
    if letter.eq_ignore_ascii_case("all") {
        return records.iter().collect();
    }
    let wanted = letter.to_lowercase();
    records
        .iter()
        .filter(|record| record.handle.to_lowercase().starts_with(&wanted))
        .collect()
}

/// Keep records whose handle contains `query` case-insensitively.
pub fn filter_by_query<'a>(records: &'a [ResultRecord], query: &str) -> Vec<&'a ResultRecord> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| record.handle.to_lowercase().contains(&needle))
        .collect()
}

/// Keep records carrying the given tag.
pub fn filter_by_tag<'a>(records: &'a [ResultRecord], tag: Tag) -> Vec<&'a ResultRecord> {
    records
        .iter()
        .filter(|record| record.tags.contains(&tag))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Tag;

    fn records(handles: &[&str]) -> Vec<ResultRecord> {
        project(&handles.iter().map(|h| h.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn test_project_classifies_each_handle() {
        let projected = records(&["win_free_crypto_5000", "x9"]);
        assert!(projected[0].tags.contains(&Tag::Spam));
        assert_eq!(
            projected[1].tags.iter().copied().collect::<Vec<_>>(),
            vec![Tag::Unknown]
        );
        assert!(projected.iter().all(|r| !r.marked));
    }

    #[test]
    fn test_filter_by_letter() {
        let projected = records(&["alice", "anna", "bob"]);
        let filtered = filter_by_letter(&projected, "A");
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.handle.starts_with('a')));

        assert_eq!(filter_by_letter(&projected, "All").len(), 3);
        assert_eq!(projected.len(), 3);
    }

    #[test]
    fn test_filter_by_query() {
        let projected = records(&["alice", "malice", "bob"]);
        let filtered = filter_by_query(&projected, "ALic");
        assert_eq!(filtered.len(), 2);
        assert!(filter_by_query(&projected, "zzz").is_empty());
    }

    #[test]
    fn test_filter_by_tag() {
        let projected = records(&["win_free_crypto_5000", "nike_official", "x9"]);

        let spam = filter_by_tag(&projected, Tag::Spam);
        assert_eq!(spam.len(), 1);
        assert_eq!(spam[0].handle, "win_free_crypto_5000");

        let unknown = filter_by_tag(&projected, Tag::Unknown);
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].handle, "x9");

        assert!(filter_by_tag(&projected, Tag::Celebrity).is_empty());
        assert_eq!(projected.len(), 3);
    }

    #[test]
    fn test_mark_and_undo_bulk() {
        let mut session = SessionContext::new(records(&["a", "b", "c", "d"]));
        let marked: Vec<String> = ["a", "b", "c"].iter().map(|h| h.to_string()).collect();

        session.mark(&marked, true);
        assert_eq!(session.records().iter().filter(|r| r.marked).count(), 3);

        session.undo_last_mark();
        assert!(session.records().iter().all(|r| !r.marked));

        // A second undo must not flip anything back.
        session.undo_last_mark();
        assert!(session.records().iter().all(|r| !r.marked));
    }

    #[test]
    fn test_mark_is_idempotent() {
        let mut session = SessionContext::new(records(&["a", "b"]));
        let both: Vec<String> = ["a", "b"].iter().map(|h| h.to_string()).collect();
        let just_a = vec!["a".to_string()];

        session.mark(&just_a, true);
        // "a" is already marked, so only "b" changes and only "b" is
        // eligible for undo.
        session.mark(&both, true);
        session.undo_last_mark();

        let marked: Vec<&str> = session
            .records()
            .iter()
            .filter(|r| r.marked)
            .map(|r| r.handle.as_str())
            .collect();
        assert_eq!(marked, vec!["a"]);
    }

    #[test]
    fn test_mark_unknown_handle_is_noop() {
        let mut session = SessionContext::new(records(&["a"]));
        session.mark(&["ghost".to_string()], true);
        assert!(session.records().iter().all(|r| !r.marked));
    }
}
