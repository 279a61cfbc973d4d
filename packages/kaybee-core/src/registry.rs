/// Board registry: the ordered list of known boards.
///
/// Independent of board content: an entry may exist before its board has
/// been written. Lookups are first-match-by-id; a later duplicate id is never
/// reached.
use serde::{Deserialize, Serialize};

use crate::types::BoardEntry;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardRegistry {
    entries: Vec<BoardEntry>,
}

impl BoardRegistry {
    pub fn new(entries: Vec<BoardEntry>) -> Self {
        Self { entries }
    }

    /// Registry seeded with the single default entry.
    pub fn seeded(default_id: &str) -> Self {
        Self::new(vec![BoardEntry::named_after(default_id)])
    }

    /// Entries in insertion order.
    pub fn list(&self) -> &[BoardEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, id: &str) -> Option<&BoardEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Append `Board <id>` unless the id is already known.
    /// Returns true if an entry was added.
    pub fn ensure_known(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.entries.push(BoardEntry::named_after(id));
        true
    }

    /// Next free numeric id: highest numeric id + 1, or 1 for none.
    /// Ids that don't parse as integers are ignored.
    pub fn next_board_id(&self) -> String {
        let max = self
            .entries
            .iter()
            .filter_map(|entry| entry.id.trim().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        max.saturating_add(1).to_string()
    }

    /// Remove the first entry with this id.
    pub fn remove(&mut self, id: &str) -> Option<BoardEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Rename the first entry with this id. Returns false if unknown.
    pub fn rename(&mut self, id: &str, name: &str) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn first(&self) -> Option<&BoardEntry> {
        self.entries.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(ids: &[&str]) -> BoardRegistry {
        BoardRegistry::new(ids.iter().map(|id| BoardEntry::named_after(id)).collect())
    }

    #[test]
    fn test_next_board_id() {
        assert_eq!(registry(&["1", "3"]).next_board_id(), "4");
        assert_eq!(registry(&[]).next_board_id(), "1");
        assert_eq!(registry(&["2", "notes", "10"]).next_board_id(), "11");
        assert_eq!(registry(&["notes"]).next_board_id(), "1");
    }

    #[test]
    fn test_ensure_known_is_idempotent() {
        let mut reg = registry(&["1"]);
        assert!(reg.ensure_known("5"));
        assert!(!reg.ensure_known("5"));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get("5").unwrap().name, "Board 5");
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let mut reg = registry(&["3"]);
        reg.ensure_known("1");
        reg.ensure_known("2");
        let ids: Vec<_> = reg.list().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_remove_first_match_only() {
        let mut reg = BoardRegistry::new(vec![
            BoardEntry::named_after("1"),
            BoardEntry {
                id: "1".into(),
                name: "Shadow".into(),
            },
        ]);
        let removed = reg.remove("1").unwrap();
        assert_eq!(removed.name, "Board 1");
        assert_eq!(reg.get("1").unwrap().name, "Shadow");
        assert!(reg.remove("9").is_none());
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let reg = BoardRegistry::seeded("1");
        assert_eq!(
            serde_json::to_string(&reg).unwrap(),
            r#"[{"id":"1","name":"Board 1"}]"#
        );
    }
}
