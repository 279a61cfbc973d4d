//! Persisted key layout, derived from a namespace prefix.
//!
//!   <ns>-boards-meta   registry (JSON array of {id, name})
//!   <ns>-board-<id>    board payload
//!   <ns>-font          font preference
//!   <ns>-theme         theme preference
//!   <ns>-data          legacy single-board payload (migrated once)

pub const DEFAULT_NAMESPACE: &str = "kaybee";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    namespace: String,
}

impl StorageKeys {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn boards_meta(&self) -> String {
        format!("{}-boards-meta", self.namespace)
    }

    pub fn board(&self, board_id: &str) -> String {
        format!("{}-board-{}", self.namespace, board_id)
    }

    pub fn font(&self) -> String {
        format!("{}-font", self.namespace)
    }

    pub fn theme(&self) -> String {
        format!("{}-theme", self.namespace)
    }

    pub fn legacy_data(&self) -> String {
        format!("{}-data", self.namespace)
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let keys = StorageKeys::default();
        assert_eq!(keys.boards_meta(), "kaybee-boards-meta");
        assert_eq!(keys.board("7"), "kaybee-board-7");
        assert_eq!(keys.font(), "kaybee-font");
        assert_eq!(keys.theme(), "kaybee-theme");
        assert_eq!(keys.legacy_data(), "kaybee-data");
    }
}
