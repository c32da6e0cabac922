use std::collections::HashMap;

use crate::api::error::StoreError;

/// Durable key-value storage for the best score.
pub trait ScoreStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Parse a stored best score. Anything that is not a plain non-negative
/// integer reads as 0.
pub fn parse_best_score(raw: &str) -> u32 {
    raw.trim().parse::<u32>().unwrap_or(0)
}

/// In-process store, used natively and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    reject_writes: bool,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }

    /// A store whose writes always fail.
    pub fn read_only() -> Self {
        Self {
            reject_writes: true,
            ..Self::default()
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.reject_writes {
            return Err(StoreError::Rejected {
                key: key.to_string(),
                reason: "read-only store".to_string(),
            });
        }
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_integers() {
        assert_eq!(parse_best_score("17"), 17);
        assert_eq!(parse_best_score(" 4\n"), 4);
    }

    #[test]
    fn parse_garbage_is_zero() {
        for raw in ["", "abc", "-3", "12abc", "1.5", "NaN", "99999999999"] {
            assert_eq!(parse_best_score(raw), 0, "{raw:?}");
        }
    }

    #[test]
    fn memory_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load("k").unwrap(), None);
        store.save("k", "5").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some("5"));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn read_only_rejects() {
        let mut store = MemoryStore::read_only();
        assert!(matches!(store.save("k", "1"), Err(StoreError::Rejected { .. })));
        assert_eq!(store.get("k"), None);
    }
}
