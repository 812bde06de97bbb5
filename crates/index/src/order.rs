//! Item-id to external-key order table.
//!
//! Item ids are positions: the key at index `i` belongs to item id `i`.
//! The table is created during build, persisted as a plain JSON array of
//! strings next to the binary snapshot, and loaded verbatim at query
//! time. Vector-only consumers can read the snapshot without parsing
//! this file.

use proxima_core::{ProximaError, ProximaResult};
use serde::{Deserialize, Serialize};

/// Ordered sequence of external keys, position = item id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderTable {
    keys: Vec<String>,
}

impl OrderTable {
    /// Create an empty table with room for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        OrderTable {
            keys: Vec::with_capacity(capacity),
        }
    }

    /// Append the key for the next item id
    pub fn push(&mut self, key: impl Into<String>) {
        self.keys.push(key.into());
    }

    /// Key for an item id, if in range
    pub fn key(&self, id: u32) -> Option<&str> {
        self.keys.get(id as usize).map(String::as_str)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// `true` if the table holds no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate keys in item-id order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Serialize to a JSON array of strings
    pub fn to_json(&self) -> ProximaResult<Vec<u8>> {
        serde_json::to_vec(&self.keys).map_err(|e| ProximaError::Serialization {
            message: e.to_string(),
        })
    }

    /// Deserialize from a JSON array of strings
    pub fn from_json(bytes: &[u8]) -> ProximaResult<Self> {
        let keys: Vec<String> = serde_json::from_slice(bytes)
            .map_err(|e| ProximaError::corrupt(format!("bad order table: {e}")))?;
        Ok(OrderTable { keys })
    }
}

impl From<Vec<String>> for OrderTable {
    fn from(keys: Vec<String>) -> Self {
        OrderTable { keys }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_lookup() {
        let mut table = OrderTable::default();
        table.push("src/main.rs");
        table.push("src/lib.rs");
        assert_eq!(table.len(), 2);
        assert_eq!(table.key(0), Some("src/main.rs"));
        assert_eq!(table.key(1), Some("src/lib.rs"));
        assert_eq!(table.key(2), None);
    }

    #[test]
    fn test_json_roundtrip() {
        let table: OrderTable = vec!["a".to_string(), "b".to_string()].into();
        let bytes = table.to_json().unwrap();
        assert_eq!(OrderTable::from_json(&bytes).unwrap(), table);
        // Plain JSON array on the wire
        assert_eq!(bytes, br#"["a","b"]"#);
    }

    #[test]
    fn test_bad_json_rejected() {
        assert!(OrderTable::from_json(b"{\"not\": \"an array\"}")
            .unwrap_err()
            .is_corruption());
        assert!(OrderTable::from_json(b"[1, 2, 3]").unwrap_err().is_corruption());
    }

    #[test]
    fn test_iter_order() {
        let table: OrderTable = vec!["x".to_string(), "y".to_string(), "z".to_string()].into();
        let keys: Vec<&str> = table.iter().collect();
        assert_eq!(keys, vec!["x", "y", "z"]);
    }
}
