//! Bounded per-category log buffers.

use std::collections::VecDeque;

use chrono::{SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::info;

use crate::core::types::{CategoryNotFound, LogCategory, LogEntry, LogType};

/// Maximum entries retained per category. Oldest entries are evicted first.
pub const LOG_CAPACITY: usize = 50;

/// Ring buffers of log entries, one per [`LogCategory`].
#[derive(Debug, Clone, Default)]
pub struct LogStore {
    buffers: [VecDeque<LogEntry>; 6],
    last_id: u64,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line to `category`, truncating to the newest [`LOG_CAPACITY`] entries.
    pub fn append(&mut self, category: LogCategory, message: impl Into<String>, kind: LogType) -> LogEntry {
        let now = Utc::now();
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last_id + 1);
        self.last_id = id;

        let entry = LogEntry {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            message: message.into(),
            kind,
            id,
        };

        let buffer = &mut self.buffers[category.index()];
        buffer.push_back(entry.clone());
        while buffer.len() > LOG_CAPACITY {
            buffer.pop_front();
        }

        info!(
            target: "dockersim::log",
            "[{}] {}",
            category.as_str().to_uppercase(),
            entry.message
        );
        entry
    }

    /// Retained entries for `category`, oldest first.
    pub fn get(&self, category: LogCategory) -> &VecDeque<LogEntry> {
        &self.buffers[category.index()]
    }

    /// Look up a category by its wire name.
    pub fn entries(&self, name: &str) -> Result<Vec<LogEntry>, CategoryNotFound> {
        let category: LogCategory = name.parse()?;
        Ok(self.get(category).iter().cloned().collect())
    }

    pub fn len(&self, category: LogCategory) -> usize {
        self.get(category).len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.iter().all(VecDeque::is_empty)
    }
}

// Serialized as `{ "orchestration": [...], "deployment": [...], ... }`.
impl Serialize for LogStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(LogCategory::ALL.len()))?;
        for category in LogCategory::ALL {
            map.serialize_entry(category.as_str(), self.get(category))?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_insertion_order() {
        let mut store = LogStore::new();
        store.append(LogCategory::Network, "first", LogType::Info);
        store.append(LogCategory::Network, "second", LogType::Success);

        let messages: Vec<&str> = store
            .get(LogCategory::Network)
            .iter()
            .map(|entry| entry.message.as_str())
            .collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(store.len(LogCategory::Storage), 0);
    }

    #[test]
    fn truncates_to_newest_entries() {
        let mut store = LogStore::new();
        for i in 0..(LOG_CAPACITY + 17) {
            store.append(LogCategory::Security, format!("line {i}"), LogType::Info);
        }

        let retained = store.get(LogCategory::Security);
        assert_eq!(retained.len(), LOG_CAPACITY);
        assert_eq!(retained.front().expect("front").message, "line 17");
        assert_eq!(
            retained.back().expect("back").message,
            format!("line {}", LOG_CAPACITY + 16)
        );
    }

    #[test]
    fn ids_strictly_increase() {
        let mut store = LogStore::new();
        let ids: Vec<u64> = (0..20)
            .map(|_| store.append(LogCategory::Storage, "tick", LogType::Info).id)
            .collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn timestamp_is_utc_millis() {
        let mut store = LogStore::new();
        let entry = store.append(LogCategory::Deployment, "x", LogType::Info);
        assert!(entry.timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&entry.timestamp).is_ok());
    }

    #[test]
    fn entries_rejects_unknown_name() {
        let store = LogStore::new();
        assert!(store.entries("orchestration").expect("known").is_empty());
        assert!(store.entries("kubernetes").is_err());
    }

    #[test]
    fn serializes_all_categories() {
        let mut store = LogStore::new();
        store.append(LogCategory::Performance, "p", LogType::Success);
        let value = serde_json::to_value(&store).expect("serialize");
        let object = value.as_object().expect("object");
        assert_eq!(object.len(), 6);
        assert_eq!(value["performance"][0]["message"], "p");
        assert_eq!(value["storage"], serde_json::json!([]));
    }
}
