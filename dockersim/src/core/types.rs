//! Shared types for the simulated orchestration log.
//!
//! These define the wire contract consumed by the dashboard, so field names and
//! enum spellings must stay stable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the six fixed scenario log categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    Orchestration,
    Deployment,
    Security,
    Performance,
    Network,
    Storage,
}

impl LogCategory {
    /// All categories in dashboard order.
    pub const ALL: [LogCategory; 6] = [
        LogCategory::Orchestration,
        LogCategory::Deployment,
        LogCategory::Security,
        LogCategory::Performance,
        LogCategory::Network,
        LogCategory::Storage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogCategory::Orchestration => "orchestration",
            LogCategory::Deployment => "deployment",
            LogCategory::Security => "security",
            LogCategory::Performance => "performance",
            LogCategory::Network => "network",
            LogCategory::Storage => "storage",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lookup of a category name outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Category not found: {0}")]
pub struct CategoryNotFound(pub String);

impl FromStr for LogCategory {
    type Err = CategoryNotFound;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| CategoryNotFound(s.to_string()))
    }
}

/// Severity shown next to a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Info,
    Success,
    Error,
}

/// A single timestamped log line. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339 with millisecond precision, always UTC.
    pub timestamp: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: LogType,
    pub id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_category() {
        for category in LogCategory::ALL {
            assert_eq!(category.as_str().parse::<LogCategory>(), Ok(category));
        }
    }

    #[test]
    fn unknown_category_is_not_found() {
        let err = "unknown-category".parse::<LogCategory>().unwrap_err();
        assert_eq!(err, CategoryNotFound("unknown-category".to_string()));
    }

    #[test]
    fn entry_serializes_type_field() {
        let entry = LogEntry {
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
            message: "hello".to_string(),
            kind: LogType::Success,
            id: 7,
        };
        let value = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(value["type"], "success");
        assert_eq!(value["id"], 7);
    }
}
