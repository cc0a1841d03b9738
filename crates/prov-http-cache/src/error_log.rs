use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// What went wrong for one URL.
///
/// Serialized untagged: a status is written as a number, anything else as
/// its error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorLogEntry {
    Status(u16),
    Message(String),
}

impl fmt::Display for ErrorLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "{status}"),
            Self::Message(message) => f.write_str(message),
        }
    }
}

/// Failed requests keyed by URL. A later failure for the same URL replaces
/// the earlier entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorLog {
    entries: BTreeMap<String, ErrorLogEntry>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_status(&mut self, url: impl Into<String>, status: u16) {
        self.entries.insert(url.into(), ErrorLogEntry::Status(status));
    }

    pub fn record_message(&mut self, url: impl Into<String>, message: impl Into<String>) {
        self.entries
            .insert(url.into(), ErrorLogEntry::Message(message.into()));
    }

    pub fn get(&self, url: &str) -> Option<&ErrorLogEntry> {
        self.entries.get(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ErrorLogEntry)> {
        self.entries.iter().map(|(url, entry)| (url.as_str(), entry))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn serializes_as_flat_map() {
        let mut log = ErrorLog::new();
        log.record_status("https://api.example.org/b", 404);
        log.record_message("https://api.example.org/a", "connection refused");

        let json = serde_json::to_string(&log).unwrap();
        assert_eq!(
            json,
            r#"{"https://api.example.org/a":"connection refused","https://api.example.org/b":404}"#
        );

        let parsed: ErrorLog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, log);
    }

    #[test]
    fn later_failure_replaces_entry() {
        let mut log = ErrorLog::new();
        log.record_status("u", 500);
        log.record_message("u", "timed out");

        assert_eq!(log.len(), 1);
        assert_eq!(
            log.get("u"),
            Some(&ErrorLogEntry::Message("timed out".to_string()))
        );
        assert_eq!(log.get("u").unwrap().to_string(), "timed out");
    }
}
