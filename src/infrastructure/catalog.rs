use std::collections::HashMap;
use std::path::Path;
use tracing::{error, info, warn};

/// Static table of pre-written premium entries, keyed by calendar date
/// (`YYYY-MM-DD`) then topic name.
#[derive(Debug, Clone, Default)]
pub struct ContentCatalog {
    entries: HashMap<String, HashMap<String, String>>,
}

impl ContentCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the companion catalog document. A missing or unreadable file
    /// is not fatal: selection falls back to generated content.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "Content catalog not found, using generated content only");
            return Self::empty();
        }
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, HashMap<String, String>>>(&raw)
            {
                Ok(entries) => {
                    info!(
                        path = %path.display(),
                        days = entries.len(),
                        "Loaded content catalog"
                    );
                    Self { entries }
                }
                Err(e) => {
                    error!(path = %path.display(), "Failed to parse content catalog: {}", e);
                    Self::empty()
                }
            },
            Err(e) => {
                error!(path = %path.display(), "Failed to read content catalog: {}", e);
                Self::empty()
            }
        }
    }

    pub fn from_entries(entries: HashMap<String, HashMap<String, String>>) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, date: &str, topic: &str) -> Option<&str> {
        self.entries
            .get(date)
            .and_then(|by_topic| by_topic.get(topic))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
