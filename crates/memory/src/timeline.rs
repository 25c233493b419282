//! The append-only memory timeline.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ordered facts remembered across a session.
///
/// Entries are trimmed, never empty, never deduplicated or edited.
/// Insertion order is extraction order and display order. The only way to
/// shrink a timeline is [`MemoryTimeline::clear`], used by a full reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryTimeline {
    entries: Vec<String>,
}

impl MemoryTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry. Returns `false` (and appends nothing) if it is empty after trimming.
    pub fn append(&mut self, entry: &str) -> bool {
        let entry = entry.trim();
        if entry.is_empty() {
            return false;
        }
        self.entries.push(entry.to_string());
        true
    }

    /// Append every non-empty entry in order and return how many were added.
    pub fn extend<'a>(&mut self, entries: impl IntoIterator<Item = &'a str>) -> usize {
        let added = entries.into_iter().filter(|e| self.append(e)).count();
        if added > 0 {
            debug!(added, total = self.entries.len(), "Memory timeline extended");
        }
        added
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries joined with `\n` in timeline order. Never truncated.
    pub fn render(&self) -> String {
        self.entries.join("\n")
    }

    /// Drop every entry. Only a full session reset does this.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_trims_and_rejects_empty() {
        let mut timeline = MemoryTimeline::new();
        assert!(timeline.append("  likes tea  "));
        assert!(!timeline.append("   \n "));
        assert_eq!(timeline.entries(), &["likes tea".to_string()]);
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        let mut timeline = MemoryTimeline::new();
        let added = timeline.extend(["a", "b", "", "a"]);
        assert_eq!(added, 3);
        assert_eq!(timeline.iter().collect::<Vec<_>>(), vec!["a", "b", "a"]);
    }

    #[test]
    fn render_joins_with_newlines() {
        let mut timeline = MemoryTimeline::new();
        assert_eq!(timeline.render(), "");

        timeline.extend(["User is Ada", "Prefers Rust"]);
        assert_eq!(timeline.render(), "User is Ada\nPrefers Rust");
    }

    #[test]
    fn serializes_as_plain_list() {
        let mut timeline = MemoryTimeline::new();
        timeline.extend(["one", "two"]);
        let json = serde_json::to_string(&timeline).unwrap();
        assert_eq!(json, r#"["one","two"]"#);

        let back: MemoryTimeline = serde_json::from_str(&json).unwrap();
        assert_eq!(back, timeline);
    }

    #[test]
    fn clear_empties_timeline() {
        let mut timeline = MemoryTimeline::new();
        timeline.extend(["x"]);
        timeline.clear();
        assert!(timeline.is_empty());
        assert_eq!(timeline.len(), 0);
    }
}
