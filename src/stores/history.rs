use std::io;
use std::path::{Path, PathBuf};

use super::{read_lines_or_empty, write_atomic};

/// `history.cfm`: one command per line, oldest first.
///
/// Add semantics (empty-line and consecutive-duplicate suppression, size
/// cap) are carried over unchanged from the teacher's
/// `LineEditor::add_to_history`.
#[derive(Debug, Default)]
pub struct HistoryStore {
    entries: Vec<String>,
    path: Option<PathBuf>,
    max_len: usize,
}

impl HistoryStore {
    pub fn load(path: &Path, max_len: usize) -> io::Result<Self> {
        let entries = read_lines_or_empty(path)?
            .into_iter()
            .filter(|l| !l.is_empty())
            .collect();
        Ok(HistoryStore {
            entries,
            path: Some(path.to_path_buf()),
            max_len,
        })
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.entries.get(idx).map(String::as_str)
    }

    /// Append `line`, ignoring blanks and immediate repeats; trims to
    /// `max_len` from the front when the cap is exceeded.
    pub fn add(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }
        if self.entries.last().map(String::as_str) == Some(trimmed) {
            return;
        }
        self.entries.push(trimmed.to_string());
        if self.max_len > 0 && self.entries.len() > self.max_len {
            let excess = self.entries.len() - self.max_len;
            self.entries.drain(..excess);
        }
        if let Some(path) = &self.path {
            use std::fs::OpenOptions;
            use std::io::Write;
            if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = writeln!(f, "{trimmed}");
            }
        }
    }

    /// Read-only lookup by prefix (§1): the most recent entry whose text
    /// starts with `prefix`, scanning from newest to oldest.
    pub fn find_by_prefix(&self, prefix: &str, case_sensitive: bool) -> Option<&str> {
        self.entries.iter().rev().find_map(|e| {
            let matches = if case_sensitive {
                e.starts_with(prefix)
            } else {
                e.to_lowercase().starts_with(&prefix.to_lowercase())
            };
            matches.then_some(e.as_str())
        })
    }

    /// Full atomic rewrite — used when the in-memory list has been trimmed
    /// or otherwise diverges from a simple append (§6's replace-via-temp-file rule).
    pub fn save(&self) -> io::Result<()> {
        if let Some(path) = &self.path {
            let contents = self.entries.join("\n") + if self.entries.is_empty() { "" } else { "\n" };
            write_atomic(path, &contents)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_save_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("history.cfm");
        let mut store = HistoryStore::load(&path, 10_000).unwrap();
        store.entries.push("ls".into());
        store.entries.push("cd /tmp".into());
        store.save().unwrap();

        let reloaded = HistoryStore::load(&path, 10_000).unwrap();
        assert_eq!(reloaded.entries(), &["ls", "cd /tmp"]);
    }

    #[test]
    fn consecutive_duplicates_suppressed() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::load(&tmp.path().join("h.cfm"), 100).unwrap();
        store.add("ls");
        store.add("ls");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn capped_at_max_len() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::load(&tmp.path().join("h.cfm"), 3).unwrap();
        for i in 0..5 {
            store.add(&format!("cmd{i}"));
        }
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(0), Some("cmd2"));
    }

    #[test]
    fn prefix_lookup_finds_most_recent_match() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::load(&tmp.path().join("h.cfm"), 100).unwrap();
        store.add("git status -s");
        store.add("git log");
        assert_eq!(store.find_by_prefix("gi", false), Some("git log"));
    }
}
