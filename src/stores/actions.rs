use std::io;
use std::path::{Path, PathBuf};

use super::{read_lines_or_empty, write_atomic};

/// One `actions.cfm` entry: `name=shell command` (§6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub name: String,
    pub command: String,
}

fn parse_line(line: &str) -> Option<Action> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (name, command) = line.split_once('=')?;
    Some(Action {
        name: name.trim().to_string(),
        command: command.trim().to_string(),
    })
}

#[derive(Debug, Default)]
pub struct ActionStore {
    entries: Vec<Action>,
    path: Option<PathBuf>,
}

impl ActionStore {
    pub fn load(path: &Path) -> io::Result<Self> {
        let entries = read_lines_or_empty(path)?
            .iter()
            .filter_map(|l| parse_line(l))
            .collect();
        Ok(ActionStore {
            entries,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn entries(&self) -> &[Action] {
        &self.entries
    }

    /// Names merged into the binary-command index at startup (§3).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|a| a.name.as_str())
    }

    pub fn find_exact(&self, name: &str) -> Option<&Action> {
        self.entries.iter().find(|a| a.name == name)
    }

    pub fn set(&mut self, name: &str, command: &str) {
        if let Some(existing) = self.entries.iter_mut().find(|a| a.name == name) {
            existing.command = command.to_string();
        } else {
            self.entries.push(Action {
                name: name.to_string(),
                command: command.to_string(),
            });
        }
    }

    pub fn save(&self) -> io::Result<()> {
        if let Some(path) = &self.path {
            let contents: String = self
                .entries
                .iter()
                .map(|a| format!("{}={}\n", a.name, a.command))
                .collect();
            write_atomic(path, &contents)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_through_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("actions.cfm");
        let mut store = ActionStore::load(&path).unwrap();
        store.set("backup", "tar -czf backup.tar.gz .");
        store.save().unwrap();

        let reloaded = ActionStore::load(&path).unwrap();
        assert_eq!(reloaded.entries(), store.entries());
    }

    #[test]
    fn names_feed_binary_index() {
        let mut store = ActionStore::default();
        store.set("backup", "tar -czf backup.tar.gz .");
        let names: Vec<&str> = store.names().collect();
        assert_eq!(names, vec!["backup"]);
    }
}
