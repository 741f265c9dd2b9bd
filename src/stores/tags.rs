use std::io;
use std::path::{Path, PathBuf};

use super::{read_lines_or_empty, write_atomic};

/// The tag-name table (§3). spec.md's persisted-state layout doesn't name a
/// file for tags; `tags.cfm` is given the simplest possible shape — one
/// name per line — since tags carry no associated data beyond their name
/// (decision recorded in DESIGN.md).
#[derive(Debug, Default)]
pub struct TagStore {
    names: Vec<String>,
    path: Option<PathBuf>,
}

impl TagStore {
    pub fn load(path: &Path) -> io::Result<Self> {
        let names = read_lines_or_empty(path)?
            .into_iter()
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .collect();
        Ok(TagStore {
            names,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn add(&mut self, name: &str) {
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
    }

    pub fn find_by_prefix(&self, prefix: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|n| n.starts_with(prefix))
            .map(String::as_str)
    }

    pub fn save(&self) -> io::Result<()> {
        if let Some(path) = &self.path {
            let contents = self.names.join("\n") + if self.names.is_empty() { "" } else { "\n" };
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
        let path = tmp.path().join("tags.cfm");
        let mut store = TagStore::load(&path).unwrap();
        store.add("work");
        store.add("archive");
        store.save().unwrap();

        let reloaded = TagStore::load(&path).unwrap();
        assert_eq!(reloaded.names(), store.names());
    }

    #[test]
    fn add_is_deduplicated() {
        let mut store = TagStore::default();
        store.add("work");
        store.add("work");
        assert_eq!(store.names().len(), 1);
    }
}
