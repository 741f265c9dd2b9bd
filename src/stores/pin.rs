use std::io;
use std::path::{Path, PathBuf};

use super::write_atomic;

/// `.pin`: a single pinned path, whole-file contents (§6).
#[derive(Debug, Default)]
pub struct PinStore {
    pinned: Option<String>,
    path: Option<PathBuf>,
}

impl PinStore {
    pub fn load(path: &Path) -> io::Result<Self> {
        let pinned = match std::fs::read_to_string(path) {
            Ok(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };
        Ok(PinStore {
            pinned,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn get(&self) -> Option<&str> {
        self.pinned.as_deref()
    }

    pub fn set(&mut self, path: String) {
        self.pinned = Some(path);
    }

    pub fn clear(&mut self) {
        self.pinned = None;
    }

    pub fn save(&self) -> io::Result<()> {
        if let Some(path) = &self.path {
            let contents = match &self.pinned {
                Some(p) => format!("{p}\n"),
                None => String::new(),
            };
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
        let path = tmp.path().join(".pin");
        let mut store = PinStore::load(&path).unwrap();
        store.set("/home/u/projects".into());
        store.save().unwrap();

        let reloaded = PinStore::load(&path).unwrap();
        assert_eq!(reloaded.get(), Some("/home/u/projects"));
    }

    #[test]
    fn clear_then_save_empties_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".pin");
        let mut store = PinStore::load(&path).unwrap();
        store.set("/home/u".into());
        store.save().unwrap();
        store.clear();
        store.save().unwrap();

        let reloaded = PinStore::load(&path).unwrap();
        assert_eq!(reloaded.get(), None);
    }
}
