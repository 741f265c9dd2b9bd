use std::io;
use std::path::{Path, PathBuf};

use super::{read_lines_or_empty, write_atomic};

/// One `bookmarks.cfm` entry: `/absolute/path`, `[hotkey]name:path`, or
/// `name:path` (§6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub name: Option<String>,
    pub hotkey: Option<char>,
    pub path: String,
}

fn parse_line(line: &str) -> Option<Bookmark> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    if line.starts_with('/') && !line.contains(':') {
        return Some(Bookmark {
            name: None,
            hotkey: None,
            path: line.to_string(),
        });
    }

    let (hotkey, rest) = if let Some(stripped) = line.strip_prefix('[') {
        match stripped.split_once(']') {
            Some((key, rest)) => (key.chars().next(), rest),
            None => (None, line),
        }
    } else {
        (None, line)
    };

    let (name, path) = rest.split_once(':')?;
    Some(Bookmark {
        name: Some(name.to_string()),
        hotkey,
        path: path.to_string(),
    })
}

fn format_line(b: &Bookmark) -> String {
    match (&b.name, b.hotkey) {
        (None, _) => b.path.clone(),
        (Some(name), Some(key)) => format!("[{key}]{name}:{}", b.path),
        (Some(name), None) => format!("{name}:{}", b.path),
    }
}

#[derive(Debug, Default)]
pub struct BookmarkStore {
    entries: Vec<Bookmark>,
    path: Option<PathBuf>,
}

impl BookmarkStore {
    pub fn load(path: &Path) -> io::Result<Self> {
        let entries = read_lines_or_empty(path)?
            .iter()
            .filter_map(|l| parse_line(l))
            .collect();
        Ok(BookmarkStore {
            entries,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn entries(&self) -> &[Bookmark] {
        &self.entries
    }

    pub fn add(&mut self, bookmark: Bookmark) {
        self.entries.push(bookmark);
    }

    /// Read-only lookup by prefix over bookmark short names (§1).
    pub fn find_by_prefix(&self, prefix: &str) -> Option<&Bookmark> {
        self.entries
            .iter()
            .find(|b| b.name.as_deref().is_some_and(|n| n.starts_with(prefix)))
    }

    pub fn find_exact(&self, name: &str) -> Option<&Bookmark> {
        self.entries
            .iter()
            .find(|b| b.name.as_deref() == Some(name))
    }

    pub fn save(&self) -> io::Result<()> {
        if let Some(path) = &self.path {
            let contents: String = self
                .entries
                .iter()
                .map(|b| format_line(b) + "\n")
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
    fn parses_all_three_forms() {
        assert_eq!(
            parse_line("/home/user/docs"),
            Some(Bookmark {
                name: None,
                hotkey: None,
                path: "/home/user/docs".into()
            })
        );
        assert_eq!(
            parse_line("docs:/home/user/docs"),
            Some(Bookmark {
                name: Some("docs".into()),
                hotkey: None,
                path: "/home/user/docs".into()
            })
        );
        assert_eq!(
            parse_line("[d]docs:/home/user/docs"),
            Some(Bookmark {
                name: Some("docs".into()),
                hotkey: Some('d'),
                path: "/home/user/docs".into()
            })
        );
    }

    #[test]
    fn roundtrip_through_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bookmarks.cfm");
        let mut store = BookmarkStore::load(&path).unwrap();
        store.add(Bookmark {
            name: Some("docs".into()),
            hotkey: Some('d'),
            path: "/home/user/docs".into(),
        });
        store.save().unwrap();

        let reloaded = BookmarkStore::load(&path).unwrap();
        assert_eq!(reloaded.entries(), store.entries());
    }

    #[test]
    fn prefix_lookup_matches_name_only() {
        let mut store = BookmarkStore::default();
        store.add(Bookmark {
            name: Some("downloads".into()),
            hotkey: None,
            path: "/tmp/dl".into(),
        });
        assert!(store.find_by_prefix("down").is_some());
        assert!(store.find_by_prefix("xyz").is_none());
    }
}
