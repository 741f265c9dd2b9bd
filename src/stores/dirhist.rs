use std::io;
use std::path::{Path, PathBuf};

use super::{read_lines_or_empty, write_atomic};

/// `dirhist.cfm`: one path per line, oldest first (§6).
#[derive(Debug, Default)]
pub struct DirHistory {
    paths: Vec<String>,
    path: Option<PathBuf>,
    max_len: usize,
}

impl DirHistory {
    pub fn load(path: &Path, max_len: usize) -> io::Result<Self> {
        let paths = read_lines_or_empty(path)?
            .into_iter()
            .filter(|l| !l.is_empty())
            .collect();
        Ok(DirHistory {
            paths,
            path: Some(path.to_path_buf()),
            max_len,
        })
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn record(&mut self, dir: &str) {
        if self.paths.last().map(String::as_str) == Some(dir) {
            return;
        }
        self.paths.push(dir.to_string());
        if self.max_len > 0 && self.paths.len() > self.max_len {
            let excess = self.paths.len() - self.max_len;
            self.paths.drain(..excess);
        }
    }

    /// Nearest ancestor path whose final component contains `needle` as a
    /// substring — used by the `bd` suggestion source in §4.4, walking the
    /// live filesystem ancestry of `cwd` rather than this history (the
    /// history itself is exposed for the `back`/`forward` style navigation
    /// left unspecified by spec.md).
    pub fn nearest_ancestor_containing(cwd: &Path, needle: &str, case_sensitive: bool) -> Option<PathBuf> {
        let contains = |s: &str| {
            if case_sensitive {
                s.contains(needle)
            } else {
                s.to_lowercase().contains(&needle.to_lowercase())
            }
        };
        let mut dir = cwd.parent();
        while let Some(d) = dir {
            if let Some(name) = d.file_name().and_then(|n| n.to_str()) {
                if contains(name) {
                    return Some(d.to_path_buf());
                }
            }
            dir = d.parent();
        }
        None
    }

    pub fn save(&self) -> io::Result<()> {
        if let Some(path) = &self.path {
            let contents = self.paths.join("\n") + if self.paths.is_empty() { "" } else { "\n" };
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
        let path = tmp.path().join("dirhist.cfm");
        let mut hist = DirHistory::load(&path, 100).unwrap();
        hist.record("/home/u");
        hist.record("/home/u/projects");
        hist.save().unwrap();

        let reloaded = DirHistory::load(&path, 100).unwrap();
        assert_eq!(reloaded.paths(), hist.paths());
    }

    #[test]
    fn nearest_ancestor_containing_substring() {
        let cwd = Path::new("/home/user/projects/my-crate/src");
        let found = DirHistory::nearest_ancestor_containing(cwd, "proj", false).unwrap();
        assert_eq!(found, Path::new("/home/user/projects"));
    }
}
