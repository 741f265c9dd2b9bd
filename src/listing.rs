use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::{Config, SortMethod};

/// File-type classification used for display color/icon lookup, mirroring
/// `get_reg_file_color`/`get_comp_color` in the original suggestions engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Directory,
    Regular,
    Executable,
    Symlink,
    Other,
}

/// A precomputed, display-ready directory entry (§3: "ordered sequence of
/// entries with precomputed display color and file-type").
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub kind: FileKind,
    /// A stable display color name; the actual ANSI/icon mapping is the
    /// external display layer's job (§1 scope).
    pub color: &'static str,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }
}

/// The directory listing cache: an ordered, 1-indexed (ELN) snapshot of the
/// current working directory, refreshed on working-directory change and
/// cached otherwise so the suggestion engine's hot path never calls
/// `readdir` per keystroke (§5).
#[derive(Debug, Default)]
pub struct ListingCache {
    cwd: Option<PathBuf>,
    mtime: Option<SystemTime>,
    entries: Vec<Entry>,
    /// name -> 1-based ELN, for O(1) "is this name listed" lookups.
    index_by_name: HashMap<String, usize>,
}

impl ListingCache {
    pub fn new() -> Self {
        ListingCache::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 1-based ELN lookup, per the GLOSSARY definition.
    pub fn get_eln(&self, eln: usize) -> Option<&Entry> {
        if eln == 0 {
            return None;
        }
        self.entries.get(eln - 1)
    }

    pub fn find(&self, name: &str) -> Option<(&Entry, usize)> {
        self.index_by_name
            .get(name)
            .and_then(|&eln| self.entries.get(eln - 1).map(|e| (e, eln)))
    }

    /// Re-scan `cwd` only if it differs from the cached directory or the
    /// directory's mtime has advanced — the single bounded `readdir` per
    /// working-directory change that §5 allows.
    pub fn refresh_if_stale(&mut self, cwd: &Path, cfg: &Config) -> io::Result<()> {
        let meta = fs::metadata(cwd)?;
        let mtime = meta.modified().ok();

        let same_dir = self.cwd.as_deref() == Some(cwd);
        if same_dir && self.mtime == mtime {
            return Ok(());
        }

        self.force_refresh(cwd, cfg)?;
        self.mtime = mtime;
        Ok(())
    }

    pub fn force_refresh(&mut self, cwd: &Path, cfg: &Config) -> io::Result<()> {
        let mut entries = Vec::new();
        for dirent in fs::read_dir(cwd)? {
            let dirent = dirent?;
            let name = dirent.file_name().to_string_lossy().into_owned();
            if !cfg.show_hidden && name.starts_with('.') {
                continue;
            }
            let kind = classify(&dirent.path());
            entries.push(Entry {
                name,
                kind,
                color: color_for(kind),
            });
        }

        sort_entries(&mut entries, cfg);

        self.index_by_name = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i + 1))
            .collect();
        self.entries = entries;
        self.cwd = Some(cwd.to_path_buf());
        Ok(())
    }
}

fn classify(path: &Path) -> FileKind {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return FileKind::Other;
    };
    if meta.file_type().is_symlink() {
        return FileKind::Symlink;
    }
    if meta.is_dir() {
        return FileKind::Directory;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if meta.is_file() && meta.permissions().mode() & 0o111 != 0 {
            return FileKind::Executable;
        }
    }
    FileKind::Regular
}

fn color_for(kind: FileKind) -> &'static str {
    match kind {
        FileKind::Directory => "blue",
        FileKind::Executable => "green",
        FileKind::Symlink => "cyan",
        FileKind::Regular => "default",
        FileKind::Other => "default",
    }
}

fn sort_entries(entries: &mut [Entry], cfg: &Config) {
    match cfg.sort {
        SortMethod::None => {}
        SortMethod::Size | SortMethod::Atime | SortMethod::Btime | SortMethod::Ctime
        | SortMethod::Mtime | SortMethod::Inode | SortMethod::Owner | SortMethod::Group
        | SortMethod::Version => {
            // Metadata-derived sort keys are out of the core's scope (they
            // belong to the listing cache's external producer); name order
            // is used as the stable fallback.
            entries.sort_by(|a, b| a.name.cmp(&b.name));
        }
        SortMethod::Name => entries.sort_by(|a, b| a.name.cmp(&b.name)),
        SortMethod::Extension => entries.sort_by(|a, b| {
            let ext = |e: &Entry| {
                Path::new(&e.name)
                    .extension()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default()
            };
            ext(a).cmp(&ext(b)).then_with(|| a.name.cmp(&b.name))
        }),
    }

    if cfg.sort_reverse {
        entries.reverse();
    }

    if cfg.folders_first {
        entries.sort_by_key(|e| !e.is_dir());
    }
}
