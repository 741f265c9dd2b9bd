//! External lookup tables (§3, §6): history, bookmarks, jump database,
//! aliases, workspaces, remotes, tags, and user actions. Each is a
//! contiguous `Vec` indexed by position (never by pointer, per §9's
//! "pointer-linked lookup tables" note) with a read-only prefix lookup.
//!
//! Every store's `save` rewrites via a sibling temp file and renames over
//! the target, so the core never partially writes a persisted file (§6).

pub mod actions;
pub mod aliases;
pub mod bookmarks;
pub mod dirhist;
pub mod history;
pub mod jump;
pub mod pin;
pub mod prompts;
pub mod remotes;
pub mod tags;
pub mod workspaces;

use std::fs;
use std::io;
use std::path::Path;

/// Rewrite `path` atomically: write to `<path>.tmp`, then rename over it.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Read a file's lines, returning an empty `Vec` if it doesn't exist yet
/// (a fresh profile directory has no store files until first save).
pub(crate) fn read_lines_or_empty(path: &Path) -> io::Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text.lines().map(str::to_string).collect()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}
