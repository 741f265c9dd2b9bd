//! Grounded on `check_completions`/`check_filenames` in
//! `original_source/src/suggestions.c`: the word, treated as a path prefix,
//! is completed against the filesystem (not the cached listing — `cd`'s
//! restriction to directories and arbitrary paths outside the CWD both need
//! a live `read_dir`, bounded to one call per keystroke per §5).

use std::path::{Path, PathBuf};

use glob::{glob_with, MatchOptions, Pattern};

use super::{Suggestion, SuggestionSource};
use crate::config::Config;

/// Split `word` into (directory to scan, file-name prefix to match).
fn split(word: &str, cwd: &Path) -> (PathBuf, String) {
    let path = Path::new(word);
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            let dir = if parent.is_absolute() {
                parent.to_path_buf()
            } else {
                cwd.join(parent)
            };
            (dir, name.to_string_lossy().into_owned())
        }
        (Some(_), Some(name)) => (cwd.to_path_buf(), name.to_string_lossy().into_owned()),
        _ => (cwd.to_path_buf(), word.to_string()),
    }
}

/// Directory scan via `glob`, matching the teacher's `expander.rs` use of
/// `glob::glob` for wildcard expansion — here the wildcard is appended by us
/// (`prefix*`) rather than typed by the user, and the prefix/directory are
/// escaped with `Pattern::escape` so any `*`/`?`/`[` in a real filename
/// doesn't get reinterpreted as glob syntax.
fn candidates(dir: &Path, prefix: &str, case_sensitive: bool, dirs_only: bool) -> Vec<(String, bool)> {
    let Some(dir_str) = dir.to_str() else {
        return Vec::new();
    };
    let pattern = format!("{}/{}*", Pattern::escape(dir_str), Pattern::escape(prefix));
    let options = MatchOptions {
        case_sensitive,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };
    let Ok(paths) = glob_with(&pattern, options) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for path in paths.filter_map(Result::ok) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let is_dir = path.is_dir();
        if dirs_only && !is_dir {
            continue;
        }
        out.push((name.to_string(), is_dir));
    }
    out
}

fn longest_common_prefix<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let mut iter = names;
    let first = match iter.next() {
        Some(f) => f,
        None => return String::new(),
    };
    let mut common = first.to_string();
    for name in iter {
        let mut end = 0;
        for (a, b) in common.chars().zip(name.chars()) {
            if a != b {
                break;
            }
            end += a.len_utf8();
        }
        common.truncate(end);
    }
    common
}

/// General path completion ('c' strategy source): any filesystem path.
pub fn suggest(word: &str, cwd: &Path, cfg: &Config) -> Option<Suggestion> {
    complete(word, cwd, cfg, false)
}

/// `cd`'s context-sensitive variant: directories only (§4.4).
pub fn suggest_dirs_only(word: &str, cwd: &Path, cfg: &Config) -> Option<(String, usize)> {
    complete(word, cwd, cfg, true).map(|s| (s.text, s.offset))
}

fn complete(word: &str, cwd: &Path, cfg: &Config, dirs_only: bool) -> Option<Suggestion> {
    if word.is_empty() {
        return None;
    }
    let (dir, prefix) = split(word, cwd);
    let matches = candidates(&dir, &prefix, cfg.case_sensitive_path_comp, dirs_only);
    if matches.is_empty() {
        return None;
    }

    let tail = if matches.len() == 1 {
        let (name, is_dir) = &matches[0];
        let mut tail = name[prefix.len()..].to_string();
        if *is_dir {
            tail.push('/');
        }
        tail
    } else {
        let common = longest_common_prefix(matches.iter().map(|(n, _)| n.as_str()));
        if common.len() <= prefix.len() {
            return None;
        }
        common[prefix.len()..].to_string()
    };

    if tail.is_empty() {
        return None;
    }

    // `text` carries the already-typed word so that `text[offset..]` (the
    // shared slicing convention in `session::accept_suggestion`/rendering)
    // recovers the tail regardless of how much of `word` was a directory
    // prefix the filename match itself didn't consume.
    Some(Suggestion::inline(format!("{word}{tail}"), SuggestionSource::Path, word.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_match_suggests_remaining_tail_with_trailing_slash() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("src")).unwrap();
        let s = suggest("s", tmp.path(), &Config::default()).unwrap();
        assert_eq!(&s.text[s.offset..], "rc/");
    }

    #[test]
    fn multiple_matches_suggest_shortest_common_tail() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("foobar"), "").unwrap();
        std::fs::write(tmp.path().join("foobaz"), "").unwrap();
        let s = suggest("foo", tmp.path(), &Config::default()).unwrap();
        assert_eq!(&s.text[s.offset..], "ba");
    }

    #[test]
    fn dirs_only_excludes_regular_files() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("etcfile"), "").unwrap();
        std::fs::create_dir(tmp.path().join("etcdir")).unwrap();
        let (text, offset) = suggest_dirs_only("etc", tmp.path(), &Config::default()).unwrap();
        assert_eq!(&text[offset..], "dir/");
    }
}
