//! Grounded on `check_filenames` in `original_source/src/suggestions.c`:
//! matches the word against the already-cached directory listing (§5: no
//! extra filesystem call on this hot path) rather than re-reading the
//! directory, falling back to a fuzzy subsequence match when enabled.

use super::{Suggestion, SuggestionSource};
use crate::config::Config;
use crate::listing::ListingCache;

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut chars = haystack.chars();
    needle.chars().all(|c| chars.any(|h| h.eq_ignore_ascii_case(&c) || h == c))
}

pub fn suggest(word: &str, listing: &ListingCache, cfg: &Config) -> Option<Suggestion> {
    if word.is_empty() {
        return None;
    }
    let matches_prefix = |name: &str| {
        if cfg.case_sensitive_list {
            name.starts_with(word)
        } else {
            name.to_lowercase().starts_with(&word.to_lowercase())
        }
    };

    if let Some(entry) = listing.entries().iter().find(|e| matches_prefix(&e.name)) {
        let mut tail = entry.name[word.len()..].to_string();
        if entry.is_dir() {
            tail.push('/');
        }
        return Some(Suggestion::inline(format!("{word}{tail}"), SuggestionSource::FileInCwd, word.len()));
    }

    if cfg.fuzzy_match {
        if let Some(entry) = listing.entries().iter().find(|e| is_subsequence(word, &e.name)) {
            let mut text = entry.name.clone();
            if entry.is_dir() {
                text.push('/');
            }
            // A subsequence match shares no prefix with what was typed, so
            // it replaces the word outright rather than trailing it.
            return Some(Suggestion::baej(text, SuggestionSource::FileInCwd));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn startup_scenario_suggests_rc_tail() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("README.md"), "").unwrap();
        fs::create_dir(tmp.path().join("src")).unwrap();
        fs::create_dir(tmp.path().join("tests")).unwrap();
        let mut listing = ListingCache::new();
        listing.force_refresh(tmp.path(), &Config::default()).unwrap();
        let s = suggest("s", &listing, &Config::default()).unwrap();
        assert_eq!(&s.text[s.offset..], "rc/");
    }

    #[test]
    fn fuzzy_subsequence_used_when_enabled() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("banana.txt"), "").unwrap();
        let mut listing = ListingCache::new();
        let mut cfg = Config::default();
        cfg.fuzzy_match = true;
        listing.force_refresh(tmp.path(), &cfg).unwrap();
        let s = suggest("bnn", &listing, &cfg).unwrap();
        assert_eq!(s.text, "banana.txt");
    }
}
