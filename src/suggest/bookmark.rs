//! Grounded on `check_bookmarks` in `original_source/src/suggestions.c`:
//! word equals a bookmark short name (exact match, like aliases).

use std::path::Path;

use super::{Suggestion, SuggestionSource};
use crate::stores::bookmarks::BookmarkStore;

pub fn suggest(word: &str, bookmarks: &BookmarkStore) -> Option<Suggestion> {
    let bookmark = bookmarks.find_exact(word)?;
    let mut path = bookmark.path.clone();
    if Path::new(&path).is_dir() && !path.ends_with('/') {
        path.push('/');
    }
    Some(Suggestion::baej(path, SuggestionSource::Bookmark))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::bookmarks::Bookmark;

    #[test]
    fn exact_name_match_suggests_path() {
        let mut store = BookmarkStore::default();
        store.add(Bookmark {
            name: Some("docs".into()),
            hotkey: None,
            path: "/tmp/does-not-exist".into(),
        });
        let s = suggest("docs", &store).unwrap();
        assert_eq!(s.text, "/tmp/does-not-exist");
    }
}
