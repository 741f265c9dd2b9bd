//! Grounded on `check_aliases` in `original_source/src/suggestions.c`: the
//! word must equal an alias name exactly (not merely a prefix of one).

use super::{Suggestion, SuggestionSource};
use crate::stores::aliases::AliasStore;

pub fn suggest(word: &str, aliases: &AliasStore) -> Option<Suggestion> {
    let alias = aliases.find_exact(word)?;
    Some(Suggestion::baej(alias.expansion.clone(), SuggestionSource::Alias))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_suggests_expansion() {
        let mut store = AliasStore::default();
        store.set("ll", "ls -la");
        let s = suggest("ll", &store).unwrap();
        assert_eq!(s.text, "ls -la");
    }

    #[test]
    fn prefix_only_does_not_match() {
        let mut store = AliasStore::default();
        store.set("ll", "ls -la");
        assert!(suggest("l", &store).is_none());
    }
}
