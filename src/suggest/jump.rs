//! Grounded on `check_jumpdb` in `original_source/src/suggestions.c`: the
//! frecency-ranked jump database lookup, wrapped as a BAEJ suggestion. The
//! ranking itself lives in [`crate::stores::jump::JumpStore::best_match`].

use super::{Suggestion, SuggestionSource};
use crate::stores::jump::JumpStore;

pub fn suggest(word: &str, jump: &JumpStore, now: u64, case_sensitive: bool) -> Option<Suggestion> {
    if word.is_empty() {
        return None;
    }
    let entry = jump.best_match(word, now, 3600, case_sensitive)?;
    Some(Suggestion::baej(entry.path.clone(), SuggestionSource::JumpTarget))
}
