//! Grounded on `check_history` in `original_source/src/suggestions.c`: the
//! whole typed line (not just the word under edit) is matched as a prefix
//! against history entries, and the full matched entry is suggested inline,
//! anchored at line start (§4.4).

use super::{Suggestion, SuggestionSource};
use crate::stores::history::HistoryStore;

pub fn suggest(line: &str, history: &HistoryStore, case_sensitive: bool) -> Option<Suggestion> {
    if line.is_empty() {
        return None;
    }
    let matched = history.find_by_prefix(line, case_sensitive)?;
    if matched == line {
        return None;
    }
    Some(Suggestion::inline(
        matched.to_string(),
        SuggestionSource::History,
        line.len(),
    ))
}
