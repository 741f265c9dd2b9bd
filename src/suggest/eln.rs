//! Grounded on `check_eln` in `original_source/src/suggestions.c`: word is a
//! positive integer that is a valid entry-list number.

use super::{Suggestion, SuggestionSource};
use crate::listing::ListingCache;

pub fn suggest(word: &str, listing: &ListingCache) -> Option<Suggestion> {
    let n: usize = word.parse().ok()?;
    if n == 0 {
        return None;
    }
    let entry = listing.get_eln(n)?;
    let mut name = entry.name.clone();
    if entry.is_dir() && !name.ends_with('/') {
        name.push('/');
    }
    Some(Suggestion::baej(name, SuggestionSource::Eln))
}
