//! Search filtering over note title and content.
//!
//! # Invariants
//! - An empty query is the identity; nothing is trimmed.
//! - Output keeps the relative order of the input.
//! - Matching is a case-insensitive substring test, never ranked.

use crate::model::note::Note;

/// Folds `text` for case-insensitive comparison.
///
/// Upper-then-lower covers full Unicode case mappings that a plain
/// `to_lowercase` misses (`ß` vs `SS`, final sigma).
pub fn fold_case(text: &str) -> String {
    text.to_uppercase().to_lowercase()
}

/// Precomputed search needle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    folded: String,
}

impl SearchQuery {
    pub fn new(query: &str) -> Self {
        Self {
            folded: fold_case(query),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    /// Returns whether `note` title or content contains the query.
    pub fn matches(&self, note: &Note) -> bool {
        self.is_empty()
            || fold_case(&note.title).contains(&self.folded)
            || fold_case(&note.content).contains(&self.folded)
    }
}

/// Keeps the notes matching `query`, preserving input order.
pub fn filter_notes<'a, I>(notes: I, query: &str) -> Vec<&'a Note>
where
    I: IntoIterator<Item = &'a Note>,
{
    if query.is_empty() {
        return notes.into_iter().collect();
    }
    let query = SearchQuery::new(query);
    notes.into_iter().filter(|note| query.matches(note)).collect()
}
