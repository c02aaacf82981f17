//! Suggestion selection set
//!
//! AI suggestions the user has picked, across all blocks. Behaves as a set
//! of `(block_title, suggestion)` pairs that remembers insertion order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One picked suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionSelection {
    pub block_title: String,
    pub suggestion: String,
}

impl SuggestionSelection {
    pub fn new(block_title: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            block_title: block_title.into(),
            suggestion: suggestion.into(),
        }
    }

    fn matches(&self, block_title: &str, suggestion: &str) -> bool {
        self.block_title == block_title && self.suggestion == suggestion
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "Vec<SuggestionSelection>",
    into = "Vec<SuggestionSelection>"
)]
pub struct SelectionSet {
    entries: Vec<SuggestionSelection>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the pair if present, add it otherwise.
    ///
    /// Returns true if the pair is selected after the call.
    pub fn toggle(&mut self, block_title: &str, suggestion: &str) -> bool {
        if let Some(position) = self
            .entries
            .iter()
            .position(|s| s.matches(block_title, suggestion))
        {
            self.entries.remove(position);
            false
        } else {
            self.entries
                .push(SuggestionSelection::new(block_title, suggestion));
            true
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, block_title: &str, suggestion: &str) -> bool {
        self.entries
            .iter()
            .any(|s| s.matches(block_title, suggestion))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SuggestionSelection> {
        self.entries.iter()
    }

    /// Suggestions per block title. Titles appear in order of first
    /// selection; suggestions keep their relative selection order.
    pub fn group_by_block(&self) -> IndexMap<String, Vec<String>> {
        let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
        for selection in &self.entries {
            groups
                .entry(selection.block_title.clone())
                .or_default()
                .push(selection.suggestion.clone());
        }
        groups
    }
}

impl FromIterator<SuggestionSelection> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = SuggestionSelection>>(iter: I) -> Self {
        let mut set = Self::new();
        for selection in iter {
            if !set.contains(&selection.block_title, &selection.suggestion) {
                set.entries.push(selection);
            }
        }
        set
    }
}

impl From<Vec<SuggestionSelection>> for SelectionSet {
    fn from(entries: Vec<SuggestionSelection>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<SelectionSet> for Vec<SuggestionSelection> {
    fn from(set: SelectionSet) -> Self {
        set.entries
    }
}
