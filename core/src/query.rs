use crate::error::IndexError;
use crate::index::InvertedIndex;
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub url: String,
    pub score: u32,
}

impl QueryResult {
    pub fn new(url: impl Into<String>, score: u32) -> Self { Self { url: url.into(), score } }
}

/// Ranks documents by raw occurrence counts of index keys matching the query.
///
/// A query token matches every index key that contains it as a substring.
/// With `first_match_only` (the default) only the first such key, in index
/// key order, contributes; the rest are ignored.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    index: InvertedIndex,
    tokenizer: Tokenizer,
    first_match_only: bool,
}

impl QueryEngine {
    pub fn new(index: InvertedIndex, tokenizer: Tokenizer) -> Self {
        Self { index, tokenizer, first_match_only: true }
    }

    pub fn load<P: AsRef<Path>>(path: P, tokenizer: Tokenizer) -> Result<Self, IndexError> {
        let index = InvertedIndex::load(path)?;
        Ok(Self::new(index, tokenizer))
    }

    pub fn with_first_match_only(mut self, first_match_only: bool) -> Self {
        self.first_match_only = first_match_only;
        self
    }

    pub fn first_match_only(&self) -> bool { self.first_match_only }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn search(&self, query: &str) -> Vec<QueryResult> {
        let mut results = Vec::new();
        for token in self.tokenizer.tokenize(query) {
            let matching = self.index.terms().filter(|(key, _)| key.contains(token.as_str()));
            for (_, postings) in matching {
                results.extend(postings.iter().map(|(url, &count)| QueryResult::new(url.as_str(), count)));
                if self.first_match_only {
                    break;
                }
            }
        }
        // stable: equal scores keep concatenation order
        results.sort_by(|a, b| b.score.cmp(&a.score));
        results
    }

    pub fn search_top(&self, query: &str, k: usize) -> Vec<QueryResult> {
        let mut results = self.search(query);
        results.truncate(k);
        results
    }
}
