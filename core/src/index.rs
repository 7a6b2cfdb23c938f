use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type Url = String;

/// Occurrence counts of one token, keyed by document url.
pub type Postings = BTreeMap<Url, u32>;

/// Term-frequency inverted index: token -> url -> occurrence count.
///
/// Serializes as a plain JSON object of objects. Keys are kept ordered so the
/// saved file and the query engine's first-match scan are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvertedIndex {
    terms: BTreeMap<String, Postings>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Tokenize `text` and add one occurrence per surviving token to `url`.
    pub fn index(&mut self, url: &str, text: &str, tokenizer: &Tokenizer) -> usize {
        let tokens = tokenizer.tokenize(text);
        let added = tokens.len();
        for token in tokens {
            self.add_occurrence(token, url);
        }
        added
    }

    pub fn add_occurrence(&mut self, token: impl Into<String>, url: &str) {
        let postings = self.terms.entry(token.into()).or_default();
        match postings.get_mut(url) {
            Some(count) => *count += 1,
            None => {
                postings.insert(url.to_string(), 1);
            }
        }
    }

    pub fn postings(&self, token: &str) -> Option<&Postings> { self.terms.get(token) }

    pub fn count(&self, token: &str, url: &str) -> u32 {
        self.terms.get(token).and_then(|p| p.get(url)).copied().unwrap_or(0)
    }

    /// Tokens with their postings, in key order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, &Postings)> {
        self.terms.iter().map(|(t, p)| (t.as_str(), p))
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    /// Number of distinct documents referenced by any token.
    pub fn document_count(&self) -> usize {
        self.terms.values().flat_map(|p| p.keys()).collect::<BTreeSet<_>>().len()
    }

    /// Sum of all occurrence counts of a token across documents.
    pub fn total_occurrences(&self, token: &str) -> u64 {
        self.terms.get(token).map(|p| p.values().map(|&c| c as u64).sum()).unwrap_or(0)
    }
}
