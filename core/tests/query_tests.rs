use crawldex_core::{InvertedIndex, QueryEngine, QueryResult, StopwordSet, Tokenizer};
use tempfile::tempdir;

fn no_stopwords() -> Tokenizer { Tokenizer::new(StopwordSet::empty()) }

fn load(json: &str) -> QueryEngine {
    let index = InvertedIndex::read_from(json.as_bytes()).unwrap();
    QueryEngine::new(index, no_stopwords())
}

#[test]
fn substring_match_hits_longer_key() {
    let engine = load(r#"{ "category": { "docA": 3 } }"#);
    assert_eq!(engine.search("cat"), vec![QueryResult::new("docA", 3)]);
}

#[test]
fn results_are_concatenated_then_sorted() {
    let engine = load(r#"{ "a": { "u1": 2 }, "b": { "u1": 1, "u2": 5 } }"#);
    assert_eq!(
        engine.search("a b"),
        vec![QueryResult::new("u2", 5), QueryResult::new("u1", 2), QueryResult::new("u1", 1)]
    );
}

#[test]
fn repeated_query_tokens_repeat_results() {
    let engine = load(r#"{ "rust": { "u1": 4 } }"#);
    assert_eq!(engine.search("rust RUST"), vec![QueryResult::new("u1", 4), QueryResult::new("u1", 4)]);
}

#[test]
fn unmatched_query_is_empty() {
    let engine = load(r#"{ "rust": { "u1": 4 } }"#);
    assert!(engine.search("python").is_empty());
}

#[test]
fn engine_loads_from_saved_index() {
    let mut index = InvertedIndex::new();
    index.index("https://a.org/", "energia fusão energia", &no_stopwords());
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.json");
    index.save(&path).unwrap();

    let engine = QueryEngine::load(&path, no_stopwords()).unwrap();
    assert_eq!(engine.search("Energia"), vec![QueryResult::new("https://a.org/", 2)]);
}

#[test]
fn load_failure_surfaces_to_caller() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(QueryEngine::load(&path, no_stopwords()).is_err());
}
