use crawldex_core::{Language, StopwordSet, Tokenizer};
use std::io::Write;

#[test]
fn it_lowercases_and_splits_on_whitespace() {
    let tokenizer = Tokenizer::new(StopwordSet::empty());
    let toks = tokenizer.tokenize("Running\tRUNNERS\n run!  Café's");
    assert_eq!(toks, vec!["running", "runners", "run!", "café's"]);
}

#[test]
fn it_filters_stopwords() {
    let tokenizer = Tokenizer::for_language(Language::English);
    let words = tokenizer.tokenize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert_eq!(words, vec!["quick", "brown", "fox", "lazy", "dog"]);
}

#[test]
fn it_filters_portuguese_stopwords() {
    let tokenizer = Tokenizer::for_language(Language::Portuguese);
    let words = tokenizer.tokenize("O mercado de ações e a Bolsa NÃO abriram");
    assert_eq!(words, vec!["mercado", "ações", "bolsa", "abriram"]);
}

#[test]
fn it_does_not_strip_punctuation() {
    let tokenizer = Tokenizer::new(StopwordSet::from_words(["the"]));
    assert_eq!(tokenizer.tokenize("The Cat sat."), vec!["cat", "sat."]);
    // "the," is not the stop word "the"
    assert_eq!(tokenizer.tokenize("the, end"), vec!["the,", "end"]);
}

#[test]
fn it_is_restartable() {
    let tokenizer = Tokenizer::for_language(Language::English);
    let text = "Rust crawls the web";
    assert_eq!(tokenizer.tokenize(text), tokenizer.tokenize(text));
}

#[test]
fn it_reads_stopwords_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# custom list").unwrap();
    writeln!(file, "Foo").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "  bar  ").unwrap();
    let set = StopwordSet::from_path(file.path()).unwrap();
    assert_eq!(set.len(), 2);
    assert!(set.contains("foo"));
    assert!(set.contains("bar"));

    let tokenizer = Tokenizer::new(set);
    assert_eq!(tokenizer.tokenize("foo BAR baz"), vec!["baz"]);
}

#[test]
fn missing_stopword_file_is_an_error() {
    assert!(StopwordSet::from_path("/nonexistent/stopwords.txt").is_err());
}
