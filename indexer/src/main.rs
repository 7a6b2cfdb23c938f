use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crawldex_core::{InvertedIndex, Language, StopwordSet, Tokenizer};
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One crawled page, as written by `crawler --dump`.
#[derive(Debug, Deserialize)]
struct InputDoc {
    url: String,
    #[serde(alias = "body")]
    text: String,
}

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and inspect term-frequency inverted indexes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index from JSON/JSONL page dumps (file or directory)
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: PathBuf,
        /// Output index file
        #[arg(long)]
        output: PathBuf,
        /// Built-in stop-word list: portuguese, english or none
        #[arg(long, default_value = "portuguese")]
        language: Language,
        /// Stop-word file, one word per line (replaces --language)
        #[arg(long)]
        stopwords: Option<PathBuf>,
    },
    /// Print term and document counts of an index
    Stats {
        #[arg(long)]
        index: PathBuf,
        /// Number of most frequent terms to list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, language, stopwords } => {
            let tokenizer = Tokenizer::new(StopwordSet::resolve(language, stopwords.as_deref())?);
            let index = build_index(&input, &tokenizer)?;
            index.save(&output).with_context(|| format!("saving index to {}", output.display()))?;
            tracing::info!(output = %output.display(), terms = index.len(), "index build complete");
            Ok(())
        }
        Commands::Stats { index, top } => {
            let loaded = InvertedIndex::load(&index).with_context(|| format!("loading {}", index.display()))?;
            print!("{}", render_stats(&loaded, top));
            Ok(())
        }
    }
}

fn input_files(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

fn build_index(input: &Path, tokenizer: &Tokenizer) -> Result<InvertedIndex> {
    let mut index = InvertedIndex::new();
    let mut num_docs = 0usize;
    for file in input_files(input) {
        let docs = if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file)?
        } else {
            read_json(&file)?
        };
        for doc in docs {
            index.index(&doc.url, &doc.text, tokenizer);
            num_docs += 1;
        }
    }
    tracing::info!(num_docs, num_terms = index.len(), "ingested documents");
    Ok(index)
}

fn read_jsonl(file: &Path) -> Result<Vec<InputDoc>> {
    let reader = BufReader::new(File::open(file)?);
    let mut docs = Vec::new();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line).with_context(|| format!("{}:{}", file.display(), n + 1))?;
        docs.push(doc);
    }
    Ok(docs)
}

fn read_json(file: &Path) -> Result<Vec<InputDoc>> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader).with_context(|| file.display().to_string())?;
    let docs = match json {
        serde_json::Value::Array(arr) => arr.into_iter().map(serde_json::from_value).collect::<Result<Vec<InputDoc>, _>>()?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => vec![],
    };
    Ok(docs)
}

fn render_stats(index: &InvertedIndex, top: usize) -> String {
    let mut terms: Vec<(&str, u64)> = index.terms().map(|(t, _)| (t, index.total_occurrences(t))).collect();
    terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut out = format!("terms: {}\ndocuments: {}\n", index.len(), index.document_count());
    for (term, total) in terms.into_iter().take(top) {
        out.push_str(&format!("{term}, {total}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn tokenizer() -> Tokenizer { Tokenizer::new(StopwordSet::from_words(["the"])) }

    #[test]
    fn builds_from_jsonl_dump() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("pages.jsonl"),
            "{\"id\":\"x\",\"url\":\"https://a.org/\",\"text\":\"The cat and the cat\",\"timestamp\":\"2024-01-01T00:00:00Z\"}\n\n\
             {\"url\":\"https://a.org/b\",\"text\":\"dog\"}\n",
        )
        .unwrap();
        let index = build_index(&dir.path().join("pages.jsonl"), &tokenizer()).unwrap();
        assert_eq!(index.count("cat", "https://a.org/"), 2);
        assert_eq!(index.count("and", "https://a.org/"), 1);
        assert_eq!(index.count("dog", "https://a.org/b"), 1);
        assert!(index.postings("the").is_none());
    }

    #[test]
    fn walks_directories_and_accepts_body_field() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/one.json"), r#"[{"url":"u1","body":"fusion"},{"url":"u2","text":"fusion fusion"}]"#).unwrap();
        fs::write(dir.path().join("two.json"), r#"{"url":"u3","text":"plasma"}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let index = build_index(dir.path(), &tokenizer()).unwrap();
        assert_eq!(index.count("fusion", "u1"), 1);
        assert_eq!(index.count("fusion", "u2"), 2);
        assert_eq!(index.count("plasma", "u3"), 1);
        assert_eq!(index.document_count(), 3);
    }

    #[test]
    fn bad_line_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pages.jsonl");
        fs::write(&path, "{\"url\":\"u1\"}\n").unwrap();
        assert!(build_index(&path, &tokenizer()).is_err());
    }

    #[test]
    fn stats_list_most_frequent_terms() {
        let mut index = InvertedIndex::new();
        index.index("u1", "b a a", &tokenizer());
        index.index("u2", "a c", &tokenizer());
        let out = render_stats(&index, 2);
        assert_eq!(out, "terms: 3\ndocuments: 2\na, 3\nb, 1\n");
    }
}
