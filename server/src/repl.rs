use crawldex_core::QueryEngine;
use std::io::{self, BufRead, Write};

pub const EXIT_WORD: &str = "exit";

/// Read queries line by line until `exit_word` (any case) or end of input,
/// printing one `url, score` line per result.
pub fn run<R: BufRead, W: Write>(engine: &QueryEngine, input: R, mut out: W, exit_word: &str, limit: Option<usize>) -> io::Result<()> {
    let mut lines = input.lines();
    loop {
        write!(out, "\nquery (type '{exit_word}' to quit)> ")?;
        out.flush()?;
        let Some(line) = lines.next() else { break };
        let query = line?;
        if query.trim().eq_ignore_ascii_case(exit_word) {
            break;
        }
        let results = match limit {
            Some(k) => engine.search_top(&query, k),
            None => engine.search(&query),
        };
        if results.is_empty() {
            writeln!(out, "no results")?;
        }
        for r in results {
            writeln!(out, "{}, {}", r.url, r.score)?;
        }
    }
    writeln!(out)?;
    Ok(())
}
