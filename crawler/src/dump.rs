use serde::Serialize;
use sha1::{Digest, Sha1};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use time::format_description::well_known::Rfc3339;

#[derive(Serialize)]
struct PageRecord<'a> {
    id: String,
    url: &'a str,
    text: &'a str,
    timestamp: String,
}

/// JSONL dump of every indexed page, readable by `indexer build`.
pub struct PageDump {
    out: BufWriter<File>,
    written: usize,
    error: Option<io::Error>,
}

impl PageDump {
    pub fn create(path: &Path) -> io::Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        Ok(Self { out: BufWriter::new(File::create(path)?), written: 0, error: None })
    }

    /// Append one record. After the first write error, further records are dropped
    /// and the error is returned by [`PageDump::finish`].
    pub fn record(&mut self, url: &str, text: &str) {
        if self.error.is_some() {
            return;
        }
        let mut hasher = Sha1::new();
        hasher.update(url.as_bytes());
        let id = format!("{:x}", hasher.finalize());
        let timestamp = time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default();
        let rec = PageRecord { id, url, text, timestamp };
        let res = serde_json::to_writer(&mut self.out, &rec)
            .map_err(io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"));
        match res {
            Ok(()) => self.written += 1,
            Err(e) => {
                tracing::warn!(url, error = %e, "page dump write failed");
                self.error = Some(e);
            }
        }
    }

    pub fn finish(mut self) -> io::Result<usize> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("pages.jsonl");
        let mut dump = PageDump::create(&path).unwrap();
        dump.record("https://a.org/", "hello world");
        dump.record("https://a.org/b", "second page");
        assert_eq!(dump.finish().unwrap(), 2);

        let raw = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = raw.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["url"], "https://a.org/");
        assert_eq!(lines[1]["text"], "second page");
        assert_eq!(lines[0]["id"].as_str().unwrap().len(), 40);
    }
}
