use crate::error::IndexError;
use crate::index::InvertedIndex;
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

impl InvertedIndex {
    /// Write the index as pretty-printed JSON to `path`, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), IndexError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            create_dir_all(dir)?;
        }
        let mut out = BufWriter::new(File::create(path)?);
        self.write_to(&mut out)?;
        out.flush()?;
        tracing::info!(path = %path.display(), terms = self.len(), "saved index");
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), IndexError> {
        serde_json::to_writer_pretty(writer, self).map_err(|e| {
            if e.is_io() { IndexError::Io(e.into()) } else { IndexError::Parse(e) }
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, IndexError> {
        let f = File::open(path.as_ref())?;
        Self::read_from(BufReader::new(f))
    }

    /// Read a saved index. Zero counts and empty posting maps are rejected.
    ///
    /// Bytes that are not valid UTF-8 are a parse error, not an I/O error.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self, IndexError> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        let index: InvertedIndex = serde_json::from_slice(&buf)?;
        index.validate()?;
        Ok(index)
    }

    fn validate(&self) -> Result<(), IndexError> {
        for (token, postings) in self.terms() {
            if postings.is_empty() {
                return Err(IndexError::Invalid { token: token.to_string(), reason: "no documents".into() });
            }
            if let Some((url, _)) = postings.iter().find(|(_, count)| **count == 0) {
                return Err(IndexError::Invalid { token: token.to_string(), reason: format!("zero count for {url}") });
            }
        }
        Ok(())
    }
}
