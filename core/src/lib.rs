pub mod crawl;
pub mod error;
pub mod index;
pub mod persist;
pub mod query;
pub mod tokenizer;

pub use crawl::{CrawlConfig, CrawlState, CrawlStats, Crawler, FetchedPage, PageFetcher, TextExtractor};
pub use error::{FetchError, IndexError, StopwordError};
pub use index::{InvertedIndex, Postings, Url};
pub use query::{QueryEngine, QueryResult};
pub use tokenizer::{Language, StopwordSet, Tokenizer};
