use crate::error::FetchError;
use crate::index::InvertedIndex;
use crate::tokenizer::Tokenizer;
use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::HashSet;

/// Raw page content plus the absolute targets of its outbound links.
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    pub content: String,
    pub links: Vec<String>,
}

/// Renders a URL into page content and outbound links.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

#[async_trait]
impl<'a, T: PageFetcher + ?Sized> PageFetcher for &'a T {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        (**self).fetch(url).await
    }
}

/// Turns raw markup into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, content: &str) -> String;
}

impl<T: TextExtractor + ?Sized> TextExtractor for &T {
    fn extract_text(&self, content: &str) -> String { (**self).extract_text(content) }
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// A link is followed only if it starts with one of these prefixes.
    pub base_urls: Vec<String>,
    /// Seeds are depth 0.
    pub max_depth: usize,
    /// Maximum number of fetches in flight at once.
    pub concurrency: usize,
    /// Stop fetching once this many pages have been indexed.
    pub max_pages: Option<usize>,
}

impl CrawlConfig {
    pub fn new<I, S>(base_urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base_urls: base_urls.into_iter().map(Into::into).collect(),
            max_depth: 2,
            concurrency: 1,
            max_pages: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }
}

/// Traversal state of one crawler instance.
#[derive(Debug, Clone, Default)]
pub struct CrawlState {
    visited: HashSet<String>,
    base_urls: Vec<String>,
    max_depth: usize,
}

impl CrawlState {
    pub fn new(base_urls: Vec<String>, max_depth: usize) -> Self {
        Self { visited: HashSet::new(), base_urls, max_depth }
    }

    pub fn is_allowed(&self, url: &str) -> bool {
        self.base_urls.iter().any(|base| url.starts_with(base.as_str()))
    }

    pub fn is_visited(&self, url: &str) -> bool { self.visited.contains(url) }

    pub fn visited(&self) -> &HashSet<String> { &self.visited }

    pub fn base_urls(&self) -> &[String] { &self.base_urls }

    pub fn max_depth(&self) -> usize { self.max_depth }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub pages_indexed: usize,
    pub tokens_indexed: usize,
    pub fetch_failures: usize,
    pub skipped_depth: usize,
    pub skipped_visited: usize,
}

impl std::ops::AddAssign for CrawlStats {
    fn add_assign(&mut self, other: Self) {
        self.pages_indexed += other.pages_indexed;
        self.tokens_indexed += other.tokens_indexed;
        self.fetch_failures += other.fetch_failures;
        self.skipped_depth += other.skipped_depth;
        self.skipped_visited += other.skipped_visited;
    }
}

#[derive(Debug)]
struct FrontierEntry {
    url: String,
    depth: usize,
}

/// Depth-bounded crawler feeding extracted page text into an inverted index.
pub struct Crawler<F, E> {
    fetcher: F,
    extractor: E,
    tokenizer: Tokenizer,
    state: CrawlState,
    index: InvertedIndex,
    concurrency: usize,
    max_pages: Option<usize>,
}

impl<F: PageFetcher, E: TextExtractor> Crawler<F, E> {
    pub fn new(fetcher: F, extractor: E, tokenizer: Tokenizer, config: CrawlConfig) -> Self {
        Self {
            fetcher,
            extractor,
            tokenizer,
            state: CrawlState::new(config.base_urls, config.max_depth),
            index: InvertedIndex::new(),
            concurrency: config.concurrency.max(1),
            max_pages: config.max_pages,
        }
    }

    /// Crawl from `seed`, depth first. Fetch failures are logged and counted,
    /// never returned: a failing branch is dropped and the crawl carries on.
    ///
    /// A URL is marked visited only after it has been fetched and indexed, so
    /// a URL whose fetch failed may be attempted again from another page.
    pub async fn crawl(&mut self, seed: &str) -> CrawlStats {
        self.crawl_with(seed, |_, _| {}).await
    }

    /// Like [`Crawler::crawl`], calling `on_page(url, text)` after each page is indexed.
    pub async fn crawl_with<S>(&mut self, seed: &str, mut on_page: S) -> CrawlStats
    where
        S: FnMut(&str, &str),
    {
        let Self { fetcher, extractor, tokenizer, state, index, concurrency, max_pages } = self;
        let fetcher = &*fetcher;
        let limit = *concurrency;
        let cap = *max_pages;

        let mut stats = CrawlStats::default();
        let mut frontier = vec![FrontierEntry { url: seed.to_string(), depth: 0 }];
        // URLs with a fetch in flight; claimed before the fetch starts.
        let mut claimed: HashSet<String> = HashSet::new();
        let mut inflight = FuturesUnordered::new();

        loop {
            while inflight.len() < limit {
                if cap.is_some_and(|cap| state.visited.len() + inflight.len() >= cap) {
                    break;
                }
                let Some(entry) = frontier.pop() else { break };
                if entry.depth > state.max_depth {
                    stats.skipped_depth += 1;
                    continue;
                }
                if state.visited.contains(&entry.url) || !claimed.insert(entry.url.clone()) {
                    stats.skipped_visited += 1;
                    continue;
                }
                tracing::debug!(url = %entry.url, depth = entry.depth, "fetching");
                inflight.push(fetch_entry(fetcher, entry));
            }

            let Some((entry, result)) = inflight.next().await else { break };
            claimed.remove(&entry.url);

            let page = match result {
                Ok(page) => page,
                Err(err) => {
                    tracing::warn!(url = %entry.url, depth = entry.depth, error = %err, "fetch failed, skipping branch");
                    stats.fetch_failures += 1;
                    continue;
                }
            };

            let text = extractor.extract_text(&page.content);
            stats.tokens_indexed += index.index(&entry.url, &text, tokenizer);
            state.visited.insert(entry.url.clone());
            stats.pages_indexed += 1;
            on_page(&entry.url, &text);

            let next_depth = entry.depth + 1;
            // Reverse so the first link on the page is popped first.
            for link in page.links.into_iter().rev() {
                if state.is_allowed(&link) {
                    frontier.push(FrontierEntry { url: link, depth: next_depth });
                }
            }
        }

        tracing::info!(
            seed,
            pages = stats.pages_indexed,
            failures = stats.fetch_failures,
            visited = state.visited.len(),
            terms = index.len(),
            "crawl finished"
        );
        stats
    }

    pub fn state(&self) -> &CrawlState { &self.state }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn tokenizer(&self) -> &Tokenizer { &self.tokenizer }

    pub fn into_index(self) -> InvertedIndex { self.index }
}

async fn fetch_entry<F: PageFetcher + ?Sized>(fetcher: &F, entry: FrontierEntry) -> (FrontierEntry, Result<FetchedPage, FetchError>) {
    let result = fetcher.fetch(&entry.url).await;
    (entry, result)
}
