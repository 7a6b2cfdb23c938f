mod dump;
mod extract;
mod fetch;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crawldex_core::{CrawlConfig, CrawlStats, Crawler, Language, StopwordSet, Tokenizer};
use dump::PageDump;
use extract::HtmlTextExtractor;
use fetch::HttpFetcher;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(about = "Crawl pages reachable from seed URLs and write a term-frequency index")]
struct Cli {
    /// Seed URL to start from (repeatable)
    #[arg(long = "seed", required = true)]
    seeds: Vec<String>,
    /// Only follow links starting with this prefix (repeatable, defaults to the seeds)
    #[arg(long = "base-url")]
    base_urls: Vec<String>,
    /// Maximum link hops from a seed (the seed is depth 0)
    #[arg(long, default_value_t = 2)]
    max_depth: usize,
    /// Output index file (JSON)
    #[arg(long, default_value = "./index.json")]
    output: PathBuf,
    /// Built-in stop-word list: portuguese, english or none
    #[arg(long, default_value = "portuguese")]
    language: Language,
    /// Stop-word file, one word per line (replaces --language)
    #[arg(long)]
    stopwords: Option<PathBuf>,
    /// Number of pages fetched concurrently
    #[arg(long, default_value_t = 1)]
    concurrency: usize,
    /// Request timeout seconds (no timeout unless set)
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Stop after indexing this many pages
    #[arg(long)]
    max_pages: Option<usize>,
    /// User-Agent string
    #[arg(long, default_value = "crawldex-bot/0.1")]
    user_agent: String,
    /// Also write every indexed page to this JSONL file
    #[arg(long)]
    dump: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let args = Cli::parse();

    let seeds = parse_seeds(&args.seeds)?;
    let base_urls = if args.base_urls.is_empty() { seeds.clone() } else { parse_base_urls(&args.base_urls)? };
    let stopwords = StopwordSet::resolve(args.language, args.stopwords.as_deref())?;
    tracing::info!(
        seeds = seeds.len(),
        base_urls = ?base_urls,
        max_depth = args.max_depth,
        concurrency = args.concurrency,
        stopwords = stopwords.len(),
        "starting crawl"
    );

    let fetcher = HttpFetcher::new(&args.user_agent, args.timeout_secs.map(Duration::from_secs))?;
    let config = CrawlConfig::new(base_urls)
        .with_max_depth(args.max_depth)
        .with_concurrency(args.concurrency)
        .with_max_pages(args.max_pages);
    let mut crawler = Crawler::new(fetcher, HtmlTextExtractor, Tokenizer::new(stopwords), config);

    let mut dump = match &args.dump {
        Some(path) => Some(PageDump::create(path).with_context(|| format!("creating page dump {}", path.display()))?),
        None => None,
    };

    let mut totals = CrawlStats::default();
    for seed in &seeds {
        totals += crawler
            .crawl_with(seed, |url, text| {
                if let Some(dump) = dump.as_mut() {
                    dump.record(url, text);
                }
            })
            .await;
    }

    if let Some(dump) = dump {
        let written = dump.finish().context("writing page dump")?;
        tracing::info!(written, "page dump complete");
    }

    let index = crawler.index();
    index.save(&args.output).with_context(|| format!("saving index to {}", args.output.display()))?;
    tracing::info!(
        pages = totals.pages_indexed,
        failures = totals.fetch_failures,
        terms = index.len(),
        output = %args.output.display(),
        "crawl complete"
    );
    Ok(())
}

/// Absolute URL in the same form as extracted links; a bare host gets `https://`.
fn normalize_url(raw: &str) -> Result<String, url::ParseError> {
    let s = raw.trim();
    let u = Url::parse(s).or_else(|_| Url::parse(&format!("https://{}", s)))?;
    Ok(u.to_string())
}

fn parse_seeds(raw: &[String]) -> Result<Vec<String>> {
    let seeds = raw
        .iter()
        .map(|s| normalize_url(s).map_err(|e| anyhow!("invalid seed url {s:?}: {e}")))
        .collect::<Result<Vec<_>>>()?;
    if seeds.is_empty() {
        return Err(anyhow!("no valid seeds"));
    }
    Ok(seeds)
}

/// Prefixes are compared against normalized links, so normalize them too.
fn parse_base_urls(raw: &[String]) -> Result<Vec<String>> {
    raw.iter()
        .map(|s| normalize_url(s).map_err(|e| anyhow!("invalid base url {s:?}: {e}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve(server: &MockServer, route: &str, body: &str, mime: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), mime))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn crawls_a_small_site_over_http() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/docs/",
            "<html><body>\n<p>welcome fusion</p>\n<a href=\"intro\">intro</a>\n<a href=\"/blog/post\">blog</a>\n<a href=\"report.pdf\">pdf</a>\n</body></html>",
            "text/html",
        )
        .await;
        serve(&server, "/docs/intro", "<html><body>\n<p>fusion plasma</p>\n<a href=\"deep\">deep</a>\n</body></html>", "text/html").await;
        serve(&server, "/docs/report.pdf", "%PDF-1.4", "application/pdf").await;
        for unreachable in ["/blog/post", "/docs/deep"] {
            Mock::given(method("GET")).and(path(unreachable)).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;
        }

        let seed = format!("{}/docs/", server.uri());
        let fetcher = HttpFetcher::new("crawldex-test", Some(Duration::from_secs(5))).unwrap();
        let config = CrawlConfig::new([seed.clone()]).with_max_depth(1);
        let mut crawler = Crawler::new(fetcher, HtmlTextExtractor, Tokenizer::new(StopwordSet::empty()), config);
        let stats = crawler.crawl(&seed).await;

        assert_eq!(stats.pages_indexed, 2);
        assert_eq!(stats.fetch_failures, 1);
        let intro = format!("{}/docs/intro", server.uri());
        let index = crawler.index();
        assert_eq!(index.count("welcome", &seed), 1);
        assert_eq!(index.count("fusion", &seed), 1);
        assert_eq!(index.count("fusion", &intro), 1);
        assert_eq!(index.count("plasma", &intro), 1);
        assert!(!crawler.state().is_visited(&format!("{}/docs/report.pdf", server.uri())));
        assert!(crawler.state().visited().iter().all(|u| u.starts_with(&seed)));
    }

    #[test]
    fn seeds_are_normalized() {
        let seeds = parse_seeds(&["https://www.iter.org".into(), "www.infomoney.com.br/".into()]).unwrap();
        assert_eq!(seeds, vec!["https://www.iter.org/", "https://www.infomoney.com.br/"]);
    }

    #[test]
    fn base_urls_are_normalized_like_links() {
        let bases = parse_base_urls(&["https://WWW.ITER.ORG".into(), "www.iter.org/en/Science".into()]).unwrap();
        assert_eq!(bases, vec!["https://www.iter.org/", "https://www.iter.org/en/Science"]);
        assert!(parse_base_urls(&["bad base".into()]).is_err());
    }

    #[test]
    fn garbage_seed_is_rejected() {
        assert!(parse_seeds(&["bad seed".into()]).is_err());
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["crawler", "--seed", "https://a.org/"]).unwrap();
        assert_eq!(cli.max_depth, 2);
        assert_eq!(cli.language, Language::Portuguese);
        assert_eq!(cli.concurrency, 1);
        assert!(cli.timeout_secs.is_none());
        assert!(cli.base_urls.is_empty());
    }
}
