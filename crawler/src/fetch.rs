use crate::extract::extract_links;
use async_trait::async_trait;
use crawldex_core::{FetchError, FetchedPage, PageFetcher};
use reqwest::{header, redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Bodies larger than this are dropped.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Fetches HTML pages over HTTP with one attempt per URL.
///
/// Responses declaring a non-HTML `Content-Type` are rejected, as are bodies
/// over the size limit. A response without a `Content-Type` is accepted.
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// `timeout` is off unless given.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().user_agent(user_agent).redirect(Policy::limited(5));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self { client: builder.build()?, max_body_bytes: MAX_BODY_BYTES })
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let target = Url::parse(url).map_err(|e| FetchError::InvalidUrl { url: url.to_string(), message: e.to_string() })?;
        let transport = |e: reqwest::Error| FetchError::Transport { url: url.to_string(), message: e.to_string() };

        let mut resp = self.client.get(target).send().await.map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
        }
        if let Some(ct) = resp.headers().get(header::CONTENT_TYPE) {
            let content_type = String::from_utf8_lossy(ct.as_bytes()).to_string();
            if !content_type.trim_start().to_ascii_lowercase().starts_with("text/html") {
                return Err(FetchError::NotHtml { url: url.to_string(), content_type });
            }
        }
        let too_large = || FetchError::TooLarge { url: url.to_string(), limit: self.max_body_bytes };
        if resp.content_length().is_some_and(|len| len > self.max_body_bytes as u64) {
            return Err(too_large());
        }
        // links resolve against where redirects ended up
        let final_url = resp.url().clone();
        let mut body = Vec::new();
        while let Some(chunk) = resp.chunk().await.map_err(transport)? {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        let content = String::from_utf8_lossy(&body).into_owned();
        let links = extract_links(&content, &final_url);
        tracing::debug!(url, links = links.len(), bytes = content.len(), "fetched page");
        Ok(FetchedPage { content, links })
    }
}
