//! Loads the background article the assistant answers from.

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{info, instrument, warn};

use crate::error::FetchError;

/// Fetches one fixed document and flattens its paragraph text.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    http: Client,
    url: String,
}

impl ContentFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// One GET, no retry. Non-2xx statuses are errors.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch(&self) -> Result<String, FetchError> {
        let network = |source| FetchError::Network {
            url: self.url.clone(),
            source,
        };

        let response = self.http.get(&self.url).send().await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(network)?;
        let text = extract_paragraphs(&body);
        info!(chars = text.len(), "Loaded source article");
        Ok(text)
    }

    /// Like [`fetch`](Self::fetch), but degrades to empty context. The error is
    /// returned alongside so the caller can surface it as a notice.
    pub async fn fetch_or_empty(&self) -> (String, Option<FetchError>) {
        match self.fetch().await {
            Ok(text) => (text, None),
            Err(e) => {
                warn!(error = %e, "Continuing without source article");
                (String::new(), Some(e))
            }
        }
    }
}

/// Text of every `<p>` element in document order, joined with single spaces.
pub fn extract_paragraphs(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector = Selector::parse("p").expect("'p' is a valid selector");

    document
        .select(&selector)
        .map(|p| p.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
