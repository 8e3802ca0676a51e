use std::fmt::Display;
use std::future::Future;

use reqwest::Client;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

// Page 0 is the newest page of the listing.
pub trait ListingSource {
    type Error: Display;

    fn fetch_page(&self, page: u32) -> impl Future<Output = Result<String, Self::Error>>;
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    base_url: String,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        let client = Client::builder().user_agent(crate::USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: crate::BASE_URL.to_string(),
        })
    }

    pub fn listing_url(&self, page: u32) -> String {
        listing_url(&self.base_url, page)
    }

    async fn get_html(&self, url: &str) -> Result<String, ScraperError> {
        Ok(self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .error_for_status()
            .inspect_err(|e| log::error!("HTTP status error: {e}"))?
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?)
    }
}

impl ListingSource for WebScraper {
    type Error = ScraperError;

    async fn fetch_page(&self, page: u32) -> Result<String, ScraperError> {
        let url = self.listing_url(page);
        log::debug!("GET {}", url);
        self.get_html(&url).await
    }
}

fn listing_url(base_url: &str, page: u32) -> String {
    if page == 0 {
        base_url.to_string()
    } else {
        format!("{}?page={}", base_url, page)
    }
}
