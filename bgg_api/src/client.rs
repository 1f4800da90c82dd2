//! HTTP client for the BoardGameGeek listing API and item pages.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    query::{LinkedItemsQuery, Query},
    types::LinkedItemsResponse,
    user_agent::get_user_agent,
    Error,
};

const DEFAULT_API_URL: &str = "https://api.geekdo.com";
const DEFAULT_SITE_URL: &str = "https://boardgamegeek.com";

/// HTTP client for BoardGameGeek.
///
/// Two hosts are involved: the JSON API (`api.geekdo.com`) serving the
/// paginated listings, and the website serving one HTML page per game.
/// A single `reqwest::Client` with a randomized user agent and a 30-second
/// timeout is shared by all requests, so the type is cheap to share behind
/// an `Arc`.
pub struct Client {
    base_api_url: String,
    base_site_url: String,
    http: reqwest::Client,
}

impl Client {
    /// Creates a client pointing at the production hosts.
    pub fn new() -> Result<Self, Error> {
        Self::with_base_urls(DEFAULT_API_URL, DEFAULT_SITE_URL)
    }

    /// Creates a client with custom hosts. Used for testing with wiremock.
    pub fn with_base_urls(api_url: &str, site_url: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        Ok(Self {
            base_api_url: api_url.trim_end_matches('/').to_string(),
            base_site_url: site_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Absolute link for a site-relative `href` as found in listings and item data.
    pub fn full_link(&self, href: &str) -> String {
        format!("{}{}", self.base_site_url, href)
    }

    fn api_url(&self, path: &str, query: &impl Query) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })?;
        Ok(query.add_to_url(&url))
    }

    async fn get_text(&self, url: &str, accept: &str) -> Result<String, Error> {
        let resp = self
            .http
            .get(url)
            .header("accept", accept)
            .header("accept-language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get {}: {}", url, e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body from {}: {}", url, e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request to {} failed with status {}: {}", url, status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, Error> {
        let body = self.get_text(url, "application/json, text/plain, */*").await?;
        serde_json::from_str::<T>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
            Error::Decode
        })
    }

    /// Fetches one page of games linked to a property.
    pub async fn get_linked_items(
        &self,
        query: &LinkedItemsQuery,
    ) -> Result<LinkedItemsResponse, Error> {
        let url = self.api_url("/api/geekitem/linkeditems", query)?;
        self.get_json(url.as_str()).await
    }

    /// Fetches the raw HTML of a game's page.
    pub async fn get_item_page(&self, object_id: &str) -> Result<String, Error> {
        let url = format!("{}/boardgame/{}", self.base_site_url, object_id);
        self.get_text(&url, "text/html,application/xhtml+xml").await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_link_joins_site_and_href() {
        let client = Client::with_base_urls("http://api.test/", "http://site.test/").unwrap();
        assert_eq!(
            client.full_link("/boardgame/1/x"),
            "http://site.test/boardgame/1/x"
        );
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "é".repeat(1500);
        let out = truncate_body(&body);
        assert!(out.ends_with("...[truncated]"));
        assert!(out.len() <= 2000 + "...[truncated]".len());
    }
}
