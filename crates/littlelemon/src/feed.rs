//! Remote menu feed.
//!
//! The catalog is a static JSON document of the form
//! `{"menu": [{name, price, description, image, category}, ...]}`. It is
//! fetched in one request; any failure is terminal for that call.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::menu::MenuItem;

/// A source of the full menu catalog.
#[async_trait]
pub trait MenuFeed: Send + Sync {
    /// Fetch every menu item.
    ///
    /// # Errors
    ///
    /// Returns a network error if the catalog cannot be retrieved or decoded.
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>>;
}

#[derive(Debug, Deserialize)]
struct FeedDocument {
    menu: Vec<MenuItem>,
}

/// Decode a feed document body into menu items.
///
/// # Errors
///
/// Returns [`Error::FeedPayload`] if the body is not a valid feed document.
pub fn parse_feed(body: &str) -> Result<Vec<MenuItem>> {
    serde_json::from_str::<FeedDocument>(body)
        .map(|doc| doc.menu)
        .map_err(|err| Error::feed_payload(err.to_string()))
}

/// Fetches the catalog over HTTP.
#[derive(Debug, Clone)]
pub struct HttpMenuFeed {
    client: reqwest::Client,
    url: String,
}

impl HttpMenuFeed {
    /// Create a feed client for `url`.
    ///
    /// A `timeout` of `None` lets the request run until the transport gives up.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let url = url.into();
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| Error::FeedRequest {
            url: url.clone(),
            source,
        })?;
        Ok(Self { client, url })
    }

    /// The catalog URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MenuFeed for HttpMenuFeed {
    async fn fetch_menu(&self) -> Result<Vec<MenuItem>> {
        debug!("Fetching menu feed from {}", self.url);
        let request_error = |source| Error::FeedRequest {
            url: self.url.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::FeedStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(request_error)?;
        let items = parse_feed(&body)?;
        info!("Fetched {} menu items from feed", items.len());
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::Category;

    #[test]
    fn test_parse_feed() {
        let body = r#"{"menu":[{"name":"Greek Salad","price":12.99,"description":"...","image":"greekSalad.jpg","category":"starters"}]}"#;
        let items = parse_feed(body).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Greek Salad");
        assert_eq!(items[0].category, Category::Starters);
        assert_eq!(items[0].formatted_price(), "12.99");
    }

    #[test]
    fn test_parse_feed_empty_menu() {
        assert!(parse_feed(r#"{"menu":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_feed_ignores_extra_fields() {
        let body = r#"{"version":2,"menu":[{"id":7,"name":"Pasta","price":18,"description":"","image":"pasta.jpg","category":"mains"}]}"#;
        let items = parse_feed(body).unwrap();
        assert_eq!(items[0].category, Category::Mains);
    }

    #[test]
    fn test_parse_feed_missing_menu_is_payload_error() {
        let err = parse_feed(r#"{"items":[]}"#).unwrap_err();
        assert!(matches!(err, Error::FeedPayload(_)));
        assert!(err.is_network());
    }

    #[test]
    fn test_parse_feed_not_json() {
        assert!(parse_feed("<html>rate limited</html>").unwrap_err().is_network());
    }

    #[test]
    fn test_parse_feed_bad_category() {
        let body = r#"{"menu":[{"name":"Fries","price":3,"description":"","image":"","category":"sides"}]}"#;
        assert!(parse_feed(body).is_err());
    }

    #[test]
    fn test_http_feed_keeps_url() {
        let feed = HttpMenuFeed::new("http://localhost:1/menu.json", None).unwrap();
        assert_eq!(feed.url(), "http://localhost:1/menu.json");
    }

    #[tokio::test]
    async fn test_http_feed_connection_refused_is_network_error() {
        let feed = HttpMenuFeed::new(
            "http://127.0.0.1:9/capstone.json",
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        let err = feed.fetch_menu().await.unwrap_err();
        assert!(err.is_network());
    }
}
