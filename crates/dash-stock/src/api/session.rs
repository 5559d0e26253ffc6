//! Yahoo Finance cookie and crumb authentication
//!
//! The quoteSummary endpoint rejects requests without a session cookie and a
//! matching crumb. The cookie lives in the client's cookie jar; the crumb is
//! fetched once and appended to authenticated URLs until the provider answers
//! 401, at which point it is discarded and fetched again.

use reqwest::Client;
use tokio::sync::Mutex;
use tracing::debug;

use super::RemoteResult;
use crate::error::RemoteDataError;

const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URLS: [&str; 2] = [
    "https://query1.finance.yahoo.com/v1/test/getcrumb",
    "https://query2.finance.yahoo.com/v1/test/getcrumb",
];
const REFERER: &str = "https://finance.yahoo.com/";

/// Crumb cache bound to one cookie-enabled HTTP client
#[derive(Debug, Default)]
pub struct YahooSession {
    crumb: Mutex<Option<String>>,
}

impl YahooSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current crumb, fetching a fresh one if none is cached
    pub async fn crumb(&self, client: &Client) -> RemoteResult<String> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        let crumb = Self::fetch_crumb(client).await?;
        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    /// Drop the cached crumb so the next call refreshes it
    pub async fn invalidate(&self) {
        *self.crumb.lock().await = None;
    }

    async fn fetch_crumb(client: &Client) -> RemoteResult<String> {
        debug!("refreshing Yahoo session cookie");
        // The cookie endpoint answers 404 but still sets the session cookie.
        client.get(COOKIE_URL).header("referer", REFERER).send().await?;

        for endpoint in CRUMB_URLS {
            let response = match client.get(endpoint).header("referer", REFERER).send().await {
                Ok(response) => response,
                Err(err) => {
                    debug!(%endpoint, error = %err, "crumb request failed");
                    continue;
                }
            };

            if response.status().as_u16() == 429 {
                return Err(RemoteDataError::RateLimited {
                    provider: "Yahoo Finance".to_string(),
                });
            }
            if !response.status().is_success() {
                continue;
            }

            let body = response.text().await?;
            if let Some(crumb) = validate_crumb(&body) {
                debug!(%endpoint, "obtained Yahoo crumb");
                return Ok(crumb);
            }
        }

        Err(RemoteDataError::Network(
            "failed to obtain Yahoo crumb from all endpoints".to_string(),
        ))
    }
}

/// A crumb is a short token; HTML pages and error messages are rejected
fn validate_crumb(body: &str) -> Option<String> {
    let body = body.trim();
    let looks_valid = !body.is_empty()
        && body.len() < 100
        && !body.contains(char::is_whitespace)
        && !body.contains('<');
    looks_valid.then(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_crumb() {
        assert_eq!(validate_crumb(" abcD3f.gh/\n"), Some("abcD3f.gh/".to_string()));
        assert_eq!(validate_crumb(""), None);
        assert_eq!(validate_crumb("Too Many Requests"), None);
        assert_eq!(validate_crumb("<!DOCTYPE html><html>"), None);
    }

    #[tokio::test]
    async fn test_invalidate_clears_cache() {
        let session = YahooSession::new();
        *session.crumb.lock().await = Some("cached".to_string());

        let client = Client::new();
        assert_eq!(session.crumb(&client).await.unwrap(), "cached");

        session.invalidate().await;
        assert!(session.crumb.lock().await.is_none());
    }
}
