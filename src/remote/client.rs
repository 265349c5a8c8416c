//! HTTP client for the listing service.
//!
//! The service speaks JSON over POST: `/files` lists a directory's
//! immediate children, `/open` performs a server-side open of a file and
//! returns an opaque payload.

use std::time::Duration;

use crate::error::{AppError, Result};
use crate::remote::protocol::{Listing, PathRequest};

/// Client for the remote listing/open service. Cheap to clone; spawned
/// request tasks each hold their own copy.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base: String,
}

impl RemoteClient {
    /// Build a client for the given server URL.
    ///
    /// `timeout` bounds each request at the transport level; `None` means
    /// requests may hang until the user collapses the pending subtree.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        reqwest::Url::parse(base_url)
            .map_err(|e| AppError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The server URL this client talks to (without trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base
    }

    async fn post_json(&self, endpoint: &str, path: &str) -> reqwest::Result<reqwest::Response> {
        self.http
            .post(format!("{}/{}", self.base, endpoint))
            .json(&PathRequest { path })
            .send()
            .await?
            .error_for_status()
    }

    /// List the immediate children of `path`. `path = ""` lists the
    /// service root.
    pub async fn list(&self, path: &str) -> Result<Listing> {
        tracing::trace!(%path, "requesting listing");
        let response = self
            .post_json("files", path)
            .await
            .map_err(|e| AppError::List {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let listing = response.json::<Listing>().await.map_err(|e| AppError::List {
            path: path.to_string(),
            reason: format!("malformed listing: {}", e),
        })?;

        tracing::debug!(
            %path,
            folders = listing.folders.len(),
            entries = listing.entries.len(),
            "listing received"
        );
        Ok(listing)
    }

    /// Ask the server to open `path`. The payload is opaque; only success
    /// vs. failure matters to the caller.
    pub async fn open(&self, path: &str) -> Result<serde_json::Value> {
        tracing::trace!(%path, "requesting open");
        let response = self
            .post_json("open", path)
            .await
            .map_err(|e| AppError::Open {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let payload = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| AppError::Open {
                path: path.to_string(),
                reason: format!("malformed response: {}", e),
            })?;

        tracing::debug!(%path, %payload, "open result");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = RemoteClient::new("http://localhost:8000/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn url_without_trailing_slash_kept() {
        let client = RemoteClient::new("http://localhost:8000", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn invalid_url_rejected() {
        let err = RemoteClient::new("not a url", None).unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl(_)));
    }

    #[test]
    fn timeout_accepted() {
        let client = RemoteClient::new("http://localhost:8000", Some(Duration::from_secs(5)));
        assert!(client.is_ok());
    }
}
