//! Optional album enrichment from the downstream albums service.
//!
//! Enrichment is best effort: any transport failure or non-success
//! status is logged and reported as "no albums", never as a request
//! failure.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::domain::{Album, UserId};

/// HTTP client for `GET {base_url}/albums?userId={id}`.
#[derive(Debug, Clone)]
pub struct AlbumsClient {
    http: reqwest::Client,
    base_url: String,
}

impl AlbumsClient {
    /// Builds a client sending JSON `Accept`/`Content-Type` headers and
    /// bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`reqwest::Error`] if the client cannot be
    /// constructed (e.g. TLS backend initialisation failure).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the albums of `user_id`, or `None` when the albums service
    /// is unreachable or answers with an error status.
    pub async fn albums_for(&self, user_id: UserId) -> Option<Vec<Album>> {
        let url = format!("{}/albums?userId={user_id}", self.base_url);
        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%user_id, error = %err, "albums service unreachable");
                return None;
            }
        };

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            tracing::warn!(%user_id, %status, "albums service returned an error status");
            return None;
        }

        match response.json::<Vec<Album>>().await {
            Ok(albums) => Some(albums),
            Err(err) => {
                tracing::warn!(%user_id, error = %err, "albums response could not be decoded");
                None
            }
        }
    }
}
