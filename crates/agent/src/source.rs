//! Read access to the realtime database the ESP32 writes into.
//!
//! [`DataSource`] is the only seam the fetcher depends on. The production
//! implementation, [`RealtimeDbSource`], talks to a Firebase-style
//! Realtime Database over its REST interface: every node is addressable as
//! `GET {base}/{path}.json`, and an absent node comes back as `null`.

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The underlying HTTP request failed (network, DNS, bad body, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The database returned a non-2xx status code.
    #[error("Database returned HTTP {0}")]
    HttpStatus(u16),

    /// The configured database URL cannot address child nodes.
    #[error("Invalid database URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

// ---------------------------------------------------------------------------
// DataSource
// ---------------------------------------------------------------------------

/// A hierarchical key-value store that can be read one value at a time.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Read the value at `{namespace}/{key}` once.
    ///
    /// Returns `Ok(None)` when nothing is stored there.
    async fn read_once(&self, namespace: &str, key: &str) -> Result<Option<Value>, SourceError>;
}

// ---------------------------------------------------------------------------
// RealtimeDbSource
// ---------------------------------------------------------------------------

/// REST client for a Realtime Database instance.
///
/// Cheap to share: construct once at startup and hand out `Arc`s.
pub struct RealtimeDbSource {
    client: reqwest::Client,
    base_url: Url,
    auth: Option<String>,
}

impl std::fmt::Debug for RealtimeDbSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeDbSource")
            .field("base_url", &self.base_url.as_str())
            .field("auth", &self.auth.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl RealtimeDbSource {
    /// * `base_url` - database root, e.g. `https://my-db.firebaseio.com`.
    /// * `auth`     - optional database secret or ID token, sent as `?auth=`.
    pub fn new(base_url: &str, auth: Option<String>) -> Result<Self, SourceError> {
        let invalid = |reason: String| SourceError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };
        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL".to_string()));
        }

        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: parsed,
            auth,
        })
    }

    /// `{base}/{namespace}/{key}.json`. The namespace may span several
    /// levels (`garden/bed-1`); the key is always a single node, so any
    /// `/`, `?` or `#` in it is percent-encoded rather than interpreted.
    fn node_url(&self, namespace: &str, key: &str) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SourceError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "not a hierarchical URL".to_string(),
            })?
            .pop_if_empty()
            .extend(namespace.split('/').filter(|segment| !segment.is_empty()))
            .push(&format!("{key}.json"));
        Ok(url)
    }
}

#[async_trait]
impl DataSource for RealtimeDbSource {
    async fn read_once(&self, namespace: &str, key: &str) -> Result<Option<Value>, SourceError> {
        let url = self.node_url(namespace, key)?;
        tracing::debug!(url = %url, "Reading realtime database node");

        let mut request = self.client.get(url);
        if let Some(auth) = &self.auth {
            request = request.query(&[("auth", auth)]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SourceError::HttpStatus(response.status().as_u16()));
        }

        match response.json::<Value>().await? {
            Value::Null => Ok(None),
            value => Ok(Some(value)),
        }
    }
}
