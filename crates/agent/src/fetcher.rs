//! One-shot sensor reads.

use std::sync::Arc;
use std::time::Duration;

use soilwatch_core::error::FetchError;
use soilwatch_core::reading::Reading;

use crate::source::DataSource;

/// Default upper bound on a single read.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Reads named values from a [`DataSource`] and turns them into [`Reading`]s.
///
/// Every call to [`fetch`](Self::fetch) performs exactly one read. Nothing
/// is cached and failed reads are not retried.
#[derive(Clone)]
pub struct ReadingFetcher {
    source: Arc<dyn DataSource>,
    namespace: String,
    timeout: Duration,
}

impl ReadingFetcher {
    pub fn new(source: Arc<dyn DataSource>, namespace: impl Into<String>, timeout: Duration) -> Self {
        Self {
            source,
            namespace: namespace.into(),
            timeout,
        }
    }

    /// Fetch the value stored at `{namespace}/{key}`.
    ///
    /// An empty `key` names no value and is reported as
    /// [`FetchError::NotFound`] without touching the source.
    pub async fn fetch(&self, key: &str) -> Result<Reading, FetchError> {
        let path = format!("{}/{key}", self.namespace);
        if key.is_empty() {
            return Err(FetchError::NotFound { path });
        }

        let raw = match tokio::time::timeout(self.timeout, self.source.read_once(&self.namespace, key))
            .await
        {
            Ok(Ok(Some(raw))) => raw,
            Ok(Ok(None)) => return Err(FetchError::NotFound { path }),
            Ok(Err(e)) => return Err(FetchError::TransportError(e.to_string())),
            Err(_) => return Err(FetchError::Timeout(self.timeout)),
        };

        let reading = Reading::from_raw(key, &path, &raw)?;
        tracing::debug!(path = %path, value = reading.value, "Reading fetched");
        Ok(reading)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;
    use crate::source::SourceError;

    /// Source holding a single optional value and counting reads.
    struct StaticSource {
        value: Option<Value>,
        reads: AtomicUsize,
    }

    impl StaticSource {
        fn new(value: Option<Value>) -> Arc<Self> {
            Arc::new(Self {
                value,
                reads: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl DataSource for StaticSource {
        async fn read_once(&self, _namespace: &str, _key: &str) -> Result<Option<Value>, SourceError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.value.clone())
        }
    }

    struct SilentSource;

    #[async_trait]
    impl DataSource for SilentSource {
        async fn read_once(&self, _namespace: &str, _key: &str) -> Result<Option<Value>, SourceError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn numeric_value_yields_reading() {
        let source = StaticSource::new(Some(json!("42.5")));
        let fetcher = ReadingFetcher::new(source.clone(), "sensor", DEFAULT_FETCH_TIMEOUT);

        let reading = fetcher.fetch("moisture").await.unwrap();

        assert_eq!(reading.value, 42.5);
        assert_eq!(reading.name, "moisture");
        assert_eq!(source.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_numeric_value_is_parse_error() {
        let fetcher = ReadingFetcher::new(
            StaticSource::new(Some(json!("N/A"))),
            "sensor",
            DEFAULT_FETCH_TIMEOUT,
        );
        assert_matches!(
            fetcher.fetch("moisture").await,
            Err(FetchError::ParseError { .. })
        );
    }

    #[tokio::test]
    async fn absent_value_is_not_found() {
        let fetcher = ReadingFetcher::new(StaticSource::new(None), "sensor", DEFAULT_FETCH_TIMEOUT);
        assert_matches!(
            fetcher.fetch("moisture").await,
            Err(FetchError::NotFound { path }) if path == "sensor/moisture"
        );
    }

    #[tokio::test]
    async fn empty_key_never_reads() {
        let source = StaticSource::new(Some(json!(10)));
        let fetcher = ReadingFetcher::new(source.clone(), "sensor", DEFAULT_FETCH_TIMEOUT);

        assert_matches!(fetcher.fetch("").await, Err(FetchError::NotFound { .. }));
        assert_eq!(source.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn each_fetch_reads_again() {
        let source = StaticSource::new(Some(json!(10)));
        let fetcher = ReadingFetcher::new(source.clone(), "sensor", DEFAULT_FETCH_TIMEOUT);

        fetcher.fetch("moisture").await.unwrap();
        fetcher.fetch("moisture").await.unwrap();

        assert_eq!(source.reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unresponsive_source_times_out() {
        let timeout = Duration::from_millis(50);
        let fetcher = ReadingFetcher::new(Arc::new(SilentSource), "sensor", timeout);
        assert_matches!(
            fetcher.fetch("moisture").await,
            Err(FetchError::Timeout(t)) if t == timeout
        );
    }
}
