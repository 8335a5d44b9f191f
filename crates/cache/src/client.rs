//! HTTP image fetching with bounded retries.
//! Two-step lookup: ImageStore first, then the network source.

use crate::local::ImageStore;
use bytes::Bytes;
use campaign_core::config::ImageFetchConfig;
use campaign_core::{ReportError, ReportResult};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Anything that can turn a URL into image bytes.
pub trait ImageSource {
    fn fetch(&self, url: &str) -> ReportResult<Bytes>;
}

/// Blocking reqwest source. Only `200 OK` counts as success.
pub struct HttpImageSource {
    client: reqwest::blocking::Client,
}

impl HttpImageSource {
    pub fn new(config: &ImageFetchConfig) -> ReportResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| ReportError::Fetch(format!("http client: {e}")))?;

        info!(timeout_secs = config.timeout_secs, "Image HTTP client ready");
        Ok(Self { client })
    }
}

impl ImageSource for HttpImageSource {
    fn fetch(&self, url: &str) -> ReportResult<Bytes> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ReportError::Fetch(format!("{url}: {e}")))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ReportError::Fetch(format!("{url}: status {}", status.as_u16())));
        }
        response
            .bytes()
            .map_err(|e| ReportError::Fetch(format!("{url}: body: {e}")))
    }
}

/// Retrying fetcher in front of an [`ImageSource`].
pub struct ImageFetcher<S> {
    source: S,
    max_retries: u32,
    retry_delay: Duration,
}

impl<S: ImageSource> ImageFetcher<S> {
    pub fn new(source: S, config: &ImageFetchConfig) -> Self {
        Self {
            source,
            max_retries: config.max_retries.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Bytes for `url`, served from `store` when cached. After the retry
    /// budget is spent the result is `None`, never an error.
    pub fn fetch(&self, url: &str, store: &ImageStore) -> Option<Bytes> {
        if url.is_empty() {
            return None;
        }
        if let Some(bytes) = store.get(url) {
            debug!(url = url, "Image served from cache");
            return Some(bytes);
        }

        for attempt in 1..=self.max_retries {
            match self.source.fetch(url) {
                Ok(bytes) => {
                    store.put(url, bytes.clone());
                    metrics::counter!("image.fetch.success").increment(1);
                    return Some(bytes);
                }
                Err(e) => {
                    metrics::counter!("image.fetch.failure").increment(1);
                    warn!(url = url, attempt = attempt, error = %e, "Image fetch failed");
                    if attempt < self.max_retries && !self.retry_delay.is_zero() {
                        std::thread::sleep(self.retry_delay);
                    }
                }
            }
        }

        metrics::counter!("image.fetch.exhausted").increment(1);
        warn!(url = url, attempts = self.max_retries, "Giving up on image");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    struct ScriptedSource {
        responses: RefCell<VecDeque<ReportResult<Bytes>>>,
        calls: Cell<usize>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<ReportResult<Bytes>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                calls: Cell::new(0),
            }
        }
    }

    impl ImageSource for ScriptedSource {
        fn fetch(&self, _url: &str) -> ReportResult<Bytes> {
            self.calls.set(self.calls.get() + 1);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ReportError::Fetch("script exhausted".into())))
        }
    }

    fn fetcher(responses: Vec<ReportResult<Bytes>>) -> ImageFetcher<ScriptedSource> {
        ImageFetcher::new(ScriptedSource::new(responses), &ImageFetchConfig::default())
            .with_retry_delay(Duration::ZERO)
    }

    #[test]
    fn test_succeeds_after_transient_failures() {
        let f = fetcher(vec![
            Err(ReportError::Fetch("503".into())),
            Err(ReportError::Fetch("timeout".into())),
            Ok(Bytes::from_static(b"img")),
        ]);
        let store = ImageStore::new(16);
        assert_eq!(f.fetch("https://a/1.png", &store).unwrap(), Bytes::from_static(b"img"));
        assert_eq!(f.source.calls.get(), 3);
        assert!(store.contains("https://a/1.png"));
    }

    #[test]
    fn test_exhausted_retries_yield_none() {
        let f = fetcher(vec![]);
        let store = ImageStore::new(16);
        assert!(f.fetch("https://a/2.png", &store).is_none());
        assert_eq!(f.source.calls.get(), 3);
        assert!(store.is_empty());
    }

    #[test]
    fn test_cached_url_skips_network() {
        let f = fetcher(vec![Ok(Bytes::from_static(b"once"))]);
        let store = ImageStore::new(16);
        f.fetch("https://a/3.png", &store);
        f.fetch("https://a/3.png", &store);
        assert_eq!(f.source.calls.get(), 1);
    }

    #[test]
    fn test_empty_url_is_not_fetched() {
        let f = fetcher(vec![Ok(Bytes::from_static(b"x"))]);
        assert!(f.fetch("", &ImageStore::new(1)).is_none());
        assert_eq!(f.source.calls.get(), 0);
    }
}
