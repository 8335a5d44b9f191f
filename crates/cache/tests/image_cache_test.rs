//! End-to-end: resolve hashes through the lookup and fetch through one
//! shared store, the way a report run does.

use bytes::Bytes;
use campaign_cache::{ImageFetcher, ImageLookup, ImageSource, ImageStore};
use campaign_core::config::ImageFetchConfig;
use campaign_core::exports::{list_at, AdImageRecord};
use campaign_core::{ReportError, ReportResult};
use serde_json::json;
use std::cell::RefCell;
use std::time::Duration;

/// Serves fixed bytes for known URLs and fails everything else.
struct MapSource {
    hits: RefCell<Vec<String>>,
}

impl ImageSource for MapSource {
    fn fetch(&self, url: &str) -> ReportResult<Bytes> {
        self.hits.borrow_mut().push(url.to_string());
        if url.ends_with("/ok.png") {
            Ok(Bytes::from_static(b"\x89PNG"))
        } else {
            Err(ReportError::Fetch(format!("{url}: status 404")))
        }
    }
}

#[test]
fn test_lookup_and_fetch_across_a_run() {
    let doc = json!({ "result": { "AdImages": [
        { "AdImageHash": "good", "OriginalUrl": "https://cdn/ok.png", "Associated": "YES" },
        { "AdImageHash": "bad", "OriginalUrl": "https://cdn/gone.png", "Associated": "YES" }
    ]}});
    let records: Vec<AdImageRecord> = list_at(&doc, &["result", "AdImages"]);
    let lookup = ImageLookup::from_records(&records);

    let config = ImageFetchConfig {
        max_retries: 2,
        ..Default::default()
    };
    let fetcher = ImageFetcher::new(MapSource { hits: RefCell::new(Vec::new()) }, &config)
        .with_retry_delay(Duration::ZERO);
    let store = ImageStore::new(config.max_entries);

    for _ in 0..3 {
        let url = lookup.url_for("good").unwrap();
        assert!(fetcher.fetch(url, &store).is_some());
    }
    let bad = lookup.url_for("bad").unwrap();
    assert!(fetcher.fetch(bad, &store).is_none());

    assert_eq!(store.len(), 1);
}
