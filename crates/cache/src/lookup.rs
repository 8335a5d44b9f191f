//! Image hash → source URL resolution from the image-hash report.

use campaign_core::exports::AdImageRecord;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ImageLookup {
    urls: HashMap<String, Option<String>>,
}

impl ImageLookup {
    /// First record per hash wins, even when it carries no URL.
    pub fn from_records(records: &[AdImageRecord]) -> Self {
        let mut urls = HashMap::with_capacity(records.len());
        for record in records {
            if let Some(hash) = &record.ad_image_hash {
                urls.entry(hash.clone())
                    .or_insert_with(|| record.original_url.clone());
            }
        }
        Self { urls }
    }

    pub fn url_for(&self, hash: &str) -> Option<&str> {
        self.urls.get(hash).and_then(|u| u.as_deref())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::exports::list_at;
    use serde_json::json;

    #[test]
    fn test_first_match_wins() {
        let doc = json!({ "result": { "AdImages": [
            { "AdImageHash": "h1", "OriginalUrl": "https://img/first" },
            { "AdImageHash": "h1", "OriginalUrl": "https://img/second" },
            { "AdImageHash": "h2" },
            { "OriginalUrl": "https://img/orphan" }
        ]}});
        let records: Vec<AdImageRecord> = list_at(&doc, &["result", "AdImages"]);
        let lookup = ImageLookup::from_records(&records);
        assert_eq!(lookup.url_for("h1"), Some("https://img/first"));
        assert_eq!(lookup.url_for("h2"), None);
        assert_eq!(lookup.url_for("missing"), None);
        assert_eq!(lookup.len(), 2);
    }
}
