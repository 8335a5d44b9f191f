//! Image creatives: associated images from the hash report and unique
//! image-bearing ads per campaign.

use crate::views::CampaignView;
use campaign_cache::ImageLookup;
use campaign_core::exports::AdImageRecord;
use campaign_core::EntityId;
use serde::Serialize;
use std::collections::HashSet;

const ASSOCIATED: &str = "YES";

#[derive(Debug, Clone, Serialize)]
pub struct ImageAsset {
    pub hash: String,
    pub name: String,
    pub url: Option<String>,
}

/// Images marked as associated with at least one ad, unique by hash.
pub fn unique_associated_images(images: &[AdImageRecord]) -> Vec<ImageAsset> {
    let mut seen = HashSet::new();
    images
        .iter()
        .filter(|img| img.associated.as_deref() == Some(ASSOCIATED))
        .filter_map(|img| {
            let hash = img.ad_image_hash.as_ref()?;
            seen.insert(hash.clone()).then(|| ImageAsset {
                hash: hash.clone(),
                name: img.name.clone().unwrap_or_default(),
                url: img.original_url.clone(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkCreative {
    pub campaign_id: EntityId,
    pub ad_id: Option<EntityId>,
    pub title: String,
    pub text: String,
    pub image_hash: String,
    pub image_url: Option<String>,
}

/// Ads carrying an image hash, unique by (title, text, hash).
pub fn unique_network_creatives(campaign: &CampaignView, lookup: &ImageLookup) -> Vec<NetworkCreative> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for ad in &campaign.ads {
        let text_ad = ad.text_ad.as_ref();
        let Some(hash) = text_ad
            .and_then(|t| t.ad_image_hash.clone())
            .or_else(|| ad.image_ad.as_ref().and_then(|i| i.ad_image_hash.clone()))
        else {
            continue;
        };
        let title = text_ad.and_then(|t| t.title.clone()).unwrap_or_default();
        let text = text_ad.and_then(|t| t.text.clone()).unwrap_or_default();
        if !seen.insert((title.clone(), text.clone(), hash.clone())) {
            continue;
        }
        out.push(NetworkCreative {
            campaign_id: campaign.id.clone(),
            ad_id: ad.id.clone(),
            image_url: lookup.url_for(&hash).map(str::to_string),
            title,
            text,
            image_hash: hash,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::CampaignAggregator;
    use campaign_core::config::AggregationConfig;
    use campaign_core::exports::{list_at, ExportBundle, ExportKind};
    use serde_json::{json, Value};

    #[test]
    fn test_associated_images_unique_by_hash() {
        let images: Vec<AdImageRecord> = list_at(
            &json!({ "result": { "AdImages": [
                { "AdImageHash": "a", "Associated": "YES", "OriginalUrl": "https://i/a" },
                { "AdImageHash": "b", "Associated": "NO" },
                { "AdImageHash": "a", "Associated": "YES", "OriginalUrl": "https://i/a2" },
                { "Associated": "YES" }
            ]}}),
            &["result", "AdImages"],
        );
        let assets = unique_associated_images(&images);
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].url.as_deref(), Some("https://i/a"));
    }

    #[test]
    fn test_network_creatives_dedupe_and_resolve() {
        let bundle = ExportBundle::from_documents(1, |kind| -> Option<Value> {
            match kind {
                ExportKind::Campaigns => Some(json!({ "result": { "Campaigns": [{ "Id": 1, "Name": "РСЯ" }] } })),
                ExportKind::Ads => Some(json!({ "result": { "Ads": [
                    { "Id": 1, "CampaignId": 1, "TextAd": { "Title": "T", "Text": "x", "AdImageHash": "h1" } },
                    { "Id": 2, "CampaignId": 1, "TextAd": { "Title": "T", "Text": "x", "AdImageHash": "h1" } },
                    { "Id": 3, "CampaignId": 1, "TextAd": { "Title": "T", "Text": "x", "AdImageHash": "h2" } },
                    { "Id": 4, "CampaignId": 1, "TextAd": { "Title": "No image", "Text": "x" } }
                ]}})),
                ExportKind::ImageHashes => Some(json!({ "result": { "AdImages": [
                    { "AdImageHash": "h1", "OriginalUrl": "https://i/h1" }
                ]}})),
                _ => None,
            }
        });
        let config = AggregationConfig::default();
        let views = CampaignAggregator::new(&config).campaign_views(&bundle);
        let lookup = ImageLookup::from_records(&bundle.images);
        let creatives = unique_network_creatives(&views[0], &lookup);
        assert_eq!(creatives.len(), 2);
        assert_eq!(creatives[0].image_url.as_deref(), Some("https://i/h1"));
        assert_eq!(creatives[1].image_url, None);
    }
}
