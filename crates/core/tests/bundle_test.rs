//! Shape resolution across a whole report's documents.

use campaign_core::exports::{ExportBundle, ExportKind};
use campaign_core::EntityId;
use serde_json::{json, Value};
use std::collections::HashMap;

fn documents() -> HashMap<ExportKind, Value> {
    let mut docs = HashMap::new();
    docs.insert(
        ExportKind::Campaigns,
        json!({ "result": { "Campaigns": [
            { "Id": 1, "Name": "Sofas | РСЯ", "NegativeKeywords": { "Items": ["free"] } },
            { "Id": "2", "Name": null }
        ]}}),
    );
    docs.insert(
        ExportKind::Ads,
        json!({ "ads": [
            { "Id": 10, "CampaignId": "1", "AdGroupId": 5, "TextAd": { "SitelinkSetId": "900" } },
            { "Id": 11, "CampaignId": 2, "AdGroupId": 6 }
        ]}),
    );
    docs.insert(
        ExportKind::Sitelinks,
        json!({ "result": { "SitelinksSets": [{ "Id": 900, "Sitelinks": [{ "Title": "Prices" }] }] } }),
    );
    docs.insert(
        ExportKind::StatsSummary,
        json!({ "result": { "summary": { "Clicks": "12", "Cost": 3.5 } } }),
    );
    docs.insert(
        ExportKind::Request,
        json!({ "campaigns": [{ "id": "1", "project_id": 4 }], "deleted_groups": [6] }),
    );
    docs
}

#[test]
fn test_bundle_from_mixed_shapes() {
    let mut docs = documents();
    let mut bundle = ExportBundle::from_documents(12, |kind| docs.remove(&kind));

    assert_eq!(bundle.report_id, 12);
    assert_eq!(bundle.campaigns.len(), 2);
    assert_eq!(bundle.campaigns[0].negative_keywords(), ["free".to_string()]);
    assert_eq!(bundle.campaigns[1].name(), "");

    assert_eq!(bundle.exclude_deleted_groups(), 1);
    let ad = &bundle.ads[0];
    assert!(ad.belongs_to(&EntityId::from(1u64)));
    let set_id = ad.text_ad.as_ref().and_then(|t| t.sitelink_set_id.clone()).unwrap();
    assert!(bundle.sitelinks.find_set(&set_id).is_some());

    let summary = bundle.stats_summary.as_ref().unwrap();
    assert_eq!(summary.clicks, 12);
    assert_eq!(
        bundle.request.project_for(&EntityId::from(1u64)),
        Some(&EntityId::from(4u64))
    );
    assert!(bundle.ad_stats.is_empty());
}
