//! Campaign Aggregator: raw exports in, ordered project groups out.

use crate::classify::Classifier;
use crate::dedupe::{
    dedupe_callouts, dedupe_sitelinks, dedupe_title_text, join_ads, landing_pages, sitelink_fields,
};
use crate::grouping::group_by_project;
use crate::views::{CampaignView, ProjectGroup};
use campaign_core::config::AggregationConfig;
use campaign_core::exports::{CampaignRecord, ExportBundle};
use tracing::{debug, info};

pub struct CampaignAggregator<'a> {
    config: &'a AggregationConfig,
}

impl<'a> CampaignAggregator<'a> {
    pub fn new(config: &'a AggregationConfig) -> Self {
        Self { config }
    }

    /// Every campaign with a usable id, classified and enriched, in
    /// campaigns-export order.
    pub fn campaign_views(&self, bundle: &ExportBundle) -> Vec<CampaignView> {
        let classifier = Classifier::new(self.config, &bundle.keywords);
        bundle
            .campaigns
            .iter()
            .filter_map(|campaign| self.build_view(campaign, bundle, &classifier))
            .collect()
    }

    fn build_view(
        &self,
        campaign: &CampaignRecord,
        bundle: &ExportBundle,
        classifier: &Classifier,
    ) -> Option<CampaignView> {
        let Some(id) = campaign.id.clone() else {
            debug!(name = %campaign.name(), "Campaign without id skipped");
            return None;
        };
        let (category, campaign_type) = classifier.classify(campaign);
        let ads = join_ads(&id, &bundle.ads);
        let (sitelink_titles, sitelink_descriptions) = sitelink_fields(&ads, &bundle.sitelinks);

        Some(CampaignView {
            name: campaign.name().to_string(),
            category,
            campaign_type,
            project_id: bundle.request.project_for(&id).cloned(),
            title_texts: dedupe_title_text(&ads),
            callouts: dedupe_callouts(&id, &bundle.extensions, &bundle.ads),
            landing_pages: landing_pages(&ads),
            sitelinks: dedupe_sitelinks(&id, &bundle.sitelinks, &bundle.ads),
            sitelink_titles,
            sitelink_descriptions,
            ads: ads.into_iter().cloned().collect(),
            id,
        })
    }

    /// Ordered project groups ready for rendering.
    pub fn aggregate(&self, bundle: &ExportBundle) -> Vec<ProjectGroup> {
        let views = self.campaign_views(bundle);
        let total = views.len();
        let groups = group_by_project(views, &bundle.request);
        let grouped: usize = groups.iter().map(|g| g.campaigns.len()).sum();

        info!(
            report_id = bundle.report_id,
            campaigns = total,
            grouped = grouped,
            projects = groups.len(),
            "Campaigns aggregated"
        );
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{CampaignType, Category};
    use campaign_core::exports::ExportKind;
    use campaign_core::EntityId;
    use serde_json::{json, Value};

    fn bundle() -> ExportBundle {
        ExportBundle::from_documents(3, |kind| -> Option<Value> {
            match kind {
                ExportKind::Campaigns => Some(json!({ "result": { "Campaigns": [
                    { "Id": 1, "Name": "Sofas | Поиск" },
                    { "Id": 2, "Name": "Sofas | РСЯ" },
                    { "Name": "No id | РСЯ" },
                    { "Id": 4, "Name": "Brand" }
                ]}})),
                ExportKind::Ads => Some(json!({ "result": { "Ads": [
                    { "Id": 10, "CampaignId": 1, "TextAd": {
                        "Title": "Sofas", "Text": "Cheap sofas", "Href": "https://shop/sofas",
                        "AdExtensions": [{ "AdExtensionId": 900, "Type": "CALLOUT" }]
                    }},
                    { "Id": 11, "CampaignId": 2, "TextAd": { "Title": "Chairs", "Text": "Chairs" } }
                ]}})),
                ExportKind::Extensions => Some(json!({ "result": { "AdExtensions": [
                    { "Id": 900, "Type": "CALLOUT", "Callout": { "CalloutText": "Free delivery" } }
                ]}})),
                ExportKind::KeywordForecast => Some(json!({ "result": { "Keywords": [
                    { "CampaignId": 1, "Keyword": "sofa" }
                ]}})),
                ExportKind::Request => Some(json!({ "campaigns": [
                    { "id": 1, "project_id": 7 },
                    { "id": 2, "project_id": 7 }
                ]})),
                _ => None,
            }
        })
    }

    #[test]
    fn test_views_are_classified_and_enriched() {
        let config = AggregationConfig::default();
        let views = CampaignAggregator::new(&config).campaign_views(&bundle());
        assert_eq!(views.len(), 3);

        let search = &views[0];
        assert_eq!(search.category, Category::Search);
        assert_eq!(search.campaign_type, CampaignType::KeywordDriven);
        assert_eq!(search.callouts, vec!["Free delivery"]);
        assert_eq!(search.landing_pages, vec!["https://shop/sofas"]);
        assert_eq!(search.project_id, Some(EntityId::from(7u64)));

        assert_eq!(views[1].campaign_type, CampaignType::InterestDriven);
        assert_eq!(views[2].category, Category::Unclassified);
    }

    #[test]
    fn test_aggregate_orders_network_first() {
        let config = AggregationConfig::default();
        let groups = CampaignAggregator::new(&config).aggregate(&bundle());
        assert_eq!(groups.len(), 1);
        let order: Vec<_> = groups[0].campaigns.iter().map(|c| c.id.to_string()).collect();
        assert_eq!(order, vec!["2", "1"]);
    }

    #[test]
    fn test_empty_campaigns_export() {
        let config = AggregationConfig::default();
        let empty = ExportBundle::from_documents(1, |_| None);
        assert!(CampaignAggregator::new(&config).aggregate(&empty).is_empty());
    }
}
