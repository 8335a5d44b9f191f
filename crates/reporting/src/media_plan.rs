//! Media-plan rows for keyword-driven campaigns, numbered in grouped order.

use crate::classify::Category;
use crate::context::AggregationContext;
use crate::views::{ProjectGroup, SitelinkView, TitleText};
use campaign_core::config::AggregationConfig;
use campaign_core::exports::ExportBundle;
use campaign_core::EntityId;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize)]
pub struct MediaPlanEntry {
    pub group_number: u32,
    pub campaign_id: EntityId,
    pub campaign_name: String,
    pub category: Category,
    pub project_id: Option<EntityId>,
    pub keywords: Vec<String>,
    pub negative_keywords: Vec<String>,
    pub landing_pages: Vec<String>,
    pub ad_group_names: Vec<String>,
    pub title_texts: Vec<TitleText>,
    pub callouts: Vec<String>,
    pub sitelinks: Vec<SitelinkView>,
}

/// Keyword texts for a campaign in forecast order. Quotes are stripped and
/// rows mentioning the autotargeting sentinel are skipped.
pub fn campaign_keywords(campaign_id: &EntityId, bundle: &ExportBundle, sentinel: &str) -> Vec<String> {
    bundle
        .keywords
        .iter()
        .filter(|row| row.campaign_id.as_ref() == Some(campaign_id))
        .filter_map(|row| row.keyword.as_deref())
        .filter(|kw| !kw.contains(sentinel))
        .map(|kw| kw.replace('"', "").trim().to_string())
        .filter(|kw| !kw.is_empty())
        .collect()
}

pub fn ad_group_names(campaign_id: &EntityId, bundle: &ExportBundle) -> Vec<String> {
    bundle
        .ad_groups
        .iter()
        .filter(|g| g.campaign_id.as_ref() == Some(campaign_id))
        .filter_map(|g| g.name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn build_media_plan(
    groups: &[ProjectGroup],
    bundle: &ExportBundle,
    config: &AggregationConfig,
    ctx: &mut AggregationContext,
) -> Vec<MediaPlanEntry> {
    let mut entries = Vec::new();
    for campaign in groups.iter().flat_map(|g| g.campaigns.iter()) {
        if !campaign.is_keyword_driven() {
            continue;
        }
        let negative_keywords = bundle
            .campaigns
            .iter()
            .find(|c| c.id.as_ref() == Some(&campaign.id))
            .map(|c| c.negative_keywords().to_vec())
            .unwrap_or_default();

        entries.push(MediaPlanEntry {
            group_number: ctx.group_number_for(&campaign.id),
            campaign_id: campaign.id.clone(),
            campaign_name: campaign.name.clone(),
            category: campaign.category,
            project_id: campaign.project_id.clone(),
            keywords: campaign_keywords(&campaign.id, bundle, &config.autotargeting_keyword),
            negative_keywords,
            landing_pages: campaign.landing_pages.clone(),
            ad_group_names: ad_group_names(&campaign.id, bundle),
            title_texts: campaign.title_texts.clone(),
            callouts: campaign.callouts.clone(),
            sitelinks: campaign.sitelinks.clone(),
        });
    }
    entries
}
