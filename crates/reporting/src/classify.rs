//! Campaign classification: placement category from the campaign name and
//! targeting type from the keyword forecast.

use campaign_core::config::AggregationConfig;
use campaign_core::exports::{CampaignRecord, KeywordRow};
use campaign_core::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Network,
    Search,
    Unclassified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignType {
    KeywordDriven,
    InterestDriven,
}

pub struct Classifier {
    network_marker: String,
    search_marker: String,
    keyword_campaigns: HashSet<EntityId>,
}

impl Classifier {
    /// A campaign is keyword-driven when any forecast row for it carries a
    /// keyword other than the autotargeting sentinel (exact comparison).
    pub fn new(config: &AggregationConfig, keywords: &[KeywordRow]) -> Self {
        let keyword_campaigns = keywords
            .iter()
            .filter(|row| row.keyword.as_deref() != Some(config.autotargeting_keyword.as_str()))
            .filter_map(|row| row.campaign_id.clone())
            .collect();

        Self {
            network_marker: config.network_marker.to_lowercase(),
            search_marker: config.search_marker.to_lowercase(),
            keyword_campaigns,
        }
    }

    /// Network marker is checked first; a name carrying both is network.
    pub fn category(&self, name: &str) -> Category {
        let name = name.to_lowercase();
        if !self.network_marker.is_empty() && name.contains(&self.network_marker) {
            Category::Network
        } else if !self.search_marker.is_empty() && name.contains(&self.search_marker) {
            Category::Search
        } else {
            Category::Unclassified
        }
    }

    pub fn campaign_type(&self, campaign_id: &EntityId) -> CampaignType {
        if self.keyword_campaigns.contains(campaign_id) {
            CampaignType::KeywordDriven
        } else {
            CampaignType::InterestDriven
        }
    }

    pub fn classify(&self, campaign: &CampaignRecord) -> (Category, CampaignType) {
        let category = self.category(campaign.name());
        let campaign_type = campaign
            .id
            .as_ref()
            .map(|id| self.campaign_type(id))
            .unwrap_or(CampaignType::InterestDriven);
        (category, campaign_type)
    }
}
