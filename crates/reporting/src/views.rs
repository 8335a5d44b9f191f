//! View models handed to document renderers.

use crate::classify::{CampaignType, Category};
use campaign_core::exports::AdRecord;
use campaign_core::EntityId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TitleText {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SitelinkView {
    pub title: String,
    pub description: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignView {
    pub id: EntityId,
    pub name: String,
    pub category: Category,
    pub campaign_type: CampaignType,
    pub project_id: Option<EntityId>,
    pub ads: Vec<AdRecord>,
    pub title_texts: Vec<TitleText>,
    pub callouts: Vec<String>,
    /// Sorted, unique.
    pub landing_pages: Vec<String>,
    pub sitelinks: Vec<SitelinkView>,
    pub sitelink_titles: Vec<String>,
    pub sitelink_descriptions: Vec<String>,
}

impl CampaignView {
    pub fn is_keyword_driven(&self) -> bool {
        self.campaign_type == CampaignType::KeywordDriven
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectGroup {
    /// `None` is the bucket for campaigns without a project.
    pub project_id: Option<EntityId>,
    pub campaigns: Vec<CampaignView>,
}
