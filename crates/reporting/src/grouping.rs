//! Project grouping: numeric project ids ascending, then non-numeric ids,
//! then the unassigned bucket. Network campaigns precede search campaigns
//! inside each project.

use crate::classify::Category;
use crate::views::{CampaignView, ProjectGroup};
use campaign_core::exports::RequestRecord;
use campaign_core::EntityId;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum ProjectKey {
    Numeric(u64),
    Named(String),
    Unassigned,
}

impl ProjectKey {
    fn of(project_id: Option<&EntityId>) -> Self {
        match project_id {
            None => ProjectKey::Unassigned,
            Some(id) => match id.as_number() {
                Some(n) => ProjectKey::Numeric(n),
                None => ProjectKey::Named(id.as_str().to_string()),
            },
        }
    }
}

/// Unclassified campaigns are left out of the grouping.
pub fn group_by_project(campaigns: Vec<CampaignView>, mapping: &RequestRecord) -> Vec<ProjectGroup> {
    let mut buckets: BTreeMap<ProjectKey, ProjectGroup> = BTreeMap::new();

    for mut campaign in campaigns {
        if campaign.category == Category::Unclassified {
            debug!(campaign_id = %campaign.id, name = %campaign.name, "Skipping unclassified campaign");
            continue;
        }
        let project_id = mapping.project_for(&campaign.id).cloned();
        campaign.project_id = project_id.clone();
        buckets
            .entry(ProjectKey::of(project_id.as_ref()))
            .or_insert_with(|| ProjectGroup {
                project_id,
                campaigns: Vec::new(),
            })
            .campaigns
            .push(campaign);
    }

    buckets
        .into_values()
        .map(|mut group| {
            let (network, search): (Vec<_>, Vec<_>) = group
                .campaigns
                .into_iter()
                .partition(|c| c.category == Category::Network);
            group.campaigns = network.into_iter().chain(search).collect();
            group
        })
        .collect()
}
