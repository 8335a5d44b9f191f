//! Top-N ads by clicks with adaptive bounce-rate relaxation.

use campaign_core::exports::{AdRecord, AdStatRow, CampaignRecord};
use campaign_core::EntityId;
use serde::Serialize;
use tracing::debug;

pub const STRICT_BOUNCE_LIMIT: f64 = 35.0;
pub const RELAXED_BOUNCE_LIMIT: f64 = 50.0;

/// Which bounce-rate filter produced the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BounceThreshold {
    Strict,
    Relaxed,
    Unfiltered,
}

impl BounceThreshold {
    pub fn limit(&self) -> Option<f64> {
        match self {
            BounceThreshold::Strict => Some(STRICT_BOUNCE_LIMIT),
            BounceThreshold::Relaxed => Some(RELAXED_BOUNCE_LIMIT),
            BounceThreshold::Unfiltered => None,
        }
    }

    fn relaxed(&self) -> Option<BounceThreshold> {
        match self {
            BounceThreshold::Strict => Some(BounceThreshold::Relaxed),
            BounceThreshold::Relaxed => Some(BounceThreshold::Unfiltered),
            BounceThreshold::Unfiltered => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TopAds {
    pub threshold: BounceThreshold,
    pub rows: Vec<AdStatRow>,
}

/// Rows whose bounce rate is at or below the threshold's limit.
fn within(rows: &[AdStatRow], threshold: BounceThreshold) -> Vec<&AdStatRow> {
    match threshold.limit() {
        Some(limit) => rows.iter().filter(|r| r.bounce_rate <= limit).collect(),
        None => rows.iter().collect(),
    }
}

/// Top ads starting from the strict 35% bounce-rate filter.
///
/// See [`top_ads_by_clicks_from`].
pub fn top_ads_by_clicks(rows: &[AdStatRow], top_n: usize) -> TopAds {
    top_ads_by_clicks_from(rows, top_n, BounceThreshold::Strict)
}

/// Filter at `start`, then step 35% → 50% → unfiltered while at most one row
/// is left. Then stable-sort by clicks descending and keep `top_n`.
pub fn top_ads_by_clicks_from(rows: &[AdStatRow], top_n: usize, start: BounceThreshold) -> TopAds {
    let mut threshold = start;
    let mut selected = within(rows, threshold);

    while selected.len() <= 1 {
        let Some(next) = threshold.relaxed() else { break };
        debug!(
            kept = selected.len(),
            from = ?threshold,
            to = ?next,
            "Relaxing bounce-rate filter"
        );
        threshold = next;
        selected = within(rows, threshold);
    }

    selected.sort_by(|a, b| b.clicks.cmp(&a.clicks));
    TopAds {
        threshold,
        rows: selected.into_iter().take(top_n).cloned().collect(),
    }
}

/// A top ad enriched with its campaign name and landing URL.
#[derive(Debug, Clone, Serialize)]
pub struct TopAdView {
    pub ad_id: Option<EntityId>,
    pub campaign_id: Option<EntityId>,
    pub campaign_name: String,
    pub href: String,
    pub clicks: u64,
    pub impressions: u64,
    pub ctr: f64,
    pub bounce_rate: f64,
    pub cost: f64,
    pub avg_cpc: f64,
}

pub fn enrich_top_ads(
    rows: &[AdStatRow],
    campaigns: &[CampaignRecord],
    ads: &[AdRecord],
    unknown_campaign_name: &str,
) -> Vec<TopAdView> {
    rows.iter()
        .map(|row| {
            let campaign_name = row
                .campaign_id
                .as_ref()
                .and_then(|cid| campaigns.iter().find(|c| c.id.as_ref() == Some(cid)))
                .and_then(|c| c.name.clone())
                .unwrap_or_else(|| unknown_campaign_name.to_string());
            let href = row
                .ad_id
                .as_ref()
                .and_then(|aid| ads.iter().find(|a| a.id.as_ref() == Some(aid)))
                .and_then(|a| a.href())
                .unwrap_or_default()
                .to_string();

            TopAdView {
                ad_id: row.ad_id.clone(),
                campaign_id: row.campaign_id.clone(),
                campaign_name,
                href,
                clicks: row.clicks,
                impressions: row.impressions,
                ctr: row.ctr,
                bounce_rate: row.bounce_rate,
                cost: row.cost,
                avg_cpc: row.avg_cpc,
            }
        })
        .collect()
}
