//! Statistics views: per-campaign rows joined onto the grouped campaign
//! list, and report totals.

use crate::views::ProjectGroup;
use campaign_core::exports::{AdGroupStatRow, CampaignStatRow, StatsSummary};
use campaign_core::EntityId;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metrics {
    pub impressions: u64,
    pub clicks: u64,
    pub ctr: f64,
    pub bounce_rate: f64,
    pub cost: f64,
    pub avg_cpc: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdGroupStatsView {
    pub ad_group_id: Option<EntityId>,
    pub ad_group_name: String,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignStatsView {
    pub campaign_id: EntityId,
    pub campaign_name: String,
    /// False when the statistics export had no row for this campaign.
    pub has_data: bool,
    pub metrics: Metrics,
    pub ad_groups: Vec<AdGroupStatsView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportTotals {
    pub from_summary: bool,
    pub metrics: Metrics,
}

fn campaign_metrics(row: &CampaignStatRow) -> Metrics {
    Metrics {
        impressions: row.impressions,
        clicks: row.clicks,
        ctr: row.ctr,
        bounce_rate: row.bounce_rate,
        cost: row.cost,
        avg_cpc: row.avg_cpc,
    }
}

/// One entry per grouped campaign, in grouped order.
pub fn campaign_statistics(
    groups: &[ProjectGroup],
    campaign_rows: &[CampaignStatRow],
    adgroup_rows: &[AdGroupStatRow],
) -> Vec<CampaignStatsView> {
    groups
        .iter()
        .flat_map(|g| g.campaigns.iter())
        .map(|campaign| {
            let row = campaign_rows
                .iter()
                .find(|r| r.campaign_id.as_ref() == Some(&campaign.id));
            let ad_groups = adgroup_rows
                .iter()
                .filter(|r| r.campaign_id.as_ref() == Some(&campaign.id))
                .map(|r| AdGroupStatsView {
                    ad_group_id: r.ad_group_id.clone(),
                    ad_group_name: r.ad_group_name.clone().unwrap_or_default(),
                    metrics: Metrics {
                        impressions: r.impressions,
                        clicks: r.clicks,
                        ctr: r.ctr,
                        bounce_rate: r.bounce_rate,
                        cost: r.cost,
                        avg_cpc: r.avg_cpc,
                    },
                })
                .collect();

            CampaignStatsView {
                campaign_id: campaign.id.clone(),
                campaign_name: campaign.name.clone(),
                has_data: row.is_some(),
                metrics: row.map(campaign_metrics).unwrap_or_default(),
                ad_groups,
            }
        })
        .collect()
}

/// Totals from the summary document when present, otherwise summed over
/// campaign rows with a click-weighted bounce rate.
pub fn report_totals(summary: Option<&StatsSummary>, campaign_rows: &[CampaignStatRow]) -> ReportTotals {
    if let Some(s) = summary {
        return ReportTotals {
            from_summary: true,
            metrics: Metrics {
                impressions: s.impressions,
                clicks: s.clicks,
                ctr: s.ctr,
                bounce_rate: s.bounce_rate,
                cost: s.cost,
                avg_cpc: s.avg_cpc,
            },
        };
    }

    let impressions: u64 = campaign_rows.iter().map(|r| r.impressions).sum();
    let clicks: u64 = campaign_rows.iter().map(|r| r.clicks).sum();
    let cost: f64 = campaign_rows.iter().map(|r| r.cost).sum();
    let weighted_bounce: f64 = campaign_rows
        .iter()
        .map(|r| r.bounce_rate * r.clicks as f64)
        .sum();

    let ratio = |num: f64, den: u64| if den > 0 { num / den as f64 } else { 0.0 };
    ReportTotals {
        from_summary: false,
        metrics: Metrics {
            impressions,
            clicks,
            ctr: ratio(clicks as f64 * 100.0, impressions),
            bounce_rate: ratio(weighted_bounce, clicks),
            cost,
            avg_cpc: ratio(cost, clicks),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::exports::list_at;
    use serde_json::json;

    fn rows() -> Vec<CampaignStatRow> {
        list_at(
            &json!({ "result": { "rows": [
                { "CampaignId": 1, "Impressions": 1000, "Clicks": 30, "BounceRate": 20.0, "Cost": 300.0 },
                { "CampaignId": 2, "Impressions": 1000, "Clicks": 10, "BounceRate": 60.0, "Cost": 100.0 }
            ]}}),
            &["result", "rows"],
        )
    }

    #[test]
    fn test_fallback_totals_weight_bounce_by_clicks() {
        let totals = report_totals(None, &rows());
        assert!(!totals.from_summary);
        assert_eq!(totals.metrics.clicks, 40);
        assert!((totals.metrics.bounce_rate - 30.0).abs() < 1e-9);
        assert!((totals.metrics.ctr - 2.0).abs() < 1e-9);
        assert!((totals.metrics.avg_cpc - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_wins() {
        let summary = StatsSummary {
            clicks: 99,
            ..Default::default()
        };
        let totals = report_totals(Some(&summary), &rows());
        assert!(totals.from_summary);
        assert_eq!(totals.metrics.clicks, 99);
    }

    #[test]
    fn test_no_rows_no_division_by_zero() {
        let totals = report_totals(None, &[]);
        assert_eq!(totals.metrics, Metrics::default());
    }
}
