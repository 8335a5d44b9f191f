//! Sequential report pipeline: one report at a time, from raw exports to a
//! JSON view bundle plus rendered ad cards on disk.

use crate::aggregator::CampaignAggregator;
use crate::cards::{build_ad_card, render_card, AdCard, BrowserSession, CardRenderer};
use crate::context::AggregationContext;
use crate::creatives::{unique_associated_images, unique_network_creatives, ImageAsset, NetworkCreative};
use crate::media_plan::{build_media_plan, MediaPlanEntry};
use crate::stats::{campaign_statistics, report_totals, CampaignStatsView, ReportTotals};
use crate::store::{load_bundle, ExportSource};
use crate::top_ads::{enrich_top_ads, top_ads_by_clicks, BounceThreshold, TopAdView};
use crate::views::ProjectGroup;
use campaign_cache::{ImageFetcher, ImageLookup, ImageSource};
use campaign_core::{AppConfig, ReportError, ReportResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use uuid::Uuid;

pub const BUNDLE_FILE: &str = "report_bundle.json";

// ─── Output types ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RenderedCardInfo {
    pub card: AdCard,
    pub renderer: CardRenderer,
    pub file: String,
    pub image_fetched: bool,
}

/// Everything downstream document renderers consume for one report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportBundle {
    pub report_id: u64,
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub projects: Vec<ProjectGroup>,
    pub media_plan: Vec<MediaPlanEntry>,
    pub campaign_stats: Vec<CampaignStatsView>,
    pub totals: ReportTotals,
    pub bounce_threshold: BounceThreshold,
    pub top_ads: Vec<TopAdView>,
    pub associated_images: Vec<ImageAsset>,
    pub network_creatives: Vec<NetworkCreative>,
    pub ad_cards: Vec<RenderedCardInfo>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportStatus {
    Completed {
        output_dir: String,
        campaigns: usize,
        cards: usize,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub report_id: u64,
    #[serde(flatten)]
    pub status: ReportStatus,
}

impl ReportOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self.status, ReportStatus::Completed { .. })
    }
}

// ─── Pipeline ───────────────────────────────────────────────────────────────

pub struct ReportPipeline<S, I> {
    config: AppConfig,
    exports: S,
    fetcher: ImageFetcher<I>,
    browser: Option<Box<dyn BrowserSession>>,
}

impl<S: ExportSource, I: ImageSource> ReportPipeline<S, I> {
    pub fn new(config: AppConfig, exports: S, fetcher: ImageFetcher<I>) -> Self {
        Self {
            config,
            exports,
            fetcher,
            browser: None,
        }
    }

    pub fn with_browser(mut self, browser: Box<dyn BrowserSession>) -> Self {
        self.browser = Some(browser);
        self
    }

    fn output_dir(&self, report_id: u64) -> PathBuf {
        PathBuf::from(&self.config.storage.output_dir).join(report_id.to_string())
    }

    /// Aggregate one report and render its cards into `output_dir`.
    pub fn build_report(
        &mut self,
        report_id: u64,
        ctx: &mut AggregationContext,
        output_dir: &Path,
    ) -> ReportResult<ReportBundle> {
        let bundle = load_bundle(&self.exports, report_id)?;
        let aggregation = &self.config.aggregation;

        let projects = CampaignAggregator::new(aggregation).aggregate(&bundle);
        let media_plan = build_media_plan(&projects, &bundle, aggregation, ctx);
        let campaign_stats = campaign_statistics(&projects, &bundle.campaign_stats, &bundle.adgroup_stats);
        let totals = report_totals(bundle.stats_summary.as_ref(), &bundle.campaign_stats);

        let top = top_ads_by_clicks(&bundle.ad_stats, aggregation.top_ads_count);
        info!(
            report_id = report_id,
            threshold = ?top.threshold,
            bounce_limit = ?top.threshold.limit(),
            selected = top.rows.len(),
            "Top ads selected"
        );
        let top_ads = enrich_top_ads(
            &top.rows,
            &bundle.campaigns,
            &bundle.ads,
            &aggregation.unknown_campaign_name,
        );

        let lookup = ImageLookup::from_records(&bundle.images);
        let associated_images = unique_associated_images(&bundle.images);
        let network_creatives: Vec<NetworkCreative> = projects
            .iter()
            .flat_map(|g| g.campaigns.iter())
            .flat_map(|c| unique_network_creatives(c, &lookup))
            .collect();

        fs::create_dir_all(output_dir)?;
        let mut ad_cards = Vec::new();
        for ad_id in top.rows.iter().filter_map(|r| r.ad_id.as_ref()) {
            let card = build_ad_card(ad_id, &bundle, &lookup, self.config.render.max_sitelinks);
            let creative = card
                .image_url
                .as_deref()
                .and_then(|url| self.fetcher.fetch(url, &ctx.images));
            let browser: Option<&mut dyn BrowserSession> = match &mut self.browser {
                Some(session) => Some(session.as_mut()),
                None => None,
            };
            let rendered = render_card(&card, creative.as_deref(), browser, &self.config.render)?;
            let file = format!("{ad_id}.png");
            fs::write(output_dir.join(&file), &rendered.png)?;
            ad_cards.push(RenderedCardInfo {
                card,
                renderer: rendered.renderer,
                file,
                image_fetched: creative.is_some(),
            });
        }

        Ok(ReportBundle {
            report_id,
            run_id: ctx.run_id,
            generated_at: Utc::now(),
            projects,
            media_plan,
            campaign_stats,
            totals,
            bounce_threshold: top.threshold,
            top_ads,
            associated_images,
            network_creatives,
            ad_cards,
        })
    }

    /// Process one report end to end with a fresh context.
    pub fn process(&mut self, report_id: u64) -> ReportResult<ReportOutcome> {
        let mut ctx = AggregationContext::new(report_id, self.config.image_fetch.max_entries);
        let output_dir = self.output_dir(report_id);
        let report = self.build_report(report_id, &mut ctx, &output_dir)?;

        let json = serde_json::to_vec_pretty(&report)?;
        fs::write(output_dir.join(BUNDLE_FILE), json)
            .map_err(|e| ReportError::Storage(format!("{}: {e}", output_dir.display())))?;

        let campaigns: usize = report.projects.iter().map(|g| g.campaigns.len()).sum();
        info!(
            report_id = report_id,
            run_id = %ctx.run_id,
            campaigns = campaigns,
            cards = report.ad_cards.len(),
            cached_images = ctx.images.len(),
            cached_bytes = ctx.images.total_bytes(),
            keyword_groups = ctx.groups_assigned(),
            elapsed_ms = (Utc::now() - ctx.started_at).num_milliseconds(),
            "Report completed"
        );
        Ok(ReportOutcome {
            report_id,
            status: ReportStatus::Completed {
                output_dir: output_dir.display().to_string(),
                campaigns,
                cards: report.ad_cards.len(),
            },
        })
    }

    /// Process reports in order. A failing report is logged and recorded;
    /// the loop moves on.
    pub fn run(&mut self, report_ids: &[u64]) -> Vec<ReportOutcome> {
        let mut outcomes = Vec::with_capacity(report_ids.len());
        for &report_id in report_ids {
            match self.process(report_id) {
                Ok(outcome) => {
                    metrics::counter!("reports.completed").increment(1);
                    outcomes.push(outcome);
                }
                Err(e) => {
                    metrics::counter!("reports.failed").increment(1);
                    error!(
                        report_id = report_id,
                        structural = e.is_structural(),
                        transient = e.is_transient(),
                        error = %e,
                        "Report failed"
                    );
                    outcomes.push(ReportOutcome {
                        report_id,
                        status: ReportStatus::Failed {
                            error: e.to_string(),
                        },
                    });
                }
            }
        }
        outcomes
    }
}
