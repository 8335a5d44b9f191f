//! Campaign aggregation and report assembly: classification, joins and
//! deduplication over raw exports, project grouping, media plan, statistics,
//! top ads, ad cards, and the sequential report pipeline.

pub mod aggregator;
pub mod cards;
pub mod classify;
pub mod context;
pub mod creatives;
pub mod dedupe;
pub mod grouping;
pub mod media_plan;
pub mod pipeline;
pub mod stats;
pub mod store;
pub mod top_ads;
pub mod views;

pub use aggregator::CampaignAggregator;
pub use cards::{AdCard, BrowserSession, CardRenderer};
pub use classify::{CampaignType, Category, Classifier};
pub use context::AggregationContext;
pub use pipeline::{ReportBundle, ReportOutcome, ReportPipeline, ReportStatus};
pub use store::{load_bundle, ExportSource, FsExportSource};
pub use top_ads::{top_ads_by_clicks, top_ads_by_clicks_from, BounceThreshold, TopAds};
pub use views::{CampaignView, ProjectGroup};
