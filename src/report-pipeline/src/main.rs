//! Report Pipeline: builds ad-contract report bundles from platform exports.
//!
//! Entry point: loads configuration, applies CLI overrides and processes the
//! requested reports one after another.

use anyhow::Context;
use campaign_cache::{HttpImageSource, ImageFetcher};
use campaign_core::config::AppConfig;
use campaign_reporting::{FsExportSource, ReportPipeline};
use clap::Parser;
use std::path::Path;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "report-pipeline")]
#[command(about = "Aggregates advertising exports into per-report view bundles")]
#[command(version)]
struct Cli {
    /// Report ids to process; every `<id>_results` directory when omitted
    #[arg(long = "report-id")]
    report_ids: Vec<u64>,

    /// Root directory holding `<id>_results` export folders (overrides config)
    #[arg(long, env = "REPORT_PIPELINE__STORAGE__EXPORTS_ROOT")]
    exports_root: Option<String>,

    /// Directory receiving report bundles (overrides config)
    #[arg(long, env = "REPORT_PIPELINE__STORAGE__OUTPUT_DIR")]
    output_dir: Option<String>,

    /// Number of top ads to render (overrides config)
    #[arg(long, env = "REPORT_PIPELINE__AGGREGATION__TOP_ADS_COUNT")]
    top_ads: Option<usize>,
}

/// Report ids found under the exports root, ascending.
fn discover_reports(root: &Path) -> anyhow::Result<Vec<u64>> {
    let mut ids: Vec<u64> = std::fs::read_dir(root)
        .with_context(|| format!("reading exports root {}", root.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| {
            entry
                .file_name()
                .to_str()
                .and_then(|name| name.strip_suffix("_results"))
                .and_then(|id| id.parse().ok())
        })
        .collect();
    ids.sort_unstable();
    Ok(ids)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "report_pipeline=info,campaign_reporting=info,campaign_cache=info".into()
            }),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Report pipeline starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(root) = cli.exports_root {
        config.storage.exports_root = root;
    }
    if let Some(dir) = cli.output_dir {
        config.storage.output_dir = dir;
    }
    if let Some(n) = cli.top_ads {
        config.aggregation.top_ads_count = n;
    }

    info!(
        exports_root = %config.storage.exports_root,
        output_dir = %config.storage.output_dir,
        top_ads = config.aggregation.top_ads_count,
        "Configuration loaded"
    );

    let report_ids = if cli.report_ids.is_empty() {
        discover_reports(Path::new(&config.storage.exports_root))?
    } else {
        cli.report_ids
    };
    if report_ids.is_empty() {
        warn!("No reports to process");
        return Ok(());
    }

    let source = HttpImageSource::new(&config.image_fetch)?;
    let fetcher = ImageFetcher::new(source, &config.image_fetch);
    let exports = FsExportSource::new(&config.storage.exports_root);
    let mut pipeline = ReportPipeline::new(config, exports, fetcher);

    let outcomes = pipeline.run(&report_ids);
    let completed = outcomes.iter().filter(|o| o.is_completed()).count();
    info!(
        reports = outcomes.len(),
        completed = completed,
        failed = outcomes.len() - completed,
        "Report pipeline finished"
    );
    println!("{}", serde_json::to_string_pretty(&outcomes)?);

    Ok(())
}
