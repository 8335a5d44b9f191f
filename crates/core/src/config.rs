use crate::error::{ReportError, ReportResult};
use serde::Deserialize;

/// Root pipeline configuration. Loaded from environment variables
/// with the prefix `REPORT_PIPELINE__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default)]
    pub image_fetch: ImageFetchConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_exports_root")]
    pub exports_root: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregationConfig {
    #[serde(default = "default_top_ads_count")]
    pub top_ads_count: usize,
    /// Case-insensitive campaign-name marker for network placements.
    #[serde(default = "default_network_marker")]
    pub network_marker: String,
    /// Case-insensitive campaign-name marker for search placements.
    #[serde(default = "default_search_marker")]
    pub search_marker: String,
    #[serde(default = "default_autotargeting_keyword")]
    pub autotargeting_keyword: String,
    #[serde(default = "default_unknown_campaign_name")]
    pub unknown_campaign_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageFetchConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_card_width")]
    pub card_width: u32,
    #[serde(default = "default_card_height")]
    pub card_height: u32,
    #[serde(default = "default_max_sitelinks")]
    pub max_sitelinks: usize,
}

// Default functions
fn default_exports_root() -> String {
    "./data_yandex_direct".to_string()
}
fn default_output_dir() -> String {
    "./report_results".to_string()
}
fn default_top_ads_count() -> usize {
    10
}
fn default_network_marker() -> String {
    "рся".to_string()
}
fn default_search_marker() -> String {
    "поиск".to_string()
}
fn default_autotargeting_keyword() -> String {
    "---autotargeting".to_string()
}
fn default_unknown_campaign_name() -> String {
    "Unknown campaign".to_string()
}
fn default_max_retries() -> u32 {
    3
}
fn default_retry_delay_ms() -> u64 {
    2000
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_max_entries() -> usize {
    10_000
}
fn default_user_agent() -> String {
    "report-pipeline/0.1".to_string()
}
fn default_card_width() -> u32 {
    300
}
fn default_card_height() -> u32 {
    600
}
fn default_max_sitelinks() -> usize {
    4
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            exports_root: default_exports_root(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            top_ads_count: default_top_ads_count(),
            network_marker: default_network_marker(),
            search_marker: default_search_marker(),
            autotargeting_keyword: default_autotargeting_keyword(),
            unknown_campaign_name: default_unknown_campaign_name(),
        }
    }
}

impl Default for ImageFetchConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            timeout_secs: default_timeout_secs(),
            max_entries: default_max_entries(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            card_width: default_card_width(),
            card_height: default_card_height(),
            max_sitelinks: default_max_sitelinks(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            aggregation: AggregationConfig::default(),
            image_fetch: ImageFetchConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> ReportResult<Self> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("REPORT_PIPELINE")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(|built| built.try_deserialize())
            .map_err(|e| ReportError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reporting_constants() {
        let config = AppConfig::default();
        assert_eq!(config.aggregation.top_ads_count, 10);
        assert_eq!(config.aggregation.autotargeting_keyword, "---autotargeting");
        assert_eq!(config.image_fetch.max_retries, 3);
        assert_eq!(config.image_fetch.retry_delay_ms, 2000);
        assert_eq!(config.render.max_sitelinks, 4);
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let raw = serde_json::json!({ "aggregation": { "top_ads_count": 5 } });
        let config: AppConfig = serde_json::from_value(raw).unwrap();
        assert_eq!(config.aggregation.top_ads_count, 5);
        assert_eq!(config.aggregation.network_marker, "рся");
        assert_eq!(config.storage.output_dir, "./report_results");
    }

    #[test]
    fn test_unparseable_env_is_config_error() {
        std::env::set_var("REPORT_PIPELINE__AGGREGATION__TOP_ADS_COUNT", "many");
        let result = AppConfig::load();
        std::env::remove_var("REPORT_PIPELINE__AGGREGATION__TOP_ADS_COUNT");
        assert!(matches!(result, Err(ReportError::Config(_))));
    }
}
