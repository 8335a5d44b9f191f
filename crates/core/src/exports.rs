//! Raw advertising-platform exports and their shape resolution.
//!
//! Every export is third-party JSON with inconsistent nesting. Documents are
//! walked with `get`-style access at each level and list elements are
//! deserialised one by one, so a malformed element is dropped instead of
//! failing the document.

use crate::ids::{lenient_id, EntityId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

// ─── Export kinds ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    Campaigns,
    Ads,
    Extensions,
    Sitelinks,
    KeywordForecast,
    AdGroups,
    AdStats,
    CampaignStats,
    AdGroupStats,
    StatsSummary,
    ImageHashes,
    Request,
}

impl ExportKind {
    pub const ALL: [ExportKind; 12] = [
        ExportKind::Campaigns,
        ExportKind::Ads,
        ExportKind::Extensions,
        ExportKind::Sitelinks,
        ExportKind::KeywordForecast,
        ExportKind::AdGroups,
        ExportKind::AdStats,
        ExportKind::CampaignStats,
        ExportKind::AdGroupStats,
        ExportKind::StatsSummary,
        ExportKind::ImageHashes,
        ExportKind::Request,
    ];

    pub fn file_name(&self, report_id: u64) -> String {
        match self {
            ExportKind::Campaigns => "campaigns.json".to_string(),
            ExportKind::Ads => format!("ads_report_{report_id}.json"),
            ExportKind::Extensions => format!("extensions_{report_id}.json"),
            ExportKind::Sitelinks => format!("sitelinks_{report_id}.json"),
            ExportKind::KeywordForecast => format!("keywords_traffic_forecast_{report_id}.json"),
            ExportKind::AdGroups => format!("adgroups_{report_id}.json"),
            ExportKind::AdStats => format!("ad_stats_{report_id}.json"),
            ExportKind::CampaignStats => format!("campaign_stats_{report_id}.json"),
            ExportKind::AdGroupStats => format!("adgroup_stats_{report_id}.json"),
            ExportKind::StatsSummary => format!("campaign_stats_summary_{report_id}.json"),
            ExportKind::ImageHashes => format!("image_hashes_report_{report_id}.json"),
            ExportKind::Request => "request.json".to_string(),
        }
    }

    /// Only the campaigns export is structurally required.
    pub fn is_required(&self) -> bool {
        matches!(self, ExportKind::Campaigns)
    }
}

// ─── Lenient field helpers ──────────────────────────────────────────────────

/// Non-empty text, or `None`. Numbers are accepted and stringified.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(number_of).unwrap_or(0.0))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let n = value.as_ref().map(number_of).unwrap_or(0.0);
    Ok(if n.is_finite() && n > 0.0 { n as u64 } else { 0 })
}

fn number_of(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn lenient_nested<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(parse_elements).unwrap_or_default())
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.is_empty() => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Walk `path` through nested objects; `None` at the first missing level.
pub fn value_at<'a>(doc: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(doc, |node, key| node.get(key))
}

/// Deserialise each element of an array independently, dropping failures.
pub fn parse_elements<T: DeserializeOwned>(value: &Value) -> Vec<T> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    let mut parsed = Vec::with_capacity(items.len());
    let mut skipped = 0usize;
    for item in items {
        match T::deserialize(item) {
            Ok(v) => parsed.push(v),
            Err(_) => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(skipped = skipped, kept = parsed.len(), "Dropped malformed export elements");
    }
    parsed
}

pub fn list_at<T: DeserializeOwned>(doc: &Value, path: &[&str]) -> Vec<T> {
    value_at(doc, path).map(parse_elements).unwrap_or_default()
}

// ─── Campaigns ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CampaignRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_nested")]
    pub negative_keywords: Option<NegativeKeywords>,
}

impl CampaignRecord {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn negative_keywords(&self) -> &[String] {
        self.negative_keywords
            .as_ref()
            .map(|n| n.items.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NegativeKeywords {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub items: Vec<String>,
}

// ─── Ads ────────────────────────────────────────────────────────────────────

pub const EXTENSION_TYPE_CALLOUT: &str = "CALLOUT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub campaign_id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub ad_group_id: Option<EntityId>,
    #[serde(rename = "Type", default, deserialize_with = "lenient_text")]
    pub ad_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_nested")]
    pub text_ad: Option<TextAdCreative>,
    #[serde(default, deserialize_with = "lenient_nested")]
    pub image_ad: Option<ImageAdCreative>,
}

impl AdRecord {
    pub fn belongs_to(&self, campaign_id: &EntityId) -> bool {
        self.campaign_id.as_ref() == Some(campaign_id)
    }

    /// Landing URL: text creative first, then image creative.
    pub fn href(&self) -> Option<&str> {
        self.text_ad
            .as_ref()
            .and_then(|t| t.href.as_deref())
            .or_else(|| self.image_ad.as_ref().and_then(|i| i.href.as_deref()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TextAdCreative {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title2: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub href: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub display_url_path: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub ad_image_hash: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub sitelink_set_id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub ad_extensions: Vec<AdExtensionRef>,
}

impl TextAdCreative {
    /// Callout extension ids referenced by this creative, in reference order.
    pub fn callout_ids(&self) -> impl Iterator<Item = &EntityId> {
        self.ad_extensions
            .iter()
            .filter(|e| e.ext_type.as_deref() == Some(EXTENSION_TYPE_CALLOUT))
            .filter_map(|e| e.ad_extension_id.as_ref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageAdCreative {
    #[serde(default, deserialize_with = "lenient_text")]
    pub href: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub ad_image_hash: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdExtensionRef {
    #[serde(default, deserialize_with = "lenient_id")]
    pub ad_extension_id: Option<EntityId>,
    #[serde(rename = "Type", default, deserialize_with = "lenient_text")]
    pub ext_type: Option<String>,
}

// ─── Extensions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExtensionRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<EntityId>,
    #[serde(rename = "Type", default, deserialize_with = "lenient_text")]
    pub ext_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_nested")]
    pub callout: Option<Callout>,
}

impl ExtensionRecord {
    pub fn callout_text(&self) -> Option<&str> {
        if self.ext_type.as_deref() != Some(EXTENSION_TYPE_CALLOUT) {
            return None;
        }
        self.callout.as_ref().and_then(|c| c.callout_text.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Callout {
    #[serde(default, deserialize_with = "lenient_text")]
    pub callout_text: Option<String>,
}

/// Extensions arrive either as a direct `result` document or wrapped in
/// `batch_N` objects. Batches are read in file order.
pub fn extensions_from_document(doc: &Value) -> Vec<ExtensionRecord> {
    if doc.get("result").is_some() {
        return list_at(doc, &["result", "AdExtensions"]);
    }
    let Some(batches) = doc.as_object() else {
        return Vec::new();
    };
    batches
        .values()
        .flat_map(|batch| list_at::<ExtensionRecord>(batch, &["result", "AdExtensions"]))
        .collect()
}

// ─── Sitelinks ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SitelinkSetRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub sitelinks: Vec<SitelinkRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SitelinkRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub href: Option<String>,
}

/// Sitelink sets grouped the way the export stored them. A keyed export
/// yields one bucket per top-level sitelink-set id; a direct export yields a
/// single unkeyed bucket.
#[derive(Debug, Clone, Default)]
pub struct SitelinkIndex {
    pub buckets: Vec<SitelinkBucket>,
}

#[derive(Debug, Clone, Default)]
pub struct SitelinkBucket {
    pub key: Option<EntityId>,
    pub sets: Vec<SitelinkSetRecord>,
}

impl SitelinkIndex {
    pub fn from_document(doc: &Value) -> Self {
        if doc.get("result").is_some() {
            return Self {
                buckets: vec![SitelinkBucket {
                    key: None,
                    sets: list_at(doc, &["result", "SitelinksSets"]),
                }],
            };
        }
        let buckets = doc
            .as_object()
            .map(|map| {
                map.iter()
                    .filter(|(_, v)| v.is_object())
                    .map(|(key, v)| SitelinkBucket {
                        key: Some(EntityId::new(key.as_str())),
                        sets: list_at(v, &["result", "SitelinksSets"]),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { buckets }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| b.sets.is_empty())
    }

    /// Resolve a sitelink-set id: the bucket keyed by that id wins, otherwise
    /// any set carrying that `Id`.
    pub fn find_set(&self, set_id: &EntityId) -> Option<&SitelinkSetRecord> {
        let keyed = self
            .buckets
            .iter()
            .filter(|b| b.key.as_ref() == Some(set_id))
            .flat_map(|b| b.sets.iter())
            .find(|s| s.id.as_ref() == Some(set_id));
        keyed.or_else(|| {
            self.buckets
                .iter()
                .flat_map(|b| b.sets.iter())
                .find(|s| s.id.as_ref() == Some(set_id))
        })
    }
}

// ─── Keywords and ad groups ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeywordRow {
    #[serde(default, deserialize_with = "lenient_id")]
    pub campaign_id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdGroupRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub campaign_id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
}

// ─── Statistics ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdStatRow {
    #[serde(default, deserialize_with = "lenient_id")]
    pub ad_id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub campaign_id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub clicks: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub impressions: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ctr: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bounce_rate: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cost: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_cpc: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CampaignStatRow {
    #[serde(default, deserialize_with = "lenient_id")]
    pub campaign_id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub campaign_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub impressions: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub clicks: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ctr: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bounce_rate: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cost: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_cpc: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdGroupStatRow {
    #[serde(default, deserialize_with = "lenient_id")]
    pub ad_group_id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub ad_group_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub campaign_id: Option<EntityId>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub impressions: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub clicks: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ctr: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bounce_rate: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cost: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_cpc: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatsSummary {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub impressions: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub clicks: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ctr: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bounce_rate: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cost: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_cpc: f64,
}

impl StatsSummary {
    pub fn from_document(doc: &Value) -> Option<Self> {
        value_at(doc, &["summary"])
            .or_else(|| value_at(doc, &["result", "summary"]))
            .filter(|v| v.is_object())
            .and_then(|v| Self::deserialize(v).ok())
    }
}

// ─── Images ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdImageRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub ad_image_hash: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub preview_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub original_url: Option<String>,
    #[serde(rename = "Type", default, deserialize_with = "lenient_text")]
    pub image_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub associated: Option<String>,
}

// ─── Request record ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectAssignment {
    pub campaign_id: EntityId,
    pub project_id: Option<EntityId>,
}

/// Campaign → project mapping and deleted ad groups supplied with the
/// report request.
#[derive(Debug, Clone, Default)]
pub struct RequestRecord {
    pub assignments: Vec<ProjectAssignment>,
    pub deleted_groups: Vec<EntityId>,
}

impl RequestRecord {
    pub fn from_value(doc: &Value) -> Self {
        let campaigns = match doc {
            Value::Array(_) => Some(doc),
            Value::Object(_) => doc.get("campaigns"),
            _ => None,
        };
        let assignments = campaigns
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(parse_assignment).collect())
            .unwrap_or_default();

        let deleted_groups = doc
            .get("deleted_groups")
            .map(parse_deleted_groups)
            .unwrap_or_default();

        Self {
            assignments,
            deleted_groups,
        }
    }

    /// Project for a campaign; `None` when unmapped or mapped to nothing.
    pub fn project_for(&self, campaign_id: &EntityId) -> Option<&EntityId> {
        self.assignments
            .iter()
            .find(|a| &a.campaign_id == campaign_id)
            .and_then(|a| a.project_id.as_ref())
    }
}

fn parse_assignment(item: &Value) -> Option<ProjectAssignment> {
    let campaign_id = item
        .get("id")
        .or_else(|| item.get("Id"))
        .and_then(EntityId::from_value)?;
    let project_id = item.get("project_id").and_then(EntityId::from_value);
    Some(ProjectAssignment {
        campaign_id,
        project_id,
    })
}

/// `deleted_groups` is `{campaign_id: [group ids]}`, a bare list, or a JSON
/// string holding either.
fn parse_deleted_groups(value: &Value) -> Vec<EntityId> {
    match value {
        Value::String(raw) => serde_json::from_str::<Value>(raw)
            .ok()
            .filter(|inner| !inner.is_string())
            .map(|inner| parse_deleted_groups(&inner))
            .unwrap_or_default(),
        Value::Object(map) => map
            .values()
            .filter_map(Value::as_array)
            .flatten()
            .filter_map(EntityId::from_value)
            .collect(),
        Value::Array(items) => items.iter().filter_map(EntityId::from_value).collect(),
        _ => Vec::new(),
    }
}

// ─── Bundle ─────────────────────────────────────────────────────────────────

/// Every export of one report, parsed and shape-resolved.
#[derive(Debug, Clone, Default)]
pub struct ExportBundle {
    pub report_id: u64,
    pub campaigns: Vec<CampaignRecord>,
    pub ads: Vec<AdRecord>,
    pub extensions: Vec<ExtensionRecord>,
    pub sitelinks: SitelinkIndex,
    pub keywords: Vec<KeywordRow>,
    pub ad_groups: Vec<AdGroupRecord>,
    pub ad_stats: Vec<AdStatRow>,
    pub campaign_stats: Vec<CampaignStatRow>,
    pub adgroup_stats: Vec<AdGroupStatRow>,
    pub stats_summary: Option<StatsSummary>,
    pub images: Vec<AdImageRecord>,
    pub request: RequestRecord,
}

impl ExportBundle {
    /// Build a bundle from loaded documents. `fetch` returns the raw document
    /// for a kind, or `None` when it is absent.
    pub fn from_documents<F>(report_id: u64, mut fetch: F) -> Self
    where
        F: FnMut(ExportKind) -> Option<Value>,
    {
        let mut bundle = ExportBundle {
            report_id,
            ..Default::default()
        };
        for kind in ExportKind::ALL {
            let Some(doc) = fetch(kind) else {
                continue;
            };
            bundle.apply(kind, &doc);
        }
        bundle
    }

    fn apply(&mut self, kind: ExportKind, doc: &Value) {
        match kind {
            ExportKind::Campaigns => self.campaigns = list_at(doc, &["result", "Campaigns"]),
            ExportKind::Ads => {
                self.ads = if value_at(doc, &["result", "Ads"]).is_some() {
                    list_at(doc, &["result", "Ads"])
                } else {
                    list_at(doc, &["ads"])
                }
            }
            ExportKind::Extensions => self.extensions = extensions_from_document(doc),
            ExportKind::Sitelinks => self.sitelinks = SitelinkIndex::from_document(doc),
            ExportKind::KeywordForecast => self.keywords = list_at(doc, &["result", "Keywords"]),
            ExportKind::AdGroups => self.ad_groups = list_at(doc, &["result", "AdGroups"]),
            ExportKind::AdStats => self.ad_stats = list_at(doc, &["result", "rows"]),
            ExportKind::CampaignStats => self.campaign_stats = list_at(doc, &["result", "rows"]),
            ExportKind::AdGroupStats => self.adgroup_stats = list_at(doc, &["result", "rows"]),
            ExportKind::StatsSummary => self.stats_summary = StatsSummary::from_document(doc),
            ExportKind::ImageHashes => self.images = list_at(doc, &["result", "AdImages"]),
            ExportKind::Request => self.request = RequestRecord::from_value(doc),
        }
    }

    /// Drop ads belonging to ad groups the request marked as deleted.
    /// Returns the number of ads removed.
    pub fn exclude_deleted_groups(&mut self) -> usize {
        if self.request.deleted_groups.is_empty() {
            return 0;
        }
        let before = self.ads.len();
        let deleted = &self.request.deleted_groups;
        self.ads.retain(|ad| {
            ad.ad_group_id
                .as_ref()
                .map_or(true, |group| !deleted.contains(group))
        });
        before - self.ads.len()
    }
}
