//! Joins and order-preserving deduplication over one campaign's ads.
//!
//! Every function degrades to an empty result on unmatched ids.

use crate::views::{SitelinkView, TitleText};
use campaign_core::exports::{
    AdRecord, ExtensionRecord, SitelinkIndex, SitelinkRecord, SitelinkSetRecord,
};
use campaign_core::EntityId;
use std::collections::{BTreeSet, HashSet};

pub fn join_ads<'a>(campaign_id: &EntityId, ads: &'a [AdRecord]) -> Vec<&'a AdRecord> {
    ads.iter().filter(|ad| ad.belongs_to(campaign_id)).collect()
}

/// Unique (title, text) pairs in first-seen order. Ads missing either field
/// are skipped.
pub fn dedupe_title_text(ads: &[&AdRecord]) -> Vec<TitleText> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for ad in ads {
        let Some(text_ad) = &ad.text_ad else { continue };
        let (Some(title), Some(text)) = (&text_ad.title, &text_ad.text) else {
            continue;
        };
        let pair = TitleText {
            title: title.clone(),
            text: text.clone(),
        };
        if seen.insert(pair.clone()) {
            out.push(pair);
        }
    }
    out
}

/// Callout texts referenced by the campaign's ads, in extensions-file order.
pub fn dedupe_callouts(
    campaign_id: &EntityId,
    extensions: &[ExtensionRecord],
    ads: &[AdRecord],
) -> Vec<String> {
    let referenced: HashSet<&EntityId> = join_ads(campaign_id, ads)
        .into_iter()
        .filter_map(|ad| ad.text_ad.as_ref())
        .flat_map(|t| t.callout_ids())
        .collect();
    callouts_in_file_order(&referenced, extensions)
}

pub(crate) fn callouts_in_file_order(
    referenced: &HashSet<&EntityId>,
    extensions: &[ExtensionRecord],
) -> Vec<String> {
    if referenced.is_empty() {
        return Vec::new();
    }
    let mut seen = HashSet::new();
    extensions
        .iter()
        .filter(|ext| ext.id.as_ref().is_some_and(|id| referenced.contains(id)))
        .filter_map(|ext| ext.callout_text())
        .filter(|text| seen.insert(*text))
        .map(str::to_string)
        .collect()
}

/// Sitelink sets referenced by the ads, in ad order, resolved by the set's own
/// `Id`. Unresolved references are skipped.
fn referenced_sets<'a>(
    campaign_ads: &'a [&AdRecord],
    sitelinks: &'a SitelinkIndex,
) -> impl Iterator<Item = &'a SitelinkSetRecord> + 'a {
    campaign_ads
        .iter()
        .filter_map(|ad| ad.text_ad.as_ref())
        .filter_map(|t| t.sitelink_set_id.as_ref())
        .filter_map(|set_id| sitelinks.find_set(set_id))
}

/// Sitelinks of every set the campaign's ads reference, in ad order, unique
/// by (title, description, href). A sitelink missing any of the three is
/// dropped.
pub fn dedupe_sitelinks(
    campaign_id: &EntityId,
    sitelinks: &SitelinkIndex,
    ads: &[AdRecord],
) -> Vec<SitelinkView> {
    let campaign_ads = join_ads(campaign_id, ads);
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for set in referenced_sets(&campaign_ads, sitelinks) {
        for link in &set.sitelinks {
            let Some(view) = complete_sitelink(link) else {
                continue;
            };
            if seen.insert(view.clone()) {
                out.push(view);
            }
        }
    }
    out
}

fn complete_sitelink(link: &SitelinkRecord) -> Option<SitelinkView> {
    Some(SitelinkView {
        title: link.title.clone()?,
        description: link.description.clone()?,
        href: link.href.clone()?,
    })
}

/// Sitelink titles and descriptions, each deduplicated on its own, in ad
/// order. Unlike [`dedupe_sitelinks`] a partial sitelink still contributes
/// whichever fields it has.
pub fn sitelink_fields(
    campaign_ads: &[&AdRecord],
    sitelinks: &SitelinkIndex,
) -> (Vec<String>, Vec<String>) {
    let mut titles: Vec<String> = Vec::new();
    let mut descriptions: Vec<String> = Vec::new();
    for set in referenced_sets(campaign_ads, sitelinks) {
        for link in &set.sitelinks {
            if let Some(title) = &link.title {
                if !titles.contains(title) {
                    titles.push(title.clone());
                }
            }
            if let Some(description) = &link.description {
                if !descriptions.contains(description) {
                    descriptions.push(description.clone());
                }
            }
        }
    }
    (titles, descriptions)
}

/// Distinct landing URLs, sorted.
pub fn landing_pages(campaign_ads: &[&AdRecord]) -> Vec<String> {
    campaign_ads
        .iter()
        .filter_map(|ad| ad.href())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
