//! Ad cards for the top-ads screenshots, and the render fallback policy.
//!
//! A card is first offered to a browser session; when there is none or it
//! fails, the raster fallback draws a fixed-size placeholder PNG.

use crate::dedupe::callouts_in_file_order;
use crate::views::SitelinkView;
use campaign_cache::ImageLookup;
use campaign_core::config::RenderConfig;
use campaign_core::exports::{AdRecord, ExportBundle};
use campaign_core::{EntityId, ReportError, ReportResult};
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgb, RgbImage};
use serde::Serialize;
use std::collections::HashSet;
use std::io::Cursor;
use tracing::{debug, warn};

// ─── Card model ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct AdCard {
    pub ad_id: EntityId,
    pub campaign_id: Option<EntityId>,
    pub display_text: String,
    pub body: String,
    pub display_url: String,
    pub href: String,
    pub sitelinks: Vec<SitelinkView>,
    pub callouts: Vec<String>,
    pub image_url: Option<String>,
}

fn display_text(ad_id: &EntityId, ad: Option<&AdRecord>) -> String {
    let text_ad = ad.and_then(|a| a.text_ad.as_ref());
    match text_ad.and_then(|t| t.title.as_deref()) {
        Some(title) => match text_ad.and_then(|t| t.title2.as_deref()) {
            Some(title2) => format!("{title} - {title2}"),
            None => title.to_string(),
        },
        None => {
            let ad_type = ad.and_then(|a| a.ad_type.as_deref()).unwrap_or("UNKNOWN");
            format!("Ad {ad_id} - {ad_type}")
        }
    }
}

/// Build the card for one ad. An id missing from the ads export still gets
/// a card with placeholder text.
pub fn build_ad_card(
    ad_id: &EntityId,
    bundle: &ExportBundle,
    lookup: &ImageLookup,
    max_sitelinks: usize,
) -> AdCard {
    let ad = bundle.ads.iter().find(|a| a.id.as_ref() == Some(ad_id));
    let text_ad = ad.and_then(|a| a.text_ad.as_ref());

    let sitelinks = text_ad
        .and_then(|t| t.sitelink_set_id.as_ref())
        .and_then(|set_id| bundle.sitelinks.find_set(set_id))
        .map(|set| {
            set.sitelinks
                .iter()
                .take(max_sitelinks)
                .map(|s| SitelinkView {
                    title: s.title.clone().unwrap_or_default(),
                    description: s.description.clone().unwrap_or_default(),
                    href: s.href.clone().unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default();

    let referenced: HashSet<&EntityId> = text_ad.map(|t| t.callout_ids().collect()).unwrap_or_default();
    let image_url = text_ad
        .and_then(|t| t.ad_image_hash.as_deref())
        .or_else(|| ad.and_then(|a| a.image_ad.as_ref()).and_then(|i| i.ad_image_hash.as_deref()))
        .and_then(|hash| lookup.url_for(hash))
        .map(str::to_string);

    AdCard {
        ad_id: ad_id.clone(),
        campaign_id: ad.and_then(|a| a.campaign_id.clone()),
        display_text: display_text(ad_id, ad),
        body: text_ad.and_then(|t| t.text.clone()).unwrap_or_default(),
        display_url: text_ad
            .and_then(|t| t.display_url_path.clone())
            .unwrap_or_default(),
        href: ad.and_then(|a| a.href()).unwrap_or_default().to_string(),
        sitelinks,
        callouts: callouts_in_file_order(&referenced, &bundle.extensions),
        image_url,
    }
}

// ─── HTML ───────────────────────────────────────────────────────────────────

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Self-contained HTML for a browser session.
pub fn card_html(card: &AdCard, config: &RenderConfig) -> String {
    let mut html = format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head>\
         <body style=\"margin:0;width:{}px;height:{}px;font-family:Arial,sans-serif\">\
         <div class=\"ad\">",
        config.card_width, config.card_height
    );
    if let Some(url) = &card.image_url {
        html.push_str(&format!("<img src=\"{}\" style=\"width:100%\">", escape_html(url)));
    }
    html.push_str(&format!("<h3>{}</h3>", escape_html(&card.display_text)));
    if !card.display_url.is_empty() {
        html.push_str(&format!("<div class=\"url\">{}</div>", escape_html(&card.display_url)));
    }
    html.push_str(&format!("<p>{}</p>", escape_html(&card.body)));
    if !card.callouts.is_empty() {
        let joined: Vec<String> = card.callouts.iter().map(|c| escape_html(c)).collect();
        html.push_str(&format!("<div class=\"callouts\">{}</div>", joined.join(" · ")));
    }
    for link in &card.sitelinks {
        html.push_str(&format!(
            "<a href=\"{}\">{}</a>",
            escape_html(&link.href),
            escape_html(&link.title)
        ));
    }
    html.push_str("</div></body></html>");
    html
}

// ─── Renderers ──────────────────────────────────────────────────────────────

/// A headless browser able to screenshot HTML as PNG.
pub trait BrowserSession {
    fn render_html(&mut self, html: &str, width: u32, height: u32) -> ReportResult<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardRenderer {
    Browser,
    RasterFallback,
}

#[derive(Debug, Clone)]
pub struct RenderedCard {
    pub renderer: CardRenderer,
    pub png: Vec<u8>,
}

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const NAVY: Rgb<u8> = Rgb([0, 0, 128]);
const MARGIN: u32 = 12;
const LINE_HEIGHT: u32 = 10;
const LINE_GAP: u32 = 8;
const CHAR_WIDTH: u32 = 6;

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let (max_x, max_y) = (img.width().min(x + w), img.height().min(y + h));
    for py in y..max_y {
        for px in x..max_x {
            img.put_pixel(px, py, color);
        }
    }
}

/// White card with a navy frame. The creative image, when its bytes decode,
/// sits on top; each text line below becomes a navy bar whose length follows
/// the text length.
pub fn render_raster(
    card: &AdCard,
    creative: Option<&[u8]>,
    config: &RenderConfig,
) -> ReportResult<Vec<u8>> {
    let (w, h) = (config.card_width.max(2 * MARGIN + 1), config.card_height.max(2 * MARGIN + 1));
    let mut img = RgbImage::from_pixel(w, h, WHITE);

    fill_rect(&mut img, 0, 0, w, 2, NAVY);
    fill_rect(&mut img, 0, h - 2, w, 2, NAVY);
    fill_rect(&mut img, 0, 0, 2, h, NAVY);
    fill_rect(&mut img, w - 2, 0, 2, h, NAVY);

    let usable = w - 2 * MARGIN;
    let mut y = MARGIN;
    if let Some(bytes) = creative {
        match image::load_from_memory(bytes) {
            Ok(decoded) => {
                let rgb = decoded.to_rgb8();
                let scaled_h = (rgb.height() as u64 * usable as u64 / rgb.width().max(1) as u64) as u32;
                let scaled_h = scaled_h.clamp(1, h / 2);
                let resized = imageops::resize(&rgb, usable, scaled_h, FilterType::Triangle);
                imageops::overlay(&mut img, &resized, MARGIN as i64, y as i64);
                y += scaled_h + LINE_GAP;
            }
            Err(e) => debug!(ad_id = %card.ad_id, error = %e, "Creative bytes did not decode"),
        }
    }

    let lines = std::iter::once(card.display_text.as_str())
        .chain(std::iter::once(card.body.as_str()))
        .chain(card.callouts.iter().map(String::as_str))
        .chain(card.sitelinks.iter().map(|s| s.title.as_str()))
        .filter(|line| !line.is_empty());

    for line in lines {
        if y + LINE_HEIGHT > h - MARGIN {
            break;
        }
        let len = (line.chars().count() as u32 * CHAR_WIDTH).clamp(CHAR_WIDTH, usable);
        fill_rect(&mut img, MARGIN, y, len, LINE_HEIGHT, NAVY);
        y += LINE_HEIGHT + LINE_GAP;
    }

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| ReportError::Render(e.to_string()))?;
    Ok(png)
}

/// Try the browser, fall through to the raster renderer.
pub fn render_card(
    card: &AdCard,
    creative: Option<&[u8]>,
    browser: Option<&mut dyn BrowserSession>,
    config: &RenderConfig,
) -> ReportResult<RenderedCard> {
    if let Some(session) = browser {
        let html = card_html(card, config);
        match session.render_html(&html, config.card_width, config.card_height) {
            Ok(png) => {
                return Ok(RenderedCard {
                    renderer: CardRenderer::Browser,
                    png,
                })
            }
            Err(e) => warn!(ad_id = %card.ad_id, error = %e, "Browser render failed, using raster fallback"),
        }
    } else {
        debug!(ad_id = %card.ad_id, "No browser session, using raster fallback");
    }

    Ok(RenderedCard {
        renderer: CardRenderer::RasterFallback,
        png: render_raster(card, creative, config)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::exports::ExportKind;
    use serde_json::{json, Value};

    fn bundle() -> ExportBundle {
        ExportBundle::from_documents(1, |kind| -> Option<Value> {
            match kind {
                ExportKind::Ads => Some(json!({ "result": { "Ads": [
                    { "Id": 10, "CampaignId": 1, "Type": "TEXT_AD", "TextAd": {
                        "Title": "Sofas <new>", "Title2": "In stock", "Text": "Delivery today",
                        "Href": "https://shop/sofas", "DisplayUrlPath": "sofas",
                        "SitelinkSetId": 77, "AdImageHash": "h1",
                        "AdExtensions": [{ "AdExtensionId": 5, "Type": "CALLOUT" }]
                    }},
                    { "Id": 11, "CampaignId": 1, "Type": "IMAGE_AD" }
                ]}})),
                ExportKind::Sitelinks => Some(json!({ "77": { "result": { "SitelinksSets": [{
                    "Id": 77, "Sitelinks": [
                        { "Title": "1" }, { "Title": "2" }, { "Title": "3" },
                        { "Title": "4" }, { "Title": "5" }
                    ]
                }]}}})),
                ExportKind::Extensions => Some(json!({ "result": { "AdExtensions": [
                    { "Id": 5, "Type": "CALLOUT", "Callout": { "CalloutText": "Free lift" } }
                ]}})),
                ExportKind::ImageHashes => Some(json!({ "result": { "AdImages": [
                    { "AdImageHash": "h1", "OriginalUrl": "https://img/h1" }
                ]}})),
                _ => None,
            }
        })
    }

    struct FailingBrowser;

    impl BrowserSession for FailingBrowser {
        fn render_html(&mut self, _html: &str, _w: u32, _h: u32) -> ReportResult<Vec<u8>> {
            Err(ReportError::Render("chrome crashed".into()))
        }
    }

    struct RecordingBrowser {
        last_html: String,
    }

    impl BrowserSession for RecordingBrowser {
        fn render_html(&mut self, html: &str, _w: u32, _h: u32) -> ReportResult<Vec<u8>> {
            self.last_html = html.to_string();
            Ok(vec![1, 2, 3])
        }
    }

    #[test]
    fn test_card_fields() {
        let bundle = bundle();
        let lookup = ImageLookup::from_records(&bundle.images);
        let card = build_ad_card(&EntityId::from(10u64), &bundle, &lookup, 4);
        assert_eq!(card.display_text, "Sofas <new> - In stock");
        assert_eq!(card.sitelinks.len(), 4);
        assert_eq!(card.callouts, vec!["Free lift"]);
        assert_eq!(card.image_url.as_deref(), Some("https://img/h1"));
        assert_eq!(card.display_url, "sofas");
    }

    #[test]
    fn test_card_without_text_creative() {
        let bundle = bundle();
        let lookup = ImageLookup::default();
        let image_only = build_ad_card(&EntityId::from(11u64), &bundle, &lookup, 4);
        assert_eq!(image_only.display_text, "Ad 11 - IMAGE_AD");
        let missing = build_ad_card(&EntityId::from(99u64), &bundle, &lookup, 4);
        assert_eq!(missing.display_text, "Ad 99 - UNKNOWN");
        assert!(missing.sitelinks.is_empty());
    }

    #[test]
    fn test_browser_output_is_used_and_escaped() {
        let bundle = bundle();
        let card = build_ad_card(&EntityId::from(10u64), &bundle, &ImageLookup::default(), 4);
        let mut browser = RecordingBrowser { last_html: String::new() };
        let rendered = render_card(&card, None, Some(&mut browser), &RenderConfig::default()).unwrap();
        assert_eq!(rendered.renderer, CardRenderer::Browser);
        assert_eq!(rendered.png, vec![1, 2, 3]);
        assert!(browser.last_html.contains("Sofas &lt;new&gt;"));
    }

    #[test]
    fn test_failing_browser_falls_back_to_raster() {
        let bundle = bundle();
        let card = build_ad_card(&EntityId::from(10u64), &bundle, &ImageLookup::default(), 4);
        let config = RenderConfig::default();
        let rendered = render_card(&card, None, Some(&mut FailingBrowser), &config).unwrap();
        assert_eq!(rendered.renderer, CardRenderer::RasterFallback);

        let decoded = image::load_from_memory(&rendered.png).unwrap();
        assert_eq!(decoded.width(), config.card_width);
        assert_eq!(decoded.height(), config.card_height);
    }

    #[test]
    fn test_no_browser_uses_raster() {
        let bundle = bundle();
        let card = build_ad_card(&EntityId::from(99u64), &bundle, &ImageLookup::default(), 4);
        let rendered = render_card(&card, None, None, &RenderConfig::default()).unwrap();
        assert_eq!(rendered.renderer, CardRenderer::RasterFallback);
        assert!(rendered.png.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_raster_embeds_creative_and_tolerates_garbage() {
        let bundle = bundle();
        let card = build_ad_card(&EntityId::from(10u64), &bundle, &ImageLookup::default(), 4);
        let config = RenderConfig::default();

        let mut creative = Vec::new();
        RgbImage::from_pixel(40, 20, Rgb([200, 0, 0]))
            .write_to(&mut Cursor::new(&mut creative), ImageFormat::Png)
            .unwrap();
        let png = render_raster(&card, Some(&creative), &config).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        let pixel = decoded.get_pixel(MARGIN + 5, MARGIN + 5);
        assert!(pixel[0] > 150 && pixel[2] < 50);

        assert!(render_raster(&card, Some(b"not an image".as_slice()), &config).is_ok());
    }
}
