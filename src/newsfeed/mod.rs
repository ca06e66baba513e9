//! Builds the `noticias.json` payload consumed by the news catalog.
//!
//! The WordPress REST API is tried first. When it fails or comes back empty
//! the tag archive page is scraped instead. Whatever happens, a valid payload
//! is produced so the page always has something to load.

pub mod html;

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::NewsItem;
use crate::source::{parse_json_records, FetchError, Fetcher, SourceRef};

pub const DEFAULT_SITE: &str = "https://www.epicentrochile.com";
pub const DEFAULT_TAG: &str = "olmue2026";
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum NewsFeedError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("tag '{tag}' was not found in wp-json")]
    TagNotFound { tag: String },

    #[error("failed to serialize payload: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedConfig {
    pub site: String,
    pub tag: String,
    pub limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            site: DEFAULT_SITE.to_string(),
            tag: DEFAULT_TAG.to_string(),
            limit: DEFAULT_LIMIT,
        }
    }
}

impl FeedConfig {
    fn site_root(&self) -> &str {
        self.site.trim_end_matches('/')
    }

    fn tag_page(&self) -> String {
        format!("{}/tag/{}/", self.site_root(), self.tag)
    }

    fn host(&self) -> String {
        reqwest::Url::parse(&self.site)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
            .unwrap_or_else(|| self.site.clone())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedMode {
    #[serde(rename = "wp-json")]
    WpJson,
    #[serde(rename = "html-fallback")]
    HtmlFallback,
    #[serde(rename = "error")]
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsPayload {
    pub source: String,
    pub mode: FeedMode,
    pub items: Vec<NewsItem>,
    pub generated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NewsPayload {
    fn new(source: String, mode: FeedMode, items: Vec<NewsItem>) -> Self {
        Self {
            source,
            mode,
            items,
            generated_at: chrono::Utc::now().to_rfc3339(),
            note: None,
            error: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WpTag {
    id: Option<u64>,
    #[serde(default)]
    slug: String,
}

#[derive(Debug, Default, Deserialize)]
struct Rendered {
    #[serde(default)]
    rendered: String,
}

#[derive(Debug, Deserialize)]
struct WpPost {
    #[serde(default)]
    link: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    title: Rendered,
    #[serde(default)]
    excerpt: Rendered,
}

async fn fetch_list<T, F>(fetcher: &F, url: &str) -> Result<Vec<T>, FetchError>
where
    T: serde::de::DeserializeOwned,
    F: Fetcher,
{
    let src = SourceRef::remote(url)?;
    let text = fetcher.fetch_text(&src).await?;
    parse_json_records(&text, url)
}

async fn find_tag_id<F: Fetcher>(fetcher: &F, cfg: &FeedConfig) -> Result<u64, NewsFeedError> {
    let by_slug = format!(
        "{}/wp-json/wp/v2/tags?slug={}&per_page=50",
        cfg.site_root(),
        cfg.tag
    );
    let tags: Vec<WpTag> = fetch_list(fetcher, &by_slug).await?;
    if let Some(id) = tags.first().and_then(|t| t.id) {
        return Ok(id);
    }

    let by_search = format!(
        "{}/wp-json/wp/v2/tags?search={}&per_page=50",
        cfg.site_root(),
        cfg.tag
    );
    let tags: Vec<WpTag> = fetch_list(fetcher, &by_search).await?;
    tags.iter()
        .find(|t| t.slug.eq_ignore_ascii_case(&cfg.tag))
        .or_else(|| tags.first())
        .and_then(|t| t.id)
        .ok_or_else(|| NewsFeedError::TagNotFound {
            tag: cfg.tag.clone(),
        })
}

pub async fn fetch_from_wp_api<F: Fetcher>(
    fetcher: &F,
    cfg: &FeedConfig,
) -> Result<NewsPayload, NewsFeedError> {
    let tag_id = find_tag_id(fetcher, cfg).await?;
    let posts_url = format!(
        "{}/wp-json/wp/v2/posts?tags={}&per_page={}&_fields=link,date,title,excerpt",
        cfg.site_root(),
        tag_id,
        cfg.limit
    );
    let posts: Vec<WpPost> = fetch_list(fetcher, &posts_url).await?;
    let items = posts
        .into_iter()
        .map(|p| NewsItem {
            title: html::strip_html(&p.title.rendered),
            url: p.link.trim().to_string(),
            date: p.date.trim().to_string(),
            excerpt: html::strip_html(&p.excerpt.rendered),
        })
        .filter(|n| !n.title.is_empty() && !n.url.is_empty())
        .collect();
    Ok(NewsPayload::new(cfg.tag_page(), FeedMode::WpJson, items))
}

pub async fn fetch_from_html<F: Fetcher>(
    fetcher: &F,
    cfg: &FeedConfig,
) -> Result<NewsPayload, NewsFeedError> {
    let page_url = cfg.tag_page();
    let src = SourceRef::remote(&page_url)?;
    let body = fetcher.fetch_text(&src).await?;

    let mut items = collect_items(cfg, html::heading_links(&body));
    if items.is_empty() {
        items = collect_items(cfg, html::any_links(&body));
    }
    Ok(NewsPayload::new(page_url, FeedMode::HtmlFallback, items))
}

/// Keeps same-site article links, dropping the tag archive itself and
/// duplicates, up to the configured limit.
fn collect_items(cfg: &FeedConfig, links: Vec<(String, String)>) -> Vec<NewsItem> {
    let host = cfg.host();
    let tag_path = format!("/tag/{}/", cfg.tag);
    let mut seen = HashSet::new();
    let mut items = Vec::new();
    for (title, href) in links {
        let link = html::normalize_link(&cfg.site, &href);
        if !link.contains(&host) || link.contains(&tag_path) {
            continue;
        }
        if !seen.insert(link.clone()) {
            continue;
        }
        items.push(NewsItem {
            title,
            url: link,
            ..Default::default()
        });
        if items.len() >= cfg.limit {
            break;
        }
    }
    items
}

/// Never fails: the worst case is an `error` payload with no items.
pub async fn build_payload<F: Fetcher>(fetcher: &F, cfg: &FeedConfig) -> NewsPayload {
    let wp_note = match fetch_from_wp_api(fetcher, cfg).await {
        Ok(payload) if !payload.items.is_empty() => {
            log::debug!("wp-json returned {} items", payload.items.len());
            return payload;
        }
        Ok(_) => "wp-json returned 0 items".to_string(),
        Err(e) => format!("wp-json failed: {e}"),
    };
    log::warn!("{wp_note}, falling back to HTML");

    match fetch_from_html(fetcher, cfg).await {
        Ok(mut payload) => {
            payload.note = Some(wp_note);
            payload
        }
        Err(e) => {
            log::error!("html fallback failed: {e}");
            let mut payload = NewsPayload::new(cfg.tag_page(), FeedMode::Error, Vec::new());
            payload.error = Some(e.to_string());
            payload.note = Some(wp_note);
            payload
        }
    }
}

pub async fn write_payload(path: &Path, payload: &NewsPayload) -> Result<(), NewsFeedError> {
    let write_err = |source| NewsFeedError::Write {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }
    let mut json = serde_json::to_vec_pretty(payload)
        .map_err(|source| NewsFeedError::Serialize { source })?;
    json.push(b'\n');
    tokio::fs::write(path, json).await.map_err(write_err)
}
