// src/services/scrape.rs

//! Profile page scraping source.
//!
//! Fetches a handle's public profile page and extracts candidate posts
//! using configured CSS selectors.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{AccountProfile, CandidatePost, SourceConfig};
use crate::services::PostSource;
use crate::utils::http::{create_client, fetch_page};
use crate::utils::text::normalize_whitespace;
use crate::utils::url::{extract_status_id, profile_url, resolve, status_url};

/// Post source backed by HTML scraping.
pub struct ScrapingSource {
    config: SourceConfig,
    client: Client,
    post_selector: Selector,
    text_selector: Selector,
    link_selector: Selector,
    time_selector: Selector,
}

impl ScrapingSource {
    /// Create a scraping source, validating the configured selectors.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = create_client(&config.user_agent, config.timeout())?;
        Ok(Self {
            post_selector: Self::parse_selector(&config.post_selector)?,
            text_selector: Self::parse_selector(&config.text_selector)?,
            link_selector: Self::parse_selector(&config.link_selector)?,
            time_selector: Self::parse_selector(&config.time_selector)?,
            config: config.clone(),
            client,
        })
    }

    /// Extract candidate posts from a fetched profile page.
    ///
    /// Nodes without an extractable status id are skipped; a synthesized
    /// id would defeat deduplication on the next scan.
    fn extract_candidates(&self, document: &Html, handle: &str) -> Vec<CandidatePost> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for node in document.select(&self.post_selector) {
            if let Some(candidate) = self.parse_post_node(&node, handle) {
                if seen.insert(candidate.id.clone()) {
                    candidates.push(candidate);
                }
            }
        }
        candidates
    }

    fn parse_post_node(
        &self,
        node: &scraper::ElementRef,
        handle: &str,
    ) -> Option<CandidatePost> {
        let href = node
            .select(&self.link_selector)
            .next()?
            .value()
            .attr("href")?;
        let id = extract_status_id(href)?;

        let text = node
            .select(&self.text_selector)
            .next()
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default();

        let authored_at = node
            .select(&self.time_selector)
            .next()
            .and_then(|el| el.value().attr("datetime"))
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Some(CandidatePost {
            url: status_url(&self.config.base_url, handle, &id),
            id,
            text,
            authored_at,
        })
    }

    /// Extract display details from a profile page.
    fn extract_profile(document: &Html, base_url: &str, handle: &str) -> AccountProfile {
        let display_name = meta_content(document, "og:title")
            .or_else(|| page_title(document))
            .map(|t| strip_handle_suffix(&t))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| handle.to_string());

        let profile_image_url =
            meta_content(document, "og:image").map(|href| resolve(base_url, &href));

        AccountProfile {
            handle: handle.to_string(),
            display_name,
            profile_image_url,
        }
    }

    /// Fetch the full text from a post's permalink page.
    async fn fetch_full_text(&self, url: &str) -> Result<Option<String>> {
        let document = fetch_page(&self.client, url).await?;
        Ok(document
            .select(&self.text_selector)
            .next()
            .map(|el| normalize_whitespace(&el.text().collect::<String>())))
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

#[async_trait]
impl PostSource for ScrapingSource {
    async fn fetch_profile(&self, handle: &str) -> Result<Option<AccountProfile>> {
        let url = profile_url(&self.config.base_url, handle);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            log::debug!("Profile fetch for @{handle} returned {}", response.status());
            return Ok(None);
        }

        let body = response.text().await?;
        let document = Html::parse_document(&body);
        Ok(Some(Self::extract_profile(
            &document,
            &self.config.base_url,
            handle,
        )))
    }

    async fn fetch_recent(&self, handle: &str, limit: usize) -> Result<Vec<CandidatePost>> {
        let url = profile_url(&self.config.base_url, handle);

        // Parse inside a block so the document is gone before any await.
        let mut candidates = {
            let document = fetch_page(&self.client, &url).await?;
            self.extract_candidates(&document, handle)
        };
        candidates.truncate(limit);

        if self.config.fetch_details {
            for candidate in &mut candidates {
                match self.fetch_full_text(&candidate.url).await {
                    Ok(Some(text)) if !text.is_empty() => candidate.text = text,
                    Ok(_) => {}
                    Err(e) => {
                        log::debug!("Detail fetch failed for {}: {e}", candidate.url);
                    }
                }
            }
        }

        Ok(candidates)
    }
}

fn meta_content(document: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[property="{property}"]"#)).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn page_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

/// Turn "Alice Smith (@alice) / X" into "Alice Smith".
fn strip_handle_suffix(title: &str) -> String {
    title.split(" (@").next().unwrap_or(title).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_HTML: &str = r#"
        <html>
        <head>
            <meta property="og:title" content="Alice Smith (@alice) / X">
            <meta property="og:image" content="/img/alice.jpg">
            <title>Alice Smith (@alice) / X</title>
        </head>
        <body>
            <article data-testid="tweet">
                <div data-testid="tweetText">Hello <b>world</b></div>
                <a href="/alice/status/111">permalink</a>
                <time datetime="2026-01-02T03:04:05.000Z">Jan 2</time>
            </article>
            <article data-testid="tweet">
                <div data-testid="tweetText">Second post</div>
                <a href="/alice/status/222?s=20">permalink</a>
                <time datetime="not a date">?</time>
            </article>
            <article data-testid="tweet">
                <div data-testid="tweetText">No permalink here</div>
            </article>
            <article data-testid="tweet">
                <div data-testid="tweetText">Pinned copy of the first post</div>
                <a href="/alice/status/111">permalink</a>
            </article>
        </body>
        </html>
    "#;

    fn source() -> ScrapingSource {
        ScrapingSource::new(&SourceConfig::default()).unwrap()
    }

    #[test]
    fn test_extract_candidates() {
        let document = Html::parse_document(PROFILE_HTML);
        let candidates = source().extract_candidates(&document, "alice");

        assert_eq!(candidates.len(), 2);

        assert_eq!(candidates[0].id, "111");
        assert_eq!(candidates[0].url, "https://twitter.com/alice/status/111");
        assert_eq!(candidates[0].text, "Hello world");
        assert!(candidates[0].authored_at.is_some());

        assert_eq!(candidates[1].id, "222");
        assert_eq!(candidates[1].text, "Second post");
        assert!(candidates[1].authored_at.is_none());
    }

    #[test]
    fn test_extract_profile() {
        let document = Html::parse_document(PROFILE_HTML);
        let profile =
            ScrapingSource::extract_profile(&document, "https://twitter.com", "alice");

        assert_eq!(profile.handle, "alice");
        assert_eq!(profile.display_name, "Alice Smith");
        assert_eq!(
            profile.profile_image_url.as_deref(),
            Some("https://twitter.com/img/alice.jpg")
        );
    }

    #[test]
    fn test_extract_profile_falls_back_to_handle() {
        let document = Html::parse_document("<html><head></head><body></body></html>");
        let profile =
            ScrapingSource::extract_profile(&document, "https://twitter.com", "bob");

        assert_eq!(profile.display_name, "bob");
        assert!(profile.profile_image_url.is_none());
    }

    #[test]
    fn test_parse_selector_valid() {
        assert!(ScrapingSource::parse_selector("div.post").is_ok());
        assert!(ScrapingSource::parse_selector(r#"a[href*="/status/"]"#).is_ok());
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(ScrapingSource::parse_selector("[[invalid").is_err());
    }

    #[test]
    fn test_strip_handle_suffix() {
        assert_eq!(strip_handle_suffix("Alice Smith (@alice) / X"), "Alice Smith");
        assert_eq!(strip_handle_suffix("Plain Name"), "Plain Name");
    }
}
