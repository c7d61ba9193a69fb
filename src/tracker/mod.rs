//! Issue tracker client: fetch a ticket page and scrape title + status
//!
//! The tracker renders the ticket title inside parentheses in the page
//! `<title>` and the workflow state inside parentheses in a
//! `<span class="status">`. Both are pulled out with the same first-match
//! extraction; everything else on the page is ignored.

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use tracing::info;

use crate::models::TicketInfo;
use crate::traits::TicketSource;

pub struct TrackerClient {
    client: Client,
    base_url: String,
}

impl TrackerClient {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .user_agent("status-bot/0.1")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl TicketSource for TrackerClient {
    fn ticket_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }

    async fn ticket_info(&self, id: &str) -> Result<Option<TicketInfo>> {
        let url = self.ticket_url(id);
        info!("Fetching ticket page {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to fetch ticket page {}: {}",
                url,
                response.status()
            ));
        }

        let html = response.text().await?;
        Ok(parse_ticket_page(&html))
    }
}

/// Scrape one ticket page. A page without a parenthesized title fragment is
/// treated as "no such ticket" even when a `<title>` element exists; a
/// missing status span just leaves the status empty.
pub fn parse_ticket_page(html: &str) -> Option<TicketInfo> {
    let document = Html::parse_document(html);

    let title_selector = Selector::parse("title").unwrap();
    // exact attribute value, not class-list membership
    let status_selector = Selector::parse(r#"span[class="status"]"#).unwrap();
    let parenthesized = Regex::new(r"\((.*?)\)").unwrap();

    let title = first_fragment(&document, &title_selector, &parenthesized)?;
    let status = first_fragment(&document, &status_selector, &parenthesized).unwrap_or_default();

    Some(TicketInfo { title, status })
}

/// Text inside the parentheses of the first element matching `selector`,
/// in document order.
fn first_fragment(document: &Html, selector: &Selector, parenthesized: &Regex) -> Option<String> {
    let element = document.select(selector).next()?;
    let text = element.text().collect::<String>();

    parenthesized.captures(&text).map(|caps| caps[1].to_string())
}
