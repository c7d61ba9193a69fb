//! Build server client: job listing and per-job status lookups

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use crate::models::{BuildServerSnapshot, Job};
use crate::traits::JobSource;

pub struct BuildServerClient {
    client: Client,
    api_url: String,
}

impl BuildServerClient {
    pub fn new(api_url: &str) -> Self {
        let client = Client::builder()
            .user_agent("status-bot/0.1")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_url: api_url.to_string(),
        }
    }
}

#[async_trait]
impl JobSource for BuildServerClient {
    async fn all_jobs(&self) -> Result<Vec<Job>> {
        info!("Fetching job list from {}", self.api_url);

        let response = self.client.get(&self.api_url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Failed to fetch job list: {}",
                response.status()
            ));
        }

        let snapshot: BuildServerSnapshot = response.json().await?;
        Ok(snapshot.jobs)
    }
}

/// Map the build server's color code to a human-readable phrase. Colors
/// outside the known vocabulary never leak into chat.
pub fn color_phrase(color: &str) -> &'static str {
    match color {
        "red" => "failed",
        "red_anime" => "failed (in progress)",
        "yellow" => "built with warnings",
        "yellow_anime" => "built with warnings (in progress)",
        "blue" => "passed",
        "blue_anime" => "passed (in progress)",
        _ => "an unknown status",
    }
}
