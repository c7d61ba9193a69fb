//! Data models for tracker tickets and the build server's status API

use serde::Deserialize;

/// Title and status scraped from one ticket page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketInfo {
    pub title: String,
    pub status: String,
}

/// One job as reported by the build server.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Job {
    pub name: String,
    #[allow(dead_code)]
    pub url: String,
    pub color: String,
}

/// The build server's job listing, fetched fresh on every query.
///
/// Only the `jobs` array is consumed; everything else in the payload is
/// ignored.
#[derive(Debug, Deserialize)]
pub struct BuildServerSnapshot {
    #[serde(default)]
    pub jobs: Vec<Job>,
}
