//! Trait seams for the two upstream lookups
//!
//! The message handler is generic over these, so tests can swap the live
//! HTTP clients for canned fixtures.

use anyhow::Result;
use async_trait::async_trait;

use crate::builds::color_phrase;
use crate::models::{Job, TicketInfo};

/// Something that can resolve a ticket id to its title and status.
#[async_trait]
pub trait TicketSource: Send + Sync {
    /// Canonical URL for a ticket, built from the already-stripped id.
    fn ticket_url(&self, id: &str) -> String;

    /// Look a ticket up. `Ok(None)` means the upstream answered but the
    /// ticket does not exist; `Err` means the upstream could not be asked.
    async fn ticket_info(&self, id: &str) -> Result<Option<TicketInfo>>;
}

/// Something that knows the build server's current job list.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// The full job list, fetched fresh. Never cached.
    async fn all_jobs(&self) -> Result<Vec<Job>>;

    /// Human-readable status of one job, by exact name match.
    async fn job_status(&self, name: &str) -> Result<Option<String>> {
        let jobs = self.all_jobs().await?;
        Ok(jobs
            .iter()
            .find(|job| job.name == name)
            .map(|job| color_phrase(&job.color).to_string()))
    }
}
