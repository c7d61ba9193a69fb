//! Per-message orchestration: classify one chat line, run the lookups it
//! asks for, compose the reply lines.

use tracing::warn;

use crate::patterns::Matchers;
use crate::traits::{JobSource, TicketSource};

pub struct MessageHandler<T, J> {
    matchers: Matchers,
    tracker: T,
    builds: J,
}

impl<T: TicketSource, J: JobSource> MessageHandler<T, J> {
    pub fn new(tracker: T, builds: J) -> Self {
        Self {
            matchers: Matchers::new(),
            tracker,
            builds,
        }
    }

    /// Process one inbound chat line into zero or more reply lines.
    ///
    /// A line may carry both a ticket token and a job token; the lookups run
    /// sequentially, ticket first, and a found ticket always produces its
    /// two lines adjacently. Upstream failures are logged and answered the
    /// same way as a genuine miss.
    pub async fn handle(&self, text: &str) -> Vec<String> {
        let mut replies = Vec::new();

        if let Some(ticket) = self.matchers.ticket(text) {
            match self.tracker.ticket_info(&ticket.id).await {
                Ok(Some(info)) => {
                    replies.push(format!("{}: {} ({})", ticket.token, info.title, info.status));
                    replies.push(format!(
                        "{}: {}",
                        ticket.token,
                        self.tracker.ticket_url(&ticket.id)
                    ));
                }
                Ok(None) => replies.push(format!("No such ticket: {}", ticket.token)),
                Err(error) => {
                    warn!("Ticket lookup for {} failed: {}", ticket.token, error);
                    replies.push(format!("No such ticket: {}", ticket.token));
                }
            }
        }

        // "!builds" would also match the job pattern, so the listing takes
        // precedence over the single-job lookup.
        if self.matchers.wants_all_jobs(text) {
            match self.builds.all_jobs().await {
                Ok(jobs) => {
                    let names = jobs
                        .iter()
                        .map(|job| job.name.as_str())
                        .collect::<Vec<_>>()
                        .join(" ");
                    replies.push(format!("All build server jobs: {names}"));
                }
                Err(error) => warn!("Job listing failed: {}", error),
            }
        } else if let Some(name) = self.matchers.job(text) {
            match self.builds.job_status(&name).await {
                Ok(Some(status)) => replies.push(format!("Build job {name} has {status}")),
                Ok(None) => replies.push(format!("No build job named {name}")),
                Err(error) => {
                    warn!("Status lookup for job {} failed: {}", name, error);
                    replies.push(format!("No build job named {name}"));
                }
            }
        }

        replies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;

    use crate::models::{Job, TicketInfo};

    struct FixtureTracker {
        tickets: Vec<(&'static str, TicketInfo)>,
    }

    #[async_trait]
    impl TicketSource for FixtureTracker {
        fn ticket_url(&self, id: &str) -> String {
            format!("https://tracker.example.org/ticket/{id}")
        }

        async fn ticket_info(&self, id: &str) -> Result<Option<TicketInfo>> {
            Ok(self
                .tickets
                .iter()
                .find(|(known, _)| *known == id)
                .map(|(_, info)| info.clone()))
        }
    }

    struct FailingTracker;

    #[async_trait]
    impl TicketSource for FailingTracker {
        fn ticket_url(&self, id: &str) -> String {
            format!("https://tracker.example.org/ticket/{id}")
        }

        async fn ticket_info(&self, _id: &str) -> Result<Option<TicketInfo>> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    struct FixtureJobs(Vec<Job>);

    #[async_trait]
    impl JobSource for FixtureJobs {
        async fn all_jobs(&self) -> Result<Vec<Job>> {
            Ok(self.0.clone())
        }
    }

    struct FailingJobs;

    #[async_trait]
    impl JobSource for FailingJobs {
        async fn all_jobs(&self) -> Result<Vec<Job>> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    fn job(name: &str, color: &str) -> Job {
        Job {
            name: name.to_string(),
            url: format!("https://ci.example.org/job/{name}/"),
            color: color.to_string(),
        }
    }

    fn fixture_handler() -> MessageHandler<FixtureTracker, FixtureJobs> {
        MessageHandler::new(
            FixtureTracker {
                tickets: vec![(
                    "1234",
                    TicketInfo {
                        title: "Some Bug Title".to_string(),
                        status: "closed".to_string(),
                    },
                )],
            },
            FixtureJobs(vec![
                job("mantid-develop", "blue_anime"),
                job("mantid-nightly", "red"),
            ]),
        )
    }

    #[tokio::test]
    async fn found_ticket_gets_summary_and_url_lines() {
        let replies = fixture_handler().handle("see #1234 please").await;
        assert_eq!(
            replies,
            vec![
                "#1234: Some Bug Title (closed)",
                "#1234: https://tracker.example.org/ticket/1234",
            ]
        );
    }

    #[tokio::test]
    async fn unknown_ticket_gets_one_line() {
        let replies = fixture_handler().handle("what about #9999?").await;
        assert_eq!(replies, vec!["No such ticket: #9999"]);
    }

    #[tokio::test]
    async fn tracker_failure_reads_like_a_miss() {
        let handler = MessageHandler::new(FailingTracker, FixtureJobs(vec![]));
        let replies = handler.handle("see #1234 please").await;
        assert_eq!(replies, vec!["No such ticket: #1234"]);
    }

    #[tokio::test]
    async fn known_job_reports_its_status() {
        let replies = fixture_handler().handle("!mantid-develop").await;
        assert_eq!(
            replies,
            vec!["Build job mantid-develop has passed (in progress)"]
        );
    }

    #[tokio::test]
    async fn unknown_job_gets_an_explicit_reply() {
        let replies = fixture_handler().handle("!nonexistent").await;
        assert_eq!(replies, vec!["No build job named nonexistent"]);
    }

    #[tokio::test]
    async fn job_lookup_failure_reads_like_a_miss() {
        let handler = MessageHandler::new(
            FixtureTracker { tickets: vec![] },
            FailingJobs,
        );
        let replies = handler.handle("!mantid-develop").await;
        assert_eq!(replies, vec!["No build job named mantid-develop"]);
    }

    #[tokio::test]
    async fn builds_trigger_lists_every_job_once() {
        let replies = fixture_handler().handle("!builds").await;
        assert_eq!(
            replies,
            vec!["All build server jobs: mantid-develop mantid-nightly"]
        );
    }

    #[tokio::test]
    async fn listing_failure_stays_silent() {
        let handler = MessageHandler::new(FixtureTracker { tickets: vec![] }, FailingJobs);
        assert!(handler.handle("!builds").await.is_empty());
    }

    #[tokio::test]
    async fn ticket_and_job_on_one_line_keep_ticket_lines_adjacent() {
        let replies = fixture_handler().handle("#1234 broke !mantid-nightly").await;
        assert_eq!(
            replies,
            vec![
                "#1234: Some Bug Title (closed)",
                "#1234: https://tracker.example.org/ticket/1234",
                "Build job mantid-nightly has failed",
            ]
        );
    }

    #[tokio::test]
    async fn plain_chatter_is_ignored() {
        assert!(fixture_handler().handle("good morning all").await.is_empty());
    }

    #[tokio::test]
    async fn handling_is_idempotent() {
        let handler = fixture_handler();
        let first = handler.handle("see #1234 and !mantid-develop").await;
        let second = handler.handle("see #1234 and !mantid-develop").await;
        assert_eq!(first, second);
    }
}
