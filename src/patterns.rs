//! Message classification: which lookups does a chat line ask for?

use regex::Regex;

/// A ticket token pulled out of a chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRef {
    /// The token as written, marker included (`#1234`).
    pub token: String,
    /// The bare identifier used for URL building (`1234`).
    pub id: String,
}

/// Compiled matchers for the three chat triggers. Built once at startup and
/// shared for the life of the process.
pub struct Matchers {
    ticket: Regex,
    job: Regex,
    all_jobs: Regex,
}

impl Matchers {
    pub fn new() -> Self {
        Self {
            // 4-5 digits; on a longer run the first five win
            ticket: Regex::new(r"#(\d{4,5})").expect("ticket pattern"),
            job: Regex::new(r"!([\w-]+)").expect("job pattern"),
            all_jobs: Regex::new(r"!builds\b").expect("all-jobs pattern"),
        }
    }

    /// First ticket token in the line, if any.
    pub fn ticket(&self, text: &str) -> Option<TicketRef> {
        self.ticket.captures(text).map(|caps| TicketRef {
            token: caps[0].to_string(),
            id: caps[1].to_string(),
        })
    }

    /// First job token in the line, marker stripped.
    pub fn job(&self, text: &str) -> Option<String> {
        self.job.captures(text).map(|caps| caps[1].to_string())
    }

    /// Whether the line asks for the full job listing.
    pub fn wants_all_jobs(&self, text: &str) -> bool {
        self.all_jobs.is_match(text)
    }
}
