//! Runtime configuration, read once at startup

/// Everything the bot needs to know about its environment: where to
/// connect, which channel to sit in, and where the two upstream services
/// live. Built once in `main` and passed explicitly to the components that
/// need it.
#[derive(Debug, Clone)]
pub struct Config {
    /// IRC server as `host:port`.
    pub server: String,
    pub nickname: String,
    pub channel: String,
    /// Base URL a ticket id is appended to, e.g. `https://tracker.example.org/ticket`.
    pub tracker_base_url: String,
    /// Full URL of the build server's JSON status endpoint.
    pub ci_api_url: String,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Self {
        Self {
            server: env_or("IRC_SERVER", "irc.libera.chat:6667"),
            nickname: env_or("IRC_NICKNAME", "statusbot"),
            channel: env_or("IRC_CHANNEL", "#statusbot-test"),
            tracker_base_url: env_or("TRACKER_BASE_URL", "https://tracker.example.org/ticket"),
            ci_api_url: env_or("CI_API_URL", "https://ci.example.org/api/json"),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
