use anyhow::Result;
use tracing::info;

mod builds;
mod config;
mod handler;
mod irc;
mod models;
mod patterns;
mod tracker;
mod traits;

use builds::BuildServerClient;
use config::Config;
use handler::MessageHandler;
use tracker::TrackerClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    info!("Starting status bot for {} on {}", config.channel, config.server);

    let tracker = TrackerClient::new(&config.tracker_base_url);
    let builds = BuildServerClient::new(&config.ci_api_url);
    let handler = MessageHandler::new(tracker, builds);

    irc::run(&config, &handler).await
}
