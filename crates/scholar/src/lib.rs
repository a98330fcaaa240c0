pub mod author_id;
pub mod direct;
pub mod extract;
#[cfg(feature = "headless")]
pub mod headless;
pub mod models;
pub mod paginate;
pub mod proxy;
pub mod report;
pub mod serpapi;
pub mod service;

pub use author_id::extract_author_id;
pub use extract::ProfileExtractor;
pub use models::{Metrics, ProfileRecord, ProfileSnapshot, PublicationRecord};
pub use report::render_report;
pub use service::{user_message, FetchOutcome, ScholarService};

use common::Config;

/// Loads configuration from the environment and runs a single request.
pub async fn run_scholar(url: &str) -> anyhow::Result<FetchOutcome> {
    let _ = dotenv::dotenv();
    let config = Config::from_env()?;
    let service = ScholarService::new(&config)?;
    Ok(service.process(url).await?)
}
