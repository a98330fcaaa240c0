use std::path::PathBuf;

use common::{
    require_url, Config, FailureLog, PageSource, PaginationConfig, ScholarError, ScholarResult,
    SnapshotWriter, Strategy,
};
use tracing::{info, warn};

use crate::author_id::extract_author_id;
use crate::direct::{http_client, DirectSource};
use crate::extract::ProfileExtractor;
use crate::models::{ProfileRecord, ProfileSnapshot};
use crate::paginate::collect_pages;
use crate::proxy::ProxySource;
use crate::report::render_report;
use crate::serpapi::SerpApiClient;

/// Result of one successful request.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub url: String,
    pub profile: ProfileRecord,
    /// Which path produced the record: "serpapi" or the page source name.
    pub via: &'static str,
    pub saved_to: Option<PathBuf>,
}

impl FetchOutcome {
    pub fn report_html(&self) -> String {
        render_report(&self.profile)
    }
}

/// One request flow: validate, pick API or markup, extract, persist.
pub struct ScholarService {
    source: Box<dyn PageSource>,
    extractor: ProfileExtractor,
    api: Option<SerpApiClient>,
    pagination: PaginationConfig,
    snapshot: Option<SnapshotWriter>,
    failure_log: Option<FailureLog>,
}

impl ScholarService {
    pub fn new(config: &Config) -> ScholarResult<Self> {
        let client = http_client(&config.fetch)?;

        let source: Box<dyn PageSource> = match config.strategy {
            Strategy::Direct => Box::new(DirectSource::new(client.clone(), &config.fetch)),
            Strategy::Proxy => Box::new(ProxySource::new(client.clone(), &config.fetch)?),
            Strategy::Headless => headless_source(config)?,
        };

        let api = config
            .serpapi_key
            .as_deref()
            .map(|key| SerpApiClient::new(client.clone(), &config.serpapi_url, key));

        Ok(Self::with_source(source, config)?.with_api(api))
    }

    /// Same as `new` but with a caller-supplied page source.
    pub fn with_source(source: Box<dyn PageSource>, config: &Config) -> ScholarResult<Self> {
        Ok(Self {
            source,
            extractor: ProfileExtractor::new(&config.origin)?,
            api: None,
            pagination: config.pagination.clone(),
            snapshot: config.snapshot_path.clone().map(SnapshotWriter::new),
            failure_log: config.failure_log_path.clone().map(FailureLog::new),
        })
    }

    pub fn with_api(mut self, api: Option<SerpApiClient>) -> Self {
        self.api = api;
        self
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Fetches and extracts without touching the snapshot or failure log.
    pub async fn fetch_profile(&self, input: &str) -> ScholarResult<(ProfileRecord, &'static str)> {
        let url = require_url(input)?;

        if let Some(api) = &self.api {
            match extract_author_id(url) {
                Some(author_id) => {
                    info!("Using SerpApi for author {}", author_id);
                    return Ok((api.fetch_profile(&author_id).await?, "serpapi"));
                }
                None => info!("No author id in {}, falling back to page fetch", url),
            }
        }

        info!("Fetching {} via {} source", url, self.source.name());
        let profile = if self.pagination.enabled {
            collect_pages(self.source.as_ref(), &self.extractor, &self.pagination, url).await?
        } else {
            let html = self.source.fetch(url).await?;
            self.extractor.extract(&html)
        };
        info!(
            "Extracted profile '{}' with {} publications",
            profile.name,
            profile.publications.len()
        );
        Ok((profile, self.source.name()))
    }

    /// The full request: fetch, save the snapshot, and log failures.
    pub async fn process(&self, input: &str) -> ScholarResult<FetchOutcome> {
        match self.fetch_and_save(input).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                warn!("Request for '{}' failed: {}", input.trim(), e);
                if let Some(log) = &self.failure_log {
                    log.record_quietly(input.trim(), &e).await;
                }
                Err(e)
            }
        }
    }

    async fn fetch_and_save(&self, input: &str) -> ScholarResult<FetchOutcome> {
        let (profile, via) = self.fetch_profile(input).await?;
        let url = input.trim().to_string();

        let saved_to = match &self.snapshot {
            Some(writer) => {
                let snapshot = ProfileSnapshot {
                    url: url.clone(),
                    profile: profile.clone(),
                };
                writer.save(&snapshot).await?;
                Some(writer.path().to_path_buf())
            }
            None => None,
        };

        Ok(FetchOutcome {
            url,
            profile,
            via,
            saved_to,
        })
    }
}

#[cfg(feature = "headless")]
fn headless_source(config: &Config) -> ScholarResult<Box<dyn PageSource>> {
    Ok(Box::new(crate::headless::HeadlessSource::new(&config.fetch)))
}

#[cfg(not(feature = "headless"))]
fn headless_source(_config: &Config) -> ScholarResult<Box<dyn PageSource>> {
    Err(ScholarError::Config(anyhow::anyhow!(
        "headless strategy requires building with the `headless` feature"
    )))
}

/// What the person at the form sees when a request fails.
pub fn user_message(error: &ScholarError) -> String {
    match error {
        ScholarError::InvalidInput(_) => "Please enter the researcher's profile URL.".to_string(),
        ScholarError::AccessDenied { .. } => "Access blocked (403)! Set SERPAPI_KEY to use the API instead, or run from a VPS or another server.".to_string(),
        ScholarError::HttpStatus { .. } | ScholarError::HttpRequest(_) => format!("HTTP error: {}", error),
        ScholarError::FetchExhausted { .. } => error.to_string(),
        _ => format!("An error occurred while fetching: {}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_distinguish_403() {
        let denied = ScholarError::AccessDenied { url: "u".into() };
        let other = ScholarError::HttpStatus { status: 500, url: "u".into() };
        assert!(user_message(&denied).contains("403"));
        assert!(user_message(&denied).contains("SERPAPI_KEY"));
        assert_eq!(user_message(&other), "HTTP error: HTTP error 500 from u");
    }

    #[test]
    fn empty_input_message() {
        let err = ScholarError::InvalidInput("x".into());
        assert_eq!(user_message(&err), "Please enter the researcher's profile URL.");
    }

    #[test]
    fn unexpected_errors_are_wrapped() {
        let err = ScholarError::Parse("bad".into());
        assert!(user_message(&err).starts_with("An error occurred while fetching"));
    }

    #[cfg(not(feature = "headless"))]
    #[test]
    fn headless_needs_the_feature() {
        let config = Config {
            strategy: Strategy::Headless,
            ..Config::default()
        };
        assert!(matches!(ScholarService::new(&config), Err(ScholarError::Config(_))));
    }

    #[test]
    fn strategy_selects_the_source() {
        let direct = ScholarService::new(&Config::default()).unwrap();
        assert_eq!(direct.source_name(), "direct");

        let proxy = ScholarService::new(&Config {
            strategy: Strategy::Proxy,
            ..Config::default()
        })
        .unwrap();
        assert_eq!(proxy.source_name(), "proxy");
    }
}
