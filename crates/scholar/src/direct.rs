use std::time::Duration;

use async_trait::async_trait;
use common::{FetchConfig, HeaderStrategy, PageSource, ScholarError, ScholarResult};
use rand::seq::SliceRandom;
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use tracing::{info, warn};

use common::config::DEFAULT_USER_AGENT;

pub fn http_client(config: &FetchConfig) -> ScholarResult<Client> {
    Ok(Client::builder().timeout(config.timeout).build()?)
}

/// Plain GET against the profile site with bounded retries.
pub struct DirectSource {
    client: Client,
    headers: HeaderStrategy,
    accept_language: String,
    max_attempts: u32,
    retry_delay: Duration,
}

impl DirectSource {
    pub fn new(client: Client, config: &FetchConfig) -> Self {
        Self {
            client,
            headers: config.headers.clone(),
            accept_language: config.accept_language.clone(),
            max_attempts: config.max_attempts.max(1),
            retry_delay: config.retry_delay,
        }
    }

    fn user_agent(&self) -> String {
        match &self.headers {
            HeaderStrategy::Static(ua) => ua.clone(),
            HeaderStrategy::Rotating(pool) => pool
                .choose(&mut rand::thread_rng())
                .cloned()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }

    async fn attempt(&self, url: &str) -> ScholarResult<String> {
        let user_agent = self.user_agent();
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .header(ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScholarError::from_status(status.as_u16(), url));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageSource for DirectSource {
    async fn fetch(&self, url: &str) -> ScholarResult<String> {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            match self.attempt(url).await {
                Ok(body) => {
                    info!("Fetched {} on attempt {}/{} ({} bytes)", url, attempt, self.max_attempts, body.len());
                    return Ok(body);
                }
                Err(e) => {
                    warn!("Attempt {}/{} for {} failed: {}", attempt, self.max_attempts, url, e);
                    last_error = Some(e);
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        match last_error {
            Some(e) if e.is_access_denied() => Err(ScholarError::AccessDenied { url: url.to_string() }),
            Some(e) if self.max_attempts == 1 => Err(e),
            Some(e) => Err(ScholarError::FetchExhausted {
                attempts: self.max_attempts,
                last_error: e.to_string(),
            }),
            None => Err(ScholarError::FetchExhausted {
                attempts: 0,
                last_error: "no attempt was made".to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_headers_always_use_the_same_agent() {
        let config = FetchConfig::default();
        let source = DirectSource::new(Client::new(), &config);
        assert_eq!(source.user_agent(), DEFAULT_USER_AGENT);
        assert_eq!(source.user_agent(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn rotating_headers_pick_from_the_pool() {
        let pool = vec!["agent-a".to_string(), "agent-b".to_string()];
        let config = FetchConfig {
            headers: HeaderStrategy::Rotating(pool.clone()),
            ..FetchConfig::default()
        };
        let source = DirectSource::new(Client::new(), &config);
        for _ in 0..20 {
            assert!(pool.contains(&source.user_agent()));
        }
    }

    #[test]
    fn empty_pool_falls_back_to_default_agent() {
        let config = FetchConfig {
            headers: HeaderStrategy::Rotating(Vec::new()),
            ..FetchConfig::default()
        };
        let source = DirectSource::new(Client::new(), &config);
        assert_eq!(source.user_agent(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn zero_attempts_is_clamped_to_one() {
        let config = FetchConfig {
            max_attempts: 0,
            ..FetchConfig::default()
        };
        assert_eq!(DirectSource::new(Client::new(), &config).max_attempts, 1);
    }
}
