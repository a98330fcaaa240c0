use async_trait::async_trait;
use common::{FetchConfig, PageSource, ScholarError, ScholarResult};
use rand::seq::SliceRandom;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use tracing::info;
use url::form_urlencoded;

use common::config::DEFAULT_USER_AGENT;

/// Routes the request through a public read-through relay: one randomly
/// chosen prefix is glued in front of the target URL. Single attempt.
///
/// Prefixes ending in `=` or `?` carry the target as a query value, so the
/// target is form-encoded there; otherwise its own `&` parameters would be
/// read as the relay's.
pub struct ProxySource {
    client: Client,
    prefixes: Vec<String>,
}

impl ProxySource {
    pub fn new(client: Client, config: &FetchConfig) -> ScholarResult<Self> {
        if config.proxy_prefixes.is_empty() {
            return Err(ScholarError::Config(anyhow::anyhow!(
                "proxy strategy selected but the relay pool is empty"
            )));
        }
        Ok(Self {
            client,
            prefixes: config.proxy_prefixes.clone(),
        })
    }

    fn relay_url(&self, url: &str) -> String {
        let prefix = self
            .prefixes
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or_default();
        if prefix.ends_with('=') || prefix.ends_with('?') {
            let encoded: String = form_urlencoded::byte_serialize(url.as_bytes()).collect();
            format!("{}{}", prefix, encoded)
        } else {
            format!("{}{}", prefix, url)
        }
    }
}

#[async_trait]
impl PageSource for ProxySource {
    async fn fetch(&self, url: &str) -> ScholarResult<String> {
        let relayed = self.relay_url(url);
        info!("Fetching {} through relay {}", url, relayed);

        let response = self
            .client
            .get(&relayed)
            .header(USER_AGENT, DEFAULT_USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScholarError::from_status(status.as_u16(), &relayed));
        }
        Ok(response.text().await?)
    }

    fn name(&self) -> &'static str {
        "proxy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_url_prepends_a_pool_prefix() {
        let config = FetchConfig {
            proxy_prefixes: vec!["https://relay.example/raw?url=".to_string()],
            ..FetchConfig::default()
        };
        let source = ProxySource::new(Client::new(), &config).unwrap();
        assert_eq!(
            source.relay_url("https://scholar.google.com/citations?user=A&hl=en"),
            "https://relay.example/raw?url=https%3A%2F%2Fscholar.google.com%2Fcitations%3Fuser%3DA%26hl%3Den"
        );
    }

    #[test]
    fn path_style_prefix_keeps_the_target_verbatim() {
        let config = FetchConfig {
            proxy_prefixes: vec!["https://relay.example/fetch/".to_string()],
            ..FetchConfig::default()
        };
        let source = ProxySource::new(Client::new(), &config).unwrap();
        assert_eq!(
            source.relay_url("https://scholar.google.com/citations?user=A&hl=en"),
            "https://relay.example/fetch/https://scholar.google.com/citations?user=A&hl=en"
        );
    }

    #[test]
    fn empty_pool_is_a_config_error() {
        let config = FetchConfig {
            proxy_prefixes: Vec::new(),
            ..FetchConfig::default()
        };
        assert!(matches!(
            ProxySource::new(Client::new(), &config),
            Err(ScholarError::Config(_))
        ));
    }

    #[test]
    fn default_pool_is_used() {
        let source = ProxySource::new(Client::new(), &FetchConfig::default()).unwrap();
        let relayed = source.relay_url("https://scholar.google.com/x");
        assert!(common::config::PROXY_POOL
            .iter()
            .any(|prefix| relayed.starts_with(prefix)));
    }
}
