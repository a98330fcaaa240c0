use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_ORIGIN: &str = "https://scholar.google.com";
pub const DEFAULT_SERPAPI_URL: &str = "https://serpapi.com/search.json";
pub const DEFAULT_SNAPSHOT_FILE: &str = "scholar_full_data.json";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";

pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

pub const USER_AGENT_POOL: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:118.0) Gecko/20100101 Firefox/118.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36 Edg/117.0.2045.43",
];

pub const PROXY_POOL: &[&str] = &[
    "https://api.allorigins.win/raw?url=",
    "https://corsproxy.io/?",
    "https://thingproxy.freeboard.io/fetch/",
];

/// How markup is obtained when the structured API is not used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Direct,
    Proxy,
    Headless,
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "direct" => Ok(Strategy::Direct),
            "proxy" => Ok(Strategy::Proxy),
            "headless" => Ok(Strategy::Headless),
            other => anyhow::bail!("unknown fetch strategy '{}' (expected direct, proxy or headless)", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderStrategy {
    /// One browser-like User-Agent on every attempt.
    Static(String),
    /// A random pick from the pool on every attempt.
    Rotating(Vec<String>),
}

impl Default for HeaderStrategy {
    fn default() -> Self {
        HeaderStrategy::Static(DEFAULT_USER_AGENT.to_string())
    }
}

impl HeaderStrategy {
    pub fn rotating_default() -> Self {
        HeaderStrategy::Rotating(USER_AGENT_POOL.iter().map(|s| s.to_string()).collect())
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub timeout: Duration,
    pub headers: HeaderStrategy,
    pub accept_language: String,
    pub proxy_prefixes: Vec<String>,
    pub settle_time: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(2),
            timeout: Duration::from_secs(15),
            headers: HeaderStrategy::default(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            proxy_prefixes: PROXY_POOL.iter().map(|s| s.to_string()).collect(),
            settle_time: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaginationConfig {
    pub enabled: bool,
    pub page_size: usize,
    pub page_delay: Duration,
    pub max_pages: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            page_size: 20,
            page_delay: Duration::from_secs(1),
            max_pages: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub serpapi_key: Option<String>,
    pub serpapi_url: String,
    pub host: String,
    pub port: u16,
    pub strategy: Strategy,
    pub origin: String,
    pub fetch: FetchConfig,
    pub pagination: PaginationConfig,
    pub snapshot_path: Option<PathBuf>,
    pub failure_log_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serpapi_key: None,
            serpapi_url: DEFAULT_SERPAPI_URL.to_string(),
            host: "0.0.0.0".to_string(),
            port: 5000,
            strategy: Strategy::Direct,
            origin: DEFAULT_ORIGIN.to_string(),
            fetch: FetchConfig::default(),
            pagination: PaginationConfig::default(),
            snapshot_path: Some(PathBuf::from(DEFAULT_SNAPSHOT_FILE)),
            failure_log_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Unset keys and
    /// unparseable numbers fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let fetch_defaults = FetchConfig::default();
        let page_defaults = PaginationConfig::default();

        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let parsed = |key: &str| non_blank(key).and_then(|v| v.parse::<u64>().ok());
        let flag = |key: &str| {
            non_blank(key)
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(false)
        };

        let strategy = non_blank("SCHOLAR_STRATEGY")
            .map(|s| s.parse::<Strategy>())
            .transpose()
            .context("SCHOLAR_STRATEGY is invalid")?
            .unwrap_or(defaults.strategy);

        let headers = if flag("SCHOLAR_ROTATE_USER_AGENTS") {
            HeaderStrategy::rotating_default()
        } else {
            HeaderStrategy::default()
        };

        let fetch = FetchConfig {
            max_attempts: parsed("SCHOLAR_MAX_ATTEMPTS")
                .map(|n| n.max(1) as u32)
                .unwrap_or(fetch_defaults.max_attempts),
            retry_delay: parsed("SCHOLAR_RETRY_DELAY_SECS")
                .map(Duration::from_secs)
                .unwrap_or(fetch_defaults.retry_delay),
            timeout: parsed("SCHOLAR_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(fetch_defaults.timeout),
            headers,
            settle_time: parsed("SCHOLAR_SETTLE_SECS")
                .map(Duration::from_secs)
                .unwrap_or(fetch_defaults.settle_time),
            ..fetch_defaults
        };

        let pagination = PaginationConfig {
            enabled: flag("SCHOLAR_PAGINATE"),
            page_delay: parsed("SCHOLAR_PAGE_DELAY_SECS")
                .map(Duration::from_secs)
                .unwrap_or(page_defaults.page_delay),
            max_pages: parsed("SCHOLAR_MAX_PAGES")
                .map(|n| n.max(1) as usize)
                .unwrap_or(page_defaults.max_pages),
            ..page_defaults
        };

        // An explicitly empty SCHOLAR_JSON_FILE turns the snapshot off.
        let snapshot_path = match lookup("SCHOLAR_JSON_FILE") {
            Some(v) if v.trim().is_empty() => None,
            Some(v) => Some(PathBuf::from(v.trim())),
            None => defaults.snapshot_path,
        };

        Ok(Config {
            serpapi_key: non_blank("SERPAPI_KEY"),
            serpapi_url: non_blank("SERPAPI_URL").unwrap_or(defaults.serpapi_url),
            host: non_blank("HOST").unwrap_or(defaults.host),
            port: non_blank("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            strategy,
            origin: non_blank("SCHOLAR_ORIGIN")
                .map(|o| o.trim_end_matches('/').to_string())
                .unwrap_or(defaults.origin),
            fetch,
            pagination,
            snapshot_path,
            failure_log_path: non_blank("SCHOLAR_ERROR_LOG").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.serpapi_key, None);
        assert_eq!(config.port, 5000);
        assert_eq!(config.strategy, Strategy::Direct);
        assert_eq!(config.fetch.max_attempts, 3);
        assert_eq!(config.fetch.retry_delay, Duration::from_secs(2));
        assert_eq!(config.fetch.headers, HeaderStrategy::default());
        assert!(!config.pagination.enabled);
        assert_eq!(config.pagination.page_size, 20);
        assert_eq!(config.snapshot_path, Some(PathBuf::from(DEFAULT_SNAPSHOT_FILE)));
    }

    #[test]
    fn blank_api_key_counts_as_unset() {
        let config = config_from(&[("SERPAPI_KEY", "   ")]).unwrap();
        assert_eq!(config.serpapi_key, None);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("SERPAPI_KEY", "secret"),
            ("PORT", "8080"),
            ("SCHOLAR_STRATEGY", "Proxy"),
            ("SCHOLAR_MAX_ATTEMPTS", "5"),
            ("SCHOLAR_RETRY_DELAY_SECS", "4"),
            ("SCHOLAR_ROTATE_USER_AGENTS", "true"),
            ("SCHOLAR_PAGINATE", "1"),
            ("SCHOLAR_ORIGIN", "https://scholar.example.org/"),
            ("SCHOLAR_JSON_FILE", ""),
            ("SCHOLAR_ERROR_LOG", "errors.log"),
        ])
        .unwrap();

        assert_eq!(config.serpapi_key.as_deref(), Some("secret"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.strategy, Strategy::Proxy);
        assert_eq!(config.fetch.max_attempts, 5);
        assert_eq!(config.fetch.retry_delay, Duration::from_secs(4));
        assert!(matches!(config.fetch.headers, HeaderStrategy::Rotating(ref pool) if pool.len() == USER_AGENT_POOL.len()));
        assert!(config.pagination.enabled);
        assert_eq!(config.origin, "https://scholar.example.org");
        assert_eq!(config.snapshot_path, None);
        assert_eq!(config.failure_log_path, Some(PathBuf::from("errors.log")));
    }

    #[test]
    fn garbage_numbers_fall_back() {
        let config = config_from(&[("PORT", "http"), ("SCHOLAR_MAX_ATTEMPTS", "0")]).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.fetch.max_attempts, 1);
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        assert!(config_from(&[("SCHOLAR_STRATEGY", "carrier-pigeon")]).is_err());
    }
}
