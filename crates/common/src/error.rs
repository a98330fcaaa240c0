use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScholarError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Access denied (403) by {url}. The site is blocking automated requests: set SERPAPI_KEY to use the API instead, or run from a different network or server.")]
    AccessDenied { url: String },

    #[error("HTTP error {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Fetch failed after {attempts} attempts (the site is probably rate limiting requests): {last_error}")]
    FetchExhausted { attempts: u32, last_error: String },

    #[error("Headless render failed: {0}")]
    Render(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("HTML parsing failed: {0}")]
    HtmlParse(String),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScholarError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ScholarError::AccessDenied { .. } => Some(403),
            ScholarError::HttpStatus { status, .. } => Some(*status),
            ScholarError::HttpRequest(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_access_denied(&self) -> bool {
        self.status() == Some(403)
    }

    /// Maps an unsuccessful response status onto the matching variant.
    pub fn from_status(status: u16, url: &str) -> Self {
        if status == 403 {
            ScholarError::AccessDenied { url: url.to_string() }
        } else {
            ScholarError::HttpStatus {
                status,
                url: url.to_string(),
            }
        }
    }
}

pub type ScholarResult<T> = Result<T, ScholarError>;
