use async_trait::async_trait;
use crate::error::{ScholarError, ScholarResult};

/// Anything that can turn a profile URL into raw page markup.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> ScholarResult<String>;
    fn name(&self) -> &'static str;
}

/// Rejects empty input before any network activity.
pub fn require_url(input: &str) -> ScholarResult<&str> {
    let url = input.trim();
    if url.is_empty() {
        return Err(ScholarError::InvalidInput(
            "please enter the researcher's profile URL".to_string(),
        ));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_is_rejected() {
        assert!(matches!(require_url(""), Err(ScholarError::InvalidInput(_))));
        assert!(matches!(require_url(" \t\n"), Err(ScholarError::InvalidInput(_))));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            require_url("  https://scholar.google.com/citations?user=X ").unwrap(),
            "https://scholar.google.com/citations?user=X"
        );
    }
}
