use common::{ScholarError, ScholarResult};
use reqwest::Client;
use serde_json::Value;
use tracing::info;

use crate::models::{
    Metrics, ProfileRecord, PublicationRecord, NO_LINK, UNKNOWN_AFFILIATION, UNKNOWN_CONTACT,
    UNKNOWN_NAME, UNKNOWN_YEAR, UNTITLED, ZERO,
};

/// Client for SerpApi's `google_scholar_author` engine.
#[derive(Clone)]
pub struct SerpApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SerpApiClient {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub async fn fetch_author(&self, author_id: &str) -> ScholarResult<Value> {
        info!("Fetching author {} via SerpApi", author_id);
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("engine", "google_scholar_author"),
                ("author_id", author_id),
                ("api_key", self.api_key.as_str()),
                ("hl", "en"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScholarError::Api(format!(
                "SerpApi request failed: {} - {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let payload: Value = response.json().await?;
        if let Some(message) = payload.get("error").and_then(Value::as_str) {
            return Err(ScholarError::Api(format!("SerpApi returned an error: {}", message)));
        }
        Ok(payload)
    }

    pub async fn fetch_profile(&self, author_id: &str) -> ScholarResult<ProfileRecord> {
        let payload = self.fetch_author(author_id).await?;
        Ok(normalize_payload(&payload))
    }
}

/// Text of a JSON string or number. Blank strings count as absent.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First of several alias keys that yields text.
fn text_any(object: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text(object.get(*key)))
}

/// `cited_by` is either `{ "value": n }` or missing, with a flat fallback key.
fn cited_by_value(object: &Value, flat_key: &str) -> Option<String> {
    text(object.get("cited_by").and_then(|c| c.get("value"))).or_else(|| text(object.get(flat_key)))
}

fn topics(author: &Value) -> Vec<String> {
    author
        .get("interests")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| text(Some(item)).or_else(|| text(item.get("title"))))
                .collect()
        })
        .unwrap_or_default()
}

/// Looks up `{ "<metric>": { "all": .., "since_YYYY": .. } }` in `cited_by.table`.
fn table_metric(payload: &Value, metric: &str) -> (Option<String>, Option<String>) {
    let entry = payload
        .get("cited_by")
        .and_then(|c| c.get("table"))
        .and_then(Value::as_array)
        .and_then(|rows| rows.iter().find_map(|row| row.get(metric)));

    let Some(entry) = entry else {
        return (None, None);
    };
    let all = text(entry.get("all"));
    let recent = entry
        .as_object()
        .and_then(|fields| {
            fields
                .iter()
                .find(|(key, _)| key.starts_with("since"))
                .map(|(_, v)| v)
        })
        .and_then(|v| text(Some(v)));
    (all, recent)
}

fn metrics(payload: &Value, author: &Value) -> Metrics {
    let (citations_all, citations_recent) = table_metric(payload, "citations");
    let (h_all, h_recent) = table_metric(payload, "h_index");
    let (i10_all, i10_recent) = table_metric(payload, "i10_index");

    let or_zero = |v: Option<String>| v.unwrap_or_else(|| ZERO.to_string());
    Metrics {
        citations_total: or_zero(citations_all.or_else(|| cited_by_value(author, "citations"))),
        citations_recent: or_zero(citations_recent),
        h_index_total: or_zero(h_all.or_else(|| text_any(author, &["hindex", "h_index"]))),
        h_index_recent: or_zero(h_recent),
        i10_total: or_zero(i10_all.or_else(|| text_any(author, &["i10index", "i10_index"]))),
        i10_recent: or_zero(i10_recent),
    }
}

fn publication(item: &Value) -> PublicationRecord {
    PublicationRecord {
        title: text(item.get("title")).unwrap_or_else(|| UNTITLED.to_string()),
        authors_summary: text(item.get("authors")).unwrap_or_default(),
        venue: text_any(item, &["venue", "publication"]).unwrap_or_default(),
        citation_count: cited_by_value(item, "num_citations").unwrap_or_else(|| ZERO.to_string()),
        year: text(item.get("year")).unwrap_or_else(|| UNKNOWN_YEAR.to_string()),
        link: text_any(item, &["link", "source"]).unwrap_or_else(|| NO_LINK.to_string()),
    }
}

/// Maps a SerpApi author payload onto the same record shape the page
/// extractor produces, applying the same defaults.
pub fn normalize_payload(payload: &Value) -> ProfileRecord {
    let empty = Value::Null;
    let author = payload.get("author").unwrap_or(&empty);

    let articles = ["articles", "publications"]
        .iter()
        .filter_map(|key| payload.get(*key).and_then(Value::as_array))
        .find(|items| !items.is_empty());

    ProfileRecord {
        name: text_any(author, &["name", "author_name"]).unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        affiliation: text_any(author, &["affiliations", "affiliation"])
            .unwrap_or_else(|| UNKNOWN_AFFILIATION.to_string()),
        contact: text(author.get("email")).unwrap_or_else(|| UNKNOWN_CONTACT.to_string()),
        topics: topics(author),
        image_url: text_any(author, &["thumbnail", "author_picture", "image"]),
        metrics: metrics(payload, author),
        publications: articles
            .map(|items| items.iter().map(publication).collect())
            .unwrap_or_default(),
    }
}
