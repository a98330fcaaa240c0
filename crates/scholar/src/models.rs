use serde::{Deserialize, Serialize};

pub const UNKNOWN_NAME: &str = "Unknown";
pub const UNKNOWN_AFFILIATION: &str = "Unspecified";
pub const NO_TOPICS: &str = "Unspecified";
pub const UNKNOWN_CONTACT: &str = "Unavailable";
pub const UNTITLED: &str = "Untitled";
pub const UNKNOWN_YEAR: &str = "—";
pub const NO_LINK: &str = "#";
pub const ZERO: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub citations_total: String,
    pub citations_recent: String,
    pub h_index_total: String,
    pub h_index_recent: String,
    pub i10_total: String,
    pub i10_recent: String,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            citations_total: ZERO.to_string(),
            citations_recent: ZERO.to_string(),
            h_index_total: ZERO.to_string(),
            h_index_recent: ZERO.to_string(),
            i10_total: ZERO.to_string(),
            i10_recent: ZERO.to_string(),
        }
    }
}

impl Metrics {
    /// Cells in table order: citations, h-index, i10-index, each as
    /// (all, recent). Anything shorter than six cells is not trusted.
    pub fn from_cells(cells: &[String]) -> Self {
        match cells {
            [c_all, c_recent, h_all, h_recent, i_all, i_recent, ..] => Self {
                citations_total: c_all.clone(),
                citations_recent: c_recent.clone(),
                h_index_total: h_all.clone(),
                h_index_recent: h_recent.clone(),
                i10_total: i_all.clone(),
                i10_recent: i_recent.clone(),
            },
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationRecord {
    pub title: String,
    pub authors_summary: String,
    pub venue: String,
    pub citation_count: String,
    pub year: String,
    pub link: String,
}

impl Default for PublicationRecord {
    fn default() -> Self {
        Self {
            title: UNTITLED.to_string(),
            authors_summary: String::new(),
            venue: String::new(),
            citation_count: ZERO.to_string(),
            year: UNKNOWN_YEAR.to_string(),
            link: NO_LINK.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub name: String,
    pub affiliation: String,
    pub contact: String,
    pub topics: Vec<String>,
    pub image_url: Option<String>,
    pub metrics: Metrics,
    pub publications: Vec<PublicationRecord>,
}

impl Default for ProfileRecord {
    fn default() -> Self {
        Self {
            name: UNKNOWN_NAME.to_string(),
            affiliation: UNKNOWN_AFFILIATION.to_string(),
            contact: UNKNOWN_CONTACT.to_string(),
            topics: Vec::new(),
            image_url: None,
            metrics: Metrics::default(),
            publications: Vec::new(),
        }
    }
}

/// What gets written to the snapshot file: the record plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub url: String,
    #[serde(flatten)]
    pub profile: ProfileRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ProfileRecord {
        ProfileRecord {
            name: "Ada Lovelace".into(),
            topics: vec!["Computing".into(), "Mathematics".into()],
            metrics: Metrics::from_cells(
                &["120", "80", "7", "5", "6", "4"].map(String::from),
            ),
            publications: vec![
                PublicationRecord {
                    title: "Notes on the Analytical Engine".into(),
                    authors_summary: "A Lovelace".into(),
                    venue: "Scientific Memoirs".into(),
                    citation_count: "100".into(),
                    year: "1843".into(),
                    link: "https://scholar.google.com/citations?view_op=view_citation".into(),
                },
                PublicationRecord::default(),
            ],
            ..ProfileRecord::default()
        }
    }

    #[test]
    fn json_layout_uses_camel_case_and_keeps_nulls() {
        let value = serde_json::to_value(ProfileRecord::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Unknown",
                "affiliation": "Unspecified",
                "contact": "Unavailable",
                "topics": [],
                "imageUrl": null,
                "metrics": {
                    "citationsTotal": "0",
                    "citationsRecent": "0",
                    "hIndexTotal": "0",
                    "hIndexRecent": "0",
                    "i10Total": "0",
                    "i10Recent": "0"
                },
                "publications": []
            })
        );
    }

    #[test]
    fn round_trip_preserves_sentinels_and_order() {
        let record = sample();
        let raw = serde_json::to_string_pretty(&record).unwrap();
        let back: ProfileRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.publications[1].title, UNTITLED);
        assert_eq!(back.publications[1].year, UNKNOWN_YEAR);
        assert_eq!(back.publications[1].link, NO_LINK);
    }

    #[test]
    fn snapshot_flattens_the_record() {
        let snapshot = ProfileSnapshot {
            url: "https://scholar.google.com/citations?user=X".into(),
            profile: sample(),
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["url"], "https://scholar.google.com/citations?user=X");
        assert_eq!(value["name"], "Ada Lovelace");
        assert_eq!(value["publications"][0]["authorsSummary"], "A Lovelace");

        let back: ProfileSnapshot = serde_json::from_value(value).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn short_stat_row_is_all_zero() {
        let cells = ["1", "2", "3", "4", "5"].map(String::from);
        assert_eq!(Metrics::from_cells(&cells), Metrics::default());
    }
}
