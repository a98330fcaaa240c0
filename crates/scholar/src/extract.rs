use common::{ScholarError, ScholarResult};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::models::{
    Metrics, ProfileRecord, PublicationRecord, NO_LINK, UNKNOWN_AFFILIATION, UNKNOWN_CONTACT,
    UNKNOWN_NAME, UNKNOWN_YEAR, UNTITLED, ZERO,
};

struct Selectors {
    name: Selector,
    avatar: Selector,
    affiliation: Selector,
    topics: Selector,
    contact: Selector,
    stat_cells: Selector,
    row: Selector,
    title: Selector,
    authors: Selector,
    gray: Selector,
    citations: Selector,
    year: Selector,
}

fn selector(css: &str) -> ScholarResult<Selector> {
    Selector::parse(css)
        .map_err(|e| ScholarError::HtmlParse(format!("Failed to parse selector '{}': {}", css, e)))
}

impl Selectors {
    fn new() -> ScholarResult<Self> {
        Ok(Self {
            name: selector("#gsc_prf_in")?,
            avatar: selector("img#gsc_prf_pup-img")?,
            affiliation: selector("div.gsc_prf_il")?,
            topics: selector("#gsc_prf_int a")?,
            contact: selector("div.gsc_prf_ivh")?,
            stat_cells: selector("table#gsc_rsb_st td.gsc_rsb_std")?,
            row: selector(".gsc_a_tr")?,
            title: selector(".gsc_a_at")?,
            authors: selector(".gsc_a_at + .gs_gray")?,
            gray: selector(".gs_gray")?,
            citations: selector(".gsc_a_c a")?,
            year: selector(".gsc_a_y span")?,
        })
    }
}

/// Turns a Scholar profile page into a [`ProfileRecord`]. Missing elements
/// never fail the extraction; each field falls back to its sentinel.
pub struct ProfileExtractor {
    origin: String,
    selectors: Selectors,
}

impl ProfileExtractor {
    pub fn new(origin: &str) -> ScholarResult<Self> {
        Ok(Self {
            origin: origin.trim_end_matches('/').to_string(),
            selectors: Selectors::new()?,
        })
    }

    pub fn extract(&self, html: &str) -> ProfileRecord {
        let document = Html::parse_document(html);
        let s = &self.selectors;
        let root = document.root_element();

        let stat_cells: Vec<String> = root.select(&s.stat_cells).map(element_text).collect();
        if !stat_cells.is_empty() && stat_cells.len() < 6 {
            debug!("Statistics table has only {} cells, ignoring it", stat_cells.len());
        }

        ProfileRecord {
            name: first_text(root, &s.name).unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            affiliation: first_text(root, &s.affiliation)
                .unwrap_or_else(|| UNKNOWN_AFFILIATION.to_string()),
            contact: first_text(root, &s.contact).unwrap_or_else(|| UNKNOWN_CONTACT.to_string()),
            topics: root
                .select(&s.topics)
                .map(element_text)
                .filter(|t| !t.is_empty())
                .collect(),
            image_url: root
                .select(&s.avatar)
                .next()
                .and_then(|img| img.attr("src"))
                .filter(|src| !src.trim().is_empty())
                .map(|src| self.absolutize(src)),
            metrics: Metrics::from_cells(&stat_cells),
            publications: self.publications_in(root),
        }
    }

    /// Only the publication rows; used for listing pages after the first.
    pub fn extract_publications(&self, html: &str) -> Vec<PublicationRecord> {
        let document = Html::parse_document(html);
        self.publications_in(document.root_element())
    }

    fn publications_in(&self, root: ElementRef<'_>) -> Vec<PublicationRecord> {
        root.select(&self.selectors.row)
            .map(|row| self.publication(row))
            .collect()
    }

    fn publication(&self, row: ElementRef<'_>) -> PublicationRecord {
        let s = &self.selectors;
        let title_anchor = row.select(&s.title).next();

        PublicationRecord {
            title: title_anchor
                .map(element_text)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string()),
            link: title_anchor
                .and_then(|a| a.attr("href"))
                .filter(|href| !href.trim().is_empty())
                .map(|href| self.absolutize(href))
                .unwrap_or_else(|| NO_LINK.to_string()),
            authors_summary: first_text(row, &s.authors).unwrap_or_default(),
            venue: row
                .select(&s.gray)
                .nth(1)
                .map(element_text)
                .unwrap_or_default(),
            citation_count: first_text(row, &s.citations).unwrap_or_else(|| ZERO.to_string()),
            year: first_text(row, &s.year).unwrap_or_else(|| UNKNOWN_YEAR.to_string()),
        }
    }

    /// Site-relative paths get the canonical origin prepended verbatim.
    pub fn absolutize(&self, href: &str) -> String {
        let href = href.trim();
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else if let Some(rest) = href.strip_prefix("//") {
            format!("https://{}", rest)
        } else if href.starts_with('/') {
            format!("{}{}", self.origin, href)
        } else {
            format!("{}/{}", self.origin, href)
        }
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Text of the first match; an empty element counts as missing.
fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}
