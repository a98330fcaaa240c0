use common::{PageSource, PaginationConfig, ScholarError, ScholarResult};
use tracing::info;
use url::Url;

use crate::extract::ProfileExtractor;
use crate::models::ProfileRecord;

/// The profile URL with `cstart`/`pagesize` set for the given offset. Any
/// existing values for those two keys are replaced; other parameters keep
/// their order.
pub fn page_url(base: &str, offset: usize, page_size: usize) -> ScholarResult<String> {
    let mut url = Url::parse(base)
        .map_err(|e| ScholarError::Parse(format!("cannot paginate '{}': {}", base, e)))?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "cstart" && key != "pagesize")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("cstart", &offset.to_string())
        .append_pair("pagesize", &page_size.to_string());

    Ok(url.into())
}

/// Walks the publication listing page by page until a page comes back empty.
/// Header fields come from the first page; publications accumulate in page
/// order.
pub async fn collect_pages(
    source: &dyn PageSource,
    extractor: &ProfileExtractor,
    config: &PaginationConfig,
    url: &str,
) -> ScholarResult<ProfileRecord> {
    let page_size = config.page_size.max(1);

    let first_html = source.fetch(&page_url(url, 0, page_size)?).await?;
    let mut profile = extractor.extract(&first_html);
    let mut publications = std::mem::take(&mut profile.publications);
    info!("Page 1 of {} yielded {} publications", url, publications.len());

    let mut last_batch = publications.len();
    let mut pages = 1;
    while last_batch > 0 && pages < config.max_pages {
        tokio::time::sleep(config.page_delay).await;

        let offset = pages * page_size;
        let html = source.fetch(&page_url(url, offset, page_size)?).await?;
        let batch = extractor.extract_publications(&html);
        pages += 1;
        info!("Page {} of {} yielded {} publications", pages, url, batch.len());

        last_batch = batch.len();
        publications.extend(batch);
    }

    Ok(ProfileRecord {
        publications,
        ..profile
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_paging_parameters() {
        assert_eq!(
            page_url("https://scholar.google.com/citations?user=ABC&hl=en", 40, 20).unwrap(),
            "https://scholar.google.com/citations?user=ABC&hl=en&cstart=40&pagesize=20"
        );
    }

    #[test]
    fn replaces_existing_paging_parameters() {
        assert_eq!(
            page_url(
                "https://scholar.google.com/citations?cstart=100&user=ABC&pagesize=100",
                0,
                20
            )
            .unwrap(),
            "https://scholar.google.com/citations?user=ABC&cstart=0&pagesize=20"
        );
    }

    #[test]
    fn unparseable_base_is_an_error() {
        assert!(matches!(page_url("citations?user=ABC", 0, 20), Err(ScholarError::Parse(_))));
    }
}
