use scraper::Html;

use crate::entry::EntryRef;
use crate::error::ScrapeError;
use crate::fetch::Fetch;
use crate::html;
use crate::pagination::count_pages;
use crate::site::{Author, Site};

const ARCHIVE_ITEM: &str = "ul.skin-archiveList>li.skin-borderQuiet";
const ITEM_LINK: &str = "h2>a";

/// Walks every entry-list page of `author` and collects entry references in page, then document, order.
pub fn list_entries(
    fetcher: &dyn Fetch,
    site: &Site,
    author: &Author,
) -> Result<Vec<EntryRef>, ScrapeError> {
    let pages = count_pages(fetcher, site, author)?;
    tracing::info!(%author, pages, "listing pages found");

    let mut entries = Vec::new();
    for page in 1..=pages {
        let url = site.listing_url(author, page)?;
        let body = fetcher.fetch_text(&url)?;
        let found = entry_refs_in_page(&body, page)?;
        tracing::debug!(%url, count = found.len(), "listing page scanned");
        entries.extend(found);
    }
    Ok(entries)
}

pub fn entry_refs_in_page(body: &str, page: u32) -> Result<Vec<EntryRef>, ScrapeError> {
    let doc = Html::parse_document(body);
    let item_selector = html::selector(ARCHIVE_ITEM)?;
    let link_selector = html::selector(ITEM_LINK)?;

    let mut refs = Vec::new();
    for (index, item) in doc.select(&item_selector).enumerate() {
        let href = item
            .select(&link_selector)
            .next()
            .and_then(|link| link.value().attr("href"));
        match href {
            Some(href) if !href.trim().is_empty() => refs.push(EntryRef::new(href.trim())),
            _ => tracing::warn!(page, index, "archive item has no entry link; skipping"),
        }
    }
    Ok(refs)
}
