use scraper::Html;

use crate::error::ScrapeError;
use crate::fetch::Fetch;
use crate::html;
use crate::site::{Author, Site};

const LAST_PAGE_LINK: &str = "li>a.skin-paginationEnd";

/// Number of entry-list pages an author has, read from the "last page" pagination link.
pub fn count_pages(fetcher: &dyn Fetch, site: &Site, author: &Author) -> Result<u32, ScrapeError> {
    let url = site.index_url(author)?;
    let body = fetcher.fetch_text(&url)?;
    let doc = Html::parse_document(&body);

    let link = html::first(&doc, LAST_PAGE_LINK)?
        .ok_or_else(|| ScrapeError::NotFound(format!("{LAST_PAGE_LINK} in {url}")))?;
    let href = link
        .value()
        .attr("href")
        .ok_or_else(|| ScrapeError::NotFound(format!("href of {LAST_PAGE_LINK} in {url}")))?;

    let pages = page_number_from_href(href)?;
    tracing::debug!(%url, href, pages, "found last listing page");
    Ok(pages)
}

/// Parses `.../entrylist-<n>.html` into `n`.
pub fn page_number_from_href(href: &str) -> Result<u32, ScrapeError> {
    let path = href.split(['?', '#']).next().unwrap_or_default();
    let file_name = path.rsplit('/').next().unwrap_or_default();

    let parts = file_name.split('-').collect::<Vec<_>>();
    let [_, page] = parts.as_slice() else {
        return Err(ScrapeError::Parse(format!("cannot split page link: {href}")));
    };

    let token = page.strip_suffix(".html").unwrap_or(*page);
    let number = token
        .parse::<u32>()
        .map_err(|err| ScrapeError::Parse(format!("page number {token:?} in {href}: {err}")))?;
    if number == 0 {
        return Err(ScrapeError::Parse(format!("page number must be positive: {href}")));
    }
    Ok(number)
}
