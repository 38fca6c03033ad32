use scraper::Html;
use url::Url;

use crate::date::PublishedAt;
use crate::error::ScrapeError;
use crate::fetch::Fetch;
use crate::html;
use crate::site::Site;

const TITLE: &str = "h1.skin-entryTitle";
const PUBDATE: &str = "p.skin-entryPubdate>time";
const PUBDATE_DECORATION: &str = "span";
const BODY: &str = "div.skin-entryBody";
const IMAGE: &str = "img";
const PLACEHOLDER_SCHEME: &str = "file";

/// Reference to one blog entry as captured from a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRef(String);

impl EntryRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug)]
enum Document {
    Unfetched,
    Loaded(Html),
}

/// A blog entry whose page is fetched on first access and whose fields are computed once.
#[derive(Debug)]
pub struct Entry {
    reference: EntryRef,
    url: Url,
    document: Document,
    title: Option<String>,
    date: Option<PublishedAt>,
    images: Option<Vec<String>>,
}

impl Entry {
    pub fn new(site: &Site, reference: EntryRef) -> Result<Self, ScrapeError> {
        let url = site.entry_url(reference.as_str())?;
        Ok(Self {
            reference,
            url,
            document: Document::Unfetched,
            title: None,
            date: None,
            images: None,
        })
    }

    pub fn reference(&self) -> &EntryRef {
        &self.reference
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self.document, Document::Loaded(_))
    }

    fn document(&mut self, fetcher: &dyn Fetch) -> Result<&Html, ScrapeError> {
        if let Document::Unfetched = self.document {
            let body = fetcher.fetch_text(&self.url)?;
            self.document = Document::Loaded(Html::parse_document(&body));
        }
        match &self.document {
            Document::Loaded(doc) => Ok(doc),
            Document::Unfetched => unreachable!("document loaded above"),
        }
    }

    pub fn title(&mut self, fetcher: &dyn Fetch) -> Result<&str, ScrapeError> {
        if self.title.is_none() {
            let doc = self.document(fetcher)?;
            let title = html::first(doc, TITLE)?
                .map(|el| el.text().collect::<String>())
                .unwrap_or_default();
            self.title = Some(title.trim().to_owned());
        }
        Ok(self.title.as_deref().unwrap_or_default())
    }

    pub fn date(&mut self, fetcher: &dyn Fetch) -> Result<PublishedAt, ScrapeError> {
        if let Some(date) = self.date {
            return Ok(date);
        }
        let url = self.url.clone();
        let doc = self.document(fetcher)?;
        let time = html::first(doc, PUBDATE)?
            .ok_or_else(|| ScrapeError::NotFound(format!("{PUBDATE} in {url}")))?;
        let date = PublishedAt::parse(&html::text_without(time, PUBDATE_DECORATION))?;
        self.date = Some(date);
        Ok(date)
    }

    pub fn images(&mut self, fetcher: &dyn Fetch) -> Result<&[String], ScrapeError> {
        if self.images.is_none() {
            let doc = self.document(fetcher)?;
            let images = image_sources(doc)?;
            self.images = Some(images);
        }
        Ok(self.images.as_deref().unwrap_or_default())
    }
}

fn image_sources(doc: &Html) -> Result<Vec<String>, ScrapeError> {
    let Some(body) = html::first(doc, BODY)? else {
        return Ok(Vec::new());
    };
    let image = html::selector(IMAGE)?;
    Ok(body
        .select(&image)
        .filter_map(|img| img.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty() && !src.starts_with('#'))
        .filter(|src| !src.starts_with(PLACEHOLDER_SCHEME))
        .map(str::to_owned)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::fetch::stub::StubFetcher;
    use crate::site::DEFAULT_DOMAIN;

    const URL: &str = "https://ameblo.jp/alice/entry-1.html";

    fn page(body: &str) -> String {
        format!(
            r#"<html><body><article class="skin-entry">
<h1 class="skin-entryTitle"><a href="/alice/entry-1.html">Spring  trip</a></h1>
<p class="skin-entryPubdate"><time datetime="2020-05-11" class="skin-textQuiet">2020-05-11 12:34:56<span class="skin-textQuiet">NEW !</span></time></p>
<div class="skin-entryBody">{body}</div>
</article></body></html>"#
        )
    }

    fn entry() -> Entry {
        let site = Site::new(DEFAULT_DOMAIN).unwrap();
        Entry::new(&site, EntryRef::new("/alice/entry-1.html")).unwrap()
    }

    #[test]
    fn extracts_title_date_and_images() {
        let fetcher = StubFetcher::default().with(
            URL,
            page(r#"<p><img src="file://x.png"><a href="/a"><img src="https://a/b.jpg"></a><img alt="none"></p>"#),
        );
        let mut entry = entry();

        assert_eq!(entry.images(&fetcher).unwrap(), ["https://a/b.jpg"]);
        assert_eq!(entry.title(&fetcher).unwrap(), "Spring  trip");
        assert_eq!(entry.date(&fetcher).unwrap().stamp(), "2020-05-11_12-34-56");
        assert_eq!(fetcher.count(URL), 1);
    }

    #[test]
    fn blank_and_fragment_sources_are_dropped() {
        let fetcher = StubFetcher::default().with(
            URL,
            page(r##"<img src=""><img src="   "><img src="#top"><img src=" /img/1.jpg ">"##),
        );
        assert_eq!(entry().images(&fetcher).unwrap(), ["/img/1.jpg"]);
    }

    #[test]
    fn images_outside_body_are_ignored() {
        let html = page("").replace(
            "<h1 ",
            r#"<img src="https://a/header.jpg"><h1 "#,
        );
        let fetcher = StubFetcher::default().with(URL, html);
        assert!(entry().images(&fetcher).unwrap().is_empty());
    }

    #[test]
    fn missing_title_is_empty_not_error() {
        let fetcher = StubFetcher::default().with(URL, "<html><body></body></html>");
        let mut entry = entry();
        assert_eq!(entry.title(&fetcher).unwrap(), "");
        assert_eq!(entry.date(&fetcher).unwrap_err().kind(), ErrorKind::NotFound);
        assert!(entry.images(&fetcher).unwrap().is_empty());
        assert_eq!(fetcher.count(URL), 1);
    }

    #[test]
    fn unparsable_date_is_parse_error() {
        let html = page("").replace("2020-05-11 12:34:56", "sometime");
        let fetcher = StubFetcher::default().with(URL, html);
        assert_eq!(entry().date(&fetcher).unwrap_err().kind(), ErrorKind::Parse);
    }

    #[test]
    fn failed_fetch_leaves_document_unfetched() {
        let mut entry = entry();
        let err = entry.title(&StubFetcher::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(!entry.is_fetched());

        let fetcher = StubFetcher::default().with(URL, page(""));
        assert_eq!(entry.title(&fetcher).unwrap(), "Spring  trip");
        assert!(entry.is_fetched());
    }
}
