use url::Url;

use crate::error::ScrapeError;

pub const DEFAULT_DOMAIN: &str = "https://ameblo.jp";

/// URL templates of the blog service, rooted at a domain (or a mirror under a path prefix).
#[derive(Debug, Clone)]
pub struct Site {
    base: Url,
}

impl Site {
    pub fn new(domain: &str) -> Result<Self, ScrapeError> {
        let mut base = Url::parse(domain)
            .map_err(|err| ScrapeError::Parse(format!("domain {domain}: {err}")))?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(ScrapeError::Parse(format!(
                "domain must be http/https: {domain}"
            )));
        }
        base.set_query(None);
        base.set_fragment(None);
        let path = base.path().trim_end_matches('/').to_owned();
        base.set_path(&format!("{path}/"));
        Ok(Self { base })
    }

    pub fn index_url(&self, author: &Author) -> Result<Url, ScrapeError> {
        self.join(&format!("{author}/entrylist.html"))
    }

    pub fn listing_url(&self, author: &Author, page: u32) -> Result<Url, ScrapeError> {
        self.join(&format!("{author}/entrylist-{page}.html"))
    }

    /// Resolves an entry reference. Absolute references are kept; paths are appended to the base.
    pub fn entry_url(&self, reference: &str) -> Result<Url, ScrapeError> {
        if let Ok(url) = Url::parse(reference) {
            return Ok(url);
        }
        if reference.starts_with("//") {
            return self.join(reference);
        }
        self.join(reference.trim_start_matches('/'))
    }

    fn join(&self, path: &str) -> Result<Url, ScrapeError> {
        self.base
            .join(path)
            .map_err(|err| ScrapeError::Parse(format!("join {path} onto {}: {err}", self.base)))
    }
}

/// Blog author identifier: one path segment of ASCII letters, digits, `-` or `_`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author(String);

impl Author {
    pub fn parse(raw: &str) -> Result<Self, ScrapeError> {
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ScrapeError::Parse(format!(
                "author must be a single path segment of [A-Za-z0-9_-]: {raw:?}"
            )));
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
