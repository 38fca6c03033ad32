use std::io::Read;

use reqwest::header::ACCEPT;
use url::Url;

use crate::error::ScrapeError;

const USER_AGENT: &str = concat!("ameblo-dl/", env!("CARGO_PKG_VERSION"));

/// Blocking HTTP access used by the scraper.
pub trait Fetch {
    /// GET `url` and return the body as text.
    fn fetch_text(&self, url: &Url) -> Result<String, ScrapeError>;

    /// GET `url` and return the body as a reader. The status is checked before returning.
    fn open(&self, url: &Url) -> Result<Box<dyn Read>, ScrapeError>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> reqwest::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }

    fn get(&self, url: &Url, accept: &str) -> Result<reqwest::blocking::Response, ScrapeError> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, accept)
            .send()
            .map_err(|source| ScrapeError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl Fetch for HttpFetcher {
    fn fetch_text(&self, url: &Url) -> Result<String, ScrapeError> {
        self.get(url, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")?
            .text()
            .map_err(|source| ScrapeError::Network {
                url: url.to_string(),
                source,
            })
    }

    fn open(&self, url: &Url) -> Result<Box<dyn Read>, ScrapeError> {
        let response = self.get(url, "image/*,*/*;q=0.8")?;
        Ok(Box::new(response))
    }
}
