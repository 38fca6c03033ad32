use std::fmt;

use chrono::{Datelike as _, NaiveDateTime};

use crate::error::ScrapeError;

const INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
];

/// Publish timestamp of an entry. Directory and file names are all derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PublishedAt(NaiveDateTime);

impl PublishedAt {
    pub fn parse(text: &str) -> Result<Self, ScrapeError> {
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        INPUT_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(&text, format).ok())
            .map(Self)
            .ok_or_else(|| ScrapeError::Parse(format!("publish date {text:?}")))
    }

    /// `YYYY-MM-DD_HH-MM-SS`
    pub fn stamp(&self) -> String {
        self.0.format("%Y-%m-%d_%H-%M-%S").to_string()
    }

    pub fn year_dir(&self) -> String {
        format!("{:04}", self.0.year())
    }

    pub fn month_dir(&self) -> String {
        format!("{:02}", self.0.month())
    }
}

impl fmt::Display for PublishedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stamp())
    }
}
