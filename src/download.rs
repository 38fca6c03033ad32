use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use url::Url;

use crate::cli::{Cli, FailurePolicy};
use crate::date::PublishedAt;
use crate::entry::{Entry, EntryRef};
use crate::error::ScrapeError;
use crate::fetch::{Fetch, HttpFetcher};
use crate::layout::{self, AuthorDir};
use crate::listing::list_entries;
use crate::site::{Author, Site};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub entries: usize,
    pub entries_skipped: usize,
    pub images_saved: usize,
    pub images_existing: usize,
    pub images_failed: usize,
}

pub fn run(cli: Cli) -> anyhow::Result<RunSummary> {
    let author = Author::parse(&cli.author).context("validate author")?;
    let site = Site::new(&cli.domain).context("parse --domain")?;
    let fetcher = HttpFetcher::new().context("build http client")?;
    let out_dir = PathBuf::from(&cli.out).join(author.as_str());

    let summary = Downloader {
        fetcher: &fetcher,
        site: &site,
        policy: cli.on_download_error,
    }
    .download_author(&author, &out_dir)?;

    tracing::info!(
        entries = summary.entries,
        skipped = summary.entries_skipped,
        saved = summary.images_saved,
        existing = summary.images_existing,
        failed = summary.images_failed,
        "done"
    );
    Ok(summary)
}

/// Drives enumeration, extraction and image download for one author, one entry at a time.
pub struct Downloader<'a> {
    pub fetcher: &'a dyn Fetch,
    pub site: &'a Site,
    pub policy: FailurePolicy,
}

enum ImageOutcome {
    Saved(u64),
    Existing,
}

impl Downloader<'_> {
    pub fn download_author(&self, author: &Author, out_dir: &Path) -> anyhow::Result<RunSummary> {
        let refs = list_entries(self.fetcher, self.site, author).context("list entries")?;
        tracing::info!(count = refs.len(), "entries found");

        layout::ensure_dir_all(out_dir).context("create output directory")?;
        let out_dir = std::fs::canonicalize(out_dir)
            .with_context(|| format!("canonicalize output directory: {}", out_dir.display()))?;
        let tree = AuthorDir::new(out_dir);

        let mut summary = RunSummary {
            entries: refs.len(),
            ..RunSummary::default()
        };
        for reference in refs {
            self.download_entry(&tree, reference, &mut summary)?;
        }
        Ok(summary)
    }

    fn download_entry(
        &self,
        tree: &AuthorDir,
        reference: EntryRef,
        summary: &mut RunSummary,
    ) -> anyhow::Result<()> {
        let mut entry = match Entry::new(self.site, reference.clone()) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(%reference, error = %err, "skipping entry");
                summary.entries_skipped += 1;
                return Ok(());
            }
        };
        let (images, date) = match self.extract(&mut entry) {
            Ok(fields) => fields,
            Err(err) => {
                tracing::warn!(%reference, error = %err, "skipping entry");
                summary.entries_skipped += 1;
                return Ok(());
            }
        };

        if let Err(err) = tree.ensure_entry_dir(&date) {
            self.on_copy_failure(err)
                .with_context(|| format!("create directories for {reference}"))?;
            summary.entries_skipped += 1;
            return Ok(());
        }

        for (index, src) in images.iter().enumerate() {
            let path = tree.image_path(&date, index);
            match self.save_image(entry.url(), src, &path) {
                Ok(ImageOutcome::Saved(bytes)) => {
                    tracing::debug!(path = %path.display(), bytes, "image saved");
                    summary.images_saved += 1;
                }
                Ok(ImageOutcome::Existing) => summary.images_existing += 1,
                Err(err) => {
                    self.on_copy_failure(err)
                        .with_context(|| format!("download {src} for {reference}"))?;
                    summary.images_failed += 1;
                }
            }
        }
        Ok(())
    }

    fn extract(&self, entry: &mut Entry) -> Result<(Vec<String>, PublishedAt), ScrapeError> {
        let images = entry.images(self.fetcher)?.to_vec();
        let title = entry.title(self.fetcher)?.to_owned();
        let date = entry.date(self.fetcher)?;

        tracing::info!(
            url = %entry.reference(),
            title = %title,
            date = %date,
            images = images.len(),
            "entry"
        );
        tracing::debug!(?images, "entry images");
        Ok((images, date))
    }

    fn save_image(&self, entry_url: &Url, src: &str, path: &Path) -> Result<ImageOutcome, ScrapeError> {
        if path.exists() {
            tracing::info!(path = %path.display(), "file exists");
            return Ok(ImageOutcome::Existing);
        }

        let url = entry_url
            .join(src)
            .map_err(|err| ScrapeError::Parse(format!("image url {src:?}: {err}")))?;
        let mut body = self.fetcher.open(&url)?;
        let file = layout::create_new_file(path)?;

        let mut writer = BufWriter::new(file);
        let streamed = stream(&mut body, &mut writer, &url, path);
        drop(writer);

        match streamed {
            Ok(bytes) => Ok(ImageOutcome::Saved(bytes)),
            Err(err) => {
                if let Err(remove_err) = std::fs::remove_file(path) {
                    tracing::warn!(path = %path.display(), error = %remove_err, "remove partial file");
                }
                Err(err)
            }
        }
    }

    fn on_copy_failure(&self, err: ScrapeError) -> Result<(), ScrapeError> {
        match self.policy {
            FailurePolicy::Abort => Err(err),
            FailurePolicy::Skip => {
                tracing::warn!(error = %err, "download step failed; continuing");
                Ok(())
            }
        }
    }
}

/// Copies `body` into `out`. Read failures are network errors, write failures filesystem errors.
fn stream(
    body: &mut dyn Read,
    out: &mut impl Write,
    url: &Url,
    path: &Path,
) -> Result<u64, ScrapeError> {
    let mut buf = vec![0_u8; 64 * 1024];
    let mut total = 0_u64;
    loop {
        let read = match body.read(&mut buf) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(ScrapeError::Body {
                    url: url.to_string(),
                    source,
                });
            }
        };
        out.write_all(&buf[..read])
            .map_err(|err| ScrapeError::fs("write image", path, err))?;
        total += read as u64;
    }
    out.flush()
        .map_err(|err| ScrapeError::fs("write image", path, err))?;
    Ok(total)
}
