use std::fs::{DirBuilder, File, OpenOptions};
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use crate::date::PublishedAt;
use crate::error::ScrapeError;

/// Creates `dir` with mode 0755 unless it already exists. Losing a creation race counts as existing.
pub fn ensure_dir(dir: &Path) -> Result<(), ScrapeError> {
    if dir.is_dir() {
        tracing::info!(path = %dir.display(), "directory exists");
        return Ok(());
    }

    let mut builder = DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt as _;
        builder.mode(0o755);
    }
    match builder.create(dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == IoErrorKind::AlreadyExists && dir.is_dir() => {
            tracing::info!(path = %dir.display(), "directory exists");
            Ok(())
        }
        Err(err) => Err(ScrapeError::fs("create directory", dir, err)),
    }
}

/// Like [`ensure_dir`], creating missing parents first.
pub fn ensure_dir_all(dir: &Path) -> Result<(), ScrapeError> {
    if dir.is_dir() {
        return ensure_dir(dir);
    }
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt as _;
        builder.mode(0o755);
    }
    builder
        .create(dir)
        .map_err(|err| ScrapeError::fs("create directory", dir, err))
}

/// Creates a new file at `path`; never truncates an existing one.
pub fn create_new_file(path: &Path) -> Result<File, ScrapeError> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|err| ScrapeError::fs("create file", path, err))
}

/// Output tree of one author: `<root>/<year>/<month>/<stamp>/<stamp>_<index>.jpg`.
#[derive(Debug, Clone)]
pub struct AuthorDir {
    root: PathBuf,
}

impl AuthorDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn entry_dir(&self, date: &PublishedAt) -> PathBuf {
        self.root
            .join(date.year_dir())
            .join(date.month_dir())
            .join(date.stamp())
    }

    /// Creates year, month and entry directories in turn.
    pub fn ensure_entry_dir(&self, date: &PublishedAt) -> Result<(), ScrapeError> {
        let year = self.root.join(date.year_dir());
        ensure_dir(&year)?;
        let month = year.join(date.month_dir());
        ensure_dir(&month)?;
        ensure_dir(&self.entry_dir(date))
    }

    pub fn image_path(&self, date: &PublishedAt, index: usize) -> PathBuf {
        self.entry_dir(date)
            .join(format!("{}_{index}.jpg", date.stamp()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> PublishedAt {
        PublishedAt::parse("2020-05-11 12:34:56").unwrap()
    }

    #[test]
    fn entry_paths_follow_date() {
        let layout = AuthorDir::new("/out/alice");
        assert_eq!(
            layout.image_path(&date(), 3),
            Path::new("/out/alice/2020/05/2020-05-11_12-34-56/2020-05-11_12-34-56_3.jpg")
        );
    }

    #[test]
    fn ensure_dir_is_idempotent() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let dir = temp.path().join("a");
        ensure_dir(&dir)?;
        std::fs::write(dir.join("keep"), b"x")?;
        ensure_dir(&dir)?;
        assert!(dir.join("keep").exists());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn directories_are_0755() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt as _;

        let temp = tempfile::TempDir::new()?;
        let layout = AuthorDir::new(temp.path());
        layout.ensure_entry_dir(&date())?;
        let dir = layout.entry_dir(&date());
        let mode = std::fs::metadata(&dir)?.permissions().mode() & 0o777;
        // umask may only remove bits.
        assert_eq!(mode & !0o755, 0);
        Ok(())
    }

    #[test]
    fn ensure_dir_without_parent_fails() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let err = ensure_dir(&temp.path().join("missing").join("child")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Filesystem);
        Ok(())
    }

    #[test]
    fn create_new_file_refuses_existing() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("x.jpg");
        std::fs::write(&path, b"old")?;
        assert!(create_new_file(&path).is_err());
        assert_eq!(std::fs::read(&path)?, b"old");
        Ok(())
    }
}
