use clap::{Parser, ValueEnum};

use crate::site::DEFAULT_DOMAIN;

/// Download every image posted by one Ameba blog author.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Blog author identifier (the path segment after the domain).
    pub author: String,

    /// Root directory for downloaded images; files land under `<out>/<author>/`.
    #[arg(long, default_value = "ameblo")]
    pub out: String,

    /// Blog domain (must be http/https).
    #[arg(long, default_value = DEFAULT_DOMAIN)]
    pub domain: String,

    /// What to do when creating a directory or downloading an image fails.
    #[arg(long, value_enum, default_value_t = FailurePolicy::Abort)]
    pub on_download_error: FailurePolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicy {
    /// Stop the whole run.
    #[default]
    Abort,
    /// Log the failure and continue with the next image or entry.
    Skip,
}
