use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    ameblo_dl::logging::init().context("init logging")?;

    let cli = ameblo_dl::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    ameblo_dl::download::run(cli).context("download images")?;

    Ok(())
}
