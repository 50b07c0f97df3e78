//! regex-lite - command-line client for the regex-lite matching service.
//!
//! Configuration is read from `regex-lite.*`, `.env` and `REGEX_LITE_*`
//! environment variables; `--base-url` and `--mock` override both.

use std::process::ExitCode;

use clap::Parser;
use regex_lite::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // A missing .env is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli::init_tracing(cli.log_level.as_deref(), cli.log_json)?;

    cli::run(cli).await
}
