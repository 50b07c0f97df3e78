//! Command-line front end.
//!
//! A thin consumer of [`client`]: parse arguments, build a [`RegexClient`]
//! from layered configuration, run one operation and print the result.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use client::{
    ClientConfig, ClientError, Group, Match, MatchRequest, RegexClient, ReplaceRequest, Span,
    SplitRequest,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";

/// Command-line client for the regex-lite matching service.
#[derive(Parser, Debug)]
#[command(name = "regex-lite", version, about)]
pub struct Cli {
    /// Service base URL. Overrides REGEX_LITE_BASE_URL and the config file.
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Send match/replace/split to the service's mock engine.
    #[arg(long, global = true)]
    pub mock: bool,

    /// Log filter, e.g. `debug` or `client=trace`. Defaults to RUST_LOG, then `warn`.
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every match of PATTERN in TEXT.
    Match {
        pattern: String,
        text: String,
        /// Any of i, m, s, g. Passed to the service unchanged.
        #[arg(short, long, default_value = "")]
        flags: String,
    },
    /// Replace every match of PATTERN in TEXT with REPL.
    Replace {
        pattern: String,
        text: String,
        repl: String,
        #[arg(short, long, default_value = "")]
        flags: String,
    },
    /// Split TEXT on PATTERN.
    Split {
        pattern: String,
        text: String,
        #[arg(short, long, default_value = "")]
        flags: String,
    },
    /// Check that the service is up.
    Health,
}

impl Cli {
    /// Applies command-line overrides on top of loaded configuration.
    pub fn apply_overrides(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(base_url) = &self.base_url {
            config.base_url = Some(base_url.clone());
        }
        if self.mock {
            config.use_mock = true;
        }
        config
    }
}

/// Installs the global subscriber. Logs go to stderr so stdout stays JSON.
///
/// An explicit filter that does not parse is an error; an unusable `RUST_LOG`
/// falls back to `warn`.
pub fn init_tracing(filter: Option<&str>, json: bool) -> anyhow::Result<()> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`"))?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!(e).context("failed to install the log subscriber"))
}

pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = cli.apply_overrides(ClientConfig::load()?);
    tracing::info!(base_url = %config.base_url(), use_mock = config.use_mock, "client ready");
    let client = RegexClient::new(config)?;

    // The subscriber writes to stderr from runtime workers, so the std
    // handles are only locked once the round trip is over.
    let outcome = execute(&cli.command, &client).await;
    let ok = render(&outcome, &mut io::stdout().lock(), &mut io::stderr().lock())?;

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Writes a finished operation as pretty JSON to `out`, or its failure
/// message to `err`. Returns whether the operation succeeded.
pub fn render<O: Write, E: Write>(
    outcome: &Result<Value, ClientError>,
    out: &mut O,
    err: &mut E,
) -> io::Result<bool> {
    match outcome {
        Ok(value) => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
            Ok(true)
        }
        Err(failure) => {
            writeln!(err, "error: {}", failure.message())?;
            Ok(false)
        }
    }
}

pub async fn execute(command: &Command, client: &RegexClient) -> Result<Value, ClientError> {
    let value = match command {
        Command::Match {
            pattern,
            text,
            flags,
        } => {
            let response = client
                .match_pattern(&MatchRequest::new(pattern, flags, text))
                .await?;
            let views: Vec<MatchView<'_>> =
                response.iter().map(|m| MatchView::new(m, text)).collect();
            json!({ "matches": views })
        }
        Command::Replace {
            pattern,
            text,
            repl,
            flags,
        } => to_value(
            client
                .replace(&ReplaceRequest::new(pattern, flags, text, repl))
                .await?,
        )?,
        Command::Split {
            pattern,
            text,
            flags,
        } => to_value(
            client
                .split(&SplitRequest::new(pattern, flags, text))
                .await?,
        )?,
        Command::Health => to_value(client.health().await?)?,
    };
    Ok(value)
}

fn to_value<T: Serialize>(value: T) -> Result<Value, ClientError> {
    serde_json::to_value(value).map_err(|e| ClientError::unknown(e.to_string()))
}

/// A match annotated with the substrings it covers in the submitted text.
#[derive(Debug, Serialize)]
struct MatchView<'t> {
    span: Span,
    groups: Vec<Group>,
    #[serde(rename = "match")]
    matched: Option<&'t str>,
    captures: Vec<Option<&'t str>>,
}

impl<'t> MatchView<'t> {
    fn new(m: &Match, text: &'t str) -> Self {
        Self {
            span: m.span,
            groups: m.groups.clone(),
            matched: m.span.extract(text),
            captures: m
                .groups
                .iter()
                .map(|g| g.and_then(|span| span.extract(text)))
                .collect(),
        }
    }
}
