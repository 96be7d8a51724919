//! Core library entry for the `jira-export` CLI.
//!
//! Searches a Jira instance with a JQL query, paging through the whole
//! result set, and writes each issue's key, summary and description to a
//! single-sheet Excel workbook.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod row;
pub mod search;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub use error::{Error, Result};

use crate::config::ExportConfig;
use crate::context::ServiceContext;
use crate::pipeline::ExportPipeline;

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// Number of issues found and written.
    pub count: usize,
    /// Path of the written workbook.
    pub output: PathBuf,
}

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns [`Error::Usage`] when argument parsing fails, a configuration
/// error before any network activity, or a transport/write error from the
/// export itself.
pub fn run<I, T>(args: I) -> Result<ExportSummary>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args)?;
    init_logging(cli.debug);

    let config = ExportConfig::load(&cli.config)?;
    tracing::debug!(?config, "configuration loaded");

    let ctx = ServiceContext::live(&config, &cli.output)?;
    let count = export(&ctx, &config)?;

    Ok(ExportSummary { count, output: cli.output })
}

/// Runs the pipeline for `config.query` against the ports in `ctx`.
///
/// Page requests are driven one at a time on a current-thread runtime.
///
/// # Errors
///
/// Returns [`Error::Transport`] if the runtime cannot start or the search
/// fails, and [`Error::Write`] if the table cannot be written.
pub fn export(ctx: &ServiceContext, config: &ExportConfig) -> Result<usize> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Transport(e.into()))?;

    let mut pipeline = ExportPipeline::new(ctx.search.as_ref()).with_page_size(config.page_size);
    runtime.block_on(pipeline.run(&config.query, ctx.table.as_ref()))
}

/// Writes the failure report: a one-line message followed by diagnostics.
///
/// # Errors
///
/// Returns an error if `out` cannot be written to.
pub fn report_error(err: &Error, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "An error occurred.")?;
    writeln!(out, "  Message: {err}")?;
    writeln!(out, "-- Details --")?;
    writeln!(out, "{err:?}")?;
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        writeln!(out, "Caused by: {cause}")?;
        source = cause.source();
    }
    Ok(())
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed when `run` is called more than once.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init();
}
