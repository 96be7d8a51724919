//! Service context bundling all port trait objects.

use std::path::Path;

use crate::adapters::live::jira::LiveJiraClient;
use crate::adapters::live::xlsx::XlsxTableWriter;
use crate::config::ExportConfig;
use crate::error::{Error, Result};
use crate::ports::search::IssueSearchClient;
use crate::ports::table::TableWriter;

/// Bundles the two external boundaries of an export.
///
/// Constructors wire up different adapter implementations: live ones for
/// the real CLI, arbitrary ones for tests.
pub struct ServiceContext {
    /// Issue tracker to search.
    pub search: Box<dyn IssueSearchClient>,
    /// Destination for the exported table.
    pub table: Box<dyn TableWriter>,
}

impl ServiceContext {
    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(search: Box<dyn IssueSearchClient>, table: Box<dyn TableWriter>) -> Self {
        Self { search, table }
    }

    /// Creates a live context: Jira over HTTP, an `.xlsx` file at `output`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the HTTP client cannot be configured.
    pub fn live(config: &ExportConfig, output: &Path) -> Result<Self> {
        let search = LiveJiraClient::new(config).map_err(Error::Transport)?;
        Ok(Self::new(Box::new(search), Box::new(XlsxTableWriter::new(output))))
    }
}
