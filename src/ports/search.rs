//! Issue search port for querying a remote tracker.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

/// Boxed future type alias used by [`IssueSearchClient`] to keep the trait dyn-compatible.
pub type SearchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<SearchPage, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// A single issue returned by the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// The issue key, e.g. `PROJ-42`.
    pub key: String,
    /// The one-line summary.
    pub summary: String,
    /// The long-form description, absent when the issue has none.
    pub description: Option<String>,
}

/// One page-sized slice of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Query in the tracker's own language (JQL for Jira).
    pub jql: String,
    /// Maximum number of issues the page may contain.
    pub max_results: usize,
    /// Zero-based offset of the first issue in the page.
    pub start_at: usize,
    /// Fields to include per issue. Empty means the server's default set.
    pub fields: Vec<String>,
}

/// A page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    /// Total number of matching issues, when the server reports it.
    pub total: Option<usize>,
    /// Issues in server order.
    pub issues: Vec<Issue>,
}

/// Runs queries against an issue tracker, one page at a time.
///
/// Abstracting the tracker lets the searcher and pipeline run against
/// in-memory fakes without a network.
pub trait IssueSearchClient: Send + Sync {
    /// Fetches a single page of results for the given request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (network, auth, query syntax, etc.).
    fn search(&self, request: &SearchRequest) -> SearchFuture<'_>;
}
